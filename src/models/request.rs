use chrono::{DateTime, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize};

use super::TradeSide;

/// Raw candle as received on the wire; OHLCV values are decimal strings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CandleData {
    /// Unix timestamp in milliseconds
    pub timestamp: i64,
    pub open: String,
    pub high: String,
    pub low: String,
    pub close: String,
    pub volume: String,
}

/// A single buy or sell execution
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TradePoint {
    /// Unix timestamp in milliseconds
    pub timestamp: i64,
    pub side: TradeSide,
    pub price: f64,
    pub quantity: f64,
}

/// A completed trade cycle submitted for evaluation
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateReportRequest {
    pub trade_cycle_id: i64,
    pub symbol: String,
    #[serde(deserialize_with = "deserialize_datetime")]
    pub start_date: NaiveDateTime,
    #[serde(deserialize_with = "deserialize_datetime")]
    pub end_date: NaiveDateTime,
    pub profit_loss_rate: f64,
    pub average_buy_price: f64,
    pub average_sell_price: f64,
    pub total_investment_amount: f64,
    pub chart_data: Vec<CandleData>,
    pub trade_points: Vec<TradePoint>,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("invalid {field}: {reason}")]
pub struct ValidationError {
    pub field: String,
    pub reason: String,
}

impl ValidationError {
    fn new(field: &str, reason: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            reason: reason.into(),
        }
    }
}

impl GenerateReportRequest {
    /// Check the field constraints the report service accepts
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.trade_cycle_id <= 0 {
            return Err(ValidationError::new("tradeCycleId", "must be greater than 0"));
        }

        let symbol_len = self.symbol.chars().count();
        if !(1..=10).contains(&symbol_len) {
            return Err(ValidationError::new(
                "symbol",
                "length must be between 1 and 10",
            ));
        }

        for (field, value) in [
            ("averageBuyPrice", self.average_buy_price),
            ("averageSellPrice", self.average_sell_price),
            ("totalInvestmentAmount", self.total_investment_amount),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(ValidationError::new(field, "must be greater than 0"));
            }
        }

        if !self.profit_loss_rate.is_finite() {
            return Err(ValidationError::new("profitLossRate", "must be a finite number"));
        }

        if self.chart_data.is_empty() {
            return Err(ValidationError::new("chartData", "must contain at least 1 candle"));
        }

        if self.trade_points.is_empty() {
            return Err(ValidationError::new(
                "tradePoints",
                "must contain at least 1 trade point",
            ));
        }

        for (i, point) in self.trade_points.iter().enumerate() {
            if !(point.price.is_finite() && point.price > 0.0) {
                return Err(ValidationError::new(
                    &format!("tradePoints[{}].price", i),
                    "must be greater than 0",
                ));
            }
            if !(point.quantity.is_finite() && point.quantity > 0.0) {
                return Err(ValidationError::new(
                    &format!("tradePoints[{}].quantity", i),
                    "must be greater than 0",
                ));
            }
        }

        Ok(())
    }

    /// Whole days between start and end of the cycle
    pub fn holding_days(&self) -> i64 {
        (self.end_date - self.start_date).num_days()
    }
}

/// Accepts RFC 3339 (`2024-03-01T09:30:00Z`) as well as naive ISO-8601
/// (`2024-03-01T09:30:00`) date-times. Offsets are normalised to UTC.
fn deserialize_datetime<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_datetime(&raw).ok_or_else(|| {
        serde::de::Error::custom(format!("invalid date-time: {}", raw))
    })
}

pub(crate) fn parse_datetime(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.naive_utc());
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
}
