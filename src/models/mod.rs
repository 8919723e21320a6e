use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub mod request;
pub mod response;
pub mod snapshot;

pub use request::{CandleData, GenerateReportRequest, TradePoint, ValidationError};
pub use response::GenerateReportResponse;
pub use snapshot::IndicatorSnapshot;

/// OHLCV candlestick with numeric fields, built from a [`CandleData`] record
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Candle {
    pub timestamp: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "UPPERCASE")]
pub enum TradeSide {
    Buy,
    Sell,
}

impl TradeSide {
    pub fn as_str(&self) -> &'static str {
        match self {
            TradeSide::Buy => "BUY",
            TradeSide::Sell => "SELL",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trade_side_wire_format() {
        assert_eq!(serde_json::to_string(&TradeSide::Buy).unwrap(), "\"BUY\"");
        let side: TradeSide = serde_json::from_str("\"SELL\"").unwrap();
        assert_eq!(side, TradeSide::Sell);
        assert!(serde_json::from_str::<TradeSide>("\"HOLD\"").is_err());
    }
}
