use serde::{Deserialize, Serialize};

const NOT_AVAILABLE: &str = "N/A";

/// Indicator values read off at the candle nearest to a trade
///
/// Values are rounded for presentation; `None` means the indicator had no
/// defined value at that candle and is omitted when serialized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorSnapshot {
    /// Calendar date (UTC) of the aligned candle, or "N/A"
    pub date: String,
    pub close_price: f64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volume: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rsi_14: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub macd: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub macd_signal: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub macd_hist: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sma_20: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sma_50: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sma_200: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ema_12: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ema_26: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bb_upper: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bb_middle: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bb_lower: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stoch_k: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stoch_d: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub adx: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub atr: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub obv: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub willr: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volume_change: Option<f64>,
}

impl IndicatorSnapshot {
    /// Sentinel used when a side has no trade or history is too short
    pub fn empty() -> Self {
        Self {
            date: NOT_AVAILABLE.to_string(),
            close_price: 0.0,
            volume: None,
            rsi_14: None,
            macd: None,
            macd_signal: None,
            macd_hist: None,
            sma_20: None,
            sma_50: None,
            sma_200: None,
            ema_12: None,
            ema_26: None,
            bb_upper: None,
            bb_middle: None,
            bb_lower: None,
            stoch_k: None,
            stoch_d: None,
            adx: None,
            atr: None,
            obv: None,
            willr: None,
            volume_change: None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.date == NOT_AVAILABLE
    }
}

impl Default for IndicatorSnapshot {
    fn default() -> Self {
        Self::empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_snapshot_serializes_only_sentinel_fields() {
        let json = serde_json::to_value(IndicatorSnapshot::empty()).unwrap();
        let object = json.as_object().unwrap();

        assert_eq!(object.len(), 2);
        assert_eq!(json["date"], "N/A");
        assert_eq!(json["close_price"], 0.0);
    }

    #[test]
    fn test_defined_values_are_serialized() {
        let snapshot = IndicatorSnapshot {
            date: "2024-03-04".to_string(),
            close_price: 101.25,
            rsi_14: Some(55.12),
            ..IndicatorSnapshot::empty()
        };

        let json = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(json["rsi_14"], 55.12);
        assert!(json.get("macd").is_none());
        assert!(!snapshot.is_empty());
    }
}
