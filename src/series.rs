//! Series builder: raw candle records -> time-sorted numeric candles

use chrono::{DateTime, Utc};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use std::str::FromStr;
use thiserror::Error;

use crate::models::{Candle, CandleData};

/// Minimum candle count before any indicator is computed
pub const MIN_CANDLES: usize = 20;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SeriesError {
    #[error("insufficient history: have {candles} candles, need {minimum}")]
    InsufficientHistory { candles: usize, minimum: usize },

    #[error("invalid candle at index {index}: {field} = {value:?}")]
    InvalidCandle {
        index: usize,
        field: &'static str,
        value: String,
    },
}

/// Candles sorted ascending by timestamp
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    candles: Vec<Candle>,
}

impl Series {
    /// Sorts the given candles by timestamp; equal timestamps keep input order
    pub fn from_candles(mut candles: Vec<Candle>) -> Self {
        candles.sort_by_key(|c| c.timestamp);
        Self { candles }
    }

    pub fn candles(&self) -> &[Candle] {
        &self.candles
    }

    pub fn len(&self) -> usize {
        self.candles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candles.is_empty()
    }

    pub fn closes(&self) -> Vec<f64> {
        self.candles.iter().map(|c| c.close).collect()
    }

    pub fn volumes(&self) -> Vec<f64> {
        self.candles.iter().map(|c| c.volume).collect()
    }
}

/// Parse and sort raw candle records
///
/// Histories shorter than `min_candles` are rejected before any parsing so
/// callers can degrade to an empty analysis instead of computing indicators
/// over a window that is too short.
pub fn build_series(raw: &[CandleData], min_candles: usize) -> Result<Series, SeriesError> {
    if raw.len() < min_candles {
        return Err(SeriesError::InsufficientHistory {
            candles: raw.len(),
            minimum: min_candles,
        });
    }

    let candles = raw
        .iter()
        .enumerate()
        .map(|(index, record)| parse_candle(index, record))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Series::from_candles(candles))
}

fn parse_candle(index: usize, record: &CandleData) -> Result<Candle, SeriesError> {
    let timestamp = DateTime::<Utc>::from_timestamp_millis(record.timestamp).ok_or_else(|| {
        SeriesError::InvalidCandle {
            index,
            field: "timestamp",
            value: record.timestamp.to_string(),
        }
    })?;

    Ok(Candle {
        timestamp,
        open: parse_decimal(index, "open", &record.open)?,
        high: parse_decimal(index, "high", &record.high)?,
        low: parse_decimal(index, "low", &record.low)?,
        close: parse_decimal(index, "close", &record.close)?,
        volume: parse_decimal(index, "volume", &record.volume)?,
    })
}

/// Finite, non-negative decimal string -> f64
fn parse_decimal(index: usize, field: &'static str, raw: &str) -> Result<f64, SeriesError> {
    let invalid = || SeriesError::InvalidCandle {
        index,
        field,
        value: raw.to_string(),
    };

    let trimmed = raw.trim();
    let decimal = Decimal::from_str(trimmed)
        .or_else(|_| Decimal::from_scientific(trimmed))
        .map_err(|_| invalid())?;

    if decimal.is_sign_negative() && !decimal.is_zero() {
        return Err(invalid());
    }

    decimal.to_f64().filter(|v| v.is_finite()).ok_or_else(invalid)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(timestamp: i64, close: &str) -> CandleData {
        CandleData {
            timestamp,
            open: close.to_string(),
            high: close.to_string(),
            low: close.to_string(),
            close: close.to_string(),
            volume: "1000".to_string(),
        }
    }

    fn records(len: usize) -> Vec<CandleData> {
        (0..len)
            .map(|i| record(1_700_000_000_000 + i as i64 * 60_000, "100.5"))
            .collect()
    }

    #[test]
    fn test_build_series_sorts_by_timestamp() {
        let mut raw = records(25);
        raw.reverse();
        raw.swap(3, 17);

        let series = build_series(&raw, MIN_CANDLES).unwrap();

        assert_eq!(series.len(), 25);
        assert!(series
            .candles()
            .windows(2)
            .all(|w| w[0].timestamp <= w[1].timestamp));
    }

    #[test]
    fn test_build_series_parses_decimals() {
        let mut raw = records(20);
        raw[0].close = "123.4500".to_string();
        raw[0].volume = "0".to_string();

        let series = build_series(&raw, MIN_CANDLES).unwrap();
        let first = &series.candles()[0];

        assert!((first.close - 123.45).abs() < 1e-12);
        assert_eq!(first.volume, 0.0);
    }

    #[test]
    fn test_insufficient_history() {
        let raw = records(19);
        assert_eq!(
            build_series(&raw, MIN_CANDLES),
            Err(SeriesError::InsufficientHistory {
                candles: 19,
                minimum: 20
            })
        );
    }

    #[test]
    fn test_empty_input_is_insufficient() {
        assert!(matches!(
            build_series(&[], MIN_CANDLES),
            Err(SeriesError::InsufficientHistory { candles: 0, .. })
        ));
    }

    #[test]
    fn test_rejects_unparsable_price() {
        let mut raw = records(20);
        raw[4].high = "abc".to_string();

        assert_eq!(
            build_series(&raw, MIN_CANDLES),
            Err(SeriesError::InvalidCandle {
                index: 4,
                field: "high",
                value: "abc".to_string()
            })
        );
    }

    #[test]
    fn test_rejects_negative_volume() {
        let mut raw = records(20);
        raw[2].volume = "-5".to_string();

        assert!(matches!(
            build_series(&raw, MIN_CANDLES),
            Err(SeriesError::InvalidCandle { field: "volume", .. })
        ));
    }

    #[test]
    fn test_accepts_scientific_notation() {
        let mut raw = records(20);
        raw[0].volume = "1.5e3".to_string();

        let series = build_series(&raw, MIN_CANDLES).unwrap();
        assert_eq!(series.candles()[0].volume, 1500.0);
    }
}
