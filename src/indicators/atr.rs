//! Average True Range (ATR) indicator
//!
//! Measures market volatility by calculating the average of true ranges over a period.
//! True Range is the greatest of:
//! - Current High - Current Low
//! - Abs(Current High - Previous Close)
//! - Abs(Current Low - Previous Close)
//!
//! Uses Wilder's smoothing (same as RSI and ADX) for the moving average.

use super::wilder_smooth;
use crate::models::Candle;

/// True range per candle; the first candle has no previous close and is `None`
pub fn true_ranges(candles: &[Candle]) -> Vec<Option<f64>> {
    let mut ranges = Vec::with_capacity(candles.len());
    if candles.is_empty() {
        return ranges;
    }

    ranges.push(None);
    for i in 1..candles.len() {
        let high = candles[i].high;
        let low = candles[i].low;
        let prev_close = candles[i - 1].close;

        let tr = (high - low)
            .max((high - prev_close).abs())
            .max((low - prev_close).abs());

        ranges.push(Some(tr));
    }

    ranges
}

/// Calculate ATR aligned with candles
///
/// First ATR is the simple average of the first `period` true ranges and
/// lands at index `period`.
pub fn calculate_atr(candles: &[Candle], period: usize) -> Vec<Option<f64>> {
    if candles.len() < period + 1 {
        return vec![None; candles.len()];
    }

    wilder_smooth(&true_ranges(candles), period)
}
