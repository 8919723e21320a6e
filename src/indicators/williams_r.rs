use super::stochastic::price_range;
use crate::models::Candle;

/// Williams %R
///
/// %R = -100 * (highest high - close) / (highest high - lowest low), ranging
/// from -100 (close at the low) to 0 (close at the high). Defined from index
/// `period - 1`; undefined where the window has no range.
pub fn calculate_williams_r(candles: &[Candle], period: usize) -> Vec<Option<f64>> {
    let mut willr = vec![None; candles.len()];
    if period == 0 || candles.len() < period {
        return willr;
    }

    for i in (period - 1)..candles.len() {
        let (lowest, highest) = price_range(&candles[i + 1 - period..=i]);
        let range = highest - lowest;
        if range > 0.0 {
            willr[i] = Some(100.0 * ((candles[i].close - lowest) / range - 1.0));
        }
    }

    willr
}
