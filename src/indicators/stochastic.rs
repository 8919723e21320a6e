//! Stochastic Oscillator (slow)
//!
//! raw %K = 100 * (close - lowest low) / (highest high - lowest low) over `k_period`
//! %K = SMA(raw %K, smooth_k), %D = SMA(%K, d_period)
//!
//! Windows where the high/low range is zero have no defined %K.

use super::rolling_mean;
use crate::models::Candle;

#[derive(Debug, Clone, PartialEq)]
pub struct StochasticSeries {
    pub k: Vec<Option<f64>>,
    pub d: Vec<Option<f64>>,
}

pub fn calculate_stochastic(
    candles: &[Candle],
    k_period: usize,
    smooth_k: usize,
    d_period: usize,
) -> StochasticSeries {
    let mut raw_k = vec![None; candles.len()];

    if k_period > 0 && candles.len() >= k_period {
        for i in (k_period - 1)..candles.len() {
            let (lowest, highest) = price_range(&candles[i + 1 - k_period..=i]);
            let range = highest - lowest;
            if range > 0.0 {
                raw_k[i] = Some(100.0 * (candles[i].close - lowest) / range);
            }
        }
    }

    let k = rolling_mean(&raw_k, smooth_k);
    let d = rolling_mean(&k, d_period);

    StochasticSeries { k, d }
}

/// Lowest low and highest high of a window
pub(crate) fn price_range(window: &[Candle]) -> (f64, f64) {
    window.iter().fold(
        (f64::INFINITY, f64::NEG_INFINITY),
        |(lowest, highest), candle| (lowest.min(candle.low), highest.max(candle.high)),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn create_test_candles(prices: &[(f64, f64, f64)]) -> Vec<Candle> {
        prices
            .iter()
            .enumerate()
            .map(|(i, &(high, low, close))| Candle {
                timestamp: Utc::now() + chrono::Duration::hours(i as i64),
                open: close,
                high,
                low,
                close,
                volume: 1000.0,
            })
            .collect()
    }

    #[test]
    fn test_stochastic_warmup() {
        let prices: Vec<_> = (0..25)
            .map(|i| {
                let c = 100.0 + i as f64;
                (c + 1.0, c - 1.0, c)
            })
            .collect();
        let candles = create_test_candles(&prices);
        let stoch = calculate_stochastic(&candles, 14, 3, 3);

        // raw %K from 13, %K from 15, %D from 17
        assert!(stoch.k[14].is_none());
        assert!(stoch.k[15].is_some());
        assert!(stoch.d[16].is_none());
        assert!(stoch.d[17].is_some());
    }

    #[test]
    fn test_stochastic_close_at_high() {
        let prices = vec![(10.0, 0.0, 10.0); 5];
        let candles = create_test_candles(&prices);
        let stoch = calculate_stochastic(&candles, 2, 1, 1);

        assert_eq!(stoch.k[1], Some(100.0));
        assert_eq!(stoch.d[1], Some(100.0));
    }

    #[test]
    fn test_stochastic_known_value() {
        let candles = create_test_candles(&[
            (10.0, 0.0, 5.0),
            (10.0, 0.0, 2.5),
            (10.0, 0.0, 7.5),
        ]);
        let stoch = calculate_stochastic(&candles, 1, 3, 1);

        // raw: 50, 25, 75 -> mean 50
        assert_eq!(stoch.k[2], Some(50.0));
    }

    #[test]
    fn test_stochastic_zero_range_undefined() {
        let candles = create_test_candles(&vec![(50.0, 50.0, 50.0); 20]);
        let stoch = calculate_stochastic(&candles, 14, 3, 3);

        assert!(stoch.k.iter().all(Option::is_none));
        assert!(stoch.d.iter().all(Option::is_none));
    }
}
