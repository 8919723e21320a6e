//! Average Directional Index (ADX) - Measures trend strength
//!
//! ADX ranges from 0 to 100:
//! - ADX > 25: Strong trend (bull or bear)
//! - ADX 20-25: Moderate trend
//! - ADX < 20: Weak trend / choppy / ranging market
//!
//! +DI, -DI, TR and finally DX are all smoothed with Wilder's method, so the
//! first ADX value needs `2 * period` candles and lands at index `2 * period - 1`.

use super::{atr::true_ranges, wilder_smooth};
use crate::models::Candle;

/// Calculate ADX aligned with candles
///
/// A series with no range at all (every price equal) has no directional
/// information and yields an entirely undefined column.
pub fn calculate_adx(candles: &[Candle], period: usize) -> Vec<Option<f64>> {
    let mut adx = vec![None; candles.len()];
    if period == 0 || candles.len() < 2 * period {
        return adx;
    }

    // Step 1: Directional Movement (+DM, -DM); index 0 has no previous candle
    let mut plus_dms = vec![None; candles.len()];
    let mut minus_dms = vec![None; candles.len()];

    for i in 1..candles.len() {
        let up_move = candles[i].high - candles[i - 1].high;
        let down_move = candles[i - 1].low - candles[i].low;

        let plus_dm = if up_move > down_move && up_move > 0.0 {
            up_move
        } else {
            0.0
        };

        let minus_dm = if down_move > up_move && down_move > 0.0 {
            down_move
        } else {
            0.0
        };

        plus_dms[i] = Some(plus_dm);
        minus_dms[i] = Some(minus_dm);
    }

    // Step 2: Smooth True Range and Directional Movements (Wilder's smoothing)
    let smoothed_tr = wilder_smooth(&true_ranges(candles), period);
    let smoothed_plus_dm = wilder_smooth(&plus_dms, period);
    let smoothed_minus_dm = wilder_smooth(&minus_dms, period);

    // Step 3: +DI, -DI and DX (Directional Index)
    let dx: Vec<Option<f64>> = (0..candles.len())
        .map(|i| match (smoothed_tr[i], smoothed_plus_dm[i], smoothed_minus_dm[i]) {
            (Some(tr), Some(plus_dm), Some(minus_dm)) if tr > 0.0 => {
                let plus_di = (plus_dm / tr) * 100.0;
                let minus_di = (minus_dm / tr) * 100.0;
                let di_sum = plus_di + minus_di;
                if di_sum > 0.0 {
                    Some(((plus_di - minus_di).abs() / di_sum) * 100.0)
                } else {
                    None
                }
            }
            _ => None,
        })
        .collect();

    // Step 4: ADX is the smoothed DX
    let smoothed_dx = wilder_smooth(&dx, period);
    adx.copy_from_slice(&smoothed_dx);
    adx
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn create_test_candles(prices: &[(f64, f64, f64, f64)]) -> Vec<Candle> {
        prices
            .iter()
            .enumerate()
            .map(|(i, &(open, high, low, close))| Candle {
                timestamp: Utc::now() + chrono::Duration::hours(i as i64),
                open,
                high,
                low,
                close,
                volume: 1000.0,
            })
            .collect()
    }

    fn uptrend(len: usize) -> Vec<(f64, f64, f64, f64)> {
        (0..len)
            .map(|i| {
                let base = 100.0 + 3.0 * i as f64;
                (base, base + 5.0, base - 1.0, base + 3.0)
            })
            .collect()
    }

    #[test]
    fn test_adx_strong_uptrend() {
        let candles = create_test_candles(&uptrend(40));
        let adx = calculate_adx(&candles, 14);

        assert!(adx[..27].iter().all(Option::is_none));
        // Every move is up: +DI dominates completely
        let last = adx[39].unwrap();
        assert!(last > 25.0, "ADX should be high in strong uptrend, got {:.2}", last);
    }

    #[test]
    fn test_adx_choppy_market() {
        // Simulating a choppy/ranging market
        let pattern = [
            (100.0, 102.0, 98.0, 100.0),
            (100.0, 103.0, 97.0, 99.0),
            (99.0, 102.0, 98.0, 101.0),
            (101.0, 103.0, 99.0, 100.0),
            (100.0, 102.0, 98.0, 99.0),
        ];
        let prices: Vec<_> = pattern.iter().cycle().take(40).copied().collect();

        let candles = create_test_candles(&prices);
        let adx = calculate_adx(&candles, 14);
        let last = adx[39].unwrap();

        assert!(
            last < 40.0,
            "ADX should be lower in choppy market, got {:.2}",
            last
        );
    }

    #[test]
    fn test_adx_first_defined_index() {
        let candles = create_test_candles(&uptrend(28));
        let adx = calculate_adx(&candles, 14);

        assert!(adx[26].is_none());
        assert!(adx[27].is_some());
    }

    #[test]
    fn test_adx_flat_prices_undefined() {
        let candles = create_test_candles(&vec![(100.0, 100.0, 100.0, 100.0); 40]);
        let adx = calculate_adx(&candles, 14);

        assert_eq!(adx.len(), 40);
        assert!(adx.iter().all(Option::is_none));
    }

    #[test]
    fn test_adx_insufficient_data() {
        let prices = vec![(100.0, 102.0, 99.0, 101.0), (101.0, 105.0, 100.0, 104.0)];

        let candles = create_test_candles(&prices);
        let adx = calculate_adx(&candles, 14);

        assert!(adx.iter().all(Option::is_none), "Should be undefined for insufficient data");
    }
}
