// Technical indicators module
// Every indicator returns one value per input index; `None` until its lookback is filled

pub mod adx;
pub mod atr;
pub mod bollinger;
pub mod engine;
pub mod macd;
pub mod moving_average;
pub mod obv;
pub mod rsi;
pub mod stochastic;
pub mod volume;
pub mod williams_r;

pub use adx::calculate_adx;
pub use atr::{calculate_atr, true_ranges};
pub use bollinger::{calculate_bollinger_bands, BollingerBands};
pub use engine::{compute_indicators, IndicatorColumn, IndicatorColumns, IndicatorParams};
pub use macd::{calculate_macd, MacdSeries};
pub use moving_average::{calculate_ema, calculate_sma, ema_of_defined, rolling_mean};
pub use obv::calculate_obv;
pub use rsi::calculate_rsi;
pub use stochastic::{calculate_stochastic, StochasticSeries};
pub use volume::calculate_volume_change;
pub use williams_r::calculate_williams_r;

/// Wilder's smoothing (RMA) over a sparse series
///
/// The seed is the simple average of the first `period` values starting at the
/// first defined index; after that `avg = (avg * (period - 1) + value) / period`.
/// A gap inside the seed window leaves the whole output undefined. Gaps after
/// the seed produce `None` at that index and do not advance the average.
pub(crate) fn wilder_smooth(values: &[Option<f64>], period: usize) -> Vec<Option<f64>> {
    let mut smoothed = vec![None; values.len()];
    if period == 0 {
        return smoothed;
    }

    let start = match values.iter().position(Option::is_some) {
        Some(start) => start,
        None => return smoothed,
    };
    let seed_end = start + period;
    if seed_end > values.len() {
        return smoothed;
    }

    let seed = match values[start..seed_end].iter().copied().sum::<Option<f64>>() {
        Some(sum) => sum / period as f64,
        None => return smoothed,
    };

    let mut avg = seed;
    smoothed[seed_end - 1] = Some(avg);

    for i in seed_end..values.len() {
        if let Some(value) = values[i] {
            avg = (avg * (period as f64 - 1.0) + value) / period as f64;
            smoothed[i] = Some(avg);
        }
    }

    smoothed
}

/// Combine two aligned series where both sides are defined
pub(crate) fn zip_defined<F>(a: &[Option<f64>], b: &[Option<f64>], f: F) -> Vec<Option<f64>>
where
    F: Fn(f64, f64) -> f64,
{
    a.iter()
        .zip(b)
        .map(|(x, y)| match (x, y) {
            (Some(x), Some(y)) => Some(f(*x, *y)),
            _ => None,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wilder_smooth_seed_and_recursion() {
        let values: Vec<Option<f64>> = vec![Some(1.0), Some(2.0), Some(3.0), Some(6.0)];
        let smoothed = wilder_smooth(&values, 3);

        assert_eq!(smoothed[0], None);
        assert_eq!(smoothed[1], None);
        assert_eq!(smoothed[2], Some(2.0));
        // (2 * 2 + 6) / 3
        assert!((smoothed[3].unwrap() - 10.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_wilder_smooth_skips_leading_gap() {
        let values = vec![None, None, Some(4.0), Some(4.0), Some(4.0)];
        let smoothed = wilder_smooth(&values, 2);

        assert_eq!(smoothed, vec![None, None, None, Some(4.0), Some(4.0)]);
    }

    #[test]
    fn test_wilder_smooth_gap_in_seed_is_undefined() {
        let values = vec![Some(1.0), None, Some(3.0), Some(4.0)];
        let smoothed = wilder_smooth(&values, 3);

        assert!(smoothed.iter().all(Option::is_none));
    }

    #[test]
    fn test_zip_defined() {
        let a = vec![None, Some(5.0), Some(3.0)];
        let b = vec![Some(1.0), Some(2.0), None];

        assert_eq!(zip_defined(&a, &b, |x, y| x - y), vec![None, Some(3.0), None]);
    }
}
