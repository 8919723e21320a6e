//! Bollinger Bands
//!
//! Middle band = SMA(period), upper/lower = middle ± multiplier * population
//! standard deviation over the same window. All three bands share the SMA's
//! warmup of `period - 1` candles.

use super::calculate_sma;

#[derive(Debug, Clone, PartialEq)]
pub struct BollingerBands {
    pub upper: Vec<Option<f64>>,
    pub middle: Vec<Option<f64>>,
    pub lower: Vec<Option<f64>>,
}

pub fn calculate_bollinger_bands(prices: &[f64], period: usize, std_dev: f64) -> BollingerBands {
    let middle = calculate_sma(prices, period);
    let mut upper = vec![None; prices.len()];
    let mut lower = vec![None; prices.len()];

    for (i, mean) in middle.iter().enumerate() {
        let Some(mean) = *mean else {
            continue;
        };

        let window = &prices[i + 1 - period..=i];
        let variance = window
            .iter()
            .map(|price| {
                let diff = price - mean;
                diff * diff
            })
            .sum::<f64>()
            / period as f64;
        let band = std_dev * variance.sqrt();

        upper[i] = Some(mean + band);
        lower[i] = Some(mean - band);
    }

    BollingerBands {
        upper,
        middle,
        lower,
    }
}
