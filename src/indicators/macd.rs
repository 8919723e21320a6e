//! Moving Average Convergence Divergence (MACD)
//!
//! MACD line = EMA(fast) - EMA(slow)
//! Signal line = EMA(signal) of the MACD line, started where the MACD line is defined
//! Histogram = MACD line - signal line
//!
//! With the 12/26/9 defaults the MACD line is defined from index 25 and the
//! signal line and histogram from index 33.

use super::{calculate_ema, ema_of_defined, zip_defined};

#[derive(Debug, Clone, PartialEq)]
pub struct MacdSeries {
    pub macd: Vec<Option<f64>>,
    pub signal: Vec<Option<f64>>,
    pub histogram: Vec<Option<f64>>,
}

pub fn calculate_macd(prices: &[f64], fast: usize, slow: usize, signal: usize) -> MacdSeries {
    let ema_fast = calculate_ema(prices, fast);
    let ema_slow = calculate_ema(prices, slow);

    let macd = zip_defined(&ema_fast, &ema_slow, |f, s| f - s);
    let signal_line = ema_of_defined(&macd, signal);
    let histogram = zip_defined(&macd, &signal_line, |m, s| m - s);

    MacdSeries {
        macd,
        signal: signal_line,
        histogram,
    }
}
