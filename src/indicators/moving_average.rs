/// Simple Moving Average (SMA) over every index
///
/// Defined from index `period - 1` onward.
pub fn calculate_sma(prices: &[f64], period: usize) -> Vec<Option<f64>> {
    let values: Vec<Option<f64>> = prices.iter().copied().map(Some).collect();
    rolling_mean(&values, period)
}

/// Rolling mean that is undefined whenever the window contains a gap
pub fn rolling_mean(values: &[Option<f64>], period: usize) -> Vec<Option<f64>> {
    let mut means = vec![None; values.len()];
    if period == 0 || values.len() < period {
        return means;
    }

    for i in (period - 1)..values.len() {
        let window = &values[i + 1 - period..=i];
        means[i] = window
            .iter()
            .copied()
            .sum::<Option<f64>>()
            .map(|sum| sum / period as f64);
    }

    means
}

/// Exponential Moving Average (EMA) over every index
///
/// Seeded with the SMA of the first `period` prices, so the first value
/// lands at index `period - 1`.
pub fn calculate_ema(prices: &[f64], period: usize) -> Vec<Option<f64>> {
    let values: Vec<Option<f64>> = prices.iter().copied().map(Some).collect();
    ema_of_defined(&values, period)
}

/// EMA that starts at the first defined value of a sparse series
///
/// Used for the MACD signal line, which is an EMA of the MACD line from the
/// point the MACD line becomes defined.
pub fn ema_of_defined(values: &[Option<f64>], period: usize) -> Vec<Option<f64>> {
    let mut ema_values = vec![None; values.len()];
    if period == 0 {
        return ema_values;
    }

    let start = match values.iter().position(Option::is_some) {
        Some(start) => start,
        None => return ema_values,
    };
    let seed_end = start + period;
    if seed_end > values.len() {
        return ema_values;
    }

    // Start with SMA
    let initial_sma = match values[start..seed_end].iter().copied().sum::<Option<f64>>() {
        Some(sum) => sum / period as f64,
        None => return ema_values,
    };

    let multiplier = 2.0 / (period as f64 + 1.0);

    let mut ema = initial_sma;
    ema_values[seed_end - 1] = Some(ema);
    for i in seed_end..values.len() {
        if let Some(price) = values[i] {
            ema = (price - ema) * multiplier + ema;
            ema_values[i] = Some(ema);
        }
    }

    ema_values
}
