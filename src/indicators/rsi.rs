use super::wilder_smooth;

/// Calculate Relative Strength Index (RSI) for every index
///
/// RSI measures the magnitude of recent price changes to evaluate
/// overbought or oversold conditions. Average gain and loss use Wilder's
/// smoothing, so the first value needs `period` price changes and lands at
/// index `period`.
///
/// Values:
/// - RSI > 70: Overbought
/// - RSI < 30: Oversold
///
pub fn calculate_rsi(prices: &[f64], period: usize) -> Vec<Option<f64>> {
    let mut rsi = vec![None; prices.len()];
    if period == 0 || prices.len() < period + 1 {
        return rsi;
    }

    let mut gains = Vec::with_capacity(prices.len() - 1);
    let mut losses = Vec::with_capacity(prices.len() - 1);

    // Calculate price changes
    for i in 1..prices.len() {
        let change = prices[i] - prices[i - 1];
        if change > 0.0 {
            gains.push(Some(change));
            losses.push(Some(0.0));
        } else {
            gains.push(Some(0.0));
            losses.push(Some(change.abs()));
        }
    }

    let avg_gains = wilder_smooth(&gains, period);
    let avg_losses = wilder_smooth(&losses, period);

    // change j belongs to price j + 1
    for (j, (avg_gain, avg_loss)) in avg_gains.iter().zip(&avg_losses).enumerate() {
        if let (Some(avg_gain), Some(avg_loss)) = (avg_gain, avg_loss) {
            rsi[j + 1] = rsi_from_averages(*avg_gain, *avg_loss);
        }
    }

    rsi
}

/// Undefined when there was no movement at all
fn rsi_from_averages(avg_gain: f64, avg_loss: f64) -> Option<f64> {
    let total = avg_gain + avg_loss;
    if total == 0.0 {
        return None;
    }
    Some(100.0 * avg_gain / total)
}
