/// On-Balance Volume (OBV)
///
/// Cumulative: starts at the first candle's volume, then adds volume on an up
/// close and subtracts it on a down close. Unchanged closes add nothing.
/// Defined at every index.
pub fn calculate_obv(closes: &[f64], volumes: &[f64]) -> Vec<Option<f64>> {
    let mut obv = Vec::with_capacity(closes.len());
    let mut running = 0.0;

    for (i, (&close, &volume)) in closes.iter().zip(volumes).enumerate() {
        if i == 0 {
            running = volume;
        } else if close > closes[i - 1] {
            running += volume;
        } else if close < closes[i - 1] {
            running -= volume;
        }
        obv.push(Some(running));
    }

    obv
}
