/// Percent change of volume against the previous candle
///
/// Undefined at index 0 and wherever the previous volume is zero.
pub fn calculate_volume_change(volumes: &[f64]) -> Vec<Option<f64>> {
    let mut changes = vec![None; volumes.len()];

    for i in 1..volumes.len() {
        let previous = volumes[i - 1];
        if previous != 0.0 {
            changes[i] = Some((volumes[i] - previous) / previous * 100.0);
        }
    }

    changes
}
