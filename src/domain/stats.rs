//! Shared numeric helpers for score series.
//!
//! Series are ordered newest first, so "first n" means "most recent n".

/// Mean of the first `n` values, or of all values when fewer exist.
/// Returns `None` for an empty series or `n == 0`.
pub fn mean_of_first(values: &[f64], n: usize) -> Option<f64> {
    let window = &values[..values.len().min(n)];
    if window.is_empty() {
        return None;
    }
    Some(window.iter().sum::<f64>() / window.len() as f64)
}

/// Population standard deviation of the first `n` values.
///
/// STDDEV = sqrt(sum((x - mean)^2) / count). Fewer than two values have no
/// spread and return 0.
pub fn stddev_of_first(values: &[f64], n: usize) -> f64 {
    let window = &values[..values.len().min(n)];
    if window.len() < 2 {
        return 0.0;
    }
    let mean = window.iter().sum::<f64>() / window.len() as f64;
    let variance = window
        .iter()
        .map(|v| {
            let diff = v - mean;
            diff * diff
        })
        .sum::<f64>()
        / window.len() as f64;
    variance.sqrt()
}

pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Round-over-round changes of a series ordered oldest first.
pub fn deltas(series: &[i64]) -> Vec<i64> {
    series.windows(2).map(|w| w[1] - w[0]).collect()
}
