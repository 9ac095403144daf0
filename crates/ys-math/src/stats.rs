//! Summary statistics over impact arrays.

/// Arithmetic mean. NaN for empty input.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Frequency-weighted annual impact: `sum(frequency[i] * impact[i])`.
///
/// Extra elements of the longer slice are ignored.
pub fn expected_annual(frequency: &[f64], impact: &[f64]) -> f64 {
    frequency.iter().zip(impact).map(|(f, v)| f * v).sum()
}
