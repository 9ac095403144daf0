//! Sampling bias correction.
//!
//! The correction factor is `aai_agg(reference) / mean(per_year)` and the
//! yearly values are divided by it, so each value is scaled by
//! `mean / eai`. The corrected mean is therefore `mean² / eai`, which equals
//! the reference expected annual impact only when the two already agree.
//! A zero yearly mean is not guarded: the factor and the corrected values
//! come out non-finite.

use tracing::{info, warn};
use ys_common::ImpactSeries;
use ys_math::{expected_annual, mean};

use crate::logging::event_names;

/// Ratio of the reference expected annual impact to the mean of the
/// generated yearly values.
pub fn correction_factor(per_year: &[f64], reference: &ImpactSeries) -> f64 {
    let yearly_mean = mean(per_year);
    let reference_eai = expected_annual(reference.frequency(), reference.at_event());
    let factor = reference_eai / yearly_mean;

    if factor.is_finite() {
        info!(
            event = event_names::CORRECTION_FACTOR,
            factor,
            percent = (factor - 1.0) * 100.0,
            "the correction factor amounts to {:.4}%",
            (factor - 1.0) * 100.0
        );
    } else {
        warn!(
            event = event_names::CORRECTION_FACTOR,
            factor,
            yearly_mean,
            reference_eai,
            "correction factor is not finite"
        );
    }
    factor
}

/// Divide every yearly value by `factor`.
pub fn apply_correction(per_year: &[f64], factor: f64) -> Vec<f64> {
    per_year.iter().map(|v| v / factor).collect()
}
