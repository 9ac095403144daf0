//! Event-level view of a sampling plan.
//!
//! Instead of one value per year, [`extract`] keeps every sampled event as
//! its own row, re-dated into the year it was drawn for.

use tracing::info;
use ys_common::dates::with_year;
use ys_common::{Error, ImpactSeries, Result, SamplingPlan};

use crate::logging::event_names;

/// Materialize the events of `plan` as a new series.
///
/// Events keep their own month and day but take the target year of the
/// entry they were sampled into. Every output event has frequency
/// `1 / total_events`, ids run `1..=total_events`, and the matrix holds the
/// selected source rows in plan order (an event sampled twice appears
/// twice).
///
/// # Errors
/// `ShapeMismatch` if `target_years` and `plan` differ in length,
/// `EmptyMatrix` if the source has no impact matrix,
/// `IndexOutOfRange` if the plan addresses an event the series lacks,
/// `InvalidDate` if a February 29 lands in a non-leap target year.
pub fn extract(
    series: &ImpactSeries,
    target_years: &[i32],
    plan: &SamplingPlan,
) -> Result<ImpactSeries> {
    if target_years.len() != plan.len() {
        return Err(Error::ShapeMismatch {
            years: target_years.len(),
            plan: plan.len(),
        });
    }
    if !series.has_matrix() {
        return Err(Error::EmptyMatrix);
    }
    plan.check_indices(series.len())?;

    let source_dates = series.date();
    let mut dates = Vec::with_capacity(plan.total_events());
    for (entry, &year) in plan.iter().zip(target_years) {
        for &idx in entry {
            dates.push(with_year(source_dates[idx], year)?);
        }
    }

    let n_events = dates.len();
    let imp_mat = series.imp_mat().select_rows(&plan.concat())?;
    let frequency = if n_events == 0 {
        0.0
    } else {
        1.0 / n_events as f64
    };

    info!(
        event = event_names::SAMPLE_EXTRACTED,
        n_years = target_years.len(),
        n_events,
        fingerprint = %plan.fingerprint(),
        "extracted sampled events"
    );

    Ok(ImpactSeries::from_matrix(
        (1..=n_events as u64).collect(),
        dates,
        vec![frequency; n_events],
        imp_mat,
    )?
    .with_tag(series.tag().clone()))
}
