//! Reduce event-level impacts to one value per year.
//!
//! Two independent modes:
//! - from a sampling plan: each year is the sum of its sampled events
//! - by calendar year: rows of the impact matrix are summed per event year,
//!   no sampling involved

use std::collections::BTreeMap;

use tracing::debug;
use ys_common::dates::first_of_year;
use ys_common::{years_of, Error, ImpactSeries, Result, SamplingPlan};

use crate::logging::event_names;

/// Sum of `at_event` over each plan entry, one value per entry.
///
/// # Errors
/// `IndexOutOfRange` if the plan addresses an event the series lacks.
pub fn aggregate_from_plan(series: &ImpactSeries, plan: &SamplingPlan) -> Result<Vec<f64>> {
    plan.check_indices(series.len())?;
    let at_event = series.at_event();
    Ok(plan
        .iter()
        .map(|entry| entry.iter().map(|&idx| at_event[idx]).sum())
        .collect())
}

/// Collapse a multi-year event catalogue into one event per calendar year.
///
/// Rows of the impact matrix are summed per event year. The output has one
/// row per distinct year in ascending order, dated January 1, with
/// frequency 1 and ids `1..=N`.
///
/// # Errors
/// `EmptyMatrix` if the impact matrix has no stored entries.
pub fn aggregate_by_calendar_year(series: &ImpactSeries) -> Result<ImpactSeries> {
    if series.imp_mat().nnz() == 0 {
        return Err(Error::EmptyMatrix);
    }

    let mut rows_by_year: BTreeMap<i32, Vec<usize>> = BTreeMap::new();
    for (row, year) in years_of(series).into_iter().enumerate() {
        rows_by_year.entry(year).or_default().push(row);
    }

    let groups: Vec<Vec<usize>> = rows_by_year.values().cloned().collect();
    let imp_mat = series.imp_mat().sum_row_groups(&groups)?;
    let dates = rows_by_year
        .keys()
        .map(|&year| first_of_year(year))
        .collect::<Result<Vec<_>>>()?;
    let n_years = groups.len();

    debug!(
        event = event_names::AGGREGATE_FINISHED,
        n_events = series.len(),
        n_years,
        "aggregated events by calendar year"
    );

    Ok(ImpactSeries::from_matrix(
        (1..=n_years as u64).collect(),
        dates,
        vec![1.0; n_years],
        imp_mat,
    )?
    .with_tag(series.tag().as_yearset()))
}
