//! Yearset construction: one probabilistic impact value per target year.
//!
//! A build samples the number of events per year from a Poisson
//! distribution, draws which events occur from the catalogue without
//! replacement (weighted by frequency), sums their impacts per year, and
//! optionally divides the sums by the correction factor
//! `eai / mean(sums)`, which scales each one by `mean / eai`.
//!
//! The sampling plan returned by [`YearsetBuilder::build`] fully determines
//! the yearly values; [`YearsetBuilder::build_from_plan`] replays it without
//! any randomness, also against another catalogue of the same length.
//!
//! The stored yearly values are always the `values` array of the build:
//! corrected when `apply_correction` is set, the raw per-year sums
//! otherwise. Generated and replayed builds follow the same rule.

use rand::Rng;
use tracing::{debug, info, warn};
use ys_common::dates::first_of_year;
use ys_common::{Error, ImpactSeries, Result, SamplingPlan};
use ys_config::YearsetConfig;
use ys_math::{sample_counts, sample_events};

use crate::aggregate::aggregate_from_plan;
use crate::correction::{apply_correction, correction_factor};
use crate::logging::event_names;

/// Options for a yearset build.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct YearsetOptions {
    /// Poisson mean of events per year; `None` uses the catalogue's total
    /// frequency.
    pub lambda: Option<f64>,
    /// Divide yearly values by `eai / mean`, see [`crate::correction`].
    pub apply_correction: bool,
}

impl Default for YearsetOptions {
    fn default() -> Self {
        YearsetOptions {
            lambda: None,
            apply_correction: true,
        }
    }
}

impl From<&YearsetConfig> for YearsetOptions {
    fn from(config: &YearsetConfig) -> Self {
        YearsetOptions {
            lambda: config.lambda,
            apply_correction: config.apply_correction,
        }
    }
}

/// Builds yearly impact series from an event catalogue.
#[derive(Debug, Clone, Default)]
pub struct YearsetBuilder {
    options: YearsetOptions,
}

impl YearsetBuilder {
    pub fn new(options: YearsetOptions) -> Self {
        YearsetBuilder { options }
    }

    pub fn options(&self) -> &YearsetOptions {
        &self.options
    }

    /// Poisson mean used for `series`: the configured value, or the sum of
    /// the event frequencies when unset.
    pub fn resolve_lambda(&self, series: &ImpactSeries) -> f64 {
        self.options
            .lambda
            .unwrap_or_else(|| series.frequency().iter().sum())
    }

    /// Sample a fresh plan and build the yearset for `target_years`.
    ///
    /// Returns the yearly series and the plan that reproduces it.
    ///
    /// # Errors
    /// `Capacity` if a year asks for more events than the catalogue holds,
    /// `InvalidRate` / `InvalidWeights` for unusable lambda or frequencies.
    pub fn build<R: Rng + ?Sized>(
        &self,
        series: &ImpactSeries,
        target_years: &[i32],
        rng: &mut R,
    ) -> Result<(ImpactSeries, SamplingPlan)> {
        let lambda = self.resolve_lambda(series);
        if lambda == 1.0 {
            warn!(
                event = event_names::SAMPLE_COUNTS,
                lambda,
                "lambda of exactly 1 assigns one event to every year"
            );
        }
        let counts = sample_counts(target_years.len(), lambda, rng)?;
        debug!(
            event = event_names::SAMPLE_COUNTS,
            lambda,
            n_years = counts.len(),
            total = counts.iter().sum::<usize>(),
            "sampled events per year"
        );

        let plan = sample_events(&counts, series.frequency(), rng)?;
        debug!(
            event = event_names::SAMPLE_PLAN,
            fingerprint = %plan.fingerprint(),
            total_events = plan.total_events(),
            "sampled events for every year"
        );

        let yearly = self.assemble(series, target_years, &plan)?;
        info!(
            event = event_names::YEARSET_BUILT,
            n_years = target_years.len(),
            lambda,
            fingerprint = %plan.fingerprint(),
            "built yearset"
        );
        Ok((yearly, plan))
    }

    /// Build the yearset for `target_years` from a previously drawn plan.
    ///
    /// # Errors
    /// `ShapeMismatch` if `target_years` and `plan` differ in length,
    /// `IndexOutOfRange` if the plan addresses an event the series lacks.
    pub fn build_from_plan(
        &self,
        series: &ImpactSeries,
        target_years: &[i32],
        plan: &SamplingPlan,
    ) -> Result<ImpactSeries> {
        let yearly = self.assemble(series, target_years, plan)?;
        info!(
            event = event_names::YEARSET_REPLAYED,
            n_years = target_years.len(),
            fingerprint = %plan.fingerprint(),
            "replayed yearset from plan"
        );
        Ok(yearly)
    }

    fn assemble(
        &self,
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

        let per_year = aggregate_from_plan(series, plan)?;
        let values = if self.options.apply_correction {
            let factor = correction_factor(&per_year, series);
            apply_correction(&per_year, factor)
        } else {
            per_year
        };

        let n_years = target_years.len();
        let frequency = if n_years == 0 {
            0.0
        } else {
            plan.total_events() as f64 / n_years as f64
        };
        let dates = target_years
            .iter()
            .map(|&year| first_of_year(year))
            .collect::<Result<Vec<_>>>()?;

        Ok(ImpactSeries::new(
            (1..=n_years as u64).collect(),
            dates,
            vec![frequency; n_years],
            values,
        )?
        .with_tag(series.tag().as_yearset()))
    }
}
