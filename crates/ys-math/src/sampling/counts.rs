//! Number of events per simulated year.
//!
//! Counts are drawn independently per year from `Poisson(lambda)`.
//!
//! A mean of exactly 1 is special-cased: every year gets exactly one event
//! and no randomness is consumed. This is not Poisson(1) (which would give
//! zero events in ~37% of years).

use rand::Rng;
use rand_distr::{Distribution, Poisson};

use ys_common::{Error, Result};

/// Draw the number of events for each of `n_years` years.
///
/// # Errors
/// `InvalidRate` if `lambda` is negative, NaN, infinite, or too large for
/// the Poisson sampler.
pub fn sample_counts<R: Rng + ?Sized>(n_years: usize, lambda: f64, rng: &mut R) -> Result<Vec<usize>> {
    if lambda == 1.0 {
        return Ok(vec![1; n_years]);
    }
    if !lambda.is_finite() || lambda < 0.0 {
        return Err(Error::InvalidRate(lambda));
    }
    if lambda == 0.0 {
        return Ok(vec![0; n_years]);
    }

    let poisson = Poisson::new(lambda).map_err(|_| Error::InvalidRate(lambda))?;
    Ok((0..n_years)
        .map(|_| {
            let draw: f64 = poisson.sample(rng);
            draw.round() as usize
        })
        .collect())
}
