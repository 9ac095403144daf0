//! Frequency-weighted event selection without replacement.
//!
//! Events are drawn per year from a pool that starts with one copy of every
//! source event. Drawn events leave the pool, so an event is only reused in
//! a later year once the pool has been replenished with a fresh copy of the
//! whole catalogue. Within a year no event is drawn twice.
//!
//! Every copy of event `i` carries the same weight (its frequency), so the
//! pool is stored as a per-event copy count over the event index order:
//! removing the earliest remaining copy of `i` is decrementing its count,
//! and the first-occurrence weight of `i` is always `frequency[i]`.

use rand::seq::index::sample_weighted;
use rand::Rng;

use ys_common::{Error, Result, SamplingPlan};

/// Multiset of event indices available for drawing.
#[derive(Debug, Clone)]
pub struct EventPool {
    weights: Vec<f64>,
    copies: Vec<usize>,
    len: usize,
    distinct: usize,
    replenishments: usize,
}

impl EventPool {
    /// Pool holding one copy of every event, weighted by `frequencies`.
    ///
    /// # Errors
    /// `InvalidWeights` if any frequency is negative or not finite.
    pub fn new(frequencies: &[f64]) -> Result<Self> {
        if let Some((idx, f)) = frequencies
            .iter()
            .enumerate()
            .find(|(_, f)| !f.is_finite() || **f < 0.0)
        {
            return Err(Error::InvalidWeights(format!(
                "frequency of event {idx} is {f}"
            )));
        }
        let n = frequencies.len();
        Ok(EventPool {
            weights: frequencies.to_vec(),
            copies: vec![1; n],
            len: n,
            distinct: n,
            replenishments: 0,
        })
    }

    /// Number of source events.
    pub fn n_events(&self) -> usize {
        self.weights.len()
    }

    /// Total copies currently in the pool.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of distinct events currently in the pool.
    pub fn distinct(&self) -> usize {
        self.distinct
    }

    /// Remaining copies of event `index`.
    pub fn copies(&self, index: usize) -> usize {
        self.copies.get(index).copied().unwrap_or(0)
    }

    /// How many times a full copy of the catalogue was appended.
    pub fn replenishments(&self) -> usize {
        self.replenishments
    }

    /// Append one fresh copy of every source event.
    pub fn replenish(&mut self) {
        for c in self.copies.iter_mut() {
            if *c == 0 {
                self.distinct += 1;
            }
            *c += 1;
        }
        self.len += self.weights.len();
        self.replenishments += 1;
    }

    /// Draw `count` distinct events for one year and take them out of the
    /// pool. The returned indices are sorted.
    ///
    /// # Errors
    /// - `Capacity` if `count` exceeds the number of source events; the pool
    ///   is left untouched.
    /// - `InvalidWeights` if fewer than `count` events in the pool have a
    ///   nonzero frequency.
    pub fn draw<R: Rng + ?Sized>(&mut self, count: usize, rng: &mut R) -> Result<Vec<usize>> {
        if count > self.n_events() {
            return Err(Error::Capacity {
                requested: count,
                available: self.n_events(),
            });
        }

        if self.distinct < count || self.is_empty() {
            self.replenish();
        }
        if count == 0 {
            return Ok(Vec::new());
        }

        let candidates: Vec<usize> = (0..self.n_events())
            .filter(|&i| self.copies[i] > 0 && self.weights[i] > 0.0)
            .collect();
        if candidates.len() < count {
            return Err(Error::InvalidWeights(format!(
                "only {} events with nonzero frequency left in the pool, {count} requested",
                candidates.len()
            )));
        }
        let picked = sample_weighted(rng, candidates.len(), |i| self.weights[candidates[i]], count)
            .map_err(|e| Error::InvalidWeights(e.to_string()))?;

        let mut selected: Vec<usize> = picked.into_vec().into_iter().map(|i| candidates[i]).collect();
        selected.sort_unstable();
        for &idx in &selected {
            self.remove_one(idx);
        }
        Ok(selected)
    }

    fn remove_one(&mut self, index: usize) {
        self.copies[index] -= 1;
        self.len -= 1;
        if self.copies[index] == 0 {
            self.distinct -= 1;
        }
    }
}

/// Draw a sampling plan: for each year, `counts_per_year[y]` distinct
/// events weighted by `frequencies`.
///
/// # Errors
/// `Capacity` as soon as a year asks for more events than the catalogue
/// holds; `InvalidWeights` for unusable frequencies.
pub fn sample_events<R: Rng + ?Sized>(
    counts_per_year: &[usize],
    frequencies: &[f64],
    rng: &mut R,
) -> Result<SamplingPlan> {
    let mut pool = EventPool::new(frequencies)?;
    let mut years = Vec::with_capacity(counts_per_year.len());
    for &count in counts_per_year {
        years.push(pool.draw(count, rng)?);
    }
    Ok(SamplingPlan::new(years))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn capacity_error_leaves_pool_untouched() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut pool = EventPool::new(&[1.0, 1.0, 1.0]).unwrap();
        pool.draw(2, &mut rng).unwrap();
        let before = (pool.len(), pool.distinct(), pool.replenishments());

        let err = pool.draw(4, &mut rng).unwrap_err();
        assert!(matches!(
            err,
            Error::Capacity {
                requested: 4,
                available: 3
            }
        ));
        assert_eq!((pool.len(), pool.distinct(), pool.replenishments()), before);
    }

    #[test]
    fn full_draw_takes_every_event() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut pool = EventPool::new(&[0.2, 0.3, 0.5]).unwrap();
        assert_eq!(pool.draw(3, &mut rng).unwrap(), vec![0, 1, 2]);
        assert!(pool.is_empty());
        assert_eq!(pool.distinct(), 0);
    }

    #[test]
    fn replenish_when_too_few_distinct() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut pool = EventPool::new(&[1.0, 1.0, 1.0]).unwrap();
        let first = pool.draw(2, &mut rng).unwrap();
        assert_eq!(pool.distinct(), 1);
        assert_eq!(pool.replenishments(), 0);

        let second = pool.draw(2, &mut rng).unwrap();
        assert_eq!(pool.replenishments(), 1);
        assert_eq!(first.len(), 2);
        assert_eq!(second.len(), 2);
        // 3 initial + 3 appended - 4 drawn
        assert_eq!(pool.len(), 2);
    }

    #[test]
    fn empty_pool_replenished_even_for_zero_count() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut pool = EventPool::new(&[1.0, 2.0]).unwrap();
        pool.draw(2, &mut rng).unwrap();
        assert!(pool.is_empty());
        assert!(pool.draw(0, &mut rng).unwrap().is_empty());
        assert_eq!(pool.len(), 2);
        assert_eq!(pool.replenishments(), 1);
    }

    #[test]
    fn single_draws_exhaust_before_reuse() {
        let mut rng = StdRng::seed_from_u64(9);
        let plan = sample_events(&[1, 1, 1], &[1.0, 1.0, 1.0], &mut rng).unwrap();
        let mut all = plan.concat();
        all.sort_unstable();
        assert_eq!(all, vec![0, 1, 2]);
    }

    #[test]
    fn zero_weight_events_are_never_drawn() {
        let mut rng = StdRng::seed_from_u64(13);
        let plan = sample_events(&[1, 1], &[0.0, 1.0, 0.0, 1.0], &mut rng).unwrap();
        let mut all = plan.concat();
        all.sort_unstable();
        assert_eq!(all, vec![1, 3]);
    }

    #[test]
    fn zero_weight_leftovers_block_the_pool() {
        let mut rng = StdRng::seed_from_u64(13);
        let err = sample_events(&[1, 1, 1], &[0.0, 1.0, 0.0, 1.0], &mut rng).unwrap_err();
        assert!(matches!(err, Error::InvalidWeights(_)));
    }

    #[test]
    fn too_few_nonzero_weights_fails() {
        let mut rng = StdRng::seed_from_u64(13);
        let err = sample_events(&[2], &[0.0, 1.0, 0.0], &mut rng).unwrap_err();
        assert!(matches!(err, Error::InvalidWeights(_)));
    }

    #[test]
    fn negative_frequency_rejected() {
        assert!(matches!(
            EventPool::new(&[1.0, -0.1]),
            Err(Error::InvalidWeights(_))
        ));
    }

    #[test]
    fn pool_cycles_through_catalogue() {
        let mut rng = StdRng::seed_from_u64(21);
        let plan = sample_events(&[1; 4000], &[9.0, 1.0], &mut rng).unwrap();
        let heavy = plan.concat().iter().filter(|&&i| i == 0).count();
        assert_eq!(heavy, 2000);
    }

    #[test]
    fn fresh_pool_draw_follows_frequencies() {
        let heavy = (0..4000u64)
            .filter(|&seed| {
                let mut rng = StdRng::seed_from_u64(seed);
                let mut pool = EventPool::new(&[9.0, 1.0]).unwrap();
                pool.draw(1, &mut rng).unwrap() == vec![0]
            })
            .count();
        let share = heavy as f64 / 4000.0;
        assert!((share - 0.9).abs() < 0.03, "share = {share}");
    }
}
