//! Sampling plans: the per-year event selections behind a yearset.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::{Error, Result};

/// Ordered list of per-year event-index sets.
///
/// Entry `y` holds the row indices of the source events that occur in the
/// `y`-th simulated year. A plan carries no reference to the series it was
/// drawn from and can be replayed against any series with the same event
/// count and order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SamplingPlan {
    years: Vec<Vec<usize>>,
}

impl SamplingPlan {
    pub fn new(years: Vec<Vec<usize>>) -> Self {
        SamplingPlan { years }
    }

    /// Number of simulated years.
    pub fn len(&self) -> usize {
        self.years.len()
    }

    pub fn is_empty(&self) -> bool {
        self.years.is_empty()
    }

    pub fn entries(&self) -> &[Vec<usize>] {
        &self.years
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Vec<usize>> {
        self.years.iter()
    }

    /// Total number of sampled events over all years.
    pub fn total_events(&self) -> usize {
        self.years.iter().map(Vec::len).sum()
    }

    /// All entries concatenated in plan order.
    pub fn concat(&self) -> Vec<usize> {
        self.years.iter().flatten().copied().collect()
    }

    /// Verify every index addresses one of `n_events` source events.
    pub fn check_indices(&self, n_events: usize) -> Result<()> {
        match self.years.iter().flatten().find(|&&idx| idx >= n_events) {
            Some(&index) => Err(Error::IndexOutOfRange { index, n_events }),
            None => Ok(()),
        }
    }

    /// SHA-256 (hex) of the plan's canonical JSON form.
    ///
    /// Entries are hashed in drawn order, so two plans with the same sets
    /// but differently ordered entries get different fingerprints.
    pub fn fingerprint(&self) -> String {
        let canonical = serde_json::to_vec(&self.years).unwrap_or_default();
        let mut hasher = Sha256::new();
        hasher.update(&canonical);
        hex::encode(hasher.finalize())
    }
}

impl From<Vec<Vec<usize>>> for SamplingPlan {
    fn from(years: Vec<Vec<usize>>) -> Self {
        SamplingPlan::new(years)
    }
}

impl<'a> IntoIterator for &'a SamplingPlan {
    type Item = &'a Vec<usize>;
    type IntoIter = std::slice::Iter<'a, Vec<usize>>;

    fn into_iter(self) -> Self::IntoIter {
        self.years.iter()
    }
}
