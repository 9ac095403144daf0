//! Event impact series.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::matrix::ImpactMatrix;

/// Provenance information attached to a series.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeriesTag {
    /// Free-form description of the source data.
    #[serde(default)]
    pub description: String,

    /// True when the series was derived as one entry per simulated year.
    #[serde(default)]
    pub yearset: bool,
}

impl SeriesTag {
    pub fn new(description: impl Into<String>) -> Self {
        SeriesTag {
            description: description.into(),
            yearset: false,
        }
    }

    /// Copy of this tag marked as a derived yearset.
    pub fn as_yearset(&self) -> Self {
        SeriesTag {
            description: self.description.clone(),
            yearset: true,
        }
    }
}

/// Ordered sequence of events with impact, frequency, date, and id.
///
/// All per-event arrays have the same length. The impact matrix is either
/// absent (0 rows, 0 stored entries) or has exactly one row per event, in
/// which case `at_event` equals its row sums.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawSeries")]
pub struct ImpactSeries {
    event_id: Vec<u64>,
    date: Vec<NaiveDate>,
    frequency: Vec<f64>,
    at_event: Vec<f64>,
    #[serde(default)]
    imp_mat: ImpactMatrix,
    #[serde(default)]
    tag: SeriesTag,
}

#[derive(Deserialize)]
struct RawSeries {
    event_id: Vec<u64>,
    date: Vec<NaiveDate>,
    frequency: Vec<f64>,
    #[serde(default)]
    at_event: Option<Vec<f64>>,
    #[serde(default)]
    imp_mat: ImpactMatrix,
    #[serde(default)]
    tag: SeriesTag,
}

impl TryFrom<RawSeries> for ImpactSeries {
    type Error = Error;

    fn try_from(raw: RawSeries) -> Result<Self> {
        let has_matrix = raw.imp_mat.n_rows() > 0;
        let at_event = match raw.at_event {
            Some(values) => values,
            None if has_matrix => raw.imp_mat.row_sums(),
            None => Vec::new(),
        };
        let mut series = ImpactSeries::new(raw.event_id, raw.date, raw.frequency, at_event)?;
        if has_matrix {
            series.set_imp_mat(raw.imp_mat)?;
        }
        series.tag = raw.tag;
        Ok(series)
    }
}

impl ImpactSeries {
    /// Build a series without an impact matrix.
    pub fn new(
        event_id: Vec<u64>,
        date: Vec<NaiveDate>,
        frequency: Vec<f64>,
        at_event: Vec<f64>,
    ) -> Result<Self> {
        let n = at_event.len();
        check_len("event_id", n, event_id.len())?;
        check_len("date", n, date.len())?;
        check_len("frequency", n, frequency.len())?;
        Ok(ImpactSeries {
            event_id,
            date,
            frequency,
            at_event,
            imp_mat: ImpactMatrix::default(),
            tag: SeriesTag::default(),
        })
    }

    /// Build a series whose per-event impacts are the row sums of `imp_mat`.
    pub fn from_matrix(
        event_id: Vec<u64>,
        date: Vec<NaiveDate>,
        frequency: Vec<f64>,
        imp_mat: ImpactMatrix,
    ) -> Result<Self> {
        let at_event = imp_mat.row_sums();
        let mut series = ImpactSeries::new(event_id, date, frequency, at_event)?;
        series.imp_mat = imp_mat;
        Ok(series)
    }

    pub fn with_tag(mut self, tag: SeriesTag) -> Self {
        self.tag = tag;
        self
    }

    /// Replace the impact matrix and recompute `at_event` from its rows.
    pub fn set_imp_mat(&mut self, imp_mat: ImpactMatrix) -> Result<()> {
        check_len("imp_mat rows", self.len(), imp_mat.n_rows())?;
        self.at_event = imp_mat.row_sums();
        self.imp_mat = imp_mat;
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.at_event.len()
    }

    pub fn is_empty(&self) -> bool {
        self.at_event.is_empty()
    }

    pub fn event_id(&self) -> &[u64] {
        &self.event_id
    }

    pub fn date(&self) -> &[NaiveDate] {
        &self.date
    }

    pub fn frequency(&self) -> &[f64] {
        &self.frequency
    }

    pub fn at_event(&self) -> &[f64] {
        &self.at_event
    }

    pub fn imp_mat(&self) -> &ImpactMatrix {
        &self.imp_mat
    }

    pub fn tag(&self) -> &SeriesTag {
        &self.tag
    }

    /// True when an impact matrix with stored entries is attached.
    pub fn has_matrix(&self) -> bool {
        self.imp_mat.nnz() > 0
    }

    /// Aggregated average annual impact: `sum(frequency * at_event)`.
    pub fn aai_agg(&self) -> f64 {
        self.frequency
            .iter()
            .zip(&self.at_event)
            .map(|(f, v)| f * v)
            .sum()
    }

    /// Expected annual impact at each exposure point.
    pub fn eai_exp(&self) -> Result<Vec<f64>> {
        if !self.has_matrix() {
            return Err(Error::EmptyMatrix);
        }
        self.imp_mat.weighted_column_sums(&self.frequency)
    }
}

/// Calendar year of every event date, in event order.
pub fn years_of(series: &ImpactSeries) -> Vec<i32> {
    series.date().iter().map(|d| d.year()).collect()
}

fn check_len(field: &'static str, expected: usize, actual: usize) -> Result<()> {
    if expected != actual {
        return Err(Error::LengthMismatch {
            field,
            expected,
            actual,
        });
    }
    Ok(())
}
