//! JSON file input, year list parsing, and command output rendering.

use std::fs;
use std::io::Write;
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Serialize;
use ys_common::{Error, ImpactSeries, OutputFormat, Result, SamplingPlan};

/// Read and deserialize a JSON file.
pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

/// Read an event catalogue; the series invariants are checked on load.
pub fn read_series(path: &Path) -> Result<ImpactSeries> {
    read_json(path)
}

pub fn read_plan(path: &Path) -> Result<SamplingPlan> {
    read_json(path)
}

/// Write `value` as pretty JSON, replacing any existing file.
pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let mut file = fs::File::create(path)?;
    serde_json::to_writer_pretty(&mut file, value)?;
    file.write_all(b"\n")?;
    Ok(())
}

/// Most target years a single year list may expand to.
pub const MAX_TARGET_YEARS: usize = 1_000_000;

/// Parse a list of target years.
///
/// Accepts an inclusive range (`2000-2009`), a comma-separated list
/// (`2000,2004,2010`), or a mix of both (`1990,2000-2002`). Lists expanding
/// to more than [`MAX_TARGET_YEARS`] years are rejected.
pub fn parse_years(list: &str) -> Result<Vec<i32>> {
    let invalid = |part: &str| Error::Config(format!("invalid year list entry: {:?}", part));
    let too_many = || Error::Config(format!("year list exceeds {MAX_TARGET_YEARS} years"));
    let mut years = Vec::new();

    for part in list.split(',').map(str::trim).filter(|p| !p.is_empty()) {
        // A leading '-' is a sign, not a range separator.
        let separator = part
            .char_indices()
            .skip(1)
            .find(|&(_, c)| c == '-')
            .map(|(i, _)| i);
        match separator {
            Some(split) => {
                let start: i32 = part[..split].trim().parse().map_err(|_| invalid(part))?;
                let end: i32 = part[split + 1..].trim().parse().map_err(|_| invalid(part))?;
                if end < start {
                    return Err(invalid(part));
                }
                let span = (i64::from(end) - i64::from(start) + 1) as u64;
                if span > (MAX_TARGET_YEARS - years.len()) as u64 {
                    return Err(too_many());
                }
                years.extend(start..=end);
            }
            None => {
                if years.len() == MAX_TARGET_YEARS {
                    return Err(too_many());
                }
                years.push(part.parse().map_err(|_| invalid(part))?);
            }
        }
    }

    if years.is_empty() {
        return Err(Error::Config("year list is empty".to_string()));
    }
    Ok(years)
}

/// Render a command payload for stdout.
///
/// `summary` is used verbatim for [`OutputFormat::Summary`].
pub fn render<T: Serialize>(value: &T, format: OutputFormat, summary: &str) -> Result<String> {
    Ok(match format {
        OutputFormat::Json => serde_json::to_string(value)?,
        OutputFormat::Pretty => serde_json::to_string_pretty(value)?,
        OutputFormat::Summary => summary.to_string(),
    })
}
