//! Date conversion service.
//!
//! Event dates travel as [`NaiveDate`]; catalogues exchanged with other tools
//! use ISO strings (`YYYY-MM-DD`).

use chrono::{Datelike, NaiveDate};

use crate::error::{Error, Result};

const ISO_FORMAT: &str = "%Y-%m-%d";

/// Format a date as a 4-digit-year-prefixed ISO string.
pub fn date_to_str(date: NaiveDate) -> String {
    date.format(ISO_FORMAT).to_string()
}

/// Parse an ISO date string.
pub fn str_to_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), ISO_FORMAT)
        .map_err(|e| Error::InvalidDate(format!("{s:?}: {e}")))
}

/// January 1 of `year`.
pub fn first_of_year(year: i32) -> Result<NaiveDate> {
    NaiveDate::from_ymd_opt(year, 1, 1)
        .ok_or_else(|| Error::InvalidDate(format!("year {year} out of range")))
}

/// Replace the year of `date`, keeping month and day.
///
/// Fails for Feb 29 moved into a non-leap year.
pub fn with_year(date: NaiveDate, year: i32) -> Result<NaiveDate> {
    date.with_year(year).ok_or_else(|| {
        Error::InvalidDate(format!("{} does not exist in year {year}", date_to_str(date)))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn iso_round_trip_keeps_four_digit_year() {
        let date = str_to_date("2001-07-15").unwrap();
        assert_eq!(date_to_str(date), "2001-07-15");
        assert_eq!(&date_to_str(first_of_year(985).unwrap())[0..4], "0985");
    }

    #[test]
    fn invalid_string_is_rejected() {
        assert!(matches!(str_to_date("2001-13-01"), Err(Error::InvalidDate(_))));
        assert!(matches!(str_to_date("yesterday"), Err(Error::InvalidDate(_))));
    }

    #[test]
    fn with_year_preserves_month_and_day() {
        let date = str_to_date("1999-03-04").unwrap();
        assert_eq!(date_to_str(with_year(date, 2030).unwrap()), "2030-03-04");
    }

    #[test]
    fn leap_day_into_common_year_fails() {
        let date = str_to_date("2000-02-29").unwrap();
        assert!(with_year(date, 2001).is_err());
        assert!(with_year(date, 2004).is_ok());
    }
}
