//! Unix `ls -l` style directory listings

use crate::errors::{HydroError, Result};
use chrono::{Datelike, Month, NaiveDate, NaiveDateTime, NaiveTime};
use std::str::FromStr;

/// One regular file of a remote listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingEntry {
    pub name: String,
    pub size: u64,
    /// Modification time as shown by the server, without time zone
    pub modified: NaiveDateTime,
}

fn parse_error(line: &str, reason: impl Into<String>) -> HydroError {
    HydroError::ListingParse {
        line: line.to_string(),
        reason: reason.into(),
    }
}

impl ListingEntry {
    /// Parses one listing line.
    ///
    /// Returns `Ok(None)` for anything that is not a regular file
    /// (directories, links, `total` lines). Servers print `HH:MM` instead
    /// of the year for recent files; the year is then taken from `today`,
    /// or the year before if that date would lie after `today`.
    ///
    /// # Errors
    ///
    /// Returns [`HydroError::ListingParse`] for a regular-file line with
    /// missing or malformed fields.
    pub fn parse(line: &str, today: NaiveDate) -> Result<Option<Self>> {
        let fields: Vec<&str> = line.split_whitespace().collect();
        if !fields.first().is_some_and(|perm| perm.starts_with('-')) {
            return Ok(None);
        }
        if fields.len() < 9 {
            return Err(parse_error(line, format!("expected 9 fields, found {}", fields.len())));
        }

        let size = fields[4]
            .parse::<u64>()
            .map_err(|e| parse_error(line, format!("size '{}': {e}", fields[4])))?;
        let month = Month::from_str(fields[5])
            .map_err(|_| parse_error(line, format!("month '{}'", fields[5])))?
            .number_from_month();
        let day = fields[6]
            .parse::<u32>()
            .map_err(|e| parse_error(line, format!("day '{}': {e}", fields[6])))?;

        let (year, time, recent) = match fields[7].split_once(':') {
            Some((hh, mm)) => {
                let time = hh
                    .parse()
                    .ok()
                    .zip(mm.parse().ok())
                    .and_then(|(h, m)| NaiveTime::from_hms_opt(h, m, 0))
                    .ok_or_else(|| parse_error(line, format!("time '{}'", fields[7])))?;
                (today.year(), time, true)
            }
            None => {
                let year = fields[7]
                    .parse::<i32>()
                    .map_err(|e| parse_error(line, format!("year '{}': {e}", fields[7])))?;
                (year, NaiveTime::MIN, false)
            }
        };

        let invalid_date = || parse_error(line, format!("date {year}-{month}-{day}"));
        let mut date = NaiveDate::from_ymd_opt(year, month, day).ok_or_else(invalid_date)?;
        if recent && date > today {
            date = NaiveDate::from_ymd_opt(year - 1, month, day).ok_or_else(invalid_date)?;
        }

        Ok(Some(Self {
            name: fields[8..].join(" "),
            size,
            modified: date.and_time(time),
        }))
    }
}

/// Parses all regular-file lines of a listing, keeping listing order.
///
/// # Errors
///
/// Returns the first [`HydroError::ListingParse`] encountered.
pub fn parse_listing<S: AsRef<str>>(lines: &[S], today: NaiveDate) -> Result<Vec<ListingEntry>> {
    lines
        .iter()
        .filter_map(|line| ListingEntry::parse(line.as_ref(), today).transpose())
        .collect()
}
