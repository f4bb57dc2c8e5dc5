//! Date extraction for receipts.

use chrono::NaiveDate;

use super::patterns::DATE_MDY;
use crate::error::ExtractionError;

/// Parse the first `M/D/YYYY`-shaped substring of `text` as a calendar date.
///
/// Month and day are validated against the calendar, so `13/01/2023` or
/// `02/30/2023` are rejected rather than rolled over.
pub fn parse_mdy_date(text: &str) -> Result<NaiveDate, ExtractionError> {
    let caps = DATE_MDY.captures(text).ok_or(ExtractionError::DateNotFound)?;
    let unparsable = || ExtractionError::DateUnparsable(caps[0].to_string());

    let month: u32 = caps[1].parse().map_err(|_| unparsable())?;
    let day: u32 = caps[2].parse().map_err(|_| unparsable())?;
    let year: i32 = caps[3].parse().map_err(|_| unparsable())?;

    NaiveDate::from_ymd_opt(year, month, day).ok_or_else(unparsable)
}
