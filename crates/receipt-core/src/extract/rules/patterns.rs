//! Common regex patterns for receipt extraction.

use lazy_static::lazy_static;
use regex::Regex;

use super::labels::fuzzy_label;

lazy_static! {
    // "total" with one letter possibly dropped, at the start of the paragraph
    // once leading non-letters are skipped
    pub static ref TOTAL_LABEL: Regex = Regex::new(
        &format!(r"(?i)\A[^a-zA-Z]*{}", fuzzy_label("total"))
    ).unwrap();

    // "subtotal" with one letter possibly dropped, anywhere
    pub static ref SUBTOTAL_LABEL: Regex = Regex::new(
        &format!(r"(?i){}", fuzzy_label("subtotal"))
    ).unwrap();

    // Exact labels for the flat-annotation region probe
    pub static ref TOTAL_BARE: Regex = Regex::new(r"(?i)\btotal\b").unwrap();

    pub static ref SUBTOTAL_BARE: Regex = Regex::new(r"(?i)\bsubtotal\b").unwrap();

    // Two digit runs around any single separator (OCR often misreads the point)
    pub static ref AMOUNT_PATTERN: Regex = Regex::new(r"([0-9]+)\W([0-9]+)").unwrap();

    // M/D/YYYY through MM/DD/YYYY
    pub static ref DATE_MDY: Regex = Regex::new(r"([0-9]?[0-9])/([0-9]?[0-9])/([0-9]{4})").unwrap();
}
