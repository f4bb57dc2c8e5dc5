//! Receipt data models.

use std::fmt::Write;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Fields extracted from one receipt image.
///
/// Every field is independently optional; `None` means the field could not
/// be read, never a fabricated placeholder.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReceiptSummary {
    /// Grand total.
    pub total: Option<Decimal>,

    /// Amount before tax.
    pub subtotal: Option<Decimal>,

    /// Derived as `total - subtotal`.
    pub tax: Option<Decimal>,

    /// Transaction date.
    pub date: Option<NaiveDate>,
}

impl ReceiptSummary {
    /// Check if no field was extracted.
    pub fn is_empty(&self) -> bool {
        self.field_count() == 0
    }

    /// Number of fields that were extracted.
    pub fn field_count(&self) -> usize {
        [
            self.total.is_some(),
            self.subtotal.is_some(),
            self.tax.is_some(),
            self.date.is_some(),
        ]
        .iter()
        .filter(|present| **present)
        .count()
    }
}

/// A stored receipt record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Receipt {
    /// Database identifier (0 until stored).
    pub id: i64,

    /// Public URL of the uploaded image.
    pub url: String,

    /// Owner of the receipt.
    pub user_id: String,

    /// Business the purchase was made at.
    #[serde(default)]
    pub business: String,

    /// Transaction date.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,

    /// Date formatted for display, empty when the date is unknown.
    #[serde(default)]
    pub display_date: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub subtotal: Option<Decimal>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub tax: Option<Decimal>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub total: Option<Decimal>,
}

/// A user edit of a stored receipt. Only supplied fields change.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReceiptEdit {
    pub business: Option<String>,
    pub date: Option<NaiveDate>,
    pub subtotal: Option<Decimal>,
    pub tax: Option<Decimal>,
    pub total: Option<Decimal>,
}

impl Receipt {
    /// Create an unsaved receipt for an uploaded image.
    pub fn new(url: impl Into<String>, user_id: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            user_id: user_id.into(),
            ..Self::default()
        }
    }

    /// Create an unsaved receipt from extracted fields.
    pub fn from_summary(
        url: impl Into<String>,
        user_id: impl Into<String>,
        summary: &ReceiptSummary,
        date_format: &str,
    ) -> Self {
        let mut receipt = Self::new(url, user_id);
        receipt.apply_summary(summary, date_format);
        receipt
    }

    /// Set the date and its display form together.
    pub fn set_date(&mut self, date: Option<NaiveDate>, date_format: &str) {
        self.date = date;
        self.display_date = date.map(|d| format_date(d, date_format)).unwrap_or_default();
    }

    /// Merge extracted fields; absent fields keep their current values.
    pub fn apply_summary(&mut self, summary: &ReceiptSummary, date_format: &str) {
        if summary.total.is_some() {
            self.total = summary.total;
        }
        if summary.subtotal.is_some() {
            self.subtotal = summary.subtotal;
        }
        if summary.tax.is_some() {
            self.tax = summary.tax;
        }
        if summary.date.is_some() {
            self.set_date(summary.date, date_format);
        }
    }

    /// Apply a user edit.
    pub fn apply_edit(&mut self, edit: ReceiptEdit, date_format: &str) {
        if let Some(business) = edit.business {
            self.business = business;
        }
        if edit.date.is_some() {
            self.set_date(edit.date, date_format);
        }
        if edit.subtotal.is_some() {
            self.subtotal = edit.subtotal;
        }
        if edit.tax.is_some() {
            self.tax = edit.tax;
        }
        if edit.total.is_some() {
            self.total = edit.total;
        }
    }
}

/// Format a date, falling back to ISO 8601 for an invalid format string.
fn format_date(date: NaiveDate, date_format: &str) -> String {
    let mut out = String::new();
    match write!(out, "{}", date.format(date_format)) {
        Ok(()) => out,
        Err(_) => date.to_string(),
    }
}
