//! Rule-based field extractors for receipts.

pub mod amounts;
pub mod dates;
pub mod labels;
pub mod patterns;
pub mod regions;

use std::fmt;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::annotation::RecognizedDocument;

pub use amounts::{derive_tax, parse_amount, AmountExtractor};
pub use dates::parse_mdy_date;
pub use labels::{fuzzy_label, LabelProbe};
pub use regions::{find_label_region, LabelRegion};

/// Labelled monetary fields located by a label probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Total,
    Subtotal,
}

impl Field {
    /// Canonical label text as printed on receipts.
    pub fn label(&self) -> &'static str {
        match self {
            Field::Total => "total",
            Field::Subtotal => "subtotal",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Trait for field extractors.
pub trait FieldExtractor {
    /// The type of value this extractor produces.
    type Output;

    /// Extract the field from text.
    fn extract(&self, text: &str) -> Option<Self::Output>;
}

/// A value extracted from text along with where it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractionMatch<T> {
    /// Extracted value.
    pub value: T,
    /// Source text that was matched.
    pub source: String,
}

impl<T> ExtractionMatch<T> {
    pub fn new(value: T, source: impl Into<String>) -> Self {
        Self {
            value,
            source: source.into(),
        }
    }
}

/// Find the text of the first paragraph matching `pattern`, scanning blocks
/// from the bottom of the document up.
pub fn find_paragraph(doc: &RecognizedDocument, pattern: &Regex, all_pages: bool) -> Option<String> {
    doc.paragraphs_bottom_up(all_pages)
        .map(|p| p.text())
        .find(|text| pattern.is_match(text))
}
