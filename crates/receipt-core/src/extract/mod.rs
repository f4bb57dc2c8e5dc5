//! Receipt field extraction module.

mod parser;
pub mod rules;

pub use parser::{ExtractionResult, LabelRegions, ReceiptFieldExtractor};

use crate::annotation::RecognizedDocument;
use crate::models::receipt::ReceiptSummary;

/// Trait for receipt field extractors.
///
/// Extraction never fails: fields that cannot be found are left absent.
pub trait ReceiptExtractor {
    /// Extract receipt fields from a recognized document.
    fn extract(&self, doc: &RecognizedDocument) -> ReceiptSummary;

    /// Extract receipt fields from plain text, one block per line.
    fn extract_from_text(&self, text: &str) -> ReceiptSummary {
        self.extract(&RecognizedDocument::from_text(text))
    }
}
