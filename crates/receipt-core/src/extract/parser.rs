//! Rule-based receipt parser over the OCR annotation tree.

use std::time::Instant;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::annotation::{RecognizedDocument, TextAnnotation};
use crate::error::ExtractionError;
use crate::models::config::ExtractionConfig;
use crate::models::receipt::ReceiptSummary;

use super::rules::{
    derive_tax, find_label_region, find_paragraph, parse_mdy_date,
    patterns::DATE_MDY,
    regions::DEFAULT_MAX_LABEL_LEN,
    AmountExtractor, Field, FieldExtractor, LabelProbe, LabelRegion,
};
use super::ReceiptExtractor;

/// Result of receipt extraction.
#[derive(Debug, Clone)]
pub struct ExtractionResult {
    /// Extracted fields.
    pub summary: ReceiptSummary,
    /// Fields that could not be extracted, and why.
    pub misses: Vec<ExtractionError>,
    /// Processing time in milliseconds.
    pub processing_time_ms: u64,
}

/// Label locations found over flat annotations.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LabelRegions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total: Option<LabelRegion>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subtotal: Option<LabelRegion>,
}

/// Receipt field extractor scanning blocks from the bottom of the receipt up.
#[derive(Debug, Clone)]
pub struct ReceiptFieldExtractor {
    /// Scan every page instead of only the first.
    scan_all_pages: bool,
    /// Decimal places the derived tax is rounded to.
    tax_decimal_places: u32,
    /// Exclusive length limit for flat label fragments.
    region_label_max_len: usize,
}

impl ReceiptFieldExtractor {
    /// Create a new extractor with default settings.
    pub fn new() -> Self {
        Self {
            scan_all_pages: true,
            tax_decimal_places: 2,
            region_label_max_len: DEFAULT_MAX_LABEL_LEN,
        }
    }

    /// Create an extractor from configuration.
    pub fn from_config(config: &ExtractionConfig) -> Self {
        Self::new()
            .with_all_pages(config.scan_all_pages)
            .with_tax_decimal_places(config.tax_decimal_places)
            .with_region_label_max_len(config.region_label_max_len)
    }

    /// Set whether pages after the first are scanned.
    pub fn with_all_pages(mut self, all_pages: bool) -> Self {
        self.scan_all_pages = all_pages;
        self
    }

    /// Set the rounding precision of the derived tax.
    pub fn with_tax_decimal_places(mut self, places: u32) -> Self {
        self.tax_decimal_places = places;
        self
    }

    /// Set the length limit for flat label fragments.
    pub fn with_region_label_max_len(mut self, max_len: usize) -> Self {
        self.region_label_max_len = max_len;
        self
    }

    /// Extract the amount printed on the bottom-most line labelled `field`.
    pub fn extract_amount(&self, doc: &RecognizedDocument, field: Field) -> Result<Decimal, ExtractionError> {
        let text = LabelProbe::for_field(field)
            .find(doc, self.scan_all_pages)
            .ok_or(ExtractionError::LabelNotFound(field))?;

        let found = AmountExtractor::new()
            .extract(&text)
            .ok_or_else(|| ExtractionError::AmountUnparsable { field, text: text.clone() })?;
        debug!("Read {} amount {} from {:?}", field, found.source, text);
        Ok(found.value)
    }

    /// Extract the date from the bottom-most line holding a date.
    pub fn extract_date(&self, doc: &RecognizedDocument) -> Result<NaiveDate, ExtractionError> {
        let text = find_paragraph(doc, &DATE_MDY, self.scan_all_pages)
            .ok_or(ExtractionError::DateNotFound)?;
        parse_mdy_date(&text)
    }

    /// Extract all fields, collecting the reason for every missing one.
    pub fn extract_with_report(&self, doc: &RecognizedDocument) -> ExtractionResult {
        let start = Instant::now();
        let mut misses = Vec::new();

        info!(
            "Extracting receipt fields from {} blocks",
            doc.blocks(self.scan_all_pages).len()
        );

        let total = keep_or_log(self.extract_amount(doc, Field::Total), &mut misses);
        let subtotal = keep_or_log(self.extract_amount(doc, Field::Subtotal), &mut misses);
        let date = keep_or_log(self.extract_date(doc), &mut misses);
        let tax = derive_tax(total, subtotal, self.tax_decimal_places);

        let summary = ReceiptSummary {
            total,
            subtotal,
            tax,
            date,
        };

        debug!(
            "Extracted receipt summary with {} of 4 fields",
            summary.field_count()
        );

        ExtractionResult {
            summary,
            misses,
            processing_time_ms: start.elapsed().as_millis() as u64,
        }
    }

    /// Locate bare total/subtotal labels over flat annotations.
    pub fn locate_labels(&self, annotations: &[TextAnnotation]) -> LabelRegions {
        LabelRegions {
            total: find_label_region(annotations, Field::Total, self.region_label_max_len),
            subtotal: find_label_region(annotations, Field::Subtotal, self.region_label_max_len),
        }
    }
}

fn keep_or_log<T>(result: Result<T, ExtractionError>, misses: &mut Vec<ExtractionError>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(miss) => {
            match &miss {
                ExtractionError::LabelNotFound(_) | ExtractionError::DateNotFound => info!("{}", miss),
                _ => warn!("{}", miss),
            }
            misses.push(miss);
            None
        }
    }
}

impl Default for ReceiptFieldExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl ReceiptExtractor for ReceiptFieldExtractor {
    fn extract(&self, doc: &RecognizedDocument) -> ReceiptSummary {
        self.extract_with_report(doc).summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotation::{Block, Page, Paragraph};
    use pretty_assertions::assert_eq;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn doc(blocks: &[&[&str]]) -> RecognizedDocument {
        RecognizedDocument {
            pages: vec![Page {
                blocks: blocks
                    .iter()
                    .map(|paras| Block::from_paragraphs(paras.iter().map(|p| Paragraph::from_text(p)).collect()))
                    .collect(),
                ..Page::default()
            }],
            text: String::new(),
        }
    }

    #[test]
    fn test_extract_full_receipt() {
        let doc = doc(&[
            &["CORNER MARKET", "03/14/2023 10:42"],
            &["MILK 2.49", "BREAD 3.10"],
            &["SUBTOTAL 5.59", "TAX 0.45"],
            &["TOTAL 6.04"],
            &["THANK YOU"],
        ]);

        let summary = ReceiptFieldExtractor::new().extract(&doc);

        assert_eq!(
            summary,
            ReceiptSummary {
                total: Some(dec("6.04")),
                subtotal: Some(dec("5.59")),
                tax: Some(dec("0.45")),
                date: NaiveDate::from_ymd_opt(2023, 3, 14),
            }
        );
    }

    #[test]
    fn test_total_from_bottom_block() {
        let summary = ReceiptFieldExtractor::new().extract(&doc(&[&["STORE"], &["Total 12.34"]]));
        assert_eq!(summary.total, Some(dec("12.34")));
    }

    #[test]
    fn test_later_total_wins() {
        let summary = ReceiptFieldExtractor::new().extract(&doc(&[&["Total 1.00"], &["Total 2.00"]]));
        assert_eq!(summary.total, Some(dec("2.00")));
    }

    #[test]
    fn test_subtotal_only() {
        let extractor = ReceiptFieldExtractor::new();
        let result = extractor.extract_with_report(&doc(&[&["SUBTOTAL 9.99"]]));

        assert_eq!(result.summary.subtotal, Some(dec("9.99")));
        assert_eq!(result.summary.total, None);
        assert_eq!(result.summary.tax, None);
        assert_eq!(
            result.misses,
            vec![
                ExtractionError::LabelNotFound(Field::Total),
                ExtractionError::DateNotFound,
            ]
        );
    }

    #[test]
    fn test_label_without_amount() {
        let extractor = ReceiptFieldExtractor::new();
        let doc = doc(&[&["TOTAL", "6.04"]]);

        assert_eq!(
            extractor.extract_amount(&doc, Field::Total),
            Err(ExtractionError::AmountUnparsable {
                field: Field::Total,
                text: "TOTAL".to_string(),
            })
        );
        assert_eq!(extractor.extract(&doc).total, None);
    }

    #[test]
    fn test_fuzzy_total() {
        let summary = ReceiptFieldExtractor::new().extract(&doc(&[&["TOTL 8.00"]]));
        assert_eq!(summary.total, Some(dec("8.00")));
    }

    #[test]
    fn test_dates() {
        let extractor = ReceiptFieldExtractor::new();

        assert_eq!(
            extractor.extract(&doc(&[&["Date: 03/14/2023"]])).date,
            NaiveDate::from_ymd_opt(2023, 3, 14)
        );
        assert_eq!(
            extractor.extract_date(&doc(&[&["Date: 13/99/2023"]])),
            Err(ExtractionError::DateUnparsable("13/99/2023".to_string()))
        );
        assert_eq!(extractor.extract(&doc(&[&["Date: 13/99/2023"]])).date, None);
    }

    #[test]
    fn test_invalid_bottom_date_is_not_replaced() {
        // The bottom-most date-shaped line decides, even if an earlier line is valid.
        let summary = ReceiptFieldExtractor::new().extract(&doc(&[&["01/02/2023"], &["99/99/2023"]]));
        assert_eq!(summary.date, None);
    }

    #[test]
    fn test_empty_document() {
        let extractor = ReceiptFieldExtractor::new();

        let result = extractor.extract_with_report(&RecognizedDocument::default());
        assert!(result.summary.is_empty());
        assert_eq!(result.misses.len(), 3);

        let no_blocks = RecognizedDocument {
            pages: vec![Page::default()],
            text: String::new(),
        };
        assert!(extractor.extract(&no_blocks).is_empty());
    }

    #[test]
    fn test_tax_skipped_for_zero_subtotal() {
        let summary = ReceiptFieldExtractor::new().extract(&doc(&[&["SUBTOTAL 0.00"], &["TOTAL 1.00"]]));
        assert_eq!(summary.subtotal, Some(Decimal::ZERO));
        assert_eq!(summary.tax, None);
    }

    #[test]
    fn test_extraction_is_idempotent() {
        let extractor = ReceiptFieldExtractor::new();
        let doc = doc(&[&["SUBTOTAL 5.00"], &["TOTAL 5.40", "1/9/2024"]]);

        assert_eq!(extractor.extract(&doc), extractor.extract(&doc));
    }

    #[test]
    fn test_first_page_only() {
        let mut doc = doc(&[&["SUBTOTAL 5.00"]]);
        doc.pages.push(Page {
            blocks: vec![Block::from_paragraphs(vec![Paragraph::from_text("TOTAL 5.40")])],
            ..Page::default()
        });

        assert_eq!(ReceiptFieldExtractor::new().extract(&doc).total, Some(dec("5.40")));
        assert_eq!(
            ReceiptFieldExtractor::new().with_all_pages(false).extract(&doc).total,
            None
        );
    }

    #[test]
    fn test_tax_precision_from_config() {
        let config = ExtractionConfig {
            tax_decimal_places: 1,
            ..ExtractionConfig::default()
        };
        let summary = ReceiptFieldExtractor::from_config(&config)
            .extract(&doc(&[&["SUBTOTAL 5.00"], &["TOTAL 5.46"]]));
        assert_eq!(summary.tax, Some(dec("0.5")));
    }

    #[test]
    fn test_extract_from_text() {
        let summary = ReceiptFieldExtractor::new().extract_from_text("Subtotal 10.00\nTotal 10.80\n");
        assert_eq!(summary.tax, Some(dec("0.80")));
    }

    #[test]
    fn test_locate_labels() {
        let annotations = vec![
            TextAnnotation {
                description: "TOTAL".to_string(),
                bounding_poly: Some(crate::annotation::BoundingPoly::rect(0, 90, 40, 100)),
            },
            TextAnnotation {
                description: "6.04".to_string(),
                bounding_poly: Some(crate::annotation::BoundingPoly::rect(80, 90, 120, 100)),
            },
        ];

        let regions = ReceiptFieldExtractor::new().locate_labels(&annotations);
        assert_eq!(regions.total.map(|r| r.text), Some("TOTAL".to_string()));
        assert!(regions.subtotal.is_none());
    }
}
