//! Fuzzy label probes for locating labelled receipt lines.

use regex::Regex;
use tracing::debug;

use super::patterns::{SUBTOTAL_LABEL, TOTAL_LABEL};
use super::Field;
use crate::annotation::RecognizedDocument;

/// Build a regex alternation matching `label` or any spelling of it with
/// exactly one character dropped.
///
/// The alternation grows linearly with the label, unlike a pattern with
/// every character marked optional.
pub fn fuzzy_label(label: &str) -> String {
    let chars: Vec<char> = label.chars().collect();
    let mut variants = vec![label.to_string()];

    for skip in 0..chars.len() {
        let variant: String = chars
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != skip)
            .map(|(_, c)| *c)
            .collect();
        if !variant.is_empty() && !variants.contains(&variant) {
            variants.push(variant);
        }
    }

    let escaped: Vec<String> = variants.iter().map(|v| regex::escape(v)).collect();
    format!("(?:{})", escaped.join("|"))
}

/// A label probe for one monetary field.
#[derive(Debug, Clone, Copy)]
pub struct LabelProbe {
    field: Field,
    pattern: &'static Regex,
}

impl LabelProbe {
    /// Probe for the grand total, anchored at the start of a paragraph.
    pub fn total() -> Self {
        Self {
            field: Field::Total,
            pattern: &*TOTAL_LABEL,
        }
    }

    /// Probe for the subtotal, anywhere in a paragraph.
    pub fn subtotal() -> Self {
        Self {
            field: Field::Subtotal,
            pattern: &*SUBTOTAL_LABEL,
        }
    }

    pub fn for_field(field: Field) -> Self {
        match field {
            Field::Total => Self::total(),
            Field::Subtotal => Self::subtotal(),
        }
    }

    /// Check whether a paragraph's text carries this label.
    pub fn matches(&self, text: &str) -> bool {
        self.pattern.is_match(text)
    }

    /// Find the bottom-most paragraph carrying this label.
    pub fn find(&self, doc: &RecognizedDocument, all_pages: bool) -> Option<String> {
        let hit = doc
            .paragraphs_bottom_up(all_pages)
            .map(|p| p.text())
            .find(|text| self.matches(text));
        if let Some(text) = &hit {
            debug!("Found {} label in {:?}", self.field, text);
        }
        hit
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fuzzy_label_variants() {
        assert_eq!(fuzzy_label("total"), "(?:total|otal|ttal|toal|totl|tota)");
    }

    #[test]
    fn test_fuzzy_label_dedupes_doubled_letters() {
        assert_eq!(fuzzy_label("add"), "(?:add|dd|ad)");
        assert_eq!(fuzzy_label("a"), "(?:a)");
    }

    #[test]
    fn test_probe_for_field() {
        assert!(LabelProbe::for_field(Field::Subtotal).matches("SUBTOTAL 1.00"));
        assert!(LabelProbe::total().matches("TOTAL 3.00"));
        assert!(!LabelProbe::total().matches("Subtotal 3.00"));
        assert!(LabelProbe::subtotal().matches("Subtotal 3.00"));
    }

    #[test]
    fn test_probe_find() {
        let doc = RecognizedDocument::from_text("Subtotal 3.00\nTax 0.30\nTotal 3.30\nThank you");
        assert_eq!(LabelProbe::total().find(&doc, true), Some("Total 3.30".to_string()));
        assert_eq!(LabelProbe::subtotal().find(&doc, true), Some("Subtotal 3.00".to_string()));
        assert_eq!(LabelProbe::total().find(&RecognizedDocument::default(), true), None);
    }
}
