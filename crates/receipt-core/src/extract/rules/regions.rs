//! Label location over flat text annotations.
//!
//! Some provider responses only carry flat fragments with their own bounding
//! polygons. This probe finds the fragment holding a bare field label and
//! reports where it sits on the image. Resolving the amount from a nearby
//! fragment is not done here: the result is a location, never a number.

use serde::Serialize;

use super::patterns::{SUBTOTAL_BARE, TOTAL_BARE};
use super::Field;
use crate::annotation::{BoundingPoly, TextAnnotation};

/// Default upper bound (exclusive) on the length of a label fragment.
pub const DEFAULT_MAX_LABEL_LEN: usize = 10;

/// Where a field label was found on the image.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LabelRegion {
    /// Field whose label was found.
    pub field: Field,
    /// Text of the matching fragment.
    pub text: String,
    /// Bounding polygon of the fragment.
    pub region: BoundingPoly,
}

/// Find the bottom-most short fragment holding the bare label for `field`.
///
/// Fragments of `max_len` characters or more are rejected so labels inside
/// longer sentences (and the provider's whole-image fragment) never match.
/// Fragments without a bounding polygon are skipped.
pub fn find_label_region(annotations: &[TextAnnotation], field: Field, max_len: usize) -> Option<LabelRegion> {
    let pattern = match field {
        Field::Total => &*TOTAL_BARE,
        Field::Subtotal => &*SUBTOTAL_BARE,
    };

    annotations
        .iter()
        .rev()
        .filter(|a| a.description.chars().count() < max_len)
        .filter(|a| pattern.is_match(&a.description))
        .find_map(|a| {
            a.bounding_poly.as_ref().map(|region| LabelRegion {
                field,
                text: a.description.clone(),
                region: region.clone(),
            })
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fragment(text: &str, y: i32) -> TextAnnotation {
        TextAnnotation {
            description: text.to_string(),
            bounding_poly: Some(BoundingPoly::rect(0, y, 50, y + 10)),
        }
    }

    #[test]
    fn test_find_total_region() {
        let annotations = vec![
            fragment("SUBTOTAL 4.00\nTAX 0.40\nTOTAL 4.40", 0),
            fragment("SUBTOTAL", 100),
            fragment("4.00", 100),
            fragment("TOTAL", 120),
            fragment("4.40", 120),
        ];

        let total = find_label_region(&annotations, Field::Total, DEFAULT_MAX_LABEL_LEN).unwrap();
        assert_eq!(total.text, "TOTAL");
        assert_eq!(total.region.bounds(), Some((0, 120, 50, 130)));

        let subtotal = find_label_region(&annotations, Field::Subtotal, DEFAULT_MAX_LABEL_LEN).unwrap();
        assert_eq!(subtotal.region.bounds(), Some((0, 100, 50, 110)));
    }

    #[test]
    fn test_rejects_long_fragments() {
        let annotations = vec![fragment("Your total", 0), fragment("Total due:", 10)];
        assert!(find_label_region(&annotations, Field::Total, DEFAULT_MAX_LABEL_LEN).is_none());
        assert!(find_label_region(&annotations, Field::Total, 11).is_some());
    }

    #[test]
    fn test_subtotal_is_not_total() {
        let annotations = vec![fragment("SUBTOTAL", 0)];
        assert!(find_label_region(&annotations, Field::Total, DEFAULT_MAX_LABEL_LEN).is_none());
    }

    #[test]
    fn test_skips_fragments_without_region() {
        let annotations = vec![
            fragment("Total", 0),
            TextAnnotation {
                description: "Total".to_string(),
                bounding_poly: None,
            },
        ];
        let found = find_label_region(&annotations, Field::Total, DEFAULT_MAX_LABEL_LEN).unwrap();
        assert_eq!(found.region.bounds(), Some((0, 0, 50, 10)));
    }
}
