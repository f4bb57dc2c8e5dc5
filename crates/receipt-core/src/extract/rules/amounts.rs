//! Amount extraction for receipts.

use rust_decimal::{Decimal, RoundingStrategy};
use std::str::FromStr;

use super::patterns::AMOUNT_PATTERN;
use super::{ExtractionMatch, FieldExtractor};

/// Amount field extractor.
///
/// Only the first amount-shaped token of a text is considered by
/// [`FieldExtractor::extract`]; if it fails to parse the text yields nothing.
pub struct AmountExtractor;

impl AmountExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for AmountExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for AmountExtractor {
    type Output = ExtractionMatch<Decimal>;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        let caps = AMOUNT_PATTERN.captures(text)?;
        let amount = parse_amount(&caps[1], &caps[2])?;
        Some(ExtractionMatch::new(amount, &caps[0]))
    }
}

/// Parse an amount from its integer and fractional digit runs.
///
/// Returns `None` when the digits do not fit a [`Decimal`].
pub fn parse_amount(integer_part: &str, fraction_part: &str) -> Option<Decimal> {
    Decimal::from_str(&format!("{}.{}", integer_part, fraction_part)).ok()
}

/// Derive tax as `total - subtotal`, rounded half away from zero.
///
/// Tax is only derived when both amounts are present and non-zero.
pub fn derive_tax(total: Option<Decimal>, subtotal: Option<Decimal>, decimal_places: u32) -> Option<Decimal> {
    match (total, subtotal) {
        (Some(total), Some(subtotal)) if !total.is_zero() && !subtotal.is_zero() => Some(
            (total - subtotal)
                .round_dp_with_strategy(decimal_places, RoundingStrategy::MidpointAwayFromZero),
        ),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_extract_first_amount() {
        let extractor = AmountExtractor::new();

        let result = extractor.extract("TOTAL 12.34").unwrap();
        assert_eq!(result.value, dec("12.34"));
        assert_eq!(result.source, "12.34");
    }

    #[test]
    fn test_extract_tolerates_misread_separator() {
        let extractor = AmountExtractor::new();

        assert_eq!(extractor.extract("Total 7,25").unwrap().value, dec("7.25"));
        assert_eq!(extractor.extract("Total 7-25").unwrap().value, dec("7.25"));
        assert_eq!(extractor.extract("TOTAL$4.05").unwrap().value, dec("4.05"));
    }

    #[test]
    fn test_extract_without_amount() {
        let extractor = AmountExtractor::new();

        assert!(extractor.extract("TOTAL").is_none());
        assert!(extractor.extract("TOTAL 12").is_none());
        assert!(extractor.extract("").is_none());
    }

    #[test]
    fn test_extract_ignores_later_amounts() {
        let result = AmountExtractor::new().extract("Milk 2.49 Bread 3.10").unwrap();

        assert_eq!(result.value, dec("2.49"));
        assert_eq!(result.source, "2.49");
    }

    #[test]
    fn test_parse_amount_overflow() {
        assert_eq!(parse_amount("0012", "5"), Some(dec("12.5")));
        assert_eq!(parse_amount("99999999999999999999999999999999", "00"), None);
    }

    #[test]
    fn test_derive_tax() {
        assert_eq!(derive_tax(Some(dec("10.80")), Some(dec("10.00")), 2), Some(dec("0.80")));
        assert_eq!(derive_tax(Some(dec("1.005")), Some(dec("1.000")), 2), Some(dec("0.01")));
        assert_eq!(derive_tax(Some(dec("5.00")), Some(dec("6.00")), 2), Some(dec("-1.00")));
    }

    #[test]
    fn test_derive_tax_requires_both_non_zero() {
        assert_eq!(derive_tax(Some(dec("10.80")), None, 2), None);
        assert_eq!(derive_tax(None, Some(dec("10.00")), 2), None);
        assert_eq!(derive_tax(Some(dec("10.80")), Some(Decimal::ZERO), 2), None);
        assert_eq!(derive_tax(Some(dec("0.00")), Some(dec("1.00")), 2), None);
    }
}
