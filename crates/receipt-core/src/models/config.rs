//! Configuration structures for receipt processing.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{ReceiptError, Result};
use crate::extract::rules::regions::DEFAULT_MAX_LABEL_LEN;

/// Largest scale a `Decimal` can carry.
const MAX_DECIMAL_PLACES: u32 = 28;

/// Main configuration, loaded once at startup and passed by reference.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReceiptConfig {
    /// Field extraction configuration.
    pub extraction: ExtractionConfig,

    /// Receipt record configuration.
    pub records: RecordConfig,
}

/// Field extraction configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Scan every page instead of only the first.
    pub scan_all_pages: bool,

    /// Decimal places the derived tax is rounded to.
    pub tax_decimal_places: u32,

    /// Flat annotation fragments this long or longer never count as labels.
    pub region_label_max_len: usize,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            scan_all_pages: true,
            tax_decimal_places: 2,
            region_label_max_len: DEFAULT_MAX_LABEL_LEN,
        }
    }
}

/// Receipt record configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecordConfig {
    /// strftime format of `Receipt::display_date`.
    pub display_date_format: String,

    /// Currency code shown next to amounts.
    pub currency: String,
}

impl Default for RecordConfig {
    fn default() -> Self {
        Self {
            display_date_format: "%m/%d/%Y".to_string(),
            currency: "USD".to_string(),
        }
    }
}

impl ReceiptConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Check values that would make extraction meaningless.
    pub fn validate(&self) -> Result<()> {
        if self.extraction.tax_decimal_places > MAX_DECIMAL_PLACES {
            return Err(ReceiptError::Config(format!(
                "extraction.tax_decimal_places must be at most {}, got {}",
                MAX_DECIMAL_PLACES, self.extraction.tax_decimal_places
            )));
        }
        if self.extraction.region_label_max_len == 0 {
            return Err(ReceiptError::Config(
                "extraction.region_label_max_len must be positive".to_string(),
            ));
        }
        if self.records.display_date_format.trim().is_empty() {
            return Err(ReceiptError::Config(
                "records.display_date_format must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        let mut config = ReceiptConfig::default();
        config.extraction.scan_all_pages = false;
        config.records.currency = "EUR".to_string();
        config.save(&path).unwrap();

        assert_eq!(ReceiptConfig::from_file(&path).unwrap(), config);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"extraction": {"tax_decimal_places": 3}}"#).unwrap();

        let config = ReceiptConfig::from_file(&path).unwrap();
        assert_eq!(config.extraction.tax_decimal_places, 3);
        assert!(config.extraction.scan_all_pages);
        assert_eq!(config.records, RecordConfig::default());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = ReceiptConfig::default();
        config.extraction.tax_decimal_places = 40;
        assert!(matches!(config.validate(), Err(ReceiptError::Config(_))));

        let mut config = ReceiptConfig::default();
        config.extraction.region_label_max_len = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_missing_file() {
        let result = ReceiptConfig::from_file(Path::new("/nonexistent/receipt.json"));
        assert!(matches!(result, Err(ReceiptError::Io(_))));
    }
}
