//! Subcommands and the input handling they share.

pub mod batch;
pub mod config;
pub mod extract;
pub mod regions;

use std::fs;
use std::path::Path;

use tracing::debug;

use receipt_core::{AnnotationResponse, ReceiptConfig, RecognizedDocument, TextAnnotation};

/// File extensions accepted as extraction input.
pub const INPUT_EXTENSIONS: &[&str] = &["json", "txt"];

/// Annotation data loaded from one input file.
pub struct LoadedInput {
    /// Hierarchical document to extract fields from.
    pub document: RecognizedDocument,
    /// Flat fragments, present only for full provider responses.
    pub annotations: Vec<TextAnnotation>,
}

/// Load the configuration from `--config`, the default location, or defaults.
pub fn load_config(config_path: Option<&str>) -> anyhow::Result<ReceiptConfig> {
    if let Some(path) = config_path {
        return Ok(ReceiptConfig::from_file(Path::new(path))?);
    }

    let default_path = config::default_config_path();
    if default_path.exists() {
        debug!("Using config from {}", default_path.display());
        Ok(ReceiptConfig::from_file(&default_path)?)
    } else {
        Ok(ReceiptConfig::default())
    }
}

/// Load an annotation file.
///
/// JSON input may be a bare document (`{"pages": [...]}`), a single provider
/// response, or a batch response whose first entry is used. Plain text files
/// are split into one block per line.
pub fn load_input(path: &Path) -> anyhow::Result<LoadedInput> {
    if !path.exists() {
        anyhow::bail!("Input file not found: {}", path.display());
    }

    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    let content = fs::read_to_string(path)?;

    match extension.as_str() {
        "json" => parse_json_input(&content),
        "txt" => Ok(LoadedInput {
            document: RecognizedDocument::from_text(&content),
            annotations: Vec::new(),
        }),
        _ => anyhow::bail!("Unsupported file format: {}", extension),
    }
}

fn parse_json_input(content: &str) -> anyhow::Result<LoadedInput> {
    let mut value: serde_json::Value = serde_json::from_str(content)?;

    if value.get("pages").is_some() {
        return Ok(LoadedInput {
            document: serde_json::from_value(value)?,
            annotations: Vec::new(),
        });
    }

    if let Some(responses) = value.get_mut("responses").map(serde_json::Value::take) {
        let mut responses: Vec<serde_json::Value> = serde_json::from_value(responses)?;
        if responses.is_empty() {
            anyhow::bail!("Batch response contains no responses");
        }
        value = responses.swap_remove(0);
    }

    let response: AnnotationResponse = serde_json::from_value(value)?;
    Ok(LoadedInput {
        document: response.document(),
        annotations: response.text_annotations,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bare_document() {
        let input = parse_json_input(r#"{"pages": [{"blocks": []}]}"#).unwrap();
        assert_eq!(input.document.pages.len(), 1);
        assert!(input.annotations.is_empty());
    }

    #[test]
    fn test_parse_batch_response() {
        let json = r#"{"responses": [{"textAnnotations": [{"description": "TOTAL 1.00"}]}]}"#;
        let input = parse_json_input(json).unwrap();

        assert_eq!(input.annotations.len(), 1);
        assert_eq!(input.document.blocks(true)[0].text(), "TOTAL 1.00");
    }

    #[test]
    fn test_parse_empty_batch() {
        assert!(parse_json_input(r#"{"responses": []}"#).is_err());
    }
}
