//! Recognized-text annotations produced by an OCR provider.
//!
//! The structures mirror the provider's JSON document shape
//! (`pages -> blocks -> paragraphs -> words -> symbols`) so a response can be
//! deserialized directly. Every list defaults to empty and vertex coordinates
//! default to zero, since the provider omits both when they carry no data.

use serde::{Deserialize, Serialize};

/// Hierarchical OCR result for one image.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RecognizedDocument {
    /// Pages in document order.
    pub pages: Vec<Page>,

    /// Full text as reported by the provider (informational only).
    #[serde(skip_serializing_if = "String::is_empty")]
    pub text: String,
}

/// A single page of recognized text.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Page {
    /// Blocks in document order.
    pub blocks: Vec<Block>,

    /// Page width in pixels (0 when unknown).
    pub width: u32,

    /// Page height in pixels (0 when unknown).
    pub height: u32,
}

/// A block of text, typically a visually separated region of the receipt.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Block {
    /// Where the block appears on the image, if the provider reported it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bounding_box: Option<BoundingPoly>,

    /// Paragraphs in document order.
    pub paragraphs: Vec<Paragraph>,
}

/// A paragraph: the unit every field probe is evaluated against.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Paragraph {
    pub words: Vec<Word>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Word {
    pub symbols: Vec<Symbol>,
}

/// Smallest recognized unit, usually a single character.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Symbol {
    pub text: String,
}

/// Closed polygon in image space.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BoundingPoly {
    pub vertices: Vec<Vertex>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Vertex {
    pub x: i32,
    pub y: i32,
}

/// A flat text fragment with its own bounding region.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TextAnnotation {
    /// Recognized text of the fragment.
    pub description: String,

    /// Where the fragment appears on the image.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bounding_poly: Option<BoundingPoly>,
}

/// A full provider response for one image.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AnnotationResponse {
    /// Hierarchical document annotation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_text_annotation: Option<RecognizedDocument>,

    /// Flat fragment annotations. The first entry conventionally holds the
    /// whole text of the image.
    pub text_annotations: Vec<TextAnnotation>,
}

impl AnnotationResponse {
    /// Get the hierarchical document, falling back to the full-text fragment
    /// when the provider returned no blocks.
    pub fn document(&self) -> RecognizedDocument {
        if let Some(doc) = self.full_text_annotation.as_ref().filter(|d| !d.is_empty()) {
            return doc.clone();
        }

        self.text_annotations
            .first()
            .map(|a| RecognizedDocument::from_text(&a.description))
            .unwrap_or_default()
    }
}

impl RecognizedDocument {
    /// Build a single-page document from plain text.
    ///
    /// Each non-empty line becomes its own block holding one paragraph, so
    /// the bottom-up block scan visits lines from last to first.
    pub fn from_text(text: &str) -> Self {
        let blocks = text
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(|l| Block::from_paragraphs(vec![Paragraph::from_text(l)]))
            .collect();

        Self {
            pages: vec![Page {
                blocks,
                ..Page::default()
            }],
            text: text.to_string(),
        }
    }

    /// Check whether the document contains any block at all.
    pub fn is_empty(&self) -> bool {
        self.pages.iter().all(|p| p.blocks.is_empty())
    }

    /// Blocks in document order, either across all pages or from the first
    /// page only.
    pub fn blocks(&self, all_pages: bool) -> Vec<&Block> {
        let pages = if all_pages {
            &self.pages[..]
        } else {
            &self.pages[..self.pages.len().min(1)]
        };

        pages.iter().flat_map(|p| p.blocks.iter()).collect()
    }

    /// Paragraphs visited bottom-up: blocks from last to first, paragraphs
    /// within a block in forward order.
    pub fn paragraphs_bottom_up(&self, all_pages: bool) -> impl Iterator<Item = &Paragraph> {
        self.blocks(all_pages)
            .into_iter()
            .rev()
            .flat_map(|b| b.paragraphs.iter())
    }
}

impl Block {
    /// Create a block without a bounding region.
    pub fn from_paragraphs(paragraphs: Vec<Paragraph>) -> Self {
        Self {
            bounding_box: None,
            paragraphs,
        }
    }

    /// Linearized text of every paragraph in the block.
    pub fn text(&self) -> String {
        self.paragraphs.iter().map(Paragraph::text).collect()
    }
}

impl Paragraph {
    /// Build a paragraph whose linearized text equals `text`.
    ///
    /// Words are split after whitespace so the separators survive as
    /// trailing symbols of the preceding word.
    pub fn from_text(text: &str) -> Self {
        Self {
            words: text.split_inclusive(char::is_whitespace).map(Word::from_text).collect(),
        }
    }

    /// Concatenated symbol text of the paragraph.
    pub fn text(&self) -> String {
        let mut text = String::new();
        for word in &self.words {
            for symbol in &word.symbols {
                text.push_str(&symbol.text);
            }
        }
        text
    }
}

impl Word {
    /// Build a word with one symbol per character.
    pub fn from_text(text: &str) -> Self {
        Self {
            symbols: text
                .chars()
                .map(|c| Symbol { text: c.to_string() })
                .collect(),
        }
    }
}

impl BoundingPoly {
    /// Create an axis-aligned rectangle polygon.
    pub fn rect(x1: i32, y1: i32, x2: i32, y2: i32) -> Self {
        Self {
            vertices: vec![
                Vertex { x: x1, y: y1 },
                Vertex { x: x2, y: y1 },
                Vertex { x: x2, y: y2 },
                Vertex { x: x1, y: y2 },
            ],
        }
    }

    /// Get the axis-aligned bounds (min_x, min_y, max_x, max_y).
    pub fn bounds(&self) -> Option<(i32, i32, i32, i32)> {
        let first = self.vertices.first()?;
        let init = (first.x, first.y, first.x, first.y);

        Some(self.vertices.iter().fold(init, |(x1, y1, x2, y2), v| {
            (x1.min(v.x), y1.min(v.y), x2.max(v.x), y2.max(v.y))
        }))
    }

    /// Get the center point of the polygon.
    pub fn center(&self) -> Option<(f32, f32)> {
        let (x1, y1, x2, y2) = self.bounds()?;
        Some(((x1 + x2) as f32 / 2.0, (y1 + y2) as f32 / 2.0))
    }
}
