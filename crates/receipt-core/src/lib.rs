//! Core library for receipt scanning.
//!
//! This crate provides:
//! - The recognized-text annotation model produced by an OCR provider
//! - Receipt field extraction (total, subtotal, derived tax, date)
//! - Receipt records and the database interface they are stored through

pub mod error;
pub mod models;
pub mod annotation;
pub mod extract;
pub mod store;

pub use error::{ReceiptError, Result};
pub use models::config::ReceiptConfig;
pub use models::receipt::{Receipt, ReceiptEdit, ReceiptSummary};
pub use annotation::{AnnotationResponse, BoundingPoly, RecognizedDocument, TextAnnotation};
pub use extract::{ExtractionResult, ReceiptExtractor, ReceiptFieldExtractor};
pub use store::{MemoryReceiptDatabase, ReceiptDatabase};
