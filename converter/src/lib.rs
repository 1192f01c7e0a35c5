//! # csv-nuds - CSV to NUDS numismatic record conversion
//!
//! csv-nuds turns spreadsheet exports of coin collections (Zeno.ru and
//! similar catalogues) into NUDS XML documents, one per row, ready for
//! import into Numishare.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │   CSV File  │────▶│   Parser    │────▶│  Converter  │────▶│  NUDS XML   │
//! │  (ISO/UTF8) │     │  (auto-enc) │     │  (per-field)│     │ (1 per row) │
//! └─────────────┘     └─────────────┘     └─────────────┘     └─────────────┘
//!                                                ▲
//!                            defaults row ───────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use chrono::Utc;
//! use csv_nuds::{to_xml_string, Converter, Record};
//!
//! let row = Record::new()
//!     .with("ID", "264199")
//!     .with("Title", "Kaykhusru II, dirham")
//!     .with("Metal", "AR");
//!
//! let mut converter = Converter::new(Utc::now());
//! let nuds = converter.generate(None, &row).unwrap();
//! let xml = to_xml_string(&nuds).unwrap();
//! assert!(xml.contains("<recordId>264199</recordId>"));
//! ```
//!
//! ## Modules
//!
//! - [`error`] - Hierarchical error types
//! - [`models`] - NUDS document model and input records
//! - [`diagnostics`] - Non-fatal conversion messages
//! - [`parser`] - CSV parsing with auto-detection
//! - [`transform`] - Field dispatch, conversion engine and pipeline
//! - [`validation`] - Checks before writing
//! - [`output`] - XML/JSON serialization and files
//! - [`logging`] - `tracing` subscriber setup for the binary

// Core modules
pub mod diagnostics;
pub mod error;
pub mod models;

// Parsing
pub mod parser;

// Transformation
pub mod transform;

// Validation
pub mod validation;

// Output
pub mod output;

// Logging
pub mod logging;

// =============================================================================
// Re-exports - Error types
// =============================================================================

pub use error::{
    ConvertError, CsvError, OutputError, PipelineError, PipelineResult, ValidationError,
};

// =============================================================================
// Re-exports - Models
// =============================================================================

pub use models::{Nuds, Record, RecordType};

// =============================================================================
// Re-exports - Diagnostics
// =============================================================================

pub use diagnostics::{
    CollectingSink, CountingSink, DiagnosticSink, LogEntry, LogLevel, TracingSink,
};

// =============================================================================
// Re-exports - CSV Parsing
// =============================================================================

pub use parser::{
    decode_content, detect_delimiter, detect_encoding, parse_bytes_auto, parse_csv_file,
    parse_csv_file_auto, parse_str, read_defaults, ParseResult,
};

// =============================================================================
// Re-exports - Conversion
// =============================================================================

pub use transform::{fields_description, Converter, FieldTag};

// =============================================================================
// Re-exports - Pipeline
// =============================================================================

pub use transform::pipeline::{
    convert_csv, convert_records, preview_csv, ConversionSummary, ConvertOptions, CsvInfo,
    SkippedRow,
};

// =============================================================================
// Re-exports - Validation and Output
// =============================================================================

pub use validation::{validate_document, validate_record_id};

pub use output::{
    output_path, to_json_string, to_xml_string, write_document, write_xml, OutputFormat,
};
