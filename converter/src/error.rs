//! Error types for the csv-nuds conversion pipeline.
//!
//! This module defines a hierarchy of error types:
//!
//! - [`CsvError`] - CSV reading and decoding errors
//! - [`ConvertError`] - Hard errors raised by field handlers
//! - [`ValidationError`] - Documents that must not be persisted
//! - [`OutputError`] - XML/JSON serialization and file writing errors
//! - [`PipelineError`] - Top-level orchestration errors
//!
//! Soft anomalies (unknown columns, malformed weights, bad rights URLs,
//! unknown metal codes) are never errors; they go to a
//! [`DiagnosticSink`](crate::diagnostics::DiagnosticSink) instead.

use thiserror::Error;

// =============================================================================
// CSV Parsing Errors
// =============================================================================

/// Errors during CSV parsing.
#[derive(Debug, Error)]
pub enum CsvError {
    /// Failed to read file.
    #[error("Failed to read file: {0}")]
    IoError(#[from] std::io::Error),

    /// Failed to decode content.
    #[error("Failed to decode content as {0}")]
    EncodingError(String),

    /// Invalid CSV format.
    #[error("Invalid CSV at line {line}: {message}")]
    ParseError { line: u64, message: String },

    /// Empty file.
    #[error("CSV file is empty")]
    EmptyFile,

    /// No headers found.
    #[error("No headers found in CSV")]
    NoHeaders,

    /// A defaults file with a header but no value row.
    #[error("Defaults file has no data row")]
    NoDefaultsRow,
}

impl From<csv::Error> for CsvError {
    fn from(err: csv::Error) -> Self {
        let line = err.position().map(|p| p.line()).unwrap_or(0);
        CsvError::ParseError {
            line,
            message: err.to_string(),
        }
    }
}

// =============================================================================
// Conversion Errors
// =============================================================================

/// Unrecoverable errors raised by a field handler.
///
/// Any of these aborts the conversion of the current row; no document is
/// returned alongside them.
#[derive(Debug, Error)]
pub enum ConvertError {
    /// A metal code resolved to a URI but has no display text.
    #[error("Material table has a link for {code:?} but no display text")]
    MaterialTable { code: String },
}

// =============================================================================
// Validation Errors
// =============================================================================

/// Reasons a converted document cannot be persisted.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// Record id is unusable as a file name.
    #[error("Invalid record id {id:?}: {reason}")]
    InvalidRecordId { id: String, reason: String },

    /// Missing required field.
    #[error("Missing required field: {0}")]
    MissingField(String),
}

// =============================================================================
// Output Errors
// =============================================================================

/// Errors while serializing or writing a document.
#[derive(Debug, Error)]
pub enum OutputError {
    /// IO error.
    #[error("Output IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// XML writer error.
    #[error("XML error: {0}")]
    XmlError(#[from] quick_xml::Error),

    /// JSON error.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Output file exists and overwriting is disabled.
    #[error("Refusing to overwrite {0}")]
    AlreadyExists(String),
}

// =============================================================================
// Pipeline Errors (top-level)
// =============================================================================

/// Top-level pipeline orchestration errors.
///
/// This is the main error type returned by
/// [`convert_csv`](crate::transform::pipeline::convert_csv).
#[derive(Debug, Error)]
pub enum PipelineError {
    /// CSV parsing error.
    #[error("CSV error: {0}")]
    Csv(#[from] CsvError),

    /// Conversion error.
    #[error("Conversion error: {0}")]
    Convert(#[from] ConvertError),

    /// Validation error.
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Output error.
    #[error("Output error: {0}")]
    Output(#[from] OutputError),

    /// A failure tied to a specific input row (1-based, header excluded).
    #[error("Row {row}: {source}")]
    Row {
        row: usize,
        #[source]
        source: Box<PipelineError>,
    },

    /// No records to convert.
    #[error("No records to convert")]
    EmptyInput,

    /// A requested row is not in the input.
    #[error("Row {row} requested but the input has {rows} rows")]
    RowOutOfRange { row: usize, rows: usize },
}

impl PipelineError {
    /// Attach the row number to an error raised while processing that row.
    pub fn at_row(self, row: usize) -> Self {
        PipelineError::Row {
            row,
            source: Box::new(self),
        }
    }
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for CSV operations.
pub type CsvResult<T> = Result<T, CsvError>;

/// Result type for conversion operations.
pub type ConvertResult<T> = Result<T, ConvertError>;

/// Result type for output operations.
pub type OutputResult<T> = Result<T, OutputError>;

/// Result type for pipeline operations.
pub type PipelineResult<T> = Result<T, PipelineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_conversion_chain() {
        // CsvError -> PipelineError
        let csv_err = CsvError::EmptyFile;
        let pipeline_err: PipelineError = csv_err.into();
        assert!(pipeline_err.to_string().contains("empty"));

        // ConvertError -> PipelineError
        let convert_err = ConvertError::MaterialTable { code: "AE".into() };
        let pipeline_err: PipelineError = convert_err.into();
        assert!(pipeline_err.to_string().contains("AE"));
    }

    #[test]
    fn test_row_context() {
        let err = PipelineError::from(ValidationError::MissingField("id".into())).at_row(7);
        let msg = err.to_string();
        assert!(msg.starts_with("Row 7:"));
        assert!(msg.contains("id"));
    }

    #[test]
    fn test_validation_error_format() {
        let err = ValidationError::InvalidRecordId {
            id: "../etc".into(),
            reason: "contains a path separator".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("../etc"));
        assert!(msg.contains("path separator"));
    }
}
