//! High-level pipeline API for CSV to NUDS conversion.
//!
//! Combines all steps: parsing, defaults, conversion, validation and
//! writing one file per row.
//!
//! # Example
//!
//! ```rust,no_run
//! use csv_nuds::{convert_csv, ConvertOptions};
//! use std::path::Path;
//!
//! let options = ConvertOptions {
//!     output_dir: "nuds".into(),
//!     defaults_path: Some("defaults.csv".into()),
//!     ..Default::default()
//! };
//! let summary = convert_csv(Path::new("zeno.csv"), &options)?;
//! println!("Wrote {} documents", summary.written.len());
//! # Ok::<(), csv_nuds::PipelineError>(())
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::diagnostics::{CountingSink, DiagnosticSink};
use crate::error::{PipelineError, PipelineResult};
use crate::models::{Nuds, Record, RecordType};
use crate::output::{write_document, OutputFormat};
use crate::parser::{parse_csv_file, read_defaults, ParseResult};
use crate::validation::validate_document;

use super::engine::Converter;

/// Options for the conversion pipeline
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ConvertOptions {
    /// Directory receiving one file per converted row
    pub output_dir: PathBuf,

    /// CSV whose first data row is applied before every input row
    pub defaults_path: Option<PathBuf>,

    /// Input delimiter; detected from the header line when unset
    pub delimiter: Option<char>,

    /// `@recordType` of every produced document
    pub record_type: RecordType,

    /// Output serialization
    pub format: OutputFormat,

    /// Record failed rows in the summary instead of aborting
    pub keep_going: bool,

    /// Replace existing output files
    pub overwrite: bool,

    /// Conversion time stamped into every document; now when unset
    pub timestamp: Option<DateTime<Utc>>,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("nuds"),
            defaults_path: None,
            delimiter: None,
            record_type: RecordType::Physical,
            format: OutputFormat::Xml,
            keep_going: false,
            overwrite: false,
            timestamp: None,
        }
    }
}

impl ConvertOptions {
    /// A converter configured from these options, reporting diagnostics
    /// to `sink`.
    pub fn converter(&self, sink: impl DiagnosticSink + 'static) -> Converter {
        Converter::new(self.timestamp.unwrap_or_else(Utc::now))
            .with_record_type(self.record_type)
            .with_sink(sink)
    }

    fn read_defaults(&self) -> PipelineResult<Option<Record>> {
        match &self.defaults_path {
            Some(path) => {
                let defaults = read_defaults(path)?;
                info!(path = %path.display(), fields = defaults.len(), "loaded defaults");
                Ok(Some(defaults))
            }
            None => Ok(None),
        }
    }
}

/// CSV file information
#[derive(Debug, Clone, Default, Serialize)]
pub struct CsvInfo {
    pub encoding: String,
    pub delimiter: char,
    pub headers: Vec<String>,
    pub row_count: usize,
}

impl From<&ParseResult> for CsvInfo {
    fn from(parsed: &ParseResult) -> Self {
        Self {
            encoding: parsed.encoding.clone(),
            delimiter: parsed.delimiter,
            headers: parsed.headers.clone(),
            row_count: parsed.records.len(),
        }
    }
}

/// A row that produced no document.
#[derive(Debug, Clone, Serialize)]
pub struct SkippedRow {
    /// 1-based, header excluded
    pub row: usize,
    pub reason: String,
}

/// Outcome of a conversion run
#[derive(Debug, Clone, Default, Serialize)]
pub struct ConversionSummary {
    /// CSV parsing metadata, when the input came from a file
    #[serde(skip_serializing_if = "Option::is_none")]
    pub csv_info: Option<CsvInfo>,

    /// Number of data rows seen
    pub rows_read: usize,

    /// Files written, in row order
    pub written: Vec<PathBuf>,

    /// Rows that failed (only with `keep_going`)
    pub skipped: Vec<SkippedRow>,

    /// Column names with no handler
    pub warned_fields: Vec<String>,

    /// Number of diagnostics emitted
    pub diagnostics: usize,
}

impl ConversionSummary {
    pub fn is_complete(&self) -> bool {
        self.skipped.is_empty()
    }
}

/// Convert a CSV file into one NUDS document per row.
///
/// This is the main entry point for the pipeline. It:
/// 1. Parses the CSV with auto-detection
/// 2. Reads the defaults row, if any
/// 3. Converts every row on top of the defaults
/// 4. Validates each document
/// 5. Writes `<output_dir>/<record-id>.<ext>`
pub fn convert_csv(input: &Path, options: &ConvertOptions) -> PipelineResult<ConversionSummary> {
    info!(input = %input.display(), "reading CSV");
    let parsed = parse_csv_file(input, options.delimiter)?;
    info!(
        encoding = %parsed.encoding,
        delimiter = format_delimiter(parsed.delimiter),
        rows = parsed.records.len(),
        columns = parsed.headers.len(),
        "parsed CSV"
    );

    let defaults = options.read_defaults()?;
    let mut summary = convert_records(&parsed.records, defaults.as_ref(), options)?;
    summary.csv_info = Some(CsvInfo::from(&parsed));
    Ok(summary)
}

/// Convert already-parsed records and write the documents.
pub fn convert_records(
    records: &[Record],
    defaults: Option<&Record>,
    options: &ConvertOptions,
) -> PipelineResult<ConversionSummary> {
    if records.is_empty() {
        return Err(PipelineError::EmptyInput);
    }

    let sink = CountingSink::new();
    let mut converter = options.converter(sink.clone());
    let mut summary = ConversionSummary {
        rows_read: records.len(),
        ..Default::default()
    };

    for (idx, record) in records.iter().enumerate() {
        let row = idx + 1;
        debug!(row, "converting row");

        match convert_and_write(&mut converter, defaults, record, options) {
            Ok(path) => {
                debug!(row, path = %path.display(), "wrote document");
                summary.written.push(path);
            }
            Err(err) if options.keep_going => {
                warn!(row, error = %err, "skipping row");
                summary.skipped.push(SkippedRow {
                    row,
                    reason: err.to_string(),
                });
            }
            Err(err) => return Err(err.at_row(row)),
        }
    }

    summary.warned_fields = converter.warned_fields();
    summary.diagnostics = sink.count();

    info!(
        written = summary.written.len(),
        skipped = summary.skipped.len(),
        dir = %options.output_dir.display(),
        "conversion finished"
    );
    Ok(summary)
}

fn convert_and_write(
    converter: &mut Converter,
    defaults: Option<&Record>,
    record: &Record,
    options: &ConvertOptions,
) -> PipelineResult<PathBuf> {
    let nuds = converter.generate(defaults, record)?;
    validate_document(&nuds)?;
    Ok(write_document(
        &options.output_dir,
        &nuds,
        options.format,
        options.overwrite,
    )?)
}

/// Convert a single row (1-based) of a CSV file without writing anything.
pub fn preview_csv(input: &Path, row: usize, options: &ConvertOptions) -> PipelineResult<Nuds> {
    let parsed = parse_csv_file(input, options.delimiter)?;
    let defaults = options.read_defaults()?;

    let record = row
        .checked_sub(1)
        .and_then(|idx| parsed.records.get(idx))
        .ok_or(PipelineError::RowOutOfRange {
            row,
            rows: parsed.records.len(),
        })?;

    let mut converter = options.converter(CountingSink::new());
    converter
        .generate(defaults.as_ref(), record)
        .map_err(|e| PipelineError::from(e).at_row(row))
}

/// Format delimiter for display
fn format_delimiter(d: char) -> &'static str {
    match d {
        ';' => ";",
        ',' => ",",
        '\t' => "TAB",
        '|' => "|",
        _ => "?",
    }
}
