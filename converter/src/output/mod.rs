//! Output of converted documents.
//!
//! - [`xml`] - NUDS XML serialization (the format Numishare imports)
//! - JSON rendering of the in-memory model, for inspection
//! - One file per document, named after its record id

pub mod xml;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{OutputError, OutputResult};
use crate::models::Nuds;

pub use xml::{to_xml_string, write_xml};

/// Output serialization format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Xml,
    Json,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Xml => "xml",
            Self::Json => "json",
        }
    }
}

/// Pretty-printed JSON view of a document.
pub fn to_json_string(nuds: &Nuds) -> OutputResult<String> {
    Ok(serde_json::to_string_pretty(nuds)?)
}

/// Render a document in the requested format.
pub fn render(nuds: &Nuds, format: OutputFormat) -> OutputResult<String> {
    match format {
        OutputFormat::Xml => to_xml_string(nuds),
        OutputFormat::Json => to_json_string(nuds),
    }
}

/// `<dir>/<record-id>.<ext>`.
///
/// The record id is used as-is; check it with
/// [`validate_record_id`](crate::validation::validate_record_id) first.
pub fn output_path(dir: &Path, nuds: &Nuds, format: OutputFormat) -> PathBuf {
    dir.join(format!("{}.{}", nuds.record_id(), format.extension()))
}

/// Write a document into `dir`, creating the directory if needed.
///
/// Returns the path written.
pub fn write_document(
    dir: &Path,
    nuds: &Nuds,
    format: OutputFormat,
    overwrite: bool,
) -> OutputResult<PathBuf> {
    fs::create_dir_all(dir)?;

    let path = output_path(dir, nuds, format);
    if !overwrite && path.exists() {
        return Err(OutputError::AlreadyExists(path.display().to_string()));
    }

    fs::write(&path, render(nuds, format)?)?;
    Ok(path)
}
