//! Conversion engine.
//!
//! Applies [`Record`]s to a [`Nuds`] document by dispatching every
//! non-empty field to the handler of its [`FieldTag`].
//!
//! ## Usage Flow
//!
//! ```text
//! defaults Record ─┐
//!                  ├─▶ Converter::generate ─▶ Nuds ─▶ output::xml
//! row Record ──────┘
//! ```
//!
//! ## Example
//!
//! ```rust
//! use chrono::Utc;
//! use csv_nuds::{Converter, Record};
//!
//! let mut converter = Converter::new(Utc::now());
//! let row = Record::new().with("id", "264199").with("metal", "AR");
//! let nuds = converter.generate(None, &row).unwrap();
//! assert_eq!(nuds.record_id(), "264199");
//! ```

use chrono::{DateTime, Utc};
use std::collections::HashSet;

use crate::diagnostics::{DiagnosticSink, TracingSink};
use crate::error::ConvertResult;
use crate::models::{Nuds, Record, RecordType};

use super::fields::FieldTag;
use super::handlers::{self, Handler};

/// Converts records into NUDS documents.
///
/// The converter remembers which unknown column names it has already
/// warned about, so a column missing from the mapping is reported once per
/// converter rather than once per row. That set belongs to this instance;
/// two converters never share it.
pub struct Converter {
    timestamp: DateTime<Utc>,
    record_type: RecordType,
    warned: HashSet<String>,
    sink: Box<dyn DiagnosticSink>,
}

impl Converter {
    /// A converter stamping documents with `timestamp` and reporting
    /// diagnostics through `tracing`.
    pub fn new(timestamp: DateTime<Utc>) -> Self {
        Self {
            timestamp,
            record_type: RecordType::Physical,
            warned: HashSet::new(),
            sink: Box::new(TracingSink),
        }
    }

    /// Send diagnostics to another sink.
    pub fn with_sink(mut self, sink: impl DiagnosticSink + 'static) -> Self {
        self.sink = Box::new(sink);
        self
    }

    pub fn with_record_type(mut self, record_type: RecordType) -> Self {
        self.record_type = record_type;
        self
    }

    /// Pre-seed the set of column names that are silently ignored.
    pub fn with_warned_fields<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.warned
            .extend(names.into_iter().map(|n| n.as_ref().to_lowercase()));
        self
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    /// Unknown column names seen so far, sorted.
    pub fn warned_fields(&self) -> Vec<String> {
        let mut names: Vec<String> = self.warned.iter().cloned().collect();
        names.sort();
        names
    }

    /// Build a fresh document from an optional shared `defaults` record and
    /// a `row` record, applied in that order.
    ///
    /// Overwriting columns (title, weight, source...) end up with the row's
    /// value; appending columns (metal, rightsurl, imageurl...) keep the
    /// defaults' entries ahead of the row's.
    pub fn generate(&mut self, defaults: Option<&Record>, row: &Record) -> ConvertResult<Nuds> {
        let mut nuds = Nuds::new(self.record_type, self.timestamp);

        if let Some(defaults) = defaults {
            self.convert(&mut nuds, defaults)?;
        }
        self.convert(&mut nuds, row)?;

        Ok(nuds)
    }

    /// Apply every field of `record` to `nuds`.
    ///
    /// Stops at the first handler error; the document may then be partially
    /// updated and should be discarded.
    pub fn convert(&mut self, nuds: &mut Nuds, record: &Record) -> ConvertResult<()> {
        for (name, val) in record.iter() {
            // Skip if the field is unset
            if val.is_empty() {
                continue;
            }

            let handler = self.resolve(name, val);
            handler(nuds, val, self.sink.as_ref())?;
        }
        Ok(())
    }

    fn resolve(&mut self, name: &str, val: &str) -> Handler {
        if let Some(tag) = FieldTag::from_name(name) {
            return tag.handler();
        }

        let key = name.to_lowercase();
        if !self.warned.contains(&key) {
            self.sink
                .warn(&key, format!("no handler for {val:?}, a {name:?}; ignoring"));
            // Suppress for next rows
            self.warned.insert(key);
        }
        handlers::unimplemented
    }
}

impl std::fmt::Debug for Converter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Converter")
            .field("timestamp", &self.timestamp)
            .field("record_type", &self.record_type)
            .field("warned", &self.warned_fields())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::CollectingSink;
    use chrono::TimeZone;

    fn stamp() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2021, 3, 1, 12, 0, 0).unwrap()
    }

    fn converter() -> (Converter, CollectingSink) {
        let sink = CollectingSink::new();
        (Converter::new(stamp()).with_sink(sink.clone()), sink)
    }

    #[test]
    fn test_record_id() {
        let (mut converter, sink) = converter();
        let row = Record::new()
            .with("ID", "42")
            .with("title", "Drachm")
            .with("metal", "AV");
        let nuds = converter.generate(None, &row).unwrap();

        assert_eq!(nuds.record_id(), "42");
        assert!(sink.is_empty());
    }

    #[test]
    fn test_defaults_apply_when_row_silent() {
        let (mut converter, _) = converter();
        let defaults = Record::new()
            .with("source", "Zeno.ru")
            .with("rightsurl", "https://rightsstatements.org/page/CNE/1.0/");
        let row = Record::new().with("id", "1");

        let from_defaults = converter.generate(Some(&defaults), &row).unwrap();
        let direct = converter
            .generate(
                None,
                &row.clone()
                    .with("source", "Zeno.ru")
                    .with("rightsurl", "https://rightsstatements.org/page/CNE/1.0/"),
            )
            .unwrap();

        assert_eq!(from_defaults, direct);
    }

    #[test]
    fn test_defaults_then_empty_row() {
        let (mut converter, _) = converter();
        let fields = Record::new().with("id", "7").with("weight", "3,1");

        let via_defaults = converter.generate(Some(&fields), &Record::new()).unwrap();
        let via_row = converter.generate(None, &fields).unwrap();
        assert_eq!(via_defaults, via_row);
    }

    #[test]
    fn test_title_overwrites_details_append() {
        let (mut converter, _) = converter();
        let defaults = Record::new()
            .with("title", "Default title")
            .with("additionaldetails", "From defaults");
        let row = Record::new()
            .with("title", "Row title")
            .with("additionaldetails", "From row");

        let nuds = converter.generate(Some(&defaults), &row).unwrap();

        assert_eq!(nuds.desc_meta.titles.len(), 1);
        assert_eq!(nuds.desc_meta.titles[0].value, "Row title");
        assert_eq!(nuds.desc_meta.titles[0].lang, "en");

        let descriptions: Vec<_> = nuds
            .desc_meta
            .description_set
            .unwrap()
            .descriptions
            .into_iter()
            .map(|d| d.value)
            .collect();
        assert_eq!(descriptions, vec!["From defaults", "From row"]);
    }

    #[test]
    fn test_lists_accumulate_across_passes() {
        let (mut converter, _) = converter();
        let defaults = Record::new()
            .with("metal", "AV")
            .with("rightsurl", "https://example.org/a");
        let row = Record::new()
            .with("metal", "AR")
            .with("rightsurl", "https://example.org/b");

        let nuds = converter.generate(Some(&defaults), &row).unwrap();

        let materials: Vec<_> = nuds
            .desc_meta
            .type_desc
            .materials
            .iter()
            .map(|m| m.text.as_str())
            .collect();
        assert_eq!(materials, vec!["Gold", "Silver"]);
        assert_eq!(nuds.control.rights_stmt.licenses.len(), 4);
    }

    #[test]
    fn test_unknown_field_warns_once() {
        let (mut converter, sink) = converter();
        let row = Record::new().with("id", "1").with("Keywords", "sasanid");

        converter.generate(None, &row).unwrap();
        converter.generate(None, &row).unwrap();

        let warnings = sink.warnings();
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].field.as_deref(), Some("keywords"));
        assert_eq!(converter.warned_fields(), vec!["keywords"]);
    }

    #[test]
    fn test_warned_sets_are_per_instance() {
        let (mut first, first_sink) = converter();
        let (mut second, second_sink) = converter();
        let row = Record::new().with("category", "coins");

        first.generate(None, &row).unwrap();
        second.generate(None, &row).unwrap();

        assert_eq!(first_sink.warnings().len(), 1);
        assert_eq!(second_sink.warnings().len(), 1);
    }

    #[test]
    fn test_preseeded_warned_fields_are_silent() {
        let sink = CollectingSink::new();
        let mut converter = Converter::new(stamp())
            .with_sink(sink.clone())
            .with_warned_fields(["URL", "date"]);
        let row = Record::new().with("url", "https://zeno.ru/").with("date", "?");

        converter.generate(None, &row).unwrap();
        assert!(sink.is_empty());
    }

    #[test]
    fn test_unknown_metal_is_not_an_error() {
        let (mut converter, sink) = converter();
        let nuds = converter
            .generate(None, &Record::new().with("metal", "XX"))
            .unwrap();

        assert_eq!(nuds.desc_meta.type_desc.materials[0].text, "XX");
        assert!(nuds.desc_meta.type_desc.materials[0].href.is_none());
        assert_eq!(sink.warnings().len(), 1);
    }

    #[test]
    fn test_conversion_is_repeatable() {
        let (mut converter, _) = converter();
        let row = Record::new()
            .with("id", "9")
            .with("imageurl", "https://zeno.ru/x.jpg")
            .with("reporter", "Ombo");

        let first = converter.generate(None, &row).unwrap();
        let second = converter.generate(None, &row).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_record_type_is_applied() {
        let mut converter = Converter::new(stamp()).with_record_type(RecordType::Conceptual);
        let nuds = converter.generate(None, &Record::new()).unwrap();
        assert_eq!(nuds.record_type(), RecordType::Conceptual);
    }
}
