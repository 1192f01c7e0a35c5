//! Domain models for the csv-nuds converter.
//!
//! This module contains the in-memory shape of a NUDS document and the
//! input record it is built from:
//!
//! - [`Nuds`] - Root document, one per converted row
//! - [`Control`] - Identity, status, provenance and rights
//! - [`DescMeta`] - Titles, typology and physical description
//! - [`DigRep`] - Digital representation (METS file section)
//! - [`Record`] - Case-insensitive input row
//!
//! Only the subset of <http://nomisma.org/nuds.xsd> that the converter
//! populates is modelled. Optional sections are `Option`s created through
//! the `default_*` accessors, so a section that was never touched is never
//! serialized and a section that was touched is never replaced.

use chrono::{DateTime, SecondsFormat, Utc};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

pub mod control;
pub mod descriptive;
pub mod digital;
pub mod record;

pub use control::{
    Control, EventDateTime, License, MaintenanceAgency, MaintenanceEvent, MaintenanceHistory,
    RightsStmt, CONVERTER_AGENT,
};
pub use descriptive::{
    DescMeta, Denomination, Description, DescriptionSet, Material, Measurement, MeasurementsSet,
    PhysDesc, Title, TypeDesc, DEFAULT_LANG,
};
pub use digital::{DigRep, FLocat, File, FileGrp, FileSec};
pub use record::Record;

// =============================================================================
// Namespaces
// =============================================================================

pub const NUDS_NS: &str = "http://nomisma.org/nuds";
pub const METS_NS: &str = "http://www.loc.gov/METS/";
pub const TEI_NS: &str = "http://www.tei-c.org/ns/1.0";
pub const XS_NS: &str = "http://www.w3.org/2001/XMLSchema";
pub const XLINK_NS: &str = "http://www.w3.org/1999/xlink";
pub const XSI_NS: &str = "http://www.w3.org/2001/XMLSchema-instance";
pub const SCHEMA_LOCATION: &str = "http://nomisma.org/nuds http://nomisma.org/nuds.xsd";

// =============================================================================
// Record Type
// =============================================================================

/// The `@recordType` of the `<nuds>` root.
///
/// A record is either a physical object or a conceptual coin type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum RecordType {
    #[default]
    Physical,
    Conceptual,
}

impl RecordType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Physical => "physical",
            Self::Conceptual => "conceptual",
        }
    }
}

impl std::fmt::Display for RecordType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// NUDS Root
// =============================================================================

/// Root element of a NUDS document.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Nuds {
    record_type: RecordType,
    pub control: Control,
    pub desc_meta: DescMeta,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dig_rep: Option<DigRep>,
}

impl Nuds {
    /// Create an empty document.
    ///
    /// The maintenance history is seeded with a `derived` event for this
    /// conversion, stamped with `timestamp`.
    pub fn new(record_type: RecordType, timestamp: DateTime<Utc>) -> Self {
        let mut control = Control::new();
        let stamp = timestamp.to_rfc3339_opts(SecondsFormat::Secs, true);
        control.maintenance_history.append_event(MaintenanceEvent {
            event_type: "derived".to_string(),
            event_date_time: EventDateTime {
                standard_date_time: stamp.clone(),
                value: stamp,
            },
            agent_type: "machine".to_string(),
            agent: CONVERTER_AGENT.to_string(),
        });

        Self {
            record_type,
            control,
            desc_meta: DescMeta::default(),
            dig_rep: None,
        }
    }

    pub fn record_id(&self) -> &str {
        &self.control.record_id
    }

    pub fn record_type(&self) -> RecordType {
        self.record_type
    }

    pub fn default_dig_rep(&mut self) -> &mut DigRep {
        self.dig_rep.get_or_insert_with(DigRep::default)
    }
}
