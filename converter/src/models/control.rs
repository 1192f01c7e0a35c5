//! The `<control>` section: identity, status, provenance and rights.

use serde::Serialize;

/// Publication status written on every generated record.
pub const PUBLICATION_STATUS: &str = "inProcess";

/// Maintenance status written on every generated record.
pub const MAINTENANCE_STATUS: &str = "derived";

/// Agent recorded on the synthetic conversion event.
pub const CONVERTER_AGENT: &str = "csv-nuds";

// =============================================================================
// Control
// =============================================================================

/// Control information about a record's identity, creation and maintenance.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Control {
    pub record_id: String,
    pub publication_status: String,
    pub maintenance_status: String,
    pub maintenance_agency: MaintenanceAgency,
    pub maintenance_history: MaintenanceHistory,
    pub rights_stmt: RightsStmt,
}

impl Control {
    pub(crate) fn new() -> Self {
        Self {
            record_id: String::new(),
            publication_status: PUBLICATION_STATUS.to_string(),
            maintenance_status: MAINTENANCE_STATUS.to_string(),
            maintenance_agency: MaintenanceAgency::default(),
            maintenance_history: MaintenanceHistory::default(),
            rights_stmt: RightsStmt::default(),
        }
    }
}

/// The institution or service responsible for the record.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MaintenanceAgency {
    pub agency_name: String,
}

// =============================================================================
// Maintenance History
// =============================================================================

/// Ordered provenance events.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MaintenanceHistory {
    pub events: Vec<MaintenanceEvent>,
}

impl MaintenanceHistory {
    /// Return the first event of the given type, appending a fresh one if
    /// none exists yet.
    ///
    /// Lets several columns ("creationtime" and "reporter") fill in the
    /// same event.
    pub fn get_or_create_event(&mut self, event_type: &str) -> &mut MaintenanceEvent {
        let index = match self.events.iter().position(|e| e.event_type == event_type) {
            Some(index) => index,
            None => {
                self.events.push(MaintenanceEvent::new(event_type));
                self.events.len() - 1
            }
        };
        &mut self.events[index]
    }

    /// Append an event unconditionally.
    pub fn append_event(&mut self, event: MaintenanceEvent) {
        self.events.push(event);
    }

    /// Find an event by type.
    pub fn event(&self, event_type: &str) -> Option<&MaintenanceEvent> {
        self.events.iter().find(|e| e.event_type == event_type)
    }
}

/// A single who/when/what entry in the maintenance history.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MaintenanceEvent {
    pub event_type: String,
    pub event_date_time: EventDateTime,
    pub agent_type: String,
    pub agent: String,
}

impl MaintenanceEvent {
    pub fn new(event_type: &str) -> Self {
        Self {
            event_type: event_type.to_string(),
            ..Default::default()
        }
    }
}

/// Human-readable date with an optional machine-readable `standardDateTime`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventDateTime {
    pub standard_date_time: String,
    pub value: String,
}

// =============================================================================
// Rights
// =============================================================================

/// Licensing statements for the record's data and images.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RightsStmt {
    pub licenses: Vec<License>,
}

impl RightsStmt {
    pub fn append_license(&mut self, license: License) {
        self.licenses.push(license);
    }
}

/// A `<license>` element, e.g.
/// `<license for="data" xlink:type="simple" xlink:href="..."/>`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct License {
    /// What the license covers: `data` or `images`.
    #[serde(rename = "for")]
    pub applies_to: String,
    #[serde(rename = "type")]
    pub link_type: String,
    pub href: String,
}
