//! Checks run on a converted document before it is written.
//!
//! Schema validation against nuds.xsd is out of scope. What is checked here
//! is what the writer itself depends on:
//!
//! - the record id is present and usable as a file name
//! - the document carries the parts every NUDS record needs
//!
//! # Example
//!
//! ```rust
//! use csv_nuds::validation::validate_record_id;
//!
//! assert!(validate_record_id("264199").is_ok());
//! assert!(validate_record_id("../264199").is_err());
//! ```

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::ValidationError;
use crate::models::Nuds;

/// Characters not allowed in a record id: path separators, characters
/// reserved on common filesystems, and control characters.
static FORBIDDEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"[/\\:*?"<>|\x00-\x1F\x7F]"#).expect("valid regex"));

const MAX_RECORD_ID_LEN: usize = 200;

/// Check that `id` can name the output file.
pub fn validate_record_id(id: &str) -> Result<(), ValidationError> {
    let invalid = |reason: &str| ValidationError::InvalidRecordId {
        id: id.to_string(),
        reason: reason.to_string(),
    };

    if id.is_empty() {
        return Err(ValidationError::MissingField("id".to_string()));
    }
    if id.trim() != id {
        return Err(invalid("has leading or trailing whitespace"));
    }
    if id == "." || id == ".." {
        return Err(invalid("is a relative path"));
    }
    if let Some(found) = FORBIDDEN.find(id) {
        return Err(invalid(&format!(
            "contains forbidden character {:?}",
            found.as_str()
        )));
    }
    if id.len() > MAX_RECORD_ID_LEN {
        return Err(invalid(&format!("is longer than {MAX_RECORD_ID_LEN} bytes")));
    }
    Ok(())
}

/// Check a converted document before persisting it.
pub fn validate_document(nuds: &Nuds) -> Result<(), ValidationError> {
    validate_record_id(nuds.record_id())?;

    if nuds.control.maintenance_history.events.is_empty() {
        return Err(ValidationError::MissingField(
            "control/maintenanceHistory/maintenanceEvent".to_string(),
        ));
    }
    Ok(())
}

/// Returns true if the document would pass [`validate_document`].
pub fn is_valid_document(nuds: &Nuds) -> bool {
    validate_document(nuds).is_ok()
}
