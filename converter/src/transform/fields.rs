//! Recognized CSV columns.
//!
//! Column names are matched case-insensitively against the lower-case
//! identifiers below. Each tag resolves to exactly one handler.

use once_cell::sync::Lazy;
use std::collections::HashMap;

use super::handlers::{self, Handler};

/// All columns the converter knows how to place in a NUDS document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldTag {
    Id,
    ImageUrl,
    Denomination,
    Metal,
    Diameter,
    Title,
    Weight,
    Mint,
    CreationTime,
    AdditionalDetails,
    RightsUrl,
    Source,
    Reporter,
}

static BY_NAME: Lazy<HashMap<&'static str, FieldTag>> =
    Lazy::new(|| FieldTag::ALL.iter().map(|tag| (tag.name(), *tag)).collect());

impl FieldTag {
    pub const ALL: [FieldTag; 13] = [
        FieldTag::Id,
        FieldTag::ImageUrl,
        FieldTag::Denomination,
        FieldTag::Metal,
        FieldTag::Diameter,
        FieldTag::Title,
        FieldTag::Weight,
        FieldTag::Mint,
        FieldTag::CreationTime,
        FieldTag::AdditionalDetails,
        FieldTag::RightsUrl,
        FieldTag::Source,
        FieldTag::Reporter,
    ];

    /// Canonical lower-case column name.
    pub fn name(&self) -> &'static str {
        match self {
            FieldTag::Id => "id",
            FieldTag::ImageUrl => "imageurl",
            FieldTag::Denomination => "denomination",
            FieldTag::Metal => "metal",
            FieldTag::Diameter => "diameter",
            FieldTag::Title => "title",
            FieldTag::Weight => "weight",
            FieldTag::Mint => "mint",
            FieldTag::CreationTime => "creationtime",
            FieldTag::AdditionalDetails => "additionaldetails",
            FieldTag::RightsUrl => "rightsurl",
            FieldTag::Source => "source",
            FieldTag::Reporter => "reporter",
        }
    }

    /// Resolve a column name in any case.
    pub fn from_name(name: &str) -> Option<Self> {
        BY_NAME.get(name.trim().to_lowercase().as_str()).copied()
    }

    pub fn handler(&self) -> Handler {
        match self {
            FieldTag::Id => handlers::record_id,
            FieldTag::ImageUrl => handlers::single_image_url,
            FieldTag::Denomination => handlers::denomination,
            FieldTag::Metal => handlers::metal,
            FieldTag::Diameter => handlers::diameter_in_mm,
            FieldTag::Title => handlers::title,
            FieldTag::Weight => handlers::weight_in_grams,
            FieldTag::Mint => handlers::mint,
            FieldTag::CreationTime => handlers::record_created_date,
            FieldTag::AdditionalDetails => handlers::details,
            FieldTag::RightsUrl => handlers::rights_url,
            FieldTag::Source => handlers::source,
            FieldTag::Reporter => handlers::reporter,
        }
    }

    /// One-line summary of where the column lands.
    pub fn description(&self) -> &'static str {
        match self {
            FieldTag::Id => "control/recordId",
            FieldTag::ImageUrl => "digRep file reference (appended)",
            FieldTag::Denomination => "typeDesc/denomination (appended)",
            FieldTag::Metal => "typeDesc/material, AR and AV linked to nomisma (appended)",
            FieldTag::Diameter => "physDesc/measurementsSet/diameter in mm",
            FieldTag::Title => "descMeta/title, English",
            FieldTag::Weight => "physDesc/measurementsSet/weight in g, comma decimals accepted",
            FieldTag::Mint => "accepted, not yet mapped",
            FieldTag::CreationTime => "\"created\" maintenance event date",
            FieldTag::AdditionalDetails => "descriptionSet/description (appended)",
            FieldTag::RightsUrl => "rightsStmt licenses for data and images",
            FieldTag::Source => "control/maintenanceAgency/agencyName",
            FieldTag::Reporter => "\"created\" maintenance event agent (human)",
        }
    }
}

impl std::fmt::Display for FieldTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Table of recognized columns for `csv-nuds fields`.
pub fn fields_description() -> String {
    let mut out = String::from("Recognized columns (case-insensitive):\n\n");
    out.push_str("| Column | Effect |\n|--------|--------|\n");
    for tag in FieldTag::ALL {
        out.push_str(&format!("| {} | {} |\n", tag.name(), tag.description()));
    }
    out.push_str("\nOther columns are ignored with a single warning per run.");
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_name_case_insensitive() {
        assert_eq!(FieldTag::from_name("ImageURL"), Some(FieldTag::ImageUrl));
        assert_eq!(FieldTag::from_name("rightsurl"), Some(FieldTag::RightsUrl));
        assert_eq!(FieldTag::from_name(" Title "), Some(FieldTag::Title));
        assert_eq!(FieldTag::from_name("keywords"), None);
    }

    #[test]
    fn test_names_roundtrip() {
        for tag in FieldTag::ALL {
            assert_eq!(FieldTag::from_name(tag.name()), Some(tag));
            assert_eq!(tag.name(), tag.name().to_lowercase());
        }
    }

    #[test]
    fn test_fields_description_lists_all() {
        let text = fields_description();
        for tag in FieldTag::ALL {
            assert!(text.contains(&format!("| {} |", tag.name())));
        }
    }
}
