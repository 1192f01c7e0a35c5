//! The `<descMeta>` section: titles, descriptions, typology and physical
//! measurements.

use serde::Serialize;

/// Language tag used for the single title slot.
pub const DEFAULT_LANG: &str = "en";

/// Descriptive metadata for an object or typology.
///
/// `type_desc` is the only required child; the other optional sections
/// start out as `None` and are created on first use.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DescMeta {
    pub titles: Vec<Title>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description_set: Option<DescriptionSet>,
    pub type_desc: TypeDesc,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phys_desc: Option<PhysDesc>,
}

impl DescMeta {
    /// The title list, seeded with one empty English slot if absent.
    ///
    /// Title handlers overwrite index 0, so the list never grows past one
    /// entry however many title columns are applied.
    pub fn default_title(&mut self) -> &mut Vec<Title> {
        if self.titles.is_empty() {
            self.titles.push(Title::new(DEFAULT_LANG, ""));
        }
        &mut self.titles
    }

    pub fn default_description_set(&mut self) -> &mut DescriptionSet {
        self.description_set.get_or_insert_with(DescriptionSet::default)
    }

    pub fn default_phys_desc(&mut self) -> &mut PhysDesc {
        self.phys_desc.get_or_insert_with(PhysDesc::default)
    }

    pub fn append_description(&mut self, description: Description) {
        self.default_description_set().descriptions.push(description);
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Title {
    pub lang: String,
    pub value: String,
}

impl Title {
    pub fn new(lang: &str, value: &str) -> Self {
        Self {
            lang: lang.to_string(),
            value: value.to_string(),
        }
    }
}

/// Free-text descriptions.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DescriptionSet {
    pub descriptions: Vec<Description>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Description {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lang: Option<String>,
    pub value: String,
}

impl Description {
    pub fn new(value: &str) -> Self {
        Self {
            lang: None,
            value: value.to_string(),
        }
    }
}

// =============================================================================
// Typological Description
// =============================================================================

/// Typological characteristics of the object.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TypeDesc {
    pub denominations: Vec<Denomination>,
    pub materials: Vec<Material>,
}

impl TypeDesc {
    pub fn append_denomination(&mut self, denomination: Denomination) {
        self.denominations.push(denomination);
    }

    pub fn append_material(&mut self, material: Material) {
        self.materials.push(material);
    }
}

/// A denomination kept as free text (e.g. "Drakhm").
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Denomination(pub String);

/// A material, optionally linked to a controlled vocabulary, e.g.
/// `<material xlink:href="http://nomisma.org/id/ar" xlink:type="simple">Silver</material>`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Material {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub link_type: Option<String>,
    pub text: String,
}

impl Material {
    /// A material linked to a vocabulary URI.
    pub fn linked(href: &str, text: &str) -> Self {
        Self {
            href: Some(href.to_string()),
            link_type: Some("simple".to_string()),
            text: text.to_string(),
        }
    }

    /// A text-only material with no vocabulary link.
    pub fn unlinked(text: &str) -> Self {
        Self {
            href: None,
            link_type: None,
            text: text.to_string(),
        }
    }
}

// =============================================================================
// Physical Description
// =============================================================================

/// Physical characteristics of a single object.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PhysDesc {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub measurements_set: Option<MeasurementsSet>,
}

impl PhysDesc {
    pub fn default_measurements_set(&mut self) -> &mut MeasurementsSet {
        self.measurements_set.get_or_insert_with(MeasurementsSet::default)
    }
}

/// Physical measurements. Values stay textual to keep source precision.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MeasurementsSet {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diameter: Option<Measurement>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight: Option<Measurement>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Measurement {
    pub units: String,
    pub value: String,
}

impl Measurement {
    pub fn new(units: &str, value: &str) -> Self {
        Self {
            units: units.to_string(),
            value: value.to_string(),
        }
    }
}
