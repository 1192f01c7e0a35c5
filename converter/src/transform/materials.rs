//! Metal codes to nomisma materials.
//!
//! Only the two codes seen in practice are mapped. Add new codes to both
//! tables; a code present in [`MATERIAL_HREFS`] but not in
//! [`MATERIAL_TEXTS`] is reported as a hard error.

use crate::error::{ConvertError, ConvertResult};
use crate::models::Material;

/// Vocabulary URI per metal code.
pub const MATERIAL_HREFS: &[(&str, &str)] = &[
    ("AR", "http://nomisma.org/id/ar"),
    ("AV", "http://nomisma.org/id/av"),
];

/// Display text per metal code.
pub const MATERIAL_TEXTS: &[(&str, &str)] = &[("AR", "Silver"), ("AV", "Gold")];

/// Resolve a metal code against the built-in tables.
///
/// Returns `Ok(None)` for codes the tables do not know.
pub fn resolve_material(code: &str) -> ConvertResult<Option<Material>> {
    resolve_in(MATERIAL_HREFS, MATERIAL_TEXTS, code)
}

fn resolve_in(
    hrefs: &[(&str, &str)],
    texts: &[(&str, &str)],
    code: &str,
) -> ConvertResult<Option<Material>> {
    let Some(href) = lookup(hrefs, code) else {
        return Ok(None);
    };
    let text = lookup(texts, code).ok_or_else(|| ConvertError::MaterialTable {
        code: code.to_string(),
    })?;
    Ok(Some(Material::linked(href, text)))
}

fn lookup<'a>(table: &[(&str, &'a str)], code: &str) -> Option<&'a str> {
    table.iter().find(|(k, _)| *k == code).map(|(_, v)| *v)
}
