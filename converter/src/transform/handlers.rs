//! Per-column handlers.
//!
//! Every handler has the same shape: it receives the document being built,
//! the raw (non-empty) cell value and the diagnostics sink. It either
//! mutates the document, or leaves it alone after a warning, or returns a
//! [`ConvertError`](crate::error::ConvertError) that aborts the row.

use url::Url;

use crate::diagnostics::DiagnosticSink;
use crate::error::ConvertResult;
use crate::models::{
    Denomination, Description, File, License, Material, Measurement, Nuds, Title, DEFAULT_LANG,
};

use super::materials::resolve_material;

/// Signature shared by all handlers.
pub type Handler = fn(&mut Nuds, &str, &dyn DiagnosticSink) -> ConvertResult<()>;

const CREATED_EVENT: &str = "created";

pub fn record_id(coin: &mut Nuds, val: &str, _: &dyn DiagnosticSink) -> ConvertResult<()> {
    coin.control.record_id = val.to_string();
    Ok(())
}

/// A single image for the whole coin, e.g.
///
/// ```text
/// <digRep>
///   <mets:fileSec>
///     <mets:fileGrp USE="combined">
///       <mets:file USE="reference">
///         <mets:FLocat LOCTYPE="URL" xlink:href="https://zeno.ru/data/2807/Kaykhusru-24.jpg"/>
/// ```
pub fn single_image_url(coin: &mut Nuds, val: &str, _: &dyn DiagnosticSink) -> ConvertResult<()> {
    coin.default_dig_rep()
        .default_file_grp("combined")
        .append_file(File::at_url("reference", val));
    Ok(())
}

pub fn denomination(coin: &mut Nuds, val: &str, _: &dyn DiagnosticSink) -> ConvertResult<()> {
    // TODO: link well-known denominations such as drachm to nomisma URIs
    coin.desc_meta
        .type_desc
        .append_denomination(Denomination(val.to_string()));
    Ok(())
}

pub fn metal(coin: &mut Nuds, val: &str, sink: &dyn DiagnosticSink) -> ConvertResult<()> {
    let material = match resolve_material(val)? {
        Some(material) => material,
        None => {
            sink.warn("metal", format!("unimplemented metal: {val:?}"));
            Material::unlinked(val)
        }
    };
    coin.desc_meta.type_desc.append_material(material);
    Ok(())
}

pub fn diameter_in_mm(coin: &mut Nuds, val: &str, _: &dyn DiagnosticSink) -> ConvertResult<()> {
    coin.desc_meta
        .default_phys_desc()
        .default_measurements_set()
        .diameter = Some(Measurement::new("mm", val));
    Ok(())
}

/// Stores the weight in grams, keeping the source digits.
///
/// A European decimal comma ("3,7") is rewritten to a point. The value is
/// parsed only to decide whether to warn.
pub fn weight_in_grams(coin: &mut Nuds, val: &str, sink: &dyn DiagnosticSink) -> ConvertResult<()> {
    let val = val.replacen(',', ".", 1);

    if val.parse::<f32>().is_err() {
        sink.warn("weight", format!("invalid weight {val:?}; storing as-is"));
    }

    coin.desc_meta
        .default_phys_desc()
        .default_measurements_set()
        .weight = Some(Measurement::new("g", &val));
    Ok(())
}

/// Mints are accepted but not mapped yet; they belong under
/// `typeDesc/geographic/geogname`.
pub fn mint(_: &mut Nuds, _: &str, _: &dyn DiagnosticSink) -> ConvertResult<()> {
    Ok(())
}

pub fn title(coin: &mut Nuds, val: &str, _: &dyn DiagnosticSink) -> ConvertResult<()> {
    coin.desc_meta.default_title()[0] = Title::new(DEFAULT_LANG, val);
    Ok(())
}

/// The same license is given to data and images:
///
/// ```text
/// <rightsStmt>
///   <license for="data" xlink:type="simple" xlink:href="..."/>
///   <license for="images" xlink:type="simple" xlink:href="..."/>
/// ```
pub fn rights_url(coin: &mut Nuds, val: &str, sink: &dyn DiagnosticSink) -> ConvertResult<()> {
    if let Err(err) = Url::parse(val) {
        sink.warn("rightsurl", format!("{val:?} is not a valid URL ({err}); ignoring"));
        return Ok(());
    }

    for applies_to in ["data", "images"] {
        coin.control.rights_stmt.append_license(License {
            applies_to: applies_to.to_string(),
            link_type: "simple".to_string(),
            href: val.to_string(),
        });
    }
    Ok(())
}

/// The source of the data, recorded as the maintenance agency.
pub fn source(coin: &mut Nuds, val: &str, _: &dyn DiagnosticSink) -> ConvertResult<()> {
    coin.control.maintenance_agency.agency_name = val.to_string();
    Ok(())
}

/// When the record was first created digitally. Kept verbatim.
pub fn record_created_date(
    coin: &mut Nuds,
    val: &str,
    _: &dyn DiagnosticSink,
) -> ConvertResult<()> {
    let event = coin
        .control
        .maintenance_history
        .get_or_create_event(CREATED_EVENT);
    event.event_date_time.value = val.to_string();
    event.event_date_time.standard_date_time = val.to_string();
    Ok(())
}

/// Who created the original record.
pub fn reporter(coin: &mut Nuds, val: &str, _: &dyn DiagnosticSink) -> ConvertResult<()> {
    let event = coin
        .control
        .maintenance_history
        .get_or_create_event(CREATED_EVENT);
    event.agent = val.to_string();
    // Source records are entered by people.
    event.agent_type = "human".to_string();
    Ok(())
}

pub fn details(coin: &mut Nuds, val: &str, _: &dyn DiagnosticSink) -> ConvertResult<()> {
    coin.desc_meta.append_description(Description::new(val));
    Ok(())
}

/// Used for columns with no mapping.
pub fn unimplemented(_: &mut Nuds, _: &str, _: &dyn DiagnosticSink) -> ConvertResult<()> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::CollectingSink;
    use crate::models::RecordType;
    use chrono::Utc;

    fn coin() -> Nuds {
        Nuds::new(RecordType::Physical, Utc::now())
    }

    #[test]
    fn test_metal_known() {
        let sink = CollectingSink::new();
        let mut nuds = coin();
        metal(&mut nuds, "AR", &sink).unwrap();

        let materials = &nuds.desc_meta.type_desc.materials;
        assert_eq!(materials.len(), 1);
        assert_eq!(materials[0].text, "Silver");
        assert_eq!(materials[0].href.as_deref(), Some("http://nomisma.org/id/ar"));
        assert!(sink.is_empty());
    }

    #[test]
    fn test_metal_unknown_warns() {
        let sink = CollectingSink::new();
        let mut nuds = coin();
        metal(&mut nuds, "XX", &sink).unwrap();

        let materials = &nuds.desc_meta.type_desc.materials;
        assert_eq!(materials, &vec![Material::unlinked("XX")]);
        assert_eq!(sink.warnings().len(), 1);
        assert!(sink.warnings()[0].message.contains("XX"));
    }

    #[test]
    fn test_weight_comma_decimal() {
        let sink = CollectingSink::new();
        let mut nuds = coin();
        weight_in_grams(&mut nuds, "3,7", &sink).unwrap();

        let set = nuds.desc_meta.phys_desc.unwrap().measurements_set.unwrap();
        assert_eq!(set.weight, Some(Measurement::new("g", "3.7")));
        assert!(set.diameter.is_none());
        assert!(sink.is_empty());
    }

    #[test]
    fn test_weight_invalid_is_kept() {
        let sink = CollectingSink::new();
        let mut nuds = coin();
        weight_in_grams(&mut nuds, "about 4", &sink).unwrap();

        let set = nuds.desc_meta.phys_desc.unwrap().measurements_set.unwrap();
        assert_eq!(set.weight.unwrap().value, "about 4");
        assert_eq!(sink.warnings().len(), 1);
    }

    #[test]
    fn test_weight_and_diameter_share_measurements() {
        let sink = CollectingSink::new();
        let mut nuds = coin();
        diameter_in_mm(&mut nuds, "29", &sink).unwrap();
        weight_in_grams(&mut nuds, "3.62", &sink).unwrap();

        let set = nuds.desc_meta.phys_desc.unwrap().measurements_set.unwrap();
        assert_eq!(set.diameter, Some(Measurement::new("mm", "29")));
        assert_eq!(set.weight, Some(Measurement::new("g", "3.62")));
    }

    #[test]
    fn test_rights_url_invalid() {
        let sink = CollectingSink::new();
        let mut nuds = coin();
        rights_url(&mut nuds, "not-a-url", &sink).unwrap();

        assert!(nuds.control.rights_stmt.licenses.is_empty());
        assert_eq!(sink.warnings().len(), 1);
    }

    #[test]
    fn test_rights_url_valid() {
        let sink = CollectingSink::new();
        let mut nuds = coin();
        rights_url(&mut nuds, "https://example.org/x", &sink).unwrap();

        let licenses = &nuds.control.rights_stmt.licenses;
        assert_eq!(licenses.len(), 2);
        assert_eq!(licenses[0].applies_to, "data");
        assert_eq!(licenses[1].applies_to, "images");
        assert_eq!(licenses[0].href, licenses[1].href);
        assert_eq!(licenses[0].link_type, "simple");
    }

    #[test]
    fn test_creation_time_and_reporter_share_event() {
        let sink = CollectingSink::new();
        let mut nuds = coin();
        record_created_date(&mut nuds, "13 Dec 20 11:55:36 +0300", &sink).unwrap();
        reporter(&mut nuds, "Ombo", &sink).unwrap();

        let history = &nuds.control.maintenance_history;
        assert_eq!(history.events.len(), 2);
        let created = history.event("created").unwrap();
        assert_eq!(created.agent, "Ombo");
        assert_eq!(created.agent_type, "human");
        assert_eq!(created.event_date_time.value, "13 Dec 20 11:55:36 +0300");
        assert_eq!(
            created.event_date_time.standard_date_time,
            "13 Dec 20 11:55:36 +0300"
        );
    }

    #[test]
    fn test_image_urls_share_file_group() {
        let sink = CollectingSink::new();
        let mut nuds = coin();
        single_image_url(&mut nuds, "https://zeno.ru/a.jpg", &sink).unwrap();
        single_image_url(&mut nuds, "https://zeno.ru/b.jpg", &sink).unwrap();

        let groups = &nuds.dig_rep.unwrap().file_sec.file_grps;
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].usage, "combined");
        let hrefs: Vec<_> = groups[0]
            .files
            .iter()
            .map(|f| f.locations[0].href.as_str())
            .collect();
        assert_eq!(hrefs, vec!["https://zeno.ru/a.jpg", "https://zeno.ru/b.jpg"]);
    }

    #[test]
    fn test_mint_is_noop() {
        let sink = CollectingSink::new();
        let mut nuds = coin();
        let before = nuds.clone();
        mint(&mut nuds, "BBA", &sink).unwrap();
        assert_eq!(nuds, before);
    }
}
