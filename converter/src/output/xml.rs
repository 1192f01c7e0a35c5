//! NUDS XML serialization.
//!
//! Walks a [`Nuds`] document in schema order:
//!
//! ```text
//! <nuds xmlns=... recordType="physical">
//!   <control>     recordId, publicationStatus, maintenanceStatus,
//!                 maintenanceAgency, maintenanceHistory, rightsStmt
//!   <descMeta>    title+, descriptionSet?, typeDesc, physDesc?
//!   <digRep>?     mets:fileSec / mets:fileGrp / mets:file / mets:FLocat
//! ```

use std::borrow::Cow;
use std::io::Write;

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

use crate::error::OutputResult;
use crate::models::{
    Control, DescMeta, DigRep, MaintenanceEvent, Measurement, Nuds, DEFAULT_LANG, METS_NS,
    NUDS_NS, SCHEMA_LOCATION, TEI_NS, XLINK_NS, XSI_NS, XS_NS,
};

/// Serialize a document to an indented XML string.
pub fn to_xml_string(nuds: &Nuds) -> OutputResult<String> {
    let mut buffer = Vec::new();
    write_xml(&mut buffer, nuds)?;
    Ok(String::from_utf8_lossy(&buffer).into_owned())
}

/// Serialize a document to `writer`.
pub fn write_xml<W: Write>(writer: W, nuds: &Nuds) -> OutputResult<()> {
    let mut xml = Writer::new_with_indent(writer, b' ', 2);

    xml.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;

    let mut root = BytesStart::new("nuds");
    root.push_attribute(("xmlns", NUDS_NS));
    root.push_attribute(("xmlns:mets", METS_NS));
    root.push_attribute(("xmlns:tei", TEI_NS));
    root.push_attribute(("xmlns:xs", XS_NS));
    root.push_attribute(("xmlns:xlink", XLINK_NS));
    root.push_attribute(("xmlns:xsi", XSI_NS));
    root.push_attribute(("xsi:schemaLocation", SCHEMA_LOCATION));
    root.push_attribute(("recordType", nuds.record_type().as_str()));
    xml.write_event(Event::Start(root))?;

    write_control(&mut xml, &nuds.control)?;
    write_desc_meta(&mut xml, &nuds.desc_meta)?;
    if let Some(dig_rep) = &nuds.dig_rep {
        write_dig_rep(&mut xml, dig_rep)?;
    }

    xml.write_event(Event::End(BytesEnd::new("nuds")))?;
    xml.get_mut().write_all(b"\n")?;
    Ok(())
}

fn write_control<W: Write>(xml: &mut Writer<W>, control: &Control) -> OutputResult<()> {
    start(xml, "control")?;
    text_element(xml, BytesStart::new("recordId"), &control.record_id)?;
    text_element(
        xml,
        BytesStart::new("publicationStatus"),
        &control.publication_status,
    )?;
    text_element(
        xml,
        BytesStart::new("maintenanceStatus"),
        &control.maintenance_status,
    )?;

    start(xml, "maintenanceAgency")?;
    text_element(
        xml,
        BytesStart::new("agencyName"),
        &control.maintenance_agency.agency_name,
    )?;
    end(xml, "maintenanceAgency")?;

    start(xml, "maintenanceHistory")?;
    for event in &control.maintenance_history.events {
        write_event(xml, event)?;
    }
    end(xml, "maintenanceHistory")?;

    if control.rights_stmt.licenses.is_empty() {
        xml.write_event(Event::Empty(BytesStart::new("rightsStmt")))?;
    } else {
        start(xml, "rightsStmt")?;
        for license in &control.rights_stmt.licenses {
            let mut elem = BytesStart::new("license");
            push_attr(&mut elem, "for", &license.applies_to);
            push_attr(&mut elem, "xlink:type", &license.link_type);
            push_attr(&mut elem, "xlink:href", &license.href);
            xml.write_event(Event::Empty(elem))?;
        }
        end(xml, "rightsStmt")?;
    }

    end(xml, "control")
}

fn write_event<W: Write>(xml: &mut Writer<W>, event: &MaintenanceEvent) -> OutputResult<()> {
    start(xml, "maintenanceEvent")?;
    text_element(xml, BytesStart::new("eventType"), &event.event_type)?;

    let mut date_time = BytesStart::new("eventDateTime");
    if !event.event_date_time.standard_date_time.is_empty() {
        push_attr(
            &mut date_time,
            "standardDateTime",
            &event.event_date_time.standard_date_time,
        );
    }
    text_element(xml, date_time, &event.event_date_time.value)?;

    text_element(xml, BytesStart::new("agentType"), &event.agent_type)?;
    text_element(xml, BytesStart::new("agent"), &event.agent)?;
    end(xml, "maintenanceEvent")
}

fn write_desc_meta<W: Write>(xml: &mut Writer<W>, desc_meta: &DescMeta) -> OutputResult<()> {
    start(xml, "descMeta")?;

    // At least one title is required by the schema.
    if desc_meta.titles.is_empty() {
        let mut title = BytesStart::new("title");
        title.push_attribute(("xml:lang", DEFAULT_LANG));
        xml.write_event(Event::Empty(title))?;
    }
    for title in &desc_meta.titles {
        let mut elem = BytesStart::new("title");
        push_attr(&mut elem, "xml:lang", &title.lang);
        text_element(xml, elem, &title.value)?;
    }

    if let Some(set) = &desc_meta.description_set {
        start(xml, "descriptionSet")?;
        for description in &set.descriptions {
            let mut elem = BytesStart::new("description");
            if let Some(lang) = &description.lang {
                push_attr(&mut elem, "xml:lang", lang);
            }
            text_element(xml, elem, &description.value)?;
        }
        end(xml, "descriptionSet")?;
    }

    let type_desc = &desc_meta.type_desc;
    if type_desc.denominations.is_empty() && type_desc.materials.is_empty() {
        xml.write_event(Event::Empty(BytesStart::new("typeDesc")))?;
    } else {
        start(xml, "typeDesc")?;
        for denomination in &type_desc.denominations {
            text_element(xml, BytesStart::new("denomination"), &denomination.0)?;
        }
        for material in &type_desc.materials {
            let mut elem = BytesStart::new("material");
            if let Some(href) = &material.href {
                push_attr(&mut elem, "xlink:href", href);
            }
            if let Some(link_type) = &material.link_type {
                push_attr(&mut elem, "xlink:type", link_type);
            }
            text_element(xml, elem, &material.text)?;
        }
        end(xml, "typeDesc")?;
    }

    if let Some(phys_desc) = &desc_meta.phys_desc {
        start(xml, "physDesc")?;
        if let Some(set) = &phys_desc.measurements_set {
            start(xml, "measurementsSet")?;
            if let Some(diameter) = &set.diameter {
                measurement(xml, "diameter", diameter)?;
            }
            if let Some(weight) = &set.weight {
                measurement(xml, "weight", weight)?;
            }
            end(xml, "measurementsSet")?;
        }
        end(xml, "physDesc")?;
    }

    end(xml, "descMeta")
}

fn write_dig_rep<W: Write>(xml: &mut Writer<W>, dig_rep: &DigRep) -> OutputResult<()> {
    start(xml, "digRep")?;
    start(xml, "mets:fileSec")?;
    for group in &dig_rep.file_sec.file_grps {
        let mut grp = BytesStart::new("mets:fileGrp");
        push_attr(&mut grp, "USE", &group.usage);
        xml.write_event(Event::Start(grp))?;
        for file in &group.files {
            let mut elem = BytesStart::new("mets:file");
            push_attr(&mut elem, "USE", &file.usage);
            xml.write_event(Event::Start(elem))?;
            for location in &file.locations {
                let mut flocat = BytesStart::new("mets:FLocat");
                push_attr(&mut flocat, "LOCTYPE", &location.loc_type);
                push_attr(&mut flocat, "xlink:href", &location.href);
                xml.write_event(Event::Empty(flocat))?;
            }
            end(xml, "mets:file")?;
        }
        end(xml, "mets:fileGrp")?;
    }
    end(xml, "mets:fileSec")?;
    end(xml, "digRep")
}

fn measurement<W: Write>(
    xml: &mut Writer<W>,
    name: &str,
    measurement: &Measurement,
) -> OutputResult<()> {
    let mut elem = BytesStart::new(name);
    push_attr(&mut elem, "units", &measurement.units);
    text_element(xml, elem, &measurement.value)
}

fn start<W: Write>(xml: &mut Writer<W>, name: &str) -> OutputResult<()> {
    xml.write_event(Event::Start(BytesStart::new(name)))?;
    Ok(())
}

fn end<W: Write>(xml: &mut Writer<W>, name: &str) -> OutputResult<()> {
    xml.write_event(Event::End(BytesEnd::new(name)))?;
    Ok(())
}

/// `<name attrs>text</name>`, or `<name attrs/>` when `text` is empty.
fn text_element<W: Write>(xml: &mut Writer<W>, elem: BytesStart, text: &str) -> OutputResult<()> {
    if text.is_empty() {
        xml.write_event(Event::Empty(elem))?;
        return Ok(());
    }
    let name = String::from_utf8_lossy(elem.name().as_ref()).into_owned();
    xml.write_event(Event::Start(elem))?;
    xml.write_event(Event::Text(BytesText::new(&xml_chars(text))))?;
    xml.write_event(Event::End(BytesEnd::new(name)))?;
    Ok(())
}

/// Push an attribute whose value comes from input data.
fn push_attr(elem: &mut BytesStart<'_>, key: &str, value: &str) {
    elem.push_attribute((key, xml_chars(value).as_ref()));
}

/// Replace characters outside the XML 1.0 `Char` production with U+FFFD.
/// quick-xml escapes markup characters only.
fn xml_chars(text: &str) -> Cow<'_, str> {
    if text.chars().all(is_xml_char) {
        return Cow::Borrowed(text);
    }
    Cow::Owned(
        text.chars()
            .map(|c| if is_xml_char(c) { c } else { '\u{FFFD}' })
            .collect(),
    )
}

fn is_xml_char(c: char) -> bool {
    matches!(
        c,
        '\t' | '\n' | '\r' | '\u{20}'..='\u{D7FF}' | '\u{E000}'..='\u{FFFD}' | '\u{10000}'..='\u{10FFFF}'
    )
}
