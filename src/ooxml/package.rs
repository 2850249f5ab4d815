//! Boilerplate parts shared by the `.docx` and `.xlsx` writers.

use chrono::{SecondsFormat, Utc};

use super::xml::escape_xml;

pub const CONTENT_TYPES_PART: &str = "[Content_Types].xml";
pub const ROOT_RELS_PART: &str = "_rels/.rels";
pub const APP_PART: &str = "docProps/app.xml";
pub const CORE_PART: &str = "docProps/core.xml";

pub const REL_NS: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";
const PKG_REL_NS: &str = "http://schemas.openxmlformats.org/package/2006/relationships";
const OFFICE_DOCUMENT_REL: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument";

const XML_DECL: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#;

/// `[Content_Types].xml` with one override per `(part, content type)`.
pub fn content_types_xml(overrides: &[(String, &str)]) -> String {
    let mut out = String::from(XML_DECL);
    out.push_str(r#"<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">"#);
    out.push_str(r#"<Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>"#);
    out.push_str(r#"<Default Extension="xml" ContentType="application/xml"/>"#);
    for (part, content_type) in overrides {
        out.push_str(&format!(
            r#"<Override PartName="/{}" ContentType="{}"/>"#,
            escape_xml(part),
            content_type
        ));
    }
    out.push_str(
        r#"<Override PartName="/docProps/core.xml" ContentType="application/vnd.openxmlformats-package.core-properties+xml"/>"#,
    );
    out.push_str(
        r#"<Override PartName="/docProps/app.xml" ContentType="application/vnd.openxmlformats-officedocument.extended-properties+xml"/>"#,
    );
    out.push_str("</Types>");
    out
}

/// `_rels/.rels` pointing at the main part plus the two property parts.
pub fn root_rels_xml(main_part: &str) -> String {
    let mut out = String::from(XML_DECL);
    out.push_str(&format!(r#"<Relationships xmlns="{}">"#, PKG_REL_NS));
    out.push_str(&format!(
        r#"<Relationship Id="rId1" Type="{}" Target="{}"/>"#,
        OFFICE_DOCUMENT_REL, main_part
    ));
    out.push_str(r#"<Relationship Id="rId2" Type="http://schemas.openxmlformats.org/package/2006/relationships/metadata/core-properties" Target="docProps/core.xml"/>"#);
    out.push_str(r#"<Relationship Id="rId3" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/extended-properties" Target="docProps/app.xml"/>"#);
    out.push_str("</Relationships>");
    out
}

/// A part-level relationships file; `rels` are `(id, type, target)`.
pub fn part_rels_xml(rels: &[(String, &str, String)]) -> String {
    let mut out = String::from(XML_DECL);
    out.push_str(&format!(r#"<Relationships xmlns="{}">"#, PKG_REL_NS));
    for (id, type_, target) in rels {
        out.push_str(&format!(
            r#"<Relationship Id="{}" Type="{}" Target="{}"/>"#,
            id,
            type_,
            escape_xml(target)
        ));
    }
    out.push_str("</Relationships>");
    out
}

pub fn app_xml(application: &str) -> String {
    format!(
        r#"{}<Properties xmlns="http://schemas.openxmlformats.org/officeDocument/2006/extended-properties" xmlns:vt="http://schemas.openxmlformats.org/officeDocument/2006/docPropsVTypes"><Application>{}</Application></Properties>"#,
        XML_DECL,
        escape_xml(application)
    )
}

/// Core properties stamped with the current UTC time.
pub fn core_xml() -> String {
    let now = Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true);
    format!(
        r#"{decl}<cp:coreProperties xmlns:cp="http://schemas.openxmlformats.org/package/2006/metadata/core-properties" xmlns:dc="http://purl.org/dc/elements/1.1/" xmlns:dcterms="http://purl.org/dc/terms/" xmlns:dcmitype="http://purl.org/dc/dcmitype/" xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance"><dc:creator>docpreview</dc:creator><dcterms:created xsi:type="dcterms:W3CDTF">{now}</dcterms:created><dcterms:modified xsi:type="dcterms:W3CDTF">{now}</dcterms:modified></cp:coreProperties>"#,
        decl = XML_DECL,
        now = now
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_core_xml_has_timestamp() {
        let xml = core_xml();
        let doc = roxmltree::Document::parse(&xml).unwrap();
        let created = doc
            .descendants()
            .find(|n| n.tag_name().name() == "created")
            .and_then(|n| n.text())
            .unwrap();
        assert!(chrono::DateTime::parse_from_rfc3339(created).is_ok());
    }

    #[test]
    fn test_generated_parts_are_well_formed() {
        let overrides = vec![("word/document.xml".to_string(), "application/xml")];
        for xml in [
            content_types_xml(&overrides),
            root_rels_xml("word/document.xml"),
            part_rels_xml(&[("rId1".into(), "t", "a&b.xml".into())]),
            app_xml("docpreview"),
        ] {
            assert!(roxmltree::Document::parse(&xml).is_ok(), "{}", xml);
        }
    }
}
