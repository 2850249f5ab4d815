//! Word (`.docx`) paragraph text extraction and regeneration.
//!
//! Only paragraph text survives a round trip: runs are merged, and styles,
//! tables and images are dropped.

use lazy_static::lazy_static;
use quick_xml::Reader;
use quick_xml::events::Event;
use regex::Regex;

use crate::error::Result;
use crate::zip::{ZipArchive, ZipBuilder};

use super::package::{self, REL_NS};
use super::xml::{decode_entities, escape_html, escape_xml, xml_error};

pub const DOCUMENT_PART: &str = "word/document.xml";
const DOCUMENT_RELS_PART: &str = "word/_rels/document.xml.rels";
const STYLES_PART: &str = "word/styles.xml";

const WORD_NS: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";
const DOCUMENT_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml";
const STYLES_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.styles+xml";

lazy_static! {
    static ref HTML_TOKEN: Regex = Regex::new(
        r"(?s)<!--.*?-->|<(/?)([A-Za-z][A-Za-z0-9:-]*)(?:[^>]*?)(/?)>|<!?[^>]*>|[^<]+|<"
    )
    .unwrap();
}

/// Elements that never have content or a closing tag.
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

/// Render the paragraphs of a `.docx` package as `<p>` elements.
///
/// Each `<w:p>` becomes one `<p>` holding the concatenated text of its
/// `<w:t>` runs, HTML-escaped. A document without paragraphs yields a single
/// empty `<p></p>`.
///
/// # Errors
///
/// Container errors from [`ZipArchive`], [`crate::PreviewError::NotFound`]
/// when `word/document.xml` is missing, and [`crate::PreviewError::Xml`]
/// when it is not well formed.
pub fn extract_html(zip_bytes: &[u8]) -> Result<String> {
    let archive = ZipArchive::from_bytes(zip_bytes.to_vec())?;
    let xml = archive.read_text(DOCUMENT_PART)?;
    let paragraphs = read_paragraphs(&xml)?;

    log::debug!("docx: {} paragraphs", paragraphs.len());

    if paragraphs.is_empty() {
        return Ok("<p></p>".to_string());
    }
    Ok(paragraphs
        .iter()
        .map(|p| format!("<p>{}</p>", escape_html(p)))
        .collect())
}

/// Collect the run text of every `<w:p>` in document order, whatever
/// prefix the document binds to the WordprocessingML namespace.
fn read_paragraphs(xml: &str) -> Result<Vec<String>> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(false);

    let mut buf = Vec::new();
    let mut paragraphs = Vec::new();
    let mut current = String::new();
    // Text boxes can nest paragraphs; their text joins the outer one.
    let mut depth = 0usize;
    let mut in_text = false;

    loop {
        let event = reader
            .read_event_into(&mut buf)
            .map_err(|_| xml_error(DOCUMENT_PART))?;
        match event {
            Event::Start(e) => match e.local_name().as_ref() {
                b"p" => depth += 1,
                b"t" => in_text = depth > 0,
                _ => {}
            },
            Event::Empty(e) if e.local_name().as_ref() == b"p" && depth == 0 => {
                paragraphs.push(String::new());
            }
            Event::End(e) => match e.local_name().as_ref() {
                b"p" => {
                    depth = depth.saturating_sub(1);
                    if depth == 0 {
                        paragraphs.push(std::mem::take(&mut current));
                    }
                }
                b"t" => in_text = false,
                _ => {}
            },
            Event::Text(e) if in_text => {
                let text = e.unescape().map_err(|_| xml_error(DOCUMENT_PART))?;
                current.push_str(&text);
            }
            Event::CData(e) if in_text => {
                current.push_str(&String::from_utf8_lossy(&e.into_inner()));
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    Ok(paragraphs)
}

/// Split an HTML fragment into plain-text paragraphs.
///
/// Each top-level `<p>` element becomes one entry, even when blank. Any
/// other top-level element or text node becomes one (trimmed) entry when
/// its text is not blank. An empty result is a single blank paragraph.
pub fn html_paragraphs(html: &str) -> Vec<String> {
    enum Node {
        Paragraph,
        Other,
    }

    fn finish(node: Node, text: String, out: &mut Vec<String>) {
        match node {
            Node::Paragraph => out.push(text),
            Node::Other if !text.trim().is_empty() => out.push(text.trim().to_string()),
            Node::Other => {}
        }
    }

    let mut out = Vec::new();
    let mut open: Option<(Node, String)> = None;
    let mut depth = 0usize;

    for caps in HTML_TOKEN.captures_iter(html) {
        let token = &caps[0];

        let Some(name) = caps.get(2) else {
            if token.starts_with("<!") || (token.starts_with('<') && token.len() > 1) {
                // Comments, doctype and processing instructions
                continue;
            }
            let text = decode_entities(token);
            match open.as_mut() {
                Some((_, buf)) => buf.push_str(&text),
                None if !text.trim().is_empty() => out.push(text.trim().to_string()),
                None => {}
            }
            continue;
        };

        let name = name.as_str().to_ascii_lowercase();
        let closing = !caps[1].is_empty();
        let self_closing = !caps[3].is_empty() || VOID_ELEMENTS.contains(&name.as_str());

        if closing {
            if depth > 0 {
                depth -= 1;
                if depth == 0 {
                    if let Some((node, text)) = open.take() {
                        finish(node, text, &mut out);
                    }
                }
            }
            continue;
        }
        if self_closing {
            continue;
        }

        // An unclosed <p> ends where the next top-level <p> starts.
        if name == "p" && depth == 1 && matches!(open, Some((Node::Paragraph, _))) {
            if let Some((node, text)) = open.take() {
                finish(node, text, &mut out);
            }
            depth = 0;
        }

        if depth == 0 {
            let node = if name == "p" {
                Node::Paragraph
            } else {
                Node::Other
            };
            open = Some((node, String::new()));
        }
        depth += 1;
    }

    if let Some((node, text)) = open.take() {
        finish(node, text, &mut out);
    }

    if out.is_empty() {
        out.push(String::new());
    }
    out
}

/// Build a minimal `.docx` package from an HTML fragment.
///
/// The fragment is flattened with [`html_paragraphs`]; every paragraph is
/// written as a single run.
pub fn create_document(html: &str) -> Result<Vec<u8>> {
    let paragraphs = html_paragraphs(html);

    let mut builder = ZipBuilder::new();
    builder.add_file(
        package::CONTENT_TYPES_PART,
        package::content_types_xml(&[
            (DOCUMENT_PART.to_string(), DOCUMENT_CONTENT_TYPE),
            (STYLES_PART.to_string(), STYLES_CONTENT_TYPE),
        ])
        .into_bytes(),
    )?;
    builder.add_file(
        package::ROOT_RELS_PART,
        package::root_rels_xml(DOCUMENT_PART).into_bytes(),
    )?;
    builder.add_file(package::APP_PART, package::app_xml("docpreview").into_bytes())?;
    builder.add_file(package::CORE_PART, package::core_xml().into_bytes())?;
    builder.add_file(
        DOCUMENT_RELS_PART,
        package::part_rels_xml(&[]).into_bytes(),
    )?;
    builder.add_file(STYLES_PART, styles_xml().into_bytes())?;
    builder.add_file(DOCUMENT_PART, document_xml(&paragraphs).into_bytes())?;

    Ok(builder.build())
}

fn document_xml(paragraphs: &[String]) -> String {
    let mut out = String::from(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
    out.push_str(&format!(
        r#"<w:document xmlns:w="{}" xmlns:r="{}"><w:body>"#,
        WORD_NS, REL_NS
    ));
    for paragraph in paragraphs {
        out.push_str(r#"<w:p><w:r><w:t xml:space="preserve">"#);
        out.push_str(&escape_xml(paragraph));
        out.push_str("</w:t></w:r></w:p>");
    }
    out.push_str(r#"<w:sectPr><w:pgSz w:w="11906" w:h="16838"/></w:sectPr></w:body></w:document>"#);
    out
}

fn styles_xml() -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><w:styles xmlns:w="{}"><w:docDefaults><w:rPrDefault><w:rPr><w:sz w:val="22"/></w:rPr></w:rPrDefault></w:docDefaults><w:style w:type="paragraph" w:default="1" w:styleId="Normal"><w:name w:val="Normal"/></w:style></w:styles>"#,
        WORD_NS
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PreviewError;

    fn package_with_document(xml: &str) -> Vec<u8> {
        let mut builder = ZipBuilder::new();
        builder.add_file(DOCUMENT_PART, xml.as_bytes().to_vec()).unwrap();
        builder.build()
    }

    #[test]
    fn test_two_paragraphs() {
        let xml = r#"<w:document xmlns:w="x"><w:body>
            <w:p><w:r><w:t>Hello</w:t></w:r></w:p>
            <w:p><w:r><w:t>World</w:t></w:r></w:p>
        </w:body></w:document>"#;
        assert_eq!(
            extract_html(&package_with_document(xml)).unwrap(),
            "<p>Hello</p><p>World</p>"
        );
    }

    #[test]
    fn test_runs_concatenate_and_escape() {
        let xml = r#"<w:document xmlns:w="x"><w:body><w:p>
            <w:r><w:t xml:space="preserve">Fish </w:t></w:r><w:r><w:t>&amp; Chips &lt;3</w:t></w:r>
        </w:p><w:p/></w:body></w:document>"#;
        assert_eq!(
            extract_html(&package_with_document(xml)).unwrap(),
            "<p>Fish &amp; Chips &lt;3</p><p></p>"
        );
    }

    #[test]
    fn test_other_namespace_prefix() {
        let xml = format!(
            r#"<wp:document xmlns:wp="{}"><wp:body>
            <wp:p><wp:r><wp:t>Hello</wp:t></wp:r></wp:p>
            <wp:p/>
            </wp:body></wp:document>"#,
            WORD_NS
        );
        assert_eq!(
            extract_html(&package_with_document(&xml)).unwrap(),
            "<p>Hello</p><p></p>"
        );
    }

    #[test]
    fn test_empty_document() {
        let xml = r#"<w:document xmlns:w="x"><w:body/></w:document>"#;
        assert_eq!(extract_html(&package_with_document(xml)).unwrap(), "<p></p>");
    }

    #[test]
    fn test_missing_document_part() {
        let bytes = ZipBuilder::new().build();
        assert_eq!(
            extract_html(&bytes),
            Err(PreviewError::NotFound(DOCUMENT_PART.into()))
        );
    }

    #[test]
    fn test_malformed_xml() {
        let xml = "<w:document><w:body><w:p></w:body></w:document>";
        assert_eq!(
            extract_html(&package_with_document(xml)),
            Err(PreviewError::Xml(DOCUMENT_PART.into()))
        );
    }

    #[test]
    fn test_html_paragraphs() {
        assert_eq!(
            html_paragraphs("<p>One</p>\n<p></p><div>Two <b>bold</b></div>  loose  <span> </span>"),
            vec!["One", "", "Two bold", "loose"]
        );
        assert_eq!(html_paragraphs("<p>a &amp; b<br>c</p>"), vec!["a & bc"]);
        assert_eq!(html_paragraphs("<p>first<p>second"), vec!["first", "second"]);
        assert_eq!(html_paragraphs("<!-- note -->"), vec![""]);
        assert_eq!(html_paragraphs(""), vec![""]);
    }

    #[test]
    fn test_create_then_extract() {
        let bytes = create_document("<p>Hello</p><p>Tom &amp; Jerry</p>").unwrap();
        let archive = ZipArchive::from_bytes(bytes.clone()).unwrap();
        for part in [
            "[Content_Types].xml",
            "_rels/.rels",
            "docProps/app.xml",
            "docProps/core.xml",
            "word/_rels/document.xml.rels",
            "word/styles.xml",
            "word/document.xml",
        ] {
            assert!(archive.contains(part), "missing {}", part);
        }
        assert_eq!(
            extract_html(&bytes).unwrap(),
            "<p>Hello</p><p>Tom &amp; Jerry</p>"
        );
    }
}
