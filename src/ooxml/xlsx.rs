//! Excel (`.xlsx`) cell text extraction and regeneration.
//!
//! Cells are read as display text only: no formulas, number formats,
//! styles or merged ranges.

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use std::collections::HashMap;

use crate::error::{PreviewError, Result};
use crate::zip::{ZipArchive, ZipBuilder};

use super::package::{self, REL_NS};
use super::xml::{escape_xml, resolve_target, xml_error};

const WORKBOOK_PART: &str = "xl/workbook.xml";
const WORKBOOK_RELS_PART: &str = "xl/_rels/workbook.xml.rels";
const SHARED_STRINGS_PART: &str = "xl/sharedStrings.xml";
const STYLES_PART: &str = "xl/styles.xml";

const SHEET_NS: &str = "http://schemas.openxmlformats.org/spreadsheetml/2006/main";
const WORKBOOK_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml";
const WORKSHEET_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml";
const STYLES_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.styles+xml";
const WORKSHEET_REL: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet";
const STYLES_REL: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles";
const STRICT_REL_NS: &str = "http://purl.oclc.org/ooxml/officeDocument/relationships";

/// Rows addressable by a worksheet.
pub const MAX_ROWS: usize = 1_048_576;
/// Columns addressable by a worksheet (`A` to `XFD`).
pub const MAX_COLS: usize = 16_384;

/// Rows of cell strings. Rows may differ in length.
pub type Grid = Vec<Vec<String>>;

/// One worksheet: its tab name and cell text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sheet {
    pub name: String,
    pub grid: Grid,
}

impl Sheet {
    pub fn new(name: impl Into<String>, grid: Grid) -> Self {
        Self {
            name: name.into(),
            grid,
        }
    }
}

/// Zero-based column index of a column reference such as `A`, `AB` or
/// the letter part of `AB12`.
pub fn column_index(reference: &str) -> Option<usize> {
    let letters: &str = reference
        .split(|c: char| c.is_ascii_digit())
        .next()
        .unwrap_or_default();
    if letters.is_empty() || !letters.chars().all(|c| c.is_ascii_alphabetic()) {
        return None;
    }
    letters.chars().try_fold(0usize, |acc, c| {
        let digit = (c.to_ascii_uppercase() as u8 - b'A') as usize + 1;
        acc.checked_mul(26)?.checked_add(digit)
    })
    .map(|n| n - 1)
}

/// Column letters for a zero-based index: 0 → `A`, 26 → `AA`.
pub fn column_name(mut index: usize) -> String {
    let mut letters = Vec::new();
    loop {
        letters.push(b'A' + (index % 26) as u8);
        if index < 26 {
            break;
        }
        index = index / 26 - 1;
    }
    letters.iter().rev().map(|&b| b as char).collect()
}

/// True when the zero-based `(row, col)` lies inside a worksheet.
pub fn in_sheet(row: usize, col: usize) -> bool {
    row < MAX_ROWS && col < MAX_COLS
}

/// `A1`-style reference for zero-based coordinates.
pub fn cell_reference(row: usize, col: usize) -> String {
    format!("{}{}", column_name(col), row + 1)
}

/// Read every worksheet of an `.xlsx` package, in workbook order.
///
/// `xl/sharedStrings.xml` is optional; without it shared-string cells read
/// as empty text.
///
/// # Errors
///
/// Container errors, [`PreviewError::NotFound`] for missing workbook or
/// worksheet parts, [`PreviewError::Xml`] for malformed XML, and
/// [`PreviewError::Format`] when the workbook declares no sheets, a sheet
/// relationship cannot be resolved, or a cell lies outside the sheet limits.
pub fn extract_sheets(zip_bytes: &[u8]) -> Result<Vec<Sheet>> {
    let archive = ZipArchive::from_bytes(zip_bytes.to_vec())?;

    let declared = parse_workbook(&archive.read_text(WORKBOOK_PART)?)?;
    if declared.is_empty() {
        return Err(PreviewError::Format("workbook has no sheets".into()));
    }
    let targets = parse_relationships(&archive.read_text(WORKBOOK_RELS_PART)?)?;

    let shared = match archive.read_text(SHARED_STRINGS_PART) {
        Ok(xml) => parse_shared_strings(&xml)?,
        Err(PreviewError::NotFound(_)) => Vec::new(),
        Err(e) => return Err(e),
    };

    let mut sheets = Vec::with_capacity(declared.len());
    for (name, rel_id) in declared {
        let target = targets.get(&rel_id).ok_or_else(|| {
            PreviewError::Format(format!("sheet '{}' has no worksheet part", name))
        })?;
        let part = resolve_target("xl", target);
        let grid = parse_worksheet(&archive.read_text(&part)?, &shared, &part)?;
        log::debug!("xlsx: sheet '{}' from {} has {} rows", name, part, grid.len());
        sheets.push(Sheet { name, grid });
    }

    Ok(sheets)
}

/// `(name, relationship id)` of each `<sheet>`, in order.
fn parse_workbook(xml: &str) -> Result<Vec<(String, String)>> {
    let doc = roxmltree::Document::parse(xml).map_err(|_| xml_error(WORKBOOK_PART))?;
    doc.descendants()
        .filter(|n| n.is_element() && n.tag_name().name() == "sheet")
        .map(|n| -> Result<(String, String)> {
            let name = n.attribute("name").unwrap_or_default();
            let id = n
                .attributes()
                .find(|a| {
                    a.name() == "id" && matches!(a.namespace(), Some(REL_NS | STRICT_REL_NS))
                })
                .ok_or_else(|| {
                    PreviewError::Format(format!("sheet '{}' has no relationship id", name))
                })?;
            Ok((name.to_string(), id.value().to_string()))
        })
        .collect()
}

/// Relationship id → target.
fn parse_relationships(xml: &str) -> Result<HashMap<String, String>> {
    let doc = roxmltree::Document::parse(xml).map_err(|_| xml_error(WORKBOOK_RELS_PART))?;
    Ok(doc
        .descendants()
        .filter(|n| n.is_element() && n.tag_name().name() == "Relationship")
        .filter_map(|n| Some((n.attribute("Id")?.to_string(), n.attribute("Target")?.to_string())))
        .collect())
}

/// Each `<si>` as plain text; phonetic `<rPh>` runs are skipped.
fn parse_shared_strings(xml: &str) -> Result<Vec<String>> {
    let err = || xml_error(SHARED_STRINGS_PART);
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(false);

    let mut buf = Vec::new();
    let mut items = Vec::new();
    let mut current: Option<String> = None;
    let mut in_text = false;
    let mut in_phonetic = false;

    loop {
        match reader.read_event_into(&mut buf).map_err(|_| err())? {
            Event::Start(e) => match e.local_name().as_ref() {
                b"si" => current = Some(String::new()),
                b"rPh" => in_phonetic = true,
                b"t" => in_text = current.is_some() && !in_phonetic,
                _ => {}
            },
            Event::Empty(e) if e.local_name().as_ref() == b"si" => items.push(String::new()),
            Event::End(e) => match e.local_name().as_ref() {
                b"si" => items.extend(current.take()),
                b"rPh" => in_phonetic = false,
                b"t" => in_text = false,
                _ => {}
            },
            Event::Text(e) if in_text => {
                if let Some(s) = current.as_mut() {
                    s.push_str(&e.unescape().map_err(|_| err())?);
                }
            }
            Event::CData(e) if in_text => {
                if let Some(s) = current.as_mut() {
                    s.push_str(&String::from_utf8_lossy(&e.into_inner()));
                }
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    Ok(items)
}

/// How a cell's text is stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CellType {
    Shared,
    Inline,
    Raw,
}

/// A `<c>` element being read.
struct OpenCell {
    col: usize,
    kind: CellType,
    value: String,
    inline: String,
}

fn attribute(e: &BytesStart<'_>, name: &[u8], part: &str) -> Result<Option<String>> {
    match e.try_get_attribute(name).map_err(|_| xml_error(part))? {
        Some(attr) => Ok(Some(
            attr.unescape_value().map_err(|_| xml_error(part))?.into_owned(),
        )),
        None => Ok(None),
    }
}

/// Place `value` at `(row, col)`, padding with empty strings.
///
/// Callers keep `(row, col)` within [`in_sheet`]; the grid grows to fit.
pub(crate) fn put_cell(grid: &mut Grid, row: usize, col: usize, value: String) {
    if grid.len() <= row {
        grid.resize_with(row + 1, Vec::new);
    }
    let cells = &mut grid[row];
    if cells.len() <= col {
        cells.resize(col + 1, String::new());
    }
    cells[col] = value;
}

fn parse_worksheet(xml: &str, shared: &[String], part: &str) -> Result<Grid> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(false);

    let mut buf = Vec::new();
    let mut grid = Grid::new();
    let mut row = 0usize;
    let mut next_row = 0usize;
    let mut next_col = 0usize;
    let mut cell: Option<OpenCell> = None;
    let mut in_value = false;
    let mut in_inline = false;
    let mut in_inline_text = false;
    let mut in_phonetic = false;

    loop {
        let event = reader.read_event_into(&mut buf).map_err(|_| xml_error(part))?;
        match event {
            Event::Start(ref e) | Event::Empty(ref e) if e.local_name().as_ref() == b"row" => {
                row = attribute(e, b"r", part)?
                    .and_then(|r| r.trim().parse::<usize>().ok())
                    .and_then(|r| r.checked_sub(1))
                    .unwrap_or(next_row);
                if row >= MAX_ROWS {
                    return Err(PreviewError::Format(format!(
                        "row {} is beyond the last row in {}",
                        row + 1,
                        part
                    )));
                }
                next_row = row + 1;
                next_col = 0;
            }
            Event::Start(ref e) | Event::Empty(ref e) if e.local_name().as_ref() == b"c" => {
                let col = attribute(e, b"r", part)?
                    .and_then(|r| column_index(&r))
                    .unwrap_or(next_col);
                if col >= MAX_COLS {
                    return Err(PreviewError::Format(format!(
                        "cell {} is beyond the last column in {}",
                        cell_reference(row, col),
                        part
                    )));
                }
                next_col = col + 1;
                let kind = match attribute(e, b"t", part)?.as_deref() {
                    Some("s") => CellType::Shared,
                    Some("inlineStr") => CellType::Inline,
                    _ => CellType::Raw,
                };
                if matches!(event, Event::Start(_)) {
                    cell = Some(OpenCell {
                        col,
                        kind,
                        value: String::new(),
                        inline: String::new(),
                    });
                }
            }
            Event::Start(ref e) if cell.is_some() => match e.local_name().as_ref() {
                b"v" => in_value = true,
                b"is" => in_inline = true,
                b"rPh" => in_phonetic = true,
                b"t" => in_inline_text = in_inline && !in_phonetic,
                _ => {}
            },
            Event::End(ref e) => match e.local_name().as_ref() {
                b"v" => in_value = false,
                b"is" => in_inline = false,
                b"rPh" => in_phonetic = false,
                b"t" => in_inline_text = false,
                b"c" => {
                    if let Some(open) = cell.take() {
                        let text = match open.kind {
                            CellType::Shared => open
                                .value
                                .trim()
                                .parse::<usize>()
                                .ok()
                                .and_then(|i| shared.get(i).cloned())
                                .unwrap_or_default(),
                            CellType::Inline => open.inline,
                            CellType::Raw => open.value,
                        };
                        put_cell(&mut grid, row, open.col, text);
                    }
                }
                _ => {}
            },
            Event::Text(ref e) if in_value || in_inline_text => {
                let text = e.unescape().map_err(|_| xml_error(part))?;
                if let Some(open) = cell.as_mut() {
                    if in_value {
                        open.value.push_str(&text);
                    } else {
                        open.inline.push_str(&text);
                    }
                }
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    Ok(grid)
}

/// Build a minimal `.xlsx` workbook, one worksheet per sheet.
///
/// Every cell is written as an inline string at its computed reference.
///
/// # Errors
///
/// [`PreviewError::Validation`] when there are no sheets or two sheets
/// share a name (compared case-insensitively, as Excel does).
pub fn create_workbook(sheets: &[Sheet]) -> Result<Vec<u8>> {
    if sheets.is_empty() {
        return Err(PreviewError::Validation(
            "a workbook needs at least one sheet".into(),
        ));
    }
    for (i, sheet) in sheets.iter().enumerate() {
        if sheets[..i]
            .iter()
            .any(|s| s.name.to_lowercase() == sheet.name.to_lowercase())
        {
            return Err(PreviewError::Validation(format!(
                "duplicate sheet name '{}'",
                sheet.name
            )));
        }
    }

    let sheet_parts: Vec<String> = (1..=sheets.len())
        .map(|n| format!("xl/worksheets/sheet{}.xml", n))
        .collect();

    let mut overrides = vec![
        (WORKBOOK_PART.to_string(), WORKBOOK_CONTENT_TYPE),
        (STYLES_PART.to_string(), STYLES_CONTENT_TYPE),
    ];
    overrides.extend(sheet_parts.iter().map(|p| (p.clone(), WORKSHEET_CONTENT_TYPE)));

    let mut rels: Vec<(String, &str, String)> = (1..=sheets.len())
        .map(|n| {
            (
                format!("rId{}", n),
                WORKSHEET_REL,
                format!("worksheets/sheet{}.xml", n),
            )
        })
        .collect();
    rels.push((
        format!("rId{}", sheets.len() + 1),
        STYLES_REL,
        "styles.xml".to_string(),
    ));

    let mut builder = ZipBuilder::new();
    builder.add_file(
        package::CONTENT_TYPES_PART,
        package::content_types_xml(&overrides).into_bytes(),
    )?;
    builder.add_file(
        package::ROOT_RELS_PART,
        package::root_rels_xml(WORKBOOK_PART).into_bytes(),
    )?;
    builder.add_file(package::APP_PART, package::app_xml("docpreview").into_bytes())?;
    builder.add_file(package::CORE_PART, package::core_xml().into_bytes())?;
    builder.add_file(WORKBOOK_RELS_PART, package::part_rels_xml(&rels).into_bytes())?;
    builder.add_file(STYLES_PART, styles_xml().into_bytes())?;
    builder.add_file(WORKBOOK_PART, workbook_xml(sheets).into_bytes())?;
    for (sheet, part) in sheets.iter().zip(&sheet_parts) {
        builder.add_file(part.as_str(), worksheet_xml(&sheet.grid).into_bytes())?;
    }

    Ok(builder.build())
}

fn workbook_xml(sheets: &[Sheet]) -> String {
    let mut out = String::from(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
    out.push_str(&format!(
        r#"<workbook xmlns="{}" xmlns:r="{}"><sheets>"#,
        SHEET_NS, REL_NS
    ));
    for (i, sheet) in sheets.iter().enumerate() {
        out.push_str(&format!(
            r#"<sheet name="{}" sheetId="{}" r:id="rId{}"/>"#,
            escape_xml(&sheet.name),
            i + 1,
            i + 1
        ));
    }
    out.push_str("</sheets></workbook>");
    out
}

fn worksheet_xml(grid: &Grid) -> String {
    let mut out = String::from(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
    out.push_str(&format!(r#"<worksheet xmlns="{}"><sheetData>"#, SHEET_NS));
    for (r, cells) in grid.iter().enumerate() {
        if cells.is_empty() {
            continue;
        }
        out.push_str(&format!(r#"<row r="{}">"#, r + 1));
        for (c, value) in cells.iter().enumerate() {
            out.push_str(&format!(
                r#"<c r="{}" t="inlineStr"><is><t xml:space="preserve">{}</t></is></c>"#,
                cell_reference(r, c),
                escape_xml(value)
            ));
        }
        out.push_str("</row>");
    }
    out.push_str("</sheetData></worksheet>");
    out
}

fn styles_xml() -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><styleSheet xmlns="{}"><fonts count="1"><font><sz val="11"/><name val="Calibri"/></font></fonts><fills count="1"><fill><patternFill patternType="none"/></fill></fills><borders count="1"><border><left/><right/><top/><bottom/><diagonal/></border></borders><cellStyleXfs count="1"><xf numFmtId="0" fontId="0" fillId="0" borderId="0"/></cellStyleXfs><cellXfs count="1"><xf numFmtId="0" fontId="0" fillId="0" borderId="0" xfId="0"/></cellXfs></styleSheet>"#,
        SHEET_NS
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    const WORKBOOK: &str = r#"<workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships"><sheets><sheet name="Summary" sheetId="1" r:id="rId7"/></sheets></workbook>"#;
    const RELS: &str = r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId7" Type="worksheet" Target="/xl/worksheets/data.xml"/></Relationships>"#;

    fn package(parts: &[(&str, &str)]) -> Vec<u8> {
        let mut builder = ZipBuilder::new();
        for (name, xml) in parts {
            builder.add_file(*name, xml.as_bytes().to_vec()).unwrap();
        }
        builder.build()
    }

    #[test]
    fn test_shared_and_inline_cells() {
        let sst = r#"<sst><si><t>Total</t></si></sst>"#;
        let sheet = r#"<worksheet><sheetData><row r="1">
            <c r="A1" t="s"><v>0</v></c>
            <c r="B1" t="inlineStr"><is><t>42</t></is></c>
        </row></sheetData></worksheet>"#;
        let bytes = package(&[
            (WORKBOOK_PART, WORKBOOK),
            (WORKBOOK_RELS_PART, RELS),
            (SHARED_STRINGS_PART, sst),
            ("xl/worksheets/data.xml", sheet),
        ]);

        let sheets = extract_sheets(&bytes).unwrap();
        assert_eq!(sheets, vec![Sheet::new("Summary", vec![vec!["Total".into(), "42".into()]])]);
    }

    #[test]
    fn test_gaps_and_missing_shared_strings() {
        let sheet = r#"<worksheet><sheetData>
            <row r="2"><c r="C2"><v>3.5</v></c></row>
            <row><c t="s"><v>4</v></c><c><f>1+1</f><v>2</v></c></row>
        </sheetData></worksheet>"#;
        let bytes = package(&[
            (WORKBOOK_PART, WORKBOOK),
            (WORKBOOK_RELS_PART, RELS),
            ("xl/worksheets/data.xml", sheet),
        ]);

        let grid = extract_sheets(&bytes).unwrap().remove(0).grid;
        assert_eq!(
            grid,
            vec![
                vec![],
                vec!["".to_string(), "".into(), "3.5".into()],
                vec!["".to_string(), "2".into()],
            ]
        );
    }

    #[test]
    fn test_rich_and_phonetic_shared_strings() {
        let sst = r#"<sst><si><r><t>Hel</t></r><r><rPr/><t>lo</t></r><rPh><t>ignored</t></rPh></si><si/></sst>"#;
        assert_eq!(parse_shared_strings(sst).unwrap(), vec!["Hello", ""]);
    }

    #[test]
    fn test_no_sheets() {
        let bytes = package(&[
            (WORKBOOK_PART, "<workbook><sheets/></workbook>"),
            (WORKBOOK_RELS_PART, RELS),
        ]);
        assert_eq!(
            extract_sheets(&bytes),
            Err(PreviewError::Format("workbook has no sheets".into()))
        );
    }

    #[test]
    fn test_unresolved_relationship() {
        let rels = r#"<Relationships><Relationship Id="rId1" Target="x.xml"/></Relationships>"#;
        let bytes = package(&[(WORKBOOK_PART, WORKBOOK), (WORKBOOK_RELS_PART, rels)]);
        assert!(matches!(extract_sheets(&bytes), Err(PreviewError::Format(_))));
    }

    #[test]
    fn test_cells_beyond_sheet_limits() {
        for sheet in [
            r#"<worksheet><sheetData><row r="1"><c r="ZZZZZZZZZZZZ1" t="inlineStr"><is><t>x</t></is></c></row></sheetData></worksheet>"#,
            r#"<worksheet><sheetData><row r="1"><c r="XFE1"><v>1</v></c></row></sheetData></worksheet>"#,
            r#"<worksheet><sheetData><row r="4000000000"><c><v>1</v></c></row></sheetData></worksheet>"#,
            r#"<worksheet><sheetData><row r="1048576"/><row><c><v>1</v></c></row></sheetData></worksheet>"#,
        ] {
            let bytes = package(&[
                (WORKBOOK_PART, WORKBOOK),
                (WORKBOOK_RELS_PART, RELS),
                ("xl/worksheets/data.xml", sheet),
            ]);
            assert!(
                matches!(extract_sheets(&bytes), Err(PreviewError::Format(_))),
                "accepted {}",
                sheet
            );
        }
        assert!(in_sheet(MAX_ROWS - 1, MAX_COLS - 1));
        assert!(!in_sheet(MAX_ROWS, 0));
        assert!(!in_sheet(0, MAX_COLS));
    }

    #[test]
    fn test_strict_and_missing_relationship_ids() {
        let strict = r#"<workbook xmlns="http://purl.oclc.org/ooxml/spreadsheetml/main" xmlns:r="http://purl.oclc.org/ooxml/officeDocument/relationships"><sheets><sheet name="Summary" sheetId="1" r:id="rId7"/></sheets></workbook>"#;
        let sheet = r#"<worksheet><sheetData><row><c><v>1</v></c></row></sheetData></worksheet>"#;
        let bytes = package(&[
            (WORKBOOK_PART, strict),
            (WORKBOOK_RELS_PART, RELS),
            ("xl/worksheets/data.xml", sheet),
        ]);
        assert_eq!(
            extract_sheets(&bytes).unwrap(),
            vec![Sheet::new("Summary", vec![vec!["1".into()]])]
        );

        let foreign = r#"<workbook xmlns:o="urn:other"><sheets><sheet name="Lost" o:id="rId7"/></sheets></workbook>"#;
        let bytes = package(&[(WORKBOOK_PART, foreign), (WORKBOOK_RELS_PART, RELS)]);
        assert_eq!(
            extract_sheets(&bytes),
            Err(PreviewError::Format("sheet 'Lost' has no relationship id".into()))
        );
    }

    #[test]
    fn test_column_helpers() {
        assert_eq!(column_index("A"), Some(0));
        assert_eq!(column_index("Z9"), Some(25));
        assert_eq!(column_index("AA1"), Some(26));
        assert_eq!(column_index("xfd"), Some(16383));
        assert_eq!(column_index("12"), None);
        assert_eq!(column_name(0), "A");
        assert_eq!(column_name(27), "AB");
        assert_eq!(column_name(16383), "XFD");
        assert_eq!(cell_reference(2, 1), "B3");
    }

    #[test]
    fn test_create_then_extract() {
        let sheets = vec![
            Sheet::new(
                "People",
                vec![
                    vec!["Name".into(), "Age".into()],
                    vec!["Ada & Co".into(), "36".into()],
                ],
            ),
            Sheet::new("Empty", vec![]),
        ];
        let bytes = create_workbook(&sheets).unwrap();
        let archive = ZipArchive::from_bytes(bytes.clone()).unwrap();
        assert!(archive.contains("xl/worksheets/sheet2.xml"));
        assert!(archive.contains("xl/styles.xml"));
        assert_eq!(extract_sheets(&bytes).unwrap(), sheets);
    }

    #[test]
    fn test_create_rejects_duplicates_and_empty() {
        assert!(matches!(create_workbook(&[]), Err(PreviewError::Validation(_))));
        let sheets = [Sheet::new("Data", vec![]), Sheet::new("data", vec![])];
        assert!(matches!(create_workbook(&sheets), Err(PreviewError::Validation(_))));
    }
}
