use std::io::Cursor;

use crate::error::{PreviewError, Result};
use crate::ooxml::{extract_html, extract_sheets};
use crate::pdf::extract_pages;

use super::config::PreviewConfig;
use super::document::{FileInfo, PageData, PreviewDocument, PreviewPage};
use super::handle::HandleRegistry;
use super::kind::FileKind;

/// A4 in points, used until pdf text is extracted.
const PDF_PAGE: (f64, f64) = (595.0, 842.0);
const CELL_WIDTH: f64 = 100.0;
const CELL_HEIGHT: f64 = 24.0;

/// Turn fetched bytes into a [`PreviewDocument`].
///
/// The bytes are handed to a new [`SourceHandle`](super::SourceHandle)
/// first, so a failed decode still releases its handle.
///
/// # Errors
///
/// Whatever the format helper for the resolved kind reports; images whose
/// header cannot be read give [`PreviewError::Decode`].
pub fn decode_document(
    file: FileInfo,
    bytes: Vec<u8>,
    config: &PreviewConfig,
    registry: &HandleRegistry,
) -> Result<PreviewDocument> {
    let kind = FileKind::resolve(file.content_type.as_deref(), &file.name);
    log::debug!("decoding {} ({} bytes) as {}", file.name, bytes.len(), kind);

    let source = registry.issue(bytes);
    let data = source.bytes();
    let page = config.page_size;

    let pages = match kind {
        FileKind::Image => {
            let (width, height) = image_dimensions(data, &file.name)?;
            vec![PreviewPage::new(
                "Image",
                f64::from(width),
                f64::from(height),
                binary(source.url()),
            )]
        }
        FileKind::Pdf => {
            let (width, height) = PDF_PAGE;
            vec![PreviewPage::new("Document", width, height, binary(source.url()))]
        }
        FileKind::Docx => vec![PreviewPage::new(
            "Document",
            page.width,
            page.height,
            PageData::html(extract_html(data)?),
        )],
        FileKind::Spreadsheet => extract_sheets(data)?
            .into_iter()
            .map(|sheet| {
                let rows = sheet.grid.len().max(1);
                let cols = sheet.grid.iter().map(Vec::len).max().unwrap_or(0).max(1);
                PreviewPage::new(
                    sheet.name,
                    cols as f64 * CELL_WIDTH,
                    rows as f64 * CELL_HEIGHT,
                    PageData::spreadsheet(sheet.grid),
                )
            })
            .collect(),
        FileKind::Text => vec![PreviewPage::new(
            "Text",
            page.width,
            page.height,
            PageData::text(String::from_utf8_lossy(data).into_owned()),
        )],
        FileKind::Binary => vec![PreviewPage::new(
            "File",
            page.width,
            page.height,
            binary(source.url()),
        )],
    };

    Ok(PreviewDocument::new(file, kind, pages, source, config.viewport))
}

/// Replace the placeholder page of a pdf document with extracted text.
///
/// Runs once; later calls see pdf pages and return immediately. A file
/// without recoverable text gets one blank page and a warning.
pub fn extract_pdf_text(doc: &mut PreviewDocument, config: &PreviewConfig) {
    let extracted = doc
        .pages
        .iter()
        .any(|p| matches!(p.data, PageData::Pdf { .. }));
    if doc.kind != FileKind::Pdf || extracted {
        return;
    }

    let mut chunks = extract_pages(doc.source.bytes());
    if chunks.is_empty() {
        log::warn!("no extractable text in {}", doc.file.name);
        doc.warnings
            .push(format!("No text could be extracted from {}", doc.file.name));
        chunks.push(crate::pdf::PdfPage::new(""));
    }

    let (width, height) = PDF_PAGE;
    doc.pages = chunks
        .into_iter()
        .enumerate()
        .map(|(i, chunk)| {
            PreviewPage::new(format!("Page {}", i + 1), width, height, PageData::pdf(chunk.edited))
        })
        .collect();
    doc.current_page = 0;
    doc.refit(config.viewport);
}

fn binary(url: &str) -> PageData {
    PageData::Binary {
        resource_url: url.to_string(),
    }
}

fn image_dimensions(data: &[u8], name: &str) -> Result<(u32, u32)> {
    let decode_error = |e: &dyn std::fmt::Display| {
        log::debug!("image probe failed for {}: {}", name, e);
        PreviewError::Decode(name.to_string())
    };
    image::ImageReader::new(Cursor::new(data))
        .with_guessed_format()
        .map_err(|e| decode_error(&e))?
        .into_dimensions()
        .map_err(|e| decode_error(&e))
}
