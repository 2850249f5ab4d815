use serde::Serialize;

use crate::error::{PreviewError, Result};
use crate::ooxml::Grid;
use crate::ooxml::xlsx::{MAX_COLS, MAX_ROWS, in_sheet, put_cell};

use super::config::{Viewport, clamp_zoom, fit_zoom};
use super::handle::SourceHandle;
use super::kind::FileKind;

/// What the user picked: name, declared type and size in bytes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileInfo {
    pub name: String,
    pub content_type: Option<String>,
    pub size: usize,
}

/// Content of one page. Editable variants keep the decoded original next
/// to the edit buffer.
#[derive(Debug, Clone, PartialEq)]
pub enum PageData {
    Text { original: String, edited: String },
    Html { original: String, edited: String },
    Spreadsheet { original: Grid, edited: Grid },
    Pdf { original: String, edited: String },
    Binary { resource_url: String },
}

impl PageData {
    pub fn text(text: String) -> Self {
        PageData::Text {
            edited: text.clone(),
            original: text,
        }
    }

    pub fn html(html: String) -> Self {
        PageData::Html {
            edited: html.clone(),
            original: html,
        }
    }

    pub fn spreadsheet(grid: Grid) -> Self {
        PageData::Spreadsheet {
            edited: grid.clone(),
            original: grid,
        }
    }

    pub fn pdf(text: String) -> Self {
        PageData::Pdf {
            edited: text.clone(),
            original: text,
        }
    }

    /// True when the edit buffer differs from the original.
    pub fn is_modified(&self) -> bool {
        match self {
            PageData::Text { original, edited }
            | PageData::Html { original, edited }
            | PageData::Pdf { original, edited } => original != edited,
            PageData::Spreadsheet { original, edited } => original != edited,
            PageData::Binary { .. } => false,
        }
    }

    /// Apply `edit` to the edit buffer.
    ///
    /// # Errors
    ///
    /// [`PreviewError::Validation`] when the edit does not fit this variant
    /// or a cell lies outside the sheet limits.
    pub fn apply(&mut self, edit: PageEdit) -> Result<()> {
        match (self, edit) {
            (PageData::Text { edited, .. } | PageData::Pdf { edited, .. }, PageEdit::Text(text)) => {
                *edited = text;
            }
            (PageData::Html { edited, .. }, PageEdit::Html(html)) => *edited = html,
            (PageData::Spreadsheet { edited, .. }, PageEdit::Grid(grid)) => *edited = grid,
            (PageData::Spreadsheet { edited, .. }, PageEdit::Cell { row, col, value }) => {
                if !in_sheet(row, col) {
                    return Err(PreviewError::Validation(format!(
                        "cell ({}, {}) is outside the {}x{} sheet",
                        row, col, MAX_ROWS, MAX_COLS
                    )));
                }
                put_cell(edited, row, col, value);
            }
            (
                PageData::Text { original, edited }
                | PageData::Html { original, edited }
                | PageData::Pdf { original, edited },
                PageEdit::Revert,
            ) => edited.clone_from(original),
            (PageData::Spreadsheet { original, edited }, PageEdit::Revert) => {
                edited.clone_from(original)
            }
            (data, edit) => {
                return Err(PreviewError::Validation(format!(
                    "{} edit does not apply to a {} page",
                    edit.name(),
                    data.name()
                )));
            }
        }
        Ok(())
    }

    /// Make the edit buffer the new original.
    pub fn commit(&mut self) {
        match self {
            PageData::Text { original, edited }
            | PageData::Html { original, edited }
            | PageData::Pdf { original, edited } => original.clone_from(edited),
            PageData::Spreadsheet { original, edited } => original.clone_from(edited),
            PageData::Binary { .. } => {}
        }
    }

    /// Current content as plain text, for display.
    pub fn render(&self) -> String {
        match self {
            PageData::Text { edited, .. }
            | PageData::Html { edited, .. }
            | PageData::Pdf { edited, .. } => edited.clone(),
            PageData::Spreadsheet { edited, .. } => edited
                .iter()
                .map(|row| row.join("\t"))
                .collect::<Vec<_>>()
                .join("\n"),
            PageData::Binary { resource_url } => resource_url.clone(),
        }
    }

    fn name(&self) -> &'static str {
        match self {
            PageData::Text { .. } => "text",
            PageData::Html { .. } => "html",
            PageData::Spreadsheet { .. } => "spreadsheet",
            PageData::Pdf { .. } => "pdf",
            PageData::Binary { .. } => "binary",
        }
    }
}

/// A change to one page's edit buffer.
#[derive(Debug, Clone, PartialEq)]
pub enum PageEdit {
    /// Replace the text of a text or pdf page
    Text(String),
    Html(String),
    Grid(Grid),
    /// Set one cell, growing the grid as needed
    Cell { row: usize, col: usize, value: String },
    /// Discard edits
    Revert,
}

impl PageEdit {
    fn name(&self) -> &'static str {
        match self {
            PageEdit::Text(_) => "text",
            PageEdit::Html(_) => "html",
            PageEdit::Grid(_) => "grid",
            PageEdit::Cell { .. } => "cell",
            PageEdit::Revert => "revert",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PreviewPage {
    pub label: String,
    pub width: f64,
    pub height: f64,
    pub data: PageData,
}

impl PreviewPage {
    pub fn new(label: impl Into<String>, width: f64, height: f64, data: PageData) -> Self {
        Self {
            label: label.into(),
            width,
            height,
            data,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Zoom {
    /// Follow the fit zoom of the current page
    Fit,
    Factor(f64),
}

/// A decoded file ready for display.
///
/// Owns the [`SourceHandle`] of its bytes; dropping the document releases
/// it.
#[derive(Debug)]
pub struct PreviewDocument {
    pub file: FileInfo,
    pub kind: FileKind,
    pub pages: Vec<PreviewPage>,
    pub current_page: usize,
    pub zoom: Zoom,
    pub fit_zoom: f64,
    pub manual_zoom: bool,
    pub editable: bool,
    pub source: SourceHandle,
    pub warnings: Vec<String>,
}

impl PreviewDocument {
    /// Assemble a document showing its first page at the default zoom.
    pub fn new(
        file: FileInfo,
        kind: FileKind,
        pages: Vec<PreviewPage>,
        source: SourceHandle,
        viewport: Viewport,
    ) -> Self {
        let mut doc = Self {
            file,
            kind,
            pages,
            current_page: 0,
            zoom: Zoom::Fit,
            fit_zoom: 1.0,
            manual_zoom: false,
            editable: kind.is_editable(),
            source,
            warnings: Vec::new(),
        };
        doc.refit(viewport);
        doc
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn current(&self) -> Option<&PreviewPage> {
        self.pages.get(self.current_page)
    }

    /// Numeric zoom in effect.
    pub fn effective_zoom(&self) -> f64 {
        match self.zoom {
            Zoom::Fit => self.fit_zoom,
            Zoom::Factor(z) => z,
        }
    }

    fn default_zoom(&self) -> Zoom {
        match self.kind {
            FileKind::Pdf => Zoom::Fit,
            _ => Zoom::Factor(self.fit_zoom),
        }
    }

    /// Recompute the fit zoom for the current page; the zoom follows unless
    /// it was set by hand.
    pub fn refit(&mut self, viewport: Viewport) {
        self.fit_zoom = self
            .current()
            .map_or(1.0, |p| fit_zoom(viewport, p.width, p.height));
        if !self.manual_zoom {
            self.zoom = self.default_zoom();
        }
    }

    /// Go to page `index`, clamped to the valid range.
    pub fn navigate(&mut self, index: isize, viewport: Viewport) {
        let last = self.pages.len().saturating_sub(1);
        self.current_page = usize::try_from(index).unwrap_or(0).min(last);
        self.refit(viewport);
    }

    /// Set a manual zoom, clamped to the allowed range.
    pub fn set_zoom(&mut self, zoom: f64) -> Result<()> {
        if !zoom.is_finite() {
            return Err(PreviewError::Validation(format!("zoom {} is not a number", zoom)));
        }
        self.zoom = Zoom::Factor(clamp_zoom(zoom));
        self.manual_zoom = true;
        Ok(())
    }

    pub fn reset_zoom(&mut self) {
        self.manual_zoom = false;
        self.zoom = self.default_zoom();
    }

    pub fn edit_page(&mut self, index: usize, edit: PageEdit) -> Result<()> {
        let count = self.pages.len();
        let page = self.pages.get_mut(index).ok_or_else(|| {
            PreviewError::Validation(format!("page {} out of range (0..{})", index, count))
        })?;
        page.data.apply(edit)
    }

    /// Edit buffers of a pdf document, one string per page.
    pub fn pdf_texts(&self) -> Vec<&str> {
        self.pages
            .iter()
            .filter_map(|p| match &p.data {
                PageData::Pdf { edited, .. } => Some(edited.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn commit_edits(&mut self) {
        for page in &mut self.pages {
            page.data.commit();
        }
    }

    pub fn summary(&self) -> DocumentSummary {
        DocumentSummary {
            file: self.file.clone(),
            kind: self.kind,
            current_page: self.current_page,
            zoom: self.effective_zoom(),
            fit: self.zoom == Zoom::Fit,
            fit_zoom: self.fit_zoom,
            manual_zoom: self.manual_zoom,
            editable: self.editable,
            resource_url: self.source.url().to_string(),
            pages: self
                .pages
                .iter()
                .map(|p| PageSummary {
                    label: p.label.clone(),
                    width: p.width,
                    height: p.height,
                    modified: p.data.is_modified(),
                })
                .collect(),
            warnings: self.warnings.clone(),
        }
    }
}

/// Serializable overview of a [`PreviewDocument`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DocumentSummary {
    pub file: FileInfo,
    pub kind: FileKind,
    pub current_page: usize,
    pub zoom: f64,
    pub fit: bool,
    pub fit_zoom: f64,
    pub manual_zoom: bool,
    pub editable: bool,
    pub resource_url: String,
    pub pages: Vec<PageSummary>,
    pub warnings: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageSummary {
    pub label: String,
    pub width: f64,
    pub height: f64,
    pub modified: bool,
}
