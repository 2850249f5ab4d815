//! Office Open XML helpers.
//!
//! Both formats are ZIP packages of XML parts. Reading pulls out visible
//! text only; writing produces the smallest package that Word or Excel
//! will open. Neither direction preserves formatting.

pub mod docx;
mod package;
pub mod xlsx;
pub mod xml;

pub use docx::{create_document, extract_html, html_paragraphs};
pub use xlsx::{
    Grid, MAX_COLS, MAX_ROWS, Sheet, cell_reference, column_index, column_name, create_workbook,
    extract_sheets, in_sheet,
};
