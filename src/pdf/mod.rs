//! Minimal PDF support.
//!
//! Extraction only understands uncompressed content streams and splits the
//! file into text chunks on `startxref` markers, so a "page" here is not a
//! real PDF page. The writer emits a PDF 1.4 file with one Helvetica text
//! page per input string.

mod extract;
mod writer;

pub use extract::{PdfPage, extract_pages};
pub use writer::create_pdf;
