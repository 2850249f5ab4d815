//! # docpreview
//!
//! Preview and edit documents without leaving the process: a from-scratch
//! ZIP reader/writer, minimal Word and Excel part extraction and
//! regeneration, a minimal PDF text extractor and writer, and a preview
//! state machine that ties them together.
//!
//! ## Features
//!
//! - Read STORED and DEFLATE ZIP entries, write STORED archives
//! - Extract `.docx` paragraphs as HTML and `.xlsx` sheets as text grids
//! - Rebuild minimal `.docx`, `.xlsx` and PDF 1.4 files
//! - Paginate, zoom and edit any supported file through one state machine
//! - Load files from disk or HTTP(S)
//!
//! ## Example
//!
//! ```no_run
//! use docpreview::io::LocalFileSource;
//! use docpreview::preview::{PreviewConfig, PreviewSession};
//! use std::path::Path;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let session = PreviewSession::new(PreviewConfig::default());
//!     session.open(&LocalFileSource::new(Path::new("report.xlsx"))).await?;
//!
//!     if let Some(summary) = session.summary().await {
//!         for page in &summary.pages {
//!             println!("{} ({}x{})", page.label, page.width, page.height);
//!         }
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod error;
pub mod io;
pub mod ooxml;
pub mod pdf;
pub mod preview;
pub mod zip;

pub use cli::Cli;
pub use error::{PreviewError, Result};
pub use preview::{FileKind, PreviewDocument, PreviewEngine, PreviewSession};
pub use zip::{ZipArchive, ZipBuilder};
