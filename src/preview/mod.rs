//! The preview state machine and everything it moves around.
//!
//! ## Flow
//!
//! 1. [`PreviewEngine::open`] bumps the request token and enters `Loading`
//! 2. The caller fetches bytes and runs [`decode_document`]
//! 3. [`PreviewEngine::complete`] shows the result, unless a newer `open`
//!    happened in between
//! 4. Paging, zoom and edits act on the shown [`PreviewDocument`]
//! 5. [`PreviewEngine::save`] re-encodes (pdf only) and the caller stores
//!    the bytes
//!
//! [`PreviewSession`] runs steps 1-3 over a [`ByteSource`](crate::io::ByteSource).

mod config;
mod decode;
mod document;
mod engine;
mod handle;
mod kind;
mod session;

pub use config::{
    MAX_ZOOM, MIN_ZOOM, PageSize, PreviewConfig, Viewport, ZOOM_STEP, clamp_zoom, fit_zoom,
};
pub use decode::{decode_document, extract_pdf_text};
pub use document::{
    DocumentSummary, FileInfo, PageData, PageEdit, PageSummary, PreviewDocument, PreviewPage, Zoom,
};
pub use engine::{Outcome, PreviewEngine, PreviewEvent, PreviewState, SaveJob};
pub use handle::{HandleRegistry, SourceHandle};
pub use kind::FileKind;
pub use session::{PreviewSession, SavedFile};
