//! ZIP container reading and writing.
//!
//! ## Architecture
//!
//! The module is organized into independent, one-directional pieces:
//!
//! - [`structures`]: Data structures representing ZIP format elements (EOCD, entries, signatures)
//! - [`ZipArchive`]: parses an owned buffer into a name → entry index
//! - [`ZipBuilder`]: accumulates named payloads and emits a new archive
//! - [`crc32()`] and [`inflate()`]: the checksum and decompression primitives
//!
//! Reader and writer share no state; building an archive never touches
//! one that is being read.
//!
//! ## ZIP Format Overview
//!
//! A ZIP file consists of:
//! 1. Local file headers and compressed data for each file
//! 2. Central Directory with metadata for all files
//! 3. End of Central Directory (EOCD) record at the end
//!
//! ## Supported Features
//!
//! - Reading STORED and DEFLATE entries
//! - Writing STORED entries
//!
//! ## Limitations
//!
//! - No encryption support
//! - No ZIP64 or multi-disk archives
//! - No folder entries

mod archive;
mod builder;
mod crc32;
mod inflate;
pub mod structures;

pub use archive::ZipArchive;
pub use builder::ZipBuilder;
pub use crc32::crc32;
pub use inflate::{inflate, inflate_limited};
pub use structures::{CompressionMethod, ZipEntry};
