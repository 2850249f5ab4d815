use crate::error::{PreviewError, Result};

use super::crc32::crc32;
use super::structures::*;

/// A file queued for writing.
#[derive(Debug, Clone)]
struct PendingFile {
    name: String,
    bytes: Vec<u8>,
    crc32: u32,
}

impl PendingFile {
    /// Size of this file's local header plus payload.
    fn local_record_len(&self) -> u64 {
        (LFH_SIZE + self.name.len() + self.bytes.len()) as u64
    }

    /// Size of this file's central directory record.
    fn central_record_len(&self) -> u64 {
        (CDFH_MIN_SIZE + self.name.len()) as u64
    }
}

/// Builds a ZIP archive in memory.
///
/// Only the stored (uncompressed) method is written. Entry names must be
/// unique: adding a name twice is rejected instead of silently shadowing the
/// first entry.
#[derive(Debug, Clone, Default)]
pub struct ZipBuilder {
    files: Vec<PendingFile>,
}

impl ZipBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue `bytes` under `name`.
    ///
    /// # Errors
    ///
    /// - [`PreviewError::DuplicateEntry`] if `name` was already added
    /// - [`PreviewError::Validation`] if the name is empty or too long, or
    ///   the archive would outgrow the 32-bit ZIP format
    pub fn add_file(&mut self, name: impl Into<String>, bytes: Vec<u8>) -> Result<()> {
        let name = name.into();
        if name.is_empty() || name.len() > u16::MAX as usize {
            return Err(PreviewError::Validation(
                "ZIP entry names must be 1 to 65535 bytes".into(),
            ));
        }
        if self.files.iter().any(|f| f.name == name) {
            return Err(PreviewError::DuplicateEntry(name));
        }
        if self.files.len() >= u16::MAX as usize {
            return Err(PreviewError::Validation("too many ZIP entries".into()));
        }

        let file = PendingFile {
            crc32: crc32(&bytes),
            name,
            bytes,
        };
        let total = self.archive_len() + file.local_record_len() + file.central_record_len();
        if total > u32::MAX as u64 {
            return Err(PreviewError::Validation("archive exceeds 4 GiB".into()));
        }

        self.files.push(file);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Total size `build` will produce.
    fn archive_len(&self) -> u64 {
        self.files
            .iter()
            .map(|f| f.local_record_len() + f.central_record_len())
            .sum::<u64>()
            + EndOfCentralDirectory::SIZE as u64
    }

    /// Produce the archive bytes.
    ///
    /// Pure: repeated calls yield identical, independent buffers.
    pub fn build(&self) -> Vec<u8> {
        // add_file keeps every size and offset below u32::MAX
        let mut out = Vec::with_capacity(self.archive_len() as usize);
        let mut offsets = Vec::with_capacity(self.files.len());

        for file in &self.files {
            offsets.push(out.len() as u32);
            write_local_header(&mut out, file);
            out.extend_from_slice(&file.bytes);
        }

        let cd_offset = out.len() as u32;
        for (file, &offset) in self.files.iter().zip(&offsets) {
            write_central_record(&mut out, file, offset);
        }
        let cd_size = out.len() as u32 - cd_offset;

        let count = self.files.len() as u16;
        EndOfCentralDirectory {
            disk_number: 0,
            disk_with_cd: 0,
            disk_entries: count,
            total_entries: count,
            cd_size,
            cd_offset,
            comment_len: 0,
        }
        .write_to(&mut out);

        out
    }
}

fn write_local_header(out: &mut Vec<u8>, file: &PendingFile) {
    out.extend_from_slice(LFH_SIGNATURE);
    put_u16(out, ZIP_VERSION); // version needed
    put_u16(out, 0); // flags
    put_u16(out, CompressionMethod::Stored.as_u16());
    put_u16(out, 0); // mod time
    put_u16(out, 0); // mod date
    put_u32(out, file.crc32);
    put_u32(out, file.bytes.len() as u32); // compressed
    put_u32(out, file.bytes.len() as u32); // uncompressed
    put_u16(out, file.name.len() as u16);
    put_u16(out, 0); // extra field length
    out.extend_from_slice(file.name.as_bytes());
}

fn write_central_record(out: &mut Vec<u8>, file: &PendingFile, local_header_offset: u32) {
    out.extend_from_slice(CDFH_SIGNATURE);
    put_u16(out, ZIP_VERSION); // version made by
    put_u16(out, ZIP_VERSION); // version needed
    put_u16(out, 0); // flags
    put_u16(out, CompressionMethod::Stored.as_u16());
    put_u16(out, 0); // mod time
    put_u16(out, 0); // mod date
    put_u32(out, file.crc32);
    put_u32(out, file.bytes.len() as u32);
    put_u32(out, file.bytes.len() as u32);
    put_u16(out, file.name.len() as u16);
    put_u16(out, 0); // extra field length
    put_u16(out, 0); // comment length
    put_u16(out, 0); // disk number start
    put_u16(out, 0); // internal attributes
    put_u32(out, 0); // external attributes
    put_u32(out, local_header_offset);
    out.extend_from_slice(file.name.as_bytes());
}
