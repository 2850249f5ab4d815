use byteorder::{LittleEndian, ReadBytesExt};
use std::io::Cursor;

use crate::error::{PreviewError, Result};

/// ZIP compression methods
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompressionMethod {
    Stored,
    Deflate,
    Unknown(u16),
}

impl CompressionMethod {
    pub fn from_u16(value: u16) -> Self {
        match value {
            0 => CompressionMethod::Stored,
            8 => CompressionMethod::Deflate,
            _ => CompressionMethod::Unknown(value),
        }
    }

    pub fn as_u16(&self) -> u16 {
        match self {
            CompressionMethod::Stored => 0,
            CompressionMethod::Deflate => 8,
            CompressionMethod::Unknown(v) => *v,
        }
    }
}

/// End of Central Directory (EOCD) - 22 bytes minimum
pub struct EndOfCentralDirectory {
    pub disk_number: u16,
    pub disk_with_cd: u16,
    pub disk_entries: u16,
    pub total_entries: u16,
    pub cd_size: u32,
    pub cd_offset: u32,
    pub comment_len: u16,
}

impl EndOfCentralDirectory {
    pub const SIGNATURE: &'static [u8] = b"PK\x05\x06";
    pub const SIZE: usize = 22;

    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        if data.len() < Self::SIZE || &data[0..4] != Self::SIGNATURE {
            return Err(PreviewError::Format("EOCD not found".into()));
        }

        let mut cursor = Cursor::new(&data[4..Self::SIZE]);
        let disk_number = read_u16(&mut cursor)?;
        let disk_with_cd = read_u16(&mut cursor)?;
        let disk_entries = read_u16(&mut cursor)?;
        let total_entries = read_u16(&mut cursor)?;
        let cd_size = read_u32(&mut cursor)?;
        let cd_offset = read_u32(&mut cursor)?;
        let comment_len = read_u16(&mut cursor)?;

        Ok(Self {
            disk_number,
            disk_with_cd,
            disk_entries,
            total_entries,
            cd_size,
            cd_offset,
            comment_len,
        })
    }

    /// Writes this record, signature included.
    pub fn write_to(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(Self::SIGNATURE);
        put_u16(out, self.disk_number);
        put_u16(out, self.disk_with_cd);
        put_u16(out, self.disk_entries);
        put_u16(out, self.total_entries);
        put_u32(out, self.cd_size);
        put_u32(out, self.cd_offset);
        put_u16(out, self.comment_len);
    }
}

fn read_u16(cursor: &mut Cursor<&[u8]>) -> Result<u16> {
    cursor
        .read_u16::<LittleEndian>()
        .map_err(|_| PreviewError::Format("EOCD not found".into()))
}

fn read_u32(cursor: &mut Cursor<&[u8]>) -> Result<u32> {
    cursor
        .read_u32::<LittleEndian>()
        .map_err(|_| PreviewError::Format("EOCD not found".into()))
}

pub(crate) fn put_u16(out: &mut Vec<u8>, value: u16) {
    out.extend_from_slice(&value.to_le_bytes());
}

pub(crate) fn put_u32(out: &mut Vec<u8>, value: u32) {
    out.extend_from_slice(&value.to_le_bytes());
}

/// Central Directory File Header (CDFH) - 46 bytes minimum
pub const CDFH_SIGNATURE: &[u8] = b"PK\x01\x02";
pub const CDFH_MIN_SIZE: usize = 46;

/// Local File Header (LFH) - 30 bytes
pub const LFH_SIGNATURE: &[u8] = b"PK\x03\x04";
pub const LFH_SIZE: usize = 30;

/// Version 2.0: the lowest that covers stored and deflated entries.
pub const ZIP_VERSION: u16 = 20;

/// Parsed ZIP entry.
///
/// Offsets index into the owning archive's buffer; `data_offset` is taken
/// from the local header, not from the central directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZipEntry {
    pub name: String,
    pub compression_method: CompressionMethod,
    pub compressed_size: u32,
    pub uncompressed_size: u32,
    pub crc32: u32,
    pub local_header_offset: u32,
    pub data_offset: u32,
}

impl ZipEntry {
    /// Byte range of the (possibly compressed) payload.
    pub fn data_range(&self) -> std::ops::Range<usize> {
        let start = self.data_offset as usize;
        start..start + self.compressed_size as usize
    }
}
