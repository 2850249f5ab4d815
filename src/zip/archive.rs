//! In-memory ZIP archive reader.
//!
//! ## Parsing Strategy
//!
//! ZIP files are designed to be read from the end:
//! 1. Find the End of Central Directory (EOCD) near the buffer's end
//! 2. Walk the Central Directory to get metadata for all entries
//! 3. Read each entry's Local File Header to locate its payload
//!
//! The archive owns the whole buffer, so every entry is just a set of
//! offsets into it. Nothing is decompressed until [`ZipArchive::read_bytes`]
//! asks for it.

use byteorder::{LittleEndian, ReadBytesExt};
use std::collections::HashMap;
use std::io::{Cursor, ErrorKind, Read};

use crate::error::{PreviewError, Result};

use super::crc32::crc32;
use super::inflate::inflate_limited;
use super::structures::*;

/// Maximum ZIP comment size allowed by the format (65535 bytes).
///
/// This limits the search area when looking for EOCD with a comment.
const MAX_COMMENT_SIZE: usize = 65535;

fn corrupt_cd() -> PreviewError {
    PreviewError::Format("corrupt central directory".into())
}

fn corrupt_lfh() -> PreviewError {
    PreviewError::Format("corrupt local header".into())
}

/// Read-only ZIP archive over an owned byte buffer.
///
/// ## Example
///
/// ```
/// use docpreview::zip::{ZipArchive, ZipBuilder};
///
/// let mut builder = ZipBuilder::new();
/// builder.add_file("a.txt", b"hello".to_vec())?;
/// let archive = ZipArchive::from_bytes(builder.build())?;
/// assert_eq!(archive.read_text("a.txt")?, "hello");
/// # Ok::<(), docpreview::PreviewError>(())
/// ```
#[derive(Debug)]
pub struct ZipArchive {
    /// The archive bytes; entries are offsets into this buffer
    data: Vec<u8>,
    /// Entries in central directory order
    entries: Vec<ZipEntry>,
    /// Name to position in `entries`
    index: HashMap<String, usize>,
}

impl ZipArchive {
    /// Parse the central directory of `data`.
    ///
    /// # Errors
    ///
    /// Returns [`PreviewError::Format`] if the EOCD record cannot be found,
    /// a central directory record is malformed, or a local header does not
    /// match its central directory record.
    pub fn from_bytes(data: Vec<u8>) -> Result<Self> {
        let eocd = find_eocd(&data)?;

        let cd_start = eocd.cd_offset as usize;
        let cd_end = cd_start
            .checked_add(eocd.cd_size as usize)
            .filter(|&end| end <= data.len())
            .ok_or_else(corrupt_cd)?;

        let mut cursor = Cursor::new(&data[cd_start..cd_end]);
        let mut entries = Vec::with_capacity(eocd.total_entries as usize);
        let mut index = HashMap::with_capacity(eocd.total_entries as usize);

        for _ in 0..eocd.total_entries {
            let mut entry = parse_cdfh(&mut cursor)?;

            // Folder entries carry no payload.
            if entry.name.ends_with('/') {
                continue;
            }

            entry.data_offset = locate_data(&data, &entry)?;
            if index.insert(entry.name.clone(), entries.len()).is_some() {
                log::debug!("duplicate ZIP entry {}, keeping the later one", entry.name);
            }
            entries.push(entry);
        }

        log::debug!(
            "parsed ZIP archive: {} bytes, {} entries",
            data.len(),
            entries.len()
        );

        Ok(Self {
            data,
            entries,
            index,
        })
    }

    /// Number of file entries.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Entry names in central directory order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries
            .iter()
            .enumerate()
            .filter(|(i, e)| self.index.get(&e.name) == Some(i))
            .map(|(_, e)| e.name.as_str())
    }

    pub fn entry(&self, name: &str) -> Option<&ZipEntry> {
        self.index.get(name).map(|&i| &self.entries[i])
    }

    /// Read and decompress an entry.
    ///
    /// # Errors
    ///
    /// - [`PreviewError::NotFound`] if there is no such entry
    /// - [`PreviewError::Decode`] if a deflated payload cannot be inflated or
    ///   inflates to more than its declared size
    /// - [`PreviewError::Format`] for compression methods other than
    ///   stored and deflate
    pub fn read_bytes(&self, name: &str) -> Result<Vec<u8>> {
        let entry = self
            .entry(name)
            .ok_or_else(|| PreviewError::NotFound(name.to_string()))?;
        let raw = &self.data[entry.data_range()];

        let bytes = match entry.compression_method {
            CompressionMethod::Stored => raw.to_vec(),
            CompressionMethod::Deflate => {
                let declared = entry.uncompressed_size as u64;
                let out = inflate_limited(raw, declared + 1);
                if out.is_empty() && declared > 0 {
                    return Err(PreviewError::Decode(name.to_string()));
                }
                if out.len() as u64 > declared {
                    log::warn!("{}: inflates past its declared {} bytes", name, declared);
                    return Err(PreviewError::Decode(name.to_string()));
                }
                out
            }
            CompressionMethod::Unknown(method) => {
                log::warn!("{}: compression method {} is not supported", name, method);
                return Err(PreviewError::Format(
                    "unsupported compression method".into(),
                ));
            }
        };

        if crc32(&bytes) != entry.crc32 {
            log::warn!("{}: CRC-32 mismatch", name);
        }

        Ok(bytes)
    }

    /// Read an entry as UTF-8 text, dropping a leading byte order mark.
    pub fn read_text(&self, name: &str) -> Result<String> {
        let bytes = self.read_bytes(name)?;
        let text =
            String::from_utf8(bytes).map_err(|_| PreviewError::Decode(name.to_string()))?;
        Ok(match text.strip_prefix('\u{feff}') {
            Some(rest) => rest.to_string(),
            None => text,
        })
    }

    /// The backing buffer.
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }
}

/// Find and parse the End of Central Directory record.
///
/// Scans backwards from `len - 22`, which covers both the common case
/// of no comment and archives with a trailing comment.
fn find_eocd(data: &[u8]) -> Result<EndOfCentralDirectory> {
    let not_found = || PreviewError::Format("EOCD not found".into());

    let last = data
        .len()
        .checked_sub(EndOfCentralDirectory::SIZE)
        .ok_or_else(not_found)?;
    let first = last.saturating_sub(MAX_COMMENT_SIZE);

    (first..=last)
        .rev()
        .find(|&i| &data[i..i + 4] == EndOfCentralDirectory::SIGNATURE)
        .ok_or_else(not_found)
        .and_then(|i| {
            EndOfCentralDirectory::from_bytes(&data[i..i + EndOfCentralDirectory::SIZE])
        })
}

/// Parse one Central Directory File Header.
///
/// `data_offset` is filled in later from the local header.
fn parse_cdfh(cursor: &mut Cursor<&[u8]>) -> Result<ZipEntry> {
    read_cdfh(cursor).map_err(|_| corrupt_cd())
}

fn read_cdfh(cursor: &mut Cursor<&[u8]>) -> std::io::Result<ZipEntry> {
    // Read and verify the signature (PK\x01\x02)
    let mut sig = [0u8; 4];
    cursor.read_exact(&mut sig)?;
    if sig != CDFH_SIGNATURE {
        return Err(ErrorKind::InvalidData.into());
    }

    let _version_made_by = cursor.read_u16::<LittleEndian>()?;
    let _version_needed = cursor.read_u16::<LittleEndian>()?;
    let _flags = cursor.read_u16::<LittleEndian>()?;
    let compression_method = cursor.read_u16::<LittleEndian>()?;
    let _last_mod_time = cursor.read_u16::<LittleEndian>()?;
    let _last_mod_date = cursor.read_u16::<LittleEndian>()?;
    let crc32 = cursor.read_u32::<LittleEndian>()?;
    let compressed_size = cursor.read_u32::<LittleEndian>()?;
    let uncompressed_size = cursor.read_u32::<LittleEndian>()?;
    let file_name_length = cursor.read_u16::<LittleEndian>()?;
    let extra_field_length = cursor.read_u16::<LittleEndian>()?;
    let file_comment_length = cursor.read_u16::<LittleEndian>()?;
    let _disk_number_start = cursor.read_u16::<LittleEndian>()?;
    let _internal_attrs = cursor.read_u16::<LittleEndian>()?;
    let _external_attrs = cursor.read_u32::<LittleEndian>()?;
    let local_header_offset = cursor.read_u32::<LittleEndian>()?;

    let mut file_name_bytes = vec![0u8; file_name_length as usize];
    cursor.read_exact(&mut file_name_bytes)?;
    // Use lossy conversion to handle non-UTF8 filenames gracefully
    let name = String::from_utf8_lossy(&file_name_bytes).into_owned();

    // Skip the extra field and file comment (we don't use them)
    let end = cursor.position() + extra_field_length as u64 + file_comment_length as u64;
    if end > cursor.get_ref().len() as u64 {
        return Err(ErrorKind::UnexpectedEof.into());
    }
    cursor.set_position(end);

    Ok(ZipEntry {
        name,
        compression_method: CompressionMethod::from_u16(compression_method),
        compressed_size,
        uncompressed_size,
        crc32,
        local_header_offset,
        data_offset: 0,
    })
}

/// Compute where an entry's payload begins.
///
/// The Local File Header has its own name and extra field lengths, which
/// may differ from the central directory record.
fn locate_data(data: &[u8], entry: &ZipEntry) -> Result<u32> {
    let start = entry.local_header_offset as usize;
    let header = data
        .get(start..start + LFH_SIZE)
        .filter(|h| &h[0..4] == LFH_SIGNATURE)
        .ok_or_else(corrupt_lfh)?;

    let file_name_length = u16::from_le_bytes([header[26], header[27]]) as usize;
    let extra_field_length = u16::from_le_bytes([header[28], header[29]]) as usize;

    let data_offset = start + LFH_SIZE + file_name_length + extra_field_length;
    let data_end = data_offset + entry.compressed_size as usize;
    if data_end > data.len() {
        return Err(corrupt_lfh());
    }

    u32::try_from(data_offset).map_err(|_| corrupt_lfh())
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::Compression;
    use flate2::write::DeflateEncoder;
    use std::io::Write;

    /// Hand-assembles an archive so tests can use methods the builder
    /// never writes.
    fn raw_archive(files: &[(&str, u16, &[u8], u32, u32)]) -> Vec<u8> {
        let mut out = Vec::new();
        let mut offsets = Vec::new();
        for &(name, method, payload, crc, size) in files {
            offsets.push(out.len() as u32);
            out.extend_from_slice(LFH_SIGNATURE);
            for v in [ZIP_VERSION, 0, method, 0, 0] {
                put_u16(&mut out, v);
            }
            put_u32(&mut out, crc);
            put_u32(&mut out, payload.len() as u32);
            put_u32(&mut out, size);
            put_u16(&mut out, name.len() as u16);
            put_u16(&mut out, 4);
            out.extend_from_slice(name.as_bytes());
            out.extend_from_slice(&[0xAA; 4]);
            out.extend_from_slice(payload);
        }
        let cd_offset = out.len() as u32;
        for (&(name, method, payload, crc, size), offset) in files.iter().zip(offsets) {
            out.extend_from_slice(CDFH_SIGNATURE);
            for v in [ZIP_VERSION, ZIP_VERSION, 0, method, 0, 0] {
                put_u16(&mut out, v);
            }
            put_u32(&mut out, crc);
            put_u32(&mut out, payload.len() as u32);
            put_u32(&mut out, size);
            for v in [name.len() as u16, 0, 0, 0, 0] {
                put_u16(&mut out, v);
            }
            put_u32(&mut out, 0);
            put_u32(&mut out, offset);
            out.extend_from_slice(name.as_bytes());
        }
        let cd_size = out.len() as u32 - cd_offset;
        EndOfCentralDirectory {
            disk_number: 0,
            disk_with_cd: 0,
            disk_entries: files.len() as u16,
            total_entries: files.len() as u16,
            cd_size,
            cd_offset,
            comment_len: 0,
        }
        .write_to(&mut out);
        out
    }

    fn deflate(data: &[u8]) -> Vec<u8> {
        let mut enc = DeflateEncoder::new(Vec::new(), Compression::default());
        enc.write_all(data).unwrap();
        enc.finish().unwrap()
    }

    #[test]
    fn test_reads_deflated_entry_with_local_extra_field() {
        let text = b"<sst><si><t>Total</t></si></sst>".repeat(8);
        let packed = deflate(&text);
        let bytes = raw_archive(&[(
            "xl/sharedStrings.xml",
            8,
            &packed,
            crc32(&text),
            text.len() as u32,
        )]);

        let archive = ZipArchive::from_bytes(bytes).unwrap();
        let entry = archive.entry("xl/sharedStrings.xml").unwrap();
        assert_eq!(entry.compression_method, CompressionMethod::Deflate);
        assert_eq!(archive.read_bytes("xl/sharedStrings.xml").unwrap(), text);
    }

    #[test]
    fn test_undecodable_deflate_is_decode_error() {
        let junk = [0xFFu8, 0xFF, 0xFF, 0xFF];
        let bytes = raw_archive(&[("a.xml", 8, &junk, 0, 10)]);
        let archive = ZipArchive::from_bytes(bytes).unwrap();
        assert_eq!(
            archive.read_bytes("a.xml"),
            Err(PreviewError::Decode("a.xml".into()))
        );
    }

    #[test]
    fn test_deflate_past_declared_size_is_decode_error() {
        let text = vec![b'0'; 1 << 20];
        let packed = deflate(&text);
        let bytes = raw_archive(&[("xl/worksheets/sheet1.xml", 8, &packed, crc32(&text), 16)]);

        let archive = ZipArchive::from_bytes(bytes).unwrap();
        assert_eq!(
            archive.read_bytes("xl/worksheets/sheet1.xml"),
            Err(PreviewError::Decode("xl/worksheets/sheet1.xml".into()))
        );
    }

    #[test]
    fn test_unknown_method_is_format_error() {
        let bytes = raw_archive(&[("a.bin", 14, b"xx", 0, 2)]);
        let archive = ZipArchive::from_bytes(bytes).unwrap();
        assert!(matches!(
            archive.read_bytes("a.bin"),
            Err(PreviewError::Format(_))
        ));
    }

    #[test]
    fn test_folder_entries_skipped() {
        let bytes = raw_archive(&[
            ("word/", 0, b"", 0, 0),
            ("word/a.xml", 0, b"<a/>", crc32(b"<a/>"), 4),
        ]);
        let archive = ZipArchive::from_bytes(bytes).unwrap();
        assert_eq!(archive.names().collect::<Vec<_>>(), vec!["word/a.xml"]);
    }

    #[test]
    fn test_missing_eocd() {
        let err = ZipArchive::from_bytes(b"definitely not a zip archive".to_vec()).unwrap_err();
        assert_eq!(err, PreviewError::Format("EOCD not found".into()));
        let err = ZipArchive::from_bytes(vec![0x50, 0x4B]).unwrap_err();
        assert_eq!(err, PreviewError::Format("EOCD not found".into()));
    }

    #[test]
    fn test_eocd_found_before_comment() {
        let mut bytes = raw_archive(&[("a.txt", 0, b"hi", crc32(b"hi"), 2)]);
        let comment = b"archive comment";
        let len = bytes.len();
        bytes[len - 2..].copy_from_slice(&(comment.len() as u16).to_le_bytes());
        bytes.extend_from_slice(comment);
        let archive = ZipArchive::from_bytes(bytes).unwrap();
        assert_eq!(archive.read_text("a.txt").unwrap(), "hi");
    }

    #[test]
    fn test_corrupt_central_directory() {
        let mut bytes = raw_archive(&[("a.txt", 0, b"hi", crc32(b"hi"), 2)]);
        let cd = bytes
            .windows(4)
            .position(|w| w == CDFH_SIGNATURE)
            .unwrap();
        bytes[cd] = b'X';
        assert_eq!(
            ZipArchive::from_bytes(bytes).unwrap_err(),
            PreviewError::Format("corrupt central directory".into())
        );
    }

    #[test]
    fn test_corrupt_local_header() {
        let mut bytes = raw_archive(&[("a.txt", 0, b"hi", crc32(b"hi"), 2)]);
        bytes[0] = 0;
        assert_eq!(
            ZipArchive::from_bytes(bytes).unwrap_err(),
            PreviewError::Format("corrupt local header".into())
        );
    }

    #[test]
    fn test_missing_entry() {
        let archive = ZipArchive::from_bytes(raw_archive(&[])).unwrap();
        assert_eq!(
            archive.read_text("word/document.xml"),
            Err(PreviewError::NotFound("word/document.xml".into()))
        );
    }

    #[test]
    fn test_bom_stripped_and_invalid_utf8_rejected() {
        let bom = "\u{feff}<x/>".as_bytes();
        let bytes = raw_archive(&[
            ("bom.xml", 0, bom, crc32(bom), bom.len() as u32),
            ("bad.txt", 0, &[0xC3, 0x28], crc32(&[0xC3, 0x28]), 2),
        ]);
        let archive = ZipArchive::from_bytes(bytes).unwrap();
        assert_eq!(archive.read_text("bom.xml").unwrap(), "<x/>");
        assert_eq!(
            archive.read_text("bad.txt"),
            Err(PreviewError::Decode("bad.txt".into()))
        );
    }
}
