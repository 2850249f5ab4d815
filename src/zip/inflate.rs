use flate2::read::{DeflateDecoder, ZlibDecoder};
use std::io::Read;

/// Decompress a DEFLATE payload.
///
/// Tries a zlib-wrapped stream first, then raw deflate. When both fail the
/// result is empty: callers treat an empty buffer as "content unavailable",
/// never as genuinely empty content.
pub fn inflate(data: &[u8]) -> Vec<u8> {
    inflate_limited(data, u64::MAX)
}

/// [`inflate`] that stops after `limit` output bytes.
pub fn inflate_limited(data: &[u8], limit: u64) -> Vec<u8> {
    let mut out = Vec::new();
    match ZlibDecoder::new(data).take(limit).read_to_end(&mut out) {
        Ok(_) => return out,
        Err(e) => log::debug!("zlib inflate failed, retrying as raw deflate: {}", e),
    }

    out.clear();
    match DeflateDecoder::new(data).take(limit).read_to_end(&mut out) {
        Ok(_) => out,
        Err(e) => {
            log::warn!(
                "inflate failed for {} compressed bytes: {}",
                data.len(),
                e
            );
            Vec::new()
        }
    }
}
