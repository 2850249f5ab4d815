use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

#[derive(Debug, Default)]
struct Counters {
    next_id: AtomicU64,
    issued: AtomicU64,
    revoked: AtomicU64,
}

/// Issues [`SourceHandle`]s and counts how many are still alive.
///
/// Clones share the same counters.
#[derive(Debug, Clone, Default)]
pub struct HandleRegistry {
    counters: Arc<Counters>,
}

impl HandleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take ownership of decoded bytes and register a resource URL for them.
    pub fn issue(&self, bytes: Vec<u8>) -> SourceHandle {
        let id = self.counters.next_id.fetch_add(1, Ordering::Relaxed) + 1;
        self.counters.issued.fetch_add(1, Ordering::Relaxed);
        log::debug!("issued blob:docpreview/{} ({} bytes)", id, bytes.len());
        SourceHandle {
            id,
            url: format!("blob:docpreview/{}", id),
            bytes,
            counters: Arc::clone(&self.counters),
        }
    }

    pub fn issued(&self) -> u64 {
        self.counters.issued.load(Ordering::Relaxed)
    }

    pub fn revoked(&self) -> u64 {
        self.counters.revoked.load(Ordering::Relaxed)
    }

    /// Handles not yet dropped. The two counters are read separately, so
    /// under concurrent use this is a snapshot that never goes negative.
    pub fn live(&self) -> u64 {
        let revoked = self.revoked();
        self.issued().saturating_sub(revoked)
    }
}

/// Bytes of a decoded file plus the resource URL pages refer to.
///
/// The URL is revoked when the handle is dropped.
pub struct SourceHandle {
    id: u64,
    url: String,
    bytes: Vec<u8>,
    counters: Arc<Counters>,
}

impl SourceHandle {
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }
}

impl fmt::Debug for SourceHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SourceHandle")
            .field("url", &self.url)
            .field("len", &self.bytes.len())
            .finish()
    }
}

impl Drop for SourceHandle {
    fn drop(&mut self) {
        self.counters.revoked.fetch_add(1, Ordering::Relaxed);
        log::debug!("revoked {}", self.url);
    }
}
