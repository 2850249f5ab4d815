mod http;
mod local;
mod memory;

pub use http::HttpSource;
pub use local::{LocalFileSink, LocalFileSource};
pub use memory::MemorySource;

use anyhow::Result;
use async_trait::async_trait;

/// A file as delivered by a [`ByteSource`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedFile {
    /// File name used for kind detection and labels
    pub name: String,
    /// Declared MIME type, if the source knows one
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

/// Trait for anything that can deliver a whole file
#[async_trait]
pub trait ByteSource: Send + Sync {
    /// Name shown while the file is loading
    fn name(&self) -> &str;

    /// Fetch the complete file
    async fn fetch(&self) -> Result<FetchedFile>;
}

/// Trait for destinations of re-encoded files
#[async_trait]
pub trait ByteSink: Send + Sync {
    async fn store(&self, name: &str, content_type: &str, bytes: &[u8]) -> Result<()>;
}
