use super::{ByteSource, FetchedFile};
use anyhow::Result;
use async_trait::async_trait;
use std::time::Duration;

/// A file already held in memory, e.g. handed over by a file picker.
#[derive(Debug, Clone)]
pub struct MemorySource {
    file: FetchedFile,
    delay: Option<Duration>,
}

impl MemorySource {
    pub fn new(name: impl Into<String>, content_type: Option<&str>, bytes: Vec<u8>) -> Self {
        Self {
            file: FetchedFile {
                name: name.into(),
                content_type: content_type.map(str::to_string),
                bytes,
            },
            delay: None,
        }
    }

    /// Simulate a slow transfer
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }
}

#[async_trait]
impl ByteSource for MemorySource {
    fn name(&self) -> &str {
        &self.file.name
    }

    async fn fetch(&self) -> Result<FetchedFile> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        Ok(self.file.clone())
    }
}
