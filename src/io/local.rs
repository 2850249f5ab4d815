use super::{ByteSink, ByteSource, FetchedFile};
use anyhow::{Context, Result};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;

/// Local file source
pub struct LocalFileSource {
    path: PathBuf,
    name: String,
    content_type: Option<String>,
}

impl LocalFileSource {
    pub fn new(path: &Path) -> Self {
        let name = path
            .file_name()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Self {
            path: path.to_path_buf(),
            name,
            content_type: None,
        }
    }

    /// Declare a MIME type instead of relying on the extension
    pub fn with_content_type(mut self, content_type: Option<String>) -> Self {
        self.content_type = content_type;
        self
    }
}

#[async_trait]
impl ByteSource for LocalFileSource {
    fn name(&self) -> &str {
        &self.name
    }

    async fn fetch(&self) -> Result<FetchedFile> {
        let bytes = fs::read(&self.path)
            .await
            .with_context(|| format!("Failed to read {}", self.path.display()))?;
        Ok(FetchedFile {
            name: self.name.clone(),
            content_type: self.content_type.clone(),
            bytes,
        })
    }
}

/// Writes saved files to a fixed path
pub struct LocalFileSink {
    path: PathBuf,
}

impl LocalFileSink {
    pub fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
        }
    }
}

#[async_trait]
impl ByteSink for LocalFileSink {
    async fn store(&self, name: &str, content_type: &str, bytes: &[u8]) -> Result<()> {
        // Create parent directories if needed
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await?;
            }
        }

        let mut file = fs::File::create(&self.path)
            .await
            .with_context(|| format!("Failed to create {}", self.path.display()))?;
        file.write_all(bytes).await?;
        file.flush().await?;

        log::info!(
            "saved {} ({}, {} bytes) to {}",
            name,
            content_type,
            bytes.len(),
            self.path.display()
        );
        Ok(())
    }
}
