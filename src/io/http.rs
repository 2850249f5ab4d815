use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::CONTENT_TYPE;
use std::time::Duration;

use super::{ByteSource, FetchedFile};
use anyhow::{Result, bail};

/// Downloads a file over HTTP(S)
pub struct HttpSource {
    client: Client,
    url: String,
    name: String,
    content_type: Option<String>,
}

impl HttpSource {
    pub fn new(url: String) -> Result<Self> {
        let client = Client::builder().timeout(Duration::from_secs(30)).build()?;

        // Last path segment, without query or fragment
        let path = url.split(['?', '#']).next().unwrap_or(&url);
        let name = path
            .rsplit('/')
            .find(|s| !s.is_empty())
            .unwrap_or("download")
            .to_string();

        Ok(Self {
            client,
            url,
            name,
            content_type: None,
        })
    }

    /// Declare a MIME type instead of trusting the response header
    pub fn with_content_type(mut self, content_type: Option<String>) -> Self {
        self.content_type = content_type;
        self
    }
}

#[async_trait]
impl ByteSource for HttpSource {
    fn name(&self) -> &str {
        &self.name
    }

    async fn fetch(&self) -> Result<FetchedFile> {
        let resp = self.client.get(&self.url).send().await?;

        if !resp.status().is_success() {
            bail!("HTTP request failed with status: {}", resp.status());
        }

        // Drop parameters such as "; charset=utf-8"
        let content_type = self.content_type.clone().or_else(|| {
            resp.headers()
                .get(CONTENT_TYPE)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.split(';').next())
                .map(|v| v.trim().to_ascii_lowercase())
                .filter(|v| !v.is_empty())
        });

        let bytes = resp.bytes().await?.to_vec();
        log::debug!("downloaded {} bytes from {}", bytes.len(), self.url);

        Ok(FetchedFile {
            name: self.name.clone(),
            content_type,
            bytes,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_from_url() {
        let url = "https://example.com/files/report.pdf?token=1".to_string();
        let source = HttpSource::new(url).unwrap();
        assert_eq!(source.name(), "report.pdf");

        let source = HttpSource::new("https://example.com/".into()).unwrap();
        assert_eq!(source.name(), "example.com");
    }
}
