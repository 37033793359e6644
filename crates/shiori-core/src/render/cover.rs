use std::path::Path;

use reqwest::Client;
use thiserror::Error;

use super::write_atomic;

/// Errors that can occur while downloading a cover image.
#[derive(Debug, Error)]
pub enum CoverError {
    #[error("record has no cover URL")]
    MissingUrl,

    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("HTTP error: {0}")]
    HttpStatus(u16),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Downloads cover art next to the notes.
#[derive(Debug, Clone)]
pub struct CoverDownloader {
    http: Client,
}

impl CoverDownloader {
    pub fn new(http: Client) -> Self {
        Self { http }
    }

    /// Download `url` into `dest`, creating the parent directory if needed.
    pub async fn download(&self, url: Option<&str>, dest: &Path) -> Result<(), CoverError> {
        let url = url
            .filter(|u| !u.trim().is_empty())
            .ok_or(CoverError::MissingUrl)?;
        tracing::debug!(url, dest = %dest.display(), "Downloading cover");

        let response = self.http.get(url).send().await?;
        if !response.status().is_success() {
            return Err(CoverError::HttpStatus(response.status().as_u16()));
        }
        let bytes = response.bytes().await?;

        if let Some(parent) = dest.parent() {
            std::fs::create_dir_all(parent)?;
        }
        write_atomic(dest, &bytes)?;

        tracing::info!(dest = %dest.display(), size = bytes.len(), "Cover saved");
        Ok(())
    }
}
