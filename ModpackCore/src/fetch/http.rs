//! Blocking HTTP client for manifests, the GitHub API and archive downloads

use std::fs::File;
use std::io::{BufWriter, Read, Write};
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use serde::de::DeserializeOwned;

use crate::error::{Error, Result};

use super::{FetchPhase, FetchProgress, FetchProgressCallback};

/// Timeout for small JSON requests. Downloads have none.
const METADATA_TIMEOUT: Duration = Duration::from_secs(10);
const CHUNK_SIZE: usize = 64 * 1024;

/// Shared blocking client.
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: reqwest::blocking::Client,
}

impl HttpClient {
    pub fn new() -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(concat!("modpack-manager/", env!("CARGO_PKG_VERSION")))
            .connect_timeout(METADATA_TIMEOUT)
            .timeout(None)
            .build()?;
        Ok(Self { client })
    }

    /// GET a JSON document.
    pub fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        let response = self
            .client
            .get(url)
            .header(reqwest::header::ACCEPT, "application/json")
            .timeout(METADATA_TIMEOUT)
            .send()?;
        let status = response.status();
        if !status.is_success() {
            return Err(Error::HttpStatus {
                status: status.as_u16(),
            });
        }
        Ok(response.json()?)
    }

    /// Stream `url` into `dest`, reporting bytes as they arrive.
    ///
    /// When the server sends a `Content-Length` the written size must match
    /// it. `cancel` is checked between chunks.
    ///
    /// # Returns
    /// Number of bytes written.
    pub fn download_to(
        &self,
        url: &str,
        dest: &Path,
        cancel: Option<&AtomicBool>,
        progress: FetchProgressCallback,
    ) -> Result<u64> {
        tracing::info!("Downloading {url}");
        let mut response = self.client.get(url).send()?;
        let status = response.status();
        if !status.is_success() {
            return Err(Error::HttpStatus {
                status: status.as_u16(),
            });
        }

        let total = response.content_length();
        let mut writer = BufWriter::new(File::create(dest)?);
        let mut buf = vec![0u8; CHUNK_SIZE];
        let mut downloaded: u64 = 0;

        loop {
            if cancel.is_some_and(|flag| flag.load(Ordering::SeqCst)) {
                return Err(Error::Cancelled);
            }
            let n = response.read(&mut buf)?;
            if n == 0 {
                break;
            }
            writer.write_all(&buf[..n])?;
            downloaded += n as u64;
            progress(&FetchProgress::new(
                FetchPhase::Downloading,
                downloaded,
                total.unwrap_or(0),
            ));
        }
        writer.flush()?;

        if let Some(expected) = total
            && downloaded != expected
        {
            return Err(Error::IncompleteDownload { downloaded, expected });
        }

        tracing::debug!("Downloaded {downloaded} bytes to {}", dest.display());
        Ok(downloaded)
    }
}
