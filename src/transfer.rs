//! Streaming HTTP downloads with byte-level progress
//!
//! A transfer truncates its destination, writes the response body in fixed
//! size blocks and reports progress after every block. Transfers are never
//! retried or resumed; calling [`Downloader::fetch`] again starts over.

use std::fs::File;
use std::io::{ErrorKind, Read, Write};
use std::path::{Path, PathBuf};

use reqwest::blocking::Client;

use crate::error::{ApkError, Result};

/// Size of a single read/write block
pub const BLOCK_SIZE: usize = 8192;

/// Progress of a running transfer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    pub bytes_written: u64,
    /// Total size from the response headers, if the server sent one
    pub total: Option<u64>,
}

impl Progress {
    /// Completed fraction in `0.0..=1.0`, or `None` when the total is unknown
    #[allow(clippy::cast_precision_loss)]
    pub fn fraction(&self) -> Option<f64> {
        match self.total {
            Some(total) if total > 0 => Some((self.bytes_written as f64 / total as f64).min(1.0)),
            _ => None,
        }
    }
}

/// A single download from `source_url` into `destination`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadTask {
    pub source_url: String,
    pub destination: PathBuf,
    pub expected_size: Option<u64>,
    pub bytes_written: u64,
}

impl DownloadTask {
    pub fn new(source_url: &str, destination: &Path) -> Self {
        Self {
            source_url: source_url.to_string(),
            destination: destination.to_path_buf(),
            expected_size: None,
            bytes_written: 0,
        }
    }

    fn record(&mut self, written: usize) -> Progress {
        self.bytes_written += written as u64;
        Progress {
            bytes_written: self.bytes_written,
            total: self.expected_size,
        }
    }
}

/// Fetches remote resources to local files
pub trait Downloader {
    /// Stream `url` into `destination`, calling `on_progress` after every block.
    ///
    /// The parent directory of `destination` must already exist.
    fn fetch(
        &self,
        url: &str,
        destination: &Path,
        on_progress: &mut dyn FnMut(Progress),
    ) -> Result<DownloadTask>;
}

/// [`Downloader`] backed by a blocking HTTP client
pub struct HttpDownloader {
    client: Client,
}

impl HttpDownloader {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

impl Downloader for HttpDownloader {
    fn fetch(
        &self,
        url: &str,
        destination: &Path,
        on_progress: &mut dyn FnMut(Progress),
    ) -> Result<DownloadTask> {
        log::info!("Downloading {url} to {}", destination.display());

        let response = self.client.get(url).send().map_err(|e| ApkError::Network {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApkError::Network {
                url: url.to_string(),
                reason: format!("HTTP {status}"),
            });
        }

        let mut task = DownloadTask::new(url, destination);
        task.expected_size = response.content_length();
        log::debug!("Content-Length: {:?}", task.expected_size);

        let file = File::create(destination)
            .map_err(|e| ApkError::io("Failed to create", destination, &e))?;
        copy_with_progress(response, file, &mut task, on_progress)?;

        log::info!(
            "Downloaded {} bytes to {}",
            task.bytes_written,
            destination.display()
        );
        Ok(task)
    }
}

/// Copy `reader` into `writer` block by block, updating `task` and reporting progress.
///
/// Read failures come from the remote side and are reported as network errors;
/// write failures are reported as IO errors on the destination.
pub fn copy_with_progress<R: Read, W: Write>(
    mut reader: R,
    mut writer: W,
    task: &mut DownloadTask,
    on_progress: &mut dyn FnMut(Progress),
) -> Result<()> {
    let mut buffer = [0u8; BLOCK_SIZE];

    loop {
        let read = match reader.read(&mut buffer) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => {
                return Err(ApkError::Network {
                    url: task.source_url.clone(),
                    reason: e.to_string(),
                });
            }
        };

        writer
            .write_all(&buffer[..read])
            .map_err(|e| ApkError::io("Failed to write", &task.destination, &e))?;
        on_progress(task.record(read));
    }

    writer
        .flush()
        .map_err(|e| ApkError::io("Failed to flush", &task.destination, &e))
}
