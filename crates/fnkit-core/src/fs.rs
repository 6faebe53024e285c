//! File system helpers: existence checks, directory listing and streamed downloads

use std::ffi::OsStr;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use url::Url;
use walkdir::WalkDir;

/// A regular file found on disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileInfo {
    /// File name without its directory
    pub name: String,
    /// Full path to the file
    pub path: PathBuf,
}

#[derive(Debug, Error)]
pub enum DownloadError {
    #[error("Request to {url} failed: {source}")]
    Request {
        url: Url,
        #[source]
        source: reqwest::Error,
    },

    #[error("Request to {url} failed: HTTP {status}")]
    Status { url: Url, status: u16 },

    #[error("Failed to write {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl DownloadError {
    /// HTTP status code of the response, when the server answered with an error
    pub fn status(&self) -> Option<u16> {
        match self {
            DownloadError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Check whether something exists at `path`. Any stat error counts as "absent".
///
/// Symlinks are not followed: a dangling link still occupies `path`.
pub async fn file_exists(path: &Path) -> bool {
    fs::symlink_metadata(path).await.is_ok()
}

/// Stream `url` into `target`, returning the number of bytes written.
///
/// Resolves only after the whole body has been written and flushed, so the file
/// is complete once this returns `Ok`.
pub async fn download_file(
    client: &reqwest::Client,
    url: &Url,
    target: &Path,
) -> Result<u64, DownloadError> {
    let request_err = |source| DownloadError::Request {
        url: url.clone(),
        source,
    };
    let io_err = |source| DownloadError::Io {
        path: target.to_path_buf(),
        source,
    };

    let mut response = client
        .get(url.clone())
        .send()
        .await
        .map_err(request_err)?;

    if !response.status().is_success() {
        return Err(DownloadError::Status {
            url: url.clone(),
            status: response.status().as_u16(),
        });
    }

    let mut file = fs::File::create(target).await.map_err(io_err)?;
    let mut written = 0u64;
    while let Some(chunk) = response.chunk().await.map_err(request_err)? {
        file.write_all(&chunk).await.map_err(io_err)?;
        written += chunk.len() as u64;
    }
    file.flush().await.map_err(io_err)?;
    file.sync_all().await.map_err(io_err)?;

    tracing::debug!(%url, bytes = written, target = %target.display(), "download complete");
    Ok(written)
}

/// List the regular files directly inside `dir`.
///
/// `ext` filters on the extension including the dot (".js"); an empty string keeps
/// everything. Order follows the directory listing, so sort if you need stability.
pub fn get_dir_content(dir: &Path, ext: &str) -> io::Result<Vec<FileInfo>> {
    collect_files(dir, ext, 1)
}

/// Like [`get_dir_content`] but descends into subdirectories
pub fn walk_dir_content(dir: &Path, ext: &str) -> io::Result<Vec<FileInfo>> {
    collect_files(dir, ext, usize::MAX)
}

fn collect_files(dir: &Path, ext: &str, max_depth: usize) -> io::Result<Vec<FileInfo>> {
    let mut files = Vec::new();
    for entry in WalkDir::new(dir).min_depth(1).max_depth(max_depth) {
        let entry = entry.map_err(io::Error::from)?;
        if !entry.file_type().is_file() {
            continue;
        }
        if !ext.is_empty() && !has_extension(entry.path(), ext) {
            continue;
        }
        files.push(FileInfo {
            name: entry.file_name().to_string_lossy().into_owned(),
            path: entry.into_path(),
        });
    }
    Ok(files)
}

fn has_extension(path: &Path, ext: &str) -> bool {
    let wanted = ext.trim_start_matches('.');
    path.extension().and_then(OsStr::to_str) == Some(wanted)
}
