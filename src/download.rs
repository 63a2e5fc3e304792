//! Downloads remote files into the local cache.

use std::{
    fs,
    io::Write,
    path::{Path, PathBuf},
};

use futures::StreamExt;
use indicatif::ProgressBar;
use log::{debug, info};
use tempfile::NamedTempFile;

use crate::{
    cli::{bytes_style, create_spinner},
    config::Config,
    error::DownloadError,
};

/// Returns the cached copy of `url`, downloading it first when it is missing
/// or when a refresh was requested.
pub async fn fetch_cached(
    config: &Config,
    url: &str,
    file_name: &str,
) -> Result<PathBuf, DownloadError> {
    let file_path = config.cache_dir.join(file_name);

    if file_path.is_file() && !config.refresh {
        debug!("Using cached `{}`", file_path.display());
        return Ok(file_path);
    }

    fs::create_dir_all(&config.cache_dir)
        .map_err(|e| DownloadError::CacheWrite(config.cache_dir.clone(), e))?;

    info!("Downloading {}", url);
    let bar = create_spinner(format!("Downloading {}...", file_name));
    download_with_progress(url, &file_path, &bar).await?;
    bar.finish_with_message(format!("{} downloaded", file_name));

    Ok(file_path)
}

/// Streams `url` to `file_path`. The body is written to a temporary file in
/// the same directory and moved into place once complete.
pub async fn download_with_progress(
    url: &str,
    file_path: &Path,
    progress_bar: &ProgressBar,
) -> Result<(), DownloadError> {
    let response = reqwest::get(url)
        .await
        .map_err(|e| DownloadError::Request(url.to_string(), e))?;

    if !response.status().is_success() {
        return Err(DownloadError::HttpStatus {
            url: url.to_string(),
            status: response.status(),
        });
    }

    // Switch the spinner to a byte counter when the size is known
    let total_size = response.content_length().unwrap_or(0);
    if total_size > 0 {
        progress_bar.set_length(total_size);
        progress_bar.set_style(bytes_style());
    }

    let parent = file_path.parent().unwrap_or_else(|| Path::new("."));
    let write_err = |e: std::io::Error| DownloadError::CacheWrite(file_path.to_path_buf(), e);

    let mut file = NamedTempFile::new_in(parent).map_err(write_err)?;
    let mut downloaded = 0u64;
    let mut stream = response.bytes_stream();

    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(|e| DownloadError::Request(url.to_string(), e))?;
        file.write_all(&chunk).map_err(write_err)?;
        downloaded += chunk.len() as u64;
        progress_bar.set_position(downloaded);
    }

    file.persist(file_path).map_err(|e| write_err(e.error))?;

    Ok(())
}

/// Last path segment of a URL.
pub fn file_name_from_url(url: &str) -> &str {
    url.rsplit('/').next().unwrap_or(url)
}

// -- Tests -------------------------------------------------------------------
