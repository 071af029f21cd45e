use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use thiserror::Error;

use super::constants::APP_DIR_NAME;

#[derive(Error, Debug)]
pub enum ModelResolveError {
    #[error("model file not found: {0}")]
    NotFound(PathBuf),
    #[error("failed to create cache directory: {0}")]
    CacheDir(#[source] std::io::Error),
    #[error("download failed for {url}: {source}")]
    Download {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("failed to write model to {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("could not determine cache directory")]
    NoCacheDir,
}

/// Progress callback: `(bytes_downloaded, total_bytes)`.
/// `total_bytes` is 0 if the server didn't provide Content-Length.
pub type ProgressFn = Box<dyn Fn(u64, u64) + Send>;

/// Locate the speech model, downloading it into the user cache if needed.
///
/// An explicit path always wins and must exist. Otherwise the cached copy is
/// used, and only if that is missing is the model fetched from `url`.
pub fn resolve(
    name: &str,
    url: &str,
    explicit_path: Option<&Path>,
    progress: Option<ProgressFn>,
) -> Result<PathBuf, ModelResolveError> {
    if let Some(path) = explicit_path {
        return if path.is_file() {
            Ok(path.to_path_buf())
        } else {
            Err(ModelResolveError::NotFound(path.to_path_buf()))
        };
    }

    let cache_dir = model_cache_dir()?;
    resolve_in(&cache_dir, name, url, progress)
}

fn resolve_in(
    cache_dir: &Path,
    name: &str,
    url: &str,
    progress: Option<ProgressFn>,
) -> Result<PathBuf, ModelResolveError> {
    let cached_path = cache_dir.join(name);
    if cached_path.is_file() {
        log::info!("Using cached model {}", cached_path.display());
        return Ok(cached_path);
    }

    log::info!("Downloading {name} to {}", cache_dir.display());
    fs::create_dir_all(cache_dir).map_err(ModelResolveError::CacheDir)?;
    download(url, &cached_path, progress)?;
    Ok(cached_path)
}

/// Platform-specific model cache directory.
///
/// - macOS: `~/Library/Application Support/EnLearn/models/`
/// - Linux: `$XDG_CACHE_HOME/EnLearn/models/` or `~/.cache/EnLearn/models/`
/// - Windows: `%LOCALAPPDATA%/EnLearn/models/`
pub fn model_cache_dir() -> Result<PathBuf, ModelResolveError> {
    #[cfg(target_os = "macos")]
    let base = dirs::data_dir();
    #[cfg(not(target_os = "macos"))]
    let base = dirs::cache_dir();

    base.map(|d| d.join(APP_DIR_NAME).join("models"))
        .ok_or(ModelResolveError::NoCacheDir)
}

fn download(url: &str, dest: &Path, progress: Option<ProgressFn>) -> Result<(), ModelResolveError> {
    let download_err = |source| ModelResolveError::Download {
        url: url.to_string(),
        source,
    };
    let response = reqwest::blocking::get(url)
        .and_then(|r| r.error_for_status())
        .map_err(download_err)?;
    let total = response.content_length().unwrap_or(0);
    let bytes = response.bytes().map_err(download_err)?;

    // Write next to the destination, then rename, so a failed download
    // never leaves a truncated model in the cache.
    let temp_path = dest.with_extension("part");
    if let Err(e) = write_model(&temp_path, &bytes, total, progress.as_ref()) {
        let _ = fs::remove_file(&temp_path);
        return Err(e);
    }

    fs::rename(&temp_path, dest).map_err(|source| ModelResolveError::Write {
        path: dest.to_path_buf(),
        source,
    })
}

fn write_model(
    path: &Path,
    bytes: &[u8],
    total: u64,
    progress: Option<&ProgressFn>,
) -> Result<(), ModelResolveError> {
    let write_err = |source| ModelResolveError::Write {
        path: path.to_path_buf(),
        source,
    };

    let mut file = fs::File::create(path).map_err(write_err)?;
    let mut downloaded: u64 = 0;
    // Report progress per megabyte
    for chunk in bytes.chunks(1024 * 1024) {
        file.write_all(chunk).map_err(write_err)?;
        downloaded += chunk.len() as u64;
        if let Some(cb) = progress {
            cb(downloaded, total);
        }
    }
    file.flush().map_err(write_err)
}
