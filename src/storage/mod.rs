use crate::error::{Result, TorrentJsonError};
use std::path::{Path, PathBuf, MAIN_SEPARATOR};
use tokio::fs;
use tracing::{debug, info};

/// Extension given to documents written into a directory
const DOCUMENT_EXTENSION: &str = "json";

/// Resolve where the JSON document for `torrent_path` should be written.
///
/// `target` names a directory when it already exists as one or ends with a
/// path separator; the document then takes the torrent's file stem. Any other
/// `target` is used as the file path itself.
pub async fn resolve_output_path(torrent_path: &Path, target: &Path) -> Result<PathBuf> {
    let is_dir = match fs::metadata(target).await {
        Ok(meta) => meta.is_dir(),
        Err(_) => names_directory(target),
    };

    if !is_dir {
        return Ok(target.to_path_buf());
    }

    let stem = torrent_path.file_stem().ok_or_else(|| {
        TorrentJsonError::InvalidOutput(format!(
            "cannot derive a file name from {}",
            torrent_path.display()
        ))
    })?;

    let mut file_name = stem.to_os_string();
    file_name.push(".");
    file_name.push(DOCUMENT_EXTENSION);
    Ok(target.join(file_name))
}

fn names_directory(target: &Path) -> bool {
    let raw = target.as_os_str().to_string_lossy();
    raw.ends_with(MAIN_SEPARATOR) || raw.ends_with('/')
}

/// Write the document for `torrent_path` to `target`, returning the final path
pub async fn write_document(torrent_path: &Path, target: &Path, document: &str) -> Result<PathBuf> {
    let path = resolve_output_path(torrent_path, target).await?;

    // Create parent directories
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).await?;
        }
    }

    debug!("Writing {} bytes to {}", document.len(), path.display());
    fs::write(&path, document).await?;

    info!("Document written to {}", path.display());
    Ok(path)
}
