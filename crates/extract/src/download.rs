//! Blocking archive download.
//!
//! Acquisition runs strictly sequentially, one tool at a time, so the
//! blocking reqwest client is used here rather than an async runtime.

use std::fs;
use std::path::Path;
use tracing::info;

use toolstage_core::{Error, Result};

/// Download a URL to the given cache path.
///
/// The payload is streamed to a `.part` neighbor and renamed into place
/// afterwards, so an interrupted download never masquerades as a cached
/// archive.
pub(crate) fn download_to(url: &str, dest: &Path) -> Result<()> {
    info!(%url, dest = %dest.display(), "Downloading archive");

    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent)?;
    }

    let client = reqwest::blocking::Client::builder()
        .user_agent("toolstage")
        .build()
        .map_err(|e| Error::download(url, e.to_string()))?;

    let mut response = client
        .get(url)
        .send()
        .map_err(|e| Error::download(url, e.to_string()))?;

    if !response.status().is_success() {
        return Err(Error::download(url, format!("HTTP {}", response.status())));
    }

    let file_name = dest
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| Error::configuration(format!("invalid archive path: {}", dest.display())))?;
    let partial = dest.with_file_name(format!("{file_name}.part"));

    let mut file = fs::File::create(&partial)?;
    let bytes = std::io::copy(&mut response, &mut file).map_err(|e| {
        let _ = fs::remove_file(&partial);
        Error::download(url, e.to_string())
    })?;
    file.sync_all()?;
    drop(file);

    fs::rename(&partial, dest)?;

    info!(%url, bytes, "Download complete");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_download_bad_url_is_download_error() {
        let temp = tempfile::TempDir::new().unwrap();
        let dest = temp.path().join("x.zip");
        let err = download_to("http://127.0.0.1:1/unreachable.zip", &dest).unwrap_err();
        assert!(matches!(err, Error::Download { .. }));
        assert!(!dest.exists());
    }
}
