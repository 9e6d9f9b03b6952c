//! The production extraction service.
//!
//! Policy, in order: fast-build trust of existing markers, download-if-not-
//! cached, checksum verification, marker-based skip, then extraction chosen
//! by the archive's extension. A payload with no recognized archive
//! extension is treated as a bare executable and copied to the exact
//! destination the request names.

use flate2::read::GzDecoder;
use std::fs;
use std::io::Read;
use std::path::Path;
use tracing::{debug, info, warn};
use xz2::read::XzDecoder;

use toolstage_core::{Error, Result};

use crate::request::ExtractRequest;
use crate::{Extractor, checksum, download};

/// Archive format, detected from the file name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ArchiveKind {
    Zip,
    TarGz,
    TarXz,
    /// A bare executable downloaded as-is.
    Raw,
}

impl ArchiveKind {
    fn from_name(name: &str) -> Self {
        if name.ends_with(".zip") {
            Self::Zip
        } else if name.ends_with(".tar.gz") || name.ends_with(".tgz") {
            Self::TarGz
        } else if name.ends_with(".tar.xz") || name.ends_with(".txz") {
            Self::TarXz
        } else {
            Self::Raw
        }
    }
}

/// The default [`Extractor`] implementation.
#[derive(Debug, Clone, Copy, Default)]
pub struct ArchiveExtractor;

impl ArchiveExtractor {
    /// Create an extractor.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Extractor for ArchiveExtractor {
    fn extract(&self, req: &ExtractRequest) -> Result<bool> {
        if req.trust_existing && req.use_marker && req.check_file.exists() {
            debug!(check_file = %req.check_file.display(), "Fast build: trusting existing marker");
            return Ok(false);
        }

        // Stage 1: make sure the archive is cached locally.
        let mut downloaded = false;
        if !req.archive.exists() {
            let url = req.url.as_deref().ok_or_else(|| {
                Error::configuration(format!(
                    "archive {} is not cached and no download location is configured",
                    req.archive.display()
                ))
            })?;
            download::download_to(url, &req.archive)?;
            downloaded = true;
        }

        // Stage 2: never trust cached content a checksum disagrees with.
        if let Some(expected) = &req.expected_sha256 {
            checksum::verify(&req.archive, expected)?;
        }

        // Stage 3: skip when prior extraction evidence is intact. A freshly
        // downloaded archive always re-extracts, whatever is on disk.
        if !downloaded && req.use_marker && req.check_file.exists() {
            debug!(
                archive = req.archive_file_name(),
                "Already extracted, nothing to do"
            );
            return Ok(false);
        }

        // Stage 4: clear remnants of an interrupted extraction before redoing.
        if let Some(expanded) = req.expanded_dir()
            && expanded.exists()
        {
            debug!(dir = %expanded.display(), "Removing stale extraction output");
            fs::remove_dir_all(&expanded)?;
        }

        fs::create_dir_all(&req.dest_root)?;

        match ArchiveKind::from_name(req.archive_file_name()) {
            ArchiveKind::Zip => unpack_zip(&req.archive, &req.dest_root)?,
            ArchiveKind::TarGz => {
                let file = fs::File::open(&req.archive)?;
                unpack_tar(GzDecoder::new(file), &req.dest_root)?;
            }
            ArchiveKind::TarXz => {
                let file = fs::File::open(&req.archive)?;
                unpack_tar(XzDecoder::new(file), &req.dest_root)?;
            }
            ArchiveKind::Raw => {
                let dest = req
                    .force_dest
                    .as_deref()
                    .ok_or_else(|| Error::UnsupportedArchive(req.archive.clone()))?;
                copy_single(&req.archive, dest)?;
            }
        }

        info!(
            archive = req.archive_file_name(),
            dest = %req.dest_root.display(),
            "Extracted archive"
        );
        Ok(true)
    }
}

/// Unpack a zip archive into the destination root.
fn unpack_zip(archive_path: &Path, dest: &Path) -> Result<()> {
    let file = fs::File::open(archive_path)?;
    let mut archive = zip::ZipArchive::new(file)
        .map_err(|e| Error::extraction(archive_path, format!("failed to open zip: {e}")))?;

    for i in 0..archive.len() {
        let mut entry = archive
            .by_index(i)
            .map_err(|e| Error::extraction(archive_path, format!("failed to read entry: {e}")))?;

        // enclosed_name rejects absolute paths and parent traversal
        let Some(rel_path) = entry.enclosed_name() else {
            warn!(entry = entry.name(), "Skipping unsafe path in zip");
            continue;
        };
        let out_path = dest.join(rel_path);

        if entry.is_dir() {
            fs::create_dir_all(&out_path)?;
        } else {
            if let Some(parent) = out_path.parent() {
                fs::create_dir_all(parent)?;
            }
            let mut out_file = fs::File::create(&out_path)?;
            std::io::copy(&mut entry, &mut out_file)?;

            #[cfg(unix)]
            if let Some(mode) = entry.unix_mode() {
                use std::os::unix::fs::PermissionsExt;
                fs::set_permissions(&out_path, fs::Permissions::from_mode(mode))?;
            }
        }
    }

    Ok(())
}

/// Unpack a tar stream into the destination root.
///
/// Link entries are skipped entirely; `unpack_in` refuses paths that would
/// land outside the destination.
fn unpack_tar<R: Read>(reader: R, dest: &Path) -> Result<()> {
    let mut archive = tar::Archive::new(reader);
    archive.set_preserve_permissions(true);

    for entry in archive.entries()? {
        let mut entry = entry?;
        let kind = entry.header().entry_type();
        if kind.is_symlink() || kind.is_hard_link() {
            warn!("Skipping link entry in tar archive");
            continue;
        }
        entry.unpack_in(dest)?;
    }

    Ok(())
}

/// Copy a bare executable payload to its exact destination.
fn copy_single(archive_path: &Path, dest: &Path) -> Result<()> {
    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::copy(archive_path, dest)?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mut perms = fs::metadata(dest)?.permissions();
        perms.set_mode(perms.mode() | 0o755);
        fs::set_permissions(dest, perms)?;
    }

    debug!(dest = %dest.display(), "Copied single-file payload");
    Ok(())
}
