//! Extraction request parameters.

use std::path::{Path, PathBuf};

/// Everything the extraction service needs for one payload.
///
/// Built by tool materialization from the tool's descriptor plus its bound
/// on-disk locations.
#[derive(Debug, Clone)]
pub struct ExtractRequest {
    /// Download location, when the archive may not be cached yet.
    pub url: Option<String>,
    /// Local archive cache path.
    pub archive: PathBuf,
    /// Directory the archive's contents expand into.
    pub dest_root: PathBuf,
    /// Subdirectory name the archive is expected to expand to, when known.
    /// Used to clear partially extracted content before a redo.
    pub dir_part: Option<String>,
    /// File whose existence proves a prior extraction completed.
    pub check_file: PathBuf,
    /// Expected SHA-256 of the archive (lowercase hex), verified before
    /// extraction when present.
    pub expected_sha256: Option<String>,
    /// Exact destination file for single-executable payloads.
    pub force_dest: Option<PathBuf>,
    /// Skip extraction when `check_file` already exists.
    pub use_marker: bool,
    /// Trust an existing `check_file` without re-verifying the archive
    /// (fast-build mode).
    pub trust_existing: bool,
}

impl ExtractRequest {
    /// Create a request with marker-based skipping enabled.
    #[must_use]
    pub fn new(
        archive: impl Into<PathBuf>,
        dest_root: impl Into<PathBuf>,
        check_file: impl Into<PathBuf>,
    ) -> Self {
        Self {
            url: None,
            archive: archive.into(),
            dest_root: dest_root.into(),
            dir_part: None,
            check_file: check_file.into(),
            expected_sha256: None,
            force_dest: None,
            use_marker: true,
            trust_existing: false,
        }
    }

    /// Set the download location.
    #[must_use]
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    /// Set the expected extraction subdirectory.
    #[must_use]
    pub fn with_dir_part(mut self, dir_part: impl Into<String>) -> Self {
        self.dir_part = Some(dir_part.into());
        self
    }

    /// Set the expected archive checksum.
    #[must_use]
    pub fn with_sha256(mut self, sha256: impl Into<String>) -> Self {
        self.expected_sha256 = Some(sha256.into());
        self
    }

    /// Set the exact destination for a single-executable payload.
    #[must_use]
    pub fn with_force_dest(mut self, dest: impl Into<PathBuf>) -> Self {
        self.force_dest = Some(dest.into());
        self
    }

    /// Enable or disable marker-based skipping.
    #[must_use]
    pub fn with_marker(mut self, use_marker: bool) -> Self {
        self.use_marker = use_marker;
        self
    }

    /// Enable or disable fast-build trust of existing markers.
    #[must_use]
    pub fn with_trust_existing(mut self, trust: bool) -> Self {
        self.trust_existing = trust;
        self
    }

    /// The archive's file name, for logging and format detection.
    #[must_use]
    pub fn archive_file_name(&self) -> &str {
        self.archive
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default()
    }

    /// The directory stale content is cleared from before a redo.
    #[must_use]
    pub fn expanded_dir(&self) -> Option<PathBuf> {
        self.dir_part.as_deref().map(|p| self.dest_root.join(p))
    }

    /// The expected extraction subdirectory, when configured.
    #[must_use]
    pub fn dir_part(&self) -> Option<&str> {
        self.dir_part.as_deref()
    }

    /// The verification file.
    #[must_use]
    pub fn check_file(&self) -> &Path {
        &self.check_file
    }
}
