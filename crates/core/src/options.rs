//! Orchestrator options.
//!
//! One `BuildOptions` instance is built per invocation and handed to the
//! orchestrator. Root directories and override paths come from the caller
//! (typically CLI parsing, which lives outside this layer).

use std::path::{Path, PathBuf};

/// Options controlling where tools are staged and how acquisition behaves.
#[derive(Debug, Clone)]
pub struct BuildOptions {
    /// Root directory tools are extracted into.
    pub tools_root_dir: PathBuf,
    /// Local cache for downloaded archives.
    pub archives_dir: PathBuf,
    /// Trust existing marker files without re-verifying cached archives.
    pub fast_build: bool,
    /// Root of a pre-installed shell environment (e.g. an msys64 tree).
    pub msys_dir: Option<PathBuf>,
    /// Externally supplied interpreter location, bypassing self-resolution.
    pub python_dir: Option<PathBuf>,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self::new(default_root_dir())
    }
}

impl BuildOptions {
    /// Create options rooted at the given directory.
    ///
    /// Staged tools land under `<root>/tools` and downloaded archives under
    /// `<root>/archives`.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        Self {
            tools_root_dir: root.join("tools"),
            archives_dir: root.join("archives"),
            fast_build: false,
            msys_dir: None,
            python_dir: None,
        }
    }

    /// Set the staging root for extracted tools.
    #[must_use]
    pub fn with_tools_root_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.tools_root_dir = path.into();
        self
    }

    /// Set the archive cache directory.
    #[must_use]
    pub fn with_archives_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.archives_dir = path.into();
        self
    }

    /// Set fast-build mode.
    #[must_use]
    pub fn with_fast_build(mut self, fast: bool) -> Self {
        self.fast_build = fast;
        self
    }

    /// Point at a pre-installed shell environment root.
    #[must_use]
    pub fn with_msys_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.msys_dir = Some(path.into());
        self
    }

    /// Point at a pre-installed interpreter directory.
    #[must_use]
    pub fn with_python_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.python_dir = Some(path.into());
        self
    }

    /// Staging directory for a tool, by its directory part.
    #[must_use]
    pub fn tool_build_dir(&self, dir_part: &str) -> PathBuf {
        self.tools_root_dir.join(dir_part)
    }

    /// Cached archive path for a file name.
    #[must_use]
    pub fn archive_path(&self, file_name: &str) -> PathBuf {
        self.archives_dir.join(file_name)
    }

    /// The staging root.
    #[must_use]
    pub fn tools_root(&self) -> &Path {
        &self.tools_root_dir
    }
}

/// Default root directory for staged tools and cached archives.
#[must_use]
pub fn default_root_dir() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(|| PathBuf::from(".cache"))
        .join("toolstage")
}
