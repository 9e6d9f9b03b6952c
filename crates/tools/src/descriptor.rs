//! Per-tool acquisition facts.

use serde::Serialize;
use std::path::PathBuf;

use toolstage_core::BuildOptions;

/// Identity and acquisition facts for one external tool.
///
/// Descriptors are immutable configuration data, `const`-constructed next to
/// each tool implementation. The same descriptor must yield identical
/// results across repeated runs given identical disk state.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct ToolDescriptor {
    /// Unique registry key.
    pub name: &'static str,
    /// Download location; absent for tools pre-provisioned on the host or
    /// resolved from the invoking process.
    pub archive_url: Option<&'static str>,
    /// Override for the locally cached archive's file name; derived from the
    /// URL when absent.
    pub archive_file_name: Option<&'static str>,
    /// Expected SHA-256 of the downloaded archive.
    pub sha256: Option<&'static str>,
    /// Subdirectory the archive expands into, also used as the staging
    /// directory name.
    pub dir_part: Option<&'static str>,
}

impl ToolDescriptor {
    /// Create a descriptor for a tool with no archive.
    #[must_use]
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            archive_url: None,
            archive_file_name: None,
            sha256: None,
            dir_part: None,
        }
    }

    /// Set the download location.
    #[must_use]
    pub const fn with_url(mut self, url: &'static str) -> Self {
        self.archive_url = Some(url);
        self
    }

    /// Override the cached archive's file name.
    #[must_use]
    pub const fn with_archive_file_name(mut self, name: &'static str) -> Self {
        self.archive_file_name = Some(name);
        self
    }

    /// Set the expected archive checksum.
    #[must_use]
    pub const fn with_sha256(mut self, sha256: &'static str) -> Self {
        self.sha256 = Some(sha256);
        self
    }

    /// Set the extraction subdirectory name.
    #[must_use]
    pub const fn with_dir_part(mut self, dir_part: &'static str) -> Self {
        self.dir_part = Some(dir_part);
        self
    }

    /// The file name the archive is cached under: the configured override,
    /// or the final path segment of the URL.
    #[must_use]
    pub fn cache_file_name(&self) -> Option<&'static str> {
        self.archive_file_name.or_else(|| {
            self.archive_url
                .and_then(|url| url.rsplit('/').next())
                .filter(|name| !name.is_empty())
        })
    }

    /// This tool's staging directory under the tools root.
    #[must_use]
    pub fn build_dir(&self, opts: &BuildOptions) -> PathBuf {
        opts.tool_build_dir(self.dir_part.unwrap_or(self.name))
    }

    /// This tool's cached archive location, when it has an archive at all.
    #[must_use]
    pub fn archive_path(&self, opts: &BuildOptions) -> Option<PathBuf> {
        self.cache_file_name().map(|name| opts.archive_path(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NINJA: ToolDescriptor = ToolDescriptor::new("ninja")
        .with_url("https://github.com/ninja-build/ninja/releases/download/v1.8.2/ninja-win.zip")
        .with_archive_file_name("ninja-win-1.8.2.zip");

    const GO: ToolDescriptor =
        ToolDescriptor::new("go").with_url("https://dl.google.com/go/go1.10.windows-amd64.zip");

    #[test]
    fn test_cache_file_name_prefers_override() {
        assert_eq!(NINJA.cache_file_name(), Some("ninja-win-1.8.2.zip"));
    }

    #[test]
    fn test_cache_file_name_derived_from_url() {
        assert_eq!(GO.cache_file_name(), Some("go1.10.windows-amd64.zip"));
    }

    #[test]
    fn test_cache_file_name_absent_without_url() {
        assert_eq!(ToolDescriptor::new("msys2").cache_file_name(), None);
    }

    #[test]
    fn test_build_dir_uses_dir_part_or_name() {
        let opts = BuildOptions::new("/work");
        let cmake = ToolDescriptor::new("cmake").with_dir_part("cmake-3.7.2-win64-x64");
        assert_eq!(
            cmake.build_dir(&opts),
            PathBuf::from("/work/tools/cmake-3.7.2-win64-x64")
        );
        assert_eq!(NINJA.build_dir(&opts), PathBuf::from("/work/tools/ninja"));
    }

    #[test]
    fn test_archive_path() {
        let opts = BuildOptions::new("/work");
        assert_eq!(
            NINJA.archive_path(&opts),
            Some(PathBuf::from("/work/archives/ninja-win-1.8.2.zip"))
        );
        assert_eq!(ToolDescriptor::new("python").archive_path(&opts), None);
    }
}
