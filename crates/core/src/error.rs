//! Error types for the acquisition phase.
//!
//! No local recovery or retry happens at this layer: every error aborts the
//! whole acquisition run. A build driven by a missing or wrong-version tool
//! produces far harder failures downstream than an early abort does.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for toolstage operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while acquiring and staging tools.
#[derive(Error, Debug)]
pub enum Error {
    /// A tool name was requested that no registry entry exists for.
    #[error("Unknown tool '{0}': not present in the tool registry")]
    UnknownTool(String),

    /// Invalid or incomplete configuration.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Downloaded content does not match its expected checksum.
    #[error(
        "Checksum mismatch for {}: expected {expected}, got {actual}", archive.display()
    )]
    ChecksumMismatch {
        /// The archive that failed verification.
        archive: PathBuf,
        /// The checksum the descriptor expects.
        expected: String,
        /// The checksum computed from disk.
        actual: String,
    },

    /// Network failure or HTTP error status while downloading.
    #[error("Download of {url} failed: {message}")]
    Download {
        /// The source URL.
        url: String,
        /// Error message.
        message: String,
    },

    /// A pre-provisioned host location a tool relies on does not exist.
    #[error("Tool '{tool}' expects a pre-installed resource at {}", path.display())]
    MissingResource {
        /// The tool that needs the resource.
        tool: String,
        /// The location that was not found.
        path: PathBuf,
    },

    /// The archive extension does not map to a supported format.
    #[error("Unsupported archive format: {}", .0.display())]
    UnsupportedArchive(PathBuf),

    /// The archive could not be decoded.
    #[error("Failed to extract {}: {message}", archive.display())]
    Extraction {
        /// The archive being extracted.
        archive: PathBuf,
        /// Error message.
        message: String,
    },

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create an unknown-tool error.
    #[must_use]
    pub fn unknown_tool(name: impl Into<String>) -> Self {
        Self::UnknownTool(name.into())
    }

    /// Create a configuration error.
    #[must_use]
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    /// Create a checksum mismatch error.
    #[must_use]
    pub fn checksum_mismatch(
        archive: impl Into<PathBuf>,
        expected: impl Into<String>,
        actual: impl Into<String>,
    ) -> Self {
        Self::ChecksumMismatch {
            archive: archive.into(),
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    /// Create a download error.
    #[must_use]
    pub fn download(url: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Download {
            url: url.into(),
            message: message.into(),
        }
    }

    /// Create a missing-resource error.
    #[must_use]
    pub fn missing_resource(tool: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self::MissingResource {
            tool: tool.into(),
            path: path.into(),
        }
    }

    /// Create an extraction error.
    #[must_use]
    pub fn extraction(archive: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Extraction {
            archive: archive.into(),
            message: message.into(),
        }
    }
}
