//! Archive acquisition service for toolstage.
//!
//! Given a source archive (or a bare downloadable executable), a destination
//! root, and the file whose existence proves a prior extraction completed,
//! this crate ensures the decompressed contents are materialized on disk and
//! reports whether any new work was performed. Downloads are verified against
//! an expected SHA-256 before anything is extracted, and every step is
//! idempotent: re-running against unchanged disk state does nothing.
//!
//! Supported payloads: zip, tar.gz, tar.xz, and single bare executables.

mod archive;
mod checksum;
mod download;
mod request;

pub use archive::ArchiveExtractor;
pub use checksum::file_sha256;
pub use request::ExtractRequest;

use toolstage_core::Result;

/// Byte-level acquisition service consumed by tool materialization.
///
/// Implementations must be idempotent: calling [`Extractor::extract`] twice
/// against the same disk state leaves the tree unchanged and returns `false`
/// the second time.
pub trait Extractor {
    /// Ensure the request's payload is staged at its destination.
    ///
    /// Returns `true` when a download or extraction actually happened, and
    /// `false` when everything was already in place.
    ///
    /// # Errors
    ///
    /// Fails on download errors, checksum mismatches, unsupported archive
    /// formats, and IO failures. No recovery is attempted here; callers
    /// abort the acquisition phase.
    fn extract(&self, req: &ExtractRequest) -> Result<bool>;
}
