//! SHA-256 integrity checks for cached archives.

use sha2::{Digest, Sha256};
use std::io::Read;
use std::path::Path;
use tracing::debug;

use toolstage_core::{Error, Result};

/// Compute the SHA-256 of a file as lowercase hex.
pub fn file_sha256(path: &Path) -> Result<String> {
    let mut file = std::fs::File::open(path)?;
    let mut hasher = Sha256::new();
    let mut buffer = vec![0u8; 8192];

    loop {
        let n = file.read(&mut buffer)?;
        if n == 0 {
            break;
        }
        hasher.update(&buffer[..n]);
    }

    Ok(format!("{:x}", hasher.finalize()))
}

/// Verify a cached archive against its expected checksum.
///
/// On mismatch the archive is removed so the next run re-downloads it, and
/// a fatal [`Error::ChecksumMismatch`] is returned.
pub(crate) fn verify(archive: &Path, expected: &str) -> Result<()> {
    let actual = file_sha256(archive)?;
    if !actual.eq_ignore_ascii_case(expected) {
        // nothing partially verified is trusted; drop the bad payload
        let _ = std::fs::remove_file(archive);
        return Err(Error::checksum_mismatch(
            archive,
            expected.to_lowercase(),
            actual,
        ));
    }
    debug!(archive = %archive.display(), %actual, "Archive checksum verified");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    // SHA-256 of the empty input.
    const EMPTY_SHA256: &str = "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855";

    #[test]
    fn test_file_sha256_empty() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("empty");
        std::fs::write(&path, b"").unwrap();
        assert_eq!(file_sha256(&path).unwrap(), EMPTY_SHA256);
    }

    #[test]
    fn test_verify_accepts_uppercase_expected() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("empty");
        std::fs::write(&path, b"").unwrap();
        verify(&path, &EMPTY_SHA256.to_uppercase()).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_verify_mismatch_removes_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("payload");
        std::fs::write(&path, b"not what was promised").unwrap();

        let err = verify(&path, EMPTY_SHA256).unwrap_err();
        assert!(matches!(
            err,
            toolstage_core::Error::ChecksumMismatch { .. }
        ));
        assert!(!path.exists());
    }
}
