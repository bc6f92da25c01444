//! Client-side parameter checks.
//!
//! These mirror the limits enforced by the Open Platform so that obviously
//! bad requests fail fast with [`Pan123Error::Validation`] instead of a
//! round trip.

use crate::error::{Pan123Error, Result};
use std::path::Path;

pub const MAX_FILENAME_LENGTH: usize = 255;
pub const INVALID_FILENAME_CHARS: &str = "\"\\/:*?|><";
/// Developer upload limit: 10 GiB per file.
pub const MAX_FILE_SIZE: u64 = 10 * 1024 * 1024 * 1024;
pub const MAX_BATCH_SIZE: usize = 100;
pub const MAX_PAGE_LIMIT: u32 = 100;
pub const MAX_BLACKLIST_IPS: usize = 2000;

/// Check a file or folder name.
///
/// Rejects empty names, names over 255 characters, all-whitespace names and
/// names containing any of `"\/:*?|><`.
pub fn filename(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(invalid("Filename cannot be empty"));
    }
    if name.chars().count() > MAX_FILENAME_LENGTH {
        return Err(invalid(format!(
            "Filename must be less than {} characters",
            MAX_FILENAME_LENGTH + 1
        )));
    }
    if name.trim().is_empty() {
        return Err(invalid("Filename cannot be all spaces"));
    }
    if name.chars().any(|c| INVALID_FILENAME_CHARS.contains(c)) {
        return Err(invalid(format!(
            "Filename cannot contain any of these characters: {INVALID_FILENAME_CHARS}"
        )));
    }
    Ok(())
}

/// Check that `path` is a non-empty regular file within the upload limit.
///
/// Returns the file size.
pub async fn upload_source(path: &Path) -> Result<u64> {
    let meta = tokio::fs::metadata(path)
        .await
        .map_err(|_| invalid(format!("File not found: {}", path.display())))?;
    if !meta.is_file() {
        return Err(invalid(format!("Not a file: {}", path.display())));
    }
    let size = meta.len();
    if size > MAX_FILE_SIZE {
        #[allow(clippy::cast_precision_loss)]
        let actual_gb = size as f64 / f64::from(1u32 << 30);
        return Err(invalid(format!(
            "File size exceeds 10GB limit (actual: {actual_gb:.2}GB)"
        )));
    }
    if size == 0 {
        return Err(invalid("File is empty (0 bytes)"));
    }
    Ok(size)
}

/// Check the number of items in a batch operation (1..=100).
pub fn batch_size(count: usize, operation: &str) -> Result<()> {
    if count == 0 {
        return Err(invalid(format!("Batch {operation} requires at least 1 item")));
    }
    if count > MAX_BATCH_SIZE {
        return Err(invalid(format!(
            "Batch {operation} limited to {MAX_BATCH_SIZE} items (requested: {count})"
        )));
    }
    Ok(())
}

/// Check a pagination limit (1..=100).
pub fn page_limit(limit: u32) -> Result<()> {
    if limit == 0 {
        return Err(invalid("Limit must be greater than 0"));
    }
    if limit > MAX_PAGE_LIMIT {
        return Err(invalid(format!("Limit cannot exceed {MAX_PAGE_LIMIT}")));
    }
    Ok(())
}

fn invalid(msg: impl Into<String>) -> Pan123Error {
    Pan123Error::Validation(msg.into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filename_rules() {
        assert!(filename("report.pdf").is_ok());
        assert!(filename("中文 名称.txt").is_ok());
        assert!(filename(&"a".repeat(255)).is_ok());

        let err = filename(&"a".repeat(256)).unwrap_err();
        assert!(err.to_string().contains("must be less than"));
        let err = filename("invalid/filename.txt").unwrap_err();
        assert!(err.to_string().contains("cannot contain"));
        assert!(filename("").is_err());
        assert!(filename("   ").is_err());
        for c in INVALID_FILENAME_CHARS.chars() {
            assert!(filename(&format!("a{c}b")).is_err(), "accepted {c:?}");
        }
    }

    #[test]
    fn batch_and_page_bounds() {
        assert!(batch_size(0, "delete").is_err());
        assert!(batch_size(1, "delete").is_ok());
        assert!(batch_size(100, "move").is_ok());
        assert!(batch_size(101, "move").is_err());

        assert!(page_limit(0).is_err());
        assert!(page_limit(100).is_ok());
        assert!(page_limit(101).is_err());
    }

    #[tokio::test]
    async fn upload_source_checks() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.bin");
        let err = upload_source(&missing).await.unwrap_err();
        assert!(err.to_string().contains("not found"));
        let err = upload_source(dir.path()).await.unwrap_err();
        assert!(err.to_string().contains("Not a file"));

        let empty = dir.path().join("empty.bin");
        std::fs::write(&empty, b"").unwrap();
        let err = upload_source(&empty).await.unwrap_err();
        assert!(err.to_string().contains("empty"));

        let ok = dir.path().join("ok.bin");
        std::fs::write(&ok, b"hello").unwrap();
        assert_eq!(upload_source(&ok).await.unwrap(), 5);
    }
}
