//! Terrain construction errors.
//!
//! Every variant is fatal to construction: there is no partially built
//! terrain, callers treat any of these as "terrain unavailable".

use std::collections::TryReserveError;
use std::path::{Path, PathBuf};

/// Errors returned while loading and building a terrain.
#[derive(Debug, thiserror::Error)]
pub enum TerrainError {
    /// A source file is missing or unreadable.
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Image dimensions disagree, pixel data is truncated, or the file is
    /// not a decodable image.
    #[error("malformed terrain data in {origin}: {reason}")]
    Format { origin: String, reason: String },

    /// Setup parameters are unusable (even or too-small dimensions, bad
    /// height scale, cell size out of range).
    #[error("invalid terrain configuration: {0}")]
    Config(String),

    /// A construction buffer could not be allocated.
    #[error("out of memory allocating {what}")]
    OutOfMemory {
        what: &'static str,
        #[source]
        source: TryReserveError,
    },
}

impl TerrainError {
    pub(crate) fn format(origin: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Format {
            origin: origin.into(),
            reason: reason.into(),
        }
    }

    /// Classify an `image` crate failure for `path`.
    ///
    /// A file that ends early is a format problem, not an I/O one.
    pub(crate) fn from_image(path: &Path, err: image::ImageError) -> Self {
        match err {
            image::ImageError::IoError(source)
                if source.kind() != std::io::ErrorKind::UnexpectedEof =>
            {
                Self::Io {
                    path: path.to_path_buf(),
                    source,
                }
            }
            other => Self::format(path.display().to_string(), other.to_string()),
        }
    }
}

/// An empty `Vec` with room for exactly `len` elements, or `OutOfMemory`.
pub(crate) fn try_alloc<T>(len: usize, what: &'static str) -> Result<Vec<T>, TerrainError> {
    let mut buf = Vec::new();
    buf.try_reserve_exact(len)
        .map_err(|source| TerrainError::OutOfMemory { what, source })?;
    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_try_alloc_reserves_capacity() {
        let buf: Vec<u32> = try_alloc(1024, "test buffer").unwrap();
        assert!(buf.is_empty());
        assert!(buf.capacity() >= 1024);
    }

    #[test]
    fn test_try_alloc_reports_out_of_memory() {
        let err = try_alloc::<u64>(usize::MAX / 2, "huge buffer").unwrap_err();
        assert!(matches!(err, TerrainError::OutOfMemory { what: "huge buffer", .. }));
    }

    #[test]
    fn test_missing_file_is_io() {
        let path = Path::new("definitely/not/here.bmp");
        let err = image::open(path).unwrap_err();
        assert!(matches!(
            TerrainError::from_image(path, err),
            TerrainError::Io { .. }
        ));
    }

    #[test]
    fn test_truncated_read_is_format() {
        let eof = std::io::Error::new(std::io::ErrorKind::UnexpectedEof, "short");
        let err = TerrainError::from_image(Path::new("x.bmp"), image::ImageError::IoError(eof));
        assert!(matches!(err, TerrainError::Format { .. }));
    }
}
