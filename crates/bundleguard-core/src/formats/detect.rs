//! Archive format detection.
//!
//! Uploaded bundles arrive as bare byte buffers without a trustworthy file
//! name, so the format is sniffed from magic bytes rather than an extension.

use std::fmt;

use serde::Serialize;

use crate::BundleError;
use crate::Result;

/// ZIP local file header signature.
const ZIP_LOCAL_MAGIC: [u8; 4] = [0x50, 0x4B, 0x03, 0x04];

/// ZIP end-of-central-directory signature (an archive with no entries).
const ZIP_EMPTY_MAGIC: [u8; 4] = [0x50, 0x4B, 0x05, 0x06];

/// ZIP spanned/split archive marker.
const ZIP_SPANNED_MAGIC: [u8; 4] = [0x50, 0x4B, 0x07, 0x08];

/// Gzip member header.
const GZIP_MAGIC: [u8; 2] = [0x1F, 0x8B];

/// POSIX `ustar` magic, shared by GNU tar (`ustar  \0`).
const TAR_MAGIC: &[u8; 5] = b"ustar";

/// Offset of the magic field inside the first tar header block.
const TAR_MAGIC_OFFSET: usize = 257;

/// Size of one tar block. An archive with no members is two zero blocks.
const TAR_BLOCK_SIZE: usize = 512;

/// Supported archive formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ArchiveType {
    /// ZIP archive.
    #[serde(rename = "zip")]
    Zip,
    /// Tar archive (uncompressed).
    #[serde(rename = "tar")]
    Tar,
    /// Gzip-compressed tar archive.
    #[serde(rename = "tar.gz")]
    TarGz,
}

impl ArchiveType {
    /// Returns the conventional short name of the format.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Zip => "zip",
            Self::Tar => "tar",
            Self::TarGz => "tar.gz",
        }
    }
}

impl fmt::Display for ArchiveType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Detects the archive type from the leading bytes of a buffer.
///
/// # Errors
///
/// Returns `BundleError::InvalidArchive` if no supported signature matches.
///
/// # Examples
///
/// ```
/// use bundleguard_core::formats::detect::ArchiveType;
/// use bundleguard_core::formats::detect::detect_format;
///
/// assert_eq!(detect_format(b"PK\x03\x04rest").unwrap(), ArchiveType::Zip);
/// assert!(detect_format(b"not an archive").is_err());
/// ```
pub fn detect_format(buffer: &[u8]) -> Result<ArchiveType> {
    if let Some(head) = buffer.get(..4)
        && [ZIP_LOCAL_MAGIC, ZIP_EMPTY_MAGIC, ZIP_SPANNED_MAGIC]
            .iter()
            .any(|magic| head == magic)
    {
        return Ok(ArchiveType::Zip);
    }

    if buffer.starts_with(&GZIP_MAGIC) {
        return Ok(ArchiveType::TarGz);
    }

    if let Some(magic) = buffer.get(TAR_MAGIC_OFFSET..TAR_MAGIC_OFFSET + TAR_MAGIC.len())
        && magic == TAR_MAGIC
    {
        return Ok(ArchiveType::Tar);
    }

    if buffer.len() >= 2 * TAR_BLOCK_SIZE && buffer[..TAR_BLOCK_SIZE].iter().all(|&b| b == 0) {
        return Ok(ArchiveType::Tar);
    }

    Err(BundleError::InvalidArchive(
        "unsupported archive format".to_string(),
    ))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::test_utils::TarTestBuilder;

    #[test]
    fn test_detect_zip_signatures() {
        assert_eq!(detect_format(b"PK\x03\x04....").unwrap(), ArchiveType::Zip);
        assert_eq!(detect_format(b"PK\x05\x06....").unwrap(), ArchiveType::Zip);
        assert_eq!(detect_format(b"PK\x07\x08....").unwrap(), ArchiveType::Zip);
    }

    #[test]
    fn test_detect_gzip() {
        assert_eq!(
            detect_format(&[0x1F, 0x8B, 0x08, 0x00]).unwrap(),
            ArchiveType::TarGz
        );
    }

    #[test]
    fn test_detect_tar() {
        let mut block = vec![0u8; 512];
        block[257..262].copy_from_slice(b"ustar");
        assert_eq!(detect_format(&block).unwrap(), ArchiveType::Tar);
    }

    #[test]
    fn test_detect_empty_tar() {
        let empty = TarTestBuilder::new().build();
        assert_eq!(detect_format(&empty).unwrap(), ArchiveType::Tar);

        // A single zero block is too short to be an end-of-archive marker
        assert!(detect_format(&[0u8; 512]).is_err());
    }

    #[test]
    fn test_detect_unknown() {
        let result = detect_format(b"%PDF-1.7");
        assert!(matches!(result, Err(BundleError::InvalidArchive(_))));
    }

    #[test]
    fn test_detect_empty_buffer() {
        assert!(detect_format(&[]).is_err());
        assert!(detect_format(b"PK").is_err());
    }

    #[test]
    fn test_archive_type_display() {
        assert_eq!(ArchiveType::Zip.to_string(), "zip");
        assert_eq!(ArchiveType::TarGz.to_string(), "tar.gz");
        assert_eq!(
            serde_json::to_string(&ArchiveType::TarGz).unwrap(),
            "\"tar.gz\""
        );
    }
}
