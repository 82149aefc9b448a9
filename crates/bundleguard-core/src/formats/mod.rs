//! Archive format readers.

pub mod detect;
pub mod tar;
pub mod traits;
pub mod zip;

// Re-export main types for convenience
pub use detect::ArchiveType;
pub use tar::TarReader;
pub use traits::ArchiveReader;
pub use zip::ZipReader;

use crate::Result;

/// Opens the matching reader for a buffer based on its magic bytes.
///
/// # Errors
///
/// Returns `BundleError::InvalidArchive` if the format is unsupported or the
/// archive directory cannot be parsed.
pub fn open_reader(buffer: &[u8]) -> Result<Box<dyn ArchiveReader + '_>> {
    Ok(match detect::detect_format(buffer)? {
        ArchiveType::Zip => Box::new(ZipReader::new(buffer)?),
        ArchiveType::Tar => Box::new(TarReader::plain(buffer)),
        ArchiveType::TarGz => Box::new(TarReader::gzip(buffer)),
    })
}
