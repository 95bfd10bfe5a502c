use super::GeneratedContract;
use std::fmt;
use std::io::{Cursor, Write};
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

/// Bundles the generated documents into a single zip archive, one entry
/// per contract, preserving the per-row filenames.
pub fn bundle(contracts: &[GeneratedContract]) -> Result<Vec<u8>, ArchiveError> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options: FileOptions<'_, ()> =
        FileOptions::default().compression_method(CompressionMethod::Deflated);
    for contract in contracts {
        writer.start_file(contract.filename.as_str(), options)?;
        writer.write_all(&contract.bytes)?;
    }
    let cursor = writer.finish()?;
    Ok(cursor.into_inner())
}

#[derive(Debug)]
pub enum ArchiveError {
    Io(std::io::Error),
    Zip(zip::result::ZipError),
}

impl fmt::Display for ArchiveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArchiveError::Io(err) => write!(f, "failed to write archive entry: {}", err),
            ArchiveError::Zip(err) => write!(f, "failed to build archive: {}", err),
        }
    }
}

impl std::error::Error for ArchiveError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ArchiveError::Io(err) => Some(err),
            ArchiveError::Zip(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for ArchiveError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<zip::result::ZipError> for ArchiveError {
    fn from(err: zip::result::ZipError) -> Self {
        Self::Zip(err)
    }
}
