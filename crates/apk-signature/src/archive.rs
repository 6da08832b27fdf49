//! Archive access for signature discovery
//!
//! The locator only needs two capabilities from a package: the ordered list
//! of entry names and the bytes of a single entry. [`ArchiveSource`] captures
//! those so the locator can run against a real ZIP file or an in-memory
//! listing.

use crate::error::{ApkSignatureError, Result};
use std::fs::File;
use std::io::{self, BufReader, Read, Seek};
use std::path::Path;
use tracing::trace;
use zip::ZipArchive;

/// Minimal archive capability used by the signature locator.
pub trait ArchiveSource {
    /// Entry names in the archive's own listing order.
    fn entry_names(&self) -> &[String];

    /// Read the full contents of one entry.
    fn read_entry(&mut self, name: &str) -> io::Result<Vec<u8>>;
}

/// [`ArchiveSource`] backed by a ZIP central directory.
pub struct ZipArchiveSource<R: Read + Seek> {
    archive: ZipArchive<R>,
    names: Vec<String>,
}

impl ZipArchiveSource<BufReader<File>> {
    /// Open a package from disk.
    pub fn open(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(|source| ApkSignatureError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        Self::from_reader(BufReader::new(file)).map_err(|source| {
            ApkSignatureError::InvalidContainer {
                path: path.to_path_buf(),
                source,
            }
        })
    }
}

impl<R: Read + Seek> ZipArchiveSource<R> {
    /// Read the central directory from any seekable reader.
    pub fn from_reader(reader: R) -> zip::result::ZipResult<Self> {
        let mut archive = ZipArchive::new(reader)?;

        let mut names = Vec::with_capacity(archive.len());
        for index in 0..archive.len() {
            let entry = archive.by_index_raw(index)?;
            names.push(entry.name().to_string());
        }
        trace!("Archive lists {} entries", names.len());

        Ok(Self { archive, names })
    }
}

impl<R: Read + Seek> ArchiveSource for ZipArchiveSource<R> {
    fn entry_names(&self) -> &[String] {
        &self.names
    }

    fn read_entry(&mut self, name: &str) -> io::Result<Vec<u8>> {
        let mut entry = self.archive.by_name(name)?;
        let mut data = Vec::with_capacity(usize::try_from(entry.size()).unwrap_or(0));
        entry.read_to_end(&mut data)?;
        Ok(data)
    }
}

/// Ordered in-memory archive listing.
#[derive(Debug, Clone, Default)]
pub struct MemoryArchive {
    names: Vec<String>,
    contents: Vec<Vec<u8>>,
}

impl MemoryArchive {
    /// Create an empty archive
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry; listing order follows insertion order.
    #[must_use]
    pub fn with_entry(mut self, name: impl Into<String>, data: impl Into<Vec<u8>>) -> Self {
        self.names.push(name.into());
        self.contents.push(data.into());
        self
    }
}

impl ArchiveSource for MemoryArchive {
    fn entry_names(&self) -> &[String] {
        &self.names
    }

    fn read_entry(&mut self, name: &str) -> io::Result<Vec<u8>> {
        self.names
            .iter()
            .position(|n| n == name)
            .map(|index| self.contents[index].clone())
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, format!("no entry {name}")))
    }
}
