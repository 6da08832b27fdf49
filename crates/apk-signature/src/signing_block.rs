//! APK Signing Block presence check
//!
//! Packages signed with scheme v2 or later carry a binary signing block just
//! before the ZIP central directory, terminated by the magic
//! `APK Sig Block 42`. This module only reports whether that magic appears
//! in the final [`TAIL_WINDOW`] bytes of the file.
//!
//! The block's contents (signer sequences, digests, SDK bounds) are not
//! decoded, so a package signed only with v2+ produces no signing identity.
//! Blocks followed by a central directory larger than the window are not
//! seen.

use std::fs::File;
use std::io::{self, Read, Seek, SeekFrom};
use std::path::Path;
use tracing::trace;

/// Magic that terminates an APK Signing Block
pub const SIGNING_BLOCK_MAGIC: &[u8; 16] = b"APK Sig Block 42";

/// Number of trailing bytes inspected
pub const TAIL_WINDOW: u64 = 1024;

/// Check whether the signing block magic appears near the end of `reader`.
///
/// Inputs shorter than the window are read from offset 0.
pub fn detect_signing_block<R: Read + Seek>(reader: &mut R) -> io::Result<bool> {
    let len = reader.seek(SeekFrom::End(0))?;
    let start = len.saturating_sub(TAIL_WINDOW);
    reader.seek(SeekFrom::Start(start))?;

    let mut tail = Vec::with_capacity(usize::try_from(len - start).unwrap_or(0));
    reader.read_to_end(&mut tail)?;

    let found = tail
        .windows(SIGNING_BLOCK_MAGIC.len())
        .any(|window| window == SIGNING_BLOCK_MAGIC);
    trace!(
        "Signing block scan over {} tail bytes: {}",
        tail.len(),
        if found { "present" } else { "absent" }
    );
    Ok(found)
}

/// Scan a file on disk.
pub fn detect_signing_block_in_file(path: &Path) -> io::Result<bool> {
    let mut file = File::open(path)?;
    detect_signing_block(&mut file)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::io::{Cursor, Write};

    #[test]
    fn test_short_input_without_magic() {
        let mut data = Cursor::new(b"PK\x03\x04 tiny".to_vec());
        assert!(!detect_signing_block(&mut data).unwrap());
    }

    #[test]
    fn test_empty_input() {
        let mut data = Cursor::new(Vec::new());
        assert!(!detect_signing_block(&mut data).unwrap());
    }

    #[test]
    fn test_short_input_with_magic() {
        let mut bytes = vec![0u8; 100];
        bytes.extend_from_slice(SIGNING_BLOCK_MAGIC);
        bytes.extend_from_slice(&[0u8; 22]);
        assert!(detect_signing_block(&mut Cursor::new(bytes)).unwrap());
    }

    #[test]
    fn test_magic_inside_tail_window() {
        let mut bytes = vec![0u8; 8192];
        bytes.extend_from_slice(SIGNING_BLOCK_MAGIC);
        bytes.extend_from_slice(&[0xAA; 900]);
        assert!(detect_signing_block(&mut Cursor::new(bytes)).unwrap());
    }

    #[test]
    fn test_magic_before_tail_window_is_missed() {
        let mut bytes = vec![0u8; 64];
        bytes.extend_from_slice(SIGNING_BLOCK_MAGIC);
        bytes.extend_from_slice(&[0xAA; 2048]);
        assert!(!detect_signing_block(&mut Cursor::new(bytes)).unwrap());
    }

    #[test]
    fn test_magic_straddling_window_start_is_missed() {
        let mut bytes = vec![0u8; 4096];
        bytes.extend_from_slice(SIGNING_BLOCK_MAGIC);
        // Window begins 8 bytes into the magic
        bytes.extend_from_slice(&[0xAA; 1016]);
        assert!(!detect_signing_block(&mut Cursor::new(bytes)).unwrap());
    }

    #[test]
    fn test_file_scan() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"short file").unwrap();
        assert!(!detect_signing_block_in_file(file.path()).unwrap());
    }
}
