//! PDF header detection.
//!
//! Readers accept a `%PDF-` marker anywhere in the first kilobyte of a file,
//! so detection does the same instead of insisting on offset zero.

use crate::error::{Error, Result};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Header information of a PDF byte stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PdfFormat {
    /// PDF version (e.g., "1.7", "2.0")
    pub version: String,
    /// Byte offset of the `%PDF-` marker
    pub header_offset: usize,
    /// Whether a linearization dictionary appears near the start
    pub linearized: bool,
}

impl std::fmt::Display for PdfFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "PDF {}", self.version)?;
        if self.linearized {
            write!(f, " (linearized)")?;
        }
        Ok(())
    }
}

const PDF_MAGIC: &[u8] = b"%PDF-";
const VERSION_LEN: usize = 3;
const HEADER_WINDOW: usize = 1024;
const LINEARIZED_MARKER: &[u8] = b"/Linearized";

/// Detect PDF format from a file path by inspecting its first kilobyte.
pub fn detect_format_from_path<P: AsRef<Path>>(path: P) -> Result<PdfFormat> {
    let file = File::open(path)?;
    let mut head = Vec::with_capacity(HEADER_WINDOW);
    file.take(HEADER_WINDOW as u64).read_to_end(&mut head)?;
    detect_format_from_bytes(&head)
}

/// Detect PDF format from bytes.
///
/// Returns `Error::UnknownFormat` when no header is present and
/// `Error::UnsupportedVersion` when the version token is garbled.
pub fn detect_format_from_bytes(data: &[u8]) -> Result<PdfFormat> {
    let window = &data[..data.len().min(HEADER_WINDOW)];
    let header_offset = find(window, PDF_MAGIC).ok_or(Error::UnknownFormat)?;

    let version_start = header_offset + PDF_MAGIC.len();
    let version_bytes = data
        .get(version_start..version_start + VERSION_LEN)
        .ok_or(Error::UnknownFormat)?;
    let version = String::from_utf8_lossy(version_bytes).to_string();

    if !is_valid_version(&version) {
        return Err(Error::UnsupportedVersion(version));
    }

    Ok(PdfFormat {
        version,
        header_offset,
        linearized: find(window, LINEARIZED_MARKER).is_some(),
    })
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}

fn is_valid_version(version: &str) -> bool {
    let bytes = version.as_bytes();
    bytes.len() == VERSION_LEN
        && bytes[0].is_ascii_digit()
        && bytes[1] == b'.'
        && bytes[2].is_ascii_digit()
}

/// Check if a file is a PDF.
pub fn is_pdf<P: AsRef<Path>>(path: P) -> bool {
    detect_format_from_path(path).is_ok()
}

/// Check if bytes start (within the header window) with a PDF header.
pub fn is_pdf_bytes(data: &[u8]) -> bool {
    detect_format_from_bytes(data).is_ok()
}
