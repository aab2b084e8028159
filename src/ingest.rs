//! Input files.

use std::fs;
use std::io::Read;
use std::path::Path;

use crate::detect::{detect_format_from_bytes, PdfFormat};
use crate::error::Result;

/// A named input document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    /// File name, used to derive output names
    pub name: String,
    /// Raw file content
    pub data: Vec<u8>,
}

impl SourceFile {
    /// Wrap an in-memory buffer.
    pub fn from_bytes(name: impl Into<String>, data: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            data: data.into(),
        }
    }

    /// Read a file from disk; its name is the path's file name.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let data = fs::read(path)?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "document.pdf".to_string());
        log::debug!("Read {} ({} bytes)", path.display(), data.len());
        Ok(Self { name, data })
    }

    /// Read all of `reader`.
    pub fn from_reader<R: Read>(name: impl Into<String>, mut reader: R) -> Result<Self> {
        let mut data = Vec::new();
        reader.read_to_end(&mut data)?;
        Ok(Self::from_bytes(name, data))
    }

    /// Size in bytes.
    pub fn size(&self) -> usize {
        self.data.len()
    }

    /// File name without its extension.
    pub fn stem(&self) -> &str {
        crate::output::stem(&self.name)
    }

    /// Check for a PDF header, returning `UnknownFormat` otherwise.
    pub fn ensure_pdf(&self) -> Result<PdfFormat> {
        detect_format_from_bytes(&self.data)
    }
}
