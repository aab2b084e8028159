//! Output documents and their suggested file names.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::Result;

/// MIME type of every output.
pub const MIME_TYPE: &str = "application/pdf";

/// Suggested name of a merge result.
pub const MERGED_NAME: &str = "merged.pdf";

/// A finished document ready to be handed to the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PdfBlob {
    /// Suggested file name
    pub name: String,
    /// Document bytes
    pub data: Vec<u8>,
}

impl PdfBlob {
    /// Create a blob with an explicit name.
    pub fn new(name: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            data,
        }
    }

    /// Compression output for `source_name`: `compressed_<stem>.pdf`.
    pub fn compressed(source_name: &str, data: Vec<u8>) -> Self {
        Self::new(compressed_name(source_name), data)
    }

    /// Merge output: `merged.pdf`.
    pub fn merged(data: Vec<u8>) -> Self {
        Self::new(MERGED_NAME, data)
    }

    /// Split output for page `number` of `source_name`: `<stem>_page_<n>.pdf`.
    pub fn page(source_name: &str, number: u32, data: Vec<u8>) -> Self {
        Self::new(page_name(source_name, number), data)
    }

    /// Always `application/pdf`.
    pub fn mime_type(&self) -> &'static str {
        MIME_TYPE
    }

    /// Size in bytes.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the blob holds no bytes.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Write the blob into `dir` under its suggested name, creating the
    /// directory if needed. Returns the written path.
    pub fn write_to_dir<P: AsRef<Path>>(&self, dir: P) -> Result<PathBuf> {
        let dir = dir.as_ref();
        if !dir.exists() {
            fs::create_dir_all(dir)?;
        }
        let path = dir.join(&self.name);
        fs::write(&path, &self.data)?;
        log::debug!("Wrote {} ({} bytes)", path.display(), self.data.len());
        Ok(path)
    }
}

pub(crate) fn stem(name: &str) -> &str {
    Path::new(name)
        .file_stem()
        .and_then(|s| s.to_str())
        .filter(|s| !s.is_empty())
        .unwrap_or("document")
}

/// `compressed_<stem>.pdf`
pub fn compressed_name(source_name: &str) -> String {
    format!("compressed_{}.pdf", stem(source_name))
}

/// `<stem>_page_<n>.pdf`, `n` 1-indexed.
pub fn page_name(source_name: &str, number: u32) -> String {
    format!("{}_page_{}.pdf", stem(source_name), number)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names() {
        assert_eq!(compressed_name("report.pdf"), "compressed_report.pdf");
        assert_eq!(compressed_name("dir/scan.v2.pdf"), "compressed_scan.v2.pdf");
        assert_eq!(compressed_name(""), "compressed_document.pdf");
        assert_eq!(page_name("report.pdf", 3), "report_page_3.pdf");
    }

    #[test]
    fn test_blob() {
        let blob = PdfBlob::merged(vec![1, 2, 3]);
        assert_eq!(blob.name, "merged.pdf");
        assert_eq!(blob.mime_type(), "application/pdf");
        assert_eq!(blob.len(), 3);
        assert!(!blob.is_empty());
    }

    #[test]
    fn test_write_to_dir() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("nested");
        let blob = PdfBlob::page("report.pdf", 2, b"%PDF-1.4".to_vec());

        let path = blob.write_to_dir(&target).unwrap();
        assert_eq!(path, target.join("report_page_2.pdf"));
        assert_eq!(fs::read(path).unwrap(), b"%PDF-1.4");
    }
}
