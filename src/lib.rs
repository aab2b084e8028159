//! # pdfops
//!
//! In-process PDF compression, merging and splitting on top of `lopdf`.
//!
//! ## Quick Start
//!
//! ```no_run
//! use pdfops::{compress, CompressionLevel, CompressionOptions};
//!
//! fn main() -> pdfops::Result<()> {
//!     let data = std::fs::read("document.pdf")?;
//!
//!     let options = CompressionOptions::new()
//!         .with_level(CompressionLevel::Aggressive)
//!         .with_remove_metadata(true);
//!     let result = compress(&data, &options)?;
//!     std::fs::write("compressed_document.pdf", &result.data)?;
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Compression**: level-driven page downscaling, metadata, annotation and
//!   bookmark stripping, object-stream serialization
//! - **Merge**: concatenate documents in order, sharing resources per source
//! - **Split**: one single-page document per selected page
//! - **Progress**: coarse 0-100 checkpoints through [`ProgressSink`]
//! - **Size estimation**: quick heuristic before compressing
//! - **Async I/O** (`async` feature) and a **C ABI** (`ffi` feature)

pub mod compress;
pub mod detect;
pub mod error;
pub mod estimate;
pub mod ingest;
pub mod merge;
pub mod model;
pub mod optimize;
pub mod options;
pub mod output;
pub mod progress;
pub mod split;

#[cfg(feature = "async")]
pub mod async_io;

#[cfg(feature = "ffi")]
pub mod ffi;

// Re-export commonly used types
pub use compress::{compress, compress_with_progress, CompressionResult};
pub use detect::{detect_format_from_bytes, detect_format_from_path, is_pdf, PdfFormat};
pub use error::{Error, Result};
pub use estimate::{estimate_for, estimate_size, format_file_size};
pub use ingest::SourceFile;
pub use merge::{merge, merge_with_progress};
pub use model::{Document, Metadata, PageGeometry, PageInfo};
pub use options::{CompressionLevel, CompressionOptions, PageSelection, SplitOptions};
pub use output::{PdfBlob, MIME_TYPE};
pub use progress::{NoProgress, ProgressSink};
pub use split::{split, split_pages, split_pages_with_progress, split_with_progress, SplitPage};

use std::path::Path;

/// Compress a PDF file.
///
/// The returned blob is named `compressed_<stem>.pdf`.
///
/// # Example
///
/// ```no_run
/// use pdfops::{compress_file, CompressionOptions};
///
/// let blob = compress_file("report.pdf", &CompressionOptions::default())?;
/// blob.write_to_dir("out")?;
/// # Ok::<(), pdfops::Error>(())
/// ```
pub fn compress_file<P: AsRef<Path>>(path: P, options: &CompressionOptions) -> Result<PdfBlob> {
    let source = SourceFile::from_path(path)?;
    let result = compress(&source.data, options)?;
    Ok(PdfBlob::compressed(&source.name, result.data))
}

/// Merge PDF files, in order, into a blob named `merged.pdf`.
///
/// # Example
///
/// ```no_run
/// let blob = pdfops::merge_files(&["a.pdf", "b.pdf"])?;
/// std::fs::write(&blob.name, &blob.data)?;
/// # Ok::<(), pdfops::Error>(())
/// ```
pub fn merge_files<P: AsRef<Path>>(paths: &[P]) -> Result<PdfBlob> {
    let sources = paths
        .iter()
        .map(|path| SourceFile::from_path(path).map(|source| source.data))
        .collect::<Result<Vec<_>>>()?;
    merge(&sources).map(PdfBlob::merged)
}

/// Split a PDF file into blobs named `<stem>_page_<n>.pdf`.
///
/// # Example
///
/// ```no_run
/// use pdfops::{split_file, PageSelection, SplitOptions};
///
/// let options = SplitOptions::new().with_pages(PageSelection::parse("1-3")?);
/// for blob in split_file("report.pdf", &options)? {
///     blob.write_to_dir("pages")?;
/// }
/// # Ok::<(), pdfops::Error>(())
/// ```
pub fn split_file<P: AsRef<Path>>(path: P, options: &SplitOptions) -> Result<Vec<PdfBlob>> {
    let source = SourceFile::from_path(path)?;
    let pages = split_pages(&source.data, options)?;
    Ok(pages
        .into_iter()
        .map(|page| PdfBlob::page(&source.name, page.number, page.data))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compress_file_missing() {
        let result = compress_file("/nonexistent/report.pdf", &CompressionOptions::default());
        assert!(matches!(result, Err(Error::Io(_))));
    }

    #[test]
    fn test_merge_files_empty() {
        let paths: [&str; 0] = [];
        assert!(matches!(merge_files(&paths), Err(Error::Merge(_))));
    }

    #[test]
    fn test_compress_file_rejects_non_pdf() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.pdf");
        std::fs::write(&path, b"plain text").unwrap();

        let err = compress_file(&path, &CompressionOptions::default()).unwrap_err();
        assert!(matches!(err, Error::Compression(_)));
    }

    #[test]
    fn test_detect_format_empty_data() {
        assert!(matches!(
            detect_format_from_bytes(&[]),
            Err(Error::UnknownFormat)
        ));
    }
}
