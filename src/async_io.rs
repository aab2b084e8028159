//! Tokio wrappers around the file-level operations.
//!
//! File reads and writes go through `tokio::fs`; the pipelines themselves
//! run on the blocking pool, one document at a time.

use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::ingest::SourceFile;
use crate::options::{CompressionOptions, SplitOptions};
use crate::output::PdfBlob;

/// Read a source file asynchronously.
pub async fn read_source<P: AsRef<Path>>(path: P) -> Result<SourceFile> {
    let path = path.as_ref();
    let data = tokio::fs::read(path).await?;
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "document.pdf".to_string());
    Ok(SourceFile::from_bytes(name, data))
}

/// Write a blob into `dir` asynchronously. Returns the written path.
pub async fn write_blob<P: AsRef<Path>>(blob: &PdfBlob, dir: P) -> Result<PathBuf> {
    let dir = dir.as_ref();
    tokio::fs::create_dir_all(dir).await?;
    let path = dir.join(&blob.name);
    tokio::fs::write(&path, &blob.data).await?;
    Ok(path)
}

/// Async [`crate::compress_file`].
pub async fn compress_file<P: AsRef<Path>>(path: P, options: &CompressionOptions) -> Result<PdfBlob> {
    let source = read_source(path).await?;
    let options = options.clone();
    blocking(move || {
        let result = crate::compress(&source.data, &options)?;
        Ok(PdfBlob::compressed(&source.name, result.data))
    })
    .await
}

/// Async [`crate::merge_files`].
pub async fn merge_files<P: AsRef<Path>>(paths: &[P]) -> Result<PdfBlob> {
    let mut sources = Vec::with_capacity(paths.len());
    for path in paths {
        sources.push(read_source(path).await?.data);
    }
    blocking(move || crate::merge(&sources).map(PdfBlob::merged)).await
}

/// Async [`crate::split_file`].
pub async fn split_file<P: AsRef<Path>>(path: P, options: &SplitOptions) -> Result<Vec<PdfBlob>> {
    let source = read_source(path).await?;
    let options = options.clone();
    blocking(move || {
        let pages = crate::split_pages(&source.data, &options)?;
        Ok(pages
            .into_iter()
            .map(|page| PdfBlob::page(&source.name, page.number, page.data))
            .collect())
    })
    .await
}

async fn blocking<T, F>(task: F) -> Result<T>
where
    F: FnOnce() -> Result<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(task)
        .await
        .map_err(|e| Error::Other(format!("worker task failed: {}", e)))?
}
