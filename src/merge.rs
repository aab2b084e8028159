//! Merge pipeline.

use crate::error::{Error, Result};
use crate::model::{Document, PageImporter, SaveProfile};
use crate::progress::{NoProgress, Progress, ProgressSink};

/// Concatenate the pages of `sources`, in list order.
///
/// Any source that fails to load aborts the merge with [`Error::Merge`].
///
/// # Example
///
/// ```no_run
/// let first = std::fs::read("a.pdf")?;
/// let second = std::fs::read("b.pdf")?;
/// let merged = pdfops::merge(&[first, second])?;
/// # Ok::<(), pdfops::Error>(())
/// ```
pub fn merge<B: AsRef<[u8]>>(sources: &[B]) -> Result<Vec<u8>> {
    merge_with_progress(sources, &mut NoProgress)
}

/// Merge with progress reported per source document.
pub fn merge_with_progress<B: AsRef<[u8]>>(
    sources: &[B],
    sink: &mut dyn ProgressSink,
) -> Result<Vec<u8>> {
    let mut progress = Progress::new(sink);
    run(sources, &mut progress).map_err(|e| match e {
        Error::Merge(_) => e,
        other => Error::Merge(other.to_string()),
    })
}

fn run<B: AsRef<[u8]>>(sources: &[B], progress: &mut Progress<'_>) -> Result<Vec<u8>> {
    if sources.is_empty() {
        return Err(Error::Merge("no input documents".to_string()));
    }

    let mut merged = Document::new();
    let total = sources.len();

    for (index, source) in sources.iter().enumerate() {
        let source = Document::load(source.as_ref())
            .map_err(|e| Error::Merge(format!("document {}: {}", index + 1, e)))?;
        merged.ensure_version(source.version());

        let mut importer = PageImporter::new(&source);
        for page_id in source.page_ids() {
            merged.import_page(&mut importer, page_id)?;
        }
        log::debug!(
            "Merged document {} ({} pages, {} objects copied)",
            index + 1,
            source.page_count(),
            importer.copied_objects()
        );

        progress.step(0, 90, index + 1, total);
    }

    let output = merged.save(SaveProfile::Classic)?;
    log::info!(
        "Merged {} documents into {} pages ({} bytes)",
        total,
        merged.page_count(),
        output.len()
    );

    progress.finish();
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_source_list() {
        let sources: [Vec<u8>; 0] = [];
        let err = merge(&sources).unwrap_err();
        assert_eq!(err.to_string(), "PDF merge failed: no input documents");
    }

    #[test]
    fn test_invalid_source_names_position() {
        let err = merge(&[b"garbage".to_vec()]).unwrap_err();
        assert!(matches!(err, Error::Merge(_)));
        assert!(err.to_string().starts_with("PDF merge failed: document 1:"));
    }
}
