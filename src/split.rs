//! Split pipeline.

use crate::error::{Error, Result};
use crate::model::{Document, PageImporter, SaveProfile};
use crate::options::SplitOptions;
use crate::progress::{NoProgress, Progress, ProgressSink};

/// One single-page document produced by a split.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitPage {
    /// Page number in the source (1-indexed)
    pub number: u32,
    /// The single-page document
    pub data: Vec<u8>,
}

/// Split a PDF into one document per page, in page order.
///
/// # Example
///
/// ```no_run
/// let data = std::fs::read("report.pdf")?;
/// for (i, page) in pdfops::split(&data)?.iter().enumerate() {
///     std::fs::write(format!("page_{}.pdf", i + 1), page)?;
/// }
/// # Ok::<(), pdfops::Error>(())
/// ```
pub fn split(data: &[u8]) -> Result<Vec<Vec<u8>>> {
    split_with_progress(data, &mut NoProgress)
}

/// Split every page, reporting progress per page.
pub fn split_with_progress(data: &[u8], sink: &mut dyn ProgressSink) -> Result<Vec<Vec<u8>>> {
    let pages = split_pages_with_progress(data, &SplitOptions::default(), sink)?;
    Ok(pages.into_iter().map(|page| page.data).collect())
}

/// Split the pages chosen by `options`.
pub fn split_pages(data: &[u8], options: &SplitOptions) -> Result<Vec<SplitPage>> {
    split_pages_with_progress(data, options, &mut NoProgress)
}

/// Split the pages chosen by `options`, reporting progress per page.
///
/// Any page failure aborts the whole split with [`Error::Split`].
pub fn split_pages_with_progress(
    data: &[u8],
    options: &SplitOptions,
    sink: &mut dyn ProgressSink,
) -> Result<Vec<SplitPage>> {
    let mut progress = Progress::new(sink);
    run(data, options, &mut progress).map_err(|e| match e {
        Error::Split(_) => e,
        other => Error::Split(other.to_string()),
    })
}

fn run(data: &[u8], options: &SplitOptions, progress: &mut Progress<'_>) -> Result<Vec<SplitPage>> {
    let source = Document::load(data)?;
    let selected = options.pages.resolve(source.page_count())?;
    let total = selected.len();

    let mut outputs = Vec::with_capacity(total);
    for (index, number) in selected.into_iter().enumerate() {
        let page_id = source.page_id(number)?;

        let mut single = Document::new();
        single.ensure_version(source.version());
        let mut importer = PageImporter::new(&source);
        single
            .import_page(&mut importer, page_id)
            .map_err(|e| Error::Split(format!("page {}: {}", number, e)))?;
        let bytes = single
            .save(SaveProfile::Classic)
            .map_err(|e| Error::Split(format!("page {}: {}", number, e)))?;

        outputs.push(SplitPage {
            number,
            data: bytes,
        });
        progress.step(0, 90, index + 1, total);
    }

    log::info!("Split {} pages from a {}-page document", total, source.page_count());

    progress.finish();
    Ok(outputs)
}
