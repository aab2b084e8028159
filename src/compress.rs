//! Compression pipeline.
//!
//! load → strip → per-page optimize → save, with progress checkpoints at
//! 10 (load start), 30 (loaded), 30-80 (pages), 90 (save start) and 100.

use chrono::Utc;

use crate::error::{Error, Result};
use crate::model::{Document, SaveProfile};
use crate::optimize::PageOptimizer;
use crate::options::{CompressionLevel, CompressionOptions};
use crate::progress::{NoProgress, Progress, ProgressSink};

/// Outcome of a compression run.
#[derive(Debug, Clone)]
pub struct CompressionResult {
    /// The output document
    pub data: Vec<u8>,

    /// Input size in bytes
    pub original_size: usize,

    /// Output size in bytes
    pub compressed_size: usize,

    /// Pages that were downscaled
    pub pages_scaled: usize,

    /// Pages left as is after an optimization error
    pub pages_skipped: usize,

    /// Whether `data` is the unmodified input
    pub kept_original: bool,
}

impl CompressionResult {
    /// Fraction of the input saved, 0.0 when nothing was saved.
    pub fn reduction_ratio(&self) -> f64 {
        if self.original_size == 0 || self.compressed_size >= self.original_size {
            return 0.0;
        }
        1.0 - self.compressed_size as f64 / self.original_size as f64
    }

    /// Bytes saved.
    pub fn saved_bytes(&self) -> usize {
        self.original_size.saturating_sub(self.compressed_size)
    }
}

/// Compress a PDF.
///
/// # Example
///
/// ```no_run
/// use pdfops::{compress, CompressionLevel, CompressionOptions};
///
/// let data = std::fs::read("report.pdf")?;
/// let options = CompressionOptions::new().with_level(CompressionLevel::Aggressive);
/// let result = compress(&data, &options)?;
/// println!("saved {} bytes", result.saved_bytes());
/// # Ok::<(), pdfops::Error>(())
/// ```
pub fn compress(data: &[u8], options: &CompressionOptions) -> Result<CompressionResult> {
    compress_with_progress(data, options, &mut NoProgress)
}

/// Compress a PDF, reporting progress to `sink`.
///
/// Options are validated before any work starts. Every later failure is
/// reported as [`Error::Compression`].
pub fn compress_with_progress(
    data: &[u8],
    options: &CompressionOptions,
    sink: &mut dyn ProgressSink,
) -> Result<CompressionResult> {
    options.validate()?;
    let mut progress = Progress::new(sink);
    run(data, options, &mut progress).map_err(|e| Error::Compression(e.to_string()))
}

fn run(data: &[u8], options: &CompressionOptions, progress: &mut Progress<'_>) -> Result<CompressionResult> {
    progress.checkpoint(10);
    let mut doc = Document::load(data)?;
    progress.checkpoint(30);

    let mut changed = false;

    if options.remove_metadata {
        doc.clear_metadata(Utc::now())?;
        changed = true;
    }

    if options.remove_bookmarks && doc.remove_outlines()? {
        log::debug!("Removed document outline");
        changed = true;
    }

    let optimizer = PageOptimizer::new(options);
    let page_ids = doc.page_ids();
    let total = page_ids.len();
    let mut pages_scaled = 0;
    let mut pages_skipped = 0;

    for (index, page_id) in page_ids.into_iter().enumerate() {
        match optimizer.optimize(&mut doc, page_id) {
            Ok(report) => {
                if report.scale.is_some() {
                    pages_scaled += 1;
                }
                changed |= report.changed();
            }
            Err(e) => {
                log::warn!("Skipping optimization of page {}: {}", index + 1, e);
                pages_skipped += 1;
            }
        }
        progress.step(30, 50, index + 1, total);
    }

    progress.checkpoint(90);
    let output = doc.save(save_profile(options.level))?;

    let result = if output.len() > data.len() && !changed {
        log::warn!(
            "Output ({} bytes) is larger than input ({} bytes), keeping the original",
            output.len(),
            data.len()
        );
        CompressionResult {
            data: data.to_vec(),
            original_size: data.len(),
            compressed_size: data.len(),
            pages_scaled,
            pages_skipped,
            kept_original: true,
        }
    } else {
        CompressionResult {
            original_size: data.len(),
            compressed_size: output.len(),
            data: output,
            pages_scaled,
            pages_skipped,
            kept_original: false,
        }
    };

    log::info!(
        "Compressed {} pages at level {}: {} -> {} bytes ({} scaled, {} skipped)",
        total,
        options.level,
        result.original_size,
        result.compressed_size,
        result.pages_scaled,
        result.pages_skipped
    );

    progress.finish();
    Ok(result)
}

/// How each level serializes its output.
pub fn save_profile(level: CompressionLevel) -> SaveProfile {
    if level.uses_object_streams() {
        SaveProfile::ObjectStreams {
            objects_per_stream: level.objects_per_stream(),
        }
    } else {
        SaveProfile::Classic
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(original: usize, compressed: usize) -> CompressionResult {
        CompressionResult {
            data: Vec::new(),
            original_size: original,
            compressed_size: compressed,
            pages_scaled: 0,
            pages_skipped: 0,
            kept_original: false,
        }
    }

    #[test]
    fn test_reduction_ratio() {
        assert!((result(1000, 250).reduction_ratio() - 0.75).abs() < 1e-9);
        assert_eq!(result(1000, 1000).reduction_ratio(), 0.0);
        assert_eq!(result(0, 0).reduction_ratio(), 0.0);
        assert_eq!(result(1000, 250).saved_bytes(), 750);
    }

    #[test]
    fn test_save_profile() {
        assert_eq!(save_profile(CompressionLevel::Light), SaveProfile::Classic);
        assert_eq!(
            save_profile(CompressionLevel::Aggressive),
            SaveProfile::ObjectStreams {
                objects_per_stream: 50
            }
        );
        assert_eq!(
            save_profile(CompressionLevel::Balanced),
            SaveProfile::ObjectStreams {
                objects_per_stream: 25
            }
        );
    }

    #[test]
    fn test_invalid_quality_reports_nothing() {
        let mut seen = Vec::new();
        let mut sink = |p: u8| seen.push(p);
        let options = CompressionOptions::new().with_quality(0);
        let err = compress_with_progress(b"%PDF-1.4", &options, &mut sink).unwrap_err();
        assert!(matches!(err, Error::InvalidOptions(_)));
        assert!(seen.is_empty());
    }

    #[test]
    fn test_malformed_input() {
        let mut seen = Vec::new();
        let mut sink = |p: u8| seen.push(p);
        let err = compress_with_progress(b"not a pdf", &CompressionOptions::default(), &mut sink)
            .unwrap_err();
        assert!(matches!(err, Error::Compression(_)));
        assert!(err.to_string().starts_with("PDF compression failed: Malformed input"));
        assert_eq!(seen, vec![10]);
    }
}
