//! Per-page optimization.
//!
//! Oversized pages are downscaled according to the compression level. A
//! page larger than the level's bound in either dimension is scaled by
//! `min(fit, cap)`, where `fit` is the largest factor that brings the page
//! inside the bound and `cap` is the level's ceiling (0.9 balanced, 0.8
//! aggressive). The result therefore always fits the bound.

use lopdf::ObjectId;

use crate::error::Result;
use crate::model::{Document, PageGeometry};
use crate::options::{CompressionLevel, CompressionOptions};

/// Scale factor for a page of the given size, or `None` if it stays as is.
pub fn scale_factor(geometry: PageGeometry, level: CompressionLevel) -> Option<f32> {
    let bound = level.scale_bound()?;
    let cap = level.max_scale()?;
    if geometry.fits_within(bound) {
        return None;
    }
    Some(geometry.fit_factor(bound).min(cap))
}

/// What happened to one page.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PageReport {
    /// Factor applied, if the page was rescaled
    pub scale: Option<f32>,
    /// Annotations dropped from the page
    pub annotations_removed: usize,
}

impl PageReport {
    /// Whether the page was modified.
    pub fn changed(&self) -> bool {
        self.scale.is_some() || self.annotations_removed > 0
    }
}

/// Applies the per-page part of a compression run.
#[derive(Debug, Clone, Copy)]
pub struct PageOptimizer {
    level: CompressionLevel,
    remove_annotations: bool,
}

impl PageOptimizer {
    pub fn new(options: &CompressionOptions) -> Self {
        Self {
            level: options.level,
            remove_annotations: options.remove_annotations,
        }
    }

    /// Optimize one page in place.
    ///
    /// A page that fails is left unmodified.
    pub fn optimize(&self, doc: &mut Document, page_id: ObjectId) -> Result<PageReport> {
        let mut report = PageReport::default();

        if self.level.scale_bound().is_some() {
            let geometry = doc.page_geometry(page_id)?;
            if let Some(factor) = scale_factor(geometry, self.level) {
                log::debug!(
                    "Scaling page {:?} ({}x{}) by {:.4}",
                    page_id,
                    geometry.width,
                    geometry.height,
                    factor
                );
                doc.scale_page(page_id, factor)?;
                report.scale = Some(factor);
            }
        }

        if self.remove_annotations {
            report.annotations_removed = doc.remove_annotations(page_id)?;
        }

        Ok(report)
    }
}
