//! Page-level types.

use serde::{Deserialize, Serialize};

/// Width and height of a page in page-space units (1/72 inch).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PageGeometry {
    /// Page width
    pub width: f32,
    /// Page height
    pub height: f32,
}

impl PageGeometry {
    /// Create a geometry from width and height.
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// US Letter (8.5 x 11 inches).
    pub fn letter() -> Self {
        Self::new(612.0, 792.0)
    }

    /// Derive a geometry from a `[x0 y0 x1 y1]` rectangle.
    pub fn from_rect(rect: Rect) -> Self {
        Self::new(rect.width(), rect.height())
    }

    /// Whether both dimensions are within `(max_width, max_height)`.
    pub fn fits_within(&self, (max_width, max_height): (f32, f32)) -> bool {
        self.width <= max_width && self.height <= max_height
    }

    /// Largest uniform factor that makes the page fit the bound.
    ///
    /// Returns 1.0 or more when the page already fits. The factor is chosen
    /// so that `self.scaled(factor)` fits in `f32` arithmetic.
    pub fn fit_factor(&self, bound: (f32, f32)) -> f32 {
        if self.width <= 0.0 || self.height <= 0.0 {
            return 1.0;
        }
        let (max_width, max_height) = bound;
        let exact = (f64::from(max_width) / f64::from(self.width))
            .min(f64::from(max_height) / f64::from(self.height));

        let mut factor = exact as f32;
        // Rounding to f32 can land a product one ulp past the bound.
        while factor > 0.0 && !self.scaled(factor).fits_within(bound) {
            factor = f32::from_bits(factor.to_bits() - 1);
        }
        factor
    }

    /// Geometry after a uniform scale.
    pub fn scaled(&self, factor: f32) -> Self {
        Self::new(self.width * factor, self.height * factor)
    }
}

/// A PDF rectangle `[llx lly urx ury]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x0: f32,
    pub y0: f32,
    pub x1: f32,
    pub y1: f32,
}

impl Rect {
    pub fn new(x0: f32, y0: f32, x1: f32, y1: f32) -> Self {
        Self { x0, y0, x1, y1 }
    }

    pub fn width(&self) -> f32 {
        (self.x1 - self.x0).abs()
    }

    pub fn height(&self) -> f32 {
        (self.y1 - self.y0).abs()
    }

    /// Scale every coordinate about the origin.
    pub fn scaled(&self, factor: f32) -> Self {
        Self::new(
            self.x0 * factor,
            self.y0 * factor,
            self.x1 * factor,
            self.y1 * factor,
        )
    }
}

/// Summary of one page, for reporting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageInfo {
    /// Page number (1-indexed)
    pub number: u32,

    /// Page size
    pub geometry: PageGeometry,

    /// Page rotation in degrees (0, 90, 180, 270)
    pub rotation: i64,

    /// Number of annotations on the page
    pub annotations: usize,
}
