//! Operation options and configuration.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;
use std::str::FromStr;

/// Named compression preset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompressionLevel {
    /// Re-serialize only, no geometric changes
    Light,
    /// Moderate page downscaling and object streams
    #[default]
    Balanced,
    /// Strong page downscaling and dense object streams
    Aggressive,
}

impl CompressionLevel {
    /// All levels, lightest first.
    pub const ALL: [CompressionLevel; 3] = [
        CompressionLevel::Light,
        CompressionLevel::Balanced,
        CompressionLevel::Aggressive,
    ];

    /// Page-space bound (width, height) above which pages get scaled down.
    pub fn scale_bound(self) -> Option<(f32, f32)> {
        match self {
            CompressionLevel::Light => None,
            CompressionLevel::Balanced => Some((1500.0, 2000.0)),
            CompressionLevel::Aggressive => Some((1200.0, 1600.0)),
        }
    }

    /// Upper limit for the scale factor applied to an oversized page.
    pub fn max_scale(self) -> Option<f32> {
        match self {
            CompressionLevel::Light => None,
            CompressionLevel::Balanced => Some(0.9),
            CompressionLevel::Aggressive => Some(0.8),
        }
    }

    /// Base output/input ratio used by the size estimate.
    pub fn base_ratio(self) -> f64 {
        match self {
            CompressionLevel::Light => 0.8,
            CompressionLevel::Balanced => 0.6,
            CompressionLevel::Aggressive => 0.4,
        }
    }

    /// Whether saving packs objects into object streams.
    pub fn uses_object_streams(self) -> bool {
        !matches!(self, CompressionLevel::Light)
    }

    /// Object flush batch size for object streams.
    pub fn objects_per_stream(self) -> usize {
        match self {
            CompressionLevel::Aggressive => 50,
            _ => 25,
        }
    }

    /// Lowercase name.
    pub fn as_str(self) -> &'static str {
        match self {
            CompressionLevel::Light => "light",
            CompressionLevel::Balanced => "balanced",
            CompressionLevel::Aggressive => "aggressive",
        }
    }
}

impl std::fmt::Display for CompressionLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CompressionLevel {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "light" | "low" => Ok(CompressionLevel::Light),
            "balanced" | "medium" => Ok(CompressionLevel::Balanced),
            "aggressive" | "high" => Ok(CompressionLevel::Aggressive),
            other => Err(Error::InvalidOptions(format!(
                "unknown compression level '{}'",
                other
            ))),
        }
    }
}

/// Options for compressing a document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompressionOptions {
    /// Output quality, 1-100
    pub quality: u8,

    /// Compression preset
    pub level: CompressionLevel,

    /// Clear the document info dictionary and XMP metadata
    pub remove_metadata: bool,

    /// Drop page annotations
    pub remove_annotations: bool,

    /// Drop the document outline
    pub remove_bookmarks: bool,
}

impl CompressionOptions {
    /// Lowest accepted quality.
    pub const MIN_QUALITY: u8 = 1;
    /// Highest accepted quality.
    pub const MAX_QUALITY: u8 = 100;

    /// Create new compression options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set quality (validated when the options are used).
    pub fn with_quality(mut self, quality: u8) -> Self {
        self.quality = quality;
        self
    }

    /// Set compression level.
    pub fn with_level(mut self, level: CompressionLevel) -> Self {
        self.level = level;
        self
    }

    /// Enable or disable metadata stripping.
    pub fn with_remove_metadata(mut self, remove: bool) -> Self {
        self.remove_metadata = remove;
        self
    }

    /// Enable or disable annotation stripping.
    pub fn with_remove_annotations(mut self, remove: bool) -> Self {
        self.remove_annotations = remove;
        self
    }

    /// Enable or disable bookmark stripping.
    pub fn with_remove_bookmarks(mut self, remove: bool) -> Self {
        self.remove_bookmarks = remove;
        self
    }

    /// Check that quality is within 1-100.
    pub fn validate(&self) -> Result<()> {
        if !(Self::MIN_QUALITY..=Self::MAX_QUALITY).contains(&self.quality) {
            return Err(Error::InvalidOptions(format!(
                "quality must be between {} and {}, got {}",
                Self::MIN_QUALITY,
                Self::MAX_QUALITY,
                self.quality
            )));
        }
        Ok(())
    }
}

impl Default for CompressionOptions {
    fn default() -> Self {
        Self {
            quality: 80,
            level: CompressionLevel::Balanced,
            remove_metadata: false,
            remove_annotations: false,
            remove_bookmarks: false,
        }
    }
}

/// Options for splitting a document.
#[derive(Debug, Clone, Default)]
pub struct SplitOptions {
    /// Which pages to emit (1-indexed)
    pub pages: PageSelection,
}

impl SplitOptions {
    /// Create new split options (all pages).
    pub fn new() -> Self {
        Self::default()
    }

    /// Set page selection.
    pub fn with_pages(mut self, pages: PageSelection) -> Self {
        self.pages = pages;
        self
    }
}

/// Page selection, 1-indexed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum PageSelection {
    /// Every page
    #[default]
    All,
    /// An inclusive range of pages
    Range(RangeInclusive<u32>),
    /// Specific pages, ascending
    Pages(Vec<u32>),
}

impl PageSelection {
    /// Resolve against a document with `page_count` pages.
    ///
    /// Fails with `PageOutOfRange` if the selection names a page past the end.
    pub fn resolve(&self, page_count: u32) -> Result<Vec<u32>> {
        let selected: Vec<u32> = match self {
            PageSelection::All => (1..=page_count).collect(),
            PageSelection::Range(range) => range.clone().collect(),
            PageSelection::Pages(pages) => pages.clone(),
        };

        if let Some(&bad) = selected.iter().find(|&&p| p == 0 || p > page_count) {
            return Err(Error::PageOutOfRange(bad, page_count));
        }
        Ok(selected)
    }

    /// Parse a page selection string (e.g., "1-10", "1,3,5,7-10").
    pub fn parse(s: &str) -> Result<Self> {
        let s = s.trim();

        if s.is_empty() || s.eq_ignore_ascii_case("all") {
            return Ok(PageSelection::All);
        }

        if let Some((start, end)) = s.split_once('-') {
            if !start.contains(',') && !end.contains(',') {
                let (start, end) = (parse_page(start)?, parse_page(end)?);
                if start > end {
                    return Err(Error::InvalidPageRange(s.to_string()));
                }
                return Ok(PageSelection::Range(start..=end));
            }
        }

        let mut pages = Vec::new();
        for part in s.split(',') {
            let part = part.trim();
            if let Some((start, end)) = part.split_once('-') {
                let (start, end) = (parse_page(start)?, parse_page(end)?);
                if start > end {
                    return Err(Error::InvalidPageRange(part.to_string()));
                }
                pages.extend(start..=end);
            } else {
                pages.push(parse_page(part)?);
            }
        }

        pages.sort_unstable();
        pages.dedup();
        Ok(PageSelection::Pages(pages))
    }
}

fn parse_page(token: &str) -> Result<u32> {
    match token.trim().parse::<u32>() {
        Ok(0) | Err(_) => Err(Error::InvalidPageRange(format!(
            "'{}' is not a page number",
            token.trim()
        ))),
        Ok(page) => Ok(page),
    }
}
