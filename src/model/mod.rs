//! Document model.
//!
//! A thin adapter over the `lopdf` object graph exposing exactly the
//! operations the compression, merge and split pipelines need.

mod document;
mod metadata;
mod page;

pub use document::{Document, PageImporter, SaveProfile};
pub use metadata::{format_pdf_date, parse_pdf_date, Metadata};
pub use page::{PageGeometry, PageInfo, Rect};
