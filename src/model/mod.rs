//! Data types returned by composing and extracting operations.
//!
//! Positions use PDF points. Extracted coordinates use a top-left origin;
//! page sizes keep the MediaBox they were read from.

mod content;
mod fragment;
mod geometry;
mod image;

pub use content::PageContent;
pub use fragment::TextFragment;
pub use geometry::{BoundingBox, PageSize};
pub use image::{CoordinateAccuracy, ImagePlacement, SkippedImage};
