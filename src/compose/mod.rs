//! Writing new content into existing documents.
//!
//! - [`append_sections`]: add generated divider pages after the last page
//! - [`stamp_heading`]: draw a boxed heading over an existing page
//! - [`place_image`]: draw a framed photo onto an existing page
//! - [`add_paragraph`]: word-wrap text into a box on an existing page

mod heading;
mod overlay;
mod paragraph;
mod photo;
mod sections;

pub use heading::{stamp_heading, HeadingOptions};
pub use paragraph::{add_paragraph, ParagraphOptions, ParagraphReport};
pub use photo::{place_image, ImageOptions, PlacedImage};
pub use sections::{append_sections, append_sections_with_options, AppendReport, SectionOptions};
