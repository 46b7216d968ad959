//! Rendering extraction results for output.

mod json;
mod listing;

pub use json::{to_json, JsonFormat};
pub use listing::to_listing;
