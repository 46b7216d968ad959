//! JSON rendering for extraction results.

use crate::error::{Error, Result};
use crate::model::PageContent;

/// JSON output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JsonFormat {
    /// Pretty-printed JSON with indentation
    #[default]
    Pretty,
    /// Compact JSON without extra whitespace
    Compact,
}

/// Convert a page's content to JSON. Image bytes are never included.
pub fn to_json(content: &PageContent, format: JsonFormat) -> Result<String> {
    let result = match format {
        JsonFormat::Pretty => serde_json::to_string_pretty(content),
        JsonFormat::Compact => serde_json::to_string(content),
    };

    result.map_err(|e| Error::Render(format!("JSON serialization error: {}", e)))
}
