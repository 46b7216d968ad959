//! Extraction result for a single page.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::{ImagePlacement, PageSize, SkippedImage, TextFragment};
use crate::error::Result;

/// Text fragments and image placements found on one page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageContent {
    /// Page number (1-indexed)
    pub page_number: u32,

    /// Size of the page
    pub page_size: PageSize,

    /// Text spans in content-stream order
    pub text: Vec<TextFragment>,

    /// Image occurrences in content-stream order
    pub images: Vec<ImagePlacement>,

    /// Image occurrences that could not be resolved
    pub skipped_images: Vec<SkippedImage>,
}

impl PageContent {
    /// Create an empty result for a page.
    pub fn new(page_number: u32, page_size: PageSize) -> Self {
        Self {
            page_number,
            page_size,
            text: Vec::new(),
            images: Vec::new(),
            skipped_images: Vec::new(),
        }
    }

    /// Text of all fragments joined by single spaces.
    pub fn plain_text(&self) -> String {
        self.text
            .iter()
            .map(|f| f.text.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Whether the page produced neither text nor images.
    pub fn is_empty(&self) -> bool {
        self.text.is_empty() && self.images.is_empty()
    }

    /// Write every image to `dir/{name}`, overwriting existing files.
    ///
    /// Returns the written paths in placement order.
    pub fn save_images<P: AsRef<Path>>(&self, dir: P) -> Result<Vec<PathBuf>> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir)?;

        let mut written = Vec::with_capacity(self.images.len());
        for image in &self.images {
            let path = dir.join(&image.name);
            fs::write(&path, &image.bytes)?;
            log::debug!("Wrote {} ({} bytes)", path.display(), image.size());
            written.push(path);
        }
        Ok(written)
    }
}
