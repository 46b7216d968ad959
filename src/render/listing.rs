//! Human-readable listing of extraction results.

use std::fmt::Write;

use crate::model::PageContent;

/// List every fragment and image with its coordinates, one per line.
pub fn to_listing(content: &PageContent) -> String {
    let mut out = String::new();

    // Writing to a String cannot fail
    let _ = writeln!(out, "Extracted Text with Coordinates:");
    for fragment in &content.text {
        let _ = writeln!(
            out,
            "Text: {:?} at (x: {:.2}, y: {:.2}, w: {:.2}, h: {:.2})",
            fragment.text, fragment.x, fragment.y, fragment.width, fragment.height
        );
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "Extracted Images (approximate positions):");
    for image in &content.images {
        let _ = writeln!(
            out,
            "{} at (x: {:.2}, y: {:.2}, w: {:.2}, h: {:.2}) [{}, {} bytes]",
            image.name,
            image.x,
            image.y,
            image.width,
            image.height,
            image.mime_type,
            image.size()
        );
    }
    for skipped in &content.skipped_images {
        let _ = writeln!(out, "Skipped {}: {}", skipped.name, skipped.reason);
    }

    out
}
