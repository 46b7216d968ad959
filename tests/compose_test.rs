//! Integration tests for placing photos and paragraphs on existing pages.

mod common;

use std::io::Cursor;

use common::{Fixture, LETTER};
use folio::{
    add_paragraph, extract_page, place_image, BoundingBox, Error, ImageOptions, ParagraphOptions,
    StandardFont,
};
use image::ImageFormat;

fn photo(format: ImageFormat) -> Vec<u8> {
    let img = image::RgbImage::from_fn(8, 6, |x, y| {
        image::Rgb([(x * 30) as u8, (y * 40) as u8, 90])
    });
    let mut bytes = Vec::new();
    img.write_to(&mut Cursor::new(&mut bytes), format).unwrap();
    bytes
}

#[test]
fn test_place_jpeg_keeps_bytes() {
    let input = common::numbered_pages(1);
    let jpeg = photo(ImageFormat::Jpeg);
    let area = BoundingBox::new(100.0, 200.0, 300.0, 350.0);

    let mut output = Vec::new();
    let placed = place_image(&input, &mut output, 1, &jpeg, area, &ImageOptions::default())
        .unwrap();
    assert_eq!(placed.mime_type, "image/jpeg");
    assert_eq!((placed.pixel_width, placed.pixel_height), (8, 6));
    assert_eq!(placed.image, area);
    assert_eq!(
        placed.frame,
        Some(BoundingBox::new(95.0, 165.0, 305.0, 355.0))
    );

    let content = extract_page(&output, 1).unwrap();
    assert_eq!(content.plain_text(), "Page 1");
    assert_eq!(content.images.len(), 1);
    let image = &content.images[0];
    assert_eq!(image.bytes, jpeg);
    assert_eq!(image.mime_type, "image/jpeg");
    assert_eq!(image.x, 100.0);
    assert!((image.y - (792.0 - 350.0)).abs() < 1e-3);
    assert_eq!(image.width, 200.0);
    assert_eq!(image.height, 150.0);
}

#[test]
fn test_place_png_unframed() {
    let mut fixture = Fixture::new();
    fixture.text_page(LETTER, "cover");
    let input = fixture.build();

    let mut output = Vec::new();
    let area = BoundingBox::new(10.0, 10.0, 90.0, 70.0);
    let options = ImageOptions::default().unframed();
    let placed = place_image(&input, &mut output, 1, &photo(ImageFormat::Png), area, &options)
        .unwrap();
    assert_eq!(placed.mime_type, "image/png");
    assert!(placed.frame.is_none());

    let content = extract_page(&output, 1).unwrap();
    assert_eq!(content.images.len(), 1);
    assert_eq!(content.images[0].width, 80.0);
    assert_eq!(content.images[0].height, 60.0);
    // PNG data is re-encoded, so only the placement is comparable
    assert!(!content.images[0].bytes.is_empty());
}

#[test]
fn test_second_image_gets_new_name() {
    let input = common::numbered_pages(1);
    let jpeg = photo(ImageFormat::Jpeg);

    let mut once = Vec::new();
    let first = BoundingBox::new(50.0, 50.0, 150.0, 150.0);
    place_image(&input, &mut once, 1, &jpeg, first, &ImageOptions::default()).unwrap();
    let mut twice = Vec::new();
    let second = BoundingBox::new(300.0, 50.0, 400.0, 150.0);
    place_image(&once, &mut twice, 1, &jpeg, second, &ImageOptions::default()).unwrap();

    let content = extract_page(&twice, 1).unwrap();
    assert_eq!(content.images.len(), 2);
    assert_eq!(content.images[0].x, 50.0);
    assert_eq!(content.images[1].x, 300.0);
    assert_ne!(content.images[0].object_id, content.images[1].object_id);
}

#[test]
fn test_place_image_rejects_unknown_bytes() {
    let input = common::numbered_pages(1);
    let mut output = Vec::new();
    let area = BoundingBox::new(0.0, 0.0, 10.0, 10.0);

    let options = ImageOptions::default();

    let result = place_image(&input, &mut output, 1, b"not an image", area, &options);
    assert!(matches!(result, Err(Error::ImageDecode(_))));
    assert!(output.is_empty());

    let png = photo(ImageFormat::Png);
    let result = place_image(&input, &mut output, 2, &png, area, &options);
    assert!(matches!(result, Err(Error::PageIndex { page: 2, .. })));
}

#[test]
fn test_paragraph_lines_in_order() {
    let input = common::numbered_pages(1);
    let frame = BoundingBox::new(50.0, 100.0, 250.0, 400.0);
    let text = "We spent the whole summer at the lake and nobody wanted to go home";

    let mut output = Vec::new();
    let report = add_paragraph(&input, &mut output, 1, text, frame, &ParagraphOptions::default())
        .unwrap();
    assert!(report.lines.len() > 1);
    assert!(!report.overflow);
    assert_eq!(report.line_height, 22.5);
    assert_eq!(report.lines.join(" "), text);
    for line in &report.lines {
        assert!(StandardFont::Helvetica.text_width(line, 15.0) < 180.0);
    }

    let content = extract_page(&output, 1).unwrap();
    let texts: Vec<_> = content.text.iter().map(|f| f.text.as_str()).collect();
    assert_eq!(texts[0], "Page 1");
    assert_eq!(&texts[1..], report.lines.as_slice());

    // First baseline 15pt under the top of the box, then one line height apart
    let first = &content.text[1];
    assert_eq!(first.x, 60.0);
    assert!((first.y - (792.0 - (385.0 + 12.0))).abs() < 1e-3);
    let second = &content.text[2];
    assert!((second.y - first.y - 22.5).abs() < 1e-3);
}

#[test]
fn test_paragraph_overflow_reported() {
    let input = common::numbered_pages(1);
    let frame = BoundingBox::new(50.0, 100.0, 150.0, 150.0);
    let text = "one two three four five six seven eight nine ten";

    let mut output = Vec::new();
    let report = add_paragraph(&input, &mut output, 1, text, frame, &ParagraphOptions::default())
        .unwrap();
    // 50pt tall box leaves 30pt, less than two 22.5pt lines
    assert!(report.lines.len() >= 2);
    assert!(report.overflow);

    // Overflowing text is still written
    let content = extract_page(&output, 1).unwrap();
    assert_eq!(content.text.len(), 1 + report.lines.len());
}

#[test]
fn test_paragraph_typographic_text() {
    let input = common::numbered_pages(1);
    let frame = BoundingBox::new(50.0, 100.0, 550.0, 400.0);
    let text = "\u{201C}Don\u{2019}t stop\u{201D} \u{2013} class of \u{2019}24";

    let mut output = Vec::new();
    let options = ParagraphOptions::default().with_backdrop(None);
    let report = add_paragraph(&input, &mut output, 1, text, frame, &options).unwrap();
    assert_eq!(report.lines, vec![text.to_string()]);

    let content = extract_page(&output, 1).unwrap();
    assert_eq!(content.text[1].text, text);
}
