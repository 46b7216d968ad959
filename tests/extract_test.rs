//! Integration tests for page content extraction.

mod common;

use common::{Fixture, LETTER};
use folio::render::{to_json, to_listing};
use folio::{
    extract_page, extract_page_with_options, CoordinateAccuracy, Error, ErrorMode,
    ExtractOptions, JsonFormat,
};
use lopdf::Object;

const JPEG_BYTES: &[u8] = &[0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, b'J', b'F', b'I', b'F'];
const RAW_BYTES: &[u8] = &[1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12];

/// One Letter page with three text spans and three image draws, the first
/// image drawn twice.
fn page_with_images() -> (Vec<u8>, (u32, u16)) {
    let mut fixture = Fixture::new();
    let photo = fixture.add_image(JPEG_BYTES, Some("DCTDecode"));
    let raw = fixture.add_image(RAW_BYTES, None);

    let content = "BT /F1 24 Tf 72 720 Td (Class of 2024) Tj ET \
                   q 200 0 0 150 100 300 cm /Photo Do Q \
                   BT /F1 12 Tf 72 280 Td (Caption one) Tj 0 -14 Td (Caption two) Tj ET \
                   q 50 0 0 50 400 300 cm /Raw Do Q \
                   q 200 0 0 150 100 50 cm /Photo Do Q";
    fixture.page(
        LETTER,
        content,
        &[
            ("Photo", Object::Reference(photo)),
            ("Raw", Object::Reference(raw)),
        ],
    );
    (fixture.build(), photo)
}

/// One page whose second image points at an object that does not exist.
fn page_with_dangling_image() -> Vec<u8> {
    let mut fixture = Fixture::new();
    let photo = fixture.add_image(JPEG_BYTES, Some("DCTDecode"));
    let content = "q 10 0 0 10 0 0 cm /A Do Q q 10 0 0 10 20 0 cm /Gone Do Q \
                   q 10 0 0 10 40 0 cm /B Do Q";
    fixture.page(
        LETTER,
        content,
        &[
            ("A", Object::Reference(photo)),
            ("Gone", Object::Reference((9999, 0))),
            ("B", Object::Reference(photo)),
        ],
    );
    fixture.build()
}

#[test]
fn test_text_fragments_in_stream_order() {
    let (input, _) = page_with_images();
    let content = extract_page(&input, 1).unwrap();

    let texts: Vec<_> = content.text.iter().map(|f| f.text.as_str()).collect();
    assert_eq!(texts, vec!["Class of 2024", "Caption one", "Caption two"]);

    let title = &content.text[0];
    assert_eq!(title.x, 72.0);
    // 792 - (720 + 0.8 * 24)
    assert!((title.y - 52.8).abs() < 1e-3);
    assert_eq!(title.height, 24.0);
    assert_eq!(title.font_name, "Helvetica");
    assert!(title.width > 0.0);

    // Each fragment's size matches its own bounding box
    for fragment in &content.text {
        let bbox = fragment.bbox();
        assert_eq!(fragment.width, bbox.x1 - bbox.x0);
        assert_eq!(fragment.height, bbox.y1 - bbox.y0);
    }
}

#[test]
fn test_page_index_out_of_range() {
    let input = common::numbered_pages(2);

    for page in [0, 3] {
        let result = extract_page(&input, page);
        assert!(matches!(
            result,
            Err(Error::PageIndex { page: p, page_count: 2 }) if p == page
        ));
    }
}

#[test]
fn test_password_protected_input_rejected() {
    let mut fixture = Fixture::new();
    fixture.text_page(LETTER, "secret").password_protected();
    let input = fixture.build();

    match extract_page(&input, 1) {
        Err(Error::DocumentRead(reason)) => assert!(reason.contains("password")),
        other => panic!("expected a read error, got {:?}", other.map(|c| c.text)),
    }
}

#[test]
fn test_images_named_by_occurrence() {
    let (input, photo) = page_with_images();
    let content = extract_page(&input, 1).unwrap();

    let names: Vec<_> = content.images.iter().map(|i| i.name.as_str()).collect();
    assert_eq!(
        names,
        vec!["image_1_0.png", "image_1_1.png", "image_1_2.png"]
    );

    // The same image drawn twice is reported twice
    assert_eq!(content.images[0].object_id, photo);
    assert_eq!(content.images[2].object_id, photo);
    assert_eq!(content.images[0].bytes, content.images[2].bytes);
    assert_ne!(content.images[0].y, content.images[2].y);

    assert!(content
        .images
        .iter()
        .all(|image| image.accuracy == CoordinateAccuracy::Approximate));
    assert!(content.skipped_images.is_empty());
}

#[test]
fn test_image_bytes_and_coordinates() {
    let (input, _) = page_with_images();
    let content = extract_page(&input, 1).unwrap();

    let photo = &content.images[0];
    assert_eq!(photo.bytes, JPEG_BYTES);
    assert_eq!(photo.mime_type, "image/jpeg");
    assert_eq!((photo.x, photo.width, photo.height), (100.0, 200.0, 150.0));
    // 792 - (300 + 150)
    assert_eq!(photo.y, 342.0);

    let raw = &content.images[1];
    assert_eq!(raw.bytes, RAW_BYTES);
    assert_eq!(raw.mime_type, "application/octet-stream");
}

#[test]
fn test_save_images_round_trip() {
    let (input, _) = page_with_images();
    let content = extract_page(&input, 1).unwrap();
    let dir = tempfile::tempdir().unwrap();

    let written = content.save_images(dir.path()).unwrap();
    assert_eq!(written.len(), 3);
    for (path, image) in written.iter().zip(&content.images) {
        assert_eq!(path, &dir.path().join(&image.name));
        assert_eq!(std::fs::read(path).unwrap(), image.bytes);
    }

    // Saving again silently overwrites
    content.save_images(dir.path()).unwrap();
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 3);
}

#[test]
fn test_lenient_skips_unresolvable_image() {
    let input = page_with_dangling_image();
    let content = extract_page(&input, 1).unwrap();

    let names: Vec<_> = content.images.iter().map(|i| i.name.as_str()).collect();
    assert_eq!(names, vec!["image_1_0.png", "image_1_2.png"]);

    assert_eq!(content.skipped_images.len(), 1);
    assert_eq!(content.skipped_images[0].index, 1);
    assert_eq!(content.skipped_images[0].name, "image_1_1.png");
    assert!(content.skipped_images[0].reason.contains("9999"));
}

#[test]
fn test_strict_fails_on_unresolvable_image() {
    let input = page_with_dangling_image();
    let options = ExtractOptions::new().with_error_mode(ErrorMode::Strict);

    let result = extract_page_with_options(&input, 1, &options);
    assert!(matches!(
        result,
        Err(Error::ImageResolution { index: 1, .. })
    ));
}

#[test]
fn test_page_without_images() {
    let input = common::numbered_pages(3);
    let content = extract_page(&input, 2).unwrap();
    assert_eq!(content.plain_text(), "Page 2");
    assert!(content.images.is_empty());

    let dir = tempfile::tempdir().unwrap();
    assert!(content.save_images(dir.path()).unwrap().is_empty());
}

#[test]
fn test_one_fragment_per_span_including_whitespace() {
    let mut fixture = Fixture::new();
    fixture.page(
        LETTER,
        "BT /F1 12 Tf 72 700 Td (   ) Tj ( ) Tj (visible) Tj ET",
        &[],
    );
    let content = extract_page(&fixture.build(), 1).unwrap();
    let texts: Vec<_> = content.text.iter().map(|f| f.text.as_str()).collect();
    assert_eq!(texts, vec!["   ", " ", "visible"]);
    assert_eq!(content.text[0].x, 72.0);
    assert!(content.text[1].x > content.text[0].x);
    assert!(content.text[2].x > content.text[1].x);
}

#[test]
fn test_json_output() {
    let (input, _) = page_with_images();
    let content = extract_page(&input, 1).unwrap();

    let json = to_json(&content, JsonFormat::Compact).unwrap();
    assert!(!json.contains("bytes"));
    assert!(json.contains("\"accuracy\":\"approximate\""));
    assert!(json.contains("image_1_2.png"));

    let listing = to_listing(&content);
    assert!(listing.contains("Text: \"Class of 2024\" at (x: 72.00"));
    assert!(listing.contains("image_1_0.png at (x: 100.00, y: 342.00, w: 200.00, h: 150.00)"));
}

#[test]
fn test_round_trip_with_appended_pages() {
    let (input, _) = page_with_images();
    let mut output = Vec::new();
    folio::append_sections(&input, &mut output, 1, "MEMORIES").unwrap();

    // Page 1 content survives re-serialization unchanged
    let before = extract_page(&input, 1).unwrap();
    let after = extract_page(&output, 1).unwrap();
    assert_eq!(before.text, after.text);
    assert_eq!(before.images.len(), after.images.len());
    assert_eq!(before.images[0].bytes, after.images[0].bytes);
}
