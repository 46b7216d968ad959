//! Fixture documents built in memory with lopdf.

#![allow(dead_code)]

use std::path::{Path, PathBuf};

use lopdf::{Dictionary, Document, Object, ObjectId, Stream};

pub const LETTER: (f32, f32) = (612.0, 792.0);
pub const A4: (f32, f32) = (595.0, 842.0);

/// Builds a small PDF page by page.
pub struct Fixture {
    doc: Document,
    pages_id: ObjectId,
    font_id: ObjectId,
    kids: Vec<Object>,
}

impl Fixture {
    pub fn new() -> Self {
        let mut doc = Document::with_version("1.7");
        let pages_id = doc.new_object_id();

        let mut font = Dictionary::new();
        font.set("Type", "Font");
        font.set("Subtype", "Type1");
        font.set("BaseFont", "Helvetica");
        font.set("Encoding", "WinAnsiEncoding");
        let font_id = doc.add_object(font);

        Self {
            doc,
            pages_id,
            font_id,
            kids: Vec::new(),
        }
    }

    /// Store an image XObject and return its id.
    pub fn add_image(&mut self, bytes: &[u8], filter: Option<&str>) -> ObjectId {
        let mut dict = Dictionary::new();
        dict.set("Type", "XObject");
        dict.set("Subtype", "Image");
        dict.set("Width", 2);
        dict.set("Height", 2);
        dict.set("ColorSpace", "DeviceRGB");
        dict.set("BitsPerComponent", 8);
        if let Some(filter) = filter {
            dict.set("Filter", Object::Name(filter.as_bytes().to_vec()));
        }
        self.doc.add_object(Stream::new(dict, bytes.to_vec()))
    }

    /// Add a page drawing `content`, with `F1` (Helvetica) and the given
    /// XObjects in its resources.
    pub fn page(
        &mut self,
        size: (f32, f32),
        content: &str,
        xobjects: &[(&str, Object)],
    ) -> &mut Self {
        let content_id = self
            .doc
            .add_object(Stream::new(Dictionary::new(), content.as_bytes().to_vec()));

        let mut fonts = Dictionary::new();
        fonts.set("F1", Object::Reference(self.font_id));
        let mut resources = Dictionary::new();
        resources.set("Font", Object::Dictionary(fonts));
        if !xobjects.is_empty() {
            let mut dict = Dictionary::new();
            for (name, value) in xobjects {
                dict.set(*name, value.clone());
            }
            resources.set("XObject", Object::Dictionary(dict));
        }

        let mut page = Dictionary::new();
        page.set("Type", "Page");
        page.set("Parent", Object::Reference(self.pages_id));
        page.set(
            "MediaBox",
            Object::Array(vec![
                0.into(),
                0.into(),
                Object::Real(size.0),
                Object::Real(size.1),
            ]),
        );
        page.set("Resources", Object::Dictionary(resources));
        page.set("Contents", Object::Reference(content_id));
        let page_id = self.doc.add_object(page);
        self.kids.push(Object::Reference(page_id));
        self
    }

    /// Add a page showing `text` in 12pt Helvetica at (72, 700).
    pub fn text_page(&mut self, size: (f32, f32), text: &str) -> &mut Self {
        let content = format!("BT /F1 12 Tf 72 700 Td ({}) Tj ET", text);
        self.page(size, &content, &[])
    }

    /// Mark the document as encrypted by a password nobody knows.
    pub fn password_protected(&mut self) -> &mut Self {
        let mut encrypt = Dictionary::new();
        encrypt.set("Filter", "Standard");
        encrypt.set("V", 1);
        encrypt.set("R", 2);
        encrypt.set("Length", 40);
        encrypt.set("P", -4);
        encrypt.set("O", Object::string_literal(vec![0x11u8; 32]));
        encrypt.set("U", Object::string_literal(vec![0x22u8; 32]));
        let encrypt_id = self.doc.add_object(encrypt);
        self.doc.trailer.set("Encrypt", Object::Reference(encrypt_id));
        self
    }

    pub fn build(&mut self) -> Vec<u8> {
        let mut pages = Dictionary::new();
        pages.set("Type", "Pages");
        pages.set("Kids", Object::Array(self.kids.clone()));
        pages.set("Count", self.kids.len() as i64);
        self.doc.objects.insert(self.pages_id, Object::Dictionary(pages));

        let mut catalog = Dictionary::new();
        catalog.set("Type", "Catalog");
        catalog.set("Pages", Object::Reference(self.pages_id));
        let catalog_id = self.doc.add_object(catalog);
        self.doc.trailer.set("Root", Object::Reference(catalog_id));

        let mut bytes = Vec::new();
        self.doc.save_to(&mut bytes).expect("fixture serializes");
        bytes
    }
}

/// `count` Letter pages reading "Page 1", "Page 2", ...
pub fn numbered_pages(count: usize) -> Vec<u8> {
    let mut fixture = Fixture::new();
    for i in 1..=count {
        fixture.text_page(LETTER, &format!("Page {}", i));
    }
    fixture.build()
}

/// A well-formed document whose page tree is empty.
pub fn empty_document() -> Vec<u8> {
    Fixture::new().build()
}

/// Write `bytes` to `dir/name`.
pub fn write_file(dir: &Path, name: &str, bytes: &[u8]) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, bytes).expect("fixture written");
    path
}

/// Raw `Contents` entries of a page, read back with lopdf.
pub fn page_contents(bytes: &[u8], page_number: u32) -> Vec<Object> {
    let doc = Document::load_mem(bytes).expect("valid output");
    let page_id = doc.get_pages()[&page_number];
    match doc.get_dictionary(page_id).unwrap().get(b"Contents").unwrap() {
        Object::Array(items) => items.clone(),
        other => vec![other.clone()],
    }
}
