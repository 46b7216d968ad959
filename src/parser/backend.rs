//! Document handle abstraction.
//!
//! Provides a trait-based interface for the page-level operations the
//! composer needs, isolating the concrete PDF library (lopdf) behind it.
//! Handles are owned values: whatever they hold is released when they go
//! out of scope, on success and error paths alike.

use std::collections::HashMap;
use std::io::Write;
use std::path::Path;

use lopdf::content::{Content, Operation};
use lopdf::{Dictionary, Document as LopdfDocument, Object, ObjectId, Stream, StringFormat};
use tempfile::NamedTempFile;

use super::source::{DocumentSink, DocumentSource};
use crate::detect::{detect_header_from_bytes, detect_header_from_path};
use crate::error::{Error, Result};
use crate::model::PageSize;

/// Page identifier: (object number, generation number).
pub type PageId = (u32, u16);

/// Guard against cyclic `/Parent` chains in broken files.
const MAX_TREE_DEPTH: usize = 64;

/// A value in a content stream operand, free of lopdf types.
#[derive(Debug, Clone, PartialEq)]
pub enum PdfValue {
    Integer(i64),
    Real(f32),
    Name(Vec<u8>),
    Str(Vec<u8>),
    Array(Vec<PdfValue>),
}

/// A single operation in a content stream.
#[derive(Debug, Clone, PartialEq)]
pub struct ContentOp {
    pub operator: String,
    pub operands: Vec<PdfValue>,
}

impl ContentOp {
    pub fn new(operator: impl Into<String>, operands: Vec<PdfValue>) -> Self {
        Self {
            operator: operator.into(),
            operands,
        }
    }
}

/// A font a generated page refers to by resource name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FontResource {
    /// Resource name used by `Tf` (e.g., `F1`)
    pub name: Vec<u8>,
    /// Standard 14 base font (e.g., `Helvetica-Bold`)
    pub base_font: String,
}

/// Content of a page to be appended.
#[derive(Debug, Clone, Default)]
pub struct NewPage {
    pub operations: Vec<ContentOp>,
    pub fonts: Vec<FontResource>,
}

/// Page-level document operations.
pub trait DocumentHandle {
    /// All pages in document order.
    fn pages(&self) -> Vec<PageId>;

    /// Number of pages.
    fn page_count(&self) -> u32 {
        self.pages().len() as u32
    }

    /// MediaBox of a 1-based page, resolved through the page tree.
    fn page_size(&self, page_number: u32) -> Result<PageSize>;

    /// Append a page of the given size after the last page.
    fn append_page(&mut self, size: &PageSize, page: NewPage) -> Result<PageId>;

    /// Serialize the whole document to a sink.
    fn save(&mut self, sink: DocumentSink<'_>) -> Result<()>;
}

/// Concrete [`DocumentHandle`] backed by `lopdf::Document`.
pub struct LopdfHandle {
    doc: LopdfDocument,
    /// Base font name -> font object, shared by all pages we append
    font_objects: HashMap<String, ObjectId>,
}

impl LopdfHandle {
    /// Load a document, checking its header first.
    pub fn open(source: DocumentSource<'_>) -> Result<Self> {
        let doc = match source {
            DocumentSource::Path(path) => {
                detect_header_from_path(path)?;
                LopdfDocument::load(path).map_err(|e| read_error(source, e))?
            }
            DocumentSource::Bytes(data) => {
                detect_header_from_bytes(data)?;
                LopdfDocument::load_mem(data).map_err(|e| read_error(source, e))?
            }
        };

        // lopdf decrypts files with an empty user password while loading;
        // anything still carrying /Encrypt needs a password we do not have
        if doc.is_encrypted() {
            return Err(Error::DocumentRead(format!(
                "{}: document is password protected",
                source
            )));
        }
        if doc.encryption_state.is_some() {
            log::debug!("{} was decrypted with the empty user password", source);
        }
        log::debug!("Loaded {} ({} pages)", source, doc.get_pages().len());

        Ok(Self {
            doc,
            font_objects: HashMap::new(),
        })
    }

    /// Direct access to the underlying `lopdf::Document`.
    ///
    /// Escape hatch for the content interpreter and the stamp composer,
    /// which need resources and streams beyond what `DocumentHandle` offers.
    pub fn raw_doc(&self) -> &LopdfDocument {
        &self.doc
    }

    /// Mutable access to the underlying `lopdf::Document`.
    pub fn raw_doc_mut(&mut self) -> &mut LopdfDocument {
        &mut self.doc
    }

    /// Look up a 1-based page number.
    pub fn page_id(&self, page_number: u32) -> Result<PageId> {
        let pages = self.doc.get_pages();
        pages.get(&page_number).copied().ok_or(Error::PageIndex {
            page: page_number,
            page_count: pages.len() as u32,
        })
    }

    /// Look up an inheritable page attribute (`MediaBox`, `Resources`, ...)
    /// on the page or its nearest ancestor.
    pub fn inherited_attribute(&self, page_id: PageId, key: &[u8]) -> Option<&Object> {
        inherited_attribute(&self.doc, page_id, key)
    }

    /// Object id of a shared font dictionary for `base_font`, creating it on
    /// first use.
    pub fn font_object(&mut self, base_font: &str) -> ObjectId {
        if let Some(id) = self.font_objects.get(base_font) {
            return *id;
        }
        let mut font = Dictionary::new();
        font.set("Type", "Font");
        font.set("Subtype", "Type1");
        font.set("BaseFont", Object::Name(base_font.as_bytes().to_vec()));
        font.set("Encoding", "WinAnsiEncoding");
        let id = self.doc.add_object(font);
        self.font_objects.insert(base_font.to_string(), id);
        id
    }

    /// Object id of the page tree root.
    fn pages_root(&self) -> Result<ObjectId> {
        self.doc
            .catalog()
            .and_then(|catalog| catalog.get(b"Pages"))
            .and_then(Object::as_reference)
            .map_err(|e| Error::DocumentWrite(format!("page tree root: {}", e)))
    }

    fn write_to(&mut self, writer: &mut dyn Write) -> Result<()> {
        let mut writer = writer;
        self.doc
            .save_to(&mut writer)
            .map_err(|e| Error::DocumentWrite(e.to_string()))
    }

    fn write_file(&mut self, path: &Path) -> Result<()> {
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let write_error =
            |e: std::io::Error| Error::DocumentWrite(format!("{}: {}", path.display(), e));

        let mut tmp = NamedTempFile::new_in(dir).map_err(write_error)?;
        self.write_to(tmp.as_file_mut())?;
        tmp.as_file_mut().flush().map_err(write_error)?;
        tmp.persist(path).map_err(|e| write_error(e.error))?;
        Ok(())
    }
}

impl DocumentHandle for LopdfHandle {
    fn pages(&self) -> Vec<PageId> {
        self.doc.get_pages().into_values().collect()
    }

    fn page_count(&self) -> u32 {
        self.doc.get_pages().len() as u32
    }

    fn page_size(&self, page_number: u32) -> Result<PageSize> {
        let page_id = self.page_id(page_number)?;

        let media_box = self
            .inherited_attribute(page_id, b"MediaBox")
            .and_then(|obj| obj.as_array().ok())
            .filter(|array| array.len() >= 4)
            .and_then(|array| {
                let mut corners = [0.0f32; 4];
                for (slot, value) in corners.iter_mut().zip(array) {
                    *slot = resolve(&self.doc, value)?.as_float().ok()?;
                }
                Some(corners)
            });

        match media_box {
            Some(corners) => Ok(PageSize::from_media_box(corners)),
            None => {
                log::debug!("Page {} has no MediaBox; using Letter", page_number);
                Ok(PageSize::letter())
            }
        }
    }

    fn append_page(&mut self, size: &PageSize, page: NewPage) -> Result<PageId> {
        let pages_id = self.pages_root()?;

        let mut font_dict = Dictionary::new();
        for font in &page.fonts {
            let font_id = self.font_object(&font.base_font);
            font_dict.set(font.name.clone(), Object::Reference(font_id));
        }
        let mut resources = Dictionary::new();
        resources.set("Font", Object::Dictionary(font_dict));

        let bytes = encode_content(&page.operations)?;
        let content_id = self.doc.add_object(Stream::new(Dictionary::new(), bytes));

        let mut page_dict = Dictionary::new();
        page_dict.set("Type", "Page");
        page_dict.set("Parent", Object::Reference(pages_id));
        page_dict.set(
            "MediaBox",
            Object::Array(size.media_box().iter().map(|v| number(*v)).collect()),
        );
        page_dict.set("Resources", Object::Dictionary(resources));
        page_dict.set("Contents", Object::Reference(content_id));
        let page_id = self.doc.add_object(page_dict);

        let tree = self
            .doc
            .get_object_mut(pages_id)
            .and_then(Object::as_dict_mut)
            .map_err(|e| Error::DocumentWrite(format!("page tree root: {}", e)))?;
        let count = tree.get(b"Count").and_then(Object::as_i64).unwrap_or(0);
        tree.get_mut(b"Kids")
            .and_then(Object::as_array_mut)
            .map_err(|e| Error::DocumentWrite(format!("page tree kids: {}", e)))?
            .push(Object::Reference(page_id));
        tree.set("Count", Object::Integer(count + 1));

        Ok(page_id)
    }

    fn save(&mut self, sink: DocumentSink<'_>) -> Result<()> {
        match sink {
            DocumentSink::Path(path) => self.write_file(path),
            DocumentSink::Writer(writer) => self.write_to(writer),
        }
    }
}

fn read_error(source: DocumentSource<'_>, err: lopdf::Error) -> Error {
    match Error::from(err) {
        Error::DocumentRead(reason) => Error::DocumentRead(format!("{}: {}", source, reason)),
        other => other,
    }
}

/// Look up `key` on a page dictionary or the nearest ancestor that has it.
pub fn inherited_attribute<'a>(
    doc: &'a LopdfDocument,
    page_id: PageId,
    key: &[u8],
) -> Option<&'a Object> {
    let mut current = doc.get_dictionary(page_id).ok()?;
    for _ in 0..MAX_TREE_DEPTH {
        if let Ok(value) = current.get(key) {
            return resolve(doc, value);
        }
        let parent = current.get(b"Parent").ok()?.as_reference().ok()?;
        current = doc.get_dictionary(parent).ok()?;
    }
    None
}

/// Follow one level of indirection.
pub fn resolve<'a>(doc: &'a LopdfDocument, obj: &'a Object) -> Option<&'a Object> {
    match obj {
        Object::Reference(id) => doc.get_object(*id).ok(),
        other => Some(other),
    }
}

/// Resolve an object to a dictionary, following a reference if needed.
pub fn resolve_dict<'a>(doc: &'a LopdfDocument, obj: &'a Object) -> Option<&'a Dictionary> {
    resolve(doc, obj)?.as_dict().ok()
}

/// Integral values are written as integers, everything else as reals.
fn number(value: f32) -> Object {
    if value.fract() == 0.0 && value.abs() < i32::MAX as f32 {
        Object::Integer(value as i64)
    } else {
        Object::Real(value)
    }
}

/// Serialize operations into content stream bytes.
pub fn encode_content(operations: &[ContentOp]) -> Result<Vec<u8>> {
    Content {
        operations: operations.iter().map(to_operation).collect::<Vec<_>>(),
    }
    .encode()
    .map_err(|e| Error::DocumentWrite(format!("content stream: {}", e)))
}

/// Convert a [`ContentOp`] to a lopdf operation.
fn to_operation(op: &ContentOp) -> Operation {
    Operation::new(&op.operator, op.operands.iter().map(to_object).collect())
}

fn to_object(value: &PdfValue) -> Object {
    match value {
        PdfValue::Integer(i) => Object::Integer(*i),
        PdfValue::Real(r) => Object::Real(*r),
        PdfValue::Name(n) => Object::Name(n.clone()),
        PdfValue::Str(s) => Object::String(s.clone(), StringFormat::Literal),
        PdfValue::Array(items) => Object::Array(items.iter().map(to_object).collect()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_number_integral() {
        assert!(matches!(number(612.0), Object::Integer(612)));
        assert!(matches!(number(-10.0), Object::Integer(-10)));
        assert!(matches!(number(595.28), Object::Real(r) if (r - 595.28).abs() < 1e-4));
    }

    #[test]
    fn test_to_operation() {
        let op = ContentOp::new(
            "Tf",
            vec![PdfValue::Name(b"F1".to_vec()), PdfValue::Real(20.0)],
        );
        let converted = to_operation(&op);
        assert_eq!(converted.operator, "Tf");
        assert!(matches!(&converted.operands[0], Object::Name(n) if n == b"F1"));
        assert!(matches!(converted.operands[1], Object::Real(r) if r == 20.0));
    }

    #[test]
    fn test_open_rejects_non_pdf() {
        let result = LopdfHandle::open(DocumentSource::Bytes(b"not a pdf at all"));
        assert!(matches!(result, Err(Error::DocumentRead(_))));
    }

    #[test]
    fn test_open_rejects_truncated_pdf() {
        let result = LopdfHandle::open(DocumentSource::Bytes(b"%PDF-1.7\n1 0 obj\n<<"));
        assert!(matches!(result, Err(Error::DocumentRead(_))));
    }
}
