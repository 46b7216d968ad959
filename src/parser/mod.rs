//! PDF access and content-stream interpretation.

mod backend;
mod content;
mod fonts;
mod matrix;
mod options;
mod source;

pub use backend::{
    encode_content, resolve_dict, ContentOp, DocumentHandle, FontResource, LopdfHandle, NewPage,
    PageId, PdfValue,
};
pub use content::{ContentInterpreter, ImageOccurrence, PageScan, TextBlock, TextLine, TextSpan};
pub use fonts::{encode_win_ansi, StandardFont};
pub use matrix::Matrix;
pub use options::{ErrorMode, ExtractOptions};
pub use source::{DocumentSink, DocumentSource};
