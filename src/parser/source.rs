//! Where documents come from and where they go.

use std::fmt;
use std::io::Write;
use std::path::{Path, PathBuf};

/// A document byte source, addressed by path or in-memory buffer.
#[derive(Debug, Clone, Copy)]
pub enum DocumentSource<'a> {
    /// A file on disk
    Path(&'a Path),
    /// Bytes already in memory
    Bytes(&'a [u8]),
}

impl fmt::Display for DocumentSource<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocumentSource::Path(path) => write!(f, "{}", path.display()),
            DocumentSource::Bytes(data) => write!(f, "<{} bytes in memory>", data.len()),
        }
    }
}

impl<'a> From<&'a Path> for DocumentSource<'a> {
    fn from(path: &'a Path) -> Self {
        DocumentSource::Path(path)
    }
}

impl<'a> From<&'a PathBuf> for DocumentSource<'a> {
    fn from(path: &'a PathBuf) -> Self {
        DocumentSource::Path(path.as_path())
    }
}

impl<'a> From<&'a str> for DocumentSource<'a> {
    fn from(path: &'a str) -> Self {
        DocumentSource::Path(Path::new(path))
    }
}

impl<'a> From<&'a [u8]> for DocumentSource<'a> {
    fn from(data: &'a [u8]) -> Self {
        DocumentSource::Bytes(data)
    }
}

impl<'a> From<&'a Vec<u8>> for DocumentSource<'a> {
    fn from(data: &'a Vec<u8>) -> Self {
        DocumentSource::Bytes(data.as_slice())
    }
}

/// A document byte sink.
///
/// Path sinks are written whole: the document goes to a temporary file next
/// to the target, which is then renamed over it. Two writers racing on the
/// same path leave whichever finished last.
pub enum DocumentSink<'a> {
    /// A file on disk (overwritten)
    Path(&'a Path),
    /// Any writer, e.g. a `Vec<u8>`
    Writer(&'a mut dyn Write),
}

impl fmt::Debug for DocumentSink<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocumentSink::Path(path) => f.debug_tuple("Path").field(path).finish(),
            DocumentSink::Writer(_) => f.write_str("Writer(..)"),
        }
    }
}

impl<'a> From<&'a Path> for DocumentSink<'a> {
    fn from(path: &'a Path) -> Self {
        DocumentSink::Path(path)
    }
}

impl<'a> From<&'a PathBuf> for DocumentSink<'a> {
    fn from(path: &'a PathBuf) -> Self {
        DocumentSink::Path(path.as_path())
    }
}

impl<'a> From<&'a str> for DocumentSink<'a> {
    fn from(path: &'a str) -> Self {
        DocumentSink::Path(Path::new(path))
    }
}

impl<'a> From<&'a mut Vec<u8>> for DocumentSink<'a> {
    fn from(buffer: &'a mut Vec<u8>) -> Self {
        DocumentSink::Writer(buffer)
    }
}
