//! Content stream interpretation.
//!
//! Walks a page's content stream, and the Form XObjects it draws, tracking
//! just enough graphics and text state to place text spans and image
//! occurrences in PDF user space (bottom-left origin). Conversion to the
//! top-left coordinates callers see happens in [`crate::extract`].

use std::collections::HashMap;

use lopdf::content::Content;
use lopdf::{Dictionary, Document as LopdfDocument, Object, ObjectId};

use super::backend::{inherited_attribute, resolve, resolve_dict};
use super::fonts::StandardFont;
use super::matrix::{get_number, Matrix};
use super::options::ExtractOptions;
use crate::error::{Error, Result};

/// Advance used for glyphs with no known width, in 1/1000 em.
const FALLBACK_GLYPH_UNITS: f32 = 500.0;

/// `TJ` adjustments beyond this (in 1/1000 em) read as a word break.
const WORD_GAP_THRESHOLD: f32 = 200.0;

/// Baselines closer than this belong to the same line.
const BASELINE_TOLERANCE: f32 = 0.01;

/// Text size before the first `Tf`.
const DEFAULT_FONT_SIZE: f32 = 12.0;

/// A text span with position and style information, in user space.
#[derive(Debug, Clone)]
pub struct TextSpan {
    /// The text content
    pub text: String,
    /// X position (left edge)
    pub x: f32,
    /// Y position (baseline)
    pub y: f32,
    /// Advance width of the shown text
    pub width: f32,
    /// Effective font size in points
    pub font_size: f32,
    /// Font name (e.g., "Helvetica-Bold")
    pub font_name: String,
}

impl TextSpan {
    /// Get the top Y coordinate (approximate, based on font size).
    pub fn top(&self) -> f32 {
        self.y + self.font_size * 0.8
    }
}

/// Consecutive spans sharing a baseline.
#[derive(Debug, Clone)]
pub struct TextLine {
    /// Baseline of the first span
    pub y: f32,
    /// Spans in the order they were shown
    pub spans: Vec<TextSpan>,
}

/// The lines shown between one `BT` and its `ET`.
#[derive(Debug, Clone, Default)]
pub struct TextBlock {
    pub lines: Vec<TextLine>,
}

impl TextBlock {
    fn push(&mut self, span: TextSpan) {
        match self.lines.last_mut() {
            Some(line) if (line.y - span.y).abs() <= BASELINE_TOLERANCE => line.spans.push(span),
            _ => self.lines.push(TextLine {
                y: span.y,
                spans: vec![span],
            }),
        }
    }
}

/// One `Do` of something that is not a Form XObject.
#[derive(Debug, Clone)]
pub struct ImageOccurrence {
    /// Resource name used by `Do` (without the slash)
    pub resource_name: String,
    /// Object the name points at, or why it could not be found
    pub target: std::result::Result<ObjectId, String>,
    /// CTM in effect at the `Do`
    pub ctm: Matrix,
}

/// Everything found on one page, in content-stream order.
#[derive(Debug, Clone, Default)]
pub struct PageScan {
    pub blocks: Vec<TextBlock>,
    pub images: Vec<ImageOccurrence>,
}

impl PageScan {
    /// All spans, flattened blocks -> lines -> spans.
    pub fn spans(&self) -> impl Iterator<Item = &TextSpan> {
        self.blocks
            .iter()
            .flat_map(|block| block.lines.iter())
            .flat_map(|line| line.spans.iter())
    }

    pub fn line_count(&self) -> usize {
        self.blocks.iter().map(|block| block.lines.len()).sum()
    }
}

/// Interprets content streams of one document.
pub struct ContentInterpreter<'a> {
    doc: &'a LopdfDocument,
    options: &'a ExtractOptions,
    blocks: Vec<TextBlock>,
    open_block: Option<TextBlock>,
    images: Vec<ImageOccurrence>,
}

impl<'a> ContentInterpreter<'a> {
    pub fn new(doc: &'a LopdfDocument, options: &'a ExtractOptions) -> Self {
        Self {
            doc,
            options,
            blocks: Vec::new(),
            open_block: None,
            images: Vec::new(),
        }
    }

    /// Interpret one page.
    pub fn scan_page(mut self, page_id: ObjectId) -> Result<PageScan> {
        let content = page_content(self.doc, page_id)?;
        let resources =
            inherited_attribute(self.doc, page_id, b"Resources").and_then(|o| o.as_dict().ok());

        self.run(&content, resources, Matrix::IDENTITY, 0)?;
        self.end_block();

        Ok(PageScan {
            blocks: self.blocks,
            images: self.images,
        })
    }

    fn run(
        &mut self,
        data: &[u8],
        resources: Option<&'a Dictionary>,
        ctm: Matrix,
        depth: usize,
    ) -> Result<()> {
        let content = match Content::decode(data) {
            Ok(content) => content,
            Err(e) if depth > 0 => {
                log::warn!("Skipping undecodable form content: {}", e);
                return Ok(());
            }
            Err(e) => return Err(Error::DocumentRead(format!("content stream: {}", e))),
        };

        let fonts = load_fonts(self.doc, resources);
        let xobjects = resources
            .and_then(|r| r.get(b"XObject").ok())
            .and_then(|o| resolve_dict(self.doc, o));

        let mut state = GraphicsState::new(ctm);
        let mut saved: Vec<GraphicsState> = Vec::new();
        let mut text = TextObject::default();

        for op in &content.operations {
            let operands = op.operands.as_slice();
            match op.operator.as_str() {
                "q" => saved.push(state.clone()),
                "Q" => {
                    if let Some(previous) = saved.pop() {
                        state = previous;
                    }
                }
                "cm" => {
                    if let Some(m) = Matrix::from_operands(operands) {
                        state.ctm = m.concat(&state.ctm);
                    }
                }
                "BT" => {
                    text = TextObject::default();
                    self.end_block();
                    self.open_block = Some(TextBlock::default());
                }
                "ET" => self.end_block(),
                "Tm" => {
                    if let Some(m) = Matrix::from_operands(operands) {
                        text.set(m);
                    }
                }
                "Td" => {
                    if let Some((tx, ty)) = number_pair(operands) {
                        text.next_line(tx, ty);
                    }
                }
                "TD" => {
                    if let Some((tx, ty)) = number_pair(operands) {
                        state.leading = -ty;
                        text.next_line(tx, ty);
                    }
                }
                "T*" => text.next_line(0.0, -state.leading),
                "TL" => {
                    if let Some(v) = first_number(operands) {
                        state.leading = v;
                    }
                }
                "Tc" => {
                    if let Some(v) = first_number(operands) {
                        state.char_spacing = v;
                    }
                }
                "Tw" => {
                    if let Some(v) = first_number(operands) {
                        state.word_spacing = v;
                    }
                }
                "Tz" => {
                    if let Some(v) = first_number(operands) {
                        state.horizontal_scaling = v / 100.0;
                    }
                }
                "Tf" => {
                    if let Some(Object::Name(name)) = operands.first() {
                        state.font = Some(name.clone());
                    }
                    if let Some(size) = operands.get(1).and_then(get_number) {
                        state.font_size = size;
                    }
                }
                "Tj" => self.show(&operands[..operands.len().min(1)], &state, &mut text, &fonts),
                "TJ" => {
                    if let Some(Object::Array(items)) = operands.first() {
                        self.show(items, &state, &mut text, &fonts);
                    }
                }
                "'" => {
                    text.next_line(0.0, -state.leading);
                    self.show(&operands[..operands.len().min(1)], &state, &mut text, &fonts);
                }
                "\"" => {
                    if let Some((aw, ac)) = number_pair(operands) {
                        state.word_spacing = aw;
                        state.char_spacing = ac;
                    }
                    text.next_line(0.0, -state.leading);
                    if let Some(shown) = operands.get(2) {
                        self.show(std::slice::from_ref(shown), &state, &mut text, &fonts);
                    }
                }
                "Do" => {
                    if let Some(Object::Name(name)) = operands.first() {
                        self.draw_xobject(name, xobjects, resources, state.ctm, depth)?;
                    }
                }
                _ => {}
            }
        }

        Ok(())
    }

    /// Show strings (and `TJ` adjustments) as a single span.
    fn show(
        &mut self,
        items: &[Object],
        state: &GraphicsState,
        text: &mut TextObject,
        fonts: &HashMap<Vec<u8>, FontMetrics<'a>>,
    ) {
        let font = state.font.as_ref().and_then(|key| fonts.get(key));
        let start = text.tm.concat(&state.ctm);

        let mut shown = String::new();
        let mut advance = 0.0;
        for item in items {
            match item {
                Object::String(bytes, _) => {
                    let decoded = match font {
                        Some(font) => font.decode(self.doc, bytes),
                        None => decode_text_simple(bytes),
                    };
                    advance += state.advance(font, bytes, &decoded);
                    shown.push_str(&decoded);
                }
                other => {
                    if let Some(adjustment) = get_number(other) {
                        advance -= adjustment / 1000.0 * state.font_size * state.horizontal_scaling;
                        if -adjustment > WORD_GAP_THRESHOLD {
                            push_word_break(&mut shown);
                        }
                    }
                }
            }
        }
        text.tm = Matrix::translation(advance, 0.0).concat(&text.tm);

        // Adjustments alone show nothing
        if shown.is_empty() {
            return;
        }
        let Some(block) = self.open_block.as_mut() else {
            return;
        };

        let font_name = match (font, &state.font) {
            (Some(font), _) => font.base_font.clone(),
            (None, Some(key)) => String::from_utf8_lossy(key).into_owned(),
            (None, None) => String::new(),
        };
        let (x, y) = start.transform_point(0.0, 0.0);
        block.push(TextSpan {
            text: shown,
            x,
            y,
            width: advance * start.horizontal_scale(),
            font_size: state.font_size * start.vertical_scale(),
            font_name,
        });
    }

    fn draw_xobject(
        &mut self,
        name: &[u8],
        xobjects: Option<&'a Dictionary>,
        resources: Option<&'a Dictionary>,
        ctm: Matrix,
        depth: usize,
    ) -> Result<()> {
        let resource_name = String::from_utf8_lossy(name).into_owned();
        let mut occurrence = |target| {
            self.images.push(ImageOccurrence {
                resource_name: resource_name.clone(),
                target,
                ctm,
            })
        };

        let id = match xobjects.and_then(|x| x.get(name).ok()) {
            Some(Object::Reference(id)) => *id,
            Some(_) => {
                occurrence(Err(format!("/{} is not an indirect object", resource_name)));
                return Ok(());
            }
            None => {
                occurrence(Err(format!("no XObject named /{}", resource_name)));
                return Ok(());
            }
        };

        let stream = match self.doc.get_object(id) {
            Ok(Object::Stream(stream)) => stream,
            Ok(_) => {
                occurrence(Err(format!("object {} {} R is not a stream", id.0, id.1)));
                return Ok(());
            }
            Err(_) => {
                occurrence(Err(format!("object {} {} R not found", id.0, id.1)));
                return Ok(());
            }
        };

        let subtype: &[u8] = match stream.dict.get(b"Subtype") {
            Ok(Object::Name(subtype)) => subtype,
            _ => &[],
        };
        if subtype != b"Form" {
            occurrence(Ok(id));
            return Ok(());
        }

        if !self.options.include_form_xobjects {
            return Ok(());
        }
        if depth >= self.options.max_form_depth {
            log::debug!("Form /{} nested too deeply; not descending", resource_name);
            return Ok(());
        }

        let matrix = stream
            .dict
            .get(b"Matrix")
            .ok()
            .and_then(|o| o.as_array().ok())
            .and_then(|a| Matrix::from_operands(a))
            .unwrap_or_default();
        let form_resources = stream
            .dict
            .get(b"Resources")
            .ok()
            .and_then(|o| resolve_dict(self.doc, o))
            .or(resources);
        let data = stream
            .decompressed_content()
            .unwrap_or_else(|_| stream.content.clone());

        // Text objects do not span form boundaries
        let outer = self.open_block.take();
        let result = self.run(&data, form_resources, matrix.concat(&ctm), depth + 1);
        self.end_block();
        self.open_block = outer;
        result
    }

    fn end_block(&mut self) {
        if let Some(block) = self.open_block.take() {
            if !block.lines.is_empty() {
                self.blocks.push(block);
            }
        }
    }
}

/// Graphics state items that `q`/`Q` save and restore.
#[derive(Debug, Clone)]
struct GraphicsState {
    ctm: Matrix,
    font: Option<Vec<u8>>,
    font_size: f32,
    char_spacing: f32,
    word_spacing: f32,
    horizontal_scaling: f32,
    leading: f32,
}

impl GraphicsState {
    fn new(ctm: Matrix) -> Self {
        Self {
            ctm,
            font: None,
            font_size: DEFAULT_FONT_SIZE,
            char_spacing: 0.0,
            word_spacing: 0.0,
            horizontal_scaling: 1.0,
            leading: 0.0,
        }
    }

    /// Horizontal displacement of a shown string, in text space.
    fn advance(&self, font: Option<&FontMetrics<'_>>, bytes: &[u8], decoded: &str) -> f32 {
        let size = self.font_size;
        let mut tx = 0.0;
        match font.filter(|f| !f.composite) {
            Some(font) => {
                for &code in bytes {
                    let units = font.glyph_units(code).unwrap_or(FALLBACK_GLYPH_UNITS);
                    tx += units / 1000.0 * size + self.char_spacing;
                    if code == b' ' {
                        tx += self.word_spacing;
                    }
                }
            }
            None => {
                for c in decoded.chars() {
                    tx += FALLBACK_GLYPH_UNITS / 1000.0 * size + self.char_spacing;
                    if c == ' ' {
                        tx += self.word_spacing;
                    }
                }
            }
        }
        tx * self.horizontal_scaling
    }
}

/// Text matrix and text line matrix inside `BT`/`ET`.
#[derive(Debug, Clone, Copy, Default)]
struct TextObject {
    tm: Matrix,
    tlm: Matrix,
}

impl TextObject {
    fn set(&mut self, m: Matrix) {
        self.tm = m;
        self.tlm = m;
    }

    fn next_line(&mut self, tx: f32, ty: f32) {
        self.tlm = Matrix::translation(tx, ty).concat(&self.tlm);
        self.tm = self.tlm;
    }
}

/// What we know about a font resource.
struct FontMetrics<'a> {
    base_font: String,
    dict: &'a Dictionary,
    first_char: i64,
    widths: Vec<f32>,
    composite: bool,
    standard: Option<StandardFont>,
}

impl<'a> FontMetrics<'a> {
    fn load(doc: &'a LopdfDocument, dict: &'a Dictionary) -> Self {
        let base_font = match dict.get(b"BaseFont") {
            Ok(Object::Name(name)) => String::from_utf8_lossy(name).into_owned(),
            _ => String::new(),
        };
        let first_char = dict
            .get(b"FirstChar")
            .ok()
            .and_then(|o| resolve(doc, o))
            .and_then(|o| o.as_i64().ok())
            .unwrap_or(0);
        let widths = dict
            .get(b"Widths")
            .ok()
            .and_then(|o| resolve(doc, o))
            .and_then(|o| o.as_array().ok())
            .map(|items| {
                items
                    .iter()
                    .map(|w| resolve(doc, w).and_then(get_number).unwrap_or(0.0))
                    .collect()
            })
            .unwrap_or_default();
        let composite = matches!(dict.get(b"Subtype"), Ok(Object::Name(s)) if s == b"Type0");
        let standard = StandardFont::from_base_font(&base_font);

        Self {
            base_font,
            dict,
            first_char,
            widths,
            composite,
            standard,
        }
    }

    /// Width of a single-byte code, in 1/1000 em.
    fn glyph_units(&self, code: u8) -> Option<f32> {
        let slot = i64::from(code) - self.first_char;
        if slot >= 0 {
            if let Some(width) = self.widths.get(slot as usize) {
                return Some(*width);
            }
        }
        self.standard.map(|font| f32::from(font.glyph_width(code)))
    }

    fn decode(&self, doc: &LopdfDocument, bytes: &[u8]) -> String {
        match self.dict.get_font_encoding(doc) {
            Ok(encoding) => LopdfDocument::decode_text(&encoding, bytes)
                .unwrap_or_else(|_| decode_text_simple(bytes)),
            Err(_) => decode_text_simple(bytes),
        }
    }
}

/// Font resources by name.
fn load_fonts<'a>(
    doc: &'a LopdfDocument,
    resources: Option<&'a Dictionary>,
) -> HashMap<Vec<u8>, FontMetrics<'a>> {
    let Some(fonts) = resources
        .and_then(|r| r.get(b"Font").ok())
        .and_then(|o| resolve_dict(doc, o))
    else {
        return HashMap::new();
    };

    fonts
        .iter()
        .filter_map(|(name, value)| {
            let dict = resolve_dict(doc, value)?;
            Some((name.clone(), FontMetrics::load(doc, dict)))
        })
        .collect()
}

/// Concatenated (decompressed where possible) content streams of a page.
fn page_content(doc: &LopdfDocument, page_id: ObjectId) -> Result<Vec<u8>> {
    let page = doc
        .get_dictionary(page_id)
        .map_err(|e| Error::DocumentRead(e.to_string()))?;

    let Ok(contents) = page.get(b"Contents") else {
        return Ok(Vec::new());
    };
    let parts: Vec<&Object> = match resolve(doc, contents) {
        Some(Object::Array(items)) => items.iter().collect(),
        Some(other) => vec![other],
        None => {
            log::warn!("Page content object is missing; treating page as blank");
            return Ok(Vec::new());
        }
    };

    let mut data = Vec::new();
    for part in parts {
        if let Some(Object::Stream(stream)) = resolve(doc, part) {
            let bytes = stream
                .decompressed_content()
                .unwrap_or_else(|_| stream.content.clone());
            data.extend_from_slice(&bytes);
            data.push(b'\n');
        }
    }
    Ok(data)
}

fn first_number(operands: &[Object]) -> Option<f32> {
    operands.first().and_then(get_number)
}

fn number_pair(operands: &[Object]) -> Option<(f32, f32)> {
    Some((
        get_number(operands.first()?)?,
        get_number(operands.get(1)?)?,
    ))
}

/// Add a space for a wide `TJ` gap, unless the text already ends in one or
/// is in a script written without spaces.
fn push_word_break(text: &mut String) {
    match text.chars().last() {
        Some(c) if c != ' ' && c != '\u{00A0}' && !is_spaceless_script_char(c) => text.push(' '),
        _ => {}
    }
}

/// Chinese and Japanese are written without word spaces; Korean is not.
fn is_spaceless_script_char(c: char) -> bool {
    matches!(
        c as u32,
        0x4E00..=0x9FFF     // CJK Unified Ideographs
            | 0x3400..=0x4DBF   // Extension A
            | 0x20000..=0x2EBEF // Extensions B-F
            | 0x3040..=0x30FF   // Hiragana, Katakana
            | 0x3000..=0x303F // CJK Symbols and Punctuation
    )
}

/// Decoding fallback when the font gives no usable encoding.
fn decode_text_simple(bytes: &[u8]) -> String {
    if let Some(utf16) = bytes.strip_prefix(&[0xFE, 0xFF]) {
        let units: Vec<u16> = utf16
            .chunks_exact(2)
            .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
            .collect();
        return String::from_utf16_lossy(&units);
    }

    match std::str::from_utf8(bytes) {
        Ok(s) => s.to_string(),
        // Latin-1
        Err(_) => bytes.iter().map(|&b| b as char).collect(),
    }
}
