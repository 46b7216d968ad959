//! Glyph widths and text encoding for the standard Helvetica faces.
//!
//! Generated pages use the built-in Helvetica-Bold font, which carries no
//! `/Widths` array. These AFM tables let both the composer (centering) and
//! the extractor (span widths) measure text set in it.

use lopdf::{Dictionary, Document as LopdfDocument};

// Helvetica, WinAnsi 32..=126, in 1/1000 em
const HELVETICA_32_126: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, //
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556, //
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778, //
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556, //
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556, //
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584,
];

// Helvetica-Bold, WinAnsi 32..=126, in 1/1000 em
const HELVETICA_BOLD_32_126: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278, //
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 333, 333, 584, 584, 584, 611, //
    975, 722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, 722, 778, //
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 333, 278, 333, 584, 556, //
    333, 556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, 611, 611, //
    611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, 389, 280, 389, 584,
];

/// Width used for codes outside the tables.
const DEFAULT_WIDTH: u16 = 556;

/// WinAnsi punctuation above 126 whose width differs from the default,
/// as (code, Helvetica, Helvetica-Bold).
const WIN_ANSI_PUNCTUATION: [(u8, u16, u16); 14] = [
    (0x7F, 350, 350),   // bullet
    (0x82, 222, 278),   // quotesinglbase
    (0x84, 333, 500),   // quotedblbase
    (0x85, 1000, 1000), // ellipsis
    (0x89, 1000, 1000), // perthousand
    (0x91, 222, 278),   // quoteleft
    (0x92, 222, 278),   // quoteright
    (0x93, 333, 500),   // quotedblleft
    (0x94, 333, 500),   // quotedblright
    (0x95, 350, 350),   // bullet
    (0x97, 1000, 1000), // emdash
    (0x99, 1000, 1000), // trademark
    (0xA0, 278, 278),   // nbspace
    (0xAD, 333, 333),   // hyphen
];

/// One of the built-in faces we carry metrics for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StandardFont {
    /// Helvetica
    Helvetica,
    /// Helvetica-Bold
    HelveticaBold,
}

impl StandardFont {
    /// Match a `/BaseFont` name, ignoring a subset prefix (`ABCDEF+`).
    pub fn from_base_font(name: &str) -> Option<Self> {
        let name = name.split_once('+').map(|(_, rest)| rest).unwrap_or(name);
        match name {
            "Helvetica" | "Arial" | "ArialMT" => Some(StandardFont::Helvetica),
            "Helvetica-Bold" | "Arial-Bold" | "Arial,Bold" | "Arial-BoldMT" => {
                Some(StandardFont::HelveticaBold)
            }
            _ => None,
        }
    }

    /// PostScript name for `/BaseFont`.
    pub fn base_font(&self) -> &'static str {
        match self {
            StandardFont::Helvetica => "Helvetica",
            StandardFont::HelveticaBold => "Helvetica-Bold",
        }
    }

    /// Advance width of a single-byte code, in 1/1000 em.
    pub fn glyph_width(&self, code: u8) -> u16 {
        let table = match self {
            StandardFont::Helvetica => &HELVETICA_32_126,
            StandardFont::HelveticaBold => &HELVETICA_BOLD_32_126,
        };
        if (32..=126).contains(&code) {
            return table[(code - 32) as usize];
        }
        WIN_ANSI_PUNCTUATION
            .iter()
            .find(|(c, _, _)| *c == code)
            .map(|&(_, regular, bold)| match self {
                StandardFont::Helvetica => regular,
                StandardFont::HelveticaBold => bold,
            })
            .unwrap_or(DEFAULT_WIDTH)
    }

    /// Width of `text` at `font_size`, in points, as set with
    /// [`encode_win_ansi`].
    pub fn text_width(&self, text: &str, font_size: f32) -> f32 {
        let units: u32 = encode_win_ansi(text)
            .into_iter()
            .map(|code| u32::from(self.glyph_width(code)))
            .sum();
        units as f32 * font_size / 1000.0
    }
}

/// Encode text for a simple font with `/WinAnsiEncoding`.
///
/// Characters WinAnsi cannot represent become `?`. Escaping of parentheses
/// and backslashes happens when the stream is serialized.
pub fn encode_win_ansi(text: &str) -> Vec<u8> {
    let mut font = Dictionary::new();
    font.set("Type", "Font");
    font.set("Encoding", "WinAnsiEncoding");
    let doc = LopdfDocument::new();
    let Ok(encoding) = font.get_font_encoding(&doc) else {
        return text
            .chars()
            .map(|c| if c.is_ascii() { c as u8 } else { b'?' })
            .collect();
    };

    let mut buf = [0u8; 4];
    text.chars()
        .flat_map(|c| {
            let code = LopdfDocument::encode_text(&encoding, c.encode_utf8(&mut buf));
            if code.is_empty() {
                vec![b'?']
            } else {
                code
            }
        })
        .collect()
}
