//! Page text extraction.
//!
//! Walks a page's content stream and decodes every text-showing operator
//! through the font that is active at that point. Fonts are decoded either
//! through their `/ToUnicode` CMap or, failing that, through their base
//! encoding.

use std::collections::HashMap;

use encoding_rs::{Encoding as Charset, MACINTOSH, WINDOWS_1252};
use log::{debug, warn};

use pdf::content::{Matrix, Op, TextDrawAdjusted};
use pdf::encoding::BaseEncoding;
use pdf::error::PdfError;
use pdf::font::{Font, ToUnicodeMap};
use pdf::object::{Page, Resolve};

/// StandardEncoding agrees with ASCII in the printable range apart from
/// the two quote characters. The upper half (ligatures, accents) is not
/// mapped.
fn standard_char(code: u8) -> Option<char> {
    match code {
        0x27 => Some('\u{2019}'),
        0x60 => Some('\u{2018}'),
        0x20..=0x7e => Some(code as char),
        _ => None,
    }
}

enum Decoder {
    /// ToUnicode map. CID fonts use two-byte codes, simple fonts one byte.
    Unicode { map: ToUnicodeMap, wide: bool },
    Charset(&'static Charset),
    Standard,
}

impl Decoder {
    fn for_font(font: &Font, resolve: &impl Resolve) -> Option<Decoder> {
        let wide = font.is_cid();
        match font.to_unicode(resolve) {
            Some(Ok(map)) => return Some(Decoder::Unicode { map, wide }),
            Some(Err(e)) => warn!("unreadable ToUnicode map in font {:?}: {}", font.name, e),
            None => {}
        }
        match font.encoding().map(|e| &e.base) {
            Some(BaseEncoding::WinAnsiEncoding) => Some(Decoder::Charset(WINDOWS_1252)),
            Some(BaseEncoding::MacRomanEncoding) => Some(Decoder::Charset(MACINTOSH)),
            // simple fonts without /Encoding use their built-in one, usually Standard
            Some(BaseEncoding::StandardEncoding) | None if !wide => Some(Decoder::Standard),
            Some(other) => {
                warn!("unsupported pdf encoding {:?}", other);
                None
            }
            None => {
                debug!("CID font {:?} has no ToUnicode map", font.name);
                None
            }
        }
    }

    fn decode_into(&self, data: &[u8], out: &mut String) {
        match self {
            Decoder::Unicode { map, wide } => {
                let width = if *wide { 2 } else { 1 };
                for chunk in data.chunks(width) {
                    let code = chunk.iter().fold(0u16, |acc, &b| acc << 8 | b as u16);
                    if let Some(s) = map.get(code) {
                        out.push_str(s);
                    }
                }
            }
            Decoder::Charset(charset) => {
                let (text, _) = charset.decode_without_bom_handling(data);
                out.push_str(&text);
            }
            Decoder::Standard => out.extend(data.iter().filter_map(|&b| standard_char(b))),
        }
    }
}

/// Decoders keyed by resource name. Fonts without a usable decoder are
/// left out, so text drawn with them is skipped.
#[derive(Default)]
struct FontCache {
    fonts: HashMap<String, Decoder>,
}

impl FontCache {
    fn add(&mut self, key: impl Into<String>, font: &Font, resolve: &impl Resolve) {
        if let Some(decoder) = Decoder::for_font(font, resolve) {
            self.fonts.insert(key.into(), decoder);
        }
    }

    fn get(&self, key: &str) -> Option<&Decoder> {
        self.fonts.get(key)
    }
}

// ExtGState fonts live in their own namespace
fn gs_key(name: &str) -> String {
    format!("gs:{}", name)
}

/// Tracks just enough of the text state to decide where line breaks go.
struct TextCursor {
    leading: f32,
    matrix: Matrix,
}

impl TextCursor {
    fn new() -> Self {
        TextCursor {
            leading: 1.0,
            matrix: Matrix {
                a: 1.0,
                b: 0.0,
                c: 0.0,
                d: 1.0,
                e: 0.0,
                f: 0.0,
            },
        }
    }

    fn newline(&mut self, out: &mut String) {
        out.push('\n');
        self.matrix.f -= self.leading * self.matrix.d;
    }

    fn translate(&mut self, dy: f32, out: &mut String) {
        self.matrix.f += dy * self.matrix.d;
        if dy != 0.0 {
            out.push('\n');
        }
    }

    fn set_matrix(&mut self, matrix: Matrix, out: &mut String) {
        if matrix.f != self.matrix.f {
            out.push('\n');
        } else {
            out.push('\t');
        }
        self.matrix = matrix;
    }
}

/// Extracts the text of one page.
///
/// Returns `Ok(None)` for a page without a content stream. Fonts the
/// decoder cannot handle contribute nothing rather than failing the page.
pub fn page_text(page: &Page, resolve: &impl Resolve) -> Result<Option<String>, PdfError> {
    let contents = match page.contents.as_ref() {
        Some(contents) => contents,
        None => return Ok(None),
    };
    let resources = page.resources.as_ref();

    let mut cache = FontCache::default();
    if let Some(resources) = resources {
        for (name, font) in resources.fonts() {
            cache.add(name, font, resolve);
        }
        for (name, gs) in &resources.graphics_states {
            if let Some((font, _)) = gs.font {
                let font = resolve.get(font)?;
                cache.add(gs_key(name.as_str()), &font, resolve);
            }
        }
    }

    let mut out = String::new();
    let mut cursor = TextCursor::new();
    let mut current = None;

    for op in contents.operations(resolve)? {
        match op {
            Op::GraphicsState { name } => {
                let sets_font = resources
                    .and_then(|r| r.graphics_states.get(&name))
                    .map_or(false, |gs| gs.font.is_some());
                if sets_font {
                    current = cache.get(&gs_key(name.as_str()));
                }
            }
            Op::Leading { leading } => cursor.leading = leading,
            Op::TextFont { name, .. } => current = cache.get(name.as_str()),
            Op::TextDraw { text } => {
                if let Some(decoder) = current {
                    decoder.decode_into(text.as_bytes(), &mut out);
                }
            }
            Op::TextDrawAdjusted { array } => {
                if let Some(decoder) = current {
                    for item in &array {
                        if let TextDrawAdjusted::Text(text) = item {
                            decoder.decode_into(text.as_bytes(), &mut out);
                        }
                    }
                }
            }
            Op::TextNewline => cursor.newline(&mut out),
            Op::MoveTextPosition { translation } => cursor.translate(translation.y, &mut out),
            Op::SetTextMatrix { matrix } => cursor.set_matrix(matrix, &mut out),
            _ => {}
        }
    }
    Ok(Some(out))
}
