//! Concrete font built from a font dictionary's metrics and ToUnicode map.

use std::collections::HashMap;

use super::pdffont::{CharDisp, PDFFont};
use super::tounicode::ToUnicodeMap;

/// Font with explicit width table and Unicode mapping.
///
/// Single-byte fonts without a ToUnicode entry for a code fall back to
/// Windows-1252 decoding of that byte; control codes stay undefined.
/// Two-byte fonts (Identity-H/V) only resolve through the ToUnicode map.
#[derive(Debug, Clone)]
pub struct SimpleFont {
    fontname: Option<String>,
    /// Glyph widths in 1/1000 text space units, keyed by character id
    widths: HashMap<u32, f64>,
    default_width: f64,
    descent: f64,
    unicode: ToUnicodeMap,
    multibyte: bool,
    vertical: bool,
    /// Default vertical metrics (DW2): (vy, w1y)
    vertical_default: (f64, f64),
    /// Per-glyph vertical metrics (W2): cid -> (w1y, vx, vy)
    vertical_metrics: HashMap<u32, (f64, f64, f64)>,
    latin_fallback: bool,
}

impl SimpleFont {
    pub fn new(fontname: Option<&str>) -> Self {
        Self {
            fontname: fontname.map(str::to_string),
            widths: HashMap::new(),
            default_width: 0.0,
            descent: -0.25,
            unicode: ToUnicodeMap::new(),
            multibyte: false,
            vertical: false,
            vertical_default: (880.0, -1000.0),
            vertical_metrics: HashMap::new(),
            latin_fallback: true,
        }
    }

    /// Widths for consecutive codes starting at `first_char` (FirstChar/Widths).
    pub fn with_widths(mut self, first_char: u32, widths: &[f64]) -> Self {
        for (i, w) in widths.iter().enumerate() {
            self.widths.insert(first_char + i as u32, *w);
        }
        self
    }

    pub fn with_width(mut self, cid: u32, width: f64) -> Self {
        self.widths.insert(cid, width);
        self
    }

    /// Width used for codes missing from the table (MissingWidth / DW).
    pub fn with_default_width(mut self, width: f64) -> Self {
        self.default_width = width;
        self
    }

    /// Descent in glyph space units (FontDescriptor /Descent).
    pub fn with_descent(mut self, descent: f64) -> Self {
        self.descent = descent / 1000.0;
        self
    }

    pub fn with_unicode_map(mut self, unicode: ToUnicodeMap) -> Self {
        self.unicode = unicode;
        self
    }

    pub fn with_unicode(mut self, cid: u32, text: &str) -> Self {
        self.unicode.insert(cid, text);
        self
    }

    /// Two-byte codes; disables the Latin fallback.
    pub fn multibyte(mut self, vertical: bool) -> Self {
        self.multibyte = true;
        self.vertical = vertical;
        self.latin_fallback = false;
        self
    }

    pub fn with_vertical_default(mut self, vy: f64, w1y: f64) -> Self {
        self.vertical_default = (vy, w1y);
        self
    }

    pub fn with_vertical_metrics(mut self, cid: u32, w1y: f64, vx: f64, vy: f64) -> Self {
        self.vertical_metrics.insert(cid, (w1y, vx, vy));
        self
    }

    /// Disable the single-byte Windows-1252 fallback.
    pub fn without_fallback(mut self) -> Self {
        self.latin_fallback = false;
        self
    }

    fn latin_text(cid: u32) -> Option<String> {
        let byte = u8::try_from(cid).ok()?;
        if byte < 0x20 || byte == 0x7f {
            return None;
        }
        let buf = [byte];
        let (text, _, had_errors) = encoding_rs::WINDOWS_1252.decode(&buf);
        (!had_errors).then(|| text.into_owned())
    }
}

impl PDFFont for SimpleFont {
    fn to_unichr(&self, cid: u32) -> Option<String> {
        if let Some(text) = self.unicode.get(cid) {
            return Some(text.to_string());
        }
        if self.latin_fallback {
            return Self::latin_text(cid);
        }
        None
    }

    fn char_width(&self, cid: u32) -> f64 {
        if self.vertical {
            let w1y = self
                .vertical_metrics
                .get(&cid)
                .map_or(self.vertical_default.1, |m| m.0);
            return w1y / 1000.0;
        }
        self.widths.get(&cid).copied().unwrap_or(self.default_width) / 1000.0
    }

    fn fontname(&self) -> Option<&str> {
        self.fontname.as_deref()
    }

    fn is_vertical(&self) -> bool {
        self.vertical
    }

    fn is_multibyte(&self) -> bool {
        self.multibyte
    }

    fn char_disp(&self, cid: u32) -> CharDisp {
        if self.vertical {
            match self.vertical_metrics.get(&cid) {
                Some(&(_, vx, vy)) => CharDisp::Vertical(Some(vx), vy),
                None => CharDisp::Vertical(None, self.vertical_default.0),
            }
        } else {
            CharDisp::Horizontal(self.char_width(cid))
        }
    }

    fn get_descent(&self) -> f64 {
        self.descent
    }
}
