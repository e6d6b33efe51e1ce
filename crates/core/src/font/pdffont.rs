//! Font capability consumed by the text operators and the layout builder.

use std::fmt;

/// Character displacement returned by [`PDFFont::char_disp`].
///
/// For horizontal fonts: the advance width.
/// For vertical fonts: (vx, vy) where vx can be None (use fontsize * 0.5).
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CharDisp {
    Horizontal(f64),
    Vertical(Option<f64>, f64),
}

/// A resolved font: decodes string bytes into character ids and answers
/// metric and Unicode questions about each id.
pub trait PDFFont: fmt::Debug + Send + Sync {
    /// Convert a CID to Unicode text. `None` means the mapping is undefined.
    fn to_unichr(&self, cid: u32) -> Option<String>;

    /// Advance width of a character in text space units (glyph width / 1000).
    fn char_width(&self, cid: u32) -> f64;

    /// Font name (BaseFont) if available.
    fn fontname(&self) -> Option<&str> {
        None
    }

    fn is_vertical(&self) -> bool {
        false
    }

    /// Multibyte fonts decode two bytes per character and never apply word spacing.
    fn is_multibyte(&self) -> bool {
        false
    }

    /// Split a string operand into character ids.
    fn decode(&self, data: &[u8]) -> Vec<u32> {
        if self.is_multibyte() {
            data.chunks(2)
                .map(|pair| match *pair {
                    [hi, lo] => (u32::from(hi) << 8) | u32::from(lo),
                    [b] => u32::from(b),
                    _ => 0,
                })
                .collect()
        } else {
            data.iter().map(|&b| u32::from(b)).collect()
        }
    }

    fn char_disp(&self, cid: u32) -> CharDisp {
        CharDisp::Horizontal(self.char_width(cid))
    }

    /// Font descent as a fraction of the font size (negative, below baseline).
    fn get_descent(&self) -> f64 {
        -0.25
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Fixed {
        multibyte: bool,
    }

    impl PDFFont for Fixed {
        fn to_unichr(&self, _cid: u32) -> Option<String> {
            None
        }
        fn char_width(&self, _cid: u32) -> f64 {
            0.5
        }
        fn is_multibyte(&self) -> bool {
            self.multibyte
        }
    }

    #[test]
    fn default_decode_single_byte() {
        let font = Fixed { multibyte: false };
        assert_eq!(font.decode(b"AB"), vec![65, 66]);
        assert_eq!(font.char_disp(65), CharDisp::Horizontal(0.5));
    }

    #[test]
    fn default_decode_two_byte() {
        let font = Fixed { multibyte: true };
        assert_eq!(font.decode(&[0x00, 0x41, 0x27, 0x0f, 0x07]), vec![0x41, 9999, 7]);
    }
}
