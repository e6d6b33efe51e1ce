//! Font capability used during text rendering.
//!
//! - `pdffont` - the `PDFFont` trait and character displacement
//! - `simple` - width-table font with Unicode mapping
//! - `tounicode` - ToUnicode CMap parsing

pub mod pdffont;
pub mod simple;
pub mod tounicode;

pub use pdffont::{CharDisp, PDFFont};

/// Largest character code a font decodes (two-byte codes). Range entries
/// in width arrays and CMaps are clamped to it.
pub const MAX_CID: u32 = 0xFFFF;
pub use simple::SimpleFont;
pub use tounicode::ToUnicodeMap;
