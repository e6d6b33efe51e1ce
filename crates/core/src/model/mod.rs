//! Interpreter state model.
//!
//! - `state` - Graphics and text state (PDFGraphicState, PDFTextState, Color)
//! - `color` - Colour space definitions (PDFColorSpace)
//! - `stream` - Image stream attributes and data (ImageStream)

pub mod color;
pub mod state;
pub mod stream;

pub use color::PDFColorSpace;
pub use state::{Color, PDFGraphicState, PDFTextState};
pub use stream::ImageStream;
