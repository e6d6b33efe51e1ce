//! contour - PDF page layout extraction and XML layout serialization.
//!
//! Content streams are interpreted page by page into a tree of layout
//! nodes (figures, lines, rectangles, curves, characters, images), which a
//! sink such as [`converter::XMLConverter`] serializes as it receives them.

pub mod api;
pub mod converter;
pub mod document;
pub mod error;
pub mod font;
pub mod image;
pub mod interp;
pub mod layout;
pub mod model;
pub mod utils;

// Re-export high_level for convenience
pub use api::high_level;

pub use api::{ConvertOptions, convert_pdf_bytes, convert_to_xml, extract_pages};
pub use converter::{PDFLayoutBuilder, PDFPageAggregator, PageBuffers, PageSink, XMLConverter};
pub use document::{DocumentSource, LopdfDocument, MemoryDocument, PageDescriptor};
pub use error::{PdfError, Result};
pub use interp::{PDFDevice, PDFPageInterpreter};
