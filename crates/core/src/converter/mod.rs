//! Layout tree construction and markup output.
//!
//! - PDFLayoutBuilder: device that builds one layout tree per page
//! - PageSink: receiver of finished pages
//! - PDFPageAggregator: sink that collects pages for later retrieval
//! - XMLConverter: sink that writes XML with per-page buffers

mod base;
mod xml;

pub use base::{PDFLayoutBuilder, PDFPageAggregator, PageSink};
pub use xml::{PageBuffers, PageSummary, XMLConverter};
