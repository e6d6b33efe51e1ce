//! High-level API module for PDF layout conversion.
//!
//! # Example
//!
//! ```ignore
//! use contour_core::api::{convert_pdf_bytes, ConvertOptions};
//!
//! let pdf_bytes = std::fs::read("document.pdf")?;
//! let xml = convert_pdf_bytes(&pdf_bytes, Vec::new(), &ConvertOptions::default())?;
//! ```

pub mod high_level;

pub use high_level::{
    ConvertOptions, convert_pdf_bytes, convert_to_xml, convert_to_xml_with, extract_pages,
    extract_pages_analyzed,
};
