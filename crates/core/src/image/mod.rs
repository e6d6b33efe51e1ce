//! Image export.
//!
//! This module provides the exporter interface used by the XML converter and
//! a directory-backed writer.

pub mod writer;

pub use writer::{ImageExporter, ImageWriter};
