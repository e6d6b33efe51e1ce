//! Layout node model.
//!
//! This module contains:
//! - Layout element types (LTPage, LTFigure, LTChar, LTLine, LTRect, ...)
//! - Layout analysis parameters (LAParams)
//! - The external analysis hook (PageAnalyzer)

pub mod analysis;
pub mod elements;
pub mod params;

pub use analysis::PageAnalyzer;
pub use elements::*;
pub use params::*;
