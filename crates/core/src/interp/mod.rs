//! PDF content stream interpretation and device output.
//!
//! This module contains:
//! - `operator`: decoded operations and operands
//! - `interpreter`: the page interpreter
//! - `device`: the device trait driven by the interpreter
//! - `ops`: operator implementations by category

pub mod device;
pub mod interpreter;
pub mod operator;
pub mod ops;

pub use device::{PDFDevice, PDFTextSeq, PDFTextSeqItem, PathSegment, TextRun, shape_signature};
pub use interpreter::PDFPageInterpreter;
pub use operator::{Operand, Operation};
