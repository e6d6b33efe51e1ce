//! Error types for contour layout extraction.

use thiserror::Error;

/// Primary error type for layout extraction and serialization.
#[derive(Error, Debug)]
pub enum PdfError {
    /// `end_page` was called while figures were still open.
    #[error("unbalanced figure stack at end of page: {depth} figure(s) still open")]
    UnbalancedFigures { depth: usize },

    /// An operation required a different kind of open container.
    #[error("{op} requires an open {expected}, but the current container is {found}")]
    ContainerMismatch {
        op: &'static str,
        expected: &'static str,
        found: &'static str,
    },

    /// A drawing callback arrived before `begin_page`.
    #[error("{0} called with no open page")]
    NoPage(&'static str),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("PDF parse error: {0}")]
    Parse(String),

    #[error("PDF object not found: {0} {1} R")]
    ObjectNotFound(u32, u16),

    #[error("page index {index} out of range (document has {count} pages)")]
    PageOutOfRange { index: usize, count: usize },

    #[error("encrypted documents are not supported")]
    Encrypted,

    #[error("unknown output encoding: {0}")]
    UnknownEncoding(String),

    #[error("image export failed: {0}")]
    ImageExport(String),

    #[error("invalid layout parameters: {0}")]
    InvalidParams(String),
}

impl PdfError {
    /// Returns true for errors that indicate a broken device call sequence
    /// rather than bad input. These stop processing of the current document.
    pub const fn is_contract_violation(&self) -> bool {
        matches!(
            self,
            Self::UnbalancedFigures { .. } | Self::ContainerMismatch { .. } | Self::NoPage(_)
        )
    }
}

impl From<lopdf::Error> for PdfError {
    fn from(err: lopdf::Error) -> Self {
        Self::Parse(err.to_string())
    }
}

/// Convenience Result type alias for PdfError.
pub type Result<T> = std::result::Result<T, PdfError>;
