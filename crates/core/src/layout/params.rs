//! Tuning knobs for text grouping.

use serde::{Deserialize, Serialize};

use crate::error::{PdfError, Result};

/// Thresholds a [`PageAnalyzer`](super::PageAnalyzer) uses to group
/// characters into lines and boxes. Margins are relative to the size of the
/// glyphs or lines being compared.
///
/// The layout builder does not read these; they only reach an analyzer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LAParams {
    /// Minimum vertical overlap, as a fraction of the shorter glyph, for two
    /// glyphs to share a line.
    pub line_overlap: f64,
    /// Largest horizontal gap between glyphs of one line, in glyph widths.
    pub char_margin: f64,
    /// Largest gap between lines of one box, in line heights.
    pub line_margin: f64,
    /// Gap, in glyph widths, above which a space is inserted.
    pub word_margin: f64,
    /// Reading-order weight between -1 (horizontal only) and 1 (vertical
    /// only). `None` turns box grouping off.
    pub boxes_flow: Option<f64>,
    pub detect_vertical: bool,
    /// Also group text found inside figures.
    pub all_texts: bool,
}

impl Default for LAParams {
    fn default() -> Self {
        Self {
            line_overlap: 0.5,
            char_margin: 2.0,
            line_margin: 0.5,
            word_margin: 0.1,
            boxes_flow: Some(0.5),
            detect_vertical: false,
            all_texts: false,
        }
    }
}

impl LAParams {
    pub fn with_boxes_flow(mut self, boxes_flow: Option<f64>) -> Self {
        self.boxes_flow = boxes_flow;
        self
    }

    pub fn with_all_texts(mut self, all_texts: bool) -> Self {
        self.all_texts = all_texts;
        self
    }

    /// Rejects a `boxes_flow` outside [-1, 1] and negative margins.
    pub fn validate(&self) -> Result<()> {
        if let Some(flow) = self.boxes_flow
            && !(-1.0..=1.0).contains(&flow)
        {
            return Err(PdfError::InvalidParams(format!(
                "boxes_flow must lie in [-1, 1], got {flow}"
            )));
        }
        let margins = [
            ("line_overlap", self.line_overlap),
            ("char_margin", self.char_margin),
            ("line_margin", self.line_margin),
            ("word_margin", self.word_margin),
        ];
        match margins.iter().find(|(_, value)| *value < 0.0) {
            Some((field, value)) => Err(PdfError::InvalidParams(format!(
                "{field} must not be negative, got {value}"
            ))),
            None => Ok(()),
        }
    }
}
