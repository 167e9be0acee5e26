//! Geometric types shared by the text-run sources, the cell merger and the
//! time-grid calibrator.
//!
//! All coordinates are PDF points in a top-down system: `y` grows towards the
//! bottom of the page, so a line below another has a larger `y`.

use serde::{Deserialize, Serialize};

/// A positioned character extracted from a PDF page.
#[derive(Debug, Clone)]
pub struct PdfChar {
    pub ch: char,
    /// Left edge.
    pub x: f32,
    /// Top edge.
    pub y: f32,
    pub width: f32,
    /// Font size approximation (character height).
    pub height: f32,
}

/// A run of text on one line, as produced by a text-run source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextRun {
    pub text: String,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl TextRun {
    pub fn new(text: impl Into<String>, x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            text: text.into(),
            x,
            y,
            width,
            height,
        }
    }
}

/// One logical table cell: one or more runs stacked in a column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CellBound {
    pub text: String,
    pub x: f32,
    pub y: f32,
    pub h: f32,
    pub w: f32,
    /// Height of the first line of the cell.
    pub max_font_height: f32,
}

impl CellBound {
    /// Horizontal midpoint.
    pub fn middle_x(&self) -> f32 {
        self.x + self.w / 2.0
    }
}

impl From<&TextRun> for CellBound {
    fn from(run: &TextRun) -> Self {
        Self {
            text: run.text.clone(),
            x: run.x,
            y: run.y,
            h: run.height,
            w: run.width,
            max_font_height: run.height,
        }
    }
}

/// Horizontal extent of one daily slot column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeCellBound {
    pub start_x: f32,
    pub end_x: f32,
    pub start_time: String,
    pub end_time: String,
}
