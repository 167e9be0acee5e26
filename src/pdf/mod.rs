//! Page geometry: from positioned text runs to cells and a calibrated time grid.
//!
//! # Pipeline
//!
//! ```text
//! TextRunSource → merge_cells → calibrate → (cells, TimeGrid)
//! ```
//!
//! The PDF decoder sits behind [`TextRunSource`], so the rest of the crate
//! runs without pdfium. Enable the `pdf` feature for [`PdfiumSource`].

pub mod grid;
pub mod merge;
#[cfg(feature = "pdf")]
pub mod pdfium;
pub mod source;
pub mod types;

pub use grid::{calibrate, GridError, TimeGrid};
pub use merge::merge_cells;
#[cfg(feature = "pdf")]
pub use pdfium::{render_preview, PdfiumSource, DEFAULT_PREVIEW_DPI};
pub use source::{read_document, JsonRunSource, PdfParseError, TextRunSource};
pub use types::{CellBound, PdfChar, TextRun, TimeCellBound};
