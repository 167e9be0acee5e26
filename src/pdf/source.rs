//! Text-run sources: the boundary between PDF decoding and the parser.

use std::path::Path;

use thiserror::Error;

use super::types::TextRun;

/// Page-level failures while opening or decoding a document.
#[derive(Error, Debug)]
pub enum PdfParseError {
    #[error("Failed to open file: {0}")]
    FileNotFound(String),

    #[error("File is not a valid PDF document or is corrupted: {0}")]
    InvalidPdf(String),

    #[error("PDF file is password protected")]
    PasswordProtected,

    #[error("Page {page} not found (document has {count} pages)")]
    PageNotFound { page: usize, count: usize },

    #[error("Error reading PDF file: {0}")]
    Parsing(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Produces the positioned text runs of one page in reading order
/// (top-to-bottom, then left-to-right).
///
/// Implementations are stateless and synchronous; callers that need
/// concurrency run one page per task.
pub trait TextRunSource {
    /// Number of pages in the document.
    fn page_count(&self, bytes: &[u8]) -> Result<usize, PdfParseError>;

    /// Runs of page `page` (0-based).
    fn text_runs(&self, bytes: &[u8], page: usize) -> Result<Vec<TextRun>, PdfParseError>;
}

/// Reads runs that were previously dumped as JSON.
///
/// The document is either a list of runs (one page) or a list of such lists
/// (one entry per page).
pub struct JsonRunSource;

impl JsonRunSource {
    fn pages(bytes: &[u8]) -> Result<Vec<Vec<TextRun>>, PdfParseError> {
        #[derive(serde::Deserialize)]
        #[serde(untagged)]
        enum Document {
            Pages(Vec<Vec<TextRun>>),
            Page(Vec<TextRun>),
        }

        let document: Document = serde_json::from_slice(bytes)
            .map_err(|e| PdfParseError::InvalidPdf(format!("invalid text-run JSON: {e}")))?;
        Ok(match document {
            Document::Pages(pages) => pages,
            Document::Page(page) => vec![page],
        })
    }
}

impl TextRunSource for JsonRunSource {
    fn page_count(&self, bytes: &[u8]) -> Result<usize, PdfParseError> {
        Ok(Self::pages(bytes)?.len())
    }

    fn text_runs(&self, bytes: &[u8], page: usize) -> Result<Vec<TextRun>, PdfParseError> {
        let mut pages = Self::pages(bytes)?;
        let count = pages.len();
        if page >= count {
            return Err(PdfParseError::PageNotFound { page, count });
        }
        Ok(pages.swap_remove(page))
    }
}

/// Read a whole input file, mapping a missing file to
/// [`PdfParseError::FileNotFound`].
pub fn read_document(path: &Path) -> Result<Vec<u8>, PdfParseError> {
    if !path.exists() {
        return Err(PdfParseError::FileNotFound(path.display().to_string()));
    }
    Ok(std::fs::read(path)?)
}
