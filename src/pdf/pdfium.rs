//! PDF text-run source backed by `pdfium-render` (Chromium's PDF library).
//!
//! # Pipeline
//!
//! ```text
//! PDF bytes → pdfium char extraction → line reconstruction → gap split → text runs
//! ```
//!
//! Characters are converted to a top-down coordinate system on the way in so
//! that the cell merger can treat "below" as "larger y".

use std::io::Cursor;

use image::ImageFormat;
use pdfium_render::prelude::*;
use tracing::debug;

use super::source::{PdfParseError, TextRunSource};
use super::types::{PdfChar, TextRun};

/// Resolution used by `preview` when none is given.
pub const DEFAULT_PREVIEW_DPI: f32 = 300.0;

/// Characters on the same line have tops within this fraction of the first
/// character's height.
const LINE_TOLERANCE: f32 = 0.4;

/// Gaps wider than this many average character widths separate runs.
const RUN_GAP: f32 = 2.0;

/// Gaps wider than this fraction of the average character width become a space.
const SPACE_GAP: f32 = 0.3;

/// Reads text runs through pdfium.
pub struct PdfiumSource;

impl PdfiumSource {
    pub fn new() -> Self {
        Self
    }

    fn load<'a>(pdfium: &'a Pdfium, bytes: &'a [u8]) -> Result<PdfDocument<'a>, PdfParseError> {
        pdfium
            .load_pdf_from_byte_slice(bytes, None)
            .map_err(map_load_error)
    }

    fn page<'a>(doc: &'a PdfDocument<'_>, page: usize) -> Result<PdfPage<'a>, PdfParseError> {
        let count = doc.pages().len() as usize;
        if page >= count {
            return Err(PdfParseError::PageNotFound { page, count });
        }
        let index = PdfPageIndex::try_from(page)
            .map_err(|_| PdfParseError::PageNotFound { page, count })?;
        doc.pages()
            .get(index)
            .map_err(|e| PdfParseError::Parsing(e.to_string()))
    }

    /// Extract every character of `page` with top-down bounds.
    #[allow(deprecated)] // PdfRect field access deprecated in 0.8.28
    fn extract_chars(page: &PdfPage) -> Result<Vec<PdfChar>, PdfParseError> {
        let page_height = page.height().value;
        let text = page
            .text()
            .map_err(|e| PdfParseError::Parsing(e.to_string()))?;

        let mut chars = Vec::new();
        for ch in text.chars().iter() {
            if let (Some(unicode_ch), Ok(rect)) = (ch.unicode_char(), ch.tight_bounds()) {
                chars.push(PdfChar {
                    ch: unicode_ch,
                    x: rect.left.value,
                    y: page_height - rect.top.value,
                    width: (rect.right.value - rect.left.value).abs(),
                    height: (rect.top.value - rect.bottom.value).abs(),
                });
            }
        }
        Ok(chars)
    }
}

impl Default for PdfiumSource {
    fn default() -> Self {
        Self::new()
    }
}

impl TextRunSource for PdfiumSource {
    fn page_count(&self, bytes: &[u8]) -> Result<usize, PdfParseError> {
        let pdfium = Pdfium::default();
        let doc = Self::load(&pdfium, bytes)?;
        Ok(doc.pages().len() as usize)
    }

    fn text_runs(&self, bytes: &[u8], page: usize) -> Result<Vec<TextRun>, PdfParseError> {
        let pdfium = Pdfium::default();
        let doc = Self::load(&pdfium, bytes)?;
        let pdf_page = Self::page(&doc, page)?;
        let chars = Self::extract_chars(&pdf_page)?;
        let runs = runs_from_chars(&chars);
        debug!("Page {page}: {} chars, {} runs", chars.len(), runs.len());
        Ok(runs)
    }
}

/// Render `page` at `dpi` into PNG bytes.
pub fn render_preview(bytes: &[u8], page: usize, dpi: f32) -> Result<Vec<u8>, PdfParseError> {
    let pdfium = Pdfium::default();
    let doc = PdfiumSource::load(&pdfium, bytes)?;
    let pdf_page = PdfiumSource::page(&doc, page)?;

    let scale = dpi / 72.0; // PDF points are 72 per inch
    let config = PdfRenderConfig::new()
        .set_target_width((pdf_page.width().value * scale) as i32)
        .set_maximum_height((pdf_page.height().value * scale) as i32);

    let bitmap = pdf_page
        .render_with_config(&config)
        .map_err(|e| PdfParseError::Parsing(format!("render failed: {e}")))?;

    let mut png = Vec::new();
    bitmap
        .as_image()
        .write_to(&mut Cursor::new(&mut png), ImageFormat::Png)
        .map_err(|e| PdfParseError::Parsing(format!("PNG encoding failed: {e}")))?;
    Ok(png)
}

fn map_load_error(err: PdfiumError) -> PdfParseError {
    match err {
        PdfiumError::PdfiumLibraryInternalError(PdfiumInternalError::PasswordError) => {
            PdfParseError::PasswordProtected
        }
        other => PdfParseError::InvalidPdf(other.to_string()),
    }
}

/// Group characters into runs ordered top-to-bottom, then left-to-right.
///
/// 1. Sort by top edge, then left edge.
/// 2. Group characters whose tops lie within the line tolerance.
/// 3. Split each line at horizontal gaps wider than [`RUN_GAP`] average widths.
pub(crate) fn runs_from_chars(chars: &[PdfChar]) -> Vec<TextRun> {
    let mut runs = Vec::new();
    for line in reconstruct_lines(chars) {
        for segment in split_line(&line) {
            if let Some(run) = build_run(segment) {
                runs.push(run);
            }
        }
    }
    runs
}

fn reconstruct_lines(chars: &[PdfChar]) -> Vec<Vec<PdfChar>> {
    let Some(first) = chars.first() else {
        return Vec::new();
    };
    let line_tolerance = first.height * LINE_TOLERANCE;

    let mut sorted = chars.to_vec();
    sorted.sort_by(|a, b| a.y.total_cmp(&b.y).then(a.x.total_cmp(&b.x)));

    let mut lines: Vec<Vec<PdfChar>> = Vec::new();
    let mut current: Vec<PdfChar> = Vec::new();
    for ch in sorted {
        let same_line = current
            .first()
            .is_some_and(|anchor| (ch.y - anchor.y).abs() < line_tolerance);
        if !same_line && !current.is_empty() {
            lines.push(std::mem::take(&mut current));
        }
        current.push(ch);
    }
    if !current.is_empty() {
        lines.push(current);
    }

    for line in &mut lines {
        line.sort_by(|a, b| a.x.total_cmp(&b.x));
    }
    lines
}

fn average_width(chars: &[PdfChar]) -> f32 {
    if chars.is_empty() {
        return 0.0;
    }
    chars.iter().map(|c| c.width).sum::<f32>() / chars.len() as f32
}

fn split_line(line: &[PdfChar]) -> Vec<&[PdfChar]> {
    let run_gap = average_width(line) * RUN_GAP;
    let mut segments = Vec::new();
    let mut begin = 0;
    for i in 1..line.len() {
        let gap = line[i].x - (line[i - 1].x + line[i - 1].width);
        if gap > run_gap {
            segments.push(&line[begin..i]);
            begin = i;
        }
    }
    if begin < line.len() {
        segments.push(&line[begin..]);
    }
    segments
}

fn build_run(chars: &[PdfChar]) -> Option<TextRun> {
    let space_gap = average_width(chars) * SPACE_GAP;
    let mut text = String::new();
    for (i, ch) in chars.iter().enumerate() {
        if i > 0 {
            let gap = ch.x - (chars[i - 1].x + chars[i - 1].width);
            if gap > space_gap && !text.ends_with(' ') && !ch.ch.is_whitespace() {
                text.push(' ');
            }
        }
        text.push(ch.ch);
    }

    let text = text.trim().to_string();
    if text.is_empty() {
        return None;
    }

    let x = chars.iter().map(|c| c.x).fold(f32::INFINITY, f32::min);
    let right = chars
        .iter()
        .map(|c| c.x + c.width)
        .fold(f32::NEG_INFINITY, f32::max);
    let y = chars.iter().map(|c| c.y).fold(f32::INFINITY, f32::min);
    let height = chars.iter().map(|c| c.height).fold(0.0, f32::max);

    Some(TextRun::new(text, x, y, right - x, height))
}
