use std::path::Path;

use anyhow::{bail, Context, Result};

use schedule_parser::pdf::{merge_cells, read_document, CellBound, JsonRunSource, TextRunSource};
use schedule_parser::ParserSettings;

/// Pick a text-run source by file extension and read the document.
pub fn open_input(path: &Path) -> Result<(Box<dyn TextRunSource>, Vec<u8>)> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    let source: Box<dyn TextRunSource> = match extension.as_str() {
        "json" => Box::new(JsonRunSource),
        "pdf" => pdf_source()?,
        _ => bail!(
            "Unsupported input '{}': expected a .pdf or .json file",
            path.display()
        ),
    };

    let bytes = read_document(path)?;
    Ok((source, bytes))
}

#[cfg(feature = "pdf")]
fn pdf_source() -> Result<Box<dyn TextRunSource>> {
    Ok(Box::new(schedule_parser::pdf::PdfiumSource::new()))
}

#[cfg(not(feature = "pdf"))]
fn pdf_source() -> Result<Box<dyn TextRunSource>> {
    bail!("PDF input requires the `pdf` feature; pass a .json dump of text runs instead")
}

/// Read and merge the cells of one page.
pub fn load_cells(path: &Path, settings: &ParserSettings, page: usize) -> Result<Vec<CellBound>> {
    let (source, bytes) = open_input(path)?;
    let runs = source
        .text_runs(&bytes, page)
        .with_context(|| format!("failed to read page {page} of {}", path.display()))?;
    Ok(merge_cells(&runs, settings.multiline_threshold))
}
