use std::path::Path;

use anyhow::{Context, Result};

use schedule_parser::pdf::{read_document, render_preview};

pub fn cmd_preview(input: &Path, output: &Path, page: usize, dpi: f32) -> Result<()> {
    let bytes = read_document(input)?;
    let png = render_preview(&bytes, page, dpi)
        .with_context(|| format!("failed to render page {page} of {}", input.display()))?;
    std::fs::write(output, &png).with_context(|| format!("failed to write {}", output.display()))?;
    println!("💾 Saved {} bytes to {}", png.len(), output.display());
    Ok(())
}
