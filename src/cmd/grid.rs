use std::path::Path;

use anyhow::{Context, Result};

use schedule_parser::{calibrate, ParserSettings};

use super::input::load_cells;
use super::output::{print_grid, print_json};
use crate::OutputFormat;

pub fn cmd_grid(input: &Path, settings: &ParserSettings, page: usize, format: OutputFormat) -> Result<()> {
    let cells = load_cells(input, settings, page)?;
    let grid = calibrate(&cells)
        .with_context(|| format!("page {page} of {} is not a timetable", input.display()))?;
    match format {
        OutputFormat::Json => print_json(&grid),
        OutputFormat::Text => {
            print_grid(&grid);
            Ok(())
        }
    }
}
