use std::path::Path;

use anyhow::Result;

use schedule_parser::ParserSettings;

use super::input::load_cells;
use super::output::{print_cells, print_json};
use crate::OutputFormat;

pub fn cmd_cells(input: &Path, settings: &ParserSettings, page: usize, format: OutputFormat) -> Result<()> {
    let cells = load_cells(input, settings, page)?;
    match format {
        OutputFormat::Json => print_json(&cells),
        OutputFormat::Text => {
            print_cells(&cells);
            Ok(())
        }
    }
}
