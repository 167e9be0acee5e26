//! `schedule-parser` - timetable PDF extraction
//!
//! Turns a university timetable page (a grid of weekdays and time slots
//! filled with free-form Russian class descriptions) into typed class
//! entries.
//!
//! # Pipeline
//!
//! ```text
//! TextRunSource → merge_cells → calibrate → extract → ParseResult*
//! ```
//!
//! - **Cell merging**: wrapped lines are glued back into table cells
//! - **Grid calibration**: slot columns are located from the `8:30`/`10:20` labels
//! - **Extraction**: each cell is split into entries and parsed field by field
//! - **Date resolution**: `dd.mm` tokens get a year from proximity to today
//!
//! # Example
//!
//! ```rust
//! use chrono::NaiveDate;
//! use schedule_parser::{calibrate, extract, merge_cells, PairExtractor, TextRun};
//!
//! let runs = vec![
//!     TextRun::new("8:30-10:10", 100.0, 20.0, 40.0, 8.0),
//!     TextRun::new("10:20-12:00", 200.0, 20.0, 40.0, 8.0),
//!     TextRun::new("Физика. Петров П.П. Семинар. 205.[02.09]", 72.0, 50.0, 96.0, 10.0),
//! ];
//! let cells = merge_cells(&runs, 1.0);
//! let grid = calibrate(&cells)?;
//! let extractor = PairExtractor::new(2024).with_today(NaiveDate::from_ymd_opt(2024, 9, 1).unwrap());
//!
//! let results = extract(&cells, &grid, &extractor);
//! assert_eq!(results.iter().filter(|r| r.is_success()).count(), 1);
//! # Ok::<(), schedule_parser::GridError>(())
//! ```

pub mod config;
pub mod extract;
pub mod model;
pub mod pdf;
pub mod schedule;

pub use config::{load_settings, ParserSettings};
pub use extract::{
    extract, parse_page, EntryError, PageError, PageParse, PairExtractor, ParseReport, ParseResult,
};
pub use model::{DateError, DateItem, DateModel, Frequency, PairModel, PairType, Subgroup, Time, TimeError};
pub use pdf::{
    calibrate, merge_cells, read_document, CellBound, GridError, JsonRunSource, PdfParseError, TextRun,
    TextRunSource, TimeCellBound, TimeGrid,
};
#[cfg(feature = "pdf")]
pub use pdf::{render_preview, PdfiumSource};
pub use schedule::{Schedule, ScheduleError};

/// Version of schedule-parser
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
