//! Per-cell extraction: split a cell into entries, attach slot times, parse.

use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;
use tracing::debug;

use super::date::DateResolver;
use super::grammar::parse_entry;
use super::ParseResult;
use crate::model::{PairModel, Time};
use crate::pdf::{CellBound, TimeGrid};

/// Shortest run of characters terminated by `]`.
static ENTRY_SPLIT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r".*?\]").expect("valid entry split regex"));

/// Extracts pairs from cells for one reference year.
#[derive(Debug, Clone)]
pub struct PairExtractor {
    dates: DateResolver,
}

impl PairExtractor {
    /// Extractor for `year`, resolving dates against the local current date.
    pub fn new(year: i32) -> Self {
        Self {
            dates: DateResolver::new(year, chrono::Local::now().date_naive()),
        }
    }

    /// Resolve dates against `today` instead of the clock.
    pub fn with_today(self, today: NaiveDate) -> Self {
        Self {
            dates: DateResolver::new(self.dates.year(), today),
        }
    }

    pub fn year(&self) -> i32 {
        self.dates.year()
    }

    pub fn today(&self) -> NaiveDate {
        self.dates.today()
    }

    /// All results of one cell, in text order.
    ///
    /// A cell without any `]` yields one [`ParseResult::Missing`] unless it
    /// is empty. A cell whose span maps to no valid slot range fails every
    /// entry with `Invalid time`.
    pub fn extract_all(&self, cell: &CellBound, grid: &TimeGrid) -> Vec<ParseResult> {
        let entries: Vec<&str> = ENTRY_SPLIT
            .find_iter(&cell.text)
            .map(|m| m.as_str().trim())
            .collect();

        if entries.is_empty() {
            if cell.text.is_empty() {
                return Vec::new();
            }
            return vec![ParseResult::Missing {
                context: cell.text.clone(),
            }];
        }

        let time = match cell_time(cell, grid) {
            Ok(time) => time,
            Err(message) => {
                debug!("Cell at x={:.1}: {message}", cell.x);
                return entries
                    .into_iter()
                    .map(|entry| ParseResult::Error {
                        message: message.clone(),
                        context: entry.to_string(),
                    })
                    .collect();
            }
        };

        entries
            .into_iter()
            .map(|entry| self.extract_entry(entry, time))
            .collect()
    }

    fn extract_entry(&self, entry: &str, time: Time) -> ParseResult {
        match parse_entry(entry, &self.dates) {
            Ok(fields) => ParseResult::Success(PairModel {
                title: fields.title,
                lecturer: fields.lecturer,
                classroom: fields.classroom,
                pair_type: fields.pair_type,
                subgroup: fields.subgroup,
                time,
                date: fields.date,
            }),
            Err(err) => {
                debug!("Entry '{entry}' rejected: {err}");
                ParseResult::Error {
                    message: err.to_string(),
                    context: entry.to_string(),
                }
            }
        }
    }
}

/// Slot span covered by the cell's horizontal extent.
fn cell_time(cell: &CellBound, grid: &TimeGrid) -> Result<Time, String> {
    let (start, end) = grid
        .detect_time(cell.x, cell.x + cell.w)
        .ok_or_else(|| "Invalid time: no time slots".to_string())?;
    Time::new(start, end).map_err(|e| e.to_string())
}
