//! Pair extraction: from merged cells to typed results.
//!
//! Entry-level failures are data ([`ParseResult::Error`] and
//! [`ParseResult::Missing`]); only page-level failures ([`PageError`])
//! abort a page.

pub mod date;
pub mod grammar;
pub mod pair;

use chrono::NaiveDate;
use serde::Serialize;
use thiserror::Error;
use tracing::{info, warn};

use crate::config::ParserSettings;
use crate::model::PairModel;
use crate::pdf::{calibrate, merge_cells, CellBound, GridError, PdfParseError, TextRunSource, TimeGrid};

pub use date::DateResolver;
pub use grammar::{parse_entry, EntryError, EntryFields};
pub use pair::PairExtractor;

/// Outcome of one raw entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum ParseResult {
    Success(PairModel),
    /// The cell held text but no entry delimiter.
    Missing { context: String },
    /// The entry was recognized but did not parse.
    Error { message: String, context: String },
}

impl ParseResult {
    pub fn is_success(&self) -> bool {
        matches!(self, ParseResult::Success(_))
    }

    /// Source text the result was produced from, if it failed.
    pub fn context(&self) -> Option<&str> {
        match self {
            ParseResult::Success(_) => None,
            ParseResult::Missing { context } | ParseResult::Error { context, .. } => Some(context),
        }
    }
}

/// Failures that abort a whole page.
#[derive(Error, Debug)]
pub enum PageError {
    #[error(transparent)]
    Pdf(#[from] PdfParseError),

    #[error(transparent)]
    Grid(#[from] GridError),
}

/// Run the extractor over every cell of a page and flatten the results.
pub fn extract(cells: &[CellBound], grid: &TimeGrid, extractor: &PairExtractor) -> Vec<ParseResult> {
    cells
        .iter()
        .flat_map(|cell| extractor.extract_all(cell, grid))
        .collect()
}

/// A failed entry and the text it came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntryFailure {
    pub message: String,
    pub context: String,
}

/// Results of a page partitioned by outcome.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ParseReport {
    pub pairs: Vec<PairModel>,
    pub missing: Vec<String>,
    pub errors: Vec<EntryFailure>,
}

impl ParseReport {
    pub fn from_results(results: impl IntoIterator<Item = ParseResult>) -> Self {
        let mut report = Self::default();
        for result in results {
            match result {
                ParseResult::Success(pair) => report.pairs.push(pair),
                ParseResult::Missing { context } => report.missing.push(context),
                ParseResult::Error { message, context } => {
                    report.errors.push(EntryFailure { message, context });
                }
            }
        }
        report
    }

    pub fn success_count(&self) -> usize {
        self.pairs.len()
    }

    pub fn missing_count(&self) -> usize {
        self.missing.len()
    }

    pub fn error_count(&self) -> usize {
        self.errors.len()
    }

    pub fn total(&self) -> usize {
        self.success_count() + self.missing_count() + self.error_count()
    }
}

/// Everything produced while parsing one page.
#[derive(Debug, Clone)]
pub struct PageParse {
    pub cells: Vec<CellBound>,
    pub grid: TimeGrid,
    pub results: Vec<ParseResult>,
}

/// Read, merge, calibrate and extract one page.
///
/// `today` overrides the clock used to disambiguate years.
pub fn parse_page(
    source: &dyn TextRunSource,
    bytes: &[u8],
    page: usize,
    settings: &ParserSettings,
    today: Option<NaiveDate>,
) -> Result<PageParse, PageError> {
    let runs = source.text_runs(bytes, page)?;
    let cells = merge_cells(&runs, settings.multiline_threshold);

    let grid = calibrate(&cells).inspect_err(|e| warn!("Page {page}: {e}"))?;

    let mut extractor = PairExtractor::new(settings.schedule_year);
    if let Some(today) = today {
        extractor = extractor.with_today(today);
    }

    let results = extract(&cells, &grid, &extractor);
    let successes = results.iter().filter(|r| r.is_success()).count();
    info!(
        "Page {page}: {} runs, {} cells, {} entries ({} parsed)",
        runs.len(),
        cells.len(),
        results.len(),
        successes
    );

    Ok(PageParse { cells, grid, results })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pdf::{JsonRunSource, TextRun};

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 9, 1).unwrap()
    }

    fn settings() -> ParserSettings {
        ParserSettings {
            schedule_year: 2024,
            multiline_threshold: 1.0,
        }
    }

    fn page_json(runs: &[TextRun]) -> Vec<u8> {
        serde_json::to_vec(runs).unwrap()
    }

    fn timetable() -> Vec<TextRun> {
        vec![
            TextRun::new("8:30-10:10", 100.0, 20.0, 40.0, 8.0),
            TextRun::new("10:20-12:00", 200.0, 20.0, 40.0, 8.0),
            TextRun::new("Физика. Петров П.П.", 72.0, 50.0, 90.0, 10.0),
            TextRun::new("Семинар. 205.[02.09]", 72.0, 61.0, 96.0, 10.0),
            TextRun::new("Пн", 10.0, 50.0, 20.0, 10.0),
        ]
    }

    #[test]
    fn parse_page_end_to_end() {
        let bytes = page_json(&timetable());
        let parsed = parse_page(&JsonRunSource, &bytes, 0, &settings(), Some(today())).unwrap();

        assert_eq!(parsed.grid.slots().len(), 8);
        let report = ParseReport::from_results(parsed.results);
        assert_eq!(report.success_count(), 1);
        // Header labels and the weekday column carry no entries.
        assert_eq!(report.missing, vec!["8:30-10:10", "10:20-12:00", "Пн"]);
        assert_eq!(report.error_count(), 0);

        let pair = &report.pairs[0];
        assert_eq!(pair.title, "Физика");
        assert_eq!(pair.time.to_string(), "8:30-10:10");
    }

    #[test]
    fn missing_grid_aborts_page() {
        let runs = vec![TextRun::new("Физика. Семинар. 205. [02.09]", 72.0, 50.0, 96.0, 10.0)];
        let bytes = page_json(&runs);
        let err = parse_page(&JsonRunSource, &bytes, 0, &settings(), Some(today())).unwrap_err();
        assert!(matches!(err, PageError::Grid(GridError::AnchorNotFound("8:30"))));
    }

    #[test]
    fn decode_failure_aborts_page() {
        let err = parse_page(&JsonRunSource, b"not json", 0, &settings(), None).unwrap_err();
        assert!(matches!(err, PageError::Pdf(PdfParseError::InvalidPdf(_))));
    }

    #[test]
    fn report_partitions_and_counts() {
        let report = ParseReport::from_results(vec![
            ParseResult::Missing {
                context: "x".into(),
            },
            ParseResult::Error {
                message: "m".into(),
                context: "c".into(),
            },
        ]);
        assert_eq!(report.total(), 2);
        assert_eq!(report.missing_count(), 1);
        assert_eq!(
            report.errors,
            vec![EntryFailure {
                message: "m".into(),
                context: "c".into()
            }]
        );
    }

    #[test]
    fn result_context() {
        let missing = ParseResult::Missing {
            context: "Пн".into(),
        };
        assert_eq!(missing.context(), Some("Пн"));
        assert!(!missing.is_success());
    }

    #[test]
    fn results_serialize_with_status_tag() {
        let json = serde_json::to_value(ParseResult::Error {
            message: "Unknown type: 'Тренинг.'".into(),
            context: "Физика. Тренинг. 205. [02.09]".into(),
        })
        .unwrap();
        assert_eq!(json["status"], "error");
        assert_eq!(json["message"], "Unknown type: 'Тренинг.'");
    }
}
