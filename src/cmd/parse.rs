use std::path::Path;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::Serialize;

use schedule_parser::{parse_page, ParseReport, ParseResult, ParserSettings, Schedule};

use super::input::open_input;
use super::output::{print_json, print_report, print_schedule};
use crate::OutputFormat;

#[derive(Serialize)]
struct ScheduleOutput<'a> {
    results: &'a [ParseResult],
    schedule: &'a Schedule,
    rejected: Vec<String>,
}

pub fn cmd_parse(
    input: &Path,
    settings: &ParserSettings,
    page: usize,
    today: Option<NaiveDate>,
    format: OutputFormat,
    build_schedule: bool,
) -> Result<()> {
    let (source, bytes) = open_input(input)?;
    let parsed = parse_page(source.as_ref(), &bytes, page, settings, today)
        .with_context(|| format!("failed to parse page {page} of {}", input.display()))?;

    let assembled = build_schedule.then(|| Schedule::from_results(&parsed.results));

    if format == OutputFormat::Json {
        return match &assembled {
            Some((schedule, rejected)) => print_json(&ScheduleOutput {
                results: &parsed.results,
                schedule,
                rejected: rejected.iter().map(ToString::to_string).collect(),
            }),
            None => print_json(&parsed.results),
        };
    }

    println!(
        "📄 {} (page {page}, year {})\n",
        input.display(),
        settings.schedule_year
    );
    print_report(&ParseReport::from_results(parsed.results));
    if let Some((schedule, rejected)) = &assembled {
        print_schedule(schedule, rejected);
    }
    Ok(())
}
