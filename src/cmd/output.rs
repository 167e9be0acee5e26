use anyhow::Result;
use serde::Serialize;

use schedule_parser::pdf::{CellBound, TimeGrid};
use schedule_parser::{PairModel, ParseReport, Schedule, ScheduleError};

/// Print any serializable value as pretty JSON on stdout.
pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub fn print_report(report: &ParseReport) {
    println!(
        "✅ {} parsed   ⚪ {} without entries   ❌ {} errors",
        report.success_count(),
        report.missing_count(),
        report.error_count()
    );

    if !report.pairs.is_empty() {
        println!("\n📚 Pairs:");
        for pair in &report.pairs {
            println!("   {}", format_pair(pair));
        }
    }

    if !report.errors.is_empty() {
        println!("\n❌ Errors:");
        for failure in &report.errors {
            println!("   {}", failure.message);
            println!("      in: {}", failure.context);
        }
    }

    if !report.missing.is_empty() {
        println!("\n⚪ Without entries:");
        for context in &report.missing {
            println!("   {}", truncate_text(context, 60));
        }
    }
}

pub fn print_schedule(schedule: &Schedule, rejected: &[ScheduleError]) {
    println!("\n🗓️  Schedule: {} pairs", schedule.len());
    if let (Some(start), Some(end)) = (schedule.start_date(), schedule.end_date()) {
        println!("   From {start} to {end}");
    }
    let disciplines = schedule.disciplines();
    if !disciplines.is_empty() {
        println!("   Disciplines: {}", disciplines.join(", "));
    }
    if !rejected.is_empty() {
        println!("\n⚠️  Rejected {} conflicting pairs:", rejected.len());
        for err in rejected {
            println!("   {err}");
        }
    }
}

pub fn print_cells(cells: &[CellBound]) {
    println!("🧩 {} cells:\n", cells.len());
    for cell in cells {
        println!(
            "   x={:>7.1} y={:>7.1} w={:>6.1} h={:>6.1}  {}",
            cell.x,
            cell.y,
            cell.w,
            cell.h,
            truncate_text(&cell.text, 80)
        );
    }
}

pub fn print_grid(grid: &TimeGrid) {
    println!("🕐 {} time slots:\n", grid.slots().len());
    for slot in grid.slots() {
        println!(
            "   {:>5}-{:<5}  x {:>7.1} .. {:>7.1}",
            slot.start_time, slot.end_time, slot.start_x, slot.end_x
        );
    }
}

fn format_pair(pair: &PairModel) -> String {
    let mut line = format!("{:<11} {} ({}", pair.time.to_string(), pair.title, pair.pair_type);
    if pair.subgroup != schedule_parser::Subgroup::Common {
        line.push_str(&format!(", {}", pair.subgroup));
    }
    line.push(')');
    if !pair.lecturer.is_empty() {
        line.push_str(&format!(" {}", pair.lecturer));
    }
    if !pair.classroom.is_empty() {
        line.push_str(&format!(", {}", pair.classroom));
    }
    line.push_str(&format!(" {}", pair.date));
    line
}

fn truncate_text(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let truncated: String = text.chars().take(max_chars).collect();
    format!("{truncated}...")
}
