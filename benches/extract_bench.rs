//! Benchmarks for cell merging and pair extraction on synthetic pages.
//!
//! Run with: `cargo bench --bench extract_bench`

use chrono::NaiveDate;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use schedule_parser::{calibrate, extract, merge_cells, PairExtractor, TextRun};

/// Slot labels of the header row.
const HEADER: [&str; 8] = [
    "8:30-10:10",
    "10:20-12:00",
    "12:20-14:00",
    "14:10-15:50",
    "16:00-17:40",
    "18:00-19:30",
    "19:40-21:10",
    "21:20-22:50",
];

/// Generate a page with `rows` weekday rows, one two-line entry per slot.
///
/// Entries are spread over the grid so the merger sees many candidate
/// cells per run, as on a real weekly timetable.
fn generate_page(rows: usize) -> Vec<TextRun> {
    let mut runs: Vec<TextRun> = HEADER
        .iter()
        .enumerate()
        .map(|(i, label)| TextRun::new(*label, 100.0 + 100.0 * i as f32, 20.0, 40.0, 8.0))
        .collect();

    for row in 0..rows {
        let y = 50.0 + 40.0 * row as f32;
        for slot in 0..HEADER.len() {
            let x = 72.0 + 100.0 * slot as f32;
            runs.push(TextRun::new("Матанализ. Иванов И.И.", x, y, 90.0, 10.0));
        }
        for slot in 0..HEADER.len() {
            let x = 72.0 + 100.0 * slot as f32;
            runs.push(TextRun::new(
                "Лекция. (А). 101Л. [02.09-23.09 к.н.]",
                x,
                y + 11.0,
                96.0,
                10.0,
            ));
        }
    }
    runs
}

fn bench_merge(c: &mut Criterion) {
    let mut group = c.benchmark_group("merge_cells");
    for rows in [6usize, 24, 96] {
        let runs = generate_page(rows);
        group.throughput(Throughput::Elements(runs.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(rows), &runs, |b, runs| {
            b.iter(|| merge_cells(black_box(runs), 1.0));
        });
    }
    group.finish();
}

fn bench_extract(c: &mut Criterion) {
    let extractor = PairExtractor::new(2024).with_today(NaiveDate::from_ymd_opt(2024, 9, 1).unwrap());
    let mut group = c.benchmark_group("extract");
    for rows in [6usize, 24] {
        let cells = merge_cells(&generate_page(rows), 1.0);
        let grid = calibrate(&cells).unwrap();
        group.throughput(Throughput::Elements(cells.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(rows), &cells, |b, cells| {
            b.iter(|| extract(black_box(cells), &grid, &extractor));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_merge, bench_extract);
criterion_main!(benches);
