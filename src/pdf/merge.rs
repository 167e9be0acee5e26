//! Cell merging from positioned text runs.
//!
//! A timetable cell often wraps over several lines. Each line arrives as its
//! own run; runs that continue a cell share its left edge and font height and
//! start within a fraction of a line below it. The algorithm is a single
//! greedy pass:
//!
//! 1. Walk runs in reading order
//! 2. Attach the run to the first accumulated cell it continues
//! 3. Otherwise start a new cell
//!
//! The result depends on input order. The first matching cell wins even when
//! a later one is closer.

use tracing::debug;

use super::types::{CellBound, TextRun};

/// Maximum difference between a cell's first-line height and a run's height.
const FONT_HEIGHT_TOLERANCE: f32 = 0.1;

/// Maximum difference between a cell's and a run's left edges.
const LEFT_EDGE_TOLERANCE: f32 = 1.0;

/// Merge runs into cells.
///
/// `multiline_threshold` scales the first-line height into the largest
/// vertical gap still considered part of the same cell.
pub fn merge_cells(runs: &[TextRun], multiline_threshold: f32) -> Vec<CellBound> {
    let mut cells: Vec<CellBound> = Vec::new();

    for run in runs {
        let found = cells.iter().position(|cell| continues(cell, run, multiline_threshold));

        let next = match found {
            Some(idx) => {
                let cell = cells.remove(idx);
                CellBound {
                    text: format!("{} {}", cell.text, run.text),
                    x: cell.x,
                    y: cell.y,
                    h: (run.y - cell.y) + run.height,
                    w: cell.w.max(run.width),
                    max_font_height: cell.max_font_height,
                }
            }
            None => CellBound::from(run),
        };
        cells.push(next);
    }

    debug!("Merged {} runs into {} cells", runs.len(), cells.len());
    cells
}

fn continues(cell: &CellBound, run: &TextRun, multiline_threshold: f32) -> bool {
    (cell.max_font_height - run.height).abs() < FONT_HEIGHT_TOLERANCE
        && (run.y - (cell.y + cell.h)) < cell.max_font_height * multiline_threshold
        && (cell.x - run.x).abs() < LEFT_EDGE_TOLERANCE
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(text: &str, x: f32, y: f32, width: f32) -> TextRun {
        TextRun::new(text, x, y, width, 10.0)
    }

    fn char_counts(texts: impl Iterator<Item = String>) -> std::collections::BTreeMap<char, usize> {
        let mut counts = std::collections::BTreeMap::new();
        for text in texts {
            for ch in text.chars().filter(|c| !c.is_whitespace()) {
                *counts.entry(ch).or_insert(0) += 1;
            }
        }
        counts
    }

    #[test]
    fn empty_input_gives_no_cells() {
        assert!(merge_cells(&[], 1.0).is_empty());
    }

    #[test]
    fn stacked_lines_merge_into_one_cell() {
        let runs = vec![
            run("Физика. Петров П.П.", 100.0, 50.0, 80.0),
            run("Семинар. 205. [02.09]", 100.0, 61.0, 95.0),
        ];
        let cells = merge_cells(&runs, 1.0);
        assert_eq!(cells.len(), 1);
        let cell = &cells[0];
        assert_eq!(cell.text, "Физика. Петров П.П. Семинар. 205. [02.09]");
        assert_eq!(cell.x, 100.0);
        assert_eq!(cell.y, 50.0);
        assert_eq!(cell.h, 21.0);
        assert_eq!(cell.w, 95.0);
        assert_eq!(cell.max_font_height, 10.0);
    }

    #[test]
    fn distant_line_starts_new_cell() {
        let runs = vec![run("first", 100.0, 50.0, 40.0), run("second", 100.0, 75.0, 40.0)];
        assert_eq!(merge_cells(&runs, 1.0).len(), 2);
    }

    #[test]
    fn threshold_widens_vertical_tolerance() {
        let runs = vec![run("first", 100.0, 50.0, 40.0), run("second", 100.0, 75.0, 40.0)];
        assert_eq!(merge_cells(&runs, 2.0).len(), 1);
    }

    #[test]
    fn different_font_height_is_not_merged() {
        let runs = vec![
            run("title", 100.0, 50.0, 40.0),
            TextRun::new("body", 100.0, 61.0, 40.0, 8.0),
        ];
        assert_eq!(merge_cells(&runs, 1.0).len(), 2);
    }

    #[test]
    fn shifted_left_edge_is_not_merged() {
        let runs = vec![run("a", 100.0, 50.0, 40.0), run("b", 101.5, 61.0, 40.0)];
        assert_eq!(merge_cells(&runs, 1.0).len(), 2);
    }

    #[test]
    fn merged_cell_moves_to_the_end() {
        let runs = vec![
            run("left", 10.0, 50.0, 40.0),
            run("right", 200.0, 50.0, 40.0),
            run("left continued", 10.0, 61.0, 40.0),
        ];
        let cells = merge_cells(&runs, 1.0);
        assert_eq!(cells.len(), 2);
        assert_eq!(cells[0].text, "right");
        assert_eq!(cells[1].text, "left left continued");
    }

    #[test]
    fn first_match_wins_over_nearest() {
        // Both accumulated cells accept the run; the earlier one takes it.
        let runs = vec![
            run("upper", 10.0, 10.0, 40.0),
            run("lower", 11.2, 40.0, 40.0),
            run("next", 10.6, 45.0, 40.0),
        ];
        let cells = merge_cells(&runs, 3.0);
        assert_eq!(cells.len(), 2);
        assert_eq!(cells[1].text, "upper next");
    }

    #[test]
    fn remerging_with_tiny_threshold_is_identity() {
        let runs = vec![
            run("Физика. Петров П.П.", 100.0, 50.0, 80.0),
            run("Семинар. 205. [02.09]", 100.0, 61.0, 95.0),
            run("8:30-10:10", 300.0, 20.0, 40.0),
            run("Химия. лекции. 101. [03.09]", 200.0, 50.0, 90.0),
        ];
        let cells = merge_cells(&runs, 1.0);
        let as_runs: Vec<TextRun> = cells
            .iter()
            .map(|c| TextRun::new(c.text.clone(), c.x, c.y, c.w, c.h))
            .collect();

        let again = merge_cells(&as_runs, 1e-6);
        assert_eq!(again.len(), cells.len());
        for (before, after) in cells.iter().zip(&again) {
            assert_eq!(before.text, after.text);
            assert_eq!(before.x, after.x);
            assert_eq!(before.y, after.y);
            assert_eq!(before.w, after.w);
            assert_eq!(before.h, after.h);
        }
    }

    #[test]
    fn merging_never_drops_text() {
        let runs = vec![
            run("Мат", 10.0, 10.0, 40.0),
            run("анализ.", 10.0, 21.0, 40.0),
            run("Иванов И.И.", 10.5, 32.0, 40.0),
            run("лекции.", 120.0, 10.0, 40.0),
            run("[01.09]", 10.0, 90.0, 40.0),
        ];
        let cells = merge_cells(&runs, 1.0);
        assert_eq!(
            char_counts(runs.iter().map(|r| r.text.clone())),
            char_counts(cells.iter().map(|c| c.text.clone()))
        );
    }
}
