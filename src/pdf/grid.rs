//! Time-grid calibration.
//!
//! The timetable header carries the slot labels (`8:30-10:10`, `10:20-12:00`,
//! ...) above evenly spaced columns. Locating the first two labels gives the
//! column pitch; every other column is extrapolated from it.

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, warn};

use super::types::{CellBound, TimeCellBound};
use crate::model::{SLOT_ENDS, SLOT_STARTS};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GridError {
    #[error("Time grid not found: no cell contains '{0}'")]
    AnchorNotFound(&'static str),
}

/// Calibrated slot columns of one page.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct TimeGrid {
    slots: Vec<TimeCellBound>,
}

impl TimeGrid {
    pub fn new(slots: Vec<TimeCellBound>) -> Self {
        Self { slots }
    }

    pub fn slots(&self) -> &[TimeCellBound] {
        &self.slots
    }

    /// Slot labels covered by the horizontal span `[start, end]`.
    ///
    /// The start label comes from the slot whose left edge is nearest `start`
    /// and the end label from the slot whose right edge is nearest `end`, so a
    /// cell spanning several columns yields a multi-slot span. Returns `None`
    /// for an empty grid.
    pub fn detect_time(&self, start: f32, end: f32) -> Option<(&str, &str)> {
        let start_slot = self
            .slots
            .iter()
            .min_by(|a, b| (start - a.start_x).abs().total_cmp(&(start - b.start_x).abs()))?;
        let end_slot = self
            .slots
            .iter()
            .min_by(|a, b| (end - a.end_x).abs().total_cmp(&(end - b.end_x).abs()))?;
        Some((&start_slot.start_time, &end_slot.end_time))
    }
}

/// Locate the slot columns of a page from its first two slot labels.
pub fn calibrate(cells: &[CellBound]) -> Result<TimeGrid, GridError> {
    let first_label = SLOT_STARTS[0];
    let second_label = SLOT_STARTS[1];

    let mut first = None;
    let mut second = None;
    for cell in cells {
        if cell.text.contains(first_label) {
            first = Some(cell.middle_x());
        }
        if cell.text.contains(second_label) {
            second = Some(cell.middle_x());
        }
    }

    let first = first.ok_or_else(|| {
        warn!("Time grid anchor '{first_label}' not found");
        GridError::AnchorNotFound(first_label)
    })?;
    let second = second.ok_or_else(|| {
        warn!("Time grid anchor '{second_label}' not found");
        GridError::AnchorNotFound(second_label)
    })?;

    let delta = second - first;
    let start_x = first - delta / 2.0;

    let slots: Vec<TimeCellBound> = SLOT_STARTS
        .iter()
        .zip(SLOT_ENDS.iter())
        .enumerate()
        .map(|(idx, (start_time, end_time))| TimeCellBound {
            start_x: start_x + delta * idx as f32,
            end_x: start_x + delta * (idx + 1) as f32,
            start_time: (*start_time).to_string(),
            end_time: (*end_time).to_string(),
        })
        .collect();

    debug!("Calibrated {} slots, column width {:.1}", slots.len(), delta);
    Ok(TimeGrid::new(slots))
}
