//! Daily slot table and the time span of a pair.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Start labels of the fixed daily slots, in order.
pub const SLOT_STARTS: [&str; 8] = [
    "8:30", "10:20", "12:20", "14:10", "16:00", "18:00", "19:40", "21:20",
];

/// End labels of the fixed daily slots, in order.
pub const SLOT_ENDS: [&str; 8] = [
    "10:10", "12:00", "14:00", "15:50", "17:40", "19:30", "21:10", "22:50",
];

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TimeError {
    #[error("Not parse time: {start} - {end}")]
    UnknownSlot { start: String, end: String },

    #[error("Invalid time: {0}")]
    NonPositiveDuration(String),
}

/// A span of one or more consecutive slots.
///
/// Both ends are labels from the slot table, so a `Time` is always
/// comparable by slot index rather than by wall clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawTime", into = "RawTime")]
pub struct Time {
    start: usize,
    end: usize,
}

#[derive(Serialize, Deserialize)]
struct RawTime {
    start: String,
    end: String,
}

impl Time {
    /// Build a span from slot labels such as `"8:30"` and `"12:00"`.
    ///
    /// Labels are normalized through `H:mm`, so `"08:30"` is accepted.
    pub fn new(start: &str, end: &str) -> Result<Self, TimeError> {
        let unknown = || TimeError::UnknownSlot {
            start: start.to_string(),
            end: end.to_string(),
        };
        let start_idx = slot_index(&SLOT_STARTS, start).ok_or_else(unknown)?;
        let end_idx = slot_index(&SLOT_ENDS, end).ok_or_else(unknown)?;

        if end_idx < start_idx {
            return Err(TimeError::NonPositiveDuration(format!(
                "{}-{}",
                SLOT_STARTS[start_idx], SLOT_ENDS[end_idx]
            )));
        }

        Ok(Self {
            start: start_idx,
            end: end_idx,
        })
    }

    pub fn start(&self) -> &'static str {
        SLOT_STARTS[self.start]
    }

    pub fn end(&self) -> &'static str {
        SLOT_ENDS[self.end]
    }

    /// Number of slots covered.
    pub fn duration(&self) -> usize {
        self.end - self.start + 1
    }

    /// Zero-based index of the first slot.
    pub fn number(&self) -> usize {
        self.start
    }

    /// Whether two spans share at least one slot.
    pub fn intersects(&self, other: &Time) -> bool {
        self.start <= other.end && other.start <= self.end
    }
}

impl fmt::Display for Time {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start(), self.end())
    }
}

impl TryFrom<RawTime> for Time {
    type Error = TimeError;

    fn try_from(raw: RawTime) -> Result<Self, Self::Error> {
        Time::new(&raw.start, &raw.end)
    }
}

impl From<Time> for RawTime {
    fn from(time: Time) -> Self {
        RawTime {
            start: time.start().to_string(),
            end: time.end().to_string(),
        }
    }
}

fn slot_index(table: &[&str], label: &str) -> Option<usize> {
    let normalized = normalize_label(label)?;
    table.iter().position(|slot| *slot == normalized)
}

fn normalize_label(label: &str) -> Option<String> {
    let (hours, minutes) = label.trim().split_once(':')?;
    let hours: u32 = hours.parse().ok()?;
    let minutes: u32 = minutes.parse().ok()?;
    if hours > 23 || minutes > 59 {
        return None;
    }
    Some(format!("{hours}:{minutes:02}"))
}
