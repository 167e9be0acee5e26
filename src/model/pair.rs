//! A scheduled class session ("pair") and its enumerated attributes.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::date::DateModel;
use super::time::Time;

/// Kind of class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PairType {
    Lecture,
    Seminar,
    Laboratory,
}

impl PairType {
    pub fn tag(self) -> &'static str {
        match self {
            PairType::Lecture => "Lecture",
            PairType::Seminar => "Seminar",
            PairType::Laboratory => "Laboratory",
        }
    }
}

impl fmt::Display for PairType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Part of the student group a pair is taught to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Subgroup {
    A,
    B,
    Common,
}

impl Subgroup {
    pub fn tag(self) -> &'static str {
        match self {
            Subgroup::A => "A",
            Subgroup::B => "B",
            Subgroup::Common => "Common",
        }
    }

    /// Common overlaps with everything; A and B only with themselves.
    pub fn intersects(self, other: Subgroup) -> bool {
        self == other || self == Subgroup::Common || other == Subgroup::Common
    }
}

impl fmt::Display for Subgroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// One class entry extracted from a timetable cell.
///
/// Serializes in the schedule JSON shape (`dates` holds the date items).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PairModel {
    pub title: String,
    /// Empty when the entry names no lecturer.
    pub lecturer: String,
    pub classroom: String,
    #[serde(rename = "type")]
    pub pair_type: PairType,
    pub subgroup: Subgroup,
    pub time: Time,
    #[serde(rename = "dates")]
    pub date: DateModel,
}

impl PairModel {
    /// Two pairs clash when they share a slot, a date and a subgroup.
    pub fn intersects(&self, other: &PairModel) -> bool {
        self.time.intersects(&other.time)
            && self.date.intersects(&other.date)
            && self.subgroup.intersects(other.subgroup)
    }
}

impl fmt::Display for PairModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}. {}. {}. {}. {}. {}. {}",
            self.title,
            self.lecturer,
            self.classroom,
            self.pair_type,
            self.subgroup,
            self.time,
            self.date
        )
    }
}
