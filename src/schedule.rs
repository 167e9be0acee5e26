//! Conflict-checked schedule assembly from extracted pairs.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{Datelike, NaiveDate, Weekday};
use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use crate::extract::ParseResult;
use crate::model::PairModel;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScheduleError {
    #[error("Pair '{added}' intersects with '{existing}'")]
    Intersect {
        existing: Box<PairModel>,
        added: Box<PairModel>,
    },

    #[error("Pair '{0}' has no dates")]
    NoDates(Box<PairModel>),
}

/// Pairs grouped by the weekday they meet on.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Schedule {
    days: BTreeMap<u32, Vec<PairModel>>,
}

impl Schedule {
    pub fn new() -> Self {
        Self::default()
    }

    /// Assemble successful results, keeping the first of any clashing pairs.
    ///
    /// Returns the schedule and the rejected pairs with their reasons.
    pub fn from_results<'a>(
        results: impl IntoIterator<Item = &'a ParseResult>,
    ) -> (Self, Vec<ScheduleError>) {
        let mut schedule = Self::new();
        let mut rejected = Vec::new();
        for result in results {
            if let ParseResult::Success(pair) = result {
                if let Err(err) = schedule.add(pair.clone()) {
                    debug!("{err}");
                    rejected.push(err);
                }
            }
        }
        (schedule, rejected)
    }

    /// Add a pair unless it clashes with one already present.
    pub fn add(&mut self, pair: PairModel) -> Result<(), ScheduleError> {
        let Some(weekday) = pair.date.weekday() else {
            return Err(ScheduleError::NoDates(Box::new(pair)));
        };

        let day = self.days.entry(weekday.number_from_monday()).or_default();
        if let Some(existing) = day.iter().find(|existing| existing.intersects(&pair)) {
            return Err(ScheduleError::Intersect {
                existing: Box::new(existing.clone()),
                added: Box::new(pair),
            });
        }

        let at = day
            .iter()
            .position(|existing| existing.time.number() > pair.time.number())
            .unwrap_or(day.len());
        day.insert(at, pair);
        Ok(())
    }

    /// Pairs meeting on `weekday`, ordered by start slot.
    pub fn pairs_by_weekday(&self, weekday: Weekday) -> &[PairModel] {
        self.days
            .get(&weekday.number_from_monday())
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Pairs meeting on `date`, ordered by start slot.
    pub fn pairs_by_date(&self, date: NaiveDate) -> Vec<&PairModel> {
        self.pairs_by_weekday(date.weekday())
            .iter()
            .filter(|pair| pair.date.contains(date))
            .collect()
    }

    /// Earliest date of any pair.
    pub fn start_date(&self) -> Option<NaiveDate> {
        self.pairs().filter_map(|pair| pair.date.start_date()).min()
    }

    /// Latest date of any pair.
    pub fn end_date(&self) -> Option<NaiveDate> {
        self.pairs().filter_map(|pair| pair.date.end_date()).max()
    }

    /// Distinct titles, sorted.
    pub fn disciplines(&self) -> Vec<String> {
        self.pairs()
            .map(|pair| pair.title.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    pub fn pairs(&self) -> impl Iterator<Item = &PairModel> {
        self.days.values().flatten()
    }

    pub fn len(&self) -> usize {
        self.days.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
