//! Date-block resolution.
//!
//! A date block lists the days a pair meets, e.g.
//! `[02.09-23.12 к.н., 10.10]`. Day and month are given without a year; the
//! year comes from [`DateResolver::resolve_fragment`].

use std::sync::LazyLock;

use chrono::{Datelike, NaiveDate, Weekday};
use regex::Regex;

use crate::model::{DateError, DateItem, DateModel, Frequency};

static DATE_RANGE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d{2}\.\d{2})-(\d{2}\.\d{2})\s*(\S+)$").expect("valid date range regex")
});

static DATE_SINGLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{2}\.\d{2}$").expect("valid single date regex"));

/// Turns date blocks into [`DateModel`]s for one reference year.
#[derive(Debug, Clone, Copy)]
pub struct DateResolver {
    year: i32,
    today: NaiveDate,
}

impl DateResolver {
    pub fn new(year: i32, today: NaiveDate) -> Self {
        Self { year, today }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn today(&self) -> NaiveDate {
        self.today
    }

    /// Parse a bracketed block such as `[01.09, 08.09-22.09 к.н.]`.
    pub fn resolve_block(&self, block: &str) -> Result<DateModel, DateError> {
        let normalized = block.replace(['[', ']'], "").trim().to_lowercase();

        let mut model = DateModel::new();
        for token in normalized.split(',') {
            let token = token.trim();
            let item = self.resolve_token(token)?;
            model.add(item)?;
        }
        Ok(model)
    }

    fn resolve_token(&self, token: &str) -> Result<DateItem, DateError> {
        if let Some(caps) = DATE_RANGE.captures(token) {
            let frequency = match &caps[3] {
                "к.н." => Frequency::EveryWeek,
                "ч.н." => Frequency::AlternateWeeks,
                other => return Err(DateError::UnknownFrequency(other.to_string())),
            };
            let start = self.resolve_fragment(&caps[1])?;
            let end = self.resolve_fragment(&caps[2])?;
            return DateItem::range(start, end, frequency);
        }

        if DATE_SINGLE.is_match(token) {
            return DateItem::single(self.resolve_fragment(token)?);
        }

        Err(DateError::UnknownDate(token.to_string()))
    }

    /// Resolve a `dd.mm` fragment to a concrete date.
    ///
    /// Candidates are the reference year `A` and the year before it `B`:
    ///
    /// 1. `B` wins when it is strictly closer to today and not a Sunday.
    /// 2. Otherwise `B` wins when `A` is a Sunday and `B` is not.
    /// 3. Otherwise `A`.
    ///
    /// A fragment that only exists in one candidate year (`29.02`) takes that
    /// year.
    pub fn resolve_fragment(&self, fragment: &str) -> Result<NaiveDate, DateError> {
        let invalid = || DateError::InvalidDate(fragment.to_string());

        let (day, month) = fragment.split_once('.').ok_or_else(invalid)?;
        let day: u32 = day.parse().map_err(|_| invalid())?;
        let month: u32 = month.parse().map_err(|_| invalid())?;

        let current = NaiveDate::from_ymd_opt(self.year, month, day);
        let previous = self
            .year
            .checked_sub(1)
            .and_then(|year| NaiveDate::from_ymd_opt(year, month, day));

        match (current, previous) {
            (Some(current), Some(previous)) => Ok(self.pick_year(current, previous)),
            (Some(date), None) | (None, Some(date)) => Ok(date),
            (None, None) => Err(invalid()),
        }
    }

    fn pick_year(&self, current: NaiveDate, previous: NaiveDate) -> NaiveDate {
        let distance = |date: NaiveDate| (date - self.today).num_days().abs();
        let is_sunday = |date: NaiveDate| date.weekday() == Weekday::Sun;

        if distance(current) > distance(previous) && !is_sunday(previous) {
            return previous;
        }
        if is_sunday(current) && !is_sunday(previous) {
            return previous;
        }
        current
    }
}
