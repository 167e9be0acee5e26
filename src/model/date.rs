//! Dates on which a pair takes place.
//!
//! A pair's [`DateModel`] is a chronologically ordered set of [`DateItem`]s:
//! single occurrences and weekly or fortnightly ranges. The calendar rules of
//! the timetable are enforced on insertion:
//!
//! - no occurrence falls on a Sunday,
//! - all items share one weekday,
//! - a range ends a whole number of periods after it starts,
//! - no two items share an occurrence.

use std::fmt;

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// Storage format of dates in schedule JSON.
const JSON_DATE_PATTERN: &str = "%Y-%m-%d";

/// Separator between the two ends of a range in schedule JSON.
const JSON_DATE_SEP: char = '/';

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DateError {
    #[error("Unknown date: '{0}'")]
    UnknownDate(String),

    #[error("Unknown frequency: '{0}'")]
    UnknownFrequency(String),

    #[error("Invalid parse date: {0}")]
    InvalidDate(String),

    #[error("Invalid day of week: {0}")]
    Sunday(NaiveDate),

    #[error("Invalid day of week: {start} - {end}")]
    RangeWeekday { start: NaiveDate, end: NaiveDate },

    #[error("Invalid frequency: {start} - {end}, {frequency}")]
    Frequency {
        start: NaiveDate,
        end: NaiveDate,
        frequency: Frequency,
    },

    #[error("Invalid day of week: {found} and {expected}")]
    WeekdayMismatch { expected: Weekday, found: Weekday },

    #[error("Date is intersect: {existing} and {added}")]
    Intersect { existing: DateItem, added: DateItem },
}

/// Repetition period of a date range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Frequency {
    EveryWeek,
    AlternateWeeks,
}

impl Frequency {
    /// Days between two consecutive occurrences.
    pub fn period(self) -> i64 {
        match self {
            Frequency::EveryWeek => 7,
            Frequency::AlternateWeeks => 14,
        }
    }

    /// Tag used in schedule JSON.
    pub fn tag(self) -> &'static str {
        match self {
            Frequency::EveryWeek => "every",
            Frequency::AlternateWeeks => "throughout",
        }
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "every" => Some(Frequency::EveryWeek),
            "throughout" => Some(Frequency::AlternateWeeks),
            _ => None,
        }
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// One occurrence or one recurring range of occurrences.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DateItem {
    Single(NaiveDate),
    Range {
        start: NaiveDate,
        end: NaiveDate,
        frequency: Frequency,
    },
}

impl DateItem {
    pub fn single(date: NaiveDate) -> Result<Self, DateError> {
        let item = DateItem::Single(date);
        item.validate()?;
        Ok(item)
    }

    pub fn range(start: NaiveDate, end: NaiveDate, frequency: Frequency) -> Result<Self, DateError> {
        let item = DateItem::Range {
            start,
            end,
            frequency,
        };
        item.validate()?;
        Ok(item)
    }

    /// Check the calendar rules that apply to a single item.
    pub fn validate(&self) -> Result<(), DateError> {
        match *self {
            DateItem::Single(date) => {
                if date.weekday() == Weekday::Sun {
                    return Err(DateError::Sunday(date));
                }
            }
            DateItem::Range {
                start,
                end,
                frequency,
            } => {
                if start.weekday() == Weekday::Sun {
                    return Err(DateError::Sunday(start));
                }
                if start.weekday() != end.weekday() {
                    return Err(DateError::RangeWeekday { start, end });
                }
                let days = (end - start).num_days();
                if days <= 0 || days % frequency.period() != 0 {
                    return Err(DateError::Frequency {
                        start,
                        end,
                        frequency,
                    });
                }
            }
        }
        Ok(())
    }

    pub fn start(&self) -> NaiveDate {
        match *self {
            DateItem::Single(date) => date,
            DateItem::Range { start, .. } => start,
        }
    }

    pub fn end(&self) -> NaiveDate {
        match *self {
            DateItem::Single(date) => date,
            DateItem::Range { end, .. } => end,
        }
    }

    pub fn weekday(&self) -> Weekday {
        self.start().weekday()
    }

    /// `None` for single dates.
    pub fn frequency(&self) -> Option<Frequency> {
        match *self {
            DateItem::Single(_) => None,
            DateItem::Range { frequency, .. } => Some(frequency),
        }
    }

    /// Whether `date` is one of this item's occurrences.
    pub fn contains(&self, date: NaiveDate) -> bool {
        match *self {
            DateItem::Single(single) => single == date,
            DateItem::Range {
                start,
                end,
                frequency,
            } => {
                date >= start && date <= end && (date - start).num_days() % frequency.period() == 0
            }
        }
    }

    /// Every occurrence in chronological order.
    pub fn occurrences(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        let step = Duration::days(self.frequency().map_or(1, Frequency::period));
        let end = self.end();
        std::iter::successors(Some(self.start()), move |date| {
            let next = *date + step;
            (next <= end).then_some(next)
        })
    }

    pub fn intersects(&self, other: &DateItem) -> bool {
        if self.end() < other.start() || other.end() < self.start() {
            return false;
        }
        self.occurrences().any(|date| other.contains(date))
    }

    fn to_json_date(&self) -> String {
        match *self {
            DateItem::Single(date) => date.format(JSON_DATE_PATTERN).to_string(),
            DateItem::Range { start, end, .. } => format!(
                "{}{JSON_DATE_SEP}{}",
                start.format(JSON_DATE_PATTERN),
                end.format(JSON_DATE_PATTERN)
            ),
        }
    }
}

impl fmt::Display for DateItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DateItem::Single(date) => write!(f, "{date}"),
            DateItem::Range { start, end, .. } => write!(f, "{start}-{end}"),
        }
    }
}

#[derive(Serialize, Deserialize)]
struct RawDateItem {
    frequency: String,
    date: String,
}

impl Serialize for DateItem {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        RawDateItem {
            frequency: self.frequency().map_or("once", Frequency::tag).to_string(),
            date: self.to_json_date(),
        }
        .serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for DateItem {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        use serde::de::Error as _;

        let raw = RawDateItem::deserialize(deserializer)?;
        let parse = |text: &str| {
            NaiveDate::parse_from_str(text, JSON_DATE_PATTERN)
                .map_err(|_| D::Error::custom(DateError::InvalidDate(text.to_string())))
        };

        let item = if raw.frequency == "once" {
            DateItem::Single(parse(&raw.date)?)
        } else {
            let frequency = Frequency::from_tag(&raw.frequency)
                .ok_or_else(|| D::Error::custom(DateError::UnknownFrequency(raw.frequency.clone())))?;
            let (start, end) = raw
                .date
                .split_once(JSON_DATE_SEP)
                .ok_or_else(|| D::Error::custom(DateError::InvalidDate(raw.date.clone())))?;
            DateItem::Range {
                start: parse(start)?,
                end: parse(end)?,
                frequency,
            }
        };

        item.validate().map_err(D::Error::custom)?;
        Ok(item)
    }
}

/// Chronologically ordered, non-intersecting dates of one pair.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "Vec<DateItem>", try_from = "Vec<DateItem>")]
pub struct DateModel {
    items: Vec<DateItem>,
}

impl DateModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an item, keeping chronological order.
    pub fn add(&mut self, item: DateItem) -> Result<(), DateError> {
        self.check(&item)?;
        let at = self
            .items
            .iter()
            .position(|existing| existing.start() > item.start())
            .unwrap_or(self.items.len());
        self.items.insert(at, item);
        Ok(())
    }

    /// Validate `item` against the model without inserting it.
    pub fn check(&self, item: &DateItem) -> Result<(), DateError> {
        item.validate()?;

        if let Some(expected) = self.weekday() {
            if expected != item.weekday() {
                return Err(DateError::WeekdayMismatch {
                    expected,
                    found: item.weekday(),
                });
            }
        }

        if let Some(existing) = self.items.iter().find(|existing| existing.intersects(item)) {
            return Err(DateError::Intersect {
                existing: existing.clone(),
                added: item.clone(),
            });
        }
        Ok(())
    }

    /// Weekday shared by every item, `None` while empty.
    pub fn weekday(&self) -> Option<Weekday> {
        self.items.first().map(DateItem::weekday)
    }

    pub fn start_date(&self) -> Option<NaiveDate> {
        self.items.iter().map(DateItem::start).min()
    }

    pub fn end_date(&self) -> Option<NaiveDate> {
        self.items.iter().map(DateItem::end).max()
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.items.iter().any(|item| item.contains(date))
    }

    pub fn intersects(&self, other: &DateModel) -> bool {
        self.items
            .iter()
            .any(|item| other.items.iter().any(|o| item.intersects(o)))
    }

    pub fn items(&self) -> &[DateItem] {
        &self.items
    }

    pub fn iter(&self) -> std::slice::Iter<'_, DateItem> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl<'a> IntoIterator for &'a DateModel {
    type Item = &'a DateItem;
    type IntoIter = std::slice::Iter<'a, DateItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl From<DateModel> for Vec<DateItem> {
    fn from(model: DateModel) -> Self {
        model.items
    }
}

impl TryFrom<Vec<DateItem>> for DateModel {
    type Error = DateError;

    fn try_from(items: Vec<DateItem>) -> Result<Self, Self::Error> {
        let mut model = DateModel::new();
        for item in items {
            model.add(item)?;
        }
        Ok(model)
    }
}

impl fmt::Display for DateModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, item) in self.items.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{item}")?;
        }
        f.write_str("]")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn sunday_single_is_rejected() {
        // 2024-09-01 is a Sunday
        let err = DateItem::single(d(2024, 9, 1)).unwrap_err();
        assert_eq!(err, DateError::Sunday(d(2024, 9, 1)));
    }

    #[test]
    fn range_must_keep_weekday() {
        let err = DateItem::range(d(2024, 9, 2), d(2024, 9, 10), Frequency::EveryWeek).unwrap_err();
        assert!(matches!(err, DateError::RangeWeekday { .. }));
    }

    #[test]
    fn alternate_range_needs_even_weeks() {
        let err =
            DateItem::range(d(2024, 9, 2), d(2024, 9, 9), Frequency::AlternateWeeks).unwrap_err();
        assert!(matches!(err, DateError::Frequency { .. }));
        assert!(DateItem::range(d(2024, 9, 2), d(2024, 9, 16), Frequency::AlternateWeeks).is_ok());
    }

    #[test]
    fn empty_range_is_rejected() {
        let err = DateItem::range(d(2024, 9, 2), d(2024, 9, 2), Frequency::EveryWeek).unwrap_err();
        assert!(matches!(err, DateError::Frequency { .. }));
    }

    #[test]
    fn range_contains_only_its_occurrences() {
        let range = DateItem::range(d(2024, 9, 2), d(2024, 10, 14), Frequency::AlternateWeeks).unwrap();
        assert!(range.contains(d(2024, 9, 16)));
        assert!(!range.contains(d(2024, 9, 9)));
        assert!(!range.contains(d(2024, 10, 28)));
        assert_eq!(range.occurrences().count(), 4);
    }

    #[test]
    fn model_keeps_items_sorted() {
        let mut model = DateModel::new();
        model.add(DateItem::single(d(2024, 10, 7)).unwrap()).unwrap();
        model
            .add(DateItem::range(d(2024, 9, 2), d(2024, 9, 16), Frequency::EveryWeek).unwrap())
            .unwrap();
        assert_eq!(model.items()[0].start(), d(2024, 9, 2));
        assert_eq!(model.start_date(), Some(d(2024, 9, 2)));
        assert_eq!(model.end_date(), Some(d(2024, 10, 7)));
        assert_eq!(model.weekday(), Some(Weekday::Mon));
    }

    #[test]
    fn model_rejects_mixed_weekdays() {
        let mut model = DateModel::new();
        model.add(DateItem::single(d(2024, 9, 2)).unwrap()).unwrap();
        let err = model.add(DateItem::single(d(2024, 9, 3)).unwrap()).unwrap_err();
        assert!(matches!(err, DateError::WeekdayMismatch { .. }));
    }

    #[test]
    fn model_rejects_intersections() {
        let mut model = DateModel::new();
        model
            .add(DateItem::range(d(2024, 9, 2), d(2024, 9, 30), Frequency::EveryWeek).unwrap())
            .unwrap();
        let err = model.add(DateItem::single(d(2024, 9, 16)).unwrap()).unwrap_err();
        assert!(matches!(err, DateError::Intersect { .. }));
        assert!(model.add(DateItem::single(d(2024, 10, 7)).unwrap()).is_ok());
    }

    #[test]
    fn alternate_ranges_on_offset_weeks_do_not_intersect() {
        let first = DateItem::range(d(2024, 9, 2), d(2024, 9, 30), Frequency::AlternateWeeks).unwrap();
        let second = DateItem::range(d(2024, 9, 9), d(2024, 10, 7), Frequency::AlternateWeeks).unwrap();
        assert!(!first.intersects(&second));
    }

    #[test]
    fn json_shape_matches_schedule_format() {
        let mut model = DateModel::new();
        model.add(DateItem::single(d(2024, 9, 2)).unwrap()).unwrap();
        model
            .add(DateItem::range(d(2024, 9, 9), d(2024, 9, 23), Frequency::AlternateWeeks).unwrap())
            .unwrap();

        let json = serde_json::to_value(&model).unwrap();
        assert_eq!(
            json,
            serde_json::json!([
                {"frequency": "once", "date": "2024-09-02"},
                {"frequency": "throughout", "date": "2024-09-09/2024-09-23"}
            ])
        );

        let back: DateModel = serde_json::from_value(json).unwrap();
        assert_eq!(back, model);
    }

    #[test]
    fn json_with_sunday_is_rejected() {
        let json = serde_json::json!([{"frequency": "once", "date": "2024-09-01"}]);
        assert!(serde_json::from_value::<DateModel>(json).is_err());
    }
}
