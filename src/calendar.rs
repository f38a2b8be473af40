//! Date-range enumeration and day-type classification
//!
//! This module builds the survey calendar: every date in the inclusive
//! survey period, each classified as festival, holiday, weekend, or weekday.
//! Classification uses an explicit ordered rule list so the precedence
//! (Festival > Holiday > Weekend > Weekday) is visible in one place rather
//! than emerging from sequential overwrites.

use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use crate::sampling::error::{SamplerError, SamplerResult};

// ============================================================================
// Day Type
// ============================================================================

/// Classification of a calendar day
///
/// Variant declaration order doubles as the canonical iteration order used
/// when strata are visited, so it must stay fixed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DayType {
    /// Special-event day (festival), highest precedence
    Festival,
    /// Public holiday
    Holiday,
    /// Saturday or Sunday
    Weekend,
    /// Ordinary weekday
    Weekday,
}

impl DayType {
    /// Get all day types in canonical order
    pub fn all() -> Vec<Self> {
        vec![Self::Festival, Self::Holiday, Self::Weekend, Self::Weekday]
    }

    /// Get the display label
    pub fn label(&self) -> &'static str {
        match self {
            Self::Festival => "Festival",
            Self::Holiday => "Holiday",
            Self::Weekend => "Weekend",
            Self::Weekday => "Weekday",
        }
    }

    /// Classify a day from its raw flags
    ///
    /// The rules are evaluated top to bottom; the first match wins.
    pub fn classify(is_festival: bool, is_holiday: bool, is_weekend: bool) -> Self {
        if is_festival {
            Self::Festival
        } else if is_holiday {
            Self::Holiday
        } else if is_weekend {
            Self::Weekend
        } else {
            Self::Weekday
        }
    }

    /// Try to parse from string
    pub fn from_label(label: &str) -> Option<Self> {
        match label.to_lowercase().as_str() {
            "festival" => Some(Self::Festival),
            "holiday" => Some(Self::Holiday),
            "weekend" => Some(Self::Weekend),
            "weekday" => Some(Self::Weekday),
            _ => None,
        }
    }
}

impl fmt::Display for DayType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for DayType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_label(s).ok_or_else(|| format!("Unknown day type: {}", s))
    }
}

// ============================================================================
// Calendar Day
// ============================================================================

/// A single classified day of the survey period
///
/// Immutable once built; downstream components read it but never change it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarDay {
    /// Calendar date
    pub date: NaiveDate,

    /// Saturday or Sunday
    pub is_weekend: bool,

    /// Member of the configured holiday set
    pub is_holiday: bool,

    /// Member of the configured festival set
    pub is_festival: bool,

    /// Derived classification (fixed precedence)
    pub day_type: DayType,
}

impl CalendarDay {
    /// Classify a date against the holiday and festival sets
    pub fn new(date: NaiveDate, holidays: &BTreeSet<NaiveDate>, festivals: &BTreeSet<NaiveDate>) -> Self {
        let is_weekend = matches!(date.weekday(), Weekday::Sat | Weekday::Sun);
        let is_holiday = holidays.contains(&date);
        let is_festival = festivals.contains(&date);

        Self {
            date,
            is_weekend,
            is_holiday,
            is_festival,
            day_type: DayType::classify(is_festival, is_holiday, is_weekend),
        }
    }

    /// Month number (1-12)
    pub fn month_number(&self) -> u32 {
        self.date.month()
    }

    /// Full month name, e.g. "May"
    pub fn month_label(&self) -> String {
        self.date.format("%B").to_string()
    }

    /// Full weekday name, e.g. "Monday"
    pub fn weekday_name(&self) -> String {
        self.date.format("%A").to_string()
    }

    /// Human-readable date, e.g. "May 26 2025"
    pub fn date_label(&self) -> String {
        self.date.format("%B %-d %Y").to_string()
    }
}

// ============================================================================
// Calendar Builder
// ============================================================================

/// Builds the classified calendar for an inclusive date range
///
/// Holiday or festival dates outside the range are accepted but have no
/// effect on the calendar; each one is logged as a warning.
#[derive(Debug, Clone)]
pub struct CalendarBuilder {
    start: NaiveDate,
    end: NaiveDate,
    holidays: BTreeSet<NaiveDate>,
    festivals: BTreeSet<NaiveDate>,
}

impl CalendarBuilder {
    /// Create a builder for the inclusive period `start..=end`
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            start,
            end,
            holidays: BTreeSet::new(),
            festivals: BTreeSet::new(),
        }
    }

    /// Set the holiday dates
    pub fn with_holidays(mut self, holidays: impl IntoIterator<Item = NaiveDate>) -> Self {
        self.holidays = holidays.into_iter().collect();
        self
    }

    /// Set the festival dates
    pub fn with_festivals(mut self, festivals: impl IntoIterator<Item = NaiveDate>) -> Self {
        self.festivals = festivals.into_iter().collect();
        self
    }

    /// Build the ordered calendar covering every date in range
    pub fn build(&self) -> SamplerResult<Vec<CalendarDay>> {
        if self.end < self.start {
            return Err(SamplerError::invalid_date_range(self.start, self.end));
        }

        for date in self.holidays.iter().chain(self.festivals.iter()) {
            if *date < self.start || *date > self.end {
                tracing::warn!(date = %date, "Holiday/festival date outside the survey period, ignored");
            }
        }

        let days: Vec<CalendarDay> = self
            .start
            .iter_days()
            .take_while(|d| *d <= self.end)
            .map(|d| CalendarDay::new(d, &self.holidays, &self.festivals))
            .collect();

        tracing::debug!(days = days.len(), "Calendar built");
        Ok(days)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_day_type_precedence() {
        // Festival beats everything
        assert_eq!(DayType::classify(true, true, true), DayType::Festival);
        // Holiday beats weekend
        assert_eq!(DayType::classify(false, true, true), DayType::Holiday);
        // Weekend beats weekday
        assert_eq!(DayType::classify(false, false, true), DayType::Weekend);
        assert_eq!(DayType::classify(false, false, false), DayType::Weekday);
    }

    #[test]
    fn test_day_type_canonical_order() {
        let all = DayType::all();
        assert_eq!(all.len(), 4);
        // Derived Ord must match the canonical declaration order
        let mut sorted = all.clone();
        sorted.sort();
        assert_eq!(all, sorted);
    }

    #[test]
    fn test_day_type_from_label() {
        assert_eq!(DayType::from_label("Holiday"), Some(DayType::Holiday));
        assert_eq!(DayType::from_label("WEEKEND"), Some(DayType::Weekend));
        assert_eq!(DayType::from_label("unknown"), None);
    }

    #[test]
    fn test_calendar_day_weekend_detection() {
        let empty = BTreeSet::new();
        // 2025-05-24 is a Saturday
        let sat = CalendarDay::new(d(2025, 5, 24), &empty, &empty);
        assert!(sat.is_weekend);
        assert_eq!(sat.day_type, DayType::Weekend);

        // 2025-05-21 is a Wednesday
        let wed = CalendarDay::new(d(2025, 5, 21), &empty, &empty);
        assert!(!wed.is_weekend);
        assert_eq!(wed.day_type, DayType::Weekday);
    }

    #[test]
    fn test_calendar_day_labels() {
        let empty = BTreeSet::new();
        let day = CalendarDay::new(d(2025, 5, 26), &empty, &empty);
        assert_eq!(day.weekday_name(), "Monday");
        assert_eq!(day.month_label(), "May");
        assert_eq!(day.month_number(), 5);
        assert_eq!(day.date_label(), "May 26 2025");
    }

    #[test]
    fn test_builder_covers_full_range() {
        let days = CalendarBuilder::new(d(2025, 5, 21), d(2025, 5, 27))
            .build()
            .unwrap();
        assert_eq!(days.len(), 7);
        assert_eq!(days[0].date, d(2025, 5, 21));
        assert_eq!(days[6].date, d(2025, 5, 27));
    }

    #[test]
    fn test_builder_single_day_range() {
        let days = CalendarBuilder::new(d(2025, 5, 21), d(2025, 5, 21))
            .build()
            .unwrap();
        assert_eq!(days.len(), 1);
    }

    #[test]
    fn test_builder_invalid_range() {
        let result = CalendarBuilder::new(d(2025, 6, 1), d(2025, 5, 1)).build();
        assert!(matches!(result, Err(SamplerError::InvalidDateRange { .. })));
    }

    #[test]
    fn test_builder_holiday_beats_weekday() {
        // Memorial Day 2025 falls on a Monday
        let days = CalendarBuilder::new(d(2025, 5, 21), d(2025, 5, 27))
            .with_holidays([d(2025, 5, 26)])
            .build()
            .unwrap();

        let memorial = days.iter().find(|day| day.date == d(2025, 5, 26)).unwrap();
        assert!(memorial.is_holiday);
        assert_eq!(memorial.day_type, DayType::Holiday);
    }

    #[test]
    fn test_builder_festival_beats_holiday() {
        let days = CalendarBuilder::new(d(2025, 5, 21), d(2025, 5, 27))
            .with_holidays([d(2025, 5, 26)])
            .with_festivals([d(2025, 5, 26)])
            .build()
            .unwrap();

        let day = days.iter().find(|day| day.date == d(2025, 5, 26)).unwrap();
        assert_eq!(day.day_type, DayType::Festival);
    }

    #[test]
    fn test_builder_out_of_range_holiday_has_no_effect() {
        let days = CalendarBuilder::new(d(2025, 5, 21), d(2025, 5, 27))
            .with_holidays([d(2025, 12, 25)])
            .build()
            .unwrap();
        assert!(days.iter().all(|day| !day.is_holiday));
    }
}
