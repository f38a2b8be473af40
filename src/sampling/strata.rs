//! Stratification of classified days into (month, day-type) strata
//!
//! Stratification is a pure, stable partition: every day lands in exactly
//! one stratum, days keep their original date order inside each stratum,
//! and no stratum exists for a (month, day-type) combination absent from
//! the calendar.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::calendar::{CalendarDay, DayType};

/// Key identifying one stratum
///
/// The derived `Ord` (month ascending, then `DayType` declaration order)
/// is the canonical stratum iteration order; the day sampler relies on it
/// to consume the random stream identically across runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct StratumKey {
    /// Month number (1-12)
    pub month: u32,

    /// Day classification
    pub day_type: DayType,
}

impl StratumKey {
    /// Create a stratum key
    pub fn new(month: u32, day_type: DayType) -> Self {
        Self { month, day_type }
    }
}

impl fmt::Display for StratumKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "month {} / {}", self.month, self.day_type)
    }
}

/// Strata in canonical order, each holding its days in date order
pub type Strata = BTreeMap<StratumKey, Vec<CalendarDay>>;

/// Partition a classified calendar into (month, day-type) strata
///
/// Empty strata are never materialized: only combinations present in the
/// calendar appear in the result.
pub fn stratify(days: &[CalendarDay]) -> Strata {
    let mut strata: Strata = BTreeMap::new();

    for day in days {
        let key = StratumKey::new(day.month_number(), day.day_type);
        strata.entry(key).or_default().push(day.clone());
    }

    strata
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::CalendarBuilder;
    use chrono::NaiveDate;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn may_week() -> Vec<CalendarDay> {
        CalendarBuilder::new(d(2025, 5, 21), d(2025, 5, 27))
            .with_holidays([d(2025, 5, 26)])
            .build()
            .unwrap()
    }

    #[test]
    fn test_every_day_in_exactly_one_stratum() {
        let days = may_week();
        let strata = stratify(&days);

        let total: usize = strata.values().map(|v| v.len()).sum();
        assert_eq!(total, days.len());
    }

    #[test]
    fn test_expected_strata_for_may_week() {
        let strata = stratify(&may_week());

        // Wed 21, Thu 22, Fri 23, Tue 27 are weekdays; Sat 24 + Sun 25 are
        // weekend; Mon 26 is the holiday.
        assert_eq!(strata.len(), 3);
        assert_eq!(strata[&StratumKey::new(5, DayType::Weekday)].len(), 4);
        assert_eq!(strata[&StratumKey::new(5, DayType::Weekend)].len(), 2);
        assert_eq!(strata[&StratumKey::new(5, DayType::Holiday)].len(), 1);
    }

    #[test]
    fn test_no_empty_strata() {
        let strata = stratify(&may_week());
        assert!(strata.values().all(|days| !days.is_empty()));
        // No festival in the data, so no festival stratum
        assert!(!strata.contains_key(&StratumKey::new(5, DayType::Festival)));
    }

    #[test]
    fn test_grouping_is_stable() {
        let strata = stratify(&may_week());
        for days in strata.values() {
            assert!(days.windows(2).all(|w| w[0].date < w[1].date));
        }
    }

    #[test]
    fn test_canonical_key_order() {
        // Months ascend first, then day types in declaration order
        let days = CalendarBuilder::new(d(2025, 5, 30), d(2025, 6, 2))
            .build()
            .unwrap();
        let strata = stratify(&days);

        let keys: Vec<StratumKey> = strata.keys().copied().collect();
        let mut sorted = keys.clone();
        sorted.sort();
        assert_eq!(keys, sorted);
        assert!(keys.first().map(|k| k.month) <= keys.last().map(|k| k.month));
    }

    #[test]
    fn test_stratify_empty_calendar() {
        let strata = stratify(&[]);
        assert!(strata.is_empty());
    }
}
