//! Randomized hour-window assignment under the no-collision constraint
//!
//! For each sampled day the assigner draws one distinct start hour per
//! (site, survey-type) pair, so no two windows at the same site can share a
//! start hour. Because every pair on a day receives a distinct hour from a
//! single draw, cross-site simultaneity remains possible; the no-overlap
//! guarantee is scoped to a site, not to the whole day.
//!
//! Two draws are consumed per day, in order: the hour sample, then the
//! permutation that maps hours onto pairs. The permutation keeps the
//! hour-to-pair assignment uncorrelated with pair enumeration order.

use chrono::NaiveDate;
use rand::seq::{index, SliceRandom};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::day_sampler::SampledDay;
use super::error::{SamplerError, SamplerResult};
use crate::calendar::CalendarDay;

// ============================================================================
// Hour Domain
// ============================================================================

fn default_min_start_hour() -> u32 {
    6
}

fn default_max_start_hour() -> u32 {
    18
}

/// Inclusive range of permissible window start hours
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HourDomain {
    /// Earliest permissible start hour
    #[serde(default = "default_min_start_hour")]
    pub min_start_hour: u32,

    /// Latest permissible start hour
    #[serde(default = "default_max_start_hour")]
    pub max_start_hour: u32,
}

impl HourDomain {
    /// Create a domain covering `min_start_hour..=max_start_hour`
    pub fn new(min_start_hour: u32, max_start_hour: u32) -> Self {
        Self {
            min_start_hour,
            max_start_hour,
        }
    }

    /// All permissible start hours in ascending order
    pub fn hours(&self) -> Vec<u32> {
        (self.min_start_hour..=self.max_start_hour).collect()
    }

    /// Number of distinct start hours
    pub fn len(&self) -> usize {
        if self.max_start_hour >= self.min_start_hour {
            (self.max_start_hour - self.min_start_hour + 1) as usize
        } else {
            0
        }
    }

    /// True when the domain holds no hours
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Check the domain bounds
    pub fn validate(&self) -> SamplerResult<()> {
        if self.min_start_hour > self.max_start_hour {
            return Err(SamplerError::invalid_hour_domain(
                self.min_start_hour,
                self.max_start_hour,
            ));
        }
        if self.max_start_hour > 23 {
            return Err(SamplerError::invalid_hour_domain(
                self.min_start_hour,
                self.max_start_hour,
            ));
        }
        Ok(())
    }
}

impl Default for HourDomain {
    fn default() -> Self {
        Self::new(default_min_start_hour(), default_max_start_hour())
    }
}

// ============================================================================
// Survey Slot
// ============================================================================

/// One assigned observation window
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SurveySlot {
    /// Survey type receiving the window
    pub survey_type: String,

    /// Site the window is observed at
    pub site: String,

    /// The sampled day
    pub day: CalendarDay,

    /// Window start hour (24h clock)
    pub start_hour: u32,

    /// Window end hour (`start_hour + window_length`)
    pub end_hour: u32,
}

/// A sampled day dropped because its hour domain could not host every slot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedDay {
    /// Date that was dropped from the schedule
    pub date: NaiveDate,

    /// Slots the day required (sites x survey types)
    pub required: usize,

    /// Distinct start hours actually available
    pub available: usize,
}

impl fmt::Display for SkippedDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} skipped: {} slots required but only {} start hours available",
            self.date, self.required, self.available
        )
    }
}

// ============================================================================
// Slot Assigner
// ============================================================================

/// Per-day assignment outcome: the slots plus any dropped days
#[derive(Debug, Clone, Default)]
pub struct AssignmentOutcome {
    /// All assigned slots, in day order
    pub slots: Vec<SurveySlot>,

    /// Days dropped for lack of distinct hours
    pub skipped: Vec<SkippedDay>,
}

/// Assigns non-colliding hour windows to (site, survey-type) pairs
#[derive(Debug, Clone)]
pub struct SlotAssigner {
    sites: Vec<String>,
    survey_types: Vec<String>,
    hour_domain: HourDomain,
    window_length_hours: u32,
}

impl SlotAssigner {
    /// Create an assigner for the given rosters and hour domain
    pub fn new(
        sites: Vec<String>,
        survey_types: Vec<String>,
        hour_domain: HourDomain,
        window_length_hours: u32,
    ) -> Self {
        Self {
            sites,
            survey_types,
            hour_domain,
            window_length_hours,
        }
    }

    /// Slots required on every day (sites x survey types)
    pub fn required_slots(&self) -> usize {
        self.sites.len() * self.survey_types.len()
    }

    /// Canonical pair enumeration: sites outer, survey types inner
    fn pairs(&self) -> Vec<(&str, &str)> {
        let mut pairs = Vec::with_capacity(self.required_slots());
        for site in &self.sites {
            for survey_type in &self.survey_types {
                pairs.push((site.as_str(), survey_type.as_str()));
            }
        }
        pairs
    }

    /// Assign windows for a single day
    ///
    /// Returns `Err(SkippedDay)` when the hour domain holds fewer distinct
    /// hours than the day needs; the caller drops the day and continues.
    pub fn assign_day(
        &self,
        day: &CalendarDay,
        rng: &mut ChaCha8Rng,
    ) -> Result<Vec<SurveySlot>, SkippedDay> {
        let required = self.required_slots();
        let domain = self.hour_domain.hours();

        if domain.len() < required {
            return Err(SkippedDay {
                date: day.date,
                required,
                available: domain.len(),
            });
        }

        // Draw 1: distinct start hours, uniform without replacement
        let mut hours: Vec<u32> = index::sample(rng, domain.len(), required)
            .iter()
            .map(|i| domain[i])
            .collect();

        // Draw 2: independent permutation of hours onto pairs
        hours.shuffle(rng);

        let slots = self
            .pairs()
            .into_iter()
            .zip(hours)
            .map(|((site, survey_type), start_hour)| SurveySlot {
                survey_type: survey_type.to_string(),
                site: site.to_string(),
                day: day.clone(),
                start_hour,
                end_hour: start_hour + self.window_length_hours,
            })
            .collect();

        Ok(slots)
    }

    /// Assign windows for every sampled day, visiting days in date order
    pub fn assign(&self, sampled: &[SampledDay], rng: &mut ChaCha8Rng) -> AssignmentOutcome {
        let mut days: Vec<&SampledDay> = sampled.iter().collect();
        days.sort_by_key(|s| s.day.date);

        let mut outcome = AssignmentOutcome::default();
        for sampled_day in days {
            match self.assign_day(&sampled_day.day, rng) {
                Ok(slots) => outcome.slots.extend(slots),
                Err(skipped) => {
                    tracing::warn!(%skipped, "Day dropped from schedule");
                    outcome.skipped.push(skipped);
                }
            }
        }
        outcome
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rand::SeedableRng;
    use std::collections::{BTreeSet, HashSet};

    fn test_day(y: i32, m: u32, d: u32) -> CalendarDay {
        let empty = BTreeSet::new();
        CalendarDay::new(NaiveDate::from_ymd_opt(y, m, d).unwrap(), &empty, &empty)
    }

    fn two_by_two() -> SlotAssigner {
        SlotAssigner::new(
            vec!["A".into(), "B".into()],
            vec!["Observation".into(), "Interview".into()],
            HourDomain::new(6, 18),
            2,
        )
    }

    #[test]
    fn test_hour_domain_len() {
        assert_eq!(HourDomain::new(6, 18).len(), 13);
        assert_eq!(HourDomain::new(8, 8).len(), 1);
        assert!(!HourDomain::new(6, 18).is_empty());
    }

    #[test]
    fn test_hour_domain_validate() {
        assert!(HourDomain::new(6, 18).validate().is_ok());
        assert!(HourDomain::new(18, 6).validate().is_err());
        assert!(HourDomain::new(6, 24).validate().is_err());
    }

    #[test]
    fn test_assign_day_slot_count() {
        let assigner = two_by_two();
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let slots = assigner.assign_day(&test_day(2025, 5, 26), &mut rng).unwrap();

        // 2 sites x 2 survey types
        assert_eq!(slots.len(), 4);
    }

    #[test]
    fn test_assign_day_one_slot_per_pair() {
        let assigner = two_by_two();
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let slots = assigner.assign_day(&test_day(2025, 5, 26), &mut rng).unwrap();

        let pairs: HashSet<(String, String)> = slots
            .iter()
            .map(|s| (s.site.clone(), s.survey_type.clone()))
            .collect();
        assert_eq!(pairs.len(), 4);
    }

    #[test]
    fn test_assign_day_no_intra_site_collision() {
        let assigner = two_by_two();
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let slots = assigner.assign_day(&test_day(2025, 5, 26), &mut rng).unwrap();

        let site_hours: HashSet<(String, u32)> = slots
            .iter()
            .map(|s| (s.site.clone(), s.start_hour))
            .collect();
        assert_eq!(site_hours.len(), slots.len());
    }

    #[test]
    fn test_assign_day_hours_within_domain() {
        let assigner = two_by_two();
        let mut rng = ChaCha8Rng::seed_from_u64(17);
        let slots = assigner.assign_day(&test_day(2025, 7, 4), &mut rng).unwrap();

        for slot in &slots {
            assert!((6..=18).contains(&slot.start_hour));
            assert_eq!(slot.end_hour, slot.start_hour + 2);
        }
    }

    #[test]
    fn test_assign_day_insufficient_hours() {
        // 3 start hours cannot host 4 slots
        let assigner = SlotAssigner::new(
            vec!["A".into(), "B".into()],
            vec!["Observation".into(), "Interview".into()],
            HourDomain::new(8, 10),
            2,
        );
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let result = assigner.assign_day(&test_day(2025, 5, 26), &mut rng);

        let skipped = result.unwrap_err();
        assert_eq!(skipped.required, 4);
        assert_eq!(skipped.available, 3);
    }

    #[test]
    fn test_assign_skips_and_continues() {
        let assigner = SlotAssigner::new(
            vec!["A".into(), "B".into()],
            vec!["Observation".into(), "Interview".into()],
            HourDomain::new(8, 10),
            2,
        );
        let empty = BTreeSet::new();
        let sampled = vec![crate::sampling::SampledDay {
            day: CalendarDay::new(NaiveDate::from_ymd_opt(2025, 5, 26).unwrap(), &empty, &empty),
            stratum: crate::sampling::StratumKey::new(5, crate::calendar::DayType::Weekday),
        }];
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let outcome = assigner.assign(&sampled, &mut rng);

        assert!(outcome.slots.is_empty());
        assert_eq!(outcome.skipped.len(), 1);
    }

    #[test]
    fn test_assign_day_deterministic() {
        let assigner = two_by_two();
        let day = test_day(2025, 5, 26);

        let mut rng1 = ChaCha8Rng::seed_from_u64(123);
        let mut rng2 = ChaCha8Rng::seed_from_u64(123);
        let first = assigner.assign_day(&day, &mut rng1).unwrap();
        let second = assigner.assign_day(&day, &mut rng2).unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn test_single_survey_variant() {
        // Degenerate configuration: one survey type, unconstrained choice
        let assigner = SlotAssigner::new(
            vec!["A".into(), "B".into()],
            vec!["Count".into()],
            HourDomain::new(6, 18),
            2,
        );
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let slots = assigner.assign_day(&test_day(2025, 5, 26), &mut rng).unwrap();

        assert_eq!(slots.len(), 2);
        assert!(slots.iter().all(|s| s.survey_type == "Count"));
    }

    #[test]
    fn test_skipped_day_display() {
        let skipped = SkippedDay {
            date: NaiveDate::from_ymd_opt(2025, 5, 26).unwrap(),
            required: 4,
            available: 3,
        };
        let text = skipped.to_string();
        assert!(text.contains("2025-05-26"));
        assert!(text.contains('4'));
        assert!(text.contains('3'));
    }
}
