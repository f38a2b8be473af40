//! Post-hoc structural verification of an assembled schedule
//!
//! The verifier re-derives every structural property from the finished table
//! instead of trusting the pipeline that built it. Violations are reported
//! as structured findings; verification itself never fails and never panics.

use chrono::NaiveDate;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use super::assembler::ScheduleTable;
use crate::calendar::{CalendarDay, DayType};

// ============================================================================
// Findings
// ============================================================================

/// One structural violation discovered in the schedule
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Finding {
    /// Two or more windows share a site and start hour on the same day
    SlotOverlap {
        site: String,
        date: NaiveDate,
        start_hour: u32,
        survey_types: Vec<String>,
    },

    /// A (survey type, site) pair has zero or multiple slots on a scheduled day
    IncompleteAssignment {
        survey_type: String,
        site: String,
        date: NaiveDate,
        count: usize,
    },

    /// A scheduled day does not carry exactly sites x survey types slots
    DailyTotalMismatch {
        date: NaiveDate,
        expected: usize,
        actual: usize,
    },

    /// A holiday or festival day in the period is absent from the schedule
    MissingMandatoryDay {
        date: NaiveDate,
        day_type: DayType,
    },
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SlotOverlap { site, date, start_hour, survey_types } => {
                write!(
                    f,
                    "overlap at {} on {} starting {}:00 ({})",
                    site,
                    date,
                    start_hour,
                    survey_types.join(", ")
                )
            }
            Self::IncompleteAssignment { survey_type, site, date, count } => {
                write!(
                    f,
                    "{} at {} on {} has {} slots, expected exactly 1",
                    survey_type, site, date, count
                )
            }
            Self::DailyTotalMismatch { date, expected, actual } => {
                write!(f, "{} carries {} slots, expected {}", date, actual, expected)
            }
            Self::MissingMandatoryDay { date, day_type } => {
                write!(f, "{} day {} is missing from the schedule", day_type, date)
            }
        }
    }
}

// ============================================================================
// Coverage Summary
// ============================================================================

/// Slot and day counts for one (survey type, month, day type) cell
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CoverageCell {
    /// Distinct days carrying at least one slot
    pub unique_days: usize,

    /// Total slots in the cell
    pub total_slots: usize,
}

/// Aggregate coverage of the survey period
#[derive(Debug, Clone, Default)]
pub struct CoverageSummary {
    /// Days in the survey period
    pub period_days: usize,

    /// Distinct days carrying at least one slot
    pub scheduled_days: usize,

    /// Per-(survey type, month, day type) breakdown, in canonical order
    pub breakdown: BTreeMap<(String, u32, DayType), CoverageCell>,
}

impl CoverageSummary {
    /// Fraction of period days that received slots
    pub fn fraction(&self) -> f64 {
        if self.period_days == 0 {
            0.0
        } else {
            self.scheduled_days as f64 / self.period_days as f64
        }
    }
}

// ============================================================================
// Verification Report
// ============================================================================

/// Findings plus coverage for one verified schedule
#[derive(Debug, Clone, Default)]
pub struct VerificationReport {
    /// Structural violations, empty for a correct schedule
    pub findings: Vec<Finding>,

    /// Coverage summary
    pub coverage: CoverageSummary,
}

impl VerificationReport {
    /// True when no structural violation was found
    pub fn is_clean(&self) -> bool {
        self.findings.is_empty()
    }

    /// Render the report for console output
    pub fn display(&self) -> String {
        let mut out = String::new();

        if self.is_clean() {
            out.push_str("Verification: all checks passed\n");
        } else {
            out.push_str(&format!("Verification: {} finding(s)\n", self.findings.len()));
            for finding in &self.findings {
                out.push_str(&format!("  - {}\n", finding));
            }
        }

        out.push_str(&format!(
            "Coverage: {} of {} days scheduled ({:.1}%)\n",
            self.coverage.scheduled_days,
            self.coverage.period_days,
            self.coverage.fraction() * 100.0
        ));

        for ((survey_type, month, day_type), cell) in &self.coverage.breakdown {
            out.push_str(&format!(
                "  {} / month {} / {}: {} days, {} slots\n",
                survey_type, month, day_type, cell.unique_days, cell.total_slots
            ));
        }

        out
    }
}

impl fmt::Display for VerificationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display())
    }
}

// ============================================================================
// Verifier
// ============================================================================

/// Runs every structural check against an assembled table
#[derive(Debug, Clone)]
pub struct Verifier {
    sites: Vec<String>,
    survey_types: Vec<String>,
}

impl Verifier {
    /// Create a verifier for the given rosters
    pub fn new(sites: Vec<String>, survey_types: Vec<String>) -> Self {
        Self { sites, survey_types }
    }

    /// Verify a table against the calendar it was drawn from
    ///
    /// Days the assigner skipped are excluded from the mandatory-day check.
    pub fn verify(
        &self,
        table: &ScheduleTable,
        calendar: &[CalendarDay],
        skipped_dates: &BTreeSet<NaiveDate>,
    ) -> VerificationReport {
        let mut findings = Vec::new();

        self.check_overlaps(table, &mut findings);
        self.check_completeness(table, &mut findings);
        self.check_daily_totals(table, &mut findings);
        self.check_mandatory_days(table, calendar, skipped_dates, &mut findings);

        let coverage = self.coverage(table, calendar);

        if findings.is_empty() {
            tracing::info!("Schedule verification passed");
        } else {
            tracing::warn!(findings = findings.len(), "Schedule verification found violations");
        }

        VerificationReport { findings, coverage }
    }

    /// No two windows at one site may share a start hour on the same day
    fn check_overlaps(&self, table: &ScheduleTable, findings: &mut Vec<Finding>) {
        let mut groups: BTreeMap<(String, NaiveDate, u32), Vec<String>> = BTreeMap::new();
        for slot in table {
            groups
                .entry((slot.site.clone(), slot.day.date, slot.start_hour))
                .or_default()
                .push(slot.survey_type.clone());
        }

        for ((site, date, start_hour), survey_types) in groups {
            if survey_types.len() > 1 {
                findings.push(Finding::SlotOverlap {
                    site,
                    date,
                    start_hour,
                    survey_types,
                });
            }
        }
    }

    /// Every (survey type, site) pair carries exactly one slot per scheduled day
    fn check_completeness(&self, table: &ScheduleTable, findings: &mut Vec<Finding>) {
        let mut counts: BTreeMap<(String, String, NaiveDate), usize> = BTreeMap::new();
        for slot in table {
            *counts
                .entry((slot.survey_type.clone(), slot.site.clone(), slot.day.date))
                .or_default() += 1;
        }

        for date in table.dates() {
            for survey_type in &self.survey_types {
                for site in &self.sites {
                    let count = counts
                        .get(&(survey_type.clone(), site.clone(), date))
                        .copied()
                        .unwrap_or(0);
                    if count != 1 {
                        findings.push(Finding::IncompleteAssignment {
                            survey_type: survey_type.clone(),
                            site: site.clone(),
                            date,
                            count,
                        });
                    }
                }
            }
        }
    }

    /// Every scheduled day carries exactly sites x survey types slots
    fn check_daily_totals(&self, table: &ScheduleTable, findings: &mut Vec<Finding>) {
        let expected = self.sites.len() * self.survey_types.len();
        let mut totals: BTreeMap<NaiveDate, usize> = BTreeMap::new();
        for slot in table {
            *totals.entry(slot.day.date).or_default() += 1;
        }

        for (date, actual) in totals {
            if actual != expected {
                findings.push(Finding::DailyTotalMismatch { date, expected, actual });
            }
        }
    }

    /// Every holiday and festival day appears, unless the assigner skipped it
    fn check_mandatory_days(
        &self,
        table: &ScheduleTable,
        calendar: &[CalendarDay],
        skipped_dates: &BTreeSet<NaiveDate>,
        findings: &mut Vec<Finding>,
    ) {
        let scheduled: BTreeSet<NaiveDate> = table.dates().into_iter().collect();

        for day in calendar {
            let mandatory = matches!(day.day_type, DayType::Festival | DayType::Holiday);
            if mandatory && !scheduled.contains(&day.date) && !skipped_dates.contains(&day.date) {
                findings.push(Finding::MissingMandatoryDay {
                    date: day.date,
                    day_type: day.day_type,
                });
            }
        }
    }

    fn coverage(&self, table: &ScheduleTable, calendar: &[CalendarDay]) -> CoverageSummary {
        let day_types: BTreeMap<NaiveDate, DayType> =
            calendar.iter().map(|d| (d.date, d.day_type)).collect();

        let mut breakdown: BTreeMap<(String, u32, DayType), CoverageCell> = BTreeMap::new();
        let mut cell_days: BTreeMap<(String, u32, DayType), BTreeSet<NaiveDate>> = BTreeMap::new();

        for slot in table {
            let day_type = day_types
                .get(&slot.day.date)
                .copied()
                .unwrap_or(slot.day.day_type);
            let key = (slot.survey_type.clone(), slot.day.month_number(), day_type);

            breakdown.entry(key.clone()).or_default().total_slots += 1;
            cell_days.entry(key).or_default().insert(slot.day.date);
        }

        for (key, dates) in cell_days {
            if let Some(cell) = breakdown.get_mut(&key) {
                cell.unique_days = dates.len();
            }
        }

        CoverageSummary {
            period_days: calendar.len(),
            scheduled_days: table.dates().len(),
            breakdown,
        }
    }
}
