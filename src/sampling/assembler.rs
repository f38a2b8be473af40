//! Assembly of per-day assignments into frozen schedule tables
//!
//! The assembler is pure and deterministic: collect every slot, sort once,
//! freeze. The combined table orders rows by (date, site, start hour,
//! survey-type declaration order); per-survey tables are filtered views of
//! the same ordering, one per configured survey type.

use serde::Serialize;
use std::collections::BTreeSet;

use super::slot_assigner::SurveySlot;
use chrono::NaiveDate;

// ============================================================================
// Schedule Table
// ============================================================================

/// A frozen, ordered sequence of survey slots
///
/// Built once by the assembler and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScheduleTable {
    slots: Vec<SurveySlot>,
}

impl ScheduleTable {
    fn new(slots: Vec<SurveySlot>) -> Self {
        Self { slots }
    }

    /// Rows in table order
    pub fn slots(&self) -> &[SurveySlot] {
        &self.slots
    }

    /// Number of rows
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// True when the table holds no rows
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Distinct dates covered by the table, ascending
    pub fn dates(&self) -> Vec<NaiveDate> {
        let dates: BTreeSet<NaiveDate> = self.slots.iter().map(|s| s.day.date).collect();
        dates.into_iter().collect()
    }
}

impl<'a> IntoIterator for &'a ScheduleTable {
    type Item = &'a SurveySlot;
    type IntoIter = std::slice::Iter<'a, SurveySlot>;

    fn into_iter(self) -> Self::IntoIter {
        self.slots.iter()
    }
}

// ============================================================================
// Schedule Assembler
// ============================================================================

/// Merges assigned slots into combined and per-survey tables
///
/// Holds the survey-type roster so that rows tie-break on declaration order
/// rather than on alphabetical order.
#[derive(Debug, Clone)]
pub struct ScheduleAssembler {
    survey_types: Vec<String>,
}

impl ScheduleAssembler {
    /// Create an assembler for the given survey-type roster
    pub fn new(survey_types: Vec<String>) -> Self {
        Self { survey_types }
    }

    fn type_index(&self, survey_type: &str) -> usize {
        self.survey_types
            .iter()
            .position(|t| t == survey_type)
            .unwrap_or(self.survey_types.len())
    }

    /// Build the combined table: sort by date, site, start hour, then
    /// survey-type declaration order
    pub fn assemble(&self, mut slots: Vec<SurveySlot>) -> ScheduleTable {
        slots.sort_by(|a, b| {
            a.day
                .date
                .cmp(&b.day.date)
                .then_with(|| a.site.cmp(&b.site))
                .then_with(|| a.start_hour.cmp(&b.start_hour))
                .then_with(|| self.type_index(&a.survey_type).cmp(&self.type_index(&b.survey_type)))
        });
        ScheduleTable::new(slots)
    }

    /// Split a combined table into one table per configured survey type,
    /// in declaration order
    pub fn per_survey(&self, table: &ScheduleTable) -> Vec<(String, ScheduleTable)> {
        self.survey_types
            .iter()
            .map(|survey_type| {
                let slots = table
                    .slots()
                    .iter()
                    .filter(|s| &s.survey_type == survey_type)
                    .cloned()
                    .collect();
                (survey_type.clone(), ScheduleTable::new(slots))
            })
            .collect()
    }
}
