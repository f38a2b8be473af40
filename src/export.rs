//! Table rendering and CSV output
//!
//! Rows are rendered with human-facing fields: a "Month Day Year" date, the
//! weekday and month names, the day classification, and 12-hour clock times.
//! The combined CSV carries a survey-type column; per-survey files omit it
//! because the file itself identifies the survey.

use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::sampling::{ScheduleTable, SurveySlot};

// ============================================================================
// Time Formatting
// ============================================================================

/// Render an hour on the 12-hour clock, e.g. `13` -> `"1:00 PM"`
///
/// Hours 0 and 12 render as `12:00` with the matching meridiem, so a window
/// ending at hour 24 reads "12:00 AM".
pub fn format_hour_12(hour: u32) -> String {
    let h = hour % 24;
    match h {
        0 => "12:00 AM".to_string(),
        12 => "12:00 PM".to_string(),
        1..=11 => format!("{}:00 AM", h),
        _ => format!("{}:00 PM", h - 12),
    }
}

// ============================================================================
// Rows
// ============================================================================

/// One row of the combined schedule CSV
#[derive(Debug, Clone, Serialize)]
pub struct CombinedRow {
    pub survey_type: String,
    pub site: String,
    pub date: String,
    pub weekday: String,
    pub month: String,
    pub day_type: String,
    pub start_time: String,
    pub end_time: String,
}

/// One row of a per-survey CSV (the file names the survey type)
#[derive(Debug, Clone, Serialize)]
pub struct SurveyRow {
    pub site: String,
    pub date: String,
    pub weekday: String,
    pub month: String,
    pub day_type: String,
    pub start_time: String,
    pub end_time: String,
}

impl CombinedRow {
    /// Render a slot as a combined-table row
    pub fn from_slot(slot: &SurveySlot) -> Self {
        Self {
            survey_type: slot.survey_type.clone(),
            site: slot.site.clone(),
            date: slot.day.date_label(),
            weekday: slot.day.weekday_name(),
            month: slot.day.month_label(),
            day_type: slot.day.day_type.label().to_string(),
            start_time: format_hour_12(slot.start_hour),
            end_time: format_hour_12(slot.end_hour),
        }
    }
}

impl SurveyRow {
    /// Render a slot as a per-survey row
    pub fn from_slot(slot: &SurveySlot) -> Self {
        Self {
            site: slot.site.clone(),
            date: slot.day.date_label(),
            weekday: slot.day.weekday_name(),
            month: slot.day.month_label(),
            day_type: slot.day.day_type.label().to_string(),
            start_time: format_hour_12(slot.start_hour),
            end_time: format_hour_12(slot.end_hour),
        }
    }
}

// ============================================================================
// CSV Export
// ============================================================================

/// Write the combined table as CSV
pub fn write_combined_csv(table: &ScheduleTable, path: &Path) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    for slot in table {
        writer.serialize(CombinedRow::from_slot(slot))?;
    }
    writer.flush()?;
    tracing::info!(path = %path.display(), rows = table.len(), "Combined schedule written");
    Ok(())
}

/// Write one per-survey table as CSV (no survey-type column)
pub fn write_survey_csv(table: &ScheduleTable, path: &Path) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    for slot in table {
        writer.serialize(SurveyRow::from_slot(slot))?;
    }
    writer.flush()?;
    tracing::info!(path = %path.display(), rows = table.len(), "Survey schedule written");
    Ok(())
}

/// File-name-safe form of a survey-type label
fn slug(label: &str) -> String {
    label
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_lowercase()
            } else {
                '_'
            }
        })
        .collect()
}

/// Write the combined CSV plus one CSV per survey type into a directory
///
/// Returns the paths written, combined file first.
pub fn write_schedule_csvs(
    table: &ScheduleTable,
    per_survey: &[(String, ScheduleTable)],
    output_dir: &Path,
) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(output_dir)?;

    let mut written = Vec::with_capacity(per_survey.len() + 1);

    let combined_path = output_dir.join("schedule.csv");
    write_combined_csv(table, &combined_path)?;
    written.push(combined_path);

    for (survey_type, sub_table) in per_survey {
        let path = output_dir.join(format!("schedule_{}.csv", slug(survey_type)));
        write_survey_csv(sub_table, &path)?;
        written.push(path);
    }

    Ok(written)
}

// ============================================================================
// Console Preview
// ============================================================================

/// Render the first rows of the combined table for the console
pub fn render_preview(table: &ScheduleTable, limit: usize) -> String {
    let mut out = String::new();
    out.push_str(&format!("{} scheduled slots\n", table.len()));

    for slot in table.slots().iter().take(limit) {
        let row = CombinedRow::from_slot(slot);
        out.push_str(&format!(
            "  {} | {} ({}) | {} | {} - {} | {}\n",
            row.date, row.weekday, row.day_type, row.site, row.start_time, row.end_time,
            row.survey_type
        ));
    }

    if table.len() > limit {
        out.push_str(&format!("  ... {} more rows\n", table.len() - limit));
    }

    out
}
