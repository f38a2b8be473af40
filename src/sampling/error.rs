//! Error types for the sampling pipeline

use std::fmt;

/// Result type for sampling operations
pub type SamplerResult<T> = Result<T, SamplerError>;

/// Sampling-specific errors
///
/// These are the fatal, pre-sampling failures of the pipeline. Per-day
/// conditions (a date whose hour domain cannot host every required slot)
/// are not errors; they are recorded as [`SkippedDay`] warnings and the
/// run continues.
///
/// [`SkippedDay`]: super::slot_assigner::SkippedDay
#[derive(Debug)]
pub enum SamplerError {
    /// Survey period end date precedes the start date
    InvalidDateRange {
        start: String,
        end: String,
    },

    /// No sites configured
    EmptySites,

    /// No survey types configured
    EmptySurveyTypes,

    /// Hour domain cannot host one slot per (site, survey-type) pair
    HourDomainTooSmall {
        available: usize,
        required: usize,
    },

    /// Hour domain bounds are inverted
    InvalidHourDomain {
        min_start_hour: u32,
        max_start_hour: u32,
    },

    /// A window starting at the latest permissible hour would cross midnight
    WindowPastMidnight {
        max_start_hour: u32,
        window_length_hours: u32,
    },

    /// Sizing-policy parameter out of range
    InvalidSizingPolicy {
        field: String,
        reason: String,
    },
}

impl fmt::Display for SamplerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidDateRange { start, end } => {
                write!(f, "Invalid survey period: end date {} precedes start date {}", end, start)
            }
            Self::EmptySites => {
                write!(f, "At least one survey site must be configured")
            }
            Self::EmptySurveyTypes => {
                write!(f, "At least one survey type must be configured")
            }
            Self::HourDomainTooSmall { available, required } => {
                write!(
                    f,
                    "Hour domain has {} start hours but {} are required (sites x survey types)",
                    available, required
                )
            }
            Self::InvalidHourDomain { min_start_hour, max_start_hour } => {
                write!(
                    f,
                    "Invalid hour domain: min start hour {} exceeds max start hour {}",
                    min_start_hour, max_start_hour
                )
            }
            Self::WindowPastMidnight { max_start_hour, window_length_hours } => {
                write!(
                    f,
                    "A {}h window starting at {}:00 would end past midnight",
                    window_length_hours, max_start_hour
                )
            }
            Self::InvalidSizingPolicy { field, reason } => {
                write!(f, "Invalid sizing policy '{}': {}", field, reason)
            }
        }
    }
}

impl std::error::Error for SamplerError {}

impl SamplerError {
    /// Create an invalid date range error
    pub fn invalid_date_range(start: impl fmt::Display, end: impl fmt::Display) -> Self {
        Self::InvalidDateRange {
            start: start.to_string(),
            end: end.to_string(),
        }
    }

    /// Create an hour-domain-too-small error
    pub fn hour_domain_too_small(available: usize, required: usize) -> Self {
        Self::HourDomainTooSmall { available, required }
    }

    /// Create an invalid hour domain error
    pub fn invalid_hour_domain(min_start_hour: u32, max_start_hour: u32) -> Self {
        Self::InvalidHourDomain {
            min_start_hour,
            max_start_hour,
        }
    }

    /// Create a window-past-midnight error
    pub fn window_past_midnight(max_start_hour: u32, window_length_hours: u32) -> Self {
        Self::WindowPastMidnight {
            max_start_hour,
            window_length_hours,
        }
    }

    /// Create a sizing policy error
    pub fn invalid_sizing_policy(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidSizingPolicy {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_date_range_display() {
        let err = SamplerError::invalid_date_range("2025-06-01", "2025-05-01");
        assert!(err.to_string().contains("2025-06-01"));
        assert!(err.to_string().contains("precedes"));
    }

    #[test]
    fn test_hour_domain_too_small_display() {
        let err = SamplerError::hour_domain_too_small(3, 4);
        assert!(err.to_string().contains('3'));
        assert!(err.to_string().contains('4'));
    }

    #[test]
    fn test_window_past_midnight_display() {
        let err = SamplerError::window_past_midnight(23, 2);
        assert!(err.to_string().contains("23:00"));
        assert!(err.to_string().contains("midnight"));
    }
}
