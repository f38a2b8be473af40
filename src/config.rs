//! Survey configuration, TOML loading, and validation
//!
//! All fatal configuration errors are caught here, before any sampling
//! begins: an inverted date range, an empty site or survey-type list, an
//! hour domain too small to host every concurrent slot, or a window that
//! would cross midnight.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::sampling::error::{SamplerError, SamplerResult};
use crate::sampling::HourDomain;

fn default_window_length() -> u32 {
    2
}

fn default_base_samples() -> usize {
    6
}

fn default_oversample_factor() -> f64 {
    1.5
}

fn default_seed() -> u64 {
    42
}

/// Main survey configuration
///
/// One instance describes a complete run: the survey period, day
/// classification overrides, the site and survey-type rosters, the hour
/// domain for observation windows, the stratum sizing policy, and the seed
/// that makes the whole run reproducible.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SurveyConfig {
    /// First day of the survey period (inclusive)
    pub start_date: NaiveDate,

    /// Last day of the survey period (inclusive)
    pub end_date: NaiveDate,

    /// Public holiday dates
    #[serde(default)]
    pub holidays: Vec<NaiveDate>,

    /// Special-event (festival) dates
    #[serde(default)]
    pub festivals: Vec<NaiveDate>,

    /// Ordered list of survey sites
    pub sites: Vec<String>,

    /// Ordered list of concurrent survey types
    pub survey_types: Vec<String>,

    /// Permissible start hours for observation windows
    #[serde(default)]
    pub hour_domain: HourDomain,

    /// Observation window duration in hours
    #[serde(default = "default_window_length")]
    pub window_length_hours: u32,

    /// Days selected per weekend stratum
    #[serde(default = "default_base_samples")]
    pub base_samples_per_stratum: usize,

    /// Weekday strata select `ceil(base x factor)` days
    #[serde(default = "default_oversample_factor")]
    pub oversample_factor: f64,

    /// Seed for the run-wide random stream
    #[serde(default = "default_seed")]
    pub random_seed: u64,
}

impl SurveyConfig {
    /// Create a configuration with default sizing policy and hour domain
    pub fn new(
        start_date: NaiveDate,
        end_date: NaiveDate,
        sites: Vec<String>,
        survey_types: Vec<String>,
    ) -> Self {
        Self {
            start_date,
            end_date,
            holidays: Vec::new(),
            festivals: Vec::new(),
            sites,
            survey_types,
            hour_domain: HourDomain::default(),
            window_length_hours: default_window_length(),
            base_samples_per_stratum: default_base_samples(),
            oversample_factor: default_oversample_factor(),
            random_seed: default_seed(),
        }
    }

    /// Set the holiday dates
    pub fn with_holidays(mut self, holidays: Vec<NaiveDate>) -> Self {
        self.holidays = holidays;
        self
    }

    /// Set the festival dates
    pub fn with_festivals(mut self, festivals: Vec<NaiveDate>) -> Self {
        self.festivals = festivals;
        self
    }

    /// Set the hour domain
    pub fn with_hour_domain(mut self, hour_domain: HourDomain) -> Self {
        self.hour_domain = hour_domain;
        self
    }

    /// Set the sizing policy
    pub fn with_sizing(mut self, base_samples: usize, oversample_factor: f64) -> Self {
        self.base_samples_per_stratum = base_samples;
        self.oversample_factor = oversample_factor;
        self
    }

    /// Set the random seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.random_seed = seed;
        self
    }

    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse TOML config file: {}", path.display()))?;

        Ok(config)
    }

    /// Number of slots required on every sampled day (sites x survey types)
    pub fn required_slots(&self) -> usize {
        self.sites.len() * self.survey_types.len()
    }

    /// Check all fatal configuration invariants
    pub fn validate(&self) -> SamplerResult<()> {
        if self.end_date < self.start_date {
            return Err(SamplerError::invalid_date_range(self.start_date, self.end_date));
        }
        if self.sites.is_empty() {
            return Err(SamplerError::EmptySites);
        }
        if self.survey_types.is_empty() {
            return Err(SamplerError::EmptySurveyTypes);
        }
        self.hour_domain.validate()?;
        if self.window_length_hours == 0 {
            return Err(SamplerError::invalid_sizing_policy(
                "window_length_hours",
                "must be at least 1",
            ));
        }
        // hour_domain.validate() above guarantees max_start_hour <= 23, so
        // the subtraction cannot underflow and the sum cannot overflow
        if self.window_length_hours > 24 - self.hour_domain.max_start_hour {
            return Err(SamplerError::window_past_midnight(
                self.hour_domain.max_start_hour,
                self.window_length_hours,
            ));
        }
        if self.oversample_factor <= 0.0 {
            return Err(SamplerError::invalid_sizing_policy(
                "oversample_factor",
                "must be positive",
            ));
        }
        if self.hour_domain.len() < self.required_slots() {
            return Err(SamplerError::hour_domain_too_small(
                self.hour_domain.len(),
                self.required_slots(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn base_config() -> SurveyConfig {
        SurveyConfig::new(
            d(2025, 5, 1),
            d(2025, 8, 31),
            vec!["North Trailhead".into(), "South Trailhead".into()],
            vec!["Observation".into(), "Interview".into()],
        )
    }

    #[test]
    fn test_defaults() {
        let config = base_config();
        assert_eq!(config.window_length_hours, 2);
        assert_eq!(config.base_samples_per_stratum, 6);
        assert_eq!(config.oversample_factor, 1.5);
        assert_eq!(config.hour_domain.min_start_hour, 6);
        assert_eq!(config.hour_domain.max_start_hour, 18);
    }

    #[test]
    fn test_validate_ok() {
        assert!(base_config().validate().is_ok());
    }

    #[test]
    fn test_validate_inverted_range() {
        let mut config = base_config();
        config.end_date = d(2025, 4, 1);
        assert!(matches!(
            config.validate(),
            Err(SamplerError::InvalidDateRange { .. })
        ));
    }

    #[test]
    fn test_validate_empty_sites() {
        let mut config = base_config();
        config.sites.clear();
        assert!(matches!(config.validate(), Err(SamplerError::EmptySites)));
    }

    #[test]
    fn test_validate_empty_survey_types() {
        let mut config = base_config();
        config.survey_types.clear();
        assert!(matches!(config.validate(), Err(SamplerError::EmptySurveyTypes)));
    }

    #[test]
    fn test_validate_hour_domain_too_small() {
        let mut config = base_config();
        // 3 start hours for 2 sites x 2 types = 4 required
        config.hour_domain = HourDomain::new(8, 10);
        assert!(matches!(
            config.validate(),
            Err(SamplerError::HourDomainTooSmall { available: 3, required: 4 })
        ));
    }

    #[test]
    fn test_validate_window_past_midnight() {
        let mut config = base_config();
        config.hour_domain = HourDomain::new(6, 23);
        assert!(matches!(
            config.validate(),
            Err(SamplerError::WindowPastMidnight { .. })
        ));
    }

    #[test]
    fn test_validate_huge_window_does_not_overflow() {
        let mut config = base_config();
        config.window_length_hours = u32::MAX;
        assert!(matches!(
            config.validate(),
            Err(SamplerError::WindowPastMidnight { .. })
        ));
    }

    #[test]
    fn test_validate_zero_window() {
        let mut config = base_config();
        config.window_length_hours = 0;
        assert!(matches!(
            config.validate(),
            Err(SamplerError::InvalidSizingPolicy { .. })
        ));
    }

    #[test]
    fn test_required_slots() {
        assert_eq!(base_config().required_slots(), 4);
    }

    #[test]
    fn test_toml_roundtrip() {
        let config = base_config().with_holidays(vec![d(2025, 5, 26)]).with_seed(7);
        let toml_str = toml::to_string(&config).unwrap();
        let parsed: SurveyConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.random_seed, 7);
        assert_eq!(parsed.holidays, vec![d(2025, 5, 26)]);
        assert_eq!(parsed.sites, config.sites);
    }

    #[test]
    fn test_toml_minimal_uses_defaults() {
        let toml_str = r#"
            start_date = "2025-05-01"
            end_date = "2025-06-30"
            sites = ["A"]
            survey_types = ["Observation"]
        "#;
        let parsed: SurveyConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(parsed.base_samples_per_stratum, 6);
        assert_eq!(parsed.random_seed, 42);
        assert!(parsed.validate().is_ok());
    }
}
