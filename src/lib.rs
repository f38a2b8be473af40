//! fieldplan - Stratified Field-Survey Sampling Scheduler
//!
//! Generates reproducible sampling schedules for multi-month, multi-site field
//! surveys: calendar days are stratified by (month, day-type), a subset of days
//! is drawn from each stratum under a configurable sizing policy, and each
//! sampled day receives non-overlapping observation windows for every
//! (site, survey-type) pair.
//!
//! # Architecture
//!
//! The library is organized into several modules:
//!
//! - [`config`] - Survey configuration, TOML loading, and validation
//! - [`calendar`] - Date-range enumeration and day-type classification
//! - [`sampling`] - The sampling pipeline: strata, day sampler, slot assigner,
//!   assembler, verifier, and the top-level planner
//! - [`export`] - Table rendering and CSV output
//! - [`error`] - Unified error type
//!
//! # Example
//!
//! ```no_run
//! use fieldplan::config::SurveyConfig;
//! use fieldplan::sampling::SchedulePlanner;
//!
//! fn main() -> anyhow::Result<()> {
//!     let config = SurveyConfig::from_file("survey.toml".as_ref())?;
//!     let planner = SchedulePlanner::new(config)?;
//!     let outcome = planner.generate()?;
//!     println!("{}", outcome.report.display());
//!     Ok(())
//! }
//! ```

pub mod calendar;
pub mod config;
pub mod error;
pub mod export;
pub mod sampling;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::calendar::{CalendarBuilder, CalendarDay, DayType};
    pub use crate::config::SurveyConfig;
    pub use crate::error::{Error, Result};
    pub use crate::sampling::{
        PlanOutcome, SchedulePlanner, ScheduleTable, SurveySlot, VerificationReport,
    };
}

// Direct re-exports for convenience
pub use calendar::{CalendarDay, DayType};
pub use config::SurveyConfig;
pub use sampling::{PlanOutcome, SchedulePlanner};
