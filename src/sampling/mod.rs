//! Stratified day sampling and slot assignment
//!
//! # Overview
//!
//! This module is the core of the crate: it turns a classified calendar into
//! a verified survey schedule.
//!
//! The pipeline runs in five stages:
//!
//! 1. **Stratification** ([`strata`]) - partition the calendar into
//!    (month, day-type) strata.
//! 2. **Day sampling** ([`day_sampler`]) - draw days from each stratum per
//!    the sizing policy (holidays and festivals in full, weekdays
//!    oversampled relative to weekends).
//! 3. **Slot assignment** ([`slot_assigner`]) - give every (site,
//!    survey-type) pair a distinct start hour on each sampled day.
//! 4. **Assembly** ([`assembler`]) - flatten and sort into frozen tables.
//! 5. **Verification** ([`verifier`]) - re-check every structural property
//!    of the finished schedule.
//!
//! [`SchedulePlanner`] orchestrates all five stages and owns the single
//! seeded generator, so a fixed seed reproduces the schedule exactly.

pub mod assembler;
pub mod day_sampler;
pub mod error;
pub mod planner;
pub mod slot_assigner;
pub mod strata;
pub mod verifier;

pub use assembler::{ScheduleAssembler, ScheduleTable};
pub use day_sampler::{DaySampler, SampledDay};
pub use error::{SamplerError, SamplerResult};
pub use planner::{PlanOutcome, SchedulePlanner};
pub use slot_assigner::{AssignmentOutcome, HourDomain, SkippedDay, SlotAssigner, SurveySlot};
pub use strata::{stratify, Strata, StratumKey};
pub use verifier::{CoverageSummary, Finding, VerificationReport, Verifier};
