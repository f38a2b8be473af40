//! Top-level schedule planner
//!
//! The planner owns the single seeded random generator and threads it through
//! the pipeline in a fixed order: per stratum in canonical order, the
//! day-selection draw; then per sampled day in date order, the hour draw
//! followed by the permutation draw. The same seed and configuration always
//! produce byte-identical output.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use super::assembler::{ScheduleAssembler, ScheduleTable};
use super::day_sampler::DaySampler;
use super::slot_assigner::{SkippedDay, SlotAssigner};
use super::strata::stratify;
use super::verifier::{VerificationReport, Verifier};
use crate::calendar::{CalendarBuilder, CalendarDay};
use crate::config::SurveyConfig;
use crate::error::Result;

/// Everything one planning run produces
#[derive(Debug, Clone)]
pub struct PlanOutcome {
    /// The full classified calendar for the survey period
    pub calendar: Vec<CalendarDay>,

    /// Combined schedule, ordered
    pub table: ScheduleTable,

    /// One filtered table per survey type, in declaration order
    pub per_survey: Vec<(String, ScheduleTable)>,

    /// Sampled days dropped for lack of distinct start hours
    pub skipped: Vec<SkippedDay>,

    /// Structural verification of the combined table
    pub report: VerificationReport,
}

/// Runs the whole pipeline for one validated configuration
#[derive(Debug, Clone)]
pub struct SchedulePlanner {
    config: SurveyConfig,
}

impl SchedulePlanner {
    /// Create a planner, rejecting invalid configurations up front
    pub fn new(config: SurveyConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// The validated configuration
    pub fn config(&self) -> &SurveyConfig {
        &self.config
    }

    /// Generate the schedule
    pub fn generate(&self) -> Result<PlanOutcome> {
        let config = &self.config;

        tracing::info!(
            start = %config.start_date,
            end = %config.end_date,
            sites = config.sites.len(),
            survey_types = config.survey_types.len(),
            seed = config.random_seed,
            "Planning survey schedule"
        );

        let calendar = CalendarBuilder::new(config.start_date, config.end_date)
            .with_holidays(config.holidays.iter().copied())
            .with_festivals(config.festivals.iter().copied())
            .build()?;

        let strata = stratify(&calendar);
        tracing::info!(days = calendar.len(), strata = strata.len(), "Calendar stratified");

        let mut rng = ChaCha8Rng::seed_from_u64(config.random_seed);

        let sampler = DaySampler::new(config.base_samples_per_stratum, config.oversample_factor);
        let sampled = sampler.sample(&strata, &mut rng);
        tracing::info!(sampled = sampled.len(), "Days sampled");

        let assigner = SlotAssigner::new(
            config.sites.clone(),
            config.survey_types.clone(),
            config.hour_domain,
            config.window_length_hours,
        );
        let assignment = assigner.assign(&sampled, &mut rng);
        tracing::info!(
            slots = assignment.slots.len(),
            skipped = assignment.skipped.len(),
            "Slots assigned"
        );

        let assembler = ScheduleAssembler::new(config.survey_types.clone());
        let table = assembler.assemble(assignment.slots);
        let per_survey = assembler.per_survey(&table);

        let skipped_dates = assignment.skipped.iter().map(|s| s.date).collect();
        let verifier = Verifier::new(config.sites.clone(), config.survey_types.clone());
        let report = verifier.verify(&table, &calendar, &skipped_dates);

        Ok(PlanOutcome {
            calendar,
            table,
            per_survey,
            skipped: assignment.skipped,
            report,
        })
    }
}
