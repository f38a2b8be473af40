//! Stratum sizing policy and seeded day selection
//!
//! Each stratum contributes a number of days decided by the sizing policy:
//! festival and holiday strata are taken in full, weekend strata contribute
//! `base_samples_per_stratum` days, and weekday strata are oversampled by a
//! configurable factor. Selection within a stratum is uniform without
//! replacement, drawn from the run-wide seeded generator.

use rand::seq::index;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use super::strata::{Strata, StratumKey};
use crate::calendar::{CalendarDay, DayType};

/// A calendar day selected for scheduling, tagged with its source stratum
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SampledDay {
    /// The selected day
    pub day: CalendarDay,

    /// Stratum the day was drawn from
    pub stratum: StratumKey,
}

/// Draws days from each stratum per the sizing policy
///
/// Strata are visited in canonical key order so that a fixed seed consumes
/// the random stream identically on every run.
#[derive(Debug, Clone)]
pub struct DaySampler {
    base_samples: usize,
    oversample_factor: f64,
}

impl DaySampler {
    /// Create a sampler with the given sizing policy
    pub fn new(base_samples: usize, oversample_factor: f64) -> Self {
        Self {
            base_samples,
            oversample_factor,
        }
    }

    /// Number of days to select from a stratum, clamped to its population
    ///
    /// - Festival/Holiday: every day (100% inclusion)
    /// - Weekend: `base_samples`
    /// - Weekday: `ceil(base_samples x oversample_factor)`
    pub fn target_size(&self, day_type: DayType, population: usize) -> usize {
        let requested = match day_type {
            DayType::Festival | DayType::Holiday => population,
            DayType::Weekend => self.base_samples,
            DayType::Weekday => {
                (self.base_samples as f64 * self.oversample_factor).ceil() as usize
            }
        };
        requested.min(population)
    }

    /// Select days from every stratum
    ///
    /// Within a stratum the selection is uniform without replacement and the
    /// chosen days are returned in date order. An empty stratum yields an
    /// empty selection, never an error.
    pub fn sample(&self, strata: &Strata, rng: &mut ChaCha8Rng) -> Vec<SampledDay> {
        let mut sampled = Vec::new();

        for (key, days) in strata {
            let count = self.target_size(key.day_type, days.len());
            let mut chosen = index::sample(rng, days.len(), count).into_vec();
            chosen.sort_unstable();

            tracing::debug!(
                stratum = %key,
                population = days.len(),
                selected = count,
                "Stratum sampled"
            );

            sampled.extend(chosen.into_iter().map(|i| SampledDay {
                day: days[i].clone(),
                stratum: *key,
            }));
        }

        sampled
    }
}
