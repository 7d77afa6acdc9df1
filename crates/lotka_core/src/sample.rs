//! Emitted samples, the non-finite result filter, and table rendering.

use serde::{Deserialize, Serialize};

use crate::error::SimulationError;

/// One emitted integration sample, immutable after creation.
///
/// The derivatives describe the slope *leaving* the recorded state, not the
/// slope that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SampleRecord {
    pub time: f64,
    pub prey_population: f64,
    pub predator_population: f64,
    pub prey_derivative: f64,
    pub predator_derivative: f64,
}

impl SampleRecord {
    /// True when both populations are finite. Derivatives are not inspected;
    /// only the recorded state is rendered downstream.
    pub fn is_finite(&self) -> bool {
        self.prey_population.is_finite() && self.predator_population.is_finite()
    }
}

/// Drops samples with non-finite populations, preserving time order.
///
/// Divergence is detected here as a post-pass, never mid-run. Fails only
/// when nothing survives.
pub fn filter_finite(samples: Vec<SampleRecord>) -> Result<Vec<SampleRecord>, SimulationError> {
    let filtered: Vec<SampleRecord> = samples.into_iter().filter(SampleRecord::is_finite).collect();
    if filtered.is_empty() {
        return Err(SimulationError::AllSamplesInvalid);
    }
    Ok(filtered)
}

/// Renders samples as the console table:
/// time to two decimal places, populations and derivatives to four.
pub fn format_table(samples: &[SampleRecord]) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "{:>8} {:>12} {:>12} {:>12} {:>12}\n",
        "Time", "Prey", "ΔPrey", "Predator", "ΔPredator"
    ));
    for sample in samples {
        out.push_str(&format!(
            "{:>8.2} {:>12.4} {:>12.4} {:>12.4} {:>12.4}\n",
            sample.time,
            sample.prey_population,
            sample.prey_derivative,
            sample.predator_population,
            sample.predator_derivative,
        ));
    }
    out
}
