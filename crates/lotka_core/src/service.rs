//! Service-boundary types and the one-call entry point.
//!
//! The HTTP wrapper itself lives outside this crate; it deserializes a
//! [`SimulationRequest`], calls [`run_simulation`], and maps any
//! [`SimulationError`] to a client-error payload using its `Display` output.

use serde::{Deserialize, Serialize};

use crate::error::SimulationError;
use crate::model::ModelPair;
use crate::sample::{filter_finite, SampleRecord};
use crate::solvers::{integrate, ClampPolicy, Method, SimulationConfig};

/// One simulation request as posted by a client.
///
/// `method` and `clamp` are optional; absent fields select the production
/// variant (RK4, floor-at-zero).
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SimulationRequest {
    pub prey_equation: String,
    pub predator_equation: String,
    pub initial_prey_population: f64,
    pub initial_predator_population: f64,
    pub time_step: f64,
    pub start_time: f64,
    pub final_time: f64,
    #[serde(default)]
    pub method: Method,
    #[serde(default)]
    pub clamp: ClampPolicy,
}

/// One rendered trajectory point. Derivatives are internal to the core and
/// are not exposed here.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SimulationPoint {
    pub time: f64,
    pub prey_population: f64,
    pub predator_population: f64,
}

impl From<SampleRecord> for SimulationPoint {
    fn from(sample: SampleRecord) -> Self {
        Self {
            time: sample.time,
            prey_population: sample.prey_population,
            predator_population: sample.predator_population,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimulationResponse {
    pub simulation_data: Vec<SimulationPoint>,
}

/// Parses both equations, validates the configuration, integrates, and
/// filters non-finite points.
pub fn run_simulation(request: &SimulationRequest) -> Result<SimulationResponse, SimulationError> {
    let models = ModelPair::from_equations(&request.prey_equation, &request.predator_equation)?;
    let config = SimulationConfig {
        initial_prey: request.initial_prey_population,
        initial_predator: request.initial_predator_population,
        time_step: request.time_step,
        start_time: request.start_time,
        final_time: request.final_time,
        method: request.method,
        clamp: request.clamp,
    };

    let samples = integrate(&config, &models)?;
    let samples = filter_finite(samples)?;

    Ok(SimulationResponse {
        simulation_data: samples.into_iter().map(SimulationPoint::from).collect(),
    })
}
