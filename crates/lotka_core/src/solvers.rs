//! Fixed-step integrators over a `ModelPair`.
//!
//! Both schemes share one step contract: compute the slope leaving the
//! current state, emit a sample carrying that state and slope, apply the
//! update `populations += slope * h` (clamped per policy), advance time.
//! The scheme only decides what the slope is: the instantaneous derivative
//! for forward Euler, the classical 4-stage weighted average for RK4.

use nalgebra::Vector2;
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, SimulationError};
use crate::model::ModelPair;
use crate::sample::SampleRecord;

/// Integration scheme, selected by configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Method {
    ForwardEuler,
    #[default]
    RungeKutta4,
}

/// Whether populations are floored at zero after each update.
///
/// The production variant clamps; the unclamped variant lets populations go
/// negative or diverge unboundedly. One explicit flag for both schemes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ClampPolicy {
    Unclamped,
    #[default]
    FloorAtZero,
}

impl ClampPolicy {
    fn apply(self, populations: Vector2<f64>) -> Vector2<f64> {
        match self {
            ClampPolicy::Unclamped => populations,
            ClampPolicy::FloorAtZero => {
                Vector2::new(populations.x.max(0.0), populations.y.max(0.0))
            }
        }
    }
}

/// Parameters of one simulation run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    pub initial_prey: f64,
    pub initial_predator: f64,
    pub time_step: f64,
    pub start_time: f64,
    pub final_time: f64,
    pub method: Method,
    pub clamp: ClampPolicy,
}

impl SimulationConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.initial_prey <= 0.0 || self.initial_predator <= 0.0 {
            return Err(ConfigError::NonPositivePopulation {
                prey: self.initial_prey,
                predator: self.initial_predator,
            });
        }
        if self.time_step <= 0.0 {
            return Err(ConfigError::NonPositiveTimeStep(self.time_step));
        }
        if self.start_time < 0.0 {
            return Err(ConfigError::NegativeStartTime(self.start_time));
        }
        if self.final_time <= self.start_time {
            return Err(ConfigError::FinalTimeNotAfterStart {
                start_time: self.start_time,
                final_time: self.final_time,
            });
        }
        Ok(())
    }
}

// --- Schemes ---

/// A fixed-step scheme: the update slope leaving `populations`.
pub trait Scheme {
    fn slope(&self, models: &ModelPair, populations: Vector2<f64>, h: f64) -> Vector2<f64>;
}

/// Explicit Euler: the slope is the instantaneous derivative itself.
pub struct ForwardEuler;

impl Scheme for ForwardEuler {
    fn slope(&self, models: &ModelPair, populations: Vector2<f64>, _h: f64) -> Vector2<f64> {
        models.derivatives(populations)
    }
}

/// Classical 4th-order Runge-Kutta. Both species are evaluated at identical
/// intermediate states each stage.
pub struct RungeKutta4;

impl Scheme for RungeKutta4 {
    fn slope(&self, models: &ModelPair, populations: Vector2<f64>, h: f64) -> Vector2<f64> {
        let k1 = models.derivatives(populations);
        let k2 = models.derivatives(populations + k1 * (0.5 * h));
        let k3 = models.derivatives(populations + k2 * (0.5 * h));
        let k4 = models.derivatives(populations + k3 * h);
        (k1 + k2 * 2.0 + k3 * 2.0 + k4) / 6.0
    }
}

// --- Integrator ---

/// Mutable run state, owned exclusively by the active integrator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntegratorState {
    pub time: f64,
    /// `x` = prey, `y` = predator.
    pub populations: Vector2<f64>,
}

/// Steps a model pair from the start time until a sample at or past the
/// final time has been emitted.
pub struct Integrator<S: Scheme> {
    scheme: S,
    models: ModelPair,
    state: IntegratorState,
    time_step: f64,
    final_time: f64,
    clamp: ClampPolicy,
    last_emitted: Option<f64>,
}

impl<S: Scheme> Integrator<S> {
    pub fn new(
        config: &SimulationConfig,
        models: ModelPair,
        scheme: S,
    ) -> Result<Self, SimulationError> {
        config.validate()?;
        Ok(Self {
            scheme,
            models,
            state: IntegratorState {
                time: config.start_time,
                populations: Vector2::new(config.initial_prey, config.initial_predator),
            },
            time_step: config.time_step,
            final_time: config.final_time,
            clamp: config.clamp,
            last_emitted: None,
        })
    }

    pub fn state(&self) -> &IntegratorState {
        &self.state
    }

    /// One step: slope at the current state, emit the sample for that state,
    /// apply the update, advance time.
    pub fn step(&mut self) -> SampleRecord {
        let slope = self
            .scheme
            .slope(&self.models, self.state.populations, self.time_step);
        let record = SampleRecord {
            time: self.state.time,
            prey_population: self.state.populations.x,
            predator_population: self.state.populations.y,
            prey_derivative: slope.x,
            predator_derivative: slope.y,
        };

        self.state.populations = self
            .clamp
            .apply(self.state.populations + slope * self.time_step);
        self.state.time += self.time_step;
        self.last_emitted = Some(record.time);

        record
    }

    /// True once a sample at or past the final time has been emitted. The
    /// final sample may overshoot the final time by up to one step; there is
    /// no interpolation onto it.
    pub fn is_terminal(&self) -> bool {
        self.last_emitted.is_some_and(|t| t >= self.final_time)
    }

    /// Runs to termination. The sample count is the closed form
    /// `ceil((final_time - start_time) / time_step) + 1`.
    pub fn run(&mut self) -> Vec<SampleRecord> {
        let capacity =
            ((self.final_time - self.state.time) / self.time_step).ceil() as usize + 1;
        let mut samples = Vec::with_capacity(capacity);
        while !self.is_terminal() {
            samples.push(self.step());
        }
        samples
    }
}

/// Runs a full simulation with the scheme named in the configuration.
pub fn integrate(
    config: &SimulationConfig,
    models: &ModelPair,
) -> Result<Vec<SampleRecord>, SimulationError> {
    match config.method {
        Method::ForwardEuler => Ok(Integrator::new(config, *models, ForwardEuler)?.run()),
        Method::RungeKutta4 => Ok(Integrator::new(config, *models, RungeKutta4)?.run()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConfigError;

    fn classic_pair() -> ModelPair {
        ModelPair::from_equations("3R-1.4RF", "-F+0.8RF").expect("equations should pair")
    }

    /// Pure exponential growth/decay: interaction rate zero on both sides.
    fn exponential_pair() -> ModelPair {
        ModelPair::from_equations("0.5R+0RF", "-0.5F+0RF").expect("equations should pair")
    }

    fn config(method: Method, time_step: f64, final_time: f64) -> SimulationConfig {
        SimulationConfig {
            initial_prey: 1.0,
            initial_predator: 1.0,
            time_step,
            start_time: 0.0,
            final_time,
            method,
            clamp: ClampPolicy::FloorAtZero,
        }
    }

    #[test]
    fn euler_matches_hand_computed_scenario() {
        let cfg = config(Method::ForwardEuler, 0.5, 1.0);
        let samples = integrate(&cfg, &classic_pair()).expect("run should succeed");

        assert_eq!(samples.len(), 3);

        assert_eq!(samples[0].time, 0.0);
        assert!((samples[0].prey_population - 1.0).abs() < 1e-12);
        assert!((samples[0].predator_population - 1.0).abs() < 1e-12);
        assert!((samples[0].prey_derivative - 1.6).abs() < 1e-12);
        assert!((samples[0].predator_derivative + 0.2).abs() < 1e-12);

        assert!((samples[1].time - 0.5).abs() < 1e-12);
        assert!((samples[1].prey_population - 1.8).abs() < 1e-12);
        assert!((samples[1].predator_population - 0.9).abs() < 1e-12);
        assert!((samples[1].prey_derivative - 3.132).abs() < 1e-12);
        assert!((samples[1].predator_derivative - 0.396).abs() < 1e-12);

        assert!((samples[2].time - 1.0).abs() < 1e-12);
        assert!((samples[2].prey_population - 3.366).abs() < 1e-12);
        assert!((samples[2].predator_population - 1.098).abs() < 1e-12);
    }

    #[test]
    fn sample_count_matches_closed_form() {
        // Final time not on the step grid: the last sample overshoots.
        let cfg = config(Method::ForwardEuler, 0.5, 1.2);
        let samples = integrate(&cfg, &classic_pair()).unwrap();
        assert_eq!(samples.len(), 4); // ceil(1.2 / 0.5) + 1
        assert!((samples.last().unwrap().time - 1.5).abs() < 1e-12);
    }

    #[test]
    fn times_increase_by_exactly_one_step() {
        // Dyadic step, so accumulated times are exact.
        let cfg = config(Method::RungeKutta4, 0.25, 2.0);
        let samples = integrate(&cfg, &classic_pair()).unwrap();
        for pair in samples.windows(2) {
            assert!(pair[1].time > pair[0].time);
            assert_eq!(pair[1].time - pair[0].time, 0.25);
        }
        assert_eq!(samples.last().unwrap().time, 2.0);
    }

    #[test]
    fn step_and_is_terminal_drive_the_same_loop_as_run() {
        let cfg = config(Method::RungeKutta4, 0.5, 1.0);
        let models = classic_pair();

        let mut manual = Integrator::new(&cfg, models, RungeKutta4).unwrap();
        assert!(!manual.is_terminal());
        let mut count = 0;
        while !manual.is_terminal() {
            manual.step();
            count += 1;
        }

        let ran = integrate(&cfg, &models).unwrap();
        assert_eq!(count, ran.len());
    }

    #[test]
    fn zero_interaction_reduces_to_exponential_euler() {
        let h = 1.0 / 64.0;
        let cfg = config(Method::ForwardEuler, h, 1.0);
        let samples = integrate(&cfg, &exponential_pair()).unwrap();

        let last = samples.last().unwrap();
        assert_eq!(last.time, 1.0);
        // First-order method: error bound O(h).
        assert!((last.prey_population - 0.5_f64.exp()).abs() < 0.01);
        assert!((last.predator_population - (-0.5_f64).exp()).abs() < 0.01);
    }

    #[test]
    fn zero_interaction_reduces_to_exponential_rk4() {
        let h = 1.0 / 64.0;
        let cfg = config(Method::RungeKutta4, h, 1.0);
        let samples = integrate(&cfg, &exponential_pair()).unwrap();

        let last = samples.last().unwrap();
        assert_eq!(last.time, 1.0);
        assert!((last.prey_population - 0.5_f64.exp()).abs() < 1e-8);
        assert!((last.predator_population - (-0.5_f64).exp()).abs() < 1e-8);
    }

    /// Error at t = 1 against the exact exponential, per method and step.
    fn final_error(method: Method, h: f64) -> f64 {
        let cfg = config(method, h, 1.0);
        let samples = integrate(&cfg, &exponential_pair()).unwrap();
        let last = samples.last().unwrap();
        assert_eq!(last.time, 1.0, "step sizes must land exactly on t=1");
        (last.prey_population - 0.5_f64.exp()).abs()
    }

    #[test]
    fn rk4_error_shrinks_faster_than_euler_under_halving() {
        let steps = [0.25, 0.125, 0.0625];

        let euler: Vec<f64> = steps
            .iter()
            .map(|&h| final_error(Method::ForwardEuler, h))
            .collect();
        let rk4: Vec<f64> = steps
            .iter()
            .map(|&h| final_error(Method::RungeKutta4, h))
            .collect();

        for i in 0..steps.len() - 1 {
            let euler_ratio = euler[i] / euler[i + 1];
            let rk4_ratio = rk4[i] / rk4[i + 1];
            assert!(
                euler_ratio > 1.5 && euler_ratio < 2.5,
                "Euler halving ratio should be ~2, got {euler_ratio}"
            );
            assert!(
                rk4_ratio > 8.0 && rk4_ratio < 32.0,
                "RK4 halving ratio should be ~16, got {rk4_ratio}"
            );
            assert!(rk4_ratio > euler_ratio);
        }
        for i in 0..steps.len() {
            assert!(
                rk4[i] < euler[i] / 100.0,
                "RK4 error {} should be far below Euler error {}",
                rk4[i],
                euler[i]
            );
        }
    }

    #[test]
    fn clamp_policy_floors_populations_at_zero() {
        let models =
            ModelPair::from_equations("-5R+0RF", "-1F+0RF").expect("equations should pair");

        let mut cfg = config(Method::ForwardEuler, 1.0, 1.0);
        cfg.clamp = ClampPolicy::FloorAtZero;
        let clamped = integrate(&cfg, &models).unwrap();
        assert_eq!(clamped.last().unwrap().prey_population, 0.0);

        cfg.clamp = ClampPolicy::Unclamped;
        let unclamped = integrate(&cfg, &models).unwrap();
        assert_eq!(unclamped.last().unwrap().prey_population, -4.0);
    }

    #[test]
    fn invalid_configs_are_rejected_up_front() {
        let models = classic_pair();

        let mut cfg = config(Method::RungeKutta4, 0.5, 1.0);
        cfg.initial_prey = 0.0;
        assert_eq!(
            integrate(&cfg, &models).unwrap_err(),
            SimulationError::InvalidConfig(ConfigError::NonPositivePopulation {
                prey: 0.0,
                predator: 1.0,
            })
        );

        let cfg = config(Method::RungeKutta4, 0.0, 1.0);
        assert_eq!(
            integrate(&cfg, &models).unwrap_err(),
            SimulationError::InvalidConfig(ConfigError::NonPositiveTimeStep(0.0))
        );

        let mut cfg = config(Method::RungeKutta4, 0.5, 1.0);
        cfg.start_time = -1.0;
        assert_eq!(
            integrate(&cfg, &models).unwrap_err(),
            SimulationError::InvalidConfig(ConfigError::NegativeStartTime(-1.0))
        );

        let mut cfg = config(Method::RungeKutta4, 0.5, 1.0);
        cfg.final_time = 0.0;
        assert_eq!(
            integrate(&cfg, &models).unwrap_err(),
            SimulationError::InvalidConfig(ConfigError::FinalTimeNotAfterStart {
                start_time: 0.0,
                final_time: 0.0,
            })
        );
    }

    #[test]
    fn divergence_runs_to_completion_and_is_not_caught() {
        // Huge growth rate and step: populations blow up to infinity, but the
        // run still emits the full fixed step count.
        let models =
            ModelPair::from_equations("100R+0RF", "100F+0RF").expect("equations should pair");
        let mut cfg = config(Method::ForwardEuler, 0.5, 50.0);
        cfg.clamp = ClampPolicy::Unclamped;

        let samples = integrate(&cfg, &models).unwrap();
        assert_eq!(samples.len(), 101);
        assert!(!samples.last().unwrap().is_finite() || samples.last().unwrap().prey_population > 1e100);
    }
}
