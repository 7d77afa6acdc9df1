//! Typed failure taxonomy for the simulation core.
//!
//! The core never turns these into user-facing payloads itself; the service
//! and console boundaries map them to messages and status codes via their
//! `Display` output.

use thiserror::Error;

/// A malformed equation string.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// A coefficient segment that is not a valid decimal number (e.g. a bare `.`).
    #[error("unparseable coefficient '{0}' in equation")]
    BadCoefficient(String),
    /// Fewer than two distinct variable letters resolved after the post-pass.
    #[error("invalid equation format: ensure it contains prey and predator terms")]
    MissingVariables,
}

/// A rejected simulation configuration. No partial run is attempted.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum ConfigError {
    #[error("initial populations must be positive, got prey {prey} and predator {predator}")]
    NonPositivePopulation { prey: f64, predator: f64 },
    #[error("time step must be positive, got {0}")]
    NonPositiveTimeStep(f64),
    #[error("start time must be non-negative, got {0}")]
    NegativeStartTime(f64),
    #[error("final time {final_time} must be greater than start time {start_time}")]
    FinalTimeNotAfterStart { start_time: f64, final_time: f64 },
}

/// Any failure a simulation run can surface to its caller.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimulationError {
    #[error("invalid equation: {0}")]
    Parse(#[from] ParseError),
    /// The prey and predator equations reference inconsistent variable letters.
    #[error("the variables in the equations must match: expected {expected:?}, but got {found:?}")]
    LetterMismatch {
        expected: (char, char),
        found: (char, char),
    },
    #[error("invalid configuration: {0}")]
    InvalidConfig(#[from] ConfigError),
    /// Every emitted sample contained a NaN or infinite population.
    #[error("simulation failed: all values resulted in NaN or Infinity")]
    AllSamplesInvalid,
}
