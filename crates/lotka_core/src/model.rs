//! Species models: parsed coefficients plus the instantaneous derivative of
//! each population.
//!
//! Both species share one shape; they differ only in which population the
//! growth term applies to. Derivatives are pure functions of the two current
//! populations and never clamp; flooring at zero is the integrator's job.

use nalgebra::Vector2;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::equation::{parse, ParsedEquation};
use crate::error::SimulationError;

/// Which population a model tracks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    Prey,
    Predator,
}

/// One species' parsed coefficients. Immutable once constructed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpeciesModel {
    pub role: Role,
    pub growth_rate: f64,
    pub interaction_rate: f64,
    pub self_letter: char,
    pub other_letter: char,
}

impl SpeciesModel {
    /// Prey orientation: the first parsed letter is the prey's own variable.
    pub fn prey(eq: &ParsedEquation) -> Self {
        Self {
            role: Role::Prey,
            growth_rate: eq.growth_rate,
            interaction_rate: eq.interaction_rate,
            self_letter: eq.letters.0,
            other_letter: eq.letters.1,
        }
    }

    /// Predator orientation: the second parsed letter is the predator's own
    /// variable, so self/other are swapped relative to the prey.
    pub fn predator(eq: &ParsedEquation) -> Self {
        Self {
            role: Role::Predator,
            growth_rate: eq.growth_rate,
            interaction_rate: eq.interaction_rate,
            self_letter: eq.letters.1,
            other_letter: eq.letters.0,
        }
    }

    /// Instantaneous derivative of this species' population:
    /// `growth * own + interaction * prey * predator`.
    pub fn derivative(&self, prey: f64, predator: f64) -> f64 {
        let own = match self.role {
            Role::Prey => prey,
            Role::Predator => predator,
        };
        self.growth_rate * own + self.interaction_rate * prey * predator
    }
}

impl fmt::Display for SpeciesModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (name, prey_letter, predator_letter) = match self.role {
            Role::Prey => ("Prey", self.self_letter, self.other_letter),
            Role::Predator => ("Predator", self.other_letter, self.self_letter),
        };
        write!(
            f,
            "{} equation: {}{} + {}{}{}",
            name, self.growth_rate, self.self_letter, self.interaction_rate, prey_letter,
            predator_letter
        )
    }
}

/// The two models of one simulation, letter-checked at construction.
///
/// Invariant: `prey.self_letter == predator.other_letter` and
/// `prey.other_letter == predator.self_letter`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ModelPair {
    pub prey: SpeciesModel,
    pub predator: SpeciesModel,
}

impl ModelPair {
    /// Pairs two parsed equations, rejecting inconsistent variable letters.
    pub fn new(
        prey_eq: &ParsedEquation,
        predator_eq: &ParsedEquation,
    ) -> Result<Self, SimulationError> {
        if prey_eq.letters != predator_eq.letters {
            return Err(SimulationError::LetterMismatch {
                expected: prey_eq.letters,
                found: predator_eq.letters,
            });
        }
        Ok(Self {
            prey: SpeciesModel::prey(prey_eq),
            predator: SpeciesModel::predator(predator_eq),
        })
    }

    /// Parses both equation strings and pairs them.
    pub fn from_equations(prey: &str, predator: &str) -> Result<Self, SimulationError> {
        let prey_eq = parse(prey)?;
        let predator_eq = parse(predator)?;
        Self::new(&prey_eq, &predator_eq)
    }

    /// Both instantaneous derivatives at the given populations
    /// (`x` = prey, `y` = predator).
    pub fn derivatives(&self, populations: Vector2<f64>) -> Vector2<f64> {
        Vector2::new(
            self.prey.derivative(populations.x, populations.y),
            self.predator.derivative(populations.x, populations.y),
        )
    }
}
