//! The `lotka_core` crate is the equation-parsing and ODE-integration engine
//! behind the Lotka predator-prey simulation service.
//!
//! Key components:
//! - **Equation parser**: turns algebraic strings like `"3R-1.4RF"` into
//!   growth/interaction coefficients and variable letters.
//! - **Models**: `SpeciesModel` / `ModelPair`, the coupled Lotka-Volterra
//!   derivative functions.
//! - **Solvers**: fixed-step `ForwardEuler` and `RungeKutta4` integrators
//!   behind one `Scheme` seam, selected by configuration.
//! - **Samples**: the emitted trajectory records, the non-finite result
//!   filter, and console table rendering.
//! - **Service**: the request/response contract consumed by the external
//!   HTTP wrapper.

pub mod equation;
pub mod error;
pub mod model;
pub mod sample;
pub mod service;
pub mod solvers;
