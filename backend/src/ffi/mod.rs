//! Python bindings (PyO3)
//!
//! Thin wrapper so Python workshop code can drive a simulation: create it
//! from a JSON config, step through days, and call the agent operations.
//! All values cross the boundary as plain dicts/lists built from the
//! serde representation of the Rust types.

pub mod simulation;
pub mod types;

pub use simulation::PyVendingSimulation;
