//! Vending Simulator Core - Rust Engine
//!
//! Day-by-day simulation of a single vending machine run by an agent, with
//! deterministic execution.
//!
//! # Architecture
//!
//! - **core**: Day clock and money helpers
//! - **models**: Domain types (catalog, ledger, inventory, orders, summaries)
//! - **rng**: Deterministic random number generation
//! - **demand**: Price-sensitive customer demand
//! - **supply**: Wholesale orders and deliveries
//! - **orchestrator**: Day cycle controller and checkpoints
//! - **policy**: Agents that act in the daily window
//!
//! # Critical Invariants
//!
//! 1. All money values are i64 (cents)
//! 2. All randomness is deterministic (seeded RNG)
//! 3. Balance after settlement = opening - fee - orders + revenue, exactly
//! 4. FFI boundary is minimal and safe

// Module declarations
pub mod core;
pub mod demand;
pub mod models;
pub mod orchestrator;
pub mod policy;
pub mod rng;
pub mod supply;

// Re-exports for convenience
pub use core::time::DayClock;
pub use demand::{DemandError, DemandModel};
pub use models::{
    action::{ActionError, ActionResponse},
    catalog::{Catalog, ProductId, SupplierId},
    event::{Event, EventLog},
    state::SimulationState,
    summary::{Briefing, DaySummary, Outcome},
};
pub use orchestrator::{
    ActionWindow, DayOpening, DayPhase, DayReport, Orchestrator, SimulationConfig,
    SimulationError, SimulationReport,
};
pub use policy::{AgentPolicyConfig, VendingAgent};
pub use rng::{RandomSource, RngManager, ScriptedSource};
pub use supply::{FundsPolicy, SupplierLedger};

// FFI module (when feature enabled)
#[cfg(feature = "pyo3")]
pub mod ffi;

// PyO3 exports (when feature enabled)
#[cfg(feature = "pyo3")]
use pyo3::prelude::*;

#[cfg(feature = "pyo3")]
#[pymodule]
fn vending_sim_core_rs(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<ffi::PyVendingSimulation>()?;
    Ok(())
}
