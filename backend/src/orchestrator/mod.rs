//! Orchestrator - the vending day cycle
//!
//! Drives one simulation run day by day: fee, deliveries, agent window,
//! customers, settlement.
//!
//! See `engine.rs` for the day cycle and `checkpoint.rs` for save/load.

pub mod checkpoint;
pub mod engine;

// Re-export main types for convenience
pub use engine::{
    ActionWindow, DayOpening, DayPhase, DayReport, Orchestrator, SimulationConfig,
    SimulationError, SimulationReport,
};

// Re-export checkpoint types
pub use checkpoint::{compute_config_hash, validate_snapshot, StateSnapshot};
