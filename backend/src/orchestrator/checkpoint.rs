//! Checkpoint - Save/Load Simulation State
//!
//! Enables serialization and deserialization of complete orchestrator state
//! for pause/resume between days.
//!
//! # Critical Invariants
//!
//! - **Determinism**: a restored run continues exactly like the uninterrupted run
//!   (the RNG state travels with the snapshot)
//! - **Ledger Reconciliation**: opening balance plus entries equals the balance
//! - **Order Integrity**: no duplicate order ids, no order due before it was placed
//! - **Config Matching**: state can only be loaded with the config that produced it

use crate::core::time::DayClock;
use crate::models::catalog::ProductId;
use crate::models::event::{Event, EventLog};
use crate::models::inventory::Inventory;
use crate::models::ledger::BalanceLedger;
use crate::models::order::PendingOrder;
use crate::models::pricing::PriceBook;
use crate::models::state::SimulationState;
use crate::models::summary::{DaySummary, Outcome};
use crate::orchestrator::engine::{DayPhase, Orchestrator, SimulationConfig, SimulationError};
use crate::rng::RngManager;
use crate::supply::SupplierLedger;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::{BTreeMap, HashSet};
use uuid::Uuid;

// ============================================================================
// Snapshot Structures
// ============================================================================

/// Complete orchestrator state snapshot
///
/// Captures everything needed to resume a run at a day boundary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateSnapshot {
    pub run_id: String,

    /// Last day started (0 before day 1)
    pub current_day: u32,

    /// Always a between-days phase
    pub phase: DayPhase,

    /// RNG state at time of snapshot (CRITICAL for determinism)
    pub rng_state: u64,

    pub ledger: BalanceLedger,

    pub inventory: BTreeMap<ProductId, u32>,

    pub prices: BTreeMap<ProductId, i64>,

    pub pending_orders: Vec<PendingOrder>,

    pub next_order_seq: u64,

    pub history: Vec<DaySummary>,

    pub notes: String,

    pub events: Vec<Event>,

    pub outcome: Option<Outcome>,

    /// SHA256 hash of the config the run was created with (for validation)
    pub config_hash: String,
}

// ============================================================================
// Config Hashing
// ============================================================================

/// Compute deterministic SHA256 hash of config
///
/// Uses canonical JSON serialization with sorted keys so the hash does not
/// depend on map iteration order.
pub fn compute_config_hash<T: Serialize>(config: &T) -> Result<String, SimulationError> {
    use serde_json::Value;

    let value = serde_json::to_value(config).map_err(|e| {
        SimulationError::SerializationError(format!("Config serialization failed: {}", e))
    })?;

    // Recursively sort all object keys for canonical representation
    fn canonicalize(value: Value) -> Value {
        match value {
            Value::Object(map) => {
                let sorted: BTreeMap<String, Value> =
                    map.into_iter().map(|(k, v)| (k, canonicalize(v))).collect();
                Value::Object(sorted.into_iter().collect())
            }
            Value::Array(arr) => Value::Array(arr.into_iter().map(canonicalize).collect()),
            other => other,
        }
    }

    let json = serde_json::to_string(&canonicalize(value)).map_err(|e| {
        SimulationError::SerializationError(format!("Config serialization failed: {}", e))
    })?;

    let mut hasher = Sha256::new();
    hasher.update(json.as_bytes());
    Ok(format!("{:x}", hasher.finalize()))
}

// ============================================================================
// Validation Functions
// ============================================================================

/// Validate state snapshot integrity against the config it claims to match
///
/// Checks:
/// - Ledger reconciliation and opening balance
/// - Inventory within capacity, prices positive
/// - Pending order sanity and id uniqueness
/// - History is one summary per day, consecutive from day 1
pub fn validate_snapshot(
    snapshot: &StateSnapshot,
    config: &SimulationConfig,
) -> Result<(), SimulationError> {
    let invalid = |msg: String| -> Result<(), SimulationError> {
        Err(SimulationError::StateValidationError(msg))
    };

    if !snapshot.phase.is_between_days() {
        return invalid(format!("snapshot taken mid-day ({})", snapshot.phase));
    }
    if snapshot.current_day > config.max_days {
        return invalid(format!(
            "day {} is past the configured {} days",
            snapshot.current_day, config.max_days
        ));
    }
    if (snapshot.phase == DayPhase::GameOver) != snapshot.outcome.is_some() {
        return invalid("outcome must be set exactly when the game is over".to_string());
    }

    // 1. Ledger
    let ledger = &snapshot.ledger;
    if ledger.opening_balance() != config.starting_balance {
        return invalid(format!(
            "opening balance {} does not match config {}",
            ledger.opening_balance(),
            config.starting_balance
        ));
    }
    if ledger.reconciled_balance() != ledger.balance() {
        return invalid(format!(
            "ledger entries sum to {}, balance is {}",
            ledger.reconciled_balance(),
            ledger.balance()
        ));
    }

    // 2. Inventory and prices
    if let Some(capacity) = config.machine_capacity {
        for (product, units) in &snapshot.inventory {
            if *units > capacity {
                return invalid(format!(
                    "{} units of {} exceed capacity {}",
                    units, product, capacity
                ));
            }
        }
    }
    for product in config.catalog.product_ids() {
        if !snapshot.prices.contains_key(&product) {
            return invalid(format!("no price for catalog product {}", product));
        }
    }
    for (product, price) in &snapshot.prices {
        if config.catalog.product(*product).is_none() {
            return invalid(format!("price for {} which is not in the catalog", product));
        }
        if *price <= 0 {
            return invalid(format!("price of {} is not positive", product));
        }
    }

    // 3. Pending orders
    let mut seen = HashSet::new();
    for order in &snapshot.pending_orders {
        if !seen.insert(order.order_id.as_str()) {
            return invalid(format!("duplicate pending order {}", order.order_id));
        }
        if order.due_day < order.promised_day || order.promised_day <= order.placed_day {
            return invalid(format!(
                "order {} is due before it could arrive",
                order.order_id
            ));
        }
        if order.placed_day > snapshot.current_day {
            return invalid(format!("order {} was placed in the future", order.order_id));
        }
        if order.quantity == 0 || order.cost < 0 {
            return invalid(format!("order {} has invalid quantity or cost", order.order_id));
        }
    }

    // 4. History
    if snapshot.history.len() != snapshot.current_day as usize {
        return invalid(format!(
            "{} day summaries for {} days",
            snapshot.history.len(),
            snapshot.current_day
        ));
    }
    for (index, summary) in snapshot.history.iter().enumerate() {
        if summary.day as usize != index + 1 {
            return invalid(format!(
                "history out of order: entry {} is day {}",
                index, summary.day
            ));
        }
        if !summary.reconciles() {
            return invalid(format!("day {} summary does not reconcile", summary.day));
        }
    }

    Ok(())
}

// ============================================================================
// Save / Load
// ============================================================================

impl Orchestrator {
    /// Capture the run as a snapshot (only between days)
    pub fn snapshot(&self) -> Result<StateSnapshot, SimulationError> {
        if !self.phase.is_between_days() {
            return Err(SimulationError::CheckpointError(format!(
                "cannot checkpoint during {}",
                self.phase
            )));
        }
        let rng_state = self.rng.checkpoint_state().ok_or_else(|| {
            SimulationError::CheckpointError("random source cannot be checkpointed".to_string())
        })?;

        Ok(StateSnapshot {
            run_id: self.run_id.to_string(),
            current_day: self.clock.current_day(),
            phase: self.phase,
            rng_state,
            ledger: self.state.ledger().clone(),
            inventory: self.state.inventory().levels().clone(),
            prices: self.state.prices().prices().clone(),
            pending_orders: self.state.orders().pending().to_vec(),
            next_order_seq: self.state.orders().next_order_seq(),
            history: self.state.history().to_vec(),
            notes: self.state.notes().to_string(),
            events: self.event_log.events().to_vec(),
            outcome: self.outcome,
            config_hash: compute_config_hash(&self.config)?,
        })
    }

    /// Serialize the run to JSON (only between days)
    pub fn save_state(&self) -> Result<String, SimulationError> {
        let snapshot = self.snapshot()?;
        let json = serde_json::to_string(&snapshot).map_err(|e| {
            SimulationError::SerializationError(format!("Snapshot serialization failed: {}", e))
        })?;

        tracing::info!(
            target: "checkpoint",
            run_id = %self.run_id,
            day = snapshot.current_day,
            bytes = json.len(),
            "state saved"
        );
        Ok(json)
    }

    /// Restore a run saved with [`Orchestrator::save_state`]
    ///
    /// `config` must be the config the run was created with.
    pub fn load_state(config: SimulationConfig, json: &str) -> Result<Self, SimulationError> {
        let snapshot: StateSnapshot = serde_json::from_str(json).map_err(|e| {
            SimulationError::SerializationError(format!("Snapshot parse failed: {}", e))
        })?;
        Self::from_snapshot(config, snapshot)
    }

    pub fn from_snapshot(
        config: SimulationConfig,
        snapshot: StateSnapshot,
    ) -> Result<Self, SimulationError> {
        config.validate()?;

        let config_hash = compute_config_hash(&config)?;
        if config_hash != snapshot.config_hash {
            return Err(SimulationError::CheckpointError(
                "config hash does not match snapshot".to_string(),
            ));
        }
        validate_snapshot(&snapshot, &config)?;

        let run_id = Uuid::parse_str(&snapshot.run_id).map_err(|e| {
            SimulationError::StateValidationError(format!("invalid run id: {}", e))
        })?;

        let state = SimulationState::from_parts(
            snapshot.ledger,
            Inventory::with_levels(snapshot.inventory, config.machine_capacity),
            PriceBook::with_prices(snapshot.prices),
            SupplierLedger::from_snapshot(snapshot.pending_orders, snapshot.next_order_seq),
            snapshot.history,
            snapshot.notes,
        );
        let clock = DayClock::at_day(snapshot.current_day, config.max_days);

        tracing::info!(
            target: "checkpoint",
            run_id = %run_id,
            day = snapshot.current_day,
            "state loaded"
        );

        Ok(Self {
            run_id,
            config,
            state,
            clock,
            rng: Box::new(RngManager::new(snapshot.rng_state)),
            phase: snapshot.phase,
            actions_used: 0,
            draft: None,
            event_log: EventLog::from_events(snapshot.events),
            outcome: snapshot.outcome,
        })
    }
}
