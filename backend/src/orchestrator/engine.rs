//! Orchestrator Engine
//!
//! Day cycle controller integrating all components:
//! - Daily operating fee and bankruptcy check
//! - Supplier deliveries (FIFO)
//! - Agent action window (budgeted operations)
//! - Customer demand per product
//! - Settlement, day summary and termination
//!
//! # Architecture
//!
//! ```text
//! For each day d:
//! 1. DayStart            open day d, record opening balance
//! 2. FeeCharged          debit the daily fee; balance < 0 → GameOver(Bankrupt)
//! 3. DeliveriesApplied   fold due orders into inventory, oldest first
//! 4. AgentActionWindow   up to max_actions_per_day successful operations
//! 5. CustomersSimulated  one demand draw per product, credit revenue
//! 6. DaySettled          record DaySummary; check bankruptcy and final day
//! ```
//!
//! Steps 1-4 run in [`Orchestrator::begin_day`], steps 5-6 in
//! [`Orchestrator::end_day`]. Between the two calls the agent acts through
//! the orchestrator's operations (or an [`ActionWindow`]).
//!
//! # Example
//!
//! ```rust
//! use vending_sim_core_rs::orchestrator::{DayOpening, Orchestrator, SimulationConfig};
//! use vending_sim_core_rs::models::catalog::{ProductId, SupplierId};
//!
//! let config = SimulationConfig { max_days: 3, ..SimulationConfig::default() };
//! let mut sim = Orchestrator::new(config).unwrap();
//!
//! match sim.begin_day().unwrap() {
//!     DayOpening::Window(briefing) => {
//!         assert_eq!(briefing.day, 1);
//!         assert_eq!(briefing.balance, 49_500);
//!         sim.place_order(SupplierId::QuickStock, ProductId::Soda, 50).unwrap();
//!     }
//!     DayOpening::Over(_) => unreachable!(),
//! }
//!
//! let report = sim.end_day().unwrap();
//! assert_eq!(report.summary.order_spend, 3_500);
//! assert!(report.outcome.is_none());
//! ```

use crate::core::time::DayClock;
use crate::demand::{DemandError, DemandModel};
use crate::models::action::ActionError;
use crate::models::catalog::{Catalog, ProductId, SupplierId};
use crate::models::event::{Event, EventLog};
use crate::models::ledger::EntryCause;
use crate::models::order::{DeliveryRecord, OrderConfirmation};
use crate::models::state::SimulationState;
use crate::models::summary::{Briefing, DaySummary, Outcome};
use crate::policy::VendingAgent;
use crate::rng::{RandomSource, RngManager};
use crate::supply::FundsPolicy;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;
use uuid::Uuid;

// ============================================================================
// Configuration Types
// ============================================================================

/// Complete simulation configuration
///
/// Every field has a default, so a JSON config only needs the values it
/// changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Cash at the start of day 1 (cents)
    pub starting_balance: i64,

    /// Operating fee charged at the start of every day (cents)
    pub daily_fee: i64,

    /// Length of the run in days
    pub max_days: u32,

    /// Successful agent operations allowed per action window
    pub max_actions_per_day: usize,

    /// Seed for demand jitter and supplier delays
    pub rng_seed: u64,

    /// Per-product machine capacity (`None` = uncapped)
    pub machine_capacity: Option<u32>,

    /// Handling of orders the balance cannot cover
    pub funds_policy: FundsPolicy,

    /// Units on hand before day 1
    pub initial_inventory: BTreeMap<ProductId, u32>,

    /// Retail prices replacing catalog defaults (cents)
    pub initial_prices: BTreeMap<ProductId, i64>,

    /// Products at or below this many units are flagged in the briefing
    pub low_stock_threshold: u32,

    pub demand: DemandModel,

    pub catalog: Catalog,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            starting_balance: 50_000,
            daily_fee: 500,
            max_days: 30,
            max_actions_per_day: 5,
            rng_seed: 42,
            machine_capacity: None,
            funds_policy: FundsPolicy::Reject,
            initial_inventory: BTreeMap::new(),
            initial_prices: BTreeMap::new(),
            low_stock_threshold: 5,
            demand: DemandModel::default(),
            catalog: Catalog::default(),
        }
    }
}

impl SimulationConfig {
    /// Parse a JSON config and validate it
    pub fn from_json(json: &str) -> Result<Self, SimulationError> {
        let config: SimulationConfig = serde_json::from_str(json)
            .map_err(|e| SimulationError::InvalidConfig(format!("Config parse failed: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject configurations the day cycle cannot run
    pub fn validate(&self) -> Result<(), SimulationError> {
        if self.starting_balance < 0 {
            return Err(SimulationError::InvalidConfig(
                "starting_balance must be non-negative".to_string(),
            ));
        }
        if self.daily_fee < 0 {
            return Err(SimulationError::InvalidConfig(
                "daily_fee must be non-negative".to_string(),
            ));
        }
        if self.max_days == 0 {
            return Err(SimulationError::InvalidConfig(
                "max_days must be positive".to_string(),
            ));
        }
        if self.machine_capacity == Some(0) {
            return Err(SimulationError::InvalidConfig(
                "machine_capacity must be positive when set".to_string(),
            ));
        }

        self.catalog
            .validate()
            .map_err(|e| SimulationError::InvalidConfig(e.to_string()))?;
        self.demand
            .validate()
            .map_err(|e| SimulationError::InvalidConfig(e.to_string()))?;

        for (product, units) in &self.initial_inventory {
            if self.catalog.product(*product).is_none() {
                return Err(SimulationError::InvalidConfig(format!(
                    "initial inventory names {} which is not in the catalog",
                    product
                )));
            }
            if let Some(capacity) = self.machine_capacity {
                if *units > capacity {
                    return Err(SimulationError::InvalidConfig(format!(
                        "initial inventory of {} ({}) exceeds machine capacity {}",
                        product, units, capacity
                    )));
                }
            }
        }

        for (product, price) in &self.initial_prices {
            if self.catalog.product(*product).is_none() {
                return Err(SimulationError::InvalidConfig(format!(
                    "initial price set for {} which is not in the catalog",
                    product
                )));
            }
            if *price <= 0 {
                return Err(SimulationError::InvalidConfig(format!(
                    "initial price for {} must be positive",
                    product
                )));
            }
        }

        Ok(())
    }
}

// ============================================================================
// Day Phases
// ============================================================================

/// Position in the day cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DayPhase {
    Initializing,
    DayStart,
    FeeCharged,
    DeliveriesApplied,
    AgentActionWindow,
    CustomersSimulated,
    DaySettled,
    GameOver,
}

impl DayPhase {
    /// Whether `self → next` is a legal step
    ///
    /// The only early exit is `FeeCharged → GameOver` (bankrupt after the fee).
    pub fn can_transition_to(self, next: DayPhase) -> bool {
        use DayPhase::*;
        matches!(
            (self, next),
            (Initializing, DayStart)
                | (DayStart, FeeCharged)
                | (FeeCharged, DeliveriesApplied)
                | (FeeCharged, GameOver)
                | (DeliveriesApplied, AgentActionWindow)
                | (AgentActionWindow, CustomersSimulated)
                | (CustomersSimulated, DaySettled)
                | (DaySettled, DayStart)
                | (DaySettled, GameOver)
        )
    }

    /// True when no day is in progress (safe to checkpoint)
    pub fn is_between_days(self) -> bool {
        matches!(
            self,
            DayPhase::Initializing | DayPhase::DaySettled | DayPhase::GameOver
        )
    }
}

impl fmt::Display for DayPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

// ============================================================================
// Results
// ============================================================================

/// What `begin_day` hands back
#[derive(Debug, Clone, PartialEq)]
pub enum DayOpening {
    /// The action window is open
    Window(Briefing),
    /// The fee bankrupted the machine; the day is already recorded
    Over(DayReport),
}

/// A settled day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayReport {
    pub summary: DaySummary,
    /// Set when this day ended the run
    pub outcome: Option<Outcome>,
}

/// Result of a complete run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationReport {
    pub run_id: String,
    pub outcome: Outcome,
    pub starting_balance: i64,
    pub final_balance: i64,
    pub days_played: u32,
    pub history: Vec<DaySummary>,
}

impl SimulationReport {
    pub fn total_revenue(&self) -> i64 {
        self.history.iter().map(|d| d.revenue).sum()
    }

    pub fn total_units_sold(&self) -> u32 {
        self.history.iter().map(|d| d.total_units_sold()).sum()
    }
}

/// Simulation error types
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SimulationError {
    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("Invalid phase transition: {from} -> {to}")]
    InvalidTransition { from: DayPhase, to: DayPhase },

    #[error("Simulation is over ({outcome})")]
    GameOver { outcome: Outcome },

    #[error("Checkpoint error: {0}")]
    CheckpointError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("State validation error: {0}")]
    StateValidationError(String),

    #[error(transparent)]
    Demand(#[from] DemandError),
}

/// Running totals for the day in progress
#[derive(Debug, Clone)]
pub(crate) struct DayDraft {
    pub(crate) day: u32,
    pub(crate) opening_balance: i64,
    pub(crate) fee_charged: i64,
    pub(crate) deliveries: Vec<DeliveryRecord>,
    pub(crate) orders_placed: Vec<OrderConfirmation>,
}

impl DayDraft {
    fn order_spend(&self) -> i64 {
        self.orders_placed.iter().map(|o| o.total_cost).sum()
    }
}

// ============================================================================
// Orchestrator
// ============================================================================

/// Owns one vending run and drives its day cycle
///
/// # Determinism
///
/// All randomness goes through one [`RandomSource`]. With the default
/// [`RngManager`], same seed + same config + same agent = identical history.
pub struct Orchestrator {
    /// Identifies this run across checkpoints
    pub(crate) run_id: Uuid,

    pub(crate) config: SimulationConfig,

    /// Ledger, inventory, prices, pending orders, history, notes
    pub(crate) state: SimulationState,

    pub(crate) clock: DayClock,

    pub(crate) rng: Box<dyn RandomSource + Send>,

    pub(crate) phase: DayPhase,

    /// Successful operations in the current window
    pub(crate) actions_used: usize,

    pub(crate) draft: Option<DayDraft>,

    pub(crate) event_log: EventLog,

    pub(crate) outcome: Option<Outcome>,
}

impl Orchestrator {
    /// Create a run seeded from `config.rng_seed`
    pub fn new(config: SimulationConfig) -> Result<Self, SimulationError> {
        let rng = RngManager::new(config.rng_seed);
        Self::with_random_source(config, Box::new(rng))
    }

    /// Create a run drawing from a caller-supplied random source
    pub fn with_random_source(
        config: SimulationConfig,
        rng: Box<dyn RandomSource + Send>,
    ) -> Result<Self, SimulationError> {
        config.validate()?;

        let state = SimulationState::new(
            &config.catalog,
            config.starting_balance,
            config.machine_capacity,
            &config.initial_inventory,
            &config.initial_prices,
        );
        let clock = DayClock::new(config.max_days);
        let run_id = Uuid::new_v4();

        tracing::info!(
            target: "day_cycle",
            run_id = %run_id,
            starting_balance = config.starting_balance,
            max_days = config.max_days,
            "simulation created"
        );

        Ok(Self {
            run_id,
            config,
            state,
            clock,
            rng,
            phase: DayPhase::Initializing,
            actions_used: 0,
            draft: None,
            event_log: EventLog::new(),
            outcome: None,
        })
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    pub fn run_id(&self) -> Uuid {
        self.run_id
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn state(&self) -> &SimulationState {
        &self.state
    }

    pub fn phase(&self) -> DayPhase {
        self.phase
    }

    /// Current day (0 before day 1 starts)
    pub fn current_day(&self) -> u32 {
        self.clock.current_day()
    }

    pub fn max_days(&self) -> u32 {
        self.clock.max_days()
    }

    pub fn balance(&self) -> i64 {
        self.state.balance()
    }

    pub fn outcome(&self) -> Option<Outcome> {
        self.outcome
    }

    pub fn is_over(&self) -> bool {
        self.phase == DayPhase::GameOver
    }

    pub fn history(&self) -> &[DaySummary] {
        self.state.history()
    }

    pub fn event_log(&self) -> &EventLog {
        &self.event_log
    }

    pub fn actions_used(&self) -> usize {
        self.actions_used
    }

    /// Operations left in the current window (0 when closed)
    pub fn remaining_actions(&self) -> usize {
        if self.phase == DayPhase::AgentActionWindow {
            self.config.max_actions_per_day.saturating_sub(self.actions_used)
        } else {
            0
        }
    }

    /// Situation as the agent sees it right now
    pub fn briefing(&self) -> Briefing {
        let inventory = self.state.inventory();
        let pending = self.state.orders().pending();

        Briefing {
            day: self.clock.current_day(),
            max_days: self.clock.max_days(),
            balance: self.state.balance(),
            inventory: inventory.levels().clone(),
            prices: self.state.prices().prices().clone(),
            yesterday_sales: self
                .state
                .last_summary()
                .map(|s| s.units_sold.clone())
                .unwrap_or_default(),
            deliveries_today: self
                .draft
                .as_ref()
                .map(|d| d.deliveries.clone())
                .unwrap_or_default(),
            pending_deliveries: pending.len(),
            pending_units: self.state.orders().pending_units(),
            low_stock: inventory.low_stock(self.config.low_stock_threshold),
            actions_allowed: self.config.max_actions_per_day,
        }
    }

    // ========================================================================
    // Day Cycle
    // ========================================================================

    fn transition(&mut self, next: DayPhase) -> Result<(), SimulationError> {
        if !self.phase.can_transition_to(next) {
            return Err(SimulationError::InvalidTransition {
                from: self.phase,
                to: next,
            });
        }
        tracing::trace!(target: "day_cycle", from = %self.phase, to = %next, "phase transition");
        self.phase = next;
        Ok(())
    }

    fn ensure_running(&self) -> Result<(), SimulationError> {
        match self.outcome {
            Some(outcome) if self.phase == DayPhase::GameOver => {
                Err(SimulationError::GameOver { outcome })
            }
            _ => Ok(()),
        }
    }

    /// Open the next day and run it up to the agent's action window
    ///
    /// Charges the fee, checks for bankruptcy, applies due deliveries and
    /// returns the briefing. If the fee leaves the balance negative the day
    /// is recorded and `DayOpening::Over` is returned instead.
    pub fn begin_day(&mut self) -> Result<DayOpening, SimulationError> {
        self.ensure_running()?;
        self.transition(DayPhase::DayStart)?;

        self.clock.advance_day();
        let day = self.clock.current_day();
        let opening_balance = self.state.balance();
        self.actions_used = 0;
        self.draft = Some(DayDraft {
            day,
            opening_balance,
            fee_charged: 0,
            deliveries: Vec::new(),
            orders_placed: Vec::new(),
        });
        self.event_log.log(Event::DayStarted {
            day,
            opening_balance,
        });

        tracing::info!(target: "day_cycle", day, opening_balance, "day started");

        // Fee
        let fee = self.config.daily_fee;
        let balance_after = self
            .state
            .ledger_mut()
            .debit(day, EntryCause::Fee, fee, None);
        if let Some(draft) = self.draft.as_mut() {
            draft.fee_charged = fee;
        }
        self.event_log.log(Event::FeeCharged {
            day,
            amount: fee,
            balance_after,
        });
        self.transition(DayPhase::FeeCharged)?;

        if balance_after < 0 {
            tracing::warn!(
                target: "day_cycle",
                day,
                balance = balance_after,
                "daily fee left the balance negative"
            );
            let summary = self.record_summary(BTreeMap::new(), BTreeMap::new(), 0);
            self.finish(Outcome::Bankrupt)?;
            return Ok(DayOpening::Over(DayReport {
                summary,
                outcome: Some(Outcome::Bankrupt),
            }));
        }

        // Deliveries
        let deliveries = {
            let (orders, inventory) = self.state.orders_and_inventory_mut();
            orders.apply_due(day, inventory)
        };
        for delivery in &deliveries {
            self.event_log.log(Event::OrderDelivered {
                day,
                order_id: delivery.order_id.clone(),
                supplier: delivery.supplier,
                product: delivery.product,
                units_stocked: delivery.units_stocked,
                units_discarded: delivery.units_discarded,
                placed_day: delivery.placed_day,
            });
        }
        if !deliveries.is_empty() {
            tracing::debug!(target: "supply", day, count = deliveries.len(), "deliveries applied");
        }
        if let Some(draft) = self.draft.as_mut() {
            draft.deliveries = deliveries;
        }
        self.transition(DayPhase::DeliveriesApplied)?;

        self.transition(DayPhase::AgentActionWindow)?;
        Ok(DayOpening::Window(self.briefing()))
    }

    /// Close the action window, run customers and settle the day
    pub fn end_day(&mut self) -> Result<DayReport, SimulationError> {
        self.ensure_running()?;
        if !self.phase.can_transition_to(DayPhase::CustomersSimulated) {
            return Err(SimulationError::InvalidTransition {
                from: self.phase,
                to: DayPhase::CustomersSimulated,
            });
        }

        // Every product must be priceable before anything is sold, so a
        // rejected day leaves stock, balance and the RNG untouched
        let mut products = Vec::with_capacity(self.config.catalog.products.len());
        for product in self.config.catalog.products.values() {
            let price = self.state.prices().price(product.id).ok_or_else(|| {
                SimulationError::StateValidationError(format!("{} has no price", product.id))
            })?;
            self.config.demand.price_factor(price)?;
            products.push((product.id, product.base_demand, price));
        }

        self.transition(DayPhase::CustomersSimulated)?;

        let day = self.clock.current_day();
        let mut units_sold = BTreeMap::new();
        let mut unmet_demand = BTreeMap::new();
        let mut revenue = 0i64;

        for (product, base_demand, price) in products {
            let inventory = self.state.inventory_mut();
            let outcome =
                self.config
                    .demand
                    .simulate_product(base_demand, price, self.rng.as_mut(), |demand| {
                        inventory.sell_up_to(product, demand)
                    })?;

            if outcome.revenue > 0 {
                self.state.ledger_mut().credit(
                    day,
                    EntryCause::Sale,
                    outcome.revenue,
                    Some(product.to_string()),
                );
            }

            tracing::debug!(
                target: "demand",
                day,
                product = %product,
                demand = outcome.demand,
                sold = outcome.sold,
                price,
                "customers served"
            );

            self.event_log.log(Event::Sale {
                day,
                product,
                demand: outcome.demand,
                sold: outcome.sold,
                price,
                revenue: outcome.revenue,
            });
            if outcome.unmet > 0 {
                self.event_log.log(Event::StockOut { day, product });
            }

            units_sold.insert(product, outcome.sold);
            unmet_demand.insert(product, outcome.unmet);
            revenue += outcome.revenue;
        }

        self.transition(DayPhase::DaySettled)?;
        let summary = self.record_summary(units_sold, unmet_demand, revenue);
        self.event_log.log(Event::DaySettled {
            day,
            revenue,
            ending_balance: summary.ending_balance,
        });

        tracing::info!(
            target: "day_cycle",
            day,
            revenue,
            order_spend = summary.order_spend,
            ending_balance = summary.ending_balance,
            "day settled"
        );

        let outcome = if summary.ending_balance < 0 {
            Some(Outcome::Bankrupt)
        } else if self.clock.is_final_day() {
            if summary.ending_balance > self.config.starting_balance {
                Some(Outcome::Win)
            } else {
                Some(Outcome::Loss)
            }
        } else {
            None
        };

        if let Some(outcome) = outcome {
            self.finish(outcome)?;
        }

        Ok(DayReport { summary, outcome })
    }

    /// Run one full day, letting `agent` act in the window
    pub fn run_day(&mut self, agent: &mut dyn VendingAgent) -> Result<DayReport, SimulationError> {
        match self.begin_day()? {
            DayOpening::Over(report) => Ok(report),
            DayOpening::Window(briefing) => {
                {
                    let mut window = ActionWindow::new(self);
                    agent.act(&briefing, &mut window);
                }
                self.end_day()
            }
        }
    }

    /// Run days until the simulation ends
    pub fn run(&mut self, agent: &mut dyn VendingAgent) -> Result<SimulationReport, SimulationError> {
        while !self.is_over() {
            self.run_day(agent)?;
        }
        self.report()
    }

    /// Final report; fails while the run is still in progress
    pub fn report(&self) -> Result<SimulationReport, SimulationError> {
        let outcome = self.outcome.ok_or(SimulationError::InvalidTransition {
            from: self.phase,
            to: DayPhase::GameOver,
        })?;
        Ok(SimulationReport {
            run_id: self.run_id.to_string(),
            outcome,
            starting_balance: self.config.starting_balance,
            final_balance: self.state.balance(),
            days_played: self.clock.current_day(),
            history: self.state.history().to_vec(),
        })
    }

    fn record_summary(
        &mut self,
        units_sold: BTreeMap<ProductId, u32>,
        unmet_demand: BTreeMap<ProductId, u32>,
        revenue: i64,
    ) -> DaySummary {
        let draft = self.draft.take().unwrap_or_else(|| DayDraft {
            day: self.clock.current_day(),
            opening_balance: self.state.balance(),
            fee_charged: 0,
            deliveries: Vec::new(),
            orders_placed: Vec::new(),
        });

        let order_spend = draft.order_spend();
        let summary = DaySummary {
            day: draft.day,
            opening_balance: draft.opening_balance,
            fee_charged: draft.fee_charged,
            deliveries: draft.deliveries,
            orders_placed: draft.orders_placed,
            order_spend,
            units_sold,
            unmet_demand,
            revenue,
            actions_used: self.actions_used,
            ending_balance: self.state.balance(),
        };
        debug_assert!(summary.reconciles(), "day summary must reconcile");

        self.state.push_summary(summary.clone());
        summary
    }

    fn finish(&mut self, outcome: Outcome) -> Result<(), SimulationError> {
        self.transition(DayPhase::GameOver)?;
        self.outcome = Some(outcome);
        let day = self.clock.current_day();
        let final_balance = self.state.balance();
        self.event_log.log(Event::GameOver {
            day,
            outcome,
            final_balance,
        });
        tracing::info!(target: "day_cycle", day, %outcome, final_balance, "game over");
        Ok(())
    }

    // ========================================================================
    // Agent Operations
    // ========================================================================

    /// Gate shared by every agent operation: window open and budget left
    fn admit_action(&self) -> Result<(), ActionError> {
        if self.phase != DayPhase::AgentActionWindow {
            return Err(ActionError::WindowClosed {
                phase: self.phase.to_string(),
            });
        }
        if self.actions_used >= self.config.max_actions_per_day {
            return Err(ActionError::ActionBudgetExceeded {
                limit: self.config.max_actions_per_day,
            });
        }
        Ok(())
    }

    /// Buy stock; paid now, delivered after the supplier's lead time
    pub fn place_order(
        &mut self,
        supplier: SupplierId,
        product: ProductId,
        quantity: u32,
    ) -> Result<OrderConfirmation, ActionError> {
        self.admit_action()?;
        let day = self.clock.current_day();

        let confirmation = {
            let (orders, ledger) = self.state.orders_and_ledger_mut();
            orders.place_order(
                &self.config.catalog,
                ledger,
                self.config.funds_policy,
                day,
                supplier,
                product,
                quantity,
                self.rng.as_mut(),
            )?
        };

        self.actions_used += 1;
        self.event_log.log(Event::OrderPlaced {
            day,
            order_id: confirmation.order_id.clone(),
            supplier,
            product,
            quantity,
            cost: confirmation.total_cost,
            due_day: confirmation.expected_delivery_day,
        });
        if let Some(draft) = self.draft.as_mut() {
            draft.orders_placed.push(confirmation.clone());
        }
        Ok(confirmation)
    }

    /// Change a retail price (cents); returns the previous price
    pub fn set_price(&mut self, product: ProductId, price_cents: i64) -> Result<i64, ActionError> {
        self.admit_action()?;
        let old_price = self.state.prices_mut().set(product, price_cents)?;

        self.actions_used += 1;
        self.event_log.log(Event::PriceChanged {
            day: self.clock.current_day(),
            product,
            old_price,
            new_price: price_cents,
        });
        tracing::debug!(target: "day_cycle", product = %product, old_price, new_price = price_cents, "price changed");
        Ok(old_price)
    }

    pub fn check_inventory(&mut self) -> Result<BTreeMap<ProductId, u32>, ActionError> {
        self.admit_action()?;
        self.actions_used += 1;
        Ok(self.state.inventory().levels().clone())
    }

    pub fn check_balance(&mut self) -> Result<i64, ActionError> {
        self.admit_action()?;
        self.actions_used += 1;
        Ok(self.state.balance())
    }

    /// Settled days, oldest first
    pub fn view_sales_history(&mut self) -> Result<Vec<DaySummary>, ActionError> {
        self.admit_action()?;
        self.actions_used += 1;
        Ok(self.state.history().to_vec())
    }

    /// Replace the agent's scratch notes
    pub fn take_notes(&mut self, text: impl Into<String>) -> Result<(), ActionError> {
        self.admit_action()?;
        let text = text.into();
        self.actions_used += 1;
        self.event_log.log(Event::NoteTaken {
            day: self.clock.current_day(),
            length: text.chars().count(),
        });
        self.state.set_notes(text);
        Ok(())
    }

    pub fn notes(&self) -> &str {
        self.state.notes()
    }
}

// Manual Debug implementation (the random source is a trait object)
impl fmt::Debug for Orchestrator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Orchestrator")
            .field("run_id", &self.run_id)
            .field("day", &self.clock.current_day())
            .field("phase", &self.phase)
            .field("balance", &self.state.balance())
            .field("outcome", &self.outcome)
            .field("event_count", &self.event_log.len())
            .finish()
    }
}

// ============================================================================
// Action Window
// ============================================================================

/// The agent's handle on the simulation during its action window
///
/// Exposes only the agent operations, each enforcing the day's budget.
pub struct ActionWindow<'a> {
    sim: &'a mut Orchestrator,
}

impl<'a> ActionWindow<'a> {
    pub fn new(sim: &'a mut Orchestrator) -> Self {
        Self { sim }
    }

    pub fn day(&self) -> u32 {
        self.sim.current_day()
    }

    pub fn remaining_actions(&self) -> usize {
        self.sim.remaining_actions()
    }

    /// Read-only catalog, for pricing decisions
    pub fn catalog(&self) -> &Catalog {
        &self.sim.config.catalog
    }

    pub fn notes(&self) -> &str {
        self.sim.notes()
    }

    pub fn place_order(
        &mut self,
        supplier: SupplierId,
        product: ProductId,
        quantity: u32,
    ) -> Result<OrderConfirmation, ActionError> {
        self.sim.place_order(supplier, product, quantity)
    }

    pub fn set_price(&mut self, product: ProductId, price_cents: i64) -> Result<i64, ActionError> {
        self.sim.set_price(product, price_cents)
    }

    pub fn check_inventory(&mut self) -> Result<BTreeMap<ProductId, u32>, ActionError> {
        self.sim.check_inventory()
    }

    pub fn check_balance(&mut self) -> Result<i64, ActionError> {
        self.sim.check_balance()
    }

    pub fn view_sales_history(&mut self) -> Result<Vec<DaySummary>, ActionError> {
        self.sim.view_sales_history()
    }

    pub fn take_notes(&mut self, text: impl Into<String>) -> Result<(), ActionError> {
        self.sim.take_notes(text)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::ScriptedSource;

    fn scripted(config: SimulationConfig, value: f64) -> Orchestrator {
        Orchestrator::with_random_source(config, Box::new(ScriptedSource::constant(value))).unwrap()
    }

    fn open_window(sim: &mut Orchestrator) -> Briefing {
        match sim.begin_day().unwrap() {
            DayOpening::Window(briefing) => briefing,
            DayOpening::Over(report) => panic!("unexpected game over: {:?}", report),
        }
    }

    #[test]
    fn test_phase_transitions_are_linear() {
        use DayPhase::*;
        assert!(Initializing.can_transition_to(DayStart));
        assert!(FeeCharged.can_transition_to(GameOver));
        assert!(DaySettled.can_transition_to(GameOver));
        assert!(!DayStart.can_transition_to(AgentActionWindow));
        assert!(!AgentActionWindow.can_transition_to(DaySettled));
        assert!(!DeliveriesApplied.can_transition_to(GameOver));
        assert!(!GameOver.can_transition_to(DayStart));
    }

    #[test]
    fn test_config_validation() {
        let bad = SimulationConfig {
            max_days: 0,
            ..SimulationConfig::default()
        };
        assert!(matches!(
            Orchestrator::new(bad),
            Err(SimulationError::InvalidConfig(_))
        ));

        let mut prices = BTreeMap::new();
        prices.insert(ProductId::Soda, 0);
        let bad = SimulationConfig {
            initial_prices: prices,
            ..SimulationConfig::default()
        };
        assert!(bad.validate().is_err());

        let bad = SimulationConfig {
            demand: DemandModel {
                price_offset: -1.5,
                ..DemandModel::default()
            },
            ..SimulationConfig::default()
        };
        assert!(matches!(
            Orchestrator::new(bad),
            Err(SimulationError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_config_from_partial_json() {
        let config = SimulationConfig::from_json(r#"{"starting_balance": 500, "max_days": 7}"#)
            .unwrap();
        assert_eq!(config.starting_balance, 500);
        assert_eq!(config.max_days, 7);
        assert_eq!(config.daily_fee, 500);
        assert_eq!(config.max_actions_per_day, 5);
    }

    #[test]
    fn test_end_day_outside_window_is_rejected() {
        let mut sim = scripted(SimulationConfig::default(), 0.5);
        assert_eq!(
            sim.end_day().unwrap_err(),
            SimulationError::InvalidTransition {
                from: DayPhase::Initializing,
                to: DayPhase::CustomersSimulated
            }
        );
    }

    #[test]
    fn test_unpriceable_day_changes_nothing() {
        let mut inventory = BTreeMap::new();
        inventory.insert(ProductId::Soda, 50);
        let config = SimulationConfig {
            initial_inventory: inventory,
            ..SimulationConfig::default()
        };
        let mut sim = scripted(config, 0.5);
        open_window(&mut sim);

        // Chips at 125 cents sits below an asymptote of 1.50 dollars
        sim.config.demand.price_offset = -1.5;
        let balance = sim.balance();
        let events = sim.event_log().len();

        assert!(matches!(
            sim.end_day(),
            Err(SimulationError::Demand(DemandError::InvalidPrice { .. }))
        ));
        assert_eq!(sim.phase(), DayPhase::AgentActionWindow);
        assert_eq!(sim.state().inventory().on_hand(ProductId::Soda), 50);
        assert_eq!(sim.balance(), balance);
        assert_eq!(sim.event_log().len(), events);

        sim.config.demand.price_offset = 0.5;
        let report = sim.end_day().unwrap();
        assert_eq!(report.summary.day, 1);
        assert!(report.summary.reconciles());
    }

    #[test]
    fn test_begin_day_twice_is_rejected() {
        let mut sim = scripted(SimulationConfig::default(), 0.5);
        open_window(&mut sim);
        assert!(matches!(
            sim.begin_day(),
            Err(SimulationError::InvalidTransition { .. })
        ));
    }

    #[test]
    fn test_actions_outside_window() {
        let mut sim = scripted(SimulationConfig::default(), 0.5);
        assert_eq!(
            sim.check_balance().unwrap_err(),
            ActionError::WindowClosed {
                phase: "Initializing".to_string()
            }
        );
        assert_eq!(sim.remaining_actions(), 0);
    }

    #[test]
    fn test_budget_counts_only_successes() {
        let config = SimulationConfig {
            max_actions_per_day: 2,
            ..SimulationConfig::default()
        };
        let mut sim = scripted(config, 0.5);
        open_window(&mut sim);

        assert!(sim.set_price(ProductId::Soda, -5).is_err());
        assert_eq!(sim.actions_used(), 0);

        sim.check_balance().unwrap();
        sim.check_inventory().unwrap();
        assert_eq!(
            sim.take_notes("full").unwrap_err(),
            ActionError::ActionBudgetExceeded { limit: 2 }
        );
        assert_eq!(sim.notes(), "");
    }

    #[test]
    fn test_briefing_reports_pending_and_low_stock() {
        let mut sim = scripted(SimulationConfig::default(), 0.5);
        open_window(&mut sim);
        sim.place_order(SupplierId::BulkBarn, ProductId::Chips, 30)
            .unwrap();

        let briefing = sim.briefing();
        assert_eq!(briefing.pending_deliveries, 1);
        assert_eq!(briefing.stock_position(ProductId::Chips), 30);
        assert_eq!(briefing.low_stock.len(), 3);
    }

    #[test]
    fn test_orchestrator_is_send() {
        fn assert_send<T: Send>() {}
        assert_send::<Orchestrator>();
    }
}
