//! Simulation State
//!
//! Everything one vending run mutates, held in a single value owned by the
//! day cycle. Nothing here is global, so any number of runs (one per
//! workshop participant) can coexist without interacting.
//!
//! # Critical Invariants
//!
//! 1. **Ledger reconciliation**: opening balance plus all ledger entries
//!    equals the current balance
//! 2. **Non-negative stock**: inventory levels are unsigned and never exceed
//!    capacity when capped
//! 3. **History order**: day summaries are stored oldest first, one per day

use crate::models::catalog::{Catalog, ProductId};
use crate::models::inventory::Inventory;
use crate::models::ledger::BalanceLedger;
use crate::models::pricing::PriceBook;
use crate::models::summary::DaySummary;
use crate::supply::SupplierLedger;
use std::collections::BTreeMap;

/// Complete mutable state of one vending run
#[derive(Debug, Clone)]
pub struct SimulationState {
    ledger: BalanceLedger,
    inventory: Inventory,
    prices: PriceBook,
    orders: SupplierLedger,
    history: Vec<DaySummary>,
    notes: String,
}

impl SimulationState {
    /// Fresh state at the start of a run
    pub fn new(
        catalog: &Catalog,
        starting_balance: i64,
        capacity: Option<u32>,
        initial_inventory: &BTreeMap<ProductId, u32>,
        price_overrides: &BTreeMap<ProductId, i64>,
    ) -> Self {
        let mut inventory = Inventory::new(catalog.product_ids(), capacity);
        for (product, units) in initial_inventory {
            inventory.receive(*product, *units);
        }

        Self {
            ledger: BalanceLedger::new(starting_balance),
            inventory,
            prices: PriceBook::from_catalog(catalog, price_overrides),
            orders: SupplierLedger::new(),
            history: Vec::new(),
            notes: String::new(),
        }
    }

    /// Reassemble from checkpointed parts
    pub fn from_parts(
        ledger: BalanceLedger,
        inventory: Inventory,
        prices: PriceBook,
        orders: SupplierLedger,
        history: Vec<DaySummary>,
        notes: String,
    ) -> Self {
        Self {
            ledger,
            inventory,
            prices,
            orders,
            history,
            notes,
        }
    }

    pub fn balance(&self) -> i64 {
        self.ledger.balance()
    }

    pub fn ledger(&self) -> &BalanceLedger {
        &self.ledger
    }

    pub fn ledger_mut(&mut self) -> &mut BalanceLedger {
        &mut self.ledger
    }

    pub fn inventory(&self) -> &Inventory {
        &self.inventory
    }

    pub fn inventory_mut(&mut self) -> &mut Inventory {
        &mut self.inventory
    }

    pub fn prices(&self) -> &PriceBook {
        &self.prices
    }

    pub fn prices_mut(&mut self) -> &mut PriceBook {
        &mut self.prices
    }

    pub fn orders(&self) -> &SupplierLedger {
        &self.orders
    }

    /// Split borrow for order placement, which touches the order book and
    /// the balance together
    pub fn orders_and_ledger_mut(&mut self) -> (&mut SupplierLedger, &mut BalanceLedger) {
        (&mut self.orders, &mut self.ledger)
    }

    /// Split borrow for the delivery phase
    pub fn orders_and_inventory_mut(&mut self) -> (&mut SupplierLedger, &mut Inventory) {
        (&mut self.orders, &mut self.inventory)
    }

    pub fn history(&self) -> &[DaySummary] {
        &self.history
    }

    pub fn last_summary(&self) -> Option<&DaySummary> {
        self.history.last()
    }

    pub(crate) fn push_summary(&mut self, summary: DaySummary) {
        self.history.push(summary);
    }

    pub fn notes(&self) -> &str {
        &self.notes
    }

    pub fn set_notes(&mut self, notes: String) {
        self.notes = notes;
    }
}
