//! Order placement and delivery application

use crate::models::action::ActionError;
use crate::models::catalog::{Catalog, ProductId, SupplierId};
use crate::models::inventory::Inventory;
use crate::models::ledger::{BalanceLedger, EntryCause};
use crate::models::order::{DeliveryRecord, OrderConfirmation, PendingOrder};
use crate::rng::RandomSource;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// What to do with an order the balance cannot cover
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FundsPolicy {
    /// Reject with `InsufficientFunds`
    #[default]
    Reject,
    /// Accept and let the balance go negative; the settlement check ends the run
    AllowOverdraft,
}

/// Price check for a prospective order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderQuote {
    pub unit_cost: i64,
    pub total_cost: i64,
    pub lead_time_days: u32,
    pub max_extra_days: u32,
}

/// Paid orders awaiting delivery
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SupplierLedger {
    pending: Vec<PendingOrder>,
    /// Counter for generating order ids
    next_order_seq: u64,
}

impl Default for SupplierLedger {
    fn default() -> Self {
        Self::new()
    }
}

impl SupplierLedger {
    pub fn new() -> Self {
        Self {
            pending: Vec::new(),
            next_order_seq: 1,
        }
    }

    /// Rebuild from a checkpoint
    pub fn from_snapshot(pending: Vec<PendingOrder>, next_order_seq: u64) -> Self {
        Self {
            pending,
            next_order_seq,
        }
    }

    /// Validate an order and price it without touching any state
    pub fn quote(
        catalog: &Catalog,
        supplier: SupplierId,
        product: ProductId,
        quantity: u32,
    ) -> Result<OrderQuote, ActionError> {
        if quantity == 0 {
            return Err(ActionError::invalid_order("quantity must be positive"));
        }

        let supplier_entry = catalog
            .supplier(supplier)
            .ok_or_else(|| ActionError::invalid_order(format!("unknown supplier {}", supplier)))?;

        let unit_cost = supplier_entry.wholesale_price(product).ok_or_else(|| {
            ActionError::invalid_order(format!("{} does not sell {}", supplier, product))
        })?;

        let total_cost = unit_cost
            .checked_mul(quantity as i64)
            .ok_or_else(|| ActionError::invalid_order("order total overflows"))?;

        Ok(OrderQuote {
            unit_cost,
            total_cost,
            lead_time_days: supplier_entry.lead_time_days,
            max_extra_days: supplier_entry.reliability.max_extra_days(),
        })
    }

    /// Place and pay for an order
    ///
    /// On success the balance is debited immediately and a pending order is
    /// recorded. On error nothing changes.
    #[allow(clippy::too_many_arguments)]
    pub fn place_order(
        &mut self,
        catalog: &Catalog,
        ledger: &mut BalanceLedger,
        funds_policy: FundsPolicy,
        day: u32,
        supplier: SupplierId,
        product: ProductId,
        quantity: u32,
        rng: &mut dyn RandomSource,
    ) -> Result<OrderConfirmation, ActionError> {
        let quote = Self::quote(catalog, supplier, product, quantity)?;

        if funds_policy == FundsPolicy::Reject && !ledger.can_afford(quote.total_cost) {
            return Err(ActionError::InsufficientFunds {
                required: quote.total_cost,
                available: ledger.balance(),
            });
        }

        // Only accepted orders draw randomness
        let delay = if quote.max_extra_days > 0 {
            rng.range_inclusive(0, quote.max_extra_days)
        } else {
            0
        };

        let order_id = format!("ord_{:06}", self.next_order_seq);
        self.next_order_seq += 1;

        let promised_day = day + quote.lead_time_days;
        let order = PendingOrder {
            order_id: order_id.clone(),
            supplier,
            product,
            quantity,
            cost: quote.total_cost,
            placed_day: day,
            promised_day,
            due_day: promised_day + delay,
        };

        let balance_after = ledger.debit(day, EntryCause::Order, quote.total_cost, Some(order_id));

        tracing::debug!(
            target: "supply",
            day,
            order_id = %order.order_id,
            supplier = %supplier,
            product = %product,
            quantity,
            cost = quote.total_cost,
            due_day = order.due_day,
            "order placed"
        );

        let confirmation = OrderConfirmation {
            order_id: order.order_id.clone(),
            supplier,
            product,
            quantity,
            unit_cost: quote.unit_cost,
            total_cost: quote.total_cost,
            placed_day: day,
            promised_day,
            expected_delivery_day: order.due_day,
            balance_after,
        };

        self.pending.push(order);
        Ok(confirmation)
    }

    /// Move every order due on or before `day` into inventory, oldest first
    pub fn apply_due(&mut self, day: u32, inventory: &mut Inventory) -> Vec<DeliveryRecord> {
        let (due, waiting): (Vec<PendingOrder>, Vec<PendingOrder>) =
            std::mem::take(&mut self.pending)
                .into_iter()
                .partition(|order| order.is_due(day));
        self.pending = waiting;

        due.into_iter()
            .map(|order| {
                let receipt = inventory.receive(order.product, order.quantity);
                if receipt.discarded > 0 {
                    tracing::warn!(
                        target: "supply",
                        day,
                        order_id = %order.order_id,
                        product = %order.product,
                        discarded = receipt.discarded,
                        "delivery exceeded machine capacity"
                    );
                }
                DeliveryRecord {
                    order_id: order.order_id,
                    supplier: order.supplier,
                    product: order.product,
                    quantity: order.quantity,
                    units_stocked: receipt.stocked,
                    units_discarded: receipt.discarded,
                    placed_day: order.placed_day,
                    due_day: order.due_day,
                    delivered_day: day,
                }
            })
            .collect()
    }

    pub fn pending(&self) -> &[PendingOrder] {
        &self.pending
    }

    pub fn next_order_seq(&self) -> u64 {
        self.next_order_seq
    }

    /// Units in transit per product
    pub fn pending_units(&self) -> BTreeMap<ProductId, u32> {
        let mut units = BTreeMap::new();
        for order in &self.pending {
            *units.entry(order.product).or_insert(0) += order.quantity;
        }
        units
    }
}
