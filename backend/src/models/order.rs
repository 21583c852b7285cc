//! Wholesale order records
//!
//! CRITICAL: All money values are i64 (cents)

use crate::models::catalog::{ProductId, SupplierId};
use serde::{Deserialize, Serialize};

/// An order that has been paid for but not yet delivered
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingOrder {
    pub order_id: String,
    pub supplier: SupplierId,
    pub product: ProductId,
    pub quantity: u32,
    /// Total cost, already debited from the balance
    pub cost: i64,
    pub placed_day: u32,
    /// Day the supplier's lead time promises
    pub promised_day: u32,
    /// Day it will actually arrive (promised plus any drawn delay)
    pub due_day: u32,
}

impl PendingOrder {
    pub fn is_due(&self, day: u32) -> bool {
        self.due_day <= day
    }

    pub fn delay_days(&self) -> u32 {
        self.due_day - self.promised_day
    }
}

/// Receipt returned to the agent for an accepted order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderConfirmation {
    pub order_id: String,
    pub supplier: SupplierId,
    pub product: ProductId,
    pub quantity: u32,
    pub unit_cost: i64,
    pub total_cost: i64,
    pub placed_day: u32,
    pub promised_day: u32,
    pub expected_delivery_day: u32,
    /// Balance right after the debit
    pub balance_after: i64,
}

/// A pending order folded into inventory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryRecord {
    pub order_id: String,
    pub supplier: SupplierId,
    pub product: ProductId,
    pub quantity: u32,
    pub units_stocked: u32,
    pub units_discarded: u32,
    pub placed_day: u32,
    pub due_day: u32,
    pub delivered_day: u32,
}
