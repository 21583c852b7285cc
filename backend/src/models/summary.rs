//! Per-day records handed to the agent and kept as history

use crate::models::catalog::ProductId;
use crate::models::order::{DeliveryRecord, OrderConfirmation};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// How the run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    /// Final balance above the starting balance
    Win,
    /// Survived but did not beat the starting balance
    Loss,
    /// Balance fell below zero at a check point
    Bankrupt,
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Outcome::Win => "win",
            Outcome::Loss => "loss",
            Outcome::Bankrupt => "bankrupt",
        };
        f.write_str(name)
    }
}

/// Financial summary of one settled day
///
/// Satisfies `ending_balance == opening_balance - fee_charged - order_spend + revenue`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DaySummary {
    pub day: u32,
    pub opening_balance: i64,
    pub fee_charged: i64,
    pub deliveries: Vec<DeliveryRecord>,
    pub orders_placed: Vec<OrderConfirmation>,
    pub order_spend: i64,
    pub units_sold: BTreeMap<ProductId, u32>,
    /// Customers turned away for lack of stock
    pub unmet_demand: BTreeMap<ProductId, u32>,
    pub revenue: i64,
    pub actions_used: usize,
    pub ending_balance: i64,
}

impl DaySummary {
    pub fn total_units_sold(&self) -> u32 {
        self.units_sold.values().sum()
    }

    /// Net cash change over the day
    pub fn net_change(&self) -> i64 {
        self.ending_balance - self.opening_balance
    }

    /// True when the balance identity holds exactly
    pub fn reconciles(&self) -> bool {
        self.opening_balance - self.fee_charged - self.order_spend + self.revenue
            == self.ending_balance
    }
}

/// Situation shown to the agent when its action window opens
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Briefing {
    pub day: u32,
    pub max_days: u32,
    pub balance: i64,
    pub inventory: BTreeMap<ProductId, u32>,
    pub prices: BTreeMap<ProductId, i64>,
    /// Units sold per product yesterday (empty on day 1)
    pub yesterday_sales: BTreeMap<ProductId, u32>,
    pub deliveries_today: Vec<DeliveryRecord>,
    pub pending_deliveries: usize,
    pub pending_units: BTreeMap<ProductId, u32>,
    pub low_stock: Vec<ProductId>,
    pub actions_allowed: usize,
}

impl Briefing {
    /// On-hand plus in-transit units
    pub fn stock_position(&self, product: ProductId) -> u32 {
        self.inventory.get(&product).copied().unwrap_or(0)
            + self.pending_units.get(&product).copied().unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reconciles() {
        let mut units_sold = BTreeMap::new();
        units_sold.insert(ProductId::Soda, 20);

        let summary = DaySummary {
            day: 1,
            opening_balance: 50_000,
            fee_charged: 500,
            deliveries: vec![],
            orders_placed: vec![],
            order_spend: 0,
            units_sold,
            unmet_demand: BTreeMap::new(),
            revenue: 3_500,
            actions_used: 0,
            ending_balance: 53_000,
        };

        assert!(summary.reconciles());
        assert_eq!(summary.net_change(), 3_000);
        assert_eq!(summary.total_units_sold(), 20);
    }
}
