//! Restock Policy
//!
//! Reorder-point replenishment with markup pricing.
//!
//! # Behavior
//!
//! - **Pricing**: when `markup` is set, each product is priced at
//!   `wholesale × markup` (preferred supplier's wholesale, rounded to whole
//!   cents). Prices already at that level are left alone, so this costs
//!   actions only on the first day or after a manual change.
//! - **Restocking**: products whose stock position (on hand + in transit)
//!   is at or below `reorder_point` are topped up to `target_stock`,
//!   lowest position first, without letting the balance drop under
//!   `cash_reserve`. When cash is short the order is shrunk to what fits.
//!
//! Pricing runs before restocking, and both stop when the window's budget
//! runs out.

use super::VendingAgent;
use crate::models::catalog::{ProductId, SupplierId};
use crate::models::summary::Briefing;
use crate::orchestrator::ActionWindow;
use serde::{Deserialize, Serialize};

/// Tuning for [`RestockPolicy`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RestockConfig {
    /// Supplier every order goes to
    pub supplier: SupplierId,
    /// Reorder when on hand + in transit is at or below this
    pub reorder_point: u32,
    /// Stock position to order up to
    pub target_stock: u32,
    /// Retail price as a multiple of wholesale (`None` keeps prices as they are)
    pub markup: Option<f64>,
    /// Balance the policy will not spend below (cents)
    pub cash_reserve: i64,
}

impl Default for RestockConfig {
    fn default() -> Self {
        Self {
            supplier: SupplierId::QuickStock,
            reorder_point: 15,
            target_stock: 40,
            markup: None,
            cash_reserve: 2_000,
        }
    }
}

/// Reorder-point restocking policy
///
/// # Example
///
/// ```
/// use vending_sim_core_rs::orchestrator::{Orchestrator, SimulationConfig};
/// use vending_sim_core_rs::models::summary::Outcome;
/// use vending_sim_core_rs::policy::{RestockConfig, RestockPolicy};
///
/// let config = SimulationConfig { max_days: 10, ..SimulationConfig::default() };
/// let mut sim = Orchestrator::new(config).unwrap();
/// let mut agent = RestockPolicy::new(RestockConfig::default());
///
/// let report = sim.run(&mut agent).unwrap();
/// assert_ne!(report.outcome, Outcome::Bankrupt);
/// ```
#[derive(Debug, Clone)]
pub struct RestockPolicy {
    config: RestockConfig,
}

impl RestockPolicy {
    pub fn new(config: RestockConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RestockConfig {
        &self.config
    }

    /// Markup price for a wholesale cost, at least one cent
    fn retail_price(markup: f64, wholesale: i64) -> i64 {
        ((wholesale as f64 * markup).round() as i64).max(1)
    }

    fn reprice(&self, briefing: &Briefing, window: &mut ActionWindow<'_>) {
        let Some(markup) = self.config.markup else {
            return;
        };

        let targets: Vec<(ProductId, i64)> = {
            let Some(supplier) = window.catalog().supplier(self.config.supplier) else {
                return;
            };
            briefing
                .prices
                .keys()
                .filter_map(|product| {
                    supplier
                        .wholesale_price(*product)
                        .map(|wholesale| (*product, Self::retail_price(markup, wholesale)))
                })
                .collect()
        };

        for (product, price) in targets {
            if briefing.prices.get(&product) == Some(&price) {
                continue;
            }
            if window.remaining_actions() == 0 {
                return;
            }
            if let Err(e) = window.set_price(product, price) {
                tracing::debug!(target: "policy", product = %product, error = %e, "price change rejected");
            }
        }
    }

    fn restock(&self, briefing: &Briefing, window: &mut ActionWindow<'_>) {
        let mut candidates: Vec<(ProductId, u32)> = briefing
            .inventory
            .keys()
            .map(|product| (*product, briefing.stock_position(*product)))
            .filter(|(_, position)| *position <= self.config.reorder_point)
            .collect();
        candidates.sort_by_key(|(_, position)| *position);

        let mut spendable = briefing.balance - self.config.cash_reserve;

        for (product, position) in candidates {
            if window.remaining_actions() == 0 || spendable <= 0 {
                return;
            }

            let Some(unit_cost) = window
                .catalog()
                .supplier(self.config.supplier)
                .and_then(|s| s.wholesale_price(product))
            else {
                continue;
            };
            if unit_cost <= 0 {
                continue;
            }

            let wanted = self.config.target_stock.saturating_sub(position) as i64;
            let affordable = spendable / unit_cost;
            let quantity = wanted.min(affordable);
            if quantity <= 0 {
                continue;
            }

            match window.place_order(self.config.supplier, product, quantity as u32) {
                Ok(confirmation) => spendable -= confirmation.total_cost,
                Err(e) => {
                    tracing::debug!(target: "policy", product = %product, error = %e, "restock order rejected");
                }
            }
        }
    }
}

impl VendingAgent for RestockPolicy {
    fn act(&mut self, briefing: &Briefing, window: &mut ActionWindow<'_>) {
        self.reprice(briefing, window);
        self.restock(briefing, window);
    }

    fn name(&self) -> &str {
        "restock"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orchestrator::{DayOpening, Orchestrator, SimulationConfig};
    use crate::rng::ScriptedSource;

    fn open(config: SimulationConfig) -> (Orchestrator, Briefing) {
        let mut sim =
            Orchestrator::with_random_source(config, Box::new(ScriptedSource::constant(0.5)))
                .unwrap();
        match sim.begin_day().unwrap() {
            DayOpening::Window(briefing) => (sim, briefing),
            DayOpening::Over(_) => panic!("day 1 should open"),
        }
    }

    #[test]
    fn test_retail_price_rounds_to_cents() {
        assert_eq!(RestockPolicy::retail_price(2.5, 70), 175);
        assert_eq!(RestockPolicy::retail_price(2.5, 45), 113);
        assert_eq!(RestockPolicy::retail_price(0.001, 30), 1);
    }

    #[test]
    fn test_orders_up_to_target_lowest_first() {
        let (mut sim, briefing) = open(SimulationConfig::default());
        let mut policy = RestockPolicy::new(RestockConfig::default());

        {
            let mut window = ActionWindow::new(&mut sim);
            policy.act(&briefing, &mut window);
        }

        let pending = sim.state().orders().pending_units();
        assert_eq!(pending.get(&ProductId::Soda), Some(&40));
        assert_eq!(pending.get(&ProductId::Chips), Some(&40));
        assert_eq!(pending.get(&ProductId::Candy), Some(&40));
        assert_eq!(sim.actions_used(), 3);
    }

    #[test]
    fn test_respects_cash_reserve() {
        let config = SimulationConfig {
            starting_balance: 3_000,
            ..SimulationConfig::default()
        };
        let (mut sim, briefing) = open(config);
        let policy_config = RestockConfig {
            cash_reserve: 2_000,
            ..RestockConfig::default()
        };
        let mut policy = RestockPolicy::new(policy_config);

        {
            let mut window = ActionWindow::new(&mut sim);
            policy.act(&briefing, &mut window);
        }

        // 3000 - 500 fee = 2500; 500 spendable
        assert!(sim.balance() >= 2_000);
    }

    #[test]
    fn test_markup_sets_prices_once() {
        let (mut sim, briefing) = open(SimulationConfig::default());
        let mut policy = RestockPolicy::new(RestockConfig {
            markup: Some(2.5),
            target_stock: 0,
            ..RestockConfig::default()
        });

        {
            let mut window = ActionWindow::new(&mut sim);
            policy.act(&briefing, &mut window);
        }

        // Soda is already 175, so only chips and candy change
        assert_eq!(sim.actions_used(), 2);
        assert_eq!(sim.state().prices().price(ProductId::Chips), Some(113));
        assert_eq!(sim.state().prices().price(ProductId::Candy), Some(75));
    }
}
