//! Scripted Policy
//!
//! Replays a fixed list of actions per day and keeps every result, so tests
//! and demo configs can drive the simulation without writing an agent.

use super::VendingAgent;
use crate::models::action::{ActionError, ActionResponse};
use crate::models::catalog::{ProductId, SupplierId};
use crate::models::summary::Briefing;
use crate::orchestrator::ActionWindow;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One agent operation in serializable form
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum ScriptedAction {
    Order {
        supplier: SupplierId,
        product: ProductId,
        quantity: u32,
    },
    SetPrice {
        product: ProductId,
        price_cents: i64,
    },
    CheckInventory,
    CheckBalance,
    ViewSalesHistory,
    Note {
        text: String,
    },
}

impl ScriptedAction {
    /// Perform the action through the window
    pub fn apply(&self, window: &mut ActionWindow<'_>) -> Result<ActionResponse, ActionError> {
        match self {
            ScriptedAction::Order {
                supplier,
                product,
                quantity,
            } => window
                .place_order(*supplier, *product, *quantity)
                .map(ActionResponse::OrderPlaced),
            ScriptedAction::SetPrice {
                product,
                price_cents,
            } => window
                .set_price(*product, *price_cents)
                .map(|old_price| ActionResponse::PriceSet {
                    product: *product,
                    old_price,
                    new_price: *price_cents,
                }),
            ScriptedAction::CheckInventory => window
                .check_inventory()
                .map(|levels| ActionResponse::Inventory { levels }),
            ScriptedAction::CheckBalance => window
                .check_balance()
                .map(|balance| ActionResponse::Balance { balance }),
            ScriptedAction::ViewSalesHistory => window
                .view_sales_history()
                .map(|days| ActionResponse::SalesHistory { days }),
            ScriptedAction::Note { text } => window
                .take_notes(text.clone())
                .map(|_| ActionResponse::NotesSaved),
        }
    }
}

/// Outcome of one scripted action
#[derive(Debug, Clone, PartialEq)]
pub struct ScriptedResult {
    pub day: u32,
    pub action: ScriptedAction,
    pub result: Result<ActionResponse, ActionError>,
}

/// Policy that replays `actions[day]` each day
#[derive(Debug, Clone, Default)]
pub struct ScriptedPolicy {
    actions: BTreeMap<u32, Vec<ScriptedAction>>,
    results: Vec<ScriptedResult>,
}

impl ScriptedPolicy {
    pub fn new(actions: BTreeMap<u32, Vec<ScriptedAction>>) -> Self {
        Self {
            actions,
            results: Vec::new(),
        }
    }

    /// Builder-style helper for tests
    pub fn on_day(mut self, day: u32, actions: Vec<ScriptedAction>) -> Self {
        self.actions.entry(day).or_default().extend(actions);
        self
    }

    /// Every action attempted so far, in order
    pub fn results(&self) -> &[ScriptedResult] {
        &self.results
    }

    pub fn results_for_day(&self, day: u32) -> impl Iterator<Item = &ScriptedResult> {
        self.results.iter().filter(move |r| r.day == day)
    }
}

impl VendingAgent for ScriptedPolicy {
    fn act(&mut self, briefing: &Briefing, window: &mut ActionWindow<'_>) {
        let Some(actions) = self.actions.get(&briefing.day) else {
            return;
        };

        for action in actions {
            let result = action.apply(window);
            if let Err(e) = &result {
                tracing::debug!(target: "policy", day = briefing.day, error = %e, "scripted action rejected");
            }
            self.results.push(ScriptedResult {
                day: briefing.day,
                action: action.clone(),
                result,
            });
        }
    }

    fn name(&self) -> &str {
        "scripted"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orchestrator::{Orchestrator, SimulationConfig};
    use crate::rng::ScriptedSource;

    #[test]
    fn test_records_results_including_rejections() {
        let config = SimulationConfig {
            max_days: 2,
            max_actions_per_day: 2,
            ..SimulationConfig::default()
        };
        let mut sim =
            Orchestrator::with_random_source(config, Box::new(ScriptedSource::constant(0.5)))
                .unwrap();
        let mut policy = ScriptedPolicy::default().on_day(
            1,
            vec![
                ScriptedAction::SetPrice {
                    product: ProductId::Soda,
                    price_cents: 0,
                },
                ScriptedAction::CheckBalance,
                ScriptedAction::Note {
                    text: "restock soda".to_string(),
                },
                ScriptedAction::CheckInventory,
            ],
        );

        sim.run_day(&mut policy).unwrap();

        let results: Vec<_> = policy.results_for_day(1).collect();
        assert_eq!(results.len(), 4);
        assert!(matches!(
            results[0].result,
            Err(ActionError::InvalidPrice { .. })
        ));
        assert_eq!(
            results[1].result,
            Ok(ActionResponse::Balance { balance: 49_500 })
        );
        assert_eq!(results[2].result, Ok(ActionResponse::NotesSaved));
        assert_eq!(
            results[3].result,
            Err(ActionError::ActionBudgetExceeded { limit: 2 })
        );
        assert_eq!(sim.notes(), "restock soda");
    }
}
