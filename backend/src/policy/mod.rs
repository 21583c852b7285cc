//! Agent Policy Module
//!
//! An agent runs the vending machine during each day's action window.
//!
//! # Overview
//!
//! When the window opens the controller hands the agent a [`Briefing`] and
//! an [`ActionWindow`]. The agent calls any of the window's operations
//! (orders, price changes, queries, notes) and returns when it is done. The
//! window enforces the day's action budget, so a policy never needs to count.
//!
//! # Policy Interface
//!
//! All policies implement the `VendingAgent` trait:
//! ```rust
//! use vending_sim_core_rs::models::catalog::{ProductId, SupplierId};
//! use vending_sim_core_rs::models::summary::Briefing;
//! use vending_sim_core_rs::orchestrator::ActionWindow;
//! use vending_sim_core_rs::policy::VendingAgent;
//!
//! struct SodaOnly;
//!
//! impl VendingAgent for SodaOnly {
//!     fn act(&mut self, briefing: &Briefing, window: &mut ActionWindow<'_>) {
//!         if briefing.stock_position(ProductId::Soda) < 20 {
//!             let _ = window.place_order(SupplierId::QuickStock, ProductId::Soda, 40);
//!         }
//!     }
//! }
//! ```
//!
//! Available policies:
//! 1. **Idle**: never acts (baseline: pays fees until the run ends)
//! 2. **Restock**: markup pricing plus reorder-point restocking
//! 3. **Scripted**: replays a fixed per-day action list
//!
//! Policies are built from JSON through [`AgentPolicyConfig`]:
//!
//! ```rust
//! use vending_sim_core_rs::policy::AgentPolicyConfig;
//!
//! let config: AgentPolicyConfig =
//!     serde_json::from_str(r#"{"type": "Restock", "reorder_point": 10}"#).unwrap();
//! let agent = config.build_agent();
//! assert_eq!(agent.name(), "restock");
//! ```

use crate::models::summary::Briefing;
use crate::orchestrator::ActionWindow;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub mod idle;
pub mod restock;
pub mod scripted;

pub use idle::IdlePolicy;
pub use restock::{RestockConfig, RestockPolicy};
pub use scripted::{ScriptedAction, ScriptedPolicy, ScriptedResult};

/// Decision maker for the daily action window
pub trait VendingAgent {
    /// Act on today's briefing; returning closes the window
    fn act(&mut self, briefing: &Briefing, window: &mut ActionWindow<'_>);

    /// Short name for logs and reports
    fn name(&self) -> &str {
        "agent"
    }
}

/// Serializable choice of built-in policy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum AgentPolicyConfig {
    Idle,
    Restock(RestockConfig),
    Scripted {
        /// Actions keyed by day number
        actions: BTreeMap<u32, Vec<ScriptedAction>>,
    },
}

impl Default for AgentPolicyConfig {
    fn default() -> Self {
        AgentPolicyConfig::Restock(RestockConfig::default())
    }
}

impl AgentPolicyConfig {
    /// Instantiate the configured policy
    pub fn build_agent(&self) -> Box<dyn VendingAgent> {
        match self {
            AgentPolicyConfig::Idle => Box::new(IdlePolicy),
            AgentPolicyConfig::Restock(config) => Box::new(RestockPolicy::new(config.clone())),
            AgentPolicyConfig::Scripted { actions } => {
                Box::new(ScriptedPolicy::new(actions.clone()))
            }
        }
    }
}
