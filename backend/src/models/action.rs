//! Agent-facing operations: errors and responses
//!
//! Every rejection leaves the simulation untouched, so an agent can read
//! the error and try something else within the same action window.

use crate::models::order::OrderConfirmation;
use crate::models::summary::DaySummary;
use crate::models::catalog::ProductId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

/// Recoverable rejection of a single agent operation
#[derive(Debug, Error, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ActionError {
    #[error("Invalid price {price_cents} for {product}: {reason}")]
    InvalidPrice {
        product: String,
        price_cents: i64,
        reason: String,
    },

    #[error("Invalid order: {reason}")]
    InvalidOrder { reason: String },

    #[error("Insufficient funds: order costs {required}, balance is {available}")]
    InsufficientFunds { required: i64, available: i64 },

    #[error("Action budget exceeded: {limit} actions per day")]
    ActionBudgetExceeded { limit: usize },

    #[error("Actions are only accepted during the agent window (current phase: {phase})")]
    WindowClosed { phase: String },
}

impl ActionError {
    pub fn invalid_order(reason: impl Into<String>) -> Self {
        ActionError::InvalidOrder {
            reason: reason.into(),
        }
    }
}

/// Successful result of an agent operation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ActionResponse {
    OrderPlaced(OrderConfirmation),
    PriceSet {
        product: ProductId,
        old_price: i64,
        new_price: i64,
    },
    Inventory {
        levels: BTreeMap<ProductId, u32>,
    },
    Balance {
        balance: i64,
    },
    SalesHistory {
        days: Vec<DaySummary>,
    },
    NotesSaved,
}
