//! Retail prices set by the agent

use crate::models::action::ActionError;
use crate::models::catalog::{Catalog, ProductId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Current retail price per product (cents)
///
/// Prices persist from day to day until the agent changes them. Only
/// strictly positive prices are accepted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceBook {
    prices: BTreeMap<ProductId, i64>,
}

impl PriceBook {
    /// Catalog default prices, with optional overrides applied on top
    pub fn from_catalog(catalog: &Catalog, overrides: &BTreeMap<ProductId, i64>) -> Self {
        let prices = catalog
            .products
            .values()
            .map(|p| (p.id, overrides.get(&p.id).copied().unwrap_or(p.default_price)))
            .collect();
        Self { prices }
    }

    pub fn with_prices(prices: BTreeMap<ProductId, i64>) -> Self {
        Self { prices }
    }

    pub fn price(&self, product: ProductId) -> Option<i64> {
        self.prices.get(&product).copied()
    }

    pub fn prices(&self) -> &BTreeMap<ProductId, i64> {
        &self.prices
    }

    /// Set a new price; returns the previous one
    pub fn set(&mut self, product: ProductId, price_cents: i64) -> Result<i64, ActionError> {
        let old = self.prices.get(&product).copied().ok_or_else(|| {
            ActionError::InvalidPrice {
                product: product.to_string(),
                price_cents,
                reason: "product is not sold by this machine".to_string(),
            }
        })?;

        if price_cents <= 0 {
            return Err(ActionError::InvalidPrice {
                product: product.to_string(),
                price_cents,
                reason: "price must be positive".to_string(),
            });
        }

        self.prices.insert(product, price_cents);
        Ok(old)
    }
}
