//! Inventory store
//!
//! On-hand units per product. Levels are unsigned so they can never go
//! negative; an optional per-product machine capacity bounds deliveries.

use crate::models::catalog::ProductId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Outcome of receiving a delivery
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Receipt {
    /// Units that fit in the machine
    pub stocked: u32,
    /// Units over capacity, thrown away
    pub discarded: u32,
}

/// Units on hand for every catalog product
///
/// # Example
/// ```
/// use vending_sim_core_rs::models::catalog::ProductId;
/// use vending_sim_core_rs::models::inventory::Inventory;
///
/// let mut inventory = Inventory::new(ProductId::ALL, Some(40));
/// let receipt = inventory.receive(ProductId::Soda, 50);
/// assert_eq!(receipt.stocked, 40);
/// assert_eq!(receipt.discarded, 10);
///
/// assert_eq!(inventory.sell_up_to(ProductId::Soda, 55), 40);
/// assert_eq!(inventory.on_hand(ProductId::Soda), 0);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Inventory {
    levels: BTreeMap<ProductId, u32>,
    capacity: Option<u32>,
}

impl Inventory {
    /// Empty inventory for the given products
    pub fn new(products: impl IntoIterator<Item = ProductId>, capacity: Option<u32>) -> Self {
        Self {
            levels: products.into_iter().map(|p| (p, 0)).collect(),
            capacity,
        }
    }

    /// Rebuild from stored levels (initial stock or checkpoint)
    pub fn with_levels(levels: BTreeMap<ProductId, u32>, capacity: Option<u32>) -> Self {
        Self { levels, capacity }
    }

    pub fn on_hand(&self, product: ProductId) -> u32 {
        self.levels.get(&product).copied().unwrap_or(0)
    }

    pub fn levels(&self) -> &BTreeMap<ProductId, u32> {
        &self.levels
    }

    pub fn capacity(&self) -> Option<u32> {
        self.capacity
    }

    /// Free slots for a product (`None` when uncapped)
    pub fn headroom(&self, product: ProductId) -> Option<u32> {
        self.capacity
            .map(|cap| cap.saturating_sub(self.on_hand(product)))
    }

    /// Add delivered units, keeping at most `capacity` on hand
    pub fn receive(&mut self, product: ProductId, quantity: u32) -> Receipt {
        let stocked = match self.headroom(product) {
            Some(room) => quantity.min(room),
            None => quantity,
        };
        let level = self.levels.entry(product).or_insert(0);
        *level = level.saturating_add(stocked);
        Receipt {
            stocked,
            discarded: quantity - stocked,
        }
    }

    /// Sell as many of `demand` as are on hand; returns units sold
    pub fn sell_up_to(&mut self, product: ProductId, demand: u32) -> u32 {
        let on_hand = self.on_hand(product);
        let sold = demand.min(on_hand);
        if sold > 0 {
            self.levels.insert(product, on_hand - sold);
        }
        sold
    }

    /// Products at or below `threshold` units
    pub fn low_stock(&self, threshold: u32) -> Vec<ProductId> {
        self.levels
            .iter()
            .filter(|(_, units)| **units <= threshold)
            .map(|(product, _)| *product)
            .collect()
    }
}
