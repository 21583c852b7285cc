//! Demand engine: simulated customers per product per day.
//!
//! # Model
//!
//! ```text
//! demand = base_demand × (numerator / (price + offset)) × random_factor
//! random_factor ~ Uniform[min_factor, max_factor)
//! ```
//!
//! with price in dollars, the result rounded to the nearest integer and
//! floored at zero. With the defaults (2.0, 0.5, [0.7, 1.3)) a product
//! priced at $1.50 sells its base demand on average.
//!
//! # Key Principles
//!
//! 1. **Determinism**: exactly one random draw per product per day
//! 2. **Independence**: each product is sampled separately, in catalog order
//! 3. **No backorders**: demand beyond stock is lost
//!
//! # Example
//!
//! ```
//! use vending_sim_core_rs::demand::DemandModel;
//! use vending_sim_core_rs::rng::ScriptedSource;
//!
//! let model = DemandModel::default();
//! // factor = 0.7 + 0.6 × 0.5 = 1.0; 20 × 2.0 / 2.25 = 17.8 → 18
//! let mut rng = ScriptedSource::constant(0.5);
//! assert_eq!(model.willing_customers(20, 175, &mut rng).unwrap(), 18);
//! ```

use crate::rng::RandomSource;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum DemandError {
    #[error("Price {price_cents} is at or below the demand curve asymptote (-{offset} dollars)")]
    InvalidPrice { price_cents: i64, offset: f64 },

    #[error("Invalid demand model: {0}")]
    InvalidModel(String),
}

/// Parameters of the price-response curve
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DemandModel {
    /// Numerator of the price factor
    pub numerator: f64,
    /// Dollars added to the price in the denominator
    pub price_offset: f64,
    /// Lower bound of the random factor (inclusive)
    pub min_factor: f64,
    /// Upper bound of the random factor (exclusive)
    pub max_factor: f64,
}

impl Default for DemandModel {
    fn default() -> Self {
        Self {
            numerator: 2.0,
            price_offset: 0.5,
            min_factor: 0.7,
            max_factor: 1.3,
        }
    }
}

/// One product's customer phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SalesOutcome {
    /// Customers willing to buy
    pub demand: u32,
    /// Units actually sold
    pub sold: u32,
    /// Customers turned away
    pub unmet: u32,
    /// price × sold (cents)
    pub revenue: i64,
}

impl DemandModel {
    pub fn validate(&self) -> Result<(), DemandError> {
        let finite = [
            self.numerator,
            self.price_offset,
            self.min_factor,
            self.max_factor,
        ]
        .iter()
        .all(|v| v.is_finite());
        if !finite {
            return Err(DemandError::InvalidModel(
                "parameters must be finite".to_string(),
            ));
        }
        if self.numerator <= 0.0 {
            return Err(DemandError::InvalidModel(
                "numerator must be positive".to_string(),
            ));
        }
        // Prices are at least one cent, so a non-negative offset keeps every
        // valid price on the curve
        if self.price_offset < 0.0 {
            return Err(DemandError::InvalidModel(format!(
                "price offset {} is negative",
                self.price_offset
            )));
        }
        if self.min_factor < 0.0 || self.min_factor > self.max_factor {
            return Err(DemandError::InvalidModel(format!(
                "factor range [{}, {}) is invalid",
                self.min_factor, self.max_factor
            )));
        }
        Ok(())
    }

    /// Price multiplier on base demand; rejects prices at or below `-price_offset`
    pub fn price_factor(&self, price_cents: i64) -> Result<f64, DemandError> {
        let price = price_cents as f64 / 100.0;
        if price <= -self.price_offset {
            return Err(DemandError::InvalidPrice {
                price_cents,
                offset: self.price_offset,
            });
        }
        Ok(self.numerator / (price + self.price_offset))
    }

    /// Mean demand over the random factor (unrounded)
    pub fn expected_demand(&self, base_demand: u32, price_cents: i64) -> Result<f64, DemandError> {
        let mean_factor = (self.min_factor + self.max_factor) / 2.0;
        Ok(base_demand as f64 * self.price_factor(price_cents)? * mean_factor)
    }

    /// Customers willing to buy today; consumes one draw from `rng`
    ///
    /// The draw happens only after the price has been validated.
    pub fn willing_customers(
        &self,
        base_demand: u32,
        price_cents: i64,
        rng: &mut dyn RandomSource,
    ) -> Result<u32, DemandError> {
        let price_factor = self.price_factor(price_cents)?;
        let random_factor = rng.uniform(self.min_factor, self.max_factor);
        let raw = (base_demand as f64 * price_factor * random_factor).round();

        if raw <= 0.0 {
            Ok(0)
        } else if raw >= u32::MAX as f64 {
            Ok(u32::MAX)
        } else {
            Ok(raw as u32)
        }
    }

    /// Run the customer phase for one product
    ///
    /// `sell` receives the demand and returns units actually taken from stock.
    pub fn simulate_product(
        &self,
        base_demand: u32,
        price_cents: i64,
        rng: &mut dyn RandomSource,
        sell: impl FnOnce(u32) -> u32,
    ) -> Result<SalesOutcome, DemandError> {
        let demand = self.willing_customers(base_demand, price_cents, rng)?;
        let sold = sell(demand).min(demand);
        Ok(SalesOutcome {
            demand,
            sold,
            unmet: demand - sold,
            revenue: price_cents * sold as i64,
        })
    }
}
