//! Product and supplier catalog
//!
//! Static tables fixed at simulation start: what the machine sells, how
//! much each product sells at a neutral price, and what each supplier
//! charges and how fast it delivers.
//!
//! CRITICAL: All money values are i64 (cents)

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Identifier parsing failure
#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum CatalogError {
    #[error("Unknown product: {0}")]
    UnknownProduct(String),

    #[error("Unknown supplier: {0}")]
    UnknownSupplier(String),

    #[error("Invalid catalog: {0}")]
    Invalid(String),
}

/// Products stocked by the machine
///
/// Ordering is the catalog order used for every per-product loop, so the
/// demand engine draws randomness in a stable sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ProductId {
    Soda,
    Chips,
    Candy,
}

impl ProductId {
    /// All products in catalog order
    pub const ALL: [ProductId; 3] = [ProductId::Soda, ProductId::Chips, ProductId::Candy];

    pub fn as_str(&self) -> &'static str {
        match self {
            ProductId::Soda => "Soda",
            ProductId::Chips => "Chips",
            ProductId::Candy => "Candy",
        }
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProductId {
    type Err = CatalogError;

    /// Case-insensitive; accepts simple plurals ("sodas", "chips")
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        match normalized.trim_end_matches('s') {
            "soda" => Ok(ProductId::Soda),
            "chip" => Ok(ProductId::Chips),
            "candy" | "candie" => Ok(ProductId::Candy),
            _ => Err(CatalogError::UnknownProduct(s.to_string())),
        }
    }
}

/// Wholesale suppliers
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SupplierId {
    QuickStock,
    VendMart,
    BulkBarn,
}

impl SupplierId {
    pub const ALL: [SupplierId; 3] = [
        SupplierId::QuickStock,
        SupplierId::VendMart,
        SupplierId::BulkBarn,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SupplierId::QuickStock => "QuickStock",
            SupplierId::VendMart => "VendMart",
            SupplierId::BulkBarn => "BulkBarn",
        }
    }
}

impl fmt::Display for SupplierId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SupplierId {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect::<String>()
            .to_ascii_lowercase();
        match normalized.as_str() {
            "quickstock" => Ok(SupplierId::QuickStock),
            "vendmart" => Ok(SupplierId::VendMart),
            "bulkbarn" => Ok(SupplierId::BulkBarn),
            _ => Err(CatalogError::UnknownSupplier(s.to_string())),
        }
    }
}

/// A product the machine sells
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    /// Average customers per day at the reference price
    pub base_demand: u32,
    /// Retail price the machine starts with (cents)
    pub default_price: i64,
}

/// How dependable a supplier's lead time is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Reliability {
    /// Always delivers on the promised day
    Reliable,
    /// May add 0..=max_extra_days, drawn uniformly when the order is placed
    Unreliable { max_extra_days: u32 },
}

impl Reliability {
    pub fn max_extra_days(&self) -> u32 {
        match self {
            Reliability::Reliable => 0,
            Reliability::Unreliable { max_extra_days } => *max_extra_days,
        }
    }
}

/// A wholesale supplier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Supplier {
    pub id: SupplierId,
    /// Price per unit for each product the supplier carries (cents)
    pub wholesale: BTreeMap<ProductId, i64>,
    /// Days between ordering and earliest delivery
    pub lead_time_days: u32,
    pub reliability: Reliability,
}

impl Supplier {
    /// Unit price for a product, or `None` if not carried
    pub fn wholesale_price(&self, product: ProductId) -> Option<i64> {
        self.wholesale.get(&product).copied()
    }

    pub fn carries(&self, product: ProductId) -> bool {
        self.wholesale.contains_key(&product)
    }
}

/// Complete catalog of products and suppliers
///
/// # Example
/// ```
/// use vending_sim_core_rs::models::catalog::{Catalog, ProductId, SupplierId};
///
/// let catalog = Catalog::default();
/// let quickstock = catalog.supplier(SupplierId::QuickStock).unwrap();
/// assert_eq!(quickstock.wholesale_price(ProductId::Soda), Some(70));
/// assert_eq!(catalog.product(ProductId::Soda).unwrap().default_price, 175);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    pub products: BTreeMap<ProductId, Product>,
    pub suppliers: BTreeMap<SupplierId, Supplier>,
}

impl Default for Catalog {
    fn default() -> Self {
        let products = [
            (ProductId::Soda, 20, 175),
            (ProductId::Chips, 15, 125),
            (ProductId::Candy, 18, 99),
        ]
        .into_iter()
        .map(|(id, base_demand, default_price)| {
            (
                id,
                Product {
                    id,
                    base_demand,
                    default_price,
                },
            )
        })
        .collect();

        let supplier = |id, prices: [i64; 3], lead_time_days, reliability| Supplier {
            id,
            wholesale: ProductId::ALL.into_iter().zip(prices).collect(),
            lead_time_days,
            reliability,
        };

        let suppliers = [
            supplier(SupplierId::QuickStock, [70, 45, 30], 1, Reliability::Reliable),
            supplier(
                SupplierId::VendMart,
                [60, 40, 25],
                1,
                Reliability::Unreliable { max_extra_days: 1 },
            ),
            supplier(SupplierId::BulkBarn, [50, 35, 20], 3, Reliability::Reliable),
        ]
        .into_iter()
        .map(|s| (s.id, s))
        .collect();

        Self {
            products,
            suppliers,
        }
    }
}

impl Catalog {
    pub fn product(&self, id: ProductId) -> Option<&Product> {
        self.products.get(&id)
    }

    pub fn supplier(&self, id: SupplierId) -> Option<&Supplier> {
        self.suppliers.get(&id)
    }

    /// Product ids in catalog order
    pub fn product_ids(&self) -> impl Iterator<Item = ProductId> + '_ {
        self.products.keys().copied()
    }

    /// Check the tables are usable by the day cycle
    pub fn validate(&self) -> Result<(), CatalogError> {
        if self.products.is_empty() {
            return Err(CatalogError::Invalid("catalog has no products".to_string()));
        }

        for (id, product) in &self.products {
            if product.id != *id {
                return Err(CatalogError::Invalid(format!(
                    "product keyed as {} declares id {}",
                    id, product.id
                )));
            }
            if product.default_price <= 0 {
                return Err(CatalogError::Invalid(format!(
                    "default price for {} must be positive",
                    id
                )));
            }
        }

        for (id, supplier) in &self.suppliers {
            if supplier.id != *id {
                return Err(CatalogError::Invalid(format!(
                    "supplier keyed as {} declares id {}",
                    id, supplier.id
                )));
            }
            if supplier.lead_time_days == 0 {
                return Err(CatalogError::Invalid(format!(
                    "lead time for {} must be at least one day",
                    id
                )));
            }
            for (product, price) in &supplier.wholesale {
                if !self.products.contains_key(product) {
                    return Err(CatalogError::Invalid(format!(
                        "{} sells {} which is not in the catalog",
                        id, product
                    )));
                }
                if *price <= 0 {
                    return Err(CatalogError::Invalid(format!(
                        "{} wholesale price for {} must be positive",
                        id, product
                    )));
                }
            }
        }

        Ok(())
    }
}
