//! Supplier Ledger
//!
//! Wholesale ordering and delivery:
//! - Orders are paid in full the moment they are placed
//! - Each order gets a due day from the supplier's lead time, plus a delay
//!   drawn once at order time for unreliable suppliers
//! - Every delivery phase folds due orders into inventory in placement order
//!
//! # Critical Invariants
//!
//! 1. **Pay once**: the balance is debited exactly once per order, at order time
//! 2. **Deliver once**: an order leaves the pending list when it is applied,
//!    never before its due day
//! 3. **FIFO**: same-day arrivals are applied in the order they were placed
//! 4. **No partial rejection**: a rejected order changes nothing, not even
//!   the random stream
//!
//! # Example
//!
//! ```rust
//! use vending_sim_core_rs::models::catalog::{Catalog, ProductId, SupplierId};
//! use vending_sim_core_rs::models::inventory::Inventory;
//! use vending_sim_core_rs::models::ledger::BalanceLedger;
//! use vending_sim_core_rs::rng::RngManager;
//! use vending_sim_core_rs::supply::{FundsPolicy, SupplierLedger};
//!
//! let catalog = Catalog::default();
//! let mut ledger = BalanceLedger::new(50_000);
//! let mut inventory = Inventory::new(ProductId::ALL, None);
//! let mut orders = SupplierLedger::new();
//! let mut rng = RngManager::new(42);
//!
//! let confirmation = orders
//!     .place_order(&catalog, &mut ledger, FundsPolicy::Reject, 1,
//!                  SupplierId::QuickStock, ProductId::Soda, 50, &mut rng)
//!     .unwrap();
//! assert_eq!(confirmation.total_cost, 3_500);
//! assert_eq!(ledger.balance(), 46_500);
//!
//! assert!(orders.apply_due(1, &mut inventory).is_empty());
//! assert_eq!(orders.apply_due(2, &mut inventory).len(), 1);
//! assert_eq!(inventory.on_hand(ProductId::Soda), 50);
//! ```

pub mod orders;

pub use orders::{FundsPolicy, SupplierLedger};
