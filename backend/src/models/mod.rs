//! Domain models for the vending simulator

pub mod action;
pub mod catalog;
pub mod event;
pub mod inventory;
pub mod ledger;
pub mod order;
pub mod pricing;
pub mod state;
pub mod summary;

// Re-exports
pub use action::{ActionError, ActionResponse};
pub use catalog::{Catalog, CatalogError, Product, ProductId, Reliability, Supplier, SupplierId};
pub use event::{Event, EventLog};
pub use inventory::{Inventory, Receipt};
pub use ledger::{BalanceLedger, EntryCause, LedgerEntry};
pub use order::{DeliveryRecord, OrderConfirmation, PendingOrder};
pub use pricing::PriceBook;
pub use state::SimulationState;
pub use summary::{Briefing, DaySummary, Outcome};
