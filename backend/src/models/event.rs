//! Event logging for replay, auditing and display.
//!
//! Every state change the day cycle makes is appended to the [`EventLog`]
//! in the order it happened. Events enable:
//! - Debugging (what happened on which day, in which phase)
//! - Auditing (every balance movement has a matching event)
//! - Display (dashboards replay the log instead of polling state)
//!
//! # Example
//!
//! ```rust
//! use vending_sim_core_rs::models::event::{Event, EventLog};
//!
//! let mut log = EventLog::new();
//! log.log(Event::FeeCharged { day: 1, amount: 500, balance_after: 49_500 });
//!
//! assert_eq!(log.events_for_day(1).len(), 1);
//! assert_eq!(log.events()[0].event_type(), "FeeCharged");
//! ```

use crate::models::catalog::{ProductId, SupplierId};
use crate::models::summary::Outcome;
use serde::{Deserialize, Serialize};

/// Simulation event capturing a state change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    DayStarted {
        day: u32,
        opening_balance: i64,
    },

    FeeCharged {
        day: u32,
        amount: i64,
        balance_after: i64,
    },

    OrderPlaced {
        day: u32,
        order_id: String,
        supplier: SupplierId,
        product: ProductId,
        quantity: u32,
        cost: i64,
        due_day: u32,
    },

    OrderDelivered {
        day: u32,
        order_id: String,
        supplier: SupplierId,
        product: ProductId,
        units_stocked: u32,
        units_discarded: u32,
        placed_day: u32,
    },

    PriceChanged {
        day: u32,
        product: ProductId,
        old_price: i64,
        new_price: i64,
    },

    NoteTaken {
        day: u32,
        length: usize,
    },

    /// Customer phase result for one product
    Sale {
        day: u32,
        product: ProductId,
        demand: u32,
        sold: u32,
        price: i64,
        revenue: i64,
    },

    StockOut {
        day: u32,
        product: ProductId,
    },

    DaySettled {
        day: u32,
        revenue: i64,
        ending_balance: i64,
    },

    GameOver {
        day: u32,
        outcome: Outcome,
        final_balance: i64,
    },
}

impl Event {
    pub fn day(&self) -> u32 {
        match self {
            Event::DayStarted { day, .. }
            | Event::FeeCharged { day, .. }
            | Event::OrderPlaced { day, .. }
            | Event::OrderDelivered { day, .. }
            | Event::PriceChanged { day, .. }
            | Event::NoteTaken { day, .. }
            | Event::Sale { day, .. }
            | Event::StockOut { day, .. }
            | Event::DaySettled { day, .. }
            | Event::GameOver { day, .. } => *day,
        }
    }

    pub fn event_type(&self) -> &'static str {
        match self {
            Event::DayStarted { .. } => "DayStarted",
            Event::FeeCharged { .. } => "FeeCharged",
            Event::OrderPlaced { .. } => "OrderPlaced",
            Event::OrderDelivered { .. } => "OrderDelivered",
            Event::PriceChanged { .. } => "PriceChanged",
            Event::NoteTaken { .. } => "NoteTaken",
            Event::Sale { .. } => "Sale",
            Event::StockOut { .. } => "StockOut",
            Event::DaySettled { .. } => "DaySettled",
            Event::GameOver { .. } => "GameOver",
        }
    }

    /// Product the event concerns, if any
    pub fn product(&self) -> Option<ProductId> {
        match self {
            Event::OrderPlaced { product, .. }
            | Event::OrderDelivered { product, .. }
            | Event::PriceChanged { product, .. }
            | Event::Sale { product, .. }
            | Event::StockOut { product, .. } => Some(*product),
            _ => None,
        }
    }

    /// Order the event concerns, if any
    pub fn order_id(&self) -> Option<&str> {
        match self {
            Event::OrderPlaced { order_id, .. } | Event::OrderDelivered { order_id, .. } => {
                Some(order_id.as_str())
            }
            _ => None,
        }
    }
}

/// Append-only event log
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventLog {
    events: Vec<Event>,
}

impl EventLog {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn from_events(events: Vec<Event>) -> Self {
        Self { events }
    }

    pub fn log(&mut self, event: Event) {
        self.events.push(event);
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn events_for_day(&self, day: u32) -> Vec<&Event> {
        self.events.iter().filter(|e| e.day() == day).collect()
    }

    pub fn events_of_type(&self, event_type: &str) -> Vec<&Event> {
        self.events
            .iter()
            .filter(|e| e.event_type() == event_type)
            .collect()
    }

    pub fn events_for_product(&self, product: ProductId) -> Vec<&Event> {
        self.events
            .iter()
            .filter(|e| e.product() == Some(product))
            .collect()
    }

    pub fn events_for_order(&self, order_id: &str) -> Vec<&Event> {
        self.events
            .iter()
            .filter(|e| e.order_id() == Some(order_id))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn order_placed(day: u32, order_id: &str) -> Event {
        Event::OrderPlaced {
            day,
            order_id: order_id.to_string(),
            supplier: SupplierId::QuickStock,
            product: ProductId::Soda,
            quantity: 50,
            cost: 3_500,
            due_day: day + 1,
        }
    }

    #[test]
    fn test_event_accessors() {
        let event = order_placed(3, "ord_000001");
        assert_eq!(event.day(), 3);
        assert_eq!(event.event_type(), "OrderPlaced");
        assert_eq!(event.product(), Some(ProductId::Soda));
        assert_eq!(event.order_id(), Some("ord_000001"));

        let fee = Event::FeeCharged {
            day: 3,
            amount: 500,
            balance_after: 0,
        };
        assert_eq!(fee.product(), None);
        assert_eq!(fee.order_id(), None);
    }

    #[test]
    fn test_event_log_queries() {
        let mut log = EventLog::new();
        assert!(log.is_empty());

        log.log(order_placed(1, "ord_000001"));
        log.log(Event::OrderDelivered {
            day: 2,
            order_id: "ord_000001".to_string(),
            supplier: SupplierId::QuickStock,
            product: ProductId::Soda,
            units_stocked: 50,
            units_discarded: 0,
            placed_day: 1,
        });
        log.log(Event::StockOut {
            day: 2,
            product: ProductId::Candy,
        });

        assert_eq!(log.len(), 3);
        assert_eq!(log.events_for_day(2).len(), 2);
        assert_eq!(log.events_of_type("StockOut").len(), 1);
        assert_eq!(log.events_for_order("ord_000001").len(), 2);
        assert_eq!(log.events_for_product(ProductId::Soda).len(), 2);
    }

    #[test]
    fn test_event_serializes_with_type_tag() {
        let json = serde_json::to_string(&Event::StockOut {
            day: 4,
            product: ProductId::Chips,
        })
        .unwrap();
        assert_eq!(json, r#"{"type":"StockOut","day":4,"product":"Chips"}"#);
    }
}
