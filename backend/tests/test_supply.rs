//! Supplier Ledger Tests
//!
//! Critical invariants tested:
//! - An order debits the balance once, at order time
//! - Stock arrives in the delivery phase of its due day, exactly once
//! - Same-day arrivals are applied oldest first
//! - Rejected orders change nothing

use vending_sim_core_rs::models::event::Event;
use vending_sim_core_rs::models::ledger::EntryCause;
use vending_sim_core_rs::orchestrator::{DayOpening, Orchestrator, SimulationConfig};
use vending_sim_core_rs::{ActionError, Briefing, FundsPolicy, Outcome, ProductId, SupplierId};

// ============================================================================
// Test Helpers
// ============================================================================

fn open_day(sim: &mut Orchestrator) -> Briefing {
    match sim.begin_day().unwrap() {
        DayOpening::Window(briefing) => briefing,
        DayOpening::Over(report) => panic!("unexpected game over on day {}", report.summary.day),
    }
}

fn sim_with(config: SimulationConfig) -> Orchestrator {
    Orchestrator::new(config).unwrap()
}

// ============================================================================
// Ordering
// ============================================================================

#[test]
fn test_quickstock_soda_scenario() {
    let mut sim = sim_with(SimulationConfig::default());

    let day1 = open_day(&mut sim);
    assert_eq!(day1.balance, 49_500);

    let confirmation = sim
        .place_order(SupplierId::QuickStock, ProductId::Soda, 50)
        .unwrap();
    assert_eq!(confirmation.total_cost, 3_500);
    assert_eq!(confirmation.unit_cost, 70);
    assert_eq!(confirmation.expected_delivery_day, 2);
    assert_eq!(confirmation.balance_after, 46_000);
    assert_eq!(sim.balance(), 46_000);

    // Paid now, stocked later
    assert_eq!(sim.state().inventory().on_hand(ProductId::Soda), 0);
    let day1_report = sim.end_day().unwrap();
    assert_eq!(day1_report.summary.order_spend, 3_500);
    assert_eq!(day1_report.summary.units_sold[&ProductId::Soda], 0);

    let day2 = open_day(&mut sim);
    assert_eq!(day2.inventory[&ProductId::Soda], 50);
    assert_eq!(day2.deliveries_today.len(), 1);
    assert_eq!(day2.deliveries_today[0].order_id, confirmation.order_id);
    assert_eq!(day2.pending_deliveries, 0);

    // The only order debit is the one from day 1
    let order_debits: Vec<_> = sim
        .state()
        .ledger()
        .entries()
        .iter()
        .filter(|e| e.cause == EntryCause::Order)
        .collect();
    assert_eq!(order_debits.len(), 1);
    assert_eq!(order_debits[0].amount, -3_500);
    assert_eq!(order_debits[0].day, 1);
}

#[test]
fn test_bulkbarn_lead_time() {
    let mut sim = sim_with(SimulationConfig::default());
    open_day(&mut sim);
    let confirmation = sim
        .place_order(SupplierId::BulkBarn, ProductId::Chips, 40)
        .unwrap();
    assert_eq!(confirmation.total_cost, 1_400);
    assert_eq!(confirmation.expected_delivery_day, 4);
    sim.end_day().unwrap();

    for day in 2..=3 {
        let briefing = open_day(&mut sim);
        assert_eq!(briefing.day, day);
        assert_eq!(briefing.inventory[&ProductId::Chips], 0);
        assert_eq!(briefing.pending_units[&ProductId::Chips], 40);
        sim.end_day().unwrap();
    }

    let day4 = open_day(&mut sim);
    assert_eq!(day4.inventory[&ProductId::Chips], 40);
    assert!(day4.pending_units.is_empty());
}

#[test]
fn test_vendmart_delay_is_zero_or_one_day() {
    let mut delays = std::collections::BTreeSet::new();

    for seed in 1..=60 {
        let mut sim = sim_with(SimulationConfig {
            rng_seed: seed,
            ..SimulationConfig::default()
        });
        open_day(&mut sim);
        let confirmation = sim
            .place_order(SupplierId::VendMart, ProductId::Candy, 10)
            .unwrap();
        assert_eq!(confirmation.promised_day, 2);
        assert!((2..=3).contains(&confirmation.expected_delivery_day));
        delays.insert(confirmation.expected_delivery_day - confirmation.promised_day);
    }

    assert_eq!(delays.len(), 2, "both on-time and late deliveries should occur");
}

#[test]
fn test_invalid_orders_rejected() {
    let mut sim = sim_with(SimulationConfig::default());
    open_day(&mut sim);

    assert!(matches!(
        sim.place_order(SupplierId::QuickStock, ProductId::Soda, 0),
        Err(ActionError::InvalidOrder { .. })
    ));
    assert_eq!(sim.actions_used(), 0);
    assert!(sim.state().orders().pending().is_empty());
}

#[test]
fn test_insufficient_funds_leaves_state_unchanged() {
    let mut sim = sim_with(SimulationConfig {
        starting_balance: 1_000,
        ..SimulationConfig::default()
    });
    open_day(&mut sim);
    let events_before = sim.event_log().len();

    let err = sim
        .place_order(SupplierId::BulkBarn, ProductId::Soda, 50)
        .unwrap_err();

    assert_eq!(
        err,
        ActionError::InsufficientFunds {
            required: 2_500,
            available: 500
        }
    );
    assert_eq!(sim.balance(), 500);
    assert_eq!(sim.actions_used(), 0);
    assert_eq!(sim.event_log().len(), events_before);
    assert!(sim.state().orders().pending().is_empty());
}

#[test]
fn test_order_exactly_equal_to_balance_is_accepted() {
    let mut sim = sim_with(SimulationConfig {
        starting_balance: 1_000,
        ..SimulationConfig::default()
    });
    open_day(&mut sim);

    // 25 × 20¢ = 500 = balance after fee
    sim.place_order(SupplierId::BulkBarn, ProductId::Candy, 25)
        .unwrap();
    assert_eq!(sim.balance(), 0);
}

#[test]
fn test_overdraft_policy_bankrupts_at_settlement() {
    let mut sim = sim_with(SimulationConfig {
        starting_balance: 1_000,
        funds_policy: FundsPolicy::AllowOverdraft,
        ..SimulationConfig::default()
    });
    open_day(&mut sim);

    let confirmation = sim
        .place_order(SupplierId::BulkBarn, ProductId::Soda, 50)
        .unwrap();
    assert_eq!(confirmation.balance_after, -2_000);

    let report = sim.end_day().unwrap();
    assert_eq!(report.outcome, Some(Outcome::Bankrupt));
    assert_eq!(report.summary.ending_balance, -2_000);
    assert!(report.summary.reconciles());
    assert!(sim.is_over());
}

// ============================================================================
// Deliveries
// ============================================================================

#[test]
fn test_same_day_arrivals_are_fifo() {
    let mut sim = sim_with(SimulationConfig::default());
    open_day(&mut sim);
    let first = sim
        .place_order(SupplierId::QuickStock, ProductId::Soda, 10)
        .unwrap();
    let second = sim
        .place_order(SupplierId::QuickStock, ProductId::Chips, 20)
        .unwrap();
    let third = sim
        .place_order(SupplierId::QuickStock, ProductId::Soda, 5)
        .unwrap();
    sim.end_day().unwrap();

    let day2 = open_day(&mut sim);
    let ids: Vec<&str> = day2
        .deliveries_today
        .iter()
        .map(|d| d.order_id.as_str())
        .collect();
    assert_eq!(
        ids,
        vec![
            first.order_id.as_str(),
            second.order_id.as_str(),
            third.order_id.as_str()
        ]
    );
    assert_eq!(day2.inventory[&ProductId::Soda], 15);
}

#[test]
fn test_capacity_discards_excess() {
    let mut sim = sim_with(SimulationConfig {
        machine_capacity: Some(30),
        ..SimulationConfig::default()
    });
    open_day(&mut sim);
    sim.place_order(SupplierId::QuickStock, ProductId::Soda, 50)
        .unwrap();
    sim.end_day().unwrap();

    let day2 = open_day(&mut sim);
    assert_eq!(day2.inventory[&ProductId::Soda], 30);
    assert_eq!(day2.deliveries_today[0].units_stocked, 30);
    assert_eq!(day2.deliveries_today[0].units_discarded, 20);

    let report = sim.end_day().unwrap();
    assert_eq!(report.summary.deliveries[0].units_discarded, 20);
}

#[test]
fn test_each_order_delivered_exactly_once() {
    let mut sim = sim_with(SimulationConfig {
        max_days: 8,
        ..SimulationConfig::default()
    });

    let mut placed = Vec::new();
    while !sim.is_over() {
        if let DayOpening::Window(briefing) = sim.begin_day().unwrap() {
            if briefing.day <= 4 {
                for supplier in SupplierId::ALL {
                    placed.push(
                        sim.place_order(supplier, ProductId::Candy, 5)
                            .unwrap()
                            .order_id,
                    );
                }
            }
            sim.end_day().unwrap();
        }
    }

    let mut delivered: Vec<String> = sim
        .event_log()
        .events()
        .iter()
        .filter_map(|event| match event {
            Event::OrderDelivered { order_id, .. } => Some(order_id.clone()),
            _ => None,
        })
        .collect();
    delivered.sort();
    placed.sort();

    assert_eq!(delivered, placed);
    assert!(sim.state().orders().pending().is_empty());
}
