//! Demand Engine Tests
//!
//! Critical invariants tested:
//! - Demand is non-negative and falls as price rises
//! - Units sold never exceed stock; the shortfall is reported as unmet
//! - One random draw per product per day, stocked or not

use std::collections::BTreeMap;
use vending_sim_core_rs::demand::{DemandError, DemandModel};
use vending_sim_core_rs::models::event::Event;
use vending_sim_core_rs::policy::IdlePolicy;
use vending_sim_core_rs::{Orchestrator, ProductId, RngManager, SimulationConfig};

// ============================================================================
// Test Helpers
// ============================================================================

fn mean_demand(model: &DemandModel, base: u32, price_cents: i64, samples: usize) -> f64 {
    let mut rng = RngManager::new(2024);
    let total: u64 = (0..samples)
        .map(|_| model.willing_customers(base, price_cents, &mut rng).unwrap() as u64)
        .sum();
    total as f64 / samples as f64
}

fn stocked(units: [(ProductId, u32); 3]) -> BTreeMap<ProductId, u32> {
    units.into_iter().collect()
}

/// Demand per product from the day's Sale events
fn demand_by_product(sim: &Orchestrator, day: u32) -> BTreeMap<ProductId, u32> {
    sim.event_log()
        .events_for_day(day)
        .into_iter()
        .filter_map(|event| match event {
            Event::Sale {
                product, demand, ..
            } => Some((*product, *demand)),
            _ => None,
        })
        .collect()
}

// ============================================================================
// Demand Curve
// ============================================================================

#[test]
fn test_mean_demand_falls_with_price() {
    let model = DemandModel::default();

    let cheap = mean_demand(&model, 20, 100, 5_000);
    let reference = mean_demand(&model, 20, 150, 5_000);
    let expensive = mean_demand(&model, 20, 300, 5_000);

    assert!(cheap > reference, "{} should exceed {}", cheap, reference);
    assert!(reference > expensive, "{} should exceed {}", reference, expensive);

    // At $1.50 the price factor is exactly 1.0, so the mean is near base demand
    assert!((reference - 20.0).abs() < 0.5, "mean at $1.50 was {}", reference);
}

#[test]
fn test_expected_demand_matches_formula() {
    let model = DemandModel::default();
    let expected = model.expected_demand(18, 99).unwrap();
    assert!((expected - 18.0 * 2.0 / 1.49).abs() < 1e-9);
}

#[test]
fn test_price_at_or_below_offset_rejected() {
    let model = DemandModel::default();
    let mut rng = RngManager::new(1);

    assert!(matches!(
        model.willing_customers(20, -50, &mut rng),
        Err(DemandError::InvalidPrice { price_cents: -50, .. })
    ));
    assert!(model.willing_customers(20, -200, &mut rng).is_err());
}

#[test]
fn test_custom_model_constants() {
    let model = DemandModel {
        numerator: 1.0,
        price_offset: 0.0,
        min_factor: 1.0,
        max_factor: 1.0,
    };
    let mut rng = RngManager::new(9);
    // 10 × 1.0 / 2.0 × 1.0 = 5
    assert_eq!(model.willing_customers(10, 200, &mut rng).unwrap(), 5);
}

// ============================================================================
// Customer Phase in the Day Cycle
// ============================================================================

#[test]
fn test_zero_inventory_sells_nothing() {
    let mut sim = Orchestrator::new(SimulationConfig::default()).unwrap();
    let report = sim.run_day(&mut IdlePolicy).unwrap();

    for product in ProductId::ALL {
        assert_eq!(report.summary.units_sold.get(&product), Some(&0));
        assert!(report.summary.unmet_demand.get(&product).copied().unwrap_or(0) > 0);
    }
    assert_eq!(report.summary.revenue, 0);
}

#[test]
fn test_sold_clamped_to_stock_and_unmet_reported() {
    let config = SimulationConfig {
        initial_inventory: stocked([
            (ProductId::Soda, 3),
            (ProductId::Chips, 500),
            (ProductId::Candy, 0),
        ]),
        ..SimulationConfig::default()
    };
    let mut sim = Orchestrator::new(config).unwrap();
    let report = sim.run_day(&mut IdlePolicy).unwrap();
    let demand = demand_by_product(&sim, 1);
    let summary = &report.summary;

    assert_eq!(summary.units_sold[&ProductId::Soda], demand[&ProductId::Soda].min(3));
    assert_eq!(
        summary.units_sold[&ProductId::Soda] + summary.unmet_demand[&ProductId::Soda],
        demand[&ProductId::Soda]
    );
    assert_eq!(summary.units_sold[&ProductId::Chips], demand[&ProductId::Chips]);
    assert_eq!(summary.unmet_demand[&ProductId::Chips], 0);
    assert_eq!(
        sim.state().inventory().on_hand(ProductId::Chips),
        500 - demand[&ProductId::Chips]
    );
}

#[test]
fn test_one_draw_per_product_even_when_out_of_stock() {
    let full = SimulationConfig {
        initial_inventory: stocked([
            (ProductId::Soda, 100),
            (ProductId::Chips, 100),
            (ProductId::Candy, 100),
        ]),
        ..SimulationConfig::default()
    };
    let chips_empty = SimulationConfig {
        initial_inventory: stocked([
            (ProductId::Soda, 100),
            (ProductId::Chips, 0),
            (ProductId::Candy, 100),
        ]),
        ..SimulationConfig::default()
    };

    let mut a = Orchestrator::new(full).unwrap();
    let mut b = Orchestrator::new(chips_empty).unwrap();
    for _ in 0..3 {
        a.run_day(&mut IdlePolicy).unwrap();
        b.run_day(&mut IdlePolicy).unwrap();
    }

    // Candy comes after chips in catalog order; identical demand means the
    // random stream stayed aligned
    for day in 1..=3 {
        assert_eq!(demand_by_product(&a, day), demand_by_product(&b, day));
    }
}

#[test]
fn test_revenue_is_price_times_sold() {
    let mut prices = BTreeMap::new();
    prices.insert(ProductId::Candy, 120);
    let config = SimulationConfig {
        initial_inventory: stocked([
            (ProductId::Soda, 50),
            (ProductId::Chips, 50),
            (ProductId::Candy, 50),
        ]),
        initial_prices: prices,
        ..SimulationConfig::default()
    };
    let mut sim = Orchestrator::new(config).unwrap();
    let summary = sim.run_day(&mut IdlePolicy).unwrap().summary;

    let expected = summary.units_sold[&ProductId::Soda] as i64 * 175
        + summary.units_sold[&ProductId::Chips] as i64 * 125
        + summary.units_sold[&ProductId::Candy] as i64 * 120;
    assert_eq!(summary.revenue, expected);
}
