//! Plain-text rendering of catalogs and reports

use std::fmt::Write;
use vending_sim_core_rs::core::money::format_cents;
use vending_sim_core_rs::models::catalog::Reliability;
use vending_sim_core_rs::{DaySummary, SimulationConfig, SimulationReport};

pub fn catalog(config: &SimulationConfig) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Products");
    let _ = writeln!(out, "  {:<8} {:>10} {:>8}", "name", "base/day", "price");
    for product in config.catalog.products.values() {
        let price = config
            .initial_prices
            .get(&product.id)
            .copied()
            .unwrap_or(product.default_price);
        let _ = writeln!(
            out,
            "  {:<8} {:>10} {:>8}",
            product.id.to_string(),
            product.base_demand,
            format_cents(price)
        );
    }

    let _ = writeln!(out, "\nSuppliers");
    for supplier in config.catalog.suppliers.values() {
        let reliability = match supplier.reliability {
            Reliability::Reliable => "reliable".to_string(),
            Reliability::Unreliable { max_extra_days } => {
                format!("up to {} day(s) late", max_extra_days)
            }
        };
        let prices: Vec<String> = supplier
            .wholesale
            .iter()
            .map(|(product, cents)| format!("{} {}", product, format_cents(*cents)))
            .collect();
        let _ = writeln!(
            out,
            "  {:<11} lead {}d, {:<20} {}",
            supplier.id.to_string(),
            supplier.lead_time_days,
            reliability,
            prices.join(", ")
        );
    }
    out
}

pub fn day_line(summary: &DaySummary) -> String {
    format!(
        "day {:>3}  sold {:>3}  lost {:>3}  revenue {:>10}  orders {:>10}  balance {:>11}",
        summary.day,
        summary.total_units_sold(),
        summary.unmet_demand.values().sum::<u32>(),
        format_cents(summary.revenue),
        format_cents(summary.order_spend),
        format_cents(summary.ending_balance)
    )
}

pub fn final_report(report: &SimulationReport) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "\nRun {}", report.run_id);
    let _ = writeln!(out, "  outcome        {}", report.outcome);
    let _ = writeln!(out, "  days played    {}", report.days_played);
    let _ = writeln!(out, "  starting       {}", format_cents(report.starting_balance));
    let _ = writeln!(out, "  final          {}", format_cents(report.final_balance));
    let _ = writeln!(out, "  total revenue  {}", format_cents(report.total_revenue()));
    let _ = writeln!(out, "  units sold     {}", report.total_units_sold());
    out
}
