//! PyO3 wrapper for the vending Orchestrator
//!
//! # Example (from Python)
//!
//! ```python
//! from vending_sim_core_rs import VendingSimulation
//!
//! sim = VendingSimulation('{"max_days": 30, "rng_seed": 7}')
//! opening = sim.begin_day()
//! if opening["status"] == "window":
//!     sim.place_order("QuickStock", "soda", 50)
//!     sim.set_price("candy", 1.10)
//! report = sim.end_day()
//! print(report["summary"]["ending_balance"])
//! ```

use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;
use pyo3::types::PyDict;

use super::types::{action_error, parse_product, parse_supplier, simulation_error, to_py};
use crate::core::money::dollars_to_cents;
use crate::models::action::ActionResponse;
use crate::orchestrator::{DayOpening, Orchestrator, SimulationConfig};
use crate::policy::AgentPolicyConfig;

/// Python handle on one simulation run
#[pyclass(name = "VendingSimulation")]
pub struct PyVendingSimulation {
    inner: Orchestrator,
}

fn parse_config(config_json: Option<&str>) -> PyResult<SimulationConfig> {
    match config_json {
        Some(json) => SimulationConfig::from_json(json).map_err(simulation_error),
        None => Ok(SimulationConfig::default()),
    }
}

#[pymethods]
impl PyVendingSimulation {
    /// Create a simulation from an optional JSON config
    ///
    /// Raises RuntimeError if the config does not parse or validate.
    #[new]
    #[pyo3(signature = (config_json=None))]
    fn new(config_json: Option<&str>) -> PyResult<Self> {
        let config = parse_config(config_json)?;
        let inner = Orchestrator::new(config).map_err(simulation_error)?;
        Ok(Self { inner })
    }

    /// Restore a run from `save_state()` output
    #[staticmethod]
    #[pyo3(signature = (state_json, config_json=None))]
    fn load_state(state_json: &str, config_json: Option<&str>) -> PyResult<Self> {
        let config = parse_config(config_json)?;
        let inner = Orchestrator::load_state(config, state_json).map_err(simulation_error)?;
        Ok(Self { inner })
    }

    fn save_state(&self) -> PyResult<String> {
        self.inner.save_state().map_err(simulation_error)
    }

    /// Open the next day
    ///
    /// Returns `{"status": "window", "briefing": {...}}`, or
    /// `{"status": "game_over", "report": {...}}` when the fee bankrupts the machine.
    fn begin_day(&mut self, py: Python<'_>) -> PyResult<PyObject> {
        let dict = PyDict::new_bound(py);
        match self.inner.begin_day().map_err(simulation_error)? {
            DayOpening::Window(briefing) => {
                dict.set_item("status", "window")?;
                dict.set_item("briefing", to_py(py, &briefing)?)?;
            }
            DayOpening::Over(report) => {
                dict.set_item("status", "game_over")?;
                dict.set_item("report", to_py(py, &report)?)?;
            }
        }
        Ok(dict.into_any().unbind())
    }

    /// Close the window, run customers and settle
    fn end_day(&mut self, py: Python<'_>) -> PyResult<PyObject> {
        let report = self.inner.end_day().map_err(simulation_error)?;
        to_py(py, &report)
    }

    /// Run the rest of the simulation with a built-in policy (JSON config)
    fn run_policy(&mut self, py: Python<'_>, policy_json: &str) -> PyResult<PyObject> {
        let policy: AgentPolicyConfig = serde_json::from_str(policy_json)
            .map_err(|e| PyValueError::new_err(format!("Invalid policy config: {}", e)))?;
        let mut agent = policy.build_agent();
        let report = self.inner.run(agent.as_mut()).map_err(simulation_error)?;
        to_py(py, &report)
    }

    // ------------------------------------------------------------------
    // Agent operations
    // ------------------------------------------------------------------

    fn place_order(
        &mut self,
        py: Python<'_>,
        supplier: &str,
        product: &str,
        quantity: u32,
    ) -> PyResult<PyObject> {
        let supplier = parse_supplier(supplier)?;
        let product = parse_product(product)?;
        let confirmation = self
            .inner
            .place_order(supplier, product, quantity)
            .map_err(action_error)?;
        to_py(py, &confirmation)
    }

    /// Set a price in dollars (rounded to whole cents)
    fn set_price(&mut self, py: Python<'_>, product: &str, price: f64) -> PyResult<PyObject> {
        let product = parse_product(product)?;
        let price_cents = dollars_to_cents(price)
            .ok_or_else(|| PyValueError::new_err(format!("Invalid price: {}", price)))?;
        let old_price = self
            .inner
            .set_price(product, price_cents)
            .map_err(action_error)?;
        to_py(
            py,
            &ActionResponse::PriceSet {
                product,
                old_price,
                new_price: price_cents,
            },
        )
    }

    fn check_inventory(&mut self, py: Python<'_>) -> PyResult<PyObject> {
        let levels = self.inner.check_inventory().map_err(action_error)?;
        to_py(py, &levels)
    }

    /// Balance in cents
    fn check_balance(&mut self) -> PyResult<i64> {
        self.inner.check_balance().map_err(action_error)
    }

    fn view_sales_history(&mut self, py: Python<'_>) -> PyResult<PyObject> {
        let history = self.inner.view_sales_history().map_err(action_error)?;
        to_py(py, &history)
    }

    fn take_notes(&mut self, text: String) -> PyResult<()> {
        self.inner.take_notes(text).map_err(action_error)
    }

    // ------------------------------------------------------------------
    // Read-only state
    // ------------------------------------------------------------------

    fn briefing(&self, py: Python<'_>) -> PyResult<PyObject> {
        to_py(py, &self.inner.briefing())
    }

    fn events(&self, py: Python<'_>) -> PyResult<PyObject> {
        to_py(py, &self.inner.event_log().events())
    }

    fn history(&self, py: Python<'_>) -> PyResult<PyObject> {
        to_py(py, &self.inner.history())
    }

    #[getter]
    fn current_day(&self) -> u32 {
        self.inner.current_day()
    }

    #[getter]
    fn phase(&self) -> String {
        self.inner.phase().to_string()
    }

    #[getter]
    fn balance(&self) -> i64 {
        self.inner.balance()
    }

    #[getter]
    fn remaining_actions(&self) -> usize {
        self.inner.remaining_actions()
    }

    #[getter]
    fn outcome(&self) -> Option<String> {
        self.inner.outcome().map(|o| o.to_string())
    }

    #[getter]
    fn is_over(&self) -> bool {
        self.inner.is_over()
    }

    #[getter]
    fn run_id(&self) -> String {
        self.inner.run_id().to_string()
    }

    fn __repr__(&self) -> String {
        format!(
            "VendingSimulation(day={}, phase={}, balance={})",
            self.inner.current_day(),
            self.inner.phase(),
            self.inner.balance()
        )
    }
}
