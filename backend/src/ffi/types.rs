//! Type conversion utilities for FFI boundary
//!
//! Rust values are serialized through serde_json and rebuilt as Python
//! dicts, lists and scalars, so every type with a `Serialize` impl can be
//! returned to Python without a hand-written converter.

use pyo3::exceptions::{PyRuntimeError, PyValueError};
use pyo3::prelude::*;
use pyo3::types::{PyDict, PyList};
use serde::Serialize;
use serde_json::Value;

use crate::models::action::ActionError;
use crate::models::catalog::{ProductId, SupplierId};
use crate::orchestrator::SimulationError;

/// Convert a JSON value into the equivalent Python object
pub fn json_to_py(py: Python<'_>, value: &Value) -> PyResult<PyObject> {
    let object = match value {
        Value::Null => py.None(),
        Value::Bool(b) => b.into_py(py),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                i.into_py(py)
            } else if let Some(u) = n.as_u64() {
                u.into_py(py)
            } else {
                n.as_f64().unwrap_or(f64::NAN).into_py(py)
            }
        }
        Value::String(s) => s.as_str().into_py(py),
        Value::Array(items) => {
            let list = PyList::empty_bound(py);
            for item in items {
                list.append(json_to_py(py, item)?)?;
            }
            list.into_any().unbind()
        }
        Value::Object(map) => {
            let dict = PyDict::new_bound(py);
            for (key, item) in map {
                dict.set_item(key.as_str(), json_to_py(py, item)?)?;
            }
            dict.into_any().unbind()
        }
    };
    Ok(object)
}

/// Serialize any Rust value into a Python object
pub fn to_py<T: Serialize>(py: Python<'_>, value: &T) -> PyResult<PyObject> {
    let json = serde_json::to_value(value)
        .map_err(|e| PyRuntimeError::new_err(format!("Serialization failed: {}", e)))?;
    json_to_py(py, &json)
}

/// Rejected agent operation → `ValueError`
pub fn action_error(err: ActionError) -> PyErr {
    PyValueError::new_err(err.to_string())
}

/// Controller failure → `RuntimeError`
pub fn simulation_error(err: SimulationError) -> PyErr {
    PyRuntimeError::new_err(err.to_string())
}

pub fn parse_product(name: &str) -> PyResult<ProductId> {
    name.parse()
        .map_err(|e: crate::models::catalog::CatalogError| PyValueError::new_err(e.to_string()))
}

pub fn parse_supplier(name: &str) -> PyResult<SupplierId> {
    name.parse()
        .map_err(|e: crate::models::catalog::CatalogError| PyValueError::new_err(e.to_string()))
}
