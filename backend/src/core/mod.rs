//! Time management and shared primitives

pub mod money;
pub mod time;
