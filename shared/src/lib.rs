//! Shared types and models for the Crop Disease Advisor
//!
//! This crate holds the pure decision logic of the diagnosis pipeline:
//! label resolution, advisory lookup, weather-driven risk rules and report
//! assembly. Everything here is free of I/O so it can be exercised directly
//! from tests and reused by other front ends.

pub mod models;
pub mod profiles;
pub mod types;
pub mod validation;

pub use models::*;
pub use profiles::*;
pub use types::*;
pub use validation::*;
