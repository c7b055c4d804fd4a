#![forbid(unsafe_code)]

pub mod actuator;
pub mod common;
pub mod detection;
pub mod display;
pub mod specimen;

pub use common::{ContractViolation, MonotonicTimeNs, SchemaVersion, Validate};
