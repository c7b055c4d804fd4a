#![forbid(unsafe_code)]

pub mod actuator;
pub mod detection;
pub mod display;
pub mod error;
pub mod specimen;

pub use error::ServiceError;
