#![forbid(unsafe_code)]

use serde::{Deserialize, Serialize};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct SchemaVersion(pub u32);

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct MonotonicTimeNs(pub u64);

#[derive(Debug, Clone, PartialEq)]
pub enum ContractViolation {
    InvalidValue {
        field: &'static str,
        reason: &'static str,
    },
    InvalidRange {
        field: &'static str,
        min: f64,
        max: f64,
        got: f64,
    },
    NotFinite {
        field: &'static str,
    },
}

pub trait Validate {
    fn validate(&self) -> Result<(), ContractViolation>;
}

pub(crate) fn validate_finite(field: &'static str, value: f64) -> Result<(), ContractViolation> {
    if !value.is_finite() {
        return Err(ContractViolation::NotFinite { field });
    }
    Ok(())
}

pub(crate) fn validate_non_negative(
    field: &'static str,
    value: f64,
) -> Result<(), ContractViolation> {
    validate_finite(field, value)?;
    if value < 0.0 {
        return Err(ContractViolation::InvalidValue {
            field,
            reason: "must be >= 0",
        });
    }
    Ok(())
}

pub(crate) fn validate_range_f64(
    field: &'static str,
    value: f64,
    min: f64,
    max: f64,
) -> Result<(), ContractViolation> {
    validate_finite(field, value)?;
    if value < min || value > max {
        return Err(ContractViolation::InvalidRange {
            field,
            min,
            max,
            got: value,
        });
    }
    Ok(())
}

pub(crate) fn validate_label(
    field: &'static str,
    value: &str,
    max_len: usize,
) -> Result<(), ContractViolation> {
    if value.trim().is_empty() {
        return Err(ContractViolation::InvalidValue {
            field,
            reason: "must not be empty",
        });
    }
    if value.len() > max_len {
        return Err(ContractViolation::InvalidValue {
            field,
            reason: "exceeds max length",
        });
    }
    Ok(())
}

pub(crate) fn validate_opt_label(
    field: &'static str,
    value: &Option<String>,
    max_len: usize,
) -> Result<(), ContractViolation> {
    if let Some(v) = value {
        validate_label(field, v, max_len)?;
    }
    Ok(())
}

pub(crate) fn validate_created_at(
    field: &'static str,
    value: MonotonicTimeNs,
) -> Result<(), ContractViolation> {
    if value.0 == 0 {
        return Err(ContractViolation::InvalidValue {
            field,
            reason: "must be > 0",
        });
    }
    Ok(())
}
