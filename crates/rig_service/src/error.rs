#![forbid(unsafe_code)]

use rig_contracts::ContractViolation;
use rig_storage::StorageError;

/// Typed failures reported to the HTTP collaborator. The core never
/// logs and never retries; retry policy belongs to the storage
/// implementation behind the repo traits.
#[derive(Debug, Clone, PartialEq)]
pub enum ServiceError {
    NotFound {
        entity: &'static str,
        key: String,
    },
    PreconditionFailed {
        reason: &'static str,
    },
    InvalidInput(ContractViolation),
    ActivationConflict {
        entity: &'static str,
        scope: String,
    },
}

impl From<ContractViolation> for ServiceError {
    fn from(v: ContractViolation) -> Self {
        ServiceError::InvalidInput(v)
    }
}

impl From<StorageError> for ServiceError {
    fn from(e: StorageError) -> Self {
        match e {
            StorageError::NotFound { table, key } => ServiceError::NotFound { entity: table, key },
            StorageError::ActivationConflict { table, scope } => {
                ServiceError::ActivationConflict {
                    entity: table,
                    scope,
                }
            }
            StorageError::ContractViolation(v) => ServiceError::InvalidInput(v),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn at_err_01_storage_errors_map_onto_the_taxonomy() {
        let nf: ServiceError = StorageError::NotFound {
            table: "actuator_calibrations",
            key: "7".to_string(),
        }
        .into();
        assert!(matches!(nf, ServiceError::NotFound { key, .. } if key == "7"));

        let conflict: ServiceError = StorageError::ActivationConflict {
            table: "display_calibrations",
            scope: "seven_segment".to_string(),
        }
        .into();
        assert!(matches!(conflict, ServiceError::ActivationConflict { .. }));

        let invalid: ServiceError = StorageError::ContractViolation(
            ContractViolation::NotFinite { field: "midpoint" },
        )
        .into();
        assert!(matches!(invalid, ServiceError::InvalidInput(_)));
    }
}
