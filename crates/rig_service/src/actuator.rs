#![forbid(unsafe_code)]

//! Actuator calibration operations: midpoint/limit entry, position
//! validation and the reset composition over the single-active
//! registry.

use rig_contracts::actuator::{
    ActuatorCalibrationId, ActuatorCalibrationInput, ActuatorCalibrationPatch,
    ActuatorCalibrationRecord, PositionReport, TravelDirection,
};
use rig_contracts::{ContractViolation, MonotonicTimeNs, Validate};
use rig_engines::position;
use rig_storage::repo::ActuatorCalibrationRepo;
use rig_storage::store::ACTUATOR_CALIBRATIONS_TABLE;

use crate::ServiceError;

fn fetch<R: ActuatorCalibrationRepo>(
    repo: &R,
    id: ActuatorCalibrationId,
) -> Result<ActuatorCalibrationRecord, ServiceError> {
    repo.actuator_calibration(id)
        .cloned()
        .ok_or(ServiceError::NotFound {
            entity: ACTUATOR_CALIBRATIONS_TABLE,
            key: id.0.to_string(),
        })
}

/// Creates a calibration and activates it, deactivating any previous
/// one in the same atomic unit.
pub fn save_calibration<R: ActuatorCalibrationRepo>(
    repo: &mut R,
    input: ActuatorCalibrationInput,
) -> Result<ActuatorCalibrationRecord, ServiceError> {
    let id = repo.insert_actuator_calibration_active(input)?;
    fetch(repo, id)
}

pub fn get_active_calibration<R: ActuatorCalibrationRepo>(
    repo: &R,
) -> Option<ActuatorCalibrationRecord> {
    repo.active_actuator_calibration().cloned()
}

/// Sets the midpoint on the active calibration, or creates and
/// activates a zero-distance calibration carrying it when none is
/// active yet.
pub fn set_midpoint<R: ActuatorCalibrationRepo>(
    repo: &mut R,
    value: f64,
    now: MonotonicTimeNs,
) -> Result<ActuatorCalibrationRecord, ServiceError> {
    if !value.is_finite() {
        return Err(ContractViolation::NotFinite {
            field: "set_midpoint.value",
        }
        .into());
    }
    match repo.active_actuator_calibration().cloned() {
        Some(mut record) => {
            record.midpoint = value;
            repo.save_actuator_calibration(record.clone())?;
            Ok(record)
        }
        None => {
            let input = ActuatorCalibrationInput::v1(value, 0.0, 0.0, None, None, now)?;
            save_calibration(repo, input)
        }
    }
}

/// Records a travel limit from the actuator's current jogged position.
/// The midpoint must have been explicitly set first; the calibrated
/// flag is re-derived from the two distances after the write.
pub fn set_limit<R: ActuatorCalibrationRepo>(
    repo: &mut R,
    direction: TravelDirection,
    current_position: f64,
) -> Result<ActuatorCalibrationRecord, ServiceError> {
    if !current_position.is_finite() {
        return Err(ContractViolation::NotFinite {
            field: "set_limit.current_position",
        }
        .into());
    }
    let mut record = repo
        .active_actuator_calibration()
        .cloned()
        .ok_or(ServiceError::PreconditionFailed {
            reason: "no active calibration; set midpoint first",
        })?;
    if !position::midpoint_is_set(record.midpoint) {
        return Err(ServiceError::PreconditionFailed {
            reason: "midpoint must be set before travel limits",
        });
    }

    let distance = position::limit_distance(record.midpoint, current_position);
    match direction {
        TravelDirection::Left => record.max_distance_left = distance,
        TravelDirection::Right => record.max_distance_right = distance,
    }
    record.is_calibrated = record.derived_is_calibrated();
    repo.save_actuator_calibration(record.clone())?;
    Ok(record)
}

/// Never an error: with no calibrated record active the report simply
/// carries `is_valid = false`.
pub fn validate_position<R: ActuatorCalibrationRepo>(repo: &R, position: f64) -> PositionReport {
    position::evaluate_position(repo.active_actuator_calibration(), position)
}

/// Deactivates every calibration and creates+activates a fresh
/// zero-state one.
pub fn reset_calibration<R: ActuatorCalibrationRepo>(
    repo: &mut R,
    now: MonotonicTimeNs,
) -> Result<ActuatorCalibrationRecord, ServiceError> {
    let input = ActuatorCalibrationInput::v1(0.0, 0.0, 0.0, Some(false), None, now)?;
    save_calibration(repo, input)
}

/// Partial update of an existing calibration; the calibrated flag is
/// re-derived from the resulting distances, and `is_active =
/// Some(true)` re-activates the record through the registry swap.
pub fn update_calibration<R: ActuatorCalibrationRepo>(
    repo: &mut R,
    id: ActuatorCalibrationId,
    patch: ActuatorCalibrationPatch,
) -> Result<ActuatorCalibrationRecord, ServiceError> {
    patch.validate()?;
    let mut record = fetch(repo, id)?;
    if let Some(midpoint) = patch.midpoint {
        record.midpoint = midpoint;
    }
    if let Some(left) = patch.max_distance_left {
        record.max_distance_left = left;
    }
    if let Some(right) = patch.max_distance_right {
        record.max_distance_right = right;
    }
    if let Some(notes) = patch.notes {
        record.notes = Some(notes);
    }
    record.is_calibrated = record.derived_is_calibrated();
    repo.save_actuator_calibration(record)?;
    if patch.is_active == Some(true) {
        repo.activate_actuator_calibration(id)?;
    }
    fetch(repo, id)
}
