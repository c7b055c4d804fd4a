#![forbid(unsafe_code)]

use serde::{Deserialize, Serialize};

use crate::common::{
    validate_created_at, validate_finite, validate_non_negative, validate_opt_label,
};
use crate::{ContractViolation, MonotonicTimeNs, SchemaVersion, Validate};

pub const ACTUATOR_CONTRACT_VERSION: SchemaVersion = SchemaVersion(1);

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct ActuatorCalibrationId(pub u64);

/// Travel direction relative to the calibrated midpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TravelDirection {
    Left,
    Right,
}

impl TravelDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            TravelDirection::Left => "left",
            TravelDirection::Right => "right",
        }
    }
}

/// Input payload for creating an actuator travel calibration.
///
/// `is_calibrated_override` carries the explicit flag the rig operator
/// may force during partial calibration entry; when `None` the stored
/// flag is derived from the two travel distances.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActuatorCalibrationInput {
    pub schema_version: SchemaVersion,
    pub midpoint: f64,
    pub max_distance_left: f64,
    pub max_distance_right: f64,
    pub is_calibrated_override: Option<bool>,
    pub notes: Option<String>,
    pub created_at: MonotonicTimeNs,
}

impl ActuatorCalibrationInput {
    pub fn v1(
        midpoint: f64,
        max_distance_left: f64,
        max_distance_right: f64,
        is_calibrated_override: Option<bool>,
        notes: Option<String>,
        created_at: MonotonicTimeNs,
    ) -> Result<Self, ContractViolation> {
        let input = Self {
            schema_version: ACTUATOR_CONTRACT_VERSION,
            midpoint,
            max_distance_left,
            max_distance_right,
            is_calibrated_override,
            notes,
            created_at,
        };
        input.validate()?;
        Ok(input)
    }
}

impl Validate for ActuatorCalibrationInput {
    fn validate(&self) -> Result<(), ContractViolation> {
        if self.schema_version != ACTUATOR_CONTRACT_VERSION {
            return Err(ContractViolation::InvalidValue {
                field: "actuator_calibration_input.schema_version",
                reason: "must match ACTUATOR_CONTRACT_VERSION",
            });
        }
        validate_finite("actuator_calibration_input.midpoint", self.midpoint)?;
        validate_non_negative(
            "actuator_calibration_input.max_distance_left",
            self.max_distance_left,
        )?;
        validate_non_negative(
            "actuator_calibration_input.max_distance_right",
            self.max_distance_right,
        )?;
        validate_opt_label("actuator_calibration_input.notes", &self.notes, 1000)?;
        validate_created_at("actuator_calibration_input.created_at", self.created_at)
    }
}

/// Partial update for an existing calibration. `None` leaves a field
/// untouched; `is_active: Some(true)` requests re-activation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ActuatorCalibrationPatch {
    pub midpoint: Option<f64>,
    pub max_distance_left: Option<f64>,
    pub max_distance_right: Option<f64>,
    pub notes: Option<String>,
    pub is_active: Option<bool>,
}

impl Validate for ActuatorCalibrationPatch {
    fn validate(&self) -> Result<(), ContractViolation> {
        if let Some(midpoint) = self.midpoint {
            validate_finite("actuator_calibration_patch.midpoint", midpoint)?;
        }
        if let Some(left) = self.max_distance_left {
            validate_non_negative("actuator_calibration_patch.max_distance_left", left)?;
        }
        if let Some(right) = self.max_distance_right {
            validate_non_negative("actuator_calibration_patch.max_distance_right", right)?;
        }
        validate_opt_label("actuator_calibration_patch.notes", &self.notes, 1000)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActuatorCalibrationRecord {
    pub schema_version: SchemaVersion,
    pub id: ActuatorCalibrationId,
    pub midpoint: f64,
    pub max_distance_left: f64,
    pub max_distance_right: f64,
    pub is_active: bool,
    pub is_calibrated: bool,
    pub notes: Option<String>,
    pub created_at: MonotonicTimeNs,
}

impl ActuatorCalibrationRecord {
    pub fn from_input_v1(
        id: ActuatorCalibrationId,
        input: ActuatorCalibrationInput,
        is_active: bool,
    ) -> Result<Self, ContractViolation> {
        input.validate()?;
        let derived = input.max_distance_left > 0.0 && input.max_distance_right > 0.0;
        let record = Self {
            schema_version: ACTUATOR_CONTRACT_VERSION,
            id,
            midpoint: input.midpoint,
            max_distance_left: input.max_distance_left,
            max_distance_right: input.max_distance_right,
            is_active,
            is_calibrated: input.is_calibrated_override.unwrap_or(derived),
            notes: input.notes,
            created_at: input.created_at,
        };
        Ok(record)
    }

    /// Leftmost reachable position.
    pub fn min_position(&self) -> f64 {
        self.midpoint - self.max_distance_left
    }

    /// Rightmost reachable position.
    pub fn max_position(&self) -> f64 {
        self.midpoint + self.max_distance_right
    }

    pub fn total_range(&self) -> f64 {
        self.max_distance_left + self.max_distance_right
    }

    /// The calibrated flag as a pure function of the two travel
    /// distances; both sides must have been measured.
    pub fn derived_is_calibrated(&self) -> bool {
        self.max_distance_left > 0.0 && self.max_distance_right > 0.0
    }
}

impl Validate for ActuatorCalibrationRecord {
    fn validate(&self) -> Result<(), ContractViolation> {
        if self.schema_version != ACTUATOR_CONTRACT_VERSION {
            return Err(ContractViolation::InvalidValue {
                field: "actuator_calibration_record.schema_version",
                reason: "must match ACTUATOR_CONTRACT_VERSION",
            });
        }
        validate_finite("actuator_calibration_record.midpoint", self.midpoint)?;
        validate_non_negative(
            "actuator_calibration_record.max_distance_left",
            self.max_distance_left,
        )?;
        validate_non_negative(
            "actuator_calibration_record.max_distance_right",
            self.max_distance_right,
        )?;
        validate_opt_label("actuator_calibration_record.notes", &self.notes, 1000)?;
        validate_created_at("actuator_calibration_record.created_at", self.created_at)
    }
}

/// Result of validating a raw actuator position against the active
/// travel calibration. Never an error: an uncalibrated (or absent)
/// calibration reports `is_valid = false` with `not_calibrated = true`
/// and zeroed geometry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionReport {
    pub position: f64,
    pub midpoint: f64,
    pub distance_from_midpoint: f64,
    pub absolute_distance: f64,
    pub direction: TravelDirection,
    pub max_allowed_distance: f64,
    pub min_position: f64,
    pub max_position: f64,
    pub is_valid: bool,
    pub not_calibrated: bool,
}

impl PositionReport {
    /// Report for a position checked while no calibrated record is
    /// active. "No record" and "record present but uncalibrated" are
    /// deliberately indistinguishable here.
    pub fn uncalibrated(position: f64) -> Self {
        Self {
            position,
            midpoint: 0.0,
            distance_from_midpoint: 0.0,
            absolute_distance: 0.0,
            direction: TravelDirection::Right,
            max_allowed_distance: 0.0,
            min_position: 0.0,
            max_position: 0.0,
            is_valid: false,
            not_calibrated: true,
        }
    }
}
