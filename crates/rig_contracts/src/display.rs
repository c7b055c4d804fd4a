#![forbid(unsafe_code)]

use serde::{Deserialize, Serialize};

use crate::common::{
    validate_created_at, validate_finite, validate_label, validate_non_negative,
    validate_opt_label,
};
use crate::{ContractViolation, MonotonicTimeNs, SchemaVersion, Validate};

pub const DISPLAY_CONTRACT_VERSION: SchemaVersion = SchemaVersion(1);

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct DisplayCalibrationId(pub u64);

/// Scope key for display calibrations: the kind of readout being
/// calibrated. The active-record invariant holds per setting type.
#[derive(
    Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct SettingType(String);

impl SettingType {
    pub fn new(v: impl Into<String>) -> Result<Self, ContractViolation> {
        let v = Self(v.into());
        v.validate()?;
        Ok(v)
    }

    pub fn seven_segment() -> Self {
        Self("seven_segment".to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Validate for SettingType {
    fn validate(&self) -> Result<(), ContractViolation> {
        validate_label("setting_type", &self.0, 191)
    }
}

/// Pixel-space rectangle on the calibration image. Opaque to the
/// engines; carried for the detection collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeometryBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Validate for GeometryBox {
    fn validate(&self) -> Result<(), ContractViolation> {
        validate_finite("geometry_box.x", self.x)?;
        validate_finite("geometry_box.y", self.y)?;
        validate_non_negative("geometry_box.width", self.width)?;
        validate_non_negative("geometry_box.height", self.height)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ImageSize {
    pub width: f64,
    pub height: f64,
}

impl Validate for ImageSize {
    fn validate(&self) -> Result<(), ContractViolation> {
        validate_non_negative("image_size.width", self.width)?;
        validate_non_negative("image_size.height", self.height)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplayCalibrationInput {
    pub schema_version: SchemaVersion,
    pub setting_type: SettingType,
    pub device_name: Option<String>,
    pub display_box: GeometryBox,
    pub segment_boxes: Vec<GeometryBox>,
    pub calibration_image_size: Option<ImageSize>,
    pub num_digits: u8,
    pub has_decimal_point: bool,
    pub decimal_position: u8,
    pub notes: Option<String>,
    pub created_at: MonotonicTimeNs,
}

impl DisplayCalibrationInput {
    #[allow(clippy::too_many_arguments)]
    pub fn v1(
        setting_type: SettingType,
        device_name: Option<String>,
        display_box: GeometryBox,
        segment_boxes: Vec<GeometryBox>,
        calibration_image_size: Option<ImageSize>,
        num_digits: u8,
        has_decimal_point: bool,
        decimal_position: u8,
        notes: Option<String>,
        created_at: MonotonicTimeNs,
    ) -> Result<Self, ContractViolation> {
        let input = Self {
            schema_version: DISPLAY_CONTRACT_VERSION,
            setting_type,
            device_name,
            display_box,
            segment_boxes,
            calibration_image_size,
            num_digits,
            has_decimal_point,
            decimal_position,
            notes,
            created_at,
        };
        input.validate()?;
        Ok(input)
    }
}

fn validate_display_fields(
    setting_type: &SettingType,
    device_name: &Option<String>,
    display_box: &GeometryBox,
    segment_boxes: &[GeometryBox],
    calibration_image_size: &Option<ImageSize>,
    num_digits: u8,
    decimal_position: u8,
    notes: &Option<String>,
) -> Result<(), ContractViolation> {
    setting_type.validate()?;
    validate_opt_label("display_calibration.device_name", device_name, 191)?;
    display_box.validate()?;
    for b in segment_boxes {
        b.validate()?;
    }
    if let Some(size) = calibration_image_size {
        size.validate()?;
    }
    if num_digits == 0 || num_digits > 10 {
        return Err(ContractViolation::InvalidValue {
            field: "display_calibration.num_digits",
            reason: "must be within 1..=10",
        });
    }
    if decimal_position == 0 || decimal_position > 9 {
        return Err(ContractViolation::InvalidValue {
            field: "display_calibration.decimal_position",
            reason: "must be within 1..=9",
        });
    }
    validate_opt_label("display_calibration.notes", notes, 1000)
}

impl Validate for DisplayCalibrationInput {
    fn validate(&self) -> Result<(), ContractViolation> {
        if self.schema_version != DISPLAY_CONTRACT_VERSION {
            return Err(ContractViolation::InvalidValue {
                field: "display_calibration_input.schema_version",
                reason: "must match DISPLAY_CONTRACT_VERSION",
            });
        }
        validate_display_fields(
            &self.setting_type,
            &self.device_name,
            &self.display_box,
            &self.segment_boxes,
            &self.calibration_image_size,
            self.num_digits,
            self.decimal_position,
            &self.notes,
        )?;
        validate_created_at("display_calibration_input.created_at", self.created_at)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplayCalibrationRecord {
    pub schema_version: SchemaVersion,
    pub id: DisplayCalibrationId,
    pub setting_type: SettingType,
    pub device_name: Option<String>,
    pub display_box: GeometryBox,
    pub segment_boxes: Vec<GeometryBox>,
    pub calibration_image_size: Option<ImageSize>,
    pub num_digits: u8,
    pub has_decimal_point: bool,
    pub decimal_position: u8,
    pub is_active: bool,
    pub notes: Option<String>,
    pub created_at: MonotonicTimeNs,
}

impl DisplayCalibrationRecord {
    pub fn from_input_v1(
        id: DisplayCalibrationId,
        input: DisplayCalibrationInput,
        is_active: bool,
    ) -> Result<Self, ContractViolation> {
        input.validate()?;
        Ok(Self {
            schema_version: DISPLAY_CONTRACT_VERSION,
            id,
            setting_type: input.setting_type,
            device_name: input.device_name,
            display_box: input.display_box,
            segment_boxes: input.segment_boxes,
            calibration_image_size: input.calibration_image_size,
            num_digits: input.num_digits,
            has_decimal_point: input.has_decimal_point,
            decimal_position: input.decimal_position,
            is_active,
            notes: input.notes,
            created_at: input.created_at,
        })
    }

    /// Inserts the decimal point into a raw digit string read off the
    /// display, counted `decimal_position` digits from the right
    /// (position 1 turns "319" into "31.9"). Readings with an
    /// unreadable digit (`'?'`) or fewer digits than the decimal
    /// position pass through unchanged.
    pub fn format_reading(&self, raw: &str) -> String {
        if !self.has_decimal_point || raw.contains('?') {
            return raw.to_string();
        }
        let pos = usize::from(self.decimal_position);
        if raw.len() < pos {
            return raw.to_string();
        }
        let insert_at = raw.len() - pos;
        format!("{}.{}", &raw[..insert_at], &raw[insert_at..])
    }
}

impl Validate for DisplayCalibrationRecord {
    fn validate(&self) -> Result<(), ContractViolation> {
        if self.schema_version != DISPLAY_CONTRACT_VERSION {
            return Err(ContractViolation::InvalidValue {
                field: "display_calibration_record.schema_version",
                reason: "must match DISPLAY_CONTRACT_VERSION",
            });
        }
        validate_display_fields(
            &self.setting_type,
            &self.device_name,
            &self.display_box,
            &self.segment_boxes,
            &self.calibration_image_size,
            self.num_digits,
            self.decimal_position,
            &self.notes,
        )?;
        validate_created_at("display_calibration_record.created_at", self.created_at)
    }
}
