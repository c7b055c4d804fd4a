#![forbid(unsafe_code)]

use serde::{Deserialize, Serialize};

use crate::common::{validate_created_at, validate_non_negative};
use crate::{ContractViolation, MonotonicTimeNs, SchemaVersion, Validate};

pub const DETECTION_CONTRACT_VERSION: SchemaVersion = SchemaVersion(1);

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct DetectionSettingsId(pub u64);

/// Image-detection tuning for the specimen camera. One global scope;
/// at most one record is active at a time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectionSettingsInput {
    pub schema_version: SchemaVersion,
    pub threshold1: u8,
    pub threshold2: u8,
    pub min_area: u32,
    pub blur_kernel: u32,
    pub dilation: u32,
    pub erosion: u32,
    pub roi_size: u8,
    pub brightness: i16,
    pub contrast: u16,
    pub mm_per_pixel: f64,
    pub created_at: MonotonicTimeNs,
}

impl DetectionSettingsInput {
    /// Builds and validates an input. An even blur kernel is bumped to
    /// the next odd value; the detection pipeline requires odd kernels.
    #[allow(clippy::too_many_arguments)]
    pub fn v1(
        threshold1: u8,
        threshold2: u8,
        min_area: u32,
        blur_kernel: u32,
        dilation: u32,
        erosion: u32,
        roi_size: u8,
        brightness: i16,
        contrast: u16,
        mm_per_pixel: f64,
        created_at: MonotonicTimeNs,
    ) -> Result<Self, ContractViolation> {
        let blur_kernel = if blur_kernel % 2 == 0 {
            blur_kernel + 1
        } else {
            blur_kernel
        };
        let input = Self {
            schema_version: DETECTION_CONTRACT_VERSION,
            threshold1,
            threshold2,
            min_area,
            blur_kernel,
            dilation,
            erosion,
            roi_size,
            brightness,
            contrast,
            mm_per_pixel,
            created_at,
        };
        input.validate()?;
        Ok(input)
    }
}

fn validate_detection_fields(
    blur_kernel: u32,
    roi_size: u8,
    brightness: i16,
    contrast: u16,
    mm_per_pixel: f64,
) -> Result<(), ContractViolation> {
    if blur_kernel == 0 {
        return Err(ContractViolation::InvalidValue {
            field: "detection_settings.blur_kernel",
            reason: "must be >= 1",
        });
    }
    if blur_kernel % 2 == 0 {
        return Err(ContractViolation::InvalidValue {
            field: "detection_settings.blur_kernel",
            reason: "must be odd",
        });
    }
    if !(10..=100).contains(&roi_size) {
        return Err(ContractViolation::InvalidValue {
            field: "detection_settings.roi_size",
            reason: "must be within 10..=100",
        });
    }
    if !(-100..=100).contains(&brightness) {
        return Err(ContractViolation::InvalidValue {
            field: "detection_settings.brightness",
            reason: "must be within -100..=100",
        });
    }
    if contrast > 200 {
        return Err(ContractViolation::InvalidValue {
            field: "detection_settings.contrast",
            reason: "must be within 0..=200",
        });
    }
    validate_non_negative("detection_settings.mm_per_pixel", mm_per_pixel)
}

impl Validate for DetectionSettingsInput {
    fn validate(&self) -> Result<(), ContractViolation> {
        if self.schema_version != DETECTION_CONTRACT_VERSION {
            return Err(ContractViolation::InvalidValue {
                field: "detection_settings_input.schema_version",
                reason: "must match DETECTION_CONTRACT_VERSION",
            });
        }
        validate_detection_fields(
            self.blur_kernel,
            self.roi_size,
            self.brightness,
            self.contrast,
            self.mm_per_pixel,
        )?;
        validate_created_at("detection_settings_input.created_at", self.created_at)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectionSettingsRecord {
    pub schema_version: SchemaVersion,
    pub id: DetectionSettingsId,
    pub threshold1: u8,
    pub threshold2: u8,
    pub min_area: u32,
    pub blur_kernel: u32,
    pub dilation: u32,
    pub erosion: u32,
    pub roi_size: u8,
    pub brightness: i16,
    pub contrast: u16,
    pub mm_per_pixel: f64,
    pub is_active: bool,
    pub created_at: MonotonicTimeNs,
}

impl DetectionSettingsRecord {
    pub fn from_input_v1(
        id: DetectionSettingsId,
        input: DetectionSettingsInput,
        is_active: bool,
    ) -> Result<Self, ContractViolation> {
        input.validate()?;
        Ok(Self {
            schema_version: DETECTION_CONTRACT_VERSION,
            id,
            threshold1: input.threshold1,
            threshold2: input.threshold2,
            min_area: input.min_area,
            blur_kernel: input.blur_kernel,
            dilation: input.dilation,
            erosion: input.erosion,
            roi_size: input.roi_size,
            brightness: input.brightness,
            contrast: input.contrast,
            mm_per_pixel: input.mm_per_pixel,
            is_active,
            created_at: input.created_at,
        })
    }

    /// Compiled-in defaults served when no row has been saved yet.
    /// Carries id 0 and a zero timestamp; it is never persisted.
    pub fn default_v1() -> Self {
        Self {
            schema_version: DETECTION_CONTRACT_VERSION,
            id: DetectionSettingsId(0),
            threshold1: 52,
            threshold2: 104,
            min_area: 1000,
            blur_kernel: 21,
            dilation: 1,
            erosion: 1,
            roi_size: 60,
            brightness: 0,
            contrast: 101,
            mm_per_pixel: 0.1,
            is_active: true,
            created_at: MonotonicTimeNs(0),
        }
    }
}

impl Validate for DetectionSettingsRecord {
    fn validate(&self) -> Result<(), ContractViolation> {
        if self.schema_version != DETECTION_CONTRACT_VERSION {
            return Err(ContractViolation::InvalidValue {
                field: "detection_settings_record.schema_version",
                reason: "must match DETECTION_CONTRACT_VERSION",
            });
        }
        validate_detection_fields(
            self.blur_kernel,
            self.roi_size,
            self.brightness,
            self.contrast,
            self.mm_per_pixel,
        )?;
        validate_created_at("detection_settings_record.created_at", self.created_at)
    }
}
