#![forbid(unsafe_code)]

//! Image-detection settings operations. A single global scope; when
//! nothing has been saved yet the rig runs on compiled-in defaults.

use rig_contracts::detection::{DetectionSettingsInput, DetectionSettingsRecord};
use rig_storage::repo::DetectionSettingsRepo;
use rig_storage::store::DETECTION_SETTINGS_TABLE;

use crate::ServiceError;

/// Creates a settings row and activates it, deactivating the previous
/// one in the same atomic unit.
pub fn save_detection_settings<R: DetectionSettingsRepo>(
    repo: &mut R,
    input: DetectionSettingsInput,
) -> Result<DetectionSettingsRecord, ServiceError> {
    let id = repo.insert_detection_settings_active(input)?;
    repo.detection_settings_row(id)
        .cloned()
        .ok_or(ServiceError::NotFound {
            entity: DETECTION_SETTINGS_TABLE,
            key: id.0.to_string(),
        })
}

/// The active settings, or the compiled defaults when none have been
/// saved. Absence is a normal state here, never an error.
pub fn active_detection_settings<R: DetectionSettingsRepo>(repo: &R) -> DetectionSettingsRecord {
    repo.active_detection_settings()
        .cloned()
        .unwrap_or_else(DetectionSettingsRecord::default_v1)
}
