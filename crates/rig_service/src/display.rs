#![forbid(unsafe_code)]

//! Display-reading calibration operations. The active-record invariant
//! holds independently per setting type, so calibrating the dial gauge
//! readout never disturbs the seven-segment one.

use rig_contracts::display::{
    DisplayCalibrationId, DisplayCalibrationInput, DisplayCalibrationRecord, SettingType,
};
use rig_storage::repo::DisplayCalibrationRepo;
use rig_storage::store::DISPLAY_CALIBRATIONS_TABLE;

use crate::ServiceError;

fn fetch<R: DisplayCalibrationRepo>(
    repo: &R,
    id: DisplayCalibrationId,
) -> Result<DisplayCalibrationRecord, ServiceError> {
    repo.display_calibration(id)
        .cloned()
        .ok_or(ServiceError::NotFound {
            entity: DISPLAY_CALIBRATIONS_TABLE,
            key: id.0.to_string(),
        })
}

/// Creates a calibration and activates it within its setting-type
/// scope, deactivating the previous one atomically.
pub fn save_display_calibration<R: DisplayCalibrationRepo>(
    repo: &mut R,
    input: DisplayCalibrationInput,
) -> Result<DisplayCalibrationRecord, ServiceError> {
    let id = repo.insert_display_calibration_active(input)?;
    fetch(repo, id)
}

pub fn get_active_display_calibration<R: DisplayCalibrationRepo>(
    repo: &R,
    setting_type: &SettingType,
) -> Option<DisplayCalibrationRecord> {
    repo.active_display_calibration(setting_type).cloned()
}

/// Re-activates a stored calibration through the registry swap.
pub fn activate_display_calibration<R: DisplayCalibrationRepo>(
    repo: &mut R,
    id: DisplayCalibrationId,
) -> Result<DisplayCalibrationRecord, ServiceError> {
    repo.activate_display_calibration(id)?;
    fetch(repo, id)
}
