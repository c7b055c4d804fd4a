#![forbid(unsafe_code)]

//! Typed repository interfaces over the rig tables. The service layer
//! is written against these traits; `RigStore` is the in-memory
//! implementation, and a database-backed store can slot in behind the
//! same contract. Implementations must make the activate swap a single
//! atomic unit per scope.

use rig_contracts::actuator::{
    ActuatorCalibrationId, ActuatorCalibrationInput, ActuatorCalibrationRecord,
};
use rig_contracts::detection::{
    DetectionSettingsId, DetectionSettingsInput, DetectionSettingsRecord,
};
use rig_contracts::display::{
    DisplayCalibrationId, DisplayCalibrationInput, DisplayCalibrationRecord, SettingType,
};
use rig_contracts::specimen::{
    SpecimenTestId, SpecimenTestInput, SpecimenTestRecord, TestKind,
};

use crate::store::{RigStore, StorageError};

/// Repository interface for actuator travel calibrations.
pub trait ActuatorCalibrationRepo {
    fn insert_actuator_calibration_active(
        &mut self,
        input: ActuatorCalibrationInput,
    ) -> Result<ActuatorCalibrationId, StorageError>;
    fn actuator_calibration(
        &self,
        id: ActuatorCalibrationId,
    ) -> Option<&ActuatorCalibrationRecord>;
    fn active_actuator_calibration(&self) -> Option<&ActuatorCalibrationRecord>;
    fn activate_actuator_calibration(
        &mut self,
        id: ActuatorCalibrationId,
    ) -> Result<(), StorageError>;
    fn save_actuator_calibration(
        &mut self,
        record: ActuatorCalibrationRecord,
    ) -> Result<(), StorageError>;
}

/// Repository interface for display-reading calibrations, partitioned
/// by setting type.
pub trait DisplayCalibrationRepo {
    fn insert_display_calibration_active(
        &mut self,
        input: DisplayCalibrationInput,
    ) -> Result<DisplayCalibrationId, StorageError>;
    fn display_calibration(&self, id: DisplayCalibrationId) -> Option<&DisplayCalibrationRecord>;
    fn active_display_calibration(
        &self,
        setting_type: &SettingType,
    ) -> Option<&DisplayCalibrationRecord>;
    fn activate_display_calibration(
        &mut self,
        id: DisplayCalibrationId,
    ) -> Result<(), StorageError>;
}

/// Repository interface for image-detection settings (global scope).
pub trait DetectionSettingsRepo {
    fn insert_detection_settings_active(
        &mut self,
        input: DetectionSettingsInput,
    ) -> Result<DetectionSettingsId, StorageError>;
    fn detection_settings_row(&self, id: DetectionSettingsId)
        -> Option<&DetectionSettingsRecord>;
    fn active_detection_settings(&self) -> Option<&DetectionSettingsRecord>;
    fn activate_detection_settings(
        &mut self,
        id: DetectionSettingsId,
    ) -> Result<(), StorageError>;
}

/// Repository interface for specimen test records.
pub trait SpecimenTestRepo {
    fn insert_specimen_test(
        &mut self,
        input: SpecimenTestInput,
        pressure: f64,
        stress: f64,
    ) -> Result<SpecimenTestId, StorageError>;
    fn specimen_test(&self, id: SpecimenTestId) -> Option<&SpecimenTestRecord>;
    fn specimen_tests_by_kind(&self, kind: TestKind) -> Vec<&SpecimenTestRecord>;
    fn save_specimen_test(&mut self, record: SpecimenTestRecord) -> Result<(), StorageError>;
}

impl ActuatorCalibrationRepo for RigStore {
    fn insert_actuator_calibration_active(
        &mut self,
        input: ActuatorCalibrationInput,
    ) -> Result<ActuatorCalibrationId, StorageError> {
        RigStore::insert_actuator_calibration_active(self, input)
    }

    fn actuator_calibration(
        &self,
        id: ActuatorCalibrationId,
    ) -> Option<&ActuatorCalibrationRecord> {
        RigStore::actuator_calibration(self, id)
    }

    fn active_actuator_calibration(&self) -> Option<&ActuatorCalibrationRecord> {
        RigStore::active_actuator_calibration(self)
    }

    fn activate_actuator_calibration(
        &mut self,
        id: ActuatorCalibrationId,
    ) -> Result<(), StorageError> {
        RigStore::activate_actuator_calibration(self, id)
    }

    fn save_actuator_calibration(
        &mut self,
        record: ActuatorCalibrationRecord,
    ) -> Result<(), StorageError> {
        RigStore::save_actuator_calibration(self, record)
    }
}

impl DisplayCalibrationRepo for RigStore {
    fn insert_display_calibration_active(
        &mut self,
        input: DisplayCalibrationInput,
    ) -> Result<DisplayCalibrationId, StorageError> {
        RigStore::insert_display_calibration_active(self, input)
    }

    fn display_calibration(&self, id: DisplayCalibrationId) -> Option<&DisplayCalibrationRecord> {
        RigStore::display_calibration(self, id)
    }

    fn active_display_calibration(
        &self,
        setting_type: &SettingType,
    ) -> Option<&DisplayCalibrationRecord> {
        RigStore::active_display_calibration(self, setting_type)
    }

    fn activate_display_calibration(
        &mut self,
        id: DisplayCalibrationId,
    ) -> Result<(), StorageError> {
        RigStore::activate_display_calibration(self, id)
    }
}

impl DetectionSettingsRepo for RigStore {
    fn insert_detection_settings_active(
        &mut self,
        input: DetectionSettingsInput,
    ) -> Result<DetectionSettingsId, StorageError> {
        RigStore::insert_detection_settings_active(self, input)
    }

    fn detection_settings_row(
        &self,
        id: DetectionSettingsId,
    ) -> Option<&DetectionSettingsRecord> {
        RigStore::detection_settings_row(self, id)
    }

    fn active_detection_settings(&self) -> Option<&DetectionSettingsRecord> {
        RigStore::active_detection_settings(self)
    }

    fn activate_detection_settings(
        &mut self,
        id: DetectionSettingsId,
    ) -> Result<(), StorageError> {
        RigStore::activate_detection_settings(self, id)
    }
}

impl SpecimenTestRepo for RigStore {
    fn insert_specimen_test(
        &mut self,
        input: SpecimenTestInput,
        pressure: f64,
        stress: f64,
    ) -> Result<SpecimenTestId, StorageError> {
        RigStore::insert_specimen_test(self, input, pressure, stress)
    }

    fn specimen_test(&self, id: SpecimenTestId) -> Option<&SpecimenTestRecord> {
        RigStore::specimen_test(self, id)
    }

    fn specimen_tests_by_kind(&self, kind: TestKind) -> Vec<&SpecimenTestRecord> {
        RigStore::specimen_tests_by_kind(self, kind)
    }

    fn save_specimen_test(&mut self, record: SpecimenTestRecord) -> Result<(), StorageError> {
        RigStore::save_specimen_test(self, record)
    }
}
