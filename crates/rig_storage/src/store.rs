#![forbid(unsafe_code)]

//! In-memory rig store: one BTreeMap table per record family plus the
//! single-active registry wiring. Ids are assigned by the store and
//! never reused.

use std::collections::BTreeMap;

use sha2::{Digest, Sha256};

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
use rig_contracts::{ContractViolation, MonotonicTimeNs, Validate};

use crate::registry::{self, ActiveScoped};

pub const ACTUATOR_CALIBRATIONS_TABLE: &str = "actuator_calibrations";
pub const DISPLAY_CALIBRATIONS_TABLE: &str = "display_calibrations";
pub const DETECTION_SETTINGS_TABLE: &str = "detection_settings";
pub const SPECIMEN_TESTS_TABLE: &str = "specimen_tests";

#[derive(Debug, Clone, PartialEq)]
pub enum StorageError {
    NotFound { table: &'static str, key: String },
    ActivationConflict { table: &'static str, scope: String },
    ContractViolation(ContractViolation),
}

impl From<ContractViolation> for StorageError {
    fn from(v: ContractViolation) -> Self {
        StorageError::ContractViolation(v)
    }
}

fn photo_fingerprint(photo: Option<&String>) -> Option<String> {
    photo.map(|p| {
        let digest = Sha256::digest(p.as_bytes());
        digest.iter().map(|b| format!("{b:02x}")).collect()
    })
}

impl ActiveScoped for ActuatorCalibrationRecord {
    type Scope = ();

    fn scope(&self) -> Self::Scope {}

    fn is_active(&self) -> bool {
        self.is_active
    }

    fn set_active(&mut self, active: bool) {
        self.is_active = active;
    }

    fn created_at(&self) -> MonotonicTimeNs {
        self.created_at
    }
}

impl ActiveScoped for DisplayCalibrationRecord {
    type Scope = SettingType;

    fn scope(&self) -> Self::Scope {
        self.setting_type.clone()
    }

    fn is_active(&self) -> bool {
        self.is_active
    }

    fn set_active(&mut self, active: bool) {
        self.is_active = active;
    }

    fn created_at(&self) -> MonotonicTimeNs {
        self.created_at
    }
}

impl ActiveScoped for DetectionSettingsRecord {
    type Scope = ();

    fn scope(&self) -> Self::Scope {}

    fn is_active(&self) -> bool {
        self.is_active
    }

    fn set_active(&mut self, active: bool) {
        self.is_active = active;
    }

    fn created_at(&self) -> MonotonicTimeNs {
        self.created_at
    }
}

#[derive(Debug, Clone)]
pub struct RigStore {
    actuator_calibrations: BTreeMap<ActuatorCalibrationId, ActuatorCalibrationRecord>,
    display_calibrations: BTreeMap<DisplayCalibrationId, DisplayCalibrationRecord>,
    detection_settings: BTreeMap<DetectionSettingsId, DetectionSettingsRecord>,
    specimen_tests: BTreeMap<SpecimenTestId, SpecimenTestRecord>,
    next_actuator_calibration_id: u64,
    next_display_calibration_id: u64,
    next_detection_settings_id: u64,
    next_specimen_test_id: u64,
}

impl RigStore {
    pub fn new_in_memory() -> Self {
        Self {
            actuator_calibrations: BTreeMap::new(),
            display_calibrations: BTreeMap::new(),
            detection_settings: BTreeMap::new(),
            specimen_tests: BTreeMap::new(),
            next_actuator_calibration_id: 1,
            next_display_calibration_id: 1,
            next_detection_settings_id: 1,
            next_specimen_test_id: 1,
        }
    }

    // ------------------------
    // Actuator calibrations (global scope).
    // ------------------------

    /// Create-and-activate: inserts the new calibration already
    /// holding the active marker, deactivating every previous row in
    /// the same pass.
    pub fn insert_actuator_calibration_active(
        &mut self,
        input: ActuatorCalibrationInput,
    ) -> Result<ActuatorCalibrationId, StorageError> {
        input.validate()?;
        let id = ActuatorCalibrationId(self.next_actuator_calibration_id);
        let record = ActuatorCalibrationRecord::from_input_v1(id, input, true)?;
        registry::deactivate_scope(&mut self.actuator_calibrations, &());
        self.actuator_calibrations.insert(id, record);
        self.next_actuator_calibration_id = self.next_actuator_calibration_id.saturating_add(1);
        Ok(id)
    }

    pub fn actuator_calibration(
        &self,
        id: ActuatorCalibrationId,
    ) -> Option<&ActuatorCalibrationRecord> {
        self.actuator_calibrations.get(&id)
    }

    pub fn actuator_calibrations(
        &self,
    ) -> &BTreeMap<ActuatorCalibrationId, ActuatorCalibrationRecord> {
        &self.actuator_calibrations
    }

    pub fn active_actuator_calibration(&self) -> Option<&ActuatorCalibrationRecord> {
        registry::active_in(&self.actuator_calibrations, &())
    }

    pub fn activate_actuator_calibration(
        &mut self,
        id: ActuatorCalibrationId,
    ) -> Result<(), StorageError> {
        registry::activate_in(
            &mut self.actuator_calibrations,
            ACTUATOR_CALIBRATIONS_TABLE,
            id,
            id.0.to_string(),
        )
    }

    /// Atomic upsert. A record claiming the active marker while a
    /// different row is active is rejected; moving the marker is the
    /// swap's job.
    pub fn save_actuator_calibration(
        &mut self,
        record: ActuatorCalibrationRecord,
    ) -> Result<(), StorageError> {
        record.validate()?;
        registry::check_activation_conflict(
            &self.actuator_calibrations,
            ACTUATOR_CALIBRATIONS_TABLE,
            &record.id,
            &record,
            "global".to_string(),
        )?;
        if record.id.0 >= self.next_actuator_calibration_id {
            self.next_actuator_calibration_id = record.id.0.saturating_add(1);
        }
        self.actuator_calibrations.insert(record.id, record);
        Ok(())
    }

    pub fn remove_actuator_calibration(
        &mut self,
        id: ActuatorCalibrationId,
    ) -> Option<ActuatorCalibrationRecord> {
        self.actuator_calibrations.remove(&id)
    }

    // ------------------------
    // Display calibrations (scoped by setting type).
    // ------------------------

    pub fn insert_display_calibration_active(
        &mut self,
        input: DisplayCalibrationInput,
    ) -> Result<DisplayCalibrationId, StorageError> {
        input.validate()?;
        let id = DisplayCalibrationId(self.next_display_calibration_id);
        let scope = input.setting_type.clone();
        let record = DisplayCalibrationRecord::from_input_v1(id, input, true)?;
        registry::deactivate_scope(&mut self.display_calibrations, &scope);
        self.display_calibrations.insert(id, record);
        self.next_display_calibration_id = self.next_display_calibration_id.saturating_add(1);
        Ok(id)
    }

    pub fn display_calibration(
        &self,
        id: DisplayCalibrationId,
    ) -> Option<&DisplayCalibrationRecord> {
        self.display_calibrations.get(&id)
    }

    pub fn display_calibrations(
        &self,
    ) -> &BTreeMap<DisplayCalibrationId, DisplayCalibrationRecord> {
        &self.display_calibrations
    }

    pub fn active_display_calibration(
        &self,
        setting_type: &SettingType,
    ) -> Option<&DisplayCalibrationRecord> {
        registry::active_in(&self.display_calibrations, setting_type)
    }

    pub fn activate_display_calibration(
        &mut self,
        id: DisplayCalibrationId,
    ) -> Result<(), StorageError> {
        registry::activate_in(
            &mut self.display_calibrations,
            DISPLAY_CALIBRATIONS_TABLE,
            id,
            id.0.to_string(),
        )
    }

    pub fn save_display_calibration(
        &mut self,
        record: DisplayCalibrationRecord,
    ) -> Result<(), StorageError> {
        record.validate()?;
        registry::check_activation_conflict(
            &self.display_calibrations,
            DISPLAY_CALIBRATIONS_TABLE,
            &record.id,
            &record,
            record.setting_type.as_str().to_string(),
        )?;
        if record.id.0 >= self.next_display_calibration_id {
            self.next_display_calibration_id = record.id.0.saturating_add(1);
        }
        self.display_calibrations.insert(record.id, record);
        Ok(())
    }

    pub fn remove_display_calibration(
        &mut self,
        id: DisplayCalibrationId,
    ) -> Option<DisplayCalibrationRecord> {
        self.display_calibrations.remove(&id)
    }

    // ------------------------
    // Detection settings (global scope).
    // ------------------------

    pub fn insert_detection_settings_active(
        &mut self,
        input: DetectionSettingsInput,
    ) -> Result<DetectionSettingsId, StorageError> {
        input.validate()?;
        let id = DetectionSettingsId(self.next_detection_settings_id);
        let record = DetectionSettingsRecord::from_input_v1(id, input, true)?;
        registry::deactivate_scope(&mut self.detection_settings, &());
        self.detection_settings.insert(id, record);
        self.next_detection_settings_id = self.next_detection_settings_id.saturating_add(1);
        Ok(id)
    }

    pub fn detection_settings_row(
        &self,
        id: DetectionSettingsId,
    ) -> Option<&DetectionSettingsRecord> {
        self.detection_settings.get(&id)
    }

    pub fn detection_settings_rows(
        &self,
    ) -> &BTreeMap<DetectionSettingsId, DetectionSettingsRecord> {
        &self.detection_settings
    }

    pub fn active_detection_settings(&self) -> Option<&DetectionSettingsRecord> {
        registry::active_in(&self.detection_settings, &())
    }

    pub fn activate_detection_settings(
        &mut self,
        id: DetectionSettingsId,
    ) -> Result<(), StorageError> {
        registry::activate_in(
            &mut self.detection_settings,
            DETECTION_SETTINGS_TABLE,
            id,
            id.0.to_string(),
        )
    }

    pub fn remove_detection_settings(
        &mut self,
        id: DetectionSettingsId,
    ) -> Option<DetectionSettingsRecord> {
        self.detection_settings.remove(&id)
    }

    // ------------------------
    // Specimen tests.
    // ------------------------

    /// Inserts a specimen test with both derived values already
    /// computed by the caller; the store only adds the id and the
    /// photo fingerprint.
    pub fn insert_specimen_test(
        &mut self,
        input: SpecimenTestInput,
        pressure: f64,
        stress: f64,
    ) -> Result<SpecimenTestId, StorageError> {
        input.validate()?;
        let id = SpecimenTestId(self.next_specimen_test_id);
        let mut record = SpecimenTestRecord::from_input_v1(id, input)?;
        record.photo_hash = photo_fingerprint(record.photo.as_ref());
        record.pressure = Some(pressure);
        record.stress = Some(stress);
        self.specimen_tests.insert(id, record);
        self.next_specimen_test_id = self.next_specimen_test_id.saturating_add(1);
        Ok(id)
    }

    pub fn specimen_test(&self, id: SpecimenTestId) -> Option<&SpecimenTestRecord> {
        self.specimen_tests.get(&id)
    }

    pub fn specimen_tests(&self) -> &BTreeMap<SpecimenTestId, SpecimenTestRecord> {
        &self.specimen_tests
    }

    pub fn specimen_tests_by_kind(&self, kind: TestKind) -> Vec<&SpecimenTestRecord> {
        self.specimen_tests
            .values()
            .filter(|r| r.kind == kind)
            .collect()
    }

    /// Atomic upsert; refreshes the photo fingerprint from the stored
    /// photo payload.
    pub fn save_specimen_test(
        &mut self,
        mut record: SpecimenTestRecord,
    ) -> Result<(), StorageError> {
        record.validate()?;
        record.photo_hash = photo_fingerprint(record.photo.as_ref());
        if record.id.0 >= self.next_specimen_test_id {
            self.next_specimen_test_id = record.id.0.saturating_add(1);
        }
        self.specimen_tests.insert(record.id, record);
        Ok(())
    }

    pub fn remove_specimen_test(&mut self, id: SpecimenTestId) -> Option<SpecimenTestRecord> {
        self.specimen_tests.remove(&id)
    }
}
