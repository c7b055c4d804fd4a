#![forbid(unsafe_code)]

use rig_contracts::actuator::ActuatorCalibrationInput;
use rig_contracts::detection::DetectionSettingsInput;
use rig_contracts::display::{
    DisplayCalibrationInput, GeometryBox, SettingType,
};
use rig_contracts::MonotonicTimeNs;
use rig_storage::{RigStore, StorageError};

fn actuator_input(t: u64, midpoint: f64) -> ActuatorCalibrationInput {
    ActuatorCalibrationInput::v1(midpoint, 30.0, 40.0, None, None, MonotonicTimeNs(t)).unwrap()
}

fn display_input(t: u64, setting_type: SettingType) -> DisplayCalibrationInput {
    let display_box = GeometryBox {
        x: 10.0,
        y: 10.0,
        width: 200.0,
        height: 80.0,
    };
    DisplayCalibrationInput::v1(
        setting_type,
        Some("bench_cam_1".to_string()),
        display_box,
        vec![display_box],
        None,
        3,
        true,
        1,
        None,
        MonotonicTimeNs(t),
    )
    .unwrap()
}

fn detection_input(t: u64, threshold1: u8) -> DetectionSettingsInput {
    DetectionSettingsInput::v1(threshold1, 104, 1000, 21, 1, 1, 60, 0, 101, 0.1, MonotonicTimeNs(t))
        .unwrap()
}

#[test]
fn at_reg_db_01_insert_active_deactivates_previous() {
    let mut s = RigStore::new_in_memory();
    let a = s.insert_actuator_calibration_active(actuator_input(10, 100.0)).unwrap();
    let b = s.insert_actuator_calibration_active(actuator_input(11, 120.0)).unwrap();

    assert_eq!(s.active_actuator_calibration().unwrap().id, b);
    assert!(!s.actuator_calibration(a).unwrap().is_active);
    assert!(s.actuator_calibration(b).unwrap().is_active);
}

#[test]
fn at_reg_db_02_activate_swaps_atomically_last_writer_wins() {
    let mut s = RigStore::new_in_memory();
    let a = s.insert_actuator_calibration_active(actuator_input(10, 100.0)).unwrap();
    let b = s.insert_actuator_calibration_active(actuator_input(11, 120.0)).unwrap();

    s.activate_actuator_calibration(a).unwrap();
    assert_eq!(s.active_actuator_calibration().unwrap().id, a);
    assert!(!s.actuator_calibration(b).unwrap().is_active);

    s.activate_actuator_calibration(b).unwrap();
    assert_eq!(s.active_actuator_calibration().unwrap().id, b);
    assert!(!s.actuator_calibration(a).unwrap().is_active);

    let active_count = s
        .actuator_calibrations()
        .values()
        .filter(|r| r.is_active)
        .count();
    assert_eq!(active_count, 1);
}

#[test]
fn at_reg_db_03_activate_missing_id_leaves_state_unchanged() {
    let mut s = RigStore::new_in_memory();
    let a = s.insert_actuator_calibration_active(actuator_input(10, 100.0)).unwrap();

    let missing = rig_contracts::actuator::ActuatorCalibrationId(999);
    assert!(matches!(
        s.activate_actuator_calibration(missing),
        Err(StorageError::NotFound { .. })
    ));
    assert_eq!(s.active_actuator_calibration().unwrap().id, a);
}

#[test]
fn at_reg_db_04_display_scopes_hold_independent_actives() {
    let mut s = RigStore::new_in_memory();
    let seven = SettingType::seven_segment();
    let dial = SettingType::new("dial_gauge").unwrap();

    let a = s.insert_display_calibration_active(display_input(10, seven.clone())).unwrap();
    let b = s.insert_display_calibration_active(display_input(11, dial.clone())).unwrap();

    assert_eq!(s.active_display_calibration(&seven).unwrap().id, a);
    assert_eq!(s.active_display_calibration(&dial).unwrap().id, b);

    // A new seven-segment calibration must not disturb the dial scope.
    let c = s.insert_display_calibration_active(display_input(12, seven.clone())).unwrap();
    assert_eq!(s.active_display_calibration(&seven).unwrap().id, c);
    assert_eq!(s.active_display_calibration(&dial).unwrap().id, b);
    assert!(!s.display_calibration(a).unwrap().is_active);
}

#[test]
fn at_reg_db_05_active_read_is_none_not_error_when_empty() {
    let s = RigStore::new_in_memory();
    assert!(s.active_actuator_calibration().is_none());
    assert!(s.active_detection_settings().is_none());
    assert!(s
        .active_display_calibration(&SettingType::seven_segment())
        .is_none());
}

#[test]
fn at_reg_db_06_deletion_between_reads_is_tolerated() {
    let mut s = RigStore::new_in_memory();
    let a = s.insert_actuator_calibration_active(actuator_input(10, 100.0)).unwrap();
    assert!(s.remove_actuator_calibration(a).is_some());
    assert!(s.active_actuator_calibration().is_none());
    assert!(s.actuator_calibration(a).is_none());
}

#[test]
fn at_reg_db_07_raw_save_cannot_steal_the_active_marker() {
    let mut s = RigStore::new_in_memory();
    let a = s.insert_actuator_calibration_active(actuator_input(10, 100.0)).unwrap();
    let b = s.insert_actuator_calibration_active(actuator_input(11, 120.0)).unwrap();

    // Re-marking an inactive row active while b holds the marker must
    // be refused; only the swap moves the marker.
    let mut stale = s.actuator_calibration(a).unwrap().clone();
    stale.is_active = true;
    assert!(matches!(
        s.save_actuator_calibration(stale),
        Err(StorageError::ActivationConflict { .. })
    ));
    assert_eq!(s.active_actuator_calibration().unwrap().id, b);

    // Saving the holder itself is fine.
    let mut holder = s.actuator_calibration(b).unwrap().clone();
    holder.midpoint = 130.0;
    s.save_actuator_calibration(holder).unwrap();
    assert_eq!(s.active_actuator_calibration().unwrap().midpoint, 130.0);
}

#[test]
fn at_reg_db_08_detection_swap_and_blur_normalization() {
    let mut s = RigStore::new_in_memory();
    let a = s.insert_detection_settings_active(detection_input(10, 52)).unwrap();
    let b = s
        .insert_detection_settings_active(
            DetectionSettingsInput::v1(60, 110, 1200, 20, 1, 1, 60, 0, 101, 0.1, MonotonicTimeNs(11))
                .unwrap(),
        )
        .unwrap();

    let active = s.active_detection_settings().unwrap();
    assert_eq!(active.id, b);
    assert_eq!(active.blur_kernel, 21); // even input bumped to odd
    assert!(!s.detection_settings_row(a).unwrap().is_active);
}
