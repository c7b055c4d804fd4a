#![forbid(unsafe_code)]

use rig_contracts::specimen::{SpecimenTestId, SpecimenTestInput, TestKind};
use rig_contracts::{ContractViolation, MonotonicTimeNs};
use rig_storage::{RigStore, StorageError};

fn input(t: u64, kind: TestKind, name: &str, photo: Option<&str>) -> SpecimenTestInput {
    SpecimenTestInput::v1(
        kind,
        "parallel".to_string(),
        name.to_string(),
        10.0,
        20.0,
        300.0,
        100.0,
        Some(12.0),
        5.0,
        None,
        photo.map(ToString::to_string),
        MonotonicTimeNs(t),
    )
    .unwrap()
}

#[test]
fn at_spec_db_01_insert_assigns_ids_and_stores_derived_values() {
    let mut s = RigStore::new_in_memory();
    let a = s.insert_specimen_test(input(10, TestKind::Compressive, "C-01", None), 50.0, 50.0)
        .unwrap();
    let b = s.insert_specimen_test(input(11, TestKind::Shear, "S-01", None), 50.0, 25.0)
        .unwrap();

    assert_eq!(a, SpecimenTestId(1));
    assert_eq!(b, SpecimenTestId(2));
    let row = s.specimen_test(a).unwrap();
    assert_eq!(row.pressure, Some(50.0));
    assert_eq!(row.stress, Some(50.0));
}

#[test]
fn at_spec_db_02_photo_fingerprint_tracks_payload() {
    let mut s = RigStore::new_in_memory();
    let a = s.insert_specimen_test(input(10, TestKind::Flexure, "F-01", Some("img_v1")), 50.0, 562.5)
        .unwrap();
    let first_hash = s.specimen_test(a).unwrap().photo_hash.clone().unwrap();
    assert_eq!(first_hash.len(), 64);

    let mut row = s.specimen_test(a).unwrap().clone();
    row.photo = Some("img_v2".to_string());
    s.save_specimen_test(row).unwrap();
    let second_hash = s.specimen_test(a).unwrap().photo_hash.clone().unwrap();
    assert_ne!(first_hash, second_hash);

    // Unchanged payload keeps an identical fingerprint.
    let row = s.specimen_test(a).unwrap().clone();
    s.save_specimen_test(row).unwrap();
    assert_eq!(
        s.specimen_test(a).unwrap().photo_hash.as_deref(),
        Some(second_hash.as_str())
    );
}

#[test]
fn at_spec_db_03_missing_photo_has_no_fingerprint() {
    let mut s = RigStore::new_in_memory();
    let a = s.insert_specimen_test(input(10, TestKind::Compressive, "C-01", None), 50.0, 50.0)
        .unwrap();
    assert!(s.specimen_test(a).unwrap().photo_hash.is_none());
}

#[test]
fn at_spec_db_04_list_by_kind_filters_rows() {
    let mut s = RigStore::new_in_memory();
    s.insert_specimen_test(input(10, TestKind::Compressive, "C-01", None), 50.0, 50.0)
        .unwrap();
    s.insert_specimen_test(input(11, TestKind::Shear, "S-01", None), 50.0, 25.0)
        .unwrap();
    s.insert_specimen_test(input(12, TestKind::Shear, "S-02", None), 50.0, 25.0)
        .unwrap();

    assert_eq!(s.specimen_tests_by_kind(TestKind::Shear).len(), 2);
    assert_eq!(s.specimen_tests_by_kind(TestKind::Compressive).len(), 1);
    assert!(s.specimen_tests_by_kind(TestKind::Flexure).is_empty());
}

#[test]
fn at_spec_db_05_contract_violations_surface_as_storage_errors() {
    let mut s = RigStore::new_in_memory();
    let mut bad = input(10, TestKind::Compressive, "C-01", None);
    bad.area = -1.0;
    assert!(matches!(
        s.insert_specimen_test(bad, 0.0, 0.0),
        Err(StorageError::ContractViolation(
            ContractViolation::InvalidValue { .. }
        ))
    ));
    assert!(s.specimen_tests().is_empty());
}

#[test]
fn at_spec_db_06_remove_tolerated_between_reads() {
    let mut s = RigStore::new_in_memory();
    let a = s.insert_specimen_test(input(10, TestKind::Compressive, "C-01", None), 50.0, 50.0)
        .unwrap();
    assert!(s.remove_specimen_test(a).is_some());
    assert!(s.specimen_test(a).is_none());
    assert!(s.remove_specimen_test(a).is_none());
}
