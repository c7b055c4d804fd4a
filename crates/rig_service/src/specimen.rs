#![forbid(unsafe_code)]

//! Specimen test operations: create with derived values computed up
//! front, patch with the dependency-diff recompute policy, and the
//! unconditional backfill recompute.

use rig_contracts::specimen::{
    SpecimenTestId, SpecimenTestInput, SpecimenTestPatch, SpecimenTestRecord, TestKind,
};
use rig_contracts::Validate;
use rig_engines::measurement;
use rig_storage::repo::SpecimenTestRepo;
use rig_storage::store::SPECIMEN_TESTS_TABLE;

use crate::ServiceError;

fn fetch<R: SpecimenTestRepo>(
    repo: &R,
    id: SpecimenTestId,
) -> Result<SpecimenTestRecord, ServiceError> {
    repo.specimen_test(id)
        .cloned()
        .ok_or(ServiceError::NotFound {
            entity: SPECIMEN_TESTS_TABLE,
            key: id.0.to_string(),
        })
}

/// Records a test with pressure and stress computed from the raw
/// inputs before the row is stored; a record never leaves this path
/// with absent derived values.
pub fn create_specimen_test<R: SpecimenTestRepo>(
    repo: &mut R,
    input: SpecimenTestInput,
) -> Result<SpecimenTestRecord, ServiceError> {
    let derived = measurement::derive_for_input(&input);
    let id = repo.insert_specimen_test(input, derived.pressure, derived.stress)?;
    fetch(repo, id)
}

/// Applies a partial update. Each derived value is recomputed only
/// when its dependency set changed or it was never computed; a patch
/// touching only bystander fields carries the stored values through
/// bit-identical.
pub fn update_specimen_test<R: SpecimenTestRepo>(
    repo: &mut R,
    id: SpecimenTestId,
    patch: SpecimenTestPatch,
) -> Result<SpecimenTestRecord, ServiceError> {
    patch.validate()?;
    let mut record = fetch(repo, id)?;
    let diff = measurement::diff_dependencies(&record, &patch);

    if let Some(test_type) = patch.test_type {
        record.test_type = test_type;
    }
    if let Some(name) = patch.specimen_name {
        record.specimen_name = name;
    }
    if let Some(base) = patch.base {
        record.base = base;
    }
    if let Some(height) = patch.height {
        record.height = height;
    }
    if let Some(length) = patch.length {
        record.length = length;
    }
    if let Some(area) = patch.area {
        record.area = area;
    }
    if let Some(mc) = patch.moisture_content {
        record.moisture_content = Some(mc);
    }
    if let Some(force) = patch.max_force {
        record.max_force = force;
    }
    if let Some(species) = patch.species_id {
        record.species_id = Some(species);
    }
    if let Some(photo) = patch.photo {
        record.photo = Some(photo);
    }

    measurement::refresh_derived(&mut record, diff);
    repo.save_specimen_test(record)?;
    fetch(repo, id)
}

/// Recomputes both derived values from the stored raw inputs,
/// regardless of staleness. Idempotent.
pub fn recalculate<R: SpecimenTestRepo>(
    repo: &mut R,
    id: SpecimenTestId,
) -> Result<SpecimenTestRecord, ServiceError> {
    let mut record = fetch(repo, id)?;
    measurement::recompute_all(&mut record);
    repo.save_specimen_test(record.clone())?;
    Ok(record)
}

pub fn get_specimen_test<R: SpecimenTestRepo>(
    repo: &R,
    id: SpecimenTestId,
) -> Result<SpecimenTestRecord, ServiceError> {
    fetch(repo, id)
}

pub fn list_specimen_tests<R: SpecimenTestRepo>(
    repo: &R,
    kind: TestKind,
) -> Vec<SpecimenTestRecord> {
    repo.specimen_tests_by_kind(kind)
        .into_iter()
        .cloned()
        .collect()
}
