#![forbid(unsafe_code)]

use serde::{Deserialize, Serialize};

use crate::common::{
    validate_created_at, validate_finite, validate_label, validate_non_negative,
    validate_range_f64,
};
use crate::{ContractViolation, MonotonicTimeNs, SchemaVersion, Validate};

pub const SPECIMEN_CONTRACT_VERSION: SchemaVersion = SchemaVersion(1);

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct SpecimenTestId(pub u64);

/// Opaque reference into the species reference table owned by an
/// external collaborator.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct SpeciesId(pub u64);

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum TestKind {
    Compressive,
    Shear,
    Flexure,
}

impl TestKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TestKind::Compressive => "compressive",
            TestKind::Shear => "shear",
            TestKind::Flexure => "flexure",
        }
    }
}

/// Raw inputs captured from the rig for one specimen test.
///
/// Dimensions are in mm, `area` in mm², `max_force` in kN. The
/// `test_type` label is free-form rig vocabulary; for shear tests a
/// label containing "double" (any case) marks a two-plane
/// configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpecimenTestInput {
    pub schema_version: SchemaVersion,
    pub kind: TestKind,
    pub test_type: String,
    pub specimen_name: String,
    pub base: f64,
    pub height: f64,
    pub length: f64,
    pub area: f64,
    pub moisture_content: Option<f64>,
    pub max_force: f64,
    pub species_id: Option<SpeciesId>,
    pub photo: Option<String>,
    pub created_at: MonotonicTimeNs,
}

impl SpecimenTestInput {
    #[allow(clippy::too_many_arguments)]
    pub fn v1(
        kind: TestKind,
        test_type: String,
        specimen_name: String,
        base: f64,
        height: f64,
        length: f64,
        area: f64,
        moisture_content: Option<f64>,
        max_force: f64,
        species_id: Option<SpeciesId>,
        photo: Option<String>,
        created_at: MonotonicTimeNs,
    ) -> Result<Self, ContractViolation> {
        let input = Self {
            schema_version: SPECIMEN_CONTRACT_VERSION,
            kind,
            test_type,
            specimen_name,
            base,
            height,
            length,
            area,
            moisture_content,
            max_force,
            species_id,
            photo,
            created_at,
        };
        input.validate()?;
        Ok(input)
    }
}

fn validate_specimen_fields(
    test_type: &str,
    specimen_name: &str,
    base: f64,
    height: f64,
    length: f64,
    area: f64,
    moisture_content: Option<f64>,
    max_force: f64,
) -> Result<(), ContractViolation> {
    validate_label("specimen_test.test_type", test_type, 255)?;
    validate_label("specimen_test.specimen_name", specimen_name, 255)?;
    validate_non_negative("specimen_test.base", base)?;
    validate_non_negative("specimen_test.height", height)?;
    validate_non_negative("specimen_test.length", length)?;
    validate_non_negative("specimen_test.area", area)?;
    if let Some(mc) = moisture_content {
        validate_range_f64("specimen_test.moisture_content", mc, 0.0, 100.0)?;
    }
    validate_non_negative("specimen_test.max_force", max_force)
}

impl Validate for SpecimenTestInput {
    fn validate(&self) -> Result<(), ContractViolation> {
        if self.schema_version != SPECIMEN_CONTRACT_VERSION {
            return Err(ContractViolation::InvalidValue {
                field: "specimen_test_input.schema_version",
                reason: "must match SPECIMEN_CONTRACT_VERSION",
            });
        }
        validate_specimen_fields(
            &self.test_type,
            &self.specimen_name,
            self.base,
            self.height,
            self.length,
            self.area,
            self.moisture_content,
            self.max_force,
        )?;
        validate_created_at("specimen_test_input.created_at", self.created_at)
    }
}

/// Partial update; `None` leaves the stored field untouched. The test
/// kind of a record is immutable.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SpecimenTestPatch {
    pub test_type: Option<String>,
    pub specimen_name: Option<String>,
    pub base: Option<f64>,
    pub height: Option<f64>,
    pub length: Option<f64>,
    pub area: Option<f64>,
    pub moisture_content: Option<f64>,
    pub max_force: Option<f64>,
    pub species_id: Option<SpeciesId>,
    pub photo: Option<String>,
}

impl Validate for SpecimenTestPatch {
    fn validate(&self) -> Result<(), ContractViolation> {
        if let Some(t) = &self.test_type {
            validate_label("specimen_test_patch.test_type", t, 255)?;
        }
        if let Some(n) = &self.specimen_name {
            validate_label("specimen_test_patch.specimen_name", n, 255)?;
        }
        if let Some(v) = self.base {
            validate_non_negative("specimen_test_patch.base", v)?;
        }
        if let Some(v) = self.height {
            validate_non_negative("specimen_test_patch.height", v)?;
        }
        if let Some(v) = self.length {
            validate_non_negative("specimen_test_patch.length", v)?;
        }
        if let Some(v) = self.area {
            validate_non_negative("specimen_test_patch.area", v)?;
        }
        if let Some(mc) = self.moisture_content {
            validate_range_f64("specimen_test_patch.moisture_content", mc, 0.0, 100.0)?;
        }
        if let Some(v) = self.max_force {
            validate_non_negative("specimen_test_patch.max_force", v)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpecimenTestRecord {
    pub schema_version: SchemaVersion,
    pub id: SpecimenTestId,
    pub kind: TestKind,
    pub test_type: String,
    pub specimen_name: String,
    pub base: f64,
    pub height: f64,
    pub length: f64,
    pub area: f64,
    pub moisture_content: Option<f64>,
    pub max_force: f64,
    pub species_id: Option<SpeciesId>,
    pub photo: Option<String>,
    /// Stable fingerprint of `photo`, maintained by storage so photo
    /// changes can be diffed without comparing payloads.
    pub photo_hash: Option<String>,
    /// Derived: N/mm² from `max_force` over `area`. `None` = not yet
    /// computed.
    pub pressure: Option<f64>,
    /// Derived: test-kind-specific stress in MPa. `None` = not yet
    /// computed.
    pub stress: Option<f64>,
    pub created_at: MonotonicTimeNs,
}

impl SpecimenTestRecord {
    pub fn from_input_v1(
        id: SpecimenTestId,
        input: SpecimenTestInput,
    ) -> Result<Self, ContractViolation> {
        input.validate()?;
        Ok(Self {
            schema_version: SPECIMEN_CONTRACT_VERSION,
            id,
            kind: input.kind,
            test_type: input.test_type,
            specimen_name: input.specimen_name,
            base: input.base,
            height: input.height,
            length: input.length,
            area: input.area,
            moisture_content: input.moisture_content,
            max_force: input.max_force,
            species_id: input.species_id,
            photo: input.photo,
            photo_hash: None,
            pressure: None,
            stress: None,
            created_at: input.created_at,
        })
    }

    /// True when the rig label marks a two-shear-plane configuration.
    pub fn is_double_shear(&self) -> bool {
        self.test_type.to_ascii_lowercase().contains("double")
    }
}

impl Validate for SpecimenTestRecord {
    fn validate(&self) -> Result<(), ContractViolation> {
        if self.schema_version != SPECIMEN_CONTRACT_VERSION {
            return Err(ContractViolation::InvalidValue {
                field: "specimen_test_record.schema_version",
                reason: "must match SPECIMEN_CONTRACT_VERSION",
            });
        }
        validate_specimen_fields(
            &self.test_type,
            &self.specimen_name,
            self.base,
            self.height,
            self.length,
            self.area,
            self.moisture_content,
            self.max_force,
        )?;
        if let Some(p) = self.pressure {
            validate_finite("specimen_test_record.pressure", p)?;
        }
        if let Some(s) = self.stress {
            validate_finite("specimen_test_record.stress", s)?;
        }
        validate_created_at("specimen_test_record.created_at", self.created_at)
    }
}
