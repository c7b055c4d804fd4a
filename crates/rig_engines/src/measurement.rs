#![forbid(unsafe_code)]

//! Derived-measurement computation for specimen tests.
//!
//! Pressure and stress are pure functions of the raw inputs; the
//! dependency diff decides which stored derived values an update is
//! allowed to touch. Any computation whose divisor is <= 0 yields 0
//! instead of an undefined result.

use serde::{Deserialize, Serialize};

use rig_contracts::specimen::{SpecimenTestInput, SpecimenTestPatch, SpecimenTestRecord, TestKind};

/// Input force unit is kN; areas and dimensions are mm-based, so the
/// force converts to N before dividing.
const KN_TO_N: f64 = 1000.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DerivedValues {
    pub pressure: f64,
    pub stress: f64,
}

/// Pressure in N/mm² from applied force over cross-sectional area.
pub fn pressure_n_per_mm2(max_force_kn: f64, area: f64) -> f64 {
    if area <= 0.0 {
        return 0.0;
    }
    (max_force_kn * KN_TO_N) / area
}

/// Compressive stress σc = P/A; identical to the pressure value.
pub fn compressive_stress(max_force_kn: f64, area: f64) -> f64 {
    pressure_n_per_mm2(max_force_kn, area)
}

/// Shear stress τv = V/A. In a double-shear configuration the force
/// is resisted across two planes, so the effective force halves.
pub fn shear_stress(max_force_kn: f64, area: f64, double_shear: bool) -> f64 {
    if area <= 0.0 {
        return 0.0;
    }
    let force_n = max_force_kn * KN_TO_N;
    let shear_force = if double_shear { force_n / 2.0 } else { force_n };
    shear_force / area
}

/// Flexural stress f = M·c/I for center-point (three-point) bending:
/// M = F·L/4, c = h/2, I = b·h³/12.
pub fn flexural_stress(max_force_kn: f64, base: f64, height: f64, length: f64) -> f64 {
    if base <= 0.0 || height <= 0.0 || length <= 0.0 {
        return 0.0;
    }
    let force_n = max_force_kn * KN_TO_N;
    let moment = (force_n * length) / 4.0;
    let c = height / 2.0;
    let inertia = (base * height.powi(3)) / 12.0;
    if inertia <= 0.0 {
        return 0.0;
    }
    (moment * c) / inertia
}

fn is_double_shear_label(test_type: &str) -> bool {
    test_type.to_ascii_lowercase().contains("double")
}

#[allow(clippy::too_many_arguments)]
fn compute(
    kind: TestKind,
    test_type: &str,
    base: f64,
    height: f64,
    length: f64,
    area: f64,
    max_force_kn: f64,
) -> DerivedValues {
    let pressure = pressure_n_per_mm2(max_force_kn, area);
    let stress = match kind {
        TestKind::Compressive => compressive_stress(max_force_kn, area),
        TestKind::Shear => shear_stress(max_force_kn, area, is_double_shear_label(test_type)),
        TestKind::Flexure => flexural_stress(max_force_kn, base, height, length),
    };
    DerivedValues { pressure, stress }
}

pub fn derive_for_input(input: &SpecimenTestInput) -> DerivedValues {
    compute(
        input.kind,
        &input.test_type,
        input.base,
        input.height,
        input.length,
        input.area,
        input.max_force,
    )
}

pub fn derive_for_record(record: &SpecimenTestRecord) -> DerivedValues {
    compute(
        record.kind,
        &record.test_type,
        record.base,
        record.height,
        record.length,
        record.area,
        record.max_force,
    )
}

/// Which derived values an incoming patch is allowed to recompute,
/// from an explicit old-vs-new field diff.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencyDiff {
    pub pressure_inputs_changed: bool,
    pub stress_inputs_changed: bool,
}

fn changed(patched: Option<f64>, stored: f64) -> bool {
    matches!(patched, Some(v) if v != stored)
}

/// Diffs the stored record against a patch over each derived value's
/// dependency set. Pressure depends on {max_force, area} for every
/// kind; the stress set varies per kind (shear also watches the
/// test-type label, flexure watches the bending geometry instead of
/// area).
pub fn diff_dependencies(stored: &SpecimenTestRecord, patch: &SpecimenTestPatch) -> DependencyDiff {
    let force = changed(patch.max_force, stored.max_force);
    let area = changed(patch.area, stored.area);
    let label = matches!(&patch.test_type, Some(t) if *t != stored.test_type);

    let stress_inputs_changed = match stored.kind {
        TestKind::Compressive => force || area,
        TestKind::Shear => force || area || label,
        TestKind::Flexure => {
            force
                || changed(patch.base, stored.base)
                || changed(patch.height, stored.height)
                || changed(patch.length, stored.length)
        }
    };

    DependencyDiff {
        pressure_inputs_changed: force || area,
        stress_inputs_changed,
    }
}

/// Applies the update-time recompute policy: a derived value is
/// recomputed iff its dependency set changed or it is currently
/// absent; otherwise the stored value is carried through untouched.
pub fn refresh_derived(record: &mut SpecimenTestRecord, diff: DependencyDiff) {
    if diff.pressure_inputs_changed || record.pressure.is_none() {
        record.pressure = Some(pressure_n_per_mm2(record.max_force, record.area));
    }
    if diff.stress_inputs_changed || record.stress.is_none() {
        record.stress = Some(derive_for_record(record).stress);
    }
}

/// Unconditional recompute of both derived values from the stored raw
/// inputs (backfill trigger); idempotent for unchanged inputs.
pub fn recompute_all(record: &mut SpecimenTestRecord) {
    let derived = derive_for_record(record);
    record.pressure = Some(derived.pressure);
    record.stress = Some(derived.stress);
}

#[cfg(test)]
mod tests {
    use super::*;
    use rig_contracts::MonotonicTimeNs;

    const EPS: f64 = 1e-9;

    fn record(kind: TestKind, test_type: &str) -> SpecimenTestRecord {
        let input = SpecimenTestInput::v1(
            kind,
            test_type.to_string(),
            "S-01".to_string(),
            10.0,
            20.0,
            300.0,
            100.0,
            Some(12.0),
            5.0,
            None,
            None,
            MonotonicTimeNs(10),
        )
        .unwrap();
        SpecimenTestRecord::from_input_v1(rig_contracts::specimen::SpecimenTestId(1), input)
            .unwrap()
    }

    #[test]
    fn at_meas_01_compressive_stress_equals_pressure() {
        let stress = compressive_stress(5.0, 100.0);
        let pressure = pressure_n_per_mm2(5.0, 100.0);
        assert_eq!(stress, pressure);
        assert_eq!(stress, 50.0);
    }

    #[test]
    fn at_meas_02_double_shear_halves_single_shear() {
        let single = shear_stress(5.0, 100.0, false);
        let double = shear_stress(5.0, 100.0, true);
        assert_eq!(single, 50.0);
        assert_eq!(double, single / 2.0);
    }

    #[test]
    fn at_meas_03_double_label_match_is_case_insensitive() {
        let mut rec = record(TestKind::Shear, "Double Shear Parallel");
        let derived = derive_for_record(&rec);
        assert!((derived.stress - 25.0).abs() < EPS);

        rec.test_type = "single shear".to_string();
        let derived = derive_for_record(&rec);
        assert!((derived.stress - 50.0).abs() < EPS);
    }

    #[test]
    fn at_meas_04_flexure_follows_moment_over_inertia() {
        // b=10, h=20, L=300, F=5 kN: M = 375_000 N·mm, c = 10 mm,
        // I = 10·20³/12 mm⁴.
        let moment = (5.0 * 1000.0 * 300.0) / 4.0;
        let c = 20.0 / 2.0;
        let inertia = (10.0 * 20.0_f64.powi(3)) / 12.0;
        let expected = (moment * c) / inertia;

        let stress = flexural_stress(5.0, 10.0, 20.0, 300.0);
        assert!((stress - expected).abs() < EPS);
        assert!((stress - 562.5).abs() < EPS);
    }

    #[test]
    fn at_meas_05_zero_divisors_yield_zero() {
        assert_eq!(pressure_n_per_mm2(5.0, 0.0), 0.0);
        assert_eq!(shear_stress(5.0, 0.0, true), 0.0);
        assert_eq!(flexural_stress(5.0, 0.0, 20.0, 300.0), 0.0);
        assert_eq!(flexural_stress(5.0, 10.0, 0.0, 300.0), 0.0);
        assert_eq!(flexural_stress(5.0, 10.0, 20.0, 0.0), 0.0);
    }

    #[test]
    fn at_meas_06_moisture_only_patch_is_clean() {
        let rec = record(TestKind::Compressive, "parallel");
        let patch = SpecimenTestPatch {
            moisture_content: Some(15.0),
            ..SpecimenTestPatch::default()
        };
        let diff = diff_dependencies(&rec, &patch);
        assert!(!diff.pressure_inputs_changed);
        assert!(!diff.stress_inputs_changed);
    }

    #[test]
    fn at_meas_07_area_patch_dirties_pressure_and_compressive_stress() {
        let rec = record(TestKind::Compressive, "parallel");
        let patch = SpecimenTestPatch {
            area: Some(200.0),
            ..SpecimenTestPatch::default()
        };
        let diff = diff_dependencies(&rec, &patch);
        assert!(diff.pressure_inputs_changed);
        assert!(diff.stress_inputs_changed);
    }

    #[test]
    fn at_meas_08_flexure_ignores_area_for_stress() {
        let rec = record(TestKind::Flexure, "three_point");
        let patch = SpecimenTestPatch {
            area: Some(200.0),
            ..SpecimenTestPatch::default()
        };
        let diff = diff_dependencies(&rec, &patch);
        assert!(diff.pressure_inputs_changed);
        assert!(!diff.stress_inputs_changed);

        let patch = SpecimenTestPatch {
            height: Some(25.0),
            ..SpecimenTestPatch::default()
        };
        let diff = diff_dependencies(&rec, &patch);
        assert!(!diff.pressure_inputs_changed);
        assert!(diff.stress_inputs_changed);
    }

    #[test]
    fn at_meas_09_label_patch_dirties_shear_stress_only() {
        let rec = record(TestKind::Shear, "single shear");
        let patch = SpecimenTestPatch {
            test_type: Some("double shear".to_string()),
            ..SpecimenTestPatch::default()
        };
        let diff = diff_dependencies(&rec, &patch);
        assert!(!diff.pressure_inputs_changed);
        assert!(diff.stress_inputs_changed);

        // Writing back the identical label is not a change.
        let patch = SpecimenTestPatch {
            test_type: Some("single shear".to_string()),
            ..SpecimenTestPatch::default()
        };
        let diff = diff_dependencies(&rec, &patch);
        assert!(!diff.stress_inputs_changed);
    }

    #[test]
    fn at_meas_10_refresh_skips_clean_values_but_fills_absent_ones() {
        let mut rec = record(TestKind::Compressive, "parallel");
        rec.pressure = Some(999.0); // deliberately stale marker
        rec.stress = None;

        let clean = DependencyDiff {
            pressure_inputs_changed: false,
            stress_inputs_changed: false,
        };
        refresh_derived(&mut rec, clean);
        assert_eq!(rec.pressure, Some(999.0));
        assert_eq!(rec.stress, Some(50.0));
    }

    #[test]
    fn at_meas_11_recompute_all_is_idempotent() {
        let mut rec = record(TestKind::Shear, "double shear");
        recompute_all(&mut rec);
        let first = (rec.pressure, rec.stress);
        recompute_all(&mut rec);
        assert_eq!((rec.pressure, rec.stress), first);
        assert_eq!(rec.pressure, Some(50.0));
        assert_eq!(rec.stress, Some(25.0));
    }
}
