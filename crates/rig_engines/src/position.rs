#![forbid(unsafe_code)]

//! Position validation against the active actuator travel calibration.
//!
//! Pure functions over records supplied by the caller; nothing here
//! reads or mutates storage.

use rig_contracts::actuator::{ActuatorCalibrationRecord, PositionReport, TravelDirection};

/// Evaluates a raw actuator position against a calibration.
///
/// With no calibration, or one whose `is_calibrated` flag is false,
/// the report carries `is_valid = false` and `not_calibrated = true`;
/// the two cases are intentionally indistinguishable. Bounds are
/// inclusive on both ends, and the midpoint itself classifies as
/// `Right`.
pub fn evaluate_position(
    calibration: Option<&ActuatorCalibrationRecord>,
    position: f64,
) -> PositionReport {
    let cal = match calibration {
        Some(c) if c.is_calibrated => c,
        _ => return PositionReport::uncalibrated(position),
    };

    let distance_from_midpoint = position - cal.midpoint;
    let direction = if position < cal.midpoint {
        TravelDirection::Left
    } else {
        TravelDirection::Right
    };
    let min_position = cal.min_position();
    let max_position = cal.max_position();
    let max_allowed_distance = match direction {
        TravelDirection::Left => cal.max_distance_left,
        TravelDirection::Right => cal.max_distance_right,
    };

    PositionReport {
        position,
        midpoint: cal.midpoint,
        distance_from_midpoint,
        absolute_distance: distance_from_midpoint.abs(),
        direction,
        max_allowed_distance,
        min_position,
        max_position,
        is_valid: position >= min_position && position <= max_position,
        not_calibrated: false,
    }
}

/// Travel distance recorded when the operator jogs the actuator to a
/// limit: the absolute offset from the calibrated midpoint.
pub fn limit_distance(midpoint: f64, current_position: f64) -> f64 {
    (current_position - midpoint).abs()
}

/// A zero midpoint counts as "never set"; limits may only be recorded
/// against an explicitly set midpoint.
pub fn midpoint_is_set(midpoint: f64) -> bool {
    midpoint != 0.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use rig_contracts::actuator::{ActuatorCalibrationId, ActuatorCalibrationInput};
    use rig_contracts::MonotonicTimeNs;

    fn calibration(midpoint: f64, left: f64, right: f64) -> ActuatorCalibrationRecord {
        let input = ActuatorCalibrationInput::v1(
            midpoint,
            left,
            right,
            None,
            None,
            MonotonicTimeNs(10),
        )
        .unwrap();
        ActuatorCalibrationRecord::from_input_v1(ActuatorCalibrationId(1), input, true).unwrap()
    }

    #[test]
    fn at_pos_01_bounds_are_inclusive_on_both_ends() {
        let cal = calibration(100.0, 30.0, 40.0);
        assert!(evaluate_position(Some(&cal), 70.0).is_valid);
        assert!(evaluate_position(Some(&cal), 140.0).is_valid);
        assert!(!evaluate_position(Some(&cal), 69.9).is_valid);
        assert!(!evaluate_position(Some(&cal), 140.1).is_valid);
    }

    #[test]
    fn at_pos_02_midpoint_classifies_as_right() {
        let cal = calibration(100.0, 30.0, 40.0);
        let report = evaluate_position(Some(&cal), 100.0);
        assert_eq!(report.direction, TravelDirection::Right);
        assert_eq!(report.distance_from_midpoint, 0.0);
        assert_eq!(report.max_allowed_distance, 40.0);
    }

    #[test]
    fn at_pos_03_left_side_uses_left_limit() {
        let cal = calibration(100.0, 30.0, 40.0);
        let report = evaluate_position(Some(&cal), 80.0);
        assert_eq!(report.direction, TravelDirection::Left);
        assert_eq!(report.distance_from_midpoint, -20.0);
        assert_eq!(report.absolute_distance, 20.0);
        assert_eq!(report.max_allowed_distance, 30.0);
        assert!(report.is_valid);
    }

    #[test]
    fn at_pos_04_missing_and_uncalibrated_report_identically() {
        let mut cal = calibration(100.0, 30.0, 40.0);
        cal.is_calibrated = false;

        let absent = evaluate_position(None, 95.0);
        let incomplete = evaluate_position(Some(&cal), 95.0);
        assert_eq!(absent, incomplete);
        assert!(!absent.is_valid);
        assert!(absent.not_calibrated);
    }

    #[test]
    fn at_pos_05_negative_midpoint_geometry() {
        let cal = calibration(-50.0, 10.0, 10.0);
        let report = evaluate_position(Some(&cal), -55.0);
        assert_eq!(report.min_position, -60.0);
        assert_eq!(report.max_position, -40.0);
        assert_eq!(report.direction, TravelDirection::Left);
        assert!(report.is_valid);
    }

    #[test]
    fn at_pos_06_limit_distance_is_absolute_offset() {
        assert_eq!(limit_distance(100.0, 70.0), 30.0);
        assert_eq!(limit_distance(100.0, 145.0), 45.0);
        assert_eq!(limit_distance(-10.0, -25.0), 15.0);
    }

    #[test]
    fn at_pos_07_calibrated_flag_requires_both_sides() {
        let both = calibration(10.0, 5.0, 5.0);
        assert!(both.derived_is_calibrated());
        let one_side = calibration(10.0, 0.0, 5.0);
        assert!(!one_side.derived_is_calibrated());
        let other_side = calibration(10.0, 5.0, 0.0);
        assert!(!other_side.derived_is_calibrated());
    }

    #[test]
    fn at_pos_08_report_serializes_for_collaborator() {
        let cal = calibration(100.0, 30.0, 40.0);
        let report = evaluate_position(Some(&cal), 120.0);
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["direction"], "Right");
        assert_eq!(json["is_valid"], true);
    }
}
