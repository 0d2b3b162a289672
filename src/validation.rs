//! Input validation for a regeneration run.
//!
//! Checks structural integrity of the loaded entities and availability
//! records before anything is written. Detects:
//! - Duplicate IDs
//! - Availability records referencing unknown owners
//! - Empty or inverted time windows
//! - Students whose driving start lies after their exam
//!
//! Every problem is collected; the run aborts with one
//! [`ScheduleError::Configuration`] listing them all.

use std::collections::HashSet;
use std::fmt;

use crate::error::ScheduleError;
use crate::models::Owner;
use crate::scheduler::PlanningInputs;

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// Two entities of one kind share the same ID.
    DuplicateId,
    /// An availability record points at an entity that doesn't exist.
    UnknownOwner,
    /// A window whose start is not before its end.
    InvertedWindow,
    /// Driving start after exam date.
    InvalidTrainingPeriod,
}

impl ValidationError {
    fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Folds collected errors into one configuration error.
pub fn into_schedule_error(errors: &[ValidationError]) -> ScheduleError {
    let joined = errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ");
    ScheduleError::config(format!("invalid input ({} problems): {joined}", errors.len()))
}

/// Validates the loaded inputs of a run.
///
/// Checks:
/// 1. No duplicate instructor, student or vehicle IDs
/// 2. Recurring windows and blackouts reference known instructors/vehicles
/// 3. Student windows reference known students
/// 4. Every window has `start < end`
/// 5. `driving_start_date <= exam_date` for every student
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with all detected issues.
pub fn validate_input(inputs: &PlanningInputs) -> ValidationResult {
    let mut errors = Vec::new();

    let mut instructor_ids = HashSet::new();
    for i in &inputs.instructors {
        if !instructor_ids.insert(i.id) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate instructor ID: {}", i.id),
            ));
        }
    }

    let mut vehicle_ids = HashSet::new();
    for v in &inputs.vehicles {
        if !vehicle_ids.insert(v.id) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate vehicle ID: {}", v.id),
            ));
        }
    }

    let mut student_ids = HashSet::new();
    for s in &inputs.students {
        if !student_ids.insert(s.id) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate student ID: {}", s.id),
            ));
        }
        if s.driving_start_date > s.exam_date {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvalidTrainingPeriod,
                format!(
                    "Student '{}' starts driving on {} after the exam on {}",
                    s.id, s.driving_start_date, s.exam_date
                ),
            ));
        }
    }

    let known = |owner: &Owner| match owner {
        Owner::Instructor(id) => instructor_ids.contains(id),
        Owner::Vehicle(id) => vehicle_ids.contains(id),
    };

    for r in &inputs.recurring {
        if !known(&r.owner) {
            errors.push(ValidationError::new(
                ValidationErrorKind::UnknownOwner,
                format!("Recurring window references unknown owner {:?}", r.owner),
            ));
        }
        if r.start_time >= r.end_time {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvertedWindow,
                format!(
                    "Recurring window of {:?} on {}: {} is not before {}",
                    r.owner, r.weekday, r.start_time, r.end_time
                ),
            ));
        }
    }

    for e in &inputs.exceptions {
        if !known(&e.owner) {
            errors.push(ValidationError::new(
                ValidationErrorKind::UnknownOwner,
                format!("Blackout references unknown owner {:?}", e.owner),
            ));
        }
        if e.start >= e.end {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvertedWindow,
                format!("Blackout of {:?}: {} is not before {}", e.owner, e.start, e.end),
            ));
        }
    }

    for w in &inputs.student_windows {
        if !student_ids.contains(&w.student) {
            errors.push(ValidationError::new(
                ValidationErrorKind::UnknownOwner,
                format!("Availability references unknown student '{}'", w.student),
            ));
        }
        if w.start_time >= w.end_time {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvertedWindow,
                format!(
                    "Availability of '{}' on {}: {} is not before {}",
                    w.student, w.date, w.start_time, w.end_time
                ),
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        ExceptionalUnavailability, Instructor, InstructorId, PermitType, RecurringAvailability,
        Student, StudentAvailability, StudentId, Vehicle, VehicleId,
    };
    use chrono::{NaiveDate, NaiveTime, Weekday};

    fn date(m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, m, d).unwrap()
    }

    fn t(h: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, 0, 0).unwrap()
    }

    fn valid_inputs() -> PlanningInputs {
        PlanningInputs {
            instructors: vec![Instructor::new(InstructorId::new(1), "I1")],
            students: vec![Student::new(
                StudentId::new(1),
                "S1",
                PermitType::Manual,
                date(4, 1),
                date(5, 1),
            )],
            vehicles: vec![Vehicle::new(VehicleId::new(1), "V1", PermitType::Manual)],
            recurring: vec![RecurringAvailability::new(
                Owner::Instructor(InstructorId::new(1)),
                Weekday::Mon,
                t(8),
                t(12),
            )],
            exceptions: vec![ExceptionalUnavailability::new(
                Owner::Vehicle(VehicleId::new(1)),
                date(4, 7).and_time(t(8)),
                date(4, 7).and_time(t(10)),
            )],
            student_windows: vec![StudentAvailability::new(
                StudentId::new(1),
                date(4, 7),
                t(8),
                t(12),
            )],
        }
    }

    #[test]
    fn test_valid_input() {
        assert!(validate_input(&valid_inputs()).is_ok());
    }

    #[test]
    fn test_duplicate_ids() {
        let mut inputs = valid_inputs();
        inputs.instructors.push(Instructor::new(InstructorId::new(1), "Other"));
        inputs.vehicles.push(Vehicle::new(VehicleId::new(1), "Other", PermitType::Automatic));
        let errs = validate_input(&inputs).unwrap_err();
        assert_eq!(errs.len(), 2);
        assert!(errs.iter().all(|e| e.kind == ValidationErrorKind::DuplicateId));
    }

    #[test]
    fn test_same_raw_id_across_kinds_is_fine() {
        // Instructor 1, student 1 and vehicle 1 are distinct entities
        assert!(validate_input(&valid_inputs()).is_ok());
    }

    #[test]
    fn test_unknown_owner() {
        let mut inputs = valid_inputs();
        inputs.recurring[0].owner = Owner::Instructor(InstructorId::new(99));
        inputs.student_windows[0].student = StudentId::new(42);
        let errs = validate_input(&inputs).unwrap_err();
        assert_eq!(errs.len(), 2);
        assert!(errs.iter().all(|e| e.kind == ValidationErrorKind::UnknownOwner));
    }

    #[test]
    fn test_inverted_windows() {
        let mut inputs = valid_inputs();
        inputs.recurring[0].end_time = t(8);
        inputs.exceptions[0].end = inputs.exceptions[0].start;
        inputs.student_windows[0].start_time = t(13);
        let errs = validate_input(&inputs).unwrap_err();
        assert_eq!(errs.len(), 3);
        assert!(errs.iter().all(|e| e.kind == ValidationErrorKind::InvertedWindow));
    }

    #[test]
    fn test_training_period() {
        let mut inputs = valid_inputs();
        inputs.students[0].driving_start_date = date(6, 1);
        let errs = validate_input(&inputs).unwrap_err();
        assert_eq!(errs[0].kind, ValidationErrorKind::InvalidTrainingPeriod);
    }

    #[test]
    fn test_into_schedule_error_lists_all() {
        let mut inputs = valid_inputs();
        inputs.recurring[0].end_time = t(8);
        inputs.students[0].driving_start_date = date(6, 1);
        let errs = validate_input(&inputs).unwrap_err();
        let err = into_schedule_error(&errs);
        assert!(err.is_configuration());
        let msg = err.to_string();
        assert!(msg.contains("2 problems"));
        assert!(msg.contains("after the exam"));
        assert!(msg.contains("is not before"));
    }
}
