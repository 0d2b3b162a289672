//! Rolling state carried from one planning day to the next.
//!
//! A [`PlanningState`] is an immutable snapshot: each transition returns a
//! new value, so a day's solve can be replayed or tested in isolation
//! from the days around it.
//!
//! # Carried quantities
//! - remaining hours per student (non-increasing, floored at zero)
//! - hours assigned per instructor in the current ISO week
//! - desired hours still open per instructor in the current week

use std::collections::BTreeMap;

use chrono::{Datelike, IsoWeek, NaiveDate};

use crate::models::{Instructor, InstructorId, SessionCandidate, Student, StudentId};

/// Snapshot of the mutable planning quantities.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanningState {
    remaining_hours: BTreeMap<StudentId, u32>,
    weekly_hours: BTreeMap<InstructorId, u32>,
    desired_weekly: BTreeMap<InstructorId, u32>,
    desired_remaining: BTreeMap<InstructorId, u32>,
    week: Option<IsoWeek>,
}

impl PlanningState {
    /// Initial state from the stored entities.
    pub fn new(instructors: &[Instructor], students: &[Student]) -> Self {
        let desired_weekly: BTreeMap<_, _> = instructors
            .iter()
            .map(|i| (i.id, i.desired_weekly_hours))
            .collect();
        Self {
            remaining_hours: students.iter().map(|s| (s.id, s.remaining_hours)).collect(),
            weekly_hours: instructors.iter().map(|i| (i.id, 0)).collect(),
            desired_remaining: desired_weekly.clone(),
            desired_weekly,
            week: None,
        }
    }

    /// Hours a student still has to take.
    pub fn remaining_hours(&self, student: StudentId) -> u32 {
        self.remaining_hours.get(&student).copied().unwrap_or(0)
    }

    /// Hours assigned to an instructor in the current week.
    pub fn weekly_hours(&self, instructor: InstructorId) -> u32 {
        self.weekly_hours.get(&instructor).copied().unwrap_or(0)
    }

    /// Desired hours an instructor has not yet received this week.
    pub fn desired_remaining(&self, instructor: InstructorId) -> u32 {
        self.desired_remaining.get(&instructor).copied().unwrap_or(0)
    }

    /// ISO week of the last processed working day.
    pub fn week(&self) -> Option<IsoWeek> {
        self.week
    }

    /// Enters a working day.
    ///
    /// When `day` belongs to a different ISO week than the previous working
    /// day, weekly accumulators reset to zero and desired hours to their
    /// weekly target. Returns the new state and whether a reset happened.
    pub fn begin_day(&self, day: NaiveDate) -> (Self, bool) {
        let week = day.iso_week();
        if self.week == Some(week) {
            return (self.clone(), false);
        }
        let next = Self {
            remaining_hours: self.remaining_hours.clone(),
            weekly_hours: self.weekly_hours.keys().map(|&id| (id, 0)).collect(),
            desired_weekly: self.desired_weekly.clone(),
            desired_remaining: self.desired_weekly.clone(),
            week: Some(week),
        };
        (next, true)
    }

    /// Commits one session.
    #[must_use]
    pub fn with_session(mut self, session: &SessionCandidate) -> Self {
        let hours = session.duration_hours;
        if let Some(r) = self.remaining_hours.get_mut(&session.student_id) {
            *r = r.saturating_sub(hours);
        }
        *self.weekly_hours.entry(session.instructor_id).or_insert(0) += hours;
        if let Some(d) = self.desired_remaining.get_mut(&session.instructor_id) {
            *d = d.saturating_sub(hours);
        }
        self
    }

    /// Commits a whole day's selection.
    pub fn apply(&self, sessions: &[SessionCandidate]) -> Self {
        sessions
            .iter()
            .fold(self.clone(), |state, s| state.with_session(s))
    }

    /// Students with hours left, in id order.
    pub fn unmet(&self) -> Vec<(StudentId, u32)> {
        self.remaining_hours
            .iter()
            .filter(|(_, &h)| h > 0)
            .map(|(&id, &h)| (id, h))
            .collect()
    }

    /// Desired hours still open per instructor in the current week, in id order.
    pub fn desired_open(&self) -> Vec<(InstructorId, u32)> {
        self.desired_remaining.iter().map(|(&id, &h)| (id, h)).collect()
    }

    /// Sum of all students' remaining hours.
    pub fn total_remaining(&self) -> u32 {
        self.remaining_hours.values().sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{PermitType, VehicleId};

    fn date(m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, m, d).unwrap()
    }

    fn fixture() -> PlanningState {
        let instructors =
            vec![Instructor::new(InstructorId::new(1), "A").with_desired_weekly_hours(10)];
        let students = vec![
            Student::new(StudentId::new(1), "S1", PermitType::Manual, date(4, 1), date(5, 1))
                .with_remaining_hours(5),
            Student::new(StudentId::new(2), "S2", PermitType::Manual, date(4, 1), date(5, 1)),
        ];
        PlanningState::new(&instructors, &students)
    }

    fn session(student: u32, hours: u32) -> SessionCandidate {
        let start = date(4, 7).and_hms_opt(8, 0, 0).unwrap();
        SessionCandidate {
            day: date(4, 7),
            instructor_id: InstructorId::new(1),
            student_id: StudentId::new(student),
            vehicle_id: VehicleId::new(1),
            start,
            end: start + chrono::Duration::hours(i64::from(hours)),
            duration_hours: hours,
        }
    }

    #[test]
    fn test_initial_state() {
        let s = fixture();
        assert_eq!(s.remaining_hours(StudentId::new(1)), 5);
        assert_eq!(s.weekly_hours(InstructorId::new(1)), 0);
        assert_eq!(s.desired_remaining(InstructorId::new(1)), 10);
        assert_eq!(s.unmet(), vec![(StudentId::new(1), 5)]);
        assert!(s.week().is_none());
    }

    #[test]
    fn test_apply_is_pure() {
        let s0 = fixture();
        let s1 = s0.apply(&[session(1, 3)]);
        assert_eq!(s0.remaining_hours(StudentId::new(1)), 5);
        assert_eq!(s1.remaining_hours(StudentId::new(1)), 2);
        assert_eq!(s1.weekly_hours(InstructorId::new(1)), 3);
        assert_eq!(s1.desired_remaining(InstructorId::new(1)), 7);
    }

    #[test]
    fn test_remaining_floored_at_zero() {
        let s = fixture().apply(&[session(1, 3), session(1, 3)]);
        assert_eq!(s.remaining_hours(StudentId::new(1)), 0);
        assert_eq!(s.weekly_hours(InstructorId::new(1)), 6);
        assert_eq!(s.total_remaining(), 0);
        assert!(s.unmet().is_empty());
    }

    #[test]
    fn test_week_reset() {
        // 2025-04-07 is a Monday
        let (s, reset) = fixture().begin_day(date(4, 7));
        assert!(reset);
        let s = s.apply(&[session(1, 2)]);

        let (s, reset) = s.begin_day(date(4, 12)); // Saturday, same week
        assert!(!reset);
        assert_eq!(s.weekly_hours(InstructorId::new(1)), 2);
        assert_eq!(s.desired_remaining(InstructorId::new(1)), 8);

        let (s, reset) = s.begin_day(date(4, 15)); // Tuesday, next week
        assert!(reset);
        assert_eq!(s.weekly_hours(InstructorId::new(1)), 0);
        assert_eq!(s.desired_remaining(InstructorId::new(1)), 10);
        assert_eq!(s.remaining_hours(StudentId::new(1)), 3);
    }
}
