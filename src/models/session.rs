//! Session candidates and committed sessions.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use super::{InstructorId, ResolvedInterval, SessionId, StudentId, VehicleId};

/// One feasible, not-yet-committed lesson for a single day.
///
/// Candidates of one day overlap heavily; the day model picks a
/// conflict-free subset.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionCandidate {
    /// Planning day.
    pub day: NaiveDate,
    /// Instructor.
    pub instructor_id: InstructorId,
    /// Student.
    pub student_id: StudentId,
    /// Vehicle.
    pub vehicle_id: VehicleId,
    /// Lesson start.
    pub start: NaiveDateTime,
    /// Lesson end.
    pub end: NaiveDateTime,
    /// Length in whole hours.
    pub duration_hours: u32,
}

impl SessionCandidate {
    /// Time span of the lesson.
    pub fn interval(&self) -> ResolvedInterval {
        ResolvedInterval {
            start: self.start,
            end: self.end,
        }
    }

    /// Whether the lesson is in progress at `t`.
    #[inline]
    pub fn is_active_at(&self, t: NaiveDateTime) -> bool {
        self.start <= t && t < self.end
    }

    /// Whether two candidates share an instructor, student or vehicle.
    pub fn shares_entity_with(&self, other: &Self) -> bool {
        self.instructor_id == other.instructor_id
            || self.student_id == other.student_id
            || self.vehicle_id == other.vehicle_id
    }

    /// Whether two candidates cannot both be selected.
    pub fn conflicts_with(&self, other: &Self) -> bool {
        self.shares_entity_with(other) && self.interval().overlaps(&other.interval())
    }

    /// The persisted form of this candidate.
    pub fn to_new_session(&self) -> NewSession {
        NewSession {
            instructor_id: self.instructor_id,
            student_id: self.student_id,
            vehicle_id: self.vehicle_id,
            start: self.start,
            end: self.end,
        }
    }
}

/// A session about to be written to storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewSession {
    /// Instructor.
    pub instructor_id: InstructorId,
    /// Student.
    pub student_id: StudentId,
    /// Vehicle.
    pub vehicle_id: VehicleId,
    /// Lesson start.
    pub start: NaiveDateTime,
    /// Lesson end.
    pub end: NaiveDateTime,
}

/// A committed lesson. Never mutated once written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduledSession {
    /// Storage identifier.
    pub id: SessionId,
    /// Instructor.
    pub instructor_id: InstructorId,
    /// Student.
    pub student_id: StudentId,
    /// Vehicle.
    pub vehicle_id: VehicleId,
    /// Lesson start.
    pub start: NaiveDateTime,
    /// Lesson end.
    pub end: NaiveDateTime,
}

impl ScheduledSession {
    /// Attaches a storage id to a new session.
    pub fn from_new(id: SessionId, session: NewSession) -> Self {
        Self {
            id,
            instructor_id: session.instructor_id,
            student_id: session.student_id,
            vehicle_id: session.vehicle_id,
            start: session.start,
            end: session.end,
        }
    }

    /// Time span of the lesson.
    pub fn interval(&self) -> ResolvedInterval {
        ResolvedInterval {
            start: self.start,
            end: self.end,
        }
    }

    /// Length in whole hours.
    pub fn hours(&self) -> u32 {
        u32::try_from((self.end - self.start).num_hours()).unwrap_or(0)
    }

    /// Calendar day of the lesson.
    pub fn day(&self) -> NaiveDate {
        self.start.date()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 4, 7)
            .unwrap()
            .and_hms_opt(h, 0, 0)
            .unwrap()
    }

    fn cand(i: u32, s: u32, v: u32, h0: u32, h1: u32) -> SessionCandidate {
        SessionCandidate {
            day: at(0).date(),
            instructor_id: InstructorId::new(i),
            student_id: StudentId::new(s),
            vehicle_id: VehicleId::new(v),
            start: at(h0),
            end: at(h1),
            duration_hours: h1 - h0,
        }
    }

    #[test]
    fn test_conflicts_need_shared_entity_and_overlap() {
        let a = cand(1, 1, 1, 8, 10);
        assert!(a.conflicts_with(&cand(1, 2, 2, 9, 11))); // same instructor
        assert!(a.conflicts_with(&cand(2, 1, 2, 9, 11))); // same student
        assert!(a.conflicts_with(&cand(2, 2, 1, 9, 11))); // same vehicle
        assert!(!a.conflicts_with(&cand(2, 2, 2, 9, 11))); // disjoint entities
        assert!(!a.conflicts_with(&cand(1, 1, 1, 10, 12))); // back to back
    }

    #[test]
    fn test_active_at() {
        let a = cand(1, 1, 1, 8, 10);
        assert!(a.is_active_at(at(8)));
        assert!(a.is_active_at(at(9)));
        assert!(!a.is_active_at(at(10)));
    }

    #[test]
    fn test_scheduled_from_new() {
        let new = cand(1, 2, 3, 14, 17).to_new_session();
        let s = ScheduledSession::from_new(SessionId::new(5), new);
        assert_eq!(s.id, SessionId::new(5));
        assert_eq!(s.hours(), 3);
        assert_eq!(s.student_id, StudentId::new(2));
        assert_eq!(s.day(), at(0).date());
    }
}
