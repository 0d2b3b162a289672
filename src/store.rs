//! Storage collaborator.
//!
//! The planner reads every input through [`ScheduleStore`] and writes back
//! two things only: the scheduled sessions and each student's remaining
//! hours. [`InMemoryStore`] is a complete implementation backed by plain
//! vectors, loadable from a JSON dataset.
//!
//! # Dataset format
//!
//! ```json
//! {
//!   "instructors": [{"id": 1, "name": "Alice", "max_consecutive_hours": 4,
//!                    "desired_weekly_hours": 30, "max_weekly_hours": 35}],
//!   "students": [{"id": 1, "name": "Bob", "remaining_hours": 20,
//!                 "permit_type": "manual", "exam_date": "2025-05-20",
//!                 "driving_start_date": "2025-04-01", "max_consecutive_hours": 3}],
//!   "vehicles": [{"id": 1, "name": "Clio", "permit_type": "manual"}],
//!   "recurring_availability": [{"owner": {"kind": "instructor", "id": 1},
//!                               "weekday": "Mon",
//!                               "start_time": "08:00", "end_time": "12:00"}],
//!   "exceptional_unavailability": [{"owner": {"kind": "vehicle", "id": 1},
//!                                   "start": "2025-04-07T08:00:00",
//!                                   "end": "2025-04-07T10:00:00"}],
//!   "student_availability": [{"student": 1, "date": "2025-04-07",
//!                             "start_time": "08:00", "end_time": "12:00"}]
//! }
//! ```

use chrono::{NaiveDate, Weekday};
use serde::Deserialize;

use crate::error::ScheduleError;
use crate::models::{
    ExceptionalUnavailability, Instructor, NewSession, Owner, RecurringAvailability,
    ScheduledSession, SessionId, Student, StudentAvailability, StudentId, Vehicle,
};

/// Failure reported by a storage backend.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// A query could not be served.
    #[error("read failed: {0}")]
    ReadFailed(String),
    /// A write was refused.
    #[error("write rejected: {0}")]
    WriteRejected(String),
    /// The referenced student does not exist.
    #[error("unknown student {0}")]
    UnknownStudent(StudentId),
}

/// Queries and writes the planner needs from persistent storage.
///
/// Implementations assume a single writer; concurrent regeneration runs
/// must be serialized by the caller.
pub trait ScheduleStore {
    /// All instructors.
    fn instructors(&self) -> Result<Vec<Instructor>, StoreError>;

    /// All students.
    fn students(&self) -> Result<Vec<Student>, StoreError>;

    /// All vehicles.
    fn vehicles(&self) -> Result<Vec<Vehicle>, StoreError>;

    /// Weekly recurring windows of an instructor or vehicle.
    fn recurring_availability(
        &self,
        owner: Owner,
    ) -> Result<Vec<RecurringAvailability>, StoreError>;

    /// Blackouts of an instructor or vehicle.
    fn exceptional_unavailability(
        &self,
        owner: Owner,
    ) -> Result<Vec<ExceptionalUnavailability>, StoreError>;

    /// Dated windows of a student.
    fn student_availability(
        &self,
        student: StudentId,
    ) -> Result<Vec<StudentAvailability>, StoreError>;

    /// Deletes every scheduled session. Returns how many were removed.
    fn clear_sessions(&mut self) -> Result<usize, StoreError>;

    /// Persists one session and returns its identifier.
    fn insert_session(&mut self, session: NewSession) -> Result<SessionId, StoreError>;

    /// Persists a student's remaining hours.
    fn update_student_remaining_hours(
        &mut self,
        student: StudentId,
        hours: u32,
    ) -> Result<(), StoreError>;

    /// All scheduled sessions in insertion order.
    fn sessions(&self) -> Result<Vec<ScheduledSession>, StoreError>;
}

/// Vector-backed [`ScheduleStore`].
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    instructors: Vec<Instructor>,
    students: Vec<Student>,
    vehicles: Vec<Vehicle>,
    recurring: Vec<RecurringAvailability>,
    exceptions: Vec<ExceptionalUnavailability>,
    student_windows: Vec<StudentAvailability>,
    sessions: Vec<ScheduledSession>,
    next_session_id: u32,
    writes: usize,
    fail_after: Option<usize>,
}

impl InMemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads a JSON dataset (see the module docs).
    ///
    /// Malformed JSON, unknown permit strings and malformed times are
    /// configuration errors.
    pub fn from_json(source: &str) -> Result<Self, ScheduleError> {
        let dataset: Dataset = serde_json::from_str(source)
            .map_err(|e| ScheduleError::config(format!("invalid dataset: {e}")))?;

        let recurring = dataset
            .recurring_availability
            .iter()
            .map(|r| RecurringAvailability::parse(r.owner, r.weekday, &r.start_time, &r.end_time))
            .collect::<Result<Vec<_>, _>>()?;
        let student_windows = dataset
            .student_availability
            .iter()
            .map(|w| StudentAvailability::parse(w.student, w.date, &w.start_time, &w.end_time))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            instructors: dataset.instructors,
            students: dataset.students,
            vehicles: dataset.vehicles,
            recurring,
            exceptions: dataset.exceptional_unavailability,
            student_windows,
            ..Self::default()
        })
    }

    /// Adds an instructor.
    pub fn with_instructor(mut self, instructor: Instructor) -> Self {
        self.instructors.push(instructor);
        self
    }

    /// Adds a student.
    pub fn with_student(mut self, student: Student) -> Self {
        self.students.push(student);
        self
    }

    /// Adds a vehicle.
    pub fn with_vehicle(mut self, vehicle: Vehicle) -> Self {
        self.vehicles.push(vehicle);
        self
    }

    /// Adds a recurring window.
    pub fn with_recurring(mut self, record: RecurringAvailability) -> Self {
        self.recurring.push(record);
        self
    }

    /// Adds a blackout.
    pub fn with_exception(mut self, record: ExceptionalUnavailability) -> Self {
        self.exceptions.push(record);
        self
    }

    /// Adds a student window.
    pub fn with_student_window(mut self, record: StudentAvailability) -> Self {
        self.student_windows.push(record);
        self
    }

    /// Rejects every write after the first `n` successful ones.
    ///
    /// Clears, inserts and remaining-hours updates all count as writes.
    pub fn fail_writes_after(mut self, n: usize) -> Self {
        self.fail_after = Some(n);
        self
    }

    /// Looks up a stored student.
    pub fn student(&self, id: StudentId) -> Option<&Student> {
        self.students.iter().find(|s| s.id == id)
    }

    /// Number of accepted writes so far.
    pub fn write_count(&self) -> usize {
        self.writes
    }

    fn admit_write(&mut self, what: &str) -> Result<(), StoreError> {
        if let Some(limit) = self.fail_after {
            if self.writes >= limit {
                return Err(StoreError::WriteRejected(format!(
                    "{what} refused after {limit} writes"
                )));
            }
        }
        self.writes += 1;
        Ok(())
    }
}

impl ScheduleStore for InMemoryStore {
    fn instructors(&self) -> Result<Vec<Instructor>, StoreError> {
        Ok(self.instructors.clone())
    }

    fn students(&self) -> Result<Vec<Student>, StoreError> {
        Ok(self.students.clone())
    }

    fn vehicles(&self) -> Result<Vec<Vehicle>, StoreError> {
        Ok(self.vehicles.clone())
    }

    fn recurring_availability(
        &self,
        owner: Owner,
    ) -> Result<Vec<RecurringAvailability>, StoreError> {
        Ok(self.recurring.iter().filter(|r| r.owner == owner).cloned().collect())
    }

    fn exceptional_unavailability(
        &self,
        owner: Owner,
    ) -> Result<Vec<ExceptionalUnavailability>, StoreError> {
        Ok(self.exceptions.iter().filter(|e| e.owner == owner).cloned().collect())
    }

    fn student_availability(
        &self,
        student: StudentId,
    ) -> Result<Vec<StudentAvailability>, StoreError> {
        Ok(self
            .student_windows
            .iter()
            .filter(|w| w.student == student)
            .cloned()
            .collect())
    }

    fn clear_sessions(&mut self) -> Result<usize, StoreError> {
        self.admit_write("clear")?;
        let removed = self.sessions.len();
        self.sessions.clear();
        Ok(removed)
    }

    fn insert_session(&mut self, session: NewSession) -> Result<SessionId, StoreError> {
        self.admit_write("insert")?;
        self.next_session_id += 1;
        let id = SessionId::new(self.next_session_id);
        self.sessions.push(ScheduledSession::from_new(id, session));
        Ok(id)
    }

    fn update_student_remaining_hours(
        &mut self,
        student: StudentId,
        hours: u32,
    ) -> Result<(), StoreError> {
        if !self.students.iter().any(|s| s.id == student) {
            return Err(StoreError::UnknownStudent(student));
        }
        self.admit_write("update")?;
        if let Some(s) = self.students.iter_mut().find(|s| s.id == student) {
            s.remaining_hours = hours;
        }
        Ok(())
    }

    fn sessions(&self) -> Result<Vec<ScheduledSession>, StoreError> {
        Ok(self.sessions.clone())
    }
}

#[derive(Deserialize)]
struct Dataset {
    #[serde(default)]
    instructors: Vec<Instructor>,
    #[serde(default)]
    students: Vec<Student>,
    #[serde(default)]
    vehicles: Vec<Vehicle>,
    #[serde(default)]
    recurring_availability: Vec<RecurringRecord>,
    #[serde(default)]
    exceptional_unavailability: Vec<ExceptionalUnavailability>,
    #[serde(default)]
    student_availability: Vec<StudentWindowRecord>,
}

#[derive(Deserialize)]
struct RecurringRecord {
    owner: Owner,
    weekday: Weekday,
    start_time: String,
    end_time: String,
}

#[derive(Deserialize)]
struct StudentWindowRecord {
    student: StudentId,
    date: NaiveDate,
    start_time: String,
    end_time: String,
}
