//! Student model.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{PermitType, StudentId};

fn default_sessions_per_day() -> u32 {
    1
}

/// A student preparing for a driving exam.
///
/// Lessons are planned on days in `[driving_start_date, exam_date)`; the
/// exam day itself is excluded. `remaining_hours` is the only field the
/// planner writes back to storage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Student {
    /// Surrogate identifier.
    pub id: StudentId,
    /// Display name.
    pub name: String,
    /// Hours still to be taught.
    pub remaining_hours: u32,
    /// Permit category (must match the vehicle).
    pub permit_type: PermitType,
    /// Exam date.
    pub exam_date: NaiveDate,
    /// First day lessons may take place.
    pub driving_start_date: NaiveDate,
    /// Exam centre / sector.
    #[serde(default)]
    pub exam_sector: String,
    /// Longest single session this student accepts (hours).
    pub max_consecutive_hours: u32,
    /// Maximum sessions per day.
    #[serde(default = "default_sessions_per_day")]
    pub sessions_per_day: u32,
}

impl Student {
    /// Creates a student. Training starts on `driving_start_date` and ends
    /// the day before `exam_date`.
    pub fn new(
        id: StudentId,
        name: impl Into<String>,
        permit_type: PermitType,
        driving_start_date: NaiveDate,
        exam_date: NaiveDate,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            remaining_hours: 0,
            permit_type,
            exam_date,
            driving_start_date,
            exam_sector: String::new(),
            max_consecutive_hours: 3,
            sessions_per_day: default_sessions_per_day(),
        }
    }

    /// Sets the hours still to be taught.
    pub fn with_remaining_hours(mut self, hours: u32) -> Self {
        self.remaining_hours = hours;
        self
    }

    /// Sets the longest single session.
    pub fn with_max_consecutive_hours(mut self, hours: u32) -> Self {
        self.max_consecutive_hours = hours;
        self
    }

    /// Sets the daily session cap.
    pub fn with_sessions_per_day(mut self, sessions: u32) -> Self {
        self.sessions_per_day = sessions;
        self
    }

    /// Whether `day` lies in `[driving_start_date, exam_date)`.
    #[inline]
    pub fn is_training_day(&self, day: NaiveDate) -> bool {
        day >= self.driving_start_date && day < self.exam_date
    }

    /// Calendar days from `day` to the exam (negative once it has passed).
    #[inline]
    pub fn days_until_exam(&self, day: NaiveDate) -> i64 {
        (self.exam_date - day).num_days()
    }
}
