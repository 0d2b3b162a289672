//! Availability records as stored by the data layer.
//!
//! Instructors and vehicles declare weekly recurring windows plus
//! exceptional blackouts (sick leave, repairs). Students declare
//! pointwise windows on specific dates.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime, Weekday};
use serde::{Deserialize, Serialize};

use super::{InstructorId, ResolvedInterval, StudentId, VehicleId};
use crate::error::ScheduleError;

/// Owner of recurring availability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum Owner {
    /// An instructor.
    Instructor(InstructorId),
    /// A vehicle.
    Vehicle(VehicleId),
}

/// Weekly recurring open window, e.g. "every Monday 08:00–12:00".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecurringAvailability {
    /// Whose availability this is.
    pub owner: Owner,
    /// Day of week.
    pub weekday: Weekday,
    /// Opening time of day.
    pub start_time: NaiveTime,
    /// Closing time of day.
    pub end_time: NaiveTime,
}

impl RecurringAvailability {
    /// Creates a recurring window.
    pub fn new(owner: Owner, weekday: Weekday, start_time: NaiveTime, end_time: NaiveTime) -> Self {
        Self {
            owner,
            weekday,
            start_time,
            end_time,
        }
    }

    /// Creates a recurring window from `HH:MM[:SS]` strings.
    pub fn parse(
        owner: Owner,
        weekday: Weekday,
        start: &str,
        end: &str,
    ) -> Result<Self, ScheduleError> {
        Ok(Self::new(owner, weekday, parse_time_of_day(start)?, parse_time_of_day(end)?))
    }
}

/// Exceptional blackout of an owner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExceptionalUnavailability {
    /// Whose availability is removed.
    pub owner: Owner,
    /// Blackout start.
    pub start: NaiveDateTime,
    /// Blackout end.
    pub end: NaiveDateTime,
    /// Free-text reason.
    #[serde(default)]
    pub reason: Option<String>,
}

impl ExceptionalUnavailability {
    /// Creates a blackout.
    pub fn new(owner: Owner, start: NaiveDateTime, end: NaiveDateTime) -> Self {
        Self {
            owner,
            start,
            end,
            reason: None,
        }
    }

    /// Sets the reason.
    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    /// The blackout as an interval (`None` if empty or inverted).
    pub fn interval(&self) -> Option<ResolvedInterval> {
        ResolvedInterval::new(self.start, self.end)
    }
}

/// A student's open window on one specific date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudentAvailability {
    /// The student.
    pub student: StudentId,
    /// Calendar date.
    pub date: NaiveDate,
    /// Opening time of day.
    pub start_time: NaiveTime,
    /// Closing time of day.
    pub end_time: NaiveTime,
}

impl StudentAvailability {
    /// Creates a pointwise window.
    pub fn new(
        student: StudentId,
        date: NaiveDate,
        start_time: NaiveTime,
        end_time: NaiveTime,
    ) -> Self {
        Self {
            student,
            date,
            start_time,
            end_time,
        }
    }

    /// Creates a pointwise window from `HH:MM[:SS]` strings.
    pub fn parse(
        student: StudentId,
        date: NaiveDate,
        start: &str,
        end: &str,
    ) -> Result<Self, ScheduleError> {
        Ok(Self::new(student, date, parse_time_of_day(start)?, parse_time_of_day(end)?))
    }

    /// The window as an interval on its date.
    pub fn interval(&self) -> Option<ResolvedInterval> {
        ResolvedInterval::new(
            self.date.and_time(self.start_time),
            self.date.and_time(self.end_time),
        )
    }
}

/// Parses a time of day in `HH:MM:SS` or `HH:MM` form.
pub fn parse_time_of_day(s: &str) -> Result<NaiveTime, ScheduleError> {
    let s = s.trim();
    NaiveTime::parse_from_str(s, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(s, "%H:%M"))
        .map_err(|_| ScheduleError::config(format!("malformed time of day '{s}'")))
}
