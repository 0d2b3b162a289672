//! Instructor model.

use serde::{Deserialize, Serialize};

use super::InstructorId;

/// A driving instructor.
///
/// Weekly caps apply per ISO week. The planner never assigns more than
/// `min(legal ceiling, max_weekly_hours)` in one week; `desired_weekly_hours`
/// is only a soft target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Instructor {
    /// Surrogate identifier.
    pub id: InstructorId,
    /// Display name.
    pub name: String,
    /// Longest single session this instructor teaches (hours).
    pub max_consecutive_hours: u32,
    /// Preferred weekly load (hours).
    pub desired_weekly_hours: u32,
    /// Personal weekly ceiling (hours).
    pub max_weekly_hours: u32,
}

impl Instructor {
    /// Creates an instructor with permissive defaults.
    pub fn new(id: InstructorId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            max_consecutive_hours: 8,
            desired_weekly_hours: 0,
            max_weekly_hours: 39,
        }
    }

    /// Sets the longest single session.
    pub fn with_max_consecutive_hours(mut self, hours: u32) -> Self {
        self.max_consecutive_hours = hours;
        self
    }

    /// Sets the preferred weekly load.
    pub fn with_desired_weekly_hours(mut self, hours: u32) -> Self {
        self.desired_weekly_hours = hours;
        self
    }

    /// Sets the personal weekly ceiling.
    pub fn with_max_weekly_hours(mut self, hours: u32) -> Self {
        self.max_weekly_hours = hours;
        self
    }

    /// Effective weekly ceiling under a statutory maximum.
    #[inline]
    pub fn weekly_cap(&self, legal_max: u32) -> u32 {
        self.max_weekly_hours.min(legal_max)
    }
}
