//! Planner configuration.
//!
//! Every field has a default matching the reference deployment, so an empty
//! TOML document is a valid configuration.
//!
//! ```
//! use u_lesson_schedule::PlannerConfig;
//!
//! let config = PlannerConfig::from_toml_str(
//!     r#"
//!     planning_start = "2025-04-07"
//!     planning_end = "2025-04-12"
//!     session_durations_hours = [2]
//!     "#,
//! )
//! .unwrap();
//! assert_eq!(config.day_start_hour, 8);
//! assert_eq!(config.session_durations_hours, vec![2]);
//! ```

use std::path::Path;
use std::time::Duration;

use chrono::{NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use crate::error::ScheduleError;

/// How the per-entity non-overlap rule is encoded in the day model.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverlapFormulation {
    /// At every distinct candidate start instant, at most one active
    /// candidate per entity. Exact for half-open intervals.
    #[default]
    Pairwise,
    /// At most one candidate per entity fully covering each hour slot of the
    /// working day. Misses overlaps that never span a whole slot.
    SlotCoverage,
}

/// Configuration of a regeneration run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    /// First calendar day of the horizon (inclusive).
    pub planning_start: NaiveDate,
    /// Last calendar day of the horizon (inclusive).
    pub planning_end: NaiveDate,
    /// Opening hour of a working day.
    pub day_start_hour: u32,
    /// Closing hour of a working day (exclusive upper bound for sessions).
    pub day_end_hour: u32,
    /// Candidate session lengths, in whole hours.
    pub session_durations_hours: Vec<u32>,
    /// Offset between successive candidate starts inside an open window.
    pub slide_step_hours: u32,
    /// Weekdays on which no lessons are planned.
    pub non_working_weekdays: Vec<Weekday>,
    /// Statutory weekly ceiling for any instructor.
    pub legal_weekly_max_hours: u32,
    /// Weight of an instructor's missing desired hours.
    pub instructor_penalty_coefficient: f64,
    /// Upper bound of the instructor deficit variable.
    pub instructor_deficit_bound: u32,
    /// Urgency weight of a student whose exam is today or past.
    pub max_urgency: f64,
    /// Wall-clock budget of one day's solve.
    pub solver_time_limit_secs: f64,
    /// Non-overlap encoding.
    pub overlap: OverlapFormulation,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            planning_start: NaiveDate::from_ymd_opt(2025, 4, 6).unwrap_or_default(),
            planning_end: NaiveDate::from_ymd_opt(2025, 5, 25).unwrap_or_default(),
            day_start_hour: 8,
            day_end_hour: 20,
            session_durations_hours: vec![2, 3],
            slide_step_hours: 1,
            non_working_weekdays: vec![Weekday::Sun],
            legal_weekly_max_hours: 39,
            instructor_penalty_coefficient: 10.0,
            instructor_deficit_bound: 100,
            max_urgency: 100.0,
            solver_time_limit_secs: 30.0,
            overlap: OverlapFormulation::Pairwise,
        }
    }
}

impl PlannerConfig {
    /// Creates the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a TOML document. Missing keys take their defaults.
    pub fn from_toml_str(source: &str) -> Result<Self, ScheduleError> {
        let config: Self = toml::from_str(source)
            .map_err(|e| ScheduleError::config(format!("invalid planner config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Reads and parses a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ScheduleError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|e| {
            ScheduleError::config(format!("cannot read {}: {e}", path.display()))
        })?;
        Self::from_toml_str(&source)
    }

    /// Sets the planning window.
    pub fn with_window(mut self, start: NaiveDate, end: NaiveDate) -> Self {
        self.planning_start = start;
        self.planning_end = end;
        self
    }

    /// Sets the working-day bounds.
    pub fn with_working_hours(mut self, start_hour: u32, end_hour: u32) -> Self {
        self.day_start_hour = start_hour;
        self.day_end_hour = end_hour;
        self
    }

    /// Sets the candidate session lengths.
    pub fn with_durations(mut self, hours: Vec<u32>) -> Self {
        self.session_durations_hours = hours;
        self
    }

    /// Sets the non-working weekdays.
    pub fn with_non_working_weekdays(mut self, weekdays: Vec<Weekday>) -> Self {
        self.non_working_weekdays = weekdays;
        self
    }

    /// Sets the statutory weekly ceiling.
    pub fn with_legal_weekly_max(mut self, hours: u32) -> Self {
        self.legal_weekly_max_hours = hours;
        self
    }

    /// Sets the per-day solver budget.
    pub fn with_time_limit(mut self, secs: f64) -> Self {
        self.solver_time_limit_secs = secs;
        self
    }

    /// Sets the non-overlap encoding.
    pub fn with_overlap(mut self, overlap: OverlapFormulation) -> Self {
        self.overlap = overlap;
        self
    }

    /// Per-day solver budget as a `Duration`.
    pub fn time_limit(&self) -> Duration {
        Duration::from_secs_f64(self.solver_time_limit_secs.max(0.0))
    }

    /// Whether no lessons are planned on this weekday.
    pub fn is_non_working(&self, weekday: Weekday) -> bool {
        self.non_working_weekdays.contains(&weekday)
    }

    /// Checks internal consistency.
    pub fn validate(&self) -> Result<(), ScheduleError> {
        if self.planning_end < self.planning_start {
            return Err(ScheduleError::config(format!(
                "planning window ends ({}) before it starts ({})",
                self.planning_end, self.planning_start
            )));
        }
        if self.day_end_hour > 24 || self.day_start_hour >= self.day_end_hour {
            return Err(ScheduleError::config(format!(
                "invalid working hours {}..{}",
                self.day_start_hour, self.day_end_hour
            )));
        }
        if self.session_durations_hours.is_empty() {
            return Err(ScheduleError::config("no session durations configured"));
        }
        if self.session_durations_hours.contains(&0) {
            return Err(ScheduleError::config("session durations must be positive"));
        }
        if self.slide_step_hours == 0 {
            return Err(ScheduleError::config("slide step must be positive"));
        }
        if !(self.solver_time_limit_secs > 0.0) {
            return Err(ScheduleError::config("solver time limit must be positive"));
        }
        if self.instructor_penalty_coefficient < 0.0 || self.max_urgency < 0.0 {
            return Err(ScheduleError::config("objective weights must be non-negative"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let c = PlannerConfig::default();
        assert_eq!(c.planning_start, NaiveDate::from_ymd_opt(2025, 4, 6).unwrap());
        assert_eq!(c.session_durations_hours, vec![2, 3]);
        assert_eq!(c.legal_weekly_max_hours, 39);
        assert!(c.is_non_working(Weekday::Sun));
        assert!(!c.is_non_working(Weekday::Mon));
        assert_eq!(c.overlap, OverlapFormulation::Pairwise);
        assert!(c.validate().is_ok());
    }

    #[test]
    fn test_empty_toml_is_default() {
        let c = PlannerConfig::from_toml_str("").unwrap();
        assert_eq!(c, PlannerConfig::default());
    }

    #[test]
    fn test_toml_overrides() {
        let c = PlannerConfig::from_toml_str(
            r#"
            day_start_hour = 9
            day_end_hour = 18
            non_working_weekdays = ["Sat", "Sun"]
            overlap = "slot_coverage"
            "#,
        )
        .unwrap();
        assert_eq!(c.day_start_hour, 9);
        assert_eq!(c.day_end_hour, 18);
        assert!(c.is_non_working(Weekday::Sat));
        assert_eq!(c.overlap, OverlapFormulation::SlotCoverage);
    }

    #[test]
    fn test_malformed_toml() {
        let err = PlannerConfig::from_toml_str("day_start_hour = \"eight\"").unwrap_err();
        assert!(err.is_configuration());
    }

    #[test]
    fn test_inverted_hours_rejected() {
        let err =
            PlannerConfig::from_toml_str("day_start_hour = 20\nday_end_hour = 8").unwrap_err();
        assert!(err.is_configuration());
    }

    #[test]
    fn test_inverted_window_rejected() {
        let c = PlannerConfig::new().with_window(
            NaiveDate::from_ymd_opt(2025, 5, 1).unwrap(),
            NaiveDate::from_ymd_opt(2025, 4, 1).unwrap(),
        );
        assert!(c.validate().is_err());
    }

    #[test]
    fn test_empty_durations_rejected() {
        let c = PlannerConfig::new().with_durations(vec![]);
        assert!(c.validate().is_err());
        let c = PlannerConfig::new().with_durations(vec![0, 2]);
        assert!(c.validate().is_err());
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "legal_weekly_max_hours = 35").unwrap();
        let c = PlannerConfig::from_file(file.path()).unwrap();
        assert_eq!(c.legal_weekly_max_hours, 35);
    }

    #[test]
    fn test_missing_file() {
        let err = PlannerConfig::from_file("/nonexistent/planner.toml").unwrap_err();
        assert!(err.is_configuration());
    }
}
