//! Run quality metrics (KPIs).
//!
//! Computes load and coverage indicators from a completed
//! [`CompletionReport`].
//!
//! # Metrics
//!
//! | Metric | Definition |
//! |--------|-----------|
//! | Total sessions | Committed sessions over the horizon |
//! | Total hours | Sum of session lengths |
//! | Hours by instructor | Per-instructor load over the horizon |
//! | Weekly hours | Per-instructor load per ISO week |
//! | Planned rate | Planned working days / all working days |
//! | Students short | Students with hours left at the horizon end |
//!
//! # Reference
//! Pinedo (2016), "Scheduling", Ch. 1.2: Performance Measures

use std::collections::BTreeMap;

use chrono::Datelike;

use crate::models::{InstructorId, StudentId};

use super::CompletionReport;

/// ISO week key: `(iso year, week number)`.
pub type WeekKey = (i32, u32);

/// Run performance indicators.
#[derive(Debug, Clone)]
pub struct PlanningKpi {
    /// Committed sessions.
    pub total_sessions: usize,
    /// Committed hours.
    pub total_hours: u32,
    /// Hours per instructor over the horizon.
    pub hours_by_instructor: BTreeMap<InstructorId, u32>,
    /// Hours per instructor per ISO week.
    pub weekly_hours_by_instructor: BTreeMap<InstructorId, BTreeMap<WeekKey, u32>>,
    /// Hours per student over the horizon.
    pub hours_by_student: BTreeMap<StudentId, u32>,
    /// Working days that received a solve.
    pub planned_days: usize,
    /// Working days left without sessions.
    pub unplanned_days: usize,
    /// `planned / (planned + unplanned)`; 1.0 without working days.
    pub planned_rate: f64,
    /// Students with hours left.
    pub students_short: usize,
}

impl PlanningKpi {
    /// Computes KPIs from a run report.
    pub fn calculate(report: &CompletionReport) -> Self {
        let mut hours_by_instructor: BTreeMap<InstructorId, u32> = BTreeMap::new();
        let mut weekly: BTreeMap<InstructorId, BTreeMap<WeekKey, u32>> = BTreeMap::new();
        let mut hours_by_student: BTreeMap<StudentId, u32> = BTreeMap::new();

        for s in &report.sessions {
            let h = s.hours();
            let week = s.day().iso_week();
            *hours_by_instructor.entry(s.instructor_id).or_insert(0) += h;
            *weekly
                .entry(s.instructor_id)
                .or_default()
                .entry((week.year(), week.week()))
                .or_insert(0) += h;
            *hours_by_student.entry(s.student_id).or_insert(0) += h;
        }

        let planned_days = report.planned_days.len();
        let unplanned_days = report.unplanned_days.len();
        let working = planned_days + unplanned_days;
        let planned_rate = if working == 0 {
            1.0
        } else {
            planned_days as f64 / working as f64
        };

        Self {
            total_sessions: report.sessions.len(),
            total_hours: hours_by_instructor.values().sum(),
            hours_by_instructor,
            weekly_hours_by_instructor: weekly,
            hours_by_student,
            planned_days,
            unplanned_days,
            planned_rate,
            students_short: report.unmet.len(),
        }
    }

    /// Heaviest week of an instructor (0 if never assigned).
    pub fn peak_weekly_hours(&self, instructor: InstructorId) -> u32 {
        self.weekly_hours_by_instructor
            .get(&instructor)
            .and_then(|weeks| weeks.values().max().copied())
            .unwrap_or(0)
    }

    /// Whether the run meets the given quality thresholds.
    pub fn meets_thresholds(&self, max_students_short: usize, min_planned_rate: f64) -> bool {
        self.students_short <= max_students_short && self.planned_rate >= min_planned_rate
    }
}
