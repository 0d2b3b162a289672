//! Run outcome.

use std::fmt::Write as _;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::{Instructor, InstructorId, ScheduledSession, Student, StudentId};
use crate::solver::SolveStatus;
use crate::state::PlanningState;

use super::PlanningKpi;

/// Why a working day received no sessions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnplannedReason {
    /// The generator produced no candidate.
    NoCandidates,
    /// The day model has no feasible selection.
    Infeasible,
    /// Solver failure, timeout without incumbent or rejected selection.
    Unknown,
}

impl UnplannedReason {
    /// Maps an unsuccessful solve status.
    pub fn from_status(status: SolveStatus) -> Self {
        match status {
            SolveStatus::Infeasible => Self::Infeasible,
            _ => Self::Unknown,
        }
    }
}

/// A working day left without sessions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnplannedDay {
    /// The day.
    pub date: NaiveDate,
    /// Why.
    pub reason: UnplannedReason,
}

/// A solved working day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlannedDay {
    /// The day.
    pub date: NaiveDate,
    /// Candidates offered to the solver.
    pub candidates: usize,
    /// Sessions committed.
    pub sessions: usize,
    /// Hours committed.
    pub hours: u32,
}

/// A student still owing hours at the end of the horizon.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnmetHours {
    /// The student.
    pub student: StudentId,
    /// Display name.
    pub name: String,
    /// Hours left.
    pub remaining_hours: u32,
}

/// Desired hours an instructor did not receive in the last planned week.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DesiredHoursOpen {
    /// The instructor.
    pub instructor: InstructorId,
    /// Display name.
    pub name: String,
    /// Desired hours not assigned.
    pub hours: u32,
}

/// Result of a regeneration run.
///
/// Unmet hours are a business outcome, not an error: a run that leaves
/// students short still returns `Ok(report)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletionReport {
    /// First day of the horizon.
    pub planning_start: NaiveDate,
    /// Last day of the horizon (inclusive).
    pub planning_end: NaiveDate,
    /// Session log in commit order.
    pub sessions: Vec<ScheduledSession>,
    /// Days that were solved.
    pub planned_days: Vec<PlannedDay>,
    /// Working days without sessions.
    pub unplanned_days: Vec<UnplannedDay>,
    /// Non-working days passed over.
    pub skipped_days: Vec<NaiveDate>,
    /// Students short of hours, in id order.
    pub unmet: Vec<UnmetHours>,
    /// Every instructor's open desired hours at the end of the run.
    pub desired_hours_open: Vec<DesiredHoursOpen>,
}

impl CompletionReport {
    /// An empty report for a horizon.
    pub fn new(planning_start: NaiveDate, planning_end: NaiveDate) -> Self {
        Self {
            planning_start,
            planning_end,
            sessions: Vec::new(),
            planned_days: Vec::new(),
            unplanned_days: Vec::new(),
            skipped_days: Vec::new(),
            unmet: Vec::new(),
            desired_hours_open: Vec::new(),
        }
    }

    /// Fills the unmet and open-desired lists from the final state.
    pub(crate) fn finish(
        &mut self,
        instructors: &[Instructor],
        students: &[Student],
        state: &PlanningState,
    ) {
        self.unmet = state
            .unmet()
            .into_iter()
            .map(|(id, remaining_hours)| UnmetHours {
                student: id,
                name: students
                    .iter()
                    .find(|s| s.id == id)
                    .map(|s| s.name.clone())
                    .unwrap_or_else(|| id.to_string()),
                remaining_hours,
            })
            .collect();
        self.desired_hours_open = state
            .desired_open()
            .into_iter()
            .map(|(id, hours)| DesiredHoursOpen {
                instructor: id,
                name: instructors
                    .iter()
                    .find(|i| i.id == id)
                    .map(|i| i.name.clone())
                    .unwrap_or_else(|| id.to_string()),
                hours,
            })
            .collect();
    }

    /// Whether every student completed their hours.
    pub fn all_hours_completed(&self) -> bool {
        self.unmet.is_empty()
    }

    /// Total committed hours.
    pub fn total_hours(&self) -> u32 {
        self.sessions.iter().map(ScheduledSession::hours).sum()
    }

    /// Outcome recorded for `date`, if it was a working day.
    pub fn unplanned_reason(&self, date: NaiveDate) -> Option<UnplannedReason> {
        self.unplanned_days
            .iter()
            .find(|d| d.date == date)
            .map(|d| d.reason)
    }

    /// Run metrics.
    pub fn kpi(&self) -> PlanningKpi {
        PlanningKpi::calculate(self)
    }

    /// Human-readable outcome.
    ///
    /// ```text
    /// Students with unmet driving hours:
    ///   Bob: 4 hour(s) remaining
    /// ```
    pub fn summary_message(&self) -> String {
        if self.all_hours_completed() {
            return "All students completed their driving hours before their exam date.".to_string();
        }
        let mut msg = String::from("Students with unmet driving hours:");
        for u in &self.unmet {
            let _ = write!(msg, "\n  {}: {} hour(s) remaining", u.name, u.remaining_hours);
        }
        msg
    }
}
