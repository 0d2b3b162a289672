//! Rolling-horizon planning and run reporting.
//!
//! [`regenerate`] is the single trigger: it clears the stored schedule and
//! replans the whole window from the current remaining hours. Runs are
//! all-or-nothing in intent but commit incrementally, one solved day at a
//! time, so a failure mid-run leaves earlier days in place.
//!
//! # KPI
//!
//! [`PlanningKpi`] summarises a [`CompletionReport`]: load per instructor
//! and week, hours per student, planned-day rate.
//!
//! # References
//!
//! - Sethi & Sorger (1991), "A theory of rolling horizon decision making"
//! - Pinedo (2016), "Scheduling: Theory, Algorithms, and Systems", Ch. 1

mod horizon;
mod kpi;
mod report;

pub use horizon::{DayOutcome, DayPlan, PlanningInputs, RollingHorizonController};
pub use kpi::{PlanningKpi, WeekKey};
pub use report::{
    CompletionReport, DesiredHoursOpen, PlannedDay, UnmetHours, UnplannedDay, UnplannedReason,
};

use crate::config::PlannerConfig;
use crate::error::ScheduleError;
use crate::store::ScheduleStore;

/// Clears the stored schedule and replans `[planning_start, planning_end]`.
///
/// Callers must not run two regenerations against the same store at once.
///
/// # Example
/// ```no_run
/// use u_lesson_schedule::store::InMemoryStore;
/// use u_lesson_schedule::{regenerate, PlannerConfig};
///
/// let json = std::fs::read_to_string("school.json").unwrap();
/// let mut store = InMemoryStore::from_json(&json).unwrap();
/// let report = regenerate(&mut store, &PlannerConfig::default()).unwrap();
/// println!("{}", report.summary_message());
/// ```
pub fn regenerate<S: ScheduleStore + ?Sized>(
    store: &mut S,
    config: &PlannerConfig,
) -> Result<CompletionReport, ScheduleError> {
    RollingHorizonController::new(config.clone()).run(store)
}
