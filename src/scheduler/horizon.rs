//! Rolling-horizon controller.
//!
//! Walks the planning window one calendar day at a time. Each working day
//! is planned by a pure function of the day and the incoming
//! [`PlanningState`]; its accepted sessions are then committed to storage
//! and folded into the state handed to the next day. A solved day is never
//! revisited.
//!
//! # Algorithm
//! ```text
//! validate config → load → validate input → resolve availability → clear
//! for day in [start, end]:
//!     non-working weekday      → skip
//!     new ISO week             → reset weekly accumulators
//!     candidates = generate(day, state)
//!     empty                    → unplanned (NoCandidates)
//!     model = build(day, candidates, state); solve
//!     no solution              → unplanned (Infeasible / Unknown)
//!     per selected session     → insert, update remaining hours, state'
//! report unmet hours
//! ```
//!
//! # Reference
//! Sethi & Sorger (1991), "A theory of rolling horizon decision making"

use chrono::{Datelike, NaiveDate};
use tracing::{debug, info, warn};

use crate::availability::{AvailabilityResolver, ResolvedAvailability};
use crate::candidates::CandidateSessionGenerator;
use crate::config::PlannerConfig;
use crate::cp::DayModelBuilder;
use crate::error::ScheduleError;
use crate::models::{
    ExceptionalUnavailability, Instructor, Owner, RecurringAvailability, ScheduledSession,
    SessionCandidate, Student, StudentAvailability, Vehicle,
};
use crate::solver::{DaySolver, HighsDaySolver};
use crate::state::PlanningState;
use crate::store::{ScheduleStore, StoreError};
use crate::validation::{into_schedule_error, validate_input};

use super::{CompletionReport, PlannedDay, UnplannedDay, UnplannedReason};

/// Everything a run reads from storage.
#[derive(Debug, Clone, Default)]
pub struct PlanningInputs {
    /// Instructors.
    pub instructors: Vec<Instructor>,
    /// Students.
    pub students: Vec<Student>,
    /// Vehicles.
    pub vehicles: Vec<Vehicle>,
    /// Recurring windows of instructors and vehicles.
    pub recurring: Vec<RecurringAvailability>,
    /// Blackouts of instructors and vehicles.
    pub exceptions: Vec<ExceptionalUnavailability>,
    /// Dated student windows.
    pub student_windows: Vec<StudentAvailability>,
}

impl PlanningInputs {
    /// Reads entities and, per entity, its availability records.
    pub fn load<S: ScheduleStore + ?Sized>(store: &S) -> Result<Self, StoreError> {
        let instructors = store.instructors()?;
        let students = store.students()?;
        let vehicles = store.vehicles()?;

        let owners = instructors
            .iter()
            .map(|i| Owner::Instructor(i.id))
            .chain(vehicles.iter().map(|v| Owner::Vehicle(v.id)));

        let mut recurring = Vec::new();
        let mut exceptions = Vec::new();
        for owner in owners {
            recurring.extend(store.recurring_availability(owner)?);
            exceptions.extend(store.exceptional_unavailability(owner)?);
        }

        let mut student_windows = Vec::new();
        for s in &students {
            student_windows.extend(store.student_availability(s.id)?);
        }

        Ok(Self {
            instructors,
            students,
            vehicles,
            recurring,
            exceptions,
            student_windows,
        })
    }

    /// Resolves every owner's open intervals over the planning window.
    pub fn resolve(&self, config: &PlannerConfig) -> Result<ResolvedAvailability, ScheduleError> {
        let resolver = AvailabilityResolver::new(config.planning_start, config.planning_end);
        let mut resolved = ResolvedAvailability::new();

        let owners = self
            .instructors
            .iter()
            .map(|i| Owner::Instructor(i.id))
            .chain(self.vehicles.iter().map(|v| Owner::Vehicle(v.id)));
        for owner in owners {
            let recurring: Vec<_> = self
                .recurring
                .iter()
                .filter(|r| r.owner == owner)
                .cloned()
                .collect();
            let exceptions: Vec<_> = self
                .exceptions
                .iter()
                .filter(|e| e.owner == owner)
                .cloned()
                .collect();
            resolved.insert_owner(owner, resolver.resolve(&recurring, &exceptions)?);
        }

        for s in &self.students {
            let windows: Vec<_> = self
                .student_windows
                .iter()
                .filter(|w| w.student == s.id)
                .cloned()
                .collect();
            resolved.insert_student(s.id, &windows)?;
        }

        Ok(resolved)
    }
}

/// Decision for one working day.
#[derive(Debug, Clone, PartialEq)]
pub enum DayOutcome {
    /// Sessions to commit (possibly none).
    Planned(Vec<SessionCandidate>),
    /// Nothing to commit.
    Unplanned(UnplannedReason),
}

/// Result of planning one day, before anything is written.
#[derive(Debug, Clone, PartialEq)]
pub struct DayPlan {
    /// The day.
    pub day: NaiveDate,
    /// Size of the candidate pool.
    pub candidates: usize,
    /// Decision.
    pub outcome: DayOutcome,
}

/// Day-by-day planner over a storage collaborator.
pub struct RollingHorizonController<S: DaySolver = HighsDaySolver> {
    config: PlannerConfig,
    generator: CandidateSessionGenerator,
    solver: S,
}

impl RollingHorizonController<HighsDaySolver> {
    /// Creates a controller solving with HiGHS under the configured time limit.
    pub fn new(config: PlannerConfig) -> Self {
        let solver = HighsDaySolver::from_config(&config);
        Self::with_solver(config, solver)
    }
}

impl<S: DaySolver> RollingHorizonController<S> {
    /// Creates a controller with a custom day solver.
    pub fn with_solver(config: PlannerConfig, solver: S) -> Self {
        Self {
            generator: CandidateSessionGenerator::from_config(&config),
            config,
            solver,
        }
    }

    /// Active configuration.
    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    /// Plans one working day from a state snapshot.
    ///
    /// Pure: nothing is written and `state` is left untouched. The caller
    /// must already have entered the day (see [`PlanningState::begin_day`]).
    pub fn plan_day(
        &self,
        day: NaiveDate,
        inputs: &PlanningInputs,
        availability: &ResolvedAvailability,
        state: &PlanningState,
    ) -> DayPlan {
        let candidates = self.generator.generate(
            day,
            &inputs.instructors,
            &inputs.students,
            &inputs.vehicles,
            availability,
            state,
        );
        if candidates.is_empty() {
            return DayPlan {
                day,
                candidates: 0,
                outcome: DayOutcome::Unplanned(UnplannedReason::NoCandidates),
            };
        }

        let builder = DayModelBuilder::new_with(
            day,
            &candidates,
            &inputs.instructors,
            &inputs.students,
            state,
            &self.config,
        );
        let (selected, solution) = builder.solve(&self.solver);
        let outcome = if solution.status.is_solution_found() {
            DayOutcome::Planned(selected)
        } else {
            DayOutcome::Unplanned(UnplannedReason::from_status(solution.status))
        };

        DayPlan {
            day,
            candidates: candidates.len(),
            outcome,
        }
    }

    /// Regenerates the whole schedule.
    ///
    /// Configuration and input errors abort before anything is written.
    /// A store failure aborts immediately; days committed before it stay.
    pub fn run<St: ScheduleStore + ?Sized>(
        &self,
        store: &mut St,
    ) -> Result<CompletionReport, ScheduleError> {
        self.config.validate()?;
        let inputs = PlanningInputs::load(&*store)?;
        validate_input(&inputs).map_err(|errors| into_schedule_error(&errors))?;
        let availability = inputs.resolve(&self.config)?;

        let (start, end) = (self.config.planning_start, self.config.planning_end);
        info!(
            %start,
            %end,
            instructors = inputs.instructors.len(),
            students = inputs.students.len(),
            vehicles = inputs.vehicles.len(),
            "regeneration started"
        );

        let removed = store.clear_sessions()?;
        info!(removed, "previous schedule cleared");

        let mut state = PlanningState::new(&inputs.instructors, &inputs.students);
        let mut report = CompletionReport::new(start, end);

        for day in start.iter_days().take_while(|d| *d <= end) {
            if self.config.is_non_working(day.weekday()) {
                report.skipped_days.push(day);
                continue;
            }

            let (entered, reset) = state.begin_day(day);
            state = entered;
            if reset {
                debug!(date = %day, week = day.iso_week().week(), "weekly accumulators reset");
            }

            let plan = self.plan_day(day, &inputs, &availability, &state);
            match plan.outcome {
                DayOutcome::Planned(selected) => {
                    let mut hours = 0;
                    for candidate in &selected {
                        state = state.with_session(candidate);
                        let session = candidate.to_new_session();
                        let id = store.insert_session(session.clone())?;
                        store.update_student_remaining_hours(
                            candidate.student_id,
                            state.remaining_hours(candidate.student_id),
                        )?;
                        report.sessions.push(ScheduledSession::from_new(id, session));
                        hours += candidate.duration_hours;
                    }
                    info!(date = %day, sessions = selected.len(), hours, "day planned");
                    report.planned_days.push(PlannedDay {
                        date: day,
                        candidates: plan.candidates,
                        sessions: selected.len(),
                        hours,
                    });
                }
                DayOutcome::Unplanned(reason) => {
                    warn!(date = %day, ?reason, candidates = plan.candidates, "day left unplanned");
                    report.unplanned_days.push(UnplannedDay { date: day, reason });
                }
            }
        }

        report.finish(&inputs.instructors, &inputs.students, &state);
        info!(
            sessions = report.sessions.len(),
            hours = report.total_hours(),
            unmet = report.unmet.len(),
            "regeneration finished"
        );
        Ok(report)
    }
}
