//! Per-day constraint model.
//!
//! Translates one day's candidate pool and the rolling state into a
//! solver-agnostic [`DayModel`]: one binary "selected" variable per
//! candidate, linear hard constraints, and weighted deficit variables
//! forming the objective. A [`DaySolver`](crate::solver::DaySolver)
//! backend turns the model into a concrete MILP.
//!
//! # Hard constraints
//! - **No overlap** per instructor, student and vehicle
//!   (see [`OverlapFormulation`])
//! - **Daily sessions**: Σ x ≤ `sessions_per_day` per student
//! - **Remaining hours**: Σ h·x ≤ remaining per student
//! - **Legal weekly cap**: accumulated + Σ h·x ≤ legal ceiling per instructor
//! - **Personal weekly cap**: accumulated + Σ h·x ≤ `max_weekly_hours`
//!
//! # Objective (minimised)
//! Σ urgency(student) · d_s + coefficient · Σ d_i, where
//! `d_s ≥ remaining − Σ h·x` and `d_i ≥ desired_remaining − Σ h·x`.
//!
//! # Reference
//! - Wolsey (1998), "Integer Programming", Ch. 1 (clique constraints)
//! - Golumbic (2004), "Algorithmic Graph Theory and Perfect Graphs", Ch. 8
//!   (interval graphs: pairwise intersection ⇔ common start point)

use std::collections::{BTreeMap, BTreeSet};

use chrono::{Duration, NaiveDate, NaiveTime};

use crate::config::{OverlapFormulation, PlannerConfig};
use crate::models::{Instructor, InstructorId, SessionCandidate, Student, StudentId, VehicleId};
use crate::solver::{DaySolution, DaySolver};
use crate::state::PlanningState;

const EPS: f64 = 1e-6;

/// An entity that can take part in at most one lesson at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum EntityRef {
    /// An instructor.
    Instructor(InstructorId),
    /// A student.
    Student(StudentId),
    /// A vehicle.
    Vehicle(VehicleId),
}

/// What a hard constraint encodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstraintKind {
    /// Entity busy at most once at a given instant or slot.
    NoOverlap(EntityRef),
    /// Student's sessions per day.
    DailySessions(StudentId),
    /// Student's hours today never exceed the hours left.
    RemainingHours(StudentId),
    /// Statutory weekly ceiling.
    LegalWeekly(InstructorId),
    /// Instructor's own weekly ceiling.
    PersonalWeekly(InstructorId),
}

/// `Σ coef · x[var] ≤ rhs`.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearConstraint {
    /// Meaning of the row.
    pub kind: ConstraintKind,
    /// `(candidate index, coefficient)` pairs.
    pub terms: Vec<(usize, f64)>,
    /// Right-hand side.
    pub rhs: f64,
}

impl LinearConstraint {
    /// Left-hand side under a selection.
    pub fn lhs(&self, selected: &[bool]) -> f64 {
        weighted_sum(&self.terms, selected)
    }

    /// Whether a selection satisfies this row.
    pub fn is_satisfied(&self, selected: &[bool]) -> bool {
        self.lhs(selected) <= self.rhs + EPS
    }
}

/// Owner of a deficit variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeficitOwner {
    /// Unmet required hours of a student.
    Student(StudentId),
    /// Unmet desired hours of an instructor.
    Instructor(InstructorId),
}

/// A bounded deficit `0 ≤ d ≤ upper`, `d ≥ target − Σ coef · x`,
/// contributing `weight · d` to the objective.
#[derive(Debug, Clone, PartialEq)]
pub struct DeficitTerm {
    /// Whose shortfall this is.
    pub owner: DeficitOwner,
    /// Target quantity (hours).
    pub target: f64,
    /// Upper bound of the variable. Zero forces the target to be met.
    pub upper: f64,
    /// Objective weight.
    pub weight: f64,
    /// `(candidate index, hours)` pairs.
    pub terms: Vec<(usize, f64)>,
}

impl DeficitTerm {
    /// Smallest admissible deficit under a selection.
    pub fn min_deficit(&self, selected: &[bool]) -> f64 {
        (self.target - weighted_sum(&self.terms, selected)).max(0.0)
    }

    /// Whether the deficit can stay within its bound.
    pub fn is_satisfiable(&self, selected: &[bool]) -> bool {
        self.min_deficit(selected) <= self.upper + EPS
    }
}

/// One day's optimisation model.
#[derive(Debug, Clone, PartialEq)]
pub struct DayModel {
    /// Planning day.
    pub day: NaiveDate,
    /// Number of binary selection variables.
    pub num_candidates: usize,
    /// Hard constraints.
    pub constraints: Vec<LinearConstraint>,
    /// Soft objective terms.
    pub deficits: Vec<DeficitTerm>,
}

impl DayModel {
    /// Number of hard constraints.
    pub fn constraint_count(&self) -> usize {
        self.constraints.len()
    }

    /// Number of deficit variables.
    pub fn deficit_count(&self) -> usize {
        self.deficits.len()
    }

    /// Hard constraints matching a predicate.
    pub fn constraints_where(
        &self,
        pred: impl Fn(&ConstraintKind) -> bool,
    ) -> Vec<&LinearConstraint> {
        self.constraints.iter().filter(|c| pred(&c.kind)).collect()
    }

    /// Whether a selection satisfies every hard constraint and deficit bound.
    pub fn is_feasible(&self, selected: &[bool]) -> bool {
        selected.len() == self.num_candidates
            && self.constraints.iter().all(|c| c.is_satisfied(selected))
            && self.deficits.iter().all(|d| d.is_satisfiable(selected))
    }

    /// Objective value of a selection with deficits at their minimum.
    pub fn objective(&self, selected: &[bool]) -> f64 {
        self.deficits
            .iter()
            .map(|d| d.weight * d.min_deficit(selected))
            .sum()
    }
}

/// Urgency weight of a student's deficit.
///
/// `max_urgency / (days + 1)`: strictly decreasing in days to the exam,
/// saturating at `max_urgency` when the exam is today or past.
pub fn urgency_weight(days_to_exam: i64, max_urgency: f64) -> f64 {
    if days_to_exam <= 0 {
        max_urgency
    } else {
        max_urgency / (days_to_exam as f64 + 1.0)
    }
}

/// Builds a [`DayModel`] from a day's candidates and the rolling state.
///
/// # Example
/// ```ignore
/// use u_lesson_schedule::cp::DayModelBuilder;
/// use u_lesson_schedule::solver::HighsDaySolver;
///
/// let builder = DayModelBuilder::new(day, &candidates, &instructors, &students, &state);
/// let (selected, solution) = builder.solve(&HighsDaySolver::default());
/// ```
pub struct DayModelBuilder<'a> {
    day: NaiveDate,
    candidates: &'a [SessionCandidate],
    instructors: &'a [Instructor],
    students: &'a [Student],
    state: &'a PlanningState,
    legal_weekly_max: u32,
    instructor_penalty: f64,
    instructor_deficit_bound: u32,
    max_urgency: f64,
    overlap: OverlapFormulation,
    day_start_hour: u32,
    day_end_hour: u32,
}

impl<'a> DayModelBuilder<'a> {
    /// Creates a builder with default weights and caps.
    pub fn new(
        day: NaiveDate,
        candidates: &'a [SessionCandidate],
        instructors: &'a [Instructor],
        students: &'a [Student],
        state: &'a PlanningState,
    ) -> Self {
        Self::new_with(day, candidates, instructors, students, state, &PlannerConfig::default())
    }

    /// Creates a builder taking weights and caps from `config`.
    pub fn new_with(
        day: NaiveDate,
        candidates: &'a [SessionCandidate],
        instructors: &'a [Instructor],
        students: &'a [Student],
        state: &'a PlanningState,
        config: &PlannerConfig,
    ) -> Self {
        Self {
            day,
            candidates,
            instructors,
            students,
            state,
            legal_weekly_max: config.legal_weekly_max_hours,
            instructor_penalty: config.instructor_penalty_coefficient,
            instructor_deficit_bound: config.instructor_deficit_bound,
            max_urgency: config.max_urgency,
            overlap: config.overlap,
            day_start_hour: config.day_start_hour,
            day_end_hour: config.day_end_hour,
        }
    }

    /// Sets the statutory weekly ceiling.
    pub fn with_legal_weekly_max(mut self, hours: u32) -> Self {
        self.legal_weekly_max = hours;
        self
    }

    /// Sets the non-overlap encoding.
    pub fn with_overlap(mut self, overlap: OverlapFormulation) -> Self {
        self.overlap = overlap;
        self
    }

    /// Builds the model.
    ///
    /// Every student with hours left and every instructor gets rows and a
    /// deficit variable, whether or not they appear in today's pool. A
    /// student whose exam is today or past therefore makes the day
    /// infeasible unless the pool can cover all of their remaining hours.
    pub fn build(&self) -> DayModel {
        let mut constraints = Vec::new();

        for (entity, indices) in self.collect_entity_candidates() {
            match self.overlap {
                OverlapFormulation::Pairwise => {
                    self.add_pairwise_no_overlap(entity, &indices, &mut constraints)
                }
                OverlapFormulation::SlotCoverage => {
                    self.add_slot_no_overlap(entity, &indices, &mut constraints)
                }
            }
        }

        let by_student = self.by_student();
        let by_instructor = self.by_instructor();
        let mut deficits = Vec::new();

        for student in self.students {
            let sid = student.id;
            let remaining = self.state.remaining_hours(sid);
            if remaining == 0 {
                continue;
            }
            let indices = by_student.get(&sid).map(Vec::as_slice).unwrap_or_default();
            let hours = self.hour_terms(indices);

            constraints.push(LinearConstraint {
                kind: ConstraintKind::DailySessions(sid),
                terms: unit_terms(indices),
                rhs: f64::from(student.sessions_per_day),
            });
            constraints.push(LinearConstraint {
                kind: ConstraintKind::RemainingHours(sid),
                terms: hours.clone(),
                rhs: f64::from(remaining),
            });

            let days = student.days_until_exam(self.day);
            deficits.push(DeficitTerm {
                owner: DeficitOwner::Student(sid),
                target: f64::from(remaining),
                upper: if days <= 0 { 0.0 } else { f64::from(remaining) },
                weight: urgency_weight(days, self.max_urgency),
                terms: hours,
            });
        }

        for instructor in self.instructors {
            let iid = instructor.id;
            let indices = by_instructor.get(&iid).map(Vec::as_slice).unwrap_or_default();
            let accumulated = i64::from(self.state.weekly_hours(iid));
            let hours = self.hour_terms(indices);

            constraints.push(LinearConstraint {
                kind: ConstraintKind::LegalWeekly(iid),
                terms: hours.clone(),
                rhs: (i64::from(self.legal_weekly_max) - accumulated) as f64,
            });
            constraints.push(LinearConstraint {
                kind: ConstraintKind::PersonalWeekly(iid),
                terms: hours.clone(),
                rhs: (i64::from(instructor.max_weekly_hours) - accumulated) as f64,
            });

            let target = self.state.desired_remaining(iid);
            deficits.push(DeficitTerm {
                owner: DeficitOwner::Instructor(iid),
                target: f64::from(target),
                upper: f64::from(self.instructor_deficit_bound.max(target)),
                weight: self.instructor_penalty,
                terms: hours,
            });
        }

        DayModel {
            day: self.day,
            num_candidates: self.candidates.len(),
            constraints,
            deficits,
        }
    }

    /// Builds, solves and decodes the model.
    pub fn solve<S: DaySolver>(&self, solver: &S) -> (Vec<SessionCandidate>, DaySolution) {
        let model = self.build();
        let solution = solver.solve(&model);
        (self.decode_solution(&solution), solution)
    }

    /// Selected candidates of a solution (empty if none was found).
    pub fn decode_solution(&self, solution: &DaySolution) -> Vec<SessionCandidate> {
        if !solution.status.is_solution_found() {
            return Vec::new();
        }
        solution
            .selected
            .iter()
            .filter_map(|&i| self.candidates.get(i).cloned())
            .collect()
    }

    /// At each distinct start instant, at most one active candidate.
    ///
    /// Two half-open intervals intersect iff one contains the other's
    /// start, so this is exact pairwise disjointness.
    fn add_pairwise_no_overlap(
        &self,
        entity: EntityRef,
        indices: &[usize],
        out: &mut Vec<LinearConstraint>,
    ) {
        let starts: BTreeSet<_> = indices.iter().map(|&i| self.candidates[i].start).collect();
        for t in starts {
            let active: Vec<usize> = indices
                .iter()
                .copied()
                .filter(|&i| self.candidates[i].is_active_at(t))
                .collect();
            if active.len() > 1 {
                out.push(LinearConstraint {
                    kind: ConstraintKind::NoOverlap(entity),
                    terms: unit_terms(&active),
                    rhs: 1.0,
                });
            }
        }
    }

    /// For each hour slot of the working day, at most one candidate that
    /// fully covers it.
    fn add_slot_no_overlap(
        &self,
        entity: EntityRef,
        indices: &[usize],
        out: &mut Vec<LinearConstraint>,
    ) {
        let midnight = self.day.and_time(NaiveTime::MIN);
        for hour in self.day_start_hour..self.day_end_hour {
            let slot_start = midnight + Duration::hours(i64::from(hour));
            let slot_end = slot_start + Duration::hours(1);
            let covering: Vec<usize> = indices
                .iter()
                .copied()
                .filter(|&i| {
                    let c = &self.candidates[i];
                    c.start <= slot_start && c.end >= slot_end
                })
                .collect();
            if covering.len() > 1 {
                out.push(LinearConstraint {
                    kind: ConstraintKind::NoOverlap(entity),
                    terms: unit_terms(&covering),
                    rhs: 1.0,
                });
            }
        }
    }

    /// Candidate indices per instructor, student and vehicle.
    fn collect_entity_candidates(&self) -> BTreeMap<EntityRef, Vec<usize>> {
        let mut map: BTreeMap<EntityRef, Vec<usize>> = BTreeMap::new();
        for (i, c) in self.candidates.iter().enumerate() {
            map.entry(EntityRef::Instructor(c.instructor_id)).or_default().push(i);
            map.entry(EntityRef::Student(c.student_id)).or_default().push(i);
            map.entry(EntityRef::Vehicle(c.vehicle_id)).or_default().push(i);
        }
        map
    }

    fn by_student(&self) -> BTreeMap<StudentId, Vec<usize>> {
        let mut map: BTreeMap<StudentId, Vec<usize>> = BTreeMap::new();
        for (i, c) in self.candidates.iter().enumerate() {
            map.entry(c.student_id).or_default().push(i);
        }
        map
    }

    fn by_instructor(&self) -> BTreeMap<InstructorId, Vec<usize>> {
        let mut map: BTreeMap<InstructorId, Vec<usize>> = BTreeMap::new();
        for (i, c) in self.candidates.iter().enumerate() {
            map.entry(c.instructor_id).or_default().push(i);
        }
        map
    }

    fn hour_terms(&self, indices: &[usize]) -> Vec<(usize, f64)> {
        indices
            .iter()
            .map(|&i| (i, f64::from(self.candidates[i].duration_hours)))
            .collect()
    }
}

fn unit_terms(indices: &[usize]) -> Vec<(usize, f64)> {
    indices.iter().map(|&i| (i, 1.0)).collect()
}

fn weighted_sum(terms: &[(usize, f64)], selected: &[bool]) -> f64 {
    terms
        .iter()
        .filter(|(i, _)| selected.get(*i).copied().unwrap_or(false))
        .map(|(_, coef)| coef)
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PermitType;
    use chrono::NaiveDateTime;

    fn date(m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, m, d).unwrap()
    }

    fn at(h: u32, m: u32) -> NaiveDateTime {
        date(4, 7).and_hms_opt(h, m, 0).unwrap()
    }

    fn cand(i: u32, s: u32, v: u32, start: NaiveDateTime, hours: u32) -> SessionCandidate {
        SessionCandidate {
            day: date(4, 7),
            instructor_id: InstructorId::new(i),
            student_id: StudentId::new(s),
            vehicle_id: VehicleId::new(v),
            start,
            end: start + Duration::hours(i64::from(hours)),
            duration_hours: hours,
        }
    }

    fn instructors() -> Vec<Instructor> {
        vec![
            Instructor::new(InstructorId::new(1), "I1")
                .with_desired_weekly_hours(20)
                .with_max_weekly_hours(30),
            Instructor::new(InstructorId::new(2), "I2")
                .with_desired_weekly_hours(20)
                .with_max_weekly_hours(30),
        ]
    }

    fn students() -> Vec<Student> {
        vec![
            Student::new(StudentId::new(1), "S1", PermitType::Manual, date(4, 1), date(4, 17))
                .with_remaining_hours(10),
            Student::new(StudentId::new(2), "S2", PermitType::Manual, date(4, 1), date(5, 30))
                .with_remaining_hours(10)
                .with_sessions_per_day(2),
        ]
    }

    /// Scenario A pool for one triple.
    fn scenario_a() -> Vec<SessionCandidate> {
        vec![
            cand(1, 1, 1, at(8, 0), 2),
            cand(1, 1, 1, at(9, 0), 2),
            cand(1, 1, 1, at(10, 0), 2),
            cand(1, 1, 1, at(8, 0), 3),
            cand(1, 1, 1, at(9, 0), 3),
        ]
    }

    fn select(n: usize, picks: &[usize]) -> Vec<bool> {
        (0..n).map(|i| picks.contains(&i)).collect()
    }

    #[test]
    fn test_urgency_monotone_and_saturating() {
        assert_eq!(urgency_weight(0, 100.0), 100.0);
        assert_eq!(urgency_weight(-5, 100.0), 100.0);
        let mut prev = urgency_weight(1, 100.0);
        assert!(prev < 100.0);
        for days in 2..200 {
            let w = urgency_weight(days, 100.0);
            assert!(w < prev, "not strictly decreasing at {days}");
            assert!(w > 0.0);
            prev = w;
        }
    }

    #[test]
    fn test_build_scenario_a_counts() {
        let (inst, stud) = (instructors(), students());
        let state = PlanningState::new(&inst, &stud);
        let cands = scenario_a();
        let model = DayModelBuilder::new(date(4, 7), &cands, &inst, &stud, &state).build();

        assert_eq!(model.num_candidates, 5);
        // Both students and both instructors, in the pool or not
        assert_eq!(model.deficit_count(), 4);
        let daily = model.constraints_where(|k| matches!(k, ConstraintKind::DailySessions(_)));
        assert_eq!(daily.len(), 2);
        let legal = model.constraints_where(|k| matches!(k, ConstraintKind::LegalWeekly(_)));
        assert_eq!(legal.len(), 2);
        let personal = model.constraints_where(|k| matches!(k, ConstraintKind::PersonalWeekly(_)));
        assert_eq!(personal.len(), 2);
        // Starts 08, 09, 10 each have >1 active candidate, per entity (I, S, V)
        let overlap = model.constraints_where(|k| matches!(k, ConstraintKind::NoOverlap(_)));
        assert_eq!(overlap.len(), 9);
    }

    #[test]
    fn test_pairwise_rejects_any_overlap() {
        let (inst, stud) = (instructors(), students());
        let state = PlanningState::new(&inst, &stud);
        let cands = scenario_a();
        let model = DayModelBuilder::new(date(4, 7), &cands, &inst, &stud, &state).build();

        assert!(model.is_feasible(&select(5, &[0])));
        // 08–10 and 09–11 overlap
        assert!(!model.is_feasible(&select(5, &[0, 1])));
        // 08–10 and 10–12 are back to back but the daily cap is 1
        assert!(!model.is_feasible(&select(5, &[0, 2])));
        assert!(model.is_feasible(&select(5, &[])));
    }

    #[test]
    fn test_back_to_back_allowed_with_two_sessions_per_day() {
        let (inst, stud) = (instructors(), students());
        let state = PlanningState::new(&inst, &stud);
        let cands = vec![cand(1, 2, 1, at(8, 0), 2), cand(1, 2, 1, at(10, 0), 2)];
        let model = DayModelBuilder::new(date(4, 7), &cands, &inst, &stud, &state).build();
        assert!(model.is_feasible(&select(2, &[0, 1])));
    }

    #[test]
    fn test_slot_coverage_misses_unaligned_overlap() {
        let (inst, stud) = (instructors(), students());
        let state = PlanningState::new(&inst, &stud);
        // Instructor 1 with two different students: 08:30–10:30 and 09:30–11:30
        let cands = vec![cand(1, 1, 1, at(8, 30), 2), cand(1, 2, 2, at(9, 30), 2)];
        let both = select(2, &[0, 1]);

        let slot = DayModelBuilder::new(date(4, 7), &cands, &inst, &stud, &state)
            .with_overlap(OverlapFormulation::SlotCoverage)
            .build();
        assert!(slot.is_feasible(&both), "slot coverage is expected to miss this overlap");

        let pairwise = DayModelBuilder::new(date(4, 7), &cands, &inst, &stud, &state)
            .with_overlap(OverlapFormulation::Pairwise)
            .build();
        assert!(!pairwise.is_feasible(&both));
    }

    #[test]
    fn test_slot_coverage_catches_aligned_overlap() {
        let (inst, stud) = (instructors(), students());
        let state = PlanningState::new(&inst, &stud);
        let cands = vec![cand(1, 1, 1, at(8, 0), 2), cand(1, 2, 2, at(9, 0), 2)];
        let model = DayModelBuilder::new(date(4, 7), &cands, &inst, &stud, &state)
            .with_overlap(OverlapFormulation::SlotCoverage)
            .build();
        assert!(!model.is_feasible(&select(2, &[0, 1])));
    }

    #[test]
    fn test_weekly_caps_use_accumulated_hours() {
        let (inst, stud) = (instructors(), students());
        // Instructor 1 already has 28 of 30 personal hours this week
        let mut state = PlanningState::new(&inst, &stud);
        for h in [3, 3, 3, 3, 3, 3, 3, 3, 2, 2] {
            let filler = cand(1, 9, 9, at(8, 0), h);
            state = state.with_session(&filler);
        }
        assert_eq!(state.weekly_hours(InstructorId::new(1)), 28);

        let cands = vec![cand(1, 2, 1, at(8, 0), 3), cand(1, 2, 1, at(14, 0), 2)];
        let model = DayModelBuilder::new(date(4, 7), &cands, &inst, &stud, &state).build();
        assert!(!model.is_feasible(&select(2, &[0]))); // 31 > 30
        assert!(model.is_feasible(&select(2, &[1]))); // 30

        let legal = DayModelBuilder::new(date(4, 7), &cands, &inst, &stud, &state)
            .with_legal_weekly_max(29)
            .build();
        assert!(!legal.is_feasible(&select(2, &[1]))); // 30 > 29
    }

    #[test]
    fn test_remaining_hours_cap() {
        let inst = instructors();
        let stud = vec![
            Student::new(StudentId::new(2), "S2", PermitType::Manual, date(4, 1), date(5, 30))
                .with_remaining_hours(3)
                .with_sessions_per_day(2),
        ];
        let state = PlanningState::new(&inst, &stud);
        let cands = vec![cand(1, 2, 1, at(8, 0), 2), cand(1, 2, 1, at(10, 0), 2)];
        let model = DayModelBuilder::new(date(4, 7), &cands, &inst, &stud, &state).build();
        assert!(!model.is_feasible(&select(2, &[0, 1])));
        assert!(model.is_feasible(&select(2, &[0])));
    }

    #[test]
    fn test_objective_prefers_urgent_student() {
        let (inst, stud) = (instructors(), students());
        let state = PlanningState::new(&inst, &stud);
        // Same instructor and vehicle, same slot; student 1 has the earlier exam
        let cands = vec![cand(1, 1, 1, at(8, 0), 2), cand(1, 2, 1, at(8, 0), 2)];
        let model = DayModelBuilder::new(date(4, 7), &cands, &inst, &stud, &state).build();
        let urgent = model.objective(&select(2, &[0]));
        let relaxed = model.objective(&select(2, &[1]));
        assert!(urgent < relaxed);
        assert!(model.objective(&select(2, &[])) > urgent);
    }

    #[test]
    fn test_exam_passed_forces_zero_deficit() {
        let inst = instructors();
        let stud = vec![
            Student::new(StudentId::new(1), "Late", PermitType::Manual, date(4, 1), date(4, 7))
                .with_remaining_hours(2),
        ];
        let state = PlanningState::new(&inst, &stud);
        let cands = vec![cand(1, 1, 1, at(8, 0), 2)];
        let model = DayModelBuilder::new(date(4, 7), &cands, &inst, &stud, &state).build();

        let student_deficit = model
            .deficits
            .iter()
            .find(|d| d.owner == DeficitOwner::Student(StudentId::new(1)))
            .unwrap();
        assert_eq!(student_deficit.upper, 0.0);
        assert_eq!(student_deficit.weight, 100.0);
        // Only a full assignment is admissible
        assert!(!model.is_feasible(&select(1, &[])));
        assert!(model.is_feasible(&select(1, &[0])));
    }

    #[test]
    fn test_student_without_candidates_keeps_deficit() {
        let (inst, stud) = (instructors(), students());
        let state = PlanningState::new(&inst, &stud);
        let cands = scenario_a();
        let model = DayModelBuilder::new(date(4, 7), &cands, &inst, &stud, &state).build();

        let absent = model
            .deficits
            .iter()
            .find(|d| d.owner == DeficitOwner::Student(StudentId::new(2)))
            .unwrap();
        assert!(absent.terms.is_empty());
        assert_eq!(absent.target, 10.0);
        assert_eq!(absent.min_deficit(&select(5, &[])), 10.0);
    }

    #[test]
    fn test_exam_day_without_candidates_is_infeasible() {
        // Student 1 sits the exam today with 4 hours owed and no candidates;
        // student 2 could be planned
        let inst = instructors();
        let stud = vec![
            Student::new(StudentId::new(1), "Late", PermitType::Manual, date(4, 1), date(4, 7))
                .with_remaining_hours(4),
            Student::new(StudentId::new(2), "S2", PermitType::Manual, date(4, 1), date(5, 30))
                .with_remaining_hours(10),
        ];
        let state = PlanningState::new(&inst, &stud);
        let cands = vec![cand(1, 2, 1, at(8, 0), 2)];
        let model = DayModelBuilder::new(date(4, 7), &cands, &inst, &stud, &state).build();

        assert!(!model.is_feasible(&select(1, &[])));
        assert!(!model.is_feasible(&select(1, &[0])));
    }

    #[test]
    fn test_finished_students_are_left_out() {
        let inst = instructors();
        let stud = vec![
            Student::new(StudentId::new(1), "Done", PermitType::Manual, date(4, 1), date(4, 7)),
        ];
        let state = PlanningState::new(&inst, &stud);
        let model = DayModelBuilder::new(date(4, 7), &[], &inst, &stud, &state).build();
        let daily = model.constraints_where(|k| matches!(k, ConstraintKind::DailySessions(_)));
        assert!(daily.is_empty());
        assert!(model
            .deficits
            .iter()
            .all(|d| !matches!(d.owner, DeficitOwner::Student(_))));
        assert!(model.is_feasible(&[]));
    }

    #[test]
    fn test_decode_ignores_unsolved() {
        let (inst, stud) = (instructors(), students());
        let state = PlanningState::new(&inst, &stud);
        let cands = scenario_a();
        let builder = DayModelBuilder::new(date(4, 7), &cands, &inst, &stud, &state);

        let unsolved = DaySolution::unsolved(crate::solver::SolveStatus::Infeasible);
        assert!(builder.decode_solution(&unsolved).is_empty());

        let solved = DaySolution {
            status: crate::solver::SolveStatus::Optimal,
            selected: vec![3],
            objective: 0.0,
        };
        let decoded = builder.decode_solution(&solved);
        assert_eq!(decoded, vec![cands[3].clone()]);
    }
}
