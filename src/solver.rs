//! Day model solvers.
//!
//! [`DaySolver`] is the seam between the formulation in [`crate::cp`] and a
//! concrete optimisation backend. [`HighsDaySolver`] lowers a
//! [`DayModel`] to a MILP with `good_lp` and solves it with HiGHS under a
//! wall-clock limit.
//!
//! A returned selection is always re-checked against the model's hard
//! constraints before it is reported as a solution.

use std::time::{Duration, Instant};

use good_lp::solvers::highs::highs;
use good_lp::*;
use tracing::{debug, warn};

use crate::config::PlannerConfig;
use crate::cp::DayModel;

/// Outcome of one day's solve.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolveStatus {
    /// Proven optimal within the time limit.
    Optimal,
    /// A feasible selection, optimality not proven (time limit reached).
    Feasible,
    /// No selection satisfies the hard constraints.
    Infeasible,
    /// Solver failure or a selection that failed verification.
    Unknown,
}

impl SolveStatus {
    /// Whether a usable selection accompanies this status.
    #[inline]
    pub fn is_solution_found(&self) -> bool {
        matches!(self, Self::Optimal | Self::Feasible)
    }
}

/// A solver's answer for one [`DayModel`].
#[derive(Debug, Clone, PartialEq)]
pub struct DaySolution {
    /// Solve status.
    pub status: SolveStatus,
    /// Indices of selected candidates, ascending.
    pub selected: Vec<usize>,
    /// Objective value of the selection.
    pub objective: f64,
}

impl DaySolution {
    /// A solution without a selection.
    pub fn unsolved(status: SolveStatus) -> Self {
        Self {
            status,
            selected: Vec::new(),
            objective: 0.0,
        }
    }

    /// Selection as a dense mask of length `n`.
    pub fn mask(&self, n: usize) -> Vec<bool> {
        let mut mask = vec![false; n];
        for &i in &self.selected {
            if let Some(slot) = mask.get_mut(i) {
                *slot = true;
            }
        }
        mask
    }
}

/// A backend that selects candidates for one day.
pub trait DaySolver {
    /// Solves a model. Never panics on infeasible or empty models.
    fn solve(&self, model: &DayModel) -> DaySolution;
}

/// MILP solver backed by HiGHS.
#[derive(Debug, Clone)]
pub struct HighsDaySolver {
    time_limit: Duration,
}

impl HighsDaySolver {
    /// Creates a solver with a wall-clock limit per day.
    pub fn new(time_limit: Duration) -> Self {
        Self { time_limit }
    }

    /// Creates a solver with the configured time limit.
    pub fn from_config(config: &PlannerConfig) -> Self {
        Self::new(config.time_limit())
    }

    /// Wall-clock limit per day.
    pub fn time_limit(&self) -> Duration {
        self.time_limit
    }

    /// Maps the backend's termination reason onto [`SolveStatus`].
    fn status_of(status: SolutionStatus) -> SolveStatus {
        match status {
            SolutionStatus::Optimal => SolveStatus::Optimal,
            SolutionStatus::TimeLimit | SolutionStatus::GapLimit => SolveStatus::Feasible,
        }
    }

    fn verified(&self, model: &DayModel, selected: Vec<usize>, status: SolveStatus) -> DaySolution {
        let solution = DaySolution {
            status,
            selected,
            objective: 0.0,
        };
        let mask = solution.mask(model.num_candidates);
        if !model.is_feasible(&mask) {
            warn!(day = %model.day, "solver selection violates hard constraints; discarded");
            return DaySolution::unsolved(SolveStatus::Unknown);
        }
        DaySolution {
            objective: model.objective(&mask),
            ..solution
        }
    }
}

impl Default for HighsDaySolver {
    fn default() -> Self {
        Self::new(Duration::from_secs(30))
    }
}

impl DaySolver for HighsDaySolver {
    fn solve(&self, model: &DayModel) -> DaySolution {
        if model.num_candidates == 0 {
            let empty: Vec<bool> = Vec::new();
            return if model.is_feasible(&empty) {
                self.verified(model, Vec::new(), SolveStatus::Optimal)
            } else {
                DaySolution::unsolved(SolveStatus::Infeasible)
            };
        }

        // Rows without candidates are constants
        if model
            .constraints
            .iter()
            .any(|c| c.terms.is_empty() && !c.is_satisfied(&[]))
        {
            return DaySolution::unsolved(SolveStatus::Infeasible);
        }

        let mut vars = variables!();
        let x: Vec<Variable> = (0..model.num_candidates)
            .map(|i| vars.add(variable().binary().name(format!("x_{i}"))))
            .collect();
        let d: Vec<Variable> = model
            .deficits
            .iter()
            .enumerate()
            .map(|(k, term)| vars.add(variable().min(0.0).max(term.upper).name(format!("d_{k}"))))
            .collect();

        let objective = model
            .deficits
            .iter()
            .zip(&d)
            .fold(Expression::from(0.0), |acc, (term, &dv)| acc + term.weight * dv);

        let mut prob = vars
            .minimise(objective)
            .using(highs)
            .with_time_limit(self.time_limit.as_secs_f64());

        for c in model.constraints.iter().filter(|c| !c.terms.is_empty()) {
            let lhs = c
                .terms
                .iter()
                .fold(Expression::from(0.0), |acc, &(i, coef)| acc + coef * x[i]);
            prob.add_constraint(lhs.leq(c.rhs));
        }

        // d_k + Σ h·x ≥ target
        for (term, &dv) in model.deficits.iter().zip(&d) {
            let covered = term
                .terms
                .iter()
                .fold(Expression::from(dv), |acc, &(i, coef)| acc + coef * x[i]);
            prob.add_constraint(covered.geq(term.target));
        }

        let started = Instant::now();
        let result = prob.solve();
        let elapsed = started.elapsed();
        debug!(
            day = %model.day,
            candidates = model.num_candidates,
            constraints = model.constraint_count(),
            elapsed_ms = elapsed.as_millis() as u64,
            "day model solved"
        );

        match result {
            Ok(sol) => {
                let selected: Vec<usize> = x
                    .iter()
                    .enumerate()
                    .filter(|(_, v)| sol.value(**v) >= 0.5)
                    .map(|(i, _)| i)
                    .collect();
                let status = Self::status_of(sol.status());
                self.verified(model, selected, status)
            }
            Err(ResolutionError::Infeasible) => DaySolution::unsolved(SolveStatus::Infeasible),
            Err(e) => {
                warn!(day = %model.day, error = %e, "solver failed");
                DaySolution::unsolved(SolveStatus::Unknown)
            }
        }
    }
}
