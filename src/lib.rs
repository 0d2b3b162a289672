//! Rolling-horizon scheduler for driving lessons.
//!
//! Assigns sessions (instructor × student × vehicle × time slot) over a
//! multi-week horizon. Each calendar day is solved independently as a small
//! MILP; the outcome of day D (remaining student hours, weekly instructor
//! load) feeds the model of day D+1, and day D is never revisited.
//!
//! # Modules
//!
//! - **`models`**: Domain types — `Instructor`, `Student`, `Vehicle`,
//!   availability records, `ResolvedInterval`, `SessionCandidate`,
//!   `ScheduledSession`
//! - **`availability`**: Recurring rules + blackouts → disjoint open intervals
//! - **`candidates`**: Per-day enumeration of feasible session candidates
//! - **`cp`**: Per-day constraint model (hard caps, soft deficits)
//! - **`solver`**: MILP backend (HiGHS via `good_lp`)
//! - **`state`**: Immutable snapshot threaded between days
//! - **`scheduler`**: The day loop, `regenerate` trigger and run reports
//! - **`store`**: Storage collaborator trait + in-memory implementation
//! - **`export`**: Calendar events and the day-by-slot HTML table
//! - **`validation`**: Input integrity checks run before any write
//!
//! # Pipeline
//!
//! ```text
//! store ─► validation ─► availability ─┐
//!                                      ▼
//!   for each working day: candidates ─► cp ─► solver ─► state' ─► store
//! ```
//!
//! # References
//!
//! - Sethi & Sorger (1991), "A theory of rolling horizon decision making"
//! - Pinedo (2016), "Scheduling: Theory, Algorithms, and Systems"

pub mod availability;
pub mod candidates;
pub mod config;
pub mod cp;
pub mod error;
pub mod export;
pub mod models;
pub mod scheduler;
pub mod solver;
pub mod state;
pub mod store;
pub mod validation;

pub use config::{OverlapFormulation, PlannerConfig};
pub use error::ScheduleError;
pub use scheduler::{regenerate, CompletionReport, RollingHorizonController};
