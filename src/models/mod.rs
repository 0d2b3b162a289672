//! Driving-school domain models.
//!
//! Plain data types shared by every stage of the planner. Read-only
//! inputs (`Instructor`, `Student`, `Vehicle`, availability records) come
//! from the storage collaborator; `ResolvedInterval` and
//! `SessionCandidate` are recomputed on every run; `ScheduledSession` is
//! the persisted output.
//!
//! # Domain Mappings
//!
//! | Planner | Generic scheduling |
//! |---------|--------------------|
//! | Student | Job with a due date |
//! | Instructor | Human resource with weekly capacity |
//! | Vehicle | Primary resource with a category |
//! | Session | Assignment of one job unit to both resources |

mod availability;
mod calendar;
mod ids;
mod instructor;
mod permit;
mod session;
mod student;
mod vehicle;

pub use availability::{
    parse_time_of_day, ExceptionalUnavailability, Owner, RecurringAvailability,
    StudentAvailability,
};
pub use calendar::{OwnerCalendar, ResolvedInterval};
pub use ids::{InstructorId, SessionId, StudentId, VehicleId};
pub use instructor::Instructor;
pub use permit::PermitType;
pub use session::{NewSession, ScheduledSession, SessionCandidate};
pub use student::Student;
pub use vehicle::Vehicle;
