//! Availability resolution.
//!
//! Expands weekly recurring rules over a date range and subtracts
//! exceptional blackouts, producing disjoint open intervals per owner.
//!
//! # Algorithm
//! 1. For every date in `[from, to]` whose weekday is in the rule's set,
//!    emit `date + start_time .. date + end_time`.
//! 2. For every blackout, split each surviving interval into the portions
//!    before and after it; non-overlapping blackouts leave it untouched.
//! 3. Discard zero-length pieces and merge what is left into an
//!    [`OwnerCalendar`].
//!
//! # Complexity
//! O(d · r + n · b) where d = days in range, r = rules, n = intervals,
//! b = blackouts.

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate, NaiveTime, Weekday};

use crate::error::ScheduleError;
use crate::models::{
    ExceptionalUnavailability, InstructorId, Owner, OwnerCalendar, RecurringAvailability,
    ResolvedInterval, StudentAvailability, StudentId, VehicleId,
};

/// A weekly recurrence: a set of weekdays sharing one time-of-day window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecurrenceRule {
    /// Weekdays on which the window opens.
    pub weekdays: Vec<Weekday>,
    /// Opening time of day.
    pub start_time: NaiveTime,
    /// Closing time of day.
    pub end_time: NaiveTime,
}

impl RecurrenceRule {
    /// Creates a rule. Fails if the window is empty or inverted.
    pub fn new(
        weekdays: Vec<Weekday>,
        start_time: NaiveTime,
        end_time: NaiveTime,
    ) -> Result<Self, ScheduleError> {
        if start_time >= end_time {
            return Err(ScheduleError::config(format!(
                "recurring window {start_time}-{end_time} does not end after it starts"
            )));
        }
        Ok(Self {
            weekdays,
            start_time,
            end_time,
        })
    }

    /// Rule for a single stored recurring record.
    pub fn from_record(record: &RecurringAvailability) -> Result<Self, ScheduleError> {
        Self::new(vec![record.weekday], record.start_time, record.end_time)
    }
}

/// Expands a rule over `[from, to]` (both inclusive).
///
/// Returns one interval per matching date, in date order.
pub fn expand_recurring(
    rule: &RecurrenceRule,
    from: NaiveDate,
    to: NaiveDate,
) -> Vec<ResolvedInterval> {
    from.iter_days()
        .take_while(|d| *d <= to)
        .filter(|d| rule.weekdays.contains(&d.weekday()))
        .filter_map(|d| {
            ResolvedInterval::new(d.and_time(rule.start_time), d.and_time(rule.end_time))
        })
        .collect()
}

/// Subtracts blackouts from a list of intervals.
///
/// Applied blackout by blackout, accumulating surviving sub-intervals.
/// Zero-length results are dropped by construction.
pub fn subtract_exceptions(
    intervals: &[ResolvedInterval],
    blackouts: &[ResolvedInterval],
) -> Vec<ResolvedInterval> {
    let mut result = Vec::with_capacity(intervals.len());
    for interval in intervals {
        let mut pieces = vec![*interval];
        for blackout in blackouts {
            pieces = pieces.iter().flat_map(|p| p.subtract(blackout)).collect();
            if pieces.is_empty() {
                break;
            }
        }
        result.extend(pieces);
    }
    result
}

/// Resolves availability over a fixed date range.
#[derive(Debug, Clone, Copy)]
pub struct AvailabilityResolver {
    from: NaiveDate,
    to: NaiveDate,
}

impl AvailabilityResolver {
    /// Creates a resolver for `[from, to]`.
    pub fn new(from: NaiveDate, to: NaiveDate) -> Self {
        Self { from, to }
    }

    /// Resolves one owner's recurring records minus its blackouts.
    ///
    /// Fails fast on an inverted recurring window or blackout.
    pub fn resolve(
        &self,
        recurring: &[RecurringAvailability],
        exceptions: &[ExceptionalUnavailability],
    ) -> Result<OwnerCalendar, ScheduleError> {
        let mut intervals = Vec::new();
        for record in recurring {
            let rule = RecurrenceRule::from_record(record)?;
            intervals.extend(expand_recurring(&rule, self.from, self.to));
        }

        let blackouts = exceptions
            .iter()
            .map(|e| {
                e.interval().ok_or_else(|| {
                    ScheduleError::config(format!(
                        "blackout {}..{} does not end after it starts",
                        e.start, e.end
                    ))
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(OwnerCalendar::from_windows(subtract_exceptions(&intervals, &blackouts)))
    }
}

/// Resolved open intervals for every entity of a run.
#[derive(Debug, Clone, Default)]
pub struct ResolvedAvailability {
    instructors: BTreeMap<InstructorId, OwnerCalendar>,
    vehicles: BTreeMap<VehicleId, OwnerCalendar>,
    students: BTreeMap<StudentId, BTreeMap<NaiveDate, Vec<ResolvedInterval>>>,
}

impl ResolvedAvailability {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a resolved calendar for an owner.
    pub fn insert_owner(&mut self, owner: Owner, calendar: OwnerCalendar) {
        match owner {
            Owner::Instructor(id) => {
                self.instructors.insert(id, calendar);
            }
            Owner::Vehicle(id) => {
                self.vehicles.insert(id, calendar);
            }
        }
    }

    /// Records a student's pointwise windows, grouped by date.
    ///
    /// Fails on an inverted window.
    pub fn insert_student(
        &mut self,
        student: StudentId,
        windows: &[StudentAvailability],
    ) -> Result<(), ScheduleError> {
        let by_date = self.students.entry(student).or_default();
        for w in windows {
            let interval = w.interval().ok_or_else(|| {
                ScheduleError::config(format!(
                    "student {student} window on {} ({}-{}) does not end after it starts",
                    w.date, w.start_time, w.end_time
                ))
            })?;
            by_date.entry(w.date).or_default().push(interval);
        }
        for windows in by_date.values_mut() {
            windows.sort();
        }
        Ok(())
    }

    /// An instructor's windows on `day`.
    pub fn instructor_windows(&self, id: InstructorId, day: NaiveDate) -> Vec<ResolvedInterval> {
        self.instructors
            .get(&id)
            .map(|c| c.on_day(day).copied().collect())
            .unwrap_or_default()
    }

    /// A vehicle's windows on `day`.
    pub fn vehicle_windows(&self, id: VehicleId, day: NaiveDate) -> Vec<ResolvedInterval> {
        self.vehicles
            .get(&id)
            .map(|c| c.on_day(day).copied().collect())
            .unwrap_or_default()
    }

    /// A student's windows on `day` (empty if none declared).
    pub fn student_windows(&self, id: StudentId, day: NaiveDate) -> &[ResolvedInterval] {
        self.students
            .get(&id)
            .and_then(|by_date| by_date.get(&day))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}
