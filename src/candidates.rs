//! Candidate session generation.
//!
//! For one calendar day, cross-references instructor, student and vehicle
//! open intervals and enumerates every lesson that fits.
//!
//! # Algorithm
//! For each (instructor, student, vehicle) triple where
//! - the vehicle's permit type matches the student's,
//! - the day lies in `[driving_start_date, exam_date)`,
//! - the student has hours left and at least one window on the day,
//!
//! intersect instructor ∩ student ∩ working day ∩ vehicle, clip the end to
//! midnight before the exam, and slide each allowed duration across the
//! result in fixed steps, emitting one candidate per start that fits.
//!
//! The pool is deliberately dense and overlapping; no ordering or
//! preference is applied here. The day model picks the subset.
//!
//! # Complexity
//! O(I · S · V · w³ · k) where w = windows per entity per day and
//! k = starts per window.

use std::collections::HashSet;

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};

use crate::availability::ResolvedAvailability;
use crate::config::PlannerConfig;
use crate::models::{Instructor, ResolvedInterval, SessionCandidate, Student, Vehicle};
use crate::state::PlanningState;

/// Enumerates feasible session candidates for a day.
#[derive(Debug, Clone)]
pub struct CandidateSessionGenerator {
    durations_hours: Vec<u32>,
    step_hours: u32,
    day_start_hour: u32,
    day_end_hour: u32,
}

impl CandidateSessionGenerator {
    /// Creates a generator with the given session lengths, 1-hour steps and
    /// an 08:00–20:00 working day.
    pub fn new(durations_hours: Vec<u32>) -> Self {
        Self {
            durations_hours,
            step_hours: 1,
            day_start_hour: 8,
            day_end_hour: 20,
        }
    }

    /// Creates a generator from the planner configuration.
    pub fn from_config(config: &PlannerConfig) -> Self {
        Self::new(config.session_durations_hours.clone())
            .with_step(config.slide_step_hours)
            .with_working_hours(config.day_start_hour, config.day_end_hour)
    }

    /// Sets the sliding step.
    pub fn with_step(mut self, hours: u32) -> Self {
        self.step_hours = hours.max(1);
        self
    }

    /// Sets the working-day bounds.
    pub fn with_working_hours(mut self, start_hour: u32, end_hour: u32) -> Self {
        self.day_start_hour = start_hour;
        self.day_end_hour = end_hour;
        self
    }

    /// The open hours of `day`.
    pub fn day_window(&self, day: NaiveDate) -> Option<ResolvedInterval> {
        let midnight = day.and_time(NaiveTime::MIN);
        ResolvedInterval::new(
            midnight + hours(self.day_start_hour),
            midnight + hours(self.day_end_hour),
        )
    }

    /// Enumerates all candidates for `day`.
    ///
    /// Remaining hours are read from `state`, not from the student records.
    /// Students with no hours left produce no candidates, and no candidate
    /// is longer than the student's remaining hours.
    pub fn generate(
        &self,
        day: NaiveDate,
        instructors: &[Instructor],
        students: &[Student],
        vehicles: &[Vehicle],
        availability: &ResolvedAvailability,
        state: &PlanningState,
    ) -> Vec<SessionCandidate> {
        let mut out = Vec::new();
        let Some(day_window) = self.day_window(day) else {
            return out;
        };
        let mut seen: HashSet<SessionCandidate> = HashSet::new();

        for instructor in instructors {
            let instructor_windows = availability.instructor_windows(instructor.id, day);
            if instructor_windows.is_empty() {
                continue;
            }

            for student in students {
                if !student.is_training_day(day) {
                    continue;
                }
                let remaining = state.remaining_hours(student.id);
                if remaining == 0 {
                    continue;
                }
                let student_windows = availability.student_windows(student.id, day);
                if student_windows.is_empty() {
                    continue;
                }

                let max_len = student.max_consecutive_hours.min(remaining);
                let durations: Vec<u32> = self
                    .durations_hours
                    .iter()
                    .copied()
                    .filter(|&d| d > 0 && d <= max_len)
                    .collect();
                if durations.is_empty() {
                    continue;
                }

                let exam_midnight = student.exam_date.and_time(NaiveTime::MIN);

                for vehicle in vehicles {
                    if vehicle.permit_type != student.permit_type {
                        continue;
                    }
                    let vehicle_windows = availability.vehicle_windows(vehicle.id, day);

                    for m in &instructor_windows {
                        for e in student_windows {
                            let Some(pair) = m
                                .intersect(e)
                                .and_then(|p| p.intersect(&day_window))
                            else {
                                continue;
                            };
                            for v in &vehicle_windows {
                                let Some(triple) = pair.intersect(v) else {
                                    continue;
                                };
                                let end = triple.end.min(exam_midnight);
                                if end <= triple.start {
                                    continue;
                                }
                                for &d in &durations {
                                    for start in self.starts(triple.start, end, d) {
                                        let candidate = SessionCandidate {
                                            day,
                                            instructor_id: instructor.id,
                                            student_id: student.id,
                                            vehicle_id: vehicle.id,
                                            start,
                                            end: start + hours(d),
                                            duration_hours: d,
                                        };
                                        if seen.insert(candidate.clone()) {
                                            out.push(candidate);
                                        }
                                    }
                                }
                            }
                        }
                    }
                }
            }
        }

        out
    }

    /// Start instants of a `duration`-hour window sliding over `[from, to)`.
    fn starts(&self, from: NaiveDateTime, to: NaiveDateTime, duration: u32) -> Vec<NaiveDateTime> {
        let len = hours(duration);
        let step = hours(self.step_hours);
        let mut starts = Vec::new();
        let mut current = from;
        while current + len <= to {
            starts.push(current);
            current += step;
        }
        starts
    }
}

fn hours(h: u32) -> Duration {
    Duration::hours(i64::from(h))
}
