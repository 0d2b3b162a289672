//! Resolved availability intervals and per-owner calendars.
//!
//! # Time Model
//! All instants are local wall-clock `NaiveDateTime`s. Intervals are
//! half-open `[start, end)`, so back-to-back sessions do not overlap.
//!
//! # Invariants
//! - Every `ResolvedInterval` has `start < end` (enforced by `new`).
//! - The windows of one `OwnerCalendar` are sorted and pairwise disjoint.

use chrono::{Duration, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// A concrete open window `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ResolvedInterval {
    /// Interval start (inclusive).
    pub start: NaiveDateTime,
    /// Interval end (exclusive).
    pub end: NaiveDateTime,
}

impl ResolvedInterval {
    /// Creates an interval, or `None` if it would be empty.
    pub fn new(start: NaiveDateTime, end: NaiveDateTime) -> Option<Self> {
        (start < end).then_some(Self { start, end })
    }

    /// Length of the interval.
    #[inline]
    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    /// Whether an instant falls within this interval.
    #[inline]
    pub fn contains(&self, t: NaiveDateTime) -> bool {
        t >= self.start && t < self.end
    }

    /// Whether two intervals share at least one instant.
    pub fn overlaps(&self, other: &Self) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// Common part of two intervals.
    pub fn intersect(&self, other: &Self) -> Option<Self> {
        Self::new(self.start.max(other.start), self.end.min(other.end))
    }

    /// Removes `blackout` from this interval.
    ///
    /// Returns the surviving portions before and after the blackout (zero,
    /// one or two pieces). A blackout that does not overlap leaves the
    /// interval untouched.
    pub fn subtract(&self, blackout: &Self) -> Vec<Self> {
        if !self.overlaps(blackout) {
            return vec![*self];
        }
        let mut pieces = Vec::with_capacity(2);
        if let Some(before) = Self::new(self.start, blackout.start) {
            pieces.push(before);
        }
        if let Some(after) = Self::new(blackout.end, self.end) {
            pieces.push(after);
        }
        pieces
    }

    /// Calendar day of the start instant.
    #[inline]
    pub fn day(&self) -> NaiveDate {
        self.start.date()
    }
}

/// Open windows of one availability owner (instructor or vehicle).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OwnerCalendar {
    windows: Vec<ResolvedInterval>,
}

impl OwnerCalendar {
    /// Builds a calendar, sorting and merging touching or overlapping
    /// windows so the result is pairwise disjoint.
    pub fn from_windows(mut windows: Vec<ResolvedInterval>) -> Self {
        windows.sort();
        let mut merged: Vec<ResolvedInterval> = Vec::with_capacity(windows.len());
        for w in windows {
            match merged.last_mut() {
                Some(last) if w.start <= last.end => last.end = last.end.max(w.end),
                _ => merged.push(w),
            }
        }
        Self { windows: merged }
    }

    /// All windows, sorted by start.
    pub fn windows(&self) -> &[ResolvedInterval] {
        &self.windows
    }

    /// Windows starting on `day`.
    pub fn on_day(&self, day: NaiveDate) -> impl Iterator<Item = &ResolvedInterval> {
        self.windows.iter().filter(move |w| w.day() == day)
    }

    /// Whether an instant is inside an open window.
    pub fn is_open_at(&self, t: NaiveDateTime) -> bool {
        self.windows.iter().any(|w| w.contains(t))
    }

    /// Total open time within `range`.
    pub fn open_time_in(&self, range: &ResolvedInterval) -> Duration {
        self.windows
            .iter()
            .filter_map(|w| w.intersect(range))
            .fold(Duration::zero(), |acc, w| acc + w.duration())
    }

    /// Whether the calendar has no windows.
    pub fn is_empty(&self) -> bool {
        self.windows.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(d: u32, h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 4, d)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    fn iv(d: u32, h0: u32, h1: u32) -> ResolvedInterval {
        ResolvedInterval::new(at(d, h0, 0), at(d, h1, 0)).unwrap()
    }

    #[test]
    fn test_interval_rejects_empty() {
        assert!(ResolvedInterval::new(at(7, 8, 0), at(7, 8, 0)).is_none());
        assert!(ResolvedInterval::new(at(7, 9, 0), at(7, 8, 0)).is_none());
    }

    #[test]
    fn test_interval_contains_half_open() {
        let w = iv(7, 8, 12);
        assert_eq!(w.duration(), Duration::hours(4));
        assert!(w.contains(at(7, 8, 0)));
        assert!(w.contains(at(7, 11, 59)));
        assert!(!w.contains(at(7, 12, 0)));
    }

    #[test]
    fn test_interval_overlap() {
        let a = iv(7, 8, 10);
        assert!(a.overlaps(&iv(7, 9, 11)));
        assert!(!a.overlaps(&iv(7, 10, 12))); // touching
        assert_eq!(a.intersect(&iv(7, 9, 11)), Some(iv(7, 9, 10)));
        assert_eq!(a.intersect(&iv(7, 10, 12)), None);
    }

    #[test]
    fn test_subtract_middle_splits() {
        let pieces = iv(7, 8, 12).subtract(&iv(7, 9, 10));
        assert_eq!(pieces, vec![iv(7, 8, 9), iv(7, 10, 12)]);
    }

    #[test]
    fn test_subtract_edges() {
        assert_eq!(iv(7, 8, 12).subtract(&iv(7, 6, 9)), vec![iv(7, 9, 12)]);
        assert_eq!(iv(7, 8, 12).subtract(&iv(7, 11, 14)), vec![iv(7, 8, 11)]);
        assert!(iv(7, 8, 12).subtract(&iv(7, 8, 12)).is_empty());
        assert_eq!(iv(7, 8, 12).subtract(&iv(7, 12, 13)), vec![iv(7, 8, 12)]);
    }

    #[test]
    fn test_calendar_merges_overlaps() {
        let cal = OwnerCalendar::from_windows(vec![iv(7, 10, 14), iv(7, 8, 11), iv(8, 8, 9)]);
        assert_eq!(cal.windows(), &[iv(7, 8, 14), iv(8, 8, 9)]);
    }

    #[test]
    fn test_calendar_merges_touching() {
        let cal = OwnerCalendar::from_windows(vec![iv(7, 8, 10), iv(7, 10, 12)]);
        assert_eq!(cal.windows(), &[iv(7, 8, 12)]);
    }

    #[test]
    fn test_calendar_queries() {
        let cal = OwnerCalendar::from_windows(vec![iv(7, 8, 12), iv(7, 14, 18), iv(8, 8, 12)]);
        let day7 = NaiveDate::from_ymd_opt(2025, 4, 7).unwrap();
        assert_eq!(cal.on_day(day7).count(), 2);
        assert!(cal.is_open_at(at(7, 9, 30)));
        assert!(!cal.is_open_at(at(7, 13, 0)));
        assert_eq!(cal.open_time_in(&iv(7, 10, 16)), Duration::hours(4));
        assert!(!cal.is_empty());
    }
}
