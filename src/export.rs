//! Read-only projections of the committed schedule.
//!
//! - [`CalendarEvent`]: `{id, title, start, end}` records for calendar UIs,
//!   with ISO-8601 local datetimes.
//! - [`html_table`]: a static day-by-slot table. Columns are the days that
//!   carry sessions, rows are the hour slots of the working day, and each
//!   cell lists the sessions starting in that slot.

use std::collections::{BTreeMap, HashMap};
use std::fmt::Write as _;
use std::path::Path;

use chrono::{NaiveDate, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};

use crate::models::{
    Instructor, InstructorId, ScheduledSession, SessionId, Student, StudentId, Vehicle, VehicleId,
};

/// Display names by id.
#[derive(Debug, Clone, Default)]
pub struct NameIndex {
    instructors: HashMap<InstructorId, String>,
    students: HashMap<StudentId, String>,
    vehicles: HashMap<VehicleId, String>,
}

impl NameIndex {
    /// Indexes entity names.
    pub fn new(instructors: &[Instructor], students: &[Student], vehicles: &[Vehicle]) -> Self {
        Self {
            instructors: instructors.iter().map(|i| (i.id, i.name.clone())).collect(),
            students: students.iter().map(|s| (s.id, s.name.clone())).collect(),
            vehicles: vehicles.iter().map(|v| (v.id, v.name.clone())).collect(),
        }
    }

    /// Instructor name, or the id if unknown.
    pub fn instructor(&self, id: InstructorId) -> String {
        self.instructors.get(&id).cloned().unwrap_or_else(|| id.to_string())
    }

    /// Student name, or the id if unknown.
    pub fn student(&self, id: StudentId) -> String {
        self.students.get(&id).cloned().unwrap_or_else(|| id.to_string())
    }

    /// Vehicle name, or the id if unknown.
    pub fn vehicle(&self, id: VehicleId) -> String {
        self.vehicles.get(&id).cloned().unwrap_or_else(|| id.to_string())
    }
}

/// One calendar entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarEvent {
    /// Session id.
    pub id: SessionId,
    /// `"student / instructor / vehicle"`.
    pub title: String,
    /// Start, e.g. `2025-04-14T15:00:00`.
    pub start: NaiveDateTime,
    /// End.
    pub end: NaiveDateTime,
}

/// Projects sessions to calendar events, in input order.
pub fn calendar_events(sessions: &[ScheduledSession], names: &NameIndex) -> Vec<CalendarEvent> {
    sessions
        .iter()
        .map(|s| CalendarEvent {
            id: s.id,
            title: format!(
                "{} / {} / {}",
                names.student(s.student_id),
                names.instructor(s.instructor_id),
                names.vehicle(s.vehicle_id)
            ),
            start: s.start,
            end: s.end,
        })
        .collect()
}

/// Calendar events as a JSON array.
pub fn calendar_events_json(
    sessions: &[ScheduledSession],
    names: &NameIndex,
) -> serde_json::Result<String> {
    serde_json::to_string(&calendar_events(sessions, names))
}

/// Renders the day-by-slot table for hour slots `[day_start_hour, day_end_hour)`.
pub fn html_table(
    sessions: &[ScheduledSession],
    names: &NameIndex,
    day_start_hour: u32,
    day_end_hour: u32,
) -> String {
    let mut by_day: BTreeMap<NaiveDate, Vec<&ScheduledSession>> = BTreeMap::new();
    for s in sessions {
        by_day.entry(s.day()).or_default().push(s);
    }
    for day_sessions in by_day.values_mut() {
        day_sessions.sort_by_key(|s| (s.start, s.instructor_id));
    }

    let mut html = String::from(concat!(
        "<html>\n<head>\n<meta charset=\"utf-8\">\n<title>Driving schedule</title>\n",
        "<style>\n",
        "table { border-collapse: collapse; width: 100%; }\n",
        "th, td { border: 1px solid #ccc; padding: 5px; vertical-align: top; }\n",
        "th { background-color: #f0f0f0; }\n",
        "</style>\n</head>\n<body>\n<h1>Driving schedule</h1>\n<table>\n<tr><th>Slot</th>"
    ));
    for day in by_day.keys() {
        let _ = write!(html, "<th>{day}</th>");
    }
    html.push_str("</tr>\n");

    for hour in day_start_hour..day_end_hour {
        let _ = write!(html, "<tr><td><strong>{hour:02}:00</strong></td>");
        for day_sessions in by_day.values() {
            html.push_str("<td>");
            for s in day_sessions.iter().filter(|s| s.start.hour() == hour) {
                let _ = write!(
                    html,
                    "<b>{}-{}</b><br>Instructor: {}<br>Student: {}<br>Vehicle: {}<br><hr>",
                    s.start.format("%H:%M"),
                    s.end.format("%H:%M"),
                    escape(&names.instructor(s.instructor_id)),
                    escape(&names.student(s.student_id)),
                    escape(&names.vehicle(s.vehicle_id)),
                );
            }
            html.push_str("</td>");
        }
        html.push_str("</tr>\n");
    }

    html.push_str("</table>\n</body>\n</html>\n");
    html
}

/// Writes [`html_table`] to a file.
pub fn write_html_table(
    path: impl AsRef<Path>,
    sessions: &[ScheduledSession],
    names: &NameIndex,
    day_start_hour: u32,
    day_end_hour: u32,
) -> std::io::Result<()> {
    std::fs::write(path, html_table(sessions, names, day_start_hour, day_end_hour))
}

fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PermitType;

    fn date(m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, m, d).unwrap()
    }

    fn names() -> NameIndex {
        NameIndex::new(
            &[Instructor::new(InstructorId::new(1), "Alice")],
            &[Student::new(
                StudentId::new(1),
                "Bob & Co",
                PermitType::Manual,
                date(4, 1),
                date(5, 1),
            )],
            &[Vehicle::new(VehicleId::new(1), "Clio", PermitType::Manual)],
        )
    }

    fn session(id: u32, day: NaiveDate, start: u32, end: u32, vehicle: u32) -> ScheduledSession {
        ScheduledSession {
            id: SessionId::new(id),
            instructor_id: InstructorId::new(1),
            student_id: StudentId::new(1),
            vehicle_id: VehicleId::new(vehicle),
            start: day.and_hms_opt(start, 0, 0).unwrap(),
            end: day.and_hms_opt(end, 0, 0).unwrap(),
        }
    }

    #[test]
    fn test_calendar_events() {
        let events = calendar_events(&[session(4, date(4, 14), 15, 17, 1)], &names());
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].title, "Bob & Co / Alice / Clio");
    }

    #[test]
    fn test_unknown_names_fall_back_to_ids() {
        let events = calendar_events(&[session(1, date(4, 14), 8, 10, 7)], &names());
        assert_eq!(events[0].title, "Bob & Co / Alice / V7");
    }

    #[test]
    fn test_calendar_events_json() {
        let json = calendar_events_json(&[session(4, date(4, 14), 15, 17, 1)], &names()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value[0]["id"], 4);
        assert_eq!(value[0]["start"], "2025-04-14T15:00:00");
        assert_eq!(value[0]["end"], "2025-04-14T17:00:00");
    }

    #[test]
    fn test_html_table_layout() {
        let sessions = vec![
            session(1, date(4, 8), 10, 12, 1),
            session(2, date(4, 7), 8, 10, 1),
        ];
        let html = html_table(&sessions, &names(), 8, 20);

        // Days ordered, one header per day
        let first = html.find("<th>2025-04-07</th>").unwrap();
        let second = html.find("<th>2025-04-08</th>").unwrap();
        assert!(first < second);
        // Twelve hour rows
        assert_eq!(html.matches("<tr><td><strong>").count(), 12);
        assert!(html.contains("<strong>19:00</strong>"));
        assert!(!html.contains("<strong>20:00</strong>"));
        assert!(html.contains("<b>08:00-10:00</b>"));
        assert!(html.contains("Student: Bob &amp; Co"));
    }

    #[test]
    fn test_write_html_table() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("schedule.html");
        write_html_table(&path, &[session(1, date(4, 7), 8, 10, 1)], &names(), 8, 20).unwrap();
        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.contains("<b>08:00-10:00</b>"));
    }
}
