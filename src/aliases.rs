//! Ranked candidate keys for every logical field the portal backends
//! disagree on. Resolution always walks a table in order and takes the
//! first usable value; newly observed aliases belong in these tables, not
//! in conditionals at call sites.

use serde_json::{Map, Value};

/// Identifier candidates, most stable first. Content-derived keys
/// (`email`, `name`) come last; a fabricated id is the last resort when
/// none of these exist.
pub const RECORD_ID: &[&str] = &["id", "ID", "_id", "reference", "slug", "email", "name"];

pub const PROFILE_ID: &[&str] = &["id", "_id", "studentId", "student_id"];
pub const PROFILE_NAME: &[&str] = &["name", "fullName", "full_name"];
pub const PROFILE_EMAIL: &[&str] = &["email", "emailAddress", "email_address"];
pub const PROFILE_CLASS: &[&str] = &["class", "className", "class_name", "currentClass"];
pub const PROFILE_ADMISSION: &[&str] = &[
    "admissionNumber",
    "admission_number",
    "admissionNo",
    "regNumber",
];

pub const ATTENDANCE_PRESENT: &[&str] = &["present", "daysPresent", "presentDays", "attended"];
pub const ATTENDANCE_ABSENT: &[&str] = &["absent", "daysAbsent", "absentDays"];
pub const ATTENDANCE_TOTAL: &[&str] = &["total", "totalDays", "daysTotal", "schoolDays"];
pub const ATTENDANCE_PERCENT: &[&str] = &["percentage", "percent", "attendanceRate"];

pub const ASSIGNMENT_TEACHER_NAME: &[&str] = &["teacherName", "teacher", "assignedBy"];
pub const ASSIGNMENT_TEACHER_ID: &[&str] = &["teacherId", "teacher_id"];
pub const ASSIGNMENT_CLASS: &[&str] = &["class", "className", "targetClass"];
pub const ASSIGNMENT_TITLE: &[&str] = &["title", "name", "topic"];
pub const ASSIGNMENT_DUE: &[&str] = &["dueDate", "due_date", "deadline"];
pub const ASSIGNMENT_SCORE: &[&str] = &["score", "marks"];
pub const ASSIGNMENT_STATUS: &[&str] = &["status", "submissionStatus"];

pub const SUBJECT_TEACHER: &[&str] = &["teacher", "teacherName", "subjectTeacher"];
pub const TIMETABLE_TEACHER: &[&str] = &["teacher", "teacherName", "tutor"];
pub const TEACHER_NAME: &[&str] = &["name", "teacherName", "fullName"];

pub const EVENT_TITLE: &[&str] = &["title", "name"];
pub const EVENT_AUDIENCE: &[&str] = &["audience", "targetAudience"];
pub const EVENT_START: &[&str] = &["startDate", "start_date", "date"];
pub const EVENT_END: &[&str] = &["endDate", "end_date"];
pub const EVENT_DESCRIPTION: &[&str] = &["description", "details"];
pub const EVENT_LOCATION: &[&str] = &["location", "venue"];
pub const EVENT_CATEGORY: &[&str] = &["category", "type"];

/// First candidate that holds a non-blank string, trimmed.
pub fn string_field(map: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    for key in keys {
        if let Some(s) = map.get(*key).and_then(Value::as_str) {
            let t = s.trim();
            if !t.is_empty() {
                return Some(t.to_string());
            }
        }
    }
    None
}

/// First candidate usable as an identifier: a non-blank string, or a
/// number rendered as text (backends are split on numeric vs string ids).
pub fn ident_field(map: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    for key in keys {
        match map.get(*key) {
            Some(Value::String(s)) => {
                let t = s.trim();
                if !t.is_empty() {
                    return Some(t.to_string());
                }
            }
            Some(Value::Number(n)) => return Some(n.to_string()),
            _ => {}
        }
    }
    None
}

/// First candidate carrying a finite number, accepting numeric strings
/// ("18" and 18 are the same attendance count to the upstreams).
pub fn number_field(map: &Map<String, Value>, keys: &[&str]) -> Option<f64> {
    for key in keys {
        match map.get(*key) {
            Some(Value::Number(n)) => {
                if let Some(v) = n.as_f64() {
                    if v.is_finite() {
                        return Some(v);
                    }
                }
            }
            Some(Value::String(s)) => {
                if let Ok(v) = s.trim().parse::<f64>() {
                    if v.is_finite() {
                        return Some(v);
                    }
                }
            }
            _ => {}
        }
    }
    None
}
