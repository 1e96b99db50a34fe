use crate::attendance::AttendanceSummary;
use crate::dashboard::{build_dashboard, DashboardSources};
use crate::ipc::error::{err, ok};
use crate::ipc::helpers::{optional_struct, parse_today};
use crate::ipc::types::{AppState, Request};
use crate::profile::StudentProfile;

fn handle_build(state: &mut AppState, req: &Request) -> serde_json::Value {
    let params = &req.params;
    let fallback_profile: StudentProfile = match optional_struct(params, "fallbackProfile") {
        Ok(v) => v,
        Err(e) => return e.response(&req.id),
    };
    let fallback_attendance: AttendanceSummary = match optional_struct(params, "fallbackAttendance")
    {
        Ok(v) => v,
        Err(e) => return e.response(&req.id),
    };
    let today = match parse_today(params) {
        Ok(d) => d,
        Err(e) => return e.response(&req.id),
    };

    let sources = DashboardSources {
        profile: params.get("profile"),
        academic: params.get("academic"),
        attendance: params.get("attendance"),
        timetable: params.get("timetable"),
        assignments: params.get("assignments"),
        library: params.get("library"),
        teacher_assignments: params.get("teacherAssignments"),
        calendar: params.get("calendar"),
    };
    let model = build_dashboard(
        &sources,
        &fallback_profile,
        &fallback_attendance,
        today,
        &mut state.insights,
    );
    match serde_json::to_value(&model) {
        Ok(result) => ok(&req.id, result),
        Err(e) => err(&req.id, "serialize_failed", e.to_string(), None),
    }
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "dashboard.build" => Some(handle_build(state, req)),
        _ => None,
    }
}
