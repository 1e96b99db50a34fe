use crate::attendance::{reconcile_attendance, AttendanceSummary};
use crate::ipc::error::ok;
use crate::ipc::helpers::optional_struct;
use crate::ipc::types::{AppState, Request};
use serde_json::json;

fn handle_reconcile(_state: &mut AppState, req: &Request) -> serde_json::Value {
    let fallback: AttendanceSummary = match optional_struct(&req.params, "fallback") {
        Ok(v) => v,
        Err(e) => return e.response(&req.id),
    };
    let summary = reconcile_attendance(req.params.get("attendance"), &fallback);
    ok(&req.id, json!({ "summary": summary }))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "attendance.reconcile" => Some(handle_reconcile(state, req)),
        _ => None,
    }
}
