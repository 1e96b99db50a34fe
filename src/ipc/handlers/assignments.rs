use crate::assignments::{derived_record, filter_assignments, filter_context};
use crate::ipc::error::ok;
use crate::ipc::types::{AppState, Request};
use crate::normalize::normalize_collection;
use serde_json::{json, Value};

fn handle_filter(_state: &mut AppState, req: &Request) -> serde_json::Value {
    let params = &req.params;
    let subjects = normalize_collection(params.get("subjects"));
    let timetable = normalize_collection(params.get("timetable"));
    let all = normalize_collection(params.get("assignments"));
    let class = params
        .get("class")
        .and_then(Value::as_str)
        .unwrap_or_default();

    let ctx = filter_context(
        &subjects,
        &timetable,
        params.get("teacherAssignments"),
        class,
    );
    let visible: Vec<Value> = filter_assignments(&all, &ctx)
        .iter()
        .map(derived_record)
        .collect();
    ok(&req.id, json!({ "assignments": visible }))
}

fn handle_insights(state: &mut AppState, req: &Request) -> serde_json::Value {
    let records = normalize_collection(req.params.get("assignments"));
    let insights = state.insights.insights_for(&records);
    ok(&req.id, json!({ "insights": insights }))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "assignments.filter" => Some(handle_filter(state, req)),
        "assignments.insights" => Some(handle_insights(state, req)),
        _ => None,
    }
}
