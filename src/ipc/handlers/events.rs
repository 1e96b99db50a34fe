use crate::events::upcoming_events;
use crate::ipc::error::ok;
use crate::ipc::helpers::parse_today;
use crate::ipc::types::{AppState, Request};
use crate::normalize::normalize_collection;
use serde_json::json;

fn handle_upcoming(_state: &mut AppState, req: &Request) -> serde_json::Value {
    let today = match parse_today(&req.params) {
        Ok(d) => d,
        Err(e) => return e.response(&req.id),
    };
    let calendar = normalize_collection(req.params.get("calendar"));
    let assignments = normalize_collection(req.params.get("assignments"));
    let events = upcoming_events(&calendar, &assignments, today);
    ok(&req.id, json!({ "events": events }))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "events.upcoming" => Some(handle_upcoming(state, req)),
        _ => None,
    }
}
