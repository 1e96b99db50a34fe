use crate::ipc::error::ok;
use crate::ipc::types::{AppState, Request};
use crate::normalize::normalize_collection;
use serde_json::json;

fn handle_normalize(_state: &mut AppState, req: &Request) -> serde_json::Value {
    let records = normalize_collection(req.params.get("collection"));
    ok(&req.id, json!({ "records": records }))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "records.normalize" => Some(handle_normalize(state, req)),
        _ => None,
    }
}
