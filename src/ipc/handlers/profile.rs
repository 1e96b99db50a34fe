use crate::ipc::error::ok;
use crate::ipc::helpers::optional_struct;
use crate::ipc::types::{AppState, Request};
use crate::profile::{resolve_profile, StudentProfile};
use serde_json::json;

fn handle_resolve(_state: &mut AppState, req: &Request) -> serde_json::Value {
    let fallback: StudentProfile = match optional_struct(&req.params, "fallback") {
        Ok(v) => v,
        Err(e) => return e.response(&req.id),
    };
    let resolved = resolve_profile(req.params.get("profile"), &fallback);
    ok(&req.id, json!({ "profile": resolved }))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "profile.resolve" => Some(handle_resolve(state, req)),
        _ => None,
    }
}
