use serde::Deserialize;

use crate::assignments::InsightsCache;

#[derive(Debug, Deserialize, Clone)]
pub struct Request {
    pub id: String,
    pub method: String,
    #[serde(default)]
    pub params: serde_json::Value,
}

/// Sidecar state. There is no workspace or database: the engine is a pure
/// function of each request's payloads, and the only thing worth keeping
/// between requests is the insight memo table.
#[derive(Default)]
pub struct AppState {
    pub insights: InsightsCache,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }
}
