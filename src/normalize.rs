use serde::{Serialize, Serializer};
use serde_json::{Map, Value};
use std::collections::HashSet;
use uuid::Uuid;

use crate::aliases;

/// A payload item promoted to a uniform container with a guaranteed,
/// batch-unique `id`. Built once at normalization time; later stages derive
/// new values instead of mutating the record.
#[derive(Debug, Clone, PartialEq)]
pub struct IdentifiedRecord {
    id: String,
    fields: Map<String, Value>,
}

impl IdentifiedRecord {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn string(&self, keys: &[&str]) -> Option<String> {
        aliases::string_field(&self.fields, keys)
    }

    pub fn ident(&self, keys: &[&str]) -> Option<String> {
        aliases::ident_field(&self.fields, keys)
    }

    pub fn number(&self, keys: &[&str]) -> Option<f64> {
        aliases::number_field(&self.fields, keys)
    }

    /// The record as a plain JSON object, `id` included.
    pub fn to_value(&self) -> Value {
        Value::Object(self.fields.clone())
    }
}

impl Serialize for IdentifiedRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.fields.serialize(serializer)
    }
}

/// Normalize an arbitrary payload collection. Anything that is not an array
/// yields an empty list; entries that are not objects are dropped. Every
/// surviving record gets an id from the stable-identifier priority chain,
/// or a fabricated UUID when the source carries none. Ids colliding within
/// the batch are disambiguated with a `-N` suffix; the first occurrence
/// keeps the stable id.
pub fn normalize_collection(raw: Option<&Value>) -> Vec<IdentifiedRecord> {
    let Some(items) = raw.and_then(Value::as_array) else {
        return Vec::new();
    };

    let mut seen: HashSet<String> = HashSet::new();
    let mut out: Vec<IdentifiedRecord> = Vec::with_capacity(items.len());
    for item in items {
        let Some(obj) = item.as_object() else {
            continue;
        };
        let base = aliases::ident_field(obj, aliases::RECORD_ID)
            .unwrap_or_else(|| Uuid::new_v4().to_string());
        let id = disambiguate(&seen, base);
        seen.insert(id.clone());

        let mut fields = obj.clone();
        fields.insert("id".to_string(), Value::String(id.clone()));
        out.push(IdentifiedRecord { id, fields });
    }
    out
}

fn disambiguate(seen: &HashSet<String>, base: String) -> String {
    if !seen.contains(&base) {
        return base;
    }
    let mut n = 2usize;
    loop {
        let candidate = format!("{}-{}", base, n);
        if !seen.contains(&candidate) {
            return candidate;
        }
        n += 1;
    }
}
