use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::aliases;

/// The resolved student identity. Every field is populated: a blank or
/// missing remote field resolves to the caller-supplied fallback, so a
/// failed profile fetch still renders a complete header.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StudentProfile {
    pub id: String,
    pub name: String,
    pub email: String,
    pub class: String,
    pub admission_number: String,
}

/// Merge a freshly fetched profile object against the fallback, field by
/// field. The raw payload may be absent or malformed; the result is always
/// structurally complete.
pub fn resolve_profile(raw: Option<&Value>, fallback: &StudentProfile) -> StudentProfile {
    let Some(obj) = raw.and_then(Value::as_object) else {
        return fallback.clone();
    };

    StudentProfile {
        id: aliases::ident_field(obj, aliases::PROFILE_ID).unwrap_or_else(|| fallback.id.clone()),
        name: aliases::string_field(obj, aliases::PROFILE_NAME)
            .unwrap_or_else(|| fallback.name.clone()),
        email: aliases::string_field(obj, aliases::PROFILE_EMAIL)
            .unwrap_or_else(|| fallback.email.clone()),
        class: aliases::string_field(obj, aliases::PROFILE_CLASS)
            .unwrap_or_else(|| fallback.class.clone()),
        admission_number: aliases::string_field(obj, aliases::PROFILE_ADMISSION)
            .unwrap_or_else(|| fallback.admission_number.clone()),
    }
}
