use chrono::{Local, NaiveDate};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::ipc::error::HandlerErr;

/// Optional typed param: absent/null resolves to the default, an object is
/// deserialized, anything else is a structural request error.
pub fn optional_struct<T: DeserializeOwned + Default>(
    params: &Value,
    key: &str,
) -> Result<T, HandlerErr> {
    match params.get(key) {
        None | Some(Value::Null) => Ok(T::default()),
        Some(v @ Value::Object(_)) => serde_json::from_value(v.clone())
            .map_err(|e| HandlerErr::bad_params(format!("invalid {}: {}", key, e))),
        Some(_) => Err(HandlerErr::bad_params(format!("{} must be an object", key))),
    }
}

/// The reference day for "upcoming" decisions: an explicit `YYYY-MM-DD`
/// param, else the local date. Explicit-but-unparseable is a request
/// error, not a silent fallback to the clock.
pub fn parse_today(params: &Value) -> Result<NaiveDate, HandlerErr> {
    match params.get("today") {
        None | Some(Value::Null) => Ok(Local::now().date_naive()),
        Some(Value::String(s)) => NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
            .map_err(|_| HandlerErr::bad_params("today must be YYYY-MM-DD")),
        Some(_) => Err(HandlerErr::bad_params("today must be a string")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::StudentProfile;
    use serde_json::json;

    #[test]
    fn optional_struct_defaults_when_absent() {
        let p: StudentProfile = optional_struct(&json!({}), "fallback").expect("default");
        assert_eq!(p, StudentProfile::default());
    }

    #[test]
    fn optional_struct_rejects_non_objects() {
        let r: Result<StudentProfile, _> = optional_struct(&json!({"fallback": 5}), "fallback");
        assert!(r.is_err());
    }

    #[test]
    fn parse_today_accepts_dates_and_rejects_garbage() {
        let d = parse_today(&json!({"today": "2026-02-10"})).expect("date");
        assert_eq!(d, NaiveDate::from_ymd_opt(2026, 2, 10).unwrap());
        assert!(parse_today(&json!({"today": "tomorrow"})).is_err());
        assert!(parse_today(&json!({"today": 20260210})).is_err());
        assert!(parse_today(&json!({})).is_ok());
    }
}
