use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::aliases;

/// Normalized attendance triple. Integers, non-negative, percentage
/// clamped to [0, 100].
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AttendanceSummary {
    pub present: u32,
    pub total: u32,
    pub percentage: u32,
}

fn count(v: f64) -> u32 {
    v.round().max(0.0) as u32
}

/// Derive a complete summary from whatever the attendance endpoint
/// returned. `total` comes from an explicit alias, else `present + absent`
/// when the payload carries both, else the fallback; it is never below
/// `present`, so sparse present-only data reads as 100%. The percentage
/// uses an explicit non-negative value when supplied, is recomputed from
/// the counts otherwise, and is 0 when there is nothing to divide by.
pub fn reconcile_attendance(raw: Option<&Value>, fallback: &AttendanceSummary) -> AttendanceSummary {
    let Some(obj) = raw.and_then(Value::as_object) else {
        return fallback.clone();
    };

    let present_raw = aliases::number_field(obj, aliases::ATTENDANCE_PRESENT);
    let absent_raw = aliases::number_field(obj, aliases::ATTENDANCE_ABSENT);
    let present = present_raw.map(count).unwrap_or(fallback.present);

    let mut total = match aliases::number_field(obj, aliases::ATTENDANCE_TOTAL) {
        Some(t) => count(t),
        None => match (present_raw, absent_raw) {
            (Some(p), Some(a)) => count(p) + count(a),
            _ => fallback.total,
        },
    };
    if total < present {
        total = present;
    }

    let percentage = match aliases::number_field(obj, aliases::ATTENDANCE_PERCENT) {
        Some(p) if p >= 0.0 => count(p).min(100),
        _ if total > 0 => count(f64::from(present) / f64::from(total) * 100.0).min(100),
        _ => 0,
    };

    AttendanceSummary {
        present,
        total,
        percentage,
    }
}
