use chrono::NaiveDate;
use serde::Serialize;
use serde_json::Value;

use crate::assignments::{self, AssignmentInsight, InsightsCache};
use crate::attendance::{reconcile_attendance, AttendanceSummary};
use crate::events::{upcoming_events, UpcomingEvent};
use crate::normalize::normalize_collection;
use crate::profile::{resolve_profile, StudentProfile};

/// The raw payloads the caller fetched, one per backend endpoint. Every
/// source is optional: a failed fetch arrives here as `None` (or as
/// whatever malformed value the endpoint produced) and degrades only its
/// own section.
#[derive(Debug, Clone, Copy, Default)]
pub struct DashboardSources<'a> {
    pub profile: Option<&'a Value>,
    pub academic: Option<&'a Value>,
    pub attendance: Option<&'a Value>,
    pub timetable: Option<&'a Value>,
    pub assignments: Option<&'a Value>,
    pub library: Option<&'a Value>,
    pub teacher_assignments: Option<&'a Value>,
    pub calendar: Option<&'a Value>,
}

/// The single internally consistent view model the dashboard renders.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardModel {
    pub profile: StudentProfile,
    pub subjects: Vec<Value>,
    pub attendance: AttendanceSummary,
    pub timetable: Vec<Value>,
    pub assignments: Vec<Value>,
    pub insights: AssignmentInsight,
    pub library: Vec<Value>,
    pub upcoming_events: Vec<UpcomingEvent>,
}

/// Reconcile one student's payloads into the dashboard view model.
/// Pure apart from the insight cache, reentrant, and idempotent: feeding
/// the same payloads twice yields the same model.
pub fn build_dashboard(
    sources: &DashboardSources<'_>,
    fallback_profile: &StudentProfile,
    fallback_attendance: &AttendanceSummary,
    today: NaiveDate,
    cache: &mut InsightsCache,
) -> DashboardModel {
    let profile = resolve_profile(sources.profile, fallback_profile);
    let subjects = normalize_collection(sources.academic);
    let timetable = normalize_collection(sources.timetable);
    let library = normalize_collection(sources.library);
    let calendar = normalize_collection(sources.calendar);
    let all_assignments = normalize_collection(sources.assignments);

    let ctx = assignments::filter_context(
        &subjects,
        &timetable,
        sources.teacher_assignments,
        &profile.class,
    );
    let visible = assignments::filter_assignments(&all_assignments, &ctx);
    let insights = cache.insights_for(&visible);
    let upcoming = upcoming_events(&calendar, &visible, today);

    DashboardModel {
        profile,
        subjects: subjects.iter().map(|r| r.to_value()).collect(),
        attendance: reconcile_attendance(sources.attendance, fallback_attendance),
        timetable: timetable.iter().map(|r| r.to_value()).collect(),
        assignments: visible.iter().map(assignments::derived_record).collect(),
        insights,
        library: library.iter().map(|r| r.to_value()).collect(),
        upcoming_events: upcoming,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fallback_profile() -> StudentProfile {
        StudentProfile {
            id: "stu-1".into(),
            name: "Ada Obi".into(),
            email: "ada@portal.ng".into(),
            class: "JSS2B".into(),
            admission_number: "ADM/21/014".into(),
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 2, 10).expect("valid date")
    }

    #[test]
    fn all_sources_missing_still_yields_a_complete_model() {
        let mut cache = InsightsCache::new();
        let model = build_dashboard(
            &DashboardSources::default(),
            &fallback_profile(),
            &AttendanceSummary::default(),
            today(),
            &mut cache,
        );
        assert_eq!(model.profile, fallback_profile());
        assert!(model.subjects.is_empty());
        assert_eq!(model.attendance, AttendanceSummary::default());
        assert!(model.assignments.is_empty());
        assert_eq!(model.insights.total, 0);
        assert!(model.upcoming_events.is_empty());
    }

    #[test]
    fn one_failed_source_degrades_only_its_own_section() {
        let academic = json!([
            { "id": "sub-1", "subject": "Mathematics", "teacher": "Mrs. Ada Obi", "score": 82 }
        ]);
        let assignments = json!([
            { "id": "hw-1", "teacherName": "ada obi", "dueDate": "2026-02-15", "status": "graded", "score": 90 }
        ]);
        let sources = DashboardSources {
            academic: Some(&academic),
            assignments: Some(&assignments),
            // attendance fetch failed upstream
            attendance: None,
            ..Default::default()
        };
        let mut cache = InsightsCache::new();
        let model = build_dashboard(
            &sources,
            &fallback_profile(),
            &AttendanceSummary::default(),
            today(),
            &mut cache,
        );
        assert_eq!(model.attendance, AttendanceSummary::default());
        assert_eq!(model.subjects.len(), 1);
        assert_eq!(model.assignments.len(), 1);
        assert_eq!(model.insights.graded, 1);
        assert_eq!(model.upcoming_events.len(), 1);
    }

    #[test]
    fn assignments_filter_against_subject_teachers_and_class() {
        let academic = json!([
            { "id": "sub-1", "subject": "English", "teacher": "Mr. Bello Kano" }
        ]);
        let assignments = json!([
            { "id": "mine", "teacherName": "bello kano", "dueDate": "2026-02-12" },
            { "id": "classmate", "teacherName": "Stranger", "class": "jss 2b", "dueDate": "2026-02-13" },
            { "id": "other", "teacherName": "Stranger", "class": "SS1A", "dueDate": "2026-02-14" }
        ]);
        let sources = DashboardSources {
            academic: Some(&academic),
            assignments: Some(&assignments),
            ..Default::default()
        };
        let mut cache = InsightsCache::new();
        let model = build_dashboard(
            &sources,
            &fallback_profile(),
            &AttendanceSummary::default(),
            today(),
            &mut cache,
        );
        let ids: Vec<&str> = model
            .assignments
            .iter()
            .filter_map(|a| a.get("id").and_then(|v| v.as_str()))
            .collect();
        assert_eq!(ids, vec!["mine", "classmate"]);
    }

    #[test]
    fn rebuilding_with_the_same_payloads_is_idempotent() {
        let assignments = json!([
            { "id": "hw-1", "dueDate": "2026-02-15", "status": "submitted" }
        ]);
        let calendar = json!([
            { "id": "ev-1", "audience": "all", "startDate": "2026-02-11", "title": "Assembly" }
        ]);
        let sources = DashboardSources {
            assignments: Some(&assignments),
            calendar: Some(&calendar),
            ..Default::default()
        };
        let mut cache = InsightsCache::new();
        let first = build_dashboard(
            &sources,
            &fallback_profile(),
            &AttendanceSummary::default(),
            today(),
            &mut cache,
        );
        let second = build_dashboard(
            &sources,
            &fallback_profile(),
            &AttendanceSummary::default(),
            today(),
            &mut cache,
        );
        assert_eq!(
            serde_json::to_value(&first).expect("model"),
            serde_json::to_value(&second).expect("model")
        );
        assert_eq!(cache.len(), 1);
    }
}
