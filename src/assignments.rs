use serde::Serialize;
use serde_json::Value;
use sha2::{Digest, Sha256};
use std::collections::{HashMap, HashSet};

use crate::aliases;
use crate::dates;
use crate::normalize::{normalize_collection, IdentifiedRecord};
use crate::tokens;

/// Everything the visibility filter needs about one student: the token set
/// of every teacher known to teach them, and their normalized class key.
#[derive(Debug, Clone, Default)]
pub struct FilterContext {
    pub known_tokens: HashSet<String>,
    pub class_key: String,
}

/// Flatten the teacher-assignment lookup (`{classTeachers, subjectTeachers}`)
/// into identified records. Only consulted for tokens, so id collisions
/// across the two lists do not matter.
pub fn teacher_directory_records(raw: Option<&Value>) -> Vec<IdentifiedRecord> {
    let Some(obj) = raw.and_then(Value::as_object) else {
        return Vec::new();
    };
    let mut out = normalize_collection(obj.get("classTeachers"));
    out.extend(normalize_collection(obj.get("subjectTeachers")));
    out
}

/// Build the student's matching context from the three sources that name
/// teachers: subject records, timetable slots, and the explicit
/// teacher-assignment lookup (names and backend ids for the latter, since
/// assignments may reference teachers by id alone).
pub fn filter_context(
    subjects: &[IdentifiedRecord],
    timetable: &[IdentifiedRecord],
    teacher_assignments: Option<&Value>,
    student_class: &str,
) -> FilterContext {
    let mut known_tokens = HashSet::new();
    for rec in subjects {
        if let Some(name) = rec.string(aliases::SUBJECT_TEACHER) {
            known_tokens.extend(tokens::name_tokens(&name));
        }
    }
    for rec in timetable {
        if let Some(name) = rec.string(aliases::TIMETABLE_TEACHER) {
            known_tokens.extend(tokens::name_tokens(&name));
        }
    }
    for rec in teacher_directory_records(teacher_assignments) {
        if let Some(name) = rec.string(aliases::TEACHER_NAME) {
            known_tokens.extend(tokens::name_tokens(&name));
        }
        known_tokens.extend(tokens::name_tokens(rec.id()));
    }

    FilterContext {
        known_tokens,
        class_key: tokens::class_key(student_class),
    }
}

/// The tokens an assignment carries about its own teacher: name aliases
/// plus the backend teacher id.
fn assignment_tokens(rec: &IdentifiedRecord) -> HashSet<String> {
    let mut out = HashSet::new();
    if let Some(name) = rec.string(aliases::ASSIGNMENT_TEACHER_NAME) {
        out.extend(tokens::name_tokens(&name));
    }
    if let Some(id) = rec.ident(aliases::ASSIGNMENT_TEACHER_ID) {
        out.extend(tokens::name_tokens(&id));
    }
    out
}

/// Layered visibility: teacher identity is the primary key, class
/// membership the fallback. Assignments carrying no teacher tokens at all
/// are visible to everyone. Tightening that policy would hide existing
/// records that omit teacher tags; see DESIGN.md before changing it.
pub fn is_visible(rec: &IdentifiedRecord, ctx: &FilterContext) -> bool {
    let own = assignment_tokens(rec);
    if own.is_empty() {
        return true;
    }
    if !own.is_disjoint(&ctx.known_tokens) {
        return true;
    }
    match rec.string(aliases::ASSIGNMENT_CLASS) {
        Some(class) => !ctx.class_key.is_empty() && tokens::class_key(&class) == ctx.class_key,
        None => false,
    }
}

fn due_key(rec: &IdentifiedRecord) -> i64 {
    rec.string(aliases::ASSIGNMENT_DUE)
        .and_then(|raw| dates::parse_due(&raw))
        .map(dates::sort_key)
        .unwrap_or(i64::MAX)
}

/// The assignments visible to one student, ascending by due date;
/// missing or unparseable due dates sort last.
pub fn filter_assignments(
    assignments: &[IdentifiedRecord],
    ctx: &FilterContext,
) -> Vec<IdentifiedRecord> {
    let mut visible: Vec<IdentifiedRecord> = assignments
        .iter()
        .filter(|rec| is_visible(rec, ctx))
        .cloned()
        .collect();
    visible.sort_by_key(due_key);
    visible
}

/// The status the dashboard shows: `sent → submitted → graded`, anything
/// unrecognized collapsing to `sent`. The orthogonal overdue flag is the
/// caller's due-date comparison, not owned here.
pub fn visible_status(rec: &IdentifiedRecord) -> &'static str {
    match rec
        .string(aliases::ASSIGNMENT_STATUS)
        .map(|s| s.to_lowercase())
        .as_deref()
    {
        Some("submitted") => "submitted",
        Some("graded") => "graded",
        _ => "sent",
    }
}

/// An assignment record as the dashboard renders it: the source fields
/// with the status normalized to its visible form.
pub fn derived_record(rec: &IdentifiedRecord) -> Value {
    let mut value = rec.to_value();
    if let Some(obj) = value.as_object_mut() {
        obj.insert(
            "status".to_string(),
            Value::String(visible_status(rec).to_string()),
        );
    }
    value
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignmentInsight {
    pub total: usize,
    pub submitted: usize,
    pub graded: usize,
    pub pending: usize,
    pub completion_rate: u32,
    pub average_score: Option<f64>,
}

/// Pure aggregation over the filtered assignment set. Recomputed from the
/// current set on every read; never persisted.
pub fn assignment_insights(assignments: &[IdentifiedRecord]) -> AssignmentInsight {
    let total = assignments.len();
    let mut submitted = 0usize;
    let mut graded = 0usize;
    let mut score_sum = 0.0f64;
    let mut score_count = 0usize;

    for rec in assignments {
        match visible_status(rec) {
            "submitted" => submitted += 1,
            "graded" => graded += 1,
            _ => {}
        }
        if let Some(score) = rec.number(aliases::ASSIGNMENT_SCORE) {
            score_sum += score;
            score_count += 1;
        }
    }

    let completion_rate = if total > 0 {
        (((submitted + graded) as f64) / (total as f64) * 100.0).round() as u32
    } else {
        0
    };
    let average_score = if score_count > 0 {
        Some((score_sum / (score_count as f64) * 100.0).round() / 100.0)
    } else {
        None
    };

    AssignmentInsight {
        total,
        submitted,
        graded,
        pending: total.saturating_sub(graded),
        completion_rate,
        average_score,
    }
}

const INSIGHT_CACHE_CAP: usize = 64;

/// Explicit memoization for the insight aggregation, keyed by a SHA-256
/// fingerprint of the canonical JSON of the assignment list. A changed
/// list lands on a new key; the table is cleared wholesale at capacity.
#[derive(Debug, Default)]
pub struct InsightsCache {
    entries: HashMap<String, AssignmentInsight>,
}

impl InsightsCache {
    pub fn new() -> Self {
        Self::default()
    }

    #[allow(dead_code)]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[allow(dead_code)]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn insights_for(&mut self, assignments: &[IdentifiedRecord]) -> AssignmentInsight {
        let key = fingerprint(assignments);
        if let Some(hit) = self.entries.get(&key) {
            return hit.clone();
        }
        let computed = assignment_insights(assignments);
        if self.entries.len() >= INSIGHT_CACHE_CAP {
            self.entries.clear();
        }
        self.entries.insert(key, computed.clone());
        computed
    }
}

fn fingerprint(assignments: &[IdentifiedRecord]) -> String {
    let mut hasher = Sha256::new();
    for rec in assignments {
        // serde_json orders object keys, so this serialization is canonical.
        let canonical = serde_json::to_string(&rec.to_value()).unwrap_or_default();
        hasher.update(canonical.as_bytes());
        hasher.update([0u8]);
    }
    format!("{:x}", hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn records(raw: Value) -> Vec<IdentifiedRecord> {
        normalize_collection(Some(&raw))
    }

    fn ctx_with_teachers(names: &[&str], class: &str) -> FilterContext {
        let mut known_tokens = HashSet::new();
        for name in names {
            known_tokens.extend(tokens::name_tokens(name));
        }
        FilterContext {
            known_tokens,
            class_key: tokens::class_key(class),
        }
    }

    #[test]
    fn teacher_name_variants_match() {
        let ctx = ctx_with_teachers(&["ada obi"], "JSS2B");
        let recs = records(json!([
            { "id": "a1", "teacherName": "Mrs. Ada Obi", "class": "JSS1A" }
        ]));
        assert!(is_visible(&recs[0], &ctx));
    }

    #[test]
    fn untagged_assignments_are_visible_regardless_of_class() {
        let ctx = ctx_with_teachers(&["ada obi"], "JSS2B");
        let recs = records(json!([
            { "id": "a1", "title": "General notice homework" }
        ]));
        assert!(is_visible(&recs[0], &ctx));
    }

    #[test]
    fn tagged_mismatch_falls_back_to_class_identity() {
        let ctx = ctx_with_teachers(&["ada obi"], "JSS2B");
        let matching = records(json!([
            { "id": "a1", "teacherName": "Someone Else", "class": "jss 2b" }
        ]));
        assert!(is_visible(&matching[0], &ctx));

        let mismatching = records(json!([
            { "id": "a2", "teacherName": "Someone Else", "class": "JSS1A" }
        ]));
        assert!(!is_visible(&mismatching[0], &ctx));

        let classless = records(json!([
            { "id": "a3", "teacherName": "Someone Else" }
        ]));
        assert!(!is_visible(&classless[0], &ctx));
    }

    #[test]
    fn teacher_id_matches_the_directory() {
        let subjects = Vec::new();
        let timetable = Vec::new();
        let lookup = json!({
            "classTeachers": [{ "id": "t-22", "name": "Mrs. Ngozi Eze" }],
            "subjectTeachers": []
        });
        let ctx = filter_context(&subjects, &timetable, Some(&lookup), "JSS2B");
        let recs = records(json!([
            { "id": "a1", "teacherId": "t-22", "class": "SS1A" }
        ]));
        assert!(is_visible(&recs[0], &ctx));
    }

    #[test]
    fn context_collects_tokens_from_all_three_sources() {
        let subjects = records(json!([{ "id": "s1", "teacher": "Mr. Bello Kano" }]));
        let timetable = records(json!([{ "id": "tt1", "tutor": "Mrs. Ada Obi" }]));
        let lookup = json!({ "subjectTeachers": [{ "name": "Dr. Chinedu Okafor" }] });
        let ctx = filter_context(&subjects, &timetable, Some(&lookup), "JSS2B");
        assert!(ctx.known_tokens.contains("bello kano"));
        assert!(ctx.known_tokens.contains("ada obi"));
        assert!(ctx.known_tokens.contains("chinedu okafor"));
    }

    #[test]
    fn filtered_assignments_sort_by_due_date_missing_last() {
        let ctx = ctx_with_teachers(&[], "JSS2B");
        let recs = records(json!([
            { "id": "later", "dueDate": "2026-03-10" },
            { "id": "undated" },
            { "id": "sooner", "deadline": "2026-03-01T08:00:00" },
            { "id": "unparseable", "dueDate": "someday" }
        ]));
        let filtered = filter_assignments(&recs, &ctx);
        let ids: Vec<&str> = filtered.iter().map(|r| r.id()).collect();
        assert_eq!(ids, vec!["sooner", "later", "undated", "unparseable"]);
    }

    #[test]
    fn adding_a_known_teacher_never_shrinks_the_result() {
        let recs = records(json!([
            { "id": "a1", "teacherName": "Ada Obi", "class": "JSS1A" },
            { "id": "a2", "teacherName": "Bello Kano", "class": "JSS1A" },
            { "id": "a3" }
        ]));
        let narrow = ctx_with_teachers(&["ada obi"], "JSS2B");
        let wide = ctx_with_teachers(&["ada obi", "bello kano"], "JSS2B");
        let before: HashSet<String> = filter_assignments(&recs, &narrow)
            .iter()
            .map(|r| r.id().to_string())
            .collect();
        let after: HashSet<String> = filter_assignments(&recs, &wide)
            .iter()
            .map(|r| r.id().to_string())
            .collect();
        assert!(before.is_subset(&after));
        assert!(after.contains("a2"));
    }

    #[test]
    fn visible_status_collapses_unknown_states_to_sent() {
        let recs = records(json!([
            { "id": "a1", "status": "Submitted" },
            { "id": "a2", "status": "graded" },
            { "id": "a3", "status": "overdue" },
            { "id": "a4" }
        ]));
        let statuses: Vec<&str> = recs.iter().map(visible_status).collect();
        assert_eq!(statuses, vec!["submitted", "graded", "sent", "sent"]);
    }

    #[test]
    fn derived_record_overlays_the_visible_status() {
        let recs = records(json!([{ "id": "a1", "status": "Marking", "title": "Essay" }]));
        let derived = derived_record(&recs[0]);
        assert_eq!(derived.get("status").and_then(|v| v.as_str()), Some("sent"));
        assert_eq!(derived.get("title").and_then(|v| v.as_str()), Some("Essay"));
    }

    #[test]
    fn insights_aggregate_counts_and_scores() {
        let recs = records(json!([
            { "id": "a1", "status": "graded", "score": 85 },
            { "id": "a2", "status": "graded", "score": 70 },
            { "id": "a3", "status": "submitted" },
            { "id": "a4" },
            { "id": "a5", "status": "overdue" }
        ]));
        let insight = assignment_insights(&recs);
        assert_eq!(insight.total, 5);
        assert_eq!(insight.submitted, 1);
        assert_eq!(insight.graded, 2);
        assert_eq!(insight.pending, 3);
        assert_eq!(insight.completion_rate, 60);
        assert_eq!(insight.average_score, Some(77.5));
    }

    #[test]
    fn insights_for_the_empty_set_are_zeroed_with_null_average() {
        let insight = assignment_insights(&[]);
        assert_eq!(insight.total, 0);
        assert_eq!(insight.completion_rate, 0);
        assert_eq!(insight.pending, 0);
        assert_eq!(insight.average_score, None);
    }

    #[test]
    fn average_score_rounds_to_two_decimals() {
        let recs = records(json!([
            { "id": "a1", "score": 70 },
            { "id": "a2", "score": 80 },
            { "id": "a3", "score": 80 }
        ]));
        let insight = assignment_insights(&recs);
        assert_eq!(insight.average_score, Some(76.67));
    }

    #[test]
    fn cache_memoizes_by_content_not_by_call() {
        let recs = records(json!([{ "id": "a1", "status": "graded", "score": 90 }]));
        let mut cache = InsightsCache::new();
        let first = cache.insights_for(&recs);
        let second = cache.insights_for(&recs);
        assert_eq!(first, second);
        assert_eq!(cache.len(), 1);

        let changed = records(json!([{ "id": "a1", "status": "submitted", "score": 90 }]));
        let third = cache.insights_for(&changed);
        assert_ne!(first, third);
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn fingerprint_distinguishes_order_and_content() {
        let a = records(json!([{ "id": "x" }, { "id": "y" }]));
        let b = records(json!([{ "id": "y" }, { "id": "x" }]));
        assert_ne!(fingerprint(&a), fingerprint(&b));
        assert_eq!(fingerprint(&a), fingerprint(&a));
    }
}
