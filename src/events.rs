use chrono::NaiveDate;
use serde::Serialize;
use std::collections::HashSet;

use crate::aliases;
use crate::dates;
use crate::normalize::IdentifiedRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EventSource {
    Calendar,
    Assignment,
}

/// One entry of the forward-looking timeline. The id embeds the source and
/// the record's stable id so the same logical event is never duplicated
/// across merge passes.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpcomingEvent {
    pub id: String,
    pub title: String,
    pub date: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub source: EventSource,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip)]
    sort_key: i64,
}

fn audience_includes_students(rec: &IdentifiedRecord) -> bool {
    match rec.string(aliases::EVENT_AUDIENCE) {
        Some(a) => {
            let a = a.to_lowercase();
            a == "all" || a == "students"
        }
        None => false,
    }
}

fn calendar_event(rec: &IdentifiedRecord, today: NaiveDate) -> Option<UpcomingEvent> {
    if !audience_includes_students(rec) {
        return None;
    }
    let start = rec
        .string(aliases::EVENT_START)
        .and_then(|raw| dates::parse_date(&raw))?;
    let end = rec
        .string(aliases::EVENT_END)
        .and_then(|raw| dates::parse_date(&raw))
        .unwrap_or(start);
    // The whole range must not have elapsed: an event ending yesterday is
    // gone, one ending today is still ongoing until 23:59:59.
    if dates::end_of_day(end) < dates::start_of_day(today) {
        return None;
    }

    let date = if end == start {
        dates::format_label(start)
    } else {
        format!(
            "{} – {}",
            dates::format_label(start),
            dates::format_label(end)
        )
    };
    Some(UpcomingEvent {
        id: format!("calendar-{}", rec.id()),
        title: rec
            .string(aliases::EVENT_TITLE)
            .unwrap_or_else(|| "School event".to_string()),
        date,
        description: rec.string(aliases::EVENT_DESCRIPTION),
        source: EventSource::Calendar,
        location: rec.string(aliases::EVENT_LOCATION),
        category: rec.string(aliases::EVENT_CATEGORY),
        sort_key: dates::sort_key(dates::start_of_day(start)),
    })
}

fn assignment_event(rec: &IdentifiedRecord, today: NaiveDate) -> Option<UpcomingEvent> {
    let due = rec
        .string(aliases::ASSIGNMENT_DUE)
        .and_then(|raw| dates::parse_due(&raw))?;
    if due < dates::start_of_day(today) {
        return None;
    }
    let title = rec
        .string(aliases::ASSIGNMENT_TITLE)
        .unwrap_or_else(|| "Untitled".to_string());
    Some(UpcomingEvent {
        id: format!("assignment-{}", rec.id()),
        title: format!("Assignment: {}", title),
        date: dates::format_label(due.date()),
        description: rec.string(aliases::EVENT_DESCRIPTION),
        source: EventSource::Assignment,
        location: None,
        category: None,
        sort_key: dates::sort_key(due),
    })
}

/// Merge published calendar entries and assignment due dates into one
/// deduplicated, chronologically ascending timeline of future-or-ongoing
/// events. Calendar entries sort on their start-of-day, assignments on the
/// exact due instant; the sort is stable and first occurrence wins on id.
pub fn upcoming_events(
    calendar: &[IdentifiedRecord],
    assignments: &[IdentifiedRecord],
    today: NaiveDate,
) -> Vec<UpcomingEvent> {
    let mut merged: Vec<UpcomingEvent> = calendar
        .iter()
        .filter_map(|rec| calendar_event(rec, today))
        .chain(assignments.iter().filter_map(|rec| assignment_event(rec, today)))
        .collect();
    merged.sort_by_key(|e| e.sort_key);

    let mut seen: HashSet<String> = HashSet::new();
    merged.retain(|e| seen.insert(e.id.clone()));
    merged
}
