use std::collections::HashSet;

/// Honorific prefixes dropped from the normalized name forms so
/// "Mrs. Jane Doe" and "jane doe" land on a shared token.
const HONORIFICS: &[&str] = &[
    "mr", "mrs", "ms", "miss", "master", "dr", "prof", "rev", "sir", "engr", "mallam", "alhaji",
];

/// Comparison tokens for a teacher-name-like string: the lowercased raw
/// form, a punctuation-collapsed form, and an alphanumeric-only form, the
/// latter two with leading honorifics stripped. Two names denote the same
/// teacher when their token sets intersect. Blank input yields the empty
/// set. Pure string heuristic: homonyms stay ambiguous.
pub fn name_tokens(raw: &str) -> HashSet<String> {
    let trimmed = raw.trim();
    let mut out = HashSet::new();
    if trimmed.is_empty() {
        return out;
    }
    let lower = trimmed.to_lowercase();
    out.insert(lower.clone());

    let words: Vec<&str> = lower
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .collect();
    let mut start = 0usize;
    // Keep at least one word so "Dr" alone still tokenizes.
    while start + 1 < words.len() && HONORIFICS.contains(&words[start]) {
        start += 1;
    }
    let stripped = &words[start..];
    if !stripped.is_empty() {
        out.insert(stripped.join(" "));
        out.insert(stripped.concat());
    }
    out
}

/// Class identifiers compare after stripping all whitespace and case:
/// "JSS 2B" and "jss2b" are the same class.
pub fn class_key(raw: &str) -> String {
    raw.chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}
