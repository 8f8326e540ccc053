use hashbrown::HashSet;

/// Distinct keyword list for a comparison pass: trimmed, blanks dropped,
/// first occurrence wins.
pub fn extract_keywords<S: AsRef<str>>(values: impl IntoIterator<Item = S>) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut keywords = Vec::new();
    for value in values {
        let value = value.as_ref().trim();
        if value.is_empty() || !seen.insert(value.to_string()) {
            continue;
        }
        keywords.push(value.to_string());
    }
    keywords
}
