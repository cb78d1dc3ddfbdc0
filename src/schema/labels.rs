//! Label helpers for form widgets

/// Prefixes carried by generated option names that are noise in the UI
pub const KNOWN_PREFIXES: &[&str] = &["CONDITION_", "COMBINATOR_", "LOG_CHANNEL_"];

/// Uppercase the first character
pub fn capitalize(key: &str) -> String {
    let mut chars = key.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// `max_speed` -> `Max speed`
pub fn humanize_key(key: &str) -> String {
    capitalize(&key.replace('_', " "))
}

/// Drop the first matching prefix from [`KNOWN_PREFIXES`]
pub fn strip_known_prefixes(label: &str) -> &str {
    KNOWN_PREFIXES
        .iter()
        .find_map(|prefix| label.strip_prefix(prefix))
        .filter(|rest| !rest.is_empty())
        .unwrap_or(label)
}

/// Label for the `index`-th element of an array field: `conditions`, 1 -> `Condition 2`
pub fn element_label(key: &str, index: usize) -> String {
    let singular = if let Some(stem) = key.strip_suffix("ies") {
        format!("{}y", stem)
    } else if key.len() > 1 && key.ends_with('s') && !key.ends_with("ss") {
        key[..key.len() - 1].to_string()
    } else {
        key.to_string()
    };
    format!("{} {}", humanize_key(&singular), index + 1)
}
