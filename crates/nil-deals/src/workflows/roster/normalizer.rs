/// Strip zero-width characters, collapse whitespace, and lowercase so header
/// variants from different spreadsheet exports compare equal.
pub(crate) fn normalize_header(value: &str) -> String {
    let cleaned = value.replace(['\u{feff}', '\u{200b}'], "");
    let collapsed = cleaned.split_whitespace().collect::<Vec<_>>().join(" ");
    collapsed.to_ascii_lowercase()
}

/// Social handles are stored without the leading `@`.
pub(crate) fn normalize_handle(value: &str) -> String {
    value.trim().trim_start_matches('@').to_string()
}

/// Phone numbers are stored digits-only.
pub(crate) fn digits_only(value: &str) -> String {
    value.chars().filter(char::is_ascii_digit).collect()
}
