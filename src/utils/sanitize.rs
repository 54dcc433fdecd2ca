use std::sync::LazyLock;

use regex::Regex;

static TAGS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<[^>]*>").expect("tag pattern is valid"));

static WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("whitespace pattern is valid"));

static NOT_KEY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-z0-9_\-]").expect("key pattern is valid"));

/// Plain single-line text: markup stripped, whitespace collapsed, trimmed.
pub fn text_field(input: &str) -> String {
    let stripped = TAGS.replace_all(input, "");
    WHITESPACE.replace_all(&stripped, " ").trim().to_string()
}

/// Machine key: lowercased, anything outside `[a-z0-9_-]` removed.
pub fn key(input: &str) -> String {
    NOT_KEY.replace_all(&input.to_lowercase(), "").into_owned()
}

/// Clean HTML content using the ammonia library.
///
/// Whitelist-based: safe tags (like <b>, <p>) survive, while <script>, <iframe>
/// and event-handler attributes are removed. Used for option text, which is
/// stored for audit and may be rendered by admin tooling.
pub fn rich_text(input: &str) -> String {
    ammonia::clean(input)
}

/// Truncates to at most `max` characters, never splitting a code point.
pub fn truncate_chars(input: &str, max: usize) -> String {
    match input.char_indices().nth(max) {
        Some((idx, _)) => input[..idx].to_string(),
        None => input.to_string(),
    }
}
