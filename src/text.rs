use std::sync::LazyLock;

use regex::Regex;

use crate::record::Name;

static TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>").expect("tag pattern"));
static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").expect("space pattern"));

/// Full HTML5 named and numeric entity set, in a single pass, so `&amp;lt;`
/// stays `&lt;`.
pub fn decode_entities(text: &str) -> String {
    html_escape::decode_html_entities(text).into_owned()
}

pub fn strip_tags(text: &str) -> String {
    let spaced = TAG.replace_all(text, |caps: &regex::Captures<'_>| format!(" {} ", &caps[0]));
    let stripped = TAG.replace_all(&spaced, "");
    single_line(&decode_entities(&stripped))
}

pub fn single_line(text: &str) -> String {
    WHITESPACE.replace_all(text.trim(), " ").into_owned()
}

pub fn shorten(text: &str, length: usize) -> String {
    if text.chars().count() <= length {
        return text.to_string();
    }
    let mut cut: String = text.chars().take(length.saturating_sub(1)).collect();
    if let Some(pos) = cut.rfind(' ') {
        cut.truncate(pos);
    }
    cut.push('…');
    cut
}

pub fn author_name(name: &Name) -> Option<String> {
    let parts = [&name.given, &name.family, &name.suffix]
        .into_iter()
        .flatten()
        .map(|part| part.as_str())
        .collect::<Vec<_>>();
    let joined = if parts.is_empty() {
        name.literal.clone().unwrap_or_default()
    } else {
        parts.join(" ")
    };
    let cleaned = single_line(&joined);
    if cleaned.is_empty() {
        None
    } else {
        Some(cleaned)
    }
}
