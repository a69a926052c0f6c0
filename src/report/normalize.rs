//! Cleaning of raw text pulled from product pages.

use regex::Regex;
use std::sync::LazyLock;

static TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]+>").unwrap());

static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// Anything that is not a word character, whitespace, Thai, or listed punctuation.
///
/// `|` and `•` stay so badge separators survive into the report formatter.
static DISALLOWED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\w\s\x{0E00}-\x{0E7F}.,!?()|•-]").unwrap());

/// Cleans extracted text for display.
///
/// Strips markup tags, collapses whitespace, drops characters outside the
/// allow-list, and trims. Whitespace is collapsed again after filtering so
/// that `normalize(normalize(x)) == normalize(x)` holds for every input.
pub fn normalize(raw: &str) -> String {
    let text = TAG.replace_all(raw, "");
    let text = WHITESPACE.replace_all(&text, " ");
    let text = DISALLOWED.replace_all(&text, "");
    WHITESPACE.replace_all(&text, " ").trim().to_string()
}
