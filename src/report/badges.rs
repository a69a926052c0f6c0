//! Splitting badge text into bundled components.
//!
//! Badge markup varies between products, so the text is split by the first
//! rule in [`BadgeRule::PRIORITY`] that applies. The order is significant and
//! rules overlap on purpose; keep it stable unless new page samples say
//! otherwise.

use crate::cascade::first_match;
use regex::Regex;
use std::sync::LazyLock;

/// Separator the extractor puts between badge elements.
pub const SEPARATOR: char = '|';

/// Bullet used by some badge layouts and by the rendered report.
pub const BULLET: char = '•';

/// Quantity and side-item markers; a component starts at each match.
static COUNT_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\d+\s*PCS\.|SIDE\s*ITEM").unwrap());

static SPACE_RUN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s{2,}").unwrap());

static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// A way of cutting badge text into components.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BadgeRule {
    /// Text contains the extractor's `|` separator.
    Separator,
    /// Text mentions piece counts or side items.
    CountMarkers,
    /// Text is already bulleted with `•`.
    Bullet,
    /// Runs of two or more spaces. Always applies.
    SpaceRuns,
}

impl BadgeRule {
    /// Rules in the order they are tried.
    pub const PRIORITY: [BadgeRule; 4] =
        [BadgeRule::Separator, BadgeRule::CountMarkers, BadgeRule::Bullet, BadgeRule::SpaceRuns];

    /// Returns true if this rule should split `text`.
    pub fn applies(&self, text: &str) -> bool {
        match self {
            BadgeRule::Separator => text.contains(SEPARATOR),
            BadgeRule::CountMarkers => {
                let upper = text.to_uppercase();
                upper.contains("PCS.") || upper.contains("SIDE ITEM")
            }
            BadgeRule::Bullet => text.contains(BULLET),
            BadgeRule::SpaceRuns => true,
        }
    }

    /// Splits `text` into trimmed, non-empty pieces.
    pub fn split(&self, text: &str) -> Vec<String> {
        let pieces: Vec<String> = match self {
            BadgeRule::Separator => text.split(SEPARATOR).map(String::from).collect(),
            BadgeRule::CountMarkers => split_before_markers(text)
                .into_iter()
                .map(|piece| WHITESPACE.replace_all(piece, " ").into_owned())
                .collect(),
            BadgeRule::Bullet => text.split(BULLET).map(String::from).collect(),
            BadgeRule::SpaceRuns => SPACE_RUN.split(text).map(String::from).collect(),
        };

        pieces
            .into_iter()
            .map(|piece| piece.trim().to_string())
            .filter(|piece| !piece.is_empty())
            .collect()
    }
}

/// Cuts `text` at the start of every quantity or side-item marker.
fn split_before_markers(text: &str) -> Vec<&str> {
    let mut pieces = Vec::new();
    let mut start = 0;

    for marker in COUNT_MARKER.find_iter(text) {
        if marker.start() > start {
            pieces.push(&text[start..marker.start()]);
            start = marker.start();
        }
    }
    pieces.push(&text[start..]);
    pieces
}

/// Splits normalized badge text into components using the first applicable rule.
pub fn split_components(text: &str) -> Vec<String> {
    first_match(&BadgeRule::PRIORITY, |rule| rule.applies(text).then(|| rule.split(text)))
        .map(|hit| hit.value)
        .unwrap_or_default()
}

/// Renders components as bullet lines.
pub fn bullet_list(components: &[String]) -> String {
    components.iter().map(|c| format!("{} {}", BULLET, c)).collect::<Vec<_>>().join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_separator_rule() {
        assert_eq!(split_components("4 PCS. | SIDE ITEM FRIES"), vec!["4 PCS.", "SIDE ITEM FRIES"]);
        assert_eq!(split_components("a | | b |"), vec!["a", "b"]);
    }

    #[test]
    fn test_separator_beats_count_markers() {
        assert!(BadgeRule::Separator.applies("2 PCS. | drink"));
        assert!(BadgeRule::CountMarkers.applies("2 PCS. | drink"));
        assert_eq!(split_components("2 PCS. SIDE ITEM | drink"), vec!["2 PCS. SIDE ITEM", "drink"]);
    }

    #[test]
    fn test_count_marker_rule() {
        assert_eq!(
            split_components("4 PCS. FRIED CHICKEN SIDE ITEM FRIES 2 PCS. NUGGETS"),
            vec!["4 PCS. FRIED CHICKEN", "SIDE ITEM FRIES", "2 PCS. NUGGETS"]
        );
    }

    #[test]
    fn test_count_markers_case_insensitive() {
        assert!(BadgeRule::CountMarkers.applies("4 pcs. wings"));
        assert_eq!(
            split_components("4 pcs. wings side item coleslaw"),
            vec!["4 pcs. wings", "side item coleslaw"]
        );
    }

    #[test]
    fn test_multi_digit_count_stays_whole() {
        assert_eq!(split_components("Bucket 10 PCS. CHICKEN"), vec!["Bucket", "10 PCS. CHICKEN"]);
    }

    #[test]
    fn test_count_marker_piece_whitespace_collapsed() {
        assert_eq!(BadgeRule::CountMarkers.split("1   PCS.  WINGZ"), vec!["1 PCS. WINGZ"]);
    }

    #[test]
    fn test_bullet_rule() {
        assert_eq!(split_components("• Pepsi • Egg tart"), vec!["Pepsi", "Egg tart"]);
    }

    #[test]
    fn test_space_run_rule() {
        assert_eq!(split_components("Pepsi   Egg tart"), vec!["Pepsi", "Egg tart"]);
        assert_eq!(split_components("Pepsi Egg tart"), vec!["Pepsi Egg tart"]);
    }

    #[test]
    fn test_empty_text() {
        assert!(split_components("").is_empty());
        assert!(split_components("   ").is_empty());
    }

    #[test]
    fn test_bullet_list() {
        let list = bullet_list(&["4 PCS.".to_string(), "SIDE ITEM FRIES".to_string()]);
        assert_eq!(list, "• 4 PCS.\n• SIDE ITEM FRIES");
    }
}
