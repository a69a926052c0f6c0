//! Turns raw product fields into the text report shown to users.

pub mod badges;
pub mod messages;
pub mod normalize;

use crate::site::models::{ProductQuery, RawProductInfo};
use crate::site::selectors::keywords;
use regex::Regex;
use serde::Serialize;
use std::fmt;
use std::sync::LazyLock;

pub use normalize::normalize;

/// Descriptions must be longer than this, in characters, to be shown.
const MIN_DESCRIPTION_CHARS: usize = 10;

static STORE_PROMPT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!("(?i){}", regex::escape(keywords::STORE_PROMPT))).unwrap()
});

static STORE_PROMPT_FULL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!("(?i){}", regex::escape(keywords::STORE_PROMPT_FULL))).unwrap()
});

/// Report sections, declared in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionKind {
    Components,
    Price,
    Description,
    Ingredients,
}

impl SectionKind {
    pub fn label(&self) -> &'static str {
        match self {
            SectionKind::Components => messages::COMPONENTS_LABEL,
            SectionKind::Price => messages::PRICE_LABEL,
            SectionKind::Description => messages::DESCRIPTION_LABEL,
            SectionKind::Ingredients => messages::INGREDIENTS_LABEL,
        }
    }
}

impl fmt::Display for SectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SectionKind::Components => write!(f, "components"),
            SectionKind::Price => write!(f, "price"),
            SectionKind::Description => write!(f, "description"),
            SectionKind::Ingredients => write!(f, "ingredients"),
        }
    }
}

/// One labeled part of a report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Section {
    pub kind: SectionKind,
    pub body: String,
}

impl Section {
    fn new(kind: SectionKind, body: impl Into<String>) -> Self {
        Self { kind, body: body.into() }
    }

    pub fn label(&self) -> &'static str {
        self.kind.label()
    }

    /// The section as it appears in the plain-text report.
    pub fn render(&self) -> String {
        match self.kind {
            // The component list goes under its heading, separated by a blank line
            SectionKind::Components => format!("{}\n\n{}", self.label(), self.body),
            _ => format!("{} {}", self.label(), self.body),
        }
    }
}

/// A finished product report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormattedReport {
    query: String,
    sections: Vec<Section>,
}

impl FormattedReport {
    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    /// True when no section could be built.
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// Plain text ready for display. Never empty.
    pub fn render(&self) -> String {
        if self.sections.is_empty() {
            return messages::no_details(&self.query);
        }
        self.sections.iter().map(Section::render).collect::<Vec<_>>().join("\n\n")
    }
}

impl fmt::Display for FormattedReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

/// Builds the report for `query` from raw extracted fields.
pub fn format_report(info: &RawProductInfo, query: &ProductQuery) -> FormattedReport {
    let sections = [
        components_section(&info.badge_text),
        price_section(&info.price),
        description_section(&info.description, query),
        ingredients_section(&info.ingredients),
    ]
    .into_iter()
    .flatten()
    .collect();

    FormattedReport { query: query.normalized().to_string(), sections }
}

fn components_section(raw: &str) -> Option<Section> {
    let components = badges::split_components(&normalize(raw));
    if components.is_empty() {
        return None;
    }
    Some(Section::new(SectionKind::Components, badges::bullet_list(&components)))
}

fn price_section(raw: &str) -> Option<Section> {
    let price = normalize(raw);
    if price.is_empty() || STORE_PROMPT.is_match(&price) {
        return None;
    }
    Some(Section::new(SectionKind::Price, price))
}

fn description_section(raw: &str, query: &ProductQuery) -> Option<Section> {
    let text = normalize(raw);

    let description = if STORE_PROMPT_FULL.is_match(&text) {
        match STORE_PROMPT.find(&text) {
            Some(prompt) => text[..prompt.start()].trim(),
            None => text.as_str(),
        }
    } else {
        text.as_str()
    };

    if description.chars().count() <= MIN_DESCRIPTION_CHARS || query.same_name(description) {
        return None;
    }
    Some(Section::new(SectionKind::Description, description))
}

fn ingredients_section(raw: &str) -> Option<Section> {
    let ingredients = normalize(raw);
    if ingredients.is_empty() {
        return None;
    }
    Some(Section::new(SectionKind::Ingredients, ingredients))
}
