//! Control discovery.
//!
//! Each control kind has an ordered selector table, most semantic first.
//! A control's rank score comes from the position of the best rule that
//! matched it: `1.0 - index / rules.len()`.

use std::collections::HashMap;

use tracing::{debug, warn};

use pagevoice_protocols::{Control, ControlKind, DomError, ElementSnapshot, NavDirection, PageDom};

use crate::text::contains_phrase;

/// One discovery heuristic.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SelectorRule {
    pub css: &'static str,
    /// Lower-case words, one of which the element's label must contain.
    /// Word needles match on word boundaries; glyph needles match anywhere.
    pub label_contains: Option<&'static [&'static str]>,
    /// Direction for navigation rules.
    pub direction: Option<NavDirection>,
}

impl SelectorRule {
    pub const fn css(css: &'static str) -> Self {
        Self {
            css,
            label_contains: None,
            direction: None,
        }
    }

    pub const fn labelled(css: &'static str, labels: &'static [&'static str]) -> Self {
        Self {
            css,
            label_contains: Some(labels),
            direction: None,
        }
    }

    pub const fn next(self) -> Self {
        Self {
            direction: Some(NavDirection::Next),
            ..self
        }
    }

    pub const fn previous(self) -> Self {
        Self {
            direction: Some(NavDirection::Previous),
            ..self
        }
    }

    fn accepts(&self, element: &ElementSnapshot) -> bool {
        let Some(needles) = self.label_contains else {
            return true;
        };
        let label = label_of(element);
        needles.iter().any(|needle| {
            if needle.chars().any(char::is_alphanumeric) {
                contains_phrase(&label, needle)
            } else {
                label.contains(needle)
            }
        })
    }
}

pub const SEARCH_INPUT_RULES: &[SelectorRule] = &[
    SelectorRule::css("[role=\"searchbox\"]"),
    SelectorRule::css("input[type=\"search\"]"),
    SelectorRule::css("form[role=\"search\"] input"),
    SelectorRule::css("input[name=\"q\"]"),
    SelectorRule::css("input[name=\"query\"], input[name=\"search\"]"),
    SelectorRule::css("input[aria-label*=\"search\" i]"),
    SelectorRule::css("input[placeholder*=\"search\" i]"),
    SelectorRule::css("input[id*=\"search\" i], input[name*=\"search\" i]"),
    SelectorRule::css("input[class*=\"search\" i]"),
    SelectorRule::css("form[action*=\"search\" i] input"),
    SelectorRule::css("[class*=\"search\" i] input"),
    SelectorRule::css("input[type=\"text\"]"),
];

pub const FILTER_CONTROL_RULES: &[SelectorRule] = &[
    SelectorRule::css("input[name*=\"price\" i], select[name*=\"price\" i]"),
    SelectorRule::css("input[id*=\"price\" i], select[id*=\"price\" i]"),
    SelectorRule::css("input[aria-label*=\"price\" i], select[aria-label*=\"price\" i]"),
    SelectorRule::css("input[placeholder*=\"min\" i], input[placeholder*=\"max\" i]"),
    SelectorRule::css("[class*=\"filter\" i] select, [id*=\"filter\" i] select"),
    SelectorRule::css("[class*=\"filter\" i] input, [id*=\"filter\" i] input"),
    SelectorRule::css("[class*=\"facet\" i] input, [class*=\"facet\" i] select"),
    SelectorRule::css("input[type=\"range\"], input[type=\"number\"]"),
    SelectorRule::labelled("button", &["filter", "filters"]),
    SelectorRule::labelled("[role=\"button\"]", &["filter", "filters"]),
    SelectorRule::css("select"),
];

pub const NAV_CONTROL_RULES: &[SelectorRule] = &[
    SelectorRule::css("a[rel=\"next\"]").next(),
    SelectorRule::css("a[rel=\"prev\"], a[rel=\"previous\"]").previous(),
    SelectorRule::css("[aria-label*=\"next page\" i]").next(),
    SelectorRule::css("[aria-label*=\"previous page\" i]").previous(),
    SelectorRule::css("a[aria-label*=\"next\" i], button[aria-label*=\"next\" i]").next(),
    SelectorRule::css("a[aria-label*=\"prev\" i], button[aria-label*=\"prev\" i]").previous(),
    SelectorRule::css("a[class*=\"next\" i], button[class*=\"next\" i]").next(),
    SelectorRule::css("a[class*=\"prev\" i], button[class*=\"prev\" i]").previous(),
    SelectorRule::labelled("[class*=\"pagination\" i] a", &["next"]).next(),
    SelectorRule::labelled("[class*=\"pagination\" i] a", &["prev", "previous"]).previous(),
    SelectorRule::labelled("a", &["next"]).next(),
    SelectorRule::labelled("a", &["prev", "previous"]).previous(),
    SelectorRule::labelled("button", &["next"]).next(),
    SelectorRule::labelled("button", &["prev", "previous"]).previous(),
    SelectorRule::labelled("a", &["more results"]).next(),
    SelectorRule::labelled("button", &["more results"]).next(),
    SelectorRule::labelled("button", &["load more"]).next(),
    SelectorRule::labelled("a", &["\u{203a}"]).next(),
    SelectorRule::labelled("a", &["\u{2039}"]).previous(),
];

pub fn rules_for(kind: ControlKind) -> &'static [SelectorRule] {
    match kind {
        ControlKind::SearchInput => SEARCH_INPUT_RULES,
        ControlKind::FilterControl => FILTER_CONTROL_RULES,
        ControlKind::NavControl => NAV_CONTROL_RULES,
    }
}

/// Discover visible controls of `kind`, best first. Never mutates the page.
pub async fn discover(page: &dyn PageDom, kind: ControlKind) -> Vec<Control> {
    discover_with(page, kind, rules_for(kind)).await
}

/// Discover with an explicit rule table.
///
/// A rule whose selector the page rejects, or whose query fails, is logged
/// and skipped. Elements are merged by [`ElementSnapshot::identity`], since
/// some backends hand out a fresh handle on every query.
pub async fn discover_with(
    page: &dyn PageDom,
    kind: ControlKind,
    rules: &[SelectorRule],
) -> Vec<Control> {
    let total = rules.len() as f64;
    let mut controls: Vec<Control> = Vec::new();
    let mut seen: HashMap<String, usize> = HashMap::new();

    for (index, rule) in rules.iter().enumerate() {
        let elements = match page.query_all(rule.css).await {
            Ok(elements) => elements,
            Err(DomError::InvalidSelector { selector, reason }) => {
                warn!("Skipping malformed selector '{}': {}", selector, reason);
                continue;
            }
            Err(e) => {
                warn!("Skipping selector '{}': {}", rule.css, e);
                continue;
            }
        };

        let score = 1.0 - index as f64 / total;
        for element in elements {
            if !element.is_visible() || !rule.accepts(&element) || !fits_kind(kind, &element) {
                continue;
            }
            let key = element.identity().to_string();
            if let Some(&existing) = seen.get(&key) {
                if controls[existing].rank_score() >= score {
                    continue;
                }
            }
            let mut control = Control::new(element, kind, rule.css, score);
            if let Some(direction) = rule.direction {
                control = control.with_direction(direction);
            }
            match seen.get(&key) {
                Some(&existing) => controls[existing] = control,
                None => {
                    seen.insert(key, controls.len());
                    controls.push(control);
                }
            }
        }
    }

    controls.sort_by(|a, b| {
        b.rank_score()
            .partial_cmp(&a.rank_score())
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    debug!("Discovered {} {} candidate(s)", controls.len(), kind);
    controls
}

/// Search inputs must take typed text.
fn fits_kind(kind: ControlKind, element: &ElementSnapshot) -> bool {
    match kind {
        ControlKind::SearchInput => {
            element.accepts_text() || element.attributes.role.as_deref() == Some("searchbox")
        }
        ControlKind::FilterControl | ControlKind::NavControl => true,
    }
}

/// Lower-cased visible text plus accessible labels.
fn label_of(element: &ElementSnapshot) -> String {
    let attrs = &element.attributes;
    [
        Some(element.text.as_str()),
        attrs.aria_label.as_deref(),
        attrs.title.as_deref(),
        attrs.value.as_deref(),
    ]
    .into_iter()
    .flatten()
    .collect::<Vec<_>>()
    .join(" ")
    .to_lowercase()
}

#[cfg(test)]
#[path = "discovery_tests.rs"]
mod tests;
