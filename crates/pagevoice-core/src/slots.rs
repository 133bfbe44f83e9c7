//! Slot extraction for classified commands.

use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use pagevoice_protocols::{Comparator, FilterSlots, Intent, IntentKind, NavDirection, Slots};

use crate::text::{contains_phrase, find_phrase, last_phrase_end_before};

/// Prefixes stripped from search commands.
pub const SEARCH_PREFIXES: &[&str] = &["search for", "search", "find", "look for", "show me"];

/// Filter dimensions and the words that name them.
pub const FILTER_DIMENSIONS: &[(&str, &[&str])] = &[
    ("price", &["price", "cost", "costs", "priced"]),
    ("rating", &["rating", "rated", "stars", "star"]),
    ("size", &["size"]),
    ("year", &["year"]),
    ("distance", &["distance", "within"]),
];

pub const DEFAULT_DIMENSION: &str = "price";

/// Comparator keywords read before the number; the one closest to it wins.
pub const COMPARATOR_KEYWORDS: &[(Comparator, &[&str])] = &[
    (Comparator::Between, &["between"]),
    (
        Comparator::Lt,
        &["under", "below", "less than", "cheaper than", "lower than", "at most", "up to"],
    ),
    (
        Comparator::Gt,
        &["above", "over", "more than", "greater than", "higher than", "at least"],
    ),
    (Comparator::Eq, &["exactly", "equal to", "equals"]),
];

/// Trailing qualifiers read when no comparator precedes the number, as in
/// "4 stars and above".
pub const TRAILING_COMPARATORS: &[(Comparator, &[&str])] = &[
    (Comparator::Lt, &["or less", "and below", "and under", "or cheaper", "max"]),
    (Comparator::Gt, &["or more", "and above", "and up", "or higher", "plus"]),
];

pub const NEXT_KEYWORDS: &[&str] = &["next", "more results", "forward"];
pub const PREVIOUS_KEYWORDS: &[&str] = &["previous", "prev", "back"];

static NUMBER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$?\d[\d,]*(?:\.\d+)?").unwrap());

/// Case-insensitive, word-bounded alternation of [`SEARCH_PREFIXES`]. At a
/// given position the table order decides, so "search for" beats "search".
static SEARCH_PREFIX_RE: LazyLock<Regex> = LazyLock::new(|| {
    let alternatives: Vec<String> = SEARCH_PREFIXES
        .iter()
        .map(|prefix| {
            prefix
                .split_whitespace()
                .map(regex::escape)
                .collect::<Vec<_>>()
                .join(r"\s+")
        })
        .collect();
    Regex::new(&format!(r"(?i)\b(?:{})\b", alternatives.join("|"))).unwrap()
});

/// Extract the parameters for `intent` from the raw command text.
///
/// Returns `None` for `Unknown` intents and whenever the intent's required
/// parameters are missing.
pub fn extract(text: &str, intent: &Intent) -> Option<Slots> {
    let slots = match intent.kind {
        IntentKind::Search => Some(extract_search(text)),
        IntentKind::Filter => extract_filter(text).map(Slots::Filter),
        IntentKind::Navigate => extract_direction(text).map(|direction| Slots::Navigate { direction }),
        IntentKind::Unknown => None,
    };
    if slots.is_none() {
        debug!("No {} slots in '{}'", intent.kind, text);
    }
    slots
}

/// The text after the earliest search prefix, with its original casing.
fn extract_search(text: &str) -> Slots {
    let trimmed = text.trim();
    let query = match SEARCH_PREFIX_RE.find(trimmed) {
        Some(prefix) => trimmed[prefix.end()..].trim(),
        None => trimmed,
    };
    Slots::Search {
        query: query.to_string(),
    }
}

fn extract_filter(text: &str) -> Option<FilterSlots> {
    let lower = text.trim().to_lowercase();
    let mut numbers = NUMBER_RE.find_iter(&lower);
    let first = numbers.next()?;
    let value = parse_number(first.as_str())?;

    let before = &lower[..first.start()];
    let dimension = FILTER_DIMENSIONS
        .iter()
        .filter_map(|(name, words)| {
            words
                .iter()
                .filter_map(|w| last_phrase_end_before(before, w, before.len()))
                .max()
                .map(|end| (end, *name))
        })
        .max_by_key(|(end, _)| *end)
        .map(|(_, name)| name)
        .unwrap_or(DEFAULT_DIMENSION);

    let comparator = COMPARATOR_KEYWORDS
        .iter()
        .filter_map(|(comparator, words)| {
            words
                .iter()
                .filter_map(|w| last_phrase_end_before(before, w, before.len()))
                .max()
                .map(|end| (end, *comparator))
        })
        .max_by_key(|(end, _)| *end)
        .map(|(_, comparator)| comparator)
        .or_else(|| trailing_comparator(&lower[first.end()..]))
        .unwrap_or(Comparator::Eq);

    let mut slots = FilterSlots {
        dimension: dimension.to_string(),
        comparator,
        value,
        raw_value: first.as_str().to_string(),
        value_high: None,
    };

    if comparator == Comparator::Between {
        let second = numbers.next()?;
        let high = parse_number(second.as_str())?;
        if high < value {
            slots.value = high;
            slots.raw_value = second.as_str().to_string();
            slots.value_high = Some(value);
        } else {
            slots.value_high = Some(high);
        }
    }

    Some(slots)
}

fn trailing_comparator(after: &str) -> Option<Comparator> {
    TRAILING_COMPARATORS
        .iter()
        .filter_map(|(comparator, words)| {
            words
                .iter()
                .filter_map(|w| find_phrase(after, w))
                .min()
                .map(|start| (start, *comparator))
        })
        .min_by_key(|(start, _)| *start)
        .map(|(_, comparator)| comparator)
}

fn extract_direction(text: &str) -> Option<NavDirection> {
    let lower = text.trim().to_lowercase();
    if NEXT_KEYWORDS.iter().any(|k| contains_phrase(&lower, k)) {
        Some(NavDirection::Next)
    } else if PREVIOUS_KEYWORDS.iter().any(|k| contains_phrase(&lower, k)) {
        Some(NavDirection::Previous)
    } else {
        None
    }
}

fn parse_number(token: &str) -> Option<f64> {
    let digits: String = token.chars().filter(|c| *c != '$' && *c != ',').collect();
    digits.parse().ok()
}

#[cfg(test)]
#[path = "slots_tests.rs"]
mod tests;
