//! Rule-based intent classification.

use std::sync::Arc;

use tracing::debug;

use pagevoice_protocols::{Intent, IntentKind};

use crate::text::contains_phrase;

/// Keywords for one intent, with the confidence a match carries.
#[derive(Debug, Clone, Copy)]
pub struct KeywordRule {
    pub kind: IntentKind,
    pub confidence: f32,
    pub keywords: &'static [&'static str],
}

/// Intent keyword table in priority order: the first rule with a matching
/// keyword wins.
pub const INTENT_RULES: &[KeywordRule] = &[
    KeywordRule {
        kind: IntentKind::Search,
        confidence: 0.9,
        keywords: &["search for", "search", "find", "look for", "show me"],
    },
    KeywordRule {
        kind: IntentKind::Filter,
        confidence: 0.8,
        keywords: &[
            "filter",
            "under",
            "below",
            "less than",
            "cheaper than",
            "above",
            "over",
            "more than",
            "greater than",
            "between",
            "price",
            "rating",
            "stars",
        ],
    },
    KeywordRule {
        kind: IntentKind::Navigate,
        confidence: 0.9,
        keywords: &["next", "more results", "previous", "prev", "back", "page"],
    },
];

/// A statistical classifier that may override the keyword rules.
pub trait IntentModel: Send + Sync {
    fn name(&self) -> &str;

    /// Predict an intent for lower-cased, trimmed text.
    fn predict(&self, text: &str) -> Option<Intent>;
}

/// Keyword-table classification only.
pub fn classify_rules(text: &str) -> Intent {
    let normalized = text.trim().to_lowercase();
    if normalized.is_empty() {
        return Intent::unknown();
    }
    INTENT_RULES
        .iter()
        .find(|rule| rule.keywords.iter().any(|k| contains_phrase(&normalized, k)))
        .map(|rule| Intent::new(rule.kind, rule.confidence))
        .unwrap_or_else(Intent::unknown)
}

/// Intent classifier: keyword rules, optionally superseded by a model.
#[derive(Clone, Default)]
pub struct IntentClassifier {
    model: Option<Arc<dyn IntentModel>>,
    margin: f32,
}

impl IntentClassifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Let `model` override the rules when its confidence exceeds the rule
    /// result by more than `margin`.
    pub fn with_model(mut self, model: Arc<dyn IntentModel>, margin: f32) -> Self {
        self.model = Some(model);
        self.margin = margin.max(0.0);
        self
    }

    pub fn classify(&self, text: &str) -> Intent {
        let rule_intent = classify_rules(text);
        let Some(ref model) = self.model else {
            return rule_intent;
        };

        let normalized = text.trim().to_lowercase();
        match model.predict(&normalized) {
            Some(predicted) if predicted.confidence > rule_intent.confidence + self.margin => {
                debug!(
                    "Model {} overrides {} ({:.2}) with {} ({:.2})",
                    model.name(),
                    rule_intent.kind,
                    rule_intent.confidence,
                    predicted.kind,
                    predicted.confidence
                );
                if predicted.is_unknown() {
                    Intent::unknown()
                } else {
                    predicted
                }
            }
            _ => rule_intent,
        }
    }
}

impl std::fmt::Debug for IntentClassifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IntentClassifier")
            .field("model", &self.model.as_ref().map(|m| m.name().to_string()))
            .field("margin", &self.margin)
            .finish()
    }
}

#[cfg(test)]
#[path = "classifier_tests.rs"]
mod tests;
