//! Classified intent and the slots extracted for it.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The closed set of command intents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IntentKind {
    Search,
    Filter,
    Navigate,
    Unknown,
}

impl fmt::Display for IntentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IntentKind::Search => write!(f, "search"),
            IntentKind::Filter => write!(f, "filter"),
            IntentKind::Navigate => write!(f, "navigate"),
            IntentKind::Unknown => write!(f, "unknown"),
        }
    }
}

/// A classified intent with its confidence in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Intent {
    pub kind: IntentKind,
    pub confidence: f32,
}

impl Intent {
    pub fn new(kind: IntentKind, confidence: f32) -> Self {
        Self {
            kind,
            confidence: confidence.clamp(0.0, 1.0),
        }
    }

    /// `Unknown` always carries zero confidence.
    pub fn unknown() -> Self {
        Self {
            kind: IntentKind::Unknown,
            confidence: 0.0,
        }
    }

    pub fn is_unknown(&self) -> bool {
        self.kind == IntentKind::Unknown
    }
}

/// Filter comparison operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Comparator {
    Lt,
    Gt,
    Eq,
    Between,
}

impl fmt::Display for Comparator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Comparator::Lt => write!(f, "under"),
            Comparator::Gt => write!(f, "over"),
            Comparator::Eq => write!(f, "equal to"),
            Comparator::Between => write!(f, "between"),
        }
    }
}

/// Pagination direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NavDirection {
    Next,
    Previous,
}

impl fmt::Display for NavDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NavDirection::Next => write!(f, "next"),
            NavDirection::Previous => write!(f, "previous"),
        }
    }
}

/// Parameters of a filter command.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterSlots {
    pub dimension: String,
    pub comparator: Comparator,
    /// Numeric value of the first number in the command.
    pub value: f64,
    /// The number as spoken, e.g. `$1,200`.
    pub raw_value: String,
    /// Upper bound, present only for [`Comparator::Between`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value_high: Option<f64>,
}

impl fmt::Display for FilterSlots {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.comparator, self.value_high) {
            (Comparator::Between, Some(high)) => write!(
                f,
                "{} between {} and {}",
                self.dimension,
                format_number(self.value),
                format_number(high)
            ),
            (comparator, _) => write!(
                f,
                "{} {} {}",
                self.dimension,
                comparator,
                format_number(self.value)
            ),
        }
    }
}

impl FilterSlots {
    /// The primary value as it should be typed into a field.
    pub fn value_text(&self) -> String {
        format_number(self.value)
    }
}

fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{}", value)
    }
}

/// Intent-specific parameters.
///
/// Each variant belongs to exactly one intent, so slots can never disagree
/// with the intent they were extracted for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "intent", rename_all = "lowercase")]
pub enum Slots {
    Search { query: String },
    Filter(FilterSlots),
    Navigate { direction: NavDirection },
}

impl Slots {
    /// The intent these slots belong to.
    pub fn intent_kind(&self) -> IntentKind {
        match self {
            Slots::Search { .. } => IntentKind::Search,
            Slots::Filter(_) => IntentKind::Filter,
            Slots::Navigate { .. } => IntentKind::Navigate,
        }
    }
}
