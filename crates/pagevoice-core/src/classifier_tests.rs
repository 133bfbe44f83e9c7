use super::*;

struct FixedModel(Intent);

impl IntentModel for FixedModel {
    fn name(&self) -> &str {
        "fixed"
    }

    fn predict(&self, _text: &str) -> Option<Intent> {
        Some(self.0)
    }
}

#[test]
fn test_search_keyword() {
    let intent = classify_rules("search for blue jeans");
    assert_eq!(intent.kind, IntentKind::Search);
    assert_eq!(intent.confidence, 0.9);
}

#[test]
fn test_search_keyword_only() {
    for text in ["search", "Find", "  look for  ", "SHOW ME"] {
        let intent = classify_rules(text);
        assert_eq!(intent.kind, IntentKind::Search, "{}", text);
        assert_eq!(intent.confidence, 0.9);
    }
}

#[test]
fn test_filter_keyword() {
    let intent = classify_rules("price under 100");
    assert_eq!(intent.kind, IntentKind::Filter);
    assert_eq!(intent.confidence, 0.8);
}

#[test]
fn test_navigate_keyword() {
    for text in ["next page", "more results", "go back", "previous"] {
        let intent = classify_rules(text);
        assert_eq!(intent.kind, IntentKind::Navigate, "{}", text);
        assert_eq!(intent.confidence, 0.9);
    }
}

#[test]
fn test_priority_search_over_filter() {
    let intent = classify_rules("search for red shoes under $100");
    assert_eq!(intent.kind, IntentKind::Search);
}

#[test]
fn test_priority_filter_over_navigate() {
    let intent = classify_rules("next page under 50");
    assert_eq!(intent.kind, IntentKind::Filter);
}

#[test]
fn test_unknown() {
    for text in ["", "   ", "hello there", "discover"] {
        let intent = classify_rules(text);
        assert!(intent.is_unknown(), "{}", text);
        assert_eq!(intent.confidence, 0.0);
    }
}

#[test]
fn test_keywords_are_word_bounded() {
    assert!(classify_rules("context").is_unknown());
    assert!(classify_rules("finder").is_unknown());
}

#[test]
fn test_classifier_without_model_uses_rules() {
    let classifier = IntentClassifier::new();
    assert_eq!(classifier.classify("next").kind, IntentKind::Navigate);
}

#[test]
fn test_model_overrides_only_past_margin() {
    let strong = Arc::new(FixedModel(Intent::new(IntentKind::Filter, 0.95)));
    let classifier = IntentClassifier::new().with_model(strong, 0.1);
    // 0.95 does not beat 0.9 + 0.1
    assert_eq!(classifier.classify("find shoes").kind, IntentKind::Search);
    // Unknown rule result has zero confidence.
    assert_eq!(classifier.classify("hello").kind, IntentKind::Filter);
}

#[test]
fn test_model_with_zero_margin() {
    let model = Arc::new(FixedModel(Intent::new(IntentKind::Navigate, 0.85)));
    let classifier = IntentClassifier::new().with_model(model, 0.0);
    assert_eq!(classifier.classify("price under 5").kind, IntentKind::Navigate);
    assert_eq!(classifier.classify("search shoes").kind, IntentKind::Search);
}

#[test]
fn test_classifier_debug_names_model() {
    let model = Arc::new(FixedModel(Intent::unknown()));
    let classifier = IntentClassifier::new().with_model(model, 0.2);
    assert!(format!("{:?}", classifier).contains("fixed"));
}
