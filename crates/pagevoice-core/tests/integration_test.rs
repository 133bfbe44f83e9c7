//! End-to-end command scenarios against snapshot pages.

use std::sync::Arc;

use pagevoice_core::{
    discover, ActionExecutor, CommandEngine, SessionState, TextTranscriber, VoiceController,
};
use pagevoice_page_snapshot::{Mutation, NodeSpec, PageSpec, SnapshotPage};
use pagevoice_protocols::{ActionPlan, Command, ControlKind, DomEvent, PlanGoal};

fn shop() -> SnapshotPage {
    SnapshotPage::from_json(include_str!("fixtures/shop.json")).unwrap()
}

#[tokio::test]
async fn test_search_sets_value_and_dispatches_events() {
    let page = SnapshotPage::from_spec(
        PageSpec::new("https://x.test/")
            .child(NodeSpec::new("input").attr("type", "search").attr("id", "q")),
    );
    let result = CommandEngine::new()
        .handle(&page, &Command::new("search for blue jeans", 0.9))
        .await;

    assert!(result.success);
    assert_eq!(result.message, "Searched for: blue jeans");

    let q = page.find_by_id("q").unwrap();
    assert_eq!(page.value_of(&q).as_deref(), Some("blue jeans"));
    let mutations = page.mutations();
    assert!(mutations.contains(&Mutation::Event {
        element: q.clone(),
        event: DomEvent::Input
    }));
    assert!(mutations.contains(&Mutation::Event {
        element: q.clone(),
        event: DomEvent::Change
    }));
}

#[tokio::test]
async fn test_next_page_without_pagination() {
    let page = SnapshotPage::from_spec(
        PageSpec::new("https://x.test/")
            .child(NodeSpec::new("input").attr("type", "search").attr("id", "q")),
    );
    let result = CommandEngine::new()
        .handle(&page, &Command::new("next page", 0.9))
        .await;
    assert!(!result.success);
    assert_eq!(result.message, "No next button found on this page");
    assert!(page.mutations().is_empty());
}

#[tokio::test]
async fn test_search_keeps_trailing_filter_words() {
    let page = shop();
    let result = CommandEngine::new()
        .handle(&page, &Command::new("search for red shoes under $100", 0.9))
        .await;
    assert_eq!(result.message, "Searched for: red shoes under $100");

    let form = page.find_by_id("site-search").unwrap();
    assert_eq!(page.mutations().last(), Some(&Mutation::Submit { form }));
}

#[tokio::test]
async fn test_navigation_on_catalog() {
    let page = shop();
    let engine = CommandEngine::new();

    let result = engine.handle(&page, &Command::new("next page", 0.9)).await;
    assert_eq!(result.message, "Went to next page");
    let next = page.find_by_id("next").unwrap();
    assert_eq!(page.mutations(), vec![Mutation::Click { element: next }]);

    page.clear_mutations();
    let result = engine.handle(&page, &Command::new("go back", 0.9)).await;
    assert_eq!(result.message, "Went to previous page");
    let prev = page.find_by_id("prev").unwrap();
    assert_eq!(page.mutations(), vec![Mutation::Click { element: prev }]);
}

#[tokio::test]
async fn test_filter_on_catalog() {
    let page = shop();
    let result = CommandEngine::new()
        .handle(&page, &Command::new("price under $50", 0.9))
        .await;
    assert!(result.success);
    assert_eq!(result.message, "Filter attempted: price under 50");
    let price = page.find_by_id("price-max").unwrap();
    assert_eq!(page.value_of(&price).as_deref(), Some("50"));
}

#[tokio::test]
async fn test_rerendered_search_box() {
    let page = shop();
    let controls = discover(&page, ControlKind::SearchInput).await;
    assert_eq!(controls.len(), 1);

    // The page re-renders between discovery and execution.
    page.detach(controls[0].handle());
    let plan = ActionPlan::new(
        PlanGoal::Search {
            query: "jeans".to_string(),
        },
        controls
            .into_iter()
            .map(|control| pagevoice_protocols::PlannedAction {
                control,
                operation: pagevoice_protocols::Operation::SetValueAndSubmit {
                    value: "jeans".to_string(),
                },
                confidence: 0.9,
            })
            .collect(),
    );
    let result = ActionExecutor::new().execute(&page, &plan).await;
    assert!(!result.success);
    assert_eq!(
        result.message,
        "Could not search: page controls are no longer available"
    );
}

#[tokio::test]
async fn test_discovery_is_stable() {
    let page = shop();
    for kind in [
        ControlKind::SearchInput,
        ControlKind::FilterControl,
        ControlKind::NavControl,
    ] {
        assert_eq!(discover(&page, kind).await, discover(&page, kind).await);
    }
    assert!(page.mutations().is_empty());
}

#[tokio::test]
async fn test_voice_session_end_to_end() {
    let page = Arc::new(shop());
    let mut controller = VoiceController::new(
        Arc::new(TextTranscriber::new("show me more results", 0.9)),
        CommandEngine::new(),
        page.clone(),
    );
    assert!(controller.press());
    assert!(!controller.press());
    assert_eq!(controller.release().await, SessionState::Reporting);
    let result = controller.acknowledge().unwrap();
    // "show me" is a search prefix, so this is a search for "more results".
    assert_eq!(result.message, "Searched for: more results");
    assert_eq!(controller.state(), SessionState::Idle);
}
