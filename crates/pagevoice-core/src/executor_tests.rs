use async_trait::async_trait;
use pagevoice_page_snapshot::{Mutation, NodeSpec, PageSpec, SnapshotPage};
use pagevoice_protocols::{
    Comparator, Control, ControlKind, ElementSnapshot, FilterSlots, Intent, NavDirection, PlanGoal,
    Slots,
};

use super::*;
use crate::discovery::discover;
use crate::planner::ActionPlanner;

fn search_slots(query: &str) -> Slots {
    Slots::Search {
        query: query.to_string(),
    }
}

async fn plan_for(page: &dyn PageDom, slots: &Slots, kind: ControlKind) -> ActionPlan {
    let controls = discover(page, kind).await;
    let intent = Intent::new(slots.intent_kind(), 0.9);
    ActionPlanner::default().plan(&intent, slots, &controls).unwrap()
}

fn form_page() -> SnapshotPage {
    SnapshotPage::from_spec(
        PageSpec::new("https://x.test/").child(
            NodeSpec::new("form")
                .attr("id", "f")
                .child(NodeSpec::new("input").attr("id", "q").attr("type", "search")),
        ),
    )
}

#[tokio::test]
async fn test_empty_plan_fails_without_mutation() {
    let page = form_page();
    let plan = ActionPlan::new(
        PlanGoal::Search {
            query: "x".to_string(),
        },
        vec![],
    );
    let result = ActionExecutor::new().execute(&page, &plan).await;
    assert!(!result.success);
    assert_eq!(result.message, "No search box found on this page");
    assert!(page.mutations().is_empty());
}

#[tokio::test]
async fn test_search_submits_enclosing_form() {
    let page = form_page();
    let plan = plan_for(&page, &search_slots("blue jeans"), ControlKind::SearchInput).await;
    let execution = ActionExecutor::new().execute_detailed(&page, &plan).await;

    assert!(execution.result.success);
    assert_eq!(execution.result.message, "Searched for: blue jeans");
    assert_eq!(execution.attempts, vec![AttemptState::Succeeded]);

    let q = page.find_by_id("q").unwrap();
    let form = page.find_by_id("f").unwrap();
    assert_eq!(page.value_of(&q).as_deref(), Some("blue jeans"));
    assert_eq!(
        page.mutations(),
        vec![
            Mutation::SetValue {
                element: q.clone(),
                value: "blue jeans".to_string()
            },
            Mutation::Event {
                element: q.clone(),
                event: DomEvent::Input
            },
            Mutation::Event {
                element: q.clone(),
                event: DomEvent::Change
            },
            Mutation::Submit { form },
        ]
    );
}

#[tokio::test]
async fn test_search_clicks_submit_button_without_form() {
    let page = SnapshotPage::from_spec(
        PageSpec::new("https://x.test/")
            .child(NodeSpec::new("input").attr("id", "q").attr("type", "search"))
            .child(NodeSpec::new("button").attr("id", "go").text("Search")),
    );
    let plan = plan_for(&page, &search_slots("lamps"), ControlKind::SearchInput).await;
    let result = ActionExecutor::new().execute(&page, &plan).await;
    assert!(result.success);

    let go = page.find_by_id("go").unwrap();
    let mutations = page.mutations();
    assert_eq!(mutations.last(), Some(&Mutation::Click { element: go }));
    assert!(!mutations.iter().any(|m| matches!(m, Mutation::Submit { .. })));
}

#[tokio::test]
async fn test_search_falls_back_to_enter_key() {
    let page = SnapshotPage::from_spec(
        PageSpec::new("https://x.test/")
            .child(NodeSpec::new("input").attr("id", "q").attr("type", "search")),
    );
    let plan = plan_for(&page, &search_slots("lamps"), ControlKind::SearchInput).await;
    let result = ActionExecutor::new().execute(&page, &plan).await;
    assert!(result.success);

    let keys: Vec<DomEvent> = page
        .mutations()
        .into_iter()
        .filter_map(|m| match m {
            Mutation::Event { event, .. } if event.key().is_some() => Some(event),
            _ => None,
        })
        .collect();
    assert_eq!(keys, DomEvent::key_sequence("Enter").to_vec());
}

#[tokio::test]
async fn test_stale_primary_falls_back() {
    let page = SnapshotPage::from_spec(
        PageSpec::new("https://x.test/")
            .child(NodeSpec::new("input").attr("id", "q").attr("type", "search"))
            .child(NodeSpec::new("input").attr("id", "alt").attr("placeholder", "Search")),
    );
    let plan = plan_for(&page, &search_slots("tents"), ControlKind::SearchInput).await;
    assert_eq!(plan.len(), 2);

    page.detach(&page.find_by_id("q").unwrap());
    let execution = ActionExecutor::new().execute_detailed(&page, &plan).await;

    assert!(execution.result.success);
    assert_eq!(
        execution.attempts,
        vec![AttemptState::Failed, AttemptState::Succeeded]
    );
    let executed = execution.result.executed_control.unwrap();
    assert_eq!(executed.attribute("id"), Some("alt"));
}

#[tokio::test]
async fn test_all_stale_fails() {
    let page = form_page();
    let plan = plan_for(&page, &search_slots("tents"), ControlKind::SearchInput).await;
    page.detach(&page.find_by_id("f").unwrap());

    let execution = ActionExecutor::new().execute_detailed(&page, &plan).await;
    assert!(!execution.result.success);
    assert_eq!(
        execution.result.message,
        "Could not search: page controls are no longer available"
    );
    assert_eq!(execution.attempts, vec![AttemptState::Failed]);
    assert!(page.mutations().is_empty());
}

#[tokio::test]
async fn test_fallbacks_not_touched_after_success() {
    let page = SnapshotPage::from_spec(
        PageSpec::new("https://x.test/")
            .child(NodeSpec::new("input").attr("id", "q").attr("type", "search"))
            .child(NodeSpec::new("input").attr("id", "alt").attr("placeholder", "Search")),
    );
    let plan = plan_for(&page, &search_slots("tents"), ControlKind::SearchInput).await;
    let execution = ActionExecutor::new().execute_detailed(&page, &plan).await;
    assert_eq!(
        execution.attempts,
        vec![AttemptState::Succeeded, AttemptState::Pending]
    );
}

#[tokio::test]
async fn test_navigate_clicks() {
    let page = SnapshotPage::from_spec(
        PageSpec::new("https://x.test/")
            .child(NodeSpec::new("a").attr("id", "next").attr("rel", "next").text("Next")),
    );
    let slots = Slots::Navigate {
        direction: NavDirection::Next,
    };
    let plan = plan_for(&page, &slots, ControlKind::NavControl).await;
    let result = ActionExecutor::new().execute(&page, &plan).await;
    assert!(result.success);
    assert_eq!(result.message, "Went to next page");
    let next = page.find_by_id("next").unwrap();
    assert_eq!(page.mutations(), vec![Mutation::Click { element: next }]);
}

/// Delegates to a snapshot page but cannot submit forms.
struct NoSubmit(SnapshotPage);

#[async_trait]
impl PageDom for NoSubmit {
    async fn url(&self) -> Result<String, DomError> {
        self.0.url().await
    }

    async fn query_all(&self, selector: &str) -> Result<Vec<ElementSnapshot>, DomError> {
        self.0.query_all(selector).await
    }

    async fn is_attached(&self, element: &ElementHandle) -> Result<bool, DomError> {
        self.0.is_attached(element).await
    }

    async fn set_value(&self, element: &ElementHandle, value: &str) -> Result<(), DomError> {
        self.0.set_value(element, value).await
    }

    async fn dispatch_event(
        &self,
        element: &ElementHandle,
        event: DomEvent,
    ) -> Result<(), DomError> {
        self.0.dispatch_event(element, event).await
    }

    async fn click(&self, element: &ElementHandle) -> Result<(), DomError> {
        self.0.click(element).await
    }

    async fn submit_enclosing_form(&self, _element: &ElementHandle) -> Result<bool, DomError> {
        Err(DomError::Unavailable("form submission blocked".to_string()))
    }

    async fn find_submit_button(
        &self,
        element: &ElementHandle,
    ) -> Result<Option<ElementSnapshot>, DomError> {
        self.0.find_submit_button(element).await
    }

    async fn scroll_into_view(&self, element: &ElementHandle) -> Result<(), DomError> {
        self.0.scroll_into_view(element).await
    }
}

#[tokio::test]
async fn test_submit_error_is_still_success() {
    let page = NoSubmit(form_page());
    let plan = plan_for(&page, &search_slots("tents"), ControlKind::SearchInput).await;
    let result = ActionExecutor::new().execute(&page, &plan).await;
    assert!(result.success);
    assert_eq!(result.message, "Searched for: tents");
    // No other submit method is tried after the form attempt.
    assert_eq!(page.0.mutations().len(), 3);
}

#[tokio::test]
async fn test_scroll_operation() {
    let page = SnapshotPage::from_spec(
        PageSpec::new("https://x.test/").child(NodeSpec::new("div").attr("id", "panel")),
    );
    let element = page.query_all("#panel").await.unwrap().remove(0);
    let control = Control::new(element, ControlKind::FilterControl, "#panel", 1.0);
    let plan = ActionPlan::new(
        PlanGoal::Filter(FilterSlots {
            dimension: "price".to_string(),
            comparator: Comparator::Lt,
            value: 5.0,
            raw_value: "5".to_string(),
            value_high: None,
        }),
        vec![PlannedAction {
            control,
            operation: Operation::Scroll,
            confidence: 0.8,
        }],
    );
    let result = ActionExecutor::new().execute(&page, &plan).await;
    assert!(result.success);
    assert_eq!(result.message, "Filter attempted: price under 5");
    assert!(matches!(page.mutations()[0], Mutation::Scroll { .. }));
}
