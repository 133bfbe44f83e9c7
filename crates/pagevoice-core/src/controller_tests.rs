use async_trait::async_trait;
use pagevoice_page_snapshot::{Mutation, NodeSpec, PageSpec, SnapshotPage};
use pagevoice_protocols::{DomError, DomEvent, ElementHandle, ElementSnapshot};

use super::*;
use crate::transcriber::{TextTranscriber, TranscriptionError};

fn search_page() -> Arc<SnapshotPage> {
    Arc::new(SnapshotPage::from_spec(
        PageSpec::new("https://x.test/").child(
            NodeSpec::new("form").child(NodeSpec::new("input").attr("id", "q").attr("type", "search")),
        ),
    ))
}

fn controller(transcriber: TextTranscriber, page: Arc<SnapshotPage>) -> VoiceController {
    VoiceController::new(Arc::new(transcriber), CommandEngine::new(), page)
}

struct NeverTranscribes;

#[async_trait]
impl Transcriber for NeverTranscribes {
    async fn transcribe(&self) -> Result<Command, TranscriptionError> {
        tokio::time::sleep(Duration::from_secs(3600)).await;
        Err(TranscriptionError("unreachable".to_string()))
    }
}

/// A page whose queries never come back.
struct HungPage;

#[async_trait]
impl PageDom for HungPage {
    async fn url(&self) -> Result<String, DomError> {
        Ok("https://hung.test/".to_string())
    }

    async fn query_all(&self, _selector: &str) -> Result<Vec<ElementSnapshot>, DomError> {
        tokio::time::sleep(Duration::from_secs(3600)).await;
        Ok(Vec::new())
    }

    async fn is_attached(&self, _element: &ElementHandle) -> Result<bool, DomError> {
        Ok(false)
    }

    async fn set_value(&self, element: &ElementHandle, _value: &str) -> Result<(), DomError> {
        Err(DomError::StaleElement(element.to_string()))
    }

    async fn dispatch_event(
        &self,
        element: &ElementHandle,
        _event: DomEvent,
    ) -> Result<(), DomError> {
        Err(DomError::StaleElement(element.to_string()))
    }

    async fn click(&self, element: &ElementHandle) -> Result<(), DomError> {
        Err(DomError::StaleElement(element.to_string()))
    }

    async fn submit_enclosing_form(&self, _element: &ElementHandle) -> Result<bool, DomError> {
        Ok(false)
    }

    async fn find_submit_button(
        &self,
        _element: &ElementHandle,
    ) -> Result<Option<ElementSnapshot>, DomError> {
        Ok(None)
    }

    async fn scroll_into_view(&self, element: &ElementHandle) -> Result<(), DomError> {
        Err(DomError::StaleElement(element.to_string()))
    }
}

#[tokio::test]
async fn test_press_release_acknowledge() {
    let page = search_page();
    let mut controller = controller(TextTranscriber::new("search for blue jeans", 0.95), page.clone());

    assert!(controller.press());
    assert_eq!(controller.state(), SessionState::Capturing);
    assert_eq!(controller.release().await, SessionState::Reporting);
    assert_eq!(
        controller.session().result().unwrap().message,
        "Searched for: blue jeans"
    );

    let result = controller.acknowledge().unwrap();
    assert!(result.success);
    assert_eq!(controller.state(), SessionState::Idle);
    assert!(page
        .mutations()
        .iter()
        .any(|m| matches!(m, Mutation::SetValue { value, .. } if value == "blue jeans")));
}

#[tokio::test]
async fn test_press_ignored_while_reporting() {
    let mut controller = controller(TextTranscriber::new("next page", 0.9), search_page());
    controller.press();
    controller.release().await;
    assert_eq!(controller.state(), SessionState::Reporting);
    assert!(!controller.press());
    assert_eq!(
        controller.acknowledge().unwrap().message,
        "No next button found on this page"
    );
    assert!(controller.press());
}

#[tokio::test]
async fn test_pointer_leave_processes_command() {
    let mut controller = controller(TextTranscriber::new("next page", 0.9), search_page());
    controller.press();
    assert_eq!(controller.pointer_leave().await, SessionState::Reporting);
}

#[tokio::test]
async fn test_release_without_press_does_nothing() {
    let page = search_page();
    let mut controller = controller(TextTranscriber::new("search for x", 0.9), page.clone());
    assert_eq!(controller.release().await, SessionState::Idle);
    assert!(controller.acknowledge().is_none());
    assert!(page.mutations().is_empty());
}

#[tokio::test]
async fn test_empty_capture_cancels_to_idle() {
    let page = search_page();
    let mut controller = controller(TextTranscriber::new("   ", 0.9), page.clone());
    controller.press();
    assert_eq!(controller.release().await, SessionState::Idle);
    assert!(controller.acknowledge().is_none());
    assert!(page.mutations().is_empty());
}

#[tokio::test]
async fn test_transcription_failure_reported() {
    let mut controller = controller(TextTranscriber::failing("microphone unavailable"), search_page());
    controller.press();
    assert_eq!(controller.release().await, SessionState::Reporting);
    assert_eq!(
        controller.acknowledge().unwrap().message,
        "Transcription failed: microphone unavailable"
    );
}

#[tokio::test(start_paused = true)]
async fn test_transcription_timeout() {
    let mut controller =
        VoiceController::new(Arc::new(NeverTranscribes), CommandEngine::new(), search_page())
            .with_timeout(Duration::from_millis(500));
    controller.press();
    assert_eq!(controller.release().await, SessionState::Reporting);
    assert_eq!(
        controller.acknowledge().unwrap().message,
        "Timed out waiting for the page to respond"
    );
}

#[tokio::test(start_paused = true)]
async fn test_page_timeout() {
    let mut controller = VoiceController::new(
        Arc::new(TextTranscriber::new("search for tents", 0.9)),
        CommandEngine::new(),
        Arc::new(HungPage),
    );
    let result = controller
        .submit(Command::new("search for tents", 0.9))
        .await
        .unwrap();
    assert!(!result.success);
    assert_eq!(result.message, "Timed out waiting for the page to respond");
    assert_eq!(controller.state(), SessionState::Idle);
}

#[tokio::test]
async fn test_submit_runs_full_cycle() {
    let mut controller = controller(TextTranscriber::new("", 0.0), search_page());
    let result = controller
        .submit(Command::new("find lamps", 0.8))
        .await
        .unwrap();
    assert_eq!(result.message, "Searched for: lamps");
    assert_eq!(controller.state(), SessionState::Idle);

    assert!(controller.submit(Command::new("  ", 0.8)).await.is_none());
    assert_eq!(controller.state(), SessionState::Idle);
}
