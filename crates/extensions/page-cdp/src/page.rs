//! [`PageDom`] over a live CDP page session.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, warn};

use pagevoice_protocols::{
    BoundingBox, DomError, DomEvent, ElementHandle, ElementSnapshot, NodeAttributes, PageDom,
};

use crate::cdp::{CdpClient, CdpError, PageSession, OBJECT_GROUP};
use crate::scripts;

/// A browser tab driven through the DevTools protocol.
pub struct CdpPage {
    session: PageSession,
    // Owns the WebSocket the session talks through.
    _client: CdpClient,
}

impl CdpPage {
    /// Connect to `endpoint` and attach to the active tab.
    pub async fn connect(endpoint: &str) -> Result<Self, CdpError> {
        let client = CdpClient::connect(endpoint).await?;
        let session = client.attach_active_page().await?;
        Ok(Self {
            session,
            _client: client,
        })
    }

    /// Like [`connect`](Self::connect) with a custom per-call timeout.
    pub async fn connect_with_timeout(endpoint: &str, timeout: Duration) -> Result<Self, CdpError> {
        let client = CdpClient::connect_with_timeout(endpoint, timeout).await?;
        let session = client.attach_active_page().await?;
        Ok(Self {
            session,
            _client: client,
        })
    }

    pub fn session(&self) -> &PageSession {
        &self.session
    }

    async fn describe(&self, element: &ElementHandle) -> Result<ElementSnapshot, DomError> {
        let value = self
            .session
            .call_function_on(element.as_str(), scripts::DESCRIBE, &[])
            .await?;
        snapshot_from_value(element.clone(), value)
    }

    /// Run an element function that reports detachment by returning
    /// `false`.
    async fn run_on_live(
        &self,
        element: &ElementHandle,
        function: &str,
        args: &[Value],
    ) -> Result<(), DomError> {
        let value = self
            .session
            .call_function_on(element.as_str(), function, args)
            .await?;
        match value {
            Value::Bool(true) => Ok(()),
            _ => Err(DomError::StaleElement(element.to_string())),
        }
    }
}

#[async_trait]
impl PageDom for CdpPage {
    async fn url(&self) -> Result<String, DomError> {
        let value = self.session.evaluate("location.href").await?;
        value
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| DomError::Protocol(format!("location.href returned {}", value)))
    }

    async fn query_all(&self, selector: &str) -> Result<Vec<ElementSnapshot>, DomError> {
        let array = self
            .session
            .evaluate_handle(&scripts::query_expression(selector))
            .await
            .map_err(|e| {
                if e.is_selector_syntax() {
                    DomError::invalid_selector(selector, e.to_string())
                } else {
                    e.into()
                }
            })?;
        let array_id = array
            .object_id
            .ok_or_else(|| DomError::Protocol("querySelectorAll returned no object".to_string()))?;

        let described = self
            .session
            .call_function_on(&array_id, scripts::DESCRIBE, &[])
            .await;
        let properties = self.session.get_properties(&array_id).await;
        // The entries keep their own object ids after the array goes.
        if let Err(e) = self.session.release_object(&array_id).await {
            debug!("Failed to release result array: {}", e);
        }

        let described = match described? {
            Value::Array(items) => items,
            other => {
                return Err(DomError::Protocol(format!(
                    "unexpected element description: {}",
                    other
                )));
            }
        };
        let handles = indexed_handles(
            properties?
                .into_iter()
                .filter_map(|p| p.value.and_then(|v| v.object_id).map(|id| (p.name, id))),
        );
        if handles.len() != described.len() {
            warn!(
                selector,
                handles = handles.len(),
                described = described.len(),
                "Element count changed while querying"
            );
        }

        handles
            .into_iter()
            .zip(described)
            .map(|(handle, value)| snapshot_from_value(handle, value))
            .collect()
    }

    async fn is_attached(&self, element: &ElementHandle) -> Result<bool, DomError> {
        match self
            .session
            .call_function_on(element.as_str(), scripts::IS_CONNECTED, &[])
            .await
        {
            Ok(value) => Ok(value.as_bool().unwrap_or(false)),
            Err(e) if e.is_missing_object() => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    async fn set_value(&self, element: &ElementHandle, value: &str) -> Result<(), DomError> {
        self.run_on_live(element, scripts::SET_VALUE, &[json!(value)])
            .await
    }

    async fn dispatch_event(&self, element: &ElementHandle, event: DomEvent) -> Result<(), DomError> {
        self.run_on_live(element, scripts::DISPATCH_EVENT, &event_args(&event))
            .await
    }

    async fn click(&self, element: &ElementHandle) -> Result<(), DomError> {
        self.run_on_live(element, scripts::CLICK, &[]).await
    }

    async fn submit_enclosing_form(&self, element: &ElementHandle) -> Result<bool, DomError> {
        let value = self
            .session
            .call_function_on(element.as_str(), scripts::SUBMIT_FORM, &[])
            .await?;
        match value {
            Value::Bool(submitted) => Ok(submitted),
            _ => Err(DomError::StaleElement(element.to_string())),
        }
    }

    async fn find_submit_button(
        &self,
        element: &ElementHandle,
    ) -> Result<Option<ElementSnapshot>, DomError> {
        let button = self
            .session
            .call_function_on_handle(element.as_str(), scripts::FIND_SUBMIT_BUTTON, &[])
            .await?;
        if !button.is_node() {
            return Ok(None);
        }
        let Some(object_id) = button.object_id else {
            return Ok(None);
        };
        self.describe(&ElementHandle::new(object_id)).await.map(Some)
    }

    async fn scroll_into_view(&self, element: &ElementHandle) -> Result<(), DomError> {
        self.run_on_live(element, scripts::SCROLL_INTO_VIEW, &[]).await
    }

    async fn release_handles(&self) -> Result<(), DomError> {
        self.session.release_object_group(OBJECT_GROUP).await?;
        debug!("Released object group '{}'", OBJECT_GROUP);
        Ok(())
    }
}

/// Wire shape produced by [`scripts::DESCRIBE`].
#[derive(Debug, Deserialize)]
struct DescribedElement {
    #[serde(default)]
    id: Option<String>,
    tag: String,
    #[serde(default)]
    attrs: Vec<(String, String)>,
    #[serde(default)]
    text: String,
    #[serde(rename = "box", default)]
    bounding_box: BoundingBox,
    attached: bool,
}

fn snapshot_from_value(handle: ElementHandle, value: Value) -> Result<ElementSnapshot, DomError> {
    let described: DescribedElement = serde_json::from_value(value)
        .map_err(|e| DomError::Protocol(format!("bad element description: {}", e)))?;
    Ok(ElementSnapshot {
        handle,
        node_id: described.id,
        tag_name: described.tag.to_ascii_lowercase(),
        attributes: NodeAttributes::from_pairs(described.attrs),
        text: described.text,
        bounding_box: described.bounding_box,
        attached: described.attached,
    })
}

/// Array entries ordered by index; non-index properties are dropped.
fn indexed_handles(entries: impl IntoIterator<Item = (String, String)>) -> Vec<ElementHandle> {
    let mut indexed: Vec<(usize, String)> = entries
        .into_iter()
        .filter_map(|(name, id)| name.parse::<usize>().ok().map(|i| (i, id)))
        .collect();
    indexed.sort_by_key(|(i, _)| *i);
    indexed
        .into_iter()
        .map(|(_, id)| ElementHandle::new(id))
        .collect()
}

fn event_args(event: &DomEvent) -> [Value; 2] {
    [json!(event.event_type()), json!(event.key())]
}

#[cfg(test)]
#[path = "page_tests.rs"]
mod tests;
