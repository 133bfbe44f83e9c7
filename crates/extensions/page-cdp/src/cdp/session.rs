//! A CDP session attached to a single page.

use std::sync::Arc;

use serde_json::{json, Value};
use tracing::debug;

use super::client::Transport;
use super::error::CdpError;
use super::protocol::{ExceptionDetails, PropertyDescriptor, RemoteObject};

/// Object group every remote object this crate creates belongs to.
pub const OBJECT_GROUP: &str = "pagevoice";

pub struct PageSession {
    target_id: String,
    session_id: String,
    transport: Arc<Transport>,
}

impl PageSession {
    pub(crate) fn new(target_id: String, session_id: String, transport: Arc<Transport>) -> Self {
        Self {
            target_id,
            session_id,
            transport,
        }
    }

    pub fn target_id(&self) -> &str {
        &self.target_id
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// Send a CDP command to this page session.
    pub async fn call(&self, method: &str, params: Option<Value>) -> Result<Value, CdpError> {
        self.transport
            .call(method, params, Some(&self.session_id))
            .await
    }

    pub(crate) async fn enable_domains(&self) -> Result<(), CdpError> {
        self.call("Page.enable", None).await?;
        self.call("DOM.enable", None).await?;
        self.call("Runtime.enable", None).await?;

        debug!("Enabled CDP domains for session {}", self.session_id);
        Ok(())
    }

    /// Evaluate an expression and return its JSON value.
    pub async fn evaluate(&self, expression: &str) -> Result<Value, CdpError> {
        let result = self
            .call(
                "Runtime.evaluate",
                Some(json!({
                    "expression": expression,
                    "returnByValue": true,
                    "awaitPromise": true
                })),
            )
            .await?;
        Ok(remote_result(result)?.value.unwrap_or(Value::Null))
    }

    /// Evaluate an expression and keep the result as a remote object.
    pub async fn evaluate_handle(&self, expression: &str) -> Result<RemoteObject, CdpError> {
        let result = self
            .call(
                "Runtime.evaluate",
                Some(json!({
                    "expression": expression,
                    "returnByValue": false,
                    "objectGroup": OBJECT_GROUP
                })),
            )
            .await?;
        remote_result(result)
    }

    /// Call `function` with `this` bound to `object_id` and return the
    /// JSON value it produces.
    pub async fn call_function_on(
        &self,
        object_id: &str,
        function: &str,
        args: &[Value],
    ) -> Result<Value, CdpError> {
        let result = self
            .call(
                "Runtime.callFunctionOn",
                Some(call_params(object_id, function, args, true)),
            )
            .await?;
        Ok(remote_result(result)?.value.unwrap_or(Value::Null))
    }

    /// Like [`call_function_on`](Self::call_function_on) but returns the
    /// result as a remote object.
    pub async fn call_function_on_handle(
        &self,
        object_id: &str,
        function: &str,
        args: &[Value],
    ) -> Result<RemoteObject, CdpError> {
        let result = self
            .call(
                "Runtime.callFunctionOn",
                Some(call_params(object_id, function, args, false)),
            )
            .await?;
        remote_result(result)
    }

    /// Own properties of a remote object (array entries included).
    pub async fn get_properties(&self, object_id: &str) -> Result<Vec<PropertyDescriptor>, CdpError> {
        let result = self
            .call(
                "Runtime.getProperties",
                Some(json!({
                    "objectId": object_id,
                    "ownProperties": true
                })),
            )
            .await?;
        let props = result
            .get("result")
            .cloned()
            .ok_or_else(|| CdpError::InvalidResponse("Missing properties".to_string()))?;
        Ok(serde_json::from_value(props)?)
    }

    pub async fn release_object(&self, object_id: &str) -> Result<(), CdpError> {
        self.call("Runtime.releaseObject", Some(json!({"objectId": object_id})))
            .await?;
        Ok(())
    }

    /// Release every remote object in `group`, including the entries read
    /// back from grouped arrays.
    pub async fn release_object_group(&self, group: &str) -> Result<(), CdpError> {
        self.call(
            "Runtime.releaseObjectGroup",
            Some(json!({"objectGroup": group})),
        )
        .await?;
        Ok(())
    }
}

fn call_params(object_id: &str, function: &str, args: &[Value], by_value: bool) -> Value {
    let arguments: Vec<Value> = args.iter().map(|v| json!({"value": v})).collect();
    json!({
        "objectId": object_id,
        "functionDeclaration": function,
        "arguments": arguments,
        "returnByValue": by_value,
        "awaitPromise": true,
        "objectGroup": OBJECT_GROUP
    })
}

/// Pull the `RemoteObject` out of an evaluation result, turning a thrown
/// exception into [`CdpError::JavaScript`].
fn remote_result(mut result: Value) -> Result<RemoteObject, CdpError> {
    if let Some(details) = result.get("exceptionDetails") {
        let details: ExceptionDetails = serde_json::from_value(details.clone())?;
        return Err(CdpError::JavaScript(details.message()));
    }
    let object = result
        .get_mut("result")
        .map(Value::take)
        .ok_or_else(|| CdpError::InvalidResponse("Missing result".to_string()))?;
    Ok(serde_json::from_value(object)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_call_params_wraps_arguments() {
        let params = call_params("obj-1", "function(v) { return v; }", &[json!("shoes")], true);
        assert_eq!(params["objectId"], "obj-1");
        assert_eq!(params["arguments"][0]["value"], "shoes");
        assert_eq!(params["returnByValue"], true);
        assert_eq!(params["objectGroup"], OBJECT_GROUP);
    }

    #[test]
    fn test_remote_result_value() {
        let object = remote_result(json!({"result": {"type": "string", "value": "https://x.test/"}})).unwrap();
        assert_eq!(object.value, Some(json!("https://x.test/")));
    }

    #[test]
    fn test_remote_result_exception() {
        let err = remote_result(json!({
            "result": {"type": "object", "subtype": "error"},
            "exceptionDetails": {
                "text": "Uncaught",
                "exception": {"type": "object", "description": "SyntaxError: 'a[' is not a valid selector."}
            }
        }))
        .unwrap_err();
        assert!(err.is_selector_syntax());
    }

    #[test]
    fn test_remote_result_missing() {
        assert!(matches!(
            remote_result(json!({})),
            Err(CdpError::InvalidResponse(_))
        ));
    }
}
