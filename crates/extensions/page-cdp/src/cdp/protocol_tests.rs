use super::*;

#[test]
fn test_cdp_request_serialize() {
    let req = CdpRequest {
        id: 7,
        method: "Runtime.evaluate".to_string(),
        params: Some(serde_json::json!({"expression": "location.href"})),
        session_id: Some("S1".to_string()),
    };
    let json = serde_json::to_value(&req).unwrap();
    assert_eq!(json["id"], 7);
    assert_eq!(json["method"], "Runtime.evaluate");
    assert_eq!(json["sessionId"], "S1");
}

#[test]
fn test_cdp_request_omits_empty_fields() {
    let req = CdpRequest {
        id: 1,
        method: "Target.getTargets".to_string(),
        params: None,
        session_id: None,
    };
    let json = serde_json::to_string(&req).unwrap();
    assert!(!json.contains("params"));
    assert!(!json.contains("sessionId"));
}

#[test]
fn test_cdp_response_deserialize() {
    let json = r#"{"id": 1, "result": {"result": {"type": "string", "value": "x"}}, "sessionId": "S1"}"#;
    let resp: CdpResponse = serde_json::from_str(json).unwrap();
    assert_eq!(resp.id, Some(1));
    assert_eq!(resp.session_id.as_deref(), Some("S1"));
    assert!(resp.error.is_none());
}

#[test]
fn test_cdp_error_response_deserialize() {
    let json = r#"{"id": 3, "error": {"code": -32000, "message": "Could not find object with given id"}}"#;
    let resp: CdpResponse = serde_json::from_str(json).unwrap();
    let error = resp.error.unwrap();
    assert_eq!(error.code, -32000);
    assert!(error.message.contains("Could not find object"));
}

#[test]
fn test_event_deserialize() {
    let json = r#"{"method": "Page.loadEventFired", "params": {"timestamp": 1.5}}"#;
    let resp: CdpResponse = serde_json::from_str(json).unwrap();
    assert!(resp.id.is_none());
    assert_eq!(resp.method.as_deref(), Some("Page.loadEventFired"));
}

#[test]
fn test_page_info_is_page() {
    let json = r#"[
        {"id": "p1", "type": "page", "title": "Shop", "url": "https://shop.example/"},
        {"id": "w1", "type": "service_worker", "title": "sw", "url": "https://shop.example/sw.js"},
        {"id": "d1", "type": "page", "title": "DevTools", "url": "devtools://devtools/inspector.html"}
    ]"#;
    let pages: Vec<PageInfo> = serde_json::from_str(json).unwrap();
    let attachable: Vec<_> = pages.iter().filter(|p| p.is_page()).map(|p| p.id.as_str()).collect();
    assert_eq!(attachable, vec!["p1"]);
}

#[test]
fn test_browser_version_deserialize() {
    let json = r#"{
        "Browser": "Chrome/126.0",
        "Protocol-Version": "1.3",
        "User-Agent": "Mozilla/5.0",
        "webSocketDebuggerUrl": "ws://localhost:9222/devtools/browser/abc"
    }"#;
    let version: BrowserVersion = serde_json::from_str(json).unwrap();
    assert_eq!(version.browser, "Chrome/126.0");
    assert!(version.web_socket_debugger_url.starts_with("ws://"));
}

#[test]
fn test_remote_object_is_node() {
    let node: RemoteObject = serde_json::from_value(serde_json::json!({
        "type": "object", "subtype": "node", "className": "HTMLInputElement", "objectId": "1.2.3"
    }))
    .unwrap();
    assert!(node.is_node());

    let null: RemoteObject =
        serde_json::from_value(serde_json::json!({"type": "object", "subtype": "null", "value": null}))
            .unwrap();
    assert!(!null.is_node());
}

#[test]
fn test_property_descriptors() {
    let json = serde_json::json!([
        {"name": "0", "enumerable": true, "value": {"type": "object", "subtype": "node", "objectId": "a"}},
        {"name": "length", "enumerable": false, "value": {"type": "number", "value": 1}}
    ]);
    let props: Vec<PropertyDescriptor> = serde_json::from_value(json).unwrap();
    assert_eq!(props.len(), 2);
    assert!(props[0].enumerable);
    assert_eq!(props[0].value.as_ref().unwrap().object_id.as_deref(), Some("a"));
}

#[test]
fn test_exception_message_prefers_description() {
    let details: ExceptionDetails = serde_json::from_value(serde_json::json!({
        "text": "Uncaught",
        "exception": {"type": "object", "subtype": "error", "description": "SyntaxError: bad selector"}
    }))
    .unwrap();
    assert_eq!(details.message(), "SyntaxError: bad selector");

    let bare: ExceptionDetails = serde_json::from_value(serde_json::json!({"text": "Uncaught"})).unwrap();
    assert_eq!(bare.message(), "Uncaught");
}
