use super::*;

// =============================================================================
// REQUEST DESCRIPTOR
// =============================================================================

#[test]
fn new_request_is_not_retried() {
    let request = ApiRequest::get("/items");
    assert!(!request.retried);
    assert!(request.bearer.is_none());
    assert!(request.body.is_none());
}

#[test]
fn into_retried_marks_and_preserves() {
    let request = ApiRequest::post("/items")
        .json(&serde_json::json!({"name": "widget"}))
        .unwrap()
        .with_bearer(Some("tok"));
    let retried = request.clone().into_retried();
    assert!(retried.retried);
    assert_eq!(retried.method, Method::Post);
    assert_eq!(retried.path, "/items");
    assert_eq!(retried.bearer.as_deref(), Some("tok"));
    assert_eq!(retried.body, request.body);
    // the original descriptor is untouched
    assert!(!request.retried);
}

#[test]
fn with_bearer_replaces_credential() {
    let request = ApiRequest::get("/items").with_bearer(Some("a"));
    let swapped = request.with_bearer(Some("b"));
    assert_eq!(swapped.bearer.as_deref(), Some("b"));
    let stripped = swapped.with_bearer(None);
    assert!(stripped.bearer.is_none());
}

#[test]
fn method_as_str() {
    assert_eq!(Method::Get.as_str(), "GET");
    assert_eq!(Method::Post.as_str(), "POST");
    assert_eq!(Method::Put.as_str(), "PUT");
    assert_eq!(Method::Delete.as_str(), "DELETE");
}

// =============================================================================
// RESPONSE
// =============================================================================

#[test]
fn is_success_bounds() {
    let at = |status| ApiResponse { status, body: String::new() };
    assert!(!at(199).is_success());
    assert!(at(200).is_success());
    assert!(at(299).is_success());
    assert!(!at(300).is_success());
    assert!(!at(401).is_success());
}

#[test]
fn message_extracts_backend_field() {
    let response = ApiResponse {
        status: 400,
        body: r#"{"message":"invalid supplier id","code":42}"#.to_string(),
    };
    assert_eq!(response.message(), "invalid supplier id");
}

#[test]
fn message_falls_back_to_raw_body() {
    let response = ApiResponse {
        status: 502,
        body: "Bad Gateway".to_string(),
    };
    assert_eq!(response.message(), "Bad Gateway");
}

#[test]
fn message_falls_back_when_field_missing() {
    let response = ApiResponse {
        status: 404,
        body: r#"{"error":"not found"}"#.to_string(),
    };
    assert_eq!(response.message(), r#"{"error":"not found"}"#);
}

#[test]
fn json_decodes_body() {
    #[derive(serde::Deserialize)]
    struct Item {
        id: i64,
    }
    let response = ApiResponse {
        status: 200,
        body: r#"{"id": 7}"#.to_string(),
    };
    let item: Item = response.json().unwrap();
    assert_eq!(item.id, 7);
}

#[test]
fn json_rejects_malformed_body() {
    let response = ApiResponse {
        status: 200,
        body: "<html>".to_string(),
    };
    assert!(response.json::<serde_json::Value>().is_err());
}
