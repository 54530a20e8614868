//! Vision client tests against a mocked chat-completion endpoint.

use serde_json::{json, Value};
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use nutrivision::{NutritionAnalyzer, VisionClient, VisionConfig, VisionError};

// ─────────────────────── helpers ───────────────────────

fn client_for(server: &MockServer) -> VisionClient {
    VisionClient::new(VisionConfig {
        api_key: "test-key".to_string(),
        endpoint: format!("{}/v1/chat/completions", server.uri()),
        model: "test-vision-model".to_string(),
        max_tokens: 321,
    })
}

/// A chat-completion reply whose first choice carries `content`.
fn completion(content: &str) -> Value {
    json!({
        "id": "chatcmpl-test",
        "object": "chat.completion",
        "choices": [{
            "index": 0,
            "message": { "role": "assistant", "content": content },
            "finish_reason": "stop"
        }]
    })
}

async fn mount_reply(server: &MockServer, template: ResponseTemplate) {
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(template)
        .mount(server)
        .await;
}

// ═══════════════════════════════════════════════════════
// SUCCESS PATHS
// ═══════════════════════════════════════════════════════

#[tokio::test]
async fn sends_bearer_model_and_image() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(header("authorization", "Bearer test-key"))
        .and(body_partial_json(json!({
            "model": "test-vision-model",
            "max_tokens": 321
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion(
            r#"{"name":"Apple","calories":95,"protein":0.5,"fat":0.3,"carbs":25}"#,
        )))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let record = client
        .analyze("https://example.com/apple.jpg")
        .await
        .unwrap();

    assert_eq!(record["name"], "Apple");
    assert_eq!(record["calories"], 95);

    let requests = server.received_requests().await.unwrap();
    let sent: Value = serde_json::from_slice(&requests[0].body).unwrap();
    assert_eq!(
        sent["messages"][0]["content"][1]["image_url"]["url"],
        "https://example.com/apple.jpg"
    );
}

#[tokio::test]
async fn strips_markdown_fences_from_reply() {
    let server = MockServer::start().await;
    mount_reply(
        &server,
        ResponseTemplate::new(200).set_body_json(completion(
            "```json\n{\"name\":\"Banana\",\"calories\":105,\"ingredients\":[\"banana\"]}\n```",
        )),
    )
    .await;

    let record = client_for(&server)
        .analyze("data:image/png;base64,AAAA")
        .await
        .unwrap();
    assert_eq!(record["name"], "Banana");
    assert_eq!(record["ingredients"], json!(["banana"]));
}

#[tokio::test]
async fn empty_api_key_surfaces_remote_rejection() {
    let server = MockServer::start().await;
    mount_reply(
        &server,
        ResponseTemplate::new(401).set_body_string("missing key"),
    )
    .await;

    let mut config = client_for(&server).config().clone();
    config.api_key = String::new();
    let err = VisionClient::new(config)
        .analyze("https://example.com/apple.jpg")
        .await
        .unwrap_err();
    assert!(matches!(err, VisionError::Status { status: 401, .. }));
}

// ═══════════════════════════════════════════════════════
// FAILURE PATHS
// ═══════════════════════════════════════════════════════

#[tokio::test]
async fn non_success_status_reports_code() {
    let server = MockServer::start().await;
    mount_reply(
        &server,
        ResponseTemplate::new(429).set_body_string("rate limited"),
    )
    .await;

    let err = client_for(&server)
        .analyze("https://example.com/apple.jpg")
        .await
        .unwrap_err();
    let message = err.to_string();
    assert!(message.contains("429"), "got: {message}");
    assert!(message.contains("rate limited"), "got: {message}");
}

#[tokio::test]
async fn missing_content_is_no_content() {
    let server = MockServer::start().await;
    mount_reply(
        &server,
        ResponseTemplate::new(200).set_body_json(json!({ "choices": [] })),
    )
    .await;

    let err = client_for(&server)
        .analyze("https://example.com/apple.jpg")
        .await
        .unwrap_err();
    assert!(matches!(err, VisionError::NoContent));
    assert_eq!(err.to_string(), "No content in response");
}

#[tokio::test]
async fn empty_content_is_no_content() {
    let server = MockServer::start().await;
    mount_reply(&server, ResponseTemplate::new(200).set_body_json(completion(""))).await;

    let err = client_for(&server)
        .analyze("https://example.com/apple.jpg")
        .await
        .unwrap_err();
    assert!(matches!(err, VisionError::NoContent));
}

#[tokio::test]
async fn prose_reply_is_parse_error() {
    let server = MockServer::start().await;
    mount_reply(
        &server,
        ResponseTemplate::new(200).set_body_json(completion("I think this is a salad.")),
    )
    .await;

    let err = client_for(&server)
        .analyze("https://example.com/salad.jpg")
        .await
        .unwrap_err();
    assert!(matches!(err, VisionError::Parse(_)));
}

#[tokio::test]
async fn unreachable_endpoint_is_http_error() {
    let client = VisionClient::new(VisionConfig {
        api_key: "k".to_string(),
        endpoint: "http://127.0.0.1:9/v1/chat/completions".to_string(),
        ..VisionConfig::default()
    });

    let err = client
        .analyze("https://example.com/apple.jpg")
        .await
        .unwrap_err();
    assert!(matches!(err, VisionError::Http(_)));
}
