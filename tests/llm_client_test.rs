//! Integration tests for the Gemini client against a mock HTTP server

use medanon::adapters::llm::{ChatModel, GeminiClient};
use medanon::config::{secret_string, LlmConfig};
use medanon::domain::ServiceError;
use mockito::{Matcher, Server, ServerGuard};

const GENERATE_PATH: &str = r"^/models/gemini-test:generateContent$";

fn client_for(base_url: String) -> GeminiClient {
    let config = LlmConfig {
        api_key: Some(secret_string("test-key".to_string())),
        model: "gemini-test".to_string(),
        base_url,
        timeout_seconds: 5,
        ..Default::default()
    };
    GeminiClient::new(&config).unwrap()
}

fn candidate_body(text: &str) -> String {
    serde_json::json!({
        "candidates": [
            { "content": { "parts": [ { "text": text } ], "role": "model" } }
        ]
    })
    .to_string()
}

async fn mock_status(server: &mut ServerGuard, status: usize, body: &str) -> mockito::Mock {
    server
        .mock("POST", Matcher::Regex(GENERATE_PATH.to_string()))
        .match_query(Matcher::UrlEncoded("key".into(), "test-key".into()))
        .with_status(status)
        .with_header("content-type", "application/json")
        .with_body(body)
        .create_async()
        .await
}

#[tokio::test]
async fn test_ask_returns_candidate_text() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", Matcher::Regex(GENERATE_PATH.to_string()))
        .match_query(Matcher::UrlEncoded("key".into(), "test-key".into()))
        .match_body(Matcher::Regex("Hb 9.1 g/dL".to_string()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(candidate_body("Mild anaemia."))
        .create_async()
        .await;

    let client = client_for(server.url());
    let answer = client
        .ask("[PATIENT_NAME], Hb 9.1 g/dL", "Is this anaemia?")
        .await
        .unwrap();

    assert_eq!(answer, "Mild anaemia.");
    assert_eq!(client.model_id(), "gemini-test");
    mock.assert_async().await;
}

#[tokio::test]
async fn test_insight_is_trimmed() {
    let mut server = Server::new_async().await;
    let mock = mock_status(&mut server, 200, &candidate_body("\n  Stable since last visit.  \n")).await;

    let client = client_for(server.url());
    let insight = client
        .insight("[PATIENT_NAME], BP 120/80", &["[PATIENT_NAME], BP 150/95".to_string()])
        .await
        .unwrap();

    assert_eq!(insight, "Stable since last visit.");
    mock.assert_async().await;
}

#[tokio::test]
async fn test_unauthorized_maps_to_authentication() {
    let mut server = Server::new_async().await;
    mock_status(&mut server, 401, r#"{"error":{"message":"API key not valid"}}"#).await;

    let err = client_for(server.url()).ask("ctx", "q").await.unwrap_err();
    assert!(matches!(err, ServiceError::Authentication(ref m) if m.contains("API key not valid")));
}

#[tokio::test]
async fn test_rate_limit_maps_to_quota() {
    let mut server = Server::new_async().await;
    mock_status(&mut server, 429, r#"{"error":{"message":"quota"}}"#).await;

    let err = client_for(server.url()).ask("ctx", "q").await.unwrap_err();
    assert!(matches!(err, ServiceError::QuotaExceeded(_)));
}

#[tokio::test]
async fn test_server_error_is_not_retried() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", Matcher::Regex(GENERATE_PATH.to_string()))
        .match_query(Matcher::Any)
        .with_status(500)
        .with_body("internal")
        .expect(1)
        .create_async()
        .await;

    let err = client_for(server.url()).ask("ctx", "q").await.unwrap_err();
    assert!(matches!(err, ServiceError::Http { status: 500, .. }));
    mock.assert_async().await;
}

#[tokio::test]
async fn test_malformed_responses_are_invalid() {
    let mut server = Server::new_async().await;
    mock_status(&mut server, 200, "not json").await;
    let err = client_for(server.url()).ask("ctx", "q").await.unwrap_err();
    assert!(matches!(err, ServiceError::InvalidResponse(_)));

    let mut server = Server::new_async().await;
    mock_status(&mut server, 200, r#"{"candidates":[]}"#).await;
    let err = client_for(server.url()).ask("ctx", "q").await.unwrap_err();
    assert!(matches!(err, ServiceError::InvalidResponse(_)));
}

#[tokio::test]
async fn test_unreachable_server_is_network_error() {
    let client = client_for("http://127.0.0.1:1".to_string());
    let err = client.ask("ctx", "q").await.unwrap_err();
    assert!(matches!(err, ServiceError::Network(_)));
}

#[tokio::test]
async fn test_trailing_slash_in_base_url() {
    let mut server = Server::new_async().await;
    let mock = mock_status(&mut server, 200, &candidate_body("ok")).await;

    let client = client_for(format!("{}/", server.url()));
    assert_eq!(client.ask("ctx", "q").await.unwrap(), "ok");
    mock.assert_async().await;
}
