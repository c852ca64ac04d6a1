//! Gemini generateContent contract tests.
//!
//! These verify the exact wire behavior of the idea generator against
//! a mock server: request shape, credential header, response parsing
//! and cleanup, and error mapping. No test here touches the real API.

use nudge_core::ideas::{GeminiClient, GeminiConfig, IdeaError, IdeaGenerator};
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn generator_for(server: &MockServer) -> IdeaGenerator {
    let config = GeminiConfig::new("test-key", "gemini-2.5-flash").with_base_url(server.uri());
    IdeaGenerator::configured(GeminiClient::new(config))
}

fn candidate_response(text: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "candidates": [{
            "content": {
                "parts": [{ "text": text }],
                "role": "model"
            },
            "finishReason": "STOP"
        }]
    }))
}

#[tokio::test]
async fn request_has_expected_path_header_and_prompt() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1beta/models/gemini-2.5-flash:generateContent"))
        .and(header("x-goog-api-key", "test-key"))
        .and(body_partial_json(json!({
            "contents": [{
                "parts": [{
                    "text": "Suggest a single, short, and creative to-do list item or \
                             reminder. The task should be interesting and actionable. \
                             Maximum 10 words."
                }]
            }]
        })))
        .respond_with(candidate_response("Sketch the view from your window"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let idea = generator_for(&mock_server)
        .generate()
        .await
        .expect("generation should succeed");
    assert_eq!(idea, "Sketch the view from your window");
}

#[tokio::test]
async fn response_text_is_cleaned_of_quotes_and_asterisks() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(candidate_response("\"Plant a tree\"*\""))
        .expect(1)
        .mount(&mock_server)
        .await;

    let idea = generator_for(&mock_server)
        .generate()
        .await
        .expect("generation should succeed");
    assert_eq!(idea, "Plant a tree");
}

#[tokio::test]
async fn multiple_text_parts_are_joined() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{
                "content": {
                    "parts": [
                        { "text": "Start a " },
                        { "text": "tiny herb garden" }
                    ]
                }
            }]
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let idea = generator_for(&mock_server)
        .generate()
        .await
        .expect("generation should succeed");
    assert_eq!(idea, "Start a tiny herb garden");
}

#[tokio::test]
async fn unconfigured_generator_fails_without_any_request() {
    let mock_server = MockServer::start().await;

    // Zero expected requests: the failure must happen before the
    // network is ever touched.
    Mock::given(method("POST"))
        .respond_with(candidate_response("never served"))
        .expect(0)
        .mount(&mock_server)
        .await;

    let generator = IdeaGenerator::NotConfigured;
    let err = generator
        .generate()
        .await
        .expect_err("must fail when unconfigured");
    assert_eq!(err, IdeaError::NotConfigured);
}

#[tokio::test]
async fn http_error_status_maps_to_generation_failed() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(429).set_body_json(json!({
            "error": { "code": 429, "message": "quota exhausted" }
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let err = generator_for(&mock_server)
        .generate()
        .await
        .expect_err("must fail on error status");
    assert_eq!(err, IdeaError::GenerationFailed);
}

#[tokio::test]
async fn malformed_body_maps_to_generation_failed() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json at all"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let err = generator_for(&mock_server)
        .generate()
        .await
        .expect_err("must fail on malformed body");
    assert_eq!(err, IdeaError::GenerationFailed);
}

#[tokio::test]
async fn response_without_candidates_maps_to_generation_failed() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "promptFeedback": { "blockReason": "SAFETY" }
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let err = generator_for(&mock_server)
        .generate()
        .await
        .expect_err("must fail without candidates");
    assert_eq!(err, IdeaError::GenerationFailed);
}
