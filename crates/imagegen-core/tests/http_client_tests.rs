//! Mock API tests for the HTTP generation client
//!
//! Uses wiremock to stand in for an OpenAI-compatible backend.

use std::sync::Arc;

use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use imagegen_core::{
    Error,
    client::{GenerationClient, HttpGenerationClient},
    vision::{GenerationRequest, generate_image_llm, generate_image_openrouter},
};

fn client_for(server: &MockServer) -> Arc<dyn GenerationClient> {
    Arc::new(
        HttpGenerationClient::builder()
            .api_key("test-api-key")
            .base_url(server.uri())
            .timeout_secs(5)
            .build()
            .unwrap(),
    )
}

#[tokio::test]
async fn test_image_generation_endpoint() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/images/generations"))
        .and(header("Authorization", "Bearer test-api-key"))
        .and(body_partial_json(json!({
            "prompt": "A sunset",
            "model": "dall-e-3",
            "response_format": "b64_json"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "created": 1700000000,
            "data": [{"b64_json": "aGVsbG8=", "revised_prompt": "A vivid sunset"}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let request = GenerationRequest::new("A sunset", "dall-e-3")
        .with_response_format(imagegen_core::vision::ResponseFormat::B64Json);

    let result = generate_image_llm(Some(client_for(&server)), &request)
        .await
        .unwrap();

    assert_eq!(result.images.len(), 1);
    assert_eq!(result.images[0].b64_data(), Some("aGVsbG8="));
    assert_eq!(result.images[0].revised_prompt(), Some("A vivid sunset"));
    assert_eq!(result.images[0].decode_bytes().unwrap(), b"hello".to_vec());
}

#[tokio::test]
async fn test_chat_completion_endpoint() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(body_partial_json(json!({
            "model": "google/gemini-2.5-flash-image-preview",
            "modalities": ["text", "image"],
            "image_config": {"aspect_ratio": "16:9"}
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "gen-1",
            "choices": [{
                "index": 0,
                "message": {
                    "role": "assistant",
                    "content": "Generated image",
                    "images": [{
                        "type": "image_url",
                        "image_url": {"url": "data:image/png;base64,iVBORw0KGgo="}
                    }]
                },
                "finish_reason": "stop"
            }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let request = GenerationRequest::new("A landscape", "google/gemini-2.5-flash-image-preview")
        .with_param("image_config", json!({"aspect_ratio": "16:9"}));

    let result = generate_image_openrouter(Some(client_for(&server)), &request)
        .await
        .unwrap();

    assert_eq!(result.text.as_deref(), Some("Generated image"));
    assert_eq!(result.images.len(), 1);
    assert_eq!(result.images[0].mime_type(), Some("image/png"));
}

#[tokio::test]
async fn test_http_error_propagates() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(402).set_body_string("API Error: insufficient credits"))
        .mount(&server)
        .await;

    let request = GenerationRequest::new("test", "openrouter/test");
    let err = generate_image_openrouter(Some(client_for(&server)), &request)
        .await
        .unwrap_err();

    match &err {
        Error::Http { status, body } => {
            assert_eq!(*status, 402);
            assert!(body.contains("API Error"));
        }
        other => panic!("expected HTTP error, got {other:?}"),
    }
    assert!(err.is_upstream());
}

#[tokio::test]
async fn test_unparseable_body_is_upstream_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/images/generations"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let request = GenerationRequest::new("test", "dall-e-3");
    let err = generate_image_llm(Some(client_for(&server)), &request)
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Upstream(_)));
}

async fn mount_chat_response(server: &MockServer, body: serde_json::Value) {
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .expect(1)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_chat_content_parts_yield_text() {
    let server = MockServer::start().await;
    mount_chat_response(
        &server,
        json!({
            "choices": [{
                "message": {
                    "role": "assistant",
                    "content": [
                        {"type": "text", "text": "Here is your image"},
                        {"type": "image_url", "image_url": {"url": "https://example.com/inline.png"}}
                    ],
                    "images": [{
                        "type": "image_url",
                        "image_url": {"url": "https://example.com/1.png"}
                    }]
                }
            }]
        }),
    )
    .await;

    let request = GenerationRequest::new("A cat", "openrouter/test");
    let result = generate_image_openrouter(Some(client_for(&server)), &request)
        .await
        .unwrap();

    assert_eq!(result.text.as_deref(), Some("Here is your image"));
    assert_eq!(result.image_urls(), vec!["https://example.com/1.png"]);
}

#[tokio::test]
async fn test_chat_null_image_entry_is_skipped() {
    let server = MockServer::start().await;
    mount_chat_response(
        &server,
        json!({
            "choices": [{
                "message": {
                    "content": "Generated",
                    "images": [
                        null,
                        "not an object",
                        {"image_url": {"url": "https://example.com/1.png"}}
                    ]
                }
            }]
        }),
    )
    .await;

    let request = GenerationRequest::new("A cat", "openrouter/test");
    let result = generate_image_openrouter(Some(client_for(&server)), &request)
        .await
        .unwrap();

    assert_eq!(result.text.as_deref(), Some("Generated"));
    assert_eq!(result.image_urls(), vec!["https://example.com/1.png"]);
}

#[tokio::test]
async fn test_chat_choice_without_message() {
    let server = MockServer::start().await;
    mount_chat_response(
        &server,
        json!({
            "id": "gen-2",
            "choices": [{"index": 0, "finish_reason": "error"}]
        }),
    )
    .await;

    let request = GenerationRequest::new("A cat", "openrouter/test");
    let result = generate_image_openrouter(Some(client_for(&server)), &request)
        .await
        .unwrap();

    assert_eq!(result.text, None);
    assert!(result.images.is_empty());
}

#[tokio::test]
async fn test_chat_null_content_keeps_images() {
    let server = MockServer::start().await;
    mount_chat_response(
        &server,
        json!({
            "choices": [{
                "message": {
                    "role": "assistant",
                    "content": null,
                    "images": [{
                        "type": "image_url",
                        "image_url": {"url": "data:image/png;base64,iVBORw0KGgo="}
                    }]
                }
            }]
        }),
    )
    .await;

    let request = GenerationRequest::new("A cat", "openrouter/test");
    let result = generate_image_openrouter(Some(client_for(&server)), &request)
        .await
        .unwrap();

    assert_eq!(result.text, None);
    assert_eq!(result.images.len(), 1);
    assert_eq!(result.images[0].mime_type(), Some("image/png"));
}
