//! Integration tests for `GeminiClient` using wiremock HTTP mocks.

use std::io::Cursor;

use brandpost_brand::{
    extract_profile, review_post, BrandError, BrandProfile, GeminiClient, GenerativeModel,
    ImagePart, ModelRequest, Score,
};
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const MODEL: &str = "gemini-2.5-flash";
const ENDPOINT: &str = "/v1beta/models/gemini-2.5-flash:generateContent";

fn test_client(base_url: &str) -> GeminiClient {
    GeminiClient::with_base_url("test-key", MODEL, base_url)
        .expect("client construction should not fail")
}

fn text_response(text: &str) -> serde_json::Value {
    serde_json::json!({
        "candidates": [
            { "content": { "role": "model", "parts": [ { "text": text } ] } }
        ]
    })
}

fn png_bytes() -> Vec<u8> {
    let img = image::RgbImage::from_pixel(2, 2, image::Rgb([10, 20, 30]));
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgb8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .expect("encode png");
    buf
}

#[tokio::test]
async fn generate_posts_prompt_with_api_key_header() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(ENDPOINT))
        .and(header("x-goog-api-key", "test-key"))
        .and(body_partial_json(serde_json::json!({
            "contents": [ { "role": "user", "parts": [ { "text": "hello" } ] } ]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(text_response("hi there")))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let text = client
        .generate(&ModelRequest::new("hello"))
        .await
        .expect("should return text");

    assert_eq!(text, "hi there");
}

#[tokio::test]
async fn json_mode_sets_response_mime_type() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(ENDPOINT))
        .and(body_partial_json(serde_json::json!({
            "generationConfig": { "responseMimeType": "application/json" }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(text_response("{}")))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let text = client
        .generate(&ModelRequest::new("score this").json())
        .await
        .expect("should return text");

    assert_eq!(text, "{}");
}

#[tokio::test]
async fn image_is_sent_as_base64_inline_data() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(ENDPOINT))
        .and(body_partial_json(serde_json::json!({
            "contents": [ { "parts": [
                { "text": "describe" },
                { "inlineData": { "mimeType": "image/jpeg", "data": "/9j/" } }
            ] } ]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(text_response("ok")))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let request = ModelRequest::new("describe").with_image(ImagePart {
        mime_type: "image/jpeg".to_string(),
        data: vec![0xFF, 0xD8, 0xFF],
    });

    client.generate(&request).await.expect("should return text");
}

#[tokio::test]
async fn non_success_status_is_reported_with_body() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(ENDPOINT))
        .respond_with(ResponseTemplate::new(429).set_body_string("quota exceeded"))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let err = client
        .generate(&ModelRequest::new("hello"))
        .await
        .expect_err("429 should fail");

    match err {
        BrandError::UnexpectedStatus { status, body } => {
            assert_eq!(status, 429);
            assert_eq!(body, "quota exceeded");
        }
        other => panic!("expected UnexpectedStatus, got {other:?}"),
    }
}

#[tokio::test]
async fn malformed_envelope_is_a_deserialize_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(ENDPOINT))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let err = client
        .generate(&ModelRequest::new("hello"))
        .await
        .expect_err("html should fail");

    assert!(matches!(err, BrandError::Deserialize { .. }));
}

#[tokio::test]
async fn blocked_prompt_is_reported() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(ENDPOINT))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "promptFeedback": { "blockReason": "SAFETY" }
        })))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let err = client
        .generate(&ModelRequest::new("hello"))
        .await
        .expect_err("blocked should fail");

    assert!(matches!(err, BrandError::Blocked(ref reason) if reason == "SAFETY"));
}

#[tokio::test]
async fn extract_profile_end_to_end() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(ENDPOINT))
        .and(body_partial_json(serde_json::json!({
            "contents": [ { "parts": [ {}, { "inlineData": { "mimeType": "image/png" } } ] } ]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(text_response(
            "```json\n{\"tone_of_voice\":\"Warm\",\"target_audience\":\"Families\",\"emotion\":\"Comfort\"}\n```",
        )))
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().expect("tempdir");
    let image_path = dir.path().join("post.png");
    std::fs::write(&image_path, png_bytes()).expect("write png");

    let client = test_client(&server.uri());
    let outcome = extract_profile(&client, &image_path).await;

    assert!(!outcome.is_failed());
    assert_eq!(
        outcome.into_value(),
        BrandProfile::new("Warm", "Families", "Comfort")
    );
}

#[tokio::test]
async fn review_post_absorbs_server_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(ENDPOINT))
        .respond_with(ResponseTemplate::new(500).set_body_string("backend exploded"))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let candidate = BrandProfile::new("Bold", "Gen Z", "Joy");
    let outcome = review_post(&client, &[], &candidate).await;

    assert!(outcome.is_failed());
    let verdict = outcome.value();
    assert_eq!(verdict.engagement_score, Score::Bad);
    assert_eq!(verdict.on_brand_score, Score::Bad);
    assert!(verdict.feedback[0].contains("backend exploded"));
}
