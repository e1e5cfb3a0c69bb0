//! HTTP client for the Google Generative Language `generateContent` API.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use reqwest::{Client, Url};
use serde::{Deserialize, Serialize};

use crate::error::BrandError;
use crate::model::{GenerativeModel, ModelRequest};

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
const API_KEY_HEADER: &str = "x-goog-api-key";
const JSON_MIME_TYPE: &str = "application/json";
/// Longest error body kept in [`BrandError::UnexpectedStatus`].
const MAX_ERROR_BODY_CHARS: usize = 500;

/// Client for Gemini `generateContent`.
///
/// No retries and no request timeout: a call waits until the service answers
/// or the connection fails. Use [`GeminiClient::with_base_url`] to point at a
/// mock server in tests.
pub struct GeminiClient {
    client: Client,
    api_key: String,
    model: String,
    endpoint: Url,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: [Content<'a>; 1],
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

#[derive(Serialize)]
struct Content<'a> {
    role: &'static str,
    parts: Vec<Part<'a>>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Part<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    inline_data: Option<InlineData<'a>>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct InlineData<'a> {
    mime_type: &'a str,
    data: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_mime_type: &'static str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

impl GeminiClient {
    /// Creates a client pointed at the production Gemini API.
    ///
    /// # Errors
    ///
    /// Returns [`BrandError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(api_key: &str, model: &str) -> Result<Self, BrandError> {
        Self::with_base_url(api_key, model, DEFAULT_BASE_URL)
    }

    /// Creates a client from loaded model settings.
    ///
    /// # Errors
    ///
    /// See [`GeminiClient::with_base_url`].
    pub fn from_config(config: &brandpost_core::ModelConfig) -> Result<Self, BrandError> {
        Self::with_base_url(&config.api_key, &config.model, &config.base_url)
    }

    /// Creates a client with a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`BrandError::Http`] if the `reqwest::Client` cannot be built,
    /// or [`BrandError::InvalidBaseUrl`] if `base_url` does not parse.
    pub fn with_base_url(api_key: &str, model: &str, base_url: &str) -> Result<Self, BrandError> {
        let client = Client::builder()
            .user_agent("brandpost/0.1 (brand-review)")
            .build()?;

        let raw = format!(
            "{}/v1beta/models/{model}:generateContent",
            base_url.trim_end_matches('/')
        );
        let endpoint = Url::parse(&raw).map_err(|e| BrandError::InvalidBaseUrl {
            base_url: base_url.to_owned(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            client,
            api_key: api_key.to_owned(),
            model: model.to_owned(),
            endpoint,
        })
    }

    #[must_use]
    pub fn model(&self) -> &str {
        &self.model
    }

    #[must_use]
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    fn build_body(request: &ModelRequest) -> GenerateContentRequest<'_> {
        let mut parts = vec![Part {
            text: Some(&request.prompt),
            inline_data: None,
        }];
        if let Some(image) = &request.image {
            parts.push(Part {
                text: None,
                inline_data: Some(InlineData {
                    mime_type: &image.mime_type,
                    data: STANDARD.encode(&image.data),
                }),
            });
        }

        GenerateContentRequest {
            contents: [Content {
                role: "user",
                parts,
            }],
            generation_config: request.json_mode.then_some(GenerationConfig {
                response_mime_type: JSON_MIME_TYPE,
            }),
        }
    }

    fn extract_text(response: GenerateContentResponse) -> Result<String, BrandError> {
        let text: String = response
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|content| {
                content
                    .parts
                    .into_iter()
                    .filter_map(|p| p.text)
                    .collect()
            })
            .unwrap_or_default();

        if !text.is_empty() {
            return Ok(text);
        }
        if let Some(reason) = response.prompt_feedback.and_then(|f| f.block_reason) {
            return Err(BrandError::Blocked(reason));
        }
        Err(BrandError::EmptyResponse)
    }
}

impl GenerativeModel for GeminiClient {
    async fn generate(&self, request: &ModelRequest) -> Result<String, BrandError> {
        let body = Self::build_body(request);
        tracing::debug!(
            model = %self.model,
            json_mode = request.json_mode,
            has_image = request.image.is_some(),
            "calling generateContent"
        );

        let response = self
            .client
            .post(self.endpoint.clone())
            .header(API_KEY_HEADER, &self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(BrandError::UnexpectedStatus {
                status: status.as_u16(),
                body: body.chars().take(MAX_ERROR_BODY_CHARS).collect(),
            });
        }

        let bytes = response.bytes().await?;
        let parsed: GenerateContentResponse =
            serde_json::from_slice(&bytes).map_err(|source| BrandError::Deserialize {
                context: format!("generateContent({})", self.model),
                source,
            })?;

        Self::extract_text(parsed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ImagePart;

    #[test]
    fn endpoint_includes_model_and_method() {
        let client = GeminiClient::with_base_url("k", "gemini-2.5-flash", "http://localhost:1234/")
            .expect("client");
        assert_eq!(
            client.endpoint().as_str(),
            "http://localhost:1234/v1beta/models/gemini-2.5-flash:generateContent"
        );
    }

    #[test]
    fn invalid_base_url_is_rejected() {
        let result = GeminiClient::with_base_url("k", "m", "not a url");
        assert!(matches!(result, Err(BrandError::InvalidBaseUrl { .. })));
    }

    #[test]
    fn text_only_body_has_no_generation_config() {
        let request = ModelRequest::new("describe");
        let json = serde_json::to_value(GeminiClient::build_body(&request)).expect("serialize");
        assert_eq!(json["contents"][0]["role"], "user");
        assert_eq!(json["contents"][0]["parts"][0]["text"], "describe");
        assert_eq!(json["contents"][0]["parts"].as_array().map(Vec::len), Some(1));
        assert!(json.get("generationConfig").is_none());
    }

    #[test]
    fn image_and_json_mode_are_encoded() {
        let request = ModelRequest::new("describe")
            .with_image(ImagePart {
                mime_type: "image/png".to_string(),
                data: vec![1, 2, 3],
            })
            .json();
        let json = serde_json::to_value(GeminiClient::build_body(&request)).expect("serialize");
        let inline = &json["contents"][0]["parts"][1]["inlineData"];
        assert_eq!(inline["mimeType"], "image/png");
        assert_eq!(inline["data"], "AQID");
        assert_eq!(
            json["generationConfig"]["responseMimeType"],
            "application/json"
        );
    }

    #[test]
    fn extract_text_joins_parts_of_first_candidate() {
        let response: GenerateContentResponse = serde_json::from_value(serde_json::json!({
            "candidates": [
                { "content": { "parts": [ { "text": "{\"a\":" }, { "text": "1}" } ] } },
                { "content": { "parts": [ { "text": "ignored" } ] } }
            ]
        }))
        .expect("response");
        assert_eq!(GeminiClient::extract_text(response).expect("text"), "{\"a\":1}");
    }

    #[test]
    fn extract_text_reports_block_reason() {
        let response: GenerateContentResponse = serde_json::from_value(serde_json::json!({
            "promptFeedback": { "blockReason": "SAFETY" }
        }))
        .expect("response");
        let err = GeminiClient::extract_text(response).expect_err("blocked");
        assert!(matches!(err, BrandError::Blocked(ref r) if r == "SAFETY"));
    }

    #[test]
    fn extract_text_without_candidates_is_empty_response() {
        let response: GenerateContentResponse =
            serde_json::from_value(serde_json::json!({})).expect("response");
        assert!(matches!(
            GeminiClient::extract_text(response),
            Err(BrandError::EmptyResponse)
        ));
    }
}
