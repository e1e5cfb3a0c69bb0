//! Boundary to the external generative model.

use std::future::Future;

use crate::error::BrandError;

/// Raw image bytes with their MIME type, sent alongside a prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImagePart {
    pub mime_type: String,
    pub data: Vec<u8>,
}

/// One generation request: prompt text, an optional image, and whether the
/// model should be forced to answer with syntactically valid JSON.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelRequest {
    pub prompt: String,
    pub image: Option<ImagePart>,
    pub json_mode: bool,
}

impl ModelRequest {
    #[must_use]
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            image: None,
            json_mode: false,
        }
    }

    #[must_use]
    pub fn with_image(mut self, image: ImagePart) -> Self {
        self.image = Some(image);
        self
    }

    #[must_use]
    pub fn json(mut self) -> Self {
        self.json_mode = true;
        self
    }
}

/// A text-generating model. [`crate::GeminiClient`] is the production
/// implementation; tests substitute canned responses.
pub trait GenerativeModel {
    /// Run one blocking round-trip and return the generated text.
    ///
    /// # Errors
    ///
    /// Returns [`BrandError`] on transport, status, or response-shape failures.
    fn generate(
        &self,
        request: &ModelRequest,
    ) -> impl Future<Output = Result<String, BrandError>> + Send;
}
