//! Brand profile extraction from a single image.

use std::path::Path;

use serde_json::Value;

use crate::error::BrandError;
use crate::model::{GenerativeModel, ImagePart, ModelRequest};
use crate::types::{BrandProfile, Outcome, NOT_AVAILABLE};

pub const EXTRACTION_PROMPT: &str = r#"Analyze the brand profile image and extract the specified attributes in JSON format.

Please extract the following attributes:
- tone_of_voice
- target_audience
- emotion

Example Output:
{
    "tone_of_voice": "Energetic and Fun",
    "target_audience": "Young Adults (18-25)",
    "emotion": "Excitement"
}"#;

/// Extract a brand profile from the image at `image_path`.
///
/// Never fails: unreadable files, undecodable images, model errors and
/// malformed responses all produce [`Outcome::Failed`] with the `"Error"`
/// sentinel profile. The cause is logged and kept in the outcome's reason.
pub async fn extract_profile<M: GenerativeModel>(
    model: &M,
    image_path: &Path,
) -> Outcome<BrandProfile> {
    let result = match tokio::fs::read(image_path).await {
        Ok(bytes) => try_extract(model, bytes).await,
        Err(source) => Err(BrandError::Io {
            path: image_path.to_path_buf(),
            source,
        }),
    };

    match result {
        Ok(profile) => {
            tracing::debug!(path = %image_path.display(), "brand profile extracted");
            Outcome::Completed(profile)
        }
        Err(e) => {
            tracing::warn!(
                path = %image_path.display(),
                error = %e,
                "brand profile extraction failed"
            );
            Outcome::failed(BrandProfile::failed(), e.to_string())
        }
    }
}

/// Same contract as [`extract_profile`] for an image already in memory.
pub async fn extract_profile_from_bytes<M: GenerativeModel>(
    model: &M,
    bytes: Vec<u8>,
) -> Outcome<BrandProfile> {
    match try_extract(model, bytes).await {
        Ok(profile) => Outcome::Completed(profile),
        Err(e) => {
            tracing::warn!(error = %e, "brand profile extraction failed");
            Outcome::failed(BrandProfile::failed(), e.to_string())
        }
    }
}

async fn try_extract<M: GenerativeModel>(
    model: &M,
    bytes: Vec<u8>,
) -> Result<BrandProfile, BrandError> {
    let image = load_image(bytes)?;
    let request = ModelRequest::new(EXTRACTION_PROMPT).with_image(image);
    let text = model.generate(&request).await?;
    parse_profile(&text)
}

/// Check that `bytes` decode as a raster image and tag them with a MIME type.
pub(crate) fn load_image(bytes: Vec<u8>) -> Result<ImagePart, BrandError> {
    let format = image::guess_format(&bytes)?;
    image::load_from_memory_with_format(&bytes, format)?;
    Ok(ImagePart {
        mime_type: format.to_mime_type().to_string(),
        data: bytes,
    })
}

/// Remove markdown code-fence markers the model may wrap around its JSON.
pub(crate) fn strip_code_fences(raw: &str) -> String {
    raw.trim()
        .replace("```json", "")
        .replace("```", "")
        .trim()
        .to_string()
}

/// Parse the model's answer into a profile.
///
/// Missing or `null` attributes become `"N/A"`; non-string values are kept
/// as their JSON text. Anything that is not a JSON object is an error.
pub(crate) fn parse_profile(raw: &str) -> Result<BrandProfile, BrandError> {
    let cleaned = strip_code_fences(raw);
    let value: Value =
        serde_json::from_str(&cleaned).map_err(|source| BrandError::Deserialize {
            context: "brand profile".to_string(),
            source,
        })?;

    let fields = match value {
        Value::Object(fields) => fields,
        other => {
            return Err(BrandError::UnexpectedShape {
                context: "brand profile".to_string(),
                found: json_kind(&other).to_string(),
            })
        }
    };

    let field = |name: &str| match fields.get(name) {
        None | Some(Value::Null) => NOT_AVAILABLE.to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    };

    Ok(BrandProfile {
        tone_of_voice: field("tone_of_voice"),
        target_audience: field("target_audience"),
        emotion: field("emotion"),
    })
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
