//! Consistency review of a candidate profile against reference profiles.

use crate::error::BrandError;
use crate::model::{GenerativeModel, ModelRequest};
use crate::types::{BrandProfile, Outcome, ReviewVerdict};

/// Ask the model how well `candidate` matches the `references`.
///
/// An empty reference set is accepted and still costs one model call. The
/// call runs in JSON mode and the answer is parsed as-is (no fence
/// stripping). Any failure yields [`Outcome::Failed`] whose fallback is
/// [`ReviewVerdict::failed`] carrying the error text.
pub async fn review_post<M: GenerativeModel>(
    model: &M,
    references: &[BrandProfile],
    candidate: &BrandProfile,
) -> Outcome<ReviewVerdict> {
    match try_review(model, references, candidate).await {
        Ok(verdict) => {
            tracing::debug!(
                references = references.len(),
                engagement = %verdict.engagement_score,
                on_brand = %verdict.on_brand_score,
                "post reviewed"
            );
            Outcome::Completed(verdict)
        }
        Err(e) => {
            tracing::warn!(error = %e, "post review failed");
            let reason = e.to_string();
            Outcome::failed(ReviewVerdict::failed(&reason), reason)
        }
    }
}

async fn try_review<M: GenerativeModel>(
    model: &M,
    references: &[BrandProfile],
    candidate: &BrandProfile,
) -> Result<ReviewVerdict, BrandError> {
    let prompt = build_review_prompt(references, candidate)?;
    let text = model.generate(&ModelRequest::new(prompt).json()).await?;
    parse_verdict(&text)
}

pub(crate) fn build_review_prompt(
    references: &[BrandProfile],
    candidate: &BrandProfile,
) -> Result<String, BrandError> {
    let references_json = serde_json::to_string_pretty(references)?;
    let candidate_json = serde_json::to_string_pretty(candidate)?;

    Ok(format!(
        r#"You are a brand consistency expert. Your task is to review a new social media post against a list of established brand standards.

Established Brand Standards (from previous successful posts):
{references_json}

New Post to Review:
{candidate_json}

Please provide a review of the new post in JSON format with the following structure:
{{
    "engagement_score": "bad" | "medium" | "good",
    "on_brand_score": "bad" | "medium" | "good",
    "feedback": ["list of concise feedback strings"]
}}

Analyze the alignment in tone_of_voice, target_audience, and emotion. Provide constructive feedback."#
    ))
}

pub(crate) fn parse_verdict(raw: &str) -> Result<ReviewVerdict, BrandError> {
    serde_json::from_str(raw).map_err(|source| BrandError::Deserialize {
        context: "review verdict".to_string(),
        source,
    })
}
