//! Brand review command handlers.

use std::path::Path;

use anyhow::Context;
use serde::Serialize;

use brandpost_brand::{BrandReviewReport, GeminiClient};

fn model_client() -> anyhow::Result<GeminiClient> {
    let config = brandpost_core::load_model_config()?;
    tracing::debug!(model = %config.model, "using generative model");
    GeminiClient::from_config(&config).context("failed to build model client")
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Run the folder workflow and print the report as JSON.
///
/// # Errors
///
/// Returns an error if the model config is missing, the reference directory
/// cannot be read, or `strict` is set and the verdict failed.
pub(crate) async fn run_review(
    references: &Path,
    candidate: &Path,
    strict: bool,
) -> anyhow::Result<()> {
    let client = model_client()?;
    let report = brandpost_brand::run_brand_review(&client, references, candidate)
        .await
        .with_context(|| format!("brand review of {} failed", candidate.display()))?;

    print_json(&report)?;
    eprintln!("{}", summary_line(&report));

    if strict {
        if let Some(reason) = report.verdict.reason() {
            anyhow::bail!("review did not complete: {reason}");
        }
    }
    Ok(())
}

/// Extract one image's profile and print it as JSON.
///
/// # Errors
///
/// Returns an error if the model config is missing.
pub(crate) async fn run_extract(image: &Path) -> anyhow::Result<()> {
    let client = model_client()?;
    let outcome = brandpost_brand::extract_profile(&client, image).await;
    print_json(&outcome)
}

fn summary_line(report: &BrandReviewReport) -> String {
    let usable = report.reference_set().count();
    let verdict = report.verdict.value();
    if report.verdict.is_failed() {
        format!(
            "review failed ({usable}/{} references usable)",
            report.references.len()
        )
    } else {
        format!(
            "engagement: {}, on-brand: {} ({usable}/{} references usable)",
            verdict.engagement_score,
            verdict.on_brand_score,
            report.references.len()
        )
    }
}

#[cfg(test)]
mod tests {
    use brandpost_brand::{BrandProfile, Outcome, ReferenceProfile, ReviewVerdict, Score};

    use super::*;

    fn report(verdict: Outcome<ReviewVerdict>) -> BrandReviewReport {
        BrandReviewReport {
            references: vec![
                ReferenceProfile {
                    file_name: "a.png".to_string(),
                    profile: Outcome::Completed(BrandProfile::new("Bold", "Gen Z", "Joy")),
                },
                ReferenceProfile {
                    file_name: "b.png".to_string(),
                    profile: Outcome::failed(BrandProfile::failed(), "decode error"),
                },
            ],
            candidate: Outcome::Completed(BrandProfile::new("Bold", "Gen Z", "Hype")),
            verdict,
        }
    }

    #[test]
    fn summary_reports_scores_and_usable_references() {
        let line = summary_line(&report(Outcome::Completed(ReviewVerdict {
            engagement_score: Score::Good,
            on_brand_score: Score::Medium,
            feedback: vec![],
        })));
        assert_eq!(line, "engagement: good, on-brand: medium (1/2 references usable)");
    }

    #[test]
    fn summary_reports_failure() {
        let line = summary_line(&report(Outcome::failed(
            ReviewVerdict::failed("timeout"),
            "timeout",
        )));
        assert_eq!(line, "review failed (1/2 references usable)");
    }
}
