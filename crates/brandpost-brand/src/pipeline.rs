//! Folder-level review workflow.

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::error::BrandError;
use crate::extract::extract_profile;
use crate::model::GenerativeModel;
use crate::review::review_post;
use crate::types::{BrandProfile, Outcome, ReviewVerdict};

/// Extraction result for one reference image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReferenceProfile {
    pub file_name: String,
    pub profile: Outcome<BrandProfile>,
}

/// Everything one workflow run produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BrandReviewReport {
    pub references: Vec<ReferenceProfile>,
    pub candidate: Outcome<BrandProfile>,
    pub verdict: Outcome<ReviewVerdict>,
}

impl BrandReviewReport {
    /// Profiles that made it into the reference set.
    pub fn reference_set(&self) -> impl Iterator<Item = &BrandProfile> {
        self.references.iter().filter_map(|r| r.profile.completed())
    }
}

/// Review `candidate_path` against every image in `reference_dir`.
///
/// 1. List regular, non-hidden files in `reference_dir`, sorted by name.
/// 2. Extract each reference, one model call at a time.
/// 3. Keep only completed extractions as the reference set.
/// 4. Extract the candidate.
/// 5. Review the candidate, unless its extraction failed, in which case the
///    verdict is a failed outcome and the model is not called again.
///
/// # Errors
///
/// Returns [`BrandError::Io`] if `reference_dir` cannot be listed. Per-image
/// and model failures are reported inside the returned [`BrandReviewReport`].
pub async fn run_brand_review<M: GenerativeModel>(
    model: &M,
    reference_dir: &Path,
    candidate_path: &Path,
) -> Result<BrandReviewReport, BrandError> {
    let files = list_reference_images(reference_dir).await?;
    tracing::info!(
        dir = %reference_dir.display(),
        count = files.len(),
        "extracting reference profiles"
    );

    let mut references = Vec::with_capacity(files.len());
    for path in files {
        let profile = extract_profile(model, &path).await;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        if let Some(reason) = profile.reason() {
            tracing::warn!(file = %file_name, reason, "reference excluded from review");
        }
        references.push(ReferenceProfile { file_name, profile });
    }

    let reference_set: Vec<BrandProfile> = references
        .iter()
        .filter_map(|r| r.profile.completed().cloned())
        .collect();

    let candidate = extract_profile(model, candidate_path).await;

    let verdict = match candidate.reason() {
        Some(reason) => {
            let reason = format!("candidate profile extraction failed: {reason}");
            tracing::warn!(candidate = %candidate_path.display(), "skipping review");
            Outcome::failed(ReviewVerdict::failed(&reason), reason)
        }
        None => review_post(model, &reference_set, candidate.value()).await,
    };

    tracing::info!(
        references = references.len(),
        usable = reference_set.len(),
        failed = verdict.is_failed(),
        "brand review finished"
    );

    Ok(BrandReviewReport {
        references,
        candidate,
        verdict,
    })
}

async fn list_reference_images(dir: &Path) -> Result<Vec<PathBuf>, BrandError> {
    let io_err = |source: std::io::Error| BrandError::Io {
        path: dir.to_path_buf(),
        source,
    };

    let mut entries = tokio::fs::read_dir(dir).await.map_err(io_err)?;
    let mut files = Vec::new();
    while let Some(entry) = entries.next_entry().await.map_err(io_err)? {
        if entry.file_name().to_string_lossy().starts_with('.') {
            continue;
        }
        // Follows symlinks, so a link to a regular file counts.
        match tokio::fs::metadata(entry.path()).await {
            Ok(meta) if meta.is_file() => files.push(entry.path()),
            Ok(_) => {}
            Err(e) => {
                tracing::debug!(path = %entry.path().display(), error = %e, "skipping entry");
            }
        }
    }
    files.sort();
    Ok(files)
}
