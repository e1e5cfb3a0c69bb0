//! Brand-consistency review pipeline for brandpost.
//!
//! Extracts a brand profile (tone of voice, target audience, emotion) from
//! each image with a multimodal generative model, then asks the model to judge
//! a candidate post's profile against the reference set. Model and parse
//! failures never escape as errors: every stage returns an [`Outcome`] whose
//! failed variant still carries a sentinel value.

pub mod error;
pub mod extract;
pub mod gemini;
pub mod model;
pub mod pipeline;
pub mod review;
pub mod types;

#[cfg(test)]
pub(crate) mod testing;

pub use error::BrandError;
pub use extract::{extract_profile, extract_profile_from_bytes};
pub use gemini::GeminiClient;
pub use model::{GenerativeModel, ImagePart, ModelRequest};
pub use pipeline::{run_brand_review, BrandReviewReport, ReferenceProfile};
pub use review::review_post;
pub use types::{BrandProfile, Outcome, ReviewVerdict, Score};
