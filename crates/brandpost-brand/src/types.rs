use serde::{Deserialize, Serialize, Serializer};

/// Field value written into every profile field when extraction fails.
pub const FAILURE_SENTINEL: &str = "Error";

/// Field value used when the model response omits an attribute.
pub const NOT_AVAILABLE: &str = "N/A";

/// Brand attributes read from a single image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrandProfile {
    pub tone_of_voice: String,
    pub target_audience: String,
    pub emotion: String,
}

impl BrandProfile {
    #[must_use]
    pub fn new(
        tone_of_voice: impl Into<String>,
        target_audience: impl Into<String>,
        emotion: impl Into<String>,
    ) -> Self {
        Self {
            tone_of_voice: tone_of_voice.into(),
            target_audience: target_audience.into(),
            emotion: emotion.into(),
        }
    }

    /// The sentinel profile: all three fields set to `"Error"`.
    #[must_use]
    pub fn failed() -> Self {
        Self::new(FAILURE_SENTINEL, FAILURE_SENTINEL, FAILURE_SENTINEL)
    }
}

/// Closed three-step rating used for both review scores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Score {
    #[serde(alias = "Bad", alias = "BAD")]
    Bad,
    #[serde(alias = "Medium", alias = "MEDIUM")]
    Medium,
    #[serde(alias = "Good", alias = "GOOD")]
    Good,
}

impl std::fmt::Display for Score {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Score::Bad => write!(f, "bad"),
            Score::Medium => write!(f, "medium"),
            Score::Good => write!(f, "good"),
        }
    }
}

/// Result of comparing a candidate profile against the reference set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewVerdict {
    pub engagement_score: Score,
    pub on_brand_score: Score,
    #[serde(default)]
    pub feedback: Vec<String>,
}

impl ReviewVerdict {
    /// Fallback verdict: both scores `bad`, one feedback line carrying `reason`.
    #[must_use]
    pub fn failed(reason: &str) -> Self {
        Self {
            engagement_score: Score::Bad,
            on_brand_score: Score::Bad,
            feedback: vec![format!("An error occurred: {reason}")],
        }
    }
}

/// Outcome of one best-effort pipeline stage.
///
/// A failed stage still yields a usable value (`fallback`, holding the
/// sentinel), so callers that only want a value can call [`Outcome::value`]
/// while callers that care can branch on the variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome<T> {
    Completed(T),
    Failed { fallback: T, reason: String },
}

impl<T> Outcome<T> {
    pub fn failed(fallback: T, reason: impl Into<String>) -> Self {
        Self::Failed {
            fallback,
            reason: reason.into(),
        }
    }

    #[must_use]
    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }

    /// The completed value, or the sentinel fallback on failure.
    #[must_use]
    pub fn value(&self) -> &T {
        match self {
            Self::Completed(value) | Self::Failed { fallback: value, .. } => value,
        }
    }

    #[must_use]
    pub fn into_value(self) -> T {
        match self {
            Self::Completed(value) | Self::Failed { fallback: value, .. } => value,
        }
    }

    /// The value only if the stage completed.
    #[must_use]
    pub fn completed(&self) -> Option<&T> {
        match self {
            Self::Completed(value) => Some(value),
            Self::Failed { .. } => None,
        }
    }

    #[must_use]
    pub fn reason(&self) -> Option<&str> {
        match self {
            Self::Completed(_) => None,
            Self::Failed { reason, .. } => Some(reason),
        }
    }
}

#[derive(Serialize)]
struct OutcomeRepr<'a, T> {
    status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    reason: Option<&'a str>,
    #[serde(flatten)]
    value: &'a T,
}

impl<T: Serialize> Serialize for Outcome<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let repr = OutcomeRepr {
            status: if self.is_failed() {
                "failed"
            } else {
                "completed"
            },
            reason: self.reason(),
            value: self.value(),
        };
        repr.serialize(serializer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failed_profile_uses_sentinel_everywhere() {
        let profile = BrandProfile::failed();
        assert_eq!(profile.tone_of_voice, "Error");
        assert_eq!(profile.target_audience, "Error");
        assert_eq!(profile.emotion, "Error");
    }

    #[test]
    fn failed_verdict_has_bad_scores_and_one_feedback_line() {
        let verdict = ReviewVerdict::failed("connection reset");
        assert_eq!(verdict.engagement_score, Score::Bad);
        assert_eq!(verdict.on_brand_score, Score::Bad);
        assert_eq!(verdict.feedback, vec!["An error occurred: connection reset"]);
    }

    #[test]
    fn scores_are_ordered() {
        assert!(Score::Bad < Score::Medium);
        assert!(Score::Medium < Score::Good);
    }

    #[test]
    fn score_accepts_capitalized_alias() {
        let score: Score = serde_json::from_str("\"Good\"").expect("alias");
        assert_eq!(score, Score::Good);
        assert!(serde_json::from_str::<Score>("\"great\"").is_err());
    }

    #[test]
    fn verdict_feedback_defaults_to_empty() {
        let verdict: ReviewVerdict =
            serde_json::from_str(r#"{"engagement_score":"good","on_brand_score":"medium"}"#)
                .expect("partial verdict");
        assert!(verdict.feedback.is_empty());
        assert_eq!(verdict.on_brand_score, Score::Medium);
    }

    #[test]
    fn outcome_value_falls_back_to_sentinel() {
        let outcome = Outcome::failed(BrandProfile::failed(), "decode error");
        assert!(outcome.is_failed());
        assert!(outcome.completed().is_none());
        assert_eq!(outcome.reason(), Some("decode error"));
        assert_eq!(outcome.value(), &BrandProfile::failed());
    }

    #[test]
    fn outcome_serializes_status_and_flattened_value() {
        let ok = Outcome::Completed(BrandProfile::new("Bold", "Gen Z", "Joy"));
        let json = serde_json::to_value(&ok).expect("serialize");
        assert_eq!(json["status"], "completed");
        assert_eq!(json["tone_of_voice"], "Bold");
        assert!(json.get("reason").is_none());

        let failed = Outcome::failed(ReviewVerdict::failed("boom"), "boom");
        let json = serde_json::to_value(&failed).expect("serialize");
        assert_eq!(json["status"], "failed");
        assert_eq!(json["reason"], "boom");
        assert_eq!(json["engagement_score"], "bad");
        assert_eq!(json["feedback"][0], "An error occurred: boom");
    }
}
