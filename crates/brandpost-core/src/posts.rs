//! Classification vocabulary for posts.
//!
//! Values are stored and exchanged in their display form (`"Case Study"`,
//! `"Needs Review"`), so the serde names match [`std::fmt::Display`].

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::CoreError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Marketing,
    Product,
    #[serde(rename = "Case Study")]
    CaseStudy,
    Research,
    Promotion,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::Marketing,
        Category::Product,
        Category::CaseStudy,
        Category::Research,
        Category::Promotion,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Category::Marketing => "Marketing",
            Category::Product => "Product",
            Category::CaseStudy => "Case Study",
            Category::Research => "Research",
            Category::Promotion => "Promotion",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Self::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| CoreError::InvalidCategory(s.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Platform {
    LinkedIn,
    Facebook,
    Instagram,
    Twitter,
    Blog,
}

impl Platform {
    pub const ALL: [Platform; 5] = [
        Platform::LinkedIn,
        Platform::Facebook,
        Platform::Instagram,
        Platform::Twitter,
        Platform::Blog,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Platform::LinkedIn => "LinkedIn",
            Platform::Facebook => "Facebook",
            Platform::Instagram => "Instagram",
            Platform::Twitter => "Twitter",
            Platform::Blog => "Blog",
        }
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Platform {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Self::ALL
            .into_iter()
            .find(|p| p.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| CoreError::InvalidPlatform(s.to_string()))
    }
}

/// Publication workflow state of a post.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PostStatus {
    #[default]
    #[serde(rename = "Needs Review")]
    NeedsReview,
    #[serde(rename = "Ready to Publish")]
    ReadyToPublish,
}

impl PostStatus {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            PostStatus::NeedsReview => "Needs Review",
            PostStatus::ReadyToPublish => "Ready to Publish",
        }
    }
}

impl std::fmt::Display for PostStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PostStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        [PostStatus::NeedsReview, PostStatus::ReadyToPublish]
            .into_iter()
            .find(|st| st.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| CoreError::InvalidStatus(s.to_string()))
    }
}
