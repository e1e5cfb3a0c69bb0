//! On-disk storage for uploaded post images.

use std::io;
use std::path::{Path, PathBuf};

use image::ImageFormat;
use uuid::Uuid;

const IMAGES_DIR: &str = "images";
const FALLBACK_NAME: &str = "upload";

/// Writes uploads under `<root>/images/` and maps stored paths to public URLs.
#[derive(Debug, Clone)]
pub struct ImageStore {
    root: PathBuf,
    url_prefix: String,
}

impl ImageStore {
    #[must_use]
    pub fn new(root: impl Into<PathBuf>, url_prefix: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            url_prefix: url_prefix.into(),
        }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Persist `bytes` and return the path relative to the store root
    /// (`images/<uuid>-<stem>.<ext>`), which is what gets stored on the post.
    /// The extension comes from `format`, never from the client's file name.
    ///
    /// # Errors
    ///
    /// Returns the underlying I/O error if the directory cannot be created or
    /// the file cannot be written.
    pub async fn save(
        &self,
        original_name: &str,
        format: ImageFormat,
        bytes: &[u8],
    ) -> io::Result<String> {
        let dir = self.root.join(IMAGES_DIR);
        tokio::fs::create_dir_all(&dir).await?;

        let file_name = format!("{}-{}", Uuid::new_v4(), stored_name(original_name, format));
        tokio::fs::write(dir.join(&file_name), bytes).await?;

        let relative = format!("{IMAGES_DIR}/{file_name}");
        tracing::debug!(path = %relative, size = bytes.len(), "image stored");
        Ok(relative)
    }

    /// Remove a previously saved image. Missing files are not an error.
    ///
    /// # Errors
    ///
    /// Returns any I/O error other than `NotFound`.
    pub async fn remove(&self, relative: &str) -> io::Result<()> {
        match tokio::fs::remove_file(self.root.join(relative)).await {
            Err(e) if e.kind() != io::ErrorKind::NotFound => Err(e),
            _ => Ok(()),
        }
    }

    #[must_use]
    pub fn url_for(&self, relative: &str) -> String {
        format!(
            "{}/{}",
            self.url_prefix.trim_end_matches('/'),
            relative.trim_start_matches('/')
        )
    }
}

/// Keep ASCII alphanumerics plus `.`, `-` and `_`; drop any directory part.
fn sanitize_file_name(name: &str) -> String {
    let base = name.rsplit(['/', '\\']).next().unwrap_or_default();
    let cleaned: String = base
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_'))
        .collect();
    let cleaned = cleaned.trim_start_matches('.');
    if cleaned.is_empty() {
        FALLBACK_NAME.to_string()
    } else {
        cleaned.to_string()
    }
}

/// Sanitized stem of `original_name` with the extension of `format`.
fn stored_name(original_name: &str, format: ImageFormat) -> String {
    let cleaned = sanitize_file_name(original_name);
    let stem = match cleaned.rsplit_once('.') {
        Some((stem, _)) if !stem.is_empty() => stem,
        _ => cleaned.as_str(),
    };
    let ext = format.extensions_str().first().copied().unwrap_or("img");
    format!("{stem}.{ext}")
}
