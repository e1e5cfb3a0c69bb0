//! Post handlers: multipart create, list, delete.

use axum::{
    body::Bytes,
    extract::{
        multipart::{MultipartError, MultipartRejection},
        Multipart, Path, State,
    },
    http::StatusCode,
    Extension, Json,
};
use image::ImageFormat;
use brandpost_core::{Category, Platform, PostStatus};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::media::ImageStore;
use crate::middleware::RequestId;

use super::{map_db_error, ApiError, ApiResponse, AppState, ResponseMeta};

const MAX_TITLE_CHARS: usize = 200;

#[derive(Debug, Serialize)]
pub(super) struct PostItem {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub category: Option<String>,
    pub platform: Option<String>,
    pub image: Option<String>,
    pub image_url: Option<String>,
    pub status: String,
    pub date: DateTime<Utc>,
}

impl PostItem {
    fn from_row(row: brandpost_db::PostRow, images: &ImageStore) -> Self {
        let image_url = row.image.as_deref().map(|p| images.url_for(p));
        Self {
            id: row.id,
            title: row.title,
            content: row.content,
            category: row.category,
            platform: row.platform,
            image: row.image,
            image_url,
            status: row.status,
            date: row.date,
        }
    }
}

#[derive(Debug, Serialize)]
pub(super) struct DeletedData {
    pub deleted: bool,
}

struct Upload {
    file_name: String,
    bytes: Bytes,
}

#[derive(Default)]
struct ContentForm {
    title: Option<String>,
    content: Option<String>,
    category: Option<String>,
    platform: Option<String>,
    status: Option<String>,
    image: Option<Upload>,
}

/// Validated form, ready to insert.
struct ValidContent {
    title: String,
    content: String,
    category: Option<Category>,
    platform: Option<Platform>,
    status: PostStatus,
}

fn map_multipart_error(req_id: &str, e: &MultipartError) -> ApiError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ApiError::new(req_id, "payload_too_large", "upload exceeds the size limit")
    } else {
        ApiError::new(req_id, "bad_request", e.body_text())
    }
}

async fn read_form(
    req_id: &str,
    mut multipart: Multipart,
    max_upload_bytes: usize,
) -> Result<ContentForm, ApiError> {
    let mut form = ContentForm::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| map_multipart_error(req_id, &e))?
    {
        let name = field.name().unwrap_or_default().to_owned();

        if name == "image" {
            let file_name = field.file_name().unwrap_or_default().to_owned();
            let bytes = field
                .bytes()
                .await
                .map_err(|e| map_multipart_error(req_id, &e))?;
            if bytes.len() > max_upload_bytes {
                return Err(ApiError::new(
                    req_id,
                    "payload_too_large",
                    format!("image must be at most {max_upload_bytes} bytes"),
                ));
            }
            // Browsers send an empty file part when no file was chosen.
            if !bytes.is_empty() {
                form.image = Some(Upload { file_name, bytes });
            }
            continue;
        }

        let text = field
            .text()
            .await
            .map_err(|e| map_multipart_error(req_id, &e))?;
        match name.as_str() {
            "title" => form.title = Some(text),
            "content" | "text" => form.content = Some(text),
            "category" => form.category = Some(text),
            "platform" => form.platform = Some(text),
            "status" => form.status = Some(text),
            other => tracing::debug!(field = other, "ignoring unknown form field"),
        }
    }

    Ok(form)
}

/// Decode the upload to prove it is a raster image and report its format.
async fn check_image(req_id: &str, bytes: Bytes) -> Result<ImageFormat, ApiError> {
    let decoded = tokio::task::spawn_blocking(move || {
        let format = image::guess_format(&bytes)?;
        image::load_from_memory_with_format(&bytes, format)?;
        Ok::<_, image::ImageError>(format)
    })
    .await;

    match decoded {
        Ok(Ok(format)) => Ok(format),
        Ok(Err(e)) => {
            tracing::debug!(error = %e, "rejected non-image upload");
            Err(ApiError::new(
                req_id,
                "validation_error",
                "image must be a PNG, JPEG, GIF, WebP or BMP file",
            ))
        }
        Err(e) => {
            tracing::error!(error = %e, "image check task failed");
            Err(ApiError::new(req_id, "internal_error", "failed to read image"))
        }
    }
}

fn required(req_id: &str, field: &str, value: Option<&str>) -> Result<String, ApiError> {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v.to_owned()),
        _ => Err(ApiError::new(
            req_id,
            "validation_error",
            format!("{field} is required"),
        )),
    }
}

/// Parse an optional enum field; absent and blank both mean "not set".
fn optional<T>(req_id: &str, value: Option<&str>) -> Result<Option<T>, ApiError>
where
    T: std::str::FromStr<Err = brandpost_core::CoreError>,
{
    match value.map(str::trim) {
        None | Some("") => Ok(None),
        Some(v) => v
            .parse()
            .map(Some)
            .map_err(|e: brandpost_core::CoreError| {
                ApiError::new(req_id, "validation_error", e.to_string())
            }),
    }
}

fn validate(req_id: &str, form: &ContentForm) -> Result<ValidContent, ApiError> {
    let title = required(req_id, "title", form.title.as_deref())?;
    if title.chars().count() > MAX_TITLE_CHARS {
        return Err(ApiError::new(
            req_id,
            "validation_error",
            format!("title must be at most {MAX_TITLE_CHARS} characters"),
        ));
    }
    let content = required(req_id, "content", form.content.as_deref())?;

    Ok(ValidContent {
        title,
        content,
        category: optional(req_id, form.category.as_deref())?,
        platform: optional(req_id, form.platform.as_deref())?,
        status: optional(req_id, form.status.as_deref())?.unwrap_or_default(),
    })
}

/// POST /api/content/: create a post from a multipart form.
pub(super) async fn create_post(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<(StatusCode, Json<ApiResponse<PostItem>>), ApiError> {
    let rid = &req_id.0;
    let multipart =
        multipart.map_err(|e| ApiError::new(rid, "bad_request", e.body_text()))?;

    let form = read_form(rid, multipart, state.max_upload_bytes).await?;
    let valid = validate(rid, &form)?;

    let checked = match &form.image {
        Some(upload) => Some((upload, check_image(rid, upload.bytes.clone()).await?)),
        None => None,
    };

    let image = match checked {
        Some((upload, format)) => Some(
            state
                .images
                .save(&upload.file_name, format, &upload.bytes)
                .await
                .map_err(|e| {
                    tracing::error!(error = %e, "failed to store uploaded image");
                    ApiError::new(rid, "internal_error", "failed to store image")
                })?,
        ),
        None => None,
    };

    let new_post = brandpost_db::NewPost {
        title: &valid.title,
        content: &valid.content,
        category: valid.category,
        platform: valid.platform,
        image: image.as_deref(),
        status: valid.status,
    };

    let row = match brandpost_db::create_post(&state.pool, &new_post).await {
        Ok(row) => row,
        Err(e) => {
            if let Some(path) = &image {
                if let Err(remove_err) = state.images.remove(path).await {
                    tracing::warn!(path = %path, error = %remove_err, "failed to remove orphaned image");
                }
            }
            return Err(map_db_error(rid.clone(), &e));
        }
    };

    tracing::info!(post_id = row.id, has_image = row.image.is_some(), "post created");

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse {
            data: PostItem::from_row(row, &state.images),
            meta: ResponseMeta::new(req_id.0.clone()),
        }),
    ))
}

/// GET /api/posts/: every post, newest first.
pub(super) async fn list_posts(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Result<Json<ApiResponse<Vec<PostItem>>>, ApiError> {
    let rows = brandpost_db::list_posts(&state.pool)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    let data = rows
        .into_iter()
        .map(|row| PostItem::from_row(row, &state.images))
        .collect();

    Ok(Json(ApiResponse {
        data,
        meta: ResponseMeta::new(req_id.0),
    }))
}

/// DELETE /api/posts/{id}: remove a post, its reviews and its image file.
pub(super) async fn delete_post(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<DeletedData>>, ApiError> {
    let rid = &req_id.0;
    let not_found = || ApiError::new(rid, "not_found", format!("post {id} not found"));

    let post = brandpost_db::delete_post(&state.pool, id)
        .await
        .map_err(|e| map_db_error(rid.clone(), &e))?
        .ok_or_else(not_found)?;

    if let Some(path) = post.image.as_deref() {
        if let Err(e) = state.images.remove(path).await {
            tracing::warn!(post_id = id, path, error = %e, "failed to remove post image");
        }
    }

    tracing::info!(post_id = id, "post deleted");

    Ok(Json(ApiResponse {
        data: DeletedData { deleted: true },
        meta: ResponseMeta::new(req_id.0.clone()),
    }))
}
