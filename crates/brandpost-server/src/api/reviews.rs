//! POST /api/review/: accepts a review payload and echoes it back.
//!
//! Nothing is written to the database yet; `brandpost_db::create_review`
//! exists but the handler only checks that `post` and `rating` are present.

use axum::{extract::rejection::JsonRejection, http::StatusCode, Extension, Json};
use serde::Serialize;
use serde_json::Value;

use crate::middleware::RequestId;

use super::{ApiError, ApiResponse, ResponseMeta};

const REQUIRED_FIELDS: [&str; 2] = ["post", "rating"];

#[derive(Debug, Serialize)]
pub(super) struct ReviewReceived {
    pub message: &'static str,
    pub review: Value,
}

pub(super) async fn create_review(
    Extension(req_id): Extension<RequestId>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, Json<ApiResponse<ReviewReceived>>), ApiError> {
    let rid = &req_id.0;
    let Json(payload) = body.map_err(|e| ApiError::new(rid, "bad_request", e.body_text()))?;

    let Some(fields) = payload.as_object() else {
        return Err(ApiError::new(
            rid,
            "validation_error",
            "review must be a JSON object",
        ));
    };
    if let Some(missing) = REQUIRED_FIELDS
        .iter()
        .find(|f| fields.get(**f).is_none_or(Value::is_null))
    {
        return Err(ApiError::new(
            rid,
            "validation_error",
            format!("{missing} is required"),
        ));
    }

    tracing::info!("review received");

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse {
            data: ReviewReceived {
                message: "Review received successfully",
                review: payload,
            },
            meta: ResponseMeta::new(req_id.0.clone()),
        }),
    ))
}
