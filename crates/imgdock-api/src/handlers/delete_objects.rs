use crate::error::{ErrorResponse, HttpAppError, ValidatedJson};
use crate::state::AppState;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use imgdock_core::models::{DeleteFailure, DeleteObjectsRequest, DeleteObjectsResponse};
use imgdock_core::AppError;
use imgdock_storage::DeleteOutcome;
use std::sync::Arc;
use validator::Validate;

fn delete_response(outcome: DeleteOutcome) -> (StatusCode, DeleteObjectsResponse) {
    let errors: Vec<DeleteFailure> = outcome
        .errors
        .into_iter()
        .map(|e| DeleteFailure {
            key: e.key,
            message: e.message,
        })
        .collect();

    if errors.is_empty() {
        return (
            StatusCode::OK,
            DeleteObjectsResponse {
                message: "Objects deleted successfully".to_string(),
                deleted: outcome.deleted,
                errors,
            },
        );
    }

    let summary = errors
        .iter()
        .map(|e| format!("{}: {}", e.key, e.message))
        .collect::<Vec<_>>()
        .join(", ");

    (
        StatusCode::INTERNAL_SERVER_ERROR,
        DeleteObjectsResponse {
            message: format!("Failed to delete some objects: {}", summary),
            deleted: outcome.deleted,
            errors,
        },
    )
}

/// Delete objects by key
///
/// Keys are deleted concurrently. When any key fails the response is a 500
/// that still lists the keys that were deleted.
#[utoipa::path(
    delete,
    path = "/api/delete-objects",
    tag = "objects",
    request_body = DeleteObjectsRequest,
    responses(
        (status = 200, description = "All keys deleted", body = DeleteObjectsResponse),
        (status = 400, description = "No keys provided", body = ErrorResponse),
        (status = 500, description = "Some keys could not be deleted", body = DeleteObjectsResponse)
    )
)]
#[tracing::instrument(skip(state, request), fields(operation = "delete_objects"))]
pub async fn delete_objects(
    State(state): State<Arc<AppState>>,
    ValidatedJson(request): ValidatedJson<DeleteObjectsRequest>,
) -> Result<Response, HttpAppError> {
    request.validate().map_err(AppError::from)?;

    let bucket = request.bucket.unwrap_or_default();
    let outcome = state.storage.delete_many(bucket, &request.keys).await?;

    if !outcome.is_complete() {
        tracing::error!(
            bucket = %bucket,
            deleted = outcome.deleted.len(),
            failed = outcome.errors.len(),
            "Bulk delete partially failed"
        );
    } else {
        tracing::info!(bucket = %bucket, deleted = outcome.deleted.len(), "Objects deleted");
    }

    let (status, body) = delete_response(outcome);
    Ok((status, Json(body)).into_response())
}
