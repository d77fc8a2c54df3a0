use crate::constants::DEFAULT_OPTIMIZE_FORMAT;
use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;
use crate::utils::multipart::FormData;
use axum::{
    body::Body,
    extract::{Multipart, State},
    http::{header, StatusCode},
    response::Response,
};
use imgdock_core::models::{LooseNumber, ModificationRequest};
use imgdock_core::AppError;
use imgdock_processing::{package_binary, ImageTransformer, OutputSpec};
use std::sync::Arc;

fn loose(form: &FormData, name: &str) -> Option<LooseNumber> {
    form.text(name).map(|t| LooseNumber::Text(t.to_string()))
}

/// Resize one image and return the encoded bytes
///
/// At least one of `width` / `height` must be a positive number. The output
/// format defaults to WebP; the response `Content-Type` is the format
/// actually produced.
#[utoipa::path(
    post,
    path = "/api/optimize",
    tag = "images",
    request_body(content = inline(Object), content_type = "multipart/form-data",
        description = "`image` file plus optional `width`, `height`, `quality` and `format` text fields"),
    responses(
        (status = 200, description = "Encoded image", content_type = "application/octet-stream"),
        (status = 400, description = "Neither width nor height given, or invalid value", body = ErrorResponse),
        (status = 500, description = "Image could not be decoded or encoded", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(_state, multipart), fields(operation = "optimize_image"))]
pub async fn optimize_image(
    State(_state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<Response, HttpAppError> {
    let form = FormData::read(multipart).await?;

    let file = form
        .file("image")
        .ok_or_else(|| AppError::InvalidInput("No image provided".to_string()))?;

    let request = ModificationRequest {
        title: file.file_name.clone(),
        width: loose(&form, "width"),
        height: loose(&form, "height"),
        quality: loose(&form, "quality"),
        format: Some(form.text("format").unwrap_or(DEFAULT_OPTIMIZE_FORMAT).to_string()),
        raw: Some(false),
    };
    let spec = OutputSpec::try_from(request)?;

    let positive = |axis: Option<i64>| axis.is_some_and(|v| v > 0);
    if !positive(spec.width) && !positive(spec.height) {
        return Err(
            AppError::InvalidInput("Either width or height must be provided".to_string()).into(),
        );
    }

    let source = file.to_source();
    let result = tokio::task::spawn_blocking(move || ImageTransformer::transform(&source, &spec))
        .await
        .map_err(|e| AppError::Internal(format!("Transform task failed: {}", e)))??;

    tracing::info!(
        width = result.width,
        height = result.height,
        size_bytes = result.size_bytes,
        content_type = %result.mime_type,
        "Image optimized"
    );

    let artifact = package_binary(&result);
    let response = Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, artifact.content_type)
        .body(Body::from(artifact.body))
        .map_err(|e| {
            tracing::error!(error = %e, "Failed to build response");
            AppError::Internal(e.to_string())
        })?;

    Ok(response)
}
