use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;
use axum::{
    extract::{Query, State},
    Json,
};
use imgdock_core::models::ObjectListResponse;
use imgdock_core::{AppError, BucketKind};
use imgdock_storage::listing::{self, ListingQuery, SortColumn, SortOrder};
use serde::Deserialize;
use std::str::FromStr;
use std::sync::Arc;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectsQuery {
    #[serde(rename = "type")]
    bucket: Option<String>,
    search: Option<String>,
    folder: Option<String>,
    sort: Option<SortColumn>,
    order: Option<SortOrder>,
    page: Option<usize>,
    per_page: Option<usize>,
}

impl ObjectsQuery {
    fn listing(self, default_page_size: usize) -> ListingQuery {
        ListingQuery {
            search: self.search,
            folder: self.folder,
            sort: self.sort.unwrap_or_default(),
            order: self.order.unwrap_or_default(),
            page: self.page.unwrap_or(1),
            per_page: self.per_page.unwrap_or(default_page_size),
        }
    }
}

/// List stored objects of one bucket
///
/// The folder list is computed over the whole bucket so the client can offer
/// every folder regardless of the current filters.
#[utoipa::path(
    get,
    path = "/api/objects",
    tag = "objects",
    params(
        ("type" = Option<String>, Query, description = "Bucket: 'server' (default) or 'storage'"),
        ("search" = Option<String>, Query, description = "Case-insensitive substring of the key"),
        ("folder" = Option<String>, Query, description = "Key prefix"),
        ("sort" = Option<SortColumn>, Query, description = "Sort column (default lastModified)"),
        ("order" = Option<SortOrder>, Query, description = "asc or desc (default desc)"),
        ("page" = Option<usize>, Query, description = "1-based page number"),
        ("perPage" = Option<usize>, Query, description = "Objects per page")
    ),
    responses(
        (status = 200, description = "One page of objects", body = ObjectListResponse),
        (status = 400, description = "Invalid bucket type or query", body = ErrorResponse),
        (status = 500, description = "Storage gateway failure", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state), fields(operation = "list_objects"))]
pub async fn list_objects(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ObjectsQuery>,
) -> Result<Json<ObjectListResponse>, HttpAppError> {
    let bucket = match query.bucket.as_deref() {
        Some(value) => {
            BucketKind::from_str(value).map_err(|e| AppError::InvalidInput(e.to_string()))?
        }
        None => BucketKind::default(),
    };

    let stored = state.storage.list(bucket, bucket.prefix()).await?;
    let entries = listing::to_entries(state.storage.as_ref(), bucket, stored);
    let folders = listing::folders(&entries, bucket);
    let page = listing::apply(entries, &query.listing(state.config.listing_page_size));

    tracing::debug!(
        bucket = %bucket,
        total = page.total,
        page = page.page,
        "Objects listed"
    );

    Ok(Json(ObjectListResponse {
        message: "S3 objects retrieved successfully!".to_string(),
        objects: page.objects,
        folders,
        total: page.total,
        page: page.page,
        total_pages: page.total_pages,
    }))
}
