//! OpenAPI document

use utoipa::OpenApi;

use crate::error;
use crate::handlers;
use imgdock_core::models;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "imgdock API",
        version = "0.1.0",
        description = "Image modify, optimize and upload service with an object browser for the server and storage buckets. All endpoints except /health live under /api/."
    ),
    paths(
        handlers::modify::modify_images,
        handlers::optimize::optimize_image,
        handlers::upload::upload_images,
        handlers::objects::list_objects,
        handlers::delete_objects::delete_objects,
        handlers::health::health_check,
    ),
    components(
        schemas(
            error::ErrorResponse,
            models::LooseNumber,
            models::ModificationRequest,
            models::PreviewArtifact,
            models::UploadMetadata,
            models::UploadedImage,
            models::ListedObject,
            models::ObjectListResponse,
            models::DeleteObjectsRequest,
            models::DeleteFailure,
            models::DeleteObjectsResponse,
            imgdock_core::BucketKind,
            imgdock_storage::SortColumn,
            imgdock_storage::SortOrder,
            handlers::health::HealthResponse,
        )
    ),
    tags(
        (name = "images", description = "Image transformation"),
        (name = "objects", description = "Object upload, listing and deletion"),
        (name = "health", description = "Liveness")
    )
)]
pub struct ApiDoc;
