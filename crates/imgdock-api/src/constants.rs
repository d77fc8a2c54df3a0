//! API constants

/// API base path prefix
pub const API_PREFIX: &str = "/api";

/// Default upload folder for the single-image form
pub const DEFAULT_UPLOAD_FOLDER: &str = "images";

/// Output format of `/optimize` when the form does not name one
pub const DEFAULT_OPTIMIZE_FORMAT: &str = "webp";
