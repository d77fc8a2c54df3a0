//! imgdock Processing Library
//!
//! Resolves per-image modification requests against the source image,
//! decodes/resizes/re-encodes images and packages the results for preview
//! or direct download.

pub mod batch;
pub mod encoder;
pub mod error;
pub mod format;
pub mod metadata;
pub mod packager;
pub mod resize;
pub mod resolver;
pub mod transformer;

// Re-export commonly used types
pub use batch::{transform_batch, BatchItem};
pub use error::{BatchError, ImageError};
pub use format::{FormatRequest, OutputFormat, SourceFormat};
pub use metadata::{probe, SourceMetadata};
pub use packager::{package_binary, package_preview, parse_data_url, BinaryArtifact};
pub use resolver::{resolve, OutputSpec, ResizePlan, ResolvedOutputSpec};
pub use transformer::{ArtifactBody, ImageTransformer, SourceImage, TransformResult};
