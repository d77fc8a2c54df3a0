//! Image transformer - decode, resize and re-encode in one pass
//!
//! Raw requests skip the codec entirely: only the header is probed and the
//! source bytes are handed back untouched.

use crate::encoder::ImageCompressor;
use crate::error::ImageError;
use crate::format::OutputFormat;
use crate::metadata::{probe, SourceMetadata};
use crate::resize::ImageResize;
use crate::resolver::{resolve, OutputSpec, ResizePlan, ResolvedOutputSpec, MAX_OUTPUT_PIXELS};
use bytes::Bytes;
use image::{GenericImageView, Limits};
use std::io::Cursor;

const OCTET_STREAM: &str = "application/octet-stream";

/// Largest source side length that will be decoded
const MAX_DECODE_DIMENSION: u32 = 65_535;

fn decode_limits() -> Limits {
    let mut limits = Limits::default();
    limits.max_image_width = Some(MAX_DECODE_DIMENSION);
    limits.max_image_height = Some(MAX_DECODE_DIMENSION);
    // RGBA16 is the widest buffer the decoders produce for these formats
    limits.max_alloc = Some(MAX_OUTPUT_PIXELS * 8);
    limits
}

/// An uploaded image as received
#[derive(Debug, Clone)]
pub struct SourceImage {
    pub data: Bytes,
    pub declared_mime: Option<String>,
    pub file_name: Option<String>,
}

impl SourceImage {
    pub fn new(data: impl Into<Bytes>) -> Self {
        SourceImage {
            data: data.into(),
            declared_mime: None,
            file_name: None,
        }
    }

    pub fn with_mime(mut self, mime: impl Into<String>) -> Self {
        self.declared_mime = Some(mime.into());
        self
    }

    pub fn with_file_name(mut self, name: impl Into<String>) -> Self {
        self.file_name = Some(name.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArtifactBody {
    Binary(Bytes),
    /// SVG passthrough
    Text(String),
}

impl ArtifactBody {
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            ArtifactBody::Binary(b) => b,
            ArtifactBody::Text(t) => t.as_bytes(),
        }
    }
}

/// Output of a single transform, with the actual encoded properties
#[derive(Debug, Clone)]
pub struct TransformResult {
    pub body: ArtifactBody,
    pub width: u32,
    pub height: u32,
    pub format: Option<OutputFormat>,
    pub mime_type: String,
    pub size_bytes: u64,
    pub raw: bool,
}

/// Main image transformer
pub struct ImageTransformer;

impl ImageTransformer {
    /// Apply `spec` to `source`
    pub fn transform(source: &SourceImage, spec: &OutputSpec) -> Result<TransformResult, ImageError> {
        if spec.raw {
            return Self::passthrough(source, spec);
        }

        let start = std::time::Instant::now();
        let metadata = probe(&source.data, source.declared_mime.as_deref())?;

        let (width, height, resize, format, quality) = match resolve(spec, &metadata)? {
            ResolvedOutputSpec::Transform {
                width,
                height,
                resize,
                format,
                quality,
            } => (width, height, resize, format, quality),
            // resolve only passes through raw requests
            ResolvedOutputSpec::Passthrough { .. } => return Self::passthrough(source, spec),
        };

        let mut reader = image::ImageReader::new(Cursor::new(&source.data[..]))
            .with_guessed_format()
            .map_err(|e| ImageError::Decode(e.to_string()))?;
        reader.limits(decode_limits());
        let img = reader.decode()?;

        let img = match resize {
            ResizePlan::None => img,
            ResizePlan::Fit => ImageResize::resize_image(&img, width, height),
            ResizePlan::Fill => ImageResize::resize_to_fill(&img, width, height),
        };

        let data = ImageCompressor::compress(&img, format, quality)?;
        let (out_width, out_height) = img.dimensions();

        tracing::debug!(
            format = format.name(),
            width = out_width,
            height = out_height,
            source_bytes = metadata.size_bytes,
            size_bytes = data.len(),
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Image transformed"
        );

        Ok(TransformResult {
            size_bytes: data.len() as u64,
            body: ArtifactBody::Binary(data),
            width: out_width,
            height: out_height,
            format: Some(format),
            mime_type: format.mime_type().to_string(),
            raw: false,
        })
    }

    fn passthrough(source: &SourceImage, spec: &OutputSpec) -> Result<TransformResult, ImageError> {
        let metadata = probe(&source.data, source.declared_mime.as_deref())
            .unwrap_or_else(|_| SourceMetadata::unknown(source.data.len() as u64));

        let ResolvedOutputSpec::Passthrough {
            width,
            height,
            format,
            as_text,
        } = resolve(spec, &metadata)?
        else {
            return Err(ImageError::InvalidParameter(
                "passthrough requested for a non-raw image".to_string(),
            ));
        };

        let mime_type = format
            .map(|f| f.mime_type().to_string())
            .or_else(|| source.declared_mime.clone())
            .unwrap_or_else(|| OCTET_STREAM.to_string());

        let body = if as_text {
            let text = String::from_utf8(source.data.to_vec())
                .map_err(|e| ImageError::Decode(format!("SVG is not valid UTF-8: {}", e)))?;
            ArtifactBody::Text(text)
        } else {
            ArtifactBody::Binary(source.data.clone())
        };

        Ok(TransformResult {
            size_bytes: source.data.len() as u64,
            body,
            width,
            height,
            format,
            mime_type,
            raw: true,
        })
    }
}
