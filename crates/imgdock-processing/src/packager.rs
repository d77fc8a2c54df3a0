//! Artifact packaging
//!
//! Pure conversions from a [`TransformResult`] to what the HTTP layer sends:
//! a JSON preview with an inline data URL, or a raw body with its content type.

use crate::error::ImageError;
use crate::format::OutputFormat;
use crate::transformer::{ArtifactBody, TransformResult};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use bytes::Bytes;
use imgdock_core::models::PreviewArtifact;

/// Body and content type for a direct binary response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BinaryArtifact {
    pub content_type: String,
    pub body: Bytes,
}

/// Replace the extension of `title` with the output format's
pub fn relabel_file_name(title: &str, format: Option<OutputFormat>) -> String {
    let Some(format) = format else {
        return title.to_string();
    };

    let file_start = title.rfind('/').map_or(0, |i| i + 1);
    let stem = match title[file_start..].rfind('.') {
        Some(dot) if dot > 0 => &title[..file_start + dot],
        _ => title,
    };

    if stem.is_empty() {
        format!("image.{}", format.name())
    } else {
        format!("{}.{}", stem, format.name())
    }
}

pub fn package_preview(title: &str, result: &TransformResult) -> PreviewArtifact {
    let payload = STANDARD.encode(result.body.as_bytes());
    let aspect_ratio = if result.height == 0 {
        None
    } else {
        Some(result.width as f64 / result.height as f64)
    };

    PreviewArtifact {
        title: title.to_string(),
        file_name: relabel_file_name(title, result.format),
        preview_url: format!("data:{};base64,{}", result.mime_type, payload),
        size_kb: result.size_bytes as f64 / 1024.0,
        format: result.format.map(|f| f.name().to_string()),
        width: result.width,
        height: result.height,
        aspect_ratio,
        raw: result.raw,
    }
}

pub fn package_binary(result: &TransformResult) -> BinaryArtifact {
    let body = match &result.body {
        ArtifactBody::Binary(bytes) => bytes.clone(),
        ArtifactBody::Text(text) => Bytes::from(text.clone()),
    };

    BinaryArtifact {
        content_type: result.mime_type.clone(),
        body,
    }
}

/// Decode a `data:<mime>;base64,<payload>` URL into its MIME type and bytes
pub fn parse_data_url(url: &str) -> Result<(String, Bytes), ImageError> {
    let rest = url
        .trim()
        .strip_prefix("data:")
        .ok_or_else(|| ImageError::InvalidParameter("Not a data URL".to_string()))?;

    let (header, payload) = rest
        .split_once(',')
        .ok_or_else(|| ImageError::InvalidParameter("Data URL has no payload".to_string()))?;

    let mime = header.strip_suffix(";base64").ok_or_else(|| {
        ImageError::InvalidParameter("Only base64 data URLs are supported".to_string())
    })?;
    let mime = if mime.is_empty() {
        "application/octet-stream"
    } else {
        mime
    };

    let bytes = STANDARD
        .decode(payload.trim())
        .map_err(|e| ImageError::InvalidParameter(format!("Invalid base64 payload: {}", e)))?;

    Ok((mime.to_string(), Bytes::from(bytes)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(width: u32, height: u32, format: Option<OutputFormat>, body: ArtifactBody) -> TransformResult {
        let size_bytes = body.as_bytes().len() as u64;
        TransformResult {
            body,
            width,
            height,
            format,
            mime_type: format
                .map(|f| f.mime_type().to_string())
                .unwrap_or_else(|| "application/octet-stream".to_string()),
            size_bytes,
            raw: false,
        }
    }

    #[test]
    fn test_relabel_file_name() {
        assert_eq!(relabel_file_name("photo.jpg", Some(OutputFormat::WebP)), "photo.webp");
        assert_eq!(relabel_file_name("a.b.png", Some(OutputFormat::Avif)), "a.b.avif");
        assert_eq!(relabel_file_name("noext", Some(OutputFormat::Png)), "noext.png");
        assert_eq!(relabel_file_name(".hidden", Some(OutputFormat::Png)), ".hidden.png");
        assert_eq!(relabel_file_name("dir.v2/pic", Some(OutputFormat::Gif)), "dir.v2/pic.gif");
        assert_eq!(relabel_file_name("", Some(OutputFormat::Jpeg)), "image.jpeg");
        assert_eq!(relabel_file_name("keep.bin", None), "keep.bin");
    }

    #[test]
    fn test_preview_fields() {
        let body = ArtifactBody::Binary(Bytes::from(vec![0u8; 2048]));
        let preview = package_preview("hero.png", &result(400, 300, Some(OutputFormat::WebP), body));

        assert_eq!(preview.file_name, "hero.webp");
        assert!(preview.preview_url.starts_with("data:image/webp;base64,"));
        assert_eq!(preview.size_kb, 2.0);
        assert_eq!(preview.format.as_deref(), Some("webp"));
        assert!((preview.aspect_ratio.unwrap() - 4.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_preview_zero_height_has_no_aspect_ratio() {
        let body = ArtifactBody::Text("<svg/>".to_string());
        let preview = package_preview("icon.svg", &result(0, 0, Some(OutputFormat::Svg), body));
        assert_eq!(preview.aspect_ratio, None);
        assert!(preview.preview_url.starts_with("data:image/svg+xml;base64,"));
    }

    #[test]
    fn test_preview_url_parses_back() {
        let body = ArtifactBody::Binary(Bytes::from_static(b"\x89PNG fake"));
        let preview = package_preview("a.png", &result(1, 1, Some(OutputFormat::Png), body));

        let (mime, bytes) = parse_data_url(&preview.preview_url).unwrap();
        assert_eq!(mime, "image/png");
        assert_eq!(&bytes[..], b"\x89PNG fake");
    }

    #[test]
    fn test_parse_data_url_rejects_garbage() {
        assert!(parse_data_url("https://example.com/a.png").is_err());
        assert!(parse_data_url("data:image/png,rawtext").is_err());
        assert!(parse_data_url("data:image/png;base64,@@@").is_err());
    }

    #[test]
    fn test_package_binary_text() {
        let body = ArtifactBody::Text("<svg/>".to_string());
        let artifact = package_binary(&result(1, 1, Some(OutputFormat::Svg), body));
        assert_eq!(artifact.content_type, "image/svg+xml");
        assert_eq!(&artifact.body[..], b"<svg/>");
    }
}
