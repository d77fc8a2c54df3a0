//! Lightweight source probe
//!
//! Reads dimensions and format from image headers without decoding pixel data.
//! SVG documents are recognised textually and sized from their `width`/`height`
//! attributes, falling back to the `viewBox`.

use crate::error::ImageError;
use crate::format::{OutputFormat, SourceFormat};
use regex::Regex;
use std::io::Cursor;

/// Dimensions and format of a source image
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceMetadata {
    pub width: u32,
    pub height: u32,
    pub format: SourceFormat,
    pub size_bytes: u64,
}

impl SourceMetadata {
    /// Placeholder for bytes nothing could be read from
    pub fn unknown(size_bytes: u64) -> Self {
        SourceMetadata {
            width: 0,
            height: 0,
            format: SourceFormat::Unknown,
            size_bytes,
        }
    }
}

/// The opening `<svg ...>` tag, attributes included
fn svg_root_tag(text: &str) -> Option<&str> {
    let start = text.find("<svg")?;
    let end = text[start..].find('>')?;
    Some(&text[start..start + end + 1])
}

fn svg_attribute(tag: &str, name: &str) -> Option<String> {
    let pattern = format!(r#"\s{}\s*=\s*["']([^"']*)["']"#, regex::escape(name));
    Regex::new(&pattern)
        .ok()?
        .captures(tag)
        .map(|c| c[1].trim().to_string())
}

/// Parse a length like `120`, `120.5px`; relative units are not sized
fn svg_length(value: &str) -> Option<u32> {
    let number = value.trim().trim_end_matches("px");
    number
        .parse::<f64>()
        .ok()
        .filter(|n| n.is_finite() && *n >= 0.0)
        .map(|n| n.round() as u32)
}

fn looks_like_svg(data: &[u8], declared_mime: Option<&str>) -> bool {
    if declared_mime.and_then(OutputFormat::from_mime_type) == Some(OutputFormat::Svg) {
        return true;
    }
    let head = &data[..data.len().min(1024)];
    let text = String::from_utf8_lossy(head);
    let trimmed = text.trim_start_matches('\u{feff}').trim_start();
    trimmed.starts_with("<svg") || (trimmed.starts_with("<?xml") && text.contains("<svg"))
}

fn probe_svg(data: &[u8]) -> SourceMetadata {
    let text = String::from_utf8_lossy(data);
    let mut width = 0;
    let mut height = 0;

    if let Some(tag) = svg_root_tag(&text) {
        width = svg_attribute(tag, "width")
            .as_deref()
            .and_then(svg_length)
            .unwrap_or(0);
        height = svg_attribute(tag, "height")
            .as_deref()
            .and_then(svg_length)
            .unwrap_or(0);

        if width == 0 || height == 0 {
            if let Some(view_box) = svg_attribute(tag, "viewBox") {
                let parts: Vec<f64> = view_box
                    .split(|c: char| c == ',' || c.is_whitespace())
                    .filter(|p| !p.is_empty())
                    .filter_map(|p| p.parse().ok())
                    .collect();
                if parts.len() == 4 {
                    if width == 0 {
                        width = parts[2].max(0.0).round() as u32;
                    }
                    if height == 0 {
                        height = parts[3].max(0.0).round() as u32;
                    }
                }
            }
        }
    }

    SourceMetadata {
        width,
        height,
        format: SourceFormat::Known(OutputFormat::Svg),
        size_bytes: data.len() as u64,
    }
}

/// Probe source bytes for format and dimensions
///
/// Raster signatures in the bytes win over the declared MIME type, which is
/// only consulted for SVG when nothing else matches.
pub fn probe(data: &[u8], declared_mime: Option<&str>) -> Result<SourceMetadata, ImageError> {
    let reader = image::ImageReader::new(Cursor::new(data))
        .with_guessed_format()
        .map_err(|e| ImageError::Decode(e.to_string()))?;

    let format = match reader.format() {
        Some(f) => SourceFormat::from(f),
        None if looks_like_svg(data, declared_mime) => return Ok(probe_svg(data)),
        None => {
            return Err(ImageError::Decode(
                "Unrecognised image data".to_string(),
            ))
        }
    };

    let (width, height) = reader.into_dimensions()?;

    Ok(SourceMetadata {
        width,
        height,
        format,
        size_bytes: data.len() as u64,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, ImageFormat, RgbImage};

    fn png(width: u32, height: u32) -> Vec<u8> {
        let img = DynamicImage::ImageRgb8(RgbImage::new(width, height));
        let mut buffer = Vec::new();
        img.write_to(&mut Cursor::new(&mut buffer), ImageFormat::Png)
            .unwrap();
        buffer
    }

    #[test]
    fn test_probe_png() {
        let data = png(64, 32);
        let meta = probe(&data, Some("image/png")).unwrap();
        assert_eq!((meta.width, meta.height), (64, 32));
        assert_eq!(meta.format, SourceFormat::Known(OutputFormat::Png));
        assert_eq!(meta.size_bytes, data.len() as u64);
    }

    #[test]
    fn test_probe_svg_attributes() {
        let svg = br#"<?xml version="1.0"?>
<svg xmlns="http://www.w3.org/2000/svg" width="120px" height="80"><rect/></svg>"#;
        let meta = probe(svg, None).unwrap();
        assert_eq!((meta.width, meta.height), (120, 80));
        assert_eq!(meta.format, SourceFormat::Known(OutputFormat::Svg));
    }

    #[test]
    fn test_probe_svg_view_box() {
        let svg = br#"<svg viewBox="0 0 24 12" xmlns="http://www.w3.org/2000/svg"></svg>"#;
        let meta = probe(svg, Some("image/svg+xml")).unwrap();
        assert_eq!((meta.width, meta.height), (24, 12));
    }

    #[test]
    fn test_probe_prefers_bytes_over_declared_svg() {
        let data = png(30, 10);
        let meta = probe(&data, Some("image/svg+xml")).unwrap();
        assert_eq!(meta.format, SourceFormat::Known(OutputFormat::Png));
        assert_eq!((meta.width, meta.height), (30, 10));
    }

    #[test]
    fn test_probe_garbage_fails() {
        let result = probe(b"definitely not an image", Some("image/png"));
        assert!(matches!(result, Err(ImageError::Decode(_))));
    }
}
