//! Format/quality resolver
//!
//! Turns a loosely typed [`ModificationRequest`] into a validated
//! [`OutputSpec`], then resolves that spec against the probed source into the
//! concrete operation the transformer performs.

use crate::error::ImageError;
use crate::format::{FormatRequest, OutputFormat, SourceFormat};
use crate::metadata::SourceMetadata;
use crate::resize::ImageResize;
use imgdock_core::models::{LooseNumber, ModificationRequest};

/// Largest side length a request may ask for
pub const MAX_OUTPUT_DIMENSION: u32 = 16_384;

/// Largest output the transformer will allocate, in pixels
pub const MAX_OUTPUT_PIXELS: u64 = 64 * 1024 * 1024;

/// Validated per-image request
///
/// Axes are signed: a declared but non-positive axis is kept so the resolver
/// can tell it apart from an absent one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OutputSpec {
    pub width: Option<i64>,
    pub height: Option<i64>,
    /// 1..=100, `None` means codec default
    pub quality: Option<u8>,
    pub format: FormatRequest,
    pub raw: bool,
    pub title: String,
}

/// How the decoded image is resized
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResizePlan {
    None,
    /// One axis given, the other follows the aspect ratio
    Fit,
    /// Both axes given: cover the box and crop the centre
    Fill,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedOutputSpec {
    /// Bytes are returned unchanged
    Passthrough {
        width: u32,
        height: u32,
        format: Option<OutputFormat>,
        /// SVG sources are returned as text
        as_text: bool,
    },
    Transform {
        width: u32,
        height: u32,
        resize: ResizePlan,
        format: OutputFormat,
        quality: Option<u8>,
    },
}

fn loose_axis(name: &str, value: Option<&LooseNumber>) -> Result<Option<i64>, ImageError> {
    value
        .map(|n| {
            n.as_f64()
                .map(|v| v.round() as i64)
                .map_err(|e| ImageError::InvalidParameter(format!("{}: {}", name, e)))
        })
        .transpose()
}

fn check_axis(name: &str, value: Option<i64>) -> Result<Option<i64>, ImageError> {
    match value {
        Some(v) if v > i64::from(MAX_OUTPUT_DIMENSION) => Err(ImageError::InvalidParameter(format!(
            "{}: {} exceeds the maximum of {}",
            name, v, MAX_OUTPUT_DIMENSION
        ))),
        _ => Ok(value),
    }
}

impl TryFrom<ModificationRequest> for OutputSpec {
    type Error = ImageError;

    fn try_from(req: ModificationRequest) -> Result<Self, Self::Error> {
        let width = check_axis("width", loose_axis("width", req.width.as_ref())?)?;
        let height = check_axis("height", loose_axis("height", req.height.as_ref())?)?;

        let quality = match loose_axis("quality", req.quality.as_ref())? {
            None | Some(0) => None,
            Some(q) if (1..=100).contains(&q) => Some(q as u8),
            Some(q) => {
                return Err(ImageError::InvalidParameter(format!(
                    "quality: {} is outside 1-100",
                    q
                )))
            }
        };

        let format = FormatRequest::parse(req.format.as_deref())?;

        Ok(OutputSpec {
            width,
            height,
            quality,
            format,
            raw: req.raw.unwrap_or(false),
            title: req.title.unwrap_or_default(),
        })
    }
}

fn positive(axis: Option<i64>) -> Option<u32> {
    axis.filter(|v| *v > 0)
        .map(|v| u32::try_from(v).unwrap_or(u32::MAX))
}

/// Resolve a validated request against the probed source
pub fn resolve(
    spec: &OutputSpec,
    source: &SourceMetadata,
) -> Result<ResolvedOutputSpec, ImageError> {
    if spec.raw {
        let format = source.format.output_format().or(match spec.format {
            FormatRequest::Convert(f) if source.format == SourceFormat::Unknown => Some(f),
            _ => None,
        });
        return Ok(ResolvedOutputSpec::Passthrough {
            width: source.width,
            height: source.height,
            format,
            as_text: source.format == SourceFormat::Known(OutputFormat::Svg),
        });
    }

    if source.format == SourceFormat::Known(OutputFormat::Svg) {
        return Err(ImageError::UnsupportedFormat(
            "SVG images can only be passed through raw".to_string(),
        ));
    }

    let format = match spec.format {
        FormatRequest::Convert(f) if !f.is_encodable() => {
            return Err(ImageError::UnsupportedFormat(format!(
                "{} output is only available for raw uploads",
                f.name()
            )))
        }
        FormatRequest::Convert(f) => f,
        FormatRequest::PreserveOriginal => match &source.format {
            SourceFormat::Known(f) => *f,
            SourceFormat::Other(name) => {
                return Err(ImageError::UnsupportedFormat(format!(
                    "{} cannot be re-encoded, choose an output format",
                    name
                )))
            }
            SourceFormat::Unknown => {
                return Err(ImageError::UnsupportedFormat(
                    "source format could not be detected".to_string(),
                ))
            }
        },
    };

    check_axis("width", spec.width)?;
    check_axis("height", spec.height)?;

    let width = positive(spec.width);
    let height = positive(spec.height);
    let mut resize = match (width, height) {
        (None, None) => ResizePlan::None,
        (Some(_), Some(_)) => ResizePlan::Fill,
        _ => ResizePlan::Fit,
    };
    let (mut width, mut height) =
        ImageResize::calculate_dimensions(source.width, source.height, width, height);

    if let Some(max) = format.max_dimension() {
        if width > max || height > max {
            (width, height) = ImageResize::clamp_dimensions(width, height, max);
            if resize == ResizePlan::None {
                resize = ResizePlan::Fit;
            }
        }
    }

    if u64::from(width) * u64::from(height) > MAX_OUTPUT_PIXELS {
        return Err(ImageError::InvalidParameter(format!(
            "{}x{} output exceeds the {} pixel limit",
            width, height, MAX_OUTPUT_PIXELS
        )));
    }

    Ok(ResolvedOutputSpec::Transform {
        width,
        height,
        resize,
        format,
        quality: spec.quality,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source(width: u32, height: u32, format: SourceFormat) -> SourceMetadata {
        SourceMetadata {
            width,
            height,
            format,
            size_bytes: 1000,
        }
    }

    fn jpeg(width: u32, height: u32) -> SourceMetadata {
        source(width, height, SourceFormat::Known(OutputFormat::Jpeg))
    }

    fn spec(width: Option<i64>, height: Option<i64>) -> OutputSpec {
        OutputSpec {
            width,
            height,
            ..Default::default()
        }
    }

    #[test]
    fn test_request_with_string_numbers() {
        let req: ModificationRequest = serde_json::from_str(
            r#"{"title":"a.jpg","width":"400","height":null,"quality":"70","format":"webp","raw":false}"#,
        )
        .unwrap();
        let spec = OutputSpec::try_from(req).unwrap();
        assert_eq!(spec.width, Some(400));
        assert_eq!(spec.height, None);
        assert_eq!(spec.quality, Some(70));
        assert_eq!(spec.format, FormatRequest::Convert(OutputFormat::WebP));
        assert_eq!(spec.title, "a.jpg");
    }

    #[test]
    fn test_request_quality_zero_is_unset() {
        let req = ModificationRequest {
            quality: Some(LooseNumber::Number(0.0)),
            ..Default::default()
        };
        assert_eq!(OutputSpec::try_from(req).unwrap().quality, None);
    }

    #[test]
    fn test_request_rejects_bad_values() {
        let req = ModificationRequest {
            quality: Some(LooseNumber::Number(101.0)),
            ..Default::default()
        };
        assert!(matches!(
            OutputSpec::try_from(req),
            Err(ImageError::InvalidParameter(_))
        ));

        let req = ModificationRequest {
            width: Some(LooseNumber::Text("wide".to_string())),
            ..Default::default()
        };
        assert!(OutputSpec::try_from(req).is_err());

        let req = ModificationRequest {
            format: Some("bmp".to_string()),
            ..Default::default()
        };
        assert!(OutputSpec::try_from(req).is_err());
    }

    #[test]
    fn test_request_rejects_oversized_axes() {
        let req = ModificationRequest {
            width: Some(LooseNumber::Number(200_000.0)),
            ..Default::default()
        };
        assert!(matches!(
            OutputSpec::try_from(req),
            Err(ImageError::InvalidParameter(_))
        ));

        let req = ModificationRequest {
            height: Some(LooseNumber::Text(MAX_OUTPUT_DIMENSION.to_string())),
            ..Default::default()
        };
        assert!(OutputSpec::try_from(req).is_ok());
    }

    #[test]
    fn test_oversized_axes_fail_before_resize() {
        assert!(matches!(
            resolve(&spec(Some(200_000), None), &jpeg(10, 10)),
            Err(ImageError::InvalidParameter(_))
        ));
        assert!(matches!(
            resolve(&spec(Some(i64::MAX), Some(i64::MAX)), &jpeg(10, 10)),
            Err(ImageError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_pixel_budget_applies_to_derived_axis() {
        let tall = source(1, 10_000, SourceFormat::Known(OutputFormat::Png));
        assert!(matches!(
            resolve(&spec(Some(16_000), None), &tall),
            Err(ImageError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_codec_limit_clamps_before_resize() {
        let webp = OutputSpec {
            width: Some(200),
            format: FormatRequest::Convert(OutputFormat::WebP),
            ..Default::default()
        };
        let tall = source(100, 10_000, SourceFormat::Known(OutputFormat::Png));
        assert_eq!(
            resolve(&webp, &tall).unwrap(),
            ResolvedOutputSpec::Transform {
                width: 164,
                height: 16383,
                resize: ResizePlan::Fit,
                format: OutputFormat::WebP,
                quality: None,
            }
        );

        let r#unsized = OutputSpec {
            format: FormatRequest::Convert(OutputFormat::WebP),
            ..Default::default()
        };
        let wide = source(20_000, 100, SourceFormat::Known(OutputFormat::Png));
        assert!(matches!(
            resolve(&r#unsized, &wide).unwrap(),
            ResolvedOutputSpec::Transform {
                width: 16383,
                height: 82,
                resize: ResizePlan::Fit,
                ..
            }
        ));
    }

    #[test]
    fn test_width_only_keeps_aspect() {
        let resolved = resolve(&spec(Some(400), None), &jpeg(800, 600)).unwrap();
        assert_eq!(
            resolved,
            ResolvedOutputSpec::Transform {
                width: 400,
                height: 300,
                resize: ResizePlan::Fit,
                format: OutputFormat::Jpeg,
                quality: None,
            }
        );
    }

    #[test]
    fn test_zero_axes_mean_no_resize() {
        for (w, h) in [(Some(0), Some(0)), (None, None), (Some(-5), Some(-1))] {
            let resolved = resolve(&spec(w, h), &jpeg(800, 600)).unwrap();
            assert!(matches!(
                resolved,
                ResolvedOutputSpec::Transform {
                    width: 800,
                    height: 600,
                    resize: ResizePlan::None,
                    ..
                }
            ));
        }
    }

    #[test]
    fn test_negative_axis_is_dropped() {
        let resolved = resolve(&spec(Some(-10), Some(150)), &jpeg(800, 600)).unwrap();
        assert!(matches!(
            resolved,
            ResolvedOutputSpec::Transform {
                width: 200,
                height: 150,
                resize: ResizePlan::Fit,
                ..
            }
        ));
    }

    #[test]
    fn test_both_axes_fill() {
        let resolved = resolve(&spec(Some(100), Some(100)), &jpeg(800, 600)).unwrap();
        assert!(matches!(
            resolved,
            ResolvedOutputSpec::Transform {
                width: 100,
                height: 100,
                resize: ResizePlan::Fill,
                ..
            }
        ));
    }

    #[test]
    fn test_raw_ignores_everything() {
        let raw = OutputSpec {
            width: Some(10),
            quality: Some(5),
            format: FormatRequest::Convert(OutputFormat::Png),
            raw: true,
            ..Default::default()
        };
        let resolved = resolve(&raw, &jpeg(800, 600)).unwrap();
        assert_eq!(
            resolved,
            ResolvedOutputSpec::Passthrough {
                width: 800,
                height: 600,
                format: Some(OutputFormat::Jpeg),
                as_text: false,
            }
        );

        let svg = source(24, 24, SourceFormat::Known(OutputFormat::Svg));
        assert!(matches!(
            resolve(&raw, &svg).unwrap(),
            ResolvedOutputSpec::Passthrough { as_text: true, .. }
        ));
    }

    #[test]
    fn test_unencodable_sources() {
        let bmp = source(10, 10, SourceFormat::Other("bmp".to_string()));
        assert!(matches!(
            resolve(&spec(None, None), &bmp),
            Err(ImageError::UnsupportedFormat(_))
        ));

        let convert = OutputSpec {
            format: FormatRequest::Convert(OutputFormat::Png),
            ..Default::default()
        };
        assert!(resolve(&convert, &bmp).is_ok());

        let svg = source(24, 24, SourceFormat::Known(OutputFormat::Svg));
        assert!(matches!(
            resolve(&convert, &svg),
            Err(ImageError::UnsupportedFormat(_))
        ));

        let to_svg = OutputSpec {
            format: FormatRequest::Convert(OutputFormat::Svg),
            ..Default::default()
        };
        assert!(matches!(
            resolve(&to_svg, &jpeg(10, 10)),
            Err(ImageError::UnsupportedFormat(_))
        ));
    }
}
