use crate::error::ImageError;
use image::ImageFormat;

/// Output format for transformed images
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutputFormat {
    Jpeg,
    Png,
    WebP,
    Avif,
    Gif,
    /// Passthrough only, never encoded
    Svg,
}

impl OutputFormat {
    pub fn parse(s: &str) -> Result<Self, ImageError> {
        match s.trim().to_lowercase().as_str() {
            "jpeg" | "jpg" => Ok(OutputFormat::Jpeg),
            "png" => Ok(OutputFormat::Png),
            "webp" => Ok(OutputFormat::WebP),
            "avif" => Ok(OutputFormat::Avif),
            "gif" => Ok(OutputFormat::Gif),
            "svg" | "svg+xml" => Ok(OutputFormat::Svg),
            _ => Err(ImageError::InvalidParameter(format!("Invalid format: {}", s))),
        }
    }

    /// Short name, also used as the file extension
    pub fn name(self) -> &'static str {
        match self {
            OutputFormat::Jpeg => "jpeg",
            OutputFormat::Png => "png",
            OutputFormat::WebP => "webp",
            OutputFormat::Avif => "avif",
            OutputFormat::Gif => "gif",
            OutputFormat::Svg => "svg",
        }
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            OutputFormat::Jpeg => "image/jpeg",
            OutputFormat::Png => "image/png",
            OutputFormat::WebP => "image/webp",
            OutputFormat::Avif => "image/avif",
            OutputFormat::Gif => "image/gif",
            OutputFormat::Svg => "image/svg+xml",
        }
    }

    pub fn from_mime_type(mime: &str) -> Option<Self> {
        match mime.trim().to_lowercase().as_str() {
            "image/jpeg" | "image/jpg" => Some(OutputFormat::Jpeg),
            "image/png" => Some(OutputFormat::Png),
            "image/webp" => Some(OutputFormat::WebP),
            "image/avif" => Some(OutputFormat::Avif),
            "image/gif" => Some(OutputFormat::Gif),
            "image/svg+xml" => Some(OutputFormat::Svg),
            _ => None,
        }
    }

    pub fn is_lossy(self) -> bool {
        matches!(
            self,
            OutputFormat::Jpeg | OutputFormat::WebP | OutputFormat::Avif
        )
    }

    /// Whether the transform engine can produce this format
    pub fn is_encodable(self) -> bool {
        self != OutputFormat::Svg
    }

    /// Largest side length the codec accepts
    pub fn max_dimension(self) -> Option<u32> {
        match self {
            OutputFormat::WebP => Some(16383),
            OutputFormat::Jpeg => Some(65535),
            _ => None,
        }
    }

    /// Quality used when the request leaves it unset
    pub fn default_quality(self) -> Option<u8> {
        match self {
            OutputFormat::Jpeg => Some(80),
            OutputFormat::WebP => Some(80),
            OutputFormat::Avif => Some(50),
            _ => None,
        }
    }
}

/// Requested output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormatRequest {
    #[default]
    PreserveOriginal,
    Convert(OutputFormat),
}

impl FormatRequest {
    /// Absent, empty and `original` keep the source format
    pub fn parse(value: Option<&str>) -> Result<Self, ImageError> {
        match value.map(str::trim) {
            None | Some("") => Ok(FormatRequest::PreserveOriginal),
            Some(v) if v.eq_ignore_ascii_case("original") => Ok(FormatRequest::PreserveOriginal),
            Some(v) => OutputFormat::parse(v).map(FormatRequest::Convert),
        }
    }
}

/// Format detected in the source bytes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceFormat {
    Known(OutputFormat),
    /// Recognised but cannot be re-encoded (bmp, tiff, ...)
    Other(String),
    Unknown,
}

impl SourceFormat {
    pub fn output_format(&self) -> Option<OutputFormat> {
        match self {
            SourceFormat::Known(f) => Some(*f),
            _ => None,
        }
    }
}

impl From<ImageFormat> for SourceFormat {
    fn from(format: ImageFormat) -> Self {
        match format {
            ImageFormat::Jpeg => SourceFormat::Known(OutputFormat::Jpeg),
            ImageFormat::Png => SourceFormat::Known(OutputFormat::Png),
            ImageFormat::WebP => SourceFormat::Known(OutputFormat::WebP),
            ImageFormat::Avif => SourceFormat::Known(OutputFormat::Avif),
            ImageFormat::Gif => SourceFormat::Known(OutputFormat::Gif),
            other => SourceFormat::Other(
                other
                    .extensions_str()
                    .first()
                    .map(|ext| ext.to_string())
                    .unwrap_or_else(|| format!("{:?}", other).to_lowercase()),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_format_parse() {
        assert_eq!(OutputFormat::parse("JPG").unwrap(), OutputFormat::Jpeg);
        assert_eq!(OutputFormat::parse("webp").unwrap(), OutputFormat::WebP);
        assert_eq!(OutputFormat::parse("svg").unwrap(), OutputFormat::Svg);
        assert!(matches!(
            OutputFormat::parse("tiff"),
            Err(ImageError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_format_request_parse() {
        assert_eq!(FormatRequest::parse(None).unwrap(), FormatRequest::PreserveOriginal);
        assert_eq!(FormatRequest::parse(Some("")).unwrap(), FormatRequest::PreserveOriginal);
        assert_eq!(
            FormatRequest::parse(Some("Original")).unwrap(),
            FormatRequest::PreserveOriginal
        );
        assert_eq!(
            FormatRequest::parse(Some("avif")).unwrap(),
            FormatRequest::Convert(OutputFormat::Avif)
        );
        assert!(FormatRequest::parse(Some("heic")).is_err());
    }

    #[test]
    fn test_codec_limits_and_defaults() {
        assert_eq!(OutputFormat::WebP.max_dimension(), Some(16383));
        assert_eq!(OutputFormat::Jpeg.max_dimension(), Some(65535));
        assert_eq!(OutputFormat::Png.max_dimension(), None);
        assert_eq!(OutputFormat::Avif.default_quality(), Some(50));
        assert_eq!(OutputFormat::Gif.default_quality(), None);
        assert!(!OutputFormat::Svg.is_encodable());
        assert!(OutputFormat::WebP.is_lossy());
    }

    #[test]
    fn test_source_format_from_image_format() {
        assert_eq!(
            SourceFormat::from(ImageFormat::Png),
            SourceFormat::Known(OutputFormat::Png)
        );
        assert_eq!(
            SourceFormat::from(ImageFormat::Bmp),
            SourceFormat::Other("bmp".to_string())
        );
    }
}
