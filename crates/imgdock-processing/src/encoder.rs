use crate::error::ImageError;
use crate::format::OutputFormat;
use bytes::Bytes;
use image::{ColorType, DynamicImage, GenericImageView, ImageFormat};
use std::io::Cursor;

/// Encodes decoded images into the requested output format
pub struct ImageCompressor;

impl ImageCompressor {
    /// Encode `img` as `format`.
    ///
    /// `quality` applies to lossy formats; when unset the codec default is used
    /// (JPEG 80, WebP 80, AVIF 50). PNG and GIF ignore it.
    pub fn compress(
        img: &DynamicImage,
        format: OutputFormat,
        quality: Option<u8>,
    ) -> Result<Bytes, ImageError> {
        let quality = quality
            .or_else(|| format.default_quality())
            .unwrap_or(80)
            .clamp(1, 100);

        tracing::debug!(
            format = format.name(),
            quality = quality,
            width = img.width(),
            height = img.height(),
            "Encoding image"
        );

        match format {
            OutputFormat::Jpeg => Self::compress_jpeg(img, quality),
            OutputFormat::Png => Self::compress_png(img),
            OutputFormat::WebP => Self::compress_webp(img, quality),
            OutputFormat::Avif => Self::compress_avif(img, quality),
            OutputFormat::Gif => Self::compress_gif(img),
            OutputFormat::Svg => Err(ImageError::UnsupportedFormat(
                "SVG output is only available for raw uploads".to_string(),
            )),
        }
    }

    /// Compress to JPEG using mozjpeg
    fn compress_jpeg(img: &DynamicImage, quality: u8) -> Result<Bytes, ImageError> {
        let rgb_img = img.to_rgb8();
        let (width, height) = rgb_img.dimensions();

        let mut comp = mozjpeg::Compress::new(mozjpeg::ColorSpace::JCS_RGB);
        comp.set_size(width as usize, height as usize);
        comp.set_quality(quality as f32);
        comp.set_progressive_mode();
        comp.set_optimize_coding(true);

        let encode_err = |e: std::io::Error| ImageError::Encode(format!("jpeg: {}", e));
        let mut comp = comp.start_compress(Vec::new()).map_err(encode_err)?;
        comp.write_scanlines(&rgb_img).map_err(encode_err)?;
        let jpeg_data = comp.finish().map_err(encode_err)?;

        Ok(Bytes::from(jpeg_data))
    }

    /// Compress to PNG
    fn compress_png(img: &DynamicImage) -> Result<Bytes, ImageError> {
        let mut buffer = Vec::new();
        let mut cursor = Cursor::new(&mut buffer);

        // The PNG encoder has no floating point color types
        let written = match img.color() {
            ColorType::Rgb32F | ColorType::Rgba32F => {
                DynamicImage::ImageRgba16(img.to_rgba16()).write_to(&mut cursor, ImageFormat::Png)
            }
            _ => img.write_to(&mut cursor, ImageFormat::Png),
        };
        written.map_err(|e| ImageError::Encode(format!("png: {}", e)))?;

        Ok(Bytes::from(buffer))
    }

    /// Compress to GIF (single frame)
    fn compress_gif(img: &DynamicImage) -> Result<Bytes, ImageError> {
        let mut buffer = Vec::new();
        let mut cursor = Cursor::new(&mut buffer);

        DynamicImage::ImageRgba8(img.to_rgba8())
            .write_to(&mut cursor, ImageFormat::Gif)
            .map_err(|e| ImageError::Encode(format!("gif: {}", e)))?;

        Ok(Bytes::from(buffer))
    }

    /// Compress to WebP
    fn compress_webp(img: &DynamicImage, quality: u8) -> Result<Bytes, ImageError> {
        let (width, height) = img.dimensions();
        if let Some(max) = OutputFormat::WebP.max_dimension() {
            if width > max || height > max {
                return Err(ImageError::Encode(format!(
                    "webp: {}x{} exceeds the {} pixel limit",
                    width, height, max
                )));
            }
        }

        // Convert to RGBA for WebP encoding
        let rgba_img = img.to_rgba8();

        let encoder = webp::Encoder::from_rgba(&rgba_img, width, height);
        let webp_data = encoder
            .encode_simple(false, quality as f32)
            .map_err(|e| ImageError::Encode(format!("webp: {:?}", e)))?;

        Ok(Bytes::copy_from_slice(&webp_data))
    }

    /// Compress to AVIF
    fn compress_avif(img: &DynamicImage, quality: u8) -> Result<Bytes, ImageError> {
        let (width, height) = img.dimensions();

        // Convert to RGB for AVIF encoding
        let rgb_img = img.to_rgb8();
        let raw_pixels = rgb_img.as_raw();

        let rgb_data: Vec<rgb::RGB8> = raw_pixels
            .chunks_exact(3)
            .map(|chunk| rgb::RGB8::new(chunk[0], chunk[1], chunk[2]))
            .collect();

        let img_buf = ravif::Img::new(rgb_data.as_slice(), width as usize, height as usize);

        let encoder = ravif::Encoder::new()
            .with_quality(quality as f32)
            .with_speed(6); // Balance between speed and compression

        let avif_data = encoder
            .encode_rgb(img_buf)
            .map_err(|e| ImageError::Encode(format!("avif: {}", e)))?;

        Ok(Bytes::from(avif_data.avif_file))
    }
}
