use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView};

/// Image resize operations
pub struct ImageResize;

impl ImageResize {
    /// Calculate target dimensions from the requested axes.
    ///
    /// A single axis scales the other by the source aspect ratio (rounded,
    /// minimum 1). Two axes are used as-is; no axis keeps the source size.
    pub fn calculate_dimensions(
        orig_width: u32,
        orig_height: u32,
        width: Option<u32>,
        height: Option<u32>,
    ) -> (u32, u32) {
        let orig_width = orig_width.max(1);
        let orig_height = orig_height.max(1);
        match (width, height) {
            (Some(w), Some(h)) => (w, h),
            (Some(w), None) => {
                let aspect_ratio = orig_height as f64 / orig_width as f64;
                let h = (w as f64 * aspect_ratio).round() as u32;
                (w, h.max(1))
            }
            (None, Some(h)) => {
                let aspect_ratio = orig_width as f64 / orig_height as f64;
                let w = (h as f64 * aspect_ratio).round() as u32;
                (w.max(1), h)
            }
            (None, None) => (orig_width, orig_height),
        }
    }

    /// Select appropriate filter type based on resize ratio
    pub fn select_filter(
        orig_width: u32,
        orig_height: u32,
        new_width: u32,
        new_height: u32,
    ) -> FilterType {
        let width_ratio = orig_width as f32 / new_width.max(1) as f32;
        let height_ratio = orig_height as f32 / new_height.max(1) as f32;
        let max_ratio = width_ratio.max(height_ratio);

        if max_ratio > 2.0 {
            FilterType::Triangle
        } else if max_ratio > 1.5 {
            FilterType::CatmullRom
        } else {
            FilterType::Lanczos3
        }
    }

    /// Resize image to exact dimensions
    pub fn resize_image(img: &DynamicImage, width: u32, height: u32) -> DynamicImage {
        let (orig_width, orig_height) = img.dimensions();
        if (orig_width, orig_height) == (width, height) {
            return img.clone();
        }
        let filter = Self::select_filter(orig_width, orig_height, width, height);
        img.resize_exact(width, height, filter)
    }

    /// Scale to cover `width` x `height`, then crop the centre
    pub fn resize_to_fill(img: &DynamicImage, width: u32, height: u32) -> DynamicImage {
        let (orig_width, orig_height) = img.dimensions();
        if (orig_width, orig_height) == (width, height) {
            return img.clone();
        }
        let filter = Self::select_filter(orig_width, orig_height, width, height);
        img.resize_to_fill(width, height, filter)
    }

    /// Scale `width` x `height` down so neither side exceeds `max_side`,
    /// keeping the aspect ratio
    pub fn clamp_dimensions(width: u32, height: u32, max_side: u32) -> (u32, u32) {
        if width <= max_side && height <= max_side {
            return (width, height);
        }

        let (target_width, target_height) = if width >= height {
            Self::calculate_dimensions(width, height, Some(max_side), None)
        } else {
            Self::calculate_dimensions(width, height, None, Some(max_side))
        };

        tracing::debug!(
            from_width = width,
            from_height = height,
            to_width = target_width,
            to_height = target_height,
            "Clamping to codec dimension limit"
        );

        (target_width.min(max_side), target_height.min(max_side))
    }
}
