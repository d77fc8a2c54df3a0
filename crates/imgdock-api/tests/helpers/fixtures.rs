//! Test fixtures: images generated with the `image` crate.

use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use std::io::Cursor;

fn encode(width: u32, height: u32, format: ImageFormat) -> Vec<u8> {
    let img = DynamicImage::ImageRgb8(RgbImage::from_fn(width, height, |x, y| {
        Rgb([(x % 256) as u8, (y % 256) as u8, 120])
    }));
    let mut buffer = Vec::new();
    img.write_to(&mut Cursor::new(&mut buffer), format)
        .expect("Failed to encode fixture");
    buffer
}

pub fn png(width: u32, height: u32) -> Vec<u8> {
    encode(width, height, ImageFormat::Png)
}

pub fn jpeg(width: u32, height: u32) -> Vec<u8> {
    encode(width, height, ImageFormat::Jpeg)
}

/// Bytes no decoder accepts
pub fn corrupt() -> Vec<u8> {
    b"this is definitely not an image".to_vec()
}

pub fn svg() -> &'static str {
    r#"<svg xmlns="http://www.w3.org/2000/svg" width="24" height="12"><rect width="24" height="12"/></svg>"#
}

/// Decode an image response body and return its format and dimensions
pub fn inspect(data: &[u8]) -> (ImageFormat, u32, u32) {
    let format = image::guess_format(data).expect("Unknown image format");
    let img = image::load_from_memory(data).expect("Failed to decode image");
    (format, img.width(), img.height())
}
