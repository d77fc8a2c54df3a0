//! `/api/modify` integration tests.
//!
//! Run with: `cargo test -p imgdock-api --test modify_test`

mod helpers;

use axum::http::StatusCode;
use axum_test::multipart::{MultipartForm, Part};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use helpers::{api_path, fixtures, setup_test_app, setup_test_app_with};
use image::ImageFormat;
use imgdock_processing::resize::ImageResize;
use serde_json::{json, Value};

fn image_part(data: Vec<u8>, file_name: &str, mime: &str) -> Part {
    Part::bytes(data).file_name(file_name).mime_type(mime)
}

fn preview_bytes(preview: &Value) -> Vec<u8> {
    let url = preview["previewUrl"].as_str().expect("previewUrl");
    let (_, payload) = url.split_once(";base64,").expect("base64 data url");
    STANDARD.decode(payload).expect("valid base64")
}

#[tokio::test]
async fn test_modify_jpeg_to_webp() {
    let app = setup_test_app().await;

    let form = MultipartForm::new()
        .add_part("image0", image_part(fixtures::jpeg(800, 600), "photo.jpg", "image/jpeg"))
        .add_text(
            "modification0",
            json!({"title": "photo.jpg", "width": 400, "format": "webp", "quality": 70}).to_string(),
        );

    let response = app.client().post(&api_path("/modify")).multipart(form).await;
    response.assert_status_ok();

    let previews: Vec<Value> = response.json();
    assert_eq!(previews.len(), 1);

    let preview = &previews[0];
    assert_eq!(preview["fileName"], "photo.webp");
    assert_eq!(preview["format"], "webp");
    assert_eq!(preview["width"], 400);
    assert_eq!(preview["height"], 300);
    assert!(preview["previewUrl"]
        .as_str()
        .unwrap()
        .starts_with("data:image/webp;base64,"));

    let bytes = preview_bytes(preview);
    assert_eq!(fixtures::inspect(&bytes), (ImageFormat::WebP, 400, 300));
    let size_kb = preview["sizeKb"].as_f64().unwrap();
    assert!((size_kb - bytes.len() as f64 / 1024.0).abs() < 1e-9);

    let source = image::load_from_memory(&fixtures::jpeg(800, 600)).unwrap();
    let resized = ImageResize::resize_image(&source, 400, 300).to_rgba8();
    let reference = webp::Encoder::from_rgba(&resized, 400, 300).encode(70.0);
    assert!(
        bytes.len() <= reference.len() * 11 / 10,
        "{} bytes against a {} byte q=70 reference",
        bytes.len(),
        reference.len()
    );
}

#[tokio::test]
async fn test_modify_rejects_oversized_dimensions() {
    let app = setup_test_app().await;

    let form = MultipartForm::new()
        .add_part("image0", image_part(fixtures::png(10, 10), "tiny.png", "image/png"))
        .add_text(
            "modification0",
            json!({"title": "tiny.png", "width": 200000, "format": "png"}).to_string(),
        );

    let response = app.client().post(&api_path("/modify")).multipart(form).await;
    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert!(body["error"].as_str().unwrap().contains("modification0"));
}

#[tokio::test]
async fn test_modify_keeps_index_order_and_string_numbers() {
    let app = setup_test_app().await;

    let form = MultipartForm::new()
        .add_part("image1", image_part(fixtures::png(300, 200), "b.png", "image/png"))
        .add_text("modification1", json!({"title": "b.png", "height": "50"}).to_string())
        .add_part("image0", image_part(fixtures::png(100, 100), "a.png", "image/png"))
        .add_text("modification0", json!({"title": "a.png", "width": 0, "height": 0}).to_string());

    let response = app.client().post(&api_path("/modify")).multipart(form).await;
    response.assert_status_ok();

    let previews: Vec<Value> = response.json();
    assert_eq!(previews[0]["title"], "a.png");
    assert_eq!((previews[0]["width"].as_u64(), previews[0]["height"].as_u64()), (Some(100), Some(100)));
    assert_eq!(previews[1]["title"], "b.png");
    assert_eq!((previews[1]["width"].as_u64(), previews[1]["height"].as_u64()), (Some(75), Some(50)));
    assert_eq!(previews[1]["format"], "png");
}

#[tokio::test]
async fn test_modify_raw_is_byte_identical() {
    let app = setup_test_app().await;
    let original = fixtures::png(40, 20);

    let form = MultipartForm::new()
        .add_part("image0", image_part(original.clone(), "logo.png", "image/png"))
        .add_text(
            "modification0",
            json!({"title": "logo.png", "width": 10, "format": "jpeg", "raw": true}).to_string(),
        );

    let response = app.client().post(&api_path("/modify")).multipart(form).await;
    response.assert_status_ok();

    let previews: Vec<Value> = response.json();
    assert_eq!(preview_bytes(&previews[0]), original);
    assert_eq!(previews[0]["raw"], true);
    assert_eq!(previews[0]["width"], 40);
    assert_eq!(previews[0]["fileName"], "logo.png");
}

#[tokio::test]
async fn test_modify_raw_svg_is_text_identical() {
    let app = setup_test_app().await;

    let form = MultipartForm::new()
        .add_part(
            "image0",
            image_part(fixtures::svg().as_bytes().to_vec(), "icon.svg", "image/svg+xml"),
        )
        .add_text("modification0", json!({"title": "icon.svg", "raw": true}).to_string());

    let response = app.client().post(&api_path("/modify")).multipart(form).await;
    response.assert_status_ok();

    let previews: Vec<Value> = response.json();
    let preview = &previews[0];
    assert!(preview["previewUrl"]
        .as_str()
        .unwrap()
        .starts_with("data:image/svg+xml;base64,"));
    assert_eq!(String::from_utf8(preview_bytes(preview)).unwrap(), fixtures::svg());
    assert_eq!((preview["width"].as_u64(), preview["height"].as_u64()), (Some(24), Some(12)));
}

#[tokio::test]
async fn test_modify_corrupt_second_image_fails_whole_batch() {
    let app = setup_test_app().await;

    let mut form = MultipartForm::new();
    for index in 1..=3 {
        let data = if index == 2 {
            fixtures::corrupt()
        } else {
            fixtures::png(20, 20)
        };
        form = form
            .add_part(format!("image{}", index), image_part(data, "x.png", "image/png"))
            .add_text(
                format!("modification{}", index),
                json!({"title": format!("x{}.png", index)}).to_string(),
            );
    }

    let response = app.client().post(&api_path("/modify")).multipart(form).await;
    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);

    let body: Value = response.json();
    assert_eq!(body["code"], "IMAGE_DECODE_ERROR");
    assert!(body["error"].as_str().unwrap().contains("image2"));
}

#[tokio::test]
async fn test_modify_without_images_is_bad_request() {
    let app = setup_test_app().await;

    let form = MultipartForm::new().add_text("modification0", json!({"title": "a.png"}).to_string());

    let response = app.client().post(&api_path("/modify")).multipart(form).await;
    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["code"], "INVALID_INPUT");
}

#[tokio::test]
async fn test_modify_missing_or_invalid_modification_is_bad_request() {
    let app = setup_test_app().await;

    let missing = MultipartForm::new()
        .add_part("image0", image_part(fixtures::png(10, 10), "a.png", "image/png"));
    let response = app.client().post(&api_path("/modify")).multipart(missing).await;
    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert!(body["error"].as_str().unwrap().contains("modification0"));

    let bad_quality = MultipartForm::new()
        .add_part("image0", image_part(fixtures::png(10, 10), "a.png", "image/png"))
        .add_text("modification0", json!({"quality": 150}).to_string());
    let response = app.client().post(&api_path("/modify")).multipart(bad_quality).await;
    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_modify_rejects_too_many_images() {
    let app = setup_test_app_with(|mut config| {
        config.max_batch_images = 1;
        config
    })
    .await;

    let form = MultipartForm::new()
        .add_part("image0", image_part(fixtures::png(10, 10), "a.png", "image/png"))
        .add_text("modification0", "{}")
        .add_part("image1", image_part(fixtures::png(10, 10), "b.png", "image/png"))
        .add_text("modification1", "{}");

    let response = app.client().post(&api_path("/modify")).multipart(form).await;
    response.assert_status(StatusCode::PAYLOAD_TOO_LARGE);
}
