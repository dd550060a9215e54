//! 画像ファイル読み込みテスト

use image::{Rgb, RgbImage, Rgba, RgbaImage};
use style_advisor::capture::load_image_file;
use style_advisor::error::StyleAdvisorError;
use std::path::Path;
use tempfile::tempdir;

/// 大きなPNGは長辺が上限まで縮小されJPEGになる
#[test]
fn test_large_png_is_downsized_jpeg() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("selfie.png");
    RgbImage::from_pixel(2000, 1000, Rgb([200, 150, 120])).save(&path).unwrap();

    let loaded = load_image_file(&path, 800).unwrap();
    assert_eq!(loaded.file_name, "selfie.png");
    assert_eq!((loaded.width, loaded.height), (800, 400));
    assert_eq!(loaded.asset.mime_type(), "image/jpeg");
    assert!(loaded.asset.as_str().starts_with("data:image/jpeg;base64,/9j/"));
}

/// 透過PNGもJPEGに変換できる
#[test]
fn test_transparent_png() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("alpha.png");
    RgbaImage::from_pixel(64, 64, Rgba([0, 0, 0, 0])).save(&path).unwrap();

    let loaded = load_image_file(&path, 1568).unwrap();
    assert_eq!((loaded.width, loaded.height), (64, 64));
}

#[test]
fn test_missing_file() {
    let err = load_image_file(Path::new("/nonexistent/selfie.jpg"), 1568).unwrap_err();
    assert!(matches!(err, StyleAdvisorError::FileNotFound(_)));
}

#[test]
fn test_not_an_image() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("notes.jpg");
    std::fs::write(&path, "hello").unwrap();

    let err = load_image_file(&path, 1568).unwrap_err();
    assert!(matches!(err, StyleAdvisorError::ImageLoad(_)));
}
