//! 画像ファイルの読み込み（CLIでのカメラ代わり）

use std::io::Cursor;
use std::path::Path;

use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::DynamicImage;
use style_advisor_common::{CameraConfig, CaptureSource, FrameSource, ImageAsset};

use crate::error::{Result, StyleAdvisorError};

const JPEG_QUALITY: u8 = 90;

/// CLIにカメラはない。写真は `load_image_file` で渡す
pub struct NoCamera;

pub struct NoStream;

impl CaptureSource for NoCamera {
    type Stream = NoStream;

    async fn open(&self, _camera: &CameraConfig) -> style_advisor_common::Result<NoStream> {
        Err(style_advisor_common::Error::CameraAccessDenied("no camera in the command line client".into()))
    }
}

impl FrameSource for NoStream {
    fn grab_frame(&self) -> style_advisor_common::Result<ImageAsset> {
        Err(style_advisor_common::Error::CameraAccessDenied("no camera in the command line client".into()))
    }

    fn stop(&mut self) {}

    fn active_tracks(&self) -> usize {
        0
    }
}

/// 送信用に整えた画像
#[derive(Debug, Clone)]
pub struct LoadedImage {
    pub asset: ImageAsset,
    pub file_name: String,
    pub width: u32,
    pub height: u32,
}

/// 画像を読み込み、向きを補正して長辺 `max_size` 以下のJPEGにする
pub fn load_image_file(path: &Path, max_size: u32) -> Result<LoadedImage> {
    if !path.is_file() {
        return Err(StyleAdvisorError::FileNotFound(path.display().to_string()));
    }

    let bytes = std::fs::read(path)?;
    let image = image::load_from_memory(&bytes)
        .map_err(|e| StyleAdvisorError::ImageLoad(format!("{}: {}", path.display(), e)))?;

    let image = match read_orientation(&bytes) {
        Some(orientation) => apply_orientation(image, orientation),
        None => image,
    };
    let image = downsize(image, max_size);
    let jpeg = encode_jpeg(&image)?;

    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();

    Ok(LoadedImage {
        asset: ImageAsset::from_bytes(&jpeg, "image/jpeg")?,
        file_name,
        width: image.width(),
        height: image.height(),
    })
}

/// EXIFの Orientation (1-8)
fn read_orientation(bytes: &[u8]) -> Option<u32> {
    let exif = exif::Reader::new()
        .read_from_container(&mut Cursor::new(bytes))
        .ok()?;
    exif.get_field(exif::Tag::Orientation, exif::In::PRIMARY)?
        .value
        .get_uint(0)
}

fn apply_orientation(image: DynamicImage, orientation: u32) -> DynamicImage {
    match orientation {
        2 => image.fliph(),
        3 => image.rotate180(),
        4 => image.flipv(),
        5 => image.rotate90().fliph(),
        6 => image.rotate90(),
        7 => image.rotate270().fliph(),
        8 => image.rotate270(),
        _ => image,
    }
}

fn downsize(image: DynamicImage, max_size: u32) -> DynamicImage {
    if max_size == 0 || image.width().max(image.height()) <= max_size {
        return image;
    }
    image.resize(max_size, max_size, FilterType::Lanczos3)
}

fn encode_jpeg(image: &DynamicImage) -> Result<Vec<u8>> {
    let rgb = image.to_rgb8();
    let mut bytes = Vec::new();
    JpegEncoder::new_with_quality(&mut bytes, JPEG_QUALITY)
        .encode_image(&DynamicImage::ImageRgb8(rgb))
        .map_err(|e| StyleAdvisorError::ImageLoad(e.to_string()))?;
    Ok(bytes)
}
