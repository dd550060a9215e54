//! 写真取得コントローラ
//!
//! 写真の取得元（カメラ/アップロード）と表示状態（ライブ/静止）を管理する。
//! カメラは排他的なリソースなので、静止表示中は必ず解放されている。
//!
//! ```text
//! Live ──capture──▶ Frozen (フレーム取得・カメラ解放)
//! Frozen ──retake──▶ Live  (画像破棄・カメラ再取得)
//! * ──upload──▶ Frozen     (カメラ解放)
//! * ──reset──▶ Live        (画像破棄)
//! ```

use crate::config::CameraConfig;
use crate::error::{Error, Result};
use crate::types::ImageAsset;

/// カメラへのアクセス手段
#[allow(async_fn_in_trait)]
pub trait CaptureSource {
    type Stream: FrameSource;

    /// カメラを要求する。拒否された場合は `Error::CameraAccessDenied`
    async fn open(&self, camera: &CameraConfig) -> Result<Self::Stream>;
}

/// 起動中のカメラストリーム
pub trait FrameSource {
    /// 現在のフレームを画像として取得
    fn grab_frame(&self) -> Result<ImageAsset>;

    /// 全トラックを停止してデバイスを解放
    fn stop(&mut self);

    fn active_tracks(&self) -> usize;
}

/// プレビューの表示状態
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Presentation {
    #[default]
    Live,
    Frozen,
}

impl Presentation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Presentation::Live => "live",
            Presentation::Frozen => "frozen",
        }
    }
}

/// 現在の写真の取得元
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageOrigin {
    Camera,
    Upload { file_name: String },
}

pub struct AcquisitionController<C: CaptureSource> {
    source: C,
    camera: CameraConfig,
    stream: Option<C::Stream>,
    image: Option<ImageAsset>,
    origin: Option<ImageOrigin>,
    presentation: Presentation,
}

impl<C: CaptureSource> AcquisitionController<C> {
    pub fn new(source: C, camera: CameraConfig) -> Self {
        Self {
            source,
            camera,
            stream: None,
            image: None,
            origin: None,
            presentation: Presentation::Live,
        }
    }

    pub fn current_image(&self) -> Option<&ImageAsset> {
        self.image.as_ref()
    }

    pub fn has_image(&self) -> bool {
        self.image.is_some()
    }

    pub fn presentation(&self) -> Presentation {
        self.presentation
    }

    pub fn origin(&self) -> Option<&ImageOrigin> {
        self.origin.as_ref()
    }

    /// アップロード元のファイル名
    pub fn file_name(&self) -> Option<&str> {
        match &self.origin {
            Some(ImageOrigin::Upload { file_name }) => Some(file_name),
            _ => None,
        }
    }

    pub fn camera_active(&self) -> bool {
        self.stream.as_ref().is_some_and(|s| s.active_tracks() > 0)
    }

    pub fn source(&self) -> &C {
        &self.source
    }

    /// カメラモードに入る
    ///
    /// 失敗時は画像と表示状態を変更せずにエラーを返す。
    pub async fn use_camera_capture(&mut self) -> Result<()> {
        if self.presentation == Presentation::Live && self.camera_active() {
            return Ok(());
        }

        // トラックが終了した古いストリームは新しいストリームの表示前に止める
        self.release_camera();
        let stream = self.source.open(&self.camera).await?;
        self.stream = Some(stream);
        self.image = None;
        self.origin = None;
        self.presentation = Presentation::Live;
        Ok(())
    }

    /// 撮影/撮り直しボタン
    ///
    /// Live: フレームを取得して静止表示にし、カメラを解放する
    /// Frozen: 画像を破棄してカメラを再取得する
    pub async fn toggle_capture(&mut self) -> Result<Presentation> {
        match self.presentation {
            Presentation::Live => {
                let stream = self
                    .stream
                    .as_ref()
                    .ok_or_else(|| Error::CameraAccessDenied("camera is not running".into()))?;
                let frame = stream.grab_frame()?;
                self.release_camera();
                self.image = Some(frame);
                self.origin = Some(ImageOrigin::Camera);
                self.presentation = Presentation::Frozen;
            }
            Presentation::Frozen => {
                self.use_camera_capture().await?;
            }
        }
        Ok(self.presentation)
    }

    /// アップロードされたファイルを現在の写真にする
    pub fn use_uploaded_file(&mut self, bytes: &[u8], file_name: impl Into<String>) -> Result<()> {
        let asset = ImageAsset::from_file_bytes(bytes)?;
        self.use_uploaded_image(asset, file_name);
        Ok(())
    }

    pub fn use_uploaded_image(&mut self, asset: ImageAsset, file_name: impl Into<String>) {
        self.release_camera();
        self.image = Some(asset);
        self.origin = Some(ImageOrigin::Upload { file_name: file_name.into() });
        self.presentation = Presentation::Frozen;
    }

    /// 画像を破棄してライブ表示に戻す（カメラの再起動は `use_camera_capture`）
    pub fn reset(&mut self) {
        self.release_camera();
        self.image = None;
        self.origin = None;
        self.presentation = Presentation::Live;
    }

    pub fn release_camera(&mut self) {
        if let Some(mut stream) = self.stream.take() {
            stream.stop();
        }
    }
}

impl<C: CaptureSource> Drop for AcquisitionController<C> {
    fn drop(&mut self) {
        self.release_camera();
    }
}
