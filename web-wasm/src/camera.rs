//! ブラウザのカメラ（getUserMedia）

use leptos::html::Video;
use leptos::prelude::*;
use serde::Serialize;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{
    CanvasRenderingContext2d, HtmlCanvasElement, HtmlVideoElement, MediaStream,
    MediaStreamConstraints, MediaStreamTrack, MediaStreamTrackState,
};

use style_advisor_common::{CameraConfig, CaptureSource, Error, FrameSource, ImageAsset, Result};

const SNAPSHOT_MIME_TYPE: &str = "image/jpeg";

/// getUserMedia に渡す video 制約
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct VideoConstraints<'a> {
    facing_mode: &'a str,
    width: Ideal,
    height: Ideal,
}

#[derive(Debug, Serialize)]
struct Ideal {
    ideal: u32,
}

impl<'a> From<&'a CameraConfig> for VideoConstraints<'a> {
    fn from(camera: &'a CameraConfig) -> Self {
        Self {
            facing_mode: &camera.facing_mode,
            width: Ideal { ideal: camera.ideal_width },
            height: Ideal { ideal: camera.ideal_height },
        }
    }
}

/// JsValueのエラーを表示用文字列にする
pub fn describe_js_error(value: &JsValue) -> String {
    if let Some(s) = value.as_string() {
        return s;
    }
    if let Some(err) = value.dyn_ref::<js_sys::Error>() {
        return format!("{}: {}", err.name(), err.message());
    }
    format!("{:?}", value)
}

/// `<video>` 要素にストリームを表示するカメラ
#[derive(Clone, Copy)]
pub struct BrowserCamera {
    video: NodeRef<Video>,
}

impl BrowserCamera {
    pub fn new(video: NodeRef<Video>) -> Self {
        Self { video }
    }
}

impl CaptureSource for BrowserCamera {
    type Stream = BrowserStream;

    async fn open(&self, camera: &CameraConfig) -> Result<BrowserStream> {
        let video = self
            .video
            .get_untracked()
            .ok_or_else(|| Error::CameraAccessDenied("video element is not mounted".into()))?;

        let stream = request_stream(camera)
            .await
            .map_err(|e| Error::CameraAccessDenied(describe_js_error(&e)))?;

        video.set_src_object(Some(&stream));
        Ok(BrowserStream { stream, video })
    }
}

async fn request_stream(camera: &CameraConfig) -> std::result::Result<MediaStream, JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("window is not available"))?;
    let devices = window.navigator().media_devices()?;

    let constraints = MediaStreamConstraints::new();
    let video = serde_wasm_bindgen::to_value(&VideoConstraints::from(camera))?;
    constraints.set_video(&video);

    let promise = devices.get_user_media_with_constraints(&constraints)?;
    let stream = JsFuture::from(promise).await?;
    stream.dyn_into::<MediaStream>()
}

/// 起動中のカメラストリーム
pub struct BrowserStream {
    stream: MediaStream,
    video: HtmlVideoElement,
}

impl BrowserStream {
    fn tracks(&self) -> impl Iterator<Item = MediaStreamTrack> {
        self.stream
            .get_tracks()
            .iter()
            .filter_map(|t| t.dyn_into::<MediaStreamTrack>().ok())
            .collect::<Vec<_>>()
            .into_iter()
    }
}

impl FrameSource for BrowserStream {
    fn grab_frame(&self) -> Result<ImageAsset> {
        let data_url = snapshot(&self.video)
            .map_err(|e| Error::InvalidImage(describe_js_error(&e)))?;
        ImageAsset::from_data_url(data_url)
    }

    fn stop(&mut self) {
        for track in self.tracks() {
            track.stop();
        }
        // 別のストリームが表示中なら外さない
        if shows_stream(self.video.src_object().as_ref(), &self.stream) {
            self.video.set_src_object(None);
        }
    }

    fn active_tracks(&self) -> usize {
        self.tracks()
            .filter(|t| t.ready_state() == MediaStreamTrackState::Live)
            .count()
    }
}

fn shows_stream(current: Option<&MediaStream>, stream: &MediaStream) -> bool {
    current.is_some_and(|current| current.id() == stream.id())
}

/// 現在のフレームをオフスクリーンcanvasに描いてJPEGのData URLにする
fn snapshot(video: &HtmlVideoElement) -> std::result::Result<String, JsValue> {
    let document = web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| JsValue::from_str("document is not available"))?;

    let canvas: HtmlCanvasElement = document.create_element("canvas")?.dyn_into()?;
    canvas.set_width(video.video_width());
    canvas.set_height(video.video_height());

    let context: CanvasRenderingContext2d = canvas
        .get_context("2d")?
        .ok_or_else(|| JsValue::from_str("2d context is not available"))?
        .dyn_into()?;
    context.draw_image_with_html_video_element(video, 0.0, 0.0)?;

    canvas.to_data_url_with_type(SNAPSHOT_MIME_TYPE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_video_constraints_serialize() {
        let camera = CameraConfig::default();
        let json = serde_json::to_string(&VideoConstraints::from(&camera)).expect("シリアライズ失敗");
        assert_eq!(json, r#"{"facingMode":"user","width":{"ideal":1280},"height":{"ideal":720}}"#);
    }
}

#[cfg(all(target_arch = "wasm32", test))]
mod wasm_tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn wasm_describe_js_error() {
        assert_eq!(describe_js_error(&JsValue::from_str("NotAllowedError")), "NotAllowedError");

        let err = js_sys::Error::new("Permission denied");
        err.set_name("NotAllowedError");
        assert_eq!(describe_js_error(&err.into()), "NotAllowedError: Permission denied");
    }

    #[wasm_bindgen_test]
    fn wasm_shows_stream_only_for_same_stream() {
        let old = MediaStream::new().expect("MediaStream");
        let new = MediaStream::new().expect("MediaStream");
        assert!(shows_stream(Some(&old), &old));
        assert!(!shows_stream(Some(&new), &old));
        assert!(!shows_stream(None, &old));
    }

    #[wasm_bindgen_test]
    fn wasm_video_constraints_to_js() {
        let camera = CameraConfig::default();
        let value = serde_wasm_bindgen::to_value(&VideoConstraints::from(&camera)).expect("変換失敗");
        let facing = js_sys::Reflect::get(&value, &JsValue::from_str("facingMode")).expect("facingMode");
        assert_eq!(facing.as_string().as_deref(), Some("user"));
    }
}
