//! クライアント設定

use serde::{Deserialize, Serialize};

use crate::render::RenderConfig;
use crate::selection::ReadinessPolicy;

pub const ANALYZE_PATH: &str = "/analyze";
pub const GENERATE_IMAGES_PATH: &str = "/generate-images";

/// カメラ要求のヒント
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub facing_mode: String,
    pub ideal_width: u32,
    pub ideal_height: u32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            facing_mode: "user".into(),
            ideal_width: 1280,
            ideal_height: 720,
        }
    }
}

/// ブラウザ/CLI共通のクライアント設定
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// 空文字なら同一オリジン
    pub api_base_url: String,
    pub attire_required: bool,
    pub camera: CameraConfig,
    pub render: RenderConfig,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: String::new(),
            attire_required: true,
            camera: CameraConfig::default(),
            render: RenderConfig::default(),
        }
    }
}

impl ClientConfig {
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self { api_base_url: base_url.into(), ..Self::default() }
    }

    /// ベースURLとパスを結合（スラッシュの重複を避ける）
    pub fn endpoint(&self, path: &str) -> String {
        let base = self.api_base_url.trim_end_matches('/');
        let path = path.trim_start_matches('/');
        format!("{}/{}", base, path)
    }

    pub fn analyze_url(&self) -> String {
        self.endpoint(ANALYZE_PATH)
    }

    pub fn generate_images_url(&self) -> String {
        self.endpoint(GENERATE_IMAGES_PATH)
    }

    pub fn readiness_policy(&self) -> ReadinessPolicy {
        ReadinessPolicy { attire_required: self.attire_required }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_same_origin() {
        let config = ClientConfig::default();
        assert_eq!(config.analyze_url(), "/analyze");
        assert_eq!(config.generate_images_url(), "/generate-images");
    }

    #[test]
    fn test_endpoint_trailing_slash() {
        let config = ClientConfig::with_base_url("http://localhost:5000/");
        assert_eq!(config.analyze_url(), "http://localhost:5000/analyze");
    }

    #[test]
    fn test_deserialize_partial_config() {
        let config: ClientConfig =
            serde_json::from_str(r#"{"attire_required": false}"#).expect("デシリアライズ失敗");
        assert!(!config.attire_required);
        assert_eq!(config.camera.ideal_width, 1280);
        assert!(!config.readiness_policy().attire_required);
    }
}
