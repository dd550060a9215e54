//! 解析結果・通信データの型定義
//!
//! CLIとWeb(WASM)で共有される型:
//! - ImageAsset: 解析対象の写真（Data URL）
//! - AnalysisResult: /analyze が返すスタイル解析結果
//! - StyleImageResult: /generate-images が返すスタイル画像
//! - 各エンドポイントのリクエスト/レスポンス

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

const DEFAULT_MIME_TYPE: &str = "image/jpeg";

/// 現在の写真（Data URL形式）
///
/// 撮影・アップロード・リセットの度に丸ごと置き換えられる。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ImageAsset(String);

impl ImageAsset {
    /// "data:image/jpeg;base64,..." 形式の文字列から作成
    ///
    /// 空のcanvasが返す `data:,` やペイロードのない文字列は拒否する。
    pub fn from_data_url(data_url: impl Into<String>) -> Result<Self> {
        let data_url = data_url.into();
        if !data_url.starts_with("data:") {
            return Err(Error::InvalidImage("not a data URL".into()));
        }
        match data_url.split_once(',') {
            Some((_, payload)) if !payload.is_empty() => Ok(Self(data_url)),
            _ => Err(Error::InvalidImage("data URL has no payload".into())),
        }
    }

    /// バイト列をBase64エンコードしてData URLを作る
    pub fn from_bytes(bytes: &[u8], mime_type: &str) -> Result<Self> {
        if bytes.is_empty() {
            return Err(Error::InvalidImage("empty image".into()));
        }
        Ok(Self(format!("data:{};base64,{}", mime_type, STANDARD.encode(bytes))))
    }

    /// アップロードされたファイルのバイト列から作成（MIMEタイプは先頭バイトで判定）
    pub fn from_file_bytes(bytes: &[u8]) -> Result<Self> {
        let mime_type = sniff_mime_type(bytes).ok_or(Error::UnsupportedImage)?;
        Self::from_bytes(bytes, mime_type)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }

    /// MIMEタイプ（抽出失敗時は image/jpeg）
    pub fn mime_type(&self) -> &str {
        self.0
            .strip_prefix("data:")
            .and_then(|s| s.split([';', ',']).next())
            .filter(|s| !s.is_empty())
            .unwrap_or(DEFAULT_MIME_TYPE)
    }

    /// Base64ペイロード部分
    pub fn base64_payload(&self) -> &str {
        self.0.split_once(',').map(|(_, p)| p).unwrap_or_default()
    }

    /// デコード後のバイト数（Base64でない場合はペイロード長）
    pub fn byte_len(&self) -> usize {
        let payload = self.base64_payload();
        if self.0.contains(";base64,") {
            let padding = payload.bytes().rev().take_while(|&b| b == b'=').count();
            ((payload.len() / 4) * 3).saturating_sub(padding.min(2))
        } else {
            payload.len()
        }
    }
}

/// 先頭バイトから画像形式を判定
pub fn sniff_mime_type(bytes: &[u8]) -> Option<&'static str> {
    match bytes {
        [0xFF, 0xD8, 0xFF, ..] => Some("image/jpeg"),
        [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, ..] => Some("image/png"),
        [b'G', b'I', b'F', b'8', ..] => Some("image/gif"),
        [b'R', b'I', b'F', b'F', _, _, _, _, b'W', b'E', b'B', b'P', ..] => Some("image/webp"),
        _ => None,
    }
}

/// 名前付きの色（肌色・おすすめカラー）
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NamedColor {
    pub name: String,
    pub hex: String,
}

impl NamedColor {
    pub fn new(name: impl Into<String>, hex: impl Into<String>) -> Self {
        Self { name: name.into(), hex: hex.into() }
    }

    /// CSSに埋め込める形式のときだけ色コードを返す
    pub fn css_color(&self) -> Option<&str> {
        let hex = self.hex.trim();
        let digits = hex.strip_prefix('#')?;
        let valid_len = matches!(digits.len(), 3 | 4 | 6 | 8);
        (valid_len && digits.chars().all(|c| c.is_ascii_hexdigit())).then_some(hex)
    }
}

/// 髪型の提案
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HairSuggestions {
    pub current_hair: String,
    pub face_shape_comment: String,
    pub recommended_hair_lengths: Vec<String>,
    pub recommended_hair_styles: Vec<String>,
}

/// おすすめスタイル
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StyleSuggestion {
    pub name: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub occasion: Option<String>,
}

impl StyleSuggestion {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self { name: name.into(), description: description.into(), occasion: None }
    }
}

/// スタイル解析結果
///
/// 人物が写っていない場合、サービスは `error` だけを返す。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisResult {
    pub age_range: String,
    pub gender: String,
    pub hair: String,
    pub skin: NamedColor,
    pub colors: Vec<NamedColor>,
    pub hair_suggestions: HairSuggestions,
    pub styles: Vec<StyleSuggestion>,
    pub compliment: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl AnalysisResult {
    /// 解析エラーのみの結果
    pub fn error(message: impl Into<String>) -> Self {
        Self { error: Some(message.into()), ..Default::default() }
    }

    /// 空文字のエラーは無いものとして扱う
    pub fn error_message(&self) -> Option<&str> {
        self.error.as_deref().map(str::trim).filter(|e| !e.is_empty())
    }
}

/// 生成されたスタイル画像
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StyleImageResult {
    pub style_name: String,
    pub image_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl StyleImageResult {
    pub fn new(style_name: impl Into<String>, image_url: impl Into<String>) -> Self {
        Self { style_name: style_name.into(), image_url: image_url.into(), error: None }
    }
}

/// POST /analyze リクエスト
#[derive(Debug, Clone, Serialize)]
pub struct AnalyzeRequest {
    pub image: String,
    pub occasion: String,
    pub attire: String,
}

/// POST /analyze レスポンス
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzeResponse {
    pub success: bool,
    pub result: Option<AnalysisResult>,
    #[serde(rename = "needsImageGeneration")]
    pub needs_image_generation: Option<bool>,
    pub error: Option<String>,
    pub message: Option<String>,
    pub phase: Option<String>,
}

/// POST /generate-images リクエスト
#[derive(Debug, Clone, Serialize)]
pub struct GenerateImagesRequest {
    pub occasion: String,
    pub attire: String,
    pub styles: Vec<StyleSuggestion>,
    pub gender: String,
    pub age_range: String,
}

/// POST /generate-images レスポンス
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerateImagesResponse {
    pub success: bool,
    pub images: Option<Vec<StyleImageResult>>,
    pub error: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_asset_from_data_url() {
        let asset = ImageAsset::from_data_url("data:image/png;base64,iVBORw0KGgo=").unwrap();
        assert_eq!(asset.mime_type(), "image/png");
        assert_eq!(asset.base64_payload(), "iVBORw0KGgo=");
    }

    #[test]
    fn test_image_asset_rejects_empty_canvas() {
        assert!(ImageAsset::from_data_url("data:,").is_err());
        assert!(ImageAsset::from_data_url("").is_err());
        assert!(ImageAsset::from_data_url("http://example.com/a.jpg").is_err());
    }

    #[test]
    fn test_image_asset_mime_default() {
        let asset = ImageAsset::from_data_url("data:;base64,AAAA").unwrap();
        assert_eq!(asset.mime_type(), "image/jpeg");
    }

    #[test]
    fn test_image_asset_from_file_bytes_jpeg() {
        let bytes = [0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10];
        let asset = ImageAsset::from_file_bytes(&bytes).unwrap();
        assert!(asset.as_str().starts_with("data:image/jpeg;base64,"));
        assert_eq!(asset.byte_len(), bytes.len());
    }

    #[test]
    fn test_image_asset_from_file_bytes_unsupported() {
        let err = ImageAsset::from_file_bytes(b"%PDF-1.7").unwrap_err();
        assert!(matches!(err, Error::UnsupportedImage));
    }

    #[test]
    fn test_sniff_webp() {
        let bytes = b"RIFF\x24\x00\x00\x00WEBPVP8 ";
        assert_eq!(sniff_mime_type(bytes), Some("image/webp"));
    }

    #[test]
    fn test_css_color() {
        assert_eq!(NamedColor::new("Navy", "#000080").css_color(), Some("#000080"));
        assert_eq!(NamedColor::new("Short", "#fff").css_color(), Some("#fff"));
        assert_eq!(NamedColor::new("Bad", "red; background:url(x)").css_color(), None);
        assert_eq!(NamedColor::new("Bad", "#12345").css_color(), None);
    }

    #[test]
    fn test_analysis_result_deserialize_partial() {
        let json = r##"{
            "age_range": "20-25",
            "gender": "female",
            "skin": {"name": "Warm Beige", "hex": "#e0b894"},
            "colors": [{"name": "Navy", "hex": "#000080"}],
            "styles": [{"name": "Smart Casual", "description": "d", "occasion": "work"}]
        }"##;
        let result: AnalysisResult = serde_json::from_str(json).expect("デシリアライズ失敗");
        assert_eq!(result.age_range, "20-25");
        assert_eq!(result.colors.len(), 1);
        assert_eq!(result.styles[0].occasion.as_deref(), Some("work"));
        assert!(result.hair_suggestions.recommended_hair_lengths.is_empty());
        assert!(result.error_message().is_none());
    }

    #[test]
    fn test_analysis_result_error_only() {
        let json = r#"{"error": "This image does not contain a clear view of a person."}"#;
        let result: AnalysisResult = serde_json::from_str(json).unwrap();
        assert_eq!(
            result.error_message(),
            Some("This image does not contain a clear view of a person.")
        );
    }

    #[test]
    fn test_analyze_response_deserialize() {
        let json = r#"{
            "success": true,
            "result": {"compliment": "Nice!"},
            "message": "Analysis complete. Loading style images...",
            "phase": "analysis_complete",
            "needsImageGeneration": true
        }"#;
        let response: AnalyzeResponse = serde_json::from_str(json).unwrap();
        assert!(response.success);
        assert_eq!(response.needs_image_generation, Some(true));
        assert_eq!(response.result.unwrap().compliment, "Nice!");
    }

    #[test]
    fn test_style_image_result_with_error() {
        let json = r#"{"style_name": "Boho", "error": "content policy"}"#;
        let image: StyleImageResult = serde_json::from_str(json).unwrap();
        assert_eq!(image.image_url, "");
        assert_eq!(image.error.as_deref(), Some("content policy"));
    }

    #[test]
    fn test_generate_images_request_serialize() {
        let request = GenerateImagesRequest {
            occasion: "work".into(),
            attire: "business".into(),
            styles: vec![StyleSuggestion::new("Classic", "navy suit")],
            gender: "male".into(),
            age_range: "30-35".into(),
        };
        let json = serde_json::to_string(&request).expect("シリアライズ失敗");
        assert!(json.contains("\"age_range\":\"30-35\""));
        assert!(json.contains("\"styles\":[{\"name\":\"Classic\",\"description\":\"navy suit\"}]"));
    }
}
