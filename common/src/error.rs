//! エラー型定義

use std::fmt;
use thiserror::Error;

/// 解析開始をブロックしている未入力項目
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Missing {
    Image,
    Occasion,
    Attire,
}

impl fmt::Display for Missing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Missing::Image => "photo",
            Missing::Occasion => "occasion",
            Missing::Attire => "attire",
        };
        f.write_str(s)
    }
}

fn join_missing(items: &[Missing]) -> String {
    items.iter().map(|m| m.to_string()).collect::<Vec<_>>().join(", ")
}

/// 共通エラー型
#[derive(Error, Debug)]
pub enum Error {
    #[error("Camera access denied: {0}")]
    CameraAccessDenied(String),

    #[error("Please select: {}", join_missing(.0))]
    MissingSelection(Vec<Missing>),

    #[error("Analysis failed: {0}")]
    PrimaryRequestFailed(String),

    #[error("Style image generation failed: {0}")]
    SecondaryRequestFailed(String),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Invalid image: {0}")]
    InvalidImage(String),

    #[error("Unsupported image format (expected JPEG, PNG, GIF or WebP)")]
    UnsupportedImage,

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(String),
}

/// Result型エイリアス
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_missing_selection() {
        let error = Error::MissingSelection(vec![Missing::Occasion, Missing::Attire]);
        assert_eq!(error.to_string(), "Please select: occasion, attire");
    }

    #[test]
    fn test_error_display_camera() {
        let error = Error::CameraAccessDenied("NotAllowedError".to_string());
        let display = format!("{}", error);
        assert!(display.contains("Camera access denied"));
        assert!(display.contains("NotAllowedError"));
    }

    #[test]
    fn test_error_from_json() {
        let json_error = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let error: Error = json_error.into();
        assert!(matches!(error, Error::Json(_)));
    }

    #[test]
    fn test_error_debug() {
        let error = Error::Config("テスト".to_string());
        let debug = format!("{:?}", error);
        assert!(debug.contains("Config"));
        assert!(debug.contains("テスト"));
    }
}
