use crate::error::{Result, StyleAdvisorError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use style_advisor_common::ClientConfig;

/// APIのURLを上書きする環境変数
pub const API_URL_ENV: &str = "STYLE_ADVISOR_API_URL";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api_url: String,
    pub timeout_seconds: u64,
    /// 送信前に長辺をこのサイズまで縮小
    pub max_image_size: u32,
    pub attire_required: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: "http://127.0.0.1:5000".into(),
            timeout_seconds: 120,
            max_image_size: 1568,
            attire_required: true,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Config = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| StyleAdvisorError::Config("ホームディレクトリが見つかりません".into()))?;
        Ok(home.join(".config").join("style-advisor").join("config.json"))
    }

    /// 使用するAPIのURL（環境変数を優先）
    pub fn api_url(&self) -> String {
        self.resolve_api_url(std::env::var(API_URL_ENV).ok().as_deref())
    }

    pub fn resolve_api_url(&self, env_value: Option<&str>) -> String {
        match env_value.map(str::trim) {
            Some(url) if !url.is_empty() => url.to_string(),
            _ => self.api_url.clone(),
        }
    }

    pub fn set_api_url(&mut self, url: &str) -> Result<()> {
        let url = url.trim();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(StyleAdvisorError::Config(format!(
                "URLは http:// または https:// で始めてください: {}",
                url
            )));
        }
        self.api_url = url.trim_end_matches('/').to_string();
        Ok(())
    }

    pub fn client_config(&self) -> ClientConfig {
        ClientConfig {
            attire_required: self.attire_required,
            ..ClientConfig::with_base_url(self.api_url())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_overrides_file() {
        let config = Config::default();
        assert_eq!(config.resolve_api_url(Some("https://style.example.com")), "https://style.example.com");
        assert_eq!(config.resolve_api_url(Some("  ")), "http://127.0.0.1:5000");
        assert_eq!(config.resolve_api_url(None), "http://127.0.0.1:5000");
    }

    #[test]
    fn test_set_api_url_validates() {
        let mut config = Config::default();
        assert!(config.set_api_url("style.example.com").is_err());
        config.set_api_url("https://style.example.com/").unwrap();
        assert_eq!(config.api_url, "https://style.example.com");
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let config: Config = serde_json::from_str(r#"{"attire_required": false}"#).unwrap();
        assert!(!config.attire_required);
        assert_eq!(config.timeout_seconds, 120);
        assert_eq!(config.max_image_size, 1568);
    }
}
