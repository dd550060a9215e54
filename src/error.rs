use thiserror::Error;

#[derive(Error, Debug)]
pub enum StyleAdvisorError {
    #[error("設定エラー: {0}")]
    Config(String),

    #[error("ファイルが見つかりません: {0}")]
    FileNotFound(String),

    #[error("画像読み込みエラー: {0}")]
    ImageLoad(String),

    #[error("HTTPクライアントの初期化に失敗: {0}")]
    HttpClient(String),

    #[error("{0}")]
    Analysis(#[from] style_advisor_common::Error),

    /// 解析サービスがエラーを返した（エラーパネル相当）
    #[error("解析に失敗しました: {0}")]
    AnalysisFailed(String),

    #[error("入力エラー: {0}")]
    Prompt(String),

    #[error("JSON解析エラー: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IOエラー: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, StyleAdvisorError>;
