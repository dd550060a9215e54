//! Style Advisor CLI
//!
//! 画像ファイルをカメラの代わりに使い、ブラウザ版と同じパイプラインで
//! 解析サービスを呼び出す。

pub mod capture;
pub mod cli;
pub mod client;
pub mod config;
pub mod error;
pub mod report;
