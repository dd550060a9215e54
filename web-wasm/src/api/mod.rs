//! 解析バックエンドとの通信

pub mod backend;
