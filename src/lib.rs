//! translatehub
//!
//! 言語ごとの JSON 翻訳ファイル（名前空間）を管理するライブラリ。
//! スキーマ同期、キー操作、進捗集計、検索、ZIP エクスポートを提供する。

pub mod config;
pub mod error;
pub mod export;
pub mod indexer;
pub mod manager;
pub mod modified;
pub mod ops;
pub mod query;
pub mod storage;
pub mod types;

#[cfg(test)]
mod test_utils;

// TranslationManager を再エクスポート
pub use error::HubError;
pub use manager::TranslationManager;
