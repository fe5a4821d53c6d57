//! テスト用ユーティリティ関数
//!
//! 複数のテストモジュールで使用される共通のヘルパー関数を提供します。
#![cfg(test)]
#![allow(clippy::unwrap_used)]

use std::fs;
use std::path::Path;

use tempfile::TempDir;

use crate::config::{
    DirectoryMatcher,
    HubSettings,
};
use crate::indexer::StructureIndex;
use crate::storage::{
    FileStore,
    parse_translation_json,
};
use crate::types::TranslationMap;

/// テスト用の翻訳ルート
///
/// 一時ディレクトリ上に `<root>/<language>/<namespace>` 形式で翻訳ファイルを配置する。
pub(crate) struct TestRoot {
    /// 一時ディレクトリ（ドロップ時に削除される）
    pub(crate) dir: TempDir,
}

impl TestRoot {
    /// 空のルートを作成
    pub(crate) fn new() -> Self {
        Self { dir: TempDir::new().unwrap() }
    }

    /// ルートのパス
    pub(crate) fn path(&self) -> &Path {
        self.dir.path()
    }

    /// 翻訳ファイルを書き込む
    ///
    /// # Arguments
    /// * `language` - 言語ディレクトリ名（例: "en", "_schema"）
    /// * `namespace` - ファイル名（例: "app.json"）
    /// * `entries` - キーと値のペア
    pub(crate) fn with_file(
        self,
        language: &str,
        namespace: &str,
        entries: &[(&str, &str)],
    ) -> Self {
        self.write_file(language, namespace, entries);
        self
    }

    /// 翻訳ファイルを書き込む（所有権を移動しない版）
    pub(crate) fn write_file(&self, language: &str, namespace: &str, entries: &[(&str, &str)]) {
        let dir = self.path().join(language);
        fs::create_dir_all(&dir).unwrap();
        let text = serde_json::to_string_pretty(&map(entries)).unwrap();
        fs::write(dir.join(namespace), text).unwrap();
    }

    /// 生のテキストを書き込む
    pub(crate) fn write_raw(&self, language: &str, namespace: &str, text: &str) {
        let dir = self.path().join(language);
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join(namespace), text).unwrap();
    }

    /// 翻訳ファイルを読み込む（存在しない場合は `None`）
    pub(crate) fn read(&self, language: &str, namespace: &str) -> Option<TranslationMap> {
        let text = fs::read_to_string(self.path().join(language).join(namespace)).ok()?;
        Some(parse_translation_json(&text).unwrap())
    }

    /// ファイルの生テキスト
    pub(crate) fn read_raw(&self, language: &str, namespace: &str) -> String {
        fs::read_to_string(self.path().join(language).join(namespace)).unwrap()
    }

    /// ファイルが存在するか
    pub(crate) fn exists(&self, language: &str, namespace: &str) -> bool {
        self.path().join(language).join(namespace).is_file()
    }

    /// デフォルト設定の `FileStore`
    pub(crate) fn file_store(&self) -> FileStore {
        FileStore::new(self.path(), "_schema")
    }

    /// 現在のディレクトリ構造をスキャンした `StructureIndex`
    pub(crate) fn index(&self) -> StructureIndex {
        StructureIndex::scan(self.path(), &matcher())
    }
}

/// デフォルト設定の `DirectoryMatcher`
pub(crate) fn matcher() -> DirectoryMatcher {
    DirectoryMatcher::new(&HubSettings::default()).unwrap()
}

/// キーと値のペアから `TranslationMap` を作成
pub(crate) fn map(entries: &[(&str, &str)]) -> TranslationMap {
    entries.iter().map(|(k, v)| ((*k).to_string(), (*v).to_string())).collect()
}

/// 英語・ドイツ語と `app.json` を持つ基本ルート
///
/// - `en/app.json` = `{"a": "hi", "b": ""}`
/// - `de/app.json` = `{"a": "hallo"}`
pub(crate) fn en_de_root() -> TestRoot {
    TestRoot::new()
        .with_file("en", "app.json", &[("a", "hi"), ("b", "")])
        .with_file("de", "app.json", &[("a", "hallo")])
}
