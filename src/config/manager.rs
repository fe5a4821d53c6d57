//! 設定管理を行うモジュール

use std::path::Path;

use super::{
    ConfigError,
    HubSettings,
    loader,
};

/// 設定管理を行う
#[derive(Default, Debug, Clone)]
pub struct ConfigManager {
    /// 現在の設定
    current_settings: HubSettings,
}

impl ConfigManager {
    /// 新しい設定マネージャーを作成
    #[must_use]
    pub fn new() -> Self {
        Self { current_settings: HubSettings::default() }
    }

    /// 設定を読み込む
    ///
    /// # Arguments
    /// * `root` - 翻訳ファイルのルートパス
    ///
    /// # Returns
    /// - `Ok(())`: 設定の読み込みとバリデーション成功
    /// - `Err(ConfigError)`: エラー
    ///
    /// # Errors
    /// - ファイル読み込みエラー
    /// - JSON パースエラー
    /// - バリデーションエラー
    pub fn load_settings(&mut self, root: Option<&Path>) -> Result<(), ConfigError> {
        tracing::debug!("Loading settings for root: {:?}", root);

        // ルートの設定を読み込み
        let settings = if let Some(root) = root {
            loader::load_from_root(root)?.map_or_else(HubSettings::default, |loaded| {
                tracing::debug!("Loaded root settings: {:?}", loaded);
                loaded
            })
        } else {
            HubSettings::default()
        };

        // バリデーション
        settings.validate().map_err(ConfigError::ValidationErrors)?;

        // 設定を保存
        self.current_settings = settings;
        tracing::debug!("Settings loaded successfully: {:?}", self.current_settings);

        Ok(())
    }

    /// 設定を更新する（オプション画面からの変更用）
    pub fn update_settings(&mut self, new_settings: HubSettings) -> Result<(), ConfigError> {
        tracing::debug!("Updating settings...");

        // バリデーション
        new_settings.validate().map_err(ConfigError::ValidationErrors)?;

        // 設定を更新
        self.current_settings = new_settings;
        tracing::debug!("Settings updated successfully");

        Ok(())
    }

    /// 現在の設定を取得
    #[must_use]
    pub const fn get_settings(&self) -> &HubSettings {
        &self.current_settings
    }
}
