//! 設定ファイルの読み込み関数

use std::path::Path;

use super::{
    ConfigError,
    HubSettings,
};

/// ルートディレクトリ直下の設定ファイル名
pub const SETTINGS_FILE_NAME: &str = ".translatehub.json";

/// 翻訳ルートから設定を読み込む
///
/// `.translatehub.json` ファイルを探して読み込む
///
/// # Arguments
/// * `root` - 翻訳ファイルのルートディレクトリ
///
/// # Returns
/// - `Ok(Some(settings))`: 設定ファイルが見つかり、読み込みに成功
/// - `Ok(None)`: 設定ファイルが見つからない
/// - `Err(ConfigError)`: ファイル読み込みまたはパースエラー
///
/// # Errors
/// - ファイル読み込みエラー
/// - JSON パースエラー
pub(super) fn load_from_root(root: &Path) -> Result<Option<HubSettings>, ConfigError> {
    let config_path = root.join(SETTINGS_FILE_NAME);

    if !config_path.exists() {
        tracing::debug!("Configuration file not found: {:?}", config_path);
        return Ok(None);
    }

    tracing::debug!("Loading configuration from: {:?}", config_path);

    let content = std::fs::read_to_string(&config_path)?;
    let settings: HubSettings = serde_json::from_str(&content)?;

    Ok(Some(settings))
}
