//! 設定管理を行うモジュール

use std::path::{
    Path,
    PathBuf,
};

use super::{
    ConfigError,
    TradSettings,
    loader,
};

/// 検証済みの設定と、その読み込み元のワークスペースを保持する
#[derive(Default, Debug, Clone)]
pub struct ConfigManager {
    /// 現在の設定
    current_settings: TradSettings,

    /// ワークスペースのルートパス
    workspace_root: Option<PathBuf>,
}

impl ConfigManager {
    #[must_use]
    pub fn new() -> Self {
        Self { current_settings: TradSettings::default(), workspace_root: None }
    }

    /// ワークスペースの設定を読み込む
    ///
    /// ワークスペースのルートがない場合や `.trad.json` がない場合はデフォルト設定を使う
    ///
    /// # Arguments
    /// * `workspace_root` - ワークスペースのルートパス
    ///
    /// # Errors
    /// - ファイル読み込みエラー
    /// - JSON パースエラー
    /// - バリデーションエラー
    pub fn load_settings(&mut self, workspace_root: Option<PathBuf>) -> Result<(), ConfigError> {
        tracing::debug!("Loading settings for workspace: {:?}", workspace_root);

        // ワークスペースの設定を読み込み
        let settings = if let Some(root) = &workspace_root {
            loader::load_from_workspace(root)?.map_or_else(TradSettings::default, |ws| {
                tracing::debug!("Loaded workspace settings: {:?}", ws);
                ws
            })
        } else {
            TradSettings::default()
        };

        // バリデーション
        settings.validate().map_err(ConfigError::ValidationErrors)?;

        self.current_settings = settings;
        self.workspace_root = workspace_root;
        tracing::debug!("Settings loaded successfully: {:?}", self.current_settings);

        Ok(())
    }

    /// 設定を検証してから置き換える
    ///
    /// # Errors
    /// バリデーションエラー（元の設定はそのまま残る）
    pub fn update_settings(&mut self, new_settings: TradSettings) -> Result<(), ConfigError> {
        tracing::debug!("Updating settings...");

        new_settings.validate().map_err(ConfigError::ValidationErrors)?;

        self.current_settings = new_settings;
        tracing::debug!("Settings updated successfully");

        Ok(())
    }

    #[must_use]
    pub const fn get_settings(&self) -> &TradSettings {
        &self.current_settings
    }

    #[must_use]
    pub const fn workspace_root(&self) -> Option<&PathBuf> {
        self.workspace_root.as_ref()
    }

    /// 言語ディレクトリ（相対パスならワークスペースのルートから解決する）
    #[must_use]
    pub fn lang_dir(&self) -> PathBuf {
        let lang_dir = Path::new(&self.current_settings.lang_dir);
        match &self.workspace_root {
            Some(root) if lang_dir.is_relative() => root.join(lang_dir),
            _ => lang_dir.to_path_buf(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::fs;

    use rstest::rstest;
    use tempfile::TempDir;

    use super::*;
    use crate::config::CONFIG_FILE_NAME;

    /// new: デフォルト設定で作成されること
    #[rstest]
    fn test_new_creates_default_settings() {
        let manager = ConfigManager::new();

        assert_eq!(manager.get_settings().lang_dir, "lang");
        assert!(manager.workspace_root().is_none());
        assert_eq!(manager.lang_dir(), PathBuf::from("lang"));
    }

    #[rstest]
    fn test_load_settings_without_workspace() {
        let mut manager = ConfigManager::new();

        let result = manager.load_settings(None);

        assert!(result.is_ok());
        assert_eq!(manager.get_settings().file_pattern, "*.trad");
        assert!(manager.workspace_root().is_none());
    }

    #[rstest]
    fn test_load_settings_with_config_file() {
        let temp_dir = TempDir::new().unwrap();
        let config_content = r#"{"langDir": "locales", "defaultLocale": "fr"}"#;
        fs::write(temp_dir.path().join(CONFIG_FILE_NAME), config_content).unwrap();

        let mut manager = ConfigManager::new();
        let result = manager.load_settings(Some(temp_dir.path().to_path_buf()));

        assert!(result.is_ok());
        assert_eq!(manager.get_settings().default_locale.as_deref(), Some("fr"));
        assert_eq!(manager.lang_dir(), temp_dir.path().join("locales"));
    }

    #[rstest]
    fn test_load_settings_without_config_file() {
        let temp_dir = TempDir::new().unwrap();

        let mut manager = ConfigManager::new();
        let result = manager.load_settings(Some(temp_dir.path().to_path_buf()));

        assert!(result.is_ok());
        assert_eq!(manager.lang_dir(), temp_dir.path().join("lang"));
    }

    #[rstest]
    fn test_load_settings_invalid_config_keeps_previous() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join(CONFIG_FILE_NAME), r#"{"filePattern": ""}"#).unwrap();

        let mut manager = ConfigManager::new();
        let result = manager.load_settings(Some(temp_dir.path().to_path_buf()));

        assert!(matches!(result, Err(ConfigError::ValidationErrors(_))));
        assert_eq!(manager.get_settings().file_pattern, "*.trad");
        assert!(manager.workspace_root().is_none());
    }

    #[rstest]
    fn test_absolute_lang_dir_is_kept() {
        let temp_dir = TempDir::new().unwrap();
        let lang_dir = temp_dir.path().join("elsewhere");
        let mut manager = ConfigManager::new();
        manager
            .update_settings(TradSettings {
                lang_dir: lang_dir.to_string_lossy().to_string(),
                ..TradSettings::default()
            })
            .unwrap();
        manager.workspace_root = Some(PathBuf::from("/workspace"));

        assert_eq!(manager.lang_dir(), lang_dir);
    }

    #[rstest]
    fn test_update_settings_valid() {
        let mut manager = ConfigManager::new();
        let new_settings = TradSettings { lazy_loading: false, ..TradSettings::default() };

        let result = manager.update_settings(new_settings);

        assert!(result.is_ok());
        assert!(!manager.get_settings().lazy_loading);
    }

    #[rstest]
    fn test_update_settings_invalid() {
        let mut manager = ConfigManager::new();
        let new_settings = TradSettings { lang_dir: String::new(), ..TradSettings::default() };

        let result = manager.update_settings(new_settings);

        assert!(result.is_err());
    }
}
