//! 插件設定（TOML）

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetakesConfig {
    /// 地圖設定檔目錄，相對路徑以模組目錄為基準
    pub map_config_directory: PathBuf,
    /// 玩家偏好檔案，相對路徑以模組目錄為基準
    pub player_prefs_file: PathBuf,
    /// 保存強制包點的檔案，相對路徑以模組目錄為基準
    pub round_state_file: PathBuf,
    /// 新增重生點時與同包點既有重生點的最小距離
    pub min_spawn_spacing: f32,
    /// 尋找最近重生點的搜尋半徑
    pub nearest_spawn_radius: f32,
}

impl Default for RetakesConfig {
    fn default() -> Self {
        Self {
            map_config_directory: PathBuf::from("map_config"),
            player_prefs_file: PathBuf::from("player_prefs.json"),
            round_state_file: PathBuf::from("round_state.toml"),
            min_spawn_spacing: 72.0,
            nearest_spawn_radius: 128.0,
        }
    }
}

impl RetakesConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })
    }

    /// 讀取失敗時記錄並使用預設值
    pub fn load_or_default(path: &Path) -> Self {
        if !path.exists() {
            log::debug!("No config at {}, using defaults", path.display());
            return Self::default();
        }

        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                log::warn!("{}; using defaults", e);
                Self::default()
            }
        }
    }

    pub fn map_config_path(&self, module_directory: &Path) -> PathBuf {
        module_directory.join(&self.map_config_directory)
    }

    pub fn player_prefs_path(&self, module_directory: &Path) -> PathBuf {
        module_directory.join(&self.player_prefs_file)
    }

    pub fn round_state_path(&self, module_directory: &Path) -> PathBuf {
        module_directory.join(&self.round_state_file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: RetakesConfig = toml::from_str("min_spawn_spacing = 50.0").unwrap();

        assert_eq!(config.min_spawn_spacing, 50.0);
        assert_eq!(config.nearest_spawn_radius, 128.0);
        assert_eq!(config.map_config_directory, PathBuf::from("map_config"));
    }

    #[test]
    fn test_paths_are_relative_to_module_directory() {
        let config = RetakesConfig::default();
        let module = Path::new("/srv/retakes");

        assert_eq!(
            config.map_config_path(module),
            PathBuf::from("/srv/retakes/map_config")
        );
        assert_eq!(
            config.player_prefs_path(module),
            PathBuf::from("/srv/retakes/player_prefs.json")
        );
        assert_eq!(
            config.round_state_path(module),
            PathBuf::from("/srv/retakes/round_state.toml")
        );
    }
}
