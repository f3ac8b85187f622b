//! 玩家偏好重生點
//!
//! `玩家 ID → 地圖 → 重生點 ID`，存成單一 JSON 檔。
//! 不檢查重生點是否仍存在；過期的偏好在分配時等同於沒有偏好

use crate::spawn::{PlayerId, SpawnId};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

type PrefsByPlayer = BTreeMap<PlayerId, BTreeMap<String, SpawnId>>;

#[derive(Debug)]
pub struct PreferenceStore {
    path: PathBuf,
    by_player: PrefsByPlayer,
}

impl PreferenceStore {
    /// 開啟並載入；檔案不存在或損毀時以空白開始
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let by_player = Self::read(&path);
        Self { path, by_player }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(path: &Path) -> PrefsByPlayer {
        if !path.exists() {
            return PrefsByPlayer::new();
        }

        let parsed = fs::read_to_string(path)
            .map_err(|e| e.to_string())
            .and_then(|content| {
                serde_json::from_str::<PrefsByPlayer>(&content).map_err(|e| e.to_string())
            });

        match parsed {
            Ok(by_player) => by_player,
            Err(e) => {
                log::warn!("Failed to load player prefs {}: {}", path.display(), e);
                PrefsByPlayer::new()
            }
        }
    }

    /// 玩家在指定地圖的偏好重生點（地圖名稱不分大小寫）
    pub fn spawn_id(&self, player: PlayerId, map_name: &str) -> Option<SpawnId> {
        self.by_player.get(&player).and_then(|by_map| {
            by_map
                .iter()
                .find(|(map, _)| map.eq_ignore_ascii_case(map_name))
                .map(|(_, id)| *id)
        })
    }

    /// 設定或清除偏好，並立即寫檔
    pub fn set_spawn_id(&mut self, player: PlayerId, map_name: &str, spawn_id: Option<SpawnId>) {
        let by_map = self.by_player.entry(player).or_default();
        by_map.retain(|map, _| !map.eq_ignore_ascii_case(map_name));

        if let Some(id) = spawn_id {
            by_map.insert(map_name.to_string(), id);
        }
        if by_map.is_empty() {
            self.by_player.remove(&player);
        }

        self.save();
    }

    fn save(&self) {
        let content = match serde_json::to_string_pretty(&self.by_player) {
            Ok(content) => content,
            Err(e) => {
                log::warn!("Failed to serialize player prefs: {}", e);
                return;
            }
        };

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            if let Err(e) = fs::create_dir_all(parent) {
                log::warn!("Failed to create directory {}: {}", parent.display(), e);
                return;
            }
        }

        if let Err(e) = fs::write(&self.path, content) {
            log::warn!(
                "Failed to write player prefs {}: {}",
                self.path.display(),
                e
            );
        }
    }
}
