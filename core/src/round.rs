//! 回合狀態
//!
//! 包點、下包者與強制包點都放在明確的 [`RoundState`] 中，由呼叫者持有並傳入。
//! 強制包點可存成 TOML 檔，讓管理指令的設定延續到之後的回合

use crate::error::AllocationResult;
use crate::index::SpawnIndex;
use crate::prefs::PreferenceStore;
use crate::random::RandomSource;
use crate::roster::RoundPlayer;
use crate::spawn::{Bombsite, PlayerId, Spawn, SpawnId};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoundState {
    pub bombsite: Bombsite,
    pub planter: Option<PlayerId>,
    pub forced_bombsite: Option<Bombsite>,
}

impl RoundState {
    /// 設定或清除強制包點
    pub fn force_bombsite(&mut self, bombsite: Option<Bombsite>) {
        self.forced_bombsite = bombsite;
    }

    /// 有強制包點時使用之，否則 A/B 各半
    pub fn pick_bombsite<R: RandomSource>(&self, rng: &mut R) -> Bombsite {
        self.forced_bombsite
            .unwrap_or_else(|| Bombsite::ALL[rng.random_index(Bombsite::ALL.len())])
    }

    /// 開始新回合：選包點並依玩家在此地圖的偏好分配重生點
    pub fn begin_round<P, R, T>(
        &mut self,
        index: &SpawnIndex,
        players: &[P],
        prefs: &PreferenceStore,
        map_name: &str,
        rng: &mut R,
        teleport: T,
    ) -> AllocationResult<Option<PlayerId>>
    where
        P: RoundPlayer,
        R: RandomSource,
        T: FnMut(&P, &Spawn),
    {
        let bombsite = self.pick_bombsite(rng);
        self.allocate(
            bombsite,
            index,
            players,
            |player| prefs.spawn_id(player.player_id(), map_name),
            rng,
            teleport,
        )
    }

    /// 在指定包點分配重生點並記錄下包者
    ///
    /// 分配失敗時保留包點、清除下包者並回傳錯誤
    pub fn allocate<P, F, R, T>(
        &mut self,
        bombsite: Bombsite,
        index: &SpawnIndex,
        players: &[P],
        preferred_spawn: F,
        rng: &mut R,
        teleport: T,
    ) -> AllocationResult<Option<PlayerId>>
    where
        P: RoundPlayer,
        F: FnMut(&P) -> Option<SpawnId>,
        R: RandomSource,
        T: FnMut(&P, &Spawn),
    {
        self.bombsite = bombsite;
        self.planter = None;

        let planter = index.allocate_round(bombsite, players, preferred_spawn, rng, teleport)?;

        self.planter = planter.map(|p| p.player_id());
        Ok(self.planter)
    }

    /// 讀取保存的強制包點；檔案不存在或損毀時視為未強制
    pub fn load_persisted(path: &Path) -> Self {
        let forced_bombsite = if path.exists() {
            let parsed = fs::read_to_string(path)
                .map_err(|e| e.to_string())
                .and_then(|content| {
                    toml::from_str::<PersistedRound>(&content).map_err(|e| e.to_string())
                });
            match parsed {
                Ok(persisted) => persisted.forced_bombsite,
                Err(e) => {
                    log::warn!("Failed to load round state {}: {}", path.display(), e);
                    None
                }
            }
        } else {
            None
        };

        Self {
            forced_bombsite,
            ..Self::default()
        }
    }

    /// 保存強制包點，回傳是否成功
    pub fn persist(&self, path: &Path) -> bool {
        let persisted = PersistedRound {
            forced_bombsite: self.forced_bombsite,
        };
        let content = match toml::to_string_pretty(&persisted) {
            Ok(content) => content,
            Err(e) => {
                log::warn!("Failed to serialize round state: {}", e);
                return false;
            }
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            if let Err(e) = fs::create_dir_all(parent) {
                log::warn!("Failed to create directory {}: {}", parent.display(), e);
                return false;
            }
        }

        match fs::write(path, content) {
            Ok(()) => true,
            Err(e) => {
                log::warn!("Failed to write round state {}: {}", path.display(), e);
                false
            }
        }
    }
}

/// 跨程序保存的回合設定
#[derive(Debug, Default, Serialize, Deserialize)]
struct PersistedRound {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    forced_bombsite: Option<Bombsite>,
}
