//! 錯誤型別
//!
//! - 驗證錯誤（[`CatalogError`]）：回傳給呼叫者，不修改設定檔
//! - 設定錯誤（[`AllocationError`]）：本回合無法開始，必須上報
//! - 存檔／解析錯誤不在此列：一律記錄後吞掉，保留記憶體中的狀態

use crate::spawn::{Bombsite, SpawnId, Team};
use thiserror::Error;

pub type CatalogResult<T> = Result<T, CatalogError>;
pub type AllocationResult<T> = Result<T, AllocationError>;
pub type CommandResult<T> = Result<T, CommandError>;

/// 地圖設定檔操作的驗證錯誤
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    #[error("Map config for {map} is not loaded")]
    NotLoaded { map: String },

    #[error("A spawn already exists at that position on bombsite {bombsite}")]
    DuplicateSpawn { bombsite: Bombsite },

    #[error("Spawn with Id={id} not found")]
    SpawnNotFound { id: SpawnId },

    #[error("Spawn not found")]
    SpawnLocationNotFound,

    #[error("Group name must not be empty")]
    EmptyGroupName,

    #[error("Group '{name}' already exists")]
    GroupAlreadyExists { name: String },

    #[error("Group '{name}' not found")]
    GroupNotFound { name: String },
}

/// 回合分配時的設定錯誤
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AllocationError {
    #[error(
        "There are not enough spawns in the map config for Bombsite {bombsite}! \
         ({team}: {players} players, {spawns} spawns)"
    )]
    NotEnoughSpawns {
        bombsite: Bombsite,
        team: Team,
        players: usize,
        spawns: usize,
    },

    #[error("There are no planter spawns for Bombsite {bombsite}!")]
    NoPlanterSpawn { bombsite: Bombsite },
}

/// 設定檔（TOML）讀取錯誤
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },
}

/// 管理指令錯誤
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CommandError {
    #[error("Unknown command: {0}")]
    UnknownCommand(String),

    #[error("Usage: {name} {usage}")]
    Usage {
        name: &'static str,
        usage: &'static str,
    },

    #[error("{0}")]
    InvalidArgument(String),

    #[error("Group '{0}' not found. Use addgroup first or try full name.")]
    UnresolvedGroup(String),

    #[error("You are too close to another spawn ({distance:.1} units), move away and try again.")]
    TooCloseToSpawn { distance: f32 },

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    Allocation(#[from] AllocationError),
}
