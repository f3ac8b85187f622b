//! Retakes 重生點核心函式庫
//!
//! 管理每張地圖的重生點與群組設定，並在每回合開始時把存活玩家分配到重生點：
//! - 重生點設定檔（唯一 ID、去重、不分大小寫的群組名稱）
//! - 依包點與陣營分桶的索引與回合分配
//! - 玩家偏好重生點
//! - 群組名稱的模糊解析
//! - 管理指令表

pub mod commands;
pub mod config;
pub mod error;
pub mod group;
pub mod index;
pub mod prefs;
pub mod random;
pub mod roster;
pub mod round;
pub mod spawn;
pub mod store;

// 重新導出常用類型
pub use config::RetakesConfig;
pub use error::{AllocationError, CatalogError, CommandError, ConfigError};
pub use group::{slugify, GroupResolver, GroupSlug};
pub use index::SpawnIndex;
pub use prefs::PreferenceStore;
pub use random::{RandomSource, SeededRandom, ThreadRandom};
pub use roster::{PlayerTeam, RoundPlayer, StaticPlayer};
pub use round::RoundState;
pub use spawn::{Bombsite, PlayerId, QAngle, Spawn, SpawnFilter, SpawnId, Team, Vector3};
pub use store::{LoadMode, LoadOutcome, MapCatalog, SpawnStore};
