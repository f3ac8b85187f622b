//! 重生點資料型別
//!
//! 地圖設定檔中的每一筆重生點都由 [`Spawn`] 表示：位置、朝向、陣營、包點與是否可作為下包者

use crate::group::names_match;
use serde::{Deserialize, Serialize};
use std::fmt;

/// 重生點 ID（同一張地圖內唯一且為正數）
pub type SpawnId = i32;

/// 玩家識別碼（64 位元數字）
pub type PlayerId = u64;

/// 三維位置
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vector3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vector3 {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// 兩點間的直線距離
    pub fn distance_to(&self, other: &Vector3) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        let dz = self.z - other.z;
        (dx * dx + dy * dy + dz * dz).sqrt()
    }
}

impl fmt::Display for Vector3 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.2}, {:.2}, {:.2})", self.x, self.y, self.z)
    }
}

/// 視角（pitch / yaw / roll）
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct QAngle {
    pub pitch: f32,
    pub yaw: f32,
    pub roll: f32,
}

impl QAngle {
    pub fn new(pitch: f32, yaw: f32, roll: f32) -> Self {
        Self { pitch, yaw, roll }
    }
}

/// 可被分配重生點的陣營
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Team {
    Terrorist,
    CounterTerrorist,
}

impl Team {
    pub const ALL: [Team; 2] = [Team::Terrorist, Team::CounterTerrorist];

    /// 解析指令用的短名稱（`T` / `CT`，不分大小寫）
    pub fn parse(input: &str) -> Option<Self> {
        match input.trim().to_ascii_uppercase().as_str() {
            "T" => Some(Self::Terrorist),
            "CT" => Some(Self::CounterTerrorist),
            _ => None,
        }
    }

    pub fn short_name(&self) -> &'static str {
        match self {
            Self::Terrorist => "T",
            Self::CounterTerrorist => "CT",
        }
    }

    pub(crate) fn index(&self) -> usize {
        match self {
            Self::Terrorist => 0,
            Self::CounterTerrorist => 1,
        }
    }
}

impl fmt::Display for Team {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.short_name())
    }
}

/// 包點
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Bombsite {
    #[default]
    A,
    B,
}

impl Bombsite {
    pub const ALL: [Bombsite; 2] = [Bombsite::A, Bombsite::B];

    /// 解析 `A` / `B`（不分大小寫）
    pub fn parse(input: &str) -> Option<Self> {
        match input.trim().to_ascii_uppercase().as_str() {
            "A" => Some(Self::A),
            "B" => Some(Self::B),
            _ => None,
        }
    }

    pub(crate) fn index(&self) -> usize {
        match self {
            Self::A => 0,
            Self::B => 1,
        }
    }
}

impl fmt::Display for Bombsite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::A => f.write_str("A"),
            Self::B => f.write_str("B"),
        }
    }
}

/// 單一重生點
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Spawn {
    /// 0 或負數表示尚未分配，載入或新增時會補上
    #[serde(default)]
    pub id: SpawnId,
    pub position: Vector3,
    #[serde(default)]
    pub orientation: QAngle,
    pub team: Team,
    pub bombsite: Bombsite,
    #[serde(default)]
    pub can_be_planter: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// 所屬群組的正式名稱（軟參照）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
}

impl Spawn {
    /// 建立尚未分配 ID 的重生點
    pub fn new(position: Vector3, orientation: QAngle, team: Team, bombsite: Bombsite) -> Self {
        Self {
            id: 0,
            position,
            orientation,
            team,
            bombsite,
            can_be_planter: false,
            name: None,
            group: None,
        }
    }

    pub fn with_planter(mut self, can_be_planter: bool) -> Self {
        self.can_be_planter = can_be_planter;
        self
    }

    pub fn with_id(mut self, id: SpawnId) -> Self {
        self.id = id;
        self
    }

    /// 去重鍵：位置與包點相同即視為同一個重生點（不含陣營）
    pub fn same_location(&self, other: &Spawn) -> bool {
        self.position == other.position && self.bombsite == other.bombsite
    }

    /// 顯示名稱，未命名時為 `Spawn <id>`
    pub fn label(&self) -> String {
        match self.name.as_deref() {
            Some(name) if !name.trim().is_empty() => name.to_string(),
            _ => format!("Spawn {}", self.id),
        }
    }

    /// 群組比對（不分大小寫）
    pub fn is_in_group(&self, group: &str) -> bool {
        self.group
            .as_deref()
            .is_some_and(|g| names_match(g, group.trim()))
    }
}

/// 列出重生點時的篩選條件
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SpawnFilter {
    pub bombsite: Option<Bombsite>,
    pub team: Option<Team>,
    pub group: Option<String>,
}

impl SpawnFilter {
    pub fn matches(&self, spawn: &Spawn) -> bool {
        self.bombsite.map_or(true, |b| spawn.bombsite == b)
            && self.team.map_or(true, |t| spawn.team == t)
            && self.group.as_deref().map_or(true, |g| spawn.is_in_group(g))
    }

    /// 篩選並依 ID 排序
    pub fn apply(&self, spawns: Vec<Spawn>) -> Vec<Spawn> {
        let mut spawns: Vec<Spawn> = spawns.into_iter().filter(|s| self.matches(s)).collect();
        spawns.sort_by_key(|s| s.id);
        spawns
    }
}

/// 修剪字串，空白則視為 None
pub(crate) fn trimmed_non_empty(input: Option<&str>) -> Option<String> {
    input
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_team_and_bombsite() {
        assert_eq!(Team::parse("t"), Some(Team::Terrorist));
        assert_eq!(Team::parse(" CT "), Some(Team::CounterTerrorist));
        assert_eq!(Team::parse("spec"), None);
        assert_eq!(Bombsite::parse("b"), Some(Bombsite::B));
        assert_eq!(Bombsite::parse("C"), None);
    }

    #[test]
    fn test_same_location_ignores_team() {
        let pos = Vector3::new(1.0, 2.0, 3.0);
        let t = Spawn::new(pos, QAngle::default(), Team::Terrorist, Bombsite::A);
        let ct = Spawn::new(pos, QAngle::default(), Team::CounterTerrorist, Bombsite::A);
        let other_site = Spawn::new(pos, QAngle::default(), Team::Terrorist, Bombsite::B);

        assert!(t.same_location(&ct));
        assert!(!t.same_location(&other_site));
    }

    #[test]
    fn test_label() {
        let mut spawn = Spawn::new(
            Vector3::default(),
            QAngle::default(),
            Team::Terrorist,
            Bombsite::A,
        )
        .with_id(7);
        assert_eq!(spawn.label(), "Spawn 7");

        spawn.name = Some("Pit".to_string());
        assert_eq!(spawn.label(), "Pit");
    }

    #[test]
    fn test_filter() {
        let mut grouped = Spawn::new(
            Vector3::new(1.0, 0.0, 0.0),
            QAngle::default(),
            Team::CounterTerrorist,
            Bombsite::A,
        )
        .with_id(2);
        grouped.group = Some("Long A".to_string());
        let plain = Spawn::new(
            Vector3::default(),
            QAngle::default(),
            Team::Terrorist,
            Bombsite::A,
        )
        .with_id(1);

        let filter = SpawnFilter {
            group: Some("long a".to_string()),
            ..SpawnFilter::default()
        };
        let ids: Vec<SpawnId> = filter
            .apply(vec![grouped.clone(), plain.clone()])
            .iter()
            .map(|s| s.id)
            .collect();
        assert_eq!(ids, vec![2]);

        let ids: Vec<SpawnId> = SpawnFilter::default()
            .apply(vec![grouped, plain])
            .iter()
            .map(|s| s.id)
            .collect();
        assert_eq!(ids, vec![1, 2], "應依 ID 排序");
    }

    #[test]
    fn test_spawn_json_shape() {
        let spawn = Spawn::new(
            Vector3::new(1.0, 2.0, 3.0),
            QAngle::new(0.0, 90.0, 0.0),
            Team::CounterTerrorist,
            Bombsite::B,
        )
        .with_planter(true)
        .with_id(3);

        let json = serde_json::to_value(&spawn).unwrap();
        assert_eq!(json["id"], 3);
        assert_eq!(json["team"], "CounterTerrorist");
        assert_eq!(json["bombsite"], "B");
        assert_eq!(json["canBePlanter"], true);
        assert!(json.get("group").is_none());
    }
}
