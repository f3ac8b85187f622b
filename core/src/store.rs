//! 地圖重生點設定檔
//!
//! 每張地圖一個 JSON 檔（`<目錄>/<地圖>.json`），包含重生點與群組。
//! 每次寫入操作的流程固定為：修改記憶體 → 整理 → 寫檔 → 重新讀檔，
//! 讓磁碟上的檔案成為唯一可信的狀態。
//!
//! 讀寫失敗只記錄日誌，不會回傳錯誤；驗證失敗則以 [`CatalogError`] 回傳

use crate::error::{CatalogError, CatalogResult};
use crate::group::{names_match, GroupSlug};
use crate::spawn::{trimmed_non_empty, Spawn, SpawnId};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

/// 單張地圖的完整設定
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MapCatalog {
    #[serde(default)]
    pub spawns: Vec<Spawn>,
    #[serde(default)]
    pub groups: Vec<String>,
}

impl MapCatalog {
    /// 最小的未使用正整數 ID
    pub fn next_free_id(&self) -> SpawnId {
        let used: HashSet<SpawnId> = self.spawns.iter().map(|s| s.id).collect();
        smallest_unused(&used)
    }

    /// 修復 ID：非正數或重複者改為最小的未使用正整數
    ///
    /// 回傳是否有任何修改
    pub fn repair_ids(&mut self) -> bool {
        let mut used: HashSet<SpawnId> = self
            .spawns
            .iter()
            .map(|s| s.id)
            .filter(|id| *id > 0)
            .collect();
        let mut seen = HashSet::new();
        let mut changed = false;

        for spawn in &mut self.spawns {
            if spawn.id > 0 && seen.insert(spawn.id) {
                continue;
            }

            let id = smallest_unused(&used);
            used.insert(id);
            seen.insert(id);
            spawn.id = id;
            changed = true;
        }

        changed
    }

    /// 存檔前整理
    ///
    /// - 位置＋包點重複的重生點只保留第一個
    /// - 群組去除空白、不分大小寫去重、依字母排序
    pub fn sanitize(&mut self) {
        let mut kept: Vec<Spawn> = Vec::with_capacity(self.spawns.len());
        for spawn in self.spawns.drain(..) {
            if !kept.iter().any(|k| k.same_location(&spawn)) {
                kept.push(spawn);
            }
        }
        self.spawns = kept;

        let mut groups: Vec<String> = Vec::with_capacity(self.groups.len());
        for group in self.groups.iter().map(|g| g.trim()).filter(|g| !g.is_empty()) {
            if !groups.iter().any(|g| names_match(g, group)) {
                groups.push(group.to_string());
            }
        }
        groups.sort_by_key(|g| g.to_lowercase());
        self.groups = groups;
    }

    fn find_group(&self, name: &str) -> Option<&String> {
        self.groups.iter().find(|g| names_match(g, name))
    }
}

fn smallest_unused(used: &HashSet<SpawnId>) -> SpawnId {
    (1..)
        .find(|id| !used.contains(id))
        .unwrap_or(SpawnId::MAX)
}

/// 載入模式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadMode {
    /// 檔案不存在時建立空白設定並存檔
    CreateIfMissing,
    /// 只讀取既有檔案：檔案不存在時不建立任何檔案
    ExistingOnly,
}

/// 載入結果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    Loaded,
    /// 載入時修復了 ID 並已回寫
    Repaired,
    /// 檔案不存在，已建立空白設定
    Created,
    /// 檔案不存在（僅讀取既有檔案）
    Missing,
    /// 讀取或解析失敗，保留原本的狀態
    Failed,
}

/// 單張地圖的重生點設定儲存
#[derive(Debug)]
pub struct SpawnStore {
    map_name: String,
    directory: PathBuf,
    path: PathBuf,
    catalog: Option<MapCatalog>,
}

impl SpawnStore {
    /// 建立尚未載入的儲存
    pub fn new(directory: impl Into<PathBuf>, map_name: &str) -> Self {
        let directory = directory.into();
        let path = directory.join(format!("{map_name}.json"));
        Self {
            map_name: map_name.to_string(),
            directory,
            path,
            catalog: None,
        }
    }

    /// 建立並載入（檔案不存在時會建立）
    pub fn open(directory: impl Into<PathBuf>, map_name: &str) -> Self {
        let mut store = Self::new(directory, map_name);
        store.load(LoadMode::CreateIfMissing);
        store
    }

    pub fn map_name(&self) -> &str {
        &self.map_name
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// 是否已載入指定地圖的設定
    pub fn is_loaded_for(&self, map_name: &str) -> bool {
        self.catalog.is_some() && self.map_name == map_name
    }

    pub fn load(&mut self, mode: LoadMode) -> LoadOutcome {
        log::debug!("Attempting to load map data from {}", self.path.display());

        if !self.path.exists() {
            log::debug!("No config for map {}", self.map_name);
            return match mode {
                LoadMode::ExistingOnly => LoadOutcome::Missing,
                LoadMode::CreateIfMissing => {
                    self.catalog = Some(MapCatalog::default());
                    self.save();
                    LoadOutcome::Created
                }
            };
        }

        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) => {
                log::warn!("Failed to read {}: {}", self.path.display(), e);
                return LoadOutcome::Failed;
            }
        };

        let mut catalog: MapCatalog = match serde_json::from_str(&content) {
            Ok(catalog) => catalog,
            Err(e) => {
                log::warn!("Failed to parse {}: {}", self.path.display(), e);
                return LoadOutcome::Failed;
            }
        };

        let repaired = catalog.repair_ids();
        self.catalog = Some(catalog);
        log::debug!("Data loaded from {}", self.path.display());

        if repaired {
            log::info!("Repaired spawn ids for map {}", self.map_name);
            self.save();
            LoadOutcome::Repaired
        } else {
            LoadOutcome::Loaded
        }
    }

    /// 重生點清單的複本
    pub fn spawns(&self) -> CatalogResult<Vec<Spawn>> {
        Ok(self.catalog()?.spawns.clone())
    }

    /// 群組清單的複本
    pub fn groups(&self) -> CatalogResult<Vec<String>> {
        Ok(self.catalog()?.groups.clone())
    }

    pub fn spawn(&self, id: SpawnId) -> CatalogResult<Spawn> {
        self.catalog()?
            .spawns
            .iter()
            .find(|s| s.id == id)
            .cloned()
            .ok_or(CatalogError::SpawnNotFound { id })
    }

    /// 新增重生點，回傳分配到的 ID
    ///
    /// 尚未載入時先載入（檔案不存在則建立）；檔案無法讀取時回傳 [`CatalogError::NotLoaded`]
    pub fn add_spawn(&mut self, mut spawn: Spawn) -> CatalogResult<SpawnId> {
        let map = self.map_name.clone();
        let catalog = self.ensure_loaded()?;

        if catalog.spawns.iter().any(|s| s.same_location(&spawn)) {
            return Err(CatalogError::DuplicateSpawn {
                bombsite: spawn.bombsite,
            });
        }

        if spawn.id <= 0 || catalog.spawns.iter().any(|s| s.id == spawn.id) {
            spawn.id = catalog.next_free_id();
        }
        spawn.name = trimmed_non_empty(spawn.name.as_deref());
        spawn.group = trimmed_non_empty(spawn.group.as_deref());

        let id = spawn.id;
        log::info!("Adding spawn {} ({} {}) to map {}", id, spawn.team, spawn.bombsite, map);
        catalog.spawns.push(spawn);
        self.commit();

        Ok(id)
    }

    /// 移除重生點：ID 為正且存在時依 ID，否則以位置＋包點比對
    pub fn remove_spawn(&mut self, spawn: &Spawn) -> CatalogResult<Spawn> {
        let map = self.map_name.clone();
        let catalog = self.catalog_mut()?;

        let by_id = (spawn.id > 0)
            .then(|| catalog.spawns.iter().position(|s| s.id == spawn.id))
            .flatten();
        let index = by_id
            .or_else(|| catalog.spawns.iter().position(|s| s.same_location(spawn)))
            .ok_or(CatalogError::SpawnLocationNotFound)?;

        let removed = catalog.spawns.remove(index);
        log::info!("Removed spawn {} from map {}", removed.id, map);
        self.commit();

        Ok(removed)
    }

    pub fn remove_spawn_by_id(&mut self, id: SpawnId) -> CatalogResult<Spawn> {
        let map = self.map_name.clone();
        let catalog = self.catalog_mut()?;

        let index = catalog
            .spawns
            .iter()
            .position(|s| s.id == id)
            .ok_or(CatalogError::SpawnNotFound { id })?;

        let removed = catalog.spawns.remove(index);
        log::info!("Removed spawn {} from map {}", removed.id, map);
        self.commit();

        Ok(removed)
    }

    /// 新增群組，回傳修剪後的名稱
    pub fn add_group(&mut self, name: &str) -> CatalogResult<String> {
        let name = name.trim();
        if name.is_empty() {
            return Err(CatalogError::EmptyGroupName);
        }

        let map = self.map_name.clone();
        let catalog = self.ensure_loaded()?;
        if let Some(existing) = catalog.find_group(name) {
            return Err(CatalogError::GroupAlreadyExists {
                name: existing.clone(),
            });
        }

        catalog.groups.push(name.to_string());
        log::info!("Added group '{}' to map {}", name, map);
        self.commit();

        Ok(name.to_string())
    }

    /// 移除群組，並清除所有指向此群組的重生點
    ///
    /// 名稱以不分大小寫或 slug 比對；回傳被清除群組的重生點數量
    pub fn remove_group(&mut self, name: &str) -> CatalogResult<usize> {
        let name = name.trim();
        if name.is_empty() {
            return Err(CatalogError::EmptyGroupName);
        }

        let catalog = self.catalog_mut()?;
        let removed = catalog
            .groups
            .iter()
            .find(|g| names_match(g, name) || GroupSlug::from_name(g).as_str() == name)
            .cloned()
            .ok_or_else(|| CatalogError::GroupNotFound {
                name: name.to_string(),
            })?;
        let slug = GroupSlug::from_name(&removed);

        catalog.groups.retain(|g| !names_match(g, &removed));

        let mut cleared = 0;
        for spawn in &mut catalog.spawns {
            let points_here = spawn
                .group
                .as_deref()
                .is_some_and(|g| names_match(g, &removed) || slug.matches_name(g));
            if points_here {
                spawn.group = None;
                cleared += 1;
            }
        }

        log::info!(
            "Removed group '{}' from map {} ({} spawns cleared)",
            removed,
            self.map_name,
            cleared
        );
        self.commit();

        Ok(cleared)
    }

    /// 設定或清除重生點的群組
    ///
    /// 不驗證群組是否存在，呼叫者應先透過 [`crate::group::GroupResolver`] 解析
    pub fn set_spawn_group(&mut self, id: SpawnId, group: Option<&str>) -> CatalogResult<()> {
        let spawn = self.spawn_mut(id)?;
        spawn.group = trimmed_non_empty(group);
        self.commit();
        Ok(())
    }

    /// 設定或清除重生點名稱
    pub fn set_spawn_name(&mut self, id: SpawnId, name: Option<&str>) -> CatalogResult<()> {
        let spawn = self.spawn_mut(id)?;
        spawn.name = trimmed_non_empty(name);
        self.commit();
        Ok(())
    }

    fn catalog(&self) -> CatalogResult<&MapCatalog> {
        self.catalog.as_ref().ok_or_else(|| CatalogError::NotLoaded {
            map: self.map_name.clone(),
        })
    }

    fn catalog_mut(&mut self) -> CatalogResult<&mut MapCatalog> {
        let map = &self.map_name;
        self.catalog
            .as_mut()
            .ok_or_else(|| CatalogError::NotLoaded { map: map.clone() })
    }

    /// 尚未載入時先以 [`LoadMode::CreateIfMissing`] 載入，
    /// 避免以空白設定覆寫磁碟上既有的檔案
    fn ensure_loaded(&mut self) -> CatalogResult<&mut MapCatalog> {
        if self.catalog.is_none() {
            self.load(LoadMode::CreateIfMissing);
        }
        self.catalog_mut()
    }

    fn spawn_mut(&mut self, id: SpawnId) -> CatalogResult<&mut Spawn> {
        self.catalog_mut()?
            .spawns
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or(CatalogError::SpawnNotFound { id })
    }

    /// 寫檔後重新讀檔；寫檔失敗時保留記憶體中的狀態
    fn commit(&mut self) {
        if self.save() {
            self.load(LoadMode::ExistingOnly);
        }
    }

    /// 整理並寫檔，回傳是否成功
    fn save(&mut self) -> bool {
        let Some(catalog) = self.catalog.as_mut() else {
            return false;
        };
        catalog.sanitize();

        let content = match serde_json::to_string_pretty(catalog) {
            Ok(content) => content,
            Err(e) => {
                log::warn!("Failed to serialize map config {}: {}", self.map_name, e);
                return false;
            }
        };

        if let Err(e) = fs::create_dir_all(&self.directory) {
            log::warn!(
                "Failed to create directory {}: {}",
                self.directory.display(),
                e
            );
            return false;
        }

        match fs::write(&self.path, content) {
            Ok(()) => {
                log::debug!("Data has been written to {}", self.path.display());
                true
            }
            Err(e) => {
                log::warn!(
                    "An error occurred while writing to {}: {}",
                    self.path.display(),
                    e
                );
                false
            }
        }
    }
}

/// 列出目錄中所有地圖設定檔的地圖名稱（已排序）
pub fn list_map_configs(directory: &Path) -> Vec<String> {
    let entries = match fs::read_dir(directory) {
        Ok(entries) => entries,
        Err(e) => {
            log::warn!("Failed to list {}: {}", directory.display(), e);
            return Vec::new();
        }
    };

    let mut maps: Vec<String> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.extension().and_then(|s| s.to_str()) == Some("json"))
        .filter_map(|path| {
            path.file_stem()
                .and_then(|s| s.to_str())
                .map(str::to_string)
        })
        .collect();
    maps.sort();
    maps
}
