mod common;

use common::TestDir;
use retakes_core::PreferenceStore;
use std::fs;

#[test]
fn test_missing_file_starts_empty() {
    let dir = TestDir::new("prefs-missing");
    let prefs = PreferenceStore::open(dir.join("player_prefs.json"));

    assert_eq!(prefs.spawn_id(1, "de_dust2"), None);
    assert!(!prefs.path().exists(), "只讀取時不應建立檔案");
}

#[test]
fn test_preference_persists_across_reopen() {
    let dir = TestDir::new("prefs-reopen");
    let path = dir.join("nested/player_prefs.json");

    let mut prefs = PreferenceStore::open(&path);
    prefs.set_spawn_id(76561198000000001, "de_dust2", Some(4));
    prefs.set_spawn_id(76561198000000001, "de_mirage", Some(9));
    prefs.set_spawn_id(76561198000000002, "de_dust2", Some(5));

    let reopened = PreferenceStore::open(&path);
    assert_eq!(reopened.spawn_id(76561198000000001, "de_dust2"), Some(4));
    assert_eq!(reopened.spawn_id(76561198000000001, "de_mirage"), Some(9));
    assert_eq!(reopened.spawn_id(76561198000000002, "de_dust2"), Some(5));
    assert_eq!(reopened.spawn_id(76561198000000002, "de_mirage"), None);
}

#[test]
fn test_map_name_is_case_insensitive() {
    let dir = TestDir::new("prefs-case");
    let mut prefs = PreferenceStore::open(dir.join("player_prefs.json"));

    prefs.set_spawn_id(7, "de_Dust2", Some(3));
    assert_eq!(prefs.spawn_id(7, "DE_DUST2"), Some(3));

    // 不同大小寫的同一張地圖會覆蓋舊值，而不是新增一筆
    prefs.set_spawn_id(7, "de_dust2", Some(8));
    assert_eq!(prefs.spawn_id(7, "de_Dust2"), Some(8));

    let raw: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(prefs.path()).unwrap()).unwrap();
    assert_eq!(raw["7"].as_object().map(|m| m.len()), Some(1));
    assert_eq!(raw["7"]["de_dust2"], 8);
}

#[test]
fn test_clearing_last_preference_removes_player() {
    let dir = TestDir::new("prefs-clear");
    let mut prefs = PreferenceStore::open(dir.join("player_prefs.json"));

    prefs.set_spawn_id(7, "de_inferno", Some(2));
    prefs.set_spawn_id(7, "de_inferno", None);
    assert_eq!(prefs.spawn_id(7, "de_inferno"), None);

    let raw: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(prefs.path()).unwrap()).unwrap();
    assert!(raw.get("7").is_none());
}

#[test]
fn test_corrupt_file_starts_empty_and_is_overwritten() {
    let dir = TestDir::new("prefs-corrupt");
    let path = dir.join("player_prefs.json");
    fs::write(&path, "{ not json").unwrap();

    let mut prefs = PreferenceStore::open(&path);
    assert_eq!(prefs.spawn_id(1, "de_nuke"), None);

    prefs.set_spawn_id(1, "de_nuke", Some(6));
    let reopened = PreferenceStore::open(&path);
    assert_eq!(reopened.spawn_id(1, "de_nuke"), Some(6));
}
