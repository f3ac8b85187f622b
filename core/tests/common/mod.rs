#![allow(dead_code)]

use retakes_core::{Bombsite, QAngle, Spawn, Team, Vector3};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

static COUNTER: AtomicUsize = AtomicUsize::new(0);

/// 每個測試獨立的暫存目錄，離開作用域時刪除
pub struct TestDir(PathBuf);

impl TestDir {
    pub fn new(label: &str) -> Self {
        let n = COUNTER.fetch_add(1, Ordering::SeqCst);
        let path = std::env::temp_dir().join(format!(
            "retakes-core-{}-{}-{}",
            label,
            std::process::id(),
            n
        ));
        let _ = fs::remove_dir_all(&path);
        fs::create_dir_all(&path).expect("建立測試目錄應成功");
        Self(path)
    }

    pub fn path(&self) -> &Path {
        &self.0
    }

    pub fn join(&self, name: &str) -> PathBuf {
        self.0.join(name)
    }
}

impl Drop for TestDir {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(&self.0);
    }
}

/// 以 x 座標區分位置的重生點
pub fn spawn_at(x: f32, team: Team, bombsite: Bombsite) -> Spawn {
    Spawn::new(Vector3::new(x, 0.0, 0.0), QAngle::default(), team, bombsite)
}

pub fn planter_at(x: f32, bombsite: Bombsite) -> Spawn {
    spawn_at(x, Team::Terrorist, bombsite).with_planter(true)
}
