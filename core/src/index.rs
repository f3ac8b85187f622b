//! 依包點與陣營分桶的重生點索引，以及每回合的重生點分配
//!
//! 索引永遠從 [`SpawnStore`] 的複本整批重建，不做增量修改

use crate::error::{AllocationError, AllocationResult, CatalogResult};
use crate::random::RandomSource;
use crate::roster::{live_count, qualifying_side, RoundPlayer};
use crate::spawn::{Bombsite, Spawn, SpawnId, Team, Vector3};
use crate::store::SpawnStore;

/// 重生點索引：`[包點][陣營]`
#[derive(Debug, Clone, Default)]
pub struct SpawnIndex {
    buckets: [[Vec<Spawn>; 2]; 2],
}

impl SpawnIndex {
    pub fn from_spawns(spawns: impl IntoIterator<Item = Spawn>) -> Self {
        let mut index = Self::default();
        for spawn in spawns {
            index.buckets[spawn.bombsite.index()][spawn.team.index()].push(spawn);
        }
        index
    }

    pub fn from_store(store: &SpawnStore) -> CatalogResult<Self> {
        Ok(Self::from_spawns(store.spawns()?))
    }

    /// 從設定檔重建，每次修改設定檔後呼叫
    pub fn rebuild(&mut self, store: &SpawnStore) -> CatalogResult<()> {
        *self = Self::from_store(store)?;
        Ok(())
    }

    fn bucket(&self, bombsite: Bombsite, team: Team) -> &[Spawn] {
        &self.buckets[bombsite.index()][team.index()]
    }

    /// 取得包點的重生點；`team` 為 None 時回傳兩隊的聯集
    pub fn spawns(&self, bombsite: Bombsite, team: Option<Team>) -> Vec<Spawn> {
        let site = &self.buckets[bombsite.index()];
        if site.iter().all(Vec::is_empty) {
            return Vec::new();
        }

        match team {
            Some(team) => self.bucket(bombsite, team).to_vec(),
            None => site.iter().flatten().cloned().collect(),
        }
    }

    /// 包點某陣營的重生點數量
    pub fn count(&self, bombsite: Bombsite, team: Team) -> usize {
        self.bucket(bombsite, team).len()
    }

    pub fn len(&self) -> usize {
        self.buckets.iter().flatten().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// 半徑內最近的重生點
    pub fn nearest(&self, bombsite: Bombsite, position: Vector3, radius: f32) -> Option<Spawn> {
        self.buckets[bombsite.index()]
            .iter()
            .flatten()
            .map(|spawn| (spawn.position.distance_to(&position), spawn))
            .filter(|(distance, _)| *distance <= radius)
            .min_by(|(a, _), (b, _)| a.total_cmp(b))
            .map(|(_, spawn)| spawn.clone())
    }

    /// 回合開始時分配重生點
    ///
    /// 1. 複製該包點兩隊的重生點清單作為可用池
    /// 2. 任一隊合格玩家多於可用重生點時失敗，不分配任何人
    /// 3. 從 T 的可下包重生點隨機保留一個給下包者；沒有可下包重生點時失敗
    /// 4. 以隨機順序走訪玩家，略過死亡／無效／非 T、CT 的玩家，第一個 T 成為下包者
    /// 5. 下包者使用保留的重生點；其他人優先使用仍可用的偏好重生點，否則隨機挑選
    ///
    /// `teleport` 對每個被分配的玩家呼叫一次，回傳下包者
    pub fn allocate_round<'p, P, F, R, T>(
        &self,
        bombsite: Bombsite,
        players: &'p [P],
        mut preferred_spawn: F,
        rng: &mut R,
        mut teleport: T,
    ) -> AllocationResult<Option<&'p P>>
    where
        P: RoundPlayer,
        F: FnMut(&P) -> Option<SpawnId>,
        R: RandomSource,
        T: FnMut(&P, &Spawn),
    {
        log::debug!("Moving players to spawns.");

        let mut pools: [Vec<Spawn>; 2] = self.buckets[bombsite.index()].clone();

        for team in Team::ALL {
            let players = live_count(players, team);
            let spawns = pools[team.index()].len();
            if players > spawns {
                return Err(AllocationError::NotEnoughSpawns {
                    bombsite,
                    team,
                    players,
                    spawns,
                });
            }
        }

        let terrorist_pool = &mut pools[Team::Terrorist.index()];
        let planter_slots: Vec<usize> = terrorist_pool
            .iter()
            .enumerate()
            .filter(|(_, spawn)| spawn.can_be_planter)
            .map(|(i, _)| i)
            .collect();
        if planter_slots.is_empty() {
            return Err(AllocationError::NoPlanterSpawn { bombsite });
        }
        let planter_spawn =
            terrorist_pool.remove(planter_slots[rng.random_index(planter_slots.len())]);

        let mut order: Vec<&'p P> = players.iter().collect();
        rng.shuffle(&mut order);

        let mut planter: Option<&'p P> = None;
        let mut assigned = 0;

        for player in order {
            let Some(team) = qualifying_side(player) else {
                continue;
            };

            if planter.is_none() && team == Team::Terrorist {
                planter = Some(player);
                teleport(player, &planter_spawn);
                assigned += 1;
                continue;
            }

            let pool = &mut pools[team.index()];
            if pool.is_empty() {
                log::warn!(
                    "No spawn left for player {} on {} at bombsite {}",
                    player.player_id(),
                    team,
                    bombsite
                );
                continue;
            }

            let slot = preferred_spawn(player)
                .and_then(|id| pool.iter().position(|spawn| spawn.id == id))
                .unwrap_or_else(|| rng.random_index(pool.len()));
            let spawn = pool.remove(slot);

            teleport(player, &spawn);
            assigned += 1;
        }

        log::info!(
            "Moved {} players to spawns at bombsite {} (planter: {:?})",
            assigned,
            bombsite,
            planter.map(|p| p.player_id())
        );

        Ok(planter)
    }
}
