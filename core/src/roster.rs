//! 回合中的玩家
//!
//! 核心邏輯不認識遊戲引擎的玩家物件，只透過 [`RoundPlayer`] 取得分配需要的資訊

use crate::spawn::{PlayerId, Team};

/// 玩家目前所在的隊伍（包含不參與分配的隊伍）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PlayerTeam {
    #[default]
    None,
    Spectator,
    Terrorist,
    CounterTerrorist,
}

impl PlayerTeam {
    /// 可被分配重生點的陣營
    pub fn side(&self) -> Option<Team> {
        match self {
            Self::Terrorist => Some(Team::Terrorist),
            Self::CounterTerrorist => Some(Team::CounterTerrorist),
            Self::None | Self::Spectator => None,
        }
    }
}

impl From<Team> for PlayerTeam {
    fn from(team: Team) -> Self {
        match team {
            Team::Terrorist => Self::Terrorist,
            Team::CounterTerrorist => Self::CounterTerrorist,
        }
    }
}

pub trait RoundPlayer {
    fn player_id(&self) -> PlayerId;
    fn team(&self) -> PlayerTeam;
    /// 是否有存活且有效的角色
    fn is_alive_and_valid(&self) -> bool;
}

/// 參與本回合分配的陣營；不合格的玩家回傳 None
pub fn qualifying_side<P: RoundPlayer + ?Sized>(player: &P) -> Option<Team> {
    if !player.is_alive_and_valid() {
        return None;
    }
    player.team().side()
}

/// 純資料的玩家，供離線模擬與測試使用
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StaticPlayer {
    pub id: PlayerId,
    pub team: PlayerTeam,
    pub alive: bool,
}

impl StaticPlayer {
    pub fn alive(id: PlayerId, team: impl Into<PlayerTeam>) -> Self {
        Self {
            id,
            team: team.into(),
            alive: true,
        }
    }

    pub fn dead(id: PlayerId, team: impl Into<PlayerTeam>) -> Self {
        Self {
            id,
            team: team.into(),
            alive: false,
        }
    }
}

impl RoundPlayer for StaticPlayer {
    fn player_id(&self) -> PlayerId {
        self.id
    }

    fn team(&self) -> PlayerTeam {
        self.team
    }

    fn is_alive_and_valid(&self) -> bool {
        self.alive
    }
}

/// 名單中某陣營合格玩家的數量
pub fn live_count<P: RoundPlayer>(players: &[P], team: Team) -> usize {
    players
        .iter()
        .filter(|p| qualifying_side(*p) == Some(team))
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_qualifying_side() {
        assert_eq!(
            qualifying_side(&StaticPlayer::alive(1, Team::Terrorist)),
            Some(Team::Terrorist)
        );
        assert_eq!(qualifying_side(&StaticPlayer::dead(2, Team::Terrorist)), None);
        assert_eq!(
            qualifying_side(&StaticPlayer::alive(3, PlayerTeam::Spectator)),
            None
        );
    }

    #[test]
    fn test_live_count() {
        let players = [
            StaticPlayer::alive(1, Team::CounterTerrorist),
            StaticPlayer::alive(2, Team::CounterTerrorist),
            StaticPlayer::dead(3, Team::CounterTerrorist),
            StaticPlayer::alive(4, Team::Terrorist),
        ];
        assert_eq!(live_count(&players, Team::CounterTerrorist), 2);
        assert_eq!(live_count(&players, Team::Terrorist), 1);
    }
}
