//! Discrete game events for the host (UI, audio, persistence)
//!
//! Events are appended during a tick and drained by the host afterwards.
//! Nothing inside the simulation reads them back.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::boss::BossTier;
use super::state::{EnemyKind, PowerUpKind};
use crate::persistence::PersistedProfile;

/// Something the host may want to react to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GameEvent {
    /// An enemy died. Contact kills report zero points.
    EnemyKilled {
        kind: EnemyKind,
        pos: Vec2,
        points: u64,
        coins: u64,
    },
    /// The player lost HP
    PlayerDamaged { amount: u32, hp: u32 },
    /// A hit was eaten by the shield
    ShieldAbsorbed,
    PowerUpCollected { kind: PowerUpKind },
    /// Coin balance grew by `amount`
    CoinsEarned { amount: u64 },
    BossSpawned { tier: BossTier, wave: u32 },
    BossPhaseChanged { tier: BossTier, phase: u8 },
    BossKilled {
        tier: BossTier,
        points: u64,
        coins: u64,
    },
    /// `wave` is the wave that was just cleared
    WaveCleared { wave: u32, bonus: u64 },
    /// A new wave starts spawning
    WaveStarted { wave: u32 },
    /// Values to write back to storage
    Checkpoint { profile: PersistedProfile },
    GameOver { final_score: u64, wave: u32 },
}

impl GameEvent {
    /// Short name for logging
    pub fn name(&self) -> &'static str {
        match self {
            GameEvent::EnemyKilled { .. } => "enemy_killed",
            GameEvent::PlayerDamaged { .. } => "player_damaged",
            GameEvent::ShieldAbsorbed => "shield_absorbed",
            GameEvent::PowerUpCollected { .. } => "powerup_collected",
            GameEvent::CoinsEarned { .. } => "coins_earned",
            GameEvent::BossSpawned { .. } => "boss_spawned",
            GameEvent::BossPhaseChanged { .. } => "boss_phase_changed",
            GameEvent::BossKilled { .. } => "boss_killed",
            GameEvent::WaveCleared { .. } => "wave_cleared",
            GameEvent::WaveStarted { .. } => "wave_started",
            GameEvent::Checkpoint { .. } => "checkpoint",
            GameEvent::GameOver { .. } => "game_over",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_json_is_tagged() {
        let json = serde_json::to_string(&GameEvent::WaveCleared { wave: 3, bonus: 240 }).unwrap();
        assert!(json.contains("\"type\":\"wave_cleared\""));
        assert!(json.contains("\"bonus\":240"));
    }
}
