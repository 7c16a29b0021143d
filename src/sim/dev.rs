//! Developer overrides
//!
//! Applied between frames. Numeric arguments arrive unchecked from a
//! console or test harness and are clamped instead of rejected.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::boss::BossTier;
use super::combat;
use super::state::GameState;
use super::wave;

/// One dev console command
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "cmd", content = "value", rename_all = "snake_case")]
pub enum DevCommand {
    SetWave(i64),
    SetHp(i64),
    SetScore(i64),
    SetCoins(i64),
    SetWeaponLevel(i64),
    SetMaxHpLevel(i64),
    SetSpeedLevel(i64),
    GodMode(bool),
    KillAll,
    SkipWave,
    SpawnBoss(BossTier),
    FullHeal,
}

fn clear_arena(state: &mut GameState) {
    state.enemies.clear();
    state.enemy_bullets.clear();
    state.pending.clear();
}

/// Apply a command to the running game
pub fn apply(state: &mut GameState, cmd: DevCommand) {
    log::debug!("Dev command: {:?}", cmd);
    match cmd {
        DevCommand::SetWave(wave) => {
            let wave = wave.clamp(1, u32::MAX as i64) as u32;
            clear_arena(state);
            state.boss = None;
            state.waves.reset_to(wave);
        }
        DevCommand::SetHp(hp) => state.player.set_hp(hp),
        DevCommand::SetScore(score) => state.score = score.max(0) as u64,
        DevCommand::SetCoins(coins) => state.coins = coins.max(0) as u64,
        DevCommand::SetWeaponLevel(level) => {
            state.player.weapon_level = crate::persistence::clamp_level(level);
        }
        DevCommand::SetMaxHpLevel(level) => state.player.set_max_hp_level(level),
        DevCommand::SetSpeedLevel(level) => {
            state.player.speed_level = crate::persistence::clamp_level(level);
        }
        DevCommand::GodMode(on) => state.god_mode = on,
        DevCommand::KillAll => {
            let bounty: u64 = state.enemies.iter().map(|e| e.score).sum();
            state.score += bounty;
            state.enemies.clear();
            state.enemy_bullets.clear();
            if let Some(boss) = state.boss.as_mut() {
                boss.hp = 0;
                combat::kill_boss(state);
            }
        }
        DevCommand::SkipWave => {
            clear_arena(state);
            state.boss = None;
            let next = state.waves.wave.saturating_add(1);
            state.waves.reset_to(next);
        }
        DevCommand::SpawnBoss(tier) => {
            clear_arena(state);
            state.boss = None;
            let wave = state.waves.wave;
            wave::spawn_boss(state, tier, wave);
            if let Some(boss) = state.boss.as_mut() {
                boss.pos = Vec2::new(state.arena.x / 2.0, 120.0);
            }
        }
        DevCommand::FullHeal => {
            let max = state.player.max_hp;
            state.player.hp = max;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::PersistedProfile;
    use crate::settings::Settings;
    use crate::sim::state::{Enemy, EnemyKind};
    use crate::sim::wave::WaveMode;

    fn state() -> GameState {
        GameState::new(
            9,
            Vec2::new(1280.0, 720.0),
            PersistedProfile::default(),
            &Settings::default(),
        )
    }

    #[test]
    fn test_negative_values_clamped() {
        let mut s = state();
        apply(&mut s, DevCommand::SetWave(-4));
        assert_eq!(s.waves.wave, 1);
        apply(&mut s, DevCommand::SetHp(-50));
        assert_eq!(s.player.hp, 0);
        apply(&mut s, DevCommand::SetHp(9999));
        assert_eq!(s.player.hp, 100);
        apply(&mut s, DevCommand::SetWeaponLevel(7));
        assert_eq!(s.player.weapon_level, 3);
        apply(&mut s, DevCommand::SetSpeedLevel(0));
        assert_eq!(s.player.speed_level, 1);
        apply(&mut s, DevCommand::SetScore(-1));
        assert_eq!(s.score, 0);
    }

    #[test]
    fn test_max_hp_level_caps_hp() {
        let mut s = state();
        apply(&mut s, DevCommand::SetMaxHpLevel(3));
        apply(&mut s, DevCommand::FullHeal);
        assert_eq!(s.player.hp, 140);
        apply(&mut s, DevCommand::SetMaxHpLevel(1));
        assert_eq!(s.player.max_hp, 100);
        assert_eq!(s.player.hp, 100);
    }

    #[test]
    fn test_kill_all_pays_score_and_kills_boss() {
        let mut s = state();
        s.enemies.push(Enemy::new(1, EnemyKind::Tank, Vec2::ZERO));
        s.enemies.push(Enemy::new(2, EnemyKind::Fast, Vec2::ZERO));
        apply(&mut s, DevCommand::SpawnBoss(BossTier::Boss));
        assert!(s.enemies.is_empty());
        s.enemies.push(Enemy::new(3, EnemyKind::Tank, Vec2::ZERO));
        apply(&mut s, DevCommand::KillAll);
        assert!(s.boss.is_none());
        // 30 for the tank plus the wave-1 boss reward
        assert_eq!(s.score, 30 + 720);
    }

    #[test]
    fn test_god_mode_blocks_damage() {
        let mut s = state();
        apply(&mut s, DevCommand::GodMode(true));
        s.damage_player(50);
        assert_eq!(s.player.hp, 100);
    }

    #[test]
    fn test_skip_wave() {
        let mut s = state();
        s.waves.killed = 5;
        apply(&mut s, DevCommand::SkipWave);
        assert_eq!(s.waves.wave, 2);
        assert_eq!(s.waves.killed, 0);
        assert_eq!(s.waves.mode, WaveMode::Active);
    }

    #[test]
    fn test_command_json() {
        let cmd: DevCommand = serde_json::from_str(r#"{"cmd":"set_wave","value":12}"#).unwrap();
        assert_eq!(cmd, DevCommand::SetWave(12));
        let cmd: DevCommand = serde_json::from_str(r#"{"cmd":"kill_all"}"#).unwrap();
        assert_eq!(cmd, DevCommand::KillAll);
    }
}
