//! Wave progression
//!
//! ACTIVE fights toward the kill quota, BREAK is a short countdown after a
//! normal wave, BOSS lasts while a boss is alive.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::boss::{Boss, BossTier};
use super::events::GameEvent;
use super::state::GameState;
use crate::consts::*;

/// Where the wave state machine currently is
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum WaveMode {
    Active,
    Break { remaining: f32 },
    Boss,
}

/// Quota tracking and mode for the current wave
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WaveController {
    pub wave: u32,
    /// Enemies spawned toward this wave's quota
    pub spawned: u32,
    /// Enemies killed this wave (shots, contact and nukes all count)
    pub killed: u32,
    pub spawn_timer: f32,
    pub mode: WaveMode,
}

impl Default for WaveController {
    fn default() -> Self {
        Self::new()
    }
}

impl WaveController {
    pub fn new() -> Self {
        Self {
            wave: 1,
            spawned: 0,
            killed: 0,
            spawn_timer: 0.0,
            mode: WaveMode::Active,
        }
    }

    /// Kills (and spawns) needed to clear a wave
    pub fn quota_for(wave: u32) -> u32 {
        wave * 5 + 12
    }

    pub fn quota(&self) -> u32 {
        Self::quota_for(self.wave)
    }

    /// Seconds between spawns
    pub fn spawn_interval(&self) -> f32 {
        (1.6 - self.wave as f32 * 0.07).max(0.4)
    }

    pub fn in_break(&self) -> bool {
        matches!(self.mode, WaveMode::Break { .. })
    }

    pub fn record_kill(&mut self) {
        self.killed += 1;
    }

    /// Kills still needed, for the HUD
    pub fn remaining(&self) -> u32 {
        self.quota().saturating_sub(self.killed)
    }

    /// Jump to `wave` (at least 1) with fresh counters
    pub fn reset_to(&mut self, wave: u32) {
        self.wave = wave.max(1);
        self.spawned = 0;
        self.killed = 0;
        self.spawn_timer = 0.0;
        self.mode = WaveMode::Active;
    }
}

/// Boss picked for the wave that was just entered, in priority order
///
/// `cleared` is the wave that was just beaten. The legendary roll only
/// counts once the new wave is past 3.
pub fn boss_for_clear(cleared: u32, legendary_roll: f32) -> Option<BossTier> {
    let next = cleared + 1;
    if next > 3 && legendary_roll < LEGENDARY_CHANCE {
        Some(BossTier::LegendaryBoss)
    } else if cleared % 20 == 0 {
        Some(BossTier::UltraBoss)
    } else if cleared % 10 == 0 {
        Some(BossTier::MegaBoss)
    } else if cleared % 5 == 0 {
        Some(BossTier::Boss)
    } else {
        None
    }
}

/// Put a boss of `tier` in the arena, scaled for `wave`
pub fn spawn_boss(state: &mut GameState, tier: BossTier, wave: u32) {
    let id = state.next_entity_id();
    let pos = Vec2::new(state.arena.x / 2.0, tier.spawn_y());
    let boss = Boss::new(id, tier, pos, wave);
    log::info!(
        "{} spawned for wave {} with {} HP",
        tier.name(),
        boss.wave,
        boss.max_hp
    );
    state.emit(GameEvent::BossSpawned {
        tier,
        wave: boss.wave,
    });
    state.boss = Some(boss);
    state.waves.mode = WaveMode::Boss;
}

/// Run the wave state machine for one frame
pub fn update(state: &mut GameState, dt: f32) {
    match state.waves.mode {
        WaveMode::Break { remaining } => {
            let remaining = remaining - dt;
            if remaining <= 0.0 {
                state.waves.mode = WaveMode::Active;
                state.waves.spawn_timer = 0.0;
                let wave = state.waves.wave;
                state.emit(GameEvent::WaveStarted { wave });
            } else {
                state.waves.mode = WaveMode::Break { remaining };
            }
        }
        WaveMode::Boss => {
            if state.boss.is_none() {
                state.waves.mode = WaveMode::Active;
                let wave = state.waves.wave;
                state.emit(GameEvent::WaveStarted { wave });
            }
        }
        WaveMode::Active => {
            let waves = &state.waves;
            if waves.killed >= waves.quota() && state.enemies.is_empty() && state.boss.is_none() {
                clear_wave(state);
            }
        }
    }
}

/// Pay the clear bonus, advance the wave and pick the next mode
fn clear_wave(state: &mut GameState) {
    let cleared = state.waves.wave;
    let bonus = (cleared as u64 + 1) * 60;
    state.score += bonus;
    state.add_coins(cleared as u64 * 5);
    state.player.heal(WAVE_CLEAR_HEAL);

    state.waves.wave += 1;
    state.waves.spawned = 0;
    state.waves.killed = 0;
    state.waves.spawn_timer = 0.0;

    log::info!(
        "Wave {} cleared: +{} bonus, score {}",
        cleared,
        bonus,
        state.score
    );
    state.emit(GameEvent::WaveCleared {
        wave: cleared,
        bonus,
    });
    state.checkpoint();

    // Drawn on every clear so the stream stays aligned across runs
    let legendary_roll = state.roll();
    match boss_for_clear(cleared, legendary_roll) {
        Some(tier) => spawn_boss(state, tier, cleared),
        None => {
            state.waves.mode = WaveMode::Break {
                remaining: WAVE_BREAK_TIME,
            };
        }
    }
}
