//! Neon Siege - A top-down arena shooter
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entities, collisions, bosses, waves)
//! - `platform`: Frame clock and input latching for the host page
//! - `persistence`: Persisted profile values (coins, upgrades, high score)
//! - `settings`: Player preferences that affect the simulation
//! - `session`: Per-frame driver gluing host callbacks to the simulation

pub mod persistence;
pub mod platform;
pub mod session;
pub mod settings;
pub mod sim;

#[cfg(target_arch = "wasm32")]
pub mod web;

pub use persistence::{PersistedProfile, UpgradeLevels};
pub use session::{Hud, Session};
pub use settings::{QualityPreset, Settings};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Largest frame delta the simulation will ever apply (seconds)
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Default arena size when the host does not report one
    pub const DEFAULT_ARENA_WIDTH: f32 = 1280.0;
    pub const DEFAULT_ARENA_HEIGHT: f32 = 720.0;

    /// Player defaults
    pub const PLAYER_RADIUS: f32 = 14.0;
    pub const PLAYER_BASE_SPEED: f32 = 250.0;
    pub const PLAYER_BASE_MAX_HP: u32 = 100;
    /// Extra max HP per upgrade level above 1
    pub const MAX_HP_PER_LEVEL: u32 = 20;
    /// Keep the player this far from the arena edge
    pub const PLAYER_EDGE_MARGIN: f32 = 20.0;
    /// Permanent speed bonus per level above 1
    pub const SPEED_PER_LEVEL: f32 = 0.15;
    pub const SPEED_BOOST_MULTIPLIER: f32 = 1.5;
    pub const MAX_UPGRADE_LEVEL: u8 = 3;

    /// Dash ability
    pub const DASH_DURATION: f32 = 0.15;
    pub const DASH_COOLDOWN: f32 = 3.0;
    pub const DASH_SPEED_MULTIPLIER: f32 = 6.0;

    /// Player weapon
    pub const FIRE_INTERVAL: f32 = 0.12;
    pub const RAPID_FIRE_INTERVAL: f32 = 0.05;
    pub const PLAYER_BULLET_SPEED: f32 = 650.0;
    pub const PLAYER_BULLET_RADIUS: f32 = 5.0;

    /// Timed buffs (seconds)
    pub const RAPID_FIRE_DURATION: f32 = 12.0;
    pub const SPEED_BOOST_DURATION: f32 = 12.0;
    pub const SHIELD_DURATION: f32 = 15.0;

    /// Projectiles are culled once this far outside the arena
    pub const BOUNDS_MARGIN: f32 = 50.0;
    /// Enemies spawn this far outside the arena edge
    pub const SPAWN_OFFSET: f32 = 20.0;

    /// Damage dealt to the player
    pub const ENEMY_BULLET_DAMAGE: u32 = 5;
    pub const CONTACT_DAMAGE: u32 = 10;
    pub const MINIBOSS_CONTACT_DAMAGE: u32 = 15;
    pub const BOSS_CONTACT_DAMAGE: u32 = 25;

    /// Combo window (seconds without a kill before it resets)
    pub const COMBO_WINDOW: f32 = 3.0;
    /// Score multiplier per combo step
    pub const COMBO_BONUS: f64 = 0.1;

    /// Powerups
    pub const POWERUP_RADIUS: f32 = 11.0;
    pub const POWERUP_LIFETIME: f32 = 12.0;
    pub const HEALTH_PICKUP_HEAL: u32 = 35;
    pub const MAX_HP_PICKUP_HEAL: u32 = 20;
    pub const UPGRADE_PICKUP_SCORE: u64 = 150;
    pub const NUKE_BOSS_DAMAGE: u32 = 30;

    /// Waves
    pub const WAVE_BREAK_TIME: f32 = 3.0;
    pub const WAVE_CLEAR_HEAL: u32 = 30;
    pub const LEGENDARY_CHANCE: f32 = 0.001;

    /// Particles
    pub const PARTICLE_GRAVITY: f32 = 250.0;
    pub const PARTICLE_LIFE: f32 = 0.7;
}

/// Unit vector for an angle in radians
#[inline]
pub fn unit_from_angle(angle: f32) -> Vec2 {
    Vec2::new(angle.cos(), angle.sin())
}

/// Angle of the vector pointing from `from` to `to`
///
/// Coincident points yield 0.0 (atan2 of zero), never NaN.
#[inline]
pub fn angle_to(from: Vec2, to: Vec2) -> f32 {
    let d = to - from;
    d.y.atan2(d.x)
}

/// Normalize `v`, falling back to `fallback` when `v` has no usable length
#[inline]
pub fn direction_or(v: Vec2, fallback: Vec2) -> Vec2 {
    v.try_normalize().unwrap_or(fallback)
}

/// Clamp that tolerates inverted bounds (small arenas), favoring `lo`
#[inline]
pub fn clamp_soft(v: f32, lo: f32, hi: f32) -> f32 {
    v.min(hi).max(lo)
}

/// Clamp a position into the arena, keeping `margin` from every edge
#[inline]
pub fn clamp_to_arena(pos: Vec2, arena: Vec2, margin: f32) -> Vec2 {
    Vec2::new(
        clamp_soft(pos.x, margin, arena.x - margin),
        clamp_soft(pos.y, margin, arena.y - margin),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_or_zero_vector_uses_fallback() {
        let dir = direction_or(Vec2::ZERO, Vec2::X);
        assert_eq!(dir, Vec2::X);
    }

    #[test]
    fn test_direction_or_normalizes() {
        let dir = direction_or(Vec2::new(3.0, 4.0), Vec2::X);
        assert!((dir.length() - 1.0).abs() < 1e-6);
        assert!((dir.x - 0.6).abs() < 1e-6);
    }

    #[test]
    fn test_clamp_soft_inverted_bounds() {
        // Arena narrower than twice the margin: no panic, lower bound wins
        assert_eq!(clamp_soft(5.0, 60.0, 40.0), 60.0);
        assert_eq!(clamp_soft(50.0, 10.0, 100.0), 50.0);
    }

    #[test]
    fn test_angle_to_coincident_points() {
        let a = angle_to(Vec2::new(10.0, 10.0), Vec2::new(10.0, 10.0));
        assert_eq!(a, 0.0);
    }
}
