//! Enemy spawning

use glam::Vec2;

use super::state::{Enemy, EnemyKind, GameState};
use crate::consts::SPAWN_OFFSET;

/// Enemy type for one uniform draw, gated by wave
pub fn pick_kind(wave: u32, roll: f32) -> EnemyKind {
    if wave >= 3 && roll < 0.03 {
        EnemyKind::Miniboss
    } else if wave >= 3 && roll < 0.23 {
        EnemyKind::Shooter
    } else if wave >= 2 && roll < 0.43 {
        EnemyKind::Tank
    } else if roll < 0.63 {
        EnemyKind::Fast
    } else {
        EnemyKind::Normal
    }
}

/// Point just outside one arena edge; `side` 0..4 is top, right, bottom, left
pub fn edge_point(side: u32, along: f32, arena: Vec2) -> Vec2 {
    match side % 4 {
        0 => Vec2::new(along * arena.x, -SPAWN_OFFSET),
        1 => Vec2::new(arena.x + SPAWN_OFFSET, along * arena.y),
        2 => Vec2::new(along * arena.x, arena.y + SPAWN_OFFSET),
        _ => Vec2::new(-SPAWN_OFFSET, along * arena.y),
    }
}

/// Spawn one enemy of `kind` at `pos` and return its ID
pub fn spawn_enemy(state: &mut GameState, kind: EnemyKind, pos: Vec2) -> u32 {
    let id = state.next_entity_id();
    state.enemies.push(Enemy::new(id, kind, pos));
    id
}

/// Spawn one random enemy on a random edge, counted toward the wave quota
pub fn spawn_wave_enemy(state: &mut GameState) {
    let side = (state.roll() * 4.0) as u32;
    let along = state.roll();
    let pos = edge_point(side, along, state.arena);
    let kind = pick_kind(state.waves.wave, state.roll());
    let id = spawn_enemy(state, kind, pos);
    state.waves.spawned += 1;
    log::debug!("Spawned {:?} #{} at ({:.0}, {:.0})", kind, id, pos.x, pos.y);
}

/// Advance the spawn timer; spawns are suspended during a boss or a break
pub fn update(state: &mut GameState, dt: f32) {
    if state.boss.is_some() || state.waves.in_break() {
        return;
    }
    state.waves.spawn_timer += dt;
    if state.waves.spawn_timer > state.waves.spawn_interval()
        && state.waves.spawned < state.waves.quota()
    {
        spawn_wave_enemy(state);
        state.waves.spawn_timer = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::PersistedProfile;
    use crate::settings::Settings;

    #[test]
    fn test_kind_table_wave_gates() {
        // Wave 1 only knows fast and normal
        assert_eq!(pick_kind(1, 0.01), EnemyKind::Fast);
        assert_eq!(pick_kind(1, 0.63), EnemyKind::Normal);
        assert_eq!(pick_kind(2, 0.01), EnemyKind::Tank);
        assert_eq!(pick_kind(2, 0.43), EnemyKind::Fast);
        assert_eq!(pick_kind(3, 0.02), EnemyKind::Miniboss);
        assert_eq!(pick_kind(3, 0.03), EnemyKind::Shooter);
        assert_eq!(pick_kind(3, 0.23), EnemyKind::Tank);
        assert_eq!(pick_kind(9, 0.99), EnemyKind::Normal);
    }

    #[test]
    fn test_edge_points_outside_arena() {
        let arena = Vec2::new(800.0, 600.0);
        assert_eq!(edge_point(0, 0.5, arena), Vec2::new(400.0, -20.0));
        assert_eq!(edge_point(1, 0.5, arena), Vec2::new(820.0, 300.0));
        assert_eq!(edge_point(2, 0.0, arena), Vec2::new(0.0, 620.0));
        assert_eq!(edge_point(3, 1.0, arena), Vec2::new(-20.0, 600.0));
    }

    #[test]
    fn test_spawn_respects_quota() {
        let mut s = GameState::new(
            1,
            Vec2::new(1280.0, 720.0),
            PersistedProfile::default(),
            &Settings::default(),
        );
        for _ in 0..10_000 {
            update(&mut s, 0.1);
        }
        assert_eq!(s.waves.spawned, 17);
        assert_eq!(s.enemies.len(), 17);
    }

    #[test]
    fn test_no_spawn_during_break() {
        let mut s = GameState::new(
            1,
            Vec2::new(1280.0, 720.0),
            PersistedProfile::default(),
            &Settings::default(),
        );
        s.waves.mode = crate::sim::wave::WaveMode::Break { remaining: 3.0 };
        for _ in 0..100 {
            update(&mut s, 0.1);
        }
        assert!(s.enemies.is_empty());
    }

    #[test]
    fn test_no_spawn_while_boss_alive() {
        let mut s = GameState::new(
            1,
            Vec2::new(1280.0, 720.0),
            PersistedProfile::default(),
            &Settings::default(),
        );
        crate::sim::wave::spawn_boss(&mut s, crate::sim::boss::BossTier::Boss, 5);
        let spawned = s.waves.spawned;
        for _ in 0..1_000 {
            update(&mut s, 0.1);
        }
        assert!(s.enemies.is_empty());
        assert_eq!(s.waves.spawned, spawned);
        assert_eq!(s.waves.spawn_timer, 0.0);
    }
}
