//! Combat resolution: hits, deaths, rewards and powerups

use glam::Vec2;

use super::events::GameEvent;
use super::state::{GameState, PowerUp, PowerUpKind};
use crate::consts::*;

/// Damage one enemy by a single player bullet landing at `impact`.
/// Returns true if it died.
pub fn hit_enemy(state: &mut GameState, index: usize, impact: Vec2) -> bool {
    let Some(enemy) = state.enemies.get_mut(index) else {
        return false;
    };
    enemy.hp = enemy.hp.saturating_sub(1);
    if enemy.hp == 0 {
        kill_enemy(state, index);
        true
    } else {
        state.spawn_explosion(impact, 0xffffff, 12);
        false
    }
}

/// Remove a shot-down enemy and pay out: combo-scaled score, coins, combo
/// step and a drop roll.
pub fn kill_enemy(state: &mut GameState, index: usize) {
    if index >= state.enemies.len() {
        return;
    }
    let enemy = state.enemies.remove(index);
    let points = state.combo_points(enemy.score);
    state.score += points;
    state.add_coins(enemy.coin_value);
    state.add_combo();
    state.waves.record_kill();
    state.total_kills += 1;
    state.spawn_explosion(enemy.pos, enemy.kind.color(), 25);
    state.emit(GameEvent::EnemyKilled {
        kind: enemy.kind,
        pos: enemy.pos,
        points,
        coins: enemy.coin_value,
    });

    if state.roll() < enemy.kind.drop_chance() {
        drop_powerup(state, enemy.pos);
    }
}

/// An enemy rammed the player: damage, combo reset, and the enemy is gone.
/// Contact kills still count toward the quota and pay coins, not score.
pub fn contact_kill(state: &mut GameState, index: usize) {
    if index >= state.enemies.len() {
        return;
    }
    let enemy = state.enemies.remove(index);
    state.damage_player(enemy.kind.contact_damage());
    state.spawn_explosion(enemy.pos, enemy.kind.color(), 18);
    state.waves.record_kill();
    state.total_kills += 1;
    state.add_coins(enemy.coin_value);
    state.emit(GameEvent::EnemyKilled {
        kind: enemy.kind,
        pos: enemy.pos,
        points: 0,
        coins: enemy.coin_value,
    });
}

/// Damage the boss by `amount`; it dies through `kill_boss` at zero HP.
/// Returns true if the boss died. No-op without a boss.
pub fn damage_boss(state: &mut GameState, amount: u32) -> bool {
    let Some(boss) = state.boss.as_mut() else {
        return false;
    };
    boss.damage(amount);
    if boss.is_dead() {
        kill_boss(state);
        true
    } else {
        false
    }
}

/// Pay the boss reward table, scatter its powerups and clear the slot
pub fn kill_boss(state: &mut GameState) {
    let Some(boss) = state.boss.take() else {
        return;
    };
    let points = boss.points();
    let coins = boss.coins();
    state.score += points;
    state.add_coins(coins);
    state.pending.cancel_source(boss.id);
    state.spawn_explosion(boss.pos, boss.tier.color(), boss.tier.explosion_size());

    let radius = boss.tier.scatter_radius();
    for _ in 0..boss.tier.powerup_count() {
        // Uniform over the disk
        let r = radius * state.roll().sqrt();
        let angle = state.roll() * std::f32::consts::TAU;
        drop_powerup(state, boss.pos + crate::unit_from_angle(angle) * r);
    }

    log::info!(
        "{} destroyed: +{} points, +{} coins",
        boss.tier.name(),
        points,
        coins
    );
    state.emit(GameEvent::BossKilled {
        tier: boss.tier,
        points,
        coins,
    });
}

/// Pick a powerup type for the current player and wave
pub fn roll_powerup_kind(state: &mut GameState) -> PowerUpKind {
    let mut pool = vec![
        PowerUpKind::Health,
        PowerUpKind::RapidFire,
        PowerUpKind::Speed,
        PowerUpKind::Shield,
    ];
    let upgrades = [
        (PowerUpKind::Weapon, state.player.weapon_level),
        (PowerUpKind::MaxHp, state.player.max_hp_level),
        (PowerUpKind::SpeedUp, state.player.speed_level),
    ];
    for (kind, level) in upgrades {
        if state.roll() < 0.12 && level < MAX_UPGRADE_LEVEL {
            pool.push(kind);
        }
    }
    if state.roll() < 0.08 && state.waves.wave >= 2 {
        pool.push(PowerUpKind::Nuke);
    }
    let idx = ((state.roll() * pool.len() as f32) as usize).min(pool.len() - 1);
    pool[idx]
}

/// Drop a rolled powerup at `pos`
pub fn drop_powerup(state: &mut GameState, pos: Vec2) {
    let kind = roll_powerup_kind(state);
    spawn_powerup(state, kind, pos);
}

pub fn spawn_powerup(state: &mut GameState, kind: PowerUpKind, pos: Vec2) {
    let id = state.next_entity_id();
    state.powerups.push(PowerUp {
        id,
        kind,
        pos,
        radius: POWERUP_RADIUS,
        life: POWERUP_LIFETIME,
    });
}

/// Apply a collected powerup to the player or the arena
pub fn apply_powerup(state: &mut GameState, kind: PowerUpKind) {
    let player = &mut state.player;
    match kind {
        PowerUpKind::Health => player.heal(HEALTH_PICKUP_HEAL),
        PowerUpKind::RapidFire => player.rapid_fire = RAPID_FIRE_DURATION,
        PowerUpKind::Speed => player.speed_boost = SPEED_BOOST_DURATION,
        PowerUpKind::Shield => player.shield = SHIELD_DURATION,
        PowerUpKind::Weapon => {
            if player.weapon_level < MAX_UPGRADE_LEVEL {
                player.weapon_level += 1;
                state.score += UPGRADE_PICKUP_SCORE;
            }
        }
        PowerUpKind::MaxHp => {
            if player.max_hp_level < MAX_UPGRADE_LEVEL {
                player.set_max_hp_level(player.max_hp_level as i64 + 1);
                player.heal(MAX_HP_PICKUP_HEAL);
                state.score += UPGRADE_PICKUP_SCORE;
            }
        }
        PowerUpKind::SpeedUp => {
            if player.speed_level < MAX_UPGRADE_LEVEL {
                player.speed_level += 1;
                state.score += UPGRADE_PICKUP_SCORE;
            }
        }
        PowerUpKind::Nuke => nuke(state),
    }
}

/// Kill every enemy on screen and take a flat chunk out of the boss
pub fn nuke(state: &mut GameState) {
    let enemies = std::mem::take(&mut state.enemies);
    let count = enemies.len();
    for enemy in enemies {
        let points = state.combo_points(enemy.score);
        state.score += points;
        state.add_coins(enemy.coin_value);
        state.waves.record_kill();
        state.total_kills += 1;
        state.spawn_explosion(enemy.pos, enemy.kind.color(), 20);
        state.emit(GameEvent::EnemyKilled {
            kind: enemy.kind,
            pos: enemy.pos,
            points,
            coins: enemy.coin_value,
        });
    }

    if let Some(pos) = state.boss.as_ref().map(|b| b.pos) {
        state.spawn_explosion(pos, 0xffffff, 40);
        damage_boss(state, NUKE_BOSS_DAMAGE);
    }
    log::debug!("Nuke cleared {} enemies", count);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::PersistedProfile;
    use crate::settings::Settings;
    use crate::sim::boss::{Boss, BossTier};
    use crate::sim::state::{Enemy, EnemyKind};

    fn state() -> GameState {
        GameState::new(
            11,
            Vec2::new(1280.0, 720.0),
            PersistedProfile::default(),
            &Settings::default(),
        )
    }

    fn add_enemy(s: &mut GameState, kind: EnemyKind, pos: Vec2) {
        let id = s.next_entity_id();
        s.enemies.push(Enemy::new(id, kind, pos));
    }

    #[test]
    fn test_tank_survives_two_hits() {
        let mut s = state();
        let at = Vec2::new(100.0, 100.0);
        add_enemy(&mut s, EnemyKind::Tank, at);
        assert!(!hit_enemy(&mut s, 0, at));
        assert!(!hit_enemy(&mut s, 0, at));
        assert_eq!(s.score, 0);
        assert!(hit_enemy(&mut s, 0, at));
        assert_eq!(s.score, 30);
        assert_eq!(s.coins, 6);
        assert_eq!(s.combo, 1);
        assert!(s.enemies.is_empty());
    }

    #[test]
    fn test_kill_scales_with_combo() {
        let mut s = state();
        s.combo = 5;
        add_enemy(&mut s, EnemyKind::Fast, Vec2::ZERO);
        kill_enemy(&mut s, 0);
        // 15 * 1.5
        assert_eq!(s.score, 22);
        assert_eq!(s.combo, 6);
        assert_eq!(s.combo_timer, COMBO_WINDOW);
    }

    #[test]
    fn test_contact_kill_pays_coins_not_score() {
        let mut s = state();
        s.combo = 4;
        let at = s.player.pos;
        add_enemy(&mut s, EnemyKind::Miniboss, at);
        contact_kill(&mut s, 0);
        assert_eq!(s.player.hp, 85);
        assert_eq!(s.score, 0);
        assert_eq!(s.coins, 20);
        assert_eq!(s.combo, 0);
        assert_eq!(s.waves.killed, 1);
    }

    #[test]
    fn test_powerup_roll_respects_gates() {
        let mut s = state();
        s.player.weapon_level = 3;
        s.player.max_hp_level = 3;
        s.player.speed_level = 3;
        for _ in 0..500 {
            let kind = roll_powerup_kind(&mut s);
            assert!(!matches!(
                kind,
                PowerUpKind::Weapon | PowerUpKind::MaxHp | PowerUpKind::SpeedUp | PowerUpKind::Nuke
            ));
        }
    }

    #[test]
    fn test_weapon_pickup_caps_at_three() {
        let mut s = state();
        for _ in 0..4 {
            apply_powerup(&mut s, PowerUpKind::Weapon);
        }
        assert_eq!(s.player.weapon_level, 3);
        assert_eq!(s.score, 300);
    }

    #[test]
    fn test_health_pickup_is_capped() {
        let mut s = state();
        s.player.hp = 90;
        apply_powerup(&mut s, PowerUpKind::Health);
        assert_eq!(s.player.hp, 100);
    }

    #[test]
    fn test_boss_kill_scatters_powerups() {
        let mut s = state();
        let center = Vec2::new(640.0, 300.0);
        s.boss = Some(Boss::new(99, BossTier::MegaBoss, center, 10));
        if let Some(b) = s.boss.as_mut() {
            b.hp = 1;
        }
        assert!(damage_boss(&mut s, 1));
        assert!(s.boss.is_none());
        assert_eq!(s.score, 4000);
        assert_eq!(s.coins, 350);
        assert_eq!(s.powerups.len(), 8);
        for p in &s.powerups {
            assert!(p.pos.distance(center) <= 140.0 + 1e-3);
        }
    }

    #[test]
    fn test_damage_boss_without_boss_is_noop() {
        let mut s = state();
        assert!(!damage_boss(&mut s, 30));
        nuke(&mut s);
        assert_eq!(s.score, 0);
    }
}
