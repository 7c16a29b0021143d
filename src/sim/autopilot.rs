//! Idle/demo mode: the simulation plays itself
//!
//! Aims at the nearest threat and keeps firing, steers away from nearby
//! enemies, bullets and the boss, and goes for powerups when nothing is
//! close. Dashes when something is about to touch the ship.

use glam::Vec2;

use super::state::GameState;
use super::tick::TickInput;

/// Enemies closer than this push the ship away
const AVOID_RADIUS: f32 = 180.0;
/// Enemy bullets closer than this push the ship away
const BULLET_AVOID_RADIUS: f32 = 110.0;
/// Extra distance kept from the boss hull
const BOSS_AVOID_RADIUS: f32 = 220.0;
/// Ignore steering below this strength
const DEADZONE: f32 = 0.2;

/// Overwrite `input` with autopilot decisions for this frame
pub fn drive(state: &GameState, input: &mut TickInput) {
    let me = state.player.pos;

    // Nearest thing worth shooting
    let boss_target = state.boss.as_ref().map(|b| (b.pos, me.distance(b.pos) - b.radius));
    let enemy_target = state
        .enemies
        .iter()
        .map(|e| (e.pos, me.distance(e.pos) - e.radius))
        .min_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal));
    let target = match (enemy_target, boss_target) {
        (Some(e), Some(b)) => Some(if e.1 < b.1 { e } else { b }),
        (e, b) => e.or(b),
    };
    if let Some((pos, _)) = target {
        input.aim = pos;
        input.fire = true;
    } else {
        input.fire = false;
    }

    let mut push = Vec2::ZERO;
    let mut danger = false;
    for e in &state.enemies {
        let away = me - e.pos;
        let dist = away.length();
        if dist < AVOID_RADIUS {
            push += crate::direction_or(away, Vec2::Y) * (1.0 - dist / AVOID_RADIUS);
        }
        if dist < e.radius + state.player.radius + 25.0 {
            danger = true;
        }
    }
    for b in &state.enemy_bullets {
        let away = me - b.pos;
        let dist = away.length();
        if dist < BULLET_AVOID_RADIUS {
            push += crate::direction_or(away, Vec2::X) * (1.0 - dist / BULLET_AVOID_RADIUS) * 0.6;
        }
        if dist < b.radius + state.player.radius + 12.0 {
            danger = true;
        }
    }
    if let Some(boss) = &state.boss {
        let away = me - boss.pos;
        let reach = boss.radius + BOSS_AVOID_RADIUS;
        let dist = away.length();
        if dist < reach {
            push += crate::direction_or(away, Vec2::Y) * (1.0 - dist / reach) * 1.5;
        }
        if dist < boss.radius + state.player.radius + 30.0 {
            danger = true;
        }
    }

    // Walls count as threats too, so the ship does not get pinned
    let center = state.arena / 2.0;
    let to_center = center - me;
    let edge = (to_center.abs() / center.max(Vec2::ONE)).max_element();
    if edge > 0.7 {
        push += crate::direction_or(to_center, Vec2::ZERO) * (edge - 0.7);
    }

    let mut steer = push;
    if push.length() < DEADZONE {
        let pickup = state
            .powerups
            .iter()
            .min_by(|a, b| {
                me.distance(a.pos)
                    .partial_cmp(&me.distance(b.pos))
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
            .map(|p| p.pos);
        steer = match pickup {
            Some(pos) => pos - me,
            None => to_center * 0.01,
        };
    }

    input.move_left = steer.x < -DEADZONE;
    input.move_right = steer.x > DEADZONE;
    input.move_up = steer.y < -DEADZONE;
    input.move_down = steer.y > DEADZONE;
    input.dash = danger && state.player.dash_cooldown <= 0.0;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::PersistedProfile;
    use crate::settings::Settings;
    use crate::sim::state::{Enemy, EnemyKind};

    fn state() -> GameState {
        GameState::new(
            5,
            Vec2::new(1280.0, 720.0),
            PersistedProfile::default(),
            &Settings::default(),
        )
    }

    #[test]
    fn test_aims_at_nearest_enemy_and_fires() {
        let mut s = state();
        let me = s.player.pos;
        s.enemies.push(Enemy::new(1, EnemyKind::Normal, me + Vec2::new(400.0, 0.0)));
        s.enemies.push(Enemy::new(2, EnemyKind::Normal, me + Vec2::new(0.0, 300.0)));
        let mut input = TickInput::default();
        drive(&s, &mut input);
        assert!(input.fire);
        assert_eq!(input.aim, me + Vec2::new(0.0, 300.0));
    }

    #[test]
    fn test_backs_away_and_dashes_on_contact() {
        let mut s = state();
        let me = s.player.pos;
        s.enemies.push(Enemy::new(1, EnemyKind::Tank, me + Vec2::new(30.0, 0.0)));
        let mut input = TickInput::default();
        drive(&s, &mut input);
        assert!(input.move_left);
        assert!(!input.move_right);
        assert!(input.dash);
    }

    #[test]
    fn test_idle_without_threats() {
        let s = state();
        let mut input = TickInput::default();
        drive(&s, &mut input);
        assert!(!input.fire);
        assert!(!input.dash);
        assert_eq!(input.intent(), Vec2::ZERO);
    }
}
