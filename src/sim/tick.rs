//! Per-frame simulation step
//!
//! Order within a frame: due boss bursts, player, combo timer, projectiles,
//! boss, enemies, particles, powerups, bullet hits, body contacts, wave
//! progression, spawning, game over.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::{advance_projectiles, circles_overlap, first_enemy_hit, pursue};
use super::combat;
use super::events::GameEvent;
use super::state::{EnemyKind, GamePhase, GameState};
use super::volley::{Aim, Volley};
use super::{autopilot, spawner, wave};
use crate::consts::*;

/// Input commands for a single tick
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TickInput {
    pub move_up: bool,
    pub move_down: bool,
    pub move_left: bool,
    pub move_right: bool,
    /// Pointer position in arena coordinates
    pub aim: Vec2,
    /// Fire held
    pub fire: bool,
    /// Dash requested this frame
    pub dash: bool,
    /// Pause toggle
    pub pause: bool,
    /// Idle/demo mode - the autopilot plays
    pub idle_mode: bool,
}

impl TickInput {
    /// Movement intent from the four direction flags (not normalized)
    pub fn intent(&self) -> Vec2 {
        let mut v = Vec2::ZERO;
        if self.move_left {
            v.x -= 1.0;
        }
        if self.move_right {
            v.x += 1.0;
        }
        if self.move_up {
            v.y -= 1.0;
        }
        if self.move_down {
            v.y += 1.0;
        }
        v
    }
}

/// Clamp a host-reported delta into [0, MAX_FRAME_DT]
pub fn clamp_dt(dt: f32) -> f32 {
    if dt.is_finite() && dt > 0.0 {
        dt.min(MAX_FRAME_DT)
    } else {
        0.0
    }
}

/// Advance the game state by one frame
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    // A pause toggle consumes the frame either way
    if input.pause {
        match state.phase {
            GamePhase::Playing => {
                state.phase = GamePhase::Paused;
                log::info!("Paused at wave {}", state.waves.wave);
                return;
            }
            GamePhase::Paused => {
                state.phase = GamePhase::Playing;
                log::info!("Resumed");
                return;
            }
            GamePhase::GameOver => {}
        }
    }

    if state.phase != GamePhase::Playing {
        return;
    }

    let dt = clamp_dt(dt);

    let mut input = input.clone();
    if input.idle_mode {
        autopilot::drive(state, &mut input);
    }
    let input = &input;

    state.elapsed += dt as f64;
    fire_due_volleys(state);

    update_player(state, input, dt);
    state.tick_combo(dt);

    advance_projectiles(&mut state.bullets, dt, state.arena);
    update_enemy_bullets(state, dt);

    update_boss(state, dt);
    update_enemies(state, dt);
    update_particles(state, dt);
    update_powerups(state, dt);

    resolve_bullet_hits(state);
    resolve_contacts(state);

    wave::update(state, dt);
    spawner::update(state, dt);

    if state.player.hp == 0 {
        game_over(state);
    }
}

/// Fire every deferred burst whose delay has elapsed, from the boss that
/// scheduled it. Bursts from a boss that is gone are dropped.
fn fire_due_volleys(state: &mut GameState) {
    let due = state.pending.take_due(state.elapsed);
    if due.is_empty() {
        return;
    }
    let target = state.player.pos;
    for pending in due {
        let Some(origin) = state
            .boss
            .as_ref()
            .filter(|b| b.id == pending.source)
            .map(|b| b.pos)
        else {
            continue;
        };
        let shots = pending.volley.fire(origin, target, &mut state.rng);
        state.enemy_bullets.extend(shots);
    }
}

fn update_player(state: &mut GameState, input: &TickInput, dt: f32) {
    let intent = input.intent();
    if input.dash && state.player.try_dash(intent, input.aim) {
        log::trace!("Dash");
    }
    state.player.step(intent, dt, state.arena);
    state.player.tick_timers(dt);

    if (input.fire || state.auto_shoot) && state.player.fire_cooldown <= 0.0 {
        state.player.fire_cooldown = state.player.fire_interval();
        let shots = state.player.fire(input.aim);
        state.bullets.extend(shots);
    }
}

/// Move enemy bullets; any that touch the player hit for a fixed amount
fn update_enemy_bullets(state: &mut GameState, dt: f32) {
    let player_pos = state.player.pos;
    let player_radius = state.player.radius;
    let mut hits = 0;
    for b in state.enemy_bullets.iter_mut() {
        b.pos += b.vel * dt;
    }
    state.enemy_bullets.retain(|b| {
        if circles_overlap(b.pos, b.radius, player_pos, player_radius) {
            hits += 1;
            false
        } else {
            !b.out_of_bounds(state.arena)
        }
    });
    for _ in 0..hits {
        state.damage_player(ENEMY_BULLET_DAMAGE);
    }
}

fn update_boss(state: &mut GameState, dt: f32) {
    let player = state.player.pos;
    let Some(boss) = state.boss.as_mut() else {
        return;
    };
    let actions = boss.update(dt, player, state.arena, state.elapsed, &mut state.rng);
    let (id, origin, tier) = (boss.id, boss.pos, boss.tier);

    if let Some(phase) = actions.phase_changed {
        log::info!("{} entered phase {}", tier.name(), phase);
        state.emit(GameEvent::BossPhaseChanged { tier, phase });
    }
    for (delay, volley) in actions.volleys {
        if delay <= 0.0 {
            let shots = volley.fire(origin, player, &mut state.rng);
            state.enemy_bullets.extend(shots);
        } else {
            state.pending.schedule(state.elapsed + delay as f64, id, volley);
        }
    }
    for (kind, pos) in actions.summons {
        spawner::spawn_enemy(state, kind, pos);
    }
}

/// Burst fired by enemies that shoot back
fn enemy_volley(kind: EnemyKind) -> Volley {
    match kind {
        EnemyKind::Miniboss => Volley::Fan {
            aim: Aim::AtPlayer,
            count: 3,
            first: -0.2,
            step: 0.2,
            speed: 320.0,
            radius: 6.0,
        },
        _ => Volley::aimed(320.0, 5.0),
    }
}

fn update_enemies(state: &mut GameState, dt: f32) {
    let target = state.player.pos;
    let mut shots = Vec::new();
    for enemy in state.enemies.iter_mut() {
        enemy.pos = pursue(enemy.pos, target, enemy.speed, dt);

        if let Some(interval) = enemy.kind.shoot_interval() {
            enemy.shoot_cooldown -= dt;
            if enemy.shoot_cooldown <= 0.0 {
                enemy.shoot_cooldown = interval;
                shots.extend(enemy_volley(enemy.kind).fire(enemy.pos, target, &mut state.rng));
            }
        }
    }
    state.enemy_bullets.extend(shots);
}

fn update_particles(state: &mut GameState, dt: f32) {
    for p in state.particles.iter_mut() {
        p.pos += p.vel * dt;
        p.vel.y += PARTICLE_GRAVITY * dt;
        p.life -= dt;
    }
    state.particles.retain(|p| p.life > 0.0);
}

/// Age powerups, collect the ones under the ship, expire the rest
fn update_powerups(state: &mut GameState, dt: f32) {
    let player_pos = state.player.pos;
    let player_radius = state.player.radius;
    let powerups = std::mem::take(&mut state.powerups);
    let mut kept = Vec::with_capacity(powerups.len());

    for mut p in powerups {
        p.life -= dt;
        if circles_overlap(p.pos, p.radius, player_pos, player_radius) {
            state.emit(GameEvent::PowerUpCollected { kind: p.kind });
            state.spawn_explosion(p.pos, p.kind.color(), 25);
            combat::apply_powerup(state, p.kind);
        } else if p.life > 0.0 {
            kept.push(p);
        }
    }

    // Anything dropped while applying effects (a nuked boss) goes after
    kept.append(&mut state.powerups);
    state.powerups = kept;
}

/// Player bullets against the boss first, then the first enemy they touch
fn resolve_bullet_hits(state: &mut GameState) {
    let bullets = std::mem::take(&mut state.bullets);
    let mut survivors = Vec::with_capacity(bullets.len());

    for bullet in bullets {
        let boss_hit = state
            .boss
            .as_ref()
            .is_some_and(|b| circles_overlap(bullet.pos, bullet.radius, b.pos, b.radius));
        if boss_hit {
            if !combat::damage_boss(state, 1) {
                state.spawn_explosion(bullet.pos, 0xffffff, 12);
            }
            continue;
        }

        if let Some(index) = first_enemy_hit(bullet.pos, bullet.radius, &state.enemies) {
            combat::hit_enemy(state, index, bullet.pos);
            continue;
        }

        survivors.push(bullet);
    }

    state.bullets = survivors;
}

/// Enemies ram the player and die; the boss hurts on touch and stays
fn resolve_contacts(state: &mut GameState) {
    let player_pos = state.player.pos;
    let player_radius = state.player.radius;

    let mut i = 0;
    while i < state.enemies.len() {
        let e = &state.enemies[i];
        if circles_overlap(e.pos, e.radius, player_pos, player_radius) {
            combat::contact_kill(state, i);
        } else {
            i += 1;
        }
    }

    let boss_touch = state
        .boss
        .as_ref()
        .is_some_and(|b| circles_overlap(b.pos, b.radius, player_pos, player_radius));
    if boss_touch {
        state.damage_player(BOSS_CONTACT_DAMAGE);
    }
}

fn game_over(state: &mut GameState) {
    state.phase = GamePhase::GameOver;
    log::info!(
        "Game over at wave {} with score {}",
        state.waves.wave,
        state.score
    );
    state.checkpoint();
    let final_score = state.score;
    let wave = state.waves.wave;
    state.emit(GameEvent::GameOver { final_score, wave });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::PersistedProfile;
    use crate::settings::Settings;
    use crate::sim::boss::{Boss, BossTier};
    use crate::sim::state::{Enemy, Projectile, PowerUpKind};

    fn state() -> GameState {
        GameState::new(
            42,
            Vec2::new(1280.0, 720.0),
            PersistedProfile::default(),
            &Settings::default(),
        )
    }

    #[test]
    fn test_clamp_dt() {
        assert_eq!(clamp_dt(0.016), 0.016);
        assert_eq!(clamp_dt(5.0), MAX_FRAME_DT);
        assert_eq!(clamp_dt(-1.0), 0.0);
        assert_eq!(clamp_dt(f32::NAN), 0.0);
        assert_eq!(clamp_dt(f32::INFINITY), 0.0);
    }

    #[test]
    fn test_huge_dt_applies_at_most_max() {
        let mut s = state();
        tick(&mut s, &TickInput::default(), 30.0);
        assert!((s.elapsed - MAX_FRAME_DT as f64).abs() < 1e-9);
    }

    #[test]
    fn test_pause_toggle_freezes() {
        let mut s = state();
        let pause = TickInput {
            pause: true,
            ..Default::default()
        };
        tick(&mut s, &pause, 0.016);
        assert_eq!(s.phase, GamePhase::Paused);
        for _ in 0..10 {
            tick(&mut s, &TickInput::default(), 0.1);
        }
        assert_eq!(s.elapsed, 0.0);
        tick(&mut s, &pause, 0.016);
        assert_eq!(s.phase, GamePhase::Playing);
        assert_eq!(s.elapsed, 0.0);
    }

    #[test]
    fn test_fire_respects_cooldown() {
        let mut s = state();
        let input = TickInput {
            fire: true,
            aim: Vec2::new(1000.0, 360.0),
            ..Default::default()
        };
        tick(&mut s, &input, 0.016);
        assert_eq!(s.bullets.len(), 1);
        tick(&mut s, &input, 0.016);
        assert_eq!(s.bullets.len(), 1);
    }

    #[test]
    fn test_auto_shoot_fires_without_button() {
        let mut s = state();
        s.auto_shoot = true;
        tick(&mut s, &TickInput::default(), 0.016);
        assert_eq!(s.bullets.len(), 1);
    }

    #[test]
    fn test_enemy_bullet_hits_player() {
        let mut s = state();
        let pos = s.player.pos;
        s.enemy_bullets.push(Projectile::new(pos, Vec2::ZERO, 5.0));
        tick(&mut s, &TickInput::default(), 0.016);
        assert_eq!(s.player.hp, 95);
        assert!(s.enemy_bullets.is_empty());
    }

    #[test]
    fn test_bullet_hits_boss_before_enemy() {
        let mut s = state();
        let spot = Vec2::new(200.0, 200.0);
        s.boss = Some(Boss::new(50, BossTier::Boss, spot, 5));
        s.enemies.push(Enemy::new(51, EnemyKind::Tank, spot));
        s.bullets.push(Projectile::new(spot, Vec2::ZERO, 5.0));
        resolve_bullet_hits(&mut s);
        assert_eq!(s.boss.as_ref().map(|b| b.hp), Some(184));
        assert_eq!(s.enemies[0].hp, 3);
        assert!(s.bullets.is_empty());
    }

    #[test]
    fn test_hit_sparks_spawn_at_impact_point() {
        let mut s = state();
        let impact = Vec2::new(230.0, 200.0);
        s.boss = Some(Boss::new(50, BossTier::Boss, Vec2::new(200.0, 200.0), 5));
        s.bullets.push(Projectile::new(impact, Vec2::ZERO, 5.0));
        resolve_bullet_hits(&mut s);
        assert_eq!(s.particles.len(), 12);
        assert!(s.particles.iter().all(|p| p.pos == impact));

        s.boss = None;
        s.particles.clear();
        let impact = Vec2::new(515.0, 500.0);
        s.enemies.push(Enemy::new(51, EnemyKind::Tank, Vec2::new(500.0, 500.0)));
        s.bullets.push(Projectile::new(impact, Vec2::ZERO, 5.0));
        resolve_bullet_hits(&mut s);
        assert_eq!(s.enemies[0].hp, 2);
        assert!(!s.particles.is_empty());
        assert!(s.particles.iter().all(|p| p.pos == impact));
    }

    #[test]
    fn test_normal_enemy_contact_through_tick() {
        let mut s = state();
        let pos = s.player.pos;
        s.enemies.push(Enemy::new(60, EnemyKind::Normal, pos));
        tick(&mut s, &TickInput::default(), 0.016);
        assert_eq!(s.player.hp, 90);
        assert!(s.enemies.is_empty());
        assert_eq!(s.waves.killed, 1);
        assert_eq!(s.coins, 2);
        assert_eq!(s.score, 0);
    }

    #[test]
    fn test_boss_contact_damage_and_boss_stays() {
        let mut s = state();
        let pos = s.player.pos;
        s.boss = Some(Boss::new(50, BossTier::Boss, pos, 5));
        resolve_contacts(&mut s);
        assert_eq!(s.player.hp, 75);
        assert!(s.boss.is_some());
    }

    #[test]
    fn test_deferred_burst_dropped_when_boss_gone() {
        let mut s = state();
        s.pending.schedule(0.01, 77, Volley::aimed(100.0, 5.0));
        tick(&mut s, &TickInput::default(), 0.016);
        assert!(s.pending.is_empty());
        assert!(s.enemy_bullets.is_empty());
    }

    #[test]
    fn test_deferred_burst_fires_from_current_boss_position() {
        let mut s = state();
        let spot = Vec2::new(300.0, 150.0);
        s.boss = Some(Boss::new(77, BossTier::Boss, spot, 5));
        // Let the opening ring go out, then look only at the deferred burst
        tick(&mut s, &TickInput::default(), 0.016);
        s.enemy_bullets.clear();
        let due = s.elapsed + 0.01;
        s.pending.schedule(due, 77, Volley::aimed(100.0, 5.0));
        tick(&mut s, &TickInput::default(), 0.016);
        assert_eq!(s.enemy_bullets.len(), 1);
        assert!(s.pending.is_empty());
    }

    #[test]
    fn test_powerup_expires() {
        let mut s = state();
        combat::spawn_powerup(&mut s, PowerUpKind::Health, Vec2::new(10.0, 10.0));
        for _ in 0..130 {
            update_powerups(&mut s, 0.1);
        }
        assert!(s.powerups.is_empty());
    }

    #[test]
    fn test_game_over_checkpoint() {
        let mut s = state();
        s.score = 500;
        s.player.hp = 0;
        tick(&mut s, &TickInput::default(), 0.016);
        assert_eq!(s.phase, GamePhase::GameOver);
        assert_eq!(s.high_score, 500);
        let events = s.drain_events();
        assert!(events
            .iter()
            .any(|e| matches!(e, GameEvent::GameOver { final_score: 500, wave: 1 })));
        assert!(events.iter().any(|e| matches!(e, GameEvent::Checkpoint { .. })));
        // Nothing moves after game over
        let t = s.elapsed;
        tick(&mut s, &TickInput::default(), 0.016);
        assert_eq!(s.elapsed, t);
    }

    use proptest::prelude::*;

    proptest! {
        #[test]
        fn prop_dt_always_clamped(dt in proptest::num::f32::ANY) {
            let dt = clamp_dt(dt);
            prop_assert!((0.0..=MAX_FRAME_DT).contains(&dt));
        }

        #[test]
        fn prop_hp_stays_in_range(
            hits in proptest::collection::vec(0u32..200, 0..20),
            heals in proptest::collection::vec(0u32..200, 0..20),
            level in -5i64..10,
        ) {
            let mut s = state();
            s.player.set_max_hp_level(level);
            for (i, amount) in hits.iter().enumerate() {
                s.damage_player(*amount);
                if let Some(h) = heals.get(i) {
                    s.player.heal(*h);
                }
                prop_assert!(s.player.hp <= s.player.max_hp);
            }
            prop_assert!((1..=3).contains(&s.player.max_hp_level));
        }
    }
}
