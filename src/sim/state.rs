//! Game state and core simulation types
//!
//! Everything the per-frame step mutates lives in `GameState`.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::boss::Boss;
use super::events::GameEvent;
use super::volley::VolleyQueue;
use super::wave::WaveController;
use crate::consts::*;
use crate::persistence::{PersistedProfile, UpgradeLevels, clamp_level};
use crate::settings::Settings;
use crate::{direction_or, unit_from_angle};

/// Current phase of the run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GamePhase {
    /// Active gameplay
    Playing,
    /// Frozen until the pause toggle fires again
    Paused,
    /// Player HP hit zero
    GameOver,
}

/// What happened when the player was hit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DamageOutcome {
    /// Dashing (or god mode): nothing happened
    Evaded,
    /// Shield ate the hit and dropped
    Absorbed,
    /// HP was reduced by this much
    Applied(u32),
}

/// Max HP for a max-HP upgrade level
pub fn max_hp_for_level(level: u8) -> u32 {
    let level = clamp_level(level as i64) as u32;
    PLAYER_BASE_MAX_HP + MAX_HP_PER_LEVEL * (level - 1)
}

/// A straight-flying bullet (player or enemy)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Projectile {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
}

impl Projectile {
    pub fn new(pos: Vec2, vel: Vec2, radius: f32) -> Self {
        Self { pos, vel, radius }
    }

    /// True once the bullet left the arena plus the culling margin
    pub fn out_of_bounds(&self, arena: Vec2) -> bool {
        self.pos.x < -BOUNDS_MARGIN
            || self.pos.x > arena.x + BOUNDS_MARGIN
            || self.pos.y < -BOUNDS_MARGIN
            || self.pos.y > arena.y + BOUNDS_MARGIN
    }
}

/// The player's ship
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub pos: Vec2,
    pub radius: f32,
    pub base_speed: f32,
    pub hp: u32,
    pub max_hp: u32,
    /// Weapon tier, also the persisted weapon upgrade (1-3)
    pub weapon_level: u8,
    pub max_hp_level: u8,
    pub speed_level: u8,
    /// Buff countdowns in seconds (<= 0 means inactive)
    pub rapid_fire: f32,
    pub speed_boost: f32,
    pub shield: f32,
    pub dash_cooldown: f32,
    pub dash_duration: f32,
    pub dash_dir: Vec2,
    pub fire_cooldown: f32,
}

impl Player {
    pub fn new(pos: Vec2, upgrades: UpgradeLevels) -> Self {
        let upgrades = upgrades.sanitized();
        let max_hp = max_hp_for_level(upgrades.max_hp);
        Self {
            pos,
            radius: PLAYER_RADIUS,
            base_speed: PLAYER_BASE_SPEED,
            hp: max_hp,
            max_hp,
            weapon_level: upgrades.weapon,
            max_hp_level: upgrades.max_hp,
            speed_level: upgrades.speed,
            rapid_fire: 0.0,
            speed_boost: 0.0,
            shield: 0.0,
            dash_cooldown: 0.0,
            dash_duration: 0.0,
            dash_dir: Vec2::ZERO,
            fire_cooldown: 0.0,
        }
    }

    pub fn upgrades(&self) -> UpgradeLevels {
        UpgradeLevels {
            max_hp: self.max_hp_level,
            speed: self.speed_level,
            weapon: self.weapon_level,
        }
    }

    pub fn is_dashing(&self) -> bool {
        self.dash_duration > 0.0
    }

    pub fn has_shield(&self) -> bool {
        self.shield > 0.0
    }

    /// Movement speed before the dash multiplier
    pub fn move_speed(&self) -> f32 {
        let permanent = 1.0 + (self.speed_level.saturating_sub(1)) as f32 * SPEED_PER_LEVEL;
        let boost = if self.speed_boost > 0.0 {
            SPEED_BOOST_MULTIPLIER
        } else {
            1.0
        };
        self.base_speed * permanent * boost
    }

    pub fn fire_interval(&self) -> f32 {
        if self.rapid_fire > 0.0 {
            RAPID_FIRE_INTERVAL
        } else {
            FIRE_INTERVAL
        }
    }

    /// Apply a hit. Dash makes the player untouchable; a shield eats one hit.
    pub fn take_damage(&mut self, amount: u32) -> DamageOutcome {
        if self.is_dashing() {
            return DamageOutcome::Evaded;
        }
        if self.has_shield() {
            self.shield = 0.0;
            return DamageOutcome::Absorbed;
        }
        let before = self.hp;
        self.hp = self.hp.saturating_sub(amount);
        DamageOutcome::Applied(before - self.hp)
    }

    pub fn heal(&mut self, amount: u32) {
        self.hp = self.hp.saturating_add(amount).min(self.max_hp);
    }

    /// Set HP from an untrusted value, clamped to [0, max_hp]
    pub fn set_hp(&mut self, hp: i64) {
        self.hp = hp.clamp(0, self.max_hp as i64) as u32;
    }

    /// Change the max-HP level and re-derive max HP, capping current HP
    pub fn set_max_hp_level(&mut self, level: i64) {
        self.max_hp_level = clamp_level(level);
        self.max_hp = max_hp_for_level(self.max_hp_level);
        self.hp = self.hp.min(self.max_hp);
    }

    /// Count down buffs and cooldowns
    pub fn tick_timers(&mut self, dt: f32) {
        self.fire_cooldown -= dt;
        self.rapid_fire = (self.rapid_fire - dt).max(0.0);
        self.speed_boost = (self.speed_boost - dt).max(0.0);
        self.shield = (self.shield - dt).max(0.0);
        self.dash_cooldown = (self.dash_cooldown - dt).max(0.0);
    }

    /// Start a dash if it is off cooldown. Returns whether a dash began.
    ///
    /// Direction is the movement intent, else the aim direction, else +X.
    pub fn try_dash(&mut self, intent: Vec2, aim: Vec2) -> bool {
        if self.dash_cooldown > 0.0 || self.dash_duration > 0.0 {
            return false;
        }
        let aim_dir = direction_or(aim - self.pos, Vec2::X);
        self.dash_dir = direction_or(intent, aim_dir);
        self.dash_duration = DASH_DURATION;
        self.dash_cooldown = DASH_COOLDOWN;
        true
    }

    /// Integrate movement for one frame and keep the ship inside the arena
    pub fn step(&mut self, intent: Vec2, dt: f32, arena: Vec2) {
        let mut speed = self.move_speed();
        let mut dir = intent.normalize_or_zero();
        if self.dash_duration > 0.0 {
            self.dash_duration -= dt;
            speed *= DASH_SPEED_MULTIPLIER;
            dir = self.dash_dir;
        }
        self.pos += dir * speed * dt;
        self.pos = crate::clamp_to_arena(self.pos, arena, PLAYER_EDGE_MARGIN);
    }

    /// Bullets for one trigger pull toward `aim`, fanned by weapon tier
    pub fn fire(&self, aim: Vec2) -> Vec<Projectile> {
        let angle = crate::angle_to(self.pos, aim);
        let offsets: &[f32] = match self.weapon_level {
            0 | 1 => &[0.0],
            2 => &[-0.12, 0.12],
            _ => &[0.0, -0.18, 0.18],
        };
        offsets
            .iter()
            .map(|offset| {
                Projectile::new(
                    self.pos,
                    unit_from_angle(angle + offset) * PLAYER_BULLET_SPEED,
                    PLAYER_BULLET_RADIUS,
                )
            })
            .collect()
    }
}

/// Enemy types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnemyKind {
    Normal,
    Fast,
    Tank,
    Shooter,
    Miniboss,
}

/// Fixed stat preset for an enemy type
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnemyStats {
    pub radius: f32,
    pub speed: f32,
    pub hp: u32,
    pub score: u64,
    pub coins: u64,
}

impl EnemyKind {
    pub const ALL: [EnemyKind; 5] = [
        EnemyKind::Normal,
        EnemyKind::Fast,
        EnemyKind::Tank,
        EnemyKind::Shooter,
        EnemyKind::Miniboss,
    ];

    pub const fn stats(self) -> EnemyStats {
        let (radius, speed, hp, score, coins) = match self {
            EnemyKind::Normal => (14.0, 105.0, 1, 10, 2),
            EnemyKind::Fast => (10.0, 190.0, 1, 15, 3),
            EnemyKind::Tank => (20.0, 65.0, 3, 30, 6),
            EnemyKind::Shooter => (12.0, 85.0, 2, 25, 5),
            EnemyKind::Miniboss => (25.0, 50.0, 8, 100, 20),
        };
        EnemyStats {
            radius,
            speed,
            hp,
            score,
            coins,
        }
    }

    /// RGB color handed to particles
    pub fn color(self) -> u32 {
        match self {
            EnemyKind::Normal => 0xff7b6b,
            EnemyKind::Fast => 0xff9ff3,
            EnemyKind::Tank => 0xff6b6b,
            EnemyKind::Shooter => 0xffd93d,
            EnemyKind::Miniboss => 0xb86bff,
        }
    }

    pub fn contact_damage(self) -> u32 {
        match self {
            EnemyKind::Miniboss => MINIBOSS_CONTACT_DAMAGE,
            _ => CONTACT_DAMAGE,
        }
    }

    /// Seconds between shots for enemies that shoot back
    pub fn shoot_interval(self) -> Option<f32> {
        match self {
            EnemyKind::Shooter => Some(2.5),
            EnemyKind::Miniboss => Some(1.5),
            _ => None,
        }
    }

    /// Chance to drop a powerup on death
    pub fn drop_chance(self) -> f32 {
        match self {
            EnemyKind::Miniboss => 0.4,
            _ => 0.2,
        }
    }
}

/// A regular enemy
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    pub id: u32,
    pub kind: EnemyKind,
    pub pos: Vec2,
    pub radius: f32,
    pub speed: f32,
    pub hp: u32,
    pub max_hp: u32,
    pub score: u64,
    pub coin_value: u64,
    /// Only meaningful for shooters and minibosses
    pub shoot_cooldown: f32,
}

impl Enemy {
    pub fn new(id: u32, kind: EnemyKind, pos: Vec2) -> Self {
        let stats = kind.stats();
        Self {
            id,
            kind,
            pos,
            radius: stats.radius,
            speed: stats.speed,
            hp: stats.hp,
            max_hp: stats.hp,
            score: stats.score,
            coin_value: stats.coins,
            shoot_cooldown: 0.0,
        }
    }
}

/// A cosmetic particle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub color: u32,
    pub life: f32,
    pub max_life: f32,
    pub radius: f32,
}

/// Power-up types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PowerUpKind {
    Health,
    RapidFire,
    Speed,
    Shield,
    Weapon,
    MaxHp,
    SpeedUp,
    Nuke,
}

impl PowerUpKind {
    pub fn color(self) -> u32 {
        match self {
            PowerUpKind::Health => 0x6bff7b,
            PowerUpKind::RapidFire => 0xffd93d,
            PowerUpKind::Speed => 0x9be7ff,
            PowerUpKind::Shield => 0xb693ff,
            PowerUpKind::Weapon => 0xffd700,
            PowerUpKind::MaxHp => 0xff69b4,
            PowerUpKind::SpeedUp => 0x00ffff,
            PowerUpKind::Nuke => 0xff6b35,
        }
    }
}

/// A pickup lying in the arena
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PowerUp {
    pub id: u32,
    pub kind: PowerUpKind,
    pub pos: Vec2,
    pub radius: f32,
    /// Seconds until it expires unclaimed
    pub life: f32,
}

/// Complete game state for one run
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub rng: Pcg32,
    /// Arena size in pixels
    pub arena: Vec2,
    /// Simulated seconds since the run started
    pub elapsed: f64,
    pub phase: GamePhase,
    pub score: u64,
    pub high_score: u64,
    pub coins: u64,
    pub combo: u32,
    /// Seconds left before the combo resets
    pub combo_timer: f32,
    pub total_kills: u32,
    pub player: Player,
    pub bullets: Vec<Projectile>,
    pub enemy_bullets: Vec<Projectile>,
    pub enemies: Vec<Enemy>,
    /// At most one boss at a time
    pub boss: Option<Boss>,
    pub powerups: Vec<PowerUp>,
    /// Visual particles (not gameplay-affecting)
    pub particles: Vec<Particle>,
    pub max_particles: usize,
    pub waves: WaveController,
    /// Staggered boss bursts waiting for their delay to elapse
    pub pending: VolleyQueue,
    /// Events produced since the host last drained them
    pub events: Vec<GameEvent>,
    pub auto_shoot: bool,
    /// Dev override: the player takes no damage
    pub god_mode: bool,
    /// Next entity ID
    next_id: u32,
}

impl GameState {
    /// Start a run with the given seed, arena and persisted profile
    pub fn new(seed: u64, arena: Vec2, profile: PersistedProfile, settings: &Settings) -> Self {
        let profile = profile.sanitized();
        let arena = Vec2::new(arena.x.max(1.0), arena.y.max(1.0));
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            arena,
            elapsed: 0.0,
            phase: GamePhase::Playing,
            score: 0,
            high_score: profile.high_score,
            coins: profile.coins,
            combo: 0,
            combo_timer: 0.0,
            total_kills: 0,
            player: Player::new(arena / 2.0, profile.upgrades),
            bullets: Vec::new(),
            enemy_bullets: Vec::new(),
            enemies: Vec::new(),
            boss: None,
            powerups: Vec::new(),
            particles: Vec::new(),
            max_particles: settings.max_particles(),
            waves: WaveController::new(),
            pending: VolleyQueue::default(),
            events: Vec::new(),
            auto_shoot: settings.auto_shoot,
            god_mode: false,
            next_id: 1,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Uniform draw in [0, 1)
    pub fn roll(&mut self) -> f32 {
        self.rng.random::<f32>()
    }

    pub fn emit(&mut self, event: GameEvent) {
        log::trace!("event: {}", event.name());
        self.events.push(event);
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn add_coins(&mut self, amount: u64) {
        if amount == 0 {
            return;
        }
        self.coins = self.coins.saturating_add(amount);
        self.emit(GameEvent::CoinsEarned { amount });
    }

    /// Base score scaled by the current combo, rounded down
    pub fn combo_points(&self, base: u64) -> u64 {
        (base as f64 * (1.0 + self.combo as f64 * COMBO_BONUS)).floor() as u64
    }

    pub fn add_combo(&mut self) {
        self.combo += 1;
        self.combo_timer = COMBO_WINDOW;
    }

    pub fn reset_combo(&mut self) {
        self.combo = 0;
        self.combo_timer = 0.0;
    }

    /// Count down the combo window, resetting when it runs out
    pub fn tick_combo(&mut self, dt: f32) {
        if self.combo_timer > 0.0 {
            self.combo_timer -= dt;
            if self.combo_timer <= 0.0 {
                self.reset_combo();
            }
        }
    }

    /// Hit the player. Any hit breaks the combo, even one that is evaded.
    pub fn damage_player(&mut self, amount: u32) -> DamageOutcome {
        let outcome = if self.god_mode {
            DamageOutcome::Evaded
        } else {
            self.player.take_damage(amount)
        };
        match outcome {
            DamageOutcome::Applied(amount) => {
                let hp = self.player.hp;
                self.emit(GameEvent::PlayerDamaged { amount, hp });
                self.spawn_explosion(self.player.pos, 0xff4757, 25);
            }
            DamageOutcome::Absorbed => self.emit(GameEvent::ShieldAbsorbed),
            DamageOutcome::Evaded => {}
        }
        self.reset_combo();
        outcome
    }

    /// Spawn a radial burst of particles, respecting the particle cap
    pub fn spawn_explosion(&mut self, pos: Vec2, color: u32, count: usize) {
        let room = self.max_particles.saturating_sub(self.particles.len());
        for _ in 0..count.min(room) {
            let angle = self.rng.random_range(0.0..std::f32::consts::TAU);
            let speed = self.rng.random_range(120.0..340.0);
            let radius = self.rng.random_range(1.0..4.0);
            self.particles.push(Particle {
                pos,
                vel: unit_from_angle(angle) * speed,
                color,
                life: PARTICLE_LIFE,
                max_life: PARTICLE_LIFE,
                radius,
            });
        }
    }

    /// Current values to hand back to storage
    pub fn profile(&self) -> PersistedProfile {
        PersistedProfile {
            high_score: self.high_score.max(self.score),
            coins: self.coins,
            upgrades: self.player.upgrades(),
        }
    }

    /// Raise the high score if beaten and emit a persistence checkpoint
    pub fn checkpoint(&mut self) {
        self.high_score = self.high_score.max(self.score);
        let profile = self.profile();
        log::info!(
            "Checkpoint: score {}, high {}, coins {}",
            self.score,
            profile.high_score,
            profile.coins
        );
        self.emit(GameEvent::Checkpoint { profile });
    }

    pub fn is_running(&self) -> bool {
        self.phase != GamePhase::GameOver
    }
}
