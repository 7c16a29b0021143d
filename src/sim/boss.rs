//! Boss controllers
//!
//! Four tiers share one record but each runs its own schedule. A tier's
//! phase is derived from the HP fraction every tick and never stored as an
//! input; attacks are picked from the phase directly, never by chance.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::f32::consts::{FRAC_PI_2, PI, TAU};

use super::state::EnemyKind;
use super::volley::{Aim, Volley};
use crate::{angle_to, clamp_to_arena, unit_from_angle};

/// Boss variants, weakest first
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BossTier {
    Boss,
    MegaBoss,
    UltraBoss,
    LegendaryBoss,
}

impl BossTier {
    pub const ALL: [BossTier; 4] = [
        BossTier::Boss,
        BossTier::MegaBoss,
        BossTier::UltraBoss,
        BossTier::LegendaryBoss,
    ];

    pub fn name(self) -> &'static str {
        match self {
            BossTier::Boss => "Boss",
            BossTier::MegaBoss => "Mega Boss",
            BossTier::UltraBoss => "Omega Overlord",
            BossTier::LegendaryBoss => "Legendary Destroyer",
        }
    }

    pub fn max_hp(self, wave: u32) -> u32 {
        match self {
            BossTier::Boss => 60 + wave * 25,
            BossTier::MegaBoss => 150 + wave * 45,
            BossTier::UltraBoss => 350 + wave * 60,
            BossTier::LegendaryBoss => 650 + wave * 110,
        }
    }

    pub fn reward_points(self, wave: u32) -> u64 {
        let wave = wave as u64;
        match self {
            BossTier::Boss => 600 + wave * 120,
            BossTier::MegaBoss => 1500 + wave * 250,
            BossTier::UltraBoss => 3000 + wave * 400,
            BossTier::LegendaryBoss => 5500 + wave * 700,
        }
    }

    pub fn reward_coins(self, wave: u32) -> u64 {
        let wave = wave as u64;
        match self {
            BossTier::Boss => 60 + wave * 10,
            BossTier::MegaBoss => 150 + wave * 20,
            BossTier::UltraBoss => 300 + wave * 30,
            BossTier::LegendaryBoss => 550 + wave * 55,
        }
    }

    /// Powerups scattered on death
    pub fn powerup_count(self) -> usize {
        match self {
            BossTier::Boss => 4,
            BossTier::MegaBoss => 8,
            BossTier::UltraBoss => 14,
            BossTier::LegendaryBoss => 24,
        }
    }

    pub fn scatter_radius(self) -> f32 {
        match self {
            BossTier::Boss => 90.0,
            BossTier::MegaBoss => 140.0,
            BossTier::UltraBoss => 180.0,
            BossTier::LegendaryBoss => 230.0,
        }
    }

    /// Particles in the death explosion
    pub fn explosion_size(self) -> usize {
        match self {
            BossTier::Boss => 60,
            BossTier::MegaBoss => 120,
            BossTier::UltraBoss => 200,
            BossTier::LegendaryBoss => 280,
        }
    }

    pub fn radius(self) -> f32 {
        match self {
            BossTier::Boss => 45.0,
            BossTier::MegaBoss => 70.0,
            BossTier::UltraBoss => 90.0,
            BossTier::LegendaryBoss => 110.0,
        }
    }

    pub fn base_speed(self) -> f32 {
        match self {
            BossTier::Boss => 45.0,
            BossTier::MegaBoss => 35.0,
            BossTier::UltraBoss => 30.0,
            BossTier::LegendaryBoss => 28.0,
        }
    }

    /// Entry height (pixels from the top edge)
    pub fn spawn_y(self) -> f32 {
        match self {
            BossTier::Boss => 80.0,
            BossTier::MegaBoss => 100.0,
            BossTier::UltraBoss => 120.0,
            BossTier::LegendaryBoss => 140.0,
        }
    }

    /// Minimum distance kept from the arena edge
    pub fn edge_margin(self) -> f32 {
        match self {
            BossTier::Boss => 60.0,
            BossTier::MegaBoss => 80.0,
            BossTier::UltraBoss | BossTier::LegendaryBoss => 100.0,
        }
    }

    pub fn color(self) -> u32 {
        match self {
            BossTier::Boss => 0xb86bff,
            BossTier::MegaBoss => 0xff3366,
            BossTier::UltraBoss => 0xffd700,
            BossTier::LegendaryBoss => 0xff0066,
        }
    }

    pub fn phase_count(self) -> u8 {
        match self {
            BossTier::Boss => 1,
            BossTier::MegaBoss => 3,
            BossTier::UltraBoss => 4,
            BossTier::LegendaryBoss => 5,
        }
    }

    /// Phase for an HP fraction; higher phases as HP falls
    pub fn phase_for_fraction(self, fraction: f64) -> u8 {
        match self {
            BossTier::Boss => 1,
            BossTier::MegaBoss => {
                if fraction <= 0.33 {
                    3
                } else if fraction <= 0.66 {
                    2
                } else {
                    1
                }
            }
            BossTier::UltraBoss => {
                if fraction <= 0.25 {
                    4
                } else if fraction <= 0.50 {
                    3
                } else if fraction <= 0.75 {
                    2
                } else {
                    1
                }
            }
            BossTier::LegendaryBoss => {
                if fraction <= 0.20 {
                    5
                } else if fraction <= 0.40 {
                    4
                } else if fraction <= 0.60 {
                    3
                } else if fraction <= 0.80 {
                    2
                } else {
                    1
                }
            }
        }
    }

    pub fn phase_for(self, hp: u32, max_hp: u32) -> u8 {
        self.phase_for_fraction(hp as f64 / max_hp.max(1) as f64)
    }

    /// Movement pattern for a rotation index
    fn pattern_at(self, index: u8) -> MovePattern {
        match (self, index) {
            (_, 0) => MovePattern::OrbitStrafe,
            (_, 1) => MovePattern::SlowApproach,
            (BossTier::Boss, _) => MovePattern::Erratic,
            (BossTier::MegaBoss, 2) => MovePattern::Charge,
            (BossTier::UltraBoss | BossTier::LegendaryBoss, 2) => MovePattern::DashCharge,
            (BossTier::UltraBoss, 4..) => MovePattern::Hold,
            _ => MovePattern::Erratic,
        }
    }

    fn approach_factor(self) -> f32 {
        match self {
            BossTier::Boss => 0.6,
            BossTier::MegaBoss | BossTier::UltraBoss => 0.5,
            BossTier::LegendaryBoss => 0.4,
        }
    }

    fn erratic_factor(self) -> f32 {
        match self {
            BossTier::Boss => 1.2,
            BossTier::MegaBoss => 1.5,
            BossTier::UltraBoss | BossTier::LegendaryBoss => 2.0,
        }
    }

    /// (speed multiplier, duration) of a locked-target dash
    fn dash_profile(self) -> (f32, f32) {
        match self {
            BossTier::LegendaryBoss => (4.0, 0.8),
            _ => (3.5, 0.5),
        }
    }
}

/// How a boss moves while a pattern is active
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MovePattern {
    /// Circle the player at a right angle to the line between them
    OrbitStrafe,
    /// Drift toward the player at reduced speed
    SlowApproach,
    /// Pursue the player at high speed
    Charge,
    /// Lock the player's position and dash to it
    DashCharge,
    /// Random jitter
    Erratic,
    /// Stay put
    Hold,
}

/// Side effects requested by one boss update
#[derive(Debug, Default)]
pub struct BossActions {
    /// (delay in seconds, burst); a zero delay fires this frame
    pub volleys: Vec<(f32, Volley)>,
    /// Minions to add to the enemy list
    pub summons: Vec<(EnemyKind, Vec2)>,
    /// Set when the boss entered a phase it had not announced yet
    pub phase_changed: Option<u8>,
}

impl BossActions {
    fn fire(&mut self, volley: Volley) {
        self.volleys.push((0.0, volley));
    }

    fn fire_after(&mut self, delay: f32, volley: Volley) {
        self.volleys.push((delay, volley));
    }
}

/// The active boss
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Boss {
    pub id: u32,
    pub tier: BossTier,
    pub pos: Vec2,
    pub radius: f32,
    pub speed: f32,
    pub hp: u32,
    pub max_hp: u32,
    /// Wave the boss was scaled for
    pub wave: u32,
    pub phase: u8,
    /// Highest phase already announced
    pub last_phase: u8,
    pub move_pattern: u8,
    pub move_timer: f32,
    pub dash_target: Option<Vec2>,
    pub dash_timer: f32,
    /// Base attack cooldown
    pub shoot_cooldown: f32,
    pub special_cooldown: f32,
    pub summon_cooldown: f32,
    pub laser_cooldown: f32,
    /// Rotating offset for spiral attacks
    pub spiral_angle: f32,
}

impl Boss {
    pub fn new(id: u32, tier: BossTier, pos: Vec2, wave: u32) -> Self {
        let wave = wave.max(1);
        let max_hp = tier.max_hp(wave);
        Self {
            id,
            tier,
            pos,
            radius: tier.radius(),
            speed: tier.base_speed(),
            hp: max_hp,
            max_hp,
            wave,
            phase: 1,
            last_phase: 1,
            move_pattern: 0,
            move_timer: 0.0,
            dash_target: None,
            dash_timer: 0.0,
            shoot_cooldown: 0.0,
            special_cooldown: 0.0,
            summon_cooldown: 4.0,
            laser_cooldown: 0.0,
            spiral_angle: 0.0,
        }
    }

    pub fn hp_fraction(&self) -> f64 {
        self.hp as f64 / self.max_hp.max(1) as f64
    }

    pub fn is_dead(&self) -> bool {
        self.hp == 0
    }

    /// Take `amount` damage, saturating at zero
    pub fn damage(&mut self, amount: u32) {
        self.hp = self.hp.saturating_sub(amount);
    }

    pub fn points(&self) -> u64 {
        self.tier.reward_points(self.wave)
    }

    pub fn coins(&self) -> u64 {
        self.tier.reward_coins(self.wave)
    }

    /// Seconds each movement pattern lasts in the current phase
    pub fn move_period(&self) -> f32 {
        let phase = self.phase as f32;
        match self.tier {
            BossTier::Boss => 4.0,
            BossTier::MegaBoss => 3.0,
            BossTier::UltraBoss => (3.0 - phase * 0.4).max(1.5),
            BossTier::LegendaryBoss => (2.8 - phase * 0.3).max(1.2),
        }
    }

    /// Number of patterns the rotation cycles through in the current phase
    pub fn pattern_count(&self) -> u8 {
        match self.tier {
            BossTier::Boss => 3,
            BossTier::MegaBoss => 4,
            BossTier::UltraBoss => 2 + self.phase,
            BossTier::LegendaryBoss => 3 + self.phase,
        }
    }

    pub fn current_pattern(&self) -> MovePattern {
        self.tier.pattern_at(self.move_pattern)
    }

    /// Movement speed; the top two tiers speed up per phase
    pub fn move_speed(&self) -> f32 {
        match self.tier {
            BossTier::Boss | BossTier::MegaBoss => self.speed,
            BossTier::UltraBoss | BossTier::LegendaryBoss => {
                self.speed * (1.0 + (self.phase as f32 - 1.0) * 0.25)
            }
        }
    }

    /// Advance one frame: phase, movement, then attacks
    pub fn update<R: Rng>(
        &mut self,
        dt: f32,
        player: Vec2,
        arena: Vec2,
        time: f64,
        rng: &mut R,
    ) -> BossActions {
        let mut actions = BossActions::default();

        self.phase = self.tier.phase_for(self.hp, self.max_hp);
        if self.phase > self.last_phase {
            self.last_phase = self.phase;
            actions.phase_changed = Some(self.phase);
        }

        self.move_timer += dt;
        if self.move_timer > self.move_period() {
            self.move_timer = 0.0;
            self.move_pattern = (self.move_pattern + 1) % self.pattern_count();
        }
        self.steer(dt, player, rng);
        self.pos = clamp_to_arena(self.pos, arena, self.tier.edge_margin());

        match self.tier {
            BossTier::Boss => self.attack_boss(dt, time, &mut actions),
            BossTier::MegaBoss => self.attack_mega(dt, time, &mut actions),
            BossTier::UltraBoss => self.attack_ultra(dt, player, arena, rng, &mut actions),
            BossTier::LegendaryBoss => self.attack_legendary(dt, player, arena, &mut actions),
        }
        actions
    }

    fn steer<R: Rng>(&mut self, dt: f32, player: Vec2, rng: &mut R) {
        let spd = self.move_speed();
        let pattern = self.current_pattern();

        if self.dash_timer > 0.0 {
            self.dash_timer -= dt;
            if let Some(target) = self.dash_target {
                let (mult, _) = self.tier.dash_profile();
                self.pos += unit_from_angle(angle_to(self.pos, target)) * spd * mult * dt;
            }
        } else {
            let heading = angle_to(self.pos, player);
            match pattern {
                MovePattern::OrbitStrafe => {
                    self.pos += unit_from_angle(heading + FRAC_PI_2) * spd * dt;
                }
                MovePattern::SlowApproach => {
                    self.pos += unit_from_angle(heading) * spd * self.tier.approach_factor() * dt;
                }
                MovePattern::Charge => {
                    self.pos += unit_from_angle(heading) * spd * 1.8 * dt;
                }
                MovePattern::DashCharge => {
                    // Ultra locks once per pattern; Legendary re-locks after every dash
                    if self.dash_target.is_none() || self.tier == BossTier::LegendaryBoss {
                        let (_, duration) = self.tier.dash_profile();
                        self.dash_target = Some(player);
                        self.dash_timer = duration;
                    }
                }
                MovePattern::Erratic => {
                    let jitter = Vec2::new(rng.random::<f32>() - 0.5, rng.random::<f32>() - 0.5);
                    self.pos += jitter * spd * self.tier.erratic_factor() * dt;
                }
                MovePattern::Hold => {}
            }
        }

        // Ultra drops its lock as soon as the pattern moves on, even mid-dash
        let keep_lock = self.dash_timer > 0.0 && self.tier != BossTier::UltraBoss;
        if pattern != MovePattern::DashCharge && !keep_lock {
            self.dash_target = None;
        }
    }

    fn attack_boss(&mut self, dt: f32, time: f64, actions: &mut BossActions) {
        self.shoot_cooldown -= dt;
        if self.shoot_cooldown <= 0.0 {
            self.shoot_cooldown = 1.2;
            actions.fire(Volley::Ring {
                count: 8,
                offset: time as f32,
                speed: 270.0,
                radius: 7.0,
            });
        }
    }

    fn attack_mega(&mut self, dt: f32, time: f64, actions: &mut BossActions) {
        self.shoot_cooldown -= dt;
        if self.shoot_cooldown <= 0.0 {
            self.shoot_cooldown = 0.8;
            actions.fire(Volley::Ring {
                count: 12,
                offset: (time / 0.8) as f32,
                speed: 280.0,
                radius: 8.0,
            });
        }

        self.special_cooldown -= dt;
        if self.special_cooldown <= 0.0 {
            match self.phase {
                1 => {
                    self.special_cooldown = 4.0;
                    // Wide wave aimed at the player
                    actions.fire(Volley::Fan {
                        aim: Aim::AtPlayer,
                        count: 16,
                        first: -8.0 * 0.15,
                        step: 0.15,
                        speed: 250.0,
                        radius: 7.0,
                    });
                }
                2 => {
                    self.special_cooldown = 3.5;
                    // Cross plus diagonals, three pulses
                    for j in 0..3 {
                        actions.fire_after(
                            j as f32 * 0.1,
                            Volley::Ring {
                                count: 8,
                                offset: 0.0,
                                speed: 300.0,
                                radius: 8.0,
                            },
                        );
                    }
                }
                _ => {
                    self.special_cooldown = 3.0;
                    for burst in 0..5 {
                        actions.fire_after(
                            burst as f32 * 0.15,
                            Volley::Scatter {
                                count: 20,
                                angle_jitter: 0.3,
                                speed: 260.0,
                                speed_jitter: 40.0,
                                radius: 6.0,
                            },
                        );
                    }
                }
            }
        }

        if self.phase >= 3 {
            self.summon_cooldown -= dt;
            if self.summon_cooldown <= 0.0 {
                self.summon_cooldown = 8.0;
                let offset = Vec2::new(self.radius + 60.0, 0.0);
                actions.summons.push((EnemyKind::Fast, self.pos + offset));
                actions.summons.push((EnemyKind::Fast, self.pos - offset));
            }
        }
    }

    fn attack_ultra<R: Rng>(
        &mut self,
        dt: f32,
        player: Vec2,
        arena: Vec2,
        rng: &mut R,
        actions: &mut BossActions,
    ) {
        let phase = self.phase as f32;

        // Counter-rotating dual spiral
        self.shoot_cooldown -= dt;
        if self.shoot_cooldown <= 0.0 {
            self.shoot_cooldown = (0.8 - phase * 0.1).max(0.35);
            self.spiral_angle += 0.35;
            let count = 10 + 2 * self.phase as u32;
            let speed = 265.0 + phase * 15.0;
            for offset in [self.spiral_angle, -self.spiral_angle] {
                actions.fire(Volley::Ring {
                    count,
                    offset,
                    speed,
                    radius: 7.0,
                });
            }
        }

        self.special_cooldown -= dt;
        if self.special_cooldown <= 0.0 {
            self.special_cooldown = (4.0 - phase * 0.6).max(1.5);
            match self.phase {
                1 => {
                    // Five-pointed star of bullet lines, one point at the player
                    let base = angle_to(self.pos, player);
                    for p in 0..5 {
                        actions.fire(Volley::Line {
                            aim: Aim::Fixed(base + TAU / 5.0 * p as f32),
                            count: 3,
                            speed: 260.0,
                            speed_step: 30.0,
                            radius: 8.0,
                        });
                    }
                }
                2 => {
                    for ring in 0..2 {
                        actions.fire_after(
                            ring as f32 * 0.25,
                            Volley::Ring {
                                count: 20,
                                offset: PI / 20.0 * ring as f32,
                                speed: 230.0 + ring as f32 * 40.0,
                                radius: 7.0,
                            },
                        );
                    }
                }
                3 => {
                    for idx in 0..8 {
                        actions.fire_after(
                            idx as f32 * 0.06,
                            Volley::Line {
                                aim: Aim::Fixed(TAU / 8.0 * idx as f32),
                                count: 5,
                                speed: 280.0,
                                speed_step: 20.0,
                                radius: 8.0,
                            },
                        );
                    }
                }
                _ => {
                    // Death blossom
                    for burst in 0..6 {
                        let speed = 290.0 + rng.random::<f32>() * 50.0;
                        let offset = TAU / 6.0 * burst as f32 + rng.random::<f32>() * 0.3;
                        actions.fire_after(
                            burst as f32 * 0.13,
                            Volley::Ring {
                                count: 24,
                                offset,
                                speed,
                                radius: 6.0,
                            },
                        );
                    }
                }
            }
        }

        if self.phase >= 2 {
            self.summon_cooldown -= dt;
            if self.summon_cooldown <= 0.0 {
                self.summon_cooldown = (8.0 - phase * 1.5).max(4.0);
                let count = 1 + self.phase as u32;
                let dist = self.radius + 60.0;
                for i in 0..count {
                    let angle = TAU / count as f32 * i as f32;
                    let pos = clamp_to_arena(self.pos + unit_from_angle(angle) * dist, arena, 20.0);
                    let kind = if i % 2 == 0 {
                        EnemyKind::Shooter
                    } else {
                        EnemyKind::Fast
                    };
                    actions.summons.push((kind, pos));
                }
            }
        }
    }

    fn attack_legendary(&mut self, dt: f32, player: Vec2, arena: Vec2, actions: &mut BossActions) {
        let phase = self.phase as f32;

        self.shoot_cooldown -= dt;
        if self.shoot_cooldown <= 0.0 {
            self.shoot_cooldown = (1.2 - phase * 0.1).max(0.6);
            self.spiral_angle += 0.4;
            actions.fire(Volley::Ring {
                count: 12,
                offset: self.spiral_angle,
                speed: 280.0,
                radius: 8.0,
            });
        }

        self.special_cooldown -= dt;
        if self.special_cooldown <= 0.0 {
            match self.phase {
                1 => {
                    self.special_cooldown = 4.5;
                    actions.fire(Volley::Ring {
                        count: 20,
                        offset: 0.0,
                        speed: 250.0,
                        radius: 7.0,
                    });
                }
                2 => {
                    self.special_cooldown = 4.0;
                    for j in 0..3 {
                        actions.fire_after(
                            j as f32 * 0.1,
                            Volley::Ring {
                                count: 12,
                                offset: 0.0,
                                speed: 300.0,
                                radius: 8.0,
                            },
                        );
                    }
                }
                3 => {
                    self.special_cooldown = 3.5;
                    // Hexagon layers
                    for layer in 0..2 {
                        actions.fire_after(
                            layer as f32 * 0.25,
                            Volley::Ring {
                                count: 14,
                                offset: layer as f32 * 0.3,
                                speed: 270.0 + layer as f32 * 15.0,
                                radius: 7.0,
                            },
                        );
                    }
                }
                4 => {
                    self.special_cooldown = 3.0;
                    for burst in 0..5 {
                        actions.fire_after(
                            burst as f32 * 0.15,
                            Volley::Scatter {
                                count: 18,
                                angle_jitter: 0.3,
                                speed: 260.0,
                                speed_jitter: 30.0,
                                radius: 6.0,
                            },
                        );
                    }
                }
                _ => {
                    self.special_cooldown = 2.5;
                    // Apocalypse: spiral ring plus a fan aimed where the player is then
                    for wave in 0..4 {
                        let delay = wave as f32 * 0.2;
                        actions.fire_after(
                            delay,
                            Volley::Ring {
                                count: 20,
                                offset: wave as f32 * 1.2,
                                speed: 280.0,
                                radius: 7.0,
                            },
                        );
                        actions.fire_after(
                            delay,
                            Volley::Fan {
                                aim: Aim::AtPlayer,
                                count: 3,
                                first: -0.4,
                                step: 0.4,
                                speed: 330.0,
                                radius: 9.0,
                            },
                        );
                    }
                }
            }
        }

        if self.phase >= 3 {
            self.laser_cooldown -= dt;
            if self.laser_cooldown <= 0.0 {
                self.laser_cooldown = 7.0;
                // Aim is locked when the beam starts, not per pulse
                let aim = angle_to(self.pos, player);
                for i in 0..10 {
                    actions.fire_after(
                        i as f32 * 0.06,
                        Volley::Fan {
                            aim: Aim::Fixed(aim),
                            count: 2,
                            first: -0.04,
                            step: 0.08,
                            speed: 420.0,
                            radius: 6.0,
                        },
                    );
                }
            }
        }

        if self.phase >= 4 {
            self.summon_cooldown -= dt;
            if self.summon_cooldown <= 0.0 {
                self.summon_cooldown = 8.0;
                for i in 0..2 {
                    let angle = PI * i as f32;
                    let pos = clamp_to_arena(self.pos + unit_from_angle(angle) * 150.0, arena, 20.0);
                    actions.summons.push((EnemyKind::Shooter, pos));
                }
            }
        }
    }
}
