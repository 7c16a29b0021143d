//! Enemy bullet patterns and the deferred-burst queue
//!
//! A `Volley` describes one burst of enemy bullets relative to an origin.
//! Staggered attacks schedule their later bursts into a `VolleyQueue`
//! sorted by due time; the tick drains every due entry before anything
//! else moves, so a burst never lands after the frame its delay elapsed in.

use glam::Vec2;
use rand::Rng;
use std::f32::consts::TAU;

use super::state::Projectile;
use crate::{angle_to, unit_from_angle};

/// Where a fan or line points
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Aim {
    /// Toward the player at the moment the burst fires
    AtPlayer,
    /// A fixed angle in radians
    Fixed(f32),
}

impl Aim {
    fn resolve(self, origin: Vec2, target: Vec2) -> f32 {
        match self {
            Aim::AtPlayer => angle_to(origin, target),
            Aim::Fixed(angle) => angle,
        }
    }
}

/// One burst of enemy bullets
#[derive(Debug, Clone, PartialEq)]
pub enum Volley {
    /// `count` bullets evenly spaced around the origin, rotated by `offset`
    Ring {
        count: u32,
        offset: f32,
        speed: f32,
        radius: f32,
    },
    /// A ring where each bullet gets random angle and speed jitter
    Scatter {
        count: u32,
        angle_jitter: f32,
        speed: f32,
        speed_jitter: f32,
        radius: f32,
    },
    /// Bullets at `aim + first + i * step`
    Fan {
        aim: Aim,
        count: u32,
        first: f32,
        step: f32,
        speed: f32,
        radius: f32,
    },
    /// Bullets stacked along one direction, each `speed_step` faster
    Line {
        aim: Aim,
        count: u32,
        speed: f32,
        speed_step: f32,
        radius: f32,
    },
}

impl Volley {
    /// A single aimed bullet
    pub fn aimed(speed: f32, radius: f32) -> Self {
        Volley::Fan {
            aim: Aim::AtPlayer,
            count: 1,
            first: 0.0,
            step: 0.0,
            speed,
            radius,
        }
    }

    /// Number of bullets this burst produces
    pub fn bullet_count(&self) -> usize {
        match *self {
            Volley::Ring { count, .. }
            | Volley::Scatter { count, .. }
            | Volley::Fan { count, .. }
            | Volley::Line { count, .. } => count as usize,
        }
    }

    /// Materialize the bullets, fired from `origin` with the player at `target`
    pub fn fire<R: Rng>(&self, origin: Vec2, target: Vec2, rng: &mut R) -> Vec<Projectile> {
        let mut out = Vec::with_capacity(self.bullet_count());
        match *self {
            Volley::Ring {
                count,
                offset,
                speed,
                radius,
            } => {
                let step = TAU / count.max(1) as f32;
                for i in 0..count {
                    let angle = offset + step * i as f32;
                    out.push(Projectile::new(origin, unit_from_angle(angle) * speed, radius));
                }
            }
            Volley::Scatter {
                count,
                angle_jitter,
                speed,
                speed_jitter,
                radius,
            } => {
                let step = TAU / count.max(1) as f32;
                for i in 0..count {
                    let angle = step * i as f32 + rng.random::<f32>() * angle_jitter;
                    let speed = speed + rng.random::<f32>() * speed_jitter;
                    out.push(Projectile::new(origin, unit_from_angle(angle) * speed, radius));
                }
            }
            Volley::Fan {
                aim,
                count,
                first,
                step,
                speed,
                radius,
            } => {
                let base = aim.resolve(origin, target);
                for i in 0..count {
                    let angle = base + first + step * i as f32;
                    out.push(Projectile::new(origin, unit_from_angle(angle) * speed, radius));
                }
            }
            Volley::Line {
                aim,
                count,
                speed,
                speed_step,
                radius,
            } => {
                let dir = unit_from_angle(aim.resolve(origin, target));
                for i in 0..count {
                    out.push(Projectile::new(
                        origin,
                        dir * (speed + speed_step * i as f32),
                        radius,
                    ));
                }
            }
        }
        out
    }
}

/// A burst waiting for its delay to elapse
#[derive(Debug, Clone, PartialEq)]
pub struct PendingVolley {
    /// Simulation time (seconds) at which it fires
    pub due: f64,
    /// Boss instance that scheduled it
    pub source: u32,
    pub volley: Volley,
}

/// Pending bursts sorted by due time (ties keep scheduling order)
#[derive(Debug, Clone, Default)]
pub struct VolleyQueue {
    entries: Vec<PendingVolley>,
}

impl VolleyQueue {
    pub fn schedule(&mut self, due: f64, source: u32, volley: Volley) {
        let idx = self.entries.partition_point(|p| p.due <= due);
        self.entries.insert(idx, PendingVolley { due, source, volley });
    }

    /// Remove and return every entry due at or before `now`, in order
    pub fn take_due(&mut self, now: f64) -> Vec<PendingVolley> {
        let n = self.entries.partition_point(|p| p.due <= now);
        self.entries.drain(..n).collect()
    }

    /// Forget everything scheduled by one boss instance
    pub fn cancel_source(&mut self, source: u32) {
        self.entries.retain(|p| p.source != source);
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PendingVolley> {
        self.entries.iter()
    }
}
