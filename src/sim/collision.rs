//! Circle collision and projectile integration
//!
//! Every body in the arena is a circle, so one overlap test covers
//! bullets, enemies, the boss, pickups and the player.

use glam::Vec2;

use super::state::{Enemy, Projectile};

/// Strict overlap: touching circles do not collide
#[inline]
pub fn circles_overlap(a: Vec2, a_radius: f32, b: Vec2, b_radius: f32) -> bool {
    a.distance(b) < a_radius + b_radius
}

/// Integrate projectiles and drop the ones that left the expanded bounds
pub fn advance_projectiles(projectiles: &mut Vec<Projectile>, dt: f32, arena: Vec2) {
    for p in projectiles.iter_mut() {
        p.pos += p.vel * dt;
    }
    projectiles.retain(|p| !p.out_of_bounds(arena));
}

/// Index of the first enemy (in list order) the circle overlaps
pub fn first_enemy_hit(pos: Vec2, radius: f32, enemies: &[Enemy]) -> Option<usize> {
    enemies
        .iter()
        .position(|e| circles_overlap(pos, radius, e.pos, e.radius))
}

/// Move `pos` straight toward `target`. Coincident points head along +X.
#[inline]
pub fn pursue(pos: Vec2, target: Vec2, speed: f32, dt: f32) -> Vec2 {
    pos + crate::unit_from_angle(crate::angle_to(pos, target)) * speed * dt
}
