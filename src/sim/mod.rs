//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Seeded RNG only (one `Pcg32` in `GameState`)
//! - Simulation clock only, never the wall clock
//! - Stable iteration order (entity lists keep insertion order)
//! - No rendering or platform dependencies

pub mod autopilot;
pub mod boss;
pub mod collision;
pub mod combat;
pub mod dev;
pub mod events;
pub mod spawner;
pub mod state;
pub mod tick;
pub mod volley;
pub mod wave;

pub use boss::{Boss, BossActions, BossTier, MovePattern};
pub use collision::circles_overlap;
pub use dev::DevCommand;
pub use events::GameEvent;
pub use state::{
    DamageOutcome, Enemy, EnemyKind, GamePhase, GameState, Particle, Player, PowerUp, PowerUpKind,
    Projectile,
};
pub use tick::{TickInput, clamp_dt, tick};
pub use volley::{Aim, Volley, VolleyQueue};
pub use wave::{WaveController, WaveMode};
