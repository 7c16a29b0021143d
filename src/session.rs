//! Per-frame session driver
//!
//! Glues host callbacks (animation frames, input events, visibility) to
//! the simulation. The host calls `frame` once per animation frame and
//! reads `hud` and `drain_events` afterwards.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::persistence::PersistedProfile;
use crate::platform::{FrameClock, InputState};
use crate::settings::Settings;
use crate::sim::{
    Boss, BossTier, DevCommand, Enemy, GameEvent, GamePhase, GameState, Particle, Player, PowerUp,
    Projectile, WaveMode, dev, tick,
};

/// Boss bar contents
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BossHud {
    pub tier: BossTier,
    pub name: String,
    pub hp: u32,
    pub max_hp: u32,
    pub phase: u8,
}

/// Per-frame values for the HUD
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hud {
    pub score: u64,
    pub high_score: u64,
    pub hp: u32,
    pub max_hp: u32,
    pub wave: u32,
    /// Kills still needed this wave
    pub remaining: u32,
    pub combo: u32,
    pub coins: u64,
    pub mode: WaveMode,
    pub boss: Option<BossHud>,
    pub phase: GamePhase,
}

/// Everything the host draws, borrowed from the live state
#[derive(Debug, Serialize)]
pub struct Scene<'a> {
    pub arena: Vec2,
    pub player: &'a Player,
    pub bullets: &'a [Projectile],
    pub enemy_bullets: &'a [Projectile],
    pub enemies: &'a [Enemy],
    pub boss: Option<&'a Boss>,
    pub powerups: &'a [PowerUp],
    pub particles: &'a [Particle],
}

pub struct Session {
    state: GameState,
    clock: FrameClock,
    input: InputState,
    settings: Settings,
}

impl Session {
    pub fn new(seed: u64, arena: Vec2, profile: PersistedProfile, settings: Settings) -> Self {
        log::info!(
            "New session: seed {}, arena {}x{}, {} quality",
            seed,
            arena.x,
            arena.y,
            settings.quality.as_str()
        );
        Self {
            state: GameState::new(seed, arena, profile, &settings),
            clock: FrameClock::new(),
            input: InputState::new(),
            settings,
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn input_mut(&mut self) -> &mut InputState {
        &mut self.input
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Run one animation frame at host time `now_ms`
    pub fn frame(&mut self, now_ms: f64) {
        let Some(dt) = self.clock.advance(now_ms) else {
            return;
        };

        let was_paused = self.state.phase == GamePhase::Paused;
        let input = self.input.snapshot();
        tick(&mut self.state, &input, dt);
        self.input.consumed();

        // The frame after a resume is skipped so the paused gap never counts
        if was_paused && self.state.phase == GamePhase::Playing {
            self.clock.skip_next_frame();
        }
    }

    /// Page visibility changed; hidden releases held input, visible skips a frame
    pub fn visibility_changed(&mut self, visible: bool) {
        if visible {
            log::debug!("Page visible, skipping next frame");
            self.clock.skip_next_frame();
        } else {
            self.input.release_all();
        }
    }

    /// Canvas resized
    pub fn resize(&mut self, width: f32, height: f32) {
        if width.is_finite() && height.is_finite() {
            self.state.arena = Vec2::new(width.max(1.0), height.max(1.0));
        }
    }

    pub fn apply_settings(&mut self, settings: Settings) {
        self.state.max_particles = settings.max_particles();
        self.state.auto_shoot = settings.auto_shoot;
        let cap = self.state.max_particles;
        self.state.particles.truncate(cap);
        self.settings = settings;
    }

    pub fn apply_dev(&mut self, cmd: DevCommand) {
        dev::apply(&mut self.state, cmd);
    }

    pub fn hud(&self) -> Hud {
        let s = &self.state;
        Hud {
            score: s.score,
            high_score: s.high_score.max(s.score),
            hp: s.player.hp,
            max_hp: s.player.max_hp,
            wave: s.waves.wave,
            remaining: s.waves.remaining(),
            combo: s.combo,
            coins: s.coins,
            mode: s.waves.mode,
            boss: s.boss.as_ref().map(|b| BossHud {
                tier: b.tier,
                name: b.tier.name().to_string(),
                hp: b.hp,
                max_hp: b.max_hp,
                phase: b.phase,
            }),
            phase: s.phase,
        }
    }

    pub fn scene(&self) -> Scene<'_> {
        let s = &self.state;
        Scene {
            arena: s.arena,
            player: &s.player,
            bullets: &s.bullets,
            enemy_bullets: &s.enemy_bullets,
            enemies: &s.enemies,
            boss: s.boss.as_ref(),
            powerups: &s.powerups,
            particles: &s.particles,
        }
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        self.state.drain_events()
    }

    /// Start a new run, keeping coins, upgrades and the high score
    pub fn restart(&mut self) {
        let profile = self.state.profile();
        let seed = self.state.seed.wrapping_add(1);
        let arena = self.state.arena;
        log::info!("Restarting with seed {}", seed);
        self.state = GameState::new(seed, arena, profile, &self.settings);
        self.input.consumed();
        self.clock.skip_next_frame();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::MAX_FRAME_DT;

    fn session() -> Session {
        Session::new(
            3,
            Vec2::new(1280.0, 720.0),
            PersistedProfile::default(),
            Settings::default(),
        )
    }

    #[test]
    fn test_first_frame_does_not_tick() {
        let mut s = session();
        s.frame(1000.0);
        assert_eq!(s.state().elapsed, 0.0);
        s.frame(1016.0);
        assert!(s.state().elapsed > 0.0);
    }

    #[test]
    fn test_tab_suspend_applies_at_most_max_dt() {
        let mut s = session();
        s.frame(0.0);
        s.frame(16.0);
        let before = s.state().elapsed;
        s.frame(120_000.0);
        let step = s.state().elapsed - before;
        assert!(step <= MAX_FRAME_DT as f64 + 1e-9);
    }

    #[test]
    fn test_resume_skips_one_frame() {
        let mut s = session();
        s.frame(0.0);
        s.input_mut().toggle_pause();
        s.frame(16.0);
        assert_eq!(s.state().phase, GamePhase::Paused);
        let t = s.state().elapsed;

        s.input_mut().toggle_pause();
        s.frame(30_000.0);
        assert_eq!(s.state().phase, GamePhase::Playing);
        // Skipped frame after resume
        s.frame(30_016.0);
        assert_eq!(s.state().elapsed, t);
        s.frame(30_032.0);
        assert!(s.state().elapsed > t);
    }

    #[test]
    fn test_visibility_skip() {
        let mut s = session();
        s.frame(0.0);
        s.frame(16.0);
        let t = s.state().elapsed;
        s.visibility_changed(false);
        s.visibility_changed(true);
        s.frame(90_000.0);
        assert_eq!(s.state().elapsed, t);
    }

    #[test]
    fn test_hud_reports_boss() {
        let mut s = session();
        assert!(s.hud().boss.is_none());
        s.apply_dev(DevCommand::SpawnBoss(BossTier::MegaBoss));
        let hud = s.hud();
        let boss = hud.boss.unwrap();
        assert_eq!(boss.tier, BossTier::MegaBoss);
        assert_eq!(boss.max_hp, 195);
        assert_eq!(hud.mode, WaveMode::Boss);
        let json = serde_json::to_string(&s.hud()).unwrap();
        assert!(json.contains("\"mode\":{\"mode\":\"boss\"}"));
    }

    #[test]
    fn test_scene_serializes() {
        let mut s = session();
        s.apply_dev(DevCommand::SpawnBoss(BossTier::Boss));
        let json = serde_json::to_string(&s.scene()).unwrap();
        assert!(json.contains("\"boss\":{"));
        assert!(json.contains("\"enemies\":[]"));
    }

    #[test]
    fn test_restart_keeps_profile() {
        let mut s = session();
        s.apply_dev(DevCommand::SetCoins(500));
        s.apply_dev(DevCommand::SetWeaponLevel(3));
        s.apply_dev(DevCommand::SetScore(900));
        s.restart();
        assert_eq!(s.state().coins, 500);
        assert_eq!(s.state().player.weapon_level, 3);
        assert_eq!(s.state().high_score, 900);
        assert_eq!(s.state().score, 0);
    }

    #[test]
    fn test_particles_setting_applies_live() {
        let mut s = session();
        s.apply_settings(Settings {
            particles: false,
            ..Settings::default()
        });
        assert_eq!(s.state().max_particles, 0);
    }
}
