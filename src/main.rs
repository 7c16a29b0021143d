//! Neon Siege entry point
//!
//! The browser build is driven from the page through the library's wasm
//! bindings. Natively this runs a headless demo: the autopilot plays for a
//! fixed stretch of simulated time and the final HUD is printed as JSON.
//!
//! Usage: `neon-siege [seed] [seconds]`

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use glam::Vec2;
    use neon_siege::consts::{DEFAULT_ARENA_HEIGHT, DEFAULT_ARENA_WIDTH};
    use neon_siege::sim::{GameEvent, GamePhase};
    use neon_siege::{PersistedProfile, Session, Settings};

    env_logger::init();

    let mut args = std::env::args().skip(1);
    let seed = args.next().and_then(|s| s.parse::<u64>().ok()).unwrap_or(1);
    let seconds = args
        .next()
        .and_then(|s| s.parse::<f64>().ok())
        .filter(|s| s.is_finite() && *s > 0.0)
        .unwrap_or(120.0);

    log::info!(
        "Neon Siege (native) headless demo: seed {}, {}s",
        seed,
        seconds
    );

    let mut session = Session::new(
        seed,
        Vec2::new(DEFAULT_ARENA_WIDTH, DEFAULT_ARENA_HEIGHT),
        PersistedProfile::default(),
        Settings::default(),
    );
    session.input_mut().set_idle_mode(true);

    // 60 Hz animation frames
    let frame_ms = 1000.0 / 60.0;
    let frames = (seconds * 60.0) as u64;
    for i in 0..=frames {
        session.frame(i as f64 * frame_ms);
        for event in session.drain_events() {
            match event {
                GameEvent::WaveCleared { wave, bonus } => {
                    log::info!("wave {} cleared (+{})", wave, bonus)
                }
                GameEvent::BossKilled { tier, points, .. } => {
                    log::info!("{} down (+{})", tier.name(), points)
                }
                GameEvent::GameOver { final_score, wave } => {
                    log::info!("game over: {} at wave {}", final_score, wave)
                }
                other => log::debug!("{:?}", other),
            }
        }
        if session.state().phase == GamePhase::GameOver {
            break;
        }
    }

    match serde_json::to_string_pretty(&session.hud()) {
        Ok(json) => println!("{json}"),
        Err(e) => log::error!("Failed to serialize HUD: {}", e),
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is `web::start`, this is just to satisfy the compiler
}
