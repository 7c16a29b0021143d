//! Input latching
//!
//! Host events arrive between frames in any order. Held state (keys, fire,
//! pointer) is tracked continuously; one-shot requests (dash, pause) stay
//! latched until a tick has consumed them.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::sim::TickInput;

/// Logical keys the game reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Key {
    Up,
    Down,
    Left,
    Right,
    Dash,
    Pause,
    Idle,
}

impl Key {
    /// Map a DOM `KeyboardEvent.key` value (case-insensitive)
    pub fn from_dom(key: &str) -> Option<Self> {
        match key.to_lowercase().as_str() {
            "w" | "arrowup" => Some(Key::Up),
            "s" | "arrowdown" => Some(Key::Down),
            "a" | "arrowleft" => Some(Key::Left),
            "d" | "arrowright" => Some(Key::Right),
            " " | "shift" => Some(Key::Dash),
            "escape" | "p" => Some(Key::Pause),
            "i" => Some(Key::Idle),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InputState {
    up: bool,
    down: bool,
    left: bool,
    right: bool,
    fire_held: bool,
    aim: Vec2,
    dash_requested: bool,
    pause_requested: bool,
    idle_mode: bool,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn key_down(&mut self, key: Key) {
        match key {
            Key::Up => self.up = true,
            Key::Down => self.down = true,
            Key::Left => self.left = true,
            Key::Right => self.right = true,
            Key::Dash => self.dash_requested = true,
            Key::Pause => self.pause_requested = true,
            Key::Idle => {
                self.idle_mode = !self.idle_mode;
                log::info!("Idle mode: {}", self.idle_mode);
            }
        }
    }

    pub fn key_up(&mut self, key: Key) {
        match key {
            Key::Up => self.up = false,
            Key::Down => self.down = false,
            Key::Left => self.left = false,
            Key::Right => self.right = false,
            Key::Dash | Key::Pause | Key::Idle => {}
        }
    }

    /// Pointer position in arena coordinates
    pub fn pointer_move(&mut self, x: f32, y: f32) {
        if x.is_finite() && y.is_finite() {
            self.aim = Vec2::new(x, y);
        }
    }

    pub fn set_fire(&mut self, held: bool) {
        self.fire_held = held;
    }

    pub fn request_dash(&mut self) {
        self.dash_requested = true;
    }

    pub fn toggle_pause(&mut self) {
        self.pause_requested = true;
    }

    pub fn set_idle_mode(&mut self, on: bool) {
        self.idle_mode = on;
    }

    pub fn idle_mode(&self) -> bool {
        self.idle_mode
    }

    /// Release everything held, e.g. when the window loses focus
    pub fn release_all(&mut self) {
        self.up = false;
        self.down = false;
        self.left = false;
        self.right = false;
        self.fire_held = false;
    }

    /// Input for the next tick; one-shots stay latched until `consumed`
    pub fn snapshot(&self) -> TickInput {
        TickInput {
            move_up: self.up,
            move_down: self.down,
            move_left: self.left,
            move_right: self.right,
            aim: self.aim,
            fire: self.fire_held,
            dash: self.dash_requested,
            pause: self.pause_requested,
            idle_mode: self.idle_mode,
        }
    }

    /// Clear one-shot requests after a tick used them
    pub fn consumed(&mut self) {
        self.dash_requested = false;
        self.pause_requested = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dom_keys() {
        assert_eq!(Key::from_dom("W"), Some(Key::Up));
        assert_eq!(Key::from_dom("ArrowLeft"), Some(Key::Left));
        assert_eq!(Key::from_dom(" "), Some(Key::Dash));
        assert_eq!(Key::from_dom("Escape"), Some(Key::Pause));
        assert_eq!(Key::from_dom("q"), None);
    }

    #[test]
    fn test_one_shots_latch_until_consumed() {
        let mut input = InputState::new();
        input.key_down(Key::Dash);
        input.key_up(Key::Dash);
        // Released before the frame, still delivered
        assert!(input.snapshot().dash);
        assert!(input.snapshot().dash);
        input.consumed();
        assert!(!input.snapshot().dash);
    }

    #[test]
    fn test_held_keys_survive_consume() {
        let mut input = InputState::new();
        input.key_down(Key::Left);
        input.set_fire(true);
        input.consumed();
        let tick = input.snapshot();
        assert!(tick.move_left);
        assert!(tick.fire);
        assert_eq!(tick.intent(), Vec2::new(-1.0, 0.0));
    }

    #[test]
    fn test_idle_toggle() {
        let mut input = InputState::new();
        input.key_down(Key::Idle);
        assert!(input.idle_mode());
        input.key_down(Key::Idle);
        assert!(!input.idle_mode());
    }

    #[test]
    fn test_non_finite_pointer_ignored() {
        let mut input = InputState::new();
        input.pointer_move(10.0, 20.0);
        input.pointer_move(f32::NAN, 5.0);
        assert_eq!(input.snapshot().aim, Vec2::new(10.0, 20.0));
    }
}
