//! Platform abstraction layer
//!
//! Host-facing pieces that sit between browser callbacks and the
//! simulation:
//! - Frame timing with the skip-after-suspend rule
//! - Input latching from key/pointer events into `TickInput`

pub mod clock;
pub mod input;

pub use clock::FrameClock;
pub use input::{InputState, Key};
