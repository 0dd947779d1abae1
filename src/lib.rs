//! CHIP-8 virtual machine with a terminal front end.
//!
//! ## Design
//!
//! * [`Machine`] owns every byte of interpreter state and advances it one
//!   [`step`](Machine::step) at a time; whoever holds the machine decides
//!   the cadence
//! * host concerns stay outside the core: rendering samples the exported
//!   framebuffer, key handling answers [`Keypad`] queries, sound follows
//!   the sound timer
//! * historical interpreter variances are explicit [`Quirks`], never baked
//!   in silently
//! * faults are fatal; the driver decides whether to halt or reset

#![forbid(unsafe_code)]

/// terminal rendering of the framebuffer
pub mod display;
/// fatal machine faults
pub mod error;
/// keyboard events mapped onto the 16-key pad
pub mod input;
/// the pad query interface the machine polls
pub mod keypad;
/// interpreter state, loading and the step engine
pub mod machine;
/// opcode field extraction
pub mod opcode;
/// historical interpreter variances
pub mod quirks;
/// the buzzer
pub mod sound;

// instruction dispatch and bodies, an impl on Machine
mod exec;

pub use error::Fault;
pub use keypad::{Keypad, NoKeys};
pub use machine::{FrameBuffer, Machine, SCREEN_HEIGHT, SCREEN_WIDTH};
pub use quirks::Quirks;
