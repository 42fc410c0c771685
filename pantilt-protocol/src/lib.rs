//! Text command protocol for the pan/tilt mount controller
//!
//! This crate defines the line-oriented command protocol spoken on both
//! serial channels (the wired console and the wireless link). The protocol
//! is plain newline-terminated ASCII; there is no binary framing.
//!
//! # Command vocabulary
//!
//! ```text
//! LEFT / RIGHT          manual pan move, one calibrated step
//! UP / DOWN             manual tilt move (two-axis builds)
//! RESET                 restore compiled-in settings
//! AUTOPAN               toggle the autonomous sweep
//! P<0..180>             absolute pan angle
//! C                     center pan to 90
//! S                     hold position (acknowledged no-op)
//! CAL_X:<0..4095>       joystick X center
//! CAL_Y:<0..4095>       joystick Y center
//! CAL_DZ:<0..500>       joystick deadzone
//! CAL_N:<0..180>        neutral angle
//! PAN_MP:<1..20>        manual step size
//! PAN_AP:<1..20>        auto sweep step size
//! INFO                  dump the calibration snapshot
//! ```
//!
//! Tokens are case-sensitive and must be preserved exactly for
//! compatibility with existing remote controllers.

#![no_std]
#![deny(unsafe_code)]

pub mod command;
pub mod line;

pub use command::{Command, CommandError};
pub use line::{Line, LineReader, MAX_LINE_LEN};
