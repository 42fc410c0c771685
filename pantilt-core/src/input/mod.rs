//! Input arbitration
//!
//! Joystick deadzone evaluation and button press classification. Both are
//! sampled once per control cycle from raw readings; no interrupts.

pub mod button;
pub mod joystick;

pub use button::{ButtonEvent, ButtonMonitor, ButtonSample, DEBOUNCE_DWELL_MS, LONG_PRESS_MS};
pub use joystick::{evaluate, AxisDeflection, SWEEP_DEADZONE};
