//! Movement engine
//!
//! Per-axis angle tracking with clamping, mounting reversal, and the
//! logical/physical split used for operator-facing reporting.

pub mod axis;

pub use axis::{Axis, AxisState, Direction, ANGLE_MAX};
