//! Board-agnostic control core for the pan/tilt mount firmware
//!
//! This crate contains all application logic that does not depend on
//! specific hardware implementations:
//!
//! - Calibration settings and their compiled-in defaults
//! - Bounded output queue for the throttled wireless channel
//! - Movement engine (per-axis angle tracking, reversal, clamping)
//! - Input arbitration (joystick deadzone, button press classification)
//! - Auto-pan sweep state machine
//! - The control cycle that ties the pieces together once per tick
//!
//! Hardware enters through [`controller::CycleInputs`] (one snapshot per
//! cycle) and the [`traits::Actuator`] seam; everything here runs and
//! tests on the host.

#![no_std]
#![deny(unsafe_code)]

pub mod config;
pub mod controller;
pub mod input;
pub mod motion;
pub mod queue;
pub mod sweep;
pub mod traits;
