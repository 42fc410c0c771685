//! Hardware abstraction traits
//!
//! The seam between the control core and board-specific drivers.

pub mod actuator;

pub use actuator::Actuator;
