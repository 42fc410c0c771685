//! Runtime settings
//!
//! Settings live for the process lifetime only; there is no persistence.
//! A reset restores the compiled-in defaults below.

pub mod calibration;

pub use calibration::*;
