//! Hobby servo driver on RP2040 PWM
//!
//! Standard 50 Hz frame with a 500-2400 µs pulse mapped linearly over
//! 0..=180 degrees. Each servo sits on channel A of its own PWM slice;
//! the slice runs at 1 MHz so compare values are pulse widths in µs.

use embassy_rp::pwm::{Config as PwmConfig, Pwm};

use pantilt_core::traits::Actuator;

/// PWM frame period in µs (50 Hz)
pub const SERVO_PERIOD_US: u16 = 20_000;

/// Pulse width commanding 0 degrees
pub const SERVO_MIN_PULSE_US: u16 = 500;

/// Pulse width commanding 180 degrees
pub const SERVO_MAX_PULSE_US: u16 = 2400;

/// PWM slice configuration for a servo output
pub fn servo_pwm_config() -> PwmConfig {
    let mut config = PwmConfig::default();
    // 125 MHz system clock / 125 = 1 MHz; one counter tick per µs
    config.divider = 125u8.into();
    config.top = SERVO_PERIOD_US - 1;
    config.compare_a = 0; // No pulse until the first commanded angle
    config
}

/// One servo on PWM channel A
pub struct PwmServo<'d> {
    pwm: Pwm<'d>,
    config: PwmConfig,
}

impl<'d> PwmServo<'d> {
    /// Wrap a PWM slice already configured by [`servo_pwm_config`]
    pub fn new(pwm: Pwm<'d>) -> Self {
        Self {
            pwm,
            config: servo_pwm_config(),
        }
    }
}

impl Actuator for PwmServo<'_> {
    fn set_angle(&mut self, angle: u8) {
        let angle = u32::from(angle.min(180));
        let span = u32::from(SERVO_MAX_PULSE_US - SERVO_MIN_PULSE_US);
        let pulse = u32::from(SERVO_MIN_PULSE_US) + span * angle / 180;
        self.config.compare_a = pulse as u16;
        self.pwm.set_config(&self.config);
    }
}
