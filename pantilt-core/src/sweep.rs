//! Auto-pan sweep state machine
//!
//! When active, advances the pan axis at a fixed cadence and bounces at
//! the travel limits. Activation seeds the direction from the last manual
//! pan move so the sweep continues the operator's heading; the recorded
//! direction is logical, so a reversed mount flips it back into hardware
//! space.

use crate::motion::{AxisState, Direction, ANGLE_MAX};

/// Milliseconds between sweep steps
pub const SWEEP_INTERVAL_MS: u32 = 80;

/// Only every Nth sweep step is queued for the wireless channel
pub const RADIO_REPORT_EVERY: u32 = 10;

/// One executed sweep step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SweepStep {
    /// New physical pan angle
    pub angle: u8,
    /// True when this step should also be queued for the wireless channel
    pub report_radio: bool,
}

/// Sweep mode state
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SweepState {
    active: bool,
    direction: Direction,
    last_step_ms: u32,
    step_count: u32,
}

impl SweepState {
    /// Create an idle sweep, heading positive by default
    pub const fn new() -> Self {
        Self {
            active: false,
            direction: Direction::Positive,
            last_step_ms: 0,
            step_count: 0,
        }
    }

    /// Whether the sweep is running
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Current hardware-space sweep direction
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Start sweeping, seeding the direction from the last manual move
    ///
    /// `seed` is the logical direction of the last manual pan move (if
    /// any); `reversed` maps it into hardware space. Without a seed the
    /// sweep heads positive.
    pub fn activate(&mut self, seed: Option<Direction>, reversed: bool, now_ms: u32) {
        self.direction = match seed {
            Some(dir) if reversed => dir.invert(),
            Some(dir) => dir,
            None => Direction::Positive,
        };
        self.active = true;
        self.last_step_ms = now_ms;
    }

    /// Stop sweeping; the direction is kept for inspection
    pub fn deactivate(&mut self) {
        self.active = false;
    }

    /// Stop sweeping and restore the default heading (settings reset)
    pub fn reset(&mut self) {
        self.active = false;
        self.direction = Direction::Positive;
        self.step_count = 0;
    }

    /// Advance the sweep if its cadence interval elapsed
    pub fn tick(&mut self, now_ms: u32, auto_step: u8, pan: &mut AxisState) -> Option<SweepStep> {
        if !self.active {
            return None;
        }
        if now_ms.wrapping_sub(self.last_step_ms) < SWEEP_INTERVAL_MS {
            return None;
        }
        self.last_step_ms = now_ms;

        let angle = pan.offset(self.direction.sign() * i16::from(auto_step));

        // Bounce at the travel limits
        if angle >= ANGLE_MAX {
            self.direction = Direction::Negative;
        } else if angle == 0 {
            self.direction = Direction::Positive;
        }

        self.step_count = self.step_count.wrapping_add(1);
        Some(SweepStep {
            angle,
            report_radio: self.step_count % RADIO_REPORT_EVERY == 0,
        })
    }
}

impl Default for SweepState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounces_at_upper_limit() {
        let mut sweep = SweepState::new();
        let mut pan = AxisState::new(170, false);
        sweep.activate(None, false, 0);

        let mut now = 0;
        let mut angles = [0u8; 4];
        for slot in angles.iter_mut() {
            now += SWEEP_INTERVAL_MS;
            *slot = sweep.tick(now, 5, &mut pan).unwrap().angle;
        }

        assert_eq!(angles, [175, 180, 175, 170]);
        assert_eq!(sweep.direction(), Direction::Negative);
    }

    #[test]
    fn test_bounces_at_lower_limit() {
        let mut sweep = SweepState::new();
        let mut pan = AxisState::new(5, false);
        sweep.activate(Some(Direction::Negative), false, 0);

        assert_eq!(sweep.tick(80, 5, &mut pan).unwrap().angle, 0);
        assert_eq!(sweep.direction(), Direction::Positive);
        assert_eq!(sweep.tick(160, 5, &mut pan).unwrap().angle, 5);
    }

    #[test]
    fn test_cadence_is_time_based_not_per_call() {
        let mut sweep = SweepState::new();
        let mut pan = AxisState::new(90, false);
        sweep.activate(None, false, 0);

        // Calls inside the interval do nothing
        assert_eq!(sweep.tick(10, 1, &mut pan), None);
        assert_eq!(sweep.tick(79, 1, &mut pan), None);
        assert!(sweep.tick(80, 1, &mut pan).is_some());
        assert_eq!(sweep.tick(90, 1, &mut pan), None);
        assert!(sweep.tick(160, 1, &mut pan).is_some());
    }

    #[test]
    fn test_direction_seeding() {
        let mut sweep = SweepState::new();

        sweep.activate(Some(Direction::Negative), false, 0);
        assert_eq!(sweep.direction(), Direction::Negative);

        // A reversed mount flips the logical seed into hardware space
        sweep.activate(Some(Direction::Negative), true, 0);
        assert_eq!(sweep.direction(), Direction::Positive);

        sweep.activate(None, true, 0);
        assert_eq!(sweep.direction(), Direction::Positive);
    }

    #[test]
    fn test_radio_report_every_tenth_step() {
        let mut sweep = SweepState::new();
        let mut pan = AxisState::new(90, false);
        sweep.activate(None, false, 0);

        let mut now = 0;
        let mut reported = 0;
        for _ in 0..20 {
            now += SWEEP_INTERVAL_MS;
            if sweep.tick(now, 1, &mut pan).unwrap().report_radio {
                reported += 1;
            }
        }
        assert_eq!(reported, 2);
    }

    #[test]
    fn test_inactive_sweep_does_not_move() {
        let mut sweep = SweepState::new();
        let mut pan = AxisState::new(90, false);

        assert_eq!(sweep.tick(1_000, 5, &mut pan), None);
        assert_eq!(pan.angle(), 90);
    }
}
