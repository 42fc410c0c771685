//! Control cycle orchestration
//!
//! The controller is the single owner of all mutable state (calibration,
//! axes, button, sweep, output queue) and runs one full control cycle per
//! tick:
//!
//! 1. at most one command line from each text channel
//! 2. joystick and button sampling
//! 3. auto-pan sweep advance
//! 4. one throttled drain of the wireless output queue
//!
//! Within a tick, a channel command writes the angle before the joystick
//! check runs, so a simultaneous stick deflection applies afterward and
//! can override it. A test pins that ordering.

use core::fmt::Write;

use heapless::Vec;

use pantilt_protocol::{Command, CommandError, Line};

use crate::config::CalibrationProfile;
use crate::input::button::{ButtonEvent, ButtonMonitor};
use crate::input::joystick::{self, SWEEP_DEADZONE};
use crate::motion::{Axis, AxisState, Direction};
use crate::queue::OutputQueue;
use crate::sweep::SweepState;
use crate::traits::Actuator;

/// Control cycle period; the firmware ticks at this rate
pub const CYCLE_INTERVAL_MS: u32 = 10;

/// Wireless output queue capacity, in lines
pub const QUEUE_CAPACITY: usize = 50;

/// Minimum interval between wireless sends
pub const RADIO_MIN_SEND_INTERVAL_MS: u32 = 200;

/// Most console lines one cycle can produce
pub const MAX_CYCLE_LINES: usize = 16;

/// Fixed properties of the mounted hardware
#[derive(Debug, Clone, Copy, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MountCapabilities {
    /// A tilt actuator is fitted
    pub has_tilt: bool,
    /// The pan actuator is mounted backwards
    pub pan_reversed: bool,
    /// The tilt actuator is mounted backwards
    pub tilt_reversed: bool,
}

/// Where a command or event originated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Source {
    /// Wired console channel
    Console,
    /// Wireless channel
    Radio,
    /// Analog stick
    Joystick,
    /// Push button
    Button,
}

impl Source {
    /// Label used in status lines
    pub fn label(self) -> &'static str {
        match self {
            Source::Console => "Serial",
            Source::Radio => "Bluetooth",
            Source::Joystick => "Joystick",
            Source::Button => "Button",
        }
    }
}

/// Per-cycle snapshot of every input
#[derive(Debug, Clone)]
pub struct CycleInputs {
    /// Milliseconds since boot (wrapping)
    pub now_ms: u32,
    /// Complete line read from the console this cycle, if any
    pub console_line: Option<Line>,
    /// Complete line read from the wireless channel this cycle, if any
    pub radio_line: Option<Line>,
    /// Raw joystick X reading
    pub stick_x: u16,
    /// Raw joystick Y reading (ignored on pan-only builds)
    pub stick_y: u16,
    /// Debounced button level
    pub button_pressed: bool,
    /// Wireless peer attached
    pub radio_peer: bool,
}

/// Everything one cycle asks the firmware to do
#[derive(Debug, Default)]
pub struct CycleOutput {
    /// Lines for the console, in emission order
    pub console: Vec<Line, MAX_CYCLE_LINES>,
    /// At most one line drained for the wireless channel
    pub radio: Option<Line>,
    /// A press edge was seen; dwell before the next cycle
    pub debounce_dwell: bool,
}

impl CycleOutput {
    fn new() -> Self {
        Self::default()
    }
}

/// Single-owner controller state
pub struct Controller {
    caps: MountCapabilities,
    cal: CalibrationProfile,
    pan: AxisState,
    tilt: Option<AxisState>,
    button: ButtonMonitor,
    sweep: SweepState,
    radio_queue: OutputQueue<Line, QUEUE_CAPACITY>,
}

impl Controller {
    /// Create a controller resting at neutral
    ///
    /// `button_pressed_at_boot` must be the real sampled level so a held
    /// button does not register a press edge on the first cycle.
    pub fn new(caps: MountCapabilities, button_pressed_at_boot: bool) -> Self {
        let cal = CalibrationProfile::defaults();
        let tilt = caps
            .has_tilt
            .then(|| AxisState::new(cal.neutral_angle, caps.tilt_reversed));
        Self {
            caps,
            pan: AxisState::new(cal.neutral_angle, caps.pan_reversed),
            tilt,
            button: ButtonMonitor::new(button_pressed_at_boot),
            sweep: SweepState::new(),
            radio_queue: OutputQueue::new(),
            cal,
        }
    }

    /// Greeting lines logged at boot
    ///
    /// Returned for the console and queued for the wireless channel, so a
    /// peer that attaches later still sees them.
    pub fn boot_greeting(&mut self) -> Vec<Line, 4> {
        let mut lines = Vec::new();
        for text in [
            "Pan/tilt mount ready.",
            "Commands: LEFT RIGHT UP DOWN RESET AUTOPAN P0..P180 C S INFO",
            "Short press toggles auto panning, hold 2s to reset settings.",
        ] {
            let mut line = Line::new();
            let _ = line.push_str(text);
            self.radio_queue.enqueue(line.clone());
            let _ = lines.push(line);
        }
        lines
    }

    /// Current calibration values
    pub fn calibration(&self) -> &CalibrationProfile {
        &self.cal
    }

    /// Pan axis state
    pub fn pan(&self) -> &AxisState {
        &self.pan
    }

    /// Tilt axis state, if fitted
    pub fn tilt(&self) -> Option<&AxisState> {
        self.tilt.as_ref()
    }

    /// Sweep state
    pub fn sweep(&self) -> &SweepState {
        &self.sweep
    }

    /// Lines waiting for the wireless channel
    pub fn radio_backlog(&self) -> usize {
        self.radio_queue.len()
    }

    /// Run one full control cycle
    pub fn tick(
        &mut self,
        inputs: &CycleInputs,
        pan_servo: &mut dyn Actuator,
        mut tilt_servo: Option<&mut (dyn Actuator + '_)>,
    ) -> CycleOutput {
        let mut out = CycleOutput::new();

        // Channel commands first; their angle writes can be overridden by
        // the joystick check below (see module docs).
        if let Some(line) = inputs.console_line.clone() {
            self.handle_line(
                &line,
                Source::Console,
                inputs.now_ms,
                pan_servo,
                tilt_servo.as_deref_mut(),
                &mut out,
            );
        }
        if let Some(line) = inputs.radio_line.clone() {
            self.handle_line(
                &line,
                Source::Radio,
                inputs.now_ms,
                pan_servo,
                tilt_servo.as_deref_mut(),
                &mut out,
            );
        }

        self.service_button(inputs, pan_servo, tilt_servo.as_deref_mut(), &mut out);
        self.service_joystick(inputs, pan_servo, tilt_servo.as_deref_mut(), &mut out);
        self.service_sweep(inputs.now_ms, pan_servo, &mut out);

        out.radio =
            self.radio_queue
                .drain_if_ready(inputs.now_ms, inputs.radio_peer, RADIO_MIN_SEND_INTERVAL_MS);
        out
    }

    /// Parse and dispatch one channel line
    fn handle_line(
        &mut self,
        line: &Line,
        source: Source,
        now_ms: u32,
        pan_servo: &mut dyn Actuator,
        tilt_servo: Option<&mut (dyn Actuator + '_)>,
        out: &mut CycleOutput,
    ) {
        match Command::parse(line) {
            Ok(command) => {
                self.apply_command(command, source, now_ms, pan_servo, tilt_servo, out)
            }
            Err(CommandError::Unknown) => {
                self.emit_fmt(out, format_args!("Unknown command: {}", line.trim()));
            }
            Err(CommandError::OutOfRange {
                token,
                value,
                min,
                max,
            }) => {
                self.emit_fmt(
                    out,
                    format_args!(
                        "Error: {} value {} out of range ({}..{})",
                        token, value, min, max
                    ),
                );
            }
        }
    }

    fn apply_command(
        &mut self,
        command: Command,
        source: Source,
        now_ms: u32,
        pan_servo: &mut dyn Actuator,
        tilt_servo: Option<&mut (dyn Actuator + '_)>,
        out: &mut CycleOutput,
    ) {
        match command {
            Command::Left => {
                self.manual_move(Axis::Pan, Direction::Negative, source, pan_servo, tilt_servo, out)
            }
            Command::Right => {
                self.manual_move(Axis::Pan, Direction::Positive, source, pan_servo, tilt_servo, out)
            }
            Command::Up => {
                self.manual_move(Axis::Tilt, Direction::Positive, source, pan_servo, tilt_servo, out)
            }
            Command::Down => {
                self.manual_move(Axis::Tilt, Direction::Negative, source, pan_servo, tilt_servo, out)
            }
            Command::Reset => self.reset_settings(source, pan_servo, tilt_servo, out),
            Command::AutoPan => self.toggle_sweep(now_ms, out),
            Command::SetPan(angle) => {
                let physical = self.pan.set_logical(angle);
                pan_servo.set_angle(physical);
                let display = self.pan.display_angle();
                self.emit_fmt(
                    out,
                    format_args!(
                        "Channel: {} | Command: P{} | Position: {}",
                        source.label(),
                        angle,
                        display
                    ),
                );
            }
            Command::Center => {
                let physical = self.pan.set_logical(90);
                pan_servo.set_angle(physical);
                self.emit_fmt(
                    out,
                    format_args!("Channel: {} | Command: C | Position: 90", source.label()),
                );
            }
            Command::Hold => self.emit_str(out, "Holding position."),
            Command::Info => self.emit_info(out),
            Command::SetCenterX(value) => {
                self.cal.center_x = value;
                self.emit_fmt(out, format_args!("center_x set to {}", value));
            }
            Command::SetCenterY(value) => {
                self.cal.center_y = value;
                self.emit_fmt(out, format_args!("center_y set to {}", value));
            }
            Command::SetDeadzone(value) => {
                self.cal.deadzone = value;
                self.emit_fmt(out, format_args!("deadzone set to {}", value));
            }
            Command::SetNeutral(value) => {
                self.cal.neutral_angle = value;
                self.emit_fmt(out, format_args!("neutral set to {}", value));
            }
            Command::SetManualStep(value) => {
                self.cal.manual_step = value;
                self.emit_fmt(out, format_args!("manual_step set to {}", value));
            }
            Command::SetAutoStep(value) => {
                self.cal.auto_step = value;
                self.emit_fmt(out, format_args!("auto_step set to {}", value));
            }
        }
    }

    /// Apply one manual step and report it
    fn manual_move(
        &mut self,
        axis: Axis,
        direction: Direction,
        source: Source,
        pan_servo: &mut dyn Actuator,
        tilt_servo: Option<&mut (dyn Actuator + '_)>,
        out: &mut CycleOutput,
    ) {
        let step = self.cal.manual_step;
        match axis {
            Axis::Pan => {
                let angle = self.pan.step(direction, step);
                pan_servo.set_angle(angle);
                let display = self.pan.display_angle();
                self.emit_move_status(source, move_label(axis, direction), display, out);
            }
            Axis::Tilt => {
                let moved = match (self.tilt.as_mut(), tilt_servo) {
                    (Some(tilt), Some(servo)) => {
                        let angle = tilt.step(direction, step);
                        servo.set_angle(angle);
                        Some(tilt.display_angle())
                    }
                    _ => None,
                };
                match moved {
                    Some(display) => {
                        self.emit_move_status(source, move_label(axis, direction), display, out)
                    }
                    None => self.emit_str(out, "Tilt axis not available"),
                }
            }
        }
    }

    fn emit_move_status(&mut self, source: Source, label: &str, display: u8, out: &mut CycleOutput) {
        self.emit_fmt(
            out,
            format_args!(
                "Channel: {} | Command: {} | Position: {}",
                source.label(),
                label,
                display
            ),
        );
    }

    /// Toggle the sweep, seeding its direction on activation
    fn toggle_sweep(&mut self, now_ms: u32, out: &mut CycleOutput) {
        if self.sweep.is_active() {
            self.sweep.deactivate();
            self.emit_str(out, "AUTO PANNING -> OFF");
        } else {
            self.sweep
                .activate(self.pan.last_manual_direction(), self.pan.reversed(), now_ms);
            self.emit_str(out, "AUTO PANNING -> ON");
        }
    }

    /// Restore compiled-in settings and re-center every axis
    fn reset_settings(
        &mut self,
        source: Source,
        pan_servo: &mut dyn Actuator,
        tilt_servo: Option<&mut (dyn Actuator + '_)>,
        out: &mut CycleOutput,
    ) {
        self.cal.reset();

        self.pan.recenter(self.cal.neutral_angle);
        self.pan.clear_last_manual();
        pan_servo.set_angle(self.pan.angle());

        if let Some(tilt) = self.tilt.as_mut() {
            tilt.recenter(self.cal.neutral_angle);
            tilt.clear_last_manual();
            if let Some(servo) = tilt_servo {
                servo.set_angle(tilt.angle());
            }
        }

        self.sweep.reset();

        self.emit_str(out, "========================================");
        self.emit_str(out, "       SETTINGS RESET TO DEFAULTS       ");
        self.emit_str(out, "========================================");
        let display = self.pan.display_angle();
        self.emit_fmt(
            out,
            format_args!(
                "Channel: {} | Command: RESET | Position: {}",
                source.label(),
                display
            ),
        );
    }

    /// Sample the button and act on the classified press
    fn service_button(
        &mut self,
        inputs: &CycleInputs,
        pan_servo: &mut dyn Actuator,
        tilt_servo: Option<&mut (dyn Actuator + '_)>,
        out: &mut CycleOutput,
    ) {
        let sample = self.button.update(inputs.button_pressed, inputs.now_ms);
        if sample.press_edge {
            out.debounce_dwell = true;
        }
        match sample.event {
            Some(ButtonEvent::LongPress) => {
                self.reset_settings(Source::Button, pan_servo, tilt_servo, out)
            }
            Some(ButtonEvent::ShortPress) => self.toggle_sweep(inputs.now_ms, out),
            None => {}
        }
    }

    /// Evaluate both stick axes; any deflection preempts the sweep
    fn service_joystick(
        &mut self,
        inputs: &CycleInputs,
        pan_servo: &mut dyn Actuator,
        mut tilt_servo: Option<&mut (dyn Actuator + '_)>,
        out: &mut CycleOutput,
    ) {
        if let Some(deflection) =
            joystick::evaluate(inputs.stick_x, self.cal.center_x, self.effective_deadzone())
        {
            self.preempt_sweep(out);
            self.manual_move(
                Axis::Pan,
                deflection.direction,
                Source::Joystick,
                pan_servo,
                tilt_servo.as_deref_mut(),
                out,
            );
        }

        if self.caps.has_tilt {
            if let Some(deflection) =
                joystick::evaluate(inputs.stick_y, self.cal.center_y, self.effective_deadzone())
            {
                self.preempt_sweep(out);
                self.manual_move(
                    Axis::Tilt,
                    deflection.direction,
                    Source::Joystick,
                    pan_servo,
                    tilt_servo,
                    out,
                );
            }
        }
    }

    /// Deadzone in effect this cycle; widened while the sweep runs
    fn effective_deadzone(&self) -> u16 {
        if self.sweep.is_active() {
            SWEEP_DEADZONE
        } else {
            self.cal.deadzone
        }
    }

    fn preempt_sweep(&mut self, out: &mut CycleOutput) {
        if self.sweep.is_active() {
            self.sweep.deactivate();
            self.emit_str(out, "Joystick moved -> AUTO PANNING DISABLED");
        }
    }

    /// Advance the sweep; every step logs locally, every tenth by radio
    fn service_sweep(&mut self, now_ms: u32, pan_servo: &mut dyn Actuator, out: &mut CycleOutput) {
        if let Some(step) = self.sweep.tick(now_ms, self.cal.auto_step, &mut self.pan) {
            pan_servo.set_angle(step.angle);

            let mut line = Line::new();
            let _ = write!(line, "Auto -> {}", self.pan.display_angle());
            if step.report_radio {
                self.radio_queue.enqueue(line.clone());
            }
            let _ = out.console.push(line);
        }
    }

    /// Emit the calibration snapshot
    fn emit_info(&mut self, out: &mut CycleOutput) {
        let cal = self.cal;
        self.emit_str(out, "Calibration:");
        self.emit_fmt(out, format_args!("  center_x: {}", cal.center_x));
        self.emit_fmt(out, format_args!("  center_y: {}", cal.center_y));
        self.emit_fmt(out, format_args!("  deadzone: {}", cal.deadzone));
        self.emit_fmt(out, format_args!("  neutral: {}", cal.neutral_angle));
        self.emit_fmt(out, format_args!("  manual_step: {}", cal.manual_step));
        self.emit_fmt(out, format_args!("  auto_step: {}", cal.auto_step));

        let pan_display = self.pan.display_angle();
        let pan_reversed = self.pan.reversed();
        self.emit_fmt(
            out,
            format_args!(
                "  pan: {} deg{}",
                pan_display,
                if pan_reversed { " (reversed)" } else { "" }
            ),
        );
        match self.tilt.as_ref().map(|t| (t.display_angle(), t.reversed())) {
            Some((display, reversed)) => self.emit_fmt(
                out,
                format_args!(
                    "  tilt: {} deg{}",
                    display,
                    if reversed { " (reversed)" } else { "" }
                ),
            ),
            None => self.emit_str(out, "  tilt: absent"),
        }
        let dropped = self.radio_queue.dropped();
        self.emit_fmt(out, format_args!("  dropped_lines: {}", dropped));
    }

    /// Log a line: always to the console, queued for the radio
    fn emit(&mut self, out: &mut CycleOutput, line: Line) {
        let _ = out.console.push(line.clone());
        self.radio_queue.enqueue(line);
    }

    fn emit_str(&mut self, out: &mut CycleOutput, text: &str) {
        let mut line = Line::new();
        let _ = line.push_str(text);
        self.emit(out, line);
    }

    fn emit_fmt(&mut self, out: &mut CycleOutput, args: core::fmt::Arguments<'_>) {
        let mut line = Line::new();
        let _ = line.write_fmt(args);
        self.emit(out, line);
    }
}

/// Status-line token for a manual move
fn move_label(axis: Axis, direction: Direction) -> &'static str {
    match (axis, direction) {
        (Axis::Pan, Direction::Negative) => "LEFT",
        (Axis::Pan, Direction::Positive) => "RIGHT",
        (Axis::Tilt, Direction::Positive) => "UP",
        (Axis::Tilt, Direction::Negative) => "DOWN",
    }
}
