//! Control cycle task
//!
//! Owns every direct input (ADC joystick, button, radio STATE pin) and
//! both servos, and runs one core control cycle per tick. The UART tasks
//! feed it complete lines through the static channels; reads here are
//! non-blocking so a silent channel never stalls the cycle.

use defmt::*;
use embassy_rp::adc::{Adc, Async, Channel as AdcChannel};
use embassy_rp::gpio::Input;
use embassy_time::{Duration, Instant, Ticker, Timer};

use pantilt_core::controller::{
    Controller, CycleInputs, CycleOutput, MountCapabilities, CYCLE_INTERVAL_MS,
};
use pantilt_core::input::DEBOUNCE_DWELL_MS;

use crate::channels::{CONSOLE_RX, CONSOLE_TX, RADIO_RX, RADIO_TX};
use crate::servo::PwmServo;

/// Control task - runs the full control cycle on a fixed tick
#[embassy_executor::task]
pub async fn control_task(
    mut adc: Adc<'static, Async>,
    mut stick_x: AdcChannel<'static>,
    mut stick_y: AdcChannel<'static>,
    button: Input<'static>,
    radio_state: Input<'static>,
    mut pan_servo: PwmServo<'static>,
    mut tilt_servo: PwmServo<'static>,
) {
    info!("Control task started");

    let capabilities = MountCapabilities {
        has_tilt: true,
        pan_reversed: false,
        tilt_reversed: false,
    };

    // Seed the button state from the real level so a button held during
    // power-up does not toggle the sweep on the first cycle.
    let mut controller = Controller::new(capabilities, button.is_low());

    // Rest at neutral until the first command
    pan_servo.set_angle(controller.pan().angle());
    if let Some(tilt) = controller.tilt() {
        tilt_servo.set_angle(tilt.angle());
    }

    for line in controller.boot_greeting() {
        let _ = CONSOLE_TX.try_send(line);
    }

    let start = Instant::now();
    let mut ticker = Ticker::every(Duration::from_millis(u64::from(CYCLE_INTERVAL_MS)));

    loop {
        ticker.next().await;
        let now_ms = start.elapsed().as_millis() as u32;

        let x = read_stick(&mut adc, &mut stick_x, controller.calibration().center_x).await;
        let y = read_stick(&mut adc, &mut stick_y, controller.calibration().center_y).await;

        let inputs = CycleInputs {
            now_ms,
            console_line: CONSOLE_RX.try_receive().ok(),
            radio_line: RADIO_RX.try_receive().ok(),
            stick_x: x,
            stick_y: y,
            button_pressed: button.is_low(),
            radio_peer: radio_state.is_high(),
        };

        let CycleOutput {
            console,
            radio,
            debounce_dwell,
        } = controller.tick(&inputs, &mut pan_servo, Some(&mut tilt_servo));

        for line in console {
            if CONSOLE_TX.try_send(line).is_err() {
                warn!("Console TX backlog full, dropping line");
            }
        }
        if let Some(line) = radio {
            if RADIO_TX.try_send(line).is_err() {
                warn!("Radio TX backlog full, dropping line");
            }
        }

        if debounce_dwell {
            Timer::after_millis(u64::from(DEBOUNCE_DWELL_MS)).await;
        }
    }
}

/// Sample one stick axis; a failed read counts as centered (no motion)
async fn read_stick(adc: &mut Adc<'static, Async>, channel: &mut AdcChannel<'static>, center: u16) -> u16 {
    match adc.read(channel).await {
        Ok(raw) => raw,
        Err(e) => {
            warn!("ADC read failed: {:?}", e);
            center
        }
    }
}
