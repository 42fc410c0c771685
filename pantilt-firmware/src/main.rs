//! Pan/tilt mount controller firmware for RP2040 boards
//!
//! Wires the board-agnostic control core to real peripherals: an analog
//! joystick with push button, one or two hobby servos, a wired console
//! UART, and a Bluetooth serial module on a second UART whose STATE pin
//! reports peer connectivity.

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::adc::{Adc, Channel as AdcChannel, InterruptHandler as AdcInterruptHandler};
use embassy_rp::bind_interrupts;
use embassy_rp::gpio::{Input, Pull};
use embassy_rp::peripherals::{UART0, UART1};
use embassy_rp::pwm::Pwm;
use embassy_rp::uart::{BufferedInterruptHandler, Config as UartConfig, Uart};
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

mod channels;
mod servo;
mod tasks;

use servo::{servo_pwm_config, PwmServo};

bind_interrupts!(struct Irqs {
    UART0_IRQ => BufferedInterruptHandler<UART0>;
    UART1_IRQ => BufferedInterruptHandler<UART1>;
    ADC_IRQ_FIFO => AdcInterruptHandler;
});

// Static cells for UART buffers (must live forever)
static CONSOLE_TX_BUF: StaticCell<[u8; 256]> = StaticCell::new();
static CONSOLE_RX_BUF: StaticCell<[u8; 256]> = StaticCell::new();
static RADIO_TX_BUF: StaticCell<[u8; 256]> = StaticCell::new();
static RADIO_RX_BUF: StaticCell<[u8; 256]> = StaticCell::new();

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("Pantilt firmware starting...");

    let p = embassy_rp::init(Default::default());
    info!("Peripherals initialized");

    // Console UART (local wired channel), 115200 8N1
    let uart_config = UartConfig::default();
    let tx_buf = CONSOLE_TX_BUF.init([0u8; 256]);
    let rx_buf = CONSOLE_RX_BUF.init([0u8; 256]);
    let uart = Uart::new_blocking(p.UART0, p.PIN_0, p.PIN_1, uart_config);
    let uart = uart.into_buffered(Irqs, tx_buf, rx_buf);
    let (console_tx, console_rx) = uart.split();

    // Radio UART to the Bluetooth serial module (wireless channel)
    let tx_buf = RADIO_TX_BUF.init([0u8; 256]);
    let rx_buf = RADIO_RX_BUF.init([0u8; 256]);
    let uart = Uart::new_blocking(p.UART1, p.PIN_4, p.PIN_5, UartConfig::default());
    let uart = uart.into_buffered(Irqs, tx_buf, rx_buf);
    let (radio_tx, radio_rx) = uart.split();

    // Module STATE output, high while a peer is connected
    let radio_state = Input::new(p.PIN_6, Pull::Down);

    info!("UARTs initialized");

    // Joystick on the ADC pins, button on GPIO15 with pull-up (active low)
    let adc = Adc::new(p.ADC, Irqs, embassy_rp::adc::Config::default());
    let stick_x = AdcChannel::new_pin(p.PIN_26, Pull::None);
    let stick_y = AdcChannel::new_pin(p.PIN_27, Pull::None);
    let button = Input::new(p.PIN_15, Pull::Up);

    // Servos: 50 Hz PWM, one slice each, channel A
    let pan_pwm = Pwm::new_output_a(p.PWM_SLICE0, p.PIN_16, servo_pwm_config());
    let tilt_pwm = Pwm::new_output_a(p.PWM_SLICE1, p.PIN_18, servo_pwm_config());
    let pan_servo = PwmServo::new(pan_pwm);
    let tilt_servo = PwmServo::new(tilt_pwm);

    info!("Joystick and servos initialized");

    spawner.spawn(tasks::console_rx_task(console_rx)).unwrap();
    spawner.spawn(tasks::console_tx_task(console_tx)).unwrap();
    spawner.spawn(tasks::radio_rx_task(radio_rx)).unwrap();
    spawner.spawn(tasks::radio_tx_task(radio_tx)).unwrap();
    spawner
        .spawn(tasks::control_task(
            adc,
            stick_x,
            stick_y,
            button,
            radio_state,
            pan_servo,
            tilt_servo,
        ))
        .unwrap();

    info!("All tasks spawned, firmware running");

    // Main task has nothing else to do - all work happens in spawned tasks
    loop {
        embassy_time::Timer::after_secs(60).await;
        trace!("Main loop heartbeat");
    }
}
