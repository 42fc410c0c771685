//! Inter-task communication channels
//!
//! Complete lines flow between the UART tasks and the control task
//! through these static channels. The control core owns the real
//! buffering (its bounded output queue); a full channel here drops the
//! line, it never blocks a producer.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;

use pantilt_protocol::Line;

/// Capacity of the inbound line channels
const RX_CHANNEL_SIZE: usize = 4;

/// Capacity of the outbound line channels
const TX_CHANNEL_SIZE: usize = 8;

/// Lines received on the console UART
pub static CONSOLE_RX: Channel<CriticalSectionRawMutex, Line, RX_CHANNEL_SIZE> = Channel::new();

/// Lines received from the wireless module
pub static RADIO_RX: Channel<CriticalSectionRawMutex, Line, RX_CHANNEL_SIZE> = Channel::new();

/// Lines to write to the console UART
pub static CONSOLE_TX: Channel<CriticalSectionRawMutex, Line, TX_CHANNEL_SIZE> = Channel::new();

/// Lines to write to the wireless module
pub static RADIO_TX: Channel<CriticalSectionRawMutex, Line, TX_CHANNEL_SIZE> = Channel::new();
