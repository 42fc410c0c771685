//! Radio UART tasks (wireless channel)
//!
//! Same shape as the console tasks, but talking to the Bluetooth serial
//! module. Throttling and peer gating live in the control core's output
//! queue; these tasks only move complete lines.

use defmt::*;
use embassy_rp::uart::{BufferedUartRx, BufferedUartTx};
use embedded_io_async::{Read, Write};

use pantilt_protocol::LineReader;

use crate::channels::{RADIO_RX, RADIO_TX};

/// Buffer size for UART reads
const RX_BUF_SIZE: usize = 64;

/// Radio RX task - reassembles command lines from the wireless channel
#[embassy_executor::task]
pub async fn radio_rx_task(mut rx: BufferedUartRx) {
    info!("Radio RX task started");

    let mut reader = LineReader::new();
    let mut buf = [0u8; RX_BUF_SIZE];

    loop {
        match rx.read(&mut buf).await {
            Ok(n) if n > 0 => {
                for &byte in &buf[..n] {
                    if let Some(line) = reader.feed(byte) {
                        if RADIO_RX.try_send(line).is_err() {
                            warn!("Radio line channel full, dropping line");
                        }
                    }
                }
            }
            Ok(_) => {
                // No bytes read, continue
            }
            Err(e) => {
                warn!("Radio read error: {:?}", e);
            }
        }
    }
}

/// Radio TX task - writes drained queue lines to the wireless module
#[embassy_executor::task]
pub async fn radio_tx_task(mut tx: BufferedUartTx) {
    info!("Radio TX task started");

    loop {
        let line = RADIO_TX.receive().await;
        trace!("Radio out: {}", line.as_str());
        if tx.write_all(line.as_bytes()).await.is_err() {
            warn!("Radio write error");
            continue;
        }
        if tx.write_all(b"\r\n").await.is_err() {
            warn!("Radio write error");
        }
    }
}
