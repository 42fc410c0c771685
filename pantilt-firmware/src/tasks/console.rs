//! Console UART tasks (local wired channel)
//!
//! The RX task reassembles newline-terminated lines and feeds them to the
//! control task; the TX task writes finished lines back out.

use defmt::*;
use embassy_rp::uart::{BufferedUartRx, BufferedUartTx};
use embedded_io_async::{Read, Write};

use pantilt_protocol::LineReader;

use crate::channels::{CONSOLE_RX, CONSOLE_TX};

/// Buffer size for UART reads
const RX_BUF_SIZE: usize = 64;

/// Console RX task - reassembles command lines from the wired channel
#[embassy_executor::task]
pub async fn console_rx_task(mut rx: BufferedUartRx) {
    info!("Console RX task started");

    let mut reader = LineReader::new();
    let mut buf = [0u8; RX_BUF_SIZE];

    loop {
        match rx.read(&mut buf).await {
            Ok(n) if n > 0 => {
                for &byte in &buf[..n] {
                    if let Some(line) = reader.feed(byte) {
                        if CONSOLE_RX.try_send(line).is_err() {
                            warn!("Console line channel full, dropping line");
                        }
                    }
                }
            }
            Ok(_) => {
                // No bytes read, continue
            }
            Err(e) => {
                warn!("Console read error: {:?}", e);
            }
        }
    }
}

/// Console TX task - writes status lines to the wired channel
#[embassy_executor::task]
pub async fn console_tx_task(mut tx: BufferedUartTx) {
    info!("Console TX task started");

    loop {
        let line = CONSOLE_TX.receive().await;
        if tx.write_all(line.as_bytes()).await.is_err() {
            warn!("Console write error");
            continue;
        }
        if tx.write_all(b"\r\n").await.is_err() {
            warn!("Console write error");
        }
    }
}
