//! ECU link receive task
//!
//! Drains the UART into the serial port's inbound channel. This is the
//! interrupt-side feed of the port; the decode task consumes from the
//! other end.

use defmt::*;
use embassy_rp::uart::BufferedUartRx;
use embedded_io_async::Read;

use crate::channels::ECU_PORT;

/// Buffer size for UART receive
const RX_BUF_SIZE: usize = 32;

/// Link RX task - pushes received bytes into the port
#[embassy_executor::task]
pub async fn link_rx_task(mut rx: BufferedUartRx) {
    info!("Link RX task started");

    let mut buf = [0u8; RX_BUF_SIZE];

    loop {
        match rx.read(&mut buf).await {
            Ok(n) if n > 0 => {
                trace!("RX: {} bytes", n);
                for &byte in &buf[..n] {
                    // Full inbound buffer drops the byte and counts it
                    ECU_PORT.on_rx_byte(byte);
                }
            }
            Ok(_) => {
                // No bytes read, continue
            }
            Err(e) => {
                warn!("UART read error: {:?}", e);
            }
        }
    }
}
