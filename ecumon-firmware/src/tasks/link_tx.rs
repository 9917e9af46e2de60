//! ECU link transmit task
//!
//! Pumps the port's outbound channel into the UART. Parked on the
//! transmit-start signal while there is nothing to send, so a write from
//! any task restarts it.

use defmt::*;
use embassy_rp::uart::BufferedUartTx;
use embedded_io_async::Write;

use crate::channels::{ECU_PORT, TX_KICK};

/// Link TX task - drains the port's outbound channel
#[embassy_executor::task]
pub async fn link_tx_task(mut tx: BufferedUartTx) {
    info!("Link TX task started");

    loop {
        match ECU_PORT.on_tx_ready() {
            Some(byte) => {
                if let Err(e) = tx.write_all(&[byte]).await {
                    warn!("UART write error: {:?}", e);
                }
            }
            None => {
                // Transmitter idle until someone queues bytes
                TX_KICK.wait().await;
            }
        }
    }
}
