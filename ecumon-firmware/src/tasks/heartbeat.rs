//! Heartbeat task
//!
//! Toggles the board LED every 500 ms and logs the link counters, which
//! is usually all the diagnostics a bench session needs.

use defmt::*;
use embassy_rp::gpio::Output;
use embassy_time::{Duration, Ticker};

use crate::channels::{ECU_PORT, LINK_STATS};

/// Heartbeat task - LED blink plus a periodic link statistics line
#[embassy_executor::task]
pub async fn heartbeat_task(mut led: Output<'static>) {
    info!("Heartbeat task started");

    let mut ticker = Ticker::every(Duration::from_millis(500));

    loop {
        ticker.next().await;
        led.toggle();

        let stats = LINK_STATS.lock(|cell| *cell.borrow());
        debug!(
            "link: {} rx {} good {} bad {} lost",
            stats.bytes,
            stats.good_frames,
            stats.bad_frames,
            ECU_PORT.rx_dropped()
        );
    }
}
