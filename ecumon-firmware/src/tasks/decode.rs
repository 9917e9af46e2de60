//! Decode task
//!
//! Pulls bytes off the ECU link one at a time and runs the protocol
//! decoder. Accepted frames are republished into the shared snapshot for
//! the display side; checksum failures are logged best-effort.

use defmt::*;

use ecumon_protocol::{Decoder, FrameVerdict};

use crate::channels::{ECU_PORT, FRAME_UPDATED, LINK_STATS, SNAPSHOT};

/// Decode task - drives the protocol state machine
#[embassy_executor::task]
pub async fn decode_task() {
    info!("Decode task started");

    let mut decoder = Decoder::new();

    loop {
        // Block waiting for data
        let byte = ECU_PORT.read_byte().await;

        let verdict = decoder.feed(byte);

        // Counters advance on every byte, framed or not, so the heartbeat
        // line stays live while the link carries garbage
        LINK_STATS.lock(|cell| *cell.borrow_mut() = *decoder.stats());

        match verdict {
            Some(FrameVerdict::Accepted) => {
                if decoder.was_updated() {
                    SNAPSHOT.lock(|cell| *cell.borrow_mut() = *decoder.snapshot());
                    FRAME_UPDATED.signal(());
                }
            }
            Some(FrameVerdict::BadChecksum { sum }) => {
                warn!("bad sum {=u16:04x}", sum);
            }
            None => {}
        }
    }
}
