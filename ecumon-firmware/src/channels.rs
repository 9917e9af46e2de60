//! Inter-task communication
//!
//! Static channels and signals shared between the Embassy tasks, plus the
//! serial port instance for the ECU link.

use core::cell::RefCell;

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::blocking_mutex::Mutex;
use embassy_sync::signal::Signal;

use ecumon_comms::{SerialPort, TransmitStart};
use ecumon_protocol::{LinkStats, Snapshot};

/// Wakes the tx pump task when bytes are queued while the pump is parked
pub static TX_KICK: Signal<CriticalSectionRawMutex, ()> = Signal::new();

/// Transmit-start hook for the ECU link port.
///
/// Signalling an already-signalled kick is a no-op, which gives the
/// idempotence the port requires.
pub struct TxKick;

impl TransmitStart for TxKick {
    fn transmit_start(&self) {
        TX_KICK.signal(());
    }
}

/// The ECU diagnostic link port
pub static ECU_PORT: SerialPort<TxKick> = SerialPort::new(TxKick);

/// Last accepted packet snapshot, for the display side to read
pub static SNAPSHOT: Mutex<CriticalSectionRawMutex, RefCell<Snapshot>> =
    Mutex::new(RefCell::new(Snapshot::new()));

/// Raised once per accepted frame; the display side consumes it on its
/// own schedule
pub static FRAME_UPDATED: Signal<CriticalSectionRawMutex, ()> = Signal::new();

/// Link counters, republished by the decode task for the heartbeat log
pub static LINK_STATS: Mutex<CriticalSectionRawMutex, RefCell<LinkStats>> =
    Mutex::new(RefCell::new(LinkStats {
        bytes: 0,
        good_frames: 0,
        bad_frames: 0,
    }));
