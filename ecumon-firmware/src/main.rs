//! Ecumon - ECU diagnostic link monitor
//!
//! Main firmware binary for RP2040-based monitor boards. Wires the serial
//! transport, the protocol decoder, and the heartbeat together; display
//! rendering hangs off the published snapshot and update signal in
//! [`channels`].

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::bind_interrupts;
use embassy_rp::gpio::{Level, Output};
use embassy_rp::peripherals::UART0;
use embassy_rp::uart::{BufferedInterruptHandler, Config as UartConfig, Uart};
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

mod channels;
mod tasks;

bind_interrupts!(struct Irqs {
    UART0_IRQ => BufferedInterruptHandler<UART0>;
});

// Static cells for UART buffers (must live forever)
static TX_BUF: StaticCell<[u8; 32]> = StaticCell::new();
static RX_BUF: StaticCell<[u8; 32]> = StaticCell::new();

/// The controller talks at a fixed rate
const LINK_BAUD: u32 = 57_600;

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("ecumon firmware starting...");

    let p = embassy_rp::init(Default::default());

    // Setup UART for the diagnostic link
    let mut uart_config = UartConfig::default();
    uart_config.baudrate = LINK_BAUD;

    let tx_buf = TX_BUF.init([0u8; 32]);
    let rx_buf = RX_BUF.init([0u8; 32]);

    let uart = Uart::new_blocking(p.UART0, p.PIN_0, p.PIN_1, uart_config);
    let uart = uart.into_buffered(Irqs, tx_buf, rx_buf);
    let (tx, rx) = uart.split();

    info!("UART initialized for ECU link at {} baud", LINK_BAUD);

    // Heartbeat LED
    let led = Output::new(p.PIN_25, Level::Low);

    spawner.spawn(tasks::link_rx_task(rx)).unwrap();
    spawner.spawn(tasks::link_tx_task(tx)).unwrap();
    spawner.spawn(tasks::decode_task()).unwrap();
    spawner.spawn(tasks::heartbeat_task(led)).unwrap();

    info!("All tasks spawned");
}
