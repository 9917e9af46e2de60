//! Serial transport for the ECU diagnostic link
//!
//! Moves bytes between hardware interrupt context and task context in both
//! directions without data races or unbounded blocking:
//!
//! - [`ByteChannel`] - a fixed-capacity FIFO byte queue with a wake signal,
//!   usable from both interrupt and task context. All cursor mutation
//!   happens inside a single O(1) critical section.
//! - [`SerialPort`] - owns one channel per direction and exposes blocking
//!   read/write to tasks, non-blocking callbacks to the UART interrupt
//!   handlers, and producer backpressure.
//!
//! The board layer supplies only a [`TransmitStart`] hook for kicking the
//! transmitter when outbound data becomes available while it is idle.

#![no_std]
#![deny(unsafe_code)]

pub mod channel;
pub mod port;

pub use channel::ByteChannel;
pub use port::{SerialPort, TransmitStart, COM_BUF_SIZE, TX_SPACE_HYSTERESIS};
