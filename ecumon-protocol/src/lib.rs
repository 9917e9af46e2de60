//! ECU Diagnostic Link Protocol
//!
//! This crate decodes the fixed-layout diagnostic packet the engine
//! controller emits on its serial link, and derives calibrated sensor
//! readings and diagnostic trouble codes from the decoded image.
//!
//! # Frame format
//!
//! All frames use the same fixed binary layout:
//! ```text
//! ┌───────────┬────────┬────────┬─────────────┬──────────────┐
//! │ 0x55 0xAA │ BODY   │ STATUS │ ADC         │ CHECKSUM     │
//! │ 2B sync   │ 256B   │ 1B     │ 8 × u16 LE  │ 2B (hi, lo)  │
//! └───────────┴────────┴────────┴─────────────┴──────────────┘
//! ```
//!
//! The body is a raw snapshot of controller memory; the ADC block carries
//! eight 10-bit analog readings. The checksum is a 16-bit wrapping sum of
//! every byte from the first sync byte onward (the two checksum bytes are
//! subtracted back out as they arrive, see [`Decoder`]).
//!
//! The decoder is fed one byte at a time by whichever task owns the serial
//! receive side. On each validated frame it publishes a [`Snapshot`] that
//! display code reads through pure accessors - readers never observe a
//! partially written frame.

#![no_std]
#![deny(unsafe_code)]

pub mod decoder;
pub mod dtc;
pub mod snapshot;

pub use decoder::{Decoder, FrameVerdict, LinkStats, FRAME_LEN, SYNC1, SYNC2};
pub use snapshot::{Snapshot, ADC_CHANNELS, BODY_LEN};
