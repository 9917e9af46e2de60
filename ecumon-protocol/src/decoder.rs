//! Frame decoder for the diagnostic link.
//!
//! A byte-at-a-time state machine: the serial consumer task feeds it one
//! byte per call and it frames, validates, and unpacks the fixed-layout
//! packet. Nothing here blocks or panics; any framing or checksum failure
//! resets the machine to hunting for sync.

use crate::snapshot::{Snapshot, ADC_CHANNELS, BODY_LEN};

/// First frame synchronization byte
pub const SYNC1: u8 = 0x55;

/// Second frame synchronization byte
pub const SYNC2: u8 = 0xAA;

/// Bytes in the analog block (8 little-endian 16-bit readings)
const ADC_BYTES: usize = ADC_CHANNELS * 2;

/// Complete frame length: sync + body + status + analog + checksum
pub const FRAME_LEN: usize = 2 + BODY_LEN + 1 + ADC_BYTES + 2;

/// Decoder states, one per frame region
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
enum DecodeState {
    /// Hunting for the first sync byte
    AwaitSync1,
    /// Got SYNC1, expecting SYNC2
    AwaitSync2,
    /// Reading the 256-byte memory-map body
    Body,
    /// Reserved status byte, discarded
    Status,
    /// Reading the 16-byte analog block
    Analog,
    /// High checksum byte
    ChecksumHi,
    /// Low checksum byte
    ChecksumLo,
}

/// Outcome of a completed frame, reported from the final checksum byte
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FrameVerdict {
    /// Frame checksummed clean; the snapshot was published
    Accepted,
    /// Checksum mismatch; the frame was discarded
    BadChecksum {
        /// Adjusted running sum at the point of comparison
        sum: u16,
    },
}

/// Link statistics, for the diagnostics display only
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LinkStats {
    /// Total bytes seen, in or out of frame
    pub bytes: u32,
    /// Frames that passed checksum
    pub good_frames: u32,
    /// Frames that failed checksum
    pub bad_frames: u32,
}

/// Diagnostic packet decoder.
///
/// Holds a staging snapshot that the in-flight frame is unpacked into and a
/// published snapshot readers see. Publication happens only on the final
/// byte of a verified frame, so [`Decoder::snapshot`] never returns a torn
/// image and a checksum failure leaves the last good frame visible.
///
/// The checksum is a 16-bit wrapping sum of every byte from SYNC1 onward.
/// The two trailing checksum bytes are summed in on receipt like any other
/// byte, then algebraically removed before comparison, which avoids walking
/// the frame a second time.
#[derive(Debug, Clone)]
pub struct Decoder {
    state: DecodeState,
    index: usize,
    sum: u16,
    staging: Snapshot,
    published: Snapshot,
    updated: bool,
    stats: LinkStats,
}

impl Default for Decoder {
    fn default() -> Self {
        Self::new()
    }
}

impl Decoder {
    /// Create a decoder hunting for sync with an all-zero snapshot
    pub const fn new() -> Self {
        Self {
            state: DecodeState::AwaitSync1,
            index: 0,
            sum: 0,
            staging: Snapshot::new(),
            published: Snapshot::new(),
            updated: false,
            stats: LinkStats {
                bytes: 0,
                good_frames: 0,
                bad_frames: 0,
            },
        }
    }

    /// Feed one received byte to the state machine.
    ///
    /// Returns `Some` only on the byte that completes a frame, so the
    /// caller can log checksum failures best-effort.
    pub fn feed(&mut self, c: u8) -> Option<FrameVerdict> {
        self.sum = self.sum.wrapping_add(c as u16);
        self.stats.bytes = self.stats.bytes.wrapping_add(1);

        match self.state {
            DecodeState::AwaitSync1 => {
                if c == SYNC1 {
                    // the sum covers the frame from SYNC1 onward
                    self.sum = c as u16;
                    self.state = DecodeState::AwaitSync2;
                }
                None
            }
            DecodeState::AwaitSync2 => {
                if c == SYNC2 {
                    self.index = 0;
                    self.state = DecodeState::Body;
                } else {
                    self.state = DecodeState::AwaitSync1;
                }
                None
            }
            DecodeState::Body => {
                self.staging.mem[self.index] = c;
                self.index += 1;

                if self.index == BODY_LEN {
                    self.state = DecodeState::Status;
                }
                None
            }
            DecodeState::Status => {
                // reserved byte, not currently interpreted
                self.index = 0;
                self.state = DecodeState::Analog;
                None
            }
            DecodeState::Analog => {
                let word = &mut self.staging.adc[self.index / 2];

                if self.index & 1 == 0 {
                    *word = c as u16;
                } else {
                    *word |= (c as u16) << 8;
                }

                self.index += 1;

                if self.index == ADC_BYTES {
                    self.state = DecodeState::ChecksumHi;
                }
                None
            }
            DecodeState::ChecksumHi => {
                // This byte was summed in on receipt but is not part of the
                // expected value, and it carries the high byte of the sum.
                self.sum = self.sum.wrapping_sub(c as u16).wrapping_sub((c as u16) << 8);
                self.state = DecodeState::ChecksumLo;
                None
            }
            DecodeState::ChecksumLo => {
                self.sum = self.sum.wrapping_sub(c as u16);
                self.state = DecodeState::AwaitSync1;

                if self.sum == c as u16 {
                    self.published = self.staging;
                    self.updated = true;
                    self.stats.good_frames = self.stats.good_frames.wrapping_add(1);
                    Some(FrameVerdict::Accepted)
                } else {
                    self.stats.bad_frames = self.stats.bad_frames.wrapping_add(1);
                    Some(FrameVerdict::BadChecksum { sum: self.sum })
                }
            }
        }
    }

    /// Edge-triggered update check: true exactly once per published frame.
    ///
    /// Reading the flag resets it, so a single display consumer can poll
    /// this on its own schedule.
    pub fn was_updated(&mut self) -> bool {
        core::mem::take(&mut self.updated)
    }

    /// The last published snapshot.
    ///
    /// All zeros until the first valid frame; stale but whole after frames
    /// stop arriving or fail checksum.
    pub fn snapshot(&self) -> &Snapshot {
        &self.published
    }

    /// Link counters for the diagnostics display
    pub fn stats(&self) -> &LinkStats {
        &self.stats
    }

    /// True once any valid frame has ever arrived.
    ///
    /// Deliberately not recency-based; staleness handling belongs to the
    /// display layer if it wants it.
    pub fn connected(&self) -> bool {
        self.stats.good_frames > 0
    }
}
