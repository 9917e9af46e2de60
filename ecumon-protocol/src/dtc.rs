//! Diagnostic trouble code enumeration.
//!
//! DTCs are stored as set bits across three status bytes of the memory
//! image. The table below fixes their display priority: byte 0x12 bit 0
//! first through byte 0x14 bit 7 last. Undefined bits of 0x13 have no
//! entry and are never reported.

use crate::snapshot::Snapshot;

struct DtcEntry {
    offset: usize,
    mask: u8,
    label: &'static str,
}

/// All defined codes in display priority order, with their fixed
/// 6-character labels
const DTC_TABLE: &[DtcEntry] = &[
    DtcEntry { offset: 0x12, mask: 0x01, label: "VSS   " },
    DtcEntry { offset: 0x12, mask: 0x02, label: "IAT LO" },
    DtcEntry { offset: 0x12, mask: 0x04, label: "TPS LO" },
    DtcEntry { offset: 0x12, mask: 0x08, label: "TPS HI" },
    DtcEntry { offset: 0x12, mask: 0x10, label: "CTS LO" },
    DtcEntry { offset: 0x12, mask: 0x20, label: "CTS HI" },
    DtcEntry { offset: 0x12, mask: 0x40, label: "O2    " },
    DtcEntry { offset: 0x12, mask: 0x80, label: "DRP   " },
    DtcEntry { offset: 0x13, mask: 0x01, label: "EST   " },
    DtcEntry { offset: 0x13, mask: 0x08, label: "MAP LO" },
    DtcEntry { offset: 0x13, mask: 0x10, label: "MAP HI" },
    DtcEntry { offset: 0x13, mask: 0x80, label: "IAT HI" },
    DtcEntry { offset: 0x14, mask: 0x01, label: "ADU   " },
    DtcEntry { offset: 0x14, mask: 0x02, label: "FP RLY" },
    DtcEntry { offset: 0x14, mask: 0x04, label: "VATS  " },
    DtcEntry { offset: 0x14, mask: 0x08, label: "CALPAK" },
    DtcEntry { offset: 0x14, mask: 0x10, label: "PROM  " },
    DtcEntry { offset: 0x14, mask: 0x20, label: "O2 RH " },
    DtcEntry { offset: 0x14, mask: 0x40, label: "O2 LN " },
    DtcEntry { offset: 0x14, mask: 0x80, label: "ESC   " },
];

impl Snapshot {
    /// Label of the `index`-th (0-based) active trouble code in priority
    /// order, or `None` once `index` exceeds the number of set codes.
    ///
    /// A sparse walk over set bits, not a dense lookup: unset bits are
    /// skipped without consuming an index.
    pub fn dtc(&self, index: u8) -> Option<&'static str> {
        let mut remaining = index;

        for entry in DTC_TABLE {
            if self.mem[entry.offset] & entry.mask != 0 {
                if remaining == 0 {
                    return Some(entry.label);
                }
                remaining -= 1;
            }
        }

        None
    }

    /// Number of active trouble codes
    pub fn dtc_count(&self) -> usize {
        DTC_TABLE
            .iter()
            .filter(|entry| self.mem[entry.offset] & entry.mask != 0)
            .count()
    }
}
