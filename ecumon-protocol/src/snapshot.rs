//! Decoded packet snapshot and sensor value accessors.
//!
//! A [`Snapshot`] is the last successfully checksummed frame: the 256-byte
//! controller memory image plus the eight analog channel readings. All
//! sensor values are pure functions of the snapshot, computed on demand in
//! integer fixed point so the crate stays float-free on no_std targets.

/// Length of the memory-map body in a frame
pub const BODY_LEN: usize = 256;

/// Number of 16-bit analog channels in a frame
pub const ADC_CHANNELS: usize = 8;

/// Oil pressure sender low endpoint: 0.5 V on a 10-bit, 5 V ADC
const OIL_ZERO_COUNTS: u32 = 102;

/// Oil pressure sender high endpoint: 4.5 V
const OIL_FULL_COUNTS: u32 = 921;

/// A decoded diagnostic packet.
///
/// Field offsets and scale factors follow the controller's fixed memory
/// layout; they are not configurable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Snapshot {
    /// Raw controller memory image
    pub mem: [u8; BODY_LEN],
    /// Analog channel readings (10-bit, 0-5 V)
    pub adc: [u16; ADC_CHANNELS],
}

impl Default for Snapshot {
    fn default() -> Self {
        Self::new()
    }
}

impl Snapshot {
    /// An all-zero snapshot, as seen before the first valid frame
    pub const fn new() -> Self {
        Self {
            mem: [0; BODY_LEN],
            adc: [0; ADC_CHANNELS],
        }
    }

    /// Engine speed in rpm.
    ///
    /// Table-derived linear approximation; accurate below ~6375 rpm.
    pub fn engine_speed(&self) -> u32 {
        let b = self.mem[0xf3] as u32;
        b * 31 + b / 4
    }

    /// Road speed, already scaled to display units
    pub fn ground_speed(&self) -> u32 {
        self.mem[0x34] as u32
    }

    /// Oil pressure in psi.
    ///
    /// 100 psi sender over 0.5-4.5 V on the 10-bit, 5 V ADC:
    /// 0.5 V = 102.4 counts, 4.5 V = 921.6 counts, span 819.2 counts.
    /// Conversion is counts / 8.192, i.e. x 125/1024 in fixed point,
    /// clamped to the sender range at both ends.
    pub fn oil_pressure(&self) -> u32 {
        let counts = self.adc[2] as u32;

        if counts <= OIL_ZERO_COUNTS {
            0
        } else if counts >= OIL_FULL_COUNTS {
            100
        } else {
            ((counts - OIL_ZERO_COUNTS) * 125 + 512) / 1024
        }
    }

    /// Coolant temperature in degrees C.
    ///
    /// 0.75 degC per count with a -40 offset, rounded; the sensor curve
    /// bottoms out at 0.
    pub fn water_temperature(&self) -> u32 {
        let t = (self.mem[0xe3] as i32 * 3 + 2) / 4 - 40;
        t.max(0) as u32
    }

    /// Battery voltage in decivolts
    pub fn voltage(&self) -> u32 {
        self.mem[0x45] as u32
    }

    /// Air-fuel ratio, x10 fixed point.
    ///
    /// Wideband controller default output mode: AFR = 2 x volts + 9.6,
    /// so counts / 102.4 + 9.6. Reported x10: counts x 25/256 + 96, rounded.
    pub fn afr(&self) -> u32 {
        let counts = self.adc[1] as u32;
        (counts * 25 + 128) / 256 + 96
    }

    /// Service-engine-soon lamp state
    pub fn ses_set(&self) -> bool {
        self.mem[0x0b] & 0x01 != 0
    }

    /// True while the controller reports the engine turning
    pub fn engine_running(&self) -> bool {
        self.mem[0x01] & 0x80 != 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_engine_speed_formula() {
        let mut snap = Snapshot::new();
        snap.mem[0xf3] = 100;
        assert_eq!(snap.engine_speed(), 3125);

        snap.mem[0xf3] = 0;
        assert_eq!(snap.engine_speed(), 0);
    }

    #[test]
    fn test_ground_speed_is_direct() {
        let mut snap = Snapshot::new();
        snap.mem[0x34] = 88;
        assert_eq!(snap.ground_speed(), 88);
    }

    #[test]
    fn test_oil_pressure_low_clamp() {
        let mut snap = Snapshot::new();
        snap.adc[2] = 102;
        assert_eq!(snap.oil_pressure(), 0);

        snap.adc[2] = 0;
        assert_eq!(snap.oil_pressure(), 0);
    }

    #[test]
    fn test_oil_pressure_high_clamp() {
        let mut snap = Snapshot::new();
        snap.adc[2] = 921;
        assert_eq!(snap.oil_pressure(), 100);

        snap.adc[2] = 1023;
        assert_eq!(snap.oil_pressure(), 100);
    }

    #[test]
    fn test_oil_pressure_midpoint() {
        let mut snap = Snapshot::new();
        // Half scale: 0.5 + 2.0 V = 512 counts, (512-102)/8.192 = 50.05
        snap.adc[2] = 512;
        assert_eq!(snap.oil_pressure(), 50);
    }

    #[test]
    fn test_water_temperature_floor() {
        let mut snap = Snapshot::new();
        snap.mem[0xe3] = 0;
        // -40 before the clamp; the sensor curve floors at zero
        assert_eq!(snap.water_temperature(), 0);
    }

    #[test]
    fn test_water_temperature_scaling() {
        let mut snap = Snapshot::new();
        // 64 * 0.75 - 40 = 8
        snap.mem[0xe3] = 64;
        assert_eq!(snap.water_temperature(), 8);

        // 65 * 0.75 - 40 = 8.75, rounds to 9
        snap.mem[0xe3] = 65;
        assert_eq!(snap.water_temperature(), 9);
    }

    #[test]
    fn test_afr_endpoints() {
        let mut snap = Snapshot::new();
        // 0 V = 9.6:1
        snap.adc[1] = 0;
        assert_eq!(snap.afr(), 96);

        // Full scale = 19.6:1
        snap.adc[1] = 1024;
        assert_eq!(snap.afr(), 196);
    }

    #[test]
    fn test_status_bits() {
        let mut snap = Snapshot::new();
        assert!(!snap.ses_set());
        assert!(!snap.engine_running());

        snap.mem[0x0b] = 0x01;
        snap.mem[0x01] = 0x80;
        assert!(snap.ses_set());
        assert!(snap.engine_running());

        // Other bits in the same bytes do not count
        snap.mem[0x0b] = 0xfe;
        snap.mem[0x01] = 0x7f;
        assert!(!snap.ses_set());
        assert!(!snap.engine_running());
    }
}
