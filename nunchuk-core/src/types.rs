//! Core controller types: RegisterSnapshot, ControllerState, Acceleration.

/// Size of one register block read.
pub const SNAPSHOT_LEN: usize = 6;

/// Raw 6-byte register block read in one poll cycle.
///
/// The fixed-size array makes partial snapshots unrepresentable.
#[derive(Clone, Copy, Default, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RegisterSnapshot(pub [u8; SNAPSHOT_LEN]);

impl RegisterSnapshot {
    #[must_use]
    pub const fn new(bytes: [u8; SNAPSHOT_LEN]) -> Self {
        Self(bytes)
    }

    #[inline]
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; SNAPSHOT_LEN] {
        &self.0
    }

    /// Raw 10-bit accelerometer readings.
    ///
    /// Bytes 2..=4 carry bits 9..2 of X/Y/Z; byte 5 carries the low bit
    /// pairs at bits 2-3 (X), 4-5 (Y) and 6-7 (Z).
    #[must_use]
    pub const fn accel(&self) -> Acceleration {
        let low = self.0[5];
        Acceleration {
            x: ((self.0[2] as u16) << 2) | ((low >> 2) & 0x3) as u16,
            y: ((self.0[3] as u16) << 2) | ((low >> 4) & 0x3) as u16,
            z: ((self.0[4] as u16) << 2) | ((low >> 6) & 0x3) as u16,
        }
    }
}

impl From<[u8; SNAPSHOT_LEN]> for RegisterSnapshot {
    fn from(bytes: [u8; SNAPSHOT_LEN]) -> Self {
        Self(bytes)
    }
}

/// Accelerometer readings, 10-bit raw (0..=1023 per axis).
#[derive(Clone, Copy, Default, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Acceleration {
    pub x: u16,
    pub y: u16,
    pub z: u16,
}

/// Decoded controller state for a single snapshot.
///
/// Joystick values are raw (0-255); the calibrated travel is roughly
/// 30-220 on X and 40-200 on Y.
#[derive(Clone, Copy, Default, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ControllerState {
    pub x: u8,
    pub y: u8,
    pub c_pressed: bool,
    pub z_pressed: bool,
}
