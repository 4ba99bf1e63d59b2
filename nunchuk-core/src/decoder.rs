//! Bit-level decoding of a register snapshot.
//!
//! | Byte | Bits | Meaning |
//! |------|------|---------|
//! | 0    | 7..0 | Joystick X |
//! | 1    | 7..0 | Joystick Y |
//! | 5    | 0    | Z button, active-low |
//! | 5    | 1    | C button, active-low |
//!
//! Button lines idle high, so a cleared bit means pressed.

use crate::types::{ControllerState, RegisterSnapshot};

const Z_BUTTON_MASK: u8 = 0x01;
const C_BUTTON_MASK: u8 = 0x02;

/// Decode a snapshot into controller state.
///
/// Pure and total: every 6-byte snapshot decodes.
#[inline]
#[must_use]
pub const fn decode(snapshot: &RegisterSnapshot) -> ControllerState {
    let bytes = snapshot.as_bytes();
    ControllerState {
        x: bytes[0],
        y: bytes[1],
        c_pressed: bytes[5] & C_BUTTON_MASK == 0,
        z_pressed: bytes[5] & Z_BUTTON_MASK == 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_byte5(byte5: u8) -> ControllerState {
        decode(&RegisterSnapshot::new([0, 0, 0, 0, 0, byte5]))
    }

    #[test]
    fn test_both_buttons_pressed() {
        let state = with_byte5(0b0000_0000);
        assert!(state.z_pressed);
        assert!(state.c_pressed);
    }

    #[test]
    fn test_both_buttons_released() {
        let state = with_byte5(0b0000_0011);
        assert!(!state.z_pressed);
        assert!(!state.c_pressed);
    }

    #[test]
    fn test_only_c_pressed() {
        let state = with_byte5(0b0000_0001);
        assert!(!state.z_pressed);
        assert!(state.c_pressed);
    }

    #[test]
    fn test_only_z_pressed() {
        let state = with_byte5(0b0000_0010);
        assert!(state.z_pressed);
        assert!(!state.c_pressed);
    }

    #[test]
    fn test_accelerometer_bits_do_not_affect_buttons() {
        let state = with_byte5(0b1111_1100);
        assert!(state.z_pressed);
        assert!(state.c_pressed);
    }

    #[test]
    fn test_joystick_passes_through() {
        let state = decode(&RegisterSnapshot::new([125, 100, 0, 0, 0, 0x03]));
        assert_eq!(state.x, 125);
        assert_eq!(state.y, 100);
    }

    #[test]
    fn test_decode_is_pure_and_total() {
        // Sweep every value of the button byte and a spread of joystick values
        for byte5 in 0..=u8::MAX {
            for stick in (0..=u8::MAX).step_by(17) {
                let snapshot = RegisterSnapshot::new([stick, !stick, 0xAA, 0x55, 0x00, byte5]);
                let first = decode(&snapshot);
                assert_eq!(first, decode(&snapshot));
                assert_eq!(first.x, stick);
                assert_eq!(first.y, !stick);
            }
        }
    }
}
