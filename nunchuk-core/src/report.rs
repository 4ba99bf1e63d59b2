//! Event sink trait, axis calibration and the reporter.

use core::fmt;
use core::future::Future;

use crate::types::ControllerState;

/// Discrete buttons exposed to the event sink.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Key {
    C,
    Z,
}

/// Absolute axes exposed to the event sink.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Axis {
    X,
    Y,
}

impl Axis {
    /// Calibration advertised for this axis.
    #[inline]
    #[must_use]
    pub const fn info(self) -> AbsInfo {
        match self {
            Axis::X => ABS_X_INFO,
            Axis::Y => ABS_Y_INFO,
        }
    }
}

/// Calibration of an absolute axis.
///
/// `flat` is the dead zone around the centre, `fuzz` the noise a consumer
/// should filter out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AbsInfo {
    pub min: u8,
    pub max: u8,
    pub flat: u8,
    pub fuzz: u8,
}

/// Joystick X calibration.
pub const ABS_X_INFO: AbsInfo = AbsInfo {
    min: 30,
    max: 220,
    flat: 4,
    fuzz: 8,
};

/// Joystick Y calibration.
pub const ABS_Y_INFO: AbsInfo = AbsInfo {
    min: 40,
    max: 200,
    flat: 4,
    fuzz: 8,
};

impl AbsInfo {
    /// Midpoint of the calibrated range.
    #[inline]
    #[must_use]
    pub const fn center(&self) -> u8 {
        ((self.min as u16 + self.max as u16) / 2) as u8
    }

    /// Map a raw value onto `-127..=127`.
    ///
    /// Values outside `[min, max]` are clamped and values within `flat` of
    /// the centre read as zero.
    #[must_use]
    pub fn normalize(&self, value: u8) -> i8 {
        let value = value.clamp(self.min, self.max) as i32;
        let center = self.center() as i32;
        let offset = value - center;
        if offset.abs() <= self.flat as i32 {
            return 0;
        }

        let half_range = ((self.max as i32 - self.min as i32) / 2).max(1);
        (offset * 127 / half_range).clamp(-127, 127) as i8
    }

    /// Suppress jitter smaller than `fuzz` relative to the previous value.
    ///
    /// Small moves are held, medium moves are smoothed, large moves pass.
    #[must_use]
    pub fn defuzz(&self, previous: u8, value: u8) -> u8 {
        let fuzz = self.fuzz as i32;
        if fuzz == 0 {
            return value;
        }

        let old = previous as i32;
        let new = value as i32;
        let delta = (new - old).abs();

        if delta < fuzz / 2 {
            previous
        } else if delta < fuzz {
            ((old * 3 + new) / 4) as u8
        } else if delta < fuzz * 2 {
            ((old + new) / 2) as u8
        } else {
            value
        }
    }
}

/// Error type for event sink operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ReportError {
    /// Communication error while flushing the batch.
    Io,
    /// Consumer not ready (e.g., USB not enumerated).
    NotReady,
    /// Batch dropped (consumer not keeping up).
    Dropped,
}

impl fmt::Display for ReportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            ReportError::Io => "I/O error",
            ReportError::NotReady => "sink not ready",
            ReportError::Dropped => "report dropped",
        };
        f.write_str(msg)
    }
}

/// Consumer of decoded input events.
///
/// Key and axis reports are buffered by the sink; [`sync`] marks the end of
/// a batch that the consumer must observe atomically.
///
/// [`sync`]: EventSink::sync
pub trait EventSink {
    /// Report the state of a button.
    fn report_key(&mut self, key: Key, pressed: bool);

    /// Report the value of an absolute axis.
    fn report_abs(&mut self, axis: Axis, value: u8);

    /// Publish every report since the previous sync as one batch.
    fn sync(&mut self) -> impl Future<Output = Result<(), ReportError>>;
}

/// Emit `state` to `sink` as one synchronized batch.
///
/// Every call re-reports all inputs, changed or not.
pub async fn report<S: EventSink>(sink: &mut S, state: &ControllerState) -> Result<(), ReportError> {
    sink.report_key(Key::C, state.c_pressed);
    sink.report_key(Key::Z, state.z_pressed);
    sink.report_abs(Axis::X, state.x);
    sink.report_abs(Axis::Y, state.y);
    sink.sync().await
}
