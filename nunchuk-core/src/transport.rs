//! Transport client: timed raw send/receive over the I2C bus.

use core::fmt;

use embedded_hal::i2c::ErrorKind;
use embedded_hal_async::delay::DelayNs;
use embedded_hal_async::i2c::I2c;

use crate::config::TimingConfig;

/// Error type for bus operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TransportError {
    /// The peripheral did not acknowledge its address or data.
    Nack,
    /// Bus error (misplaced start/stop condition).
    Bus,
    /// Another controller won arbitration.
    ArbitrationLoss,
    /// Data was not consumed in time.
    Overrun,
    /// Any other HAL-reported failure, including timeouts.
    Other,
}

impl TransportError {
    /// Convert a HAL error into a [`TransportError`].
    ///
    /// This is a helper function instead of a `From` impl so it can be used
    /// with any bus implementation's error type.
    #[inline]
    pub fn from_i2c<E: embedded_hal::i2c::Error>(err: E) -> Self {
        match err.kind() {
            ErrorKind::NoAcknowledge(_) => TransportError::Nack,
            ErrorKind::Bus => TransportError::Bus,
            ErrorKind::ArbitrationLoss => TransportError::ArbitrationLoss,
            ErrorKind::Overrun => TransportError::Overrun,
            _ => TransportError::Other,
        }
    }
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            TransportError::Nack => "peripheral did not acknowledge",
            TransportError::Bus => "bus error",
            TransportError::ArbitrationLoss => "arbitration lost",
            TransportError::Overrun => "overrun",
            TransportError::Other => "transfer failed",
        };
        f.write_str(msg)
    }
}

/// Thin wrapper binding an I2C bus, a delay provider and the peripheral
/// address.
///
/// The client never retries; every bus failure is returned to the caller.
/// Settle delays are blocking waits for the calling task and must be
/// requested explicitly by the protocol layer via [`settle_read`] and
/// [`settle_handshake`].
///
/// [`settle_read`]: TransportClient::settle_read
/// [`settle_handshake`]: TransportClient::settle_handshake
pub struct TransportClient<I2C, D> {
    bus: I2C,
    delay: D,
    address: u8,
    timing: TimingConfig,
}

impl<I2C: I2c, D: DelayNs> TransportClient<I2C, D> {
    #[must_use]
    pub fn new(bus: I2C, delay: D, address: u8, timing: TimingConfig) -> Self {
        Self {
            bus,
            delay,
            address,
            timing,
        }
    }

    /// Write `bytes` to the peripheral.
    pub async fn send(&mut self, bytes: &[u8]) -> Result<(), TransportError> {
        self.bus
            .write(self.address, bytes)
            .await
            .map_err(TransportError::from_i2c)
    }

    /// Read exactly `N` bytes from the peripheral.
    ///
    /// A short or failed transfer is an error; no partial data is returned.
    pub async fn receive<const N: usize>(&mut self) -> Result<[u8; N], TransportError> {
        let mut buf = [0u8; N];
        self.bus
            .read(self.address, &mut buf)
            .await
            .map_err(TransportError::from_i2c)?;
        Ok(buf)
    }

    /// Wait for the peripheral to latch a read-select command.
    pub async fn settle_read(&mut self) {
        self.delay.delay_us(self.timing.read_settle_us).await;
    }

    /// Wait between handshake steps.
    pub async fn settle_handshake(&mut self) {
        self.delay.delay_us(self.timing.handshake_settle_us).await;
    }

    #[inline]
    #[must_use]
    pub fn address(&self) -> u8 {
        self.address
    }

    /// Give the bus and delay provider back to the caller.
    pub fn release(self) -> (I2C, D) {
        (self.bus, self.delay)
    }
}
