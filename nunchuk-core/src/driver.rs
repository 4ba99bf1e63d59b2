//! Nunchuk driver instance: attach, poll session, detach.

use core::fmt;

use embedded_hal_async::delay::DelayNs;
use embedded_hal_async::i2c::I2c;

use crate::config::{ConfigError, NunchukConfig, PollConfig, DEVICE_NAME};
use crate::handshake::{Handshake, HandshakeError};
use crate::poller::{PollSession, PollStats};
use crate::transport::TransportClient;

/// Error type for attach.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AttachError {
    /// Rejected before touching the bus.
    Config(ConfigError),
    /// The peripheral did not complete the handshake.
    Handshake(HandshakeError),
}

impl From<ConfigError> for AttachError {
    fn from(err: ConfigError) -> Self {
        AttachError::Config(err)
    }
}

impl From<HandshakeError> for AttachError {
    fn from(err: HandshakeError) -> Self {
        AttachError::Handshake(err)
    }
}

impl fmt::Display for AttachError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttachError::Config(err) => write!(f, "invalid configuration: {err}"),
            AttachError::Handshake(err) => write!(f, "{err}"),
        }
    }
}

/// An attached Nunchuk.
///
/// Owns the bus binding exclusively from [`attach`] until [`detach`]. The
/// handshake has completed by the time a value of this type exists.
///
/// [`attach`]: Nunchuk::attach
/// [`detach`]: Nunchuk::detach
pub struct Nunchuk<I2C, D> {
    transport: TransportClient<I2C, D>,
    poll: PollConfig,
    stats: PollStats,
}

impl<I2C: I2c, D: DelayNs> Nunchuk<I2C, D> {
    /// Bind to the peripheral and run the handshake.
    ///
    /// The configuration is validated before any bus traffic. A handshake
    /// failure is fatal: the bus binding is dropped and no poll session can
    /// ever be created.
    pub async fn attach(bus: I2C, delay: D, config: NunchukConfig) -> Result<Self, AttachError> {
        config.poll.validate()?;

        let mut transport = TransportClient::new(bus, delay, config.address, config.poll.timing);
        let mut handshake = Handshake::new();
        if let Err(e) = handshake.initialize(&mut transport).await {
            error!("attach failed at 0x{:x}: {:?}", config.address, e);
            return Err(e.into());
        }

        info!(
            "{} attached at 0x{:x}, polling every {} ms",
            DEVICE_NAME, config.address, config.poll.interval_ms
        );

        Ok(Self {
            transport,
            poll: config.poll,
            stats: PollStats::default(),
        })
    }

    /// Start polling.
    ///
    /// The session borrows the driver, so [`detach`](Nunchuk::detach) cannot
    /// be called until the session has been dropped.
    pub fn poll_session(&mut self) -> PollSession<'_, I2C, D> {
        PollSession::new(&mut self.transport, &mut self.stats)
    }

    #[inline]
    #[must_use]
    pub fn poll_config(&self) -> PollConfig {
        self.poll
    }

    #[inline]
    #[must_use]
    pub fn address(&self) -> u8 {
        self.transport.address()
    }

    /// Counters accumulated over every session of this attach.
    #[inline]
    #[must_use]
    pub fn stats(&self) -> PollStats {
        self.stats
    }

    /// Release the device, handing the bus and delay provider back.
    pub fn detach(self) -> (I2C, D) {
        info!(
            "{} detached after {} ticks ({} failed)",
            DEVICE_NAME, self.stats.ticks, self.stats.cycles_failed
        );
        self.transport.release()
    }
}
