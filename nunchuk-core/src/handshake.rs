//! One-shot initialization sequence that unlocks the peripheral's
//! unencrypted report mode.

use core::fmt;

use embedded_hal_async::delay::DelayNs;
use embedded_hal_async::i2c::I2c;

use crate::transport::{TransportClient, TransportError};

/// First handshake write: unlock the extended register protocol.
pub const UNLOCK: [u8; 2] = [0xF0, 0x55];

/// Second handshake write: select the plain report mode.
pub const SELECT_REPORT_MODE: [u8; 2] = [0xFB, 0x00];

/// Progress of the handshake.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum HandshakeState {
    Uninitialized,
    Step1Sent,
    Step2Sent,
    Ready,
    Failed,
}

/// Which handshake write failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum HandshakeStep {
    Unlock,
    SelectReportMode,
}

/// The peripheral could not be initialized; attach must fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct HandshakeError {
    pub step: HandshakeStep,
    pub source: TransportError,
}

impl fmt::Display for HandshakeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let step = match self.step {
            HandshakeStep::Unlock => "unlock",
            HandshakeStep::SelectReportMode => "select report mode",
        };
        write!(f, "handshake step '{step}' failed: {}", self.source)
    }
}

/// Handshake state machine.
///
/// `Uninitialized -> Step1Sent -> Step2Sent -> Ready`, with `Failed`
/// reachable from every step. Each call to [`initialize`] restarts from
/// `Uninitialized` and sends the same two fixed writes.
///
/// [`initialize`]: Handshake::initialize
#[derive(Debug)]
pub struct Handshake {
    state: HandshakeState,
}

impl Handshake {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            state: HandshakeState::Uninitialized,
        }
    }

    #[inline]
    #[must_use]
    pub fn state(&self) -> HandshakeState {
        self.state
    }

    /// Run both handshake steps over `transport`.
    pub async fn initialize<I2C: I2c, D: DelayNs>(
        &mut self,
        transport: &mut TransportClient<I2C, D>,
    ) -> Result<(), HandshakeError> {
        self.state = HandshakeState::Uninitialized;

        self.step(transport, HandshakeStep::Unlock, &UNLOCK).await?;
        self.state = HandshakeState::Step1Sent;
        debug!("handshake: unlock sent");

        transport.settle_handshake().await;

        self.step(transport, HandshakeStep::SelectReportMode, &SELECT_REPORT_MODE)
            .await?;
        self.state = HandshakeState::Step2Sent;
        debug!("handshake: report mode selected");

        self.state = HandshakeState::Ready;
        Ok(())
    }

    async fn step<I2C: I2c, D: DelayNs>(
        &mut self,
        transport: &mut TransportClient<I2C, D>,
        step: HandshakeStep,
        bytes: &[u8],
    ) -> Result<(), HandshakeError> {
        transport.send(bytes).await.map_err(|source| {
            self.state = HandshakeState::Failed;
            HandshakeError { step, source }
        })
    }
}

impl Default for Handshake {
    fn default() -> Self {
        Self::new()
    }
}
