//! Periodic read cycle: select register, settle, read, decode, report.

use core::fmt;
use core::future::Future;
use core::pin::pin;

use embassy_futures::select::{select, Either};
use embedded_hal_async::delay::DelayNs;
use embedded_hal_async::i2c::I2c;

use crate::decoder::decode;
use crate::report::{report, EventSink, ReportError};
use crate::transport::{TransportClient, TransportError};
use crate::types::{ControllerState, RegisterSnapshot, SNAPSHOT_LEN};

/// Read-select command: point the register cursor at the report block.
pub const READ_SELECT: [u8; 1] = [0x00];

/// Source of poll ticks at a fixed interval.
///
/// The host's scheduler implements this; the poller never creates timers or
/// threads of its own.
pub trait TickSource {
    /// Wait for the next tick.
    fn next_tick(&mut self) -> impl Future<Output = ()>;
}

/// Which half of a read cycle failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PollStep {
    SelectRegister,
    ReadSnapshot,
}

/// A single poll cycle failed. The tick is skipped; polling continues.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PollCycleError {
    /// Bus failure while selecting or reading the register block.
    Transport {
        step: PollStep,
        source: TransportError,
    },
    /// The event sink rejected the batch.
    Report(ReportError),
}

impl From<ReportError> for PollCycleError {
    fn from(err: ReportError) -> Self {
        PollCycleError::Report(err)
    }
}

impl fmt::Display for PollCycleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PollCycleError::Transport {
                step: PollStep::SelectRegister,
                source,
            } => write!(f, "register select failed: {source}"),
            PollCycleError::Transport {
                step: PollStep::ReadSnapshot,
                source,
            } => write!(f, "snapshot read failed: {source}"),
            PollCycleError::Report(err) => write!(f, "report failed: {err}"),
        }
    }
}

/// Counters describing poll health.
#[derive(Clone, Copy, Default, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PollStats {
    /// Cycles attempted.
    pub ticks: u32,
    /// Cycles that reached the sink.
    pub cycles_ok: u32,
    /// Cycles skipped because of an error.
    pub cycles_failed: u32,
    /// Failures since the last successful cycle.
    pub consecutive_failures: u32,
}

impl PollStats {
    fn record_success(&mut self) {
        if self.consecutive_failures > 0 {
            info!(
                "poll recovered after {} failed cycles",
                self.consecutive_failures
            );
        }
        self.cycles_ok = self.cycles_ok.wrapping_add(1);
        self.consecutive_failures = 0;
    }

    fn record_failure(&mut self) {
        self.cycles_failed = self.cycles_failed.wrapping_add(1);
        self.consecutive_failures = self.consecutive_failures.saturating_add(1);
    }
}

/// Registration of the poller with the scheduler.
///
/// Holds the only (mutable) borrow of the device for its lifetime, so at most
/// one cycle runs at a time and the device cannot be detached while a
/// session exists. Obtain one from [`Nunchuk::poll_session`].
///
/// [`Nunchuk::poll_session`]: crate::Nunchuk::poll_session
pub struct PollSession<'a, I2C, D> {
    transport: &'a mut TransportClient<I2C, D>,
    stats: &'a mut PollStats,
}

impl<'a, I2C: I2c, D: DelayNs> PollSession<'a, I2C, D> {
    pub(crate) fn new(transport: &'a mut TransportClient<I2C, D>, stats: &'a mut PollStats) -> Self {
        Self { transport, stats }
    }

    /// Select the report block, wait for it to latch, then read it.
    pub async fn read_snapshot(&mut self) -> Result<RegisterSnapshot, PollCycleError> {
        self.transport
            .send(&READ_SELECT)
            .await
            .map_err(|source| PollCycleError::Transport {
                step: PollStep::SelectRegister,
                source,
            })?;

        self.transport.settle_read().await;

        let bytes = self
            .transport
            .receive::<SNAPSHOT_LEN>()
            .await
            .map_err(|source| PollCycleError::Transport {
                step: PollStep::ReadSnapshot,
                source,
            })?;

        Ok(RegisterSnapshot::new(bytes))
    }

    /// Run exactly one cycle and report the result to `sink`.
    ///
    /// On a bus failure nothing is reported for this tick. Errors are
    /// logged and returned for inspection; they never end the session.
    pub async fn tick<S: EventSink>(&mut self, sink: &mut S) -> Result<ControllerState, PollCycleError> {
        self.stats.ticks = self.stats.ticks.wrapping_add(1);

        match self.cycle(sink).await {
            Ok(state) => {
                trace!("poll: {:?}", state);
                self.stats.record_success();
                Ok(state)
            }
            Err(e) => {
                error!("poll cycle failed: {:?}", e);
                self.stats.record_failure();
                Err(e)
            }
        }
    }

    async fn cycle<S: EventSink>(&mut self, sink: &mut S) -> Result<ControllerState, PollCycleError> {
        let snapshot = self.read_snapshot().await?;
        let state = decode(&snapshot);
        report(sink, &state).await?;
        Ok(state)
    }

    /// Poll on every tick, indefinitely.
    pub async fn run<T: TickSource, S: EventSink>(&mut self, ticker: &mut T, sink: &mut S) -> ! {
        loop {
            ticker.next_tick().await;
            let _ = self.tick(sink).await;
        }
    }

    /// Poll on every tick until `stop` completes.
    ///
    /// `stop` is only raced against the wait for the next tick, never against
    /// a cycle in progress, so the bus is idle when this returns.
    pub async fn run_until<T, S, F>(&mut self, ticker: &mut T, sink: &mut S, stop: F) -> F::Output
    where
        T: TickSource,
        S: EventSink,
        F: Future,
    {
        let mut stop = pin!(stop);
        loop {
            match select(stop.as_mut(), ticker.next_tick()).await {
                Either::First(output) => return output,
                Either::Second(()) => {
                    let _ = self.tick(sink).await;
                }
            }
        }
    }

    #[inline]
    #[must_use]
    pub fn stats(&self) -> PollStats {
        *self.stats
    }
}
