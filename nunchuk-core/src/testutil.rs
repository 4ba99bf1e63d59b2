//! Host-side mocks shared by the unit tests.

use core::future::Future;
use core::pin::Pin;
use core::task::{Context, Poll, RawWaker, RawWakerVTable, Waker};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::vec::Vec;

use embedded_hal::i2c::{ErrorKind, ErrorType, Operation};
use embedded_hal_async::delay::DelayNs;
use embedded_hal_async::i2c::I2c;

use crate::poller::TickSource;
use crate::report::{Axis, EventSink, Key, ReportError};

/// One observable action on the bus or the delay provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BusEvent {
    Write { address: u8, bytes: Vec<u8> },
    Read { address: u8, len: usize },
    Delay { us: u32 },
}

/// Ordered record of bus traffic and delays, shared between mocks.
#[derive(Clone, Default)]
pub struct BusLog(Arc<Mutex<Vec<BusEvent>>>);

impl BusLog {
    pub fn push(&self, event: BusEvent) {
        self.0.lock().unwrap().push(event);
    }

    pub fn events(&self) -> Vec<BusEvent> {
        self.0.lock().unwrap().clone()
    }

    pub fn writes(&self) -> Vec<Vec<u8>> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                BusEvent::Write { bytes, .. } => Some(bytes),
                _ => None,
            })
            .collect()
    }

    pub fn clear(&self) {
        self.0.lock().unwrap().clear();
    }
}

/// Scripted I2C bus.
///
/// Writes succeed unless a failure was queued; reads pop queued responses
/// and fail with `ErrorKind::Other` once the queue is empty.
pub struct MockBus {
    log: BusLog,
    writes: VecDeque<Result<(), ErrorKind>>,
    reads: VecDeque<Result<Vec<u8>, ErrorKind>>,
}

impl MockBus {
    pub fn new() -> Self {
        Self {
            log: BusLog::default(),
            writes: VecDeque::new(),
            reads: VecDeque::new(),
        }
    }

    pub fn with_write(mut self, result: Result<(), ErrorKind>) -> Self {
        self.writes.push_back(result);
        self
    }

    pub fn with_read(mut self, result: Result<Vec<u8>, ErrorKind>) -> Self {
        self.reads.push_back(result);
        self
    }

    pub fn log(&self) -> BusLog {
        self.log.clone()
    }
}

impl ErrorType for MockBus {
    type Error = ErrorKind;
}

impl I2c for MockBus {
    async fn transaction(
        &mut self,
        address: u8,
        operations: &mut [Operation<'_>],
    ) -> Result<(), Self::Error> {
        for op in operations {
            match op {
                Operation::Write(bytes) => {
                    self.log.push(BusEvent::Write {
                        address,
                        bytes: bytes.to_vec(),
                    });
                    self.writes.pop_front().unwrap_or(Ok(()))?;
                }
                Operation::Read(buf) => {
                    self.log.push(BusEvent::Read {
                        address,
                        len: buf.len(),
                    });
                    let data = self.reads.pop_front().unwrap_or(Err(ErrorKind::Other))?;
                    if data.len() != buf.len() {
                        return Err(ErrorKind::Other);
                    }
                    buf.copy_from_slice(&data);
                }
            }
        }
        Ok(())
    }
}

/// Delay provider that records requested waits instead of sleeping.
pub struct MockDelay {
    log: BusLog,
}

impl MockDelay {
    pub fn new(log: BusLog) -> Self {
        Self { log }
    }
}

impl DelayNs for MockDelay {
    async fn delay_ns(&mut self, ns: u32) {
        self.log.push(BusEvent::Delay { us: ns / 1_000 });
    }
}

/// One call observed by [`RecordingSink`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SinkEvent {
    Key(Key, bool),
    Abs(Axis, u8),
    Sync,
}

/// Event sink that records every call.
#[derive(Default)]
pub struct RecordingSink {
    pub events: Vec<SinkEvent>,
    pub fail_sync: Option<ReportError>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sync_count(&self) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, SinkEvent::Sync))
            .count()
    }
}

impl EventSink for RecordingSink {
    fn report_key(&mut self, key: Key, pressed: bool) {
        self.events.push(SinkEvent::Key(key, pressed));
    }

    fn report_abs(&mut self, axis: Axis, value: u8) {
        self.events.push(SinkEvent::Abs(axis, value));
    }

    fn sync(&mut self) -> impl Future<Output = Result<(), ReportError>> {
        self.events.push(SinkEvent::Sync);
        core::future::ready(match self.fail_sync {
            Some(err) => Err(err),
            None => Ok(()),
        })
    }
}

/// Tick source that fires immediately and counts how often it was awaited.
#[derive(Default)]
pub struct CountingTicker {
    pub ticks: usize,
}

impl TickSource for CountingTicker {
    async fn next_tick(&mut self) {
        self.ticks += 1;
    }
}

/// Run a future to completion (simple blocking executor).
///
/// Every future in these tests is immediately ready, so `Pending` is a bug.
pub fn block_on<F: Future>(mut f: F) -> F::Output {
    fn noop_raw_waker() -> RawWaker {
        fn noop(_: *const ()) {}
        fn clone(_: *const ()) -> RawWaker {
            noop_raw_waker()
        }
        static VTABLE: RawWakerVTable = RawWakerVTable::new(clone, noop, noop, noop);
        RawWaker::new(core::ptr::null(), &VTABLE)
    }

    let waker = unsafe { Waker::from_raw(noop_raw_waker()) };
    let mut cx = Context::from_waker(&waker);

    // SAFETY: We don't move f after pinning
    let mut f = unsafe { Pin::new_unchecked(&mut f) };

    match f.as_mut().poll(&mut cx) {
        Poll::Ready(result) => result,
        Poll::Pending => panic!("Mock future returned Pending unexpectedly"),
    }
}
