//! Platform-agnostic Nunchuk protocol core: handshake, timed register
//! reads, decoding and event reporting.
//!
//! This crate has no platform-specific dependencies. The bus is any
//! [`embedded_hal_async::i2c::I2c`] implementation, settle delays come from an
//! [`embedded_hal_async::delay::DelayNs`] provider, and the poll cadence is
//! driven by the host through [`TickSource`]. It builds for embedded
//! `no_std` targets and on host for testing.
//!
//! # Overview
//!
//! - [`transport`]: Timed send/receive wrapper ([`TransportClient`])
//! - [`handshake`]: One-shot initialization ([`Handshake`])
//! - [`poller`]: Periodic read cycle ([`PollSession`], [`TickSource`])
//! - [`decoder`]: Snapshot to state decoding ([`decode`])
//! - [`report`]: Event sink trait and reporter ([`EventSink`], [`report`](report::report))
//! - [`driver`]: Attach/detach lifecycle ([`Nunchuk`])
//! - [`config`]: Address, timing and cadence ([`NunchukConfig`])
//!
//! # Protocol
//!
//! | Step | Bytes sent | Purpose |
//! |------|------------|---------|
//! | Handshake 1 | `F0 55` | unlock |
//! | Handshake 2 | `FB 00` | select report mode |
//! | Read select | `00` | request next 6-byte report |
//!
//! At least 1 ms separates the handshake writes and at least 10 ms separates
//! a read select from the 6-byte read.
//!
//! # Example
//!
//! ```rust
//! use nunchuk_core::{decode, RegisterSnapshot};
//!
//! // Stick centred, Z held (bit 0 clear), C released (bit 1 set)
//! let state = decode(&RegisterSnapshot::new([125, 120, 0, 0, 0, 0b10]));
//! assert!(state.z_pressed);
//! assert!(!state.c_pressed);
//! assert_eq!((state.x, state.y), (125, 120));
//! ```
//!
//! # Features
//!
//! - **`std`**: Enable standard library support (for host testing)
//! - **`defmt`**: Enable defmt formatting and logging (for embedded targets)
//! - **`log`**: Emit diagnostics through the `log` facade

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(any(test, feature = "std"))]
extern crate std;

#[macro_use]
mod fmt;

pub mod config;
pub mod decoder;
pub mod driver;
pub mod handshake;
pub mod poller;
pub mod report;
pub mod transport;
pub mod types;

#[cfg(test)]
mod testutil;

// Re-export main types at crate root
pub use config::{
    ConfigError, NunchukConfig, PollConfig, TimingConfig, COMPATIBLE, DEFAULT_ADDRESS,
    DEFAULT_POLL_INTERVAL_MS, DEVICE_NAME,
};
pub use decoder::decode;
pub use driver::{AttachError, Nunchuk};
pub use handshake::{Handshake, HandshakeError, HandshakeState, HandshakeStep};
pub use poller::{PollCycleError, PollSession, PollStats, PollStep, TickSource};
pub use report::{AbsInfo, Axis, EventSink, Key, ReportError, ABS_X_INFO, ABS_Y_INFO};
pub use transport::{TransportClient, TransportError};
pub use types::{Acceleration, ControllerState, RegisterSnapshot, SNAPSHOT_LEN};
