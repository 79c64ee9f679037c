//! Fact capture for the Turnstile condition gate.
//!
//! This crate is the query layer: it reads external state (permission grants,
//! radio state, counted resources, sensor readings, the clock, and user input)
//! and freezes it into an immutable [`Snapshot`]. It holds no policy.
//!
//! # Core Concepts
//!
//! - [`Fact`] — a typed value (`Bool`, `Int`, `Text`) under a stable key.
//! - [`Snapshot`] — the facts captured for one evaluation.
//! - [`FactSource`] — one external reading, with a conservative fallback used
//!   when the reading cannot be taken.
//! - [`FactProvider`] — reads every source and records permission grants.
//! - [`PermissionRequester`] — the asynchronous grant flow whose results are
//!   fed back through [`FactProvider::apply_grants`].
//!
//! # Example
//!
//! ```
//! use facts::{FactProvider, FixedClock, StaticSource, UserInput, keys};
//!
//! let provider = FactProvider::new()
//!     .with_source(StaticSource::new(keys::BATTERY_LEVEL, 57_i64))
//!     .with_source(FixedClock(10));
//!
//! let snapshot = provider.capture(&UserInput::new("57"));
//! assert_eq!(snapshot.int(keys::BATTERY_LEVEL), Some(57));
//! assert_eq!(snapshot.text(keys::PASSWORD_INPUT), Some("57"));
//! ```

mod error;
mod fact;
pub mod host;
mod permission;
mod provider;
mod snapshot;
mod source;

pub use error::{Error, Result};
pub use fact::{Fact, UserInput, keys};
pub use host::{AirplaneMode, BatteryLevel, DirectoryCount, RadioEnabled};
pub use permission::{Permission, PermissionGrants, PermissionRequester, PresetRequester};
pub use provider::FactProvider;
pub use snapshot::{Snapshot, SnapshotBuilder};
pub use source::{FactSource, FixedClock, LocalClock, StaticSource};
