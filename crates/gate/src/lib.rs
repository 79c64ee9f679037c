//! Condition gate: evaluate every registered condition against one snapshot.
//!
//! Core principle: **report every unmet condition, not just the first.**
//!
//! A [`ConditionGate`] holds an ordered list of [`Condition`]s. Evaluating it
//! against a [`facts::Snapshot`] checks all of them and returns a
//! [`GateResult`] listing the failures in registration order. Checks that
//! cannot be computed (a missing fact, a value of the wrong type) count as
//! not met; they never abort the evaluation.
//!
//! [`Policy`] builds the default gate from TOML configuration.
//!
//! # Example
//!
//! ```
//! use facts::{Snapshot, keys};
//! use gate::{Condition, ConditionGate, checks};
//!
//! let gate = ConditionGate::new()
//!     .with_condition(Condition::fallible(
//!         "bluetooth_enabled",
//!         "Bluetooth is not enabled",
//!         checks::flag_set(keys::BLUETOOTH_ENABLED),
//!     ))
//!     .with_condition(Condition::fallible(
//!         "contacts_count",
//!         "Not enough contacts available",
//!         checks::count_above(keys::CONTACT_COUNT, 5),
//!     ));
//!
//! let snapshot = Snapshot::builder()
//!     .fact(keys::BLUETOOTH_ENABLED, false)
//!     .fact(keys::CONTACT_COUNT, 5_i64)
//!     .build();
//!
//! let result = gate.evaluate(&snapshot);
//! assert!(!result.passed());
//! assert_eq!(
//!     result.messages(),
//!     vec!["Bluetooth is not enabled", "Not enough contacts available"]
//! );
//! ```

pub mod checks;
mod condition;
mod error;
mod gate;
pub mod policy;
mod result;

pub use condition::Condition;
pub use error::{CheckError, Error, Result};
pub use gate::ConditionGate;
pub use policy::Policy;
pub use result::{Failure, GateResult};
