//! Named predicates over a snapshot.

use crate::CheckError;
use facts::Snapshot;
use tracing::debug;

type Predicate = dyn Fn(&Snapshot) -> bool + Send + Sync;

/// A named predicate plus the message reported when it is not met.
pub struct Condition {
    name: String,
    failure_message: String,
    predicate: Box<Predicate>,
}

impl Condition {
    pub fn new(
        name: impl Into<String>,
        failure_message: impl Into<String>,
        predicate: impl Fn(&Snapshot) -> bool + Send + Sync + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            failure_message: failure_message.into(),
            predicate: Box::new(predicate),
        }
    }

    /// Build a condition from a check that may fail to compute.
    ///
    /// An `Err` from the check counts as not met.
    pub fn fallible(
        name: impl Into<String>,
        failure_message: impl Into<String>,
        check: impl Fn(&Snapshot) -> Result<bool, CheckError> + Send + Sync + 'static,
    ) -> Self {
        let name = name.into();
        let label = name.clone();
        Self::new(name, failure_message, move |snapshot| {
            check(snapshot).unwrap_or_else(|e| {
                debug!(condition = %label, error = %e, "check could not be computed");
                false
            })
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn failure_message(&self) -> &str {
        &self.failure_message
    }

    /// Whether the condition holds for this snapshot.
    pub fn is_met(&self, snapshot: &Snapshot) -> bool {
        (self.predicate)(snapshot)
    }
}

impl std::fmt::Debug for Condition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Condition")
            .field("name", &self.name)
            .field("failure_message", &self.failure_message)
            .finish_non_exhaustive()
    }
}
