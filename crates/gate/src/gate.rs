//! The condition gate.

use crate::{Condition, Failure, GateResult};
use facts::Snapshot;
use tracing::{debug, info};

/// An ordered list of conditions evaluated together against one snapshot.
///
/// Conditions are registered up front through `&mut self`; evaluation takes
/// `&self`, so the list cannot change while an evaluation is running.
#[derive(Debug, Default)]
pub struct ConditionGate {
    conditions: Vec<Condition>,
}

impl ConditionGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a condition to the end of the list.
    pub fn register(&mut self, condition: Condition) {
        self.conditions.push(condition);
    }

    pub fn with_condition(mut self, condition: Condition) -> Self {
        self.register(condition);
        self
    }

    pub fn conditions(&self) -> &[Condition] {
        &self.conditions
    }

    pub fn len(&self) -> usize {
        self.conditions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    /// Evaluate every condition against the snapshot.
    ///
    /// All conditions are checked, whatever the earlier outcomes; failures are
    /// reported in registration order. A gate with no conditions passes.
    pub fn evaluate(&self, snapshot: &Snapshot) -> GateResult {
        let mut failures = Vec::new();

        for condition in &self.conditions {
            let met = condition.is_met(snapshot);
            debug!(condition = condition.name(), met, "condition evaluated");
            if !met {
                failures.push(Failure {
                    condition: condition.name().to_string(),
                    message: condition.failure_message().to_string(),
                });
            }
        }

        let result = GateResult::from_failures(failures);
        info!(
            passed = result.passed(),
            checked = self.conditions.len(),
            failed = result.failures().len(),
            "gate evaluated"
        );
        result
    }
}
