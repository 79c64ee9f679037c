//! Evaluation outcomes.

use serde::Serialize;

/// One unmet condition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Failure {
    pub condition: String,
    pub message: String,
}

/// Aggregated outcome of one evaluation.
///
/// `passed` is derived from the failure list at construction, so a result
/// passes exactly when it has no failures.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GateResult {
    passed: bool,
    failures: Vec<Failure>,
}

impl GateResult {
    pub(crate) fn from_failures(failures: Vec<Failure>) -> Self {
        Self {
            passed: failures.is_empty(),
            failures,
        }
    }

    pub fn passed(&self) -> bool {
        self.passed
    }

    /// Unmet conditions in registration order.
    pub fn failures(&self) -> &[Failure] {
        &self.failures
    }

    pub fn messages(&self) -> Vec<&str> {
        self.failures.iter().map(|f| f.message.as_str()).collect()
    }
}
