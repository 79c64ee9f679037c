//! Text rendering for gate results and snapshots.

use facts::Snapshot;
use gate::GateResult;

pub const SUCCESS_HEADER: &str = "Login Successful!";
pub const FAILURE_HEADER: &str = "Login Failed! Issues:";

/// Render a result as the success line or the failure header plus one
/// `- <message>` line per failure.
pub fn render_result(result: &GateResult) -> String {
    if result.passed() {
        return SUCCESS_HEADER.to_string();
    }

    let mut out = String::from(FAILURE_HEADER);
    for message in result.messages() {
        out.push_str("\n- ");
        out.push_str(message);
    }
    out
}

/// One `key = value` line per fact, ordered by key.
pub fn render_snapshot(snapshot: &Snapshot) -> String {
    let width = snapshot.iter().map(|(k, _)| k.len()).max().unwrap_or(0);
    snapshot
        .iter()
        .map(|(key, value)| format!("{key:<width$} = {value}"))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use facts::keys;
    use gate::{Condition, ConditionGate, checks};

    fn gate() -> ConditionGate {
        ConditionGate::new()
            .with_condition(Condition::fallible(
                "bluetooth_enabled",
                "Bluetooth is not enabled",
                checks::flag_set(keys::BLUETOOTH_ENABLED),
            ))
            .with_condition(Condition::fallible(
                "airplane_mode_off",
                "Airplane mode is enabled",
                checks::flag_clear(keys::AIRPLANE_MODE),
            ))
    }

    #[test]
    fn test_render_success() {
        let snapshot = Snapshot::builder()
            .fact(keys::BLUETOOTH_ENABLED, true)
            .fact(keys::AIRPLANE_MODE, false)
            .build();
        assert_eq!(render_result(&gate().evaluate(&snapshot)), "Login Successful!");
    }

    #[test]
    fn test_render_failures() {
        let snapshot = Snapshot::builder()
            .fact(keys::BLUETOOTH_ENABLED, false)
            .fact(keys::AIRPLANE_MODE, true)
            .build();
        assert_eq!(
            render_result(&gate().evaluate(&snapshot)),
            "Login Failed! Issues:\n- Bluetooth is not enabled\n- Airplane mode is enabled"
        );
    }

    #[test]
    fn test_render_snapshot_aligns_keys() {
        let snapshot = Snapshot::builder()
            .fact("hour_of_day", 10_i64)
            .fact("input", "57")
            .build();
        assert_eq!(
            render_snapshot(&snapshot),
            "hour_of_day = 10\ninput       = \"57\""
        );
    }
}
