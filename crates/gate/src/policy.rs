//! Policy configuration and the default condition set.

use crate::checks::{self, HourWindow};
use crate::{Condition, ConditionGate, Error, Result};
use facts::{Permission, keys};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::Path;

pub const BATTERY_PASSWORD: &str = "battery_password";
pub const BLUETOOTH_ENABLED: &str = "bluetooth_enabled";
pub const CONTACTS_COUNT: &str = "contacts_count";
pub const IMAGES_COUNT: &str = "images_count";
pub const AIRPLANE_MODE_OFF: &str = "airplane_mode_off";
pub const TIME_WINDOW: &str = "time_window";

/// Policy configuration loaded from TOML.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Policy {
    /// Counted resources must exceed this value.
    #[serde(default = "default_threshold")]
    pub resource_threshold: i64,

    /// Hours during which access is allowed (inclusive).
    #[serde(default)]
    pub time_window: HourWindow,

    /// Permissions that must be granted, checked in this order.
    #[serde(default = "default_required_permissions")]
    pub required_permissions: Vec<Permission>,

    /// Conditions to leave out of the gate, by name.
    #[serde(default)]
    pub disabled: BTreeSet<String>,
}

fn default_threshold() -> i64 {
    5
}

fn default_required_permissions() -> Vec<Permission> {
    vec![Permission::Storage, Permission::Calendar, Permission::Camera]
}

impl Default for Policy {
    fn default() -> Self {
        Self {
            resource_threshold: default_threshold(),
            time_window: HourWindow::default(),
            required_permissions: default_required_permissions(),
            disabled: BTreeSet::new(),
        }
    }
}

/// Condition name for a required permission, e.g. `camera_permission`.
pub fn permission_condition_name(permission: Permission) -> String {
    format!("{}_permission", permission.label().to_lowercase())
}

impl Policy {
    /// Load policy from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::parse(&content)
    }

    /// Parse policy from TOML string.
    pub fn parse(toml: &str) -> Result<Self> {
        let policy: Self = toml::from_str(toml).map_err(|e| Error::Parse(e.to_string()))?;
        policy.validate()?;
        Ok(policy)
    }

    /// Names of every condition this policy can register.
    pub fn condition_names(&self) -> Vec<String> {
        let mut names = vec![
            BATTERY_PASSWORD.to_string(),
            BLUETOOTH_ENABLED.to_string(),
            CONTACTS_COUNT.to_string(),
            IMAGES_COUNT.to_string(),
        ];
        names.extend(
            self.required_permissions
                .iter()
                .map(|p| permission_condition_name(*p)),
        );
        names.push(AIRPLANE_MODE_OFF.to_string());
        names.push(TIME_WINDOW.to_string());
        names
    }

    pub fn validate(&self) -> Result<()> {
        let HourWindow { start, end } = self.time_window;
        if start > 23 || end > 23 {
            return Err(Error::Invalid(format!(
                "time window hours must be 0-23, got {start}-{end}"
            )));
        }
        if start > end {
            return Err(Error::Invalid(format!(
                "time window start {start} is after end {end}"
            )));
        }

        let mut seen = BTreeSet::new();
        for permission in &self.required_permissions {
            if !seen.insert(permission) {
                return Err(Error::Invalid(format!(
                    "permission {permission} is required more than once"
                )));
            }
        }

        let known = self.condition_names();
        if let Some(unknown) = self.disabled.iter().find(|d| !known.contains(*d)) {
            return Err(Error::Invalid(format!("unknown condition '{unknown}'")));
        }
        Ok(())
    }

    /// Build the gate for this policy.
    ///
    /// Registration order: battery password, bluetooth, contact count, image
    /// count, required permissions, airplane mode, time window.
    pub fn build_gate(&self) -> Result<ConditionGate> {
        self.validate()?;

        let mut conditions = vec![
            Condition::fallible(
                BATTERY_PASSWORD,
                "Incorrect battery percentage password",
                checks::secret_matches(keys::BATTERY_LEVEL, keys::PASSWORD_INPUT),
            ),
            Condition::fallible(
                BLUETOOTH_ENABLED,
                "Bluetooth is not enabled",
                checks::flag_set(keys::BLUETOOTH_ENABLED),
            ),
            Condition::fallible(
                CONTACTS_COUNT,
                "Not enough contacts available",
                checks::count_above(keys::CONTACT_COUNT, self.resource_threshold),
            ),
            Condition::fallible(
                IMAGES_COUNT,
                "Not enough images in storage",
                checks::count_above(keys::IMAGE_COUNT, self.resource_threshold),
            ),
        ];
        for permission in &self.required_permissions {
            conditions.push(Condition::fallible(
                permission_condition_name(*permission),
                format!("{} permission not granted", permission.label()),
                checks::permission_granted(*permission),
            ));
        }
        conditions.push(Condition::fallible(
            AIRPLANE_MODE_OFF,
            "Airplane mode is enabled",
            checks::flag_clear(keys::AIRPLANE_MODE),
        ));
        conditions.push(Condition::fallible(
            TIME_WINDOW,
            "Time condition not met",
            checks::hour_within(keys::HOUR_OF_DAY, self.time_window),
        ));

        let mut gate = ConditionGate::new();
        for condition in conditions {
            if !self.disabled.contains(condition.name()) {
                gate.register(condition);
            }
        }
        Ok(gate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use facts::Snapshot;

    fn satisfied() -> facts::SnapshotBuilder {
        Snapshot::builder()
            .fact(keys::BATTERY_LEVEL, 57_i64)
            .fact(keys::PASSWORD_INPUT, "57")
            .fact(keys::BLUETOOTH_ENABLED, true)
            .fact(keys::CONTACT_COUNT, 12_i64)
            .fact(keys::IMAGE_COUNT, 40_i64)
            .fact(Permission::Storage.fact_key(), true)
            .fact(Permission::Calendar.fact_key(), true)
            .fact(Permission::Camera.fact_key(), true)
            .fact(keys::AIRPLANE_MODE, false)
            .fact(keys::HOUR_OF_DAY, 12_i64)
    }

    #[test]
    fn test_default_policy() {
        let policy = Policy::default();
        assert_eq!(policy.resource_threshold, 5);
        assert_eq!(policy.time_window, HourWindow::new(9, 21));
        assert_eq!(policy.build_gate().unwrap().len(), 9);
    }

    #[test]
    fn test_default_registration_order() {
        let gate = Policy::default().build_gate().unwrap();
        let names: Vec<_> = gate.conditions().iter().map(|c| c.name()).collect();
        assert_eq!(
            names,
            vec![
                "battery_password",
                "bluetooth_enabled",
                "contacts_count",
                "images_count",
                "storage_permission",
                "calendar_permission",
                "camera_permission",
                "airplane_mode_off",
                "time_window",
            ]
        );
    }

    #[test]
    fn test_all_satisfied_passes() {
        let gate = Policy::default().build_gate().unwrap();
        let result = gate.evaluate(&satisfied().build());
        assert!(result.passed());
    }

    #[test]
    fn test_parse_toml() {
        let toml = r#"
resource_threshold = 10
time_window = { start = 9, end = 17 }
required_permissions = ["camera"]
disabled = ["images_count"]
"#;
        let policy = Policy::parse(toml).unwrap();
        assert_eq!(policy.resource_threshold, 10);
        assert_eq!(policy.time_window, HourWindow::new(9, 17));
        assert_eq!(policy.required_permissions, vec![Permission::Camera]);

        let gate = policy.build_gate().unwrap();
        let names: Vec<_> = gate.conditions().iter().map(|c| c.name()).collect();
        assert!(!names.contains(&"images_count"));
        assert!(names.contains(&"camera_permission"));
        assert!(!names.contains(&"storage_permission"));

        let result = gate.evaluate(&satisfied().fact(keys::HOUR_OF_DAY, 18_i64).build());
        assert_eq!(result.messages(), vec!["Time condition not met"]);
    }

    #[test]
    fn test_parse_empty_uses_defaults() {
        assert_eq!(Policy::parse("").unwrap(), Policy::default());
    }

    #[test]
    fn test_rejects_inverted_window() {
        let err = Policy::parse("time_window = { start = 22, end = 6 }").unwrap_err();
        assert!(matches!(err, Error::Invalid(_)));
    }

    #[test]
    fn test_rejects_out_of_range_hour() {
        let err = Policy::parse("time_window = { start = 9, end = 24 }").unwrap_err();
        assert!(matches!(err, Error::Invalid(_)));
    }

    #[test]
    fn test_rejects_unknown_disabled_condition() {
        let err = Policy::parse(r#"disabled = ["fingerprint"]"#).unwrap_err();
        assert!(matches!(err, Error::Invalid(_)));
    }

    #[test]
    fn test_rejects_duplicate_permission() {
        let err = Policy::parse(r#"required_permissions = ["camera", "camera"]"#).unwrap_err();
        assert!(matches!(err, Error::Invalid(_)));
    }

    #[test]
    fn test_parse_error() {
        let err = Policy::parse("resource_threshold = \"many\"").unwrap_err();
        assert!(matches!(err, Error::Parse(_)));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("policy.toml");
        std::fs::write(&path, "resource_threshold = 2\n").unwrap();

        let policy = Policy::load(&path).unwrap();
        assert_eq!(policy.resource_threshold, 2);
    }
}
