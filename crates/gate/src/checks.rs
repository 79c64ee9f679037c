//! Reusable checks for building conditions.
//!
//! Each function returns a closure suitable for
//! [`Condition::fallible`](crate::Condition::fallible). A missing or mistyped
//! fact is reported as a [`CheckError`], which the condition turns into
//! "not met".

use crate::CheckError;
use facts::{Fact, Permission, Snapshot};
use serde::{Deserialize, Serialize};

/// A check over one snapshot; `Err` means the check could not be computed.
pub type Check = Box<dyn Fn(&Snapshot) -> Result<bool, CheckError> + Send + Sync>;

/// An inclusive range of hours of the day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HourWindow {
    pub start: u32,
    pub end: u32,
}

impl HourWindow {
    pub const fn new(start: u32, end: u32) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, hour: i64) -> bool {
        hour >= i64::from(self.start) && hour <= i64::from(self.end)
    }
}

impl Default for HourWindow {
    fn default() -> Self {
        Self::new(9, 21)
    }
}

impl std::fmt::Display for HourWindow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:02}:00-{:02}:59", self.start, self.end)
    }
}

fn fact<'a>(snapshot: &'a Snapshot, key: &str) -> Result<&'a Fact, CheckError> {
    snapshot
        .get(key)
        .ok_or_else(|| CheckError::MissingFact(key.to_string()))
}

fn bool_fact(snapshot: &Snapshot, key: &str) -> Result<bool, CheckError> {
    fact(snapshot, key)?.as_bool().ok_or_else(|| CheckError::WrongType {
        key: key.to_string(),
        expected: "a boolean",
    })
}

fn int_fact(snapshot: &Snapshot, key: &str) -> Result<i64, CheckError> {
    fact(snapshot, key)?.as_int().ok_or_else(|| CheckError::WrongType {
        key: key.to_string(),
        expected: "an integer",
    })
}

fn text_fact<'a>(snapshot: &'a Snapshot, key: &str) -> Result<&'a str, CheckError> {
    fact(snapshot, key)?.as_text().ok_or_else(|| CheckError::WrongType {
        key: key.to_string(),
        expected: "text",
    })
}

/// The integer reading under `reading_key`, rendered in decimal, equals the
/// text under `input_key` exactly.
pub fn secret_matches(reading_key: impl Into<String>, input_key: impl Into<String>) -> Check {
    let reading_key = reading_key.into();
    let input_key = input_key.into();
    Box::new(move |s: &Snapshot| {
        let reading = int_fact(s, &reading_key)?;
        let input = text_fact(s, &input_key)?;
        Ok(input == reading.to_string())
    })
}

/// The boolean fact is `true`.
pub fn flag_set(key: impl Into<String>) -> Check {
    let key = key.into();
    Box::new(move |s: &Snapshot| bool_fact(s, &key))
}

/// The boolean fact is `false`.
pub fn flag_clear(key: impl Into<String>) -> Check {
    let key = key.into();
    Box::new(move |s: &Snapshot| bool_fact(s, &key).map(|on| !on))
}

/// The counted fact is strictly greater than `threshold`.
pub fn count_above(key: impl Into<String>, threshold: i64) -> Check {
    let key = key.into();
    Box::new(move |s: &Snapshot| Ok(int_fact(s, &key)? > threshold))
}

/// The permission's grant fact is `true`.
pub fn permission_granted(permission: Permission) -> Check {
    flag_set(permission.fact_key())
}

/// The hour fact lies inside the window.
pub fn hour_within(key: impl Into<String>, window: HourWindow) -> Check {
    let key = key.into();
    Box::new(move |s: &Snapshot| Ok(window.contains(int_fact(s, &key)?)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use facts::keys;

    #[test]
    fn test_secret_matches() {
        let check = secret_matches(keys::BATTERY_LEVEL, keys::PASSWORD_INPUT);
        let snapshot = |level: i64, input: &str| {
            Snapshot::builder()
                .fact(keys::BATTERY_LEVEL, level)
                .fact(keys::PASSWORD_INPUT, input)
                .build()
        };

        assert_eq!(check(&snapshot(57, "57")), Ok(true));
        assert_eq!(check(&snapshot(60, "57")), Ok(false));
        assert_eq!(check(&snapshot(57, "057")), Ok(false));
        assert_eq!(check(&snapshot(57, "abc")), Ok(false));
    }

    #[test]
    fn test_secret_without_reading() {
        let check = secret_matches(keys::BATTERY_LEVEL, keys::PASSWORD_INPUT);
        let snapshot = Snapshot::builder()
            .fact(keys::PASSWORD_INPUT, "-1")
            .build();
        assert_eq!(
            check(&snapshot),
            Err(CheckError::MissingFact(keys::BATTERY_LEVEL.into()))
        );
    }

    #[test]
    fn test_count_above_is_strict() {
        let check = count_above(keys::CONTACT_COUNT, 5);
        let with = |n: i64| Snapshot::builder().fact(keys::CONTACT_COUNT, n).build();

        assert_eq!(check(&with(5)), Ok(false));
        assert_eq!(check(&with(6)), Ok(true));
        assert_eq!(check(&with(0)), Ok(false));
    }

    #[test]
    fn test_flag_checks_reject_wrong_type() {
        let snapshot = Snapshot::builder().fact(keys::AIRPLANE_MODE, 1_i64).build();
        assert!(matches!(
            flag_clear(keys::AIRPLANE_MODE)(&snapshot),
            Err(CheckError::WrongType { .. })
        ));
    }

    #[test]
    fn test_flag_clear() {
        let off = Snapshot::builder().fact(keys::AIRPLANE_MODE, false).build();
        let on = Snapshot::builder().fact(keys::AIRPLANE_MODE, true).build();
        assert_eq!(flag_clear(keys::AIRPLANE_MODE)(&off), Ok(true));
        assert_eq!(flag_clear(keys::AIRPLANE_MODE)(&on), Ok(false));
    }

    #[test]
    fn test_hour_window_is_inclusive() {
        let window = HourWindow::new(9, 17);
        assert!(!window.contains(8));
        assert!(window.contains(9));
        assert!(window.contains(17));
        assert!(!window.contains(18));
    }

    #[test]
    fn test_hour_within() {
        let check = hour_within(keys::HOUR_OF_DAY, HourWindow::default());
        let at = |h: i64| Snapshot::builder().fact(keys::HOUR_OF_DAY, h).build();
        assert_eq!(check(&at(21)), Ok(true));
        assert_eq!(check(&at(22)), Ok(false));
        assert_eq!(check(&at(3)), Ok(false));
    }
}
