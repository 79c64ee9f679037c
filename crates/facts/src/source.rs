//! The fact source trait and in-process sources.

use crate::{Fact, Permission, Result, keys};
use chrono::Timelike;

/// A single external reading that becomes one fact in a snapshot.
///
/// Implementations must be read-only with respect to the system they query.
pub trait FactSource: Send + Sync {
    /// Snapshot key this source writes.
    fn key(&self) -> &str;

    /// Query the current value.
    fn read(&self) -> Result<Fact>;

    /// Value recorded when [`read`](Self::read) fails.
    ///
    /// `None` leaves the fact absent from the snapshot, which checks treat as
    /// not satisfied.
    fn fallback(&self) -> Option<Fact>;

    /// Permission the host requires before this source may be queried.
    ///
    /// While it is not granted the provider records the fallback without
    /// calling [`read`](Self::read).
    fn required_permission(&self) -> Option<Permission> {
        None
    }
}

/// A fact with a fixed value.
#[derive(Debug, Clone)]
pub struct StaticSource {
    key: String,
    value: Fact,
}

impl StaticSource {
    pub fn new(key: impl Into<String>, value: impl Into<Fact>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }

    /// Parse a `key=value` override.
    pub fn parse_override(raw: &str) -> Option<Self> {
        let (key, value) = raw.split_once('=')?;
        let key = key.trim();
        if key.is_empty() {
            return None;
        }
        Some(Self::new(key, Fact::parse_literal(value.trim())))
    }
}

impl FactSource for StaticSource {
    fn key(&self) -> &str {
        &self.key
    }

    fn read(&self) -> Result<Fact> {
        Ok(self.value.clone())
    }

    fn fallback(&self) -> Option<Fact> {
        Some(self.value.clone())
    }
}

/// Current hour of day (0-23) in the host's local time zone.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalClock;

impl FactSource for LocalClock {
    fn key(&self) -> &str {
        keys::HOUR_OF_DAY
    }

    fn read(&self) -> Result<Fact> {
        Ok(Fact::Int(i64::from(chrono::Local::now().hour())))
    }

    fn fallback(&self) -> Option<Fact> {
        None
    }
}

/// A clock stopped at a given hour.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub u32);

impl FactSource for FixedClock {
    fn key(&self) -> &str {
        keys::HOUR_OF_DAY
    }

    fn read(&self) -> Result<Fact> {
        Ok(Fact::Int(i64::from(self.0)))
    }

    fn fallback(&self) -> Option<Fact> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_override() {
        let source = StaticSource::parse_override("contact_count=12").unwrap();
        assert_eq!(source.key(), "contact_count");
        assert_eq!(source.read().unwrap(), Fact::Int(12));

        let source = StaticSource::parse_override(" airplane_mode = false ").unwrap();
        assert_eq!(source.key(), "airplane_mode");
        assert_eq!(source.read().unwrap(), Fact::Bool(false));
    }

    #[test]
    fn test_parse_override_rejects_missing_key() {
        assert!(StaticSource::parse_override("=5").is_none());
        assert!(StaticSource::parse_override("no_separator").is_none());
    }

    #[test]
    fn test_local_clock_in_range() {
        let hour = LocalClock.read().unwrap().as_int().unwrap();
        assert!((0..24).contains(&hour));
    }
}
