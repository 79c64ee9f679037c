//! Fact values and well-known keys.

use serde::{Deserialize, Serialize};

/// Stable keys for the facts the default policy reads.
pub mod keys {
    pub const BATTERY_LEVEL: &str = "battery_level";
    pub const BLUETOOTH_ENABLED: &str = "bluetooth_enabled";
    pub const CONTACT_COUNT: &str = "contact_count";
    pub const IMAGE_COUNT: &str = "image_count";
    pub const AIRPLANE_MODE: &str = "airplane_mode";
    pub const HOUR_OF_DAY: &str = "hour_of_day";
    pub const PASSWORD_INPUT: &str = "password_input";
}

/// A single typed observation of external state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Fact {
    Bool(bool),
    Int(i64),
    Text(String),
}

impl Fact {
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Fact::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Fact::Int(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Fact::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Parse a command-line style literal: `true`/`false`, an integer, or text.
    /// A double-quoted literal is always text, so `"57"` stays a string.
    pub fn parse_literal(raw: &str) -> Self {
        if let Some(text) = raw.strip_prefix('"').and_then(|r| r.strip_suffix('"')) {
            return Fact::Text(text.to_string());
        }
        match raw {
            "true" => Fact::Bool(true),
            "false" => Fact::Bool(false),
            _ => raw
                .parse::<i64>()
                .map(Fact::Int)
                .unwrap_or_else(|_| Fact::Text(raw.to_string())),
        }
    }
}

impl From<bool> for Fact {
    fn from(value: bool) -> Self {
        Fact::Bool(value)
    }
}

impl From<i64> for Fact {
    fn from(value: i64) -> Self {
        Fact::Int(value)
    }
}

impl From<&str> for Fact {
    fn from(value: &str) -> Self {
        Fact::Text(value.to_string())
    }
}

impl From<String> for Fact {
    fn from(value: String) -> Self {
        Fact::Text(value)
    }
}

impl std::fmt::Display for Fact {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Fact::Bool(b) => write!(f, "{b}"),
            Fact::Int(n) => write!(f, "{n}"),
            Fact::Text(s) => write!(f, "{s:?}"),
        }
    }
}

/// Raw string entered by the user, captured at evaluation time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserInput(pub String);

impl UserInput {
    pub fn new(input: impl Into<String>) -> Self {
        Self(input.into())
    }
}
