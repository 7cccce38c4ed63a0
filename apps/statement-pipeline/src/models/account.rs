//! Strategy account identity.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a strategy trading account.
///
/// Examples: "mgq01", "trend02". Codes are normalized to lowercase; they
/// come from statement folder names upstream and are case-insensitive there.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StrategyCode(String);

impl StrategyCode {
    /// Create a new strategy code.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into().to_lowercase())
    }

    /// Get the code string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume and return the inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for StrategyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for StrategyCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<String> for StrategyCode {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

impl From<&str> for StrategyCode {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// A strategy account: identity plus display name.
///
/// Immutable once created; every other record references it by code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StrategyAccount {
    /// Unique strategy code.
    pub code: StrategyCode,
    /// Human-readable display name (defaults to the code upstream).
    pub name: String,
}

impl StrategyAccount {
    /// Create an account whose display name is the code itself.
    #[must_use]
    pub fn from_code(code: impl Into<StrategyCode>) -> Self {
        let code = code.into();
        let name = code.as_str().to_string();
        Self { code, name }
    }
}
