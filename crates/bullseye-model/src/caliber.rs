use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Calibers with a fixed report position, in display order.
const PRECEDENCE: [&str; 6] = [
    ".22",
    "CF",
    ".45",
    "Service Pistol",
    "Service Revolver",
    "DR",
];

/// Ammunition class a score was fired under.
///
/// Ordering follows report precedence: `.22`, `CF`, `.45`, `Service Pistol`,
/// `Service Revolver`, `DR`, then every other caliber by name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Caliber(String);

impl Caliber {
    pub fn new(value: impl Into<String>) -> Self {
        let value = value.into();
        Self(value.trim().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Position in the fixed precedence list; unlisted calibers share the last rank.
    pub fn precedence(&self) -> usize {
        PRECEDENCE
            .iter()
            .position(|known| *known == self.0)
            .unwrap_or(PRECEDENCE.len())
    }
}

impl From<&str> for Caliber {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl fmt::Display for Caliber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Ord for Caliber {
    fn cmp(&self, other: &Self) -> Ordering {
        self.precedence()
            .cmp(&other.precedence())
            .then_with(|| self.0.cmp(&other.0))
    }
}

impl PartialOrd for Caliber {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
