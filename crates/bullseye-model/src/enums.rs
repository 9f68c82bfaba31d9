//! Match-type and aggregate-type tags.
//!
//! Both tags are stored as text. Text that does not name a known tag is kept
//! verbatim in an `Other` variant so foreign or legacy records still load; the
//! catalog in `bullseye-core` resolves such tags to an empty configuration.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Course of fire declared by a match-type instance.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum MatchType {
    /// National Match Course: one slow, one timed, one rapid fire string.
    Nmc,
    /// 600 point course: two strings of each fire.
    SixHundred,
    /// 900 point course: the 600 course plus an embedded NMC.
    NineHundred,
    /// President's 100 style course.
    Presidents,
    /// Any tag outside the catalog.
    Other(String),
}

impl MatchType {
    /// Every tag the catalog knows about, in catalog order.
    pub const KNOWN: [MatchType; 4] = [
        MatchType::Nmc,
        MatchType::SixHundred,
        MatchType::NineHundred,
        MatchType::Presidents,
    ];

    /// Returns the canonical tag text.
    pub fn as_str(&self) -> &str {
        match self {
            MatchType::Nmc => "NMC",
            MatchType::SixHundred => "600",
            MatchType::NineHundred => "900",
            MatchType::Presidents => "Presidents",
            MatchType::Other(value) => value,
        }
    }
}

impl fmt::Display for MatchType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MatchType {
    type Err = std::convert::Infallible;

    /// Case-insensitive; unknown text becomes [`MatchType::Other`].
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let parsed = match trimmed.to_uppercase().as_str() {
            "NMC" => MatchType::Nmc,
            "600" => MatchType::SixHundred,
            "900" => MatchType::NineHundred,
            "PRESIDENTS" => MatchType::Presidents,
            _ => MatchType::Other(trimmed.to_string()),
        };
        Ok(parsed)
    }
}

impl From<String> for MatchType {
    fn from(value: String) -> Self {
        match value.parse() {
            Ok(parsed) => parsed,
            Err(never) => match never {},
        }
    }
}

impl From<MatchType> for String {
    fn from(value: MatchType) -> Self {
        match value {
            MatchType::Other(text) => text,
            known => known.as_str().to_string(),
        }
    }
}

/// Cross-match aggregate declared by a match.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum AggregateType {
    #[default]
    None,
    /// Best two 900s per caliber.
    Eighteen2x900,
    /// Best three 600s per caliber.
    Eighteen3x600,
    /// Best three 900s per caliber.
    TwentySevenHundred,
    /// Any tag outside the catalog; treated like `None`.
    Other(String),
}

impl AggregateType {
    pub fn as_str(&self) -> &str {
        match self {
            AggregateType::None => "none",
            AggregateType::Eighteen2x900 => "1800-2x900",
            AggregateType::Eighteen3x600 => "1800-3x600",
            AggregateType::TwentySevenHundred => "2700",
            AggregateType::Other(value) => value,
        }
    }

    /// Returns true when a known aggregate is declared.
    pub fn is_declared(&self) -> bool {
        !matches!(self, AggregateType::None | AggregateType::Other(_))
    }
}

impl fmt::Display for AggregateType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AggregateType {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let normalized = trimmed.to_lowercase().replace('_', "-");
        let parsed = match normalized.as_str() {
            "" | "none" => AggregateType::None,
            "1800-2x900" => AggregateType::Eighteen2x900,
            "1800-3x600" => AggregateType::Eighteen3x600,
            "2700" => AggregateType::TwentySevenHundred,
            _ => AggregateType::Other(trimmed.to_string()),
        };
        Ok(parsed)
    }
}

impl From<String> for AggregateType {
    fn from(value: String) -> Self {
        match value.parse() {
            Ok(parsed) => parsed,
            Err(never) => match never {},
        }
    }
}

impl From<AggregateType> for String {
    fn from(value: AggregateType) -> Self {
        match value {
            AggregateType::Other(text) => text,
            known => known.as_str().to_string(),
        }
    }
}
