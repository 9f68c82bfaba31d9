#![deny(unsafe_code)]

use std::fmt;

use crate::ModelError;

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident, $kind:literal) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            pub fn new(value: impl Into<String>) -> Result<Self, ModelError> {
                let value = value.into();
                let trimmed = value.trim();
                if trimmed.is_empty() {
                    return Err(ModelError::InvalidId {
                        kind: $kind,
                        value,
                    });
                }
                Ok(Self(trimmed.to_string()))
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

string_id!(
    /// Identifier of a [`crate::Match`].
    MatchId,
    "match"
);
string_id!(
    /// Identifier of a [`crate::Shooter`].
    ShooterId,
    "shooter"
);
string_id!(
    /// Identifier of a [`crate::ScoreRecord`].
    ScoreId,
    "score"
);
