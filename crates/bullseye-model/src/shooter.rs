use serde::{Deserialize, Serialize};

use crate::ShooterId;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shooter {
    pub id: ShooterId,
    pub name: String,
    /// NRA membership number, if known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nra_number: Option<String>,
    /// CMP competitor number, if known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cmp_number: Option<String>,
}

impl Shooter {
    pub fn new(id: ShooterId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            nra_number: None,
            cmp_number: None,
        }
    }
}
