use std::fmt;

use serde::{Deserialize, Serialize};

// Generated by build.rs from data/actor_values.csv
include!(concat!(env!("OUT_DIR"), "/actor_values.rs"));

/// Index into the host's actor value table (attributes and skills).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActorValue(pub u32);

impl ActorValue {
    pub const ONE_HANDED: Self = Self(6);
    pub const ARCHERY: Self = Self(8);
    pub const DESTRUCTION: Self = Self(20);
    pub const RESTORATION: Self = Self(22);
    pub const HEALTH: Self = Self(24);

    /// Case-insensitive lookup by name, including engine aliases
    /// (`Marksman` for Archery, `Speechcraft` for Speech).
    pub fn from_name(name: &str) -> Option<Self> {
        ACTOR_VALUES
            .get(name.to_ascii_lowercase().as_str())
            .copied()
            .map(Self)
    }
}

impl fmt::Display for ActorValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "av#{}", self.0)
    }
}
