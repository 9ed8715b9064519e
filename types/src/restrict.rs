use serde::{Deserialize, Serialize};

/// Which action a policy keyword guards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RestrictOn {
    #[default]
    Equip,
    Cast,
}

impl RestrictOn {
    /// Keyword prefix (including the separating colon) for this action.
    pub fn prefix(self) -> &'static str {
        match self {
            Self::Equip => "RestrictEquip:",
            Self::Cast => "RestrictCast:",
        }
    }
}

/// Whether a decision is a hard block or a penalty applied after the fact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RestrictType {
    #[default]
    Restrict,
    Debuff,
}

/// Last known reason an actor failed a filter. Diagnostic only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RestrictReason {
    #[default]
    Generic,
    Level,
    Skill,
}

/// Evaluation context for a single restriction decision.
///
/// Created fresh per call. `reason` is written by the evaluator while
/// scanning terms (last write wins) and read afterwards to pick a
/// notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RestrictParams {
    pub on: RestrictOn,
    pub kind: RestrictType,
    pub reason: RestrictReason,
}

impl RestrictParams {
    pub fn new(on: RestrictOn, kind: RestrictType) -> Self {
        Self {
            on,
            kind,
            reason: RestrictReason::Generic,
        }
    }

    pub fn equip() -> Self {
        Self::new(RestrictOn::Equip, RestrictType::Restrict)
    }

    pub fn equip_debuff() -> Self {
        Self::new(RestrictOn::Equip, RestrictType::Debuff)
    }

    pub fn cast() -> Self {
        Self::new(RestrictOn::Cast, RestrictType::Restrict)
    }
}
