use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FormId(pub u32);

impl fmt::Display for FormId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:08X}", self.0)
    }
}

/// Category of a named definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormKind {
    Faction,
    Perk,
    Race,
    Spell,
    MagicEffect,
    Global,
    Keyword,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FormRef {
    pub id: FormId,
    pub kind: FormKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DebuffKind {
    Perk,
    Spell,
}

/// A perk or spell used as a penalty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DebuffRef {
    pub id: FormId,
    pub kind: DebuffKind,
}

impl DebuffRef {
    pub fn perk(id: FormId) -> Self {
        Self {
            id,
            kind: DebuffKind::Perk,
        }
    }

    pub fn spell(id: FormId) -> Self {
        Self {
            id,
            kind: DebuffKind::Spell,
        }
    }

    /// Only perks and spells can be applied as debuffs.
    pub fn from_form(form: FormRef) -> Option<Self> {
        match form.kind {
            FormKind::Perk => Some(Self::perk(form.id)),
            FormKind::Spell => Some(Self::spell(form.id)),
            _ => None,
        }
    }
}

impl fmt::Display for DebuffRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            DebuffKind::Perk => write!(f, "perk {}", self.id),
            DebuffKind::Spell => write!(f, "spell {}", self.id),
        }
    }
}
