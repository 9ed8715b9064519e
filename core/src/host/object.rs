use serde::{Deserialize, Serialize};

use super::FormId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ObjectKind {
    Weapon {
        /// Bow or crossbow
        #[serde(default)]
        launcher: bool,
    },
    Ammo,
    Armor,
    Spell,
    Other,
}

/// Read-only definition of a restrictable object (item or spell).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectDef {
    pub id: FormId,
    pub editor_id: String,
    #[serde(default)]
    pub name: String,
    pub kind: ObjectKind,
    /// Keyword editor IDs attached to the definition, in record order
    #[serde(default)]
    pub keywords: Vec<String>,
}

impl ObjectDef {
    pub fn is_ammo(&self) -> bool {
        matches!(self.kind, ObjectKind::Ammo)
    }

    pub fn is_launcher(&self) -> bool {
        matches!(self.kind, ObjectKind::Weapon { launcher: true })
    }

    pub fn has_keyword(&self, keyword: &str) -> bool {
        self.keywords.iter().any(|k| k == keyword)
    }

    /// Name for messages, falling back to the editor ID.
    pub fn display_name(&self) -> &str {
        if self.name.is_empty() {
            &self.editor_id
        } else {
            &self.name
        }
    }
}

/// One stack in an actor's inventory.
#[derive(Debug, Clone, Copy)]
pub struct InventoryEntry<'a> {
    pub object: &'a ObjectDef,
    pub count: i32,
    pub worn: bool,
}
