//! Host simulation interfaces
//!
//! The engine never owns world state. Everything it reads comes through
//! [`Actor`] and [`Forms`]; everything it changes goes out through
//! [`DebuffSink`] and [`Host`].

mod actor_value;
mod form;
mod object;

pub use actor_value::ActorValue;
pub use form::{DebuffKind, DebuffRef, FormId, FormKind, FormRef};
pub use object::{InventoryEntry, ObjectDef, ObjectKind};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sex {
    Male,
    Female,
}

/// Base (template) data of an actor. Absent when the actor's base
/// record cannot be resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActorBase {
    pub sex: Sex,
    pub level: u16,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Hand {
    Left,
    Right,
}

/// Magic caster slots that can begin a cast.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CastSlot {
    Left,
    Right,
    Voice,
}

impl CastSlot {
    /// Map an animation graph tag to the slot that starts casting.
    pub fn from_animation_tag(tag: &str) -> Option<Self> {
        match tag {
            "BeginCastLeft" => Some(Self::Left),
            "BeginCastRight" => Some(Self::Right),
            "BeginCastVoice" => Some(Self::Voice),
            _ => None,
        }
    }
}

/// Definition lookup by editor ID.
pub trait Forms {
    /// Resolve a named definition. `None` if nothing has that editor ID.
    fn lookup(&self, editor_id: &str) -> Option<FormRef>;

    /// Current value of a named global. `None` if no such global exists.
    fn global_value(&self, editor_id: &str) -> Option<f32>;
}

/// Live, read-only view of one actor.
pub trait Actor {
    fn id(&self) -> FormId;

    fn base(&self) -> Option<ActorBase>;

    fn is_player(&self) -> bool;

    fn in_combat(&self) -> bool;

    fn actor_value(&self, value: ActorValue) -> f32;

    /// Rank in a faction, or `None` if the actor is not a member.
    fn faction_rank(&self, faction: FormId) -> Option<i32>;

    fn has_perk(&self, perk: FormId) -> bool;

    fn has_spell(&self, spell: FormId) -> bool;

    fn has_magic_effect(&self, effect: FormId) -> bool;

    fn race(&self) -> Option<FormId>;

    /// Keyword possession on the actor itself (race and base keywords).
    fn has_keyword(&self, keyword: &str) -> bool;

    fn equipped(&self, hand: Hand) -> Option<&ObjectDef>;

    fn current_ammo(&self) -> Option<&ObjectDef>;

    fn inventory(&self) -> Vec<InventoryEntry<'_>>;

    /// Spell currently being cast from a slot.
    fn casting(&self, slot: CastSlot) -> Option<&ObjectDef>;
}

/// Applies and revokes debuffs on the player-controlled actor.
///
/// Both operations must be idempotent.
pub trait DebuffSink {
    fn apply_debuff(&self, debuff: DebuffRef);

    fn revoke_debuff(&self, debuff: DebuffRef);
}

/// Side effects the event router asks of the host.
pub trait Host: DebuffSink {
    fn notify(&self, message: &str);

    fn interrupt_cast(&self, actor: FormId, slot: CastSlot);

    fn play_sound(&self, sound: &str);

    fn unequip(&self, actor: FormId, object: FormId);

    fn refresh_inventory(&self, actor: FormId);

    fn subscribe_animation_events(&self, actor: FormId);
}
