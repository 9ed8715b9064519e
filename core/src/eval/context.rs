use std::cell::OnceCell;

use crate::host::{Actor, ActorBase, Forms, Hand, InventoryEntry, ObjectDef};

/// Actor state for one restriction decision.
///
/// Built fresh per decision and never shared. The worn inventory is
/// only enumerated if a keyword check actually needs it.
pub struct QueryContext<'a> {
    pub(crate) actor: &'a dyn Actor,
    pub(crate) forms: &'a dyn Forms,
    pub(crate) object: &'a ObjectDef,
    pub(crate) base: ActorBase,
    pub(crate) is_player: bool,
    pub(crate) in_combat: bool,
    /// Bow/crossbow per hand, only tracked when the queried object is ammo
    pub(crate) left_launcher: Option<&'a ObjectDef>,
    pub(crate) right_launcher: Option<&'a ObjectDef>,
    worn: OnceCell<Vec<InventoryEntry<'a>>>,
}

impl<'a> QueryContext<'a> {
    /// `None` when the actor's base record is unresolvable.
    pub fn new(actor: &'a dyn Actor, forms: &'a dyn Forms, object: &'a ObjectDef) -> Option<Self> {
        let base = actor.base()?;
        let is_ammo = object.is_ammo();
        let launcher = move |hand: Hand| -> Option<&'a ObjectDef> {
            if !is_ammo {
                return None;
            }
            actor.equipped(hand).filter(|weapon| weapon.is_launcher())
        };

        Some(Self {
            actor,
            forms,
            object,
            base,
            is_player: actor.is_player(),
            in_combat: actor.in_combat(),
            left_launcher: launcher(Hand::Left),
            right_launcher: launcher(Hand::Right),
            worn: OnceCell::new(),
        })
    }

    pub fn object(&self) -> &'a ObjectDef {
        self.object
    }

    pub fn is_player(&self) -> bool {
        self.is_player
    }

    pub(crate) fn inventory(&self) -> &[InventoryEntry<'a>] {
        let actor: &'a dyn Actor = self.actor;
        self.worn.get_or_init(|| actor.inventory())
    }
}
