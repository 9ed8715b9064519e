//! In-memory host
//!
//! Stands in for the game when running tests and the validate CLI.
//! Everything is plain data and deserializes from scenario TOML files.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use serde::{Deserialize, Serialize};

use crate::host::{
    Actor, ActorBase, ActorValue, CastSlot, DebuffRef, DebuffSink, FormId, FormKind, FormRef,
    Forms, Hand, Host, InventoryEntry, ObjectDef, Sex,
};

/// Named definitions and globals.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SimWorld {
    #[serde(default)]
    pub forms: HashMap<String, FormRef>,
    #[serde(default)]
    pub globals: HashMap<String, f32>,
}

impl SimWorld {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_form(mut self, editor_id: &str, id: FormId, kind: FormKind) -> Self {
        self.forms.insert(editor_id.to_string(), FormRef { id, kind });
        self
    }

    pub fn with_global(mut self, editor_id: &str, value: f32) -> Self {
        self.globals.insert(editor_id.to_string(), value);
        self
    }
}

impl Forms for SimWorld {
    fn lookup(&self, editor_id: &str) -> Option<FormRef> {
        self.forms.get(editor_id).copied()
    }

    fn global_value(&self, editor_id: &str) -> Option<f32> {
        self.globals.get(editor_id).copied()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FactionRank {
    pub faction: FormId,
    pub rank: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimItem {
    pub object: ObjectDef,
    #[serde(default = "default_count")]
    pub count: i32,
    #[serde(default)]
    pub worn: bool,
}

fn default_count() -> i32 {
    1
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimCast {
    pub slot: CastSlot,
    pub spell: ObjectDef,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimActor {
    pub id: FormId,
    pub base: Option<ActorBase>,
    #[serde(default)]
    pub player: bool,
    #[serde(default)]
    pub in_combat: bool,
    /// Actor values by name (aliases allowed)
    #[serde(default)]
    pub values: HashMap<String, f32>,
    #[serde(default)]
    pub factions: Vec<FactionRank>,
    #[serde(default)]
    pub perks: Vec<FormId>,
    #[serde(default)]
    pub spells: Vec<FormId>,
    #[serde(default)]
    pub magic_effects: Vec<FormId>,
    #[serde(default)]
    pub race: Option<FormId>,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub left_hand: Option<ObjectDef>,
    #[serde(default)]
    pub right_hand: Option<ObjectDef>,
    #[serde(default)]
    pub ammo: Option<ObjectDef>,
    #[serde(default)]
    pub inventory: Vec<SimItem>,
    #[serde(default)]
    pub casting: Vec<SimCast>,
}

impl SimActor {
    pub fn npc(id: FormId, sex: Sex, level: u16) -> Self {
        Self {
            id,
            base: Some(ActorBase { sex, level }),
            player: false,
            in_combat: false,
            values: HashMap::new(),
            factions: Vec::new(),
            perks: Vec::new(),
            spells: Vec::new(),
            magic_effects: Vec::new(),
            race: None,
            keywords: Vec::new(),
            left_hand: None,
            right_hand: None,
            ammo: None,
            inventory: Vec::new(),
            casting: Vec::new(),
        }
    }

    pub fn player(id: FormId, sex: Sex, level: u16) -> Self {
        Self {
            player: true,
            ..Self::npc(id, sex, level)
        }
    }

    pub fn set_value(&mut self, name: &str, value: f32) {
        self.values.insert(name.to_string(), value);
    }

    pub fn join_faction(&mut self, faction: FormId, rank: i32) {
        self.factions.retain(|f| f.faction != faction);
        self.factions.push(FactionRank { faction, rank });
    }

    pub fn wear(&mut self, object: ObjectDef) {
        self.inventory.push(SimItem {
            object,
            count: 1,
            worn: true,
        });
    }

    pub fn begin_cast(&mut self, slot: CastSlot, spell: ObjectDef) {
        self.casting.retain(|c| c.slot != slot);
        self.casting.push(SimCast { slot, spell });
    }
}

impl Actor for SimActor {
    fn id(&self) -> FormId {
        self.id
    }

    fn base(&self) -> Option<ActorBase> {
        self.base
    }

    fn is_player(&self) -> bool {
        self.player
    }

    fn in_combat(&self) -> bool {
        self.in_combat
    }

    fn actor_value(&self, value: ActorValue) -> f32 {
        self.values
            .iter()
            .find(|(name, _)| ActorValue::from_name(name) == Some(value))
            .map(|(_, v)| *v)
            .unwrap_or(0.0)
    }

    fn faction_rank(&self, faction: FormId) -> Option<i32> {
        self.factions
            .iter()
            .find(|f| f.faction == faction)
            .map(|f| f.rank)
    }

    fn has_perk(&self, perk: FormId) -> bool {
        self.perks.contains(&perk)
    }

    fn has_spell(&self, spell: FormId) -> bool {
        self.spells.contains(&spell)
    }

    fn has_magic_effect(&self, effect: FormId) -> bool {
        self.magic_effects.contains(&effect)
    }

    fn race(&self) -> Option<FormId> {
        self.race
    }

    fn has_keyword(&self, keyword: &str) -> bool {
        self.keywords.iter().any(|k| k == keyword)
    }

    fn equipped(&self, hand: Hand) -> Option<&ObjectDef> {
        match hand {
            Hand::Left => self.left_hand.as_ref(),
            Hand::Right => self.right_hand.as_ref(),
        }
    }

    fn current_ammo(&self) -> Option<&ObjectDef> {
        self.ammo.as_ref()
    }

    fn inventory(&self) -> Vec<InventoryEntry<'_>> {
        self.inventory
            .iter()
            .map(|item| InventoryEntry {
                object: &item.object,
                count: item.count,
                worn: item.worn,
            })
            .collect()
    }

    fn casting(&self, slot: CastSlot) -> Option<&ObjectDef> {
        self.casting.iter().find(|c| c.slot == slot).map(|c| &c.spell)
    }
}

/// A side effect requested by the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostCall {
    ApplyDebuff(DebuffRef),
    RevokeDebuff(DebuffRef),
    Notify(String),
    InterruptCast(FormId, CastSlot),
    PlaySound(String),
    Unequip(FormId, FormId),
    RefreshInventory(FormId),
    SubscribeAnimation(FormId),
}

/// Records every call and tracks which debuffs are currently active.
#[derive(Debug, Default)]
pub struct SimHost {
    calls: Mutex<Vec<HostCall>>,
    active: Mutex<HashSet<DebuffRef>>,
}

impl SimHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<HostCall> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    pub fn take_calls(&self) -> Vec<HostCall> {
        self.calls
            .lock()
            .map(|mut c| std::mem::take(&mut *c))
            .unwrap_or_default()
    }

    pub fn is_active(&self, debuff: DebuffRef) -> bool {
        self.active.lock().is_ok_and(|a| a.contains(&debuff))
    }

    pub fn notifications(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                HostCall::Notify(message) => Some(message),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: HostCall) {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(call);
        }
    }
}

impl DebuffSink for SimHost {
    fn apply_debuff(&self, debuff: DebuffRef) {
        if let Ok(mut active) = self.active.lock() {
            active.insert(debuff);
        }
        self.record(HostCall::ApplyDebuff(debuff));
    }

    fn revoke_debuff(&self, debuff: DebuffRef) {
        if let Ok(mut active) = self.active.lock() {
            active.remove(&debuff);
        }
        self.record(HostCall::RevokeDebuff(debuff));
    }
}

impl Host for SimHost {
    fn notify(&self, message: &str) {
        self.record(HostCall::Notify(message.to_string()));
    }

    fn interrupt_cast(&self, actor: FormId, slot: CastSlot) {
        self.record(HostCall::InterruptCast(actor, slot));
    }

    fn play_sound(&self, sound: &str) {
        self.record(HostCall::PlaySound(sound.to_string()));
    }

    fn unequip(&self, actor: FormId, object: FormId) {
        self.record(HostCall::Unequip(actor, object));
    }

    fn refresh_inventory(&self, actor: FormId) {
        self.record(HostCall::RefreshInventory(actor));
    }

    fn subscribe_animation_events(&self, actor: FormId) {
        self.record(HostCall::SubscribeAnimation(actor));
    }
}
