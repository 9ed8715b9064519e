//! Lifecycle routing
//!
//! Translates host callbacks into decider calls and ledger updates. All
//! handlers run synchronously on the calling thread; the only deferred
//! work is ammo removal, which goes through the [`TaskQueue`].

use std::sync::Arc;

use restrictor_types::{RestrictParams, RestrictType, Settings};

use super::signal::HostEvent;
use super::tasks::{DeferredTask, TaskQueue};
use crate::decider::{Decision, should_skip};
use crate::host::{Actor, CastSlot, Forms, Host, ObjectDef};
use crate::ledger::DebuffLedger;

/// Sound cue played when a cast is interrupted.
pub const CAST_FAIL_SOUND: &str = "MAGFail";

/// Flags of an equip attempt, as seen at the interception point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EquipRequest {
    pub force_equip: bool,
    /// Object is bound to a quest alias
    pub quest_item: bool,
    pub show_message: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EquipVerdict {
    Allowed,
    Blocked,
}

pub struct EventRouter<F: Forms> {
    forms: F,
    settings: Settings,
    ledger: Arc<DebuffLedger>,
    tasks: TaskQueue,
}

impl<F: Forms> EventRouter<F> {
    pub fn new(forms: F, settings: Settings, ledger: Arc<DebuffLedger>) -> Self {
        Self {
            forms,
            settings,
            ledger,
            tasks: TaskQueue::new(),
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn ledger(&self) -> &DebuffLedger {
        &self.ledger
    }

    /// Run the decider against this router's named definitions.
    pub fn decide(&self, actor: &dyn Actor, object: &ObjectDef, params: &mut RestrictParams) -> Decision {
        should_skip(actor, &self.forms, object, params)
    }

    /// Dispatch one host notification to its handler.
    pub fn handle_event<H: Host>(&self, event: HostEvent<'_>, host: &H) {
        tracing::trace!(event = event.name(), "Routing host event");
        match event {
            HostEvent::EquipChanged {
                actor,
                object,
                equipped,
            } => self.on_equip_changed(actor, object, equipped, host),
            HostEvent::ObjectLoaded { actor } => self.on_object_loaded(actor, host),
            HostEvent::RaceSwitched { actor } => self.on_race_switched(actor, host),
            HostEvent::AnimationEvent { actor, tag } => self.on_animation_event(actor, tag, host),
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Equipment
    // ─────────────────────────────────────────────────────────────────────────

    /// Equip interception point. Called before the host equips `object`.
    pub fn check_equip<H: Host>(
        &self,
        actor: &dyn Actor,
        object: &ObjectDef,
        request: EquipRequest,
        host: &H,
    ) -> EquipVerdict {
        if request.force_equip || request.quest_item {
            return EquipVerdict::Allowed;
        }

        let mut params = RestrictParams::equip();
        if !self.decide(actor, object, &mut params).skip {
            return EquipVerdict::Allowed;
        }

        if actor.is_player() && request.show_message {
            self.notify(object, &params, host);
        }
        EquipVerdict::Blocked
    }

    /// Equip or unequip has completed. Only the player is tracked.
    pub fn on_equip_changed<H: Host>(&self, actor: &dyn Actor, object: &ObjectDef, equipped: bool, host: &H) {
        if !actor.is_player() {
            return;
        }

        if !equipped {
            self.ledger.remove_debuff(object.id, host);
            return;
        }

        let mut params = RestrictParams::equip_debuff();
        let decision = self.decide(actor, object, &mut params);
        if decision.skip
            && let Some(debuff) = decision.debuff
        {
            self.ledger.add_debuff(object.id, debuff, host);
            self.notify(object, &params, host);
        } else if object.is_launcher()
            && let Some(ammo) = actor.current_ammo()
        {
            params.kind = RestrictType::Restrict;
            if self.decide(actor, ammo, &mut params).skip {
                tracing::debug!(actor = %actor.id(), ammo = %ammo.editor_id, "Queueing ammo unequip");
                self.tasks.push(DeferredTask::UnequipAmmo {
                    actor: actor.id(),
                    ammo: ammo.id,
                });
            }
        }
    }

    /// Run queued work. Call after the current event pass has returned.
    pub fn drain_tasks<H: Host>(&self, host: &H) -> usize {
        let tasks = self.tasks.drain();
        for task in &tasks {
            match *task {
                DeferredTask::UnequipAmmo { actor, ammo } => {
                    host.unequip(actor, ammo);
                    host.refresh_inventory(actor);
                }
            }
        }
        tasks.len()
    }

    /// Reconstruct the ledger from what the player is wearing right now.
    /// Used at startup and after a save is loaded. Sends no notifications.
    ///
    /// Debuffs the old ledger referenced that no worn item justifies any
    /// more are revoked. Ones still justified are applied again, which the
    /// host treats as a no-op.
    pub fn rebuild_ledger<H: Host>(&self, player: &dyn Actor, host: &H) {
        let previous = self.ledger.drain();

        for entry in player.inventory() {
            if !entry.worn || entry.count <= 0 {
                continue;
            }
            let mut params = RestrictParams::equip_debuff();
            let decision = self.decide(player, entry.object, &mut params);
            if decision.skip
                && let Some(debuff) = decision.debuff
            {
                self.ledger.add_debuff(entry.object.id, debuff, host);
            }
        }

        for debuff in previous {
            if self.ledger.objects_for(debuff).is_empty() {
                tracing::info!(?debuff, "Revoking stale debuff");
                host.revoke_debuff(debuff);
            }
        }

        tracing::info!(actor = %player.id(), snapshot = ?self.ledger.snapshot(), "Debuff ledger rebuilt");
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Actor lifecycle and casting
    // ─────────────────────────────────────────────────────────────────────────

    pub fn on_object_loaded<H: Host>(&self, actor: &dyn Actor, host: &H) {
        host.subscribe_animation_events(actor.id());
    }

    /// Race changes rebuild the animation graph, so listeners must be re-added.
    pub fn on_race_switched<H: Host>(&self, actor: &dyn Actor, host: &H) {
        host.subscribe_animation_events(actor.id());
    }

    pub fn on_animation_event<H: Host>(&self, actor: &dyn Actor, tag: &str, host: &H) {
        if let Some(slot) = CastSlot::from_animation_tag(tag) {
            self.process_cast(actor, slot, host);
        }
    }

    /// Check the spell being cast from `slot`. Returns true if it was interrupted.
    pub fn process_cast<H: Host>(&self, actor: &dyn Actor, slot: CastSlot, host: &H) -> bool {
        let Some(spell) = actor.casting(slot) else {
            return false;
        };

        let mut params = RestrictParams::cast();
        if !self.decide(actor, spell, &mut params).skip {
            return false;
        }

        if actor.is_player() {
            self.notify(spell, &params, host);
        }
        host.interrupt_cast(actor.id(), slot);
        host.play_sound(CAST_FAIL_SOUND);
        tracing::debug!(actor = %actor.id(), spell = %spell.editor_id, ?slot, "Cast interrupted");
        true
    }

    fn notify<H: Host>(&self, object: &ObjectDef, params: &RestrictParams, host: &H) {
        let message = self
            .settings
            .notification(&object.editor_id, object.display_name(), params);
        if !message.is_empty() {
            host.notify(&message);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::{DebuffRef, FormId, FormKind, ObjectKind, Sex};
    use crate::sim::{HostCall, SimActor, SimHost, SimWorld};

    const PLAYER: FormId = FormId(0x14);
    const WEAKNESS: FormId = FormId(0x100);

    fn router() -> EventRouter<SimWorld> {
        let world = SimWorld::new().with_form("WeaknessPerk", WEAKNESS, FormKind::Perk);
        EventRouter::new(world, Settings::default(), Arc::new(DebuffLedger::new()))
    }

    fn item(id: u32, name: &str, kind: ObjectKind, keywords: &[&str]) -> ObjectDef {
        ObjectDef {
            id: FormId(id),
            editor_id: name.replace(' ', ""),
            name: name.to_string(),
            kind,
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
        }
    }

    fn cursed_helmet(id: u32) -> ObjectDef {
        item(id, "Cursed Helmet", ObjectKind::Armor, &["RestrictEquip:Level(20):WeaknessPerk"])
    }

    fn shown() -> EquipRequest {
        EquipRequest {
            show_message: true,
            ..EquipRequest::default()
        }
    }

    #[test]
    fn test_check_equip_blocks_and_notifies_player() {
        let router = router();
        let host = SimHost::new();
        let gown = item(0x800, "Silk Gown", ObjectKind::Armor, &["RestrictEquip:Female"]);

        let player = SimActor::player(PLAYER, Sex::Male, 1);
        assert_eq!(router.check_equip(&player, &gown, shown(), &host), EquipVerdict::Blocked);
        assert_eq!(host.notifications(), vec!["You cannot equip Silk Gown.".to_string()]);

        // Silent when the request asks for no message
        host.take_calls();
        assert_eq!(
            router.check_equip(&player, &gown, EquipRequest::default(), &host),
            EquipVerdict::Blocked
        );
        assert!(host.calls().is_empty());

        // NPCs are blocked without a message
        let npc = SimActor::npc(FormId(0x20), Sex::Male, 1);
        assert_eq!(router.check_equip(&npc, &gown, shown(), &host), EquipVerdict::Blocked);
        assert!(host.calls().is_empty());
    }

    #[test]
    fn test_check_equip_passes_forced_and_quest_items() {
        let router = router();
        let host = SimHost::new();
        let gown = item(0x800, "Silk Gown", ObjectKind::Armor, &["RestrictEquip:Female"]);
        let player = SimActor::player(PLAYER, Sex::Male, 1);

        let forced = EquipRequest {
            force_equip: true,
            ..shown()
        };
        let quest = EquipRequest {
            quest_item: true,
            ..shown()
        };
        assert_eq!(router.check_equip(&player, &gown, forced, &host), EquipVerdict::Allowed);
        assert_eq!(router.check_equip(&player, &gown, quest, &host), EquipVerdict::Allowed);
        assert!(host.calls().is_empty());
    }

    #[test]
    fn test_check_equip_lets_player_wear_debuff_items() {
        let router = router();
        let host = SimHost::new();
        let player = SimActor::player(PLAYER, Sex::Male, 1);
        assert_eq!(
            router.check_equip(&player, &cursed_helmet(0x801), shown(), &host),
            EquipVerdict::Allowed
        );
    }

    #[test]
    fn test_equip_applies_debuff_and_unequip_revokes() {
        let router = router();
        let host = SimHost::new();
        let player = SimActor::player(PLAYER, Sex::Male, 5);
        let helmet = cursed_helmet(0x801);
        let weakness = DebuffRef::perk(WEAKNESS);

        router.on_equip_changed(&player, &helmet, true, &host);
        assert!(host.is_active(weakness));
        assert_eq!(
            host.notifications(),
            vec!["You are not experienced enough to use Cursed Helmet properly.".to_string()]
        );
        assert_eq!(router.ledger().debuffs_for(helmet.id), vec![weakness]);

        router.on_equip_changed(&player, &helmet, false, &host);
        assert!(!host.is_active(weakness));
        assert!(router.ledger().is_empty());
    }

    #[test]
    fn test_shared_debuff_survives_partial_unequip() {
        let router = router();
        let host = SimHost::new();
        let player = SimActor::player(PLAYER, Sex::Male, 5);
        let helmet = cursed_helmet(0x801);
        let boots = cursed_helmet(0x802);
        let weakness = DebuffRef::perk(WEAKNESS);

        router.on_equip_changed(&player, &helmet, true, &host);
        router.on_equip_changed(&player, &boots, true, &host);
        router.on_equip_changed(&player, &helmet, false, &host);
        assert!(host.is_active(weakness));

        router.on_equip_changed(&player, &boots, false, &host);
        assert!(!host.is_active(weakness));
    }

    #[test]
    fn test_equip_changes_ignored_for_npcs() {
        let router = router();
        let host = SimHost::new();
        let npc = SimActor::npc(FormId(0x20), Sex::Male, 5);

        router.on_equip_changed(&npc, &cursed_helmet(0x801), true, &host);
        assert!(host.calls().is_empty());
        assert!(router.ledger().is_empty());
    }

    #[test]
    fn test_unequipping_untracked_object_is_harmless() {
        let router = router();
        let host = SimHost::new();
        let player = SimActor::player(PLAYER, Sex::Male, 5);
        router.on_equip_changed(&player, &item(0x900, "Plain Hood", ObjectKind::Armor, &[]), false, &host);
        assert!(host.calls().is_empty());
    }

    #[test]
    fn test_launcher_equip_defers_ammo_unequip() {
        let router = router();
        let host = SimHost::new();

        let bow = item(0x700, "Hunting Bow", ObjectKind::Weapon { launcher: true }, &["WeapTypeBow"]);
        let bolts = item(0x701, "Steel Bolt", ObjectKind::Ammo, &["RestrictEquip:WeapTypeCrossbow"]);
        let mut player = SimActor::player(PLAYER, Sex::Male, 5);
        player.right_hand = Some(bow.clone());
        player.ammo = Some(bolts.clone());

        router.on_equip_changed(&player, &bow, true, &host);
        // Nothing happens inside the callback
        assert!(host.calls().is_empty());

        assert_eq!(router.drain_tasks(&host), 1);
        assert_eq!(
            host.take_calls(),
            vec![HostCall::Unequip(PLAYER, bolts.id), HostCall::RefreshInventory(PLAYER)]
        );
        assert_eq!(router.drain_tasks(&host), 0);
    }

    #[test]
    fn test_launcher_equip_keeps_matching_ammo() {
        let router = router();
        let host = SimHost::new();

        let bow = item(0x700, "Hunting Bow", ObjectKind::Weapon { launcher: true }, &["WeapTypeBow"]);
        let arrows = item(0x701, "Iron Arrow", ObjectKind::Ammo, &["RestrictEquip:WeapTypeBow"]);
        let mut player = SimActor::player(PLAYER, Sex::Male, 5);
        player.left_hand = Some(bow.clone());
        player.ammo = Some(arrows);

        router.on_equip_changed(&player, &bow, true, &host);
        assert_eq!(router.drain_tasks(&host), 0);
    }

    #[test]
    fn test_lifecycle_events_subscribe_animation() {
        let router = router();
        let host = SimHost::new();
        let npc = SimActor::npc(FormId(0x20), Sex::Female, 1);

        router.handle_event(HostEvent::ObjectLoaded { actor: &npc }, &host);
        router.handle_event(HostEvent::RaceSwitched { actor: &npc }, &host);
        assert_eq!(
            host.calls(),
            vec![
                HostCall::SubscribeAnimation(FormId(0x20)),
                HostCall::SubscribeAnimation(FormId(0x20))
            ]
        );
    }

    #[test]
    fn test_combat_cast_restriction() {
        // "Combat" holds out of combat, so the rule bites only during combat
        let router = router();
        let host = SimHost::new();
        let mut npc = SimActor::npc(FormId(0x20), Sex::Female, 1);
        npc.begin_cast(
            CastSlot::Right,
            item(0x600, "Fireball", ObjectKind::Spell, &["RestrictCast:Combat"]),
        );

        router.handle_event(HostEvent::AnimationEvent { actor: &npc, tag: "BeginCastRight" }, &host);
        assert!(host.calls().is_empty());

        npc.in_combat = true;
        router.handle_event(HostEvent::AnimationEvent { actor: &npc, tag: "BeginCastRight" }, &host);
        assert_eq!(
            host.calls(),
            vec![
                HostCall::InterruptCast(FormId(0x20), CastSlot::Right),
                HostCall::PlaySound(CAST_FAIL_SOUND.to_string())
            ]
        );
    }

    #[test]
    fn test_player_cast_is_notified() {
        let router = router();
        let host = SimHost::new();
        let mut player = SimActor::player(PLAYER, Sex::Male, 1);
        player.set_value("Destruction", 10.0);
        player.begin_cast(
            CastSlot::Voice,
            item(0x601, "Fire Breath", ObjectKind::Spell, &["RestrictCast:Destruction(50)"]),
        );

        assert!(router.process_cast(&player, CastSlot::Voice, &host));
        assert_eq!(
            host.notifications(),
            vec!["You are not skilled enough to cast Fire Breath.".to_string()]
        );
        // Nothing is being cast from the other hands
        assert!(!router.process_cast(&player, CastSlot::Left, &host));
    }

    #[test]
    fn test_unrelated_animation_tags_ignored() {
        let router = router();
        let host = SimHost::new();
        let mut npc = SimActor::npc(FormId(0x20), Sex::Male, 1);
        npc.begin_cast(CastSlot::Left, item(0x600, "Flames", ObjectKind::Spell, &["RestrictCast:"]));

        router.on_animation_event(&npc, "weaponSwing", &host);
        router.on_animation_event(&npc, "BeginCastRight", &host);
        assert!(host.calls().is_empty());

        router.on_animation_event(&npc, "BeginCastLeft", &host);
        assert_eq!(host.calls().len(), 2);
    }

    #[test]
    fn test_rebuild_ledger_from_worn_items() {
        let router = router();
        let host = SimHost::new();
        let weakness = DebuffRef::perk(WEAKNESS);

        let mut player = SimActor::player(PLAYER, Sex::Male, 5);
        player.wear(cursed_helmet(0x801));
        player.inventory.push(crate::sim::SimItem {
            object: cursed_helmet(0x802),
            count: 1,
            worn: false,
        });

        router.rebuild_ledger(&player, &host);
        assert_eq!(router.ledger().objects_for(weakness), vec![FormId(0x801)]);
        assert!(host.is_active(weakness));
        assert!(host.notifications().is_empty());

        // A second rebuild replaces rather than accumulates
        router.rebuild_ledger(&player, &host);
        assert_eq!(router.ledger().objects_for(weakness), vec![FormId(0x801)]);
        assert!(host.is_active(weakness));
    }

    #[test]
    fn test_rebuild_revokes_debuffs_no_longer_worn() {
        let router = router();
        let host = SimHost::new();
        let weakness = DebuffRef::perk(WEAKNESS);

        let mut player = SimActor::player(PLAYER, Sex::Male, 5);
        let helmet = cursed_helmet(0x801);
        player.wear(helmet.clone());
        router.on_equip_changed(&player, &helmet, true, &host);
        assert!(host.is_active(weakness));

        // The helmet left the inventory without an unequip event
        player.inventory.clear();
        router.rebuild_ledger(&player, &host);

        assert!(router.ledger().is_empty());
        assert!(!host.is_active(weakness));
        assert!(host.calls().contains(&HostCall::RevokeDebuff(weakness)));
    }

    #[test]
    fn test_rebuild_keeps_debuffs_still_justified() {
        let router = router();
        let host = SimHost::new();
        let weakness = DebuffRef::perk(WEAKNESS);

        let mut player = SimActor::player(PLAYER, Sex::Male, 5);
        let helmet = cursed_helmet(0x801);
        let spare = cursed_helmet(0x802);
        player.wear(helmet.clone());
        player.wear(spare.clone());
        router.on_equip_changed(&player, &helmet, true, &host);
        router.on_equip_changed(&player, &spare, true, &host);

        player.inventory.retain(|entry| entry.object.id != helmet.id);
        router.rebuild_ledger(&player, &host);

        assert_eq!(router.ledger().objects_for(weakness), vec![spare.id]);
        assert!(host.is_active(weakness));
        assert!(!host.calls().contains(&HostCall::RevokeDebuff(weakness)));
    }
}
