use crate::host::{Actor, ObjectDef};

/// Lifecycle notifications delivered by the host.
/// Borrowed for the duration of one dispatch.
#[derive(Clone, Copy)]
pub enum HostEvent<'a> {
    // Equipment
    EquipChanged {
        actor: &'a dyn Actor,
        object: &'a ObjectDef,
        equipped: bool,
    },

    // Actor lifecycle, both (re)attach animation listeners
    ObjectLoaded {
        actor: &'a dyn Actor,
    },
    RaceSwitched {
        actor: &'a dyn Actor,
    },

    // Animation graph
    AnimationEvent {
        actor: &'a dyn Actor,
        tag: &'a str,
    },
}

impl HostEvent<'_> {
    pub fn name(&self) -> &'static str {
        match self {
            Self::EquipChanged { equipped: true, .. } => "equip",
            Self::EquipChanged { equipped: false, .. } => "unequip",
            Self::ObjectLoaded { .. } => "object_loaded",
            Self::RaceSwitched { .. } => "race_switched",
            Self::AnimationEvent { .. } => "animation",
        }
    }
}

impl std::fmt::Debug for HostEvent<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EquipChanged { actor, object, equipped } => f
                .debug_struct("EquipChanged")
                .field("actor", &actor.id())
                .field("object", &object.editor_id)
                .field("equipped", equipped)
                .finish(),
            Self::ObjectLoaded { actor } => f.debug_struct("ObjectLoaded").field("actor", &actor.id()).finish(),
            Self::RaceSwitched { actor } => f.debug_struct("RaceSwitched").field("actor", &actor.id()).finish(),
            Self::AnimationEvent { actor, tag } => f
                .debug_struct("AnimationEvent")
                .field("actor", &actor.id())
                .field("tag", tag)
                .finish(),
        }
    }
}
