//! Debuff ledger
//!
//! Bidirectional map between restricted objects and the debuffs they
//! caused. A debuff stays applied while at least one object still
//! justifies it.
//!
//! Invariant: `debuff ∈ object_debuffs[object]` iff
//! `object ∈ debuff_objects[debuff]`. Both maps live behind one mutex and
//! every operation updates them as a unit.

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use hashbrown::{HashMap, HashSet};
use serde::Serialize;

use crate::host::{DebuffRef, DebuffSink, FormId};

#[derive(Debug, Default)]
struct LedgerMaps {
    object_debuffs: HashMap<FormId, HashSet<DebuffRef>>,
    debuff_objects: HashMap<DebuffRef, HashSet<FormId>>,
}

/// Serializable view of the ledger, ordered for stable output.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LedgerSnapshot {
    pub objects: BTreeMap<FormId, Vec<DebuffRef>>,
}

/// Process-wide debuff bookkeeping. Construct once and share by reference.
#[derive(Debug, Default)]
pub struct DebuffLedger {
    maps: Mutex<LedgerMaps>,
}

impl DebuffLedger {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, LedgerMaps> {
        // The maps are only mutated in whole operations, a poisoned guard is still consistent
        self.maps.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Apply `debuff` and record that `object` justifies it.
    ///
    /// Recording the same pair twice does not add a second reference.
    pub fn add_debuff(&self, object: FormId, debuff: DebuffRef, sink: &dyn DebuffSink) {
        let mut maps = self.lock();

        sink.apply_debuff(debuff);

        maps.object_debuffs.entry(object).or_default().insert(debuff);
        let justified_by = maps.debuff_objects.entry(debuff).or_default();
        if justified_by.insert(object) && justified_by.len() == 1 {
            tracing::info!(object = %object, debuff = %debuff, "Debuff applied");
        }
    }

    /// Drop every association of `object`, revoking debuffs nothing else
    /// justifies. Returns the revoked debuffs. Unknown objects are a no-op.
    pub fn remove_debuff(&self, object: FormId, sink: &dyn DebuffSink) -> Vec<DebuffRef> {
        let mut maps = self.lock();

        let Some(debuffs) = maps.object_debuffs.remove(&object) else {
            return Vec::new();
        };

        let mut revoked = Vec::new();
        for debuff in debuffs {
            let Some(justified_by) = maps.debuff_objects.get_mut(&debuff) else {
                continue;
            };
            if justified_by.remove(&object) && justified_by.is_empty() {
                maps.debuff_objects.remove(&debuff);
                sink.revoke_debuff(debuff);
                tracing::info!(object = %object, debuff = %debuff, "Debuff revoked");
                revoked.push(debuff);
            }
        }
        revoked.sort();
        revoked
    }

    /// Forget everything without touching the actor. Used before a rebuild.
    /// Empty the ledger without revoking anything. Returns every debuff that
    /// was referenced, sorted, so the caller can revoke what it no longer
    /// needs.
    pub fn drain(&self) -> Vec<DebuffRef> {
        let mut maps = self.lock();
        maps.object_debuffs.clear();
        let mut debuffs: Vec<_> = maps.debuff_objects.drain().map(|(debuff, _)| debuff).collect();
        debuffs.sort();
        debuffs
    }

    pub fn is_empty(&self) -> bool {
        self.lock().object_debuffs.is_empty()
    }

    pub fn debuffs_for(&self, object: FormId) -> Vec<DebuffRef> {
        let maps = self.lock();
        let mut debuffs: Vec<_> = maps
            .object_debuffs
            .get(&object)
            .map(|set| set.iter().copied().collect())
            .unwrap_or_default();
        debuffs.sort();
        debuffs
    }

    pub fn objects_for(&self, debuff: DebuffRef) -> Vec<FormId> {
        let maps = self.lock();
        let mut objects: Vec<_> = maps
            .debuff_objects
            .get(&debuff)
            .map(|set| set.iter().copied().collect())
            .unwrap_or_default();
        objects.sort();
        objects
    }

    pub fn snapshot(&self) -> LedgerSnapshot {
        let maps = self.lock();
        let objects = maps
            .object_debuffs
            .iter()
            .map(|(object, debuffs)| {
                let mut debuffs: Vec<_> = debuffs.iter().copied().collect();
                debuffs.sort();
                (*object, debuffs)
            })
            .collect();
        LedgerSnapshot { objects }
    }

    #[cfg(test)]
    fn is_consistent(&self) -> bool {
        let maps = self.lock();
        let forward = maps.object_debuffs.iter().all(|(object, debuffs)| {
            debuffs.iter().all(|d| {
                maps.debuff_objects
                    .get(d)
                    .is_some_and(|objects| objects.contains(object))
            })
        });
        let backward = maps.debuff_objects.iter().all(|(debuff, objects)| {
            !objects.is_empty()
                && objects.iter().all(|o| {
                    maps.object_debuffs
                        .get(o)
                        .is_some_and(|debuffs| debuffs.contains(debuff))
                })
        });
        forward && backward
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{HostCall, SimHost};
    use std::sync::Arc;

    const HELMET: FormId = FormId(0x801);
    const GAUNTLETS: FormId = FormId(0x802);

    fn weakness() -> DebuffRef {
        DebuffRef::perk(FormId(0x100))
    }

    fn slow() -> DebuffRef {
        DebuffRef::spell(FormId(0x101))
    }

    #[test]
    fn test_debuff_stays_while_any_object_justifies_it() {
        let ledger = DebuffLedger::new();
        let host = SimHost::new();

        ledger.add_debuff(HELMET, weakness(), &host);
        ledger.add_debuff(GAUNTLETS, weakness(), &host);
        assert_eq!(ledger.objects_for(weakness()), vec![HELMET, GAUNTLETS]);

        assert!(ledger.remove_debuff(HELMET, &host).is_empty());
        assert!(host.is_active(weakness()));

        assert_eq!(ledger.remove_debuff(GAUNTLETS, &host), vec![weakness()]);
        assert!(!host.is_active(weakness()));
        assert!(ledger.is_empty());
        assert!(ledger.is_consistent());
    }

    #[test]
    fn test_duplicate_add_is_a_single_reference() {
        let ledger = DebuffLedger::new();
        let host = SimHost::new();

        ledger.add_debuff(HELMET, weakness(), &host);
        ledger.add_debuff(HELMET, weakness(), &host);
        assert_eq!(ledger.objects_for(weakness()), vec![HELMET]);

        // One removal is enough
        assert_eq!(ledger.remove_debuff(HELMET, &host), vec![weakness()]);
        assert!(!host.is_active(weakness()));
    }

    #[test]
    fn test_removing_unknown_object_is_a_no_op() {
        let ledger = DebuffLedger::new();
        let host = SimHost::new();

        assert!(ledger.remove_debuff(HELMET, &host).is_empty());
        ledger.add_debuff(HELMET, weakness(), &host);
        ledger.remove_debuff(HELMET, &host);
        assert!(ledger.remove_debuff(HELMET, &host).is_empty());

        let revokes = host
            .calls()
            .into_iter()
            .filter(|c| matches!(c, HostCall::RevokeDebuff(_)))
            .count();
        assert_eq!(revokes, 1);
    }

    #[test]
    fn test_object_with_several_debuffs() {
        let ledger = DebuffLedger::new();
        let host = SimHost::new();

        ledger.add_debuff(HELMET, weakness(), &host);
        ledger.add_debuff(HELMET, slow(), &host);
        ledger.add_debuff(GAUNTLETS, slow(), &host);
        assert_eq!(ledger.debuffs_for(HELMET), vec![weakness(), slow()]);

        assert_eq!(ledger.remove_debuff(HELMET, &host), vec![weakness()]);
        assert!(host.is_active(slow()));
        assert_eq!(ledger.debuffs_for(HELMET), Vec::new());
        assert_eq!(ledger.objects_for(slow()), vec![GAUNTLETS]);
        assert!(ledger.is_consistent());
    }

    #[test]
    fn test_snapshot_and_drain() {
        let ledger = DebuffLedger::new();
        let host = SimHost::new();

        ledger.add_debuff(GAUNTLETS, slow(), &host);
        ledger.add_debuff(HELMET, weakness(), &host);
        ledger.add_debuff(GAUNTLETS, weakness(), &host);

        let snapshot = ledger.snapshot();
        assert_eq!(snapshot.objects.keys().copied().collect::<Vec<_>>(), vec![HELMET, GAUNTLETS]);

        let mut expected = vec![weakness(), slow()];
        expected.sort();
        assert_eq!(ledger.drain(), expected);
        assert!(ledger.is_empty());
        assert!(ledger.objects_for(weakness()).is_empty());
        assert_eq!(ledger.snapshot(), LedgerSnapshot::default());
        // Draining leaves revocation to the caller
        assert!(host.is_active(weakness()));
        assert!(host.is_active(slow()));

        assert!(ledger.drain().is_empty());
    }

    #[test]
    fn test_concurrent_add_remove_keeps_maps_consistent() {
        let ledger = Arc::new(DebuffLedger::new());
        let host = Arc::new(SimHost::new());

        let handles: Vec<_> = (0..8u32)
            .map(|t| {
                let ledger = Arc::clone(&ledger);
                let host = Arc::clone(&host);
                std::thread::spawn(move || {
                    let object = FormId(0x1000 + t);
                    for _ in 0..200 {
                        ledger.add_debuff(object, weakness(), host.as_ref());
                        ledger.remove_debuff(object, host.as_ref());
                    }
                    // Leave one reference behind per odd thread
                    if t % 2 == 1 {
                        ledger.add_debuff(object, weakness(), host.as_ref());
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert!(ledger.is_consistent());
        assert_eq!(ledger.objects_for(weakness()).len(), 4);
        assert!(host.is_active(weakness()));
    }
}
