//! Authoritative tower state management utilities.

use std::collections::BTreeMap;

use monochrome_td_core::{
    BuildSpotId, PassiveSet, TowerId, TowerKind, TowerLevel, TowerSnapshot, Vec2,
};

/// Tower stored inside the world.
#[derive(Clone, Debug)]
pub(crate) struct TowerState {
    pub(crate) id: TowerId,
    pub(crate) kind: TowerKind,
    pub(crate) spot: BuildSpotId,
    pub(crate) position: Vec2,
    pub(crate) level: TowerLevel,
    pub(crate) passives: PassiveSet,
    cooldown: u32,
    disabled: u32,
    armed: bool,
}

impl TowerState {
    /// Runs the tower's timers for one tick.
    ///
    /// A disabled tower only counts its disable timer down; otherwise a
    /// pending cooldown is counted down. The tower is armed only when neither
    /// timer was running at the start of the tick.
    pub(crate) fn tick(&mut self) {
        if self.disabled > 0 {
            self.disabled -= 1;
            self.armed = false;
        } else if self.cooldown > 0 {
            self.cooldown -= 1;
            self.armed = false;
        } else {
            self.armed = true;
        }
    }

    pub(crate) fn fired(&mut self) {
        self.cooldown = self.kind.cooldown_after_shot(self.level);
        self.armed = false;
    }

    pub(crate) fn is_disabled(&self) -> bool {
        self.disabled > 0
    }

    pub(crate) fn disable(&mut self, duration: u32) {
        self.disabled = duration;
        self.armed = false;
    }

    pub(crate) fn snapshot(&self) -> TowerSnapshot {
        TowerSnapshot {
            id: self.id,
            kind: self.kind,
            spot: self.spot,
            position: self.position,
            level: self.level,
            cooldown_remaining: self.cooldown,
            disabled_remaining: self.disabled,
            armed: self.armed,
            passives: self.passives,
        }
    }
}

/// Registry that stores towers, tracks spot occupancy, and allocates identifiers.
#[derive(Debug)]
pub(crate) struct TowerRegistry {
    entries: BTreeMap<TowerId, TowerState>,
    occupancy: BTreeMap<BuildSpotId, TowerId>,
    next_tower_id: TowerId,
}

impl TowerRegistry {
    /// Creates an empty tower registry with a reset identifier counter.
    pub(crate) fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
            occupancy: BTreeMap::new(),
            next_tower_id: TowerId::new(0),
        }
    }

    pub(crate) fn occupant(&self, spot: BuildSpotId) -> Option<TowerId> {
        self.occupancy.get(&spot).copied()
    }

    /// Stores a freshly built level one tower on the spot.
    pub(crate) fn insert(&mut self, kind: TowerKind, spot: BuildSpotId, position: Vec2) -> TowerId {
        let id = self.next_tower_id;
        self.next_tower_id = TowerId::new(id.get().saturating_add(1));
        let _ = self.entries.insert(
            id,
            TowerState {
                id,
                kind,
                spot,
                position,
                level: TowerLevel::BASE,
                passives: PassiveSet::empty(),
                cooldown: 0,
                disabled: 0,
                armed: false,
            },
        );
        let _ = self.occupancy.insert(spot, id);
        id
    }

    /// Removes the tower and frees its spot.
    pub(crate) fn remove(&mut self, tower: TowerId) -> Option<TowerState> {
        let state = self.entries.remove(&tower)?;
        let _ = self.occupancy.remove(&state.spot);
        Some(state)
    }

    pub(crate) fn get(&self, tower: TowerId) -> Option<&TowerState> {
        self.entries.get(&tower)
    }

    pub(crate) fn get_mut(&mut self, tower: TowerId) -> Option<&mut TowerState> {
        self.entries.get_mut(&tower)
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &TowerState> {
        self.entries.values()
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut TowerState> {
        self.entries.values_mut()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_allocates_monotonic_identifiers() {
        let mut registry = TowerRegistry::new();
        let first = registry.insert(TowerKind::Archer, BuildSpotId::new(2), Vec2::ZERO);
        let second = registry.insert(TowerKind::Rock, BuildSpotId::new(0), Vec2::ONE);
        assert_eq!(first, TowerId::new(0));
        assert_eq!(second, TowerId::new(1));

        let _ = registry.remove(first);
        let third = registry.insert(TowerKind::Sap, BuildSpotId::new(2), Vec2::ZERO);
        assert_eq!(third, TowerId::new(2));
    }

    #[test]
    fn removal_frees_the_spot() {
        let mut registry = TowerRegistry::new();
        let spot = BuildSpotId::new(4);
        let tower = registry.insert(TowerKind::Archer, spot, Vec2::ZERO);
        assert_eq!(registry.occupant(spot), Some(tower));

        let removed = registry.remove(tower).expect("tower exists");
        assert_eq!(removed.spot, spot);
        assert_eq!(registry.occupant(spot), None);
        assert!(registry.remove(tower).is_none());
    }

    #[test]
    fn disabled_tower_skips_cooldown() {
        let mut registry = TowerRegistry::new();
        let id = registry.insert(TowerKind::Archer, BuildSpotId::new(0), Vec2::ZERO);
        let tower = registry.get_mut(id).expect("tower exists");

        tower.tick();
        assert!(tower.armed);
        tower.fired();
        assert_eq!(tower.cooldown, 28);

        tower.disable(2);
        tower.tick();
        tower.tick();
        assert_eq!(tower.cooldown, 28);
        assert!(!tower.is_disabled());

        tower.tick();
        assert_eq!(tower.cooldown, 27);
        assert!(!tower.armed);
    }
}
