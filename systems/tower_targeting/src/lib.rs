#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that computes deterministic tower targets from world snapshots.

use monochrome_td_core::{
    within_range, EnemyId, EnemyView, Passive, SessionState, TowerTarget, TowerView, Vec2,
};

/// Tower targeting system that reuses scratch buffers to avoid repeated allocations.
#[derive(Debug, Default)]
pub struct TowerTargeting {
    enemy_workspace: Vec<EnemyCandidate>,
}

impl TowerTargeting {
    /// Creates a new tower targeting system with empty scratch buffers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Computes tower targets for the provided world snapshot.
    ///
    /// Only armed towers acquire targets. Each picks the first live enemy in
    /// spawn order within its range; multi-shot towers additionally pick the
    /// first other enemy in range. The output buffer is cleared before
    /// populating it with the latest assignments.
    pub fn handle(
        &mut self,
        state: SessionState,
        towers: &TowerView,
        enemies: &EnemyView,
        out: &mut Vec<TowerTarget>,
    ) {
        out.clear();

        if !state.is_playing() || towers.is_empty() || enemies.is_empty() {
            return;
        }

        self.prepare_enemy_workspace(enemies);
        if self.enemy_workspace.is_empty() {
            return;
        }

        for tower in towers.iter().filter(|tower| tower.armed) {
            let range = tower.range();
            let mut in_range = self
                .enemy_workspace
                .iter()
                .filter(|candidate| within_range(tower.position, candidate.position, range))
                .map(|candidate| candidate.id);

            let Some(primary) = in_range.next() else {
                continue;
            };
            let secondary = if tower.has_upgrade(Passive::MultiShot) {
                in_range.next()
            } else {
                None
            };

            out.push(TowerTarget {
                tower: tower.id,
                primary,
                secondary,
            });
        }
    }

    fn prepare_enemy_workspace(&mut self, enemies: &EnemyView) {
        self.enemy_workspace.clear();
        self.enemy_workspace.extend(
            enemies
                .iter()
                .filter(|snapshot| !snapshot.is_defeated())
                .map(|snapshot| EnemyCandidate {
                    id: snapshot.id,
                    position: snapshot.position,
                }),
        );
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct EnemyCandidate {
    id: EnemyId,
    position: Vec2,
}
