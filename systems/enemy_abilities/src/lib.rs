#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that lets ability-bearing enemies disable nearby towers.

use monochrome_td_core::{
    distance, rules, Command, EnemyView, SessionState, TowerId, TowerView,
};

/// Field ability system that remembers which towers were claimed during a pass.
#[derive(Debug, Default)]
pub struct EnemyAbilities {
    claimed: Vec<TowerId>,
}

impl EnemyAbilities {
    /// Creates a new field ability system.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Emits a disable command for every enemy whose field ability is ready.
    ///
    /// Each caster picks the nearest tower strictly inside the ability radius
    /// that is neither disabled nor already picked by an earlier caster this
    /// pass. Equally distant towers resolve to the lower identifier. Casters
    /// without a candidate stay ready and try again on the next tick.
    pub fn handle(
        &mut self,
        state: SessionState,
        enemies: &EnemyView,
        towers: &TowerView,
        out: &mut Vec<Command>,
    ) {
        self.claimed.clear();
        if !state.is_playing() || towers.is_empty() {
            return;
        }

        for caster in enemies.iter().filter(|enemy| enemy.ability_ready) {
            let mut nearest: Option<(TowerId, f32)> = None;
            for tower in towers
                .iter()
                .filter(|tower| !tower.is_disabled() && !self.claimed.contains(&tower.id))
            {
                let reach = distance(caster.position, tower.position);
                if reach >= rules::FIELD_ABILITY_RADIUS {
                    continue;
                }
                if nearest.map_or(true, |(_, best)| reach < best) {
                    nearest = Some((tower.id, reach));
                }
            }

            let Some((tower, _)) = nearest else {
                continue;
            };
            self.claimed.push(tower);
            out.push(Command::DisableTower {
                tower,
                caster: caster.id,
                duration: rules::FIELD_ABILITY_DISABLE_DURATION,
            });
        }
    }
}
