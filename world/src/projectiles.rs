//! Homing projectile state.

use monochrome_td_core::{
    distance, rules, step_toward, EnemyId, ProjectileEffects, ProjectileId, ProjectileSnapshot,
    TowerId, TowerKind, Vec2,
};

/// Outcome of moving a projectile for one tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Flight {
    /// The target is closer than one step; the projectile is consumed.
    Impact,
    /// The projectile moved toward the target.
    InFlight,
}

#[derive(Clone, Debug)]
pub(crate) struct Projectile {
    pub(crate) id: ProjectileId,
    pub(crate) tower: TowerId,
    pub(crate) kind: TowerKind,
    pub(crate) position: Vec2,
    pub(crate) target: EnemyId,
    pub(crate) damage: f32,
    pub(crate) effects: ProjectileEffects,
}

impl Projectile {
    /// Homes toward the target's current position at the fixed projectile speed.
    pub(crate) fn advance(&mut self, target_position: Vec2) -> Flight {
        if distance(self.position, target_position) < rules::PROJECTILE_SPEED {
            return Flight::Impact;
        }

        self.position = step_toward(self.position, target_position, rules::PROJECTILE_SPEED).position();
        Flight::InFlight
    }

    pub(crate) fn snapshot(&self) -> ProjectileSnapshot {
        ProjectileSnapshot {
            id: self.id,
            tower: self.tower,
            kind: self.kind,
            position: self.position,
            target: self.target,
            damage: self.damage,
        }
    }
}
