//! Enemy state and per-tick movement rules.

use monochrome_td_core::{
    rules, step_toward, EnemyId, EnemyKind, EnemySnapshot, Step, Vec2, WaveId,
};

/// Result of advancing an enemy by one tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Progress {
    /// The enemy is still travelling along the path.
    EnRoute,
    /// The enemy stands on the final waypoint.
    ReachedEnd,
}

/// Authoritative state of a single enemy.
#[derive(Clone, Debug)]
pub(crate) struct Enemy {
    pub(crate) id: EnemyId,
    pub(crate) kind: EnemyKind,
    pub(crate) position: Vec2,
    segment: usize,
    pub(crate) hp: f32,
    max_hp: f32,
    speed_multiplier: f32,
    slow_remaining: u32,
    poison_remaining: u32,
    ability_cooldown: u32,
    ability_ready: bool,
}

impl Enemy {
    /// Creates an enemy standing on the first waypoint of `path`.
    pub(crate) fn spawn(id: EnemyId, kind: EnemyKind, wave: WaveId, path: &[Vec2]) -> Self {
        let hp = kind.max_hp(wave);
        Self {
            id,
            kind,
            position: path.first().copied().unwrap_or(Vec2::ZERO),
            segment: 0,
            hp,
            max_hp: hp,
            speed_multiplier: 1.0,
            slow_remaining: 0,
            poison_remaining: 0,
            ability_cooldown: rules::FIELD_ABILITY_INITIAL_COOLDOWN,
            ability_ready: false,
        }
    }

    pub(crate) fn is_defeated(&self) -> bool {
        self.hp <= 0.0
    }

    /// Decays status timers, applies poison, and moves toward the next waypoint.
    ///
    /// The slow multiplier still governs the move on the tick its timer
    /// reaches zero; it is restored to full speed once that move is done.
    pub(crate) fn advance(&mut self, path: &[Vec2]) -> Progress {
        self.slow_remaining = self.slow_remaining.saturating_sub(1);

        if self.poison_remaining > 0 {
            self.hp -= rules::POISON_DAMAGE_PER_TICK;
            self.poison_remaining -= 1;
        }

        let progress = self.step(path);
        if self.slow_remaining == 0 {
            self.speed_multiplier = 1.0;
        }
        progress
    }

    fn step(&mut self, path: &[Vec2]) -> Progress {
        let Some(&waypoint) = path.get(self.segment + 1) else {
            return Progress::ReachedEnd;
        };

        let speed = self.kind.base_speed() * self.speed_multiplier;
        match step_toward(self.position, waypoint, speed) {
            Step::Arrived(position) => {
                self.position = position;
                self.segment += 1;
                if self.segment + 1 >= path.len() {
                    Progress::ReachedEnd
                } else {
                    Progress::EnRoute
                }
            }
            Step::Moved(position) => {
                self.position = position;
                Progress::EnRoute
            }
        }
    }

    pub(crate) fn damage(&mut self, amount: f32) {
        self.hp -= amount;
    }

    pub(crate) fn slow(&mut self, multiplier: f32, duration: u32) {
        self.speed_multiplier = multiplier;
        self.slow_remaining = duration;
    }

    pub(crate) fn poison(&mut self, duration: u32) {
        self.poison_remaining = duration;
    }

    /// Defeats the enemy when it is alive but below `threshold` of its max hit points.
    pub(crate) fn execute(&mut self, threshold: f32) -> bool {
        if self.is_defeated() || self.hp >= self.max_hp * threshold {
            return false;
        }
        self.hp = -1.0;
        true
    }

    /// Counts the field ability cooldown down, arming the ability at zero.
    pub(crate) fn charge_ability(&mut self) {
        if !self.kind.has_field_ability() {
            return;
        }

        if self.ability_cooldown > 0 {
            self.ability_cooldown -= 1;
            self.ability_ready = false;
        } else {
            self.ability_ready = true;
        }
    }

    pub(crate) fn reset_ability(&mut self) {
        self.ability_cooldown = rules::FIELD_ABILITY_COOLDOWN;
        self.ability_ready = false;
    }

    pub(crate) fn snapshot(&self) -> EnemySnapshot {
        EnemySnapshot {
            id: self.id,
            kind: self.kind,
            position: self.position,
            segment: self.segment,
            hp: self.hp,
            max_hp: self.max_hp,
            speed_multiplier: self.speed_multiplier,
            slow_remaining: self.slow_remaining,
            poison_remaining: self.poison_remaining,
            ability_ready: self.ability_ready,
        }
    }
}
