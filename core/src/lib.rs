#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Monochrome TD simulation.
//!
//! This crate defines the message surface that connects the session, the
//! authoritative world, and pure systems. The session submits [`Command`]
//! values describing desired mutations, the world executes those commands via
//! its `apply` entry point, and then broadcasts [`Event`] values for systems to
//! react to deterministically. Systems consume event streams, query immutable
//! views, and respond exclusively with new command batches.

mod geometry;
mod level;
pub mod rules;
mod stats;

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use geometry::{distance, step_toward, within_range, Step};
pub use glam::Vec2;
pub use level::{LevelDefinition, LevelError, LevelId, WaveSpec};
pub use stats::{EnemyKind, Passive, PassiveSet, ProjectileEffects, TowerKind};

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Player intent to begin the next wave of the level.
    StartWave,
    /// Player intent to construct a tower on a free build spot.
    BuildTower {
        /// Build spot that will host the tower.
        spot: BuildSpotId,
        /// Type of tower to construct.
        kind: TowerKind,
    },
    /// Player intent to sell a tower, freeing its build spot.
    SellTower {
        /// Identifier of the tower being sold.
        tower: TowerId,
    },
    /// Player intent to raise a tower by one level.
    UpgradeTower {
        /// Identifier of the tower being upgraded.
        tower: TowerId,
    },
    /// Player intent to buy a passive from the tower's catalog.
    BuyPassive {
        /// Identifier of the tower receiving the passive.
        tower: TowerId,
        /// Passive being purchased.
        passive: Passive,
    },
    /// Advances the simulation clock by one tick and runs tower timers.
    Tick,
    /// Requests that an enemy enters the level at the start of the path.
    SpawnEnemy {
        /// Kind of enemy to spawn.
        kind: EnemyKind,
        /// Wave the enemy belongs to, which scales its hit points.
        wave: WaveId,
    },
    /// Requests that the active wave is marked as cleared and rewarded.
    CompleteWave {
        /// Wave the director believes has been cleared.
        wave: WaveId,
    },
    /// Requests that a tower launches a projectile at an enemy.
    FireProjectile {
        /// Tower firing the projectile.
        tower: TowerId,
        /// Enemy the projectile homes in on.
        target: EnemyId,
        /// Damage fixed at fire time.
        damage: f32,
    },
    /// Moves a single projectile toward its target, resolving arrival.
    AdvanceProjectile {
        /// Projectile to advance.
        projectile: ProjectileId,
    },
    /// Removes hit points from an enemy.
    DamageEnemy {
        /// Enemy receiving the damage.
        enemy: EnemyId,
        /// Hit points removed.
        amount: f32,
    },
    /// Overrides an enemy's speed multiplier for a number of ticks.
    SlowEnemy {
        /// Enemy being slowed.
        enemy: EnemyId,
        /// Speed multiplier applied while the slow lasts; zero immobilizes.
        multiplier: f32,
        /// Ticks the slow lasts.
        duration: u32,
    },
    /// Applies damage over time to an enemy.
    PoisonEnemy {
        /// Enemy being poisoned.
        enemy: EnemyId,
        /// Ticks the poison lasts.
        duration: u32,
    },
    /// Defeats an enemy whose hit points fell below a fraction of its maximum.
    ExecuteEnemy {
        /// Enemy that may be executed.
        enemy: EnemyId,
        /// Fraction of max hit points below which the enemy is defeated.
        threshold: f32,
    },
    /// Damages every enemy strictly inside a radius except the spared one.
    SplashDamage {
        /// Centre of the splash.
        center: Vec2,
        /// Exclusive splash radius.
        radius: f32,
        /// Hit points removed from each enemy caught in the splash.
        amount: f32,
        /// Enemy excluded from the splash, usually the direct target.
        spared: EnemyId,
    },
    /// Counts down field ability cooldowns and marks ready casters.
    ChargeAbilities,
    /// Disables a tower on behalf of a field ability caster.
    DisableTower {
        /// Tower being disabled.
        tower: TowerId,
        /// Enemy casting the ability.
        caster: EnemyId,
        /// Ticks the tower stays disabled.
        duration: u32,
    },
    /// Removes every enemy with no hit points left, crediting bounties.
    SweepDefeated,
    /// Moves every enemy along the path and resolves escapes.
    AdvanceEnemies,
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Indicates that the simulation clock advanced.
    TimeAdvanced {
        /// Number of ticks simulated so far, including this one.
        tick: u64,
    },
    /// Announces that a wave became active.
    WaveStarted {
        /// Wave that started.
        wave: WaveId,
        /// Composition of the wave.
        spec: WaveSpec,
    },
    /// Confirms that an enemy entered the level.
    EnemySpawned {
        /// Identifier assigned to the enemy.
        enemy: EnemyId,
        /// Kind of the enemy.
        kind: EnemyKind,
        /// Starting position of the enemy.
        position: Vec2,
        /// Hit points the enemy spawned with.
        hp: f32,
    },
    /// Confirms that a tower was constructed.
    TowerBuilt {
        /// Identifier assigned to the tower.
        tower: TowerId,
        /// Type of tower constructed.
        kind: TowerKind,
        /// Build spot hosting the tower.
        spot: BuildSpotId,
        /// Gold spent on construction.
        cost: Gold,
    },
    /// Confirms that a tower was sold.
    TowerSold {
        /// Identifier of the sold tower.
        tower: TowerId,
        /// Build spot that became free.
        spot: BuildSpotId,
        /// Gold refunded to the player.
        refund: Gold,
    },
    /// Confirms that a tower gained a level.
    TowerUpgraded {
        /// Identifier of the upgraded tower.
        tower: TowerId,
        /// Level reached by the tower.
        level: TowerLevel,
        /// Gold spent on the upgrade.
        cost: Gold,
    },
    /// Confirms that a tower acquired a passive.
    PassivePurchased {
        /// Identifier of the tower.
        tower: TowerId,
        /// Passive acquired.
        passive: Passive,
        /// Gold spent on the passive.
        cost: Gold,
    },
    /// Reports that a player intent was rejected without any state change.
    ActionRejected {
        /// Specific reason the intent failed.
        reason: ActionError,
    },
    /// Confirms that a tower launched a projectile.
    ProjectileFired {
        /// Identifier assigned to the projectile.
        projectile: ProjectileId,
        /// Tower that fired.
        tower: TowerId,
        /// Enemy the projectile homes in on.
        target: EnemyId,
        /// Damage carried by the projectile.
        damage: f32,
    },
    /// Reports that a projectile reached its target and was consumed.
    ProjectileImpacted {
        /// Identifier of the consumed projectile.
        projectile: ProjectileId,
        /// Kind of tower that fired the projectile.
        kind: TowerKind,
        /// Enemy that was hit.
        target: EnemyId,
        /// Damage carried by the projectile.
        damage: f32,
        /// Secondary effects captured when the projectile was fired.
        effects: ProjectileEffects,
        /// Position of the target at the moment of impact.
        point: Vec2,
    },
    /// Reports that a projectile lost its target and vanished without effect.
    ProjectileDiscarded {
        /// Identifier of the discarded projectile.
        projectile: ProjectileId,
    },
    /// Reports that an enemy lost hit points.
    EnemyDamaged {
        /// Enemy that was damaged.
        enemy: EnemyId,
        /// Hit points removed.
        amount: f32,
        /// Hit points left afterwards; may be negative.
        hp: f32,
    },
    /// Reports that an enemy's speed multiplier was overridden.
    EnemySlowed {
        /// Enemy that was slowed.
        enemy: EnemyId,
        /// Speed multiplier now in effect.
        multiplier: f32,
        /// Ticks the slow lasts.
        duration: u32,
    },
    /// Reports that an enemy started taking damage over time.
    EnemyPoisoned {
        /// Enemy that was poisoned.
        enemy: EnemyId,
        /// Ticks the poison lasts.
        duration: u32,
    },
    /// Reports that a weakened enemy was executed.
    EnemyExecuted {
        /// Enemy that was executed.
        enemy: EnemyId,
    },
    /// Reports that a field ability disabled a tower.
    TowerDisabled {
        /// Tower that was disabled.
        tower: TowerId,
        /// Enemy that cast the ability.
        caster: EnemyId,
        /// Ticks the tower stays disabled.
        duration: u32,
    },
    /// Reports that an enemy was defeated and removed.
    EnemyDefeated {
        /// Enemy that was defeated.
        enemy: EnemyId,
        /// Kind of the defeated enemy.
        kind: EnemyKind,
        /// Gold credited for the kill.
        bounty: Gold,
    },
    /// Reports that an enemy reached the end of the path.
    EnemyEscaped {
        /// Enemy that escaped.
        enemy: EnemyId,
        /// Lives remaining afterwards.
        lives: u32,
    },
    /// Reports that the active wave was cleared.
    WaveCleared {
        /// Wave that was cleared.
        wave: WaveId,
        /// Gold awarded for clearing it.
        reward: Gold,
    },
    /// Reports that the final wave of a level was cleared.
    LevelCompleted {
        /// Level that was completed.
        level: LevelId,
    },
    /// Reports that the session reached a terminal state.
    SessionEnded {
        /// Terminal state reached.
        outcome: SessionState,
    },
}

/// Reasons a player intent may be rejected by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Error, Serialize, Deserialize)]
pub enum ActionError {
    /// The session already reached game over or victory.
    #[error("the session is no longer accepting actions")]
    SessionInactive,
    /// A wave is already running.
    #[error("a wave is already in progress")]
    WaveInProgress,
    /// The current wave index lies past the level's waves.
    ///
    /// Clearing the final wave ends the session, so live worlds answer a late
    /// start with [`ActionError::SessionInactive`] instead.
    #[error("no waves remain in this level")]
    NoWavesRemaining,
    /// The build spot does not exist in the level.
    #[error("unknown build spot {}", .0.get())]
    UnknownBuildSpot(BuildSpotId),
    /// The build spot already hosts a tower.
    #[error("build spot {} is already occupied", .0.get())]
    SpotOccupied(BuildSpotId),
    /// The player cannot afford the action.
    #[error("insufficient gold: {required} required, {available} available")]
    InsufficientGold {
        /// Gold the action costs.
        required: Gold,
        /// Gold the player owns.
        available: Gold,
    },
    /// No tower with the provided identifier exists.
    #[error("tower {} does not exist", .0.get())]
    MissingTower(TowerId),
    /// The tower cannot be upgraded any further.
    #[error("tower {} is already at the maximum level", .0.get())]
    MaxLevel(TowerId),
    /// The passive is not part of the tower kind's catalog.
    #[error("{} cannot carry {}", .kind.name(), .passive.name())]
    PassiveUnavailable {
        /// Kind of the tower.
        kind: TowerKind,
        /// Passive that was requested.
        passive: Passive,
    },
    /// The tower already owns the passive.
    #[error("tower {} already owns {}", .tower.get(), .passive.name())]
    PassiveOwned {
        /// Tower that already owns the passive.
        tower: TowerId,
        /// Passive that was requested.
        passive: Passive,
    },
}

/// Lifecycle of a session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SessionState {
    /// The simulation is running and accepts actions.
    Playing,
    /// Lives ran out.
    GameOver,
    /// The final wave was cleared.
    Victory,
}

impl SessionState {
    /// Reports whether the session still advances.
    #[must_use]
    pub const fn is_playing(self) -> bool {
        matches!(self, Self::Playing)
    }
}

/// Progress of the wave currently handled by the director.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WavePhase {
    /// Waiting for the player to start the next wave.
    Idle,
    /// Enemies of the active wave are still being spawned.
    Spawning,
    /// Every enemy was spawned; waiting for the field to empty.
    Draining,
    /// The final wave was cleared.
    Cleared,
}

/// Unique identifier assigned to an enemy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EnemyId(u32);

impl EnemyId {
    /// Creates a new enemy identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to a tower.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TowerId(u32);

impl TowerId {
    /// Creates a new tower identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to a projectile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ProjectileId(u32);

impl ProjectileId {
    /// Creates a new projectile identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Index of a build spot within the level's build spot list.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BuildSpotId(u32);

impl BuildSpotId {
    /// Creates a new build spot identifier with the provided index.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }

    /// Position of the spot within the level's build spot list.
    #[must_use]
    pub const fn index(&self) -> usize {
        self.0 as usize
    }
}

/// Zero-based index of a wave within its level.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct WaveId(u32);

impl WaveId {
    /// Creates a new wave identifier with the provided index.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }

    /// Position of the wave within the level's wave list.
    #[must_use]
    pub const fn index(&self) -> usize {
        self.0 as usize
    }

    /// Identifier of the wave that follows this one.
    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0.saturating_add(1))
    }

    /// Gold awarded for clearing the wave.
    #[must_use]
    pub const fn reward(self) -> Gold {
        Gold::new(
            rules::WAVE_REWARD_BASE.saturating_add(rules::WAVE_REWARD_STEP.saturating_mul(self.0)),
        )
    }
}

/// Amount of currency owned or spent by the player.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct Gold(u32);

impl Gold {
    /// Creates a gold amount.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric amount.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }

    /// Subtracts `cost`, returning `None` when the amount is insufficient.
    #[must_use]
    pub const fn checked_sub(self, cost: Gold) -> Option<Gold> {
        match self.0.checked_sub(cost.0) {
            Some(value) => Some(Self(value)),
            None => None,
        }
    }

    /// Adds `income`, saturating at the numeric bound.
    #[must_use]
    pub const fn saturating_add(self, income: Gold) -> Gold {
        Self(self.0.saturating_add(income.0))
    }
}

impl fmt::Display for Gold {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Upgrade level of a tower, bounded to `1..=4`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TowerLevel(u8);

impl TowerLevel {
    /// Level of a freshly built tower.
    pub const BASE: TowerLevel = TowerLevel(1);
    /// Highest reachable level.
    pub const MAX: TowerLevel = TowerLevel(4);

    /// Creates a level, returning `None` outside `1..=4`.
    #[must_use]
    pub const fn new(value: u8) -> Option<Self> {
        if value >= Self::BASE.0 && value <= Self::MAX.0 {
            Some(Self(value))
        } else {
            None
        }
    }

    /// Retrieves the numeric level.
    #[must_use]
    pub const fn get(&self) -> u8 {
        self.0
    }

    /// Level reached by one more upgrade, or `None` at the maximum.
    #[must_use]
    pub const fn next(self) -> Option<Self> {
        Self::new(self.0 + 1)
    }
}

/// Target selected for a tower during the current tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TowerTarget {
    /// Tower that will fire.
    pub tower: TowerId,
    /// First enemy within range.
    pub primary: EnemyId,
    /// Additional enemy hit by a multi-shot tower.
    pub secondary: Option<EnemyId>,
}

/// Immutable representation of a single enemy's state used for queries.
#[derive(Clone, Debug, PartialEq)]
pub struct EnemySnapshot {
    /// Unique identifier assigned to the enemy.
    pub id: EnemyId,
    /// Kind of the enemy.
    pub kind: EnemyKind,
    /// Current position.
    pub position: Vec2,
    /// Index of the last waypoint reached.
    pub segment: usize,
    /// Remaining hit points; may be negative until the defeated sweep.
    pub hp: f32,
    /// Hit points the enemy spawned with.
    pub max_hp: f32,
    /// Multiplier applied to the base speed.
    pub speed_multiplier: f32,
    /// Ticks left on the active slow or stun.
    pub slow_remaining: u32,
    /// Ticks left on the active poison.
    pub poison_remaining: u32,
    /// Whether the field ability may be cast this tick.
    pub ability_ready: bool,
}

impl EnemySnapshot {
    /// Remaining hit points relative to the maximum, clamped to `0..=1`.
    #[must_use]
    pub fn hp_fraction(&self) -> f32 {
        if self.max_hp <= 0.0 {
            return 0.0;
        }
        (self.hp / self.max_hp).clamp(0.0, 1.0)
    }

    /// Reports whether a slow or stun is affecting the enemy.
    #[must_use]
    pub fn is_frozen(&self) -> bool {
        self.slow_remaining > 0 && self.speed_multiplier < 1.0
    }

    /// Reports whether the enemy ran out of hit points.
    #[must_use]
    pub fn is_defeated(&self) -> bool {
        self.hp <= 0.0
    }
}

/// Read-only snapshot describing all enemies, sorted by identifier.
///
/// Identifiers are allocated monotonically, so identifier order is spawn order.
#[derive(Clone, Debug, Default)]
pub struct EnemyView {
    snapshots: Vec<EnemySnapshot>,
}

impl EnemyView {
    /// Creates a new view from the provided snapshots, sorting by identifier.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<EnemySnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured enemy snapshots in spawn order.
    pub fn iter(&self) -> impl Iterator<Item = &EnemySnapshot> {
        self.snapshots.iter()
    }

    /// Looks up the snapshot of a single enemy.
    #[must_use]
    pub fn get(&self, enemy: EnemyId) -> Option<&EnemySnapshot> {
        self.snapshots
            .binary_search_by_key(&enemy, |snapshot| snapshot.id)
            .ok()
            .map(|index| &self.snapshots[index])
    }

    /// Number of enemies captured by the view.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Reports whether the view captured no enemies.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<EnemySnapshot> {
        self.snapshots
    }
}

/// Immutable representation of a single tower's state used for queries.
#[derive(Clone, Debug, PartialEq)]
pub struct TowerSnapshot {
    /// Unique identifier assigned to the tower.
    pub id: TowerId,
    /// Type of the tower.
    pub kind: TowerKind,
    /// Build spot hosting the tower.
    pub spot: BuildSpotId,
    /// Fixed world position of the tower.
    pub position: Vec2,
    /// Current upgrade level.
    pub level: TowerLevel,
    /// Ticks until the tower may fire again.
    pub cooldown_remaining: u32,
    /// Ticks the tower stays disabled.
    pub disabled_remaining: u32,
    /// Whether the tower may acquire a target this tick.
    pub armed: bool,
    /// Passives owned by the tower.
    pub passives: PassiveSet,
}

impl TowerSnapshot {
    /// Reports whether the tower owns the passive.
    #[must_use]
    pub const fn has_upgrade(&self, passive: Passive) -> bool {
        self.passives.contains(passive)
    }

    /// Reports whether a field ability currently disables the tower.
    #[must_use]
    pub const fn is_disabled(&self) -> bool {
        self.disabled_remaining > 0
    }

    /// Targeting radius derived from level and passives.
    #[must_use]
    pub fn range(&self) -> f32 {
        self.kind
            .effective_range(self.level, self.has_upgrade(Passive::Sniper))
    }
}

/// Read-only snapshot describing all towers, sorted by identifier.
#[derive(Clone, Debug, Default)]
pub struct TowerView {
    snapshots: Vec<TowerSnapshot>,
}

impl TowerView {
    /// Creates a new view from the provided snapshots, sorting by identifier.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<TowerSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured tower snapshots in identifier order.
    pub fn iter(&self) -> impl Iterator<Item = &TowerSnapshot> {
        self.snapshots.iter()
    }

    /// Looks up the snapshot of a single tower.
    #[must_use]
    pub fn get(&self, tower: TowerId) -> Option<&TowerSnapshot> {
        self.snapshots
            .binary_search_by_key(&tower, |snapshot| snapshot.id)
            .ok()
            .map(|index| &self.snapshots[index])
    }

    /// Number of towers captured by the view.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Reports whether the view captured no towers.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<TowerSnapshot> {
        self.snapshots
    }
}

/// Immutable representation of a projectile in flight.
#[derive(Clone, Debug, PartialEq)]
pub struct ProjectileSnapshot {
    /// Unique identifier assigned to the projectile.
    pub id: ProjectileId,
    /// Tower that fired the projectile.
    pub tower: TowerId,
    /// Kind of the firing tower.
    pub kind: TowerKind,
    /// Current position.
    pub position: Vec2,
    /// Enemy the projectile homes in on.
    pub target: EnemyId,
    /// Damage carried by the projectile.
    pub damage: f32,
}

/// Read-only snapshot describing all projectiles, sorted by identifier.
#[derive(Clone, Debug, Default)]
pub struct ProjectileView {
    snapshots: Vec<ProjectileSnapshot>,
}

impl ProjectileView {
    /// Creates a new view from the provided snapshots, sorting by identifier.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<ProjectileSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured projectile snapshots in firing order.
    pub fn iter(&self) -> impl Iterator<Item = &ProjectileSnapshot> {
        self.snapshots.iter()
    }

    /// Number of projectiles captured by the view.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Reports whether the view captured no projectiles.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<ProjectileSnapshot> {
        self.snapshots
    }
}

/// Read-only summary of a running session for presenters.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct RunSnapshot {
    /// Level being played.
    pub level: LevelId,
    /// Lifecycle state of the session.
    pub state: SessionState,
    /// Phase of the wave director.
    pub phase: WavePhase,
    /// Lives left.
    pub lives: u32,
    /// Gold owned.
    pub gold: Gold,
    /// Current or next wave.
    pub wave: WaveId,
    /// Number of waves in the level.
    pub wave_total: u32,
    /// Whether a wave is running.
    pub wave_active: bool,
    /// Ticks the "wave cleared" notice stays visible.
    pub wave_clear_display: u32,
    /// Ticks simulated so far.
    pub tick: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::de::DeserializeOwned;

    fn assert_round_trip<T>(value: &T)
    where
        T: Serialize + DeserializeOwned + PartialEq + fmt::Debug,
    {
        let bytes = bincode::serialize(value).expect("serialize");
        let restored: T = bincode::deserialize(&bytes).expect("deserialize");
        assert_eq!(&restored, value);
    }

    #[test]
    fn action_error_round_trips_through_bincode() {
        assert_round_trip(&ActionError::InsufficientGold {
            required: Gold::new(150),
            available: Gold::new(80),
        });
        assert_round_trip(&ActionError::PassiveOwned {
            tower: TowerId::new(3),
            passive: Passive::Splash,
        });
    }

    #[test]
    fn wave_spec_round_trips_through_bincode() {
        assert_round_trip(&WaveSpec::new(EnemyKind::Shaman, 6, 48, 30));
    }

    #[test]
    fn wave_rewards_grow_linearly() {
        assert_eq!(WaveId::new(0).reward(), Gold::new(100));
        assert_eq!(WaveId::new(4).reward(), Gold::new(300));
        assert_eq!(WaveId::new(4).next(), WaveId::new(5));
    }

    #[test]
    fn gold_arithmetic_never_underflows() {
        let purse = Gold::new(100);
        assert_eq!(purse.checked_sub(Gold::new(70)), Some(Gold::new(30)));
        assert_eq!(purse.checked_sub(Gold::new(101)), None);
        assert_eq!(Gold::new(u32::MAX).saturating_add(purse), Gold::new(u32::MAX));
    }

    #[test]
    fn tower_levels_are_bounded() {
        assert_eq!(TowerLevel::new(0), None);
        assert_eq!(TowerLevel::new(5), None);
        assert_eq!(TowerLevel::BASE.next(), TowerLevel::new(2));
        assert_eq!(TowerLevel::MAX.next(), None);
    }

    #[test]
    fn action_errors_render_readable_messages() {
        let error = ActionError::InsufficientGold {
            required: Gold::new(150),
            available: Gold::new(80),
        };
        assert_eq!(
            error.to_string(),
            "insufficient gold: 150 required, 80 available"
        );
        let error = ActionError::PassiveUnavailable {
            kind: TowerKind::Archer,
            passive: Passive::Acid,
        };
        assert_eq!(error.to_string(), "Archer cannot carry Acid");
    }

    #[test]
    fn enemy_view_is_sorted_and_searchable() {
        let view = EnemyView::from_snapshots(vec![enemy(7, 10.0), enemy(2, 0.0), enemy(4, -1.0)]);
        let ids: Vec<u32> = view.iter().map(|snapshot| snapshot.id.get()).collect();
        assert_eq!(ids, vec![2, 4, 7]);
        assert!(view.get(EnemyId::new(4)).is_some_and(EnemySnapshot::is_defeated));
        assert!(view.get(EnemyId::new(5)).is_none());
        assert_eq!(view.len(), 3);
    }

    #[test]
    fn hp_fraction_is_clamped() {
        assert!((enemy(1, 15.0).hp_fraction() - 0.5).abs() < f32::EPSILON);
        assert_eq!(enemy(1, -4.0).hp_fraction(), 0.0);
    }

    #[test]
    fn sniper_snapshot_extends_range() {
        let mut tower = TowerSnapshot {
            id: TowerId::new(1),
            kind: TowerKind::Archer,
            spot: BuildSpotId::new(0),
            position: Vec2::ZERO,
            level: TowerLevel::BASE,
            cooldown_remaining: 0,
            disabled_remaining: 0,
            armed: true,
            passives: PassiveSet::empty(),
        };
        assert!((tower.range() - 100.0).abs() < 1e-4);
        tower.passives = [Passive::Sniper].into_iter().collect();
        assert!((tower.range() - 150.0).abs() < 1e-4);
    }

    fn enemy(id: u32, hp: f32) -> EnemySnapshot {
        EnemySnapshot {
            id: EnemyId::new(id),
            kind: EnemyKind::Normal,
            position: Vec2::ZERO,
            segment: 0,
            hp,
            max_hp: 30.0,
            speed_multiplier: 1.0,
            slow_remaining: 0,
            poison_remaining: 0,
            ability_ready: false,
        }
    }
}
