//! Static stat tables for towers, passives and enemies.

use serde::{Deserialize, Serialize};

use crate::{rules, Gold, TowerLevel, WaveId};

/// Types of towers that can be constructed on a build spot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TowerKind {
    /// Fast firing tower with moderate range.
    Archer,
    /// Low damage tower whose projectiles slow their target.
    Sap,
    /// Slow firing tower dealing heavy single-target damage.
    Rock,
}

impl TowerKind {
    /// Every constructible tower kind in catalog order.
    pub const ALL: [TowerKind; 3] = [Self::Archer, Self::Sap, Self::Rock];

    /// Display name of the tower kind.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Archer => "Archer",
            Self::Sap => "Sap Sprayer",
            Self::Rock => "Rock Thrower",
        }
    }

    /// Gold required to construct the tower.
    #[must_use]
    pub const fn cost(self) -> Gold {
        match self {
            Self::Archer => Gold::new(70),
            Self::Sap => Gold::new(100),
            Self::Rock => Gold::new(150),
        }
    }

    /// Targeting radius of a level one tower without passives.
    #[must_use]
    pub const fn base_range(self) -> f32 {
        match self {
            Self::Archer => 100.0,
            Self::Sap => 70.0,
            Self::Rock => 140.0,
        }
    }

    /// Projectile damage of a level one tower.
    #[must_use]
    pub const fn base_damage(self) -> f32 {
        match self {
            Self::Archer => 8.0,
            Self::Sap => 3.0,
            Self::Rock => 40.0,
        }
    }

    /// Ticks between shots before level reductions apply.
    #[must_use]
    pub const fn base_cooldown(self) -> u32 {
        match self {
            Self::Archer => 30,
            Self::Sap => 45,
            Self::Rock => 90,
        }
    }

    /// Catalog of passives that may be purchased for this kind.
    #[must_use]
    pub const fn passives(self) -> &'static [Passive] {
        match self {
            Self::Archer => &[Passive::MultiShot, Passive::Sniper, Passive::Crit],
            Self::Sap => &[Passive::StickySap, Passive::Acid, Passive::Root],
            Self::Rock => &[Passive::Concussion, Passive::Splash, Passive::Execute],
        }
    }

    /// Reports whether the passive belongs to this kind's catalog.
    #[must_use]
    pub fn offers(self, passive: Passive) -> bool {
        self.passives().contains(&passive)
    }

    /// Targeting radius after level growth and the optional sniper multiplier.
    #[must_use]
    pub fn effective_range(self, level: TowerLevel, sniper: bool) -> f32 {
        let levels_above_first = f32::from(level.get().saturating_sub(1));
        let range = self.base_range() * (1.0 + rules::RANGE_GROWTH_PER_LEVEL * levels_above_first);
        if sniper {
            range * rules::SNIPER_RANGE_MULTIPLIER
        } else {
            range
        }
    }

    /// Damage carried by a projectile fired at the provided level.
    #[must_use]
    pub fn effective_damage(self, level: TowerLevel) -> f32 {
        self.base_damage() * f32::from(level.get())
    }

    /// Cooldown armed after a tower of the provided level fires.
    #[must_use]
    pub fn cooldown_after_shot(self, level: TowerLevel) -> u32 {
        let reduction = rules::COOLDOWN_REDUCTION_PER_LEVEL * u32::from(level.get());
        self.base_cooldown()
            .saturating_sub(reduction)
            .max(rules::MIN_TOWER_COOLDOWN)
    }

    /// Gold required to raise a tower from `level` to the next level.
    ///
    /// Returns `None` once the tower has reached [`TowerLevel::MAX`].
    #[must_use]
    pub fn upgrade_cost(self, level: TowerLevel) -> Option<Gold> {
        let _ = level.next()?;
        let scale = rules::UPGRADE_COST_MULTIPLIER.powi(i32::from(level.get()));
        Some(Gold::new((f64::from(self.cost().get()) * scale).floor() as u32))
    }

    /// Gold refunded when the tower is sold.
    #[must_use]
    pub fn sell_value(self) -> Gold {
        let refund = f64::from(self.cost().get()) * rules::SELL_REFUND_FRACTION;
        Gold::new(refund.floor() as u32)
    }
}

/// One-time purchasable upgrades that modify a tower's combat behaviour.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Passive {
    /// Archer: fires a second arrow at another enemy in range.
    MultiShot,
    /// Archer: greatly increases range.
    Sniper,
    /// Archer: chance to deal triple damage.
    Crit,
    /// Sap: stronger and longer slow.
    StickySap,
    /// Sap: damage over time on impact.
    Acid,
    /// Sap: chance to stop the target entirely.
    Root,
    /// Rock: stuns the target on impact.
    Concussion,
    /// Rock: area damage around the impact point.
    Splash,
    /// Rock: instantly defeats weakened targets.
    Execute,
}

impl Passive {
    /// Every passive across all catalogs.
    pub const ALL: [Passive; 9] = [
        Self::MultiShot,
        Self::Sniper,
        Self::Crit,
        Self::StickySap,
        Self::Acid,
        Self::Root,
        Self::Concussion,
        Self::Splash,
        Self::Execute,
    ];

    /// Tower kind whose catalog lists this passive.
    #[must_use]
    pub const fn tower_kind(self) -> TowerKind {
        match self {
            Self::MultiShot | Self::Sniper | Self::Crit => TowerKind::Archer,
            Self::StickySap | Self::Acid | Self::Root => TowerKind::Sap,
            Self::Concussion | Self::Splash | Self::Execute => TowerKind::Rock,
        }
    }

    /// Display name of the passive.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::MultiShot => "Multi-Shot",
            Self::Sniper => "Sniper Scope",
            Self::Crit => "Deadly Aim",
            Self::StickySap => "Sticky Sap",
            Self::Acid => "Acid",
            Self::Root => "Entangle",
            Self::Concussion => "Concussion",
            Self::Splash => "Meteor",
            Self::Execute => "Crusher",
        }
    }

    /// Gold required to purchase the passive.
    #[must_use]
    pub const fn cost(self) -> Gold {
        match self {
            Self::MultiShot => Gold::new(150),
            Self::Sniper => Gold::new(100),
            Self::Crit => Gold::new(120),
            Self::StickySap => Gold::new(120),
            Self::Acid => Gold::new(150),
            Self::Root => Gold::new(180),
            Self::Concussion => Gold::new(160),
            Self::Splash => Gold::new(200),
            Self::Execute => Gold::new(250),
        }
    }

    const fn bit(self) -> u16 {
        1 << self as u16
    }
}

/// Set of passives owned by a tower.
///
/// The set is `Copy`, so projectiles capture the firing tower's passives by
/// value and later purchases never reach shots already in flight.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PassiveSet(u16);

impl PassiveSet {
    /// Creates an empty passive set.
    #[must_use]
    pub const fn empty() -> Self {
        Self(0)
    }

    /// Reports whether the passive is owned.
    #[must_use]
    pub const fn contains(self, passive: Passive) -> bool {
        self.0 & passive.bit() != 0
    }

    /// Adds the passive, returning `false` when it was already owned.
    pub fn insert(&mut self, passive: Passive) -> bool {
        let newly_added = !self.contains(passive);
        self.0 |= passive.bit();
        newly_added
    }

    /// Number of owned passives.
    #[must_use]
    pub const fn len(self) -> u32 {
        self.0.count_ones()
    }

    /// Reports whether no passive is owned.
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Iterator over owned passives in catalog order.
    pub fn iter(self) -> impl Iterator<Item = Passive> {
        Passive::ALL
            .into_iter()
            .filter(move |passive| self.contains(*passive))
    }
}

impl FromIterator<Passive> for PassiveSet {
    fn from_iter<I: IntoIterator<Item = Passive>>(iter: I) -> Self {
        let mut set = Self::empty();
        for passive in iter {
            let _ = set.insert(passive);
        }
        set
    }
}

/// Secondary effects a projectile resolves on impact.
///
/// Derived once when the projectile is fired from the tower kind and the
/// passive snapshot, never re-evaluated afterwards.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProjectileEffects {
    /// Ticks of slow applied to the target; zero for non-slowing projectiles.
    pub slow_duration: u32,
    /// Speed multiplier applied with the slow.
    pub slow_multiplier: f32,
    /// Ticks of poison applied alongside the slow.
    pub poison_duration: u32,
    /// Whether the slow may escalate into a full root.
    pub may_root: bool,
    /// Ticks of full immobilization applied on impact.
    pub stun_duration: u32,
    /// Whether weakened targets are executed.
    pub execute: bool,
    /// Whether the impact splashes onto nearby enemies.
    pub splash: bool,
}

impl ProjectileEffects {
    /// Derives the effects of a projectile fired by `kind` with `passives`.
    #[must_use]
    pub fn derive(kind: TowerKind, passives: PassiveSet) -> Self {
        let sticky = passives.contains(Passive::StickySap);
        let (slow_duration, slow_multiplier, poison_duration, may_root) = match kind {
            TowerKind::Sap => (
                if sticky {
                    rules::STICKY_SLOW_DURATION
                } else {
                    rules::SLOW_DURATION
                },
                if sticky {
                    rules::STICKY_SLOW_MULTIPLIER
                } else {
                    rules::SLOW_MULTIPLIER
                },
                if passives.contains(Passive::Acid) {
                    rules::POISON_DURATION
                } else {
                    0
                },
                passives.contains(Passive::Root),
            ),
            TowerKind::Archer | TowerKind::Rock => (0, 1.0, 0, false),
        };

        let rock = kind == TowerKind::Rock;
        Self {
            slow_duration,
            slow_multiplier,
            poison_duration,
            may_root,
            stun_duration: if rock && passives.contains(Passive::Concussion) {
                rules::STUN_DURATION
            } else {
                0
            },
            execute: rock && passives.contains(Passive::Execute),
            splash: rock && passives.contains(Passive::Splash),
        }
    }
}

/// Enemy archetypes spawned by waves.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EnemyKind {
    /// Baseline enemy.
    Normal,
    /// Quick and fragile.
    Fast,
    /// Slow and sturdy.
    Tank,
    /// Very quick and very fragile.
    Sprinter,
    /// Extremely slow boss with a large hit point pool.
    Juggernaut,
    /// Support enemy that periodically disables nearby towers.
    Shaman,
}

impl EnemyKind {
    /// Every enemy kind.
    pub const ALL: [EnemyKind; 6] = [
        Self::Normal,
        Self::Fast,
        Self::Tank,
        Self::Sprinter,
        Self::Juggernaut,
        Self::Shaman,
    ];

    /// Distance travelled per tick at full speed.
    #[must_use]
    pub const fn base_speed(self) -> f32 {
        match self {
            Self::Normal => 0.8,
            Self::Fast => 1.4,
            Self::Tank => 0.4,
            Self::Sprinter => 1.8,
            Self::Juggernaut => 0.25,
            Self::Shaman => 0.6,
        }
    }

    /// Multiplier applied to the wave's base hit points.
    #[must_use]
    pub const fn hp_multiplier(self) -> f32 {
        match self {
            Self::Normal => 1.0,
            Self::Fast => 0.6,
            Self::Tank => 2.5,
            Self::Sprinter => 0.4,
            Self::Juggernaut => 6.0,
            Self::Shaman => 1.2,
        }
    }

    /// Gold awarded when the enemy is defeated.
    #[must_use]
    pub const fn bounty(self) -> Gold {
        match self {
            Self::Normal | Self::Fast | Self::Sprinter => Gold::new(5),
            Self::Tank => Gold::new(15),
            Self::Juggernaut => Gold::new(30),
            Self::Shaman => Gold::new(20),
        }
    }

    /// Reports whether the kind periodically casts the tower-disabling field ability.
    #[must_use]
    pub const fn has_field_ability(self) -> bool {
        matches!(self, Self::Shaman)
    }

    /// Hit points of an enemy of this kind spawned during `wave`.
    #[must_use]
    pub fn max_hp(self, wave: WaveId) -> f32 {
        let base = rules::ENEMY_BASE_HP + rules::ENEMY_HP_PER_WAVE * wave.get() as f32;
        base * self.hp_multiplier()
    }
}
