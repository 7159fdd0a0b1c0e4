//! Fixed combat and pacing constants.
//!
//! Durations are expressed in simulation ticks, distances in world units.

/// Number of simulation ticks executed per second of play.
pub const TICKS_PER_SECOND: u32 = 60;

/// Distance a projectile travels per tick.
pub const PROJECTILE_SPEED: f32 = 5.0;

/// Fractional range gained per tower level above the first.
pub const RANGE_GROWTH_PER_LEVEL: f32 = 0.2;
/// Range multiplier granted by the sniper passive.
pub const SNIPER_RANGE_MULTIPLIER: f32 = 1.5;
/// Damage multiplier applied by a critical strike.
pub const CRIT_DAMAGE_MULTIPLIER: f32 = 3.0;
/// Cooldown ticks removed per tower level.
pub const COOLDOWN_REDUCTION_PER_LEVEL: u32 = 2;
/// Lower bound on a tower's attack cooldown.
pub const MIN_TOWER_COOLDOWN: u32 = 5;

/// Probability that a critical-strike tower triples its damage.
pub const DEFAULT_CRIT_CHANCE: f64 = 0.2;
/// Probability that a rooting sap projectile fully immobilizes its target.
pub const DEFAULT_ROOT_CHANCE: f64 = 0.1;

/// Slow applied by a sap projectile.
pub const SLOW_DURATION: u32 = 120;
/// Slow applied by a sap projectile carrying sticky sap.
pub const STICKY_SLOW_DURATION: u32 = 180;
/// Speed multiplier of a regular sap slow.
pub const SLOW_MULTIPLIER: f32 = 0.5;
/// Speed multiplier of a sticky sap slow.
pub const STICKY_SLOW_MULTIPLIER: f32 = 0.3;
/// Damage-over-time duration applied by acid.
pub const POISON_DURATION: u32 = 180;
/// Hit points removed per tick while poisoned.
pub const POISON_DAMAGE_PER_TICK: f32 = 0.05;
/// Immobilization applied by a concussion projectile.
pub const STUN_DURATION: u32 = 60;
/// Fraction of max hit points below which a crusher projectile executes.
pub const EXECUTE_THRESHOLD: f32 = 0.2;
/// Radius of meteor splash damage around the impact point (exclusive).
pub const SPLASH_RADIUS: f32 = 50.0;
/// Fraction of projectile damage dealt as splash.
pub const SPLASH_DAMAGE_FRACTION: f32 = 0.5;

/// Radius in which a field ability looks for towers (exclusive).
pub const FIELD_ABILITY_RADIUS: f32 = 150.0;
/// Ticks a tower stays disabled after a field ability.
pub const FIELD_ABILITY_DISABLE_DURATION: u32 = 300;
/// Ticks between successful field ability casts.
pub const FIELD_ABILITY_COOLDOWN: u32 = 300;
/// Ability cooldown an ability-bearing enemy spawns with.
pub const FIELD_ABILITY_INITIAL_COOLDOWN: u32 = 120;

/// Base hit points of an enemy spawned during the first wave.
pub const ENEMY_BASE_HP: f32 = 30.0;
/// Additional base hit points per wave index.
pub const ENEMY_HP_PER_WAVE: f32 = 20.0;

/// Gold granted for clearing the first wave.
pub const WAVE_REWARD_BASE: u32 = 100;
/// Additional gold granted per wave index.
pub const WAVE_REWARD_STEP: u32 = 50;
/// Ticks the "wave cleared" notice stays visible.
pub const WAVE_CLEAR_DISPLAY_DURATION: u32 = 180;

/// Growth factor applied to a tower's cost for each upgrade.
pub const UPGRADE_COST_MULTIPLIER: f64 = 1.5;
/// Fraction of the build cost refunded when selling a tower.
pub const SELL_REFUND_FRACTION: f64 = 0.5;
