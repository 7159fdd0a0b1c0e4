#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that fires projectiles for targeted towers and resolves their impacts.

use monochrome_td_core::{
    rules, Command, Event, Passive, SessionState, TowerTarget, TowerView,
};
use rand::distributions::{Bernoulli, BernoulliError, Distribution};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use thiserror::Error;

/// Configuration parameters required to construct the tower combat system.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Config {
    rng_seed: u64,
    crit_chance: f64,
    root_chance: f64,
}

impl Config {
    /// Creates a configuration from a seed and the two proc probabilities.
    #[must_use]
    pub const fn new(rng_seed: u64, crit_chance: f64, root_chance: f64) -> Self {
        Self {
            rng_seed,
            crit_chance,
            root_chance,
        }
    }
}

/// Reasons the combat configuration may be rejected.
#[derive(Clone, Copy, Debug, PartialEq, Error)]
pub enum ConfigError {
    /// The critical strike probability lies outside `0..=1`.
    #[error("crit chance {0} is not a probability")]
    CritChance(f64),
    /// The root probability lies outside `0..=1`.
    #[error("root chance {0} is not a probability")]
    RootChance(f64),
}

/// Tower combat system owning the seeded random stream used for procs.
#[derive(Debug)]
pub struct TowerCombat {
    rng: ChaCha8Rng,
    crit: Bernoulli,
    root: Bernoulli,
    scratch: Vec<Command>,
}

impl TowerCombat {
    /// Creates a new tower combat system using the supplied configuration.
    pub fn new(config: Config) -> Result<Self, ConfigError> {
        let crit = Bernoulli::new(config.crit_chance)
            .map_err(|_: BernoulliError| ConfigError::CritChance(config.crit_chance))?;
        let root = Bernoulli::new(config.root_chance)
            .map_err(|_: BernoulliError| ConfigError::RootChance(config.root_chance))?;
        Ok(Self {
            rng: ChaCha8Rng::seed_from_u64(config.rng_seed),
            crit,
            root,
            scratch: Vec::new(),
        })
    }

    /// Emits `Command::FireProjectile` entries for every targeted tower.
    ///
    /// Damage scales with the tower level and is tripled by a successful
    /// critical strike roll. A multi-shot secondary target receives a second
    /// projectile carrying the same damage.
    pub fn handle(
        &mut self,
        state: SessionState,
        towers: &TowerView,
        tower_targets: &[TowerTarget],
        out: &mut Vec<Command>,
    ) {
        if !state.is_playing() || tower_targets.is_empty() {
            return;
        }

        self.scratch.clear();

        for target in tower_targets {
            let Some(tower) = towers.get(target.tower) else {
                continue;
            };
            if !tower.armed {
                continue;
            }

            let mut damage = tower.kind.effective_damage(tower.level);
            if tower.has_upgrade(Passive::Crit) && self.crit.sample(&mut self.rng) {
                damage *= rules::CRIT_DAMAGE_MULTIPLIER;
            }

            for enemy in std::iter::once(target.primary).chain(target.secondary) {
                self.scratch.push(Command::FireProjectile {
                    tower: target.tower,
                    target: enemy,
                    damage,
                });
            }
        }

        if self.scratch.is_empty() {
            return;
        }

        out.reserve(self.scratch.len());
        out.append(&mut self.scratch);
    }

    /// Translates impact events into damage and status effect commands.
    ///
    /// For every impact the commands follow a fixed order: direct damage,
    /// then poison and slow (possibly escalated to a root), then stun, then
    /// execute, then splash.
    pub fn resolve_impacts(&mut self, events: &[Event], out: &mut Vec<Command>) {
        for event in events {
            let Event::ProjectileImpacted {
                target,
                damage,
                effects,
                point,
                ..
            } = event
            else {
                continue;
            };
            let enemy = *target;

            out.push(Command::DamageEnemy {
                enemy,
                amount: *damage,
            });

            if effects.slow_duration > 0 {
                if effects.poison_duration > 0 {
                    out.push(Command::PoisonEnemy {
                        enemy,
                        duration: effects.poison_duration,
                    });
                }
                let rooted = effects.may_root && self.root.sample(&mut self.rng);
                out.push(Command::SlowEnemy {
                    enemy,
                    multiplier: if rooted { 0.0 } else { effects.slow_multiplier },
                    duration: effects.slow_duration,
                });
            }

            if effects.stun_duration > 0 {
                out.push(Command::SlowEnemy {
                    enemy,
                    multiplier: 0.0,
                    duration: effects.stun_duration,
                });
            }

            if effects.execute {
                out.push(Command::ExecuteEnemy {
                    enemy,
                    threshold: rules::EXECUTE_THRESHOLD,
                });
            }

            if effects.splash {
                out.push(Command::SplashDamage {
                    center: *point,
                    radius: rules::SPLASH_RADIUS,
                    amount: damage * rules::SPLASH_DAMAGE_FRACTION,
                    spared: enemy,
                });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use monochrome_td_core::{
        BuildSpotId, EnemyId, ProjectileEffects, ProjectileId, TowerId, TowerKind, TowerLevel,
        TowerSnapshot, Vec2,
    };

    fn system(crit: f64, root: f64) -> TowerCombat {
        TowerCombat::new(Config::new(7, crit, root)).expect("valid probabilities")
    }

    fn tower(id: u32, kind: TowerKind, level: u8, passives: &[Passive]) -> TowerSnapshot {
        TowerSnapshot {
            id: TowerId::new(id),
            kind,
            spot: BuildSpotId::new(id),
            position: Vec2::ZERO,
            level: TowerLevel::new(level).expect("valid level"),
            cooldown_remaining: 0,
            disabled_remaining: 0,
            armed: true,
            passives: passives.iter().copied().collect(),
        }
    }

    fn target(tower: u32, primary: u32, secondary: Option<u32>) -> TowerTarget {
        TowerTarget {
            tower: TowerId::new(tower),
            primary: EnemyId::new(primary),
            secondary: secondary.map(EnemyId::new),
        }
    }

    fn impact(kind: TowerKind, passives: &[Passive], damage: f32) -> Event {
        Event::ProjectileImpacted {
            projectile: ProjectileId::new(0),
            kind,
            target: EnemyId::new(3),
            damage,
            effects: ProjectileEffects::derive(kind, passives.iter().copied().collect()),
            point: Vec2::new(10.0, 10.0),
        }
    }

    #[test]
    fn invalid_probabilities_are_rejected() {
        assert_eq!(
            TowerCombat::new(Config::new(0, 1.5, 0.1)).unwrap_err(),
            ConfigError::CritChance(1.5)
        );
        assert_eq!(
            TowerCombat::new(Config::new(0, 0.2, -0.1)).unwrap_err(),
            ConfigError::RootChance(-0.1)
        );
    }

    #[test]
    fn damage_scales_with_level() {
        let mut system = system(0.0, 0.0);
        let towers = TowerView::from_snapshots(vec![tower(1, TowerKind::Rock, 3, &[])]);
        let mut out = Vec::new();
        system.handle(SessionState::Playing, &towers, &[target(1, 4, None)], &mut out);
        assert_eq!(
            out,
            vec![Command::FireProjectile {
                tower: TowerId::new(1),
                target: EnemyId::new(4),
                damage: 120.0,
            }]
        );
    }

    #[test]
    fn certain_crit_triples_both_multi_shot_projectiles() {
        let mut system = system(1.0, 0.0);
        let towers = TowerView::from_snapshots(vec![tower(
            1,
            TowerKind::Archer,
            1,
            &[Passive::Crit, Passive::MultiShot],
        )]);
        let mut out = Vec::new();
        system.handle(SessionState::Playing, &towers, &[target(1, 4, Some(6))], &mut out);
        assert_eq!(
            out,
            vec![
                Command::FireProjectile {
                    tower: TowerId::new(1),
                    target: EnemyId::new(4),
                    damage: 24.0,
                },
                Command::FireProjectile {
                    tower: TowerId::new(1),
                    target: EnemyId::new(6),
                    damage: 24.0,
                },
            ]
        );
    }

    #[test]
    fn crit_requires_the_passive() {
        let mut system = system(1.0, 0.0);
        let towers = TowerView::from_snapshots(vec![tower(1, TowerKind::Archer, 2, &[])]);
        let mut out = Vec::new();
        system.handle(SessionState::Playing, &towers, &[target(1, 4, None)], &mut out);
        assert!(matches!(
            out.as_slice(),
            [Command::FireProjectile { damage, .. }] if (*damage - 16.0).abs() < f32::EPSILON
        ));
    }

    #[test]
    fn unknown_or_unarmed_towers_do_not_fire() {
        let mut system = system(0.0, 0.0);
        let mut idle = tower(2, TowerKind::Archer, 1, &[]);
        idle.armed = false;
        let towers = TowerView::from_snapshots(vec![idle]);
        let mut out = Vec::new();
        system.handle(
            SessionState::Playing,
            &towers,
            &[target(2, 1, None), target(9, 1, None)],
            &mut out,
        );
        assert!(out.is_empty());
    }

    #[test]
    fn sap_impact_slows_and_poisons() {
        let mut system = system(0.0, 0.0);
        let mut out = Vec::new();
        system.resolve_impacts(&[impact(TowerKind::Sap, &[Passive::Acid], 3.0)], &mut out);
        let enemy = EnemyId::new(3);
        assert_eq!(
            out,
            vec![
                Command::DamageEnemy { enemy, amount: 3.0 },
                Command::PoisonEnemy {
                    enemy,
                    duration: 180,
                },
                Command::SlowEnemy {
                    enemy,
                    multiplier: 0.5,
                    duration: 120,
                },
            ]
        );
    }

    #[test]
    fn certain_root_immobilizes() {
        let mut system = system(0.0, 1.0);
        let mut out = Vec::new();
        system.resolve_impacts(
            &[impact(TowerKind::Sap, &[Passive::Root, Passive::StickySap], 3.0)],
            &mut out,
        );
        assert_eq!(
            out.last(),
            Some(&Command::SlowEnemy {
                enemy: EnemyId::new(3),
                multiplier: 0.0,
                duration: 180,
            })
        );
    }

    #[test]
    fn rock_impact_orders_stun_execute_and_splash() {
        let mut system = system(0.0, 0.0);
        let mut out = Vec::new();
        let passives = [Passive::Concussion, Passive::Execute, Passive::Splash];
        system.resolve_impacts(&[impact(TowerKind::Rock, &passives, 40.0)], &mut out);
        let enemy = EnemyId::new(3);
        assert_eq!(
            out,
            vec![
                Command::DamageEnemy {
                    enemy,
                    amount: 40.0,
                },
                Command::SlowEnemy {
                    enemy,
                    multiplier: 0.0,
                    duration: 60,
                },
                Command::ExecuteEnemy {
                    enemy,
                    threshold: 0.2,
                },
                Command::SplashDamage {
                    center: Vec2::new(10.0, 10.0),
                    radius: 50.0,
                    amount: 20.0,
                    spared: enemy,
                },
            ]
        );
    }

    #[test]
    fn archer_impact_only_damages() {
        let mut system = system(0.0, 0.0);
        let mut out = Vec::new();
        let events = vec![
            Event::ProjectileDiscarded {
                projectile: ProjectileId::new(1),
            },
            impact(TowerKind::Archer, &[Passive::Sniper], 8.0),
        ];
        system.resolve_impacts(&events, &mut out);
        assert_eq!(
            out,
            vec![Command::DamageEnemy {
                enemy: EnemyId::new(3),
                amount: 8.0,
            }]
        );
    }

    #[test]
    fn identical_seeds_roll_identical_crits() {
        let towers =
            TowerView::from_snapshots(vec![tower(1, TowerKind::Archer, 1, &[Passive::Crit])]);
        let roll = |seed| {
            let mut system =
                TowerCombat::new(Config::new(seed, 0.5, 0.0)).expect("valid probabilities");
            let mut out = Vec::new();
            for _ in 0..32 {
                system.handle(SessionState::Playing, &towers, &[target(1, 1, None)], &mut out);
            }
            out
        };
        assert_eq!(roll(11), roll(11));
    }
}
