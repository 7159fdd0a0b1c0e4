#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Monochrome TD.

mod enemies;
mod projectiles;
mod towers;

use std::sync::Arc;

use monochrome_td_core::{
    distance, rules, ActionError, BuildSpotId, Command, EnemyId, EnemyKind, Event, Gold,
    LevelDefinition, Passive, ProjectileEffects, ProjectileId, SessionState, TowerId, TowerKind,
    Vec2, WaveId,
};

use enemies::{Enemy, Progress};
use projectiles::{Flight, Projectile};
use towers::TowerRegistry;

/// Represents the authoritative state of one play-through of a level.
#[derive(Debug)]
pub struct World {
    level: LevelDefinition,
    path: Arc<[Vec2]>,
    state: SessionState,
    lives: u32,
    gold: Gold,
    wave: WaveId,
    wave_active: bool,
    wave_clear_display: u32,
    tick: u64,
    enemies: Vec<Enemy>,
    next_enemy_id: EnemyId,
    towers: TowerRegistry,
    projectiles: Vec<Projectile>,
    next_projectile_id: ProjectileId,
}

impl World {
    /// Creates a fresh world for the provided level with its starting purse and lives.
    #[must_use]
    pub fn new(level: LevelDefinition) -> Self {
        Self {
            path: level.shared_path(),
            state: SessionState::Playing,
            lives: level.start_lives(),
            gold: level.start_gold(),
            wave: WaveId::new(0),
            wave_active: false,
            wave_clear_display: 0,
            tick: 0,
            enemies: Vec::new(),
            next_enemy_id: EnemyId::new(0),
            towers: TowerRegistry::new(),
            projectiles: Vec::new(),
            next_projectile_id: ProjectileId::new(0),
            level,
        }
    }

    fn enemy_index(&self, enemy: EnemyId) -> Option<usize> {
        self.enemies
            .binary_search_by_key(&enemy, |candidate| candidate.id)
            .ok()
    }

    fn enemy_mut(&mut self, enemy: EnemyId) -> Option<&mut Enemy> {
        let index = self.enemy_index(enemy)?;
        self.enemies.get_mut(index)
    }

    fn charge(&mut self, cost: Gold) -> Result<(), ActionError> {
        self.gold = self
            .gold
            .checked_sub(cost)
            .ok_or(ActionError::InsufficientGold {
                required: cost,
                available: self.gold,
            })?;
        Ok(())
    }

    fn start_wave(&mut self, out_events: &mut Vec<Event>) -> Result<(), ActionError> {
        if self.wave_active {
            return Err(ActionError::WaveInProgress);
        }

        let spec = self
            .level
            .wave(self.wave)
            .ok_or(ActionError::NoWavesRemaining)?;
        self.wave_active = true;
        out_events.push(Event::WaveStarted {
            wave: self.wave,
            spec,
        });
        Ok(())
    }

    fn build_tower(
        &mut self,
        spot: BuildSpotId,
        kind: TowerKind,
        out_events: &mut Vec<Event>,
    ) -> Result<(), ActionError> {
        let position = self
            .level
            .build_spots()
            .get(spot.index())
            .copied()
            .ok_or(ActionError::UnknownBuildSpot(spot))?;

        if self.towers.occupant(spot).is_some() {
            return Err(ActionError::SpotOccupied(spot));
        }

        let cost = kind.cost();
        self.charge(cost)?;
        let tower = self.towers.insert(kind, spot, position);
        out_events.push(Event::TowerBuilt {
            tower,
            kind,
            spot,
            cost,
        });
        Ok(())
    }

    fn sell_tower(
        &mut self,
        tower: TowerId,
        out_events: &mut Vec<Event>,
    ) -> Result<(), ActionError> {
        let state = self
            .towers
            .remove(tower)
            .ok_or(ActionError::MissingTower(tower))?;
        let refund = state.kind.sell_value();
        self.gold = self.gold.saturating_add(refund);
        out_events.push(Event::TowerSold {
            tower,
            spot: state.spot,
            refund,
        });
        Ok(())
    }

    fn upgrade_tower(
        &mut self,
        tower: TowerId,
        out_events: &mut Vec<Event>,
    ) -> Result<(), ActionError> {
        let state = self
            .towers
            .get(tower)
            .ok_or(ActionError::MissingTower(tower))?;
        let level = state.level.next().ok_or(ActionError::MaxLevel(tower))?;
        let cost = state
            .kind
            .upgrade_cost(state.level)
            .ok_or(ActionError::MaxLevel(tower))?;

        self.charge(cost)?;
        if let Some(state) = self.towers.get_mut(tower) {
            state.level = level;
        }
        out_events.push(Event::TowerUpgraded { tower, level, cost });
        Ok(())
    }

    fn buy_passive(
        &mut self,
        tower: TowerId,
        passive: Passive,
        out_events: &mut Vec<Event>,
    ) -> Result<(), ActionError> {
        let state = self
            .towers
            .get(tower)
            .ok_or(ActionError::MissingTower(tower))?;
        if !state.kind.offers(passive) {
            return Err(ActionError::PassiveUnavailable {
                kind: state.kind,
                passive,
            });
        }
        if state.passives.contains(passive) {
            return Err(ActionError::PassiveOwned { tower, passive });
        }

        let cost = passive.cost();
        self.charge(cost)?;
        if let Some(state) = self.towers.get_mut(tower) {
            let _ = state.passives.insert(passive);
        }
        out_events.push(Event::PassivePurchased {
            tower,
            passive,
            cost,
        });
        Ok(())
    }

    fn advance_clock(&mut self, out_events: &mut Vec<Event>) {
        self.tick = self.tick.saturating_add(1);
        out_events.push(Event::TimeAdvanced { tick: self.tick });
        for tower in self.towers.iter_mut() {
            tower.tick();
        }
    }

    fn spawn_enemy(&mut self, kind: EnemyKind, wave: WaveId, out_events: &mut Vec<Event>) {
        let id = self.next_enemy_id;
        self.next_enemy_id = EnemyId::new(id.get().saturating_add(1));
        let enemy = Enemy::spawn(id, kind, wave, &self.path);
        out_events.push(Event::EnemySpawned {
            enemy: id,
            kind,
            position: enemy.position,
            hp: enemy.hp,
        });
        self.enemies.push(enemy);
    }

    fn complete_wave(&mut self, wave: WaveId, out_events: &mut Vec<Event>) {
        if !self.wave_active || wave != self.wave || !self.enemies.is_empty() {
            return;
        }

        let reward = wave.reward();
        self.gold = self.gold.saturating_add(reward);
        self.wave_active = false;
        out_events.push(Event::WaveCleared { wave, reward });

        if wave.index() + 1 >= self.level.waves().len() {
            self.state = SessionState::Victory;
            out_events.push(Event::LevelCompleted {
                level: self.level.id(),
            });
            out_events.push(Event::SessionEnded {
                outcome: SessionState::Victory,
            });
        } else {
            self.wave = wave.next();
            self.wave_clear_display = rules::WAVE_CLEAR_DISPLAY_DURATION;
        }
    }

    fn fire_projectile(
        &mut self,
        tower: TowerId,
        target: EnemyId,
        damage: f32,
        out_events: &mut Vec<Event>,
    ) {
        if self.enemy_index(target).is_none() {
            return;
        }
        let Some(state) = self.towers.get_mut(tower) else {
            return;
        };

        let id = self.next_projectile_id;
        self.next_projectile_id = ProjectileId::new(id.get().saturating_add(1));
        self.projectiles.push(Projectile {
            id,
            tower,
            kind: state.kind,
            position: state.position,
            target,
            damage,
            effects: ProjectileEffects::derive(state.kind, state.passives),
        });
        state.fired();
        out_events.push(Event::ProjectileFired {
            projectile: id,
            tower,
            target,
            damage,
        });
    }

    fn advance_projectile(&mut self, projectile: ProjectileId, out_events: &mut Vec<Event>) {
        let Ok(index) = self
            .projectiles
            .binary_search_by_key(&projectile, |candidate| candidate.id)
        else {
            return;
        };

        let target = self.projectiles[index].target;
        let target_position = self
            .enemy_index(target)
            .map(|enemy| &self.enemies[enemy])
            .filter(|enemy| !enemy.is_defeated())
            .map(|enemy| enemy.position);

        let Some(point) = target_position else {
            let _ = self.projectiles.remove(index);
            out_events.push(Event::ProjectileDiscarded { projectile });
            return;
        };

        if self.projectiles[index].advance(point) == Flight::Impact {
            let spent = self.projectiles.remove(index);
            out_events.push(Event::ProjectileImpacted {
                projectile,
                kind: spent.kind,
                target,
                damage: spent.damage,
                effects: spent.effects,
                point,
            });
        }
    }

    fn splash(
        &mut self,
        center: Vec2,
        radius: f32,
        amount: f32,
        spared: EnemyId,
        out_events: &mut Vec<Event>,
    ) {
        for enemy in self
            .enemies
            .iter_mut()
            .filter(|enemy| enemy.id != spared && distance(center, enemy.position) < radius)
        {
            enemy.damage(amount);
            out_events.push(Event::EnemyDamaged {
                enemy: enemy.id,
                amount,
                hp: enemy.hp,
            });
        }
    }

    fn disable_tower(
        &mut self,
        tower: TowerId,
        caster: EnemyId,
        duration: u32,
        out_events: &mut Vec<Event>,
    ) {
        let Some(state) = self.towers.get_mut(tower) else {
            return;
        };
        if state.is_disabled() {
            return;
        }

        state.disable(duration);
        if let Some(enemy) = self.enemy_mut(caster) {
            enemy.reset_ability();
        }
        out_events.push(Event::TowerDisabled {
            tower,
            caster,
            duration,
        });
    }

    fn sweep_defeated(&mut self, out_events: &mut Vec<Event>) {
        let gold = &mut self.gold;
        self.enemies.retain(|enemy| {
            if !enemy.is_defeated() {
                return true;
            }
            let bounty = enemy.kind.bounty();
            *gold = gold.saturating_add(bounty);
            out_events.push(Event::EnemyDefeated {
                enemy: enemy.id,
                kind: enemy.kind,
                bounty,
            });
            false
        });
    }

    /// Moves every enemy and closes the frame's wave-clear countdown.
    fn advance_enemies(&mut self, out_events: &mut Vec<Event>) {
        self.wave_clear_display = self.wave_clear_display.saturating_sub(1);
        let path = Arc::clone(&self.path);
        let lives = &mut self.lives;
        self.enemies.retain_mut(|enemy| match enemy.advance(&path) {
            Progress::EnRoute => true,
            Progress::ReachedEnd => {
                *lives = lives.saturating_sub(1);
                out_events.push(Event::EnemyEscaped {
                    enemy: enemy.id,
                    lives: *lives,
                });
                false
            }
        });

        if self.lives == 0 {
            self.state = SessionState::GameOver;
            out_events.push(Event::SessionEnded {
                outcome: SessionState::GameOver,
            });
        }
    }
}

/// Applies the provided command to the world, mutating state deterministically.
///
/// Once the session left the playing state every command is ignored, and
/// player intents are answered with [`ActionError::SessionInactive`].
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    if !world.state.is_playing() {
        if is_player_intent(&command) {
            out_events.push(Event::ActionRejected {
                reason: ActionError::SessionInactive,
            });
        }
        return;
    }

    let outcome = match command {
        Command::StartWave => world.start_wave(out_events),
        Command::BuildTower { spot, kind } => world.build_tower(spot, kind, out_events),
        Command::SellTower { tower } => world.sell_tower(tower, out_events),
        Command::UpgradeTower { tower } => world.upgrade_tower(tower, out_events),
        Command::BuyPassive { tower, passive } => world.buy_passive(tower, passive, out_events),
        Command::Tick => {
            world.advance_clock(out_events);
            Ok(())
        }
        Command::SpawnEnemy { kind, wave } => {
            world.spawn_enemy(kind, wave, out_events);
            Ok(())
        }
        Command::CompleteWave { wave } => {
            world.complete_wave(wave, out_events);
            Ok(())
        }
        Command::FireProjectile {
            tower,
            target,
            damage,
        } => {
            world.fire_projectile(tower, target, damage, out_events);
            Ok(())
        }
        Command::AdvanceProjectile { projectile } => {
            world.advance_projectile(projectile, out_events);
            Ok(())
        }
        Command::DamageEnemy { enemy, amount } => {
            if let Some(state) = world.enemy_mut(enemy) {
                state.damage(amount);
                out_events.push(Event::EnemyDamaged {
                    enemy,
                    amount,
                    hp: state.hp,
                });
            }
            Ok(())
        }
        Command::SlowEnemy {
            enemy,
            multiplier,
            duration,
        } => {
            if let Some(state) = world.enemy_mut(enemy) {
                state.slow(multiplier, duration);
                out_events.push(Event::EnemySlowed {
                    enemy,
                    multiplier,
                    duration,
                });
            }
            Ok(())
        }
        Command::PoisonEnemy { enemy, duration } => {
            if let Some(state) = world.enemy_mut(enemy) {
                state.poison(duration);
                out_events.push(Event::EnemyPoisoned { enemy, duration });
            }
            Ok(())
        }
        Command::ExecuteEnemy { enemy, threshold } => {
            if world
                .enemy_mut(enemy)
                .is_some_and(|state| state.execute(threshold))
            {
                out_events.push(Event::EnemyExecuted { enemy });
            }
            Ok(())
        }
        Command::SplashDamage {
            center,
            radius,
            amount,
            spared,
        } => {
            world.splash(center, radius, amount, spared, out_events);
            Ok(())
        }
        Command::ChargeAbilities => {
            for enemy in &mut world.enemies {
                enemy.charge_ability();
            }
            Ok(())
        }
        Command::DisableTower {
            tower,
            caster,
            duration,
        } => {
            world.disable_tower(tower, caster, duration, out_events);
            Ok(())
        }
        Command::SweepDefeated => {
            world.sweep_defeated(out_events);
            Ok(())
        }
        Command::AdvanceEnemies => {
            world.advance_enemies(out_events);
            Ok(())
        }
    };

    if let Err(reason) = outcome {
        out_events.push(Event::ActionRejected { reason });
    }
}

fn is_player_intent(command: &Command) -> bool {
    matches!(
        command,
        Command::StartWave
            | Command::BuildTower { .. }
            | Command::SellTower { .. }
            | Command::UpgradeTower { .. }
            | Command::BuyPassive { .. }
    )
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use monochrome_td_core::{
        BuildSpotId, EnemyView, Gold, LevelDefinition, ProjectileId, ProjectileView,
        SessionState, TowerId, TowerView, WaveId,
    };

    use super::World;

    /// Level the world was created for.
    #[must_use]
    pub fn level(world: &World) -> &LevelDefinition {
        &world.level
    }

    /// Lifecycle state of the play-through.
    #[must_use]
    pub fn state(world: &World) -> SessionState {
        world.state
    }

    /// Lives left.
    #[must_use]
    pub fn lives(world: &World) -> u32 {
        world.lives
    }

    /// Gold owned by the player.
    #[must_use]
    pub fn gold(world: &World) -> Gold {
        world.gold
    }

    /// Wave that is running, or the next wave to start when idle.
    #[must_use]
    pub fn current_wave(world: &World) -> WaveId {
        world.wave
    }

    /// Reports whether a wave is running.
    #[must_use]
    pub fn wave_active(world: &World) -> bool {
        world.wave_active
    }

    /// Ticks the "wave cleared" notice stays visible.
    #[must_use]
    pub fn wave_clear_display(world: &World) -> u32 {
        world.wave_clear_display
    }

    /// Number of ticks simulated so far.
    #[must_use]
    pub fn tick(world: &World) -> u64 {
        world.tick
    }

    /// Number of enemies currently on the field, defeated or not.
    #[must_use]
    pub fn enemy_count(world: &World) -> usize {
        world.enemies.len()
    }

    /// Tower standing on the provided build spot, if any.
    #[must_use]
    pub fn tower_at(world: &World, spot: BuildSpotId) -> Option<TowerId> {
        world.towers.occupant(spot)
    }

    /// Identifiers of the projectiles in flight, in firing order.
    #[must_use]
    pub fn projectile_ids(world: &World) -> Vec<ProjectileId> {
        world
            .projectiles
            .iter()
            .map(|projectile| projectile.id)
            .collect()
    }

    /// Captures a read-only view of the enemies on the field.
    #[must_use]
    pub fn enemy_view(world: &World) -> EnemyView {
        EnemyView::from_snapshots(world.enemies.iter().map(|enemy| enemy.snapshot()).collect())
    }

    /// Captures a read-only view of the towers.
    #[must_use]
    pub fn tower_view(world: &World) -> TowerView {
        TowerView::from_snapshots(world.towers.iter().map(|tower| tower.snapshot()).collect())
    }

    /// Captures a read-only view of the projectiles in flight.
    #[must_use]
    pub fn projectile_view(world: &World) -> ProjectileView {
        ProjectileView::from_snapshots(
            world
                .projectiles
                .iter()
                .map(|projectile| projectile.snapshot())
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use monochrome_td_core::{LevelId, TowerLevel, WaveSpec};

    fn level(waves: Vec<WaveSpec>) -> LevelDefinition {
        LevelDefinition::new(
            LevelId::new(9),
            "Test Strip",
            Gold::new(250),
            3,
            vec![Vec2::new(0.0, 0.0), Vec2::new(40.0, 0.0)],
            vec![Vec2::new(20.0, 30.0), Vec2::new(200.0, 200.0)],
            waves,
        )
        .expect("valid level")
    }

    fn world() -> World {
        World::new(level(vec![
            WaveSpec::new(EnemyKind::Normal, 2, 10, 0),
            WaveSpec::new(EnemyKind::Tank, 1, 10, 0),
        ]))
    }

    fn run(world: &mut World, command: Command) -> Vec<Event> {
        let mut events = Vec::new();
        apply(world, command, &mut events);
        events
    }

    fn rejection(events: &[Event]) -> Option<ActionError> {
        events.iter().find_map(|event| match event {
            Event::ActionRejected { reason } => Some(*reason),
            _ => None,
        })
    }

    #[test]
    fn building_charges_gold_and_occupies_spot() {
        let mut world = world();
        let spot = BuildSpotId::new(0);
        let events = run(
            &mut world,
            Command::BuildTower {
                spot,
                kind: TowerKind::Archer,
            },
        );

        assert_eq!(
            events,
            vec![Event::TowerBuilt {
                tower: TowerId::new(0),
                kind: TowerKind::Archer,
                spot,
                cost: Gold::new(70),
            }]
        );
        assert_eq!(query::gold(&world), Gold::new(180));
        assert_eq!(query::tower_at(&world, spot), Some(TowerId::new(0)));

        let events = run(
            &mut world,
            Command::BuildTower {
                spot,
                kind: TowerKind::Rock,
            },
        );
        assert_eq!(rejection(&events), Some(ActionError::SpotOccupied(spot)));
        assert_eq!(query::gold(&world), Gold::new(180));
    }

    #[test]
    fn unaffordable_and_unknown_builds_are_rejected() {
        let mut world = world();
        let events = run(
            &mut world,
            Command::BuildTower {
                spot: BuildSpotId::new(7),
                kind: TowerKind::Archer,
            },
        );
        assert_eq!(
            rejection(&events),
            Some(ActionError::UnknownBuildSpot(BuildSpotId::new(7)))
        );

        let _ = run(
            &mut world,
            Command::BuildTower {
                spot: BuildSpotId::new(0),
                kind: TowerKind::Rock,
            },
        );
        let events = run(
            &mut world,
            Command::BuildTower {
                spot: BuildSpotId::new(1),
                kind: TowerKind::Rock,
            },
        );
        assert_eq!(
            rejection(&events),
            Some(ActionError::InsufficientGold {
                required: Gold::new(150),
                available: Gold::new(100),
            })
        );
        assert_eq!(query::tower_view(&world).len(), 1);
    }

    #[test]
    fn upgrades_and_passives_follow_the_catalog() {
        let mut world = world();
        let _ = run(
            &mut world,
            Command::BuildTower {
                spot: BuildSpotId::new(0),
                kind: TowerKind::Archer,
            },
        );
        let tower = TowerId::new(0);

        let events = run(&mut world, Command::UpgradeTower { tower });
        assert_eq!(
            events,
            vec![Event::TowerUpgraded {
                tower,
                level: TowerLevel::new(2).expect("valid level"),
                cost: Gold::new(105),
            }]
        );
        assert_eq!(query::gold(&world), Gold::new(75));

        let events = run(
            &mut world,
            Command::BuyPassive {
                tower,
                passive: Passive::Acid,
            },
        );
        assert_eq!(
            rejection(&events),
            Some(ActionError::PassiveUnavailable {
                kind: TowerKind::Archer,
                passive: Passive::Acid,
            })
        );

        world.gold = Gold::new(500);
        let _ = run(
            &mut world,
            Command::BuyPassive {
                tower,
                passive: Passive::Sniper,
            },
        );
        let events = run(
            &mut world,
            Command::BuyPassive {
                tower,
                passive: Passive::Sniper,
            },
        );
        assert_eq!(
            rejection(&events),
            Some(ActionError::PassiveOwned {
                tower,
                passive: Passive::Sniper,
            })
        );
        assert_eq!(query::gold(&world), Gold::new(400));
        let view = query::tower_view(&world);
        assert!(view.get(tower).is_some_and(|tower| tower.has_upgrade(Passive::Sniper)));
    }

    #[test]
    fn max_level_towers_cannot_upgrade() {
        let mut world = world();
        world.gold = Gold::new(5_000);
        let _ = run(
            &mut world,
            Command::BuildTower {
                spot: BuildSpotId::new(0),
                kind: TowerKind::Sap,
            },
        );
        let tower = TowerId::new(0);
        for _ in 0..3 {
            let events = run(&mut world, Command::UpgradeTower { tower });
            assert_eq!(rejection(&events), None);
        }
        let gold = query::gold(&world);
        let events = run(&mut world, Command::UpgradeTower { tower });
        assert_eq!(rejection(&events), Some(ActionError::MaxLevel(tower)));
        assert_eq!(query::gold(&world), gold);
    }

    #[test]
    fn selling_refunds_half_and_frees_the_spot() {
        let mut world = world();
        let spot = BuildSpotId::new(1);
        let _ = run(
            &mut world,
            Command::BuildTower {
                spot,
                kind: TowerKind::Sap,
            },
        );
        let tower = TowerId::new(0);
        let events = run(&mut world, Command::SellTower { tower });
        assert_eq!(
            events,
            vec![Event::TowerSold {
                tower,
                spot,
                refund: Gold::new(50),
            }]
        );
        assert_eq!(query::gold(&world), Gold::new(200));
        assert_eq!(query::tower_at(&world, spot), None);

        let events = run(&mut world, Command::SellTower { tower });
        assert_eq!(rejection(&events), Some(ActionError::MissingTower(tower)));
    }

    #[test]
    fn second_wave_start_is_rejected_while_active() {
        let mut world = world();
        let events = run(&mut world, Command::StartWave);
        assert!(matches!(events.as_slice(), [Event::WaveStarted { .. }]));
        let events = run(&mut world, Command::StartWave);
        assert_eq!(rejection(&events), Some(ActionError::WaveInProgress));
    }

    #[test]
    fn wave_completion_waits_for_an_empty_field() {
        let mut world = world();
        let _ = run(&mut world, Command::StartWave);
        let _ = run(
            &mut world,
            Command::SpawnEnemy {
                kind: EnemyKind::Normal,
                wave: WaveId::new(0),
            },
        );
        let events = run(
            &mut world,
            Command::CompleteWave {
                wave: WaveId::new(0),
            },
        );
        assert!(events.is_empty());

        world.enemies.clear();
        let events = run(
            &mut world,
            Command::CompleteWave {
                wave: WaveId::new(0),
            },
        );
        assert_eq!(
            events,
            vec![Event::WaveCleared {
                wave: WaveId::new(0),
                reward: Gold::new(100),
            }]
        );
        assert_eq!(query::gold(&world), Gold::new(350));
        assert_eq!(query::current_wave(&world), WaveId::new(1));
        assert_eq!(query::wave_clear_display(&world), 180);
        assert!(!query::wave_active(&world));

        let _ = run(&mut world, Command::AdvanceEnemies);
        assert_eq!(query::wave_clear_display(&world), 179);
        let _ = run(&mut world, Command::Tick);
        assert_eq!(query::wave_clear_display(&world), 179);
    }

    #[test]
    fn clearing_the_final_wave_wins_the_level() {
        let mut world = World::new(level(vec![WaveSpec::new(EnemyKind::Fast, 1, 5, 0)]));
        let _ = run(&mut world, Command::StartWave);
        let events = run(
            &mut world,
            Command::CompleteWave {
                wave: WaveId::new(0),
            },
        );
        assert_eq!(
            events,
            vec![
                Event::WaveCleared {
                    wave: WaveId::new(0),
                    reward: Gold::new(100),
                },
                Event::LevelCompleted {
                    level: LevelId::new(9),
                },
                Event::SessionEnded {
                    outcome: SessionState::Victory,
                },
            ]
        );

        let events = run(&mut world, Command::StartWave);
        assert_eq!(rejection(&events), Some(ActionError::SessionInactive));
        assert!(run(&mut world, Command::Tick).is_empty());
    }

    #[test]
    fn escapes_cost_lives_until_game_over() {
        let mut world = world();
        for _ in 0..4 {
            let _ = run(
                &mut world,
                Command::SpawnEnemy {
                    kind: EnemyKind::Normal,
                    wave: WaveId::new(0),
                },
            );
        }
        for enemy in &mut world.enemies {
            enemy.position = Vec2::new(39.5, 0.0);
        }

        let events = run(&mut world, Command::AdvanceEnemies);
        let escaped = events
            .iter()
            .filter(|event| matches!(event, Event::EnemyEscaped { .. }))
            .count();
        assert_eq!(escaped, 4);
        assert_eq!(query::lives(&world), 0);
        assert_eq!(query::state(&world), SessionState::GameOver);
        assert_eq!(
            events.last(),
            Some(&Event::SessionEnded {
                outcome: SessionState::GameOver,
            })
        );
    }

    #[test]
    fn defeated_enemies_pay_their_bounty_once() {
        let mut world = world();
        let _ = run(
            &mut world,
            Command::SpawnEnemy {
                kind: EnemyKind::Tank,
                wave: WaveId::new(0),
            },
        );
        let enemy = EnemyId::new(0);
        let _ = run(
            &mut world,
            Command::DamageEnemy {
                enemy,
                amount: 500.0,
            },
        );

        let events = run(&mut world, Command::SweepDefeated);
        assert_eq!(
            events,
            vec![Event::EnemyDefeated {
                enemy,
                kind: EnemyKind::Tank,
                bounty: Gold::new(15),
            }]
        );
        assert!(run(&mut world, Command::SweepDefeated).is_empty());
        assert_eq!(query::gold(&world), Gold::new(265));
    }

    #[test]
    fn projectile_without_live_target_is_discarded() {
        let mut world = world();
        let _ = run(
            &mut world,
            Command::BuildTower {
                spot: BuildSpotId::new(1),
                kind: TowerKind::Archer,
            },
        );
        let _ = run(
            &mut world,
            Command::SpawnEnemy {
                kind: EnemyKind::Normal,
                wave: WaveId::new(0),
            },
        );
        let _ = run(
            &mut world,
            Command::FireProjectile {
                tower: TowerId::new(0),
                target: EnemyId::new(0),
                damage: 8.0,
            },
        );
        let _ = run(
            &mut world,
            Command::DamageEnemy {
                enemy: EnemyId::new(0),
                amount: 100.0,
            },
        );

        let projectile = ProjectileId::new(0);
        let events = run(&mut world, Command::AdvanceProjectile { projectile });
        assert_eq!(events, vec![Event::ProjectileDiscarded { projectile }]);
        assert!(query::projectile_view(&world).is_empty());
    }

    #[test]
    fn splash_spares_the_direct_target_and_far_enemies() {
        let mut world = world();
        for _ in 0..3 {
            let _ = run(
                &mut world,
                Command::SpawnEnemy {
                    kind: EnemyKind::Normal,
                    wave: WaveId::new(0),
                },
            );
        }
        world.enemies[2].position = Vec2::new(0.0, 50.0);

        let events = run(
            &mut world,
            Command::SplashDamage {
                center: Vec2::ZERO,
                radius: rules::SPLASH_RADIUS,
                amount: 20.0,
                spared: EnemyId::new(0),
            },
        );
        assert_eq!(
            events,
            vec![Event::EnemyDamaged {
                enemy: EnemyId::new(1),
                amount: 20.0,
                hp: 10.0,
            }]
        );
    }

    #[test]
    fn disabling_resets_the_caster_and_ignores_disabled_towers() {
        let mut world = world();
        let _ = run(
            &mut world,
            Command::BuildTower {
                spot: BuildSpotId::new(0),
                kind: TowerKind::Rock,
            },
        );
        let _ = run(
            &mut world,
            Command::SpawnEnemy {
                kind: EnemyKind::Shaman,
                wave: WaveId::new(0),
            },
        );
        let disable = Command::DisableTower {
            tower: TowerId::new(0),
            caster: EnemyId::new(0),
            duration: rules::FIELD_ABILITY_DISABLE_DURATION,
        };

        assert_eq!(run(&mut world, disable.clone()).len(), 1);
        assert!(run(&mut world, disable).is_empty());
        let view = query::tower_view(&world);
        assert!(view.get(TowerId::new(0)).is_some_and(|tower| tower.is_disabled()));
    }
}
