#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Explicit play session that owns the world and drives every system once per tick.

mod campaign;

use monochrome_td_core::{
    rules, ActionError, BuildSpotId, Command, EnemyView, Event, Gold, LevelDefinition, LevelId,
    Passive, ProjectileView, RunSnapshot, SessionState, TowerId, TowerKind, TowerLevel,
    TowerTarget, TowerView, WaveId, WavePhase,
};
use monochrome_td_system_enemy_abilities::EnemyAbilities;
use monochrome_td_system_tower_combat::{Config as CombatConfig, ConfigError, TowerCombat};
use monochrome_td_system_tower_targeting::TowerTargeting;
use monochrome_td_system_wave_director::WaveDirector;
use monochrome_td_world::{self as world, query, World};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, trace};

pub use campaign::{Campaign, CampaignError};

/// Tunables of a session that are not part of the level data.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Seed of the random stream used for critical strikes and roots.
    pub rng_seed: u64,
    /// Probability that a critical-strike tower triples its damage.
    pub crit_chance: f64,
    /// Probability that a rooting sap projectile immobilizes its target.
    pub root_chance: f64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            rng_seed: 0x6d6f_6e6f,
            crit_chance: rules::DEFAULT_CRIT_CHANCE,
            root_chance: rules::DEFAULT_ROOT_CHANCE,
        }
    }
}

/// Errors raised while constructing a session.
#[derive(Debug, Error)]
pub enum SessionError {
    /// The combat probabilities are invalid.
    #[error("invalid session configuration")]
    Config(#[from] ConfigError),
}

/// Final outcome of a session, produced when the session is torn down.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct SessionSummary {
    /// Level that was played.
    pub level: LevelId,
    /// State the session ended in.
    pub outcome: SessionState,
    /// Number of waves cleared.
    pub waves_cleared: u32,
    /// Lives left.
    pub lives: u32,
    /// Gold left.
    pub gold: Gold,
    /// Ticks simulated.
    pub ticks: u64,
}

/// One play-through of a level.
///
/// Player actions are applied immediately and their events are delivered
/// with the next [`Session::tick`].
#[derive(Debug)]
pub struct Session {
    world: World,
    director: WaveDirector,
    targeting: TowerTargeting,
    combat: TowerCombat,
    abilities: EnemyAbilities,
    pending: Vec<Event>,
    targets: Vec<TowerTarget>,
    commands: Vec<Command>,
}

impl Session {
    /// Starts a fresh session on the provided level.
    pub fn new(level: LevelDefinition, config: SessionConfig) -> Result<Self, SessionError> {
        let combat = TowerCombat::new(CombatConfig::new(
            config.rng_seed,
            config.crit_chance,
            config.root_chance,
        ))?;
        info!(level = level.id().get(), name = level.name(), "session started");

        Ok(Self {
            world: World::new(level),
            director: WaveDirector::new(),
            targeting: TowerTargeting::new(),
            combat,
            abilities: EnemyAbilities::new(),
            pending: Vec::new(),
            targets: Vec::new(),
            commands: Vec::new(),
        })
    }

    /// Level being played.
    #[must_use]
    pub fn level(&self) -> &LevelDefinition {
        query::level(&self.world)
    }

    /// Lifecycle state of the session.
    #[must_use]
    pub fn state(&self) -> SessionState {
        query::state(&self.world)
    }

    /// Phase of the wave director.
    #[must_use]
    pub fn wave_phase(&self) -> WavePhase {
        self.director.phase()
    }

    /// Captures the scalar state presenters display.
    #[must_use]
    pub fn snapshot(&self) -> RunSnapshot {
        RunSnapshot {
            level: self.level().id(),
            state: self.state(),
            phase: self.director.phase(),
            lives: query::lives(&self.world),
            gold: query::gold(&self.world),
            wave: query::current_wave(&self.world),
            wave_total: wave_total(self.level()),
            wave_active: query::wave_active(&self.world),
            wave_clear_display: query::wave_clear_display(&self.world),
            tick: query::tick(&self.world),
        }
    }

    /// Enemies on the field.
    #[must_use]
    pub fn enemies(&self) -> EnemyView {
        query::enemy_view(&self.world)
    }

    /// Towers standing on build spots.
    #[must_use]
    pub fn towers(&self) -> TowerView {
        query::tower_view(&self.world)
    }

    /// Projectiles in flight.
    #[must_use]
    pub fn projectiles(&self) -> ProjectileView {
        query::projectile_view(&self.world)
    }

    /// Starts the next wave.
    pub fn start_wave(&mut self) -> Result<WaveId, ActionError> {
        self.act(Command::StartWave, |event| match event {
            Event::WaveStarted { wave, .. } => Some(*wave),
            _ => None,
        })
    }

    /// Builds a tower of `kind` on the build spot.
    pub fn build_tower(&mut self, spot: BuildSpotId, kind: TowerKind) -> Result<TowerId, ActionError> {
        self.act(Command::BuildTower { spot, kind }, |event| match event {
            Event::TowerBuilt { tower, .. } => Some(*tower),
            _ => None,
        })
    }

    /// Sells the tower, returning the refunded gold.
    pub fn sell_tower(&mut self, tower: TowerId) -> Result<Gold, ActionError> {
        self.act(Command::SellTower { tower }, |event| match event {
            Event::TowerSold { refund, .. } => Some(*refund),
            _ => None,
        })
    }

    /// Raises the tower by one level, returning the new level.
    pub fn upgrade_tower(&mut self, tower: TowerId) -> Result<TowerLevel, ActionError> {
        self.act(Command::UpgradeTower { tower }, |event| match event {
            Event::TowerUpgraded { level, .. } => Some(*level),
            _ => None,
        })
    }

    /// Buys a passive for the tower, returning the gold spent.
    pub fn buy_passive(&mut self, tower: TowerId, passive: Passive) -> Result<Gold, ActionError> {
        self.act(Command::BuyPassive { tower, passive }, |event| match event {
            Event::PassivePurchased { cost, .. } => Some(*cost),
            _ => None,
        })
    }

    /// Advances the simulation by one tick and returns every event it produced.
    ///
    /// Events caused by player actions since the previous tick come first.
    /// Once the session left the playing state no further simulation happens.
    pub fn tick(&mut self) -> Vec<Event> {
        let mut frame = std::mem::take(&mut self.pending);
        if self.state().is_playing() {
            let mark = frame.len();
            self.simulate(&mut frame);
            log_events(&frame[mark..]);
            trace!(
                tick = query::tick(&self.world),
                events = frame.len() - mark,
                enemies = query::enemy_count(&self.world),
                "frame simulated"
            );
        }
        frame
    }

    /// Tears the session down and reports how it went.
    #[must_use]
    pub fn end(self) -> SessionSummary {
        let snapshot = self.snapshot();
        let waves_cleared = if snapshot.state == SessionState::Victory {
            snapshot.wave_total
        } else {
            snapshot.wave.get()
        };
        let summary = SessionSummary {
            level: snapshot.level,
            outcome: snapshot.state,
            waves_cleared,
            lives: snapshot.lives,
            gold: snapshot.gold,
            ticks: snapshot.tick,
        };
        info!(
            level = summary.level.get(),
            outcome = ?summary.outcome,
            waves_cleared,
            "session closed"
        );
        summary
    }

    fn act<T>(
        &mut self,
        command: Command,
        accepted: impl Fn(&Event) -> Option<T>,
    ) -> Result<T, ActionError> {
        let mut events = Vec::new();
        world::apply(&mut self.world, command, &mut events);
        self.observe(&events);
        log_events(&events);

        let outcome = events.iter().find_map(|event| match event {
            Event::ActionRejected { reason } => Some(Err(*reason)),
            other => accepted(other).map(Ok),
        });
        self.pending.append(&mut events);
        // The world answers every intent with an acceptance or a rejection.
        outcome.unwrap_or(Err(ActionError::SessionInactive))
    }

    fn simulate(&mut self, frame: &mut Vec<Event>) {
        let mark = frame.len();
        world::apply(&mut self.world, Command::Tick, frame);

        self.commands.clear();
        self.director.handle(
            &frame[mark..],
            query::enemy_count(&self.world),
            &mut self.commands,
        );
        let mark = frame.len();
        self.flush(frame);
        self.observe(&frame[mark..]);
        if !self.state().is_playing() {
            return;
        }

        let state = self.state();
        let towers = query::tower_view(&self.world);
        self.targeting.handle(
            state,
            &towers,
            &query::enemy_view(&self.world),
            &mut self.targets,
        );
        self.combat
            .handle(state, &towers, &self.targets, &mut self.commands);
        self.flush(frame);

        for projectile in query::projectile_ids(&self.world) {
            let mark = frame.len();
            world::apply(
                &mut self.world,
                Command::AdvanceProjectile { projectile },
                frame,
            );
            self.combat.resolve_impacts(&frame[mark..], &mut self.commands);
            self.flush(frame);
        }

        world::apply(&mut self.world, Command::ChargeAbilities, frame);
        self.abilities.handle(
            query::state(&self.world),
            &query::enemy_view(&self.world),
            &query::tower_view(&self.world),
            &mut self.commands,
        );
        self.flush(frame);

        world::apply(&mut self.world, Command::SweepDefeated, frame);
        world::apply(&mut self.world, Command::AdvanceEnemies, frame);
    }

    fn flush(&mut self, frame: &mut Vec<Event>) {
        for command in self.commands.drain(..) {
            world::apply(&mut self.world, command, frame);
        }
    }

    fn observe(&mut self, events: &[Event]) {
        let mut commands = Vec::new();
        self.director
            .handle(events, query::enemy_count(&self.world), &mut commands);
        debug_assert!(commands.is_empty(), "director only paces on time events");
    }
}

fn wave_total(level: &LevelDefinition) -> u32 {
    u32::try_from(level.waves().len()).unwrap_or(u32::MAX)
}

fn log_events(events: &[Event]) {
    for event in events {
        match event {
            Event::WaveStarted { wave, spec } => info!(
                wave = wave.get() + 1,
                enemy = ?spec.enemy(),
                count = spec.count(),
                "wave started"
            ),
            Event::WaveCleared { wave, reward } => {
                info!(wave = wave.get() + 1, reward = reward.get(), "wave cleared");
            }
            Event::LevelCompleted { level } => info!(level = level.get(), "level completed"),
            Event::SessionEnded { outcome } => info!(outcome = ?outcome, "session ended"),
            Event::ActionRejected { reason } => debug!(%reason, "action rejected"),
            _ => {}
        }
    }
}
