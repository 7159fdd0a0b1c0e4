//! Validated level data consumed by the simulation.

use std::sync::Arc;

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{EnemyKind, Gold, WaveId};

/// Identifier of a level within a campaign.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LevelId(u32);

impl LevelId {
    /// Creates a new level identifier with the provided numeric value.
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

/// Static description of a single wave.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct WaveSpec {
    enemy: EnemyKind,
    count: u32,
    interval: u32,
    delay: u32,
}

impl WaveSpec {
    /// Creates a wave of `count` enemies spawned every `interval` ticks after `delay` ticks.
    #[must_use]
    pub const fn new(enemy: EnemyKind, count: u32, interval: u32, delay: u32) -> Self {
        Self {
            enemy,
            count,
            interval,
            delay,
        }
    }

    /// Kind of every enemy spawned by the wave.
    #[must_use]
    pub const fn enemy(&self) -> EnemyKind {
        self.enemy
    }

    /// Total number of enemies spawned by the wave.
    #[must_use]
    pub const fn count(&self) -> u32 {
        self.count
    }

    /// Ticks between consecutive spawns.
    #[must_use]
    pub const fn interval(&self) -> u32 {
        self.interval
    }

    /// Ticks waited after the wave starts before the first spawn.
    #[must_use]
    pub const fn delay(&self) -> u32 {
        self.delay
    }
}

/// Reasons level data may be rejected at construction time.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum LevelError {
    /// Enemies need at least a start and an end waypoint.
    #[error("path must contain at least two waypoints, found {points}")]
    PathTooShort {
        /// Number of waypoints supplied.
        points: usize,
    },
    /// A waypoint or build spot is NaN or infinite.
    #[error("level contains a non-finite coordinate")]
    NonFiniteCoordinate,
    /// The level defines no waves, so it could never be won.
    #[error("level must define at least one wave")]
    NoWaves,
    /// A wave would spawn nothing.
    #[error("wave {} spawns no enemies", .wave.get() + 1)]
    EmptyWave {
        /// Wave that spawns nothing.
        wave: WaveId,
    },
    /// A wave's spawn interval is zero.
    #[error("wave {} has a zero spawn interval", .wave.get() + 1)]
    ZeroSpawnInterval {
        /// Wave with the invalid interval.
        wave: WaveId,
    },
    /// The player would start the level already defeated.
    #[error("level must start with at least one life")]
    NoLives,
}

/// Complete, validated description of a playable level.
#[derive(Clone, Debug, PartialEq)]
pub struct LevelDefinition {
    id: LevelId,
    name: String,
    start_gold: Gold,
    start_lives: u32,
    path: Arc<[Vec2]>,
    build_spots: Vec<Vec2>,
    waves: Vec<WaveSpec>,
}

impl LevelDefinition {
    /// Validates and assembles a level definition.
    pub fn new(
        id: LevelId,
        name: impl Into<String>,
        start_gold: Gold,
        start_lives: u32,
        path: Vec<Vec2>,
        build_spots: Vec<Vec2>,
        waves: Vec<WaveSpec>,
    ) -> Result<Self, LevelError> {
        if path.len() < 2 {
            return Err(LevelError::PathTooShort { points: path.len() });
        }

        if path
            .iter()
            .chain(build_spots.iter())
            .any(|point| !point.is_finite())
        {
            return Err(LevelError::NonFiniteCoordinate);
        }

        if waves.is_empty() {
            return Err(LevelError::NoWaves);
        }

        for (index, wave) in waves.iter().enumerate() {
            let id = WaveId::new(index as u32);
            if wave.count() == 0 {
                return Err(LevelError::EmptyWave { wave: id });
            }
            if wave.interval() == 0 {
                return Err(LevelError::ZeroSpawnInterval { wave: id });
            }
        }

        if start_lives == 0 {
            return Err(LevelError::NoLives);
        }

        Ok(Self {
            id,
            name: name.into(),
            start_gold,
            start_lives,
            path: path.into(),
            build_spots,
            waves,
        })
    }

    /// Identifier of the level.
    #[must_use]
    pub const fn id(&self) -> LevelId {
        self.id
    }

    /// Display name of the level.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Gold available when the level starts.
    #[must_use]
    pub const fn start_gold(&self) -> Gold {
        self.start_gold
    }

    /// Lives available when the level starts.
    #[must_use]
    pub const fn start_lives(&self) -> u32 {
        self.start_lives
    }

    /// Ordered waypoints enemies follow; always at least two.
    #[must_use]
    pub fn path(&self) -> &[Vec2] {
        &self.path
    }

    /// Shared handle to the path for entities that follow it.
    #[must_use]
    pub fn shared_path(&self) -> Arc<[Vec2]> {
        Arc::clone(&self.path)
    }

    /// Locations where towers may be built.
    #[must_use]
    pub fn build_spots(&self) -> &[Vec2] {
        &self.build_spots
    }

    /// Ordered waves of the level.
    #[must_use]
    pub fn waves(&self) -> &[WaveSpec] {
        &self.waves
    }

    /// Looks up a wave by identifier.
    #[must_use]
    pub fn wave(&self, wave: WaveId) -> Option<WaveSpec> {
        self.waves.get(wave.index()).copied()
    }
}
