//! TOML level manifests for custom maps.

use std::{fs, path::Path};

use anyhow::{bail, Context, Result};
use monochrome_td_core::{EnemyKind, Gold, LevelDefinition, LevelId, Vec2, WaveSpec};
use monochrome_td_system_wave_generation::generate_waves;

/// Identifier assigned to levels loaded from a manifest without an explicit id.
const CUSTOM_LEVEL_ID: u32 = 100;

#[derive(Debug, serde::Deserialize)]
#[serde(deny_unknown_fields)]
struct Manifest {
    id: Option<u32>,
    name: String,
    start_gold: u32,
    lives: u32,
    path: Vec<[f32; 2]>,
    build_spots: Vec<[f32; 2]>,
    difficulty: Option<f64>,
    #[serde(default)]
    waves: Vec<WaveEntry>,
}

#[derive(Debug, serde::Deserialize)]
#[serde(deny_unknown_fields)]
struct WaveEntry {
    enemy: EnemyKind,
    count: u32,
    interval: u32,
    #[serde(default)]
    delay: u32,
}

/// Reads and validates the level manifest stored at `path`.
pub(crate) fn load(path: &Path) -> Result<LevelDefinition> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read level manifest at {}", path.display()))?;
    parse_manifest(&contents)
        .with_context(|| format!("invalid level manifest at {}", path.display()))
}

fn parse_manifest(contents: &str) -> Result<LevelDefinition> {
    let manifest: Manifest =
        toml::from_str(contents).context("failed to parse level manifest toml contents")?;

    let waves = match (manifest.difficulty, manifest.waves.is_empty()) {
        (Some(_), false) => bail!("level manifest sets both `difficulty` and `waves`"),
        (Some(difficulty), true) => {
            if !difficulty.is_finite() || difficulty <= 0.0 {
                bail!("difficulty {difficulty} must be a positive number");
            }
            generate_waves(difficulty)
        }
        (None, _) => manifest
            .waves
            .iter()
            .map(|wave| WaveSpec::new(wave.enemy, wave.count, wave.interval, wave.delay))
            .collect(),
    };

    let level = LevelDefinition::new(
        LevelId::new(manifest.id.unwrap_or(CUSTOM_LEVEL_ID)),
        manifest.name,
        Gold::new(manifest.start_gold),
        manifest.lives,
        manifest.path.into_iter().map(Vec2::from_array).collect(),
        manifest.build_spots.into_iter().map(Vec2::from_array).collect(),
        waves,
    )?;
    Ok(level)
}
