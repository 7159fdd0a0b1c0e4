#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic wave generation and the stock level catalog.
//!
//! Waves follow a fixed rotation keyed on the one-based wave number: every
//! fifteenth wave is a juggernaut wave, then tanks on multiples of five,
//! shamans on multiples of four, sprinters on multiples of three, fast
//! enemies on even numbers, and regular enemies otherwise. A difficulty
//! multiplier scales every enemy count.

use monochrome_td_core::{
    EnemyKind, Gold, LevelDefinition, LevelError, LevelId, Vec2, WaveSpec,
};

/// Number of waves in a generated level.
pub const TOTAL_WAVES: u32 = 15;

const STOCK_LIVES: u32 = 10;
const MIN_SPAWN_INTERVAL: u32 = 5;
const BASE_SPAWN_INTERVAL: u32 = 60;
const SPAWN_INTERVAL_STEP: u32 = 3;

/// Generates the full wave list for the provided difficulty multiplier.
///
/// Non-finite or negative multipliers are treated as zero, which yields empty
/// waves that level validation rejects.
#[must_use]
pub fn generate_waves(difficulty: f64) -> Vec<WaveSpec> {
    let difficulty = if difficulty.is_finite() {
        difficulty.max(0.0)
    } else {
        0.0
    };
    (1..=TOTAL_WAVES)
        .map(|number| generate_wave(number, difficulty))
        .collect()
}

fn generate_wave(number: u32, difficulty: f64) -> WaveSpec {
    let (enemy, count) = if number % 15 == 0 {
        (EnemyKind::Juggernaut, 2 + difficulty.trunc() as u32)
    } else if number % 5 == 0 {
        (EnemyKind::Tank, 3 + number / 3)
    } else if number % 4 == 0 {
        (EnemyKind::Shaman, 4 + number / 2)
    } else if number % 3 == 0 {
        (EnemyKind::Sprinter, 8 + number)
    } else if number % 2 == 0 {
        (EnemyKind::Fast, 10 + number)
    } else {
        (EnemyKind::Normal, 10 + number * 2)
    };

    let count = (f64::from(count) * difficulty).trunc() as u32;
    let interval = BASE_SPAWN_INTERVAL
        .saturating_sub(number * SPAWN_INTERVAL_STEP)
        .max(MIN_SPAWN_INTERVAL);
    WaveSpec::new(enemy, count, interval, 0)
}

/// Builds the three stock levels in campaign order.
pub fn stock_levels() -> Result<Vec<LevelDefinition>, LevelError> {
    Ok(vec![outskirts()?, winding_woods()?, black_castle()?])
}

fn points(raw: &[(f32, f32)]) -> Vec<Vec2> {
    raw.iter().map(|&(x, y)| Vec2::new(x, y)).collect()
}

fn outskirts() -> Result<LevelDefinition, LevelError> {
    LevelDefinition::new(
        LevelId::new(1),
        "The Outskirts",
        Gold::new(250),
        STOCK_LIVES,
        points(&[
            (0.0, 50.0),
            (100.0, 50.0),
            (100.0, 200.0),
            (300.0, 200.0),
            (300.0, 100.0),
            (500.0, 100.0),
            (500.0, 300.0),
            (600.0, 300.0),
        ]),
        points(&[
            (140.0, 170.0),
            (70.0, 90.0),
            (340.0, 170.0),
            (260.0, 140.0),
            (460.0, 140.0),
            (540.0, 260.0),
        ]),
        generate_waves(1.0),
    )
}

fn winding_woods() -> Result<LevelDefinition, LevelError> {
    LevelDefinition::new(
        LevelId::new(2),
        "Winding Woods",
        Gold::new(350),
        STOCK_LIVES,
        points(&[
            (0.0, 50.0),
            (150.0, 50.0),
            (150.0, 350.0),
            (300.0, 350.0),
            (300.0, 50.0),
            (450.0, 50.0),
            (450.0, 350.0),
            (600.0, 350.0),
        ]),
        points(&[
            (95.0, 120.0),
            (55.0, 300.0),
            (245.0, 120.0),
            (205.0, 300.0),
            (395.0, 120.0),
            (355.0, 300.0),
            (545.0, 120.0),
            (505.0, 300.0),
        ]),
        generate_waves(1.3),
    )
}

fn black_castle() -> Result<LevelDefinition, LevelError> {
    LevelDefinition::new(
        LevelId::new(3),
        "Black Castle",
        Gold::new(500),
        STOCK_LIVES,
        points(&[
            (50.0, 0.0),
            (50.0, 350.0),
            (550.0, 350.0),
            (550.0, 50.0),
            (200.0, 50.0),
            (200.0, 250.0),
            (400.0, 250.0),
            (400.0, 150.0),
        ]),
        points(&[
            (100.0, 120.0),
            (100.0, 280.0),
            (500.0, 120.0),
            (500.0, 280.0),
            (300.0, 120.0),
            (300.0, 300.0),
            (250.0, 80.0),
            (350.0, 180.0),
        ]),
        generate_waves(1.6),
    )
}
