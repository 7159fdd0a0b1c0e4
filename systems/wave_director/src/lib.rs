#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic wave director responsible for spawn scheduling and wave completion.

use monochrome_td_core::{Command, Event, WaveId, WavePhase, WaveSpec};

/// Pure system that paces enemy spawns for the active wave.
///
/// The director idles until the world announces a started wave. It then waits
/// out the wave's delay, spawns one enemy on the first eligible tick and every
/// `interval` ticks afterwards, and once the whole wave is on the field asks
/// the world to complete the wave as soon as no enemy remains.
#[derive(Debug, Default)]
pub struct WaveDirector {
    phase: Phase,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
enum Phase {
    #[default]
    Idle,
    Spawning {
        wave: WaveId,
        spec: WaveSpec,
        spawned: u32,
        countdown: u32,
    },
    Draining {
        wave: WaveId,
    },
    Cleared,
}

impl WaveDirector {
    /// Creates an idle wave director.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Reports the director's current phase.
    #[must_use]
    pub fn phase(&self) -> WavePhase {
        match self.phase {
            Phase::Idle => WavePhase::Idle,
            Phase::Spawning { .. } => WavePhase::Spawning,
            Phase::Draining { .. } => WavePhase::Draining,
            Phase::Cleared => WavePhase::Cleared,
        }
    }

    /// Consumes world events and emits spawn and completion commands.
    ///
    /// `live_enemies` is the number of enemies on the field when the events
    /// are handled.
    pub fn handle(&mut self, events: &[Event], live_enemies: usize, out: &mut Vec<Command>) {
        for event in events {
            match event {
                Event::WaveStarted { wave, spec } => {
                    self.phase = Phase::Spawning {
                        wave: *wave,
                        spec: *spec,
                        spawned: 0,
                        countdown: spec.delay(),
                    };
                }
                Event::TimeAdvanced { .. } => self.advance(live_enemies, out),
                Event::WaveCleared { .. } => self.phase = Phase::Idle,
                Event::LevelCompleted { .. } => self.phase = Phase::Cleared,
                _ => {}
            }
        }
    }

    fn advance(&mut self, live_enemies: usize, out: &mut Vec<Command>) {
        match &mut self.phase {
            Phase::Spawning {
                wave,
                spec,
                spawned,
                countdown,
            } => {
                if *countdown > 0 {
                    *countdown -= 1;
                    return;
                }

                out.push(Command::SpawnEnemy {
                    kind: spec.enemy(),
                    wave: *wave,
                });
                *spawned += 1;
                *countdown = spec.interval().saturating_sub(1);

                if *spawned >= spec.count() {
                    self.phase = Phase::Draining { wave: *wave };
                }
            }
            Phase::Draining { wave } => {
                if live_enemies == 0 {
                    out.push(Command::CompleteWave { wave: *wave });
                }
            }
            Phase::Idle | Phase::Cleared => {}
        }
    }
}
