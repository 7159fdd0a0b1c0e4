use monochrome_td_core::{
    BuildSpotId, Command, EnemyId, EnemyKind, Event, Gold, LevelDefinition, LevelId,
    TowerKind, TowerTarget, Vec2, WaveId, WaveSpec,
};
use monochrome_td_system_tower_targeting::TowerTargeting;
use monochrome_td_world::{self as world, query, World};

#[test]
fn deterministic_replay_keeps_first_spawned_target() {
    let first = replay(scripted_commands());
    let second = replay(scripted_commands());

    assert_eq!(first, second, "replay diverged between runs");

    let spawned: Vec<EnemyId> = first
        .events
        .iter()
        .filter_map(|event| match event {
            Event::EnemySpawned { enemy, .. } => Some(*enemy),
            _ => None,
        })
        .collect();
    assert_eq!(spawned, vec![EnemyId::new(0), EnemyId::new(1)]);

    let armed_with_two_enemies = first
        .assignments
        .last()
        .expect("script produced assignments");
    assert_eq!(
        armed_with_two_enemies,
        &vec![TowerTarget {
            tower: first.tower,
            primary: EnemyId::new(0),
            secondary: None,
        }]
    );
}

#[test]
fn unarmed_tower_acquires_nothing_until_ticked() {
    let outcome = replay(scripted_commands());
    let before_tick = &outcome.assignments[3];
    assert!(before_tick.is_empty(), "freshly built towers are not armed");
}

#[derive(Debug, PartialEq)]
struct ReplayOutcome {
    tower: monochrome_td_core::TowerId,
    events: Vec<Event>,
    assignments: Vec<Vec<TowerTarget>>,
}

fn replay(commands: Vec<Command>) -> ReplayOutcome {
    let mut world = World::new(level());
    let mut targeting = TowerTargeting::new();
    let mut events = Vec::new();
    let mut assignments = Vec::new();

    for command in commands {
        world::apply(&mut world, command, &mut events);

        let mut targets = Vec::new();
        targeting.handle(
            query::state(&world),
            &query::tower_view(&world),
            &query::enemy_view(&world),
            &mut targets,
        );
        assignments.push(targets);
    }

    let tower = query::tower_at(&world, BuildSpotId::new(0)).expect("tower was built");
    ReplayOutcome {
        tower,
        events,
        assignments,
    }
}

fn scripted_commands() -> Vec<Command> {
    let spawn = Command::SpawnEnemy {
        kind: EnemyKind::Normal,
        wave: WaveId::new(0),
    };
    vec![
        Command::BuildTower {
            spot: BuildSpotId::new(0),
            kind: TowerKind::Archer,
        },
        Command::StartWave,
        spawn.clone(),
        spawn,
        Command::Tick,
    ]
}

fn level() -> LevelDefinition {
    LevelDefinition::new(
        LevelId::new(1),
        "Replay Lane",
        Gold::new(200),
        5,
        vec![Vec2::new(0.0, 0.0), Vec2::new(300.0, 0.0)],
        vec![Vec2::new(30.0, 40.0)],
        vec![WaveSpec::new(EnemyKind::Normal, 2, 10, 0)],
    )
    .expect("valid level")
}
