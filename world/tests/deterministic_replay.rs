use std::{
    collections::hash_map::DefaultHasher,
    hash::{Hash, Hasher},
    time::Duration,
};

use yasashi_tower_core::{
    Command, Event, SimulationConfig, TowerId, TowerStats, TowerUpgrade, Vec2,
};
use yasashi_tower_world::{self as world, query, World};

#[test]
fn deterministic_replay_produces_identical_runs() {
    let first = replay(scripted_commands());
    let second = replay(scripted_commands());

    assert_eq!(first, second, "replay diverged between runs");
    assert_eq!(first.fingerprint(), second.fingerprint());
    assert!(first.events.len() > 100, "script exercised too little");
}

#[test]
fn replay_records_every_kind_of_combat_event() {
    let outcome = replay(scripted_commands());

    for kind in [
        "WaveStarted",
        "EnemySpawned",
        "EnemyMoved",
        "TowerPlaced",
        "TowerPlacementRejected",
        "TowerAttacked",
        "EnemyDefeated",
        "TowerUpgraded",
        "TowerActivationChanged",
    ] {
        assert!(
            outcome.events.iter().any(|record| record.contains(kind)),
            "no {kind} event recorded"
        );
    }
}

fn replay(commands: Vec<Command>) -> ReplayOutcome {
    let config = SimulationConfig {
        tower: TowerStats {
            damage: 50,
            ..TowerStats::default()
        },
        ..SimulationConfig::default()
    };
    let mut world = World::new(config).expect("valid config");
    let mut log = Vec::new();

    for command in commands {
        let mut events = Vec::new();
        let _ = world::apply(&mut world, command, &mut events);
        record_events(&events, &mut log);
    }

    let snapshot =
        serde_json::to_string(&query::snapshot(&world)).expect("snapshot serialises");

    ReplayOutcome {
        snapshot,
        events: log,
    }
}

fn record_events(events: &[Event], log: &mut Vec<String>) {
    log.extend(
        events
            .iter()
            .map(|event| serde_json::to_string(event).expect("event serialises")),
    );
}

fn scripted_commands() -> Vec<Command> {
    let mut commands = vec![
        Command::PlaceTower {
            at: Vec2::new(125.0, 125.0),
        },
        Command::PlaceTower {
            at: Vec2::new(130.0, 130.0),
        },
        Command::PlaceTower {
            at: Vec2::new(275.0, 325.0),
        },
    ];

    commands.extend((0..60).map(|_| Command::Tick {
        dt: Duration::from_millis(250),
    }));
    commands.push(Command::UpgradeTower {
        tower: TowerId::new(1),
        upgrade: TowerUpgrade {
            damage: Some(5),
            range: Some(25.0),
            attack_rate: None,
        },
    });
    commands.push(Command::SetTowerActive {
        tower: TowerId::new(0),
        active: false,
    });
    commands.extend((0..40).map(|_| Command::Tick {
        dt: Duration::from_millis(500),
    }));

    commands
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
struct ReplayOutcome {
    snapshot: String,
    events: Vec<String>,
}

impl ReplayOutcome {
    fn fingerprint(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.hash(&mut hasher);
        hasher.finish()
    }
}
