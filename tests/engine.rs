use gas_common::config::{
    MeasurementConfig, MoleculeConfig, OutputConfig, PhysicsConfig, SimulationConfig,
    TimingConfig, UniverseConfig,
};
use gas_common::vecmath::Vec2;
use gas_engine::error::Error;
use gas_engine::simulation::{GasSimulation, Simulatable};

/// The original experiment's constants: 300 molecules of radius 5 in a
/// 600x600 box, fully elastic borders, a 10-tick measurement window.
fn base_config() -> SimulationConfig {
    SimulationConfig {
        universe: UniverseConfig {
            width: 600.0,
            height: 600.0,
        },
        molecules: MoleculeConfig {
            count: 300,
            radius: 5.0,
            average_dimension_speed: 50.0,
            seed: 12345,
        },
        physics: PhysicsConfig {
            delta_t: 0.05,
            border_hit_impulse_retained: 1.0,
        },
        measurement: MeasurementConfig {
            clock_ticks: 10,
            random_path_max_length: 100,
        },
        timing: TimingConfig::default(),
        output: OutputConfig::default(),
    }
}

/// A single slow-statistics molecule for hand-placed trajectory checks.
fn single_molecule_config() -> SimulationConfig {
    let mut config = base_config();
    config.universe = UniverseConfig {
        width: 100.0,
        height: 100.0,
    };
    config.molecules.count = 1;
    config.molecules.radius = 4.0;
    config.physics.delta_t = 1.0;
    config.physics.border_hit_impulse_retained = 0.5;
    config.measurement.clock_ticks = 1;
    config.measurement.random_path_max_length = 10;
    config
}

#[test]
fn init_populates_world_within_box() {
    let mut sim = GasSimulation::new();
    sim.init(&base_config()).expect("init should succeed");

    let snapshot = sim.snapshot().expect("snapshot after init");
    assert_eq!(snapshot.molecules.len(), 300);
    for molecule in &snapshot.molecules {
        assert!(molecule.x >= 0.0 && molecule.x <= 600.0);
        assert!(molecule.y >= 0.0 && molecule.y <= 600.0);
        assert_eq!(molecule.r, 5.0);
    }
    assert_eq!(snapshot.average_pressure, 0.0);
    assert_eq!(snapshot.average_speed, 0.0);
    assert!(snapshot.random_path.is_empty());

    for molecule in sim.molecules().expect("molecules after init") {
        assert!(molecule.velocity.x >= -50.0 && molecule.velocity.x <= 50.0);
        assert!(molecule.velocity.y >= -50.0 && molecule.velocity.y <= 50.0);
    }
}

#[test]
fn snapshot_is_idempotent_and_detached() {
    let mut sim = GasSimulation::new();
    sim.init(&base_config()).expect("init should succeed");

    let first = sim.snapshot().expect("first snapshot");
    let second = sim.snapshot().expect("second snapshot");
    assert_eq!(first, second);

    sim.step().expect("step");
    let third = sim.snapshot().expect("snapshot after step");
    // The earlier copies are unaffected by stepping; the world moved on.
    assert_eq!(first, second);
    assert_ne!(first, third);
}

#[test]
fn random_path_never_exceeds_cap() {
    let mut config = base_config();
    config.measurement.random_path_max_length = 10;

    let mut sim = GasSimulation::new();
    sim.init(&config).expect("init should succeed");
    for _ in 0..300 {
        sim.step().expect("step");
        let snapshot = sim.snapshot().expect("snapshot");
        assert!(snapshot.random_path.len() <= 10);
    }
}

#[test]
fn random_path_evicts_oldest_at_cap() {
    // One molecule ping-ponging on the x axis hits a border every other
    // step, recording a path entry each time.
    let mut config = single_molecule_config();
    config.universe = UniverseConfig {
        width: 50.0,
        height: 50.0,
    };
    config.physics.border_hit_impulse_retained = 1.0;
    config.measurement.random_path_max_length = 5;

    let mut sim = GasSimulation::new();
    sim.init(&config).expect("init should succeed");
    {
        let molecules = sim.molecules_mut().expect("molecules");
        molecules[0].position = Vec2::new(25.0, 25.0);
        molecules[0].velocity = Vec2::new(30.0, 0.0);
    }

    for _ in 0..100 {
        sim.step().expect("step");
    }
    // Push-then-evict at the cap leaves one free slot in steady state.
    assert_eq!(sim.snapshot().expect("snapshot").random_path.len(), 4);
}

#[test]
fn border_crossing_reflects_scales_and_nudges() {
    let mut sim = GasSimulation::new();
    sim.init(&single_molecule_config()).expect("init should succeed");
    {
        let molecules = sim.molecules_mut().expect("molecules");
        molecules[0].position = Vec2::new(98.0, 50.0);
        molecules[0].velocity = Vec2::new(5.0, 0.0);
    }

    // Integration carries the molecule to x = 103, past the 100-wide box.
    sim.step().expect("step");

    let molecules = sim.molecules().expect("molecules");
    // Velocity sign-flipped and scaled by the retained impulse fraction.
    assert_eq!(molecules[0].velocity, Vec2::new(-2.5, 0.0));
    // Position nudged inward by radius / 8 from the crossing point.
    assert_eq!(molecules[0].position, Vec2::new(102.5, 50.0));

    let snapshot = sim.snapshot().expect("snapshot");
    // The tracked molecule records where it touched the border, pre-nudge.
    assert_eq!(snapshot.random_path, vec![Vec2::new(103.0, 50.0)]);
    // The hit lands in the *next* window: bookkeeping runs before motion.
    assert_eq!(snapshot.average_pressure, 0.0);

    sim.step().expect("second step");
    let snapshot = sim.snapshot().expect("snapshot");
    // One hit over a one-tick window.
    assert_eq!(snapshot.average_pressure, 1.0);
    assert_eq!(snapshot.average_speed, 2.5);
}

#[test]
fn corner_crossing_counts_each_axis() {
    let mut sim = GasSimulation::new();
    sim.init(&single_molecule_config()).expect("init should succeed");
    {
        let molecules = sim.molecules_mut().expect("molecules");
        molecules[0].position = Vec2::new(98.0, 98.0);
        molecules[0].velocity = Vec2::new(5.0, 5.0);
    }

    sim.step().expect("step");

    let molecules = sim.molecules().expect("molecules");
    assert_eq!(molecules[0].velocity, Vec2::new(-2.5, -2.5));
    assert_eq!(molecules[0].position, Vec2::new(102.5, 102.5));

    let snapshot = sim.snapshot().expect("snapshot");
    // Two path entries: the x crossing, then the y crossing observed
    // after the x coordinate was already nudged inward.
    assert_eq!(
        snapshot.random_path,
        vec![Vec2::new(103.0, 103.0), Vec2::new(102.5, 103.0)]
    );

    sim.step().expect("second step");
    // A corner crossing is two border hits for the pressure statistic.
    assert_eq!(sim.snapshot().expect("snapshot").average_pressure, 2.0);
}

#[test]
fn overlapping_pair_swaps_velocities_and_separates() {
    let mut config = base_config();
    config.universe = UniverseConfig {
        width: 1000.0,
        height: 1000.0,
    };
    config.molecules.count = 2;
    config.physics.delta_t = 0.5;
    config.measurement.clock_ticks = 100;

    let mut sim = GasSimulation::new();
    sim.init(&config).expect("init should succeed");
    {
        let molecules = sim.molecules_mut().expect("molecules");
        molecules[0].position = Vec2::new(50.0, 50.0);
        molecules[0].velocity = Vec2::new(1.0, 0.0);
        molecules[1].position = Vec2::new(52.0, 50.0);
        molecules[1].velocity = Vec2::new(-2.0, 3.0);
    }

    // After integration: (50.5, 50) and (51, 51.5), well inside their
    // combined radius of 10, so the pair collides.
    sim.step().expect("step");

    let molecules = sim.molecules().expect("molecules");
    // Velocities exchanged whole (equal assumed masses).
    assert_eq!(molecules[0].velocity, Vec2::new(-2.0, 3.0));
    assert_eq!(molecules[1].velocity, Vec2::new(1.0, 0.0));

    // First molecule pulled back by 1/16 of the center offset
    // ((0.5, 1.5) / 16), from its post-integration position.
    assert_eq!(molecules[0].position, Vec2::new(50.46875, 49.90625));
    // Second molecule's correction reads the first's *updated* position:
    // (51, 51.5) - ((50.46875, 49.90625) - (51, 51.5)) / 16.
    assert_eq!(
        molecules[1].position,
        Vec2::new(51.033203125, 51.599609375)
    );

    // The tracked molecule logs its pre-correction position.
    let snapshot = sim.snapshot().expect("snapshot");
    assert_eq!(snapshot.random_path, vec![Vec2::new(50.5, 50.0)]);
}

#[test]
fn statistics_change_only_at_window_boundaries() {
    let mut sim = GasSimulation::new();
    sim.init(&base_config()).expect("init should succeed");

    let mut readings = Vec::new();
    for _ in 0..35 {
        sim.step().expect("step");
        let snapshot = sim.snapshot().expect("snapshot");
        readings.push((snapshot.average_pressure, snapshot.average_speed));
    }

    for (index, reading) in readings.iter().enumerate() {
        let step_number = index + 1;
        if step_number < 10 {
            // Nothing measured before the first window closes.
            assert_eq!(*reading, (0.0, 0.0), "step {step_number}");
        } else if step_number % 10 != 0 {
            // Between boundaries the readings hold their last value.
            assert_eq!(*reading, readings[index - 1], "step {step_number}");
        }
    }
    // From the first boundary on, the mean speed of 300 moving molecules
    // is strictly positive.
    assert!(readings[9].1 > 0.0);
    assert!(readings[29].1 > 0.0);
}

#[test]
fn operations_before_init_fail() {
    let mut sim = GasSimulation::new();
    assert!(matches!(sim.step(), Err(Error::NotInitialized)));
    assert!(matches!(sim.snapshot(), Err(Error::NotInitialized)));
}

#[test]
fn invalid_configurations_are_rejected() {
    let mut sim = GasSimulation::new();

    let mut zero_count = base_config();
    zero_count.molecules.count = 0;
    assert!(matches!(
        sim.init(&zero_count),
        Err(Error::InvalidConfiguration(_))
    ));

    let mut flat_box = base_config();
    flat_box.universe.height = 0.0;
    assert!(matches!(
        sim.init(&flat_box),
        Err(Error::InvalidConfiguration(_))
    ));

    let mut negative_width = base_config();
    negative_width.universe.width = -600.0;
    assert!(matches!(
        sim.init(&negative_width),
        Err(Error::InvalidConfiguration(_))
    ));

    let mut zero_window = base_config();
    zero_window.measurement.clock_ticks = 0;
    assert!(matches!(
        sim.init(&zero_window),
        Err(Error::InvalidConfiguration(_))
    ));

    // A failed init never builds a world.
    assert!(matches!(sim.step(), Err(Error::NotInitialized)));
}

#[test]
fn runs_are_reproducible_per_seed() {
    let mut first = GasSimulation::new();
    let mut second = GasSimulation::new();
    first.init(&base_config()).expect("init");
    second.init(&base_config()).expect("init");

    for _ in 0..50 {
        first.step().expect("step");
        second.step().expect("step");
    }
    assert_eq!(
        first.snapshot().expect("snapshot"),
        second.snapshot().expect("snapshot")
    );

    let mut other_seed = base_config();
    other_seed.molecules.seed = 54321;
    let mut third = GasSimulation::new();
    let mut fourth = GasSimulation::new();
    third.init(&other_seed).expect("init");
    fourth.init(&base_config()).expect("init");
    let a = third.snapshot().expect("snapshot");
    let b = fourth.snapshot().expect("snapshot");
    assert_ne!(a.molecules[0], b.molecules[0]);
}
