use crate::error::{Error, Result};
use crate::molecule::{create_molecules, Molecule};
use gas_common::config::SimulationConfig;
use gas_common::snapshot::{MoleculeView, Snapshot};
use gas_common::vecmath::Vec2;
use log::debug;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::VecDeque;

/// Capability contract for a steppable world: configure it, advance it
/// one discrete tick at a time, and copy out its visible state.
///
/// The driver loop is generic over this, so a harness can swap in a
/// different world without touching the loop.
pub trait Simulatable {
    /// Builds (or rebuilds) the world from a configuration.
    fn init(&mut self, config: &SimulationConfig) -> Result<()>;
    /// Advances the world by one tick.
    fn step(&mut self) -> Result<()>;
    /// Copies out the visible state for external consumers.
    fn snapshot(&self) -> Result<Snapshot>;
}

/// Everything the engine mutates between `init` and the last `step`.
#[derive(Debug)]
struct World {
    /// Index 0 is the tracked molecule whose path is recorded.
    molecules: Vec<Molecule>,
    box_width: f64,
    box_height: f64,
    delta_t: f64,
    border_hit_impulse_retained: f64,
    measurement_clock_ticks: u32,
    random_path_max_length: usize,
    /// Border hits per tick over the last completed measurement window.
    average_pressure: f64,
    /// Mean molecule speed at the last window boundary.
    average_speed: f64,
    /// Hits accumulated in the current window, reset at each boundary.
    border_hits: u32,
    /// Cycles 0..measurement_clock_ticks.
    current_clock_tick: u32,
    /// Collision positions of the tracked molecule, oldest first.
    random_path: VecDeque<Vec2>,
}

/// Discrete-time ideal gas in a rectangular box.
///
/// Each `step` runs four phases in fixed order: measurement
/// bookkeeping, Euler integration, border collision, pairwise
/// collision. The phase order and the per-phase iteration orders are
/// load-bearing: they decide which of several simultaneous collisions
/// resolves first, and therefore the exact trajectory.
#[derive(Debug, Default)]
pub struct GasSimulation {
    world: Option<World>,
}

impl GasSimulation {
    /// Creates an engine with no world. `init` must succeed before
    /// `step` or `snapshot` can be called.
    pub fn new() -> Self {
        Self { world: None }
    }

    /// Read access to the molecule set.
    pub fn molecules(&self) -> Result<&[Molecule]> {
        Ok(&self.world()?.molecules)
    }

    /// Mutable access to the molecule set, for harnesses and tests that
    /// place molecules in known states before stepping.
    pub fn molecules_mut(&mut self) -> Result<&mut [Molecule]> {
        Ok(&mut self.world_mut()?.molecules)
    }

    fn world(&self) -> Result<&World> {
        self.world.as_ref().ok_or(Error::NotInitialized)
    }

    fn world_mut(&mut self) -> Result<&mut World> {
        self.world.as_mut().ok_or(Error::NotInitialized)
    }
}

impl Simulatable for GasSimulation {
    /// Validates the configuration and builds a fresh world: randomized
    /// molecules, zeroed statistics, empty path. On error the previous
    /// world (if any) is left untouched.
    fn init(&mut self, config: &SimulationConfig) -> Result<()> {
        let world = World::build(config)?;
        debug!(
            "World initialized: {} molecules in a {}x{} box",
            world.molecules.len(),
            world.box_width,
            world.box_height
        );
        self.world = Some(world);
        Ok(())
    }

    fn step(&mut self) -> Result<()> {
        let world = self.world_mut()?;
        world.measure_averages();
        world.integrate();
        world.handle_border_collisions();
        world.handle_molecule_collisions();
        Ok(())
    }

    fn snapshot(&self) -> Result<Snapshot> {
        let world = self.world()?;
        Ok(Snapshot {
            molecules: world
                .molecules
                .iter()
                .map(|m| MoleculeView {
                    x: m.position.x,
                    y: m.position.y,
                    r: m.radius,
                })
                .collect(),
            random_path: world.random_path.iter().copied().collect(),
            average_pressure: world.average_pressure,
            average_speed: world.average_speed,
        })
    }
}

impl World {
    fn build(config: &SimulationConfig) -> Result<Self> {
        validate(config)?;

        let mut rng = StdRng::seed_from_u64(config.molecules.seed);
        let molecules = create_molecules(
            config.molecules.count,
            config.universe.width,
            config.universe.height,
            config.molecules.average_dimension_speed,
            config.molecules.radius,
            &mut rng,
        );

        Ok(Self {
            molecules,
            box_width: config.universe.width,
            box_height: config.universe.height,
            delta_t: config.physics.delta_t,
            border_hit_impulse_retained: config.physics.border_hit_impulse_retained,
            measurement_clock_ticks: config.measurement.clock_ticks,
            random_path_max_length: config.measurement.random_path_max_length as usize,
            average_pressure: 0.0,
            average_speed: 0.0,
            border_hits: 0,
            current_clock_tick: 0,
            random_path: VecDeque::new(),
        })
    }

    /// Phase 1: measurement bookkeeping.
    ///
    /// At a window boundary the pressure becomes the time average of
    /// border hits over the window, while the speed is the instantaneous
    /// mean at that boundary. The asymmetry is intentional. Between
    /// boundaries both readings hold their last value.
    fn measure_averages(&mut self) {
        self.current_clock_tick += 1;
        if self.current_clock_tick >= self.measurement_clock_ticks {
            self.current_clock_tick = 0;
            self.average_pressure =
                f64::from(self.border_hits) / f64::from(self.measurement_clock_ticks);
            self.border_hits = 0;
            self.average_speed = self.molecules.iter().map(Molecule::speed).sum::<f64>()
                / self.molecules.len() as f64;
        }
    }

    /// Phase 2: explicit Euler integration, no sub-stepping.
    fn integrate(&mut self) {
        for molecule in &mut self.molecules {
            molecule.position = molecule.position.add(molecule.velocity.scale(self.delta_t));
        }
    }

    /// Phase 3: border collision, each axis checked independently
    /// against the post-integration position.
    ///
    /// The x axis is handled before the y axis, so a corner crossing
    /// registers two hits and records the tracked molecule twice, the
    /// second entry with the already-nudged x coordinate.
    fn handle_border_collisions(&mut self) {
        for i in 0..self.molecules.len() {
            if outside(self.molecules[i].position.x, self.box_width) {
                self.register_border_hit(i);
                let limit = self.box_width;
                let restitution = self.border_hit_impulse_retained;
                let m = &mut self.molecules[i];
                reflect_axis(&mut m.position.x, &mut m.velocity.x, limit, m.radius, restitution);
            }
            if outside(self.molecules[i].position.y, self.box_height) {
                self.register_border_hit(i);
                let limit = self.box_height;
                let restitution = self.border_hit_impulse_retained;
                let m = &mut self.molecules[i];
                reflect_axis(&mut m.position.y, &mut m.velocity.y, limit, m.radius, restitution);
            }
        }
    }

    /// Counts the hit and, for the tracked molecule, records where it
    /// was when it touched the border (before reflection and nudge).
    fn register_border_hit(&mut self, index: usize) {
        if index == 0 {
            let position = self.molecules[0].position;
            self.record_path_entry(position);
        }
        self.border_hits += 1;
    }

    /// Phase 4: pairwise collision with equal assumed masses, pairs
    /// visited with `i` ascending and `j` ascending above `i`.
    ///
    /// Velocities of an overlapping pair are exchanged whole, then the
    /// pair is pushed apart by 1/16 of the center offset so molecules
    /// with near-equal velocities do not stay glued across steps. The
    /// second correction reads the first molecule's already-corrected
    /// position; together with the pair order this fixes which
    /// collision wins when several overlap in one step.
    fn handle_molecule_collisions(&mut self) {
        let count = self.molecules.len();
        for i in 0..count {
            for j in (i + 1)..count {
                let first = self.molecules[i];
                let second = self.molecules[j];
                if !first.overlaps(&second) {
                    continue;
                }
                if i == 0 {
                    self.record_path_entry(first.position);
                }

                self.molecules[i].velocity = second.velocity;
                self.molecules[j].velocity = first.velocity;

                let corrected = first
                    .position
                    .sub(second.position.sub(first.position).scale(1.0 / 16.0));
                self.molecules[i].position = corrected;
                self.molecules[j].position =
                    second.position.sub(corrected.sub(second.position).scale(1.0 / 16.0));
            }
        }
    }

    /// Appends a path entry, evicting the oldest once the cap is reached.
    fn record_path_entry(&mut self, entry: Vec2) {
        self.random_path.push_back(entry);
        if self.random_path.len() >= self.random_path_max_length {
            self.random_path.pop_front();
        }
    }
}

fn validate(config: &SimulationConfig) -> Result<()> {
    if config.molecules.count == 0 {
        return Err(Error::InvalidConfiguration(
            "molecule count must be > 0".into(),
        ));
    }
    if !config.universe.width.is_finite() || config.universe.width <= 0.0 {
        return Err(Error::InvalidConfiguration(
            "box width must be finite and > 0".into(),
        ));
    }
    if !config.universe.height.is_finite() || config.universe.height <= 0.0 {
        return Err(Error::InvalidConfiguration(
            "box height must be finite and > 0".into(),
        ));
    }
    if config.measurement.clock_ticks == 0 {
        return Err(Error::InvalidConfiguration(
            "measurement clock ticks must be > 0".into(),
        ));
    }
    if !config.molecules.radius.is_finite() || config.molecules.radius < 0.0 {
        return Err(Error::InvalidConfiguration(
            "molecule radius must be finite and >= 0".into(),
        ));
    }
    if !config.molecules.average_dimension_speed.is_finite()
        || config.molecules.average_dimension_speed < 0.0
    {
        return Err(Error::InvalidConfiguration(
            "average dimension speed must be finite and >= 0".into(),
        ));
    }
    if !config.physics.delta_t.is_finite() {
        return Err(Error::InvalidConfiguration("delta_t must be finite".into()));
    }
    if !config.physics.border_hit_impulse_retained.is_finite() {
        return Err(Error::InvalidConfiguration(
            "border hit impulse retained must be finite".into(),
        ));
    }
    Ok(())
}

#[inline]
fn outside(coordinate: f64, limit: f64) -> bool {
    coordinate > limit || coordinate < 0.0
}

/// Reflects one velocity component, keeping `restitution` of the
/// impulse, and nudges the coordinate back inside by `radius / 8` so
/// the molecule does not jitter along the border.
#[inline]
fn reflect_axis(coordinate: &mut f64, velocity: &mut f64, limit: f64, radius: f64, restitution: f64) {
    *velocity = restitution * -*velocity;
    if *coordinate > limit {
        *coordinate -= radius / 8.0;
    } else if *coordinate < 0.0 {
        *coordinate += radius / 8.0;
    }
}
