use crate::vecmath::Vec2;
use serde::{Deserialize, Serialize};

/// Position and radius of a single molecule as exposed to consumers.
///
/// Velocities stay inside the engine; a renderer only needs to know
/// where to draw a molecule and how large it is.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MoleculeView {
    pub x: f64,
    pub y: f64,
    pub r: f64,
}

/// A value copy of the simulation's visible state at one clock tick.
///
/// Handed to rendering or recording collaborators. The engine keeps no
/// reference to it, so a consumer holding a snapshot is isolated from
/// any later mutation of the world.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Position and radius of every molecule.
    pub molecules: Vec<MoleculeView>,
    /// Bounded trail of the tracked molecule's collision positions, oldest first.
    pub random_path: Vec<Vec2>,
    /// Border hits per clock tick, averaged over the last completed measurement window.
    pub average_pressure: f64,
    /// Mean molecule speed sampled at the last window boundary ("temperature").
    pub average_speed: f64,
}
