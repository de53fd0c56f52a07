use gas_common::vecmath::Vec2;
use rand::rngs::StdRng;
use rand::Rng;

/// A gas molecule: continuous position and velocity in box coordinates,
/// plus a fixed collision radius.
///
/// All molecules share one assumed mass, so none is stored; gravity and
/// intermolecular attraction are ignored.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Molecule {
    /// Center position.
    pub position: Vec2,
    /// Velocity in box units per time unit.
    pub velocity: Vec2,
    /// Collision radius.
    pub radius: f64,
}

impl Molecule {
    /// Euclidean distance between the centers of two molecules.
    #[inline]
    pub fn distance(&self, other: &Molecule) -> f64 {
        self.position.distance(other.position)
    }

    /// True iff the two molecules touch or overlap.
    #[inline]
    pub fn overlaps(&self, other: &Molecule) -> bool {
        self.distance(other) <= self.radius + other.radius
    }

    /// Instantaneous speed, `|velocity|`.
    #[inline]
    pub fn speed(&self) -> f64 {
        self.velocity.length()
    }
}

/// Generates `count` molecules with positions uniform over the box and
/// signed velocity components uniform over
/// `[-average_dimension_speed, average_dimension_speed]`, each component
/// an independent draw. Every molecule gets the same fixed `radius`.
pub fn create_molecules(
    count: u32,
    width: f64,
    height: f64,
    average_dimension_speed: f64,
    radius: f64,
    rng: &mut StdRng,
) -> Vec<Molecule> {
    (0..count)
        .map(|_| Molecule {
            position: Vec2::new(rng.random_range(0.0..width), rng.random_range(0.0..height)),
            velocity: Vec2::new(
                rng.random_range(-average_dimension_speed..=average_dimension_speed),
                rng.random_range(-average_dimension_speed..=average_dimension_speed),
            ),
            radius,
        })
        .collect()
}
