pub mod error;
pub mod molecule;
pub mod simulation;

pub use error::{Error, Result};
pub use molecule::Molecule;
pub use simulation::{GasSimulation, Simulatable};
