pub mod config;
pub mod snapshot;
pub mod vecmath;

// Re-export key types for easier use by dependent crates
pub use config::{
    MeasurementConfig, MoleculeConfig, OutputConfig, PhysicsConfig, SimulationConfig,
    TimingConfig, UniverseConfig,
};
pub use snapshot::{MoleculeView, Snapshot};
pub use vecmath::Vec2;
