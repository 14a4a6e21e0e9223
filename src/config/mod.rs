//! Configuration model for simulation runs.

pub mod simulation;

pub use simulation::SimulationConfig;
