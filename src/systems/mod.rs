//! Application systems
//!
//! Frame drivers that turn wall-clock time into fixed physics steps.

mod simulation;
mod threaded;

pub use simulation::{SimulationResult, SimulationSystem};
pub use threaded::ThreadedSimulation;
