//! Data source implementations.

mod simulated;

pub use simulated::{LatencyProfile, SimulatedSource};
