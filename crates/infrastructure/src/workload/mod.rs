pub mod simulated;

pub use simulated::SimulatedWorkloadController;
