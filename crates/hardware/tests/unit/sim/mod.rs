/// Simulator step and run tests.
pub mod simulator;
