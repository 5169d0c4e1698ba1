//! Flightplot Simulation Library
//!
//! Generates synthetic aerobatic flight sequences from a plan of lines,
//! loops, rolls and turns, for demos and tests.

pub mod sim;

// Re-export main types
pub use sim::{simulate_plan, FlightPlan, Manoeuvre, Segment, WIND_COLUMNS};
