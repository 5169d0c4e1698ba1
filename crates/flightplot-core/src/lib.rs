//! # Flightplot Core
//!
//! Turns flight-state sequences into chart traces:
//! - Time-indexed sequences with body→world transforms
//! - Wingtip ribbon meshes
//! - Vehicle mesh templates (OBJ)
//! - `plotly` trace adapters and layouts
//! - Explicit, file-configurable plot styling

pub mod error;
pub mod frame;
pub mod model;
pub mod plots;
pub mod ribbon;
pub mod state;
pub mod style;
pub mod trace;

// Re-export core types
pub use error::{FlightPlotError, Result};
pub use frame::Coord;
pub use model::MeshModel;
pub use ribbon::{build_ribbon, interleave, FaceColors, RibbonMesh};
pub use state::StateSequence;
pub use style::{Dash, LineMode, PlotStyle};
pub use trace::{Mesh, Path3d, Series};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
