pub mod bc;
pub mod cli;
pub mod config;
pub mod constants;
pub mod controller;
pub mod directions;
pub mod error;
pub mod io;
mod kernel;
pub mod lattice;
pub mod monitor;

use serde::{Deserialize, Serialize};

/// Faces of the rectangular domain. `West`/`East` are the `x = 0` and
/// `x = nx - 1` columns, `South`/`North` the `y = 0` and `y = ny - 1` rows.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum BoundaryFace {
    West = 0,
    East = 1,
    South = 2,
    North = 3,
}

pub(crate) const FACES: [BoundaryFace; 4] = [
    BoundaryFace::West,
    BoundaryFace::East,
    BoundaryFace::South,
    BoundaryFace::North,
];

pub mod prelude {
    pub use crate::BoundaryFace::{self, *};
    pub use crate::bc::{
        BoundaryKind, BoundarySpec, NodeClass, ObstacleWithGap, Orientation, OutletDensity,
        Region, VelocityProfile,
    };
    pub use crate::config::{self, SimulationConfig};
    pub use crate::constants::Float;
    pub use crate::controller::{SimulationController, Status};
    pub use crate::directions::LatticeModel::{self, *};
    pub use crate::error::{SimError, SimResult};
    pub use crate::io::{CsvSink, JsonSink, Snapshot, SnapshotSink};
    pub use crate::lattice::Lattice;
}
