// ------------------------------------------------------------------------------- IMPORTS

use crate::FACES;
use crate::bc::{BoundarySpec, Region};
use crate::constants::Float;
use crate::directions::LatticeModel;
use crate::error::{SimError, SimResult};
use serde::{Deserialize, Serialize};

/// Steps to take before the steady-state test is consulted at all, so a
/// start from equilibrium is not mistaken for convergence.
pub const MIN_ITER: usize = 10;

pub const DEFAULT_STEADY_STATE_THRESHOLD: Float = 1e-6;

pub const DEFAULT_SNAPSHOT_INTERVAL: usize = 100;

// -------------------------------------------------------------- STRUCT: SimulationConfig

/// Everything a simulation run is built from. The boundary spec list is
/// ordered: application order at shared nodes is exactly this order, so two
/// configs with the same entries in a different order are different
/// configurations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Grid dimensions `[nx, ny]`.
    pub n: [usize; 2],
    pub model: LatticeModel,
    /// BGK relaxation time; must be positive. Values at or below 0.5 are
    /// accepted but sit on the stability boundary.
    pub tau: Float,
    pub steady_state_threshold: Float,
    pub snapshot_interval: usize,
    pub min_iterations: usize,
    pub initial_density: Vec<Float>,
    pub initial_velocity: Vec<[Float; 2]>,
    pub boundary_specs: Vec<BoundarySpec>,
}

impl SimulationConfig {
    /// A uniform resting fluid at unit density with no boundary specs;
    /// scenario builders start from this and override.
    pub fn resting(nx: usize, ny: usize, model: LatticeModel) -> Self {
        SimulationConfig {
            n: [nx, ny],
            model,
            tau: 1.0,
            steady_state_threshold: DEFAULT_STEADY_STATE_THRESHOLD,
            snapshot_interval: DEFAULT_SNAPSHOT_INTERVAL,
            min_iterations: MIN_ITER,
            initial_density: uniform_density(1.0, [nx, ny]),
            initial_velocity: uniform_velocity([0.0, 0.0], [nx, ny]),
            boundary_specs: Vec::new(),
        }
    }

    pub fn validate(&self) -> SimResult<()> {
        let [nx, ny] = self.n;
        if nx == 0 || ny == 0 {
            return Err(SimError::config(format!(
                "grid dimensions must be positive, got {nx}x{ny}"
            )));
        }
        if self.tau <= 0.0 {
            return Err(SimError::config(format!(
                "relaxation time must be positive, got {}",
                self.tau
            )));
        }
        if self.steady_state_threshold <= 0.0 {
            return Err(SimError::config(
                "steady-state threshold must be positive",
            ));
        }
        if self.snapshot_interval == 0 {
            return Err(SimError::config("snapshot interval must be positive"));
        }
        let num_nodes = nx * ny;
        if self.initial_density.len() != num_nodes {
            return Err(SimError::config(format!(
                "initial density field has {} values for {num_nodes} nodes",
                self.initial_density.len()
            )));
        }
        if self.initial_velocity.len() != num_nodes {
            return Err(SimError::config(format!(
                "initial velocity field has {} values for {num_nodes} nodes",
                self.initial_velocity.len()
            )));
        }
        for spec in &self.boundary_specs {
            spec.validate(self.n, self.model)?;
        }
        for face in FACES {
            let covered = self
                .boundary_specs
                .iter()
                .any(|spec| spec.region == Region::Edge(face));
            if !covered {
                return Err(SimError::config(format!(
                    "domain edge {face:?} is not classified by any boundary spec"
                )));
            }
        }
        Ok(())
    }
}

// ----------------------------------------------------------------------------- FUNCTIONS

pub fn uniform_density(value: Float, n: [usize; 2]) -> Vec<Float> {
    vec![value; n[0] * n[1]]
}

pub fn uniform_velocity(velocity: [Float; 2], n: [usize; 2]) -> Vec<[Float; 2]> {
    vec![velocity; n[0] * n[1]]
}

/// Left/right chamber initialization: `left` density for `x < split_x`,
/// `right` from the split column on.
///
/// # Examples
/// ```
/// # use lbsim::config::split_density;
/// let density = split_density(1.5, 0.7, 2, [4, 1]);
///
/// assert_eq!(density, vec![1.5, 1.5, 0.7, 0.7]);
/// ```
pub fn split_density(left: Float, right: Float, split_x: usize, n: [usize; 2]) -> Vec<Float> {
    let [nx, ny] = n;
    let mut density = Vec::with_capacity(nx * ny);
    for _ in 0..ny {
        for x in 0..nx {
            density.push(if x < split_x { left } else { right });
        }
    }
    density
}
