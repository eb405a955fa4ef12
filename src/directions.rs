// ------------------------------------------------------------------------------- MODULES

pub(crate) mod d2q4;
pub(crate) mod d2q9;

// ------------------------------------------------------------------------------- IMPORTS

use crate::constants::{Float, TOLERANCE_WEIGHTS};
use crate::error::{SimError, SimResult};
use crate::{BoundaryFace, FACES};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Discrete velocity models. `D2Q9` carries a rest direction plus four axis
/// and four diagonal velocities and supports advective flow; `D2Q4` has the
/// four axis velocities only and is used for pure diffusion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LatticeModel {
    D2Q9,
    D2Q4,
}

impl LatticeModel {
    /// Materializes and checks the direction tables for this model.
    pub fn direction_set(&self) -> SimResult<DirectionSet> {
        let set = match self {
            LatticeModel::D2Q9 => DirectionSet {
                model: LatticeModel::D2Q9,
                q: d2q9::Q,
                c: d2q9::C.to_vec(),
                w: d2q9::W.to_vec(),
                q_bar: d2q9::Q_BAR.to_vec(),
                q_faces: FACES
                    .iter()
                    .zip(d2q9::Q_FACES.iter())
                    .map(|(face, dirs)| (*face, dirs.to_vec()))
                    .collect(),
                inward_normals: HashMap::from([
                    (BoundaryFace::West, 1),
                    (BoundaryFace::East, 3),
                    (BoundaryFace::South, 2),
                    (BoundaryFace::North, 4),
                ]),
                rest: Some(0),
            },
            LatticeModel::D2Q4 => DirectionSet {
                model: LatticeModel::D2Q4,
                q: d2q4::Q,
                c: d2q4::C.to_vec(),
                w: d2q4::W.to_vec(),
                q_bar: d2q4::Q_BAR.to_vec(),
                q_faces: FACES
                    .iter()
                    .zip(d2q4::Q_FACES.iter())
                    .map(|(face, dirs)| (*face, dirs.to_vec()))
                    .collect(),
                inward_normals: HashMap::from([
                    (BoundaryFace::West, 0),
                    (BoundaryFace::East, 1),
                    (BoundaryFace::South, 2),
                    (BoundaryFace::North, 3),
                ]),
                rest: None,
            },
        };
        set.validate()?;
        Ok(set)
    }

    /// Whether the equilibrium distribution carries the velocity expansion.
    /// The diffusion model relaxes toward `w_i * rho` alone.
    pub fn is_advective(&self) -> bool {
        matches!(self, LatticeModel::D2Q9)
    }

    /// Whether the model has closed-form boundary reconstruction for
    /// prescribed-velocity and prescribed-density edges.
    pub fn has_edge_reconstruction(&self) -> bool {
        matches!(self, LatticeModel::D2Q9)
    }
}

// --------------------------------------------------------------------- STRUCT: DirectionSet

/// Immutable per-model direction tables: velocity vectors `c`, weights `w`,
/// the opposite-direction permutation `q_bar`, and for each domain face the
/// directions pointing out through it.
#[derive(Debug, Clone, PartialEq)]
pub struct DirectionSet {
    pub(crate) model: LatticeModel,
    pub(crate) q: usize,
    pub(crate) c: Vec<[i32; 2]>,
    pub(crate) w: Vec<Float>,
    pub(crate) q_bar: Vec<usize>,
    pub(crate) q_faces: HashMap<BoundaryFace, Vec<usize>>,
    pub(crate) inward_normals: HashMap<BoundaryFace, usize>,
    pub(crate) rest: Option<usize>,
}

impl DirectionSet {
    pub fn model(&self) -> LatticeModel {
        self.model
    }

    pub fn q(&self) -> usize {
        self.q
    }

    pub fn c(&self) -> &[[i32; 2]] {
        &self.c
    }

    pub fn w(&self) -> &[Float] {
        &self.w
    }

    pub fn opposite(&self, direction: usize) -> usize {
        self.q_bar[direction]
    }

    pub fn rest(&self) -> Option<usize> {
        self.rest
    }

    /// Directions whose velocity vectors point out of the domain through
    /// `face`; their opposites are the unknowns after streaming.
    pub(crate) fn outgoing(&self, face: &BoundaryFace) -> &[usize] {
        self.q_faces.get(face).expect("face directions not tabled")
    }

    /// Direction index pointing from `face` into the domain interior.
    pub(crate) fn inward_normal(&self, face: &BoundaryFace) -> usize {
        *self
            .inward_normals
            .get(face)
            .expect("face normal not tabled")
    }

    /// Checks the structural invariants of the tables: weights normalized,
    /// opposite map an involution pairing `c_i` with `-c_i`, and the rest
    /// direction (when present) its own opposite.
    pub fn validate(&self) -> SimResult<()> {
        if self.c.len() != self.q || self.w.len() != self.q || self.q_bar.len() != self.q {
            return Err(SimError::config(format!(
                "direction tables disagree on size (q = {})",
                self.q
            )));
        }
        let weight_sum = self.w.iter().sum::<Float>();
        if (weight_sum - 1.0).abs() > TOLERANCE_WEIGHTS {
            return Err(SimError::config(format!(
                "direction weights sum to {weight_sum}, expected 1"
            )));
        }
        for i in 0..self.q {
            let i_bar = self.q_bar[i];
            if i_bar >= self.q || self.q_bar[i_bar] != i {
                return Err(SimError::config(format!(
                    "opposite map is not an involution at direction {i}"
                )));
            }
            if self.c[i_bar][0] != -self.c[i][0] || self.c[i_bar][1] != -self.c[i][1] {
                return Err(SimError::config(format!(
                    "opposite of direction {i} does not negate its velocity"
                )));
            }
        }
        if let Some(rest) = self.rest {
            if self.c[rest] != [0, 0] || self.q_bar[rest] != rest {
                return Err(SimError::config(
                    "rest direction must be null and self-opposite",
                ));
            }
        }
        Ok(())
    }
}
