// ------------------------------------------------------------------------------- IMPORTS

use crate::BoundaryFace;
use crate::config::SimulationConfig;
use crate::constants::Float;
use crate::directions::{DirectionSet, LatticeModel, d2q9};
use crate::error::{SimError, SimResult};
use crate::lattice::{Lattice, Node};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

// --------------------------------------------------------------------- BOUNDARY SPECS

/// Target velocity along an edge: constant, or linearly interpolated from
/// `from` at the first edge node to `to` at the last.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum VelocityProfile {
    Constant([Float; 2]),
    Linear { from: [Float; 2], to: [Float; 2] },
}

impl VelocityProfile {
    pub(crate) fn at(&self, position: usize, length: usize) -> [Float; 2] {
        match self {
            VelocityProfile::Constant(velocity) => *velocity,
            VelocityProfile::Linear { from, to } => {
                let t = if length > 1 {
                    position as Float / (length - 1) as Float
                } else {
                    0.0
                };
                [
                    from[0] + (to[0] - from[0]) * t,
                    from[1] + (to[1] - from[1]) * t,
                ]
            }
        }
    }
}

/// How an open edge obtains its density: pinned to a constant target, or
/// measured from the known streamed distributions each step. Both policies
/// occur in practice for the same physical setup; the choice is part of the
/// configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum OutletDensity {
    Fixed(Float),
    Measured,
}

/// An internal wall segment with a gap window that can be opened and closed
/// between steps. Closed, the whole span reflects; open, the gap nodes
/// behave as plain interior. The affected node set is recomputed from this
/// description on every rebuild, never patched per cell.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ObstacleWithGap {
    pub orientation: Orientation,
    /// Grid line the segment lies on: an `x` column for vertical segments,
    /// a `y` row for horizontal ones.
    pub line: usize,
    /// Extent along the line, end-exclusive.
    pub span: [usize; 2],
    /// Gap window within the span, end-exclusive.
    pub gap: [usize; 2],
    pub open: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Orientation {
    Vertical,
    Horizontal,
}

impl ObstacleWithGap {
    pub(crate) fn node_indices(&self, n: [usize; 2]) -> Vec<usize> {
        let [nx, _] = n;
        (self.span[0]..self.span[1])
            .filter(|&t| !(self.open && t >= self.gap[0] && t < self.gap[1]))
            .map(|t| match self.orientation {
                Orientation::Vertical => t * nx + self.line,
                Orientation::Horizontal => self.line * nx + t,
            })
            .collect()
    }
}

/// Where a spec applies: a whole domain edge, an internal obstacle segment,
/// or a rectangular block of nodes (end-exclusive ranges).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Region {
    Edge(BoundaryFace),
    Obstacle(ObstacleWithGap),
    Block { x: [usize; 2], y: [usize; 2] },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum BoundaryKind {
    /// No correction; streaming already wrapped this edge.
    Periodic,
    /// No-slip reflection of the unknown incoming distributions.
    BounceBack,
    /// Prescribed edge velocity, density derived from the known streamed
    /// distributions.
    VelocityInlet { profile: VelocityProfile },
    /// Prescribed (or measured) edge density, normal velocity derived.
    DensityOutlet { density: OutletDensity },
    /// Free slip: unknown incoming components copied from the adjacent
    /// interior row or column.
    Symmetry,
    /// The region is re-pinned to the zero-velocity equilibrium of this
    /// density after every step, acting as an infinite reservoir.
    HeldDensity { density: Float },
}

/// One entry of the ordered boundary list. Application order is the caller's
/// declaration order: at nodes claimed by several specs (corners, obstacle
/// endpoints on an edge) the later spec overwrites the earlier one, and that
/// ordering is part of the configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoundarySpec {
    pub region: Region,
    pub kind: BoundaryKind,
}

impl BoundarySpec {
    pub fn edge(face: BoundaryFace, kind: BoundaryKind) -> Self {
        BoundarySpec {
            region: Region::Edge(face),
            kind,
        }
    }

    pub fn obstacle(obstacle: ObstacleWithGap) -> Self {
        BoundarySpec {
            region: Region::Obstacle(obstacle),
            kind: BoundaryKind::BounceBack,
        }
    }

    pub fn held_block(x: [usize; 2], y: [usize; 2], density: Float) -> Self {
        BoundarySpec {
            region: Region::Block { x, y },
            kind: BoundaryKind::HeldDensity { density },
        }
    }

    pub(crate) fn validate(&self, n: [usize; 2], model: LatticeModel) -> SimResult<()> {
        let [nx, ny] = n;
        match (&self.region, &self.kind) {
            (Region::Edge(_), BoundaryKind::Periodic)
            | (Region::Edge(_), BoundaryKind::BounceBack)
            | (Region::Edge(_), BoundaryKind::Symmetry) => Ok(()),
            (Region::Edge(face), BoundaryKind::VelocityInlet { .. })
            | (Region::Edge(face), BoundaryKind::DensityOutlet { .. }) => {
                if !model.has_edge_reconstruction() {
                    return Err(SimError::config(format!(
                        "{model:?} has no closed-form reconstruction for inlet/outlet edges ({face:?})"
                    )));
                }
                Ok(())
            }
            (Region::Obstacle(obstacle), BoundaryKind::BounceBack) => {
                let (line_limit, span_limit) = match obstacle.orientation {
                    Orientation::Vertical => (nx, ny),
                    Orientation::Horizontal => (ny, nx),
                };
                if obstacle.line >= line_limit {
                    return Err(SimError::config(format!(
                        "obstacle line {} outside the {line_limit}-wide domain",
                        obstacle.line
                    )));
                }
                if obstacle.span[0] >= obstacle.span[1] || obstacle.span[1] > span_limit {
                    return Err(SimError::config(format!(
                        "obstacle span {:?} outside the domain",
                        obstacle.span
                    )));
                }
                if obstacle.gap[0] < obstacle.span[0]
                    || obstacle.gap[1] > obstacle.span[1]
                    || obstacle.gap[0] >= obstacle.gap[1]
                {
                    return Err(SimError::config(format!(
                        "obstacle gap {:?} not contained in span {:?}",
                        obstacle.gap, obstacle.span
                    )));
                }
                Ok(())
            }
            (Region::Block { x, y }, BoundaryKind::HeldDensity { density }) => {
                if x[0] >= x[1] || x[1] > nx || y[0] >= y[1] || y[1] > ny {
                    return Err(SimError::config(format!(
                        "held block x {x:?}, y {y:?} outside the {nx}x{ny} domain"
                    )));
                }
                if *density < 0.0 {
                    return Err(SimError::config("held density must be non-negative"));
                }
                Ok(())
            }
            (region, kind) => Err(SimError::config(format!(
                "boundary kind {kind:?} cannot be applied to region {region:?}"
            ))),
        }
    }
}

// ---------------------------------------------------------------- STRUCT: BoundaryMask

/// Per-node classification materialized from the ordered spec list, later
/// specs overwriting earlier ones. Rendering layers read this; the solver
/// itself applies specs directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NodeClass {
    Interior,
    Wall,
    Inlet,
    Outlet,
    Symmetry,
    Obstacle,
    Held,
}

impl BoundaryKind {
    fn node_class(&self, region: &Region) -> Option<NodeClass> {
        match self {
            BoundaryKind::Periodic => None,
            BoundaryKind::BounceBack => match region {
                Region::Obstacle(_) => Some(NodeClass::Obstacle),
                _ => Some(NodeClass::Wall),
            },
            BoundaryKind::VelocityInlet { .. } => Some(NodeClass::Inlet),
            BoundaryKind::DensityOutlet { .. } => Some(NodeClass::Outlet),
            BoundaryKind::Symmetry => Some(NodeClass::Symmetry),
            BoundaryKind::HeldDensity { .. } => Some(NodeClass::Held),
        }
    }
}

// -------------------------------------------------------------- STRUCT: BoundaryEngine

/// Applies the ordered boundary specs after every streaming pass,
/// overwriting the provisional periodic-wrap values on every non-interior
/// node with values consistent with the configured physical boundary.
#[derive(Debug)]
pub struct BoundaryEngine {
    specs: Vec<BoundarySpec>,
    n: [usize; 2],
    spec_nodes: Vec<Vec<usize>>,
    mask: Vec<NodeClass>,
}

impl BoundaryEngine {
    pub(crate) fn new(config: &SimulationConfig) -> Self {
        let mut engine = BoundaryEngine {
            specs: config.boundary_specs.clone(),
            n: config.n,
            spec_nodes: Vec::new(),
            mask: Vec::new(),
        };
        engine.rebuild();
        engine
    }

    /// Recomputes the per-spec node sets and the mask from scratch. Cheap
    /// relative to a step; runs at construction and whenever a mutable flag
    /// (gap open/closed, inlet profile) changes.
    fn rebuild(&mut self) {
        self.spec_nodes = self
            .specs
            .iter()
            .map(|spec| nodes_for(&spec.region, self.n))
            .collect();
        let mut mask = vec![NodeClass::Interior; self.n[0] * self.n[1]];
        for (spec, nodes) in self.specs.iter().zip(self.spec_nodes.iter()) {
            if let Some(class) = spec.kind.node_class(&spec.region) {
                for &i in nodes {
                    mask[i] = class;
                }
            }
        }
        self.mask = mask;
    }

    pub fn classification(&self) -> &[NodeClass] {
        &self.mask
    }

    /// Opens or closes the gap window of every obstacle spec. Returns true
    /// if any spec changed (triggering a mask rebuild).
    pub fn set_obstacle_open(&mut self, open: bool) -> bool {
        let mut changed = false;
        for spec in &mut self.specs {
            if let Region::Obstacle(obstacle) = &mut spec.region {
                if obstacle.open != open {
                    obstacle.open = open;
                    changed = true;
                }
            }
        }
        if changed {
            self.rebuild();
        }
        changed
    }

    /// Swaps the target profile of the velocity inlet on `face`, if one is
    /// configured. Returns true on success.
    pub fn set_inlet_profile(&mut self, face: BoundaryFace, profile: VelocityProfile) -> bool {
        let mut changed = false;
        for spec in &mut self.specs {
            if spec.region == Region::Edge(face) {
                if let BoundaryKind::VelocityInlet { profile: target } = &mut spec.kind {
                    *target = profile;
                    changed = true;
                }
            }
        }
        changed
    }

    /// Walks the specs in declared order and corrects the post-streaming
    /// `f` buffer in place; no other observable effect.
    pub(crate) fn apply(&self, lattice: &Lattice) {
        let set = lattice.direction_set().as_ref();
        for (spec, nodes) in self.specs.iter().zip(self.spec_nodes.iter()) {
            match (&spec.region, &spec.kind) {
                (_, BoundaryKind::Periodic) => {}
                (Region::Edge(face), BoundaryKind::BounceBack) => {
                    nodes.par_iter().for_each(|&i| {
                        bounce_back_edge(lattice.get_node(i), face, set);
                    });
                }
                (Region::Obstacle(_), BoundaryKind::BounceBack) => {
                    nodes.par_iter().for_each(|&i| {
                        reflect_all(lattice.get_node(i), set);
                    });
                }
                (Region::Edge(face), BoundaryKind::VelocityInlet { profile }) => {
                    let length = edge_length(face, self.n);
                    nodes.par_iter().for_each(|&i| {
                        let node = lattice.get_node(i);
                        let [ux, uy] = profile.at(edge_position(face, node.get_index()), length);
                        let f =
                            d2q9::reconstruct(face, &node.get_f(), None, [Some(ux), Some(uy)]);
                        node.set_f(f);
                    });
                }
                (Region::Edge(face), BoundaryKind::DensityOutlet { density }) => {
                    let unknown_velocity = match face {
                        BoundaryFace::West | BoundaryFace::East => [None, Some(0.0)],
                        BoundaryFace::South | BoundaryFace::North => [Some(0.0), None],
                    };
                    nodes.par_iter().for_each(|&i| {
                        let node = lattice.get_node(i);
                        let f = node.get_f();
                        let rho = match density {
                            OutletDensity::Fixed(rho) => *rho,
                            OutletDensity::Measured => d2q9::edge_density(face, &f),
                        };
                        node.set_f(d2q9::reconstruct(face, &f, Some(rho), unknown_velocity));
                    });
                }
                (Region::Edge(face), BoundaryKind::Symmetry) => {
                    nodes.par_iter().for_each(|&i| {
                        symmetry_edge(lattice.get_node(i), face, set);
                    });
                }
                (Region::Block { .. }, BoundaryKind::HeldDensity { density }) => {
                    nodes.par_iter().for_each(|&i| {
                        let f = set.w().iter().map(|w_i| w_i * density).collect();
                        lattice.get_node(i).set_f(f);
                    });
                }
                _ => unreachable!("spec combination rejected at configuration time"),
            }
        }
    }
}

// ----------------------------------------------------------------------------- FUNCTIONS

/// The unknown incoming distribution opposite each outgoing direction takes
/// the post-collision value that was about to leave through the face:
/// no slip, zero wall velocity.
fn bounce_back_edge(node: &Node, face: &BoundaryFace, set: &DirectionSet) {
    let mut f = node.get_f();
    let f_star = node.get_f_star();
    for &i in set.outgoing(face) {
        f[set.opposite(i)] = f_star[i];
    }
    node.set_f(f);
}

/// Full reflection at an obstacle node: every non-rest pair is swapped, so
/// nothing passes through the segment in either direction.
fn reflect_all(node: &Node, set: &DirectionSet) {
    let mut f = node.get_f();
    let f_star = node.get_f_star();
    for i in 0..set.q() {
        if Some(i) == set.rest() {
            continue;
        }
        f[set.opposite(i)] = f_star[i];
    }
    node.set_f(f);
}

/// Free slip: the unknown incoming components mirror the adjacent interior
/// row/column, giving a zero normal derivative.
fn symmetry_edge(node: &Node, face: &BoundaryFace, set: &DirectionSet) {
    let interior = node.get_neighbor(set.inward_normal(face));
    let interior_f = interior.get_f();
    let mut f = node.get_f();
    for &i in set.outgoing(face) {
        let i_in = set.opposite(i);
        f[i_in] = interior_f[i_in];
    }
    node.set_f(f);
}

fn edge_length(face: &BoundaryFace, n: [usize; 2]) -> usize {
    match face {
        BoundaryFace::West | BoundaryFace::East => n[1],
        BoundaryFace::South | BoundaryFace::North => n[0],
    }
}

fn edge_position(face: &BoundaryFace, index: &[usize; 2]) -> usize {
    match face {
        BoundaryFace::West | BoundaryFace::East => index[1],
        BoundaryFace::South | BoundaryFace::North => index[0],
    }
}

fn nodes_for(region: &Region, n: [usize; 2]) -> Vec<usize> {
    let [nx, ny] = n;
    match region {
        Region::Edge(BoundaryFace::West) => (0..ny).map(|y| y * nx).collect(),
        Region::Edge(BoundaryFace::East) => (0..ny).map(|y| y * nx + nx - 1).collect(),
        Region::Edge(BoundaryFace::South) => (0..nx).collect(),
        Region::Edge(BoundaryFace::North) => (0..nx).map(|x| (ny - 1) * nx + x).collect(),
        Region::Obstacle(obstacle) => obstacle.node_indices(n),
        Region::Block { x, y } => (y[0]..y[1])
            .flat_map(|yy| (x[0]..x[1]).map(move |xx| yy * nx + xx))
            .collect(),
    }
}
