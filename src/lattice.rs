// ------------------------------------------------------------------------------- MODULES

mod node;

// ------------------------------------------------------------------------------- IMPORTS

use crate::config::SimulationConfig;
use crate::constants::{Float, TAU_STABILITY_LIMIT};
use crate::directions::DirectionSet;
use crate::error::SimResult;
use colored::Colorize;
pub use node::Node;
use rayon::prelude::*;
use std::sync::Arc;

// ----------------------------------------------------------------------- STRUCT: Lattice

/// The grid of distribution-function nodes, exclusively owned by one
/// controller for the duration of a step. Every whole-lattice stage below is
/// a data-parallel pass with no intra-stage dependency: collision reads `f`
/// and `f_eq` and writes `f_star`, streaming reads neighbors' `f_star` and
/// writes the node's own `f`, so stage boundaries are the only
/// synchronization points.
#[derive(Debug)]
pub struct Lattice {
    nodes: Vec<Arc<Node>>,
    n: [usize; 2],
    set: Arc<DirectionSet>,
    tau: Float,
}

impl Lattice {
    /// Builds the node grid with periodic neighbor links and the configured
    /// initial macroscopic fields. The distributions are left zeroed; call
    /// [`initialize_nodes`](Lattice::initialize_nodes) before stepping.
    pub fn new(config: &SimulationConfig) -> SimResult<Self> {
        let set = Arc::new(config.model.direction_set()?);
        let [nx, ny] = config.n;
        let num_nodes = nx * ny;

        if config.tau <= TAU_STABILITY_LIMIT {
            println!(
                "{}",
                format!(
                    "Relaxation time {} is at or below the stability limit {TAU_STABILITY_LIMIT}; the run may diverge.",
                    config.tau
                )
                .yellow()
                .bold()
            );
        }

        let nodes = (0..num_nodes)
            .map(|i| {
                let index = [i % nx, i / nx];
                Arc::new(Node::new(
                    config.initial_density[i],
                    config.initial_velocity[i],
                    index,
                    Arc::clone(&set),
                ))
            })
            .collect::<Vec<Arc<Node>>>();

        nodes.iter().for_each(|node| {
            let [x, y] = *node.get_index();
            let neighbors = set
                .c()
                .iter()
                .map(|c_i| {
                    let nb_x = (x as i32 + c_i[0]).rem_euclid(nx as i32) as usize;
                    let nb_y = (y as i32 + c_i[1]).rem_euclid(ny as i32) as usize;
                    Arc::clone(&nodes[nb_y * nx + nb_x])
                })
                .collect::<Vec<Arc<Node>>>();
            node.set_neighbors(neighbors);
        });

        Ok(Lattice {
            nodes,
            n: config.n,
            set,
            tau: config.tau,
        })
    }
}

impl Lattice {
    pub fn get_nodes(&self) -> &Vec<Arc<Node>> {
        &self.nodes
    }

    pub fn get_node(&self, i: usize) -> &Arc<Node> {
        &self.nodes[i]
    }

    pub fn get_node_at(&self, x: usize, y: usize) -> &Arc<Node> {
        &self.nodes[y * self.n[0] + x]
    }

    pub fn get_nx(&self) -> usize {
        self.n[0]
    }

    pub fn get_ny(&self) -> usize {
        self.n[1]
    }

    pub fn get_number_of_nodes(&self) -> usize {
        self.nodes.len()
    }

    pub fn get_tau(&self) -> Float {
        self.tau
    }

    pub(crate) fn direction_set(&self) -> &Arc<DirectionSet> {
        &self.set
    }

    /// Density and velocity of every node in one pass, row-major. This is
    /// the read surface for snapshot and rendering layers.
    pub fn macroscopic(&self) -> (Vec<Float>, Vec<[Float; 2]>) {
        let density = self.nodes.iter().map(|node| node.get_density()).collect();
        let velocity = self.nodes.iter().map(|node| node.get_velocity()).collect();
        (density, velocity)
    }
}

impl Lattice {
    /// Sets every node's distributions to the equilibrium of its current
    /// macroscopic fields, making the initial state a collision fixed point.
    pub fn initialize_nodes(&self) {
        self.nodes.par_iter().for_each(|node| {
            node.compute_equilibrium();
            node.set_f(node.get_f_eq());
            node.store_previous_velocity();
        });
    }

    /// Re-pins the macroscopic fields to the given values and rebuilds the
    /// equilibrium state from them.
    pub fn set_equilibrium(&self, density: &[Float], velocity: &[[Float; 2]]) {
        self.nodes.par_iter().enumerate().for_each(|(i, node)| {
            node.set_density(density[i]);
            node.set_velocity(velocity[i]);
            node.compute_equilibrium();
            node.set_f(node.get_f_eq());
            node.store_previous_velocity();
        });
    }

    pub fn update_macroscopic_step(&self) {
        self.nodes.par_iter().for_each(|node| {
            node.compute_density();
            node.compute_velocity();
        });
    }

    pub fn equilibrium_step(&self) {
        self.nodes.par_iter().for_each(|node| {
            node.compute_equilibrium();
        });
    }

    pub fn collision_step(&self) {
        self.nodes.par_iter().for_each(|node| {
            node.compute_bgk_collision(self.tau);
        });
    }

    pub fn streaming_step(&self) {
        self.nodes.par_iter().for_each(|node| {
            node.compute_streaming();
        });
    }

    pub fn store_previous_step(&self) {
        self.nodes.par_iter().for_each(|node| {
            node.store_previous_velocity();
        });
    }

    /// Largest componentwise velocity change since the previous stored
    /// step, over all nodes.
    pub fn max_velocity_delta(&self) -> [Float; 2] {
        self.nodes
            .par_iter()
            .map(|node| node.velocity_delta())
            .reduce(
                || [0.0, 0.0],
                |a, b| [a[0].max(b[0]), a[1].max(b[1])],
            )
    }

    /// Index of the first node carrying a non-finite distribution value,
    /// if any.
    pub fn first_non_finite(&self) -> Option<usize> {
        self.nodes
            .par_iter()
            .position_first(|node| !node.is_finite())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config;
    use crate::prelude::*;

    fn periodic_config(nx: usize, ny: usize) -> SimulationConfig {
        SimulationConfig {
            n: [nx, ny],
            model: D2Q9,
            boundary_specs: vec![
                BoundarySpec::edge(West, BoundaryKind::Periodic),
                BoundarySpec::edge(East, BoundaryKind::Periodic),
                BoundarySpec::edge(South, BoundaryKind::Periodic),
                BoundarySpec::edge(North, BoundaryKind::Periodic),
            ],
            ..SimulationConfig::resting(nx, ny, D2Q9)
        }
    }

    #[test]
    fn test_neighbor_links_wrap_periodically() {
        let lattice = Lattice::new(&periodic_config(10, 10)).unwrap();

        let node = lattice.get_node_at(9, 9);
        assert_eq!(node.get_neighbor(0).get_index(), &[9, 9]);
        assert_eq!(node.get_neighbor(1).get_index(), &[0, 9]);
        assert_eq!(node.get_neighbor(2).get_index(), &[9, 0]);
        assert_eq!(node.get_neighbor(3).get_index(), &[8, 9]);
        assert_eq!(node.get_neighbor(4).get_index(), &[9, 8]);
        assert_eq!(node.get_neighbor(5).get_index(), &[0, 0]);

        let node = lattice.get_node_at(3, 7);
        assert_eq!(node.get_neighbor(8).get_index(), &[4, 6]);
    }

    #[test]
    fn test_streaming_moves_values_along_directions() {
        let lattice = Lattice::new(&periodic_config(5, 4)).unwrap();
        lattice.get_nodes().iter().enumerate().for_each(|(i, node)| {
            let f_star = (0..9).map(|k| i as Float + 0.01 * k as Float).collect();
            node.set_f_star(f_star);
        });

        lattice.streaming_step();

        let nx = lattice.get_nx() as i32;
        let ny = lattice.get_ny() as i32;
        let c = lattice.direction_set().c().to_vec();
        for node in lattice.get_nodes() {
            let [x, y] = *node.get_index();
            let f = node.get_f();
            for (i, c_i) in c.iter().enumerate() {
                let src_x = (x as i32 - c_i[0]).rem_euclid(nx) as usize;
                let src_y = (y as i32 - c_i[1]).rem_euclid(ny) as usize;
                let expected = lattice.get_node_at(src_x, src_y).get_f_star()[i];
                assert_eq!(f[i], expected);
            }
        }
    }

    #[test]
    fn test_streaming_round_trip_on_periodic_grid() {
        // Pushing every value back along the opposite direction recovers
        // the pre-streaming buffer exactly.
        let lattice = Lattice::new(&periodic_config(6, 6)).unwrap();
        lattice.get_nodes().iter().enumerate().for_each(|(i, node)| {
            let f_star = (0..9).map(|k| (i * 9 + k) as Float).collect();
            node.set_f_star(f_star);
        });

        lattice.streaming_step();

        let set = Arc::clone(lattice.direction_set());
        for node in lattice.get_nodes() {
            let original = node.get_f_star();
            // Reverse pull: the value that left this node along i is now at
            // the neighbor in direction i.
            for i in 0..set.q() {
                let carried = node.get_neighbor(i).get_f()[i];
                assert_eq!(carried, original[i]);
            }
        }
    }

    #[test]
    fn test_initialize_nodes_reproduces_initial_density() {
        let mut cfg = periodic_config(4, 4);
        cfg.initial_density = config::uniform_density(1.25, [4, 4]);
        let lattice = Lattice::new(&cfg).unwrap();

        lattice.initialize_nodes();
        lattice.update_macroscopic_step();

        for node in lattice.get_nodes() {
            assert!((node.get_density() - 1.25).abs() < 1e-12);
            assert_eq!(node.get_velocity(), [0.0, 0.0]);
        }
    }

    #[test]
    fn test_set_equilibrium_overwrites_fields() {
        let lattice = Lattice::new(&periodic_config(3, 3)).unwrap();
        lattice.initialize_nodes();
        let density = vec![0.5; 9];
        let velocity = vec![[0.01, -0.02]; 9];

        lattice.set_equilibrium(&density, &velocity);
        lattice.update_macroscopic_step();

        for node in lattice.get_nodes() {
            assert!((node.get_density() - 0.5).abs() < 1e-12);
            let [ux, uy] = node.get_velocity();
            assert!((ux - 0.01).abs() < 1e-12);
            assert!((uy - (-0.02)).abs() < 1e-12);
        }
    }

    #[test]
    fn test_first_non_finite_reports_poisoned_node() {
        let lattice = Lattice::new(&periodic_config(4, 4)).unwrap();
        lattice.initialize_nodes();
        assert_eq!(lattice.first_non_finite(), None);

        let mut f = lattice.get_node(7).get_f();
        f[2] = Float::NAN;
        lattice.get_node(7).set_f(f);

        assert_eq!(lattice.first_non_finite(), Some(7));
    }
}
