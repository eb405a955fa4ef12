use crate::constants::Float;
use crate::directions::DirectionSet;
use crate::kernel;
use std::sync::{Arc, RwLock};

// -------------------------------------------------------------------------- STRUCT: Node

/// One lattice site: the distribution buffers `f` (post-streaming), `f_eq`
/// and `f_star` (post-collision), the derived macroscopic fields, and the
/// periodic neighbor links set once at lattice construction.
#[derive(Debug)]
pub struct Node {
    density: RwLock<Float>,
    velocity: RwLock<[Float; 2]>,
    previous_velocity: RwLock<[Float; 2]>,
    f: RwLock<Vec<Float>>,
    f_eq: RwLock<Vec<Float>>,
    f_star: RwLock<Vec<Float>>,
    index: [usize; 2],
    set: Arc<DirectionSet>,
    neighbors: RwLock<Vec<Arc<Node>>>,
}

impl Node {
    pub fn new(density: Float, velocity: [Float; 2], index: [usize; 2], set: Arc<DirectionSet>) -> Self {
        let q = set.q();
        Node {
            density: RwLock::new(density),
            velocity: RwLock::new(velocity),
            previous_velocity: RwLock::new(velocity),
            f: RwLock::new(vec![0.0; q]),
            f_eq: RwLock::new(vec![0.0; q]),
            f_star: RwLock::new(vec![0.0; q]),
            index,
            set,
            neighbors: RwLock::new(Vec::new()),
        }
    }
}

impl Node {
    pub fn get_density(&self) -> Float {
        *self.density.read().unwrap()
    }

    pub(crate) fn set_density(&self, density: Float) {
        let mut density_guard = self.density.write().unwrap();
        *density_guard = density;
    }

    pub fn get_velocity(&self) -> [Float; 2] {
        *self.velocity.read().unwrap()
    }

    pub(crate) fn set_velocity(&self, velocity: [Float; 2]) {
        let mut velocity_guard = self.velocity.write().unwrap();
        *velocity_guard = velocity;
    }

    pub fn get_f(&self) -> Vec<Float> {
        self.f.read().unwrap().clone()
    }

    pub fn set_f(&self, f: Vec<Float>) {
        let mut f_guard = self.f.write().unwrap();
        *f_guard = f;
    }

    pub fn get_f_eq(&self) -> Vec<Float> {
        self.f_eq.read().unwrap().clone()
    }

    fn set_f_eq(&self, f_eq: Vec<Float>) {
        let mut f_eq_guard = self.f_eq.write().unwrap();
        *f_eq_guard = f_eq;
    }

    pub fn get_f_star(&self) -> Vec<Float> {
        self.f_star.read().unwrap().clone()
    }

    pub fn set_f_star(&self, f_star: Vec<Float>) {
        let mut f_star_guard = self.f_star.write().unwrap();
        *f_star_guard = f_star;
    }

    pub fn get_index(&self) -> &[usize; 2] {
        &self.index
    }

    pub(crate) fn direction_set(&self) -> &Arc<DirectionSet> {
        &self.set
    }

    pub(crate) fn set_neighbors(&self, neighbors: Vec<Arc<Node>>) {
        let mut neighbors_guard = self.neighbors.write().unwrap();
        *neighbors_guard = neighbors;
    }

    /// Neighbor along direction `i`, with periodic wraparound at the domain
    /// edges.
    pub(crate) fn get_neighbor(&self, i: usize) -> Arc<Node> {
        Arc::clone(&self.neighbors.read().unwrap()[i])
    }
}

impl Node {
    /// Density as the zeroth moment of the distributions, `rho = sum f_i`.
    pub fn compute_density(&self) {
        let f = self.get_f();
        self.set_density(f.iter().sum::<Float>());
    }

    /// Velocity as the first moment over density. A node holding no mass
    /// has zero velocity by definition, so an empty region never produces
    /// non-finite values.
    pub fn compute_velocity(&self) {
        let density = self.get_density();
        if density == 0.0 {
            self.set_velocity([0.0, 0.0]);
            return;
        }
        let f = self.get_f();
        let c = self.set.c();
        let mut momentum = [0.0; 2];
        for (f_i, c_i) in f.iter().zip(c.iter()) {
            momentum[0] += f_i * c_i[0] as Float;
            momentum[1] += f_i * c_i[1] as Float;
        }
        self.set_velocity([momentum[0] / density, momentum[1] / density]);
    }

    pub fn compute_equilibrium(&self) {
        let f_eq = kernel::equilibrium(self.get_density(), self.get_velocity(), &self.set);
        self.set_f_eq(f_eq);
    }

    pub fn compute_bgk_collision(&self, tau: Float) {
        let f_star = kernel::bgk_collision(&self.get_f(), &self.get_f_eq(), tau);
        self.set_f_star(f_star);
    }

    /// $$ f\_{i}(\mathbf{x}+\mathbf{c}\_{i}\Delta t, t+\Delta t) = f\_{i}^{\star}(\mathbf{x},t) $$
    ///
    /// Pull form: the value arriving here along direction `i` left the
    /// neighbor at `x - c_i` before this pass, so the pass reads only
    /// `f_star` and writes only `f`.
    pub fn compute_streaming(&self) {
        let q = self.set.q();
        let neighbors = self.neighbors.read().unwrap();
        let mut f = vec![0.0; q];
        for (i, f_i) in f.iter_mut().enumerate() {
            *f_i = neighbors[self.set.opposite(i)].get_f_star()[i];
        }
        drop(neighbors);
        self.set_f(f);
    }

    pub(crate) fn is_finite(&self) -> bool {
        self.f.read().unwrap().iter().all(|f_i| f_i.is_finite())
    }

    pub(crate) fn store_previous_velocity(&self) {
        let velocity = self.get_velocity();
        let mut previous_guard = self.previous_velocity.write().unwrap();
        *previous_guard = velocity;
    }

    /// Componentwise |u - u_prev| against the snapshot taken by
    /// [`store_previous_velocity`](Node::store_previous_velocity).
    pub(crate) fn velocity_delta(&self) -> [Float; 2] {
        let velocity = self.get_velocity();
        let previous = *self.previous_velocity.read().unwrap();
        [
            (velocity[0] - previous[0]).abs(),
            (velocity[1] - previous[1]).abs(),
        ]
    }
}
