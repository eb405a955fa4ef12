// ------------------------------------------------------------------------------- IMPORTS

use crate::BoundaryFace;
use crate::bc::{BoundaryEngine, NodeClass, VelocityProfile};
use crate::config::SimulationConfig;
use crate::error::{SimError, SimResult};
use crate::io::{Snapshot, SnapshotSink};
use crate::lattice::Lattice;
use crate::monitor::Residuals;

// ------------------------------------------------------------------------ ENUM: Status

/// `Converged` is terminal: further `step()` calls return immediately until
/// an explicit [`reset`](SimulationController::reset).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Running,
    Converged,
}

// ------------------------------------------------------- STRUCT: SimulationController

/// Owns one lattice and its boundary engine and sequences them once per
/// step: macroscopic update, equilibrium, collision, streaming, boundary
/// correction, divergence scan, steady-state test, snapshot emission.
/// Deterministic throughout; a failed step is never retried.
pub struct SimulationController {
    lattice: Lattice,
    engine: BoundaryEngine,
    config: SimulationConfig,
    status: Status,
    iteration: usize,
    residuals: Residuals,
    sink: Option<Box<dyn SnapshotSink>>,
}

impl SimulationController {
    pub fn new(config: SimulationConfig) -> SimResult<Self> {
        config.validate()?;
        let lattice = Lattice::new(&config)?;
        lattice.initialize_nodes();
        let engine = BoundaryEngine::new(&config);
        Ok(SimulationController {
            lattice,
            engine,
            config,
            status: Status::Running,
            iteration: 0,
            residuals: Residuals::new([0.0, 0.0]),
            sink: None,
        })
    }

    pub fn with_sink(config: SimulationConfig, sink: Box<dyn SnapshotSink>) -> SimResult<Self> {
        let mut controller = SimulationController::new(config)?;
        controller.sink = Some(sink);
        Ok(controller)
    }
}

impl SimulationController {
    pub fn get_status(&self) -> Status {
        self.status
    }

    pub fn get_iteration(&self) -> usize {
        self.iteration
    }

    pub fn get_residuals(&self) -> Residuals {
        self.residuals
    }

    pub fn get_lattice(&self) -> &Lattice {
        &self.lattice
    }

    pub fn get_config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Per-node boundary classification, rebuilt whenever a mutable flag
    /// changes; read surface for rendering layers.
    pub fn classification(&self) -> &[NodeClass] {
        self.engine.classification()
    }

    /// Opens or closes every configured obstacle gap between steps.
    pub fn set_obstacle_open(&mut self, open: bool) -> bool {
        self.engine.set_obstacle_open(open)
    }

    /// Swaps the target profile of the velocity inlet on `face` between
    /// steps.
    pub fn set_inlet_profile(&mut self, face: BoundaryFace, profile: VelocityProfile) -> bool {
        self.engine.set_inlet_profile(face, profile)
    }
}

impl SimulationController {
    /// Advances the simulation by one step. Returns the status after the
    /// step; `Err(SimError::Diverged)` halts the run with the state
    /// considered corrupted.
    pub fn step(&mut self) -> SimResult<Status> {
        if self.status == Status::Converged {
            return Ok(self.status);
        }

        self.lattice.update_macroscopic_step();
        self.lattice.equilibrium_step();
        self.lattice.collision_step();
        self.lattice.streaming_step();
        self.engine.apply(&self.lattice);

        if let Some(node) = self.lattice.first_non_finite() {
            return Err(SimError::Diverged {
                step: self.iteration,
                node,
            });
        }

        self.residuals = Residuals::new(self.lattice.max_velocity_delta());
        if self.iteration >= self.config.min_iterations
            && self.residuals.below(self.config.steady_state_threshold)
        {
            self.status = Status::Converged;
        }

        if self.iteration % self.config.snapshot_interval == 0 {
            self.emit_snapshot()?;
        }

        self.lattice.store_previous_step();
        self.iteration += 1;
        Ok(self.status)
    }

    /// Steps until convergence or `max_steps`, whichever comes first, and
    /// returns the terminal iteration count.
    pub fn run(&mut self, max_steps: usize) -> SimResult<usize> {
        while self.status == Status::Running && self.iteration < max_steps {
            self.step()?;
        }
        Ok(self.iteration)
    }

    /// Discards the lattice state and rebuilds it, and the boundary engine,
    /// from the configuration. The iteration counter, convergence state and
    /// any runtime flag changes start over.
    pub fn reset(&mut self) -> SimResult<()> {
        self.lattice = Lattice::new(&self.config)?;
        self.lattice.initialize_nodes();
        self.engine = BoundaryEngine::new(&self.config);
        self.status = Status::Running;
        self.iteration = 0;
        self.residuals = Residuals::new([0.0, 0.0]);
        Ok(())
    }

    fn emit_snapshot(&self) -> SimResult<()> {
        let Some(sink) = &self.sink else {
            return Ok(());
        };
        let (rho, velocity) = self.lattice.macroscopic();
        let snapshot = Snapshot {
            iteration: self.iteration,
            n: self.config.n,
            rho,
            ux: velocity.iter().map(|u| u[0]).collect(),
            uy: velocity.iter().map(|u| u[1]).collect(),
        };
        sink.write(&snapshot)
    }
}
