use thiserror::Error;

pub type SimResult<T> = Result<T, SimError>;

/// Failure modes of a simulation run.
///
/// `Config` is raised at construction time and is fatal: the simulation never
/// starts. `Diverged` halts a running simulation as soon as a non-finite
/// distribution value is detected; the lattice state is considered corrupted
/// and no automatic retry is attempted.
#[derive(Debug, Error)]
pub enum SimError {
    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("simulation diverged at step {step}: non-finite distribution at node {node}")]
    Diverged { step: usize, node: usize },

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl SimError {
    pub fn config(message: impl Into<String>) -> Self {
        SimError::Config(message.into())
    }
}
