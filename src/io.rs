// ------------------------------------------------------------------------------- IMPORTS

use crate::constants::Float;
use crate::error::SimResult;
use crate::monitor::Residuals;
use colored::Colorize;
use serde::Serialize;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

pub const DENSITY_FILE: &str = "density.csv";
pub const VELOCITY_FILE: &str = "velocity.csv";

// ---------------------------------------------------------------------- STRUCT: Snapshot

/// The consumed output of a run: the macroscopic fields of one step,
/// row-major, produced once per snapshot interval.
#[derive(Debug, Clone, Serialize)]
pub struct Snapshot {
    pub iteration: usize,
    pub n: [usize; 2],
    pub rho: Vec<Float>,
    pub ux: Vec<Float>,
    pub uy: Vec<Float>,
}

/// Durable storage for snapshots in a caller-chosen structured format.
pub trait SnapshotSink: Send {
    fn write(&self, snapshot: &Snapshot) -> SimResult<()>;
}

// ----------------------------------------------------------------------- STRUCT: CsvSink

/// One directory per snapshot step holding a density and a velocity table.
pub struct CsvSink {
    data_path: PathBuf,
}

impl CsvSink {
    pub fn new<P: AsRef<Path>>(data_path: P) -> Self {
        CsvSink {
            data_path: data_path.as_ref().to_path_buf(),
        }
    }
}

impl SnapshotSink for CsvSink {
    fn write(&self, snapshot: &Snapshot) -> SimResult<()> {
        let step_path = self.data_path.join(snapshot.iteration.to_string());
        fs::create_dir_all(&step_path)?;

        let mut file = File::create(step_path.join(DENSITY_FILE))?;
        writeln!(file, "density")?;
        for rho_i in &snapshot.rho {
            writeln!(file, "{rho_i:.8e}")?;
        }

        let mut file = File::create(step_path.join(VELOCITY_FILE))?;
        writeln!(file, "velocity_x,velocity_y")?;
        for (ux_i, uy_i) in snapshot.ux.iter().zip(snapshot.uy.iter()) {
            writeln!(file, "{ux_i:.8e},{uy_i:.8e}")?;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------- STRUCT: JsonSink

/// One self-describing JSON document per snapshot step.
pub struct JsonSink {
    data_path: PathBuf,
}

impl JsonSink {
    pub fn new<P: AsRef<Path>>(data_path: P) -> Self {
        JsonSink {
            data_path: data_path.as_ref().to_path_buf(),
        }
    }
}

impl SnapshotSink for JsonSink {
    fn write(&self, snapshot: &Snapshot) -> SimResult<()> {
        fs::create_dir_all(&self.data_path)?;
        let path = self
            .data_path
            .join(format!("snapshot_{:06}.json", snapshot.iteration));
        let file = File::create(path)?;
        serde_json::to_writer(file, snapshot)?;
        Ok(())
    }
}

// ----------------------------------------------------------------------------- FUNCTIONS

pub fn print_residuals_header() {
    println!(
        "\n{:>10} {:>16} {:>16}",
        "time_step".cyan().bold(),
        "residual_ux".cyan().bold(),
        "residual_uy".cyan().bold()
    );
}

pub fn print_residuals_line(iteration: usize, residuals: &Residuals) {
    println!(
        "{:>10} {:>16.8e} {:>16.8e}",
        iteration, residuals.velocity[0], residuals.velocity[1]
    );
}

pub fn print_run_summary(iterations: usize, converged: bool) {
    if converged {
        println!(
            "\n{} after {} iterations.",
            "Steady state reached".green().bold(),
            iterations.to_string().yellow().bold()
        );
    } else {
        println!(
            "\n{} after {} iterations.",
            "Stopped without convergence".yellow().bold(),
            iterations.to_string().yellow().bold()
        );
    }
}
