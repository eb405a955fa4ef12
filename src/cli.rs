// ------------------------------------------------------------------------------- IMPORTS

use crate::error::{SimError, SimResult};
use clap::{Arg, Command};
use core_affinity::{get_core_ids, set_for_current};
use std::num::NonZeroUsize;
use std::path::PathBuf;

// ------------------------------------------------------------------------ STRUCT: Config

#[derive(Debug)]
pub struct Config {
    pub scenario: Scenario,
    pub number_of_threads: NonZeroUsize,
    pub core_affinity: bool,
    pub max_iterations: usize,
    pub write_every: usize,
    pub format: OutputFormat,
    pub output: PathBuf,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scenario {
    /// Moving lid over a closed channel, periodic sides.
    Couette,
    /// Linear inlet profile against a fixed-density outlet, free-slip top.
    ShearProfile,
    /// Two chambers at different density joined by a gap in an internal
    /// wall.
    Chamber,
    /// Pure diffusion from a held reservoir through a gap.
    Diffusion,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Csv,
    Json,
}

pub fn get_args() -> clap::ArgMatches {
    clap::command!()
        .propagate_version(true)
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("number_of_threads")
                .short('n')
                .long("num-threads")
                .value_name("NTHREADS")
                .help("The number of threads used (min = 1)")
                .value_parser(clap::value_parser!(NonZeroUsize))
                .default_value("1")
                .global(true),
        )
        .arg(
            Arg::new("core_affinity")
                .long("affinity")
                .help("Pin worker threads to cores")
                .action(clap::ArgAction::SetTrue)
                .global(true),
        )
        .subcommand(
            Command::new("run")
                .about("Run a simulation scenario")
                .arg(
                    Arg::new("scenario")
                        .value_name("SCENARIO")
                        .help("The scenario to run")
                        .value_parser(["couette", "shear-profile", "chamber", "diffusion"])
                        .required(true),
                )
                .arg(
                    Arg::new("max_iterations")
                        .long("max-iterations")
                        .value_name("ITER")
                        .help("The maximum number of iterations")
                        .value_parser(clap::value_parser!(usize))
                        .default_value("100000"),
                )
                .arg(
                    Arg::new("write_data")
                        .short('w')
                        .long("write-data")
                        .value_name("FREQUENCY")
                        .help("The frequency which snapshots are written")
                        .value_parser(clap::value_parser!(usize))
                        .default_value("100"),
                )
                .arg(
                    Arg::new("format")
                        .long("format")
                        .value_name("FORMAT")
                        .help("Snapshot file format")
                        .value_parser(["csv", "json"])
                        .default_value("csv"),
                )
                .arg(
                    Arg::new("output")
                        .short('o')
                        .long("output")
                        .value_name("DIR")
                        .help("Snapshot output directory")
                        .value_parser(clap::value_parser!(PathBuf))
                        .default_value("./data"),
                ),
        )
        .get_matches()
}

pub fn parse_matches(matches: &clap::ArgMatches) -> SimResult<Config> {
    let number_of_threads = *matches
        .get_one::<NonZeroUsize>("number_of_threads")
        .expect("Has 1 as default");
    let core_affinity = matches.get_flag("core_affinity");
    match matches.subcommand() {
        Some(("run", sub_m)) => {
            let scenario = match sub_m
                .get_one::<String>("scenario")
                .expect("Required argument")
                .as_str()
            {
                "couette" => Scenario::Couette,
                "shear-profile" => Scenario::ShearProfile,
                "chamber" => Scenario::Chamber,
                "diffusion" => Scenario::Diffusion,
                other => return Err(SimError::config(format!("unknown scenario: {other}"))),
            };
            let format = match sub_m
                .get_one::<String>("format")
                .expect("Has csv as default")
                .as_str()
            {
                "json" => OutputFormat::Json,
                _ => OutputFormat::Csv,
            };
            Ok(Config {
                scenario,
                number_of_threads,
                core_affinity,
                max_iterations: *sub_m
                    .get_one::<usize>("max_iterations")
                    .expect("Has a default"),
                write_every: *sub_m.get_one::<usize>("write_data").expect("Has a default"),
                format,
                output: sub_m
                    .get_one::<PathBuf>("output")
                    .expect("Has a default")
                    .clone(),
            })
        }
        _ => unreachable!("At least one subcommand is required: .subcommand_required(true)"),
    }
}

pub fn init_global_pool(num_threads: usize, pin_all_cores: bool) {
    if pin_all_cores {
        let cores = get_core_ids().expect("list the system cores");
        rayon::ThreadPoolBuilder::new()
            .num_threads(num_threads)
            .start_handler(move |idx| {
                let core = cores[idx % cores.len()];
                let _ = set_for_current(core);
            })
            .build_global()
            .expect("global pool already built?");
    } else {
        rayon::ThreadPoolBuilder::new()
            .num_threads(num_threads)
            .build_global()
            .expect("global pool already built?");
    };
}
