use lbsim::cli::{self, OutputFormat, Scenario};
use lbsim::io;
use lbsim::prelude::*;

fn couette_config() -> SimulationConfig {
    let mut config = SimulationConfig::resting(128, 128, D2Q9);
    config.boundary_specs = vec![
        BoundarySpec::edge(West, BoundaryKind::Periodic),
        BoundarySpec::edge(East, BoundaryKind::Periodic),
        BoundarySpec::edge(South, BoundaryKind::BounceBack),
        BoundarySpec::edge(
            North,
            BoundaryKind::VelocityInlet {
                profile: VelocityProfile::Constant([0.02, 0.0]),
            },
        ),
    ];
    config
}

fn shear_profile_config() -> SimulationConfig {
    let mut config = SimulationConfig::resting(128, 128, D2Q9);
    config.boundary_specs = vec![
        BoundarySpec::edge(
            West,
            BoundaryKind::VelocityInlet {
                profile: VelocityProfile::Linear {
                    from: [0.0, 0.0],
                    to: [0.02, 0.0],
                },
            },
        ),
        BoundarySpec::edge(
            East,
            BoundaryKind::DensityOutlet {
                density: OutletDensity::Fixed(1.0),
            },
        ),
        BoundarySpec::edge(South, BoundaryKind::BounceBack),
        BoundarySpec::edge(North, BoundaryKind::Symmetry),
    ];
    config
}

fn chamber_config() -> SimulationConfig {
    let n = [100, 100];
    let wall_x = n[0] / 4;
    let gap = [n[1] / 3, 2 * n[1] / 3 + 1];
    let mut config = SimulationConfig::resting(n[0], n[1], D2Q9);
    config.initial_density = config::split_density(1.5, 0.7, wall_x, n);
    config.boundary_specs = vec![
        BoundarySpec::edge(West, BoundaryKind::BounceBack),
        BoundarySpec::edge(East, BoundaryKind::BounceBack),
        BoundarySpec::edge(South, BoundaryKind::BounceBack),
        BoundarySpec::edge(North, BoundaryKind::BounceBack),
        BoundarySpec::obstacle(ObstacleWithGap {
            orientation: Orientation::Vertical,
            line: wall_x,
            span: [0, n[1]],
            gap,
            open: true,
        }),
        // The chambers are fed from the columns flanking the wall, outside
        // the gap rows.
        BoundarySpec::held_block([wall_x - 1, wall_x], [0, gap[0]], 1.5),
        BoundarySpec::held_block([wall_x - 1, wall_x], [gap[1], n[1]], 1.5),
        BoundarySpec::held_block([wall_x + 1, wall_x + 2], [0, gap[0]], 0.7),
        BoundarySpec::held_block([wall_x + 1, wall_x + 2], [gap[1], n[1]], 0.7),
    ];
    config
}

fn diffusion_config() -> SimulationConfig {
    let n = [100, 100];
    let wall_x = n[0] / 4;
    let mut config = SimulationConfig::resting(n[0], n[1], D2Q4);
    config.initial_density = config::split_density(1.0, 0.0, wall_x - 1, n);
    config.boundary_specs = vec![
        BoundarySpec::edge(West, BoundaryKind::BounceBack),
        BoundarySpec::edge(East, BoundaryKind::BounceBack),
        BoundarySpec::edge(South, BoundaryKind::BounceBack),
        BoundarySpec::edge(North, BoundaryKind::BounceBack),
        BoundarySpec::obstacle(ObstacleWithGap {
            orientation: Orientation::Vertical,
            line: wall_x,
            span: [0, n[1]],
            gap: [n[1] / 3, 2 * n[1] / 3 + 1],
            open: true,
        }),
        // Constant reservoir on the left of the wall.
        BoundarySpec::held_block([0, wall_x - 1], [0, n[1]], 1.0),
    ];
    config
}

fn main() {
    let cli_config = match cli::parse_matches(&cli::get_args()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    };

    cli::init_global_pool(
        usize::from(cli_config.number_of_threads),
        cli_config.core_affinity,
    );

    let mut sim_config = match cli_config.scenario {
        Scenario::Couette => couette_config(),
        Scenario::ShearProfile => shear_profile_config(),
        Scenario::Chamber => chamber_config(),
        Scenario::Diffusion => diffusion_config(),
    };
    sim_config.snapshot_interval = cli_config.write_every;

    let sink: Box<dyn SnapshotSink> = match cli_config.format {
        OutputFormat::Csv => Box::new(CsvSink::new(&cli_config.output)),
        OutputFormat::Json => Box::new(JsonSink::new(&cli_config.output)),
    };

    let mut controller = match SimulationController::with_sink(sim_config, sink) {
        Ok(controller) => controller,
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    };

    io::print_residuals_header();
    loop {
        let status = match controller.step() {
            Ok(status) => status,
            Err(e) => {
                eprintln! {"Error while stepping the simulation: {e}"};
                std::process::exit(1);
            }
        };
        let iteration = controller.get_iteration();
        if iteration % cli_config.write_every == 0 {
            io::print_residuals_line(iteration, &controller.get_residuals());
        }
        if status == Status::Converged || iteration >= cli_config.max_iterations {
            io::print_run_summary(iteration, status == Status::Converged);
            break;
        }
    }
}
