use lbsim::prelude::*;

fn edges(kinds: [BoundaryKind; 4]) -> Vec<BoundarySpec> {
    let [west, east, south, north] = kinds;
    vec![
        BoundarySpec::edge(West, west),
        BoundarySpec::edge(East, east),
        BoundarySpec::edge(South, south),
        BoundarySpec::edge(North, north),
    ]
}

/// A closed box with no inlet, outlet or gap forgets any initial motion:
/// the steady state is zero velocity everywhere.
#[test]
fn enclosed_box_decays_to_rest() {
    let mut config = SimulationConfig::resting(12, 12, D2Q9);
    config.tau = 0.8;
    config.steady_state_threshold = 1e-9;
    config.initial_velocity = config::uniform_velocity([0.05, 0.0], [12, 12]);
    config.boundary_specs = edges([
        BoundaryKind::BounceBack,
        BoundaryKind::BounceBack,
        BoundaryKind::BounceBack,
        BoundaryKind::BounceBack,
    ]);

    let mut controller = SimulationController::new(config).unwrap();
    controller.run(50_000).unwrap();

    assert_eq!(controller.get_status(), Status::Converged);
    let (_, velocity) = controller.get_lattice().macroscopic();
    for [ux, uy] in velocity {
        assert!(ux.abs() < 1e-5);
        assert!(uy.abs() < 1e-5);
    }
}

/// Couette-like flow: lid velocity 0.02 on the north edge, no-slip floor,
/// periodic sides. The converged horizontal-velocity profile grows
/// monotonically from the floor to the lid.
#[test]
fn couette_profile_is_monotone() {
    let (nx, ny) = (16, 24);
    let mut config = SimulationConfig::resting(nx, ny, D2Q9);
    config.steady_state_threshold = 1e-7;
    config.boundary_specs = edges([
        BoundaryKind::Periodic,
        BoundaryKind::Periodic,
        BoundaryKind::BounceBack,
        BoundaryKind::VelocityInlet {
            profile: VelocityProfile::Constant([0.02, 0.0]),
        },
    ]);

    let mut controller = SimulationController::new(config).unwrap();
    controller.run(40_000).unwrap();
    assert_eq!(controller.get_status(), Status::Converged);

    let lattice = controller.get_lattice();
    let profile = (0..ny)
        .map(|y| {
            (0..nx)
                .map(|x| lattice.get_node_at(x, y).get_velocity()[0])
                .sum::<Float>()
                / nx as Float
        })
        .collect::<Vec<Float>>();

    for window in profile.windows(2) {
        assert!(
            window[1] >= window[0] - 1e-8,
            "profile not monotone: {window:?}"
        );
    }
    assert!(profile[0] < 0.005);
    assert!(profile[ny - 1] > 0.015);
}

fn diffusion_config(nx: usize, ny: usize, wall_x: usize, gap: [usize; 2]) -> SimulationConfig {
    let mut config = SimulationConfig::resting(nx, ny, D2Q4);
    config.initial_density = config::split_density(1.0, 0.0, wall_x - 1, [nx, ny]);
    config.steady_state_threshold = 1e-300;
    config.boundary_specs = edges([
        BoundaryKind::BounceBack,
        BoundaryKind::BounceBack,
        BoundaryKind::BounceBack,
        BoundaryKind::BounceBack,
    ]);
    config.boundary_specs.push(BoundarySpec::obstacle(ObstacleWithGap {
        orientation: Orientation::Vertical,
        line: wall_x,
        span: [0, ny],
        gap,
        open: true,
    }));
    config
        .boundary_specs
        .push(BoundarySpec::held_block([0, wall_x - 1], [0, ny], 1.0));
    config
}

/// Diffusion through an open gap: density appears directly behind the gap
/// window while the region shadowed by the solid section, out of reach of
/// the spreading front, holds exactly zero.
#[test]
fn diffusion_passes_through_open_gap_only() {
    let (nx, ny, wall_x) = (40, 60, 10);
    let config = diffusion_config(nx, ny, wall_x, [28, 32]);

    let mut controller = SimulationController::new(config).unwrap();
    controller.run(20).unwrap();

    controller.get_lattice().update_macroscopic_step();
    let lattice = controller.get_lattice();
    let behind_gap = lattice.get_node_at(wall_x + 1, 30).get_density();
    let behind_wall = lattice.get_node_at(wall_x + 1, 4).get_density();

    assert!(behind_gap > 0.0, "no mass passed the open gap");
    assert_eq!(behind_wall, 0.0, "mass leaked through the solid section");
}

/// With the gap closed before the first step, the right chamber stays
/// empty everywhere.
#[test]
fn closed_gap_blocks_diffusion() {
    let (nx, ny, wall_x) = (40, 60, 10);
    let config = diffusion_config(nx, ny, wall_x, [28, 32]);

    let mut controller = SimulationController::new(config).unwrap();
    assert!(controller.set_obstacle_open(false));
    controller.run(50).unwrap();

    controller.get_lattice().update_macroscopic_step();
    let lattice = controller.get_lattice();
    for y in 0..ny {
        let rho = lattice.get_node_at(wall_x + 1, y).get_density();
        assert_eq!(rho, 0.0, "mass crossed a closed wall at y = {y}");
    }
}

/// Channel driven by a constant west inlet against a measured-density east
/// outlet: eastward flow develops and every value stays finite.
#[test]
fn inlet_against_measured_outlet_drives_flow() {
    let (nx, ny) = (20, 10);
    let mut config = SimulationConfig::resting(nx, ny, D2Q9);
    config.steady_state_threshold = 1e-9;
    config.boundary_specs = vec![
        BoundarySpec::edge(
            West,
            BoundaryKind::VelocityInlet {
                profile: VelocityProfile::Constant([0.01, 0.0]),
            },
        ),
        BoundarySpec::edge(
            East,
            BoundaryKind::DensityOutlet {
                density: OutletDensity::Measured,
            },
        ),
        BoundarySpec::edge(South, BoundaryKind::BounceBack),
        BoundarySpec::edge(North, BoundaryKind::Symmetry),
    ];

    let mut controller = SimulationController::new(config).unwrap();
    controller.run(3000).unwrap();

    let lattice = controller.get_lattice();
    assert_eq!(lattice.first_non_finite(), None);
    let center = lattice.get_node_at(nx / 2, ny / 2).get_velocity();
    assert!(center[0] > 1e-4, "no eastward flow developed: {center:?}");
}

/// The spec order decides shared corner nodes: reversing two entries is a
/// different, still valid, configuration.
#[test]
fn corner_ownership_follows_declaration_order() {
    let mut config = SimulationConfig::resting(8, 8, D2Q9);
    config.boundary_specs = edges([
        BoundaryKind::Periodic,
        BoundaryKind::Periodic,
        BoundaryKind::BounceBack,
        BoundaryKind::VelocityInlet {
            profile: VelocityProfile::Constant([0.02, 0.0]),
        },
    ]);
    let controller = SimulationController::new(config.clone()).unwrap();
    let nw_corner = 7 * 8;
    assert_eq!(controller.classification()[nw_corner], NodeClass::Inlet);

    config.boundary_specs.swap(2, 3);
    config.boundary_specs.swap(1, 2);
    // North now declared before South; the south-west corner keeps Wall,
    // the north row is claimed by the inlet except where nothing later
    // overlaps it.
    let controller = SimulationController::new(config).unwrap();
    assert_eq!(controller.classification()[0], NodeClass::Wall);
    assert_eq!(controller.classification()[nw_corner], NodeClass::Inlet);
}
