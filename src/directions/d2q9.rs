use crate::BoundaryFace;
use crate::constants::Float;

pub(super) const Q: usize = 9;

pub(super) const C: [[i32; 2]; Q] = [
    [0, 0],
    [1, 0],
    [0, 1],
    [-1, 0],
    [0, -1],
    [1, 1],
    [-1, 1],
    [-1, -1],
    [1, -1],
];

pub(super) const W: [Float; Q] = [
    4.0 / 9.0,
    1.0 / 9.0,
    1.0 / 9.0,
    1.0 / 9.0,
    1.0 / 9.0,
    1.0 / 36.0,
    1.0 / 36.0,
    1.0 / 36.0,
    1.0 / 36.0,
];

pub(super) const Q_BAR: [usize; Q] = [0, 3, 4, 1, 2, 7, 8, 5, 6];

const Q_WEST: [usize; 3] = [3, 6, 7];

const Q_EAST: [usize; 3] = [1, 5, 8];

const Q_SOUTH: [usize; 3] = [4, 7, 8];

const Q_NORTH: [usize; 3] = [2, 5, 6];

pub(super) const Q_FACES: [[usize; 3]; 4] = [Q_WEST, Q_EAST, Q_SOUTH, Q_NORTH];

/// Density of an edge node from its known (streamed) distributions, assuming
/// zero velocity normal to the face.
pub(crate) fn edge_density(face: &BoundaryFace, f: &[Float]) -> Float {
    match face {
        BoundaryFace::West => f[0] + f[2] + f[4] + 2.0 * (f[3] + f[6] + f[7]),
        BoundaryFace::East => f[0] + f[2] + f[4] + 2.0 * (f[1] + f[5] + f[8]),
        BoundaryFace::South => f[0] + f[1] + f[3] + 2.0 * (f[4] + f[7] + f[8]),
        BoundaryFace::North => f[0] + f[1] + f[3] + 2.0 * (f[2] + f[5] + f[6]),
    }
}

/// Closed-form reconstruction of the three unknown edge distributions from
/// either a prescribed velocity (density derived from the known components)
/// or a prescribed density (normal velocity derived). The combination not
/// covered by an arm is rejected at configuration time.
pub(crate) fn reconstruct(
    face: &BoundaryFace,
    f: &[Float],
    density: Option<Float>,
    velocity: [Option<Float>; 2],
) -> Vec<Float> {
    let mut f = f.to_owned();
    match face {
        BoundaryFace::West => match (density, velocity) {
            (None, [Some(ux), Some(uy)]) => {
                let rho = 1.0 / (1.0 - ux) * (f[0] + f[2] + f[4] + 2.0 * (f[3] + f[6] + f[7]));
                f[1] = f[3] + (2.0 / 3.0) * rho * ux;
                f[5] = f[7] - 0.5 * (f[2] - f[4]) + 0.5 * rho * uy + (1.0 / 6.0) * rho * ux;
                f[8] = f[6] + 0.5 * (f[2] - f[4]) - 0.5 * rho * uy + (1.0 / 6.0) * rho * ux;
            }
            (Some(rho), [None, Some(uy)]) => {
                let ux = 1.0 - 1.0 / rho * (f[0] + f[2] + f[4] + 2.0 * (f[3] + f[6] + f[7]));
                f[1] = f[3] + (2.0 / 3.0) * rho * ux;
                f[5] = f[7] - 0.5 * (f[2] - f[4]) + 0.5 * rho * uy + (1.0 / 6.0) * rho * ux;
                f[8] = f[6] + 0.5 * (f[2] - f[4]) - 0.5 * rho * uy + (1.0 / 6.0) * rho * ux;
            }
            _ => unreachable!("edge reconstruction target rejected at configuration time"),
        },
        BoundaryFace::East => match (density, velocity) {
            (None, [Some(ux), Some(uy)]) => {
                let rho = 1.0 / (1.0 + ux) * (f[0] + f[2] + f[4] + 2.0 * (f[1] + f[5] + f[8]));
                f[3] = f[1] - (2.0 / 3.0) * rho * ux;
                f[7] = f[5] + 0.5 * (f[2] - f[4]) - 0.5 * rho * uy - (1.0 / 6.0) * rho * ux;
                f[6] = f[8] - 0.5 * (f[2] - f[4]) + 0.5 * rho * uy - (1.0 / 6.0) * rho * ux;
            }
            (Some(rho), [None, Some(uy)]) => {
                let ux = 1.0 / rho * (f[0] + f[2] + f[4] + 2.0 * (f[1] + f[5] + f[8])) - 1.0;
                f[3] = f[1] - (2.0 / 3.0) * rho * ux;
                f[7] = f[5] + 0.5 * (f[2] - f[4]) - 0.5 * rho * uy - (1.0 / 6.0) * rho * ux;
                f[6] = f[8] - 0.5 * (f[2] - f[4]) + 0.5 * rho * uy - (1.0 / 6.0) * rho * ux;
            }
            _ => unreachable!("edge reconstruction target rejected at configuration time"),
        },
        BoundaryFace::South => match (density, velocity) {
            (None, [Some(ux), Some(uy)]) => {
                let rho = 1.0 / (1.0 - uy) * (f[0] + f[1] + f[3] + 2.0 * (f[4] + f[7] + f[8]));
                f[2] = f[4] + (2.0 / 3.0) * rho * uy;
                f[5] = f[7] - 0.5 * (f[1] - f[3]) + 0.5 * rho * ux + (1.0 / 6.0) * rho * uy;
                f[6] = f[8] + 0.5 * (f[1] - f[3]) - 0.5 * rho * ux + (1.0 / 6.0) * rho * uy;
            }
            (Some(rho), [Some(ux), None]) => {
                let uy = 1.0 - 1.0 / rho * (f[0] + f[1] + f[3] + 2.0 * (f[4] + f[7] + f[8]));
                f[2] = f[4] + (2.0 / 3.0) * rho * uy;
                f[5] = f[7] - 0.5 * (f[1] - f[3]) + 0.5 * rho * ux + (1.0 / 6.0) * rho * uy;
                f[6] = f[8] + 0.5 * (f[1] - f[3]) - 0.5 * rho * ux + (1.0 / 6.0) * rho * uy;
            }
            _ => unreachable!("edge reconstruction target rejected at configuration time"),
        },
        BoundaryFace::North => match (density, velocity) {
            (None, [Some(ux), Some(uy)]) => {
                let rho = 1.0 / (1.0 + uy) * (f[0] + f[1] + f[3] + 2.0 * (f[2] + f[5] + f[6]));
                f[4] = f[2] - (2.0 / 3.0) * rho * uy;
                f[7] = f[5] + 0.5 * (f[1] - f[3]) - 0.5 * rho * ux - (1.0 / 6.0) * rho * uy;
                f[8] = f[6] - 0.5 * (f[1] - f[3]) + 0.5 * rho * ux - (1.0 / 6.0) * rho * uy;
            }
            (Some(rho), [Some(ux), None]) => {
                let uy = 1.0 / rho * (f[0] + f[1] + f[3] + 2.0 * (f[2] + f[5] + f[6])) - 1.0;
                f[4] = f[2] - (2.0 / 3.0) * rho * uy;
                f[7] = f[5] + 0.5 * (f[1] - f[3]) - 0.5 * rho * ux - (1.0 / 6.0) * rho * uy;
                f[8] = f[6] - 0.5 * (f[1] - f[3]) + 0.5 * rho * ux - (1.0 / 6.0) * rho * uy;
            }
            _ => unreachable!("edge reconstruction target rejected at configuration time"),
        },
    }
    f
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reconstruct_north_recovers_prescribed_velocity() {
        // A uniform resting state reconstructed with a lid velocity must
        // carry the prescribed momentum on the edge node.
        let rho = 1.0;
        let f = W.iter().map(|w_i| w_i * rho).collect::<Vec<Float>>();

        let f = reconstruct(&BoundaryFace::North, &f, None, [Some(0.02), Some(0.0)]);

        let density = f.iter().sum::<Float>();
        let ux = f
            .iter()
            .zip(C.iter())
            .map(|(f_i, c_i)| f_i * c_i[0] as Float)
            .sum::<Float>()
            / density;
        let uy = f
            .iter()
            .zip(C.iter())
            .map(|(f_i, c_i)| f_i * c_i[1] as Float)
            .sum::<Float>()
            / density;
        assert!((ux - 0.02).abs() < 1e-12);
        assert!(uy.abs() < 1e-12);
    }

    #[test]
    fn test_reconstruct_east_with_prescribed_density() {
        let f = W.to_vec();

        let f = reconstruct(&BoundaryFace::East, &f, Some(1.0), [None, Some(0.0)]);

        // The resting equilibrium already has unit density, so the derived
        // outflow velocity is zero and the state is unchanged.
        for (f_i, w_i) in f.iter().zip(W.iter()) {
            assert!((f_i - w_i).abs() < 1e-12);
        }
    }

    #[test]
    fn test_edge_density_of_resting_state() {
        let f = W.to_vec();
        for face in crate::FACES {
            assert!((edge_density(&face, &f) - 1.0).abs() < 1e-12);
        }
    }
}
