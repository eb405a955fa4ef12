use crate::constants::{CS_2_INV, CS_4_INV, DELTA_T, Float};
use crate::directions::DirectionSet;

/// $$ f\_{i}^{\text{eq}} = w\_{i}\rho\left[1+\frac{\mathbf{u}\cdot\mathbf{c}\_{i}}{c\_{s}^{2}}+\frac{\left(\mathbf{u}\cdot\mathbf{c}\_{i}\right)^{2}}{2 c\_{s}^{4}}-\frac{\mathbf{u}\cdot\mathbf{u}}{2 c\_{s}^{2}}\right] $$
///
/// Non-advective models relax toward the weighted density alone,
/// $ f\_{i}^{\text{eq}} = w\_{i}\rho $.
pub(crate) fn equilibrium(density: Float, velocity: [Float; 2], set: &DirectionSet) -> Vec<Float> {
    let q = set.q();
    let c = set.c();
    let w = set.w();
    let mut f_eq = Vec::with_capacity(q);
    if !set.model().is_advective() {
        (0..q).for_each(|i| {
            f_eq.push(w[i] * density);
        });
        return f_eq;
    }
    let u_dot_u = velocity[0] * velocity[0] + velocity[1] * velocity[1];
    (0..q).for_each(|i| {
        let u_dot_c = velocity[0] * c[i][0] as Float + velocity[1] * c[i][1] as Float;
        f_eq.push(
            w[i] * density
                * (1.0 + u_dot_c * CS_2_INV + 0.5 * u_dot_c * u_dot_c * CS_4_INV
                    - 0.5 * u_dot_u * CS_2_INV),
        );
    });
    f_eq
}

/// $$ f\_{i}^{\star} = f\_{i} + \frac{\Delta t}{\tau}\left(f\_{i}^{\text{eq}} - f\_{i}\right) $$
pub(crate) fn bgk_collision(f: &[Float], f_eq: &[Float], tau: Float) -> Vec<Float> {
    let omega = DELTA_T / tau;
    let omega_prime = 1.0 - omega;
    f.iter()
        .zip(f_eq.iter())
        .map(|(f_i, f_eq_i)| omega_prime * f_i + omega * f_eq_i)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::directions::LatticeModel;

    #[test]
    fn test_equilibrium_at_rest_is_weighted_density() {
        let set = LatticeModel::D2Q9.direction_set().unwrap();

        let f_eq = equilibrium(0.9, [0.0, 0.0], &set);

        let target = [0.4, 0.1, 0.1, 0.1, 0.1, 0.025, 0.025, 0.025, 0.025];
        for (a, b) in f_eq.iter().zip(target.iter()) {
            assert!((a - b).abs() < 1e-12);
        }
    }

    #[test]
    fn test_equilibrium_conserves_density_and_momentum() {
        let set = LatticeModel::D2Q9.direction_set().unwrap();
        let density = 1.2;
        let velocity = [0.05, -0.03];

        let f_eq = equilibrium(density, velocity, &set);

        let rho = f_eq.iter().sum::<Float>();
        assert!((rho - density).abs() < 1e-12);
        for x in 0..2 {
            let momentum = f_eq
                .iter()
                .zip(set.c().iter())
                .map(|(f_i, c_i)| f_i * c_i[x] as Float)
                .sum::<Float>();
            assert!((momentum - density * velocity[x]).abs() < 1e-12);
        }
    }

    #[test]
    fn test_diffusion_equilibrium_ignores_velocity() {
        let set = LatticeModel::D2Q4.direction_set().unwrap();

        let f_eq = equilibrium(0.8, [0.1, 0.2], &set);

        for f_eq_i in f_eq {
            assert!((f_eq_i - 0.2).abs() < 1e-12);
        }
    }

    #[test]
    fn test_collision_fixed_point_at_equilibrium() {
        let set = LatticeModel::D2Q9.direction_set().unwrap();
        let f_eq = equilibrium(1.0, [0.1, 0.05], &set);

        let f_star = bgk_collision(&f_eq, &f_eq, 0.7);

        for (a, b) in f_star.iter().zip(f_eq.iter()) {
            assert!((a - b).abs() < 1e-15);
        }
    }

    #[test]
    fn test_collision_relaxation_rate() {
        let f = vec![0.1; 9];
        let f_eq = vec![0.2; 9];

        let f_star = bgk_collision(&f, &f_eq, 2.0);

        for f_star_i in f_star {
            assert!((f_star_i - 0.15).abs() < 1e-12);
        }
    }
}
