pub type Float = f64;

pub const DELTA_T: Float = 1.0;

pub const DELTA_X: Float = 1.0;

pub const CS_2: Float = 1.0 / 3.0 * DELTA_X * DELTA_X / DELTA_T / DELTA_T;

pub const CS_2_INV: Float = 3.0;

pub const CS_4_INV: Float = 9.0;

/// Relaxation times at or below this value are a known divergence risk for
/// the BGK operator; they are not rejected, only reported by the caller.
pub const TAU_STABILITY_LIMIT: Float = 0.5;

pub(crate) const TOLERANCE_WEIGHTS: Float = 1e-12;
