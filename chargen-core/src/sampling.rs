//! Small random helpers shared by the selectors.

use rand::Rng;

/// True with probability `p`. Values outside [0, 1] saturate and NaN is
/// never true.
pub fn chance<R: Rng + ?Sized>(rng: &mut R, p: f64) -> bool {
    rng.gen::<f64>() < p
}
