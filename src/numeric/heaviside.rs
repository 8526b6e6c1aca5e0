//! Heaviside (unit step) function

use ndarray::{Array, ArrayBase, Data, Dimension, Zip};

/// Value of the step function at exactly zero
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HeavisideMode {
    /// `H(0) = 1/2`
    #[default]
    Half,
    /// `H(0) = 1`
    UnitStep,
    /// `H(0) = 0`
    Zero,
}

impl HeavisideMode {
    const fn at_zero(self) -> f64 {
        match self {
            Self::Half => 0.5,
            Self::UnitStep => 1.0,
            Self::Zero => 0.0,
        }
    }
}

/// Computes `value * H(x)` with `H(x < 0) = 0` and `H(x > 0) = 1`.
///
/// NaN inputs stay NaN.
pub fn heaviside<S, D>(x: &ArrayBase<S, D>, value: f64, mode: HeavisideMode) -> Array<f64, D>
where
    S: Data<Elem = f64>,
    D: Dimension,
{
    let at_zero = mode.at_zero();
    Zip::from(x).par_map_collect(|&x| {
        let step = if x.is_nan() {
            f64::NAN
        } else if x > 0.0 {
            1.0
        } else if x < 0.0 {
            0.0
        } else {
            at_zero
        };
        step * value
    })
}
