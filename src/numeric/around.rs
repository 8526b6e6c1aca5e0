//! Rounding to a power of ten
//!
//! `around(x, 3)` rounds to thousands, `around(x, -3)` to three decimals.
//! The exponent has the opposite sign of a "decimals" argument.

use crate::errors::{HydroError, Result};
use ndarray::{Array, ArrayBase, ArrayD, Data, Dimension, Zip};

/// Direction of rounding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RoundingMode {
    /// Nearest multiple, ties to even
    #[default]
    Nearest,
    /// Towards positive infinity
    Ceil,
    /// Towards negative infinity
    Floor,
}

/// Power-of-ten exponent, shared or one per element
#[derive(Debug, Clone, PartialEq)]
pub enum PowTen {
    Scalar(i32),
    PerElement(ArrayD<i32>),
}

impl Default for PowTen {
    fn default() -> Self {
        Self::Scalar(0)
    }
}

/// Tolerance for ceil/floor after scaling
const NUDGE: f64 = 10.0 * f64::MIN_POSITIVE;

fn round_one(x: f64, powten: i32, mode: RoundingMode) -> f64 {
    let shifted = x * 10_f64.powi(-powten);
    let rounded = match mode {
        RoundingMode::Nearest => shifted.round_ties_even(),
        RoundingMode::Ceil => (shifted - NUDGE).ceil(),
        RoundingMode::Floor => (shifted + NUDGE).floor(),
    };
    rounded * 10_f64.powi(powten)
}

/// Rounds every value to a multiple of `10^powten`.
///
/// # Errors
///
/// Returns [`HydroError::ShapeMismatch`] when a per-element exponent array
/// does not have the shape of `num`.
pub fn around<S, D>(num: &ArrayBase<S, D>, powten: &PowTen, mode: RoundingMode) -> Result<Array<f64, D>>
where
    S: Data<Elem = f64>,
    D: Dimension,
{
    match powten {
        PowTen::Scalar(p) => {
            let p = *p;
            Ok(Zip::from(num).par_map_collect(|&x| round_one(x, p, mode)))
        }
        PowTen::PerElement(exponents) => {
            if exponents.shape() != num.shape() {
                return Err(HydroError::ShapeMismatch {
                    expected: num.shape().to_vec(),
                    found: exponents.shape().to_vec(),
                });
            }
            let num_dyn = num.view().into_dyn();
            let rounded = Zip::from(&num_dyn)
                .and(exponents)
                .par_map_collect(|&x, &p| round_one(x, p, mode));
            Ok(rounded.into_dimensionality::<D>()?)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{arr1, ArrayD};

    fn assert_close(actual: &Array<f64, ndarray::Ix1>, expected: &[f64]) {
        for (a, e) in actual.iter().zip(expected) {
            assert!((a - e).abs() <= 1e-9 * e.abs().max(1.0), "{a} != {e}");
        }
    }

    #[test]
    fn rounds_to_decimals() {
        let out = around(&arr1(&[3.5967, 345.5967]), &PowTen::Scalar(-3), RoundingMode::Nearest).unwrap();
        assert_close(&out, &[3.597, 345.597]);
    }

    #[test]
    fn per_element_exponents() {
        let num = arr1(&[1994344.0, 345.5967]);
        let powten = PowTen::PerElement(ArrayD::from_shape_vec(vec![2], vec![3, -3]).unwrap());

        let nearest = around(&num, &powten, RoundingMode::Nearest).unwrap();
        assert_close(&nearest, &[1994000.0, 345.597]);

        let ceil = around(&num, &powten, RoundingMode::Ceil).unwrap();
        assert_close(&ceil, &[1995000.0, 345.597]);

        let floor = around(&num, &powten, RoundingMode::Floor).unwrap();
        assert_close(&floor, &[1994000.0, 345.596]);
    }

    #[test]
    fn coarse_exponent() {
        let num = arr1(&[3.5967, 345.5967]);
        let nearest = around(&num, &PowTen::Scalar(3), RoundingMode::Nearest).unwrap();
        assert_close(&nearest, &[0.0, 0.0]);
        let ceil = around(&num, &PowTen::Scalar(3), RoundingMode::Ceil).unwrap();
        assert_close(&ceil, &[1000.0, 1000.0]);
    }

    #[test]
    fn ties_round_to_even() {
        let out = around(&arr1(&[1.5, 2.5, -0.5]), &PowTen::default(), RoundingMode::Nearest).unwrap();
        assert_eq!(out, arr1(&[2.0, 2.0, -0.0]));
    }

    #[test]
    fn rejects_mismatched_exponents() {
        let powten = PowTen::PerElement(ArrayD::from_shape_vec(vec![3], vec![0, 0, 0]).unwrap());
        assert!(around(&arr1(&[1.0, 2.0]), &powten, RoundingMode::Floor).is_err());
    }
}
