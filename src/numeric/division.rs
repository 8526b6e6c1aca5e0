//! Division with a zero guard

use crate::errors::{HydroError, Result};
use ndarray::{Array, ArrayBase, Data, Dimension, Zip};

/// Options for [`division`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DivisionOptions {
    /// Value returned where the divisor is too small
    pub otherwise: f64,
    /// Divisors with `|b| <= |prec|` count as zero
    pub prec: f64,
}

impl DivisionOptions {
    /// Options with a custom fallback value and exact-zero guard
    #[must_use]
    pub fn otherwise(otherwise: f64) -> Self {
        Self {
            otherwise,
            prec: 0.0,
        }
    }

    /// Sets the zero threshold
    #[must_use]
    pub fn with_prec(mut self, prec: f64) -> Self {
        self.prec = prec;
        self
    }
}

impl Default for DivisionOptions {
    fn default() -> Self {
        Self {
            otherwise: f64::NAN,
            prec: 0.0,
        }
    }
}

/// Computes `a / b` where `|b| > |prec|` and `otherwise` elsewhere.
///
/// `b` is broadcast to the shape of `a`.
///
/// # Errors
///
/// Returns [`HydroError::ShapeMismatch`] if `b` cannot be broadcast to `a`.
pub fn division<S1, S2, D, E>(
    a: &ArrayBase<S1, D>,
    b: &ArrayBase<S2, E>,
    options: &DivisionOptions,
) -> Result<Array<f64, D>>
where
    S1: Data<Elem = f64>,
    S2: Data<Elem = f64>,
    D: Dimension,
    E: Dimension,
{
    let b = b
        .broadcast(a.raw_dim())
        .ok_or_else(|| HydroError::ShapeMismatch {
            expected: a.shape().to_vec(),
            found: b.shape().to_vec(),
        })?;

    let prec = options.prec.abs();
    let otherwise = options.otherwise;
    Ok(Zip::from(a)
        .and(b)
        .par_map_collect(|&x, &y| if y.abs() > prec { x / y } else { otherwise }))
}

/// [`division`] by a single divisor.
pub fn division_scalar<S, D>(a: &ArrayBase<S, D>, b: f64, options: &DivisionOptions) -> Array<f64, D>
where
    S: Data<Elem = f64>,
    D: Dimension,
{
    let prec = options.prec.abs();
    if b.abs() > prec {
        a.mapv(|x| x / b)
    } else {
        Array::from_elem(a.raw_dim(), options.otherwise)
    }
}

/// Short alias for [`division`].
///
/// # Errors
///
/// Same as [`division`].
pub fn div<S1, S2, D, E>(
    a: &ArrayBase<S1, D>,
    b: &ArrayBase<S2, E>,
    options: &DivisionOptions,
) -> Result<Array<f64, D>>
where
    S1: Data<Elem = f64>,
    S2: Data<Elem = f64>,
    D: Dimension,
    E: Dimension,
{
    division(a, b, options)
}
