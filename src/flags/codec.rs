//! Elementwise flag operations over n-dimensional arrays
//!
//! Every element is independent, so the loops run on rayon through
//! `ndarray`'s parallel `Zip`. Inputs are never modified; each operation
//! returns a freshly allocated array of the same shape.

use super::digits::{flag_digit, set_digit, FlagDigit};
use super::{FlagError, DEFAULT_SUBFLAG_COUNT, MISSING_FLAG};
use crate::errors::Result;
use ndarray::{Array, ArrayBase, Data, DataMut, Dimension, Zip};
use tracing::debug;

/// Highest digit position of a positive `i64`
const MAX_POSITION: usize = 18;

/// Extracts the flag at position `n` of every code.
///
/// Returns `-2` for missing codes (<= 0), `-1` where the code has fewer
/// than `n + 1` digits, and the digit otherwise. Position 0 is the primary
/// code.
pub fn get_flag<S, D>(flags: &ArrayBase<S, D>, n: usize) -> Array<i64, D>
where
    S: Data<Elem = i64>,
    D: Dimension,
{
    Zip::from(flags).par_map_collect(|&code| flag_digit(code, n).to_legacy())
}

/// Like [`get_flag`] but keeps the tagged [`FlagDigit`] form.
pub fn get_flag_digits<S, D>(flags: &ArrayBase<S, D>, n: usize) -> Array<FlagDigit, D>
where
    S: Data<Elem = i64>,
    D: Dimension,
{
    Zip::from(flags).par_map_collect(|&code| flag_digit(code, n))
}

/// Sets the flag at position `n` to `iflag`.
///
/// `indices` are flat indices in logical (row-major) order; `None` selects
/// every element. Selected codes shorter than `n + 1` digits are padded
/// with zero digits first. Unselected codes are copied unchanged.
///
/// # Errors
///
/// Returns [`HydroError::InvalidFlag`](crate::errors::HydroError::InvalidFlag)
/// if `n` is 0, `iflag` is not a decimal digit, an index is out of bounds,
/// a selected code is not positive, or a result overflows `i64`. Nothing
/// is returned partially updated.
pub fn set_flag<S, D>(
    flags: &ArrayBase<S, D>,
    n: usize,
    iflag: u8,
    indices: Option<&[usize]>,
) -> Result<Array<i64, D>>
where
    S: Data<Elem = i64>,
    D: Dimension,
{
    let selected = selection_mask(flags.raw_dim(), indices)?;

    let updated = Zip::from(flags)
        .and(&selected)
        .par_map_collect(|&code, &sel| if sel { set_digit(code, n, iflag) } else { Ok(code) });

    let mut out = Array::zeros(flags.raw_dim());
    for (slot, result) in out.iter_mut().zip(updated.iter()) {
        *slot = (*result)?;
    }

    debug!(
        "Set flag position {n} to {iflag} on {} of {} codes",
        selected.iter().filter(|&&s| s).count(),
        flags.len()
    );
    Ok(out)
}

/// In-place variant of [`set_flag`]; `flags` is untouched on error.
///
/// # Errors
///
/// Same conditions as [`set_flag`].
pub fn set_flag_inplace<S, D>(
    flags: &mut ArrayBase<S, D>,
    n: usize,
    iflag: u8,
    indices: Option<&[usize]>,
) -> Result<()>
where
    S: DataMut<Elem = i64>,
    D: Dimension,
{
    let updated = set_flag(&flags.view(), n, iflag, indices)?;
    flags.assign(&updated);
    Ok(())
}

/// Overall flag of every code: the maximum over sub-flag positions
/// `1..=positions`.
///
/// Yields `2` if any sub-flag is 2, `1` if any is 1, `0` if all present
/// sub-flags are 0, `-1` for a bare primary code and `-2` for missing
/// codes.
pub fn max_flag<S, D>(flags: &ArrayBase<S, D>, positions: usize) -> Array<i64, D>
where
    S: Data<Elem = i64>,
    D: Dimension,
{
    Zip::from(flags).par_map_collect(|&code| {
        (1..=positions.min(MAX_POSITION))
            .map(|n| flag_digit(code, n))
            .fold(FlagDigit::Missing, Ord::max)
            .to_legacy()
    })
}

/// [`max_flag`] over the conventional [`DEFAULT_SUBFLAG_COUNT`] positions.
pub fn max_flag_default<S, D>(flags: &ArrayBase<S, D>) -> Array<i64, D>
where
    S: Data<Elem = i64>,
    D: Dimension,
{
    max_flag(flags, DEFAULT_SUBFLAG_COUNT)
}

/// Converts floating-point flag values (as stored in many netCDF files)
/// to integer codes. Non-finite values and values outside the `i64` range,
/// such as the netCDF default fill `9.96921e36`, become [`MISSING_FLAG`].
///
/// # Errors
///
/// Returns [`FlagError::NonInteger`] for fractional values.
pub fn codes_from_f64<S, D>(values: &ArrayBase<S, D>) -> Result<Array<i64, D>>
where
    S: Data<Elem = f64>,
    D: Dimension,
{
    let mut out = Array::zeros(values.raw_dim());
    for (slot, &value) in out.iter_mut().zip(values.iter()) {
        *slot = code_from_f64(value)?;
    }
    Ok(out)
}

fn code_from_f64(value: f64) -> std::result::Result<i64, FlagError> {
    if !value.is_finite() || value.abs() >= i64::MAX as f64 {
        return Ok(MISSING_FLAG);
    }
    if value.fract() != 0.0 {
        return Err(FlagError::NonInteger { value });
    }
    #[allow(clippy::cast_possible_truncation)]
    Ok(value as i64)
}

fn selection_mask<D: Dimension>(dim: D, indices: Option<&[usize]>) -> Result<Array<bool, D>> {
    let Some(indices) = indices else {
        return Ok(Array::from_elem(dim, true));
    };

    let len = dim.size();
    let mut mask = vec![false; len];
    for &index in indices {
        if index >= len {
            return Err(FlagError::IndexOutOfBounds { index, len }.into());
        }
        mask[index] = true;
    }
    Ok(Array::from_shape_vec(dim, mask)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::HydroError;
    use ndarray::{arr1, arr2};

    #[test]
    fn get_flag_reads_each_position() {
        let flags = arr1(&[9_i64, 90, 91, 900, 901, 9001, 9201, 912121212]);
        assert_eq!(get_flag(&flags, 0), arr1(&[9_i64, 9, 9, 9, 9, 9, 9, 9]));
        assert_eq!(get_flag(&flags, 1), arr1(&[-1_i64, 0, 1, 0, 0, 0, 2, 1]));
        assert_eq!(get_flag(&flags, 2), arr1(&[-1_i64, -1, -1, 0, 1, 0, 0, 2]));
        assert_eq!(get_flag(&flags, 3), arr1(&[-1_i64, -1, -1, -1, -1, 1, 1, 1]));
        assert_eq!(get_flag(&flags, 4), arr1(&[-1_i64, -1, -1, -1, -1, -1, -1, 2]));
    }

    #[test]
    fn get_flag_marks_missing_codes() {
        let flags = arr1(&[-9999_i64, 0, -5, 92]);
        assert_eq!(get_flag(&flags, 1), arr1(&[-2_i64, -2, -2, 2]));
        assert_eq!(get_flag(&flags, 0), arr1(&[-2_i64, -2, -2, 9]));
    }

    #[test]
    fn get_flag_keeps_shape() {
        let flags = arr2(&[[9_i64, 91], [9201, -9999]]);
        assert_eq!(get_flag(&flags, 1), arr2(&[[-1_i64, 1], [2, -2]]));
    }

    #[test]
    fn set_flag_on_selected_indices() {
        let flags = arr1(&[9_i64, 90, 901, 9101, 912121212]);
        let set = set_flag(&flags, 1, 2, Some(&[0, 1, 2])).unwrap();
        assert_eq!(set, arr1(&[92_i64, 92, 921, 9101, 912121212]));
        // input is untouched
        assert_eq!(flags, arr1(&[9_i64, 90, 901, 9101, 912121212]));
    }

    #[test]
    fn set_flag_extends_short_codes() {
        let flags = arr1(&[9_i64, 90, 901, 9101, 912121212]);
        let set = set_flag(&flags, 3, 2, Some(&[0, 1, 2, 3])).unwrap();
        assert_eq!(set, arr1(&[9002_i64, 9002, 9012, 9102, 912121212]));
    }

    #[test]
    fn set_flag_on_all_elements() {
        let flags = arr1(&[9_i64, 90, 901, 9101, 912121212]);
        let set = set_flag(&flags, 1, 2, None).unwrap();
        assert_eq!(set, arr1(&[92_i64, 92, 921, 9201, 922121212]));
    }

    #[test]
    fn set_flag_ignores_sentinels_outside_selection() {
        let flags = arr1(&[-9999_i64, 90]);
        let set = set_flag(&flags, 1, 1, Some(&[1])).unwrap();
        assert_eq!(set, arr1(&[-9999_i64, 91]));
    }

    #[test]
    fn set_flag_rejects_selected_sentinel() {
        let flags = arr1(&[-9999_i64, 90]);
        let err = set_flag(&flags, 1, 1, None).unwrap_err();
        assert!(matches!(
            err,
            HydroError::InvalidFlag(FlagError::NonPositive { code: -9999 })
        ));
    }

    #[test]
    fn set_flag_rejects_out_of_bounds_index() {
        let flags = arr1(&[9_i64, 90]);
        let err = set_flag(&flags, 1, 1, Some(&[2])).unwrap_err();
        assert!(matches!(
            err,
            HydroError::InvalidFlag(FlagError::IndexOutOfBounds { index: 2, len: 2 })
        ));
    }

    #[test]
    fn set_flag_uses_row_major_indices() {
        let flags = arr2(&[[9_i64, 9], [9, 9]]);
        let set = set_flag(&flags, 1, 1, Some(&[1, 2])).unwrap();
        assert_eq!(set, arr2(&[[9_i64, 91], [91, 9]]));
    }

    #[test]
    fn set_flag_inplace_leaves_input_on_error() {
        let mut flags = arr1(&[9_i64, -9999]);
        assert!(set_flag_inplace(&mut flags, 1, 2, None).is_err());
        assert_eq!(flags, arr1(&[9_i64, -9999]));

        set_flag_inplace(&mut flags, 1, 2, Some(&[0])).unwrap();
        assert_eq!(flags, arr1(&[92_i64, -9999]));
    }

    #[test]
    fn max_flag_precedence() {
        let flags = arr1(&[9_i64, 90, 91, 900, 901, 9001, 9201, 912121212, -9999]);
        assert_eq!(
            max_flag_default(&flags),
            arr1(&[-1_i64, 0, 1, 0, 1, 1, 2, 2, -2])
        );
    }

    #[test]
    fn max_flag_respects_position_limit() {
        let flags = arr1(&[9002_i64, 9100]);
        assert_eq!(max_flag(&flags, 2), arr1(&[0_i64, 1]));
        assert_eq!(max_flag(&flags, 3), arr1(&[2_i64, 1]));
        assert_eq!(max_flag(&flags, 0), arr1(&[-2_i64, -2]));
    }

    #[test]
    fn codes_from_f64_converts_integral_values() {
        let values = arr1(&[9.0, 9201.0, f64::NAN, -9999.0]);
        assert_eq!(
            codes_from_f64(&values).unwrap(),
            arr1(&[9_i64, 9201, MISSING_FLAG, -9999])
        );
        assert!(codes_from_f64(&arr1(&[90.5])).is_err());
    }

    #[test]
    fn codes_from_f64_reads_default_fill_as_missing() {
        let values = arr1(&[9201.0, 9.969_209_968_386_869e36, -1e300]);
        let codes = codes_from_f64(&values).unwrap();
        assert_eq!(codes, arr1(&[9201_i64, MISSING_FLAG, MISSING_FLAG]));
        assert_eq!(max_flag_default(&codes), arr1(&[2_i64, -2, -2]));
    }

    #[test]
    fn max_flag_positions_beyond_i64_digits() {
        let flags = arr1(&[9_i64, 9201, 912121212, i64::MAX, -9999]);
        assert_eq!(max_flag(&flags, usize::MAX), max_flag(&flags, MAX_POSITION));
        assert_eq!(max_flag(&flags, usize::MAX), arr1(&[-1_i64, 2, 2, 8, -2]));
    }
}
