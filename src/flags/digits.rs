//! Scalar digit arithmetic on a single flag code
//!
//! Digit counts come from [`i64::ilog10`], so exact powers of ten such as
//! `1000` never suffer the rounding that a floating-point `log10` would.

use super::FlagError;
use std::fmt;

/// Outcome of reading one digit position of a flag code
///
/// Variant order gives the aggregation order used by
/// [`max_flag`](super::max_flag): `Missing < Absent < Digit(0) < ... < Digit(9)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FlagDigit {
    /// The code is a missing-data sentinel (<= 0)
    Missing,
    /// The code is valid but has no digit at this position
    Absent,
    /// Decimal digit at the requested position
    Digit(u8),
}

impl FlagDigit {
    /// Integer encoding used by legacy flag arrays: `-2`, `-1` or the digit.
    #[must_use]
    pub const fn to_legacy(self) -> i64 {
        match self {
            Self::Missing => -2,
            Self::Absent => -1,
            Self::Digit(d) => d as i64,
        }
    }

    /// Inverse of [`to_legacy`](Self::to_legacy); `None` outside `-2..=9`.
    #[must_use]
    pub const fn from_legacy(value: i64) -> Option<Self> {
        match value {
            -2 => Some(Self::Missing),
            -1 => Some(Self::Absent),
            0..=9 => Some(Self::Digit(value as u8)),
            _ => None,
        }
    }

    /// The digit, if one is present.
    #[must_use]
    pub const fn digit(self) -> Option<u8> {
        match self {
            Self::Digit(d) => Some(d),
            _ => None,
        }
    }
}

impl fmt::Display for FlagDigit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Missing => write!(f, "missing"),
            Self::Absent => write!(f, "absent"),
            Self::Digit(d) => write!(f, "{d}"),
        }
    }
}

/// Number of decimal digits of a positive code, `None` for sentinels.
#[must_use]
pub fn digit_count(code: i64) -> Option<usize> {
    (code > 0).then(|| code.ilog10() as usize + 1)
}

/// Reads the digit at position `n`, where position 0 is the primary code.
#[must_use]
pub fn flag_digit(code: i64, n: usize) -> FlagDigit {
    if code <= 0 {
        return FlagDigit::Missing;
    }
    let top = code.ilog10() as usize;
    if n > top {
        return FlagDigit::Absent;
    }
    // top - n <= 18 for any i64, so the power cannot overflow
    let place = 10_i64.pow((top - n) as u32);
    FlagDigit::Digit(((code / place) % 10) as u8)
}

/// Returns `code` with the digit at position `n` replaced by `value`.
///
/// Codes shorter than `n + 1` digits are first padded with zero digits, so
/// `set_digit(9, 3, 2)` is `9002`.
///
/// # Errors
///
/// Returns a [`FlagError`] if `n` is 0, `value` is not a decimal digit,
/// `code` is not positive, or the result does not fit in an `i64`.
pub fn set_digit(code: i64, n: usize, value: u8) -> Result<i64, FlagError> {
    if n == 0 {
        return Err(FlagError::PrimaryPosition);
    }
    if value > 9 {
        return Err(FlagError::InvalidDigit { value });
    }
    if code <= 0 {
        return Err(FlagError::NonPositive { code });
    }

    let overflow = FlagError::Overflow { code, position: n };

    let mut extended = code;
    let mut top = code.ilog10() as usize;
    if top < n {
        let shift = u32::try_from(n - top).map_err(|_| overflow)?;
        extended = 10_i64
            .checked_pow(shift)
            .and_then(|scale| code.checked_mul(scale))
            .ok_or(overflow)?;
        top = n;
    }

    let current = match flag_digit(extended, n) {
        FlagDigit::Digit(d) => i64::from(d),
        _ => 0,
    };
    let place = 10_i64.pow((top - n) as u32);
    place
        .checked_mul(i64::from(value) - current)
        .and_then(|delta| extended.checked_add(delta))
        .ok_or(overflow)
}
