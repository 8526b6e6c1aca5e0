//! Quality-control flags packed into the decimal digits of an integer
//!
//! A flag code such as `9201` is read most-significant digit first: the
//! leading `9` is the primary code and every following digit is one
//! sub-flag (`0` ok, `1` warning, `2` error). Non-positive values such as
//! `-9999` mark missing observations.
//!
//! # Organization
//!
//! - [`digits`]: scalar digit arithmetic on a single code
//! - [`codec`]: elementwise array operations built on top of it
//!
//! ```
//! use hydrokit::flags::{get_flag, max_flag_default, set_flag};
//! use ndarray::arr1;
//!
//! let flags = arr1(&[9_i64, 90, 9201, -9999]);
//! assert_eq!(get_flag(&flags, 1), arr1(&[-1, 0, 2, -2]));
//! assert_eq!(max_flag_default(&flags), arr1(&[-1, 0, 2, -2]));
//!
//! let set = set_flag(&arr1(&[9_i64, 901]), 1, 2, None).unwrap();
//! assert_eq!(set, arr1(&[92, 921]));
//! ```

pub mod codec;
pub mod digits;

pub use codec::{
    codes_from_f64, get_flag, get_flag_digits, max_flag, max_flag_default, set_flag,
    set_flag_inplace,
};
pub use digits::{digit_count, flag_digit, set_digit, FlagDigit};

use thiserror::Error;

/// Canonical sentinel for a missing observation
pub const MISSING_FLAG: i64 = -9999;

/// Conventional primary code digit
pub const PRIMARY_CODE: i64 = 9;

/// Number of sub-flag positions scanned by [`max_flag_default`]
pub const DEFAULT_SUBFLAG_COUNT: usize = 18;

/// Input outside the flag codec's domain
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum FlagError {
    /// Position 0 holds the primary code and is not a sub-flag
    #[error("position 0 is the primary code and cannot be set")]
    PrimaryPosition,

    /// A sub-flag is a single decimal digit
    #[error("flag value {value} is not a single decimal digit")]
    InvalidDigit { value: u8 },

    /// Missing or negative codes carry no sub-flags to set
    #[error("cannot set sub-flags on non-positive code {code}")]
    NonPositive { code: i64 },

    /// Extending or updating the code would not fit in an i64
    #[error("setting position {position} of code {code} overflows i64")]
    Overflow { code: i64, position: usize },

    /// Selected flat index lies outside the array
    #[error("index {index} out of bounds for {len} flags")]
    IndexOutOfBounds { index: usize, len: usize },

    /// Floating-point value cannot be a flag code
    #[error("value {value} is not an integer flag code")]
    NonInteger { value: f64 },
}
