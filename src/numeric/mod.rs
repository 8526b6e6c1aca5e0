//! Elementwise numeric helpers
//!
//! # Organization
//!
//! - [`division`]: division that substitutes a fallback where the divisor is ~0
//! - [`heaviside`]: unit step function with a selectable value at zero
//! - [`around`]: rounding to a power of ten

pub mod around;
pub mod division;
pub mod heaviside;

pub use around::{around, PowTen, RoundingMode};
pub use division::{div, division, division_scalar, DivisionOptions};
pub use heaviside::{heaviside, HeavisideMode};
