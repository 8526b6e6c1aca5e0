//! hydrokit: utilities for hydro-meteorological observation data
//!
//! The core of the crate is the quality-flag codec in [`flags`]: each flag
//! is an integer whose decimal digits are sub-flags, read and written
//! elementwise over n-dimensional arrays in parallel.
//!
//! ## Module Organization
//!
//! - [`flags`]: reading, setting and aggregating digit-packed flags
//! - [`numeric`]: safe division, Heaviside step and power-of-ten rounding
//! - [`netcdf_reader`]: variables, codes, units and data of NetCDF files
//! - [`netcdf_io`]: writing derived flag arrays to NetCDF
//! - [`metadata`]: printed summaries of NetCDF files
//! - [`text_reader`]: column subsets of delimited text files
//! - [`ftp`]: remote listings and downloads
//! - [`parallel`]: Rayon thread-pool configuration
//! - [`errors`]: centralized error handling
//!
//! ## Usage
//!
//! ```rust,no_run
//! use hydrokit::prelude::*;
//!
//! let file = open_file("observations.nc")?;
//! let raw = read_variable(&file, &VariableSelector::Name("qc_tair".into()), false)?;
//! let flags = codes_from_f64(&raw)?;
//!
//! // Overall flag per observation: 2 if any sub-flag is 2, and so on
//! let overall = max_flag(&flags, 18);
//! FlagWriter::new(&file, "overall.nc".as_ref()).write_flags(&overall, "qc_tair_max", "qc_tair")?;
//! # Ok::<(), hydrokit::errors::HydroError>(())
//! ```

pub mod errors;
pub mod flags;
pub mod ftp;
pub mod metadata;
pub mod netcdf_io;
pub mod netcdf_reader;
pub mod numeric;
pub mod parallel;
pub mod text_reader;

pub use errors::{HydroError, Result};

pub mod prelude {
    //! Commonly used imports for convenience
    pub use crate::errors::{HydroError, Result};
    pub use crate::flags::{
        codes_from_f64, get_flag, max_flag, max_flag_default, set_flag, FlagDigit, FlagError,
        MISSING_FLAG,
    };
    pub use crate::netcdf_io::FlagWriter;
    pub use crate::netcdf_reader::{open_file, read_variable, ReadOptions, VariableSelector};
    pub use crate::numeric::{division, heaviside, DivisionOptions, HeavisideMode};
    pub use crate::parallel::ParallelConfig;
    pub use crate::text_reader::{read_table, Columns, SreadOptions, Table};
}
