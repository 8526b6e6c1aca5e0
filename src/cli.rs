//! Command-line options for the hydrokit binary

use clap::Parser;
use std::path::PathBuf;

/// Read and decode quality flags in NetCDF and delimited-text files
#[derive(Parser, Debug)]
#[command(author, version, name = "hydrokit", about)]
pub struct Args {
    /// Path to the NetCDF file
    #[arg(short, long)]
    pub file: Option<PathBuf>,

    /// List all variables and dimensions in the NetCDF file
    #[arg(long, requires = "file")]
    pub list_vars: bool,

    /// Describe a specific variable (data type, shape, and attributes)
    #[arg(long, requires = "file")]
    pub describe: Option<String>,

    /// Print sub-flag N of a flag variable, formatted as <var>:<n>
    #[arg(long, value_parser = parse_flag_arg, requires = "file")]
    pub get_flag: Option<(String, usize)>,

    /// Print the overall flag of a flag variable
    #[arg(long, requires = "file")]
    pub max_flag: Option<String>,

    /// Number of sub-flag positions considered by --max-flag
    #[arg(long, default_value_t = hydrokit::flags::DEFAULT_SUBFLAG_COUNT)]
    pub positions: usize,

    /// Path to save the --max-flag result as NetCDF. If not set, prints to terminal.
    #[arg(long)]
    pub output_netcdf: Option<PathBuf>,

    /// Delimited text file to print
    #[arg(long, conflicts_with = "file")]
    pub text: Option<PathBuf>,

    /// Header lines of the text file
    #[arg(long, default_value_t = 0)]
    pub skip: usize,

    /// Field separator of the text file; detected if not set
    #[arg(long)]
    pub separator: Option<String>,

    /// Enable verbose output.
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,

    /// Number of threads to use for parallel processing. Defaults to number of CPU cores.
    #[arg(short = 't', long)]
    pub threads: Option<usize>,
}

fn parse_flag_arg(s: &str) -> Result<(String, usize), String> {
    match s.rsplit_once(':') {
        Some((var, n)) if !var.is_empty() => n
            .parse::<usize>()
            .map(|n| (var.to_string(), n))
            .map_err(|_| format!("Invalid position '{n}': expected a non-negative integer")),
        _ => Err("Invalid format: Expected '<variable>:<position>'.".to_string()),
    }
}
