//! Entry point for the hydrokit command-line tool.
//! Handles CLI parsing, logging setup, file loading, and dispatches flag
//! decoding, metadata listing and text-table printing.

use clap::Parser;
use hydrokit::errors::Result;
use hydrokit::flags::{codes_from_f64, get_flag, max_flag};
use hydrokit::metadata::{describe_variable, list_variables_and_dimensions};
use hydrokit::netcdf_io::FlagWriter;
use hydrokit::netcdf_reader::{open_file, read_variable, VariableSelector};
use hydrokit::parallel::{get_parallel_info, ParallelConfig};
use hydrokit::text_reader::{read_table, SreadOptions};
use netcdf::File;
use std::path::Path;
use std::process::ExitCode;
use tracing::{error, info};

mod cli;

use cli::Args;

fn setup_logging(verbose: bool) {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let log_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("hydrokit={log_level}")));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .init();
}

fn read_codes(file: &File, var: &str) -> Result<ndarray::ArrayD<i64>> {
    let values = read_variable(file, &VariableSelector::Name(var.to_string()), false)?;
    codes_from_f64(&values)
}

fn run_netcdf(args: &Args, path: &Path) -> Result<()> {
    let file = open_file(path)?;
    info!("Successfully opened NetCDF file: {}", path.display());

    if let Some(var) = &args.describe {
        describe_variable(&file, var)?;
    }

    if let Some((var, n)) = &args.get_flag {
        let flags = read_codes(&file, var)?;
        let sub_flags = get_flag(&flags, *n);
        println!("Sub-flag {n} of {var}: {sub_flags}");
    }

    if let Some(var) = &args.max_flag {
        let flags = read_codes(&file, var)?;
        let overall = max_flag(&flags, args.positions);

        if let Some(output_path) = &args.output_netcdf {
            let new_var_name = format!("{var}_max");
            FlagWriter::new(&file, output_path).write_flags(&overall, &new_var_name, var)?;
            println!("Saved result to {}", output_path.display());
        } else {
            println!("Overall flag of {var}: {overall}");
        }
    }

    if args.list_vars || (args.describe.is_none() && args.get_flag.is_none() && args.max_flag.is_none()) {
        list_variables_and_dimensions(&file)?;
    }

    Ok(())
}

fn run_text(args: &Args, path: &Path) -> Result<()> {
    let options = SreadOptions {
        skip: args.skip,
        separator: args.separator.clone(),
        ..SreadOptions::default()
    };
    let table = read_table(path, &options)?;
    info!("Read {} rows and {} columns from {}", table.len(), table.ncols(), path.display());
    for row in &table.rows {
        println!("{}", row.join("\t"));
    }
    Ok(())
}

fn run(args: &Args) -> Result<()> {
    ParallelConfig::new(args.threads).setup_global_pool()?;
    if args.verbose {
        get_parallel_info().log();
    }

    match (&args.file, &args.text) {
        (Some(path), _) => run_netcdf(args, path),
        (None, Some(path)) => run_text(args, path),
        (None, None) => Err("Nothing to do: pass --file or --text".into()),
    }
}

fn main() -> ExitCode {
    let args = Args::parse();
    setup_logging(args.verbose);

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}
