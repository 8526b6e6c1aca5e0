//! Human-readable NetCDF summaries for the command line
//!
//! Builds on [`netcdf_reader`](crate::netcdf_reader) and prints dimensions,
//! variables with their `code`/`units`/`long_name` attributes, and per
//! variable attribute listings.

use crate::errors::Result;
use crate::netcdf_reader::{attributes, codes, long_names, units, variables, ReadOptions, NO_CODE};
use netcdf::{AttributeValue, File};

/// Format a single attribute value for display
fn format_attribute(value: &AttributeValue) -> String {
    match value {
        AttributeValue::Str(s) => format!("\"{s}\""),
        AttributeValue::Strs(ss) => format!("{ss:?}"),
        AttributeValue::Float(f) => f.to_string(),
        AttributeValue::Double(d) => d.to_string(),
        AttributeValue::Int(i) => i.to_string(),
        AttributeValue::Short(s) => s.to_string(),
        AttributeValue::Longlong(l) => l.to_string(),
        other => format!("{other:?}"),
    }
}

/// Lists dimensions and variables, sorted by name.
pub fn list_variables_and_dimensions(file: &File) -> Result<()> {
    println!("\n Dimensions");
    println!("==============");

    let mut dimensions: Vec<_> = file.dimensions().collect();
    dimensions.sort_by(|a, b| a.name().cmp(&b.name()));

    if dimensions.is_empty() {
        println!("   (No dimensions found)");
    }
    for dim in dimensions {
        let unlimited = if dim.is_unlimited() { " (unlimited)" } else { "" };
        println!("    {} = {}{unlimited}", dim.name(), dim.len());
    }

    println!("\n Variables");
    println!("=============");

    let options = ReadOptions {
        sort: true,
        squeeze: false,
    };
    let names = variables(file, true);
    let var_codes = codes(file, &options);
    let var_units = units(file, &options);
    let var_long_names = long_names(file, &options);

    if names.is_empty() {
        println!("   (No variables found)");
    }
    for (i, name) in names.iter().enumerate() {
        let mut details = Vec::new();
        if var_codes[i] != NO_CODE {
            details.push(format!("code: {}", var_codes[i]));
        }
        if !var_units[i].is_empty() {
            details.push(format!("units: {}", var_units[i]));
        }
        if !var_long_names[i].is_empty() {
            details.push(format!("long_name: {}", var_long_names[i]));
        }

        let shape = file
            .variable(name)
            .map(|v| {
                v.dimensions()
                    .iter()
                    .map(|d| format!("{}[{}]", d.name(), d.len()))
                    .collect::<Vec<_>>()
                    .join(", ")
            })
            .unwrap_or_default();

        println!("    {name} ({shape})");
        if !details.is_empty() {
            println!("      - {}", details.join(", "));
        }
    }

    Ok(())
}

/// Prints the dimensions and every attribute of one variable.
///
/// # Errors
///
/// Returns an error if the variable does not exist.
pub fn describe_variable(file: &File, var_name: &str) -> Result<()> {
    let attrs = attributes(file, var_name)?;

    println!("\n Variable Description: {var_name}");
    println!("={}", "=".repeat(var_name.len() + 22));

    if let Some(var) = file.variable(var_name) {
        println!(" Data type: {}", format!("{:?}", var.vartype()).to_lowercase());
        let dims: Vec<String> = var
            .dimensions()
            .iter()
            .map(|d| format!("{} = {}", d.name(), d.len()))
            .collect();
        if dims.is_empty() {
            println!(" Dimensions: (scalar)");
        } else {
            println!(" Dimensions: [{}]", dims.join(", "));
        }
    }

    if attrs.is_empty() {
        println!("\n  Attributes: (none)");
    } else {
        println!("\n  Attributes:");
        for (name, value) in &attrs {
            println!("   - {name}: {}", format_attribute(value));
        }
    }

    Ok(())
}
