//! NetCDF variable and metadata reading
//!
//! Variables are listed in file order unless [`ReadOptions::sort`] is set,
//! in which case every per-variable list (names, codes, units, long names)
//! is reordered by the same name sort so the lists stay parallel.

use crate::errors::{HydroError, Result};
use ndarray::{ArrayD, IxDyn};
use netcdf::{AttributeValue, File, Variable};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::debug;

/// Code reported for variables without a `code` attribute
pub const NO_CODE: i64 = -1;

/// Options shared by the metadata list readers
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReadOptions {
    /// Order lists by variable name
    pub sort: bool,
    /// Drop placeholder entries (`-1` codes, empty strings); squeeze
    /// length-1 axes when reading data
    pub squeeze: bool,
}

/// How to pick the variable to read
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VariableSelector {
    /// By variable name
    Name(String),
    /// By the value of the variable's `code` attribute
    Code(i64),
}

/// Opens a NetCDF file for reading.
///
/// # Errors
///
/// Returns [`HydroError::NetCDFError`] if the file cannot be opened.
pub fn open_file<P: AsRef<Path>>(path: P) -> Result<File> {
    let path = path.as_ref();
    let file = netcdf::open(path)?;
    debug!("Opened NetCDF file {}", path.display());
    Ok(file)
}

/// Indices that sort `names`; ties keep file order.
fn sort_permutation(names: &[String]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..names.len()).collect();
    order.sort_by(|&a, &b| names[a].cmp(&names[b]));
    order
}

fn reorder<T: Clone>(values: Vec<T>, names: &[String], sort: bool) -> Vec<T> {
    if sort {
        sort_permutation(names)
            .into_iter()
            .map(|i| values[i].clone())
            .collect()
    } else {
        values
    }
}

fn file_variable_names(file: &File) -> Vec<String> {
    file.variables().map(|v| v.name()).collect()
}

/// Names of all variables.
#[must_use]
pub fn variables(file: &File, sort: bool) -> Vec<String> {
    let names = file_variable_names(file);
    reorder(names.clone(), &names, sort)
}

/// Integer value of a numeric attribute.
fn attribute_as_i64(value: AttributeValue) -> Option<i64> {
    match value {
        AttributeValue::Uchar(v) => Some(i64::from(v)),
        AttributeValue::Schar(v) => Some(i64::from(v)),
        AttributeValue::Ushort(v) => Some(i64::from(v)),
        AttributeValue::Short(v) => Some(i64::from(v)),
        AttributeValue::Uint(v) => Some(i64::from(v)),
        AttributeValue::Int(v) => Some(i64::from(v)),
        AttributeValue::Longlong(v) => Some(v),
        AttributeValue::Ulonglong(v) => i64::try_from(v).ok(),
        AttributeValue::Float(v) if v.fract() == 0.0 => Some(v as i64),
        AttributeValue::Double(v) if v.fract() == 0.0 => Some(v as i64),
        _ => None,
    }
}

fn string_attribute(var: &Variable, name: &str) -> String {
    match var.attribute(name).and_then(|attr| attr.value().ok()) {
        Some(AttributeValue::Str(s)) => s,
        _ => String::new(),
    }
}

fn variable_code(var: &Variable) -> i64 {
    var.attribute("code")
        .and_then(|attr| attr.value().ok())
        .and_then(attribute_as_i64)
        .unwrap_or(NO_CODE)
}

/// Values of each variable's `code` attribute, [`NO_CODE`] where absent.
#[must_use]
pub fn codes(file: &File, options: &ReadOptions) -> Vec<i64> {
    let names = file_variable_names(file);
    let values: Vec<i64> = file.variables().map(|v| variable_code(&v)).collect();
    let mut values = reorder(values, &names, options.sort);
    if options.squeeze {
        values.retain(|&c| c != NO_CODE);
    }
    values
}

fn string_list(file: &File, attr: &str, options: &ReadOptions) -> Vec<String> {
    let names = file_variable_names(file);
    let values: Vec<String> = file
        .variables()
        .map(|v| string_attribute(&v, attr))
        .collect();
    let mut values = reorder(values, &names, options.sort);
    if options.squeeze {
        values.retain(|s| !s.is_empty());
    }
    values
}

/// Each variable's `units` attribute, empty where absent.
#[must_use]
pub fn units(file: &File, options: &ReadOptions) -> Vec<String> {
    string_list(file, "units", options)
}

/// Each variable's `long_name` attribute, empty where absent.
#[must_use]
pub fn long_names(file: &File, options: &ReadOptions) -> Vec<String> {
    string_list(file, "long_name", options)
}

/// All attributes of one variable.
///
/// # Errors
///
/// Returns [`HydroError::VariableNotFound`] if `var_name` is not in the file.
pub fn attributes(file: &File, var_name: &str) -> Result<BTreeMap<String, AttributeValue>> {
    let var = find_variable(file, var_name)?;
    let mut attrs = BTreeMap::new();
    for attr in var.attributes() {
        attrs.insert(attr.name().to_string(), attr.value()?);
    }
    Ok(attrs)
}

fn find_variable<'f>(file: &'f File, var_name: &str) -> Result<Variable<'f>> {
    file.variable(var_name)
        .ok_or_else(|| HydroError::VariableNotFound {
            var: var_name.to_string(),
        })
}

/// Name of the variable a selector points at.
///
/// # Errors
///
/// Returns [`HydroError::VariableNotFound`] or [`HydroError::CodeNotFound`].
pub fn resolve(file: &File, selector: &VariableSelector) -> Result<String> {
    match selector {
        VariableSelector::Name(name) => find_variable(file, name).map(|v| v.name()),
        VariableSelector::Code(code) => file
            .variables()
            .find(|v| variable_code(v) == *code)
            .map(|v| v.name())
            .ok_or(HydroError::CodeNotFound { code: *code }),
    }
}

/// Reads a whole variable as `f64`.
///
/// With `squeeze`, axes of length 1 are removed.
///
/// # Errors
///
/// Returns an error if the variable cannot be found or read.
pub fn read_variable(file: &File, selector: &VariableSelector, squeeze: bool) -> Result<ArrayD<f64>> {
    let name = resolve(file, selector)?;
    let var = find_variable(file, &name)?;

    let mut shape: Vec<usize> = var.dimensions().iter().map(netcdf::Dimension::len).collect();
    let data: Vec<f64> = var.get_values::<f64, _>(..)?;
    debug!("Read variable '{name}' with shape {shape:?}");

    if squeeze {
        shape.retain(|&len| len != 1);
    }
    Ok(ArrayD::from_shape_vec(IxDyn(&shape), data)?)
}

/// Names of the dimensions of a variable, in order.
///
/// # Errors
///
/// Returns [`HydroError::VariableNotFound`] if `var_name` is not in the file.
pub fn dimension_names(file: &File, var_name: &str) -> Result<Vec<String>> {
    let var = find_variable(file, var_name)?;
    Ok(var.dimensions().iter().map(|d| d.name().to_string()).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sort_permutation_orders_names() {
        let names = vec!["tair".to_string(), "rh".to_string(), "precip".to_string()];
        assert_eq!(sort_permutation(&names), vec![2, 1, 0]);
    }

    #[test]
    fn reorder_keeps_lists_parallel() {
        let names = vec!["b".to_string(), "a".to_string()];
        assert_eq!(reorder(vec![2, 1], &names, true), vec![1, 2]);
        assert_eq!(reorder(vec![2, 1], &names, false), vec![2, 1]);
    }

    #[test]
    fn numeric_attributes_convert_to_codes() {
        assert_eq!(attribute_as_i64(AttributeValue::Int(11)), Some(11));
        assert_eq!(attribute_as_i64(AttributeValue::Short(3)), Some(3));
        assert_eq!(attribute_as_i64(AttributeValue::Double(7.0)), Some(7));
        assert_eq!(attribute_as_i64(AttributeValue::Double(7.5)), None);
        assert_eq!(attribute_as_i64(AttributeValue::Str("7".into())), None);
    }
}
