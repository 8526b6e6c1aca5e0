//! NetCDF output of derived flag arrays
//!
//! Writes integer flag arrays (for example the overall flag computed by
//! [`max_flag`](crate::flags::max_flag)) to a new NetCDF file, reusing the
//! dimensions and descriptive attributes of the variable they came from.

use crate::errors::{HydroError, Result};
use crate::flags::MISSING_FLAG;
use crate::netcdf_reader::dimension_names;
use chrono::Utc;
use ndarray::ArrayD;
use netcdf::{create, AttributeValue, File};
use std::{fs, path::Path};
use tracing::{debug, info};

/// Writer for flag arrays derived from a variable of an open file
pub struct FlagWriter<'a> {
    input_file: &'a File,
    output_path: &'a Path,
}

impl<'a> FlagWriter<'a> {
    /// Create a new flag writer
    pub fn new(input_file: &'a File, output_path: &'a Path) -> Self {
        Self {
            input_file,
            output_path,
        }
    }

    /// Write `data` as variable `var_name`, shaped like `source_var_name`.
    ///
    /// An existing file at the output path is replaced.
    ///
    /// # Errors
    ///
    /// Returns an error if the source variable is missing, its rank differs
    /// from `data`, or the file cannot be written.
    pub fn write_flags(&self, data: &ArrayD<i64>, var_name: &str, source_var_name: &str) -> Result<()> {
        let dim_names = dimension_names(self.input_file, source_var_name)?;
        if dim_names.len() != data.ndim() {
            return Err(HydroError::ShapeMismatch {
                expected: data.shape().to_vec(),
                found: vec![dim_names.len()],
            });
        }

        if self.output_path.exists() {
            fs::remove_file(self.output_path)?;
        }

        let mut file = create(self.output_path)?;

        for (dim_name, &dim_len) in dim_names.iter().zip(data.shape()) {
            file.add_dimension(dim_name, dim_len)?;
        }

        let source = self
            .input_file
            .variable(source_var_name)
            .ok_or_else(|| HydroError::VariableNotFound {
                var: source_var_name.to_string(),
            })?;

        let dim_refs: Vec<&str> = dim_names.iter().map(String::as_str).collect();
        let mut new_var = file.add_variable::<i64>(var_name, &dim_refs)?;
        new_var.put_attribute("_FillValue", MISSING_FLAG)?;
        new_var.put(data.view(), ..)?;

        // Numeric attributes describe the source values, not the flags
        for attr in source.attributes().filter(|a| a.name() != "_FillValue") {
            match attr.value()? {
                value @ (AttributeValue::Str(_) | AttributeValue::Strs(_)) => {
                    new_var.put_attribute(attr.name(), value)?;
                }
                _ => debug!("Skipped numeric attribute '{}'", attr.name()),
            }
        }

        file.add_attribute(
            "history",
            format!(
                "Created by hydrokit from '{source_var_name}' on {}",
                Utc::now().to_rfc3339()
            ),
        )?;

        info!(
            "Wrote '{var_name}' with shape {:?} to {}",
            data.shape(),
            self.output_path.display()
        );
        Ok(())
    }
}
