use hydrokit::errors::HydroError;
use hydrokit::flags::{codes_from_f64, get_flag, max_flag_default};
use hydrokit::metadata::{describe_variable, list_variables_and_dimensions};
use hydrokit::netcdf_io::FlagWriter;
use hydrokit::netcdf_reader::{
    attributes, codes, dimension_names, long_names, open_file, read_variable, resolve, units,
    variables, ReadOptions, VariableSelector,
};
use ndarray::{arr1, arr2, Array2, ArrayD, IxDyn};
use netcdf::{create, AttributeValue};
use std::path::Path;
use tempfile::tempdir;

/// One station, four time steps: air temperature, its flags and the
/// station altitude (no `code` attribute).
fn create_station_file(path: &Path) {
    let mut file = create(path).expect("Failed to create NetCDF file");
    file.add_dimension("station", 1)
        .expect("Failed to add dimension station");
    file.add_dimension("time", 4)
        .expect("Failed to add dimension time");

    let mut tair = file
        .add_variable::<f64>("tair", &["station", "time"])
        .expect("Failed to add variable tair");
    tair.put_attribute("code", 11_i32).expect("Failed to add code");
    tair.put_attribute("units", "degC").expect("Failed to add units");
    tair.put_attribute("long_name", "air temperature")
        .expect("Failed to add long_name");
    let values = Array2::from_shape_vec((1, 4), vec![1.5, 2.0, 2.5, 3.0])
        .expect("Failed to create array from test data");
    tair.put(values.view(), ..).expect("Failed to write tair");

    let mut qc = file
        .add_variable::<i32>("qc_tair", &["station", "time"])
        .expect("Failed to add variable qc_tair");
    qc.put_attribute("code", 12_i32).expect("Failed to add code");
    qc.put_attribute("long_name", "quality flag of air temperature")
        .expect("Failed to add long_name");
    let flags = arr2(&[[9_i32, 9201, -9999, 901]]);
    qc.put(flags.view(), ..).expect("Failed to write qc_tair");

    let mut altitude = file
        .add_variable::<f64>("altitude", &["station"])
        .expect("Failed to add variable altitude");
    altitude.put_attribute("units", "m").expect("Failed to add units");
    altitude
        .put(arr1(&[112.0]).view(), ..)
        .expect("Failed to write altitude");
}

#[test]
fn test_metadata_lists_stay_parallel() {
    let temp_dir = tempdir().expect("Failed to create temp dir");
    let file_path = temp_dir.path().join("station.nc");
    create_station_file(&file_path);
    let file = open_file(&file_path).expect("Failed to open NetCDF file");

    assert_eq!(variables(&file, false), vec!["tair", "qc_tair", "altitude"]);
    assert_eq!(variables(&file, true), vec!["altitude", "qc_tair", "tair"]);

    let plain = ReadOptions::default();
    let sorted = ReadOptions {
        sort: true,
        squeeze: false,
    };
    let sorted_squeezed = ReadOptions {
        sort: true,
        squeeze: true,
    };

    assert_eq!(codes(&file, &plain), vec![11, 12, -1]);
    assert_eq!(codes(&file, &sorted), vec![-1, 12, 11]);
    assert_eq!(codes(&file, &sorted_squeezed), vec![12, 11]);

    assert_eq!(units(&file, &sorted), vec!["m", "", "degC"]);
    assert_eq!(units(&file, &sorted_squeezed), vec!["m", "degC"]);
    assert_eq!(long_names(&file, &plain)[0], "air temperature");

    let attrs = attributes(&file, "tair").expect("Failed to read attributes");
    let keys: Vec<_> = attrs.keys().map(String::as_str).collect();
    assert_eq!(keys, vec!["code", "long_name", "units"]);

    assert_eq!(
        dimension_names(&file, "qc_tair").expect("Failed to read dimensions"),
        vec!["station", "time"]
    );
}

#[test]
fn test_read_by_name_and_code() {
    let temp_dir = tempdir().expect("Failed to create temp dir");
    let file_path = temp_dir.path().join("station.nc");
    create_station_file(&file_path);
    let file = open_file(&file_path).expect("Failed to open NetCDF file");

    let tair = read_variable(&file, &VariableSelector::Name("tair".into()), false)
        .expect("Failed to read tair");
    assert_eq!(tair.shape(), &[1, 4]);

    let squeezed = read_variable(&file, &VariableSelector::Name("tair".into()), true)
        .expect("Failed to read tair");
    assert_eq!(squeezed.shape(), &[4]);
    assert_eq!(squeezed[[2]], 2.5);

    assert_eq!(
        resolve(&file, &VariableSelector::Code(12)).expect("Failed to resolve code"),
        "qc_tair"
    );
    let by_code = read_variable(&file, &VariableSelector::Code(12), true)
        .expect("Failed to read by code");
    let flags = codes_from_f64(&by_code).expect("Flags are integers");
    assert_eq!(
        get_flag(&flags, 1),
        ArrayD::from_shape_vec(IxDyn(&[4]), vec![-1, 2, -2, 0]).unwrap()
    );

    assert!(matches!(
        read_variable(&file, &VariableSelector::Name("rh".into()), false),
        Err(HydroError::VariableNotFound { .. })
    ));
    assert!(matches!(
        read_variable(&file, &VariableSelector::Code(99), false),
        Err(HydroError::CodeNotFound { code: 99 })
    ));
}

#[test]
fn test_overall_flag_written_to_netcdf() {
    let temp_dir = tempdir().expect("Failed to create temp dir");
    let input_path = temp_dir.path().join("station.nc");
    let output_path = temp_dir.path().join("overall.nc");
    create_station_file(&input_path);
    let file = open_file(&input_path).expect("Failed to open NetCDF file");

    let raw = read_variable(&file, &VariableSelector::Name("qc_tair".into()), false)
        .expect("Failed to read flags");
    let overall = max_flag_default(&codes_from_f64(&raw).expect("Flags are integers"));

    let writer = FlagWriter::new(&file, &output_path);
    writer
        .write_flags(&overall, "qc_tair_max", "qc_tair")
        .expect("Failed to write flags");
    // Writing again replaces the file
    writer
        .write_flags(&overall, "qc_tair_max", "qc_tair")
        .expect("Failed to overwrite flags");

    let written = open_file(&output_path).expect("Failed to open output");
    let values = read_variable(&written, &VariableSelector::Name("qc_tair_max".into()), true)
        .expect("Failed to read written flags");
    assert_eq!(values.iter().copied().collect::<Vec<_>>(), vec![-1.0, 2.0, -2.0, 1.0]);

    let attrs = attributes(&written, "qc_tair_max").expect("Failed to read attributes");
    assert!(matches!(
        attrs.get("long_name"),
        Some(AttributeValue::Str(s)) if s == "quality flag of air temperature"
    ));
    assert!(!attrs.contains_key("code"));
    assert!(written.attribute("history").is_some());
}

#[test]
fn test_flag_writer_errors() {
    let temp_dir = tempdir().expect("Failed to create temp dir");
    let input_path = temp_dir.path().join("station.nc");
    let output_path = temp_dir.path().join("overall.nc");
    create_station_file(&input_path);
    let file = open_file(&input_path).expect("Failed to open NetCDF file");
    let writer = FlagWriter::new(&file, &output_path);

    let flat = ArrayD::from_shape_vec(IxDyn(&[4]), vec![0_i64; 4]).unwrap();
    assert!(matches!(
        writer.write_flags(&flat, "qc_max", "qc_tair"),
        Err(HydroError::ShapeMismatch { .. })
    ));
    assert!(matches!(
        writer.write_flags(&flat, "qc_max", "missing"),
        Err(HydroError::VariableNotFound { .. })
    ));
}

#[test]
fn test_metadata_printing() {
    let temp_dir = tempdir().expect("Failed to create temp dir");
    let file_path = temp_dir.path().join("station.nc");
    create_station_file(&file_path);
    let file = open_file(&file_path).expect("Failed to open NetCDF file");

    assert!(list_variables_and_dimensions(&file).is_ok());
    assert!(describe_variable(&file, "tair").is_ok());
    assert!(describe_variable(&file, "missing").is_err());
}
