use std::fs;

use tellus_metadata::{Catalog, Filter, MetadataError, load_collection};

const HADCRUT: &str = r#"{
    "name": "HadCRUT5",
    "display_name": "HadCRUT5",
    "variable": "tas",
    "units": "degC",
    "citation": ["Morice, C.P. et al. (2021)"],
    "datasets": [
        {"name": "HadCRUT5", "type": "timeseries", "time_resolution": "monthly",
         "reader": "csv", "filename": "hadcrut5_monthly.csv"},
        {"name": "HadCRUT5_grid", "type": "gridded", "time_resolution": "monthly",
         "reader": "netcdf", "filename": "hadcrut5.nc"}
    ]
}"#;

const NSIDC: &str = r#"{
    "name": "NSIDC",
    "display_name": "NSIDC v3",
    "variable": "arctic_ice",
    "units": "million km2",
    "datasets": [
        {"name": "NSIDC", "type": "timeseries", "time_resolution": "annual",
         "reader": "csv", "filename": ["nsidc.csv"]}
    ]
}"#;

#[test]
fn catalog_selects_with_filter() {
    let dir = tempfile::tempdir().expect("create temp dir");
    fs::write(dir.path().join("hadcrut5.json"), HADCRUT).unwrap();
    fs::write(dir.path().join("nsidc.json"), NSIDC).unwrap();
    fs::write(dir.path().join("README.txt"), "not metadata").unwrap();

    let catalog = Catalog::from_dir(dir.path()).expect("load catalog");
    assert_eq!(catalog.len(), 3);

    let timeseries = catalog.select(&Filter::new().with("type", "timeseries"));
    let names: Vec<&str> = timeseries
        .iter()
        .map(|m| m.get_str("name").unwrap())
        .collect();
    assert_eq!(names, vec!["HadCRUT5", "NSIDC"]);

    let temperature = catalog.select(
        &Filter::new()
            .with("variable", "tas")
            .with("type", "timeseries"),
    );
    assert_eq!(temperature.len(), 1);

    let either = catalog.select(&Filter::new().with_any("variable", ["tas", "arctic_ice"]));
    assert_eq!(either.len(), 3);

    assert_eq!(catalog.select(&Filter::new()).len(), 3);
}

#[test]
fn load_collection_reports_bad_json() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let path = dir.path().join("broken.json");
    fs::write(&path, "{ not json").unwrap();

    let err = load_collection(&path).unwrap_err();
    assert!(matches!(err, MetadataError::Json { .. }));
}

#[test]
fn load_collection_missing_file() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let err = load_collection(&dir.path().join("absent.json")).unwrap_err();
    assert!(matches!(err, MetadataError::Io { .. }));
}

#[test]
fn each_dataset_owns_its_collection_copy() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let path = dir.path().join("hadcrut5.json");
    fs::write(&path, HADCRUT).unwrap();

    let mut loaded = load_collection(&path).unwrap();
    loaded[0].set("units", "K").unwrap();
    assert_eq!(loaded[0].get_str("units").unwrap(), "K");
    assert_eq!(loaded[1].get_str("units").unwrap(), "degC");
}
