//! End-to-end runs: CSV on disk → HTML on disk

use pretty_assertions::assert_eq;
use signal_map::config::{MapConfig, PaletteSpec};
use signal_map::coverage::{registry, CenterPolicy, Color, CoverageError, DataError, Domain};
use signal_map::leaflet::extract_payload;
use signal_map::pipeline::{self, Stage};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn config_for(dir: &TempDir, csv: &str) -> MapConfig {
    let input = dir.path().join("measurements.csv");
    std::fs::write(&input, csv).unwrap();
    MapConfig {
        input_path: Some(input),
        output_path: dir.path().join("trajectory.html"),
        ..MapConfig::default()
    }
}

fn read_payload(path: &Path) -> signal_map::leaflet::MapPayload {
    extract_payload(&std::fs::read_to_string(path).unwrap()).unwrap()
}

#[test]
fn scenario_a_colors_follow_signal_strength() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_for(
        &dir,
        "latitude,longitude,rsrp\n1.0,2.0,-80\n1.1,2.1,-100\n1.2,2.2,-60\n",
    );

    let summary = pipeline::run(&config).unwrap();
    assert_eq!(summary.markers, 3);
    assert_eq!(
        summary.domain,
        Domain {
            min: -100.0,
            max: -60.0
        }
    );

    let palette = registry().anchors("RdYlGn").unwrap();
    let payload = read_payload(&config.output_path);
    let tuples: Vec<(f64, f64, Color)> = payload
        .markers
        .iter()
        .map(|m| (m.lat, m.lon, m.color))
        .collect();
    assert_eq!(
        tuples,
        vec![
            (1.0, 2.0, palette[5]),
            (1.1, 2.1, palette[0]),
            (1.2, 2.2, palette[10]),
        ]
    );
    assert_eq!(payload.view.center, [1.0, 2.0]);
    assert_eq!(payload.view.zoom, 15);
    assert_eq!(payload.legend.caption, "RSRP (dBm)");
    assert_eq!(payload.legend.colors, palette);
}

#[test]
fn scenario_b_single_row() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_for(&dir, "latitude,longitude,rsrp\n0,0,-90\n");

    pipeline::run(&config).unwrap();

    let payload = read_payload(&config.output_path);
    assert_eq!(payload.view.center, [0.0, 0.0]);
    assert_eq!(payload.markers.len(), 1);
    assert_eq!(payload.legend.min, -90.0);
    assert_eq!(payload.legend.max, -90.0);
    // constant scale: midpoint anchor of the 11-step ramp
    assert_eq!(payload.markers[0].color, Color::rgb(255, 255, 191));
}

#[test]
fn scenario_c_empty_input_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_for(&dir, "latitude,longitude,rsrp\n");

    let err = pipeline::run(&config).unwrap_err();
    assert_eq!(err.stage, Stage::Load);
    assert!(matches!(err.source, CoverageError::EmptyDataset));
    assert!(!config.output_path.exists());
}

#[test]
fn scenario_d_bad_metric_names_row_and_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_for(
        &dir,
        "latitude,longitude,rsrp\n1.0,2.0,-80\n1.1,2.1,N/A\n1.2,2.2,-60\n",
    );

    let err = pipeline::run(&config).unwrap_err();
    assert_eq!(err.stage, Stage::Load);
    match err.source {
        CoverageError::Data(data) => {
            assert_eq!(data.row(), Some(2));
            assert!(matches!(data, DataError::NotNumeric { .. }));
            assert!(data.to_string().contains("N/A"));
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(!config.output_path.exists());
}

#[test]
fn failed_run_keeps_previous_artifact() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_for(&dir, "latitude,longitude,rsrp\n91,2,-80\n");
    std::fs::write(&config.output_path, "previous").unwrap();

    assert!(pipeline::run(&config).is_err());
    assert_eq!(
        std::fs::read_to_string(&config.output_path).unwrap(),
        "previous"
    );
}

#[test]
fn missing_input_is_load_stage_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let config = MapConfig {
        input_path: Some(dir.path().join("nope.csv")),
        output_path: dir.path().join("trajectory.html"),
        ..MapConfig::default()
    };

    let err = pipeline::run(&config).unwrap_err();
    assert_eq!(err.stage, Stage::Load);
    assert!(matches!(err.source, CoverageError::Io { .. }));
}

#[test]
fn unwritable_destination_is_write_stage_error() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = config_for(&dir, "latitude,longitude,rsrp\n1,2,-80\n");
    config.output_path = dir.path().join("no_such_dir").join("trajectory.html");

    let err = pipeline::run(&config).unwrap_err();
    assert_eq!(err.stage, Stage::Write);
    assert!(matches!(err.source, CoverageError::Io { .. }));
    assert!(!config.output_path.exists());
}

#[test]
fn invalid_options_fail_before_reading() {
    let config = MapConfig {
        input_path: Some(PathBuf::from("/nonexistent/measurements.csv")),
        palette: PaletteSpec::Colors(vec!["#zzzzzz".to_string(), "#00ff00".to_string()]),
        ..MapConfig::default()
    };

    let err = pipeline::run(&config).unwrap_err();
    assert_eq!(err.stage, Stage::Configure);
    assert!(matches!(err.source, CoverageError::Palette(_)));
}

#[test]
fn missing_input_path_is_configure_stage_error() {
    let dir = tempfile::tempdir().unwrap();
    let config = MapConfig {
        output_path: dir.path().join("trajectory.html"),
        ..MapConfig::default()
    };

    let err = pipeline::run(&config).unwrap_err();
    assert_eq!(err.stage, Stage::Configure);
    assert!(matches!(err.source, CoverageError::Config(ref msg) if msg.contains("input path")));
    assert!(!config.output_path.exists());
}

#[test]
fn collector_csv_sorted_with_popups_and_fit() {
    let dir = tempfile::tempdir().unwrap();
    let csv = "timestamp,latitude,longitude,cellId,rsrp,mcc,mnc,tac,source\n\
               1700000002000,45.80,15.96,101,-110,219,01,5,GPS\n\
               1700000001000,45.82,15.98,102,-85,219,01,5,NETWORK\n";
    let mut config = config_for(&dir, csv);
    config.sort_by = Some("timestamp".to_string());
    config.popup_columns = vec!["cellId".to_string(), "source".to_string()];
    config.center_policy = CenterPolicy::Fit;

    pipeline::run(&config).unwrap();

    let payload = read_payload(&config.output_path);
    assert_eq!(payload.markers[0].popup, "RSRP: -85 dBm\ncellId: 102\nsource: NETWORK");
    assert_eq!(payload.markers[1].popup, "RSRP: -110 dBm\ncellId: 101\nsource: GPS");
    assert_eq!(payload.view.bounds, Some([[45.80, 15.96], [45.82, 15.98]]));
}

#[test]
fn reruns_are_byte_identical() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_for(
        &dir,
        "latitude,longitude,rsrp\n1.0,2.0,-80\n1.1,2.1,-100\n1.2,2.2,-60\n",
    );

    pipeline::run(&config).unwrap();
    let first = std::fs::read(&config.output_path).unwrap();
    pipeline::run(&config).unwrap();
    let second = std::fs::read(&config.output_path).unwrap();
    assert_eq!(first, second);
}
