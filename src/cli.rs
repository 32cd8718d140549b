//! Command-line flags
//!
//! Every flag overrides the matching key of the (optional) JSON config file.

use crate::config::{MapConfig, PaletteSpec};
use crate::coverage::{CenterPolicy, Result};
use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(
    name = "signal_map",
    version,
    about = "Render geotagged signal-strength measurements as a colored Leaflet map"
)]
pub struct Cli {
    /// CSV file with latitude, longitude and metric columns
    pub input: Option<PathBuf>,

    /// JSON configuration file (camelCase keys)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Output HTML file
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    #[arg(long)]
    pub metric_column: Option<String>,

    #[arg(long)]
    pub latitude_column: Option<String>,

    #[arg(long)]
    pub longitude_column: Option<String>,

    /// Palette name or comma-separated hex colors (low → high)
    #[arg(long)]
    pub palette: Option<String>,

    #[arg(long)]
    pub radius: Option<f64>,

    #[arg(long)]
    pub opacity: Option<f64>,

    #[arg(long)]
    pub zoom: Option<u8>,

    #[arg(long)]
    pub caption: Option<String>,

    #[arg(long)]
    pub label: Option<String>,

    #[arg(long)]
    pub unit: Option<String>,

    /// Reorder measurements by this column (e.g. timestamp)
    #[arg(long)]
    pub sort_by: Option<String>,

    /// Extra column to show in popups (repeatable)
    #[arg(long = "popup-column")]
    pub popup_columns: Vec<String>,

    /// Initial view: first, centroid or fit
    #[arg(long, value_parser = parse_center)]
    pub center: Option<CenterPolicy>,

    #[arg(long)]
    pub legend_ticks: Option<usize>,

    #[arg(long)]
    pub title: Option<String>,

    /// List the named palettes and exit
    #[arg(long)]
    pub list_palettes: bool,
}

fn parse_center(s: &str) -> std::result::Result<CenterPolicy, String> {
    CenterPolicy::parse(s).ok_or_else(|| format!("expected first, centroid or fit, got '{}'", s))
}

impl Cli {
    /// Build the effective configuration: config file (or defaults), then flags
    pub fn to_config(&self) -> Result<MapConfig> {
        let mut config = match &self.config {
            Some(path) => MapConfig::from_file(path)?,
            None => MapConfig::default(),
        };
        self.apply(&mut config);
        Ok(config)
    }

    fn apply(&self, config: &mut MapConfig) {
        if let Some(input) = &self.input {
            config.input_path = Some(input.clone());
        }
        if let Some(output) = &self.output {
            config.output_path = output.clone();
        }
        if let Some(column) = &self.metric_column {
            config.metric_column_name = column.clone();
        }
        if let Some(column) = &self.latitude_column {
            config.latitude_column_name = column.clone();
        }
        if let Some(column) = &self.longitude_column {
            config.longitude_column_name = column.clone();
        }
        if let Some(palette) = &self.palette {
            config.palette = PaletteSpec::parse(palette);
        }
        if let Some(radius) = self.radius {
            config.marker_radius = radius;
        }
        if let Some(opacity) = self.opacity {
            config.fill_opacity = opacity;
        }
        if let Some(zoom) = self.zoom {
            config.initial_zoom = zoom;
        }
        if let Some(caption) = &self.caption {
            config.legend_caption = Some(caption.clone());
        }
        if let Some(label) = &self.label {
            config.metric_label = label.clone();
        }
        if let Some(unit) = &self.unit {
            config.metric_unit = unit.clone();
        }
        if let Some(column) = &self.sort_by {
            config.sort_by = Some(column.clone());
        }
        if !self.popup_columns.is_empty() {
            config.popup_columns = self.popup_columns.clone();
        }
        if let Some(center) = self.center {
            config.center_policy = center;
        }
        if let Some(ticks) = self.legend_ticks {
            config.legend_ticks = ticks;
        }
        if let Some(title) = &self.title {
            config.title = title.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_flags_override_defaults() {
        let cli = Cli::try_parse_from([
            "signal_map",
            "drive.csv",
            "-o",
            "out/map.html",
            "--palette",
            "Viridis",
            "--radius",
            "6",
            "--center",
            "centroid",
            "--popup-column",
            "cellId",
            "--popup-column",
            "source",
        ])
        .unwrap();
        let config = cli.to_config().unwrap();

        assert_eq!(config.input_path, Some(PathBuf::from("drive.csv")));
        assert_eq!(config.output_path, PathBuf::from("out/map.html"));
        assert_eq!(config.palette, PaletteSpec::Named("Viridis".to_string()));
        assert_eq!(config.marker_radius, 6.0);
        assert_eq!(config.center_policy, CenterPolicy::Centroid);
        assert_eq!(
            config.popup_columns,
            vec!["cellId".to_string(), "source".to_string()]
        );
        assert_eq!(config.initial_zoom, 15);
    }

    #[test]
    fn test_flags_override_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("map.json");
        std::fs::write(
            &path,
            r#"{"inputPath": "from_file.csv", "initialZoom": 12, "metricUnit": "dB"}"#,
        )
        .unwrap();

        let cli = Cli::try_parse_from([
            "signal_map",
            "--config",
            path.to_str().unwrap(),
            "--zoom",
            "14",
        ])
        .unwrap();
        let config = cli.to_config().unwrap();

        assert_eq!(config.input_path, Some(PathBuf::from("from_file.csv")));
        assert_eq!(config.initial_zoom, 14);
        assert_eq!(config.caption(), "RSRP (dB)");
    }

    #[test]
    fn test_bad_center_rejected() {
        assert!(Cli::try_parse_from(["signal_map", "x.csv", "--center", "middle"]).is_err());
    }
}
