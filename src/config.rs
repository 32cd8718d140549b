//! Run configuration
//!
//! Configuration comes from an optional JSON file (camelCase keys, every key
//! optional) with command-line flags layered on top. Defaults reproduce the
//! classic drive-test map: RSRP colored on the 11-step RdYlGn ramp, radius 4
//! circles at 80% opacity, zoom 15, centered on the first point.

use crate::coverage::colors::parse_colors;
use crate::coverage::{
    registry, CenterPolicy, Color, ColumnMapping, ComposeOptions, CoverageError, Result,
    TileLayer, DEFAULT_PALETTE,
};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Highest zoom level the default tile servers provide
const MAX_ZOOM: u8 = 19;

/// Palette as configured: a registry name or explicit anchors
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum PaletteSpec {
    Named(String),
    Colors(Vec<String>),
}

impl PaletteSpec {
    /// Parse a command-line value
    ///
    /// A comma-separated list or a value starting with `#` is taken as explicit
    /// hex anchors, anything else as a palette name.
    pub fn parse(s: &str) -> Self {
        let s = s.trim();
        if s.contains(',') || s.starts_with('#') {
            PaletteSpec::Colors(s.split(',').map(|c| c.trim().to_string()).collect())
        } else {
            PaletteSpec::Named(s.to_string())
        }
    }

    /// Resolve to anchor colors
    pub fn resolve(&self) -> Result<Vec<Color>> {
        let anchors = match self {
            PaletteSpec::Named(name) => registry().anchors(name)?,
            PaletteSpec::Colors(hexes) => parse_colors(hexes)?,
        };
        if anchors.len() < 2 {
            return Err(CoverageError::Palette(format!(
                "a palette needs at least 2 colors, got {}",
                anchors.len()
            )));
        }
        Ok(anchors)
    }
}

impl Default for PaletteSpec {
    fn default() -> Self {
        PaletteSpec::Named(DEFAULT_PALETTE.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct MapConfig {
    /// CSV source (required before a run)
    pub input_path: Option<PathBuf>,

    /// HTML destination
    pub output_path: PathBuf,

    pub metric_column_name: String,
    pub latitude_column_name: String,
    pub longitude_column_name: String,

    /// Palette name from palettes.json or a list of hex colors, low → high
    pub palette: PaletteSpec,

    /// Circle marker radius in pixels
    pub marker_radius: f64,

    /// Marker fill opacity in [0, 1]
    pub fill_opacity: f64,

    pub initial_zoom: u8,

    /// Legend caption; derived from label and unit when unset
    pub legend_caption: Option<String>,

    /// Metric name shown in popups, e.g. "RSRP"
    pub metric_label: String,

    /// Metric unit shown in popups and the default caption
    pub metric_unit: String,

    /// Reorder measurements by this column before composing (e.g. "timestamp")
    pub sort_by: Option<String>,

    /// Extra columns shown verbatim in each popup
    pub popup_columns: Vec<String>,

    /// "first", "centroid" or "fit"
    pub center_policy: CenterPolicy,

    /// Number of numeric labels under the legend ramp
    pub legend_ticks: usize,

    pub tile_url: String,
    pub tile_attribution: String,

    /// Document title
    pub title: String,
}

impl Default for MapConfig {
    fn default() -> Self {
        let compose = ComposeOptions::default();
        let tiles = TileLayer::default();
        let columns = ColumnMapping::default();
        MapConfig {
            input_path: None,
            output_path: PathBuf::from("trajectory.html"),
            metric_column_name: columns.metric,
            latitude_column_name: columns.latitude,
            longitude_column_name: columns.longitude,
            palette: PaletteSpec::default(),
            marker_radius: compose.marker_radius,
            fill_opacity: compose.fill_opacity,
            initial_zoom: compose.zoom,
            legend_caption: None,
            metric_label: compose.metric_label,
            metric_unit: compose.metric_unit,
            sort_by: None,
            popup_columns: Vec::new(),
            center_policy: compose.center_policy,
            legend_ticks: compose.legend_ticks,
            tile_url: tiles.url,
            tile_attribution: tiles.attribution,
            title: compose.title,
        }
    }
}

impl MapConfig {
    /// Load configuration from a JSON file; missing keys keep their defaults
    pub fn from_file(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path).map_err(|e| CoverageError::io(path, e))?;
        let config: MapConfig = serde_json::from_str(&json).map_err(|e| {
            CoverageError::Config(format!("failed to parse {}: {}", path.display(), e))
        })?;
        tracing::debug!(path = %path.display(), "loaded configuration file");
        Ok(config)
    }

    /// Check option values before any input is read; returns the input path
    pub fn validate(&self) -> Result<&Path> {
        let input = self
            .input_path
            .as_deref()
            .ok_or_else(|| CoverageError::Config("no input path given".to_string()))?;
        if !(self.marker_radius.is_finite() && self.marker_radius > 0.0) {
            return Err(CoverageError::Config(format!(
                "markerRadius must be a positive number, got {}",
                self.marker_radius
            )));
        }
        if !(0.0..=1.0).contains(&self.fill_opacity) {
            return Err(CoverageError::Config(format!(
                "fillOpacity must be within [0, 1], got {}",
                self.fill_opacity
            )));
        }
        if self.initial_zoom > MAX_ZOOM {
            return Err(CoverageError::Config(format!(
                "initialZoom must be at most {}, got {}",
                MAX_ZOOM, self.initial_zoom
            )));
        }
        if self.legend_ticks == 0 {
            return Err(CoverageError::Config(
                "legendTicks must be at least 1".to_string(),
            ));
        }
        self.palette.resolve()?;
        Ok(input)
    }

    /// Legend caption, e.g. "RSRP (dBm)"
    pub fn caption(&self) -> String {
        self.legend_caption
            .clone()
            .unwrap_or_else(|| format!("{} ({})", self.metric_label, self.metric_unit))
    }

    pub fn columns(&self) -> ColumnMapping {
        ColumnMapping {
            latitude: self.latitude_column_name.clone(),
            longitude: self.longitude_column_name.clone(),
            metric: self.metric_column_name.clone(),
            sort_by: self.sort_by.clone(),
            popup_columns: self.popup_columns.clone(),
        }
    }

    pub fn compose_options(&self) -> ComposeOptions {
        ComposeOptions {
            title: self.title.clone(),
            zoom: self.initial_zoom,
            center_policy: self.center_policy,
            marker_radius: self.marker_radius,
            fill_opacity: self.fill_opacity,
            metric_label: self.metric_label.clone(),
            metric_unit: self.metric_unit.clone(),
            caption: self.caption(),
            legend_ticks: self.legend_ticks,
            tiles: TileLayer {
                url: self.tile_url.clone(),
                attribution: self.tile_attribution.clone(),
            },
        }
    }
}
