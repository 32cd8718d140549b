//! Map composition: base view, one marker per measurement and a legend
//!
//! Composition is total for a validated `MeasurementSet` and a fitted
//! `ColorScale`; neither input is mutated.

use super::colors::{Color, ColorScale, Domain};
use super::loader::MeasurementSet;
use serde::{Deserialize, Serialize};

/// How the initial view center is chosen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CenterPolicy {
    /// Location of the first measurement
    #[default]
    First,
    /// Arithmetic mean of all coordinates
    Centroid,
    /// Bounding-box midpoint, and the view is fitted to the box
    Fit,
}

impl CenterPolicy {
    /// Parse from string value
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "first" => Some(Self::First),
            "centroid" => Some(Self::Centroid),
            "fit" => Some(Self::Fit),
            _ => None,
        }
    }
}

/// Latitude/longitude bounding box
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub south: f64,
    pub west: f64,
    pub north: f64,
    pub east: f64,
}

impl Bounds {
    pub fn center(&self) -> (f64, f64) {
        (
            (self.south + self.north) / 2.0,
            (self.west + self.east) / 2.0,
        )
    }
}

/// Base map tiles
#[derive(Debug, Clone, PartialEq)]
pub struct TileLayer {
    pub url: String,
    pub attribution: String,
}

impl Default for TileLayer {
    fn default() -> Self {
        TileLayer {
            url: "https://tile.openstreetmap.org/{z}/{x}/{y}.png".to_string(),
            attribution: "&copy; OpenStreetMap contributors".to_string(),
        }
    }
}

/// One rendered point
#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    pub location: (f64, f64),
    pub radius: f64,
    pub color: Color,
    pub fill_opacity: f64,
    pub popup_text: String,
}

/// Renderable summary of a ColorScale
#[derive(Debug, Clone, PartialEq)]
pub struct Legend {
    pub domain: Domain,
    pub caption: String,
    pub palette: Vec<Color>,
    pub ticks: Vec<f64>,
}

/// Complete in-memory composition handed to the artifact writer
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedMap {
    pub title: String,
    pub center: (f64, f64),
    pub zoom: u8,
    /// Set only under `CenterPolicy::Fit`
    pub fit_bounds: Option<Bounds>,
    pub tiles: TileLayer,
    pub markers: Vec<Marker>,
    pub legend: Legend,
}

/// Fixed visual parameters of a composition
#[derive(Debug, Clone, PartialEq)]
pub struct ComposeOptions {
    pub title: String,
    pub zoom: u8,
    pub center_policy: CenterPolicy,
    pub marker_radius: f64,
    pub fill_opacity: f64,
    /// Popup label, e.g. "RSRP"
    pub metric_label: String,
    /// Popup unit, e.g. "dBm"
    pub metric_unit: String,
    pub caption: String,
    pub legend_ticks: usize,
    pub tiles: TileLayer,
}

impl Default for ComposeOptions {
    fn default() -> Self {
        ComposeOptions {
            title: "Signal coverage".to_string(),
            zoom: 15,
            center_policy: CenterPolicy::First,
            marker_radius: 4.0,
            fill_opacity: 0.8,
            metric_label: "RSRP".to_string(),
            metric_unit: "dBm".to_string(),
            caption: "RSRP (dBm)".to_string(),
            legend_ticks: 5,
            tiles: TileLayer::default(),
        }
    }
}

/// Compose the map for `measurements` colored by `scale`
pub fn compose(
    measurements: &MeasurementSet,
    scale: &ColorScale,
    options: &ComposeOptions,
) -> RenderedMap {
    let bounds = bounding_box(measurements);
    let (center, fit_bounds) = match options.center_policy {
        CenterPolicy::First => (measurements.first().location(), None),
        CenterPolicy::Centroid => (centroid(measurements), None),
        CenterPolicy::Fit => (bounds.center(), Some(bounds)),
    };

    let markers: Vec<Marker> = measurements
        .iter()
        .map(|m| {
            let mut popup_text = format!(
                "{}: {} {}",
                options.metric_label, m.metric, options.metric_unit
            );
            for (column, text) in &m.attributes {
                popup_text.push('\n');
                popup_text.push_str(&format!("{}: {}", column, text));
            }

            Marker {
                location: m.location(),
                radius: options.marker_radius,
                color: scale.color(m.metric),
                fill_opacity: options.fill_opacity,
                popup_text,
            }
        })
        .collect();

    let domain = scale.domain();
    let legend = Legend {
        domain,
        caption: options.caption.clone(),
        palette: scale.palette().to_vec(),
        ticks: domain.ticks(options.legend_ticks),
    };

    tracing::info!(
        markers = markers.len(),
        center_lat = center.0,
        center_lon = center.1,
        zoom = options.zoom,
        policy = ?options.center_policy,
        "composed map"
    );

    RenderedMap {
        title: options.title.clone(),
        center,
        zoom: options.zoom,
        fit_bounds,
        tiles: options.tiles.clone(),
        markers,
        legend,
    }
}

fn bounding_box(measurements: &MeasurementSet) -> Bounds {
    let first = measurements.first();
    measurements.iter().fold(
        Bounds {
            south: first.latitude,
            west: first.longitude,
            north: first.latitude,
            east: first.longitude,
        },
        |b, m| Bounds {
            south: b.south.min(m.latitude),
            west: b.west.min(m.longitude),
            north: b.north.max(m.latitude),
            east: b.east.max(m.longitude),
        },
    )
}

fn centroid(measurements: &MeasurementSet) -> (f64, f64) {
    let n = measurements.len() as f64;
    let (lat_sum, lon_sum) = measurements
        .iter()
        .fold((0.0, 0.0), |(lat, lon), m| (lat + m.latitude, lon + m.longitude));
    (lat_sum / n, lon_sum / n)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coverage::loader::Measurement;
    use pretty_assertions::assert_eq;

    fn measurement(row: usize, latitude: f64, longitude: f64, metric: f64) -> Measurement {
        Measurement {
            latitude,
            longitude,
            metric,
            row,
            attributes: Vec::new(),
        }
    }

    fn red_yellow_green() -> Vec<Color> {
        vec![
            Color::rgb(215, 48, 39),
            Color::rgb(255, 255, 191),
            Color::rgb(26, 152, 80),
        ]
    }

    fn scenario_a() -> MeasurementSet {
        MeasurementSet::new(vec![
            measurement(1, 1.0, 2.0, -80.0),
            measurement(2, 1.1, 2.1, -100.0),
            measurement(3, 1.2, 2.2, -60.0),
        ])
        .unwrap()
    }

    #[test]
    fn test_one_marker_per_measurement_in_order() {
        let set = scenario_a();
        let scale = ColorScale::build(&set.metrics(), &red_yellow_green()).unwrap();
        let map = compose(&set, &scale, &ComposeOptions::default());

        assert_eq!(map.markers.len(), set.len());
        for (marker, m) in map.markers.iter().zip(set.iter()) {
            assert_eq!(marker.location, m.location());
            assert_eq!(marker.color, scale.color(m.metric));
            assert_eq!(marker.radius, 4.0);
            assert_eq!(marker.fill_opacity, 0.8);
        }
    }

    #[test]
    fn test_scenario_a_worst_and_best_ends() {
        let set = scenario_a();
        let palette = red_yellow_green();
        let scale = ColorScale::build(&set.metrics(), &palette).unwrap();
        let map = compose(&set, &scale, &ComposeOptions::default());

        assert_eq!(
            map.legend.domain,
            Domain {
                min: -100.0,
                max: -60.0
            }
        );
        assert_eq!(map.markers[1].color, palette[0]);
        assert_eq!(map.markers[2].color, palette[2]);
        assert_eq!(map.markers[0].color, palette[1]);
        assert_eq!(map.center, (1.0, 2.0));
        assert_eq!(map.fit_bounds, None);
    }

    #[test]
    fn test_scenario_b_single_point() {
        let set = MeasurementSet::new(vec![measurement(1, 0.0, 0.0, -90.0)]).unwrap();
        let scale = ColorScale::build(&set.metrics(), &red_yellow_green()).unwrap();
        let map = compose(&set, &scale, &ComposeOptions::default());

        assert_eq!(map.center, (0.0, 0.0));
        assert_eq!(map.markers.len(), 1);
        assert_eq!(
            map.legend.domain,
            Domain {
                min: -90.0,
                max: -90.0
            }
        );
        assert_eq!(map.legend.ticks, vec![-90.0]);
    }

    #[test]
    fn test_popup_text_has_value_unit_and_attributes() {
        let mut m = measurement(1, 1.0, 2.0, -80.0);
        m.attributes = vec![
            ("cellId".to_string(), "1234".to_string()),
            ("source".to_string(), "GPS".to_string()),
        ];
        let set = MeasurementSet::new(vec![m, measurement(2, 1.0, 2.0, -97.5)]).unwrap();
        let scale = ColorScale::build(&set.metrics(), &red_yellow_green()).unwrap();
        let map = compose(&set, &scale, &ComposeOptions::default());

        assert_eq!(map.markers[0].popup_text, "RSRP: -80 dBm\ncellId: 1234\nsource: GPS");
        assert_eq!(map.markers[1].popup_text, "RSRP: -97.5 dBm");
    }

    #[test]
    fn test_legend_summarizes_scale() {
        let set = scenario_a();
        let scale = ColorScale::build(&set.metrics(), &red_yellow_green()).unwrap();
        let options = ComposeOptions {
            caption: "Signal (dBm)".to_string(),
            legend_ticks: 3,
            ..ComposeOptions::default()
        };
        let map = compose(&set, &scale, &options);

        assert_eq!(map.legend.caption, "Signal (dBm)");
        assert_eq!(map.legend.palette, red_yellow_green());
        assert_eq!(map.legend.ticks, vec![-100.0, -80.0, -60.0]);
    }

    #[test]
    fn test_centroid_policy() {
        let set = MeasurementSet::new(vec![
            measurement(1, 0.0, 0.0, -80.0),
            measurement(2, 2.0, 4.0, -70.0),
        ])
        .unwrap();
        let scale = ColorScale::build(&set.metrics(), &red_yellow_green()).unwrap();
        let options = ComposeOptions {
            center_policy: CenterPolicy::Centroid,
            ..ComposeOptions::default()
        };
        let map = compose(&set, &scale, &options);
        assert_eq!(map.center, (1.0, 2.0));
        assert_eq!(map.fit_bounds, None);
    }

    #[test]
    fn test_fit_policy_sets_bounds() {
        let set = MeasurementSet::new(vec![
            measurement(1, 1.0, 5.0, -80.0),
            measurement(2, 3.0, 1.0, -70.0),
            measurement(3, 2.0, 3.0, -75.0),
        ])
        .unwrap();
        let scale = ColorScale::build(&set.metrics(), &red_yellow_green()).unwrap();
        let options = ComposeOptions {
            center_policy: CenterPolicy::Fit,
            ..ComposeOptions::default()
        };
        let map = compose(&set, &scale, &options);

        assert_eq!(
            map.fit_bounds,
            Some(Bounds {
                south: 1.0,
                west: 1.0,
                north: 3.0,
                east: 5.0
            })
        );
        assert_eq!(map.center, (2.0, 3.0));
    }

    #[test]
    fn test_center_policy_parse() {
        assert_eq!(CenterPolicy::parse("FIRST"), Some(CenterPolicy::First));
        assert_eq!(CenterPolicy::parse("centroid"), Some(CenterPolicy::Centroid));
        assert_eq!(CenterPolicy::parse("fit"), Some(CenterPolicy::Fit));
        assert_eq!(CenterPolicy::parse("middle"), None);
    }
}
