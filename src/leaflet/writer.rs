//! Artifact writer: serializes a RenderedMap into a standalone Leaflet HTML file
//!
//! Flow:
//! 1. RenderedMap → MapPayload (plain serde structs, fixed field order)
//! 2. MapPayload → JSON, with `<`, `>` and `&` written as `\u` escapes so no
//!    cell text can end or re-open its script element
//! 3. JSON + static template → HTML document
//! 4. Document → temp file in the destination directory → persisted over the
//!    destination only after a complete write

use super::template::{BODY_CLOSE, BODY_OPEN, HEAD};
use crate::coverage::{Color, CoverageError, DataError, RenderedMap, Result};
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

const PAYLOAD_OPEN: &str = r#"<script type="application/json" id="signal-map-data">"#;

/// Data embedded in the document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapPayload {
    pub title: String,
    pub view: ViewPayload,
    pub markers: Vec<MarkerPayload>,
    pub legend: LegendPayload,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewPayload {
    pub center: [f64; 2],
    pub zoom: u8,
    /// `[[south, west], [north, east]]`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bounds: Option<[[f64; 2]; 2]>,
    pub tile_url: String,
    pub tile_attribution: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkerPayload {
    pub lat: f64,
    pub lon: f64,
    pub radius: f64,
    pub color: Color,
    pub fill_opacity: f64,
    pub popup: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegendPayload {
    pub caption: String,
    pub min: f64,
    pub max: f64,
    pub colors: Vec<Color>,
    pub ticks: Vec<f64>,
}

impl From<&RenderedMap> for MapPayload {
    fn from(map: &RenderedMap) -> Self {
        MapPayload {
            title: map.title.clone(),
            view: ViewPayload {
                center: [map.center.0, map.center.1],
                zoom: map.zoom,
                bounds: map
                    .fit_bounds
                    .map(|b| [[b.south, b.west], [b.north, b.east]]),
                tile_url: map.tiles.url.clone(),
                tile_attribution: map.tiles.attribution.clone(),
            },
            markers: map
                .markers
                .iter()
                .map(|m| MarkerPayload {
                    lat: m.location.0,
                    lon: m.location.1,
                    radius: m.radius,
                    color: m.color,
                    fill_opacity: m.fill_opacity,
                    popup: m.popup_text.clone(),
                })
                .collect(),
            legend: LegendPayload {
                caption: map.legend.caption.clone(),
                min: map.legend.domain.min,
                max: map.legend.domain.max,
                colors: map.legend.palette.clone(),
                ticks: map.legend.ticks.clone(),
            },
        }
    }
}

/// Render the complete HTML document for `map`
pub fn render(map: &RenderedMap) -> Result<String> {
    let payload = MapPayload::from(map);
    let json = serde_json::to_string(&payload)
        .map_err(|e| CoverageError::Config(format!("cannot serialize map payload: {}", e)))?;
    let json = escape_script_data(&json);

    let title = escape_html(&map.title);
    let capacity = HEAD.len() + title.len() + BODY_OPEN.len() + json.len() + BODY_CLOSE.len();
    let mut document = String::with_capacity(capacity);
    document.push_str(HEAD);
    document.push_str(&title);
    document.push_str(BODY_OPEN);
    document.push_str(&json);
    document.push_str(BODY_CLOSE);

    Ok(document)
}

/// Write `map` to `destination` atomically
///
/// On any failure the destination is left untouched and no temp file remains.
pub fn write(map: &RenderedMap, destination: &Path) -> Result<()> {
    let document = render(map)?;

    let dir = match destination.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut tmp = NamedTempFile::new_in(dir).map_err(|e| CoverageError::io(destination, e))?;
    tmp.write_all(document.as_bytes())
        .and_then(|_| tmp.as_file().sync_all())
        .map_err(|e| CoverageError::io(destination, e))?;
    tmp.persist(destination)
        .map_err(|e| CoverageError::io(destination, e.error))?;

    tracing::info!(
        path = %destination.display(),
        bytes = document.len(),
        markers = map.markers.len(),
        "wrote map document"
    );

    Ok(())
}

/// Re-parse the payload embedded in a rendered document
pub fn extract_payload(document: &str) -> Result<MapPayload> {
    let start = document
        .find(PAYLOAD_OPEN)
        .map(|i| i + PAYLOAD_OPEN.len())
        .ok_or_else(|| DataError::Malformed("document has no map payload".to_string()))?;
    let len = document[start..]
        .find("</script>")
        .ok_or_else(|| DataError::Malformed("unterminated map payload".to_string()))?;

    serde_json::from_str(&document[start..start + len])
        .map_err(|e| DataError::Malformed(format!("invalid map payload: {}", e)).into())
}

/// JSON only has these characters inside strings, where `\uXXXX` is equivalent
fn escape_script_data(json: &str) -> String {
    let mut out = String::with_capacity(json.len());
    for c in json.chars() {
        match c {
            '<' => out.push_str("\\u003c"),
            '>' => out.push_str("\\u003e"),
            '&' => out.push_str("\\u0026"),
            _ => out.push(c),
        }
    }
    out
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
