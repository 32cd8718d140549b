//! Static parts of the Leaflet document
//!
//! The document is assembled as HEAD + escaped title + BODY_OPEN + payload JSON
//! + BODY_CLOSE. All data lives in the JSON payload; the inline script only
//! reads it, so the chrome below never changes between runs.

pub const HEAD: &str = r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8" />
<meta name="viewport" content="width=device-width, initial-scale=1.0" />
<link rel="stylesheet" href="https://unpkg.com/leaflet@1.9.4/dist/leaflet.css" />
<script src="https://unpkg.com/leaflet@1.9.4/dist/leaflet.js"></script>
<style>
  html, body { width: 100%; height: 100%; margin: 0; padding: 0; }
  #map { position: absolute; top: 0; bottom: 0; left: 0; right: 0; }
  .signal-popup { white-space: pre-line; font: 12px/1.4 sans-serif; }
  .signal-legend { background: rgba(255, 255, 255, 0.85); padding: 6px 10px; border-radius: 4px; font: 11px/1.3 sans-serif; }
  .signal-legend .caption { font-weight: bold; margin-bottom: 4px; }
  .signal-legend .ramp { width: 260px; height: 12px; border: 1px solid #777; }
  .signal-legend .ticks { position: relative; width: 260px; height: 14px; }
  .signal-legend .ticks span { position: absolute; transform: translateX(-50%); white-space: nowrap; }
</style>
<title>"#;

pub const BODY_OPEN: &str = r#"</title>
</head>
<body>
<div id="map"></div>
<script type="application/json" id="signal-map-data">"#;

pub const BODY_CLOSE: &str = r#"</script>
<script>
(function () {
  var data = JSON.parse(document.getElementById("signal-map-data").textContent);
  var view = data.view;
  var map = L.map("map", { center: view.center, zoom: view.zoom });
  L.tileLayer(view.tileUrl, { attribution: view.tileAttribution, maxZoom: 19 }).addTo(map);
  if (view.bounds) {
    map.fitBounds(view.bounds);
  }

  data.markers.forEach(function (m) {
    var popup = document.createElement("div");
    popup.className = "signal-popup";
    popup.textContent = m.popup;
    L.circleMarker([m.lat, m.lon], {
      radius: m.radius,
      color: m.color,
      fill: true,
      fillColor: m.color,
      fillOpacity: m.fillOpacity
    }).bindPopup(popup).addTo(map);
  });

  var legend = data.legend;
  var control = L.control({ position: "topright" });
  control.onAdd = function () {
    var div = L.DomUtil.create("div", "signal-legend");
    var caption = L.DomUtil.create("div", "caption", div);
    caption.textContent = legend.caption;
    var ramp = L.DomUtil.create("div", "ramp", div);
    ramp.style.background = "linear-gradient(to right, " + legend.colors.join(", ") + ")";
    var ticks = L.DomUtil.create("div", "ticks", div);
    var span = legend.max - legend.min;
    legend.ticks.forEach(function (t) {
      var label = L.DomUtil.create("span", "", ticks);
      label.textContent = String(Math.round(t * 100) / 100);
      label.style.left = (span > 0 ? ((t - legend.min) / span) * 100 : 50) + "%";
    });
    return div;
  };
  control.addTo(map);
})();
</script>
</body>
</html>
"#;
