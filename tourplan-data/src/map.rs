//! Map output for rendered solutions.
//!
//! [`feature_collection`] turns the layers of a [`RenderedSolution`] into a
//! GeoJSON document and [`leaflet_page`] embeds that document in a
//! standalone HTML page.

use serde_json::{Value, json};
use tourplan_core::{Location, MapLayer, RenderedSolution};

/// Initial zoom level of the HTML map.
pub const DEFAULT_ZOOM: u8 = 11;

/// Marker fill colour.
pub const MARKER_COLOUR: &str = "#00008b";

const HERE_TILES: &str = "https://2.base.maps.ls.hereapi.com/maptile/2.1/maptile/newest/normal.day/{z}/{x}/{y}/512/png8?apiKey=";
const HERE_ATTRIBUTION: &str = r#"Map data &copy; <a href="https://www.here.com/">HERE</a>"#;
const OSM_TILES: &str = "https://tile.openstreetmap.org/{z}/{x}/{y}.png";
const OSM_ATTRIBUTION: &str =
    r#"&copy; <a href="https://www.openstreetmap.org/copyright">OpenStreetMap</a> contributors"#;

/// Base map tiles for the HTML page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileLayer {
    /// URL template with `{z}`, `{x}` and `{y}` placeholders.
    pub url_template: String,
    /// HTML attribution shown on the map.
    pub attribution: String,
}

impl TileLayer {
    /// HERE raster tiles authorised by `api_key`.
    #[must_use]
    pub fn here(api_key: &str) -> Self {
        Self {
            url_template: format!("{HERE_TILES}{api_key}"),
            attribution: HERE_ATTRIBUTION.to_owned(),
        }
    }

    /// Public OpenStreetMap tiles.
    #[must_use]
    pub fn open_street_map() -> Self {
        Self {
            url_template: OSM_TILES.to_owned(),
            attribution: OSM_ATTRIBUTION.to_owned(),
        }
    }

    /// HERE tiles when a key is available, OpenStreetMap otherwise.
    #[must_use]
    pub fn for_key(api_key: Option<&str>) -> Self {
        api_key
            .filter(|key| !key.trim().is_empty())
            .map_or_else(Self::open_street_map, Self::here)
    }
}

impl Default for TileLayer {
    fn default() -> Self {
        Self::open_street_map()
    }
}

fn position(location: Location) -> Value {
    json!([location.lng, location.lat])
}

fn vehicle_id(solution: &RenderedSolution, tour: usize) -> Value {
    solution
        .response
        .tours
        .get(tour)
        .and_then(|t| t.vehicle_id.clone())
        .map_or(Value::Null, Value::String)
}

/// GeoJSON `FeatureCollection` of every marker and polyline.
///
/// Positions are written `[lng, lat]`. Each feature carries its `tour` index
/// and the tour's `vehicleId` when the service supplied one.
#[must_use]
pub fn feature_collection(solution: &RenderedSolution) -> Value {
    let features: Vec<Value> = solution
        .tours
        .layers
        .iter()
        .map(|layer| match layer {
            MapLayer::Marker { tour, location } => json!({
                "type": "Feature",
                "geometry": {"type": "Point", "coordinates": position(*location)},
                "properties": {
                    "kind": "stop",
                    "tour": tour,
                    "vehicleId": vehicle_id(solution, *tour),
                    "marker-color": MARKER_COLOUR,
                },
            }),
            MapLayer::Polyline { tour, path } => json!({
                "type": "Feature",
                "geometry": {
                    "type": "LineString",
                    "coordinates": path.iter().copied().map(position).collect::<Vec<_>>(),
                },
                "properties": {
                    "kind": "route",
                    "tour": tour,
                    "vehicleId": vehicle_id(solution, *tour),
                },
            }),
        })
        .collect();
    json!({"type": "FeatureCollection", "features": features})
}

/// Standalone Leaflet page centred on the plan centroid.
///
/// Markers use [`MARKER_COLOUR`]; polylines cycle through a small palette
/// by tour index.
#[must_use]
pub fn leaflet_page(solution: &RenderedSolution, tiles: &TileLayer) -> String {
    let geojson = feature_collection(solution).to_string().replace("</", "<\\/");
    let centre = json!([solution.centroid.lat, solution.centroid.lng]);
    let tile_url = Value::String(tiles.url_template.clone());
    let attribution = Value::String(tiles.attribution.clone());
    format!(
        r##"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<title>Tour plan {id}</title>
<link rel="stylesheet" href="https://unpkg.com/leaflet@1.9.4/dist/leaflet.css">
<script src="https://unpkg.com/leaflet@1.9.4/dist/leaflet.js"></script>
<style>html, body, #map {{ height: 100%; margin: 0; }}</style>
</head>
<body>
<div id="map"></div>
<script>
const map = L.map("map").setView({centre}, {zoom});
L.tileLayer({tile_url}, {{ attribution: {attribution} }}).addTo(map);
const palette = ["#1f77b4", "#ff7f0e", "#2ca02c", "#d62728", "#9467bd", "#8c564b"];
L.geoJSON({geojson}, {{
  pointToLayer: (feature, latlng) => L.circleMarker(latlng, {{
    radius: 5, color: "{colour}", fillColor: "{colour}", fillOpacity: 1
  }}),
  style: (feature) => ({{ color: palette[feature.properties.tour % palette.length], weight: 4 }})
}}).addTo(map);
</script>
</body>
</html>
"##,
        id = html_escape(&solution.request.id),
        zoom = DEFAULT_ZOOM,
        colour = MARKER_COLOUR,
    )
}

fn html_escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rstest::{fixture, rstest};
    use tourplan_core::{FleetRow, JobRow, PlanParameters, plan};

    use crate::routing::test_support::{StubDirectionsProvider, StubRoutingService};

    const SOLUTION: &str = r#"{
        "statistic": {"cost": 12.0, "distance": 3000, "times": {"driving": 1800, "serving": 600, "waiting": 0, "break": 0}},
        "tours": [{"vehicleId": "vehicle_1_1", "stops": [
            {"location": {"lat": 52.1, "lng": 5.1}},
            {"location": {"lat": 52.0, "lng": 5.0}}
        ]}]
    }"#;

    #[fixture]
    fn solution() -> RenderedSolution {
        let depot = Location::new(52.1, 5.1);
        let jobs = vec![JobRow::delivery("job_1", Location::new(52.0, 5.0), 3)];
        let params =
            PlanParameters::with_defaults(NaiveDate::from_ymd_opt(2024, 5, 1).expect("date"));
        plan(
            &jobs,
            &FleetRow {
                shift_start: depot,
                shift_end: depot,
            },
            &params,
            &StubRoutingService::with_response(SOLUTION),
            &StubDirectionsProvider::echo(),
        )
        .expect("pipeline succeeds")
    }

    #[rstest]
    fn features_use_longitude_first(solution: RenderedSolution) {
        let collection = feature_collection(&solution);
        let features = collection["features"].as_array().expect("features array");
        assert_eq!(features.len(), 3);
        assert_eq!(features[0]["geometry"]["type"], "Point");
        assert_eq!(features[0]["geometry"]["coordinates"], json!([5.1, 52.1]));
        assert_eq!(features[0]["properties"]["vehicleId"], "vehicle_1_1");
        assert_eq!(features[2]["geometry"]["type"], "LineString");
        assert_eq!(
            features[2]["geometry"]["coordinates"],
            json!([[5.1, 52.1], [5.0, 52.0]])
        );
    }

    #[rstest]
    fn page_embeds_centre_tiles_and_layers(solution: RenderedSolution) {
        let page = leaflet_page(&solution, &TileLayer::here("tile-key"));
        assert!(page.contains("setView([52.0,5.0], 11)"));
        assert!(page.contains("png8?apiKey=tile-key"));
        assert!(page.contains(r#""LineString""#));
        assert!(page.contains(MARKER_COLOUR));
        assert!(page.contains(r##"const palette = ["#1f77b4", "#ff7f0e""##));
        assert!(page.trim_end().ends_with("</html>"));
    }

    #[rstest]
    #[case(None, OSM_TILES)]
    #[case(Some("  "), OSM_TILES)]
    fn tiles_fall_back_to_open_street_map(#[case] key: Option<&str>, #[case] expected: &str) {
        assert_eq!(TileLayer::for_key(key).url_template, expected);
    }

    #[rstest]
    fn tiles_use_here_with_a_key() {
        assert!(
            TileLayer::for_key(Some("abc"))
                .url_template
                .ends_with("apiKey=abc")
        );
    }
}
