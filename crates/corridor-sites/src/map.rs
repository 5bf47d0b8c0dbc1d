//! Map annotations for a derived record
//!
//! Three markers (station, substation, solar) and two lines from the
//! station, each tooltipped with its rounded distance. The dashboard draws
//! these with Leaflet; `to_geojson` serves any other map client.

use serde::Serialize;

use crate::record::DerivedRecord;
use crate::{Coordinate, Role};

/// Initial zoom level, close enough to see all three facilities.
pub const DEFAULT_ZOOM: u8 = 13;

pub const DISTANCE_UNIT: &str = "km";

const LINE_WEIGHT: f64 = 2.5;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Marker {
    pub role: Role,
    pub position: Coordinate,
    pub popup: String,
    pub color: &'static str,
    pub icon: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConnectingLine {
    pub from: Role,
    pub to: Role,
    pub path: [Coordinate; 2],
    pub distance_km: f64,
    pub unit: &'static str,
    pub tooltip: String,
    pub color: &'static str,
    pub weight: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapView {
    pub center: Coordinate,
    pub zoom: u8,
    pub markers: Vec<Marker>,
    pub lines: Vec<ConnectingLine>,
}

impl MapView {
    pub fn from_record(record: &DerivedRecord) -> Self {
        let markers = Role::ALL
            .into_iter()
            .map(|role| Marker {
                role,
                position: record.coordinate(role),
                popup: format!("{} - {}", record.site, role.label()),
                color: role.marker_color(),
                icon: role.marker_icon(),
            })
            .collect();

        let lines = [(Role::Substation, "black"), (Role::Solar, "green")]
            .into_iter()
            .map(|(to, color)| {
                let distance_km = record.distance_to(to);
                ConnectingLine {
                    from: Role::Station,
                    to,
                    path: [record.station, record.coordinate(to)],
                    distance_km,
                    unit: DISTANCE_UNIT,
                    tooltip: format!(
                        "Distance to {}: {} {}",
                        to.label(),
                        distance_km,
                        DISTANCE_UNIT
                    ),
                    color,
                    weight: LINE_WEIGHT,
                }
            })
            .collect();

        Self {
            center: record.station,
            zoom: DEFAULT_ZOOM,
            markers,
            lines,
        }
    }

    /// Markers as Point features and lines as LineString features.
    pub fn to_geojson(&self) -> serde_json::Value {
        let points = self.markers.iter().map(|m| {
            serde_json::json!({
                "type": "Feature",
                "geometry": {
                    "type": "Point",
                    "coordinates": [m.position.lon, m.position.lat]
                },
                "properties": {
                    "role": m.role,
                    "popup": m.popup,
                    "color": m.color,
                    "icon": m.icon
                }
            })
        });

        let lines = self.lines.iter().map(|l| {
            let coordinates: Vec<[f64; 2]> = l.path.iter().map(|c| [c.lon, c.lat]).collect();
            serde_json::json!({
                "type": "Feature",
                "geometry": {
                    "type": "LineString",
                    "coordinates": coordinates
                },
                "properties": {
                    "from": l.from,
                    "to": l.to,
                    "distance_km": l.distance_km,
                    "unit": l.unit,
                    "tooltip": l.tooltip,
                    "color": l.color,
                    "weight": l.weight
                }
            })
        });

        let features: Vec<serde_json::Value> = points.chain(lines).collect();

        serde_json::json!({
            "type": "FeatureCollection",
            "features": features
        })
    }
}
