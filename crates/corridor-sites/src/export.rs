//! CSV export of a derived record
//!
//! One header row and one data row, UTF-8. The second column carries the
//! site name under the `Station` header, as the dashboard has always
//! labelled it.

use csv::Writer;
use serde::Serialize;

use crate::record::DerivedRecord;
use crate::Result;

pub const CONTENT_TYPE: &str = "text/csv; charset=utf-8";

pub const FILE_SUFFIX: &str = "_data.csv";

pub const EXPORT_HEADERS: [&str; 10] = [
    "Corridor",
    "Station",
    "Station_Lat",
    "Station_Lon",
    "Substation_Lat",
    "Substation_Lon",
    "Solar_Lat",
    "Solar_Lon",
    "Distance to Substation (km)",
    "Distance to Solar Site (km)",
];

/// Serialized field order is the header order.
#[derive(Serialize)]
struct ExportRow<'a> {
    #[serde(rename = "Corridor")]
    corridor: &'a str,
    #[serde(rename = "Station")]
    site: &'a str,
    #[serde(rename = "Station_Lat")]
    station_lat: f64,
    #[serde(rename = "Station_Lon")]
    station_lon: f64,
    #[serde(rename = "Substation_Lat")]
    substation_lat: f64,
    #[serde(rename = "Substation_Lon")]
    substation_lon: f64,
    #[serde(rename = "Solar_Lat")]
    solar_lat: f64,
    #[serde(rename = "Solar_Lon")]
    solar_lon: f64,
    #[serde(rename = "Distance to Substation (km)")]
    distance_to_substation_km: f64,
    #[serde(rename = "Distance to Solar Site (km)")]
    distance_to_solar_km: f64,
}

impl<'a> From<&'a DerivedRecord> for ExportRow<'a> {
    fn from(record: &'a DerivedRecord) -> Self {
        Self {
            corridor: &record.corridor,
            site: &record.site,
            station_lat: record.station.lat,
            station_lon: record.station.lon,
            substation_lat: record.substation.lat,
            substation_lon: record.substation.lon,
            solar_lat: record.solar.lat,
            solar_lon: record.solar.lon,
            distance_to_substation_km: record.distance_to_substation_km,
            distance_to_solar_km: record.distance_to_solar_km,
        }
    }
}

/// `Ambala to Jalandhar` → `Ambala_to_Jalandhar_data.csv`
pub fn file_name(corridor: &str) -> String {
    format!("{}{}", corridor.replace(' ', "_"), FILE_SUFFIX)
}

/// Render the record as CSV bytes.
pub fn to_csv(record: &DerivedRecord) -> Result<Vec<u8>> {
    let mut writer = Writer::from_writer(Vec::new());
    writer.serialize(ExportRow::from(record))?;
    writer.flush()?;
    writer
        .into_inner()
        .map_err(|e| crate::CatalogueError::Io(e.into_error()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Catalogue, Selection};

    fn dera_bassi() -> DerivedRecord {
        let catalogue = Catalogue::ev_corridors().unwrap();
        Selection::new("Ambala to Jalandhar", "Dera Bassi Site")
            .evaluate(&catalogue)
            .unwrap()
    }

    #[test]
    fn test_file_name() {
        assert_eq!(file_name("Ambala to Jalandhar"), "Ambala_to_Jalandhar_data.csv");
        assert_eq!(file_name("Solo"), "Solo_data.csv");
    }

    #[test]
    fn test_csv_content() {
        let csv = String::from_utf8(to_csv(&dera_bassi()).unwrap()).unwrap();
        assert_eq!(
            csv,
            "Corridor,Station,Station_Lat,Station_Lon,Substation_Lat,Substation_Lon,\
             Solar_Lat,Solar_Lon,Distance to Substation (km),Distance to Solar Site (km)\n\
             Ambala to Jalandhar,Dera Bassi Site,30.5445,76.8215,30.5488,76.826,\
             30.5502,76.8185,0.64,0.69\n"
        );
    }

    #[test]
    fn test_header_order() {
        let bytes = to_csv(&dera_bassi()).unwrap();
        let mut reader = csv::Reader::from_reader(bytes.as_slice());
        let headers: Vec<String> = reader.headers().unwrap().iter().map(String::from).collect();
        assert_eq!(headers, EXPORT_HEADERS);
        assert_eq!(reader.records().count(), 1);
    }

    #[test]
    fn test_names_with_commas_are_quoted() {
        let mut record = dera_bassi();
        record.site = "Site, North".to_string();
        let csv = String::from_utf8(to_csv(&record).unwrap()).unwrap();
        assert!(csv.contains("\"Site, North\""));
    }
}
