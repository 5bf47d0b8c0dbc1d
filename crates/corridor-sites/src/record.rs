//! Per-selection derived record

use serde::{Deserialize, Serialize};

use crate::export;
use crate::metrics::distance_km;
use crate::{Coordinate, Role, Site};

/// Decimal places kept for presented distances.
pub const DISTANCE_DECIMALS: usize = 2;

/// Round a distance for presentation.
///
/// Rounds the exact binary value, ties to even, so `0.125` becomes `0.12`
/// and `1.115` (stored just below) becomes `1.11`. Scaling by 100 first
/// would round both up.
///
/// The only place distances are rounded; map tooltips and the CSV export
/// both read the rounded values from [`DerivedRecord`].
pub fn round_km(km: f64) -> f64 {
    format!("{:.*}", DISTANCE_DECIMALS, km)
        .parse()
        .unwrap_or(km)
}

/// A resolved site with its station distances, for the map and the export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DerivedRecord {
    pub corridor: String,
    pub site: String,
    pub station: Coordinate,
    pub substation: Coordinate,
    pub solar: Coordinate,
    /// Station to substation, km, rounded
    pub distance_to_substation_km: f64,
    /// Station to solar source, km, rounded
    pub distance_to_solar_km: f64,
}

impl DerivedRecord {
    pub fn coordinate(&self, role: Role) -> Coordinate {
        match role {
            Role::Station => self.station,
            Role::Substation => self.substation,
            Role::Solar => self.solar,
        }
    }

    /// Rounded distance from the station; zero for the station itself.
    pub fn distance_to(&self, role: Role) -> f64 {
        match role {
            Role::Station => 0.0,
            Role::Substation => self.distance_to_substation_km,
            Role::Solar => self.distance_to_solar_km,
        }
    }

    /// Download file name for this record's export.
    pub fn file_name(&self) -> String {
        export::file_name(&self.corridor)
    }
}

/// Assemble the record for a resolved site.
pub fn build(corridor: &str, site_name: &str, site: &Site) -> DerivedRecord {
    DerivedRecord {
        corridor: corridor.to_string(),
        site: site_name.to_string(),
        station: site.station,
        substation: site.substation,
        solar: site.solar,
        distance_to_substation_km: round_km(distance_km(site.station, site.substation)),
        distance_to_solar_km: round_km(distance_km(site.station, site.solar)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dera_bassi() -> Site {
        Site::new(
            Coordinate::new(30.5445, 76.8215),
            Coordinate::new(30.5488, 76.8260),
            Coordinate::new(30.5502, 76.8185),
        )
    }

    #[test]
    fn test_round_km() {
        assert_eq!(round_km(0.643187), 0.64);
        assert_eq!(round_km(0.694388), 0.69);
        assert_eq!(round_km(3.376290), 3.38);
        assert_eq!(round_km(0.0), 0.0);
        assert_eq!(round_km(12.0), 12.0);
    }

    #[test]
    fn test_round_km_ties() {
        // Exact binary ties go to the even digit
        assert_eq!(round_km(0.125), 0.12);
        assert_eq!(round_km(0.375), 0.38);
        // Decimal-looking ties sit just below in binary
        assert_eq!(round_km(1.115), 1.11);
        assert_eq!(round_km(2.675), 2.67);
    }

    #[test]
    fn test_build_dera_bassi() {
        let record = build("Ambala to Jalandhar", "Dera Bassi Site", &dera_bassi());

        assert_eq!(record.corridor, "Ambala to Jalandhar");
        assert_eq!(record.site, "Dera Bassi Site");
        assert_eq!(record.station, Coordinate::new(30.5445, 76.8215));
        assert_eq!(record.distance_to_substation_km, 0.64);
        assert_eq!(record.distance_to_solar_km, 0.69);
        assert_eq!(record.distance_to(Role::Station), 0.0);
        assert_eq!(record.file_name(), "Ambala_to_Jalandhar_data.csv");
    }

    #[test]
    fn test_build_is_deterministic() {
        let site = dera_bassi();
        let first = build("Ambala to Jalandhar", "Dera Bassi Site", &site);
        let second = build("Ambala to Jalandhar", "Dera Bassi Site", &site);

        assert_eq!(first, second);
        assert_eq!(
            serde_json::to_vec(&first).unwrap(),
            serde_json::to_vec(&second).unwrap()
        );
    }

    #[test]
    fn test_rounding_applied_once() {
        let record = build("C", "S", &dera_bassi());
        // Rounding a rounded value must not move it
        assert_eq!(round_km(record.distance_to_solar_km), record.distance_to_solar_km);
    }
}
