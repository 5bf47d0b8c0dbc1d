//! EV Corridor Sites
//!
//! Static catalogue of EV-corridor sites, each grouping a charging station,
//! the grid substation feeding it and a nearby solar source. Given a
//! (corridor, site) selection the crate resolves the three locations,
//! computes geodesic distances from the station and assembles the record
//! used by both the map view and the CSV export.
//!
//! ```text
//! Selection ──► selector::resolve ──► metrics::distance_km ──► record::build
//!                                                                 │
//!                                              ┌──────────────────┴──────┐
//!                                              ▼                         ▼
//!                                     map::MapView              export::to_csv
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod catalogue;
pub mod export;
pub mod loader;
pub mod map;
pub mod metrics;
pub mod record;
pub mod selector;

pub use catalogue::{Catalogue, Corridor, SiteEntry};
pub use map::MapView;
pub use record::DerivedRecord;
pub use selector::Selection;

#[derive(Error, Debug)]
pub enum CatalogueError {
    #[error("Corridor not found: {0}")]
    CorridorNotFound(String),
    #[error("Site not found: {site} (corridor {corridor})")]
    SiteNotFound { corridor: String, site: String },
    #[error("Malformed site {site} in corridor {corridor}: {reason}")]
    MalformedSite {
        corridor: String,
        site: String,
        reason: MalformedReason,
    },
    #[error("Corridor has no sites: {0}")]
    EmptyCorridor(String),
    #[error("Catalogue has no corridors")]
    EmptyCatalogue,
    #[error("Duplicate corridor: {0}")]
    DuplicateCorridor(String),
    #[error("Duplicate site {site} in corridor {corridor}")]
    DuplicateSite { corridor: String, site: String },
    #[error("Invalid catalogue format: {0}")]
    InvalidFormat(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl CatalogueError {
    /// True for a selection that does not exist in the catalogue.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            CatalogueError::CorridorNotFound(_) | CatalogueError::SiteNotFound { .. }
        )
    }

    /// True for load-time validation failures.
    pub fn is_malformed(&self) -> bool {
        matches!(
            self,
            CatalogueError::MalformedSite { .. }
                | CatalogueError::EmptyCorridor(_)
                | CatalogueError::EmptyCatalogue
                | CatalogueError::DuplicateCorridor(_)
                | CatalogueError::DuplicateSite { .. }
                | CatalogueError::InvalidFormat(_)
        )
    }
}

/// Why a site was rejected at load time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MalformedReason {
    MissingRole(Role),
    CoordinateOutOfRange(Role),
}

impl std::fmt::Display for MalformedReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MalformedReason::MissingRole(role) => write!(f, "missing {} coordinate", role.key()),
            MalformedReason::CoordinateOutOfRange(role) => {
                write!(f, "{} coordinate out of range", role.key())
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, CatalogueError>;

/// Geographic coordinate in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinate {
    pub const fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Finite and within [-90, 90] x [-180, 180].
    pub fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lon.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lon)
    }
}

/// The three facilities every site groups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Station,
    Substation,
    Solar,
}

impl Role {
    pub const ALL: [Role; 3] = [Role::Station, Role::Substation, Role::Solar];

    /// Key used in catalogue files.
    pub fn key(&self) -> &'static str {
        match self {
            Role::Station => "station",
            Role::Substation => "substation",
            Role::Solar => "solar",
        }
    }

    /// Human-facing label for popups, tooltips and export headers.
    pub fn label(&self) -> &'static str {
        match self {
            Role::Station => "Station",
            Role::Substation => "Substation",
            Role::Solar => "Solar Site",
        }
    }

    pub fn marker_color(&self) -> &'static str {
        match self {
            Role::Station => "blue",
            Role::Substation => "red",
            Role::Solar => "orange",
        }
    }

    pub fn marker_icon(&self) -> &'static str {
        match self {
            Role::Station => "info-sign",
            Role::Substation => "flash",
            Role::Solar => "star",
        }
    }
}

/// A station with its substation and solar source.
///
/// `Copy`, so a resolved site never aliases the catalogue's own data.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Site {
    pub station: Coordinate,
    pub substation: Coordinate,
    pub solar: Coordinate,
}

impl Site {
    pub const fn new(station: Coordinate, substation: Coordinate, solar: Coordinate) -> Self {
        Self {
            station,
            substation,
            solar,
        }
    }

    pub fn coordinate(&self, role: Role) -> Coordinate {
        match role {
            Role::Station => self.station,
            Role::Substation => self.substation,
            Role::Solar => self.solar,
        }
    }

    /// First role whose coordinate is out of range, if any.
    pub fn invalid_role(&self) -> Option<Role> {
        Role::ALL
            .into_iter()
            .find(|role| !self.coordinate(*role).is_valid())
    }
}
