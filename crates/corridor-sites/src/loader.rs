//! Catalogue loading from JSON files
//!
//! The file mirrors the catalogue's nesting:
//!
//! ```json
//! {
//!   "Ambala to Jalandhar": {
//!     "Dera Bassi Site": {
//!       "station":    {"lat": 30.5445, "lon": 76.8215},
//!       "substation": {"lat": 30.5488, "lon": 76.8260},
//!       "solar":      {"lat": 30.5502, "lon": 76.8185}
//!     }
//!   }
//! }
//! ```
//!
//! Key order is preserved and becomes the listing order.

use serde::de::{Deserializer, MapAccess, Visitor};
use serde::Deserialize;
use serde_json::error::Category;
use std::fmt;
use std::fs::File;
use std::io::BufReader;
use std::marker::PhantomData;
use std::path::Path;
use tracing::info;

use crate::catalogue::{Catalogue, Corridor, SiteEntry};
use crate::{CatalogueError, Coordinate, MalformedReason, Result, Role, Site};

/// JSON object kept as ordered `(key, value)` pairs.
///
/// Repeated keys are all kept so catalogue validation can reject them.
#[derive(Debug)]
struct Entries<V>(Vec<(String, V)>);

impl<'de, V: Deserialize<'de>> Deserialize<'de> for Entries<V> {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct EntriesVisitor<V>(PhantomData<V>);

        impl<'de, V: Deserialize<'de>> Visitor<'de> for EntriesVisitor<V> {
            type Value = Entries<V>;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("an object keyed by name")
            }

            fn visit_map<A>(self, mut map: A) -> std::result::Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some(entry) = map.next_entry::<String, V>()? {
                    entries.push(entry);
                }
                Ok(Entries(entries))
            }
        }

        deserializer.deserialize_map(EntriesVisitor(PhantomData))
    }
}

type RawCatalogue = Entries<Entries<RawSite>>;

/// Raw site from JSON; roles are optional so a missing one can be reported.
#[derive(Debug, Deserialize)]
struct RawSite {
    station: Option<Coordinate>,
    substation: Option<Coordinate>,
    solar: Option<Coordinate>,
}

impl RawSite {
    fn into_site(self, corridor: &str, site: &str) -> Result<Site> {
        let require = |coordinate: Option<Coordinate>, role: Role| {
            coordinate.ok_or_else(|| CatalogueError::MalformedSite {
                corridor: corridor.to_string(),
                site: site.to_string(),
                reason: MalformedReason::MissingRole(role),
            })
        };

        Ok(Site::new(
            require(self.station, Role::Station)?,
            require(self.substation, Role::Substation)?,
            require(self.solar, Role::Solar)?,
        ))
    }
}

/// Load and validate a catalogue from a JSON file
pub fn load_catalogue(path: impl AsRef<Path>) -> Result<Catalogue> {
    let path = path.as_ref();
    info!("Loading catalogue from {:?}", path);

    let file = File::open(path)?;
    let reader = BufReader::new(file);
    let raw: RawCatalogue = serde_json::from_reader(reader).map_err(parse_error)?;

    from_raw(raw)
}

/// Parse and validate a catalogue from a JSON string
pub fn parse_catalogue(json: &str) -> Result<Catalogue> {
    from_raw(serde_json::from_str(json).map_err(parse_error)?)
}

/// Well-formed JSON of the wrong shape is a format error, not a JSON error.
fn parse_error(err: serde_json::Error) -> CatalogueError {
    match err.classify() {
        Category::Data => CatalogueError::InvalidFormat(err.to_string()),
        _ => CatalogueError::Json(err),
    }
}

fn from_raw(raw: RawCatalogue) -> Result<Catalogue> {
    let mut parsed = Vec::with_capacity(raw.0.len());
    for (corridor_name, sites) in raw.0 {
        let mut entries = Vec::with_capacity(sites.0.len());
        for (site_name, raw_site) in sites.0 {
            let site = raw_site.into_site(&corridor_name, &site_name)?;
            entries.push(SiteEntry {
                name: site_name,
                site,
            });
        }

        parsed.push(Corridor::new(corridor_name, entries));
    }

    Catalogue::new(parsed)
}
