//! Validated, read-only corridor catalogue

use std::collections::HashSet;

use serde::Serialize;
use tracing::info;

use crate::{CatalogueError, Coordinate, MalformedReason, Result, Site};

/// A named site within a corridor.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SiteEntry {
    pub name: String,
    pub site: Site,
}

/// A named route with its sites in listing order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Corridor {
    name: String,
    sites: Vec<SiteEntry>,
}

impl Corridor {
    pub fn new(name: impl Into<String>, sites: Vec<SiteEntry>) -> Self {
        Self {
            name: name.into(),
            sites,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn sites(&self) -> &[SiteEntry] {
        &self.sites
    }

    pub fn site(&self, name: &str) -> Option<&SiteEntry> {
        self.sites.iter().find(|entry| entry.name == name)
    }

    pub fn site_names(&self) -> impl Iterator<Item = &str> {
        self.sites.iter().map(|entry| entry.name.as_str())
    }
}

/// Corridor name → site name → site.
///
/// Only constructible through [`Catalogue::new`], which rejects the whole
/// catalogue on the first invalid corridor or site. There are no mutating
/// methods, so a shared `&Catalogue` is safe to read from any thread.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Catalogue {
    corridors: Vec<Corridor>,
}

impl Catalogue {
    pub fn new(corridors: Vec<Corridor>) -> Result<Self> {
        validate(&corridors)?;

        let catalogue = Self { corridors };
        info!(
            "Catalogue ready: {} corridors, {} sites",
            catalogue.corridors.len(),
            catalogue.site_count()
        );
        Ok(catalogue)
    }

    /// The corridor sites surveyed for the Ambala to Jalandhar route.
    pub fn ev_corridors() -> Result<Self> {
        let ambala_jalandhar = [
            (
                "Dera Bassi Site",
                (30.5445, 76.8215),
                (30.5488, 76.8260),
                (30.5502, 76.8185),
            ),
            (
                "Kurukshetra Site",
                (29.9679, 76.8783),
                (29.9459, 76.8994),
                (29.9500, 76.8500),
            ),
            (
                "Uchana Site",
                (29.7450, 76.9726),
                (29.7300, 76.9800),
                (29.7350, 76.9600),
            ),
        ];

        let sites = ambala_jalandhar
            .into_iter()
            .map(|(name, station, substation, solar)| SiteEntry {
                name: name.to_string(),
                site: Site::new(
                    Coordinate::new(station.0, station.1),
                    Coordinate::new(substation.0, substation.1),
                    Coordinate::new(solar.0, solar.1),
                ),
            })
            .collect();

        Self::new(vec![Corridor::new("Ambala to Jalandhar", sites)])
    }

    pub fn corridors(&self) -> &[Corridor] {
        &self.corridors
    }

    pub fn corridor(&self, name: &str) -> Option<&Corridor> {
        self.corridors.iter().find(|c| c.name == name)
    }

    pub fn corridor_names(&self) -> impl Iterator<Item = &str> {
        self.corridors.iter().map(|c| c.name.as_str())
    }

    pub fn site_names(&self, corridor: &str) -> Result<Vec<&str>> {
        self.corridor(corridor)
            .map(|c| c.site_names().collect())
            .ok_or_else(|| CatalogueError::CorridorNotFound(corridor.to_string()))
    }

    /// Every (corridor, site) pair in listing order.
    pub fn pairs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.corridors.iter().flat_map(|c| {
            c.sites
                .iter()
                .map(move |entry| (c.name.as_str(), entry.name.as_str()))
        })
    }

    pub fn site_count(&self) -> usize {
        self.corridors.iter().map(|c| c.sites.len()).sum()
    }
}

/// Checks in listing order and stops at the first failure.
fn validate(corridors: &[Corridor]) -> Result<()> {
    if corridors.is_empty() {
        return Err(CatalogueError::EmptyCatalogue);
    }

    let mut corridor_names = HashSet::new();
    for corridor in corridors {
        if !corridor_names.insert(corridor.name.as_str()) {
            return Err(CatalogueError::DuplicateCorridor(corridor.name.clone()));
        }
        if corridor.sites.is_empty() {
            return Err(CatalogueError::EmptyCorridor(corridor.name.clone()));
        }

        let mut site_names = HashSet::new();
        for entry in &corridor.sites {
            if !site_names.insert(entry.name.as_str()) {
                return Err(CatalogueError::DuplicateSite {
                    corridor: corridor.name.clone(),
                    site: entry.name.clone(),
                });
            }
            if let Some(role) = entry.site.invalid_role() {
                return Err(CatalogueError::MalformedSite {
                    corridor: corridor.name.clone(),
                    site: entry.name.clone(),
                    reason: MalformedReason::CoordinateOutOfRange(role),
                });
            }
        }
    }

    Ok(())
}
