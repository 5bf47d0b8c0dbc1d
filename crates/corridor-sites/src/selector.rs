//! Selection resolution against the catalogue

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::record::{self, DerivedRecord};
use crate::{Catalogue, CatalogueError, Result, Site};

/// Resolve a (corridor, site) pair to a copy of its site.
///
/// Never falls back to another corridor or site; a missing key is an error.
pub fn resolve(catalogue: &Catalogue, corridor: &str, site: &str) -> Result<Site> {
    let found = catalogue
        .corridor(corridor)
        .ok_or_else(|| CatalogueError::CorridorNotFound(corridor.to_string()))?;

    found
        .site(site)
        .map(|entry| entry.site)
        .ok_or_else(|| CatalogueError::SiteNotFound {
            corridor: corridor.to_string(),
            site: site.to_string(),
        })
}

/// A user's current choice of corridor and site.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    pub corridor: String,
    pub site: String,
}

impl Selection {
    pub fn new(corridor: impl Into<String>, site: impl Into<String>) -> Self {
        Self {
            corridor: corridor.into(),
            site: site.into(),
        }
    }

    /// First corridor and its first site, the dashboard's initial view.
    pub fn initial(catalogue: &Catalogue) -> Option<Self> {
        catalogue
            .pairs()
            .next()
            .map(|(corridor, site)| Self::new(corridor, site))
    }

    /// Resolve and build a fresh record for this selection.
    pub fn evaluate(&self, catalogue: &Catalogue) -> Result<DerivedRecord> {
        let site = resolve(catalogue, &self.corridor, &self.site)?;
        debug!("Resolved {} / {}", self.corridor, self.site);
        Ok(record::build(&self.corridor, &self.site, &site))
    }
}
