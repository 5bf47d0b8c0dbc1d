//! Gateway configuration from environment variables
//!
//! | Variable                  | Default                 |
//! |---------------------------|-------------------------|
//! | `CORRIDOR_GATEWAY_PORT`   | `PORT`, then `18610`    |
//! | `CORRIDOR_BIND_HOST`      | `0.0.0.0`               |
//! | `CORRIDOR_CATALOGUE_PATH` | built-in catalogue      |
//! | `CORRIDOR_UI_PATH`        | `ui/corridor-dashboard` |

use std::path::PathBuf;

use corridor_sites::{loader, Catalogue, CatalogueError};

pub const DEFAULT_PORT: &str = "18610";
pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_UI_PATH: &str = "ui/corridor-dashboard";
pub const DEFAULT_LOG_FILTER: &str = "corridor_gateway=debug,corridor_sites=info,info";

#[derive(Debug, Clone, PartialEq)]
pub struct GatewayConfig {
    pub host: String,
    pub port: String,
    pub catalogue_path: Option<PathBuf>,
    pub ui_path: PathBuf,
}

impl GatewayConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let port = lookup("CORRIDOR_GATEWAY_PORT")
            .or_else(|| lookup("PORT"))
            .unwrap_or_else(|| DEFAULT_PORT.to_string());

        Self {
            host: lookup("CORRIDOR_BIND_HOST").unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port,
            catalogue_path: lookup("CORRIDOR_CATALOGUE_PATH")
                .filter(|p| !p.is_empty())
                .map(PathBuf::from),
            ui_path: lookup("CORRIDOR_UI_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_UI_PATH)),
        }
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Built-in catalogue unless a catalogue file is configured.
    pub fn load_catalogue(&self) -> corridor_sites::Result<Catalogue> {
        match &self.catalogue_path {
            Some(path) => loader::load_catalogue(path),
            None => Catalogue::ev_corridors(),
        }
    }

    /// Start-up failure for a catalogue that could not be loaded.
    ///
    /// Bad catalogue data is reported as rejected so the operator fixes the
    /// file; read and parse failures keep their cause chain.
    pub fn catalogue_error(&self, err: CatalogueError) -> anyhow::Error {
        let source = match &self.catalogue_path {
            Some(path) => path.display().to_string(),
            None => "built-in catalogue".to_string(),
        };

        if err.is_malformed() {
            anyhow::anyhow!("catalogue rejected ({}): {}", source, err)
        } else {
            anyhow::Error::new(err).context(format!("failed to load catalogue from {}", source))
        }
    }
}
