// Settings are layered: built-in defaults, then an optional settings
// file, then VENUEFILTER__* environment variables.
use config::{Config, Environment, File};
use serde::Deserialize;

use crate::catalog::{Catalog, DEFAULT_WALKING_DISTANCE};
use crate::error::Result;
use crate::persist::PersistenceMode;

/// Looked up with any extension the config crate understands, e.g. `venuefilter.toml`.
pub const DEFAULT_FILE: &str = "venuefilter";

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub database: DatabaseSettings,
    pub catalog: CatalogSettings,
    pub startup: StartupSettings,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct DatabaseSettings {
    /// Store file, in-memory when absent.
    pub path: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct CatalogSettings {
    pub walking_distance: f64,
}
impl Default for CatalogSettings {
    fn default() -> Self {
        Self {
            walking_distance: DEFAULT_WALKING_DISTANCE,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct StartupSettings {
    /// Mark every venue as a favorite before the first fetch.
    pub normalize_favorites: bool,
    /// JSON file of venues imported into the store on startup.
    pub seed: Option<String>,
}

impl Settings {
    pub fn load() -> Result<Self> {
        Self::load_from(DEFAULT_FILE)
    }
    pub fn load_from(name: &str) -> Result<Self> {
        let settings = Config::builder()
            .add_source(File::with_name(name).required(false))
            .add_source(Environment::with_prefix("VENUEFILTER").separator("__").try_parsing(true))
            .build()?;
        Ok(settings.try_deserialize()?)
    }
    pub fn persistence_mode(&self) -> PersistenceMode {
        match &self.database.path {
            Some(path) => PersistenceMode::File(path.clone()),
            None => PersistenceMode::InMemory,
        }
    }
    pub fn catalog(&self) -> Catalog {
        Catalog::new(self.catalog.walking_distance)
    }
}
