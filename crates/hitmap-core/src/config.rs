//! Lightweight configuration loader.
//!
//! Uses Figment to merge built-in defaults + `hitmap.toml` +
//! `hitmap.<env>.toml` + `HITMAP_*` env vars.
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::Path;

use crate::error::{Error, Result};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaginationSettings {
    pub per_page: usize,
    pub page_name: String,
    pub on_each_side: usize,
    pub base_path: String,
}

impl Default for PaginationSettings {
    fn default() -> Self {
        Self { per_page: 25, page_name: "page".to_string(), on_each_side: 3, base_path: "/".to_string() }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RegistrySettings {
    /// Type names the CLI registers with the `Document` factory.
    pub types: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    pub pagination: PaginationSettings,
    pub registry: RegistrySettings,
}

pub struct Config {
    figment: Figment,
}

impl Config {
    pub fn load() -> Result<Self> {
        let env_name = env::var("RUST_ENV").unwrap_or_else(|_| "dev".to_string());

        let mut figment = Self::defaults().merge(Toml::file("hitmap.toml"));
        match env_name.as_str() {
            "dev" | "development" => figment = figment.merge(Toml::file("hitmap.dev.toml")),
            "prod" | "production" => figment = figment.merge(Toml::file("hitmap.prod.toml")),
            "test" | "testing" => figment = figment.merge(Toml::file("hitmap.test.toml")),
            _ => {}
        }
        figment = figment.merge(Env::prefixed("HITMAP_").split("__"));

        let config = Self { figment };
        config.validate()?;
        Ok(config)
    }

    /// Defaults plus a single TOML file; no environment overlay.
    pub fn from_file(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Err(Error::InvalidConfig(format!("config file not found: {}", path.display())));
        }
        let config = Self { figment: Self::defaults().merge(Toml::file(path)) };
        config.validate()?;
        Ok(config)
    }

    pub fn get<T>(&self, key: &str) -> Result<T>
    where
        T: serde::de::DeserializeOwned,
    {
        self.figment
            .extract_inner(key)
            .map_err(|e| Error::InvalidConfig(format!("Failed to get '{}': {}", key, e)))
    }

    pub fn settings(&self) -> Result<Settings> {
        self.figment.extract().map_err(|e| Error::InvalidConfig(e.to_string()))
    }

    fn defaults() -> Figment {
        Figment::from(Serialized::defaults(Settings::default()))
    }

    fn validate(&self) -> Result<()> {
        let pagination: PaginationSettings = self.get("pagination")?;
        if pagination.per_page == 0 {
            return Err(Error::InvalidConfig("pagination.per_page must be greater than zero".into()));
        }
        if pagination.page_name.is_empty() {
            return Err(Error::InvalidConfig("pagination.page_name must not be empty".into()));
        }
        Ok(())
    }
}
