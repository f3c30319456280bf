use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::extract::{ExtractorCatalog, DEFAULT_CATALOG_ROOT};
use crate::rdf::{DefaultGraphSubjects, NamespaceRegistry, Window};
use crate::types::NodePath;

/// Base URI subjects are minted under when nothing else is configured.
pub const DEFAULT_BASE_URI: &str = "http://localhost:8080/rest";

/// Settings for the mapping layer, usually read from `fresco.toml`.
///
/// ```toml
/// base_uri = "http://example.org/rest"
/// catalog_root = "/fedora:extractors"
/// default_limit = 50
/// log_filter = "fresco=debug"
///
/// [namespaces]
/// ex = "http://example.org/ns#"
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FrescoConfig {
    pub base_uri: String,
    pub catalog_root: String,
    /// Child window size used when the caller does not pass a limit. Absent
    /// means unbounded.
    pub default_limit: Option<u64>,
    /// Namespaces added to (or overriding) the built-in prefixes.
    pub namespaces: BTreeMap<String, String>,
    /// `tracing` filter directive, e.g. `fresco=debug`.
    pub log_filter: Option<String>,
}

impl Default for FrescoConfig {
    fn default() -> Self {
        Self {
            base_uri: DEFAULT_BASE_URI.to_owned(),
            catalog_root: DEFAULT_CATALOG_ROOT.to_owned(),
            default_limit: None,
            namespaces: BTreeMap::new(),
            log_filter: None,
        }
    }
}

impl FrescoConfig {
    /// Loads `explicit` if given, else the per-user config file if it
    /// exists, else the defaults. A missing explicit file is an error.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        match explicit {
            Some(path) => Self::from_file(path),
            None => match default_config_path() {
                Some(path) if path.exists() => Self::from_file(&path),
                _ => Ok(Self::default()),
            },
        }
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = toml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let config: Self =
            toml::from_str(contents).map_err(|source| ConfigError::ParseInline { source })?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if oxrdf::NamedNode::new(self.base_uri.as_str()).is_err() {
            return Err(ConfigError::InvalidBaseUri {
                value: self.base_uri.clone(),
            });
        }
        if NodePath::new(self.catalog_root.as_str()).map_or(true, |p| p.is_root()) {
            return Err(ConfigError::InvalidCatalogRoot {
                value: self.catalog_root.clone(),
            });
        }
        Ok(())
    }

    /// Built-in prefixes overlaid with the configured ones.
    pub fn namespace_registry(&self) -> NamespaceRegistry {
        let mut registry = NamespaceRegistry::default();
        for (prefix, uri) in &self.namespaces {
            registry.register(prefix.as_str(), uri.as_str());
        }
        registry
    }

    pub fn subjects(&self) -> DefaultGraphSubjects {
        DefaultGraphSubjects::new(self.base_uri.as_str())
    }

    pub fn catalog(&self) -> ExtractorCatalog {
        match NodePath::new(self.catalog_root.as_str()) {
            Ok(root) => ExtractorCatalog::new(root),
            Err(_) => ExtractorCatalog::default(),
        }
    }

    /// Window starting at `offset` with `limit`, falling back to
    /// `default_limit`. A negative limit means unbounded.
    pub fn window(&self, offset: u64, limit: Option<i64>) -> Window {
        match limit {
            Some(limit) => Window::from_signed(offset, limit),
            None => Window::new(offset, self.default_limit),
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("failed to parse config: {source}")]
    ParseInline { source: toml::de::Error },
    #[error("base_uri '{value}' is not an absolute IRI")]
    InvalidBaseUri { value: String },
    #[error("catalog_root '{value}' must be an absolute, non-root node path")]
    InvalidCatalogRoot { value: String },
}

pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|base| base.join("fresco").join("fresco.toml"))
}
