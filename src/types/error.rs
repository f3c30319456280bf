use std::io;

use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, FrescoError>;

/// Errors surfaced by the repository, mapping and extraction layers.
#[derive(Debug, Error)]
pub enum FrescoError {
    /// No extractor catalog entry exists for the requested type name.
    ///
    /// An entry that exists but lists no extractors is not an error.
    #[error("no extractor catalog entry for type {0}")]
    CatalogNotFound(String),
    /// The storage engine has no node at the given path.
    #[error("node not found: {0}")]
    NodeNotFound(String),
    /// An extractor identifier could not be turned into a live extractor.
    #[error("unable to create extractor {id}: {reason}")]
    Instantiation {
        /// Catalog identifier of the extractor.
        id: String,
        /// Why construction failed.
        reason: String,
    },
    /// Any other failure reported by the storage engine.
    #[error("storage failure: {0}")]
    Storage(String),
    /// A node path was not absolute or contained empty segments.
    #[error("invalid path: {0}")]
    InvalidPath(String),
    /// Invalid argument supplied by the caller.
    #[error("invalid argument: {0}")]
    Invalid(String),
    /// Configuration could not be loaded.
    #[error(transparent)]
    Config(#[from] crate::config::ConfigError),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl FrescoError {
    pub(crate) fn storage(message: impl Into<String>) -> Self {
        FrescoError::Storage(message.into())
    }

    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        FrescoError::Invalid(message.into())
    }

    pub(crate) fn instantiation(id: impl Into<String>, reason: impl Into<String>) -> Self {
        FrescoError::Instantiation {
            id: id.into(),
            reason: reason.into(),
        }
    }

    /// Returns true when the error denotes a missing catalog entry.
    pub fn is_catalog_not_found(&self) -> bool {
        matches!(self, FrescoError::CatalogNotFound(_))
    }
}
