use thiserror::Error;

use crate::config::ConfigError;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum CatalogError {
    #[error("catalog is not a valid amenity list: {0}")]
    Malformed(String),
    #[error("catalog entry {index} is invalid: {reason}")]
    InvalidEntry { index: usize, reason: String },
}

#[derive(Debug, Error)]
pub enum ApplicationError {
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    #[error(transparent)]
    Configuration(#[from] ConfigError),
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("could not read `{path}`: {message}")]
    Io { path: String, message: String },
}

impl ApplicationError {
    /// Stable machine-readable class used in structured command output.
    pub fn error_class(&self) -> &'static str {
        match self {
            Self::Catalog(CatalogError::Malformed(_)) => "catalog_malformed",
            Self::Catalog(CatalogError::InvalidEntry { .. }) => "catalog_invalid_entry",
            Self::Configuration(_) => "config_validation",
            Self::InvalidInput(_) => "invalid_input",
            Self::Io { .. } => "io",
        }
    }

    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Configuration(_) => 2,
            Self::Catalog(_) | Self::InvalidInput(_) | Self::Io { .. } => 3,
        }
    }
}
