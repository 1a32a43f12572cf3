//! Typed errors for the edges of the crate
//!
//! The view pipeline itself cannot fail: malformed data degrades to missing
//! values and warnings. Errors only arise while loading a configuration or
//! parsing a dataset, before the pipeline ever runs.
//!
//! - [`ConfigError`]: reading, parsing or checking a view configuration
//! - [`DatasetError`]: reading or parsing dataset JSON
//! - [`ViewError`]: either of the above
//!
//! # Example
//!
//! ```rust,ignore
//! match ViewConfig::from_yaml_file("books.yaml") {
//!     Ok(config) => { /* ... */ }
//!     Err(ConfigError::UnknownColumn { column, context }) => {
//!         eprintln!("{} refers to undeclared column {}", context, column);
//!     }
//!     Err(e) => eprintln!("Other error: {}", e),
//! }
//! ```

use thiserror::Error;

/// Errors loading a view configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read configuration: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid configuration YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(#[from] validator::ValidationErrors),

    #[error("Configuration declares no columns")]
    NoColumns,

    #[error("Column '{0}' is declared more than once")]
    DuplicateColumn(String),

    #[error("{context} refers to unknown column '{column}'")]
    UnknownColumn { column: String, context: String },
}

impl ConfigError {
    pub fn error_code(&self) -> &'static str {
        match self {
            ConfigError::Io(_) => "CONFIG_IO",
            ConfigError::Yaml(_) => "CONFIG_YAML",
            ConfigError::Invalid(_) => "CONFIG_INVALID",
            ConfigError::NoColumns => "CONFIG_NO_COLUMNS",
            ConfigError::DuplicateColumn(_) => "CONFIG_DUPLICATE_COLUMN",
            ConfigError::UnknownColumn { .. } => "CONFIG_UNKNOWN_COLUMN",
        }
    }
}

/// Errors turning JSON text into records
#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("Failed to read dataset: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid dataset JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unsupported dataset shape: expected an array or an object with one of {expected:?}, got {found}")]
    UnsupportedShape {
        expected: Vec<String>,
        found: &'static str,
    },
}

impl DatasetError {
    pub fn error_code(&self) -> &'static str {
        match self {
            DatasetError::Io(_) => "DATASET_IO",
            DatasetError::Json(_) => "DATASET_JSON",
            DatasetError::UnsupportedShape { .. } => "DATASET_SHAPE",
        }
    }
}

/// Any error raised by this crate
#[derive(Debug, Error)]
pub enum ViewError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Dataset(#[from] DatasetError),
}

impl ViewError {
    /// Stable code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            ViewError::Config(e) => e.error_code(),
            ViewError::Dataset(e) => e.error_code(),
        }
    }
}

/// Result alias for fallible operations of this crate
pub type Result<T, E = ViewError> = std::result::Result<T, E>;
