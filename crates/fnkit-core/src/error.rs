//! Error types shared by the scaffolding pipeline

use std::path::PathBuf;
use thiserror::Error;

/// Why a function name was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum NameError {
    #[error("Your name cannot be empty")]
    Empty,
    #[error("Your name cannot include whitespace")]
    Whitespace,
}

/// Fields the configuration resolver must populate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigField {
    Template,
    Filename,
}

impl std::fmt::Display for ConfigField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigField::Template => write!(f, "template"),
            ConfigField::Filename => write!(f, "filename"),
        }
    }
}

#[derive(Debug, Error)]
pub enum ScaffoldError {
    /// The template catalog could not be retrieved
    #[error("Failed to retrieve templates: {0:#}")]
    CatalogFetchFailed(#[source] anyhow::Error),

    #[error("No templates found")]
    EmptyCatalog,

    #[error("Template '{id}' not found. Available templates: {available}")]
    TemplateNotFound { id: String, available: String },

    /// The catalog listed the template but its files could not be retrieved
    #[error("Failed to fetch template '{id}': {source:#}")]
    TemplateFetchFailed {
        id: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("Invalid function name '{name}': {reason}")]
    InvalidFunctionName {
        name: String,
        #[source]
        reason: NameError,
    },

    #[error("No value was provided for {0}")]
    MissingField(ConfigField),

    #[error("A file already exists at {}. Refusing to overwrite it", .0.display())]
    FileExists(PathBuf),

    #[error("Template file path '{0}' points outside the project directory")]
    UnsafeTemplatePath(String),

    #[error("Template lists {} more than once", .0.display())]
    DuplicateTemplatePath(PathBuf),

    /// A write failed; files written before and alongside it stay on disk
    #[error("Failed to write {}: {source}", path.display())]
    ScaffoldWriteFailed {
        path: PathBuf,
        written: Vec<PathBuf>,
        #[source]
        source: std::io::Error,
    },

    #[error("Could not determine the current directory: {0}")]
    CurrentDir(#[source] std::io::Error),

    #[error("Prompt failed: {0}")]
    Prompt(#[source] std::io::Error),
}

pub type Result<T, E = ScaffoldError> = std::result::Result<T, E>;
