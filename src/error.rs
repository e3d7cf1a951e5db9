//! Error types shared by the page store, renderer and templates

use std::path::PathBuf;
use thiserror::Error;

/// Errors produced while loading, saving or rendering pages
#[derive(Error, Debug)]
pub enum WikiError {
    #[error("Page not found: {0}")]
    NotFound(String),

    #[error("Invalid page title: {0:?}")]
    InvalidTitle(String),

    #[error("IO error on {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Template error: {0}")]
    Template(#[from] tera::Error),

    #[error("Config error: {0}")]
    Config(#[from] serde_yaml::Error),

    #[error("Background task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl WikiError {
    /// Wrap an IO error together with the path it happened on
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Whether this error means the page simply does not exist yet
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

pub type Result<T> = std::result::Result<T, WikiError>;
