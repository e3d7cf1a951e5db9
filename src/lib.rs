//! mdwiki: a minimal personal wiki
//!
//! Pages are markdown files in a pages directory. They are rendered to
//! sanitized HTML for viewing and edited as raw markdown through a small set of
//! HTTP routes.

pub mod commands;
pub mod config;
pub mod content;
pub mod error;
pub mod server;
pub mod templates;

use std::path::{Path, PathBuf};

pub use error::{Result, WikiError};

/// The main wiki application
#[derive(Clone)]
pub struct Wiki {
    /// Wiki configuration
    pub config: config::WikiConfig,
    /// Directory holding one `<title>.md` per page
    pub pages_dir: PathBuf,
    /// Directory with template overrides
    pub templates_dir: PathBuf,
    /// Directory served under `/static/`
    pub static_dir: PathBuf,
}

impl Wiki {
    /// Create a new Wiki instance from a directory, reading `_config.yml` if present
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self> {
        let config = config::WikiConfig::load_or_default(base_dir.as_ref())?;
        Ok(Self::with_config(base_dir, config))
    }

    /// Create a Wiki instance with an explicit configuration
    pub fn with_config<P: AsRef<Path>>(base_dir: P, config: config::WikiConfig) -> Self {
        let base_dir = base_dir.as_ref().to_path_buf();
        let pages_dir = base_dir.join(&config.pages_dir);
        let templates_dir = base_dir.join(&config.templates_dir);
        let static_dir = base_dir.join(&config.static_dir);

        Self {
            config,
            pages_dir,
            templates_dir,
            static_dir,
        }
    }

    /// Page store over the pages directory
    pub fn store(&self) -> content::PageStore {
        let renderer = content::MarkdownRenderer::with_highlight(self.config.highlight);
        content::PageStore::new(&self.pages_dir, renderer)
    }

    /// Compile the templates, preferring files in the templates directory
    pub fn templates(&self) -> Result<templates::TemplateRenderer> {
        templates::TemplateRenderer::load(&self.templates_dir)
    }

    /// Site-wide data handed to every template
    pub fn site_data(&self) -> templates::SiteData {
        templates::SiteData {
            title: self.config.title.clone(),
        }
    }
}
