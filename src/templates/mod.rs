//! Page templates using the Tera template engine
//!
//! Every view is a fragment extending the shared `layout.html`. All templates
//! are compiled once when the renderer is built. Files in the wiki's templates
//! directory replace the built-in defaults of the same name.

use serde::Serialize;
use std::fs;
use std::io;
use std::path::Path;
use tera::{Context, Tera};

use crate::content::Page;
use crate::error::{Result, WikiError};

/// Shared layout every view extends
pub const LAYOUT_TEMPLATE: &str = "layout.html";

/// Built-in templates, by file name
pub const DEFAULT_TEMPLATES: &[(&str, &str)] = &[
    (LAYOUT_TEMPLATE, include_str!("default/layout.html")),
    ("home.html", include_str!("default/home.html")),
    ("view.html", include_str!("default/view.html")),
    ("edit.html", include_str!("default/edit.html")),
];

/// Built-in stylesheet, written to the static directory by `init`
pub const DEFAULT_STYLESHEET: &str = include_str!("default/style.css");

/// The views the wiki can render
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    /// List of all pages
    Home,
    /// A single rendered page
    Page,
    /// The edit form of a page
    Edit,
}

impl View {
    /// Name of the fragment template for this view
    pub fn template_name(self) -> &'static str {
        match self {
            View::Home => "home.html",
            View::Page => "view.html",
            View::Edit => "edit.html",
        }
    }
}

/// Template renderer with all views compiled
pub struct TemplateRenderer {
    tera: Tera,
}

impl TemplateRenderer {
    /// Create a renderer from the built-in templates only
    pub fn new() -> Result<Self> {
        Self::build(|_| Ok(None))
    }

    /// Create a renderer, preferring templates found in `dir`
    pub fn load<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let dir = dir.as_ref();
        Self::build(|name| {
            let path = dir.join(name);
            match fs::read_to_string(&path) {
                Ok(content) => {
                    tracing::debug!("Using template override {:?}", path);
                    Ok(Some(content))
                }
                Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
                Err(e) => Err(WikiError::io(path, e)),
            }
        })
    }

    fn build<F>(mut read_override: F) -> Result<Self>
    where
        F: FnMut(&str) -> Result<Option<String>>,
    {
        let mut templates = Vec::with_capacity(DEFAULT_TEMPLATES.len());
        for &(name, builtin) in DEFAULT_TEMPLATES {
            let source = read_override(name)?.unwrap_or_else(|| builtin.to_string());
            templates.push((name, source));
        }

        // Parses and links the inheritance chains, so a broken override fails here
        let mut tera = Tera::default();
        tera.add_raw_templates(templates)?;

        Ok(Self { tera })
    }

    /// Render the list of all pages
    pub fn render_home(&self, site: &SiteData, pages: &[Page]) -> Result<String> {
        let pages: Vec<PageData> = pages.iter().map(PageData::from).collect();
        let mut context = Context::new();
        context.insert("site", site);
        context.insert("pages", &pages);
        self.render(View::Home, &context)
    }

    /// Render a single page with the view or edit template
    pub fn render_page(&self, view: View, site: &SiteData, page: &Page) -> Result<String> {
        let mut context = Context::new();
        context.insert("site", site);
        context.insert("page", &PageData::from(page));
        self.render(view, &context)
    }

    /// Render a view with given context
    pub fn render(&self, view: View, context: &Context) -> Result<String> {
        Ok(self.tera.render(view.template_name(), context)?)
    }
}

/// Data structures for template context

#[derive(Debug, Clone, Serialize)]
pub struct SiteData {
    pub title: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct PageData {
    pub title: String,
    /// Title encoded as a URL path segment
    pub url: String,
    pub body: String,
    pub updated: Option<String>,
}

impl From<&Page> for PageData {
    fn from(page: &Page) -> Self {
        Self {
            title: page.title.to_string(),
            url: page.title.url_segment(),
            body: page.body.clone(),
            updated: page
                .updated
                .map(|date| date.format("%Y-%m-%d %H:%M").to_string()),
        }
    }
}
