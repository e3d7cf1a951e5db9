//! Page model

use chrono::{DateTime, Local};

use super::Title;

/// A wiki page
///
/// The body is raw markdown when the page was loaded for editing and
/// rendered HTML when it was loaded for viewing.
#[derive(Debug, Clone)]
pub struct Page {
    /// Page title, also the file name stem
    pub title: Title,

    /// Raw markdown or rendered HTML
    pub body: String,

    /// Last modification time of the page file
    pub updated: Option<DateTime<Local>>,
}

impl Page {
    /// Create a page with the given body
    pub fn new(title: Title, body: impl Into<String>) -> Self {
        Self {
            title,
            body: body.into(),
            updated: None,
        }
    }

    /// Page that does not exist on disk yet
    pub fn empty(title: Title) -> Self {
        Self::new(title, String::new())
    }
}
