//! Initialize a new wiki

use anyhow::Result;
use std::fs;
use std::path::Path;

use crate::config::CONFIG_FILE;
use crate::content::{MarkdownRenderer, PageStore, Title};
use crate::templates::{DEFAULT_STYLESHEET, DEFAULT_TEMPLATES};

/// Title of the page created by `init`
pub const FRONT_PAGE: &str = "FrontPage";

const DEFAULT_CONFIG: &str = r#"# Wiki configuration

# Title shown in the page header
title: Wiki

# Directories, relative to this file
pages_dir: pages
templates_dir: templates
static_dir: static

# Server
port: 8080

# Highlight fenced code blocks with a known language
highlight: true
"#;

const FRONT_PAGE_BODY: &str = r#"# Welcome

This is your wiki. Every page is a markdown file in the `pages` directory.

* Visit `/view/SomePage` to read a page. Missing pages open in the editor.
* Visit `/edit/SomePage` to change it.

```rust
fn main() {
    println!("Code blocks are highlighted");
}
```
"#;

/// Initialize a new wiki in the given directory
///
/// Existing files are left untouched, so running it twice is harmless.
pub fn init_wiki(target_dir: &Path) -> Result<()> {
    fs::create_dir_all(target_dir)?;
    let pages_dir = target_dir.join("pages");
    let templates_dir = target_dir.join("templates");
    let static_dir = target_dir.join("static");

    fs::create_dir_all(&pages_dir)?;
    fs::create_dir_all(&templates_dir)?;
    fs::create_dir_all(&static_dir)?;

    write_if_missing(&target_dir.join(CONFIG_FILE), DEFAULT_CONFIG)?;

    for &(name, content) in DEFAULT_TEMPLATES {
        write_if_missing(&templates_dir.join(name), content)?;
    }

    write_if_missing(&static_dir.join("style.css"), DEFAULT_STYLESHEET)?;

    let store = PageStore::new(pages_dir, MarkdownRenderer::with_highlight(false));
    let front_page = Title::parse(FRONT_PAGE)?;
    if !store.exists(&front_page) {
        store.save(&front_page, FRONT_PAGE_BODY.as_bytes())?;
    }

    Ok(())
}

fn write_if_missing(path: &Path, content: &str) -> Result<()> {
    if path.exists() {
        tracing::debug!("Keeping existing {:?}", path);
        return Ok(());
    }
    fs::write(path, content)?;
    tracing::info!("Created: {:?}", path);
    Ok(())
}
