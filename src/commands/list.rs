//! List wiki pages

use anyhow::Result;

use crate::Wiki;

/// Print every page title with its last modification time
pub fn run(wiki: &Wiki) -> Result<()> {
    let pages = wiki.store().list_pages();

    println!("Pages ({}):", pages.len());
    for page in pages {
        match page.updated {
            Some(updated) => println!("  {} - {}", updated.format("%Y-%m-%d %H:%M"), page.title),
            None => println!("  {}", page.title),
        }
    }

    Ok(())
}
