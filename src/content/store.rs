//! Page store - one `<title>.md` file per page in the pages directory

use chrono::{DateTime, Local};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

use super::{MarkdownRenderer, Page, Title, PAGE_EXTENSION};
use crate::error::{Result, WikiError};

/// Reads and writes pages as markdown files
pub struct PageStore {
    pages_dir: PathBuf,
    renderer: MarkdownRenderer,
}

impl PageStore {
    /// Create a store over `pages_dir`, rendering with `renderer`
    pub fn new<P: Into<PathBuf>>(pages_dir: P, renderer: MarkdownRenderer) -> Self {
        Self {
            pages_dir: pages_dir.into(),
            renderer,
        }
    }

    /// Directory the page files live in
    pub fn pages_dir(&self) -> &Path {
        &self.pages_dir
    }

    /// Path of the file backing `title`
    pub fn page_path(&self, title: &Title) -> PathBuf {
        self.pages_dir.join(title.file_name())
    }

    /// Whether a page file exists for `title`
    pub fn exists(&self, title: &Title) -> bool {
        self.page_path(title).is_file()
    }

    /// Write `body` as the page's markdown, replacing any previous content
    ///
    /// The bytes go to a temporary file in the pages directory which is then
    /// renamed over the page file, so readers see either the old or the new
    /// page, never a partial one.
    pub fn save(&self, title: &Title, body: &[u8]) -> Result<()> {
        let path = self.page_path(title);

        fs::create_dir_all(&self.pages_dir).map_err(|e| WikiError::io(&self.pages_dir, e))?;

        let mut tmp =
            NamedTempFile::new_in(&self.pages_dir).map_err(|e| WikiError::io(&self.pages_dir, e))?;
        tmp.write_all(body)
            .and_then(|_| tmp.as_file().sync_all())
            .map_err(|e| WikiError::io(tmp.path(), e))?;
        tmp.persist(&path)
            .map_err(|e| WikiError::io(&path, e.error))?;

        tracing::info!("Saved page {} ({} bytes)", title, body.len());
        Ok(())
    }

    /// Load the stored markdown bytes of a page
    pub fn load_raw(&self, title: &Title) -> Result<Vec<u8>> {
        let path = self.page_path(title);
        fs::read(&path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => WikiError::NotFound(title.to_string()),
            _ => WikiError::io(&path, e),
        })
    }

    /// Load a page with its raw markdown as the body, for editing
    pub fn load_source(&self, title: &Title) -> Result<Page> {
        let raw = self.load_raw(title)?;
        let mut page = Page::new(title.clone(), String::from_utf8_lossy(&raw));
        page.updated = self.modified(title);
        Ok(page)
    }

    /// Load a page with its body rendered to sanitized HTML, for viewing
    pub fn load_rendered(&self, title: &Title) -> Result<Page> {
        let raw = self.load_raw(title)?;
        let mut page = Page::new(title.clone(), self.renderer.render(&raw));
        page.updated = self.modified(title);
        Ok(page)
    }

    /// Load every page in the pages directory, rendered, sorted by title
    ///
    /// Never fails: an unreadable directory yields an empty list and a page
    /// that cannot be loaded is skipped. Both are logged.
    pub fn list_pages(&self) -> Vec<Page> {
        let entries = match fs::read_dir(&self.pages_dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::debug!("Pages directory {:?} does not exist yet", self.pages_dir);
                return Vec::new();
            }
            Err(e) => {
                tracing::error!("Error loading pages from {:?}: {}", self.pages_dir, e);
                return Vec::new();
            }
        };

        let mut pages = Vec::new();

        for entry in entries {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    tracing::warn!("Error reading entry in {:?}: {}", self.pages_dir, e);
                    continue;
                }
            };

            let path = entry.path();
            if !is_page_file(&path) {
                continue;
            }

            let file_name = entry.file_name();
            let file_name = file_name.to_string_lossy();
            let title = match Title::from_file_name(&file_name) {
                Ok(title) => title,
                Err(e) => {
                    tracing::warn!("Skipping {:?}: {}", path, e);
                    continue;
                }
            };

            match self.load_rendered(&title) {
                Ok(page) => pages.push(page),
                Err(e) => tracing::warn!("Error loading page {}: {}", title, e),
            }
        }

        pages.sort_by(|a, b| a.title.cmp(&b.title));
        pages
    }

    /// Titles of every loadable page, sorted
    pub fn list_titles(&self) -> Vec<Title> {
        self.list_pages().into_iter().map(|page| page.title).collect()
    }

    fn modified(&self, title: &Title) -> Option<DateTime<Local>> {
        fs::metadata(self.page_path(title))
            .and_then(|m| m.modified())
            .ok()
            .map(DateTime::<Local>::from)
    }
}

/// Visible `.md` entries; hidden names include in-flight temporary files
fn is_page_file(path: &Path) -> bool {
    let hidden = path
        .file_name()
        .map(|n| n.to_string_lossy().starts_with('.'))
        .unwrap_or(true);

    !hidden
        && path
            .extension()
            .map(|e| e == PAGE_EXTENSION)
            .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn store(dir: &Path) -> PageStore {
        PageStore::new(dir.join("pages"), MarkdownRenderer::with_highlight(false))
    }

    fn title(raw: &str) -> Title {
        Title::parse(raw).unwrap()
    }

    #[test]
    fn test_save_and_load_raw_round_trip() {
        let dir = tempdir().unwrap();
        let store = store(dir.path());

        let bodies: [&[u8]; 4] = [b"# Hello", b"", b"line\r\nwith crlf\n", &[0, 159, 146, 150, 255]];
        for body in bodies {
            store.save(&title("foo"), body).unwrap();
            assert_eq!(store.load_raw(&title("foo")).unwrap(), body);
        }
    }

    #[test]
    fn test_save_creates_directory_and_file() {
        let dir = tempdir().unwrap();
        let store = store(dir.path());

        assert!(!store.exists(&title("fresh")));
        store.save(&title("fresh"), b"content").unwrap();
        assert!(store.exists(&title("fresh")));
        assert_eq!(
            fs::read(dir.path().join("pages/fresh.md")).unwrap(),
            b"content"
        );
    }

    #[test]
    fn test_save_overwrites_wholesale() {
        let dir = tempdir().unwrap();
        let store = store(dir.path());

        store.save(&title("foo"), b"a much longer first version").unwrap();
        store.save(&title("foo"), b"short").unwrap();
        assert_eq!(store.load_raw(&title("foo")).unwrap(), b"short");
    }

    #[test]
    fn test_save_leaves_no_temporary_files() {
        let dir = tempdir().unwrap();
        let store = store(dir.path());

        store.save(&title("foo"), b"one").unwrap();
        store.save(&title("bar"), b"two").unwrap();

        let names: Vec<String> = fs::read_dir(store.pages_dir())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
            .collect();
        assert_eq!(names.len(), 2);
        assert!(names.iter().all(|n| n.ends_with(".md")));
    }

    #[test]
    fn test_load_missing_page_is_not_found() {
        let dir = tempdir().unwrap();
        let store = store(dir.path());

        let err = store.load_raw(&title("missing")).unwrap_err();
        assert!(err.is_not_found());
        assert!(store.load_rendered(&title("missing")).unwrap_err().is_not_found());
    }

    #[test]
    fn test_load_rendered_and_source() {
        let dir = tempdir().unwrap();
        let store = store(dir.path());

        store.save(&title("foo"), b"# Hello").unwrap();
        let rendered = store.load_rendered(&title("foo")).unwrap();
        assert!(rendered.body.contains("<h1>Hello</h1>"));
        assert!(rendered.updated.is_some());

        let source = store.load_source(&title("foo")).unwrap();
        assert_eq!(source.body, "# Hello");
    }

    #[test]
    fn test_list_pages_sorted_and_filtered() {
        let dir = tempdir().unwrap();
        let store = store(dir.path());

        store.save(&title("beta"), b"b").unwrap();
        store.save(&title("alpha"), b"a").unwrap();
        fs::write(store.pages_dir().join("notes.txt"), "not a page").unwrap();
        fs::write(store.pages_dir().join(".tmpAbC123"), "in flight").unwrap();

        let titles: Vec<String> = store
            .list_titles()
            .into_iter()
            .map(|t| t.to_string())
            .collect();
        assert_eq!(titles, vec!["alpha", "beta"]);
    }

    #[test]
    fn test_list_pages_skips_unreadable_page() {
        let dir = tempdir().unwrap();
        let store = store(dir.path());

        store.save(&title("good"), b"# Good").unwrap();
        // A directory with a page name cannot be read as a file
        fs::create_dir(store.pages_dir().join("broken.md")).unwrap();

        let pages = store.list_pages();
        assert_eq!(pages.len(), 1);
        assert_eq!(pages[0].title.as_str(), "good");
        assert!(pages[0].body.contains("<h1>Good</h1>"));
    }

    #[cfg(unix)]
    #[test]
    fn test_list_pages_skips_dangling_symlink() {
        let dir = tempdir().unwrap();
        let store = store(dir.path());

        store.save(&title("good"), b"ok").unwrap();
        std::os::unix::fs::symlink(
            dir.path().join("nowhere.md"),
            store.pages_dir().join("dangling.md"),
        )
        .unwrap();

        assert_eq!(store.list_titles(), vec![title("good")]);
    }

    #[test]
    fn test_list_pages_missing_directory_is_empty() {
        let dir = tempdir().unwrap();
        let store = store(dir.path());
        assert!(store.list_pages().is_empty());
    }
}
