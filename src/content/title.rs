//! Page titles
//!
//! A title comes straight from the request path and doubles as the page's
//! file name, so it is validated once here before any path is built from it.

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use std::fmt;

use crate::error::{Result, WikiError};

/// Extension of page files in the pages directory
pub const PAGE_EXTENSION: &str = "md";

/// Characters left untouched when a title is put into a URL path segment
const PATH_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC.remove(b'-').remove(b'_').remove(b'~');

/// A validated page title, safe to use as a single path component
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Title(String);

impl Title {
    /// Longest accepted title in bytes
    pub const MAX_LEN: usize = 200;

    /// Validate a raw title
    ///
    /// Rejects empty titles, titles over `MAX_LEN` bytes, leading or trailing
    /// whitespace, path separators, any `.` (the listing recovers a title by
    /// cutting the file name at its first dot) and control characters.
    pub fn parse(raw: &str) -> Result<Self> {
        let invalid = raw.is_empty()
            || raw.len() > Self::MAX_LEN
            || raw.trim() != raw
            || raw
                .chars()
                .any(|c| c == '/' || c == '\\' || c == '.' || c.is_control());

        if invalid {
            return Err(WikiError::InvalidTitle(raw.to_string()));
        }

        Ok(Self(raw.to_string()))
    }

    /// Recover a title from a page file name (`<title>.md`)
    pub fn from_file_name(file_name: &str) -> Result<Self> {
        let stem = match file_name.find('.') {
            Some(pos) => &file_name[..pos],
            None => file_name,
        };
        Self::parse(stem)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// File name the page is stored under
    pub fn file_name(&self) -> String {
        format!("{}.{}", self.0, PAGE_EXTENSION)
    }

    /// Title encoded for use as a URL path segment
    pub fn url_segment(&self) -> String {
        utf8_percent_encode(&self.0, PATH_SEGMENT).to_string()
    }
}

impl fmt::Display for Title {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_plain_titles() {
        for raw in ["foo", "FrontPage", "my-notes_2026", "日记", "two words"] {
            let title = Title::parse(raw).unwrap();
            assert_eq!(title.as_str(), raw);
        }
    }

    #[test]
    fn test_rejects_traversal_and_separators() {
        for raw in ["", "..", "../secret", "a/b", "a\\b", "notes.md", ".hidden", "nul\0byte"] {
            assert!(
                matches!(Title::parse(raw), Err(WikiError::InvalidTitle(_))),
                "{raw:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_rejects_surrounding_whitespace() {
        for raw in [" padded", "padded ", "\tpadded", "padded\u{3000}"] {
            assert!(Title::parse(raw).is_err(), "{raw:?} should be rejected");
        }
        assert!(Title::parse("inner space").is_ok());
    }

    #[test]
    fn test_length_limit_is_200_bytes() {
        assert_eq!(Title::MAX_LEN, 200);
        assert!(Title::parse(&"x".repeat(200)).is_ok());
        assert!(Title::parse(&"x".repeat(201)).is_err());
        assert!(Title::parse(&"x".repeat(250)).is_err());

        // The limit counts bytes, not characters
        assert!(Title::parse(&"日".repeat(66)).is_ok());
        assert!(Title::parse(&"日".repeat(67)).is_err());
    }

    #[test]
    fn test_from_file_name_cuts_at_first_dot() {
        assert_eq!(Title::from_file_name("foo.md").unwrap().as_str(), "foo");
        assert_eq!(Title::from_file_name("foo.md.bak").unwrap().as_str(), "foo");
        assert!(Title::from_file_name(".tmpXYZ").is_err());
    }

    #[test]
    fn test_file_name_and_url_segment() {
        let title = Title::parse("two words").unwrap();
        assert_eq!(title.file_name(), "two words.md");
        assert_eq!(title.url_segment(), "two%20words");
        assert_eq!(Title::parse("a-b_c").unwrap().url_segment(), "a-b_c");
    }
}
