//! Content module - page titles, storage and markdown rendering

mod markdown;
mod page;
pub mod store;
mod title;

pub use markdown::MarkdownRenderer;
pub use page::Page;
pub use store::PageStore;
pub use title::{Title, PAGE_EXTENSION};
