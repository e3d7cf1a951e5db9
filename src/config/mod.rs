//! Configuration module

mod site;

pub use site::{WikiConfig, CONFIG_FILE};
