//! Larder CLI - browse a recipe catalog from the terminal.
//!
//! This crate wires the resolution engine to the outside world: reading
//! recipe files, configuration, and plain-text presentation.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod config;
pub mod loader;
pub mod render;

pub use config::CatalogConfig;
pub use loader::{RecipeLoadError, RecipeLoadResult, RecipeLoader, RecipeLoaderStats};
