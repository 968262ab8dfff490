//! # Larder Core
//!
//! Recipe resolution engine for Larder.
//!
//! This crate takes an in-memory recipe collection and provides:
//! - Name normalization for component and result comparison
//! - A result-name index over an immutable recipe snapshot
//! - Sub-recipe composition trees with cycle short-circuiting
//! - Multi-field filtering (material, tags, category, source pack)
//! - Priority-aware sorting by difficulty
//! - A catalog tying the pipeline together
//!
//! Everything here is synchronous and pure over its inputs. Reading recipe
//! files and presenting results live in `larder-cli`.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod catalog;
pub mod composition;
pub mod filter;
pub mod index;
pub mod normalize;
pub mod recipe;
pub mod sort;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::catalog::*;
    pub use crate::composition::*;
    pub use crate::filter::*;
    pub use crate::index::*;
    pub use crate::normalize::*;
    pub use crate::recipe::*;
    pub use crate::sort::*;
}

pub use prelude::*;
