//! The recipe catalog and its query pipeline.
//!
//! A [`Catalog`] owns one immutable recipe snapshot. Queries filter and sort
//! it; entries add a composition tree per surviving recipe. Reloading data
//! means building a new catalog.

use serde::Serialize;
use tracing::debug;

use crate::composition::{resolve_recipe, CompositionNode};
use crate::filter::{filter, FilterSpec};
use crate::index::RecipeIndex;
use crate::recipe::Recipe;
use crate::sort::{sort, PriorityStats};

// ============================================================================
// Catalog
// ============================================================================

/// An ordered, immutable recipe collection.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    recipes: Vec<Recipe>,
}

impl Catalog {
    /// Create a catalog over a recipe collection, keeping its order.
    #[must_use]
    pub fn new(recipes: Vec<Recipe>) -> Self {
        Self { recipes }
    }

    /// All recipes in collection order.
    #[must_use]
    pub fn recipes(&self) -> &[Recipe] {
        &self.recipes
    }

    /// Number of recipes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.recipes.len()
    }

    /// Returns true if the catalog has no recipes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.recipes.is_empty()
    }

    /// Find a recipe by display name (case-insensitive).
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Recipe> {
        let wanted = name.trim().to_lowercase();
        self.recipes
            .iter()
            .find(|r| r.name.to_lowercase() == wanted)
    }

    /// Build the result-name index over this catalog.
    #[must_use]
    pub fn index(&self) -> RecipeIndex<'_> {
        RecipeIndex::build(&self.recipes)
    }

    /// Filter, then sort by priority and difficulty.
    #[must_use]
    pub fn query(&self, spec: &FilterSpec, priority: &PriorityStats) -> Vec<&Recipe> {
        let matched = filter(&self.recipes, spec);
        let matched_count = matched.len();
        let sorted = sort(matched, priority);
        debug!(
            "Query kept {} of {} recipes ({} priority stats)",
            matched_count,
            self.recipes.len(),
            priority.len()
        );
        sorted
    }

    /// Resolve one recipe's composition tree against this catalog.
    #[must_use]
    pub fn compose(&self, recipe: &Recipe) -> Vec<CompositionNode> {
        resolve_recipe(recipe, &self.index())
    }

    /// Query results paired with their composition trees.
    #[must_use]
    pub fn entries(&self, spec: &FilterSpec, priority: &PriorityStats) -> Vec<CatalogEntry<'_>> {
        let index = self.index();
        self.query(spec, priority)
            .into_iter()
            .map(|recipe| CatalogEntry {
                recipe,
                composition: resolve_recipe(recipe, &index),
            })
            .collect()
    }

    /// Distinct values available for filtering.
    #[must_use]
    pub fn facets(&self) -> Facets {
        let mut facets = Facets::default();
        for recipe in &self.recipes {
            if let Some(category) = &recipe.category {
                if !facets
                    .categories
                    .iter()
                    .any(|c| c.to_lowercase() == category.to_lowercase())
                {
                    facets.categories.push(category.clone());
                }
            }
            for tag in &recipe.tags {
                push_unique(&mut facets.tags, tag);
            }
            if let Some(pack) = &recipe.source_pack {
                push_unique(&mut facets.source_packs, pack);
            }
            for stat in recipe.stat_bonuses.keys() {
                push_unique(&mut facets.stats, stat);
            }
        }
        facets
    }
}

impl From<Vec<Recipe>> for Catalog {
    fn from(recipes: Vec<Recipe>) -> Self {
        Self::new(recipes)
    }
}

impl FromIterator<Recipe> for Catalog {
    fn from_iter<I: IntoIterator<Item = Recipe>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

fn push_unique(values: &mut Vec<String>, value: &str) {
    if !values.iter().any(|v| v == value) {
        values.push(value.to_string());
    }
}

// ============================================================================
// Query output
// ============================================================================

/// A recipe with its resolved composition.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CatalogEntry<'a> {
    /// The recipe.
    pub recipe: &'a Recipe,
    /// Its components, expanded through sub-recipes.
    pub composition: Vec<CompositionNode>,
}

/// Distinct filterable values, in first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Facets {
    /// Categories as written.
    pub categories: Vec<String>,
    /// Tags.
    pub tags: Vec<String>,
    /// Source packs.
    pub source_packs: Vec<String>,
    /// Stat bonus keys.
    pub stats: Vec<String>,
}

impl Facets {
    /// Returns true if no recipe carries any filterable value.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
            && self.tags.is_empty()
            && self.source_packs.is_empty()
            && self.stats.is_empty()
    }
}
