//! Lookup from normalized result names to the recipes producing them.
//!
//! The index borrows an immutable recipe snapshot. When the collection
//! changes, build a new index; an index never observes a mutation.

use ahash::AHashMap;
use tracing::debug;

use crate::normalize::normalize;
use crate::recipe::Recipe;

/// Recipes grouped by normalized result name, in original collection order.
#[derive(Debug, Clone, Default)]
pub struct RecipeIndex<'a> {
    /// Producers by normalized result name.
    by_result: AHashMap<String, Vec<&'a Recipe>>,
    /// Number of recipes indexed.
    recipe_count: usize,
}

impl<'a> RecipeIndex<'a> {
    /// Build an index over a recipe collection.
    pub fn build<I>(recipes: I) -> Self
    where
        I: IntoIterator<Item = &'a Recipe>,
    {
        let mut by_result: AHashMap<String, Vec<&'a Recipe>> = AHashMap::new();
        let mut recipe_count = 0;

        for recipe in recipes {
            by_result
                .entry(recipe.normalized_result())
                .or_default()
                .push(recipe);
            recipe_count += 1;
        }

        let index = Self {
            by_result,
            recipe_count,
        };

        for (name, count) in index.ambiguous() {
            debug!(
                "{} recipes produce '{}'; the first in collection order wins",
                count, name
            );
        }

        index
    }

    /// All recipes producing `name`, in collection order.
    ///
    /// `name` is normalized before lookup.
    #[must_use]
    pub fn producers(&self, name: &str) -> &[&'a Recipe] {
        self.producers_normalized(&normalize(name))
    }

    /// All recipes producing an already-normalized name.
    #[must_use]
    pub fn producers_normalized(&self, key: &str) -> &[&'a Recipe] {
        self.by_result.get(key).map(Vec::as_slice).unwrap_or(&[])
    }

    /// The producer of `name` under the first-in-order tie-break.
    #[must_use]
    pub fn producer(&self, name: &str) -> Option<&'a Recipe> {
        self.producer_normalized(&normalize(name))
    }

    /// The producer of an already-normalized name under the first-in-order tie-break.
    #[must_use]
    pub fn producer_normalized(&self, key: &str) -> Option<&'a Recipe> {
        self.producers_normalized(key).first().copied()
    }

    /// Check whether any recipe produces `name`.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.by_result.contains_key(&normalize(name))
    }

    /// Number of distinct normalized result names.
    #[must_use]
    pub fn len(&self) -> usize {
        self.by_result.len()
    }

    /// Returns true if no recipes are indexed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_result.is_empty()
    }

    /// Number of recipes indexed.
    #[must_use]
    pub fn recipe_count(&self) -> usize {
        self.recipe_count
    }

    /// Result names produced by more than one recipe, with producer counts.
    ///
    /// Sorted by name.
    #[must_use]
    pub fn ambiguous(&self) -> Vec<(&str, usize)> {
        let mut names: Vec<(&str, usize)> = self
            .by_result
            .iter()
            .filter(|(_, producers)| producers.len() > 1)
            .map(|(name, producers)| (name.as_str(), producers.len()))
            .collect();
        names.sort_unstable();
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<Recipe> {
        vec![
            Recipe::builder("Dough").components(["Flour x2", "Water"]).build(),
            Recipe::builder("Bread").components(["Dough x1"]).build(),
            Recipe::builder("Quick Dough")
                .result("dough")
                .components(["Flour"])
                .build(),
        ]
    }

    #[test]
    fn test_build_groups_by_normalized_result() {
        let recipes = sample();
        let index = RecipeIndex::build(&recipes);

        assert_eq!(index.len(), 2);
        assert_eq!(index.recipe_count(), 3);
        assert!(index.contains("DOUGH x5"));
        assert!(index.contains("bread"));
        assert!(!index.contains("flour"));
    }

    #[test]
    fn test_producers_keep_collection_order() {
        let recipes = sample();
        let index = RecipeIndex::build(&recipes);

        let producers = index.producers("Dough x1");
        assert_eq!(producers.len(), 2);
        assert_eq!(producers[0].name, "Dough");
        assert_eq!(producers[1].name, "Quick Dough");
    }

    #[test]
    fn test_producer_picks_first() {
        let recipes = sample();
        let index = RecipeIndex::build(&recipes);

        assert_eq!(index.producer("dough").map(|r| r.name.as_str()), Some("Dough"));
    }

    #[test]
    fn test_missing_name_has_no_producer() {
        let recipes = sample();
        let index = RecipeIndex::build(&recipes);

        assert!(index.producer("Salt").is_none());
        assert!(index.producers("Salt").is_empty());
    }

    #[test]
    fn test_ambiguous_names_reported() {
        let recipes = sample();
        let index = RecipeIndex::build(&recipes);

        assert_eq!(index.ambiguous(), vec![("dough", 2)]);
    }

    #[test]
    fn test_empty_index() {
        let recipes: Vec<Recipe> = Vec::new();
        let index = RecipeIndex::build(&recipes);
        assert!(index.is_empty());
        assert_eq!(index.recipe_count(), 0);
        assert!(index.producer("anything").is_none());
    }
}
