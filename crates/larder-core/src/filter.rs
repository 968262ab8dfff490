//! Multi-field recipe filtering.
//!
//! A [`FilterSpec`] is built per query by the caller (from control state,
//! command-line arguments, ...) and passed in explicitly. Each of its four
//! criteria is unrestricted when empty; all criteria must hold for a match.

use std::collections::BTreeSet;

use crate::normalize::normalize;
use crate::recipe::Recipe;

/// Criteria a recipe must satisfy to be shown.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSpec {
    /// Lower-cased substring matched against normalized component names.
    material_substring: String,
    /// Tags that must all be present.
    required_tags: BTreeSet<String>,
    /// Lower-cased categories, any of which is accepted.
    allowed_categories: BTreeSet<String>,
    /// Source packs, any of which is accepted.
    allowed_source_packs: BTreeSet<String>,
}

impl FilterSpec {
    /// Create an unrestricted filter.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the component substring (case-insensitive).
    #[must_use]
    pub fn material(mut self, substring: impl AsRef<str>) -> Self {
        self.material_substring = substring.as_ref().to_lowercase();
        self
    }

    /// Require a tag.
    #[must_use]
    pub fn require_tag(mut self, tag: impl Into<String>) -> Self {
        self.required_tags.insert(tag.into());
        self
    }

    /// Require several tags.
    #[must_use]
    pub fn require_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.required_tags.extend(tags.into_iter().map(Into::into));
        self
    }

    /// Accept a category (case-insensitive).
    #[must_use]
    pub fn allow_category(mut self, category: impl AsRef<str>) -> Self {
        self.allowed_categories
            .insert(category.as_ref().to_lowercase());
        self
    }

    /// Accept several categories.
    #[must_use]
    pub fn allow_categories<I, S>(self, categories: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        categories
            .into_iter()
            .fold(self, |spec, category| spec.allow_category(category))
    }

    /// Accept a source pack.
    #[must_use]
    pub fn allow_source_pack(mut self, pack: impl Into<String>) -> Self {
        self.allowed_source_packs.insert(pack.into());
        self
    }

    /// Accept several source packs.
    #[must_use]
    pub fn allow_source_packs<I, S>(mut self, packs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allowed_source_packs
            .extend(packs.into_iter().map(Into::into));
        self
    }

    /// The lower-cased component substring.
    #[must_use]
    pub fn material_substring(&self) -> &str {
        &self.material_substring
    }

    /// Tags that must all be present.
    #[must_use]
    pub fn required_tags(&self) -> &BTreeSet<String> {
        &self.required_tags
    }

    /// Accepted categories, lower-cased.
    #[must_use]
    pub fn allowed_categories(&self) -> &BTreeSet<String> {
        &self.allowed_categories
    }

    /// Accepted source packs.
    #[must_use]
    pub fn allowed_source_packs(&self) -> &BTreeSet<String> {
        &self.allowed_source_packs
    }

    /// Returns true if this filter accepts every recipe.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.material_substring.is_empty()
            && self.required_tags.is_empty()
            && self.allowed_categories.is_empty()
            && self.allowed_source_packs.is_empty()
    }

    /// Check a recipe against all four criteria.
    #[must_use]
    pub fn matches(&self, recipe: &Recipe) -> bool {
        self.matches_material(recipe)
            && self.matches_tags(recipe)
            && self.matches_category(recipe)
            && self.matches_source(recipe)
    }

    fn matches_material(&self, recipe: &Recipe) -> bool {
        self.material_substring.is_empty()
            || recipe
                .components
                .iter()
                .any(|c| normalize(c).contains(&self.material_substring))
    }

    fn matches_tags(&self, recipe: &Recipe) -> bool {
        self.required_tags.iter().all(|tag| recipe.has_tag(tag))
    }

    fn matches_category(&self, recipe: &Recipe) -> bool {
        self.allowed_categories.is_empty()
            || recipe
                .category
                .as_deref()
                .is_some_and(|c| self.allowed_categories.contains(&c.to_lowercase()))
    }

    fn matches_source(&self, recipe: &Recipe) -> bool {
        self.allowed_source_packs.is_empty()
            || recipe
                .source_pack
                .as_ref()
                .is_some_and(|p| self.allowed_source_packs.contains(p))
    }
}

/// Check a recipe against a filter.
#[must_use]
pub fn matches(recipe: &Recipe, spec: &FilterSpec) -> bool {
    spec.matches(recipe)
}

/// Keep the recipes matching `spec`, preserving their order.
pub fn filter<'a, I>(recipes: I, spec: &FilterSpec) -> Vec<&'a Recipe>
where
    I: IntoIterator<Item = &'a Recipe>,
{
    recipes.into_iter().filter(|r| spec.matches(r)).collect()
}
