//! Recipe data model.
//!
//! This module provides:
//! - The `Recipe` record with explicit defaults for partial data
//! - A builder for constructing recipes in code
//! - Lenient deserialization that accepts the common source field names

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

use crate::normalize::normalize;

/// Yield used when the source omits it or gives something unusable.
pub const DEFAULT_YIELD: u32 = 1;

/// Sort key for recipes without a difficulty. Larger than any real rating.
pub const MISSING_DIFFICULTY: f64 = f64::INFINITY;

/// Display label for recipes without a category.
pub const UNSPECIFIED_CATEGORY: &str = "unspecified";

// ============================================================================
// Recipe
// ============================================================================

/// A single crafting recipe.
///
/// Recipes are immutable once loaded; nothing in the engine mutates them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recipe {
    /// Display name.
    pub name: String,
    /// Name of the produced item. Falls back to `name` when absent.
    #[serde(
        default,
        alias = "resultName",
        alias = "result",
        skip_serializing_if = "Option::is_none"
    )]
    pub result_name: Option<String>,
    /// Difficulty rating, lower sorts first.
    #[serde(
        default,
        alias = "trivial",
        deserialize_with = "lenient_difficulty",
        skip_serializing_if = "Option::is_none"
    )]
    pub difficulty: Option<f64>,
    /// Quantity produced per craft.
    #[serde(
        rename = "yield",
        default = "default_yield",
        deserialize_with = "lenient_yield"
    )]
    pub yield_quantity: u32,
    /// Classification such as meal size.
    #[serde(
        default,
        alias = "mealSize",
        alias = "meal_size",
        skip_serializing_if = "Option::is_none"
    )]
    pub category: Option<String>,
    /// Stat name to bonus.
    #[serde(
        default,
        alias = "statBonuses",
        alias = "stats",
        deserialize_with = "null_as_default"
    )]
    pub stat_bonuses: BTreeMap<String, f64>,
    /// Required component names, in display order.
    #[serde(default, alias = "materials", deserialize_with = "null_as_default")]
    pub components: Vec<String>,
    /// Labels. Matching treats these as a set.
    #[serde(default, deserialize_with = "null_as_default")]
    pub tags: Vec<String>,
    /// Content source (expansion, mod, pack).
    #[serde(
        default,
        alias = "sourcePack",
        alias = "expansion",
        skip_serializing_if = "Option::is_none"
    )]
    pub source_pack: Option<String>,
}

impl Recipe {
    /// Create a new recipe builder.
    #[must_use]
    pub fn builder(name: impl Into<String>) -> RecipeBuilder {
        RecipeBuilder::new(name)
    }

    /// Name of the produced item.
    ///
    /// A missing or blank `result_name` falls back to the display name.
    #[must_use]
    pub fn result_name(&self) -> &str {
        self.result_name
            .as_deref()
            .filter(|r| !r.trim().is_empty())
            .unwrap_or(&self.name)
    }

    /// Normalized form of [`Recipe::result_name`], the key used for sub-recipe lookup.
    #[must_use]
    pub fn normalized_result(&self) -> String {
        normalize(self.result_name())
    }

    /// Check whether this recipe produces the named component.
    #[must_use]
    pub fn produces(&self, component: &str) -> bool {
        normalize(component) == self.normalized_result()
    }

    /// Difficulty used for ordering; missing ratings sort last.
    #[must_use]
    pub fn difficulty_key(&self) -> f64 {
        self.difficulty
            .filter(|d| !d.is_nan())
            .unwrap_or(MISSING_DIFFICULTY)
    }

    /// Category for display, `"unspecified"` when absent.
    #[must_use]
    pub fn category_label(&self) -> &str {
        self.category.as_deref().unwrap_or(UNSPECIFIED_CATEGORY)
    }

    /// Check if recipe has a specific tag.
    #[must_use]
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    /// Stat bonus keys joined by a space and lower-cased.
    #[must_use]
    pub fn stat_keys_joined(&self) -> String {
        self.stat_bonuses
            .keys()
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(" ")
            .to_lowercase()
    }
}

// ============================================================================
// Builder
// ============================================================================

/// Builder for [`Recipe`].
#[derive(Debug)]
pub struct RecipeBuilder {
    recipe: Recipe,
}

impl RecipeBuilder {
    fn new(name: impl Into<String>) -> Self {
        Self {
            recipe: Recipe {
                name: name.into(),
                result_name: None,
                difficulty: None,
                yield_quantity: DEFAULT_YIELD,
                category: None,
                stat_bonuses: BTreeMap::new(),
                components: Vec::new(),
                tags: Vec::new(),
                source_pack: None,
            },
        }
    }

    /// Set the produced item name.
    #[must_use]
    pub fn result(mut self, result_name: impl Into<String>) -> Self {
        self.recipe.result_name = Some(result_name.into());
        self
    }

    /// Set difficulty.
    #[must_use]
    pub fn difficulty(mut self, difficulty: f64) -> Self {
        self.recipe.difficulty = Some(difficulty);
        self
    }

    /// Set yield. Zero is raised to one.
    #[must_use]
    pub fn yields(mut self, quantity: u32) -> Self {
        self.recipe.yield_quantity = quantity.max(DEFAULT_YIELD);
        self
    }

    /// Set category.
    #[must_use]
    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.recipe.category = Some(category.into());
        self
    }

    /// Add a stat bonus.
    #[must_use]
    pub fn stat(mut self, stat: impl Into<String>, bonus: f64) -> Self {
        self.recipe.stat_bonuses.insert(stat.into(), bonus);
        self
    }

    /// Add a component.
    #[must_use]
    pub fn component(mut self, component: impl Into<String>) -> Self {
        self.recipe.components.push(component.into());
        self
    }

    /// Add several components in order.
    #[must_use]
    pub fn components<I, S>(mut self, components: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.recipe
            .components
            .extend(components.into_iter().map(Into::into));
        self
    }

    /// Add a tag. Duplicates are ignored.
    #[must_use]
    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        let tag = tag.into();
        if !self.recipe.has_tag(&tag) {
            self.recipe.tags.push(tag);
        }
        self
    }

    /// Set source pack.
    #[must_use]
    pub fn source_pack(mut self, pack: impl Into<String>) -> Self {
        self.recipe.source_pack = Some(pack.into());
        self
    }

    /// Build the recipe.
    #[must_use]
    pub fn build(self) -> Recipe {
        self.recipe
    }
}

// ============================================================================
// Lenient field decoding
// ============================================================================

const fn default_yield() -> u32 {
    DEFAULT_YIELD
}

/// Treats an explicit `null` the same as a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Numbers and numeric strings become a difficulty; anything else is missing.
fn lenient_difficulty<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(numeric).filter(|d| d.is_finite()))
}

/// Positive numbers (or numeric strings) become the yield, truncated; anything else is 1.
fn lenient_yield<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value
        .as_ref()
        .and_then(numeric)
        .filter(|q| q.is_finite() && *q >= 1.0)
        .map_or(DEFAULT_YIELD, |q| q.min(f64::from(u32::MAX)) as u32))
}

fn numeric(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_defaults() {
        let recipe = Recipe::builder("Bread").build();

        assert_eq!(recipe.name, "Bread");
        assert_eq!(recipe.result_name(), "Bread");
        assert_eq!(recipe.yield_quantity, 1);
        assert!(recipe.difficulty.is_none());
        assert!(recipe.components.is_empty());
        assert!(recipe.tags.is_empty());
        assert!(recipe.stat_bonuses.is_empty());
        assert_eq!(recipe.category_label(), "unspecified");
    }

    #[test]
    fn test_builder_full() {
        let recipe = Recipe::builder("Honey Cake")
            .result("Honey Cake x2")
            .difficulty(42.0)
            .yields(2)
            .category("Snack")
            .stat("STR", 1.0)
            .stat("WIS", 2.0)
            .components(["Flour", "Honey"])
            .component("Egg")
            .tag("baked")
            .tag("baked")
            .tag("sweet")
            .source_pack("Harvest")
            .build();

        assert_eq!(recipe.normalized_result(), "honey cake");
        assert_eq!(recipe.components, vec!["Flour", "Honey", "Egg"]);
        assert_eq!(recipe.tags, vec!["baked", "sweet"]);
        assert_eq!(recipe.category_label(), "Snack");
        assert_eq!(recipe.stat_keys_joined(), "str wis");
        assert_eq!(recipe.source_pack.as_deref(), Some("Harvest"));
    }

    #[test]
    fn test_zero_yield_raised_to_one() {
        let recipe = Recipe::builder("Nothing").yields(0).build();
        assert_eq!(recipe.yield_quantity, 1);
    }

    #[test]
    fn test_blank_result_falls_back_to_name() {
        let recipe = Recipe::builder("Soup").result("   ").build();
        assert_eq!(recipe.result_name(), "Soup");
    }

    #[test]
    fn test_produces_ignores_case_and_multiplier() {
        let recipe = Recipe::builder("Dough").build();
        assert!(recipe.produces("dough x4"));
        assert!(recipe.produces("  DOUGH "));
        assert!(!recipe.produces("Doughnut"));
    }

    #[test]
    fn test_missing_difficulty_sorts_after_real_values() {
        let rated = Recipe::builder("A").difficulty(1_000_000.0).build();
        let unrated = Recipe::builder("B").build();
        assert!(rated.difficulty_key() < unrated.difficulty_key());

        let nan = Recipe::builder("C").difficulty(f64::NAN).build();
        assert_eq!(nan.difficulty_key(), MISSING_DIFFICULTY);
    }

    #[test]
    fn test_deserialize_source_field_names() {
        let json = r#"{
            "name": "Bread",
            "result": "Loaf of Bread",
            "trivial": 15,
            "yield": 2,
            "mealSize": "meal",
            "stats": {"STR": 2, "STA": 1.5},
            "components": ["Flour", "Water x2"],
            "tags": ["baked"],
            "expansion": "Classic"
        }"#;

        let recipe: Recipe = serde_json::from_str(json).expect("parse");
        assert_eq!(recipe.result_name(), "Loaf of Bread");
        assert_eq!(recipe.difficulty, Some(15.0));
        assert_eq!(recipe.yield_quantity, 2);
        assert_eq!(recipe.category.as_deref(), Some("meal"));
        assert_eq!(recipe.stat_bonuses.get("STA"), Some(&1.5));
        assert_eq!(recipe.components.len(), 2);
        assert_eq!(recipe.source_pack.as_deref(), Some("Classic"));
    }

    #[test]
    fn test_deserialize_minimal_record_defaults() {
        let recipe: Recipe = serde_json::from_str(r#"{"name": "Water"}"#).expect("parse");

        assert_eq!(recipe.result_name(), "Water");
        assert!(recipe.difficulty.is_none());
        assert_eq!(recipe.yield_quantity, DEFAULT_YIELD);
        assert!(recipe.category.is_none());
        assert!(recipe.stat_bonuses.is_empty());
        assert!(recipe.components.is_empty());
        assert!(recipe.tags.is_empty());
        assert!(recipe.source_pack.is_none());
    }

    #[test]
    fn test_deserialize_nulls_as_missing() {
        let json = r#"{"name": "X", "components": null, "tags": null, "stats": null, "trivial": null, "yield": null}"#;
        let recipe: Recipe = serde_json::from_str(json).expect("parse");

        assert!(recipe.components.is_empty());
        assert!(recipe.tags.is_empty());
        assert!(recipe.stat_bonuses.is_empty());
        assert!(recipe.difficulty.is_none());
        assert_eq!(recipe.yield_quantity, 1);
    }

    #[test]
    fn test_deserialize_lenient_yield() {
        let parse = |raw: &str| -> u32 {
            let json = format!(r#"{{"name": "X", "yield": {raw}}}"#);
            serde_json::from_str::<Recipe>(&json)
                .expect("parse")
                .yield_quantity
        };

        assert_eq!(parse("4"), 4);
        assert_eq!(parse("\"3\""), 3);
        assert_eq!(parse("2.7"), 2);
        assert_eq!(parse("0"), 1);
        assert_eq!(parse("-5"), 1);
        assert_eq!(parse("\"lots\""), 1);
        assert_eq!(parse("[1, 2]"), 1);
        assert_eq!(parse("true"), 1);
    }

    #[test]
    fn test_deserialize_string_difficulty() {
        let recipe: Recipe =
            serde_json::from_str(r#"{"name": "X", "difficulty": "12"}"#).expect("parse");
        assert_eq!(recipe.difficulty, Some(12.0));

        let recipe: Recipe =
            serde_json::from_str(r#"{"name": "X", "difficulty": "hard"}"#).expect("parse");
        assert!(recipe.difficulty.is_none());
    }

    #[test]
    fn test_deserialize_shape_violation_is_error() {
        let result = serde_json::from_str::<Recipe>(r#"{"name": "X", "components": "Flour"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_deserialize_from_toml() {
        let toml_content = r#"
name = "Pie"
result_name = "Apple Pie"
difficulty = 30
yield = 3
category = "feast"
components = ["Apple x3", "Dough"]
tags = ["baked"]
source_pack = "Orchard"

[stat_bonuses]
AGI = 2
"#;
        let recipe: Recipe = toml::from_str(toml_content).expect("parse");
        assert_eq!(recipe.result_name(), "Apple Pie");
        assert_eq!(recipe.difficulty, Some(30.0));
        assert_eq!(recipe.yield_quantity, 3);
        assert_eq!(recipe.stat_bonuses.get("AGI"), Some(&2.0));
    }
}
