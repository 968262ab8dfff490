//! Sub-recipe composition trees.
//!
//! A component that is itself the output of another recipe in the catalog is
//! expanded into that recipe's components, recursively. Expansion is guarded
//! by the set of names already being expanded on the current path, so cyclic
//! and self-referential catalogs still produce finite trees.

use serde::Serialize;
use std::collections::BTreeSet;
use tracing::trace;

use crate::index::RecipeIndex;
use crate::normalize::normalize;
use crate::recipe::Recipe;

/// Normalized names being expanded along one root-to-node path.
pub type Ancestry = BTreeSet<String>;

/// One component in a resolved composition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CompositionNode {
    /// A raw component, or one whose expansion would re-enter the current path.
    Leaf {
        /// Component name as written in the recipe.
        display_name: String,
    },
    /// A component produced by another recipe, expanded into its components.
    Composite {
        /// Component name as written in the recipe.
        display_name: String,
        /// Resolved components of the producing recipe.
        children: Vec<CompositionNode>,
    },
}

impl CompositionNode {
    /// Create a leaf node.
    #[must_use]
    pub fn leaf(display_name: impl Into<String>) -> Self {
        Self::Leaf {
            display_name: display_name.into(),
        }
    }

    /// Create a composite node.
    #[must_use]
    pub fn composite(display_name: impl Into<String>, children: Vec<CompositionNode>) -> Self {
        Self::Composite {
            display_name: display_name.into(),
            children,
        }
    }

    /// Component name as written in the recipe.
    #[must_use]
    pub fn display_name(&self) -> &str {
        match self {
            Self::Leaf { display_name } | Self::Composite { display_name, .. } => display_name,
        }
    }

    /// Child nodes; empty for leaves.
    #[must_use]
    pub fn children(&self) -> &[CompositionNode] {
        match self {
            Self::Leaf { .. } => &[],
            Self::Composite { children, .. } => children,
        }
    }

    /// Returns true for leaf nodes.
    #[must_use]
    pub fn is_leaf(&self) -> bool {
        matches!(self, Self::Leaf { .. })
    }

    /// Number of levels in this subtree; a leaf has depth 1.
    #[must_use]
    pub fn depth(&self) -> usize {
        1 + self.children().iter().map(Self::depth).max().unwrap_or(0)
    }

    /// Leaf names of this subtree, left to right.
    #[must_use]
    pub fn leaf_names(&self) -> Vec<&str> {
        let mut names = Vec::new();
        self.collect_leaves(&mut names);
        names
    }

    fn collect_leaves<'n>(&'n self, out: &mut Vec<&'n str>) {
        match self {
            Self::Leaf { display_name } => out.push(display_name),
            Self::Composite { children, .. } => {
                for child in children {
                    child.collect_leaves(out);
                }
            },
        }
    }
}

/// Resolve a component list into composition nodes.
///
/// Each component whose normalized name is in `ancestry`, or that no recipe
/// produces, becomes a leaf. Any other component becomes a composite over the
/// first producer's components, resolved with `ancestry` plus that name.
/// Each branch gets its own copy of the ancestry.
pub fn resolve<S>(
    components: &[S],
    index: &RecipeIndex<'_>,
    ancestry: &Ancestry,
) -> Vec<CompositionNode>
where
    S: AsRef<str>,
{
    components
        .iter()
        .map(|component| resolve_component(component.as_ref(), index, ancestry))
        .collect()
}

/// Resolve a recipe's own components.
///
/// The ancestry starts with the recipe's own result, so a recipe listing its
/// own output as a component yields a leaf for it.
pub fn resolve_recipe(recipe: &Recipe, index: &RecipeIndex<'_>) -> Vec<CompositionNode> {
    let ancestry = Ancestry::from([recipe.normalized_result()]);
    resolve(&recipe.components, index, &ancestry)
}

fn resolve_component(
    display_name: &str,
    index: &RecipeIndex<'_>,
    ancestry: &Ancestry,
) -> CompositionNode {
    let key = normalize(display_name);

    if ancestry.contains(&key) {
        trace!(
            "'{}' already expanding on this path, kept as leaf",
            display_name
        );
        return CompositionNode::leaf(display_name);
    }

    let Some(producer) = index.producer_normalized(&key) else {
        return CompositionNode::leaf(display_name);
    };

    let mut branch = ancestry.clone();
    branch.insert(key);
    CompositionNode::composite(
        display_name,
        resolve(&producer.components, index, &branch),
    )
}
