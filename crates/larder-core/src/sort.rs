//! Priority-aware ordering by difficulty.

use std::cmp::Ordering;

use crate::recipe::Recipe;

/// Stats whose presence moves a recipe ahead of the rest.
///
/// Entries are lower-cased; blanks and duplicates are dropped, order is kept.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PriorityStats {
    stats: Vec<String>,
}

impl PriorityStats {
    /// Create an empty priority list.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a priority stat.
    #[must_use]
    pub fn with(mut self, stat: impl AsRef<str>) -> Self {
        self.push(stat.as_ref());
        self
    }

    fn push(&mut self, stat: &str) {
        let stat = stat.trim().to_lowercase();
        if !stat.is_empty() && !self.stats.contains(&stat) {
            self.stats.push(stat);
        }
    }

    /// Returns true if nothing is prioritized.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.stats.is_empty()
    }

    /// Number of priority stats.
    #[must_use]
    pub fn len(&self) -> usize {
        self.stats.len()
    }

    /// Iterate over the lower-cased priority stats.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.stats.iter().map(String::as_str)
    }

    /// Check whether any priority stat appears in the recipe's stat keys.
    ///
    /// Matching is a substring test against the space-joined, lower-cased
    /// keys, so `"str"` also matches a `"strength"` bonus.
    #[must_use]
    pub fn prioritizes(&self, recipe: &Recipe) -> bool {
        if self.stats.is_empty() {
            return false;
        }
        let keys = recipe.stat_keys_joined();
        self.stats.iter().any(|stat| keys.contains(stat.as_str()))
    }
}

impl<S: AsRef<str>> FromIterator<S> for PriorityStats {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut stats = Self::new();
        for stat in iter {
            stats.push(stat.as_ref());
        }
        stats
    }
}

/// Check whether a recipe falls in the prioritized class.
#[must_use]
pub fn is_prioritized(recipe: &Recipe, priority: &PriorityStats) -> bool {
    priority.prioritizes(recipe)
}

/// Order recipes: prioritized first, then ascending difficulty.
///
/// Missing difficulty sorts last within its class. The sort is stable, so
/// recipes equal on both keys keep their input order.
pub fn sort<'a, I>(recipes: I, priority: &PriorityStats) -> Vec<&'a Recipe>
where
    I: IntoIterator<Item = &'a Recipe>,
{
    let mut keyed: Vec<(bool, &'a Recipe)> = recipes
        .into_iter()
        .map(|recipe| (priority.prioritizes(recipe), recipe))
        .collect();

    keyed.sort_by(|(a_prio, a), (b_prio, b)| compare(*a_prio, a, *b_prio, b));
    keyed.into_iter().map(|(_, recipe)| recipe).collect()
}

fn compare(a_prio: bool, a: &Recipe, b_prio: bool, b: &Recipe) -> Ordering {
    b_prio
        .cmp(&a_prio)
        .then_with(|| {
            // NaN never reaches here; `difficulty_key` maps it to the sentinel.
            a.difficulty_key()
                .partial_cmp(&b.difficulty_key())
                .unwrap_or(Ordering::Equal)
        })
}
