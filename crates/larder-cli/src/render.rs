//! Plain-text presentation of query results.
//!
//! Views borrow query output and implement [`fmt::Display`], so they can be
//! printed directly or collected with `to_string()`.

use std::fmt;

use larder_core::{CatalogEntry, CompositionNode, Facets, Recipe};

/// Placeholder for missing values.
pub const MISSING: &str = "—";

/// Suffix appended to truncated cells.
pub const ELLIPSIS: char = '…';

/// Default cell truncation limit, in characters.
pub const DEFAULT_TRUNCATE_LIMIT: usize = 40;

/// Table column headers, in display order.
pub const COLUMNS: [&str; 7] = [
    "Name",
    "Difficulty",
    "Yield",
    "Category",
    "Stats",
    "Components",
    "Tags",
];

// ============================================================================
// Cell formatting
// ============================================================================

/// Cut `text` to `limit` characters, appending "…" when anything was cut.
#[must_use]
pub fn truncate(text: &str, limit: usize) -> String {
    match text.char_indices().nth(limit) {
        Some((cut, _)) => {
            let mut short = text[..cut].to_string();
            short.push(ELLIPSIS);
            short
        },
        None => text.to_string(),
    }
}

/// Terminal columns taken by `text`.
///
/// Pictographs count as two columns; variation selectors and joiners as none.
#[must_use]
pub fn display_width(text: &str) -> usize {
    text.chars()
        .map(|c| match c {
            '\u{200D}' | '\u{FE0E}' | '\u{FE0F}' => 0,
            c if u32::from(c) >= 0x1_F000 => 2,
            _ => 1,
        })
        .sum()
}

/// Glyph for a meal-size category.
#[must_use]
pub fn category_glyph(category: Option<&str>) -> &'static str {
    match category.map(str::to_lowercase).as_deref() {
        Some("snack") => "🍪",
        Some("meal") => "🥘",
        Some("feast") => "🍽️",
        _ => "?",
    }
}

/// Untruncated cell values for one recipe, in [`COLUMNS`] order.
#[must_use]
pub fn cells(recipe: &Recipe) -> [String; 7] {
    let difficulty = recipe
        .difficulty
        .filter(|d| !d.is_nan())
        .map_or_else(|| MISSING.to_string(), |d| d.to_string());

    let category = format!(
        "{} {}",
        category_glyph(recipe.category.as_deref()),
        recipe.category_label()
    );

    let stats = recipe
        .stat_bonuses
        .iter()
        .map(|(stat, bonus)| format!("{stat} {bonus:+}"))
        .collect::<Vec<_>>();

    [
        recipe.name.clone(),
        difficulty,
        recipe.yield_quantity.to_string(),
        category,
        join_or_missing(&stats),
        join_or_missing(&recipe.components),
        join_or_missing(&recipe.tags),
    ]
}

fn join_or_missing(values: &[String]) -> String {
    if values.is_empty() {
        MISSING.to_string()
    } else {
        values.join(", ")
    }
}

// ============================================================================
// Views
// ============================================================================

/// A recipe table.
#[derive(Debug, Clone)]
pub struct RecipeTable<'a> {
    recipes: Vec<&'a Recipe>,
    truncate_limit: usize,
}

impl<'a> RecipeTable<'a> {
    /// Create a table over recipes in display order.
    #[must_use]
    pub fn new(recipes: impl IntoIterator<Item = &'a Recipe>) -> Self {
        Self {
            recipes: recipes.into_iter().collect(),
            truncate_limit: DEFAULT_TRUNCATE_LIMIT,
        }
    }

    /// Set the per-cell truncation limit.
    #[must_use]
    pub fn with_truncate_limit(mut self, limit: usize) -> Self {
        self.truncate_limit = limit;
        self
    }

    fn rows(&self) -> Vec<[String; 7]> {
        self.recipes
            .iter()
            .map(|recipe| cells(recipe).map(|cell| truncate(&cell, self.truncate_limit)))
            .collect()
    }
}

impl fmt::Display for RecipeTable<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rows = self.rows();

        let mut widths = COLUMNS.map(display_width);
        for row in &rows {
            for (width, cell) in widths.iter_mut().zip(row) {
                *width = (*width).max(display_width(cell));
            }
        }

        write_row(f, &COLUMNS, &widths)?;
        let rule: usize = widths.iter().sum::<usize>() + 2 * (widths.len() - 1);
        writeln!(f, "{}", "-".repeat(rule))?;
        for row in &rows {
            write_row(f, row, &widths)?;
        }
        write!(f, "\n{} recipe(s)", rows.len())
    }
}

fn write_row<S: AsRef<str>>(
    f: &mut fmt::Formatter<'_>,
    cells: &[S],
    widths: &[usize],
) -> fmt::Result {
    let line = cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| {
            let cell = cell.as_ref();
            let pad = width.saturating_sub(display_width(cell));
            format!("{cell}{}", " ".repeat(pad))
        })
        .collect::<Vec<_>>()
        .join("  ");
    writeln!(f, "{}", line.trim_end())
}

/// An indented composition tree. Composites are marked "▸".
#[derive(Debug, Clone, Copy)]
pub struct CompositionTree<'a> {
    nodes: &'a [CompositionNode],
}

impl<'a> CompositionTree<'a> {
    /// Create a view over a recipe's resolved components.
    #[must_use]
    pub fn new(nodes: &'a [CompositionNode]) -> Self {
        Self { nodes }
    }
}

impl fmt::Display for CompositionTree<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_nodes(f, self.nodes, 1)
    }
}

fn write_nodes(
    f: &mut fmt::Formatter<'_>,
    nodes: &[CompositionNode],
    depth: usize,
) -> fmt::Result {
    let indent = "  ".repeat(depth);
    for node in nodes {
        match node {
            CompositionNode::Leaf { display_name } => {
                writeln!(f, "{indent}- {display_name}")?;
            },
            CompositionNode::Composite {
                display_name,
                children,
            } => {
                writeln!(f, "{indent}▸ {display_name}")?;
                write_nodes(f, children, depth + 1)?;
            },
        }
    }
    Ok(())
}

/// Query results as a table, optionally followed by each composition tree.
#[derive(Debug, Clone)]
pub struct EntryListing<'a> {
    entries: &'a [CatalogEntry<'a>],
    truncate_limit: usize,
    show_trees: bool,
}

impl<'a> EntryListing<'a> {
    /// Create a listing over catalog entries.
    #[must_use]
    pub fn new(entries: &'a [CatalogEntry<'a>]) -> Self {
        Self {
            entries,
            truncate_limit: DEFAULT_TRUNCATE_LIMIT,
            show_trees: false,
        }
    }

    /// Set the per-cell truncation limit.
    #[must_use]
    pub fn with_truncate_limit(mut self, limit: usize) -> Self {
        self.truncate_limit = limit;
        self
    }

    /// Print composition trees under the table.
    #[must_use]
    pub fn with_trees(mut self, show: bool) -> Self {
        self.show_trees = show;
        self
    }
}

impl fmt::Display for EntryListing<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let table = RecipeTable::new(self.entries.iter().map(|e| e.recipe))
            .with_truncate_limit(self.truncate_limit);
        writeln!(f, "{table}")?;

        if self.show_trees {
            for entry in self.entries {
                writeln!(f, "\n{}", entry.recipe.name)?;
                if entry.composition.is_empty() {
                    writeln!(f, "  {MISSING}")?;
                } else {
                    write!(f, "{}", CompositionTree::new(&entry.composition))?;
                }
            }
        }
        Ok(())
    }
}

/// Values available for filtering.
#[derive(Debug, Clone, Copy)]
pub struct FacetList<'a> {
    facets: &'a Facets,
}

impl<'a> FacetList<'a> {
    /// Create a view over catalog facets.
    #[must_use]
    pub fn new(facets: &'a Facets) -> Self {
        Self { facets }
    }
}

impl fmt::Display for FacetList<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sections = [
            ("Categories", &self.facets.categories),
            ("Tags", &self.facets.tags),
            ("Sources", &self.facets.source_packs),
            ("Stats", &self.facets.stats),
        ];
        for (title, values) in sections {
            writeln!(f, "{title}: {}", join_or_missing(values))?;
        }
        Ok(())
    }
}
